//! Thermostat Control Protocol
//!
//! This crate provides types and utilities for talking to a thermostat over
//! its binary command/response protocol. It is pure: nothing here performs I/O.
//!
//! # Protocol Overview
//!
//! - **Requests** (host → device): 4-byte header (command id, 24-bit payload
//!   length) followed by the payload.
//! - **Responses** (device → host): signature byte `0xA0`, status byte, and for
//!   OK responses a payload whose length is implied by the command.
//!
//! Schedules travel as a fixed 15-byte blob of three `{offset, temperature}`
//! entries; see [`TemperatureSchedule`].
//!
//! # Example
//!
//! ```rust
//! use thermo_protocol::{Command, CommandCode, Response};
//!
//! let frame = Command::set_target_temp(72)?.encode()?;
//! assert_eq!(frame, [4, 0, 0, 1, 72]);
//!
//! let response = Response::decode(CommandCode::SetTargetTemp, &[0xA0, 0x00])?;
//! assert_eq!(response, Response::Ack);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod commands;
mod constants;
mod error;
mod frame;
mod responses;
mod schedule;
mod types;

pub use commands::*;
pub use constants::*;
pub use error::*;
pub use frame::*;
pub use responses::*;
pub use schedule::*;
pub use types::*;
