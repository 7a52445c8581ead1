//! Thermostat Command Session
//!
//! Drives the thermostat protocol over any ordered, reliable byte stream
//! (serial port, BLE bridge, TCP socket). A [`Session`] turns typed calls
//! such as [`Session::set_target_temp`] into request frames, waits for the
//! matching response and maps the status byte onto [`SessionError`].
//!
//! # Example
//!
//! ```rust,no_run
//! use thermo_session::{Session, SessionConfig};
//! use tokio::net::TcpStream;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let stream = TcpStream::connect("127.0.0.1:7070").await?;
//! let session = Session::new(stream, SessionConfig::default());
//!
//! session.set_target_temp(72).await?;
//! let temps = session.get_temps().await?;
//! println!("{}°F (target {}°F)", temps.current_f, temps.target_f);
//! # Ok(())
//! # }
//! ```
//!
//! [`emulator`] provides an in-memory device for tests and bench work.

mod config;
pub mod emulator;
mod error;
mod session;

pub use config::*;
pub use error::*;
pub use session::*;
