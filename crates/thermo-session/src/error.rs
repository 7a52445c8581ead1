//! Session error types.

use std::time::Duration;

use thermo_protocol::{CodecError, CommandCode, DecodeError, DeviceError, EncodingError, ProtocolError};
use thiserror::Error;

/// Errors surfaced by a [`Session`](crate::Session) call.
#[derive(Debug, Error)]
pub enum SessionError {
    /// The request could not be encoded.
    #[error("failed to encode request: {0}")]
    Encoding(#[from] EncodingError),

    /// The response stream is out of step with the requests.
    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    /// The device rejected the request.
    #[error("device error: {0}")]
    Device(#[from] DeviceError),

    /// The device answered with a payload that does not decode.
    #[error("invalid response payload: {0}")]
    Codec(#[from] CodecError),

    /// No complete response arrived before the deadline.
    #[error("timed out after {timeout:?} waiting for {command}")]
    Timeout {
        /// Command that was outstanding.
        command: CommandCode,
        /// Deadline that elapsed.
        timeout: Duration,
    },

    /// Transport I/O failed.
    #[error("transport I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Transport reached end of stream.
    #[error("transport closed")]
    Closed,

    /// Device answered with a response of the wrong kind.
    #[error("unexpected response to {0}")]
    UnexpectedResponse(CommandCode),
}

impl SessionError {
    /// Whether a caller may reasonably try the same call again.
    ///
    /// Device, codec and encoding errors would repeat identically.
    pub fn is_retryable(&self) -> bool {
        matches!(self, SessionError::Protocol(_) | SessionError::Timeout { .. })
    }

    /// Whether the error leaves the connection in an unknown framing state.
    pub fn desynchronizes(&self) -> bool {
        matches!(
            self,
            SessionError::Protocol(_)
                | SessionError::Timeout { .. }
                | SessionError::Io(_)
                | SessionError::Closed
        )
    }
}

impl From<DecodeError> for SessionError {
    fn from(err: DecodeError) -> Self {
        match err {
            DecodeError::Protocol(e) => SessionError::Protocol(e),
            DecodeError::Device(e) => SessionError::Device(e),
            DecodeError::Codec(e) => SessionError::Codec(e),
        }
    }
}

/// Result type alias for session operations.
pub type SessionResult<T> = Result<T, SessionError>;

/// Errors loading a [`SessionConfig`](crate::SessionConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    /// I/O error reading a file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parse error.
    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// A value parsed but is not usable.
    #[error("invalid configuration: {0}")]
    Invalid(String),
}
