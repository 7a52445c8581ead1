//! Protocol error types.

use thiserror::Error;

/// Errors raised while building a request.
///
/// These are caller mistakes and are never worth retrying.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EncodingError {
    /// Payload does not fit the 24-bit length field of the header.
    #[error("payload too large: maximum {max} bytes, got {actual}")]
    PayloadTooLarge {
        /// Maximum representable length.
        max: usize,
        /// Length of the payload that was offered.
        actual: usize,
    },

    /// Target temperature outside the range the device accepts.
    #[error("target temperature {0}°F is outside {min}..={max}°F", min = crate::MIN_TARGET_TEMP_F, max = crate::MAX_TARGET_TEMP_F)]
    TemperatureOutOfRange(u8),

    /// Date cannot be represented as u32 seconds since the epoch.
    #[error("timestamp {0} cannot be represented on the wire")]
    TimestampOutOfRange(i64),
}

/// Errors raised while validating a response frame.
///
/// Any of these means the byte stream can no longer be trusted.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    /// Fewer bytes than the minimum response size.
    #[error("response truncated: expected at least {expected} bytes, got {actual}")]
    Truncated {
        /// Expected minimum length.
        expected: usize,
        /// Actual length received.
        actual: usize,
    },

    /// First byte was not the response signature.
    #[error("bad response signature: 0x{0:02X}")]
    BadSignature(u8),

    /// Status byte is not part of the vocabulary.
    #[error("unknown response status: 0x{0:02X}")]
    UnknownStatus(u8),
}

/// Errors reported by the device through a non-OK status.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceError {
    /// Device rejected the request signature.
    #[error("device rejected the request signature")]
    BadSignature,

    /// Device does not know the command.
    #[error("device reported an invalid command")]
    InvalidCommand,

    /// Device expected a different payload length.
    #[error("device reported an invalid payload length")]
    InvalidLength,
}

/// Errors raised while decoding a response payload.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    /// Payload is not the fixed size for its type.
    #[error("wrong payload length: expected {expected} bytes, got {actual}")]
    WrongLength {
        /// Required length.
        expected: usize,
        /// Length received.
        actual: usize,
    },

    /// A decoded field is outside its valid range.
    #[error("{field} out of range: {value}")]
    OutOfRange {
        /// Name of the offending field.
        field: &'static str,
        /// Offending value.
        value: u32,
    },
}

/// Anything that can go wrong turning a frame into a typed message.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    #[error(transparent)]
    Device(#[from] DeviceError),

    #[error(transparent)]
    Codec(#[from] CodecError),
}
