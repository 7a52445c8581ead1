//! Frame encoding/decoding utilities.
//!
//! Requests carry a 4-byte header: the command id followed by a 24-bit
//! big-endian payload length.
//!
//! ```text
//! +--------+--------+--------+--------+-------------------+
//! | cmd_id | len_hi | len_md | len_lo | payload[0..len]   |
//! +--------+--------+--------+--------+-------------------+
//! ```
//!
//! Responses start with a fixed signature byte and a status byte. Only OK
//! responses carry a payload, and its length is implied by the command that
//! was sent.
//!
//! ```text
//! +------+--------+-------------------+
//! | 0xA0 | status | payload (OK only) |
//! +------+--------+-------------------+
//! ```

use bytes::{Buf, BufMut, Bytes, BytesMut};

use crate::constants::*;
use crate::error::*;
use crate::types::*;

/// Encode a request frame.
pub fn encode_request(code: CommandCode, payload: &[u8]) -> Result<Vec<u8>, EncodingError> {
    if payload.len() > MAX_PAYLOAD_LEN {
        return Err(EncodingError::PayloadTooLarge {
            max: MAX_PAYLOAD_LEN,
            actual: payload.len(),
        });
    }
    let mut buf = Vec::with_capacity(HEADER_LEN + payload.len());
    buf.put_u8(code.id());
    buf.put_uint(payload.len() as u64, LENGTH_FIELD_LEN);
    buf.extend_from_slice(payload);
    Ok(buf)
}

/// Split a request frame into its command and payload.
///
/// This is the device side of [`encode_request`]; it is used by device
/// emulators and tests.
pub fn decode_request(frame: &[u8]) -> Result<(u8, &[u8]), ProtocolError> {
    if frame.len() < HEADER_LEN {
        return Err(ProtocolError::Truncated {
            expected: HEADER_LEN,
            actual: frame.len(),
        });
    }
    let mut header = &frame[..HEADER_LEN];
    let id = header.get_u8();
    let len = header.get_uint(LENGTH_FIELD_LEN) as usize;
    let payload = &frame[HEADER_LEN..];
    if payload.len() < len {
        return Err(ProtocolError::Truncated {
            expected: HEADER_LEN + len,
            actual: frame.len(),
        });
    }
    Ok((id, &payload[..len]))
}

/// Validate a complete response.
///
/// The signature is checked before anything else so that a desynchronized
/// stream is never interpreted. Non-OK responses come back with an empty
/// payload; OK payloads are returned uninterpreted.
pub fn decode_response(bytes: &[u8]) -> Result<(Status, &[u8]), ProtocolError> {
    if bytes.len() < RESPONSE_HEADER_LEN {
        return Err(ProtocolError::Truncated {
            expected: RESPONSE_HEADER_LEN,
            actual: bytes.len(),
        });
    }
    if bytes[0] != RESPONSE_SIGNATURE {
        return Err(ProtocolError::BadSignature(bytes[0]));
    }
    let status = Status::try_from(bytes[1])?;
    match status {
        Status::Ok => Ok((status, &bytes[RESPONSE_HEADER_LEN..])),
        _ => Ok((status, &bytes[..0])),
    }
}

/// Encode a response frame.
///
/// Device side of [`decode_response`]; the payload is dropped for non-OK
/// statuses.
pub fn encode_response(status: Status, payload: &[u8]) -> Vec<u8> {
    let mut buf = Vec::with_capacity(RESPONSE_HEADER_LEN + payload.len());
    buf.put_u8(RESPONSE_SIGNATURE);
    buf.put_u8(status.into());
    if status == Status::Ok {
        buf.extend_from_slice(payload);
    }
    buf
}

/// A validated response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseFrame {
    pub status: Status,
    pub payload: Bytes,
}

/// Incremental response reader.
///
/// Bytes are pushed as they arrive from the transport; [`decode`] returns a
/// frame once the header and, for OK responses, `payload_len` bytes of
/// payload are buffered.
///
/// [`decode`]: ResponseDecoder::decode
#[derive(Debug, Default)]
pub struct ResponseDecoder {
    /// Buffer for accumulating incoming data.
    buffer: BytesMut,
}

impl ResponseDecoder {
    pub fn new() -> Self {
        ResponseDecoder {
            buffer: BytesMut::with_capacity(RESPONSE_HEADER_LEN + SCHEDULE_LEN),
        }
    }

    /// Add received data to the buffer.
    pub fn push(&mut self, data: &[u8]) {
        self.buffer.extend_from_slice(data);
    }

    /// Number of bytes still needed before [`decode`] can make progress.
    ///
    /// [`decode`]: ResponseDecoder::decode
    pub fn needed(&self, payload_len: usize) -> usize {
        if self.buffer.len() < RESPONSE_HEADER_LEN {
            return RESPONSE_HEADER_LEN - self.buffer.len();
        }
        match Status::try_from(self.buffer[1]) {
            Ok(Status::Ok) => (RESPONSE_HEADER_LEN + payload_len).saturating_sub(self.buffer.len()),
            _ => 0,
        }
    }

    /// Try to decode a response whose OK payload is `payload_len` bytes.
    ///
    /// Returns `Ok(None)` while more data is needed. A bad signature or
    /// unknown status is reported as soon as the first two bytes are in.
    pub fn decode(&mut self, payload_len: usize) -> Result<Option<ResponseFrame>, ProtocolError> {
        if self.buffer.len() < RESPONSE_HEADER_LEN {
            return Ok(None);
        }
        let (status, _) = decode_response(&self.buffer[..RESPONSE_HEADER_LEN])?;
        if status != Status::Ok {
            self.buffer.advance(RESPONSE_HEADER_LEN);
            return Ok(Some(ResponseFrame {
                status,
                payload: Bytes::new(),
            }));
        }
        if self.buffer.len() < RESPONSE_HEADER_LEN + payload_len {
            return Ok(None);
        }
        self.buffer.advance(RESPONSE_HEADER_LEN);
        let payload = self.buffer.split_to(payload_len).freeze();
        Ok(Some(ResponseFrame { status, payload }))
    }

    /// Get the number of buffered bytes.
    pub fn buffered_len(&self) -> usize {
        self.buffer.len()
    }

    /// Clear the buffer.
    pub fn clear(&mut self) {
        self.buffer.clear();
    }
}
