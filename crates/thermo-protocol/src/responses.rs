//! Responses from the thermostat.

use crate::constants::*;
use crate::error::*;
use crate::frame::{decode_response, encode_response};
use crate::schedule::*;
use crate::types::*;

/// Typed result of a successful exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Response {
    /// Key fragment (reply to GetKeyPart).
    KeyPart(KeyFragment),

    /// Temperatures (reply to GetTemps).
    Temps(Temps),

    /// A schedule (reply to GetWeekday/WeekendTempSchedule).
    Schedule(TemperatureSchedule),

    /// Acknowledgement with no payload (reply to every Set* command).
    Ack,
}

impl Response {
    /// Decode the OK payload of a response to `code`.
    pub fn decode_payload(code: CommandCode, payload: &[u8]) -> Result<Self, CodecError> {
        let expected = code.response_len();
        if payload.len() != expected {
            return Err(CodecError::WrongLength {
                expected,
                actual: payload.len(),
            });
        }

        match code {
            CommandCode::GetKeyPart => {
                let mut key = [0u8; KEY_FRAGMENT_LEN];
                key.copy_from_slice(payload);
                Ok(Response::KeyPart(KeyFragment(key)))
            }

            CommandCode::GetTemps => Ok(Response::Temps(Temps::decode(payload)?)),

            CommandCode::GetWeekdayTempSchedule | CommandCode::GetWeekendTempSchedule => {
                Ok(Response::Schedule(TemperatureSchedule::decode(payload)?))
            }

            CommandCode::SetDateTime
            | CommandCode::SetTargetTemp
            | CommandCode::SetWeekdayTempSchedule
            | CommandCode::SetWeekendTempSchedule => Ok(Response::Ack),
        }
    }

    /// Validate and decode a complete response frame to `code`.
    pub fn decode(code: CommandCode, frame: &[u8]) -> Result<Self, DecodeError> {
        let (status, payload) = decode_response(frame)?;
        status.check()?;
        Ok(Self::decode_payload(code, payload)?)
    }

    /// Encode the OK payload of this response.
    pub fn payload(&self) -> Vec<u8> {
        match self {
            Response::KeyPart(key) => key.as_bytes().to_vec(),
            Response::Temps(temps) => temps.encode().to_vec(),
            Response::Schedule(schedule) => schedule.encode(),
            Response::Ack => Vec::new(),
        }
    }

    /// Encode as a complete OK response frame.
    ///
    /// Device side of [`decode`](Response::decode).
    pub fn encode(&self) -> Vec<u8> {
        encode_response(Status::Ok, &self.payload())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn weekday_frame() -> Vec<u8> {
        let mut frame = vec![0xA0, 0x00];
        for (offset, temp) in [(21600u32, 68u8), (43200, 72), (75600, 65)] {
            frame.extend_from_slice(&offset.to_be_bytes());
            frame.push(temp);
        }
        frame
    }

    #[test]
    fn test_decode_schedule_response() {
        let response =
            Response::decode(CommandCode::GetWeekdayTempSchedule, &weekday_frame()).unwrap();
        let Response::Schedule(schedule) = response else {
            panic!("expected a schedule");
        };
        let entries: Vec<(u32, u8)> = schedule
            .entries()
            .iter()
            .map(|e| (e.offset_secs(), e.temperature_f()))
            .collect();
        assert_eq!(entries, vec![(21600, 68), (43200, 72), (75600, 65)]);
    }

    #[test]
    fn test_decode_ack() {
        assert_eq!(
            Response::decode(CommandCode::SetTargetTemp, &[0xA0, 0x00]),
            Ok(Response::Ack)
        );
    }

    #[test]
    fn test_decode_device_error_skips_payload() {
        // Garbage after the status must not be looked at.
        assert_eq!(
            Response::decode(CommandCode::GetWeekdayTempSchedule, &[0xA0, 0x02, 0xFF]),
            Err(DecodeError::Device(DeviceError::InvalidCommand))
        );
    }

    #[test]
    fn test_decode_key_part() {
        let frame = [0xA0u8, 0x00, 1, 2, 3, 4, 5, 6, 7, 8];
        assert_eq!(
            Response::decode(CommandCode::GetKeyPart, &frame),
            Ok(Response::KeyPart(KeyFragment([1, 2, 3, 4, 5, 6, 7, 8])))
        );
    }

    #[test]
    fn test_decode_wrong_payload_length() {
        assert_eq!(
            Response::decode(CommandCode::GetKeyPart, &[0xA0, 0x00, 1, 2]),
            Err(DecodeError::Codec(CodecError::WrongLength {
                expected: KEY_FRAGMENT_LEN,
                actual: 2
            }))
        );
        assert_eq!(
            Response::decode(CommandCode::SetDateTime, &[0xA0, 0x00, 1]),
            Err(DecodeError::Codec(CodecError::WrongLength {
                expected: 0,
                actual: 1
            }))
        );
    }

    #[test]
    fn test_decode_bad_signature() {
        assert_eq!(
            Response::decode(CommandCode::GetTemps, &[0x0A, 0x00, 70, 72]),
            Err(DecodeError::Protocol(ProtocolError::BadSignature(0x0A)))
        );
    }

    #[test]
    fn test_encode_matches_decode() {
        let response = Response::Temps(Temps {
            current_f: 66,
            target_f: 70,
        });
        let frame = response.encode();
        assert_eq!(frame, vec![0xA0, 0x00, 66, 70]);
        assert_eq!(Response::decode(CommandCode::GetTemps, &frame), Ok(response));
    }
}
