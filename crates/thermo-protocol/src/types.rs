//! Common types used in the protocol.

use crate::constants::*;
use crate::error::*;

/// The command vocabulary understood by the device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandCode {
    GetKeyPart,
    GetTemps,
    SetDateTime,
    SetTargetTemp,
    GetWeekdayTempSchedule,
    GetWeekendTempSchedule,
    SetWeekdayTempSchedule,
    SetWeekendTempSchedule,
}

impl CommandCode {
    /// All commands, in wire-id order.
    pub const ALL: [CommandCode; 8] = [
        CommandCode::GetKeyPart,
        CommandCode::GetTemps,
        CommandCode::SetDateTime,
        CommandCode::SetTargetTemp,
        CommandCode::GetWeekdayTempSchedule,
        CommandCode::GetWeekendTempSchedule,
        CommandCode::SetWeekdayTempSchedule,
        CommandCode::SetWeekendTempSchedule,
    ];

    /// Wire id of the command.
    pub fn id(self) -> u8 {
        self.into()
    }

    /// Payload length of an OK response to this command.
    ///
    /// Responses do not carry a length field, so the receiver has to know
    /// this up front.
    pub fn response_len(self) -> usize {
        match self {
            CommandCode::GetKeyPart => KEY_FRAGMENT_LEN,
            CommandCode::GetTemps => TEMPS_LEN,
            CommandCode::GetWeekdayTempSchedule | CommandCode::GetWeekendTempSchedule => {
                SCHEDULE_LEN
            }
            CommandCode::SetDateTime
            | CommandCode::SetTargetTemp
            | CommandCode::SetWeekdayTempSchedule
            | CommandCode::SetWeekendTempSchedule => 0,
        }
    }
}

impl From<CommandCode> for u8 {
    fn from(code: CommandCode) -> Self {
        match code {
            CommandCode::GetKeyPart => CMD_GET_KEY_PART,
            CommandCode::GetTemps => CMD_GET_TEMPS,
            CommandCode::SetDateTime => CMD_SET_DATE_TIME,
            CommandCode::SetTargetTemp => CMD_SET_TARGET_TEMP,
            CommandCode::GetWeekdayTempSchedule => CMD_GET_WEEKDAY_TEMP_SCHEDULE,
            CommandCode::GetWeekendTempSchedule => CMD_GET_WEEKEND_TEMP_SCHEDULE,
            CommandCode::SetWeekdayTempSchedule => CMD_SET_WEEKDAY_TEMP_SCHEDULE,
            CommandCode::SetWeekendTempSchedule => CMD_SET_WEEKEND_TEMP_SCHEDULE,
        }
    }
}

impl TryFrom<u8> for CommandCode {
    type Error = u8;

    fn try_from(id: u8) -> Result<Self, Self::Error> {
        match id {
            CMD_GET_KEY_PART => Ok(CommandCode::GetKeyPart),
            CMD_GET_TEMPS => Ok(CommandCode::GetTemps),
            CMD_SET_DATE_TIME => Ok(CommandCode::SetDateTime),
            CMD_SET_TARGET_TEMP => Ok(CommandCode::SetTargetTemp),
            CMD_GET_WEEKDAY_TEMP_SCHEDULE => Ok(CommandCode::GetWeekdayTempSchedule),
            CMD_GET_WEEKEND_TEMP_SCHEDULE => Ok(CommandCode::GetWeekendTempSchedule),
            CMD_SET_WEEKDAY_TEMP_SCHEDULE => Ok(CommandCode::SetWeekdayTempSchedule),
            CMD_SET_WEEKEND_TEMP_SCHEDULE => Ok(CommandCode::SetWeekendTempSchedule),
            other => Err(other),
        }
    }
}

impl std::fmt::Display for CommandCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            CommandCode::GetKeyPart => "GetKeyPart",
            CommandCode::GetTemps => "GetTemps",
            CommandCode::SetDateTime => "SetDateTime",
            CommandCode::SetTargetTemp => "SetTargetTemp",
            CommandCode::GetWeekdayTempSchedule => "GetWeekdayTempSchedule",
            CommandCode::GetWeekendTempSchedule => "GetWeekendTempSchedule",
            CommandCode::SetWeekdayTempSchedule => "SetWeekdayTempSchedule",
            CommandCode::SetWeekendTempSchedule => "SetWeekendTempSchedule",
        };
        write!(f, "{}({})", name, self.id())
    }
}

/// Status byte of a response frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Ok,
    ErrorSig,
    ErrorInvalidCommand,
    ErrorInvalidLength,
}

impl Status {
    /// Map a non-OK status to the error the device is reporting.
    pub fn device_error(self) -> Option<DeviceError> {
        match self {
            Status::Ok => None,
            Status::ErrorSig => Some(DeviceError::BadSignature),
            Status::ErrorInvalidCommand => Some(DeviceError::InvalidCommand),
            Status::ErrorInvalidLength => Some(DeviceError::InvalidLength),
        }
    }

    /// Turn the status into a `Result`.
    pub fn check(self) -> Result<(), DeviceError> {
        match self.device_error() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

impl TryFrom<u8> for Status {
    type Error = ProtocolError;

    fn try_from(byte: u8) -> Result<Self, Self::Error> {
        match byte {
            RESP_OK => Ok(Status::Ok),
            RESP_ERROR_SIG => Ok(Status::ErrorSig),
            RESP_ERROR_INVALID_COMMAND => Ok(Status::ErrorInvalidCommand),
            RESP_ERROR_INVALID_LENGTH => Ok(Status::ErrorInvalidLength),
            other => Err(ProtocolError::UnknownStatus(other)),
        }
    }
}

impl From<Status> for u8 {
    fn from(status: Status) -> Self {
        match status {
            Status::Ok => RESP_OK,
            Status::ErrorSig => RESP_ERROR_SIG,
            Status::ErrorInvalidCommand => RESP_ERROR_INVALID_COMMAND,
            Status::ErrorInvalidLength => RESP_ERROR_INVALID_LENGTH,
        }
    }
}

impl From<DeviceError> for Status {
    fn from(err: DeviceError) -> Self {
        match err {
            DeviceError::BadSignature => Status::ErrorSig,
            DeviceError::InvalidCommand => Status::ErrorInvalidCommand,
            DeviceError::InvalidLength => Status::ErrorInvalidLength,
        }
    }
}

/// An 8-byte key fragment handed out by the device.
///
/// Opaque to this crate; whoever authenticates with the device interprets it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct KeyFragment(pub [u8; KEY_FRAGMENT_LEN]);

impl KeyFragment {
    /// Create from a slice. Returns None if slice is wrong length.
    pub fn from_slice(slice: &[u8]) -> Option<Self> {
        let bytes: [u8; KEY_FRAGMENT_LEN] = slice.try_into().ok()?;
        Some(KeyFragment(bytes))
    }

    /// Get the underlying bytes.
    pub fn as_bytes(&self) -> &[u8; KEY_FRAGMENT_LEN] {
        &self.0
    }

    /// Get the bytes as a hex string.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl AsRef<[u8]> for KeyFragment {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

/// Temperatures reported by GetTemps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Temps {
    /// Current sensor reading (°F). Not range checked.
    pub current_f: u8,
    /// Current target temperature (°F).
    pub target_f: u8,
}

impl Temps {
    /// Decode from a GetTemps payload.
    pub fn decode(payload: &[u8]) -> Result<Self, CodecError> {
        if payload.len() != TEMPS_LEN {
            return Err(CodecError::WrongLength {
                expected: TEMPS_LEN,
                actual: payload.len(),
            });
        }
        Ok(Temps {
            current_f: payload[0],
            target_f: check_temperature("target temperature", payload[1])?,
        })
    }

    /// Encode to a GetTemps payload.
    pub fn encode(&self) -> [u8; TEMPS_LEN] {
        [self.current_f, self.target_f]
    }
}

/// Whether `degrees_f` is a temperature the device accepts as a target.
pub fn is_valid_temperature(degrees_f: u8) -> bool {
    (MIN_TARGET_TEMP_F..=MAX_TARGET_TEMP_F).contains(&degrees_f)
}

pub(crate) fn check_temperature(field: &'static str, degrees_f: u8) -> Result<u8, CodecError> {
    if is_valid_temperature(degrees_f) {
        Ok(degrees_f)
    } else {
        Err(CodecError::OutOfRange {
            field,
            value: degrees_f as u32,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_ids_round_trip() {
        for (i, code) in CommandCode::ALL.iter().enumerate() {
            assert_eq!(code.id(), i as u8 + 1);
            assert_eq!(CommandCode::try_from(code.id()), Ok(*code));
        }
        assert_eq!(CommandCode::try_from(0), Err(0));
        assert_eq!(CommandCode::try_from(9), Err(9));
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(Status::try_from(0x00), Ok(Status::Ok));
        assert_eq!(Status::try_from(0x01), Ok(Status::ErrorSig));
        assert_eq!(Status::try_from(0x02), Ok(Status::ErrorInvalidCommand));
        assert_eq!(Status::try_from(0x03), Ok(Status::ErrorInvalidLength));
        for byte in 0x04u8..=0xFF {
            assert_eq!(Status::try_from(byte), Err(ProtocolError::UnknownStatus(byte)));
        }
    }

    #[test]
    fn test_status_device_error() {
        assert_eq!(Status::Ok.check(), Ok(()));
        assert_eq!(
            Status::ErrorInvalidCommand.check(),
            Err(DeviceError::InvalidCommand)
        );
        assert_eq!(Status::ErrorSig.device_error(), Some(DeviceError::BadSignature));
        assert_eq!(
            Status::ErrorInvalidLength.device_error(),
            Some(DeviceError::InvalidLength)
        );
    }

    #[test]
    fn test_response_lengths() {
        assert_eq!(CommandCode::GetKeyPart.response_len(), 8);
        assert_eq!(CommandCode::GetWeekendTempSchedule.response_len(), SCHEDULE_LEN);
        assert_eq!(CommandCode::SetTargetTemp.response_len(), 0);
        assert_eq!(CommandCode::SetWeekdayTempSchedule.response_len(), 0);
    }

    #[test]
    fn test_temps_decode() {
        let temps = Temps::decode(&[70, 72]).expect("valid temps");
        assert_eq!(temps.current_f, 70);
        assert_eq!(temps.target_f, 72);

        // Sensor readings outside the target range are still reported.
        assert!(Temps::decode(&[20, 72]).is_ok());
        assert!(matches!(
            Temps::decode(&[70, 120]),
            Err(CodecError::OutOfRange { value: 120, .. })
        ));
        assert!(matches!(
            Temps::decode(&[70]),
            Err(CodecError::WrongLength { expected: 2, actual: 1 })
        ));
    }

    #[test]
    fn test_key_fragment_from_slice() {
        let key = KeyFragment::from_slice(&[1, 2, 3, 4, 5, 6, 7, 8]).expect("8 bytes");
        assert_eq!(key.to_hex(), "0102030405060708");
        assert!(KeyFragment::from_slice(&[1, 2, 3]).is_none());
    }
}
