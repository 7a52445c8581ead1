//! Commands that can be sent to the thermostat.

use chrono::NaiveDateTime;

use crate::constants::*;
use crate::error::*;
use crate::frame::encode_request;
use crate::schedule::*;
use crate::types::*;

/// Commands that can be sent to the thermostat.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Read the device's key fragment.
    GetKeyPart,

    /// Read the current and target temperatures.
    GetTemps,

    /// Set the device clock.
    SetDateTime {
        /// Local wall-clock time, as seconds since 1970-01-01 00:00.
        time_secs: u32,
    },

    /// Set the target temperature.
    SetTargetTemp {
        /// Target temperature in °F.
        degrees_f: u8,
    },

    /// Read one of the schedules.
    GetSchedule(ScheduleKind),

    /// Replace one of the schedules.
    SetSchedule {
        /// Which schedule to replace.
        kind: ScheduleKind,
        /// New schedule.
        schedule: TemperatureSchedule,
    },
}

impl Command {
    /// Build a SetDateTime command from a local wall-clock time.
    pub fn set_date_time(local: NaiveDateTime) -> Result<Self, EncodingError> {
        let secs = local.and_utc().timestamp();
        let time_secs =
            u32::try_from(secs).map_err(|_| EncodingError::TimestampOutOfRange(secs))?;
        Ok(Command::SetDateTime { time_secs })
    }

    /// Build a SetTargetTemp command, checking the temperature range.
    pub fn set_target_temp(degrees_f: u8) -> Result<Self, EncodingError> {
        if !is_valid_temperature(degrees_f) {
            return Err(EncodingError::TemperatureOutOfRange(degrees_f));
        }
        Ok(Command::SetTargetTemp { degrees_f })
    }

    /// Get the command code for this command.
    pub fn code(&self) -> CommandCode {
        match self {
            Command::GetKeyPart => CommandCode::GetKeyPart,
            Command::GetTemps => CommandCode::GetTemps,
            Command::SetDateTime { .. } => CommandCode::SetDateTime,
            Command::SetTargetTemp { .. } => CommandCode::SetTargetTemp,
            Command::GetSchedule(ScheduleKind::Weekday) => CommandCode::GetWeekdayTempSchedule,
            Command::GetSchedule(ScheduleKind::Weekend) => CommandCode::GetWeekendTempSchedule,
            Command::SetSchedule {
                kind: ScheduleKind::Weekday,
                ..
            } => CommandCode::SetWeekdayTempSchedule,
            Command::SetSchedule {
                kind: ScheduleKind::Weekend,
                ..
            } => CommandCode::SetWeekendTempSchedule,
        }
    }

    /// Encode the request payload (without header).
    pub fn payload(&self) -> Vec<u8> {
        match self {
            Command::GetKeyPart | Command::GetTemps | Command::GetSchedule(_) => Vec::new(),

            Command::SetDateTime { time_secs } => time_secs.to_be_bytes().to_vec(),

            Command::SetTargetTemp { degrees_f } => vec![*degrees_f],

            Command::SetSchedule { schedule, .. } => schedule.encode(),
        }
    }

    /// Encode the complete request frame.
    pub fn encode(&self) -> Result<Vec<u8>, EncodingError> {
        if let Command::SetTargetTemp { degrees_f } = self {
            if !is_valid_temperature(*degrees_f) {
                return Err(EncodingError::TemperatureOutOfRange(*degrees_f));
            }
        }
        encode_request(self.code(), &self.payload())
    }

    /// Parse a request frame back into a command.
    ///
    /// Device side of [`encode`](Command::encode).
    pub fn decode(frame: &[u8]) -> Result<Self, DecodeError> {
        let (id, payload) = crate::frame::decode_request(frame)?;
        let code = CommandCode::try_from(id).map_err(|_| DeviceError::InvalidCommand)?;
        let expected = match code {
            CommandCode::SetDateTime => DATE_TIME_LEN,
            CommandCode::SetTargetTemp => TARGET_TEMP_LEN,
            CommandCode::SetWeekdayTempSchedule | CommandCode::SetWeekendTempSchedule => {
                SCHEDULE_LEN
            }
            _ => 0,
        };
        if payload.len() != expected {
            return Err(DeviceError::InvalidLength.into());
        }

        let command = match code {
            CommandCode::GetKeyPart => Command::GetKeyPart,
            CommandCode::GetTemps => Command::GetTemps,
            CommandCode::SetDateTime => Command::SetDateTime {
                time_secs: u32::from_be_bytes([payload[0], payload[1], payload[2], payload[3]]),
            },
            CommandCode::SetTargetTemp => Command::SetTargetTemp {
                degrees_f: payload[0],
            },
            CommandCode::GetWeekdayTempSchedule => Command::GetSchedule(ScheduleKind::Weekday),
            CommandCode::GetWeekendTempSchedule => Command::GetSchedule(ScheduleKind::Weekend),
            CommandCode::SetWeekdayTempSchedule => Command::SetSchedule {
                kind: ScheduleKind::Weekday,
                schedule: TemperatureSchedule::decode(payload)?,
            },
            CommandCode::SetWeekendTempSchedule => Command::SetSchedule {
                kind: ScheduleKind::Weekend,
                schedule: TemperatureSchedule::decode(payload)?,
            },
        };
        Ok(command)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn schedule() -> TemperatureSchedule {
        TemperatureSchedule::new([
            ScheduleEntry::new(21600, 68).unwrap(),
            ScheduleEntry::new(43200, 72).unwrap(),
            ScheduleEntry::new(75600, 65).unwrap(),
        ])
    }

    #[test]
    fn test_codes() {
        assert_eq!(Command::GetKeyPart.code().id(), 1);
        assert_eq!(Command::GetTemps.code().id(), 2);
        assert_eq!(Command::SetDateTime { time_secs: 0 }.code().id(), 3);
        assert_eq!(Command::SetTargetTemp { degrees_f: 70 }.code().id(), 4);
        assert_eq!(Command::GetSchedule(ScheduleKind::Weekday).code().id(), 5);
        assert_eq!(Command::GetSchedule(ScheduleKind::Weekend).code().id(), 6);
        let set_weekday = Command::SetSchedule {
            kind: ScheduleKind::Weekday,
            schedule: schedule(),
        };
        assert_eq!(set_weekday.code().id(), 7);
        let set_weekend = Command::SetSchedule {
            kind: ScheduleKind::Weekend,
            schedule: schedule(),
        };
        assert_eq!(set_weekend.code().id(), 8);
    }

    #[test]
    fn test_encode_set_target_temp() {
        let frame = Command::set_target_temp(72).unwrap().encode().unwrap();
        assert_eq!(frame, vec![4, 0, 0, 1, 72]);
    }

    #[test]
    fn test_set_target_temp_range() {
        assert_eq!(
            Command::set_target_temp(31),
            Err(EncodingError::TemperatureOutOfRange(31))
        );
        assert_eq!(
            Command::SetTargetTemp { degrees_f: 100 }.encode(),
            Err(EncodingError::TemperatureOutOfRange(100))
        );
        assert!(Command::set_target_temp(32).is_ok());
        assert!(Command::set_target_temp(99).is_ok());
    }

    #[test]
    fn test_encode_get_schedule_has_empty_payload() {
        let frame = Command::GetSchedule(ScheduleKind::Weekday).encode().unwrap();
        assert_eq!(frame, vec![5, 0, 0, 0]);
    }

    #[test]
    fn test_encode_set_schedule() {
        let frame = Command::SetSchedule {
            kind: ScheduleKind::Weekend,
            schedule: schedule(),
        }
        .encode()
        .unwrap();
        assert_eq!(&frame[..HEADER_LEN], &[8, 0, 0, SCHEDULE_LEN as u8]);
        assert_eq!(&frame[HEADER_LEN..], &schedule().encode()[..]);
    }

    #[test]
    fn test_set_date_time() {
        let local = NaiveDate::from_ymd_opt(2016, 2, 17)
            .unwrap()
            .and_hms_opt(6, 30, 0)
            .unwrap();
        let cmd = Command::set_date_time(local).unwrap();
        assert_eq!(cmd, Command::SetDateTime { time_secs: 1_455_690_600 });
        assert_eq!(cmd.payload(), 1_455_690_600u32.to_be_bytes().to_vec());

        let before_epoch = NaiveDate::from_ymd_opt(1969, 12, 31)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        assert!(matches!(
            Command::set_date_time(before_epoch),
            Err(EncodingError::TimestampOutOfRange(_))
        ));
    }

    #[test]
    fn test_decode_request_frames() {
        let commands = [
            Command::GetKeyPart,
            Command::SetDateTime { time_secs: 42 },
            Command::SetTargetTemp { degrees_f: 70 },
            Command::GetSchedule(ScheduleKind::Weekend),
            Command::SetSchedule {
                kind: ScheduleKind::Weekday,
                schedule: schedule(),
            },
        ];
        for cmd in commands {
            assert_eq!(Command::decode(&cmd.encode().unwrap()), Ok(cmd));
        }
    }

    #[test]
    fn test_decode_request_rejects_unknown_and_bad_length() {
        assert_eq!(
            Command::decode(&[9, 0, 0, 0]),
            Err(DecodeError::Device(DeviceError::InvalidCommand))
        );
        assert_eq!(
            Command::decode(&[4, 0, 0, 2, 70, 70]),
            Err(DecodeError::Device(DeviceError::InvalidLength))
        );
    }
}
