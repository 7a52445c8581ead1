//! Temperature schedules and their wire encoding.
//!
//! A schedule is three transition points within a day. Each entry is encoded
//! as a big-endian u32 offset (seconds since local midnight) followed by a
//! single temperature byte (°F):
//!
//! ```text
//! +----------------------+--------+  x3
//! | offset_secs (u32 BE) | temp_f |
//! +----------------------+--------+
//! ```

use std::fmt;

use bytes::{Buf, BufMut};

use crate::constants::*;
use crate::error::*;
use crate::types::check_temperature;

/// Which schedule a command addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScheduleKind {
    Weekday,
    Weekend,
}

impl fmt::Display for ScheduleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScheduleKind::Weekday => write!(f, "weekday"),
            ScheduleKind::Weekend => write!(f, "weekend"),
        }
    }
}

impl std::str::FromStr for ScheduleKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "weekday" => Ok(ScheduleKind::Weekday),
            "weekend" => Ok(ScheduleKind::Weekend),
            other => Err(format!("unknown schedule kind '{}'", other)),
        }
    }
}

/// One transition point of a schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScheduleEntry {
    offset_secs: u32,
    temperature_f: u8,
}

impl ScheduleEntry {
    /// Create an entry, checking both fields against the device limits.
    pub fn new(offset_secs: u32, temperature_f: u8) -> Result<Self, CodecError> {
        if offset_secs >= SECONDS_PER_DAY {
            return Err(CodecError::OutOfRange {
                field: "time offset",
                value: offset_secs,
            });
        }
        let temperature_f = check_temperature("temperature", temperature_f)?;
        Ok(ScheduleEntry {
            offset_secs,
            temperature_f,
        })
    }

    /// Create an entry from an hour and minute of the day.
    pub fn from_hm(hour: u32, minute: u32, temperature_f: u8) -> Result<Self, CodecError> {
        if hour >= HOURS_PER_DAY {
            return Err(CodecError::OutOfRange {
                field: "hour",
                value: hour,
            });
        }
        if minute >= MINUTES_PER_HOUR {
            return Err(CodecError::OutOfRange {
                field: "minute",
                value: minute,
            });
        }
        Self::new(
            hour * SECONDS_PER_HOUR + minute * SECONDS_PER_MINUTE,
            temperature_f,
        )
    }

    /// Seconds since local midnight.
    pub fn offset_secs(&self) -> u32 {
        self.offset_secs
    }

    /// Target temperature in °F.
    pub fn temperature_f(&self) -> u8 {
        self.temperature_f
    }

    pub fn hour(&self) -> u32 {
        self.offset_secs / SECONDS_PER_HOUR
    }

    pub fn minute(&self) -> u32 {
        (self.offset_secs % SECONDS_PER_HOUR) / SECONDS_PER_MINUTE
    }

    fn encode_into(&self, buf: &mut impl BufMut) {
        buf.put_u32(self.offset_secs);
        buf.put_u8(self.temperature_f);
    }

    fn decode_from(buf: &mut impl Buf) -> Result<Self, CodecError> {
        let offset_secs = buf.get_u32();
        let temperature_f = buf.get_u8();
        Self::new(offset_secs, temperature_f)
    }
}

impl fmt::Display for ScheduleEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:02}:{:02} {}°F",
            self.hour(),
            self.minute(),
            self.temperature_f
        )
    }
}

/// A day's worth of temperature transitions.
///
/// Entry order is whatever the device or caller supplied; use [`sorted`]
/// before sending a hand-built schedule.
///
/// [`sorted`]: TemperatureSchedule::sorted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TemperatureSchedule {
    entries: [ScheduleEntry; SCHEDULE_OPTION_COUNT],
}

impl TemperatureSchedule {
    pub fn new(entries: [ScheduleEntry; SCHEDULE_OPTION_COUNT]) -> Self {
        TemperatureSchedule { entries }
    }

    pub fn entries(&self) -> &[ScheduleEntry; SCHEDULE_OPTION_COUNT] {
        &self.entries
    }

    /// Copy of this schedule ordered by ascending time of day.
    pub fn sorted(&self) -> Self {
        let mut entries = self.entries;
        entries.sort_by_key(|e| e.offset_secs);
        TemperatureSchedule { entries }
    }

    /// Whether the entries are in ascending time-of-day order.
    pub fn is_sorted(&self) -> bool {
        self.entries
            .windows(2)
            .all(|w| w[0].offset_secs <= w[1].offset_secs)
    }

    /// Target temperature in effect at `offset_secs` past midnight.
    ///
    /// Before the first transition of the day the last transition of the
    /// previous day still applies.
    pub fn temperature_at(&self, offset_secs: u32) -> u8 {
        let offset_secs = offset_secs % SECONDS_PER_DAY;
        let sorted = self.sorted();
        sorted
            .entries
            .iter()
            .rev()
            .find(|e| e.offset_secs <= offset_secs)
            .unwrap_or(&sorted.entries[SCHEDULE_OPTION_COUNT - 1])
            .temperature_f
    }

    /// Encode to the fixed-size wire form.
    pub fn encode(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(SCHEDULE_LEN);
        for entry in &self.entries {
            entry.encode_into(&mut buf);
        }
        buf
    }

    /// Decode from the fixed-size wire form, keeping on-wire order.
    pub fn decode(payload: &[u8]) -> Result<Self, CodecError> {
        if payload.len() != SCHEDULE_LEN {
            return Err(CodecError::WrongLength {
                expected: SCHEDULE_LEN,
                actual: payload.len(),
            });
        }
        let mut buf = payload;
        Ok(TemperatureSchedule {
            entries: [
                ScheduleEntry::decode_from(&mut buf)?,
                ScheduleEntry::decode_from(&mut buf)?,
                ScheduleEntry::decode_from(&mut buf)?,
            ],
        })
    }
}

impl fmt::Display for TemperatureSchedule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, entry) in self.entries.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", entry)?;
        }
        Ok(())
    }
}

/// Both schedules of a device, edited together.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeekSchedules {
    pub weekday: TemperatureSchedule,
    pub weekend: TemperatureSchedule,
}

impl WeekSchedules {
    pub fn get(&self, kind: ScheduleKind) -> &TemperatureSchedule {
        match kind {
            ScheduleKind::Weekday => &self.weekday,
            ScheduleKind::Weekend => &self.weekend,
        }
    }
}
