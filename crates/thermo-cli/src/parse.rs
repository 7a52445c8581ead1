//! Argument value parsers.

use chrono::{DateTime, NaiveDateTime};
use thermo_protocol::ScheduleEntry;

/// Parse a schedule entry written as `HH:MM=F`, e.g. `06:30=68`.
pub fn parse_entry(s: &str) -> Result<ScheduleEntry, String> {
    let (time, temp) = s
        .split_once('=')
        .ok_or_else(|| format!("expected HH:MM=F, got '{}'", s))?;
    let (hour, minute) = time
        .split_once(':')
        .ok_or_else(|| format!("expected HH:MM before '=', got '{}'", time))?;

    let hour: u32 = hour
        .trim()
        .parse()
        .map_err(|_| format!("invalid hour '{}'", hour))?;
    let minute: u32 = minute
        .trim()
        .parse()
        .map_err(|_| format!("invalid minute '{}'", minute))?;
    let temp: u8 = temp
        .trim()
        .parse()
        .map_err(|_| format!("invalid temperature '{}'", temp))?;

    ScheduleEntry::from_hm(hour, minute, temp).map_err(|e| e.to_string())
}

/// Parse a wall-clock time for the device.
///
/// RFC 3339 input keeps its local part and drops the offset; plain
/// `YYYY-MM-DD HH:MM[:SS]` is taken as-is.
pub fn parse_local_time(s: &str) -> Result<NaiveDateTime, String> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.naive_local());
    }
    for format in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, format) {
            return Ok(dt);
        }
    }
    Err(format!("unrecognized date/time '{}'", s))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_parse_entry() {
        let entry = parse_entry("06:30=68").unwrap();
        assert_eq!(entry.offset_secs(), 23400);
        assert_eq!(entry.temperature_f(), 68);

        assert_eq!(parse_entry("23:59=99").unwrap().offset_secs(), 86340);
    }

    #[test]
    fn test_parse_entry_rejects_bad_input() {
        assert!(parse_entry("06:30").is_err());
        assert!(parse_entry("0630=68").is_err());
        assert!(parse_entry("24:00=68").is_err());
        assert!(parse_entry("06:60=68").is_err());
        assert!(parse_entry("06:30=120").is_err());
        assert!(parse_entry("06:30=31").is_err());
        assert!(parse_entry("06:30=warm").is_err());
    }

    #[test]
    fn test_parse_local_time() {
        let expected = NaiveDate::from_ymd_opt(2016, 2, 17)
            .unwrap()
            .and_hms_opt(6, 30, 0)
            .unwrap();
        assert_eq!(parse_local_time("2016-02-17 06:30").unwrap(), expected);
        assert_eq!(parse_local_time("2016-02-17T06:30:00").unwrap(), expected);
        assert_eq!(parse_local_time("2016-02-17T06:30:00-08:00").unwrap(), expected);
        assert!(parse_local_time("yesterday").is_err());
    }
}
