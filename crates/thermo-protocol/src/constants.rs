//! Protocol constants
//!
//! These constants define the command codes, response status codes, and the
//! numeric limits used by the thermostat protocol.

// ============================================================================
// Framing
// ============================================================================

/// Length of a request header: command id (1 byte) + payload length (3 bytes).
pub const HEADER_LEN: usize = 4;

/// Width of the payload length field in the request header.
pub const LENGTH_FIELD_LEN: usize = HEADER_LEN - 1;

/// Largest payload the 24-bit length field can describe.
pub const MAX_PAYLOAD_LEN: usize = (1 << (8 * LENGTH_FIELD_LEN)) - 1;

/// First byte of every response frame.
pub const RESPONSE_SIGNATURE: u8 = 0xA0;

/// Signature byte + status byte.
pub const RESPONSE_HEADER_LEN: usize = 2;

// ============================================================================
// Command Codes (host → device)
// ============================================================================

/// Read the device's key fragment.
pub const CMD_GET_KEY_PART: u8 = 1;
/// Read the current and target temperatures.
pub const CMD_GET_TEMPS: u8 = 2;
/// Set the device clock.
pub const CMD_SET_DATE_TIME: u8 = 3;
/// Set the target temperature.
pub const CMD_SET_TARGET_TEMP: u8 = 4;
/// Read the weekday schedule.
pub const CMD_GET_WEEKDAY_TEMP_SCHEDULE: u8 = 5;
/// Read the weekend schedule.
pub const CMD_GET_WEEKEND_TEMP_SCHEDULE: u8 = 6;
/// Write the weekday schedule.
pub const CMD_SET_WEEKDAY_TEMP_SCHEDULE: u8 = 7;
/// Write the weekend schedule.
pub const CMD_SET_WEEKEND_TEMP_SCHEDULE: u8 = 8;

// ============================================================================
// Response Status Codes (device → host)
// ============================================================================

/// Command accepted.
pub const RESP_OK: u8 = 0x00;
/// Device rejected the request signature.
pub const RESP_ERROR_SIG: u8 = 0x01;
/// Device does not know the command id.
pub const RESP_ERROR_INVALID_COMMAND: u8 = 0x02;
/// Payload length did not match what the device expects for the command.
pub const RESP_ERROR_INVALID_LENGTH: u8 = 0x03;

// ============================================================================
// Temperatures
// ============================================================================

/// Lowest target temperature the device accepts (°F).
pub const MIN_TARGET_TEMP_F: u8 = 32;
/// Highest target temperature the device accepts (°F).
pub const MAX_TARGET_TEMP_F: u8 = 99;

// ============================================================================
// Time Units
// ============================================================================

pub const SECONDS_PER_MINUTE: u32 = 60;
pub const MINUTES_PER_HOUR: u32 = 60;
pub const SECONDS_PER_HOUR: u32 = SECONDS_PER_MINUTE * MINUTES_PER_HOUR;
pub const HOURS_PER_DAY: u32 = 24;
pub const SECONDS_PER_DAY: u32 = SECONDS_PER_HOUR * HOURS_PER_DAY;

// ============================================================================
// Payload Sizes
// ============================================================================

/// Length of the key fragment returned by GetKeyPart.
pub const KEY_FRAGMENT_LEN: usize = 8;

/// Length of the GetTemps payload (current + target).
pub const TEMPS_LEN: usize = 2;

/// Length of the SetDateTime payload (u32 seconds).
pub const DATE_TIME_LEN: usize = 4;

/// Length of the SetTargetTemp payload.
pub const TARGET_TEMP_LEN: usize = 1;

/// Number of transitions in a schedule.
pub const SCHEDULE_OPTION_COUNT: usize = 3;

/// Encoded size of one schedule entry: offset (u32) + temperature (u8).
pub const SCHEDULE_ENTRY_LEN: usize = 5;

/// Encoded size of a whole schedule.
pub const SCHEDULE_LEN: usize = SCHEDULE_OPTION_COUNT * SCHEDULE_ENTRY_LEN;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derived_time_units() {
        assert_eq!(SECONDS_PER_HOUR, 3600);
        assert_eq!(SECONDS_PER_DAY, 86400);
    }

    #[test]
    fn test_length_field_covers_max_payload() {
        assert_eq!(LENGTH_FIELD_LEN, 3);
        assert_eq!(MAX_PAYLOAD_LEN, 0x00FF_FFFF);
        assert_eq!(SCHEDULE_LEN, 15);
    }
}
