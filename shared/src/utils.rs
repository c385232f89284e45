//! # Shared Utility Functions
//!
//! Timestamp conversion between the agent wire format (epoch milliseconds)
//! and the chat log format (ISO-8601), and human-readable durations.
//!
//! ## Usage
//!
//! ```rust
//! use shared::utils::{epoch_millis_to_iso, format_duration};
//!
//! assert_eq!(epoch_millis_to_iso(0), "1970-01-01T00:00:00.000Z");
//! assert_eq!(format_duration(75), "1h 15m");
//! ```

use chrono::{DateTime, SecondsFormat, Utc};

/// Render epoch milliseconds as an ISO-8601 UTC string with millisecond
/// precision (`2023-11-14T22:13:20.000Z`).
///
/// Out-of-range values clamp to the Unix epoch.
pub fn epoch_millis_to_iso(millis: i64) -> String {
    DateTime::<Utc>::from_timestamp_millis(millis)
        .unwrap_or_default()
        .to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Current time in epoch milliseconds
pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// Current time as an ISO-8601 string in the chat log format
pub fn now_iso() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Format a duration given in minutes: `"1h 15m"` or `"30m"`.
pub fn format_duration(minutes: u32) -> String {
    let hours = minutes / 60;
    let mins = minutes % 60;
    if hours > 0 {
        format!("{}h {}m", hours, mins)
    } else {
        format!("{}m", mins)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_epoch_millis_to_iso() {
        assert_eq!(epoch_millis_to_iso(1_700_000_000_000), "2023-11-14T22:13:20.000Z");
        assert_eq!(epoch_millis_to_iso(1_700_000_000_123), "2023-11-14T22:13:20.123Z");
    }

    #[test]
    fn test_now_iso_round_trips_through_chrono() {
        let parsed = DateTime::parse_from_rfc3339(&now_iso());
        assert!(parsed.is_ok());
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(30), "30m");
        assert_eq!(format_duration(60), "1h 0m");
        assert_eq!(format_duration(75), "1h 15m");
        assert_eq!(format_duration(0), "0m");
    }
}
