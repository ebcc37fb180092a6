mod color;
mod note;

pub use color::Color;
pub use note::Note;

use chrono::{DateTime, Local, Utc};

/// Current time as milliseconds since the Unix epoch
pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// Convert a millisecond timestamp to DateTime<Utc>
pub fn millis_to_datetime(millis: i64) -> DateTime<Utc> {
    DateTime::from_timestamp_millis(millis).unwrap_or_default()
}

/// Format a millisecond timestamp the way note cards show it, e.g.
/// `Mar 04, 2025, 09:15 AM`, in the local time zone.
pub fn format_note_time(millis: i64) -> String {
    millis_to_datetime(millis)
        .with_timezone(&Local)
        .format("%b %d, %Y, %I:%M %p")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_millis_to_datetime() {
        let dt = millis_to_datetime(1_700_000_000_123);
        assert_eq!(dt.timestamp_millis(), 1_700_000_000_123);
    }

    #[test]
    fn test_out_of_range_millis_defaults_to_epoch() {
        assert_eq!(millis_to_datetime(i64::MAX).timestamp(), 0);
    }

    #[test]
    fn test_format_note_time_shape() {
        let formatted = format_note_time(1_700_000_000_000);
        assert!(formatted.ends_with("AM") || formatted.ends_with("PM"));
        assert!(formatted.contains("2023"));
    }
}
