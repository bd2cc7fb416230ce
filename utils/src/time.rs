//! Time rendering helpers.

use chrono::{DateTime, Local, TimeZone};
use licverify_types::Timestamp;

/// Calendar layout used for every user-facing date-time.
const LOCAL_FORMAT: &str = "%-m/%-d/%Y, %-I:%M:%S %p";

/// Render a date-time in the local time zone.
pub fn format_local<Tz: TimeZone>(at: &DateTime<Tz>) -> String {
    at.with_timezone(&Local).format(LOCAL_FORMAT).to_string()
}

/// Render an epoch-seconds timestamp in the local time zone.
///
/// Timestamps chrono cannot represent fall back to raw seconds.
pub fn format_timestamp(ts: Timestamp) -> String {
    match ts.to_local() {
        Some(local) => format_local(&local),
        None => ts.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn timestamp_renders_local_calendar_time() {
        let expected = Local
            .timestamp_opt(1_700_000_000, 0)
            .unwrap()
            .format(LOCAL_FORMAT)
            .to_string();
        assert_eq!(format_timestamp(Timestamp::new(1_700_000_000)), expected);
    }

    #[test]
    fn utc_and_local_inputs_agree() {
        let utc = Utc.timestamp_opt(1_700_000_000, 0).unwrap();
        let local = utc.with_timezone(&Local);
        assert_eq!(format_local(&utc), format_local(&local));
    }

    #[test]
    fn unrepresentable_timestamp_falls_back() {
        assert_eq!(format_timestamp(Timestamp::new(u64::MAX)), format!("{}s", u64::MAX));
    }
}
