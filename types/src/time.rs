//! Timestamp type for on-chain records.
//!
//! The verification contract stores `block.timestamp`, i.e. Unix epoch
//! seconds (UTC).

use chrono::{DateTime, Local, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A Unix timestamp in seconds since epoch (UTC).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Timestamp(u64);

impl Timestamp {
    /// The epoch (time zero).
    pub const EPOCH: Self = Self(0);

    pub fn new(secs: u64) -> Self {
        Self(secs)
    }

    pub fn as_secs(&self) -> u64 {
        self.0
    }

    /// This instant as a UTC date-time, or `None` if it is outside chrono's range.
    pub fn to_utc(&self) -> Option<DateTime<Utc>> {
        let secs = i64::try_from(self.0).ok()?;
        Utc.timestamp_opt(secs, 0).single()
    }

    /// This instant in the local time zone.
    pub fn to_local(&self) -> Option<DateTime<Local>> {
        self.to_utc().map(|utc| utc.with_timezone(&Local))
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}s", self.0)
    }
}

impl From<u64> for Timestamp {
    fn from(secs: u64) -> Self {
        Self(secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn converts_to_utc() {
        let ts = Timestamp::new(1_700_000_000);
        let utc = ts.to_utc().unwrap();
        assert_eq!(utc.to_rfc3339(), "2023-11-14T22:13:20+00:00");
    }

    #[test]
    fn out_of_range_is_none() {
        assert!(Timestamp::new(u64::MAX).to_utc().is_none());
    }
}
