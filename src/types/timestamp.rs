//! Log line timestamps

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Textual layout written by the drone-control file logger.
pub const LOG_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f";

/// Point in time parsed from the start of a log line.
///
/// The logger writes local wall-clock time without a zone. Epoch conversion
/// treats the value as UTC, which keeps ordering and spacing intact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LogTimestamp(NaiveDateTime);

impl LogTimestamp {
    pub const fn new(value: NaiveDateTime) -> Self {
        Self(value)
    }

    pub const fn as_naive(&self) -> NaiveDateTime {
        self.0
    }

    /// Milliseconds since the Unix epoch, used as the x-axis of charts.
    pub fn epoch_millis(&self) -> i64 {
        self.0.and_utc().timestamp_millis()
    }
}

impl From<NaiveDateTime> for LogTimestamp {
    fn from(value: NaiveDateTime) -> Self {
        Self(value)
    }
}

impl fmt::Display for LogTimestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(LOG_TIMESTAMP_FORMAT))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_epoch_millis_keeps_sub_second_precision() {
        let naive =
            NaiveDateTime::parse_from_str("1970-01-01 00:00:01.250", LOG_TIMESTAMP_FORMAT).unwrap();
        assert_eq!(LogTimestamp::new(naive).epoch_millis(), 1250);
    }

    #[test]
    fn test_display_round_trips_log_format() {
        let text = "2025-09-18 15:07:10.978";
        let naive = NaiveDateTime::parse_from_str(text, LOG_TIMESTAMP_FORMAT).unwrap();
        assert_eq!(LogTimestamp::from(naive).to_string(), text);
    }
}
