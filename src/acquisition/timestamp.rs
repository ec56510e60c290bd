//! Timestamp Extractor
//!
//! Recognizes the `YYYY-MM-DD HH:MM:SS.mmm` token pair at the very start of a
//! log line. Lines without it are never classified; lines where it is present
//! but invalid (e.g. month 13) are skipped the same way.

use chrono::NaiveDateTime;
use regex::Regex;
use thiserror::Error;

use crate::types::LogTimestamp;

/// Shape of a leading timestamp. Field validity is left to chrono.
const TIMESTAMP_PATTERN: &str = r"^(\d{4}-\d{2}-\d{2}) (\d{2}:\d{2}:\d{2}(?:\.\d+)?)";

/// Accepts any fractional precision, not just milliseconds.
const PARSE_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f";

/// Reasons a line carries no usable timestamp. Both are skip signals.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TimestampError {
    #[error("No leading timestamp")]
    NotFound,

    #[error("Malformed timestamp '{0}'")]
    Malformed(String),
}

/// Compiled timestamp recognizer.
#[derive(Debug, Clone)]
pub struct TimestampExtractor {
    pattern: Regex,
}

impl TimestampExtractor {
    pub fn new() -> Result<Self, regex::Error> {
        Ok(Self {
            pattern: Regex::new(TIMESTAMP_PATTERN)?,
        })
    }

    /// Parse the leading timestamp of `line`.
    pub fn extract(&self, line: &str) -> Result<LogTimestamp, TimestampError> {
        let caps = self
            .pattern
            .captures(line)
            .ok_or(TimestampError::NotFound)?;
        let token = format!("{} {}", &caps[1], &caps[2]);
        NaiveDateTime::parse_from_str(&token, PARSE_FORMAT)
            .map(LogTimestamp::new)
            .map_err(|_| TimestampError::Malformed(token))
    }
}
