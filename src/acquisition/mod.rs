//! Log acquisition module
//!
//! Reads raw log lines from disk and recognizes their leading timestamps.

pub mod line_source;
pub mod timestamp;

pub use line_source::{LineSource, LogLine, LogLines, SourceError};
pub use timestamp::{TimestampError, TimestampExtractor};
