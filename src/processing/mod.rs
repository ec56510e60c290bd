//! Series post-processing
//!
//! Descriptive summaries of reconciled attitude series.

pub mod summary;

pub use summary::{summarize, tracking_error, SeriesSummary};
