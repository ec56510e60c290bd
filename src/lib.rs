//! skylog: drone-control telemetry log analyzer
//!
//! Turns the text logs of a head-tracked drone control session into aligned
//! attitude time series, and analyzes the companion data sets recorded
//! alongside them.
//!
//! ## Architecture
//!
//! - **Acquisition**: line-oriented log reading and timestamp recognition
//! - **Extraction**: ordered pattern rules and field normalization
//! - **Reconcile**: pending slots flushed on every commanded attitude
//! - **Pipeline**: one pass over a file, producing series plus diagnostics
//! - **GPS / Stats**: track reconstruction and questionnaire group tests
//! - **Plotting**: SVG charts for all of the above

pub mod acquisition;
pub mod config;
pub mod extraction;
pub mod gps;
pub mod pipeline;
pub mod plotting;
pub mod processing;
pub mod reconcile;
pub mod stats;
pub mod types;

// Re-export analysis configuration
pub use config::AnalysisConfig;

// Re-export commonly used types
pub use types::{
    AttitudeEvent, EventKind, GeoPoint, GpsFix, LogTimestamp, PlanarPoint, PositionDeltaEvent,
};

// Re-export the extraction pipeline
pub use pipeline::{
    extract_attitude_series, extract_position_deltas, AttitudeRun, ExtractionReport, LogScanner,
    PipelineError, PositionRun,
};
pub use reconcile::{Reconciler, SeriesCollection};

// Re-export derived analyses
pub use gps::{reconstruct_track, GpsError, GpsTrack};
pub use processing::{summarize, tracking_error, SeriesSummary};
pub use stats::{compare_all, DimensionReport, GroupDataset, StatsError, Thresholds};
