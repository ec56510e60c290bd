//! Shared data structures for drone-control telemetry analysis
//!
//! This module defines the core types flowing through the analyzer:
//! - LogTimestamp: leading timestamp of a log line
//! - AttitudeEvent / EventKind: typed, normalized attitude observations
//! - PositionDeltaEvent: headset-driven position changes (position variant)
//! - GpsFix / GeoPoint: rows of a GPS tracking CSV

mod timestamp;
mod attitude;
mod position;
mod gps;

pub use timestamp::*;
pub use attitude::*;
pub use position::*;
pub use gps::*;
