//! GPS track reconstruction
//!
//! Converts a recorded GPS tracking session into a planar track around the
//! benchmark position of the first fix. Each retained fix is projected with
//! its geodesic distance and initial bearing from that origin.

pub mod geodesy;
pub mod reader;

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use crate::types::{GeoPoint, GpsFix};

pub use geodesy::{geodesic_distance_m, initial_bearing_degrees, polar_to_cartesian};
pub use reader::{read_gps_csv, read_gps_fixes};

#[derive(Debug, Error)]
pub enum GpsError {
    #[error("Cannot open GPS file {path}: {source}")]
    FileAccess {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Missing required column '{0}'")]
    MissingColumn(&'static str),

    #[error("Row {row}: column '{column}' is not a number: '{value}'")]
    InvalidNumber {
        row: usize,
        column: &'static str,
        value: String,
    },

    #[error("GPS file contains no data rows")]
    Empty,
}

/// One fix projected around the track origin.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrackPoint {
    pub position: GeoPoint,
    pub distance_m: f64,
    pub bearing_deg: f64,
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GpsTrack {
    /// Total rows in the session, not only the projected ones
    pub fix_count: usize,
    pub start_ms: f64,
    pub end_ms: f64,
    pub tracking_time_secs: f64,
    pub sampling_hz: f64,
    pub origin: GeoPoint,
    pub points: Vec<TrackPoint>,
}

impl GpsTrack {
    /// Largest distance from the origin, used to size the radial map.
    pub fn max_distance_m(&self) -> f64 {
        self.points.iter().map(|p| p.distance_m).fold(0.0, f64::max)
    }
}

fn millis_to_utc(ms: f64) -> Option<DateTime<Utc>> {
    #[allow(clippy::cast_possible_truncation)]
    DateTime::from_timestamp_millis(ms as i64)
}

/// Build the planar track from the first `max_points` fixes.
///
/// The first fix only supplies the origin and is not projected.
pub fn reconstruct_track(fixes: &[GpsFix], max_points: usize) -> Result<GpsTrack, GpsError> {
    let first = fixes.first().ok_or(GpsError::Empty)?;
    let last = fixes.last().ok_or(GpsError::Empty)?;

    let tracking_time_secs = (last.timestamp_ms - first.timestamp_ms) / 1000.0;
    #[allow(clippy::cast_precision_loss)]
    let sampling_hz = if tracking_time_secs > 0.0 {
        fixes.len() as f64 / tracking_time_secs
    } else {
        0.0
    };
    let origin = first.benchmark;

    let points: Vec<TrackPoint> = fixes
        .iter()
        .take(max_points)
        .skip(1)
        .map(|fix| {
            let distance_m = geodesic_distance_m(origin, fix.drone);
            let bearing_deg = initial_bearing_degrees(origin, fix.drone);
            let (x, y) = polar_to_cartesian(distance_m, bearing_deg);
            TrackPoint {
                position: fix.drone,
                distance_m,
                bearing_deg,
                x,
                y,
            }
        })
        .collect();

    let start = millis_to_utc(first.timestamp_ms);
    let end = millis_to_utc(last.timestamp_ms);
    info!(
        fixes = fixes.len(),
        projected = points.len(),
        start = ?start,
        end = ?end,
        tracking_time_secs = %format!("{tracking_time_secs:.2}"),
        sampling_hz = %format!("{sampling_hz:.2}"),
        "GPS track reconstructed"
    );

    Ok(GpsTrack {
        fix_count: fixes.len(),
        start_ms: first.timestamp_ms,
        end_ms: last.timestamp_ms,
        tracking_time_secs,
        sampling_hz,
        origin,
        points,
    })
}
