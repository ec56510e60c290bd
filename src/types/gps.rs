//! GPS tracking types

use serde::{Deserialize, Serialize};

/// Latitude/longitude pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPoint {
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

/// One row of a GPS tracking CSV export.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GpsFix {
    /// UPDATETIMESTAMP (epoch milliseconds)
    pub timestamp_ms: f64,
    /// DRONELATITUDE / DRONELONGITUDE
    pub drone: GeoPoint,
    /// BENCHMARKLATITUDE / BENCHMARKLONGITUDE
    pub benchmark: GeoPoint,
}
