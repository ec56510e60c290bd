//! GPS tracking CSV reader

use std::fs::File;
use std::io::Read;
use std::path::Path;

use tracing::debug;

use super::GpsError;
use crate::types::{GeoPoint, GpsFix};

pub const COL_TIMESTAMP: &str = "UPDATETIMESTAMP";
pub const COL_DRONE_LAT: &str = "DRONELATITUDE";
pub const COL_DRONE_LON: &str = "DRONELONGITUDE";
pub const COL_BENCHMARK_LAT: &str = "BENCHMARKLATITUDE";
pub const COL_BENCHMARK_LON: &str = "BENCHMARKLONGITUDE";

/// Column positions resolved from the header row.
struct ColumnMap {
    timestamp: usize,
    drone_lat: usize,
    drone_lon: usize,
    benchmark_lat: usize,
    benchmark_lon: usize,
}

impl ColumnMap {
    fn from_headers(headers: &csv::StringRecord) -> Result<Self, GpsError> {
        let find = |name: &'static str| {
            headers
                .iter()
                .position(|h| h.trim() == name)
                .ok_or(GpsError::MissingColumn(name))
        };
        Ok(Self {
            timestamp: find(COL_TIMESTAMP)?,
            drone_lat: find(COL_DRONE_LAT)?,
            drone_lon: find(COL_DRONE_LON)?,
            benchmark_lat: find(COL_BENCHMARK_LAT)?,
            benchmark_lon: find(COL_BENCHMARK_LON)?,
        })
    }
}

fn parse_field(
    record: &csv::StringRecord,
    row: usize,
    index: usize,
    column: &'static str,
) -> Result<f64, GpsError> {
    let raw = record.get(index).unwrap_or("").trim();
    raw.parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| GpsError::InvalidNumber {
            row,
            column,
            value: raw.to_string(),
        })
}

/// Read every fix from a GPS tracking CSV file.
pub fn read_gps_csv(path: &Path) -> Result<Vec<GpsFix>, GpsError> {
    let file = File::open(path).map_err(|source| GpsError::FileAccess {
        path: path.to_path_buf(),
        source,
    })?;
    let fixes = read_gps_fixes(file)?;
    debug!(path = %path.display(), rows = fixes.len(), "GPS CSV loaded");
    Ok(fixes)
}

/// Read fixes from any CSV byte stream. Rows are numbered from 1 (first data row).
pub fn read_gps_fixes<R: Read>(reader: R) -> Result<Vec<GpsFix>, GpsError> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);
    let columns = ColumnMap::from_headers(rdr.headers()?)?;

    let mut fixes = Vec::new();
    for (i, record) in rdr.records().enumerate() {
        let record = record?;
        let row = i + 1;
        fixes.push(GpsFix {
            timestamp_ms: parse_field(&record, row, columns.timestamp, COL_TIMESTAMP)?,
            drone: GeoPoint::new(
                parse_field(&record, row, columns.drone_lat, COL_DRONE_LAT)?,
                parse_field(&record, row, columns.drone_lon, COL_DRONE_LON)?,
            ),
            benchmark: GeoPoint::new(
                parse_field(&record, row, columns.benchmark_lat, COL_BENCHMARK_LAT)?,
                parse_field(&record, row, columns.benchmark_lon, COL_BENCHMARK_LON)?,
            ),
        });
    }
    Ok(fixes)
}
