//! GPS track reconstruction from CSV exports

use std::path::PathBuf;

use skylog::gps::{read_gps_csv, GpsError};
use skylog::{reconstruct_track, GeoPoint};

const HEADER: &str = "ID,UPDATETIMESTAMP,DRONELATITUDE,DRONELONGITUDE,BENCHMARKLATITUDE,BENCHMARKLONGITUDE,ALTITUDE";

fn write_csv(rows: &[String]) -> (tempfile::TempDir, PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("37427597_2025_08_06_15_51_43.csv");
    let mut text = String::from(HEADER);
    text.push('\n');
    for row in rows {
        text.push_str(row);
        text.push('\n');
    }
    std::fs::write(&path, text).unwrap();
    (dir, path)
}

/// A drone walking north from the benchmark, one fix every 200 ms.
fn northbound_rows(count: usize) -> Vec<String> {
    (0..count)
        .map(|i| {
            let ms = 1_754_488_303_000_u64 + 200 * i as u64;
            let lat = 48.137_154 + 1e-5 * i as f64;
            format!("{i},{ms},{lat},11.576124,48.137154,11.576124,12.0")
        })
        .collect()
}

#[test]
fn track_timing_and_projection() {
    let (_dir, path) = write_csv(&northbound_rows(11));
    let fixes = read_gps_csv(&path).unwrap();
    assert_eq!(fixes.len(), 11);

    let track = reconstruct_track(&fixes, 600).unwrap();
    assert!((track.tracking_time_secs - 2.0).abs() < 1e-9);
    assert!((track.sampling_hz - 5.5).abs() < 1e-9);
    assert_eq!(track.origin, GeoPoint::new(48.137_154, 11.576_124));
    assert_eq!(track.points.len(), 10);

    // due north: bearing ~0, all displacement on x
    for (i, p) in track.points.iter().enumerate() {
        assert!(p.bearing_deg < 1e-6 || p.bearing_deg > 360.0 - 1e-6, "{p:?}");
        assert!(p.y.abs() < 1e-6, "{p:?}");
        let expected = 1.112 * (i + 1) as f64;
        assert!((p.x - expected).abs() < 0.01, "{i}: {p:?}");
    }
    assert!((track.max_distance_m() - track.points[9].distance_m).abs() < 1e-12);
}

#[test]
fn max_points_limits_the_projection() {
    let (_dir, path) = write_csv(&northbound_rows(50));
    let fixes = read_gps_csv(&path).unwrap();
    let track = reconstruct_track(&fixes, 20).unwrap();
    assert_eq!(track.points.len(), 19);
    assert_eq!(track.fix_count, 50);
}

#[test]
fn header_only_file_is_rejected() {
    let (_dir, path) = write_csv(&[]);
    let fixes = read_gps_csv(&path).unwrap();
    assert!(matches!(reconstruct_track(&fixes, 600), Err(GpsError::Empty)));
}

#[test]
fn bad_coordinate_is_fatal() {
    let (_dir, path) = write_csv(&[
        "0,1000,48.1,11.5,48.1,11.5,0".to_string(),
        "1,1200,,11.5,48.1,11.5,0".to_string(),
    ]);
    assert!(matches!(
        read_gps_csv(&path),
        Err(GpsError::InvalidNumber { row: 2, column: "DRONELATITUDE", .. })
    ));
}

#[test]
fn missing_file_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    assert!(matches!(
        read_gps_csv(&dir.path().join("none.csv")),
        Err(GpsError::FileAccess { .. })
    ));
}
