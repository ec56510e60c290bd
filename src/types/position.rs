//! Position-delta types

use serde::{Deserialize, Serialize};

use super::LogTimestamp;

/// A point in the headset's local X/Y plane (metres).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PlanarPoint {
    pub x: f64,
    pub y: f64,
}

impl PlanarPoint {
    pub const ORIGIN: Self = Self { x: 0.0, y: 0.0 };

    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// "Headset position changes from (x1, y1) to (x2, y2)"
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PositionDeltaEvent {
    pub from: PlanarPoint,
    pub to: PlanarPoint,
    pub timestamp: LogTimestamp,
}

/// Chain position deltas into a track starting at the origin.
///
/// Each delta contributes its `to` point; `from` points are not checked for
/// continuity with the previous delta.
pub fn position_track(deltas: &[PositionDeltaEvent]) -> Vec<PlanarPoint> {
    std::iter::once(PlanarPoint::ORIGIN)
        .chain(deltas.iter().map(|d| d.to))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn ts() -> LogTimestamp {
        NaiveDate::from_ymd_opt(2025, 10, 2)
            .unwrap()
            .and_hms_milli_opt(15, 7, 10, 978)
            .unwrap()
            .into()
    }

    #[test]
    fn test_track_starts_at_origin() {
        assert_eq!(position_track(&[]), vec![PlanarPoint::ORIGIN]);
    }

    #[test]
    fn test_track_follows_to_points() {
        let deltas = [
            PositionDeltaEvent {
                from: PlanarPoint::new(0.0, 0.0),
                to: PlanarPoint::new(-0.0004, 1.5806),
                timestamp: ts(),
            },
            PositionDeltaEvent {
                from: PlanarPoint::new(-0.0004, 1.5806),
                to: PlanarPoint::new(0.25, 2.0),
                timestamp: ts(),
            },
        ];
        let track = position_track(&deltas);
        assert_eq!(track.len(), 3);
        assert_eq!(track[1], PlanarPoint::new(-0.0004, 1.5806));
        assert_eq!(track[2], PlanarPoint::new(0.25, 2.0));
    }
}
