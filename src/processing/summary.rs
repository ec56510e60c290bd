//! Descriptive summaries and drone-vs-target tracking error

use serde::Serialize;

use crate::extraction::normalize::wrap_signed_degrees;
use crate::reconcile::SeriesCollection;
use crate::types::EventKind;

/// Per-kind descriptive statistics over signed degree values.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesSummary {
    pub kind: EventKind,
    pub count: usize,
    pub min: Option<i32>,
    pub max: Option<i32>,
    pub mean: Option<f64>,
    /// Mean of absolute values, matching what the charts display
    pub mean_magnitude: Option<f64>,
}

impl SeriesSummary {
    #[allow(clippy::cast_precision_loss)]
    pub fn from_values(kind: EventKind, values: &[i32]) -> Self {
        let count = values.len();
        if count == 0 {
            return Self {
                kind,
                count,
                min: None,
                max: None,
                mean: None,
                mean_magnitude: None,
            };
        }
        let n = count as f64;
        let sum: f64 = values.iter().map(|&v| f64::from(v)).sum();
        let abs_sum: f64 = values.iter().map(|&v| f64::from(v.unsigned_abs())).sum();
        Self {
            kind,
            count,
            min: values.iter().copied().min(),
            max: values.iter().copied().max(),
            mean: Some(sum / n),
            mean_magnitude: Some(abs_sum / n),
        }
    }
}

/// Summaries for all four attitude series, in series order.
pub fn summarize(series: &SeriesCollection) -> Vec<SeriesSummary> {
    EventKind::ATTITUDE
        .iter()
        .map(|&kind| SeriesSummary::from_values(kind, &series.values(kind)))
        .collect()
}

/// Drone minus target yaw, wrapped into [-180, 180), for every flush that
/// carried a drone reading.
///
/// Events are paired by flush ordinal, so flushes with an empty drone slot
/// are skipped instead of shifting later pairs.
pub fn tracking_error(series: &SeriesCollection) -> Vec<i32> {
    let mut targets = series.flushed(EventKind::TargetAttitudeCommanded).peekable();
    let mut errors = Vec::new();
    for (ordinal, drone) in series.flushed(EventKind::DroneAttitudeObserved) {
        while targets.next_if(|(t, _)| *t < ordinal).is_some() {}
        if let Some((_, target)) = targets.next_if(|(t, _)| *t == ordinal) {
            errors.push(wrap_signed_degrees(
                i64::from(drone.degrees) - i64::from(target.degrees),
            ));
        }
    }
    errors
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reconcile::Reconciler;
    use crate::types::{AttitudeEvent, LogTimestamp};
    use chrono::NaiveDate;

    fn ts() -> LogTimestamp {
        NaiveDate::from_ymd_opt(2025, 9, 18)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
            .into()
    }

    #[test]
    fn test_summary_of_empty_series() {
        let summary = SeriesSummary::from_values(EventKind::HeadsetAttitudeObserved, &[]);
        assert_eq!(summary.count, 0);
        assert!(summary.mean.is_none());
    }

    #[test]
    fn test_summary_values() {
        let summary = SeriesSummary::from_values(EventKind::DroneAttitudeObserved, &[-10, 20, 30]);
        assert_eq!(summary.min, Some(-10));
        assert_eq!(summary.max, Some(30));
        assert!((summary.mean.unwrap() - 40.0 / 3.0).abs() < 1e-9);
        assert!((summary.mean_magnitude.unwrap() - 20.0).abs() < 1e-9);
    }

    #[test]
    fn test_tracking_error_pairs_by_flush_ordinal() {
        let mut r = Reconciler::new();
        r.observe(AttitudeEvent::new(EventKind::TargetAttitudeCommanded, -90, ts()));
        r.observe(AttitudeEvent::new(EventKind::DroneAttitudeObserved, 50, ts()));
        r.observe(AttitudeEvent::new(EventKind::TargetAttitudeCommanded, 50, ts()));
        let series = r.finish().series;
        assert_eq!(series.values(EventKind::TargetAttitudeCommanded), vec![-90, 50]);
        assert_eq!(tracking_error(&series), vec![0]);
    }

    #[test]
    fn test_tracking_error_extreme_readings_do_not_overflow() {
        let mut r = Reconciler::new();
        r.observe(AttitudeEvent::new(EventKind::DroneAttitudeObserved, i32::MAX, ts()));
        r.observe(AttitudeEvent::new(EventKind::TargetAttitudeCommanded, i32::MIN, ts()));
        let series = r.finish().series;
        assert_eq!(tracking_error(&series), vec![-105]);
    }

    #[test]
    fn test_tracking_error_wraps() {
        let mut r = Reconciler::new();
        r.observe(AttitudeEvent::new(EventKind::DroneAttitudeObserved, 170, ts()));
        r.observe(AttitudeEvent::new(EventKind::TargetAttitudeCommanded, -170, ts()));
        r.observe(AttitudeEvent::new(EventKind::TargetAttitudeCommanded, 5, ts()));
        let series = r.finish().series;
        assert_eq!(tracking_error(&series), vec![-20]);
        assert_eq!(summarize(&series).len(), 4);
    }
}
