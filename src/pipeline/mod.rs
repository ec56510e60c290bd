//! Extraction Pipeline
//!
//! ```text
//! Line Source -> Timestamp Extractor -> Pattern Registry -> Reconciler -> Series
//! ```
//!
//! Single-threaded and synchronous. Timestamp problems skip the line;
//! I/O, decode and field-conversion failures abort the run with no
//! partial output.

mod report;

pub use report::ExtractionReport;

use std::path::Path;
use thiserror::Error;
use tracing::{debug, info};

use crate::acquisition::{LineSource, LogLine, SourceError, TimestampError, TimestampExtractor};
use crate::extraction::{Extracted, ExtractionError, RuleRegistry};
use crate::reconcile::{Observation, Reconciler, SeriesCollection};
use crate::types::{AttitudeEvent, PositionDeltaEvent};

/// Fatal pipeline errors
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Failed to build extraction rules: {0}")]
    Setup(#[source] ExtractionError),

    #[error(transparent)]
    Source(#[from] SourceError),

    #[error("Line {line}: {source}")]
    FieldConversion {
        line: u64,
        #[source]
        source: ExtractionError,
    },
}

/// Result of an attitude extraction run.
#[derive(Debug, Clone)]
pub struct AttitudeRun {
    pub series: SeriesCollection,
    pub report: ExtractionReport,
    /// Pending events dropped at end of input
    pub discarded: Vec<AttitudeEvent>,
}

/// Result of a position-delta extraction run.
#[derive(Debug, Clone)]
pub struct PositionRun {
    pub deltas: Vec<PositionDeltaEvent>,
    pub report: ExtractionReport,
}

/// Compiled timestamp recognizer plus an ordered rule set.
///
/// Holds no per-run state, so one scanner can process any number of files.
#[derive(Debug)]
pub struct LogScanner {
    timestamps: TimestampExtractor,
    registry: RuleRegistry,
}

impl LogScanner {
    pub fn new(registry: RuleRegistry) -> Result<Self, PipelineError> {
        let timestamps = TimestampExtractor::new()
            .map_err(|e| PipelineError::Setup(ExtractionError::Pattern(e)))?;
        Ok(Self {
            timestamps,
            registry,
        })
    }

    /// Scanner with the four attitude rules.
    pub fn attitude() -> Result<Self, PipelineError> {
        Self::new(RuleRegistry::attitude().map_err(PipelineError::Setup)?)
    }

    /// Scanner with the position-delta rule.
    pub fn position_delta() -> Result<Self, PipelineError> {
        Self::new(RuleRegistry::position_delta().map_err(PipelineError::Setup)?)
    }

    pub const fn registry(&self) -> &RuleRegistry {
        &self.registry
    }

    /// Classify each line and hand matches to `on_event`.
    fn scan<I, F>(
        &self,
        lines: I,
        report: &mut ExtractionReport,
        mut on_event: F,
    ) -> Result<(), PipelineError>
    where
        I: IntoIterator<Item = Result<LogLine, SourceError>>,
        F: FnMut(Extracted, &mut ExtractionReport),
    {
        for line in lines {
            let line = line?;
            report.lines_read += 1;

            let timestamp = match self.timestamps.extract(&line.text) {
                Ok(ts) => ts,
                Err(TimestampError::NotFound) => {
                    report.skipped_no_timestamp += 1;
                    continue;
                }
                Err(e @ TimestampError::Malformed(_)) => {
                    debug!(line = line.number, error = %e, "Skipping line");
                    report.skipped_malformed_timestamp += 1;
                    continue;
                }
            };

            match self.registry.classify(&line.text, timestamp) {
                Ok(Some(extracted)) => {
                    report.record_match(extracted.kind());
                    on_event(extracted, &mut *report);
                }
                Ok(None) => report.unmatched += 1,
                Err(source) => {
                    return Err(PipelineError::FieldConversion {
                        line: line.number,
                        source,
                    })
                }
            }
        }
        Ok(())
    }

    /// Reconcile attitude events from an already-open line sequence.
    pub fn reconcile_lines<I>(&self, lines: I) -> Result<AttitudeRun, PipelineError>
    where
        I: IntoIterator<Item = Result<LogLine, SourceError>>,
    {
        let mut report = ExtractionReport::default();
        let mut reconciler = Reconciler::new();

        self.scan(lines, &mut report, |extracted, report| {
            if let Extracted::Attitude(event) = extracted {
                match reconciler.observe(event) {
                    Observation::Pending { replaced: Some(_) } => report.overwritten_pending += 1,
                    Observation::Flushed(_) => report.flushes += 1,
                    Observation::Pending { replaced: None } | Observation::Ignored => {}
                }
            }
        })?;

        let done = reconciler.finish();
        report.discarded_at_end = done.discarded.len() as u64;
        report.log_summary();
        Ok(AttitudeRun {
            series: done.series,
            report,
            discarded: done.discarded,
        })
    }

    /// Collect position deltas from an already-open line sequence.
    ///
    /// Like attitude lines, a position line is only used when it carries a
    /// timestamp. The control app's file logger always writes one, so this
    /// only drops hand-edited or truncated lines.
    pub fn collect_position_lines<I>(&self, lines: I) -> Result<PositionRun, PipelineError>
    where
        I: IntoIterator<Item = Result<LogLine, SourceError>>,
    {
        let mut report = ExtractionReport::default();
        let mut deltas = Vec::new();

        self.scan(lines, &mut report, |extracted, _| {
            if let Extracted::Position(delta) = extracted {
                deltas.push(delta);
            }
        })?;

        report.log_summary();
        Ok(PositionRun { deltas, report })
    }

    /// Run attitude extraction over a log file.
    pub fn reconcile_file(&self, path: &Path) -> Result<AttitudeRun, PipelineError> {
        info!(path = %path.display(), "Extracting attitude series");
        self.reconcile_lines(LineSource::new(path).lines()?)
    }

    /// Run position-delta extraction over a log file.
    pub fn collect_position_file(&self, path: &Path) -> Result<PositionRun, PipelineError> {
        info!(path = %path.display(), "Extracting position deltas");
        self.collect_position_lines(LineSource::new(path).lines()?)
    }
}

/// Extract the four aligned attitude series from a log file.
pub fn extract_attitude_series(path: &Path) -> Result<AttitudeRun, PipelineError> {
    LogScanner::attitude()?.reconcile_file(path)
}

/// Extract headset position deltas from a log file.
pub fn extract_position_deltas(path: &Path) -> Result<PositionRun, PipelineError> {
    LogScanner::position_delta()?.collect_position_file(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::EventKind;

    fn lines(text: &[&str]) -> Vec<Result<LogLine, SourceError>> {
        text.iter()
            .enumerate()
            .map(|(i, t)| {
                Ok(LogLine {
                    number: i as u64 + 1,
                    text: (*t).to_string(),
                })
            })
            .collect()
    }

    #[test]
    fn test_untimestamped_lines_never_contribute() {
        let scanner = LogScanner::attitude().unwrap();
        let run = scanner
            .reconcile_lines(lines(&[
                "Drone attitude --> 12.0 / 0.0 / 0.0",
                r#"Sending advanced stick param to the drone: {"yaw":5.0}"#,
                r#"2025-13-40 10:00:00.000 Sending advanced stick param to the drone: {"yaw":5.0}"#,
            ]))
            .unwrap();
        assert!(run.series.is_empty());
        assert_eq!(run.report.skipped_no_timestamp, 2);
        assert_eq!(run.report.skipped_malformed_timestamp, 1);
        assert_eq!(run.report.flushes, 0);
    }

    #[test]
    fn test_untimestamped_malformed_payload_is_not_fatal() {
        let scanner = LogScanner::attitude().unwrap();
        let run = scanner
            .reconcile_lines(lines(&[r#"Sending advanced stick param to the drone: {"yaw":oops}"#]))
            .unwrap();
        assert!(run.series.is_empty());
    }

    #[test]
    fn test_conversion_failure_reports_line_number() {
        let scanner = LogScanner::attitude().unwrap();
        let err = scanner
            .reconcile_lines(lines(&[
                "2025-09-18 15:07:10.000\tI\tDroneStatusMonitor\t\tDrone attitude --> 1.0 / 0.0 / 0.0",
                r#"2025-09-18 15:07:10.100	D	VirtualDroneController		Sending advanced stick param to the drone: {"yaw":oops}"#,
            ]))
            .unwrap_err();
        assert!(matches!(err, PipelineError::FieldConversion { line: 2, .. }));
    }

    #[test]
    fn test_report_counts_overwrites_and_discards() {
        let scanner = LogScanner::attitude().unwrap();
        let run = scanner
            .reconcile_lines(lines(&[
                "2025-09-18 15:07:10.000 Drone attitude --> 1.0 / 0.0 / 0.0",
                "2025-09-18 15:07:10.100 Drone attitude --> 2.0 / 0.0 / 0.0",
                r#"2025-09-18 15:07:10.200 Sending advanced stick param to the drone: {"yaw":3.0}"#,
                "2025-09-18 15:07:10.300 The expected target drone orientation: 4.0",
                "2025-09-18 15:07:10.400 Mock to start the control",
            ]))
            .unwrap();
        assert_eq!(run.report.lines_read, 5);
        assert_eq!(run.report.overwritten_pending, 1);
        assert_eq!(run.report.discarded_at_end, 1);
        assert_eq!(run.report.unmatched, 1);
        assert_eq!(run.report.matches(EventKind::DroneAttitudeObserved), 2);
        assert_eq!(run.series.values(EventKind::DroneAttitudeObserved), vec![2]);
        assert_eq!(run.discarded.len(), 1);
        assert_eq!(run.discarded[0].kind, EventKind::ExpectedAttitudeComputed);
    }

    #[test]
    fn test_source_error_aborts_run() {
        let scanner = LogScanner::attitude().unwrap();
        let mut input = lines(&["2025-09-18 15:07:10.000 Drone attitude --> 1.0 / 0.0 / 0.0"]);
        input.push(Err(SourceError::Decode {
            path: "x.log".into(),
            line: 2,
        }));
        let err = scanner.reconcile_lines(input).unwrap_err();
        assert!(matches!(err, PipelineError::Source(SourceError::Decode { line: 2, .. })));
    }

    #[test]
    fn test_position_lines_collected_in_order() {
        let scanner = LogScanner::position_delta().unwrap();
        let run = scanner
            .collect_position_lines(lines(&[
                "2025-10-02 15:07:10.978\tU\tControlViaHeadset\t\tHeadset position changes from (0.0000, 0.0000) to (-0.0004, 1.5806)",
                "ControlViaHeadset\t\tHeadset position changes from (9.0, 9.0) to (9.0, 9.0)",
                "2025-10-02 15:07:11.978\tU\tControlViaHeadset\t\tHeadset position changes from (-0.0004, 1.5806) to (0.5000, 2.0000)",
            ]))
            .unwrap();
        assert_eq!(run.deltas.len(), 2);
        assert_eq!(run.deltas[1].to.x, 0.5);
        assert_eq!(run.report.position_matches, 2);
        assert_eq!(run.report.skipped_no_timestamp, 1);
    }
}
