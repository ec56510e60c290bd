//! Extraction diagnostics

use serde::Serialize;
use std::fmt;

use crate::types::EventKind;

/// Counters describing one pass over a log file. Purely informational.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ExtractionReport {
    pub lines_read: u64,
    pub skipped_no_timestamp: u64,
    pub skipped_malformed_timestamp: u64,
    pub unmatched: u64,
    pub drone_matches: u64,
    pub target_matches: u64,
    pub headset_matches: u64,
    pub expected_matches: u64,
    pub position_matches: u64,
    pub flushes: u64,
    /// Pending events replaced by a newer one before any flush
    pub overwritten_pending: u64,
    /// Pending events still waiting when the input ended
    pub discarded_at_end: u64,
}

impl ExtractionReport {
    pub(crate) fn record_match(&mut self, kind: EventKind) {
        let counter = match kind {
            EventKind::DroneAttitudeObserved => &mut self.drone_matches,
            EventKind::TargetAttitudeCommanded => &mut self.target_matches,
            EventKind::HeadsetAttitudeObserved => &mut self.headset_matches,
            EventKind::ExpectedAttitudeComputed => &mut self.expected_matches,
            EventKind::PositionDelta => &mut self.position_matches,
        };
        *counter += 1;
    }

    pub const fn matches(&self, kind: EventKind) -> u64 {
        match kind {
            EventKind::DroneAttitudeObserved => self.drone_matches,
            EventKind::TargetAttitudeCommanded => self.target_matches,
            EventKind::HeadsetAttitudeObserved => self.headset_matches,
            EventKind::ExpectedAttitudeComputed => self.expected_matches,
            EventKind::PositionDelta => self.position_matches,
        }
    }

    pub const fn total_matches(&self) -> u64 {
        self.drone_matches
            + self.target_matches
            + self.headset_matches
            + self.expected_matches
            + self.position_matches
    }

    pub(crate) fn log_summary(&self) {
        tracing::info!(
            lines = self.lines_read,
            matched = self.total_matches(),
            unmatched = self.unmatched,
            no_timestamp = self.skipped_no_timestamp,
            malformed_timestamp = self.skipped_malformed_timestamp,
            flushes = self.flushes,
            overwritten = self.overwritten_pending,
            discarded = self.discarded_at_end,
            "Extraction finished"
        );
    }
}

impl fmt::Display for ExtractionReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Extraction: {} lines, {} matched (drone {}, target {}, headset {}, expected {}, position {}), \
             {} unmatched, {} without timestamp, {} bad timestamp, {} flushes",
            self.lines_read,
            self.total_matches(),
            self.drone_matches,
            self.target_matches,
            self.headset_matches,
            self.expected_matches,
            self.position_matches,
            self.unmatched,
            self.skipped_no_timestamp,
            self.skipped_malformed_timestamp,
            self.flushes
        )
    }
}
