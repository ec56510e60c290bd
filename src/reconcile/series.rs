//! Series Output
//!
//! Append-only, per-kind sequences of flushed attitude events. Only the
//! reconciler appends; consumers get read-only views in insertion order.
//! Every event remembers the ordinal of the flush that emitted it, since
//! series of different kinds are not index-aligned.

use serde::{Deserialize, Serialize};

use crate::types::{AttitudeEvent, EventKind};

/// The four aligned attitude series produced by one extraction run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeriesCollection {
    drone: Vec<AttitudeEvent>,
    target: Vec<AttitudeEvent>,
    headset: Vec<AttitudeEvent>,
    expected: Vec<AttitudeEvent>,
    #[serde(default)]
    flushes: FlushOrdinals,
}

/// 1-based flush ordinals, parallel to each series.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
struct FlushOrdinals {
    drone: Vec<usize>,
    target: Vec<usize>,
    headset: Vec<usize>,
    expected: Vec<usize>,
}

impl SeriesCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Events of one kind, in flush order. `PositionDelta` has no series.
    pub fn events(&self, kind: EventKind) -> &[AttitudeEvent] {
        match kind {
            EventKind::DroneAttitudeObserved => &self.drone,
            EventKind::TargetAttitudeCommanded => &self.target,
            EventKind::HeadsetAttitudeObserved => &self.headset,
            EventKind::ExpectedAttitudeComputed => &self.expected,
            EventKind::PositionDelta => &[],
        }
    }

    /// Flush ordinal of each event of one kind, parallel to [`Self::events`].
    pub fn flush_ordinals(&self, kind: EventKind) -> &[usize] {
        match kind {
            EventKind::DroneAttitudeObserved => &self.flushes.drone,
            EventKind::TargetAttitudeCommanded => &self.flushes.target,
            EventKind::HeadsetAttitudeObserved => &self.flushes.headset,
            EventKind::ExpectedAttitudeComputed => &self.flushes.expected,
            EventKind::PositionDelta => &[],
        }
    }

    /// Events of one kind paired with the ordinal of the flush that emitted them.
    pub fn flushed(&self, kind: EventKind) -> impl Iterator<Item = (usize, &AttitudeEvent)> {
        self.flush_ordinals(kind)
            .iter()
            .copied()
            .zip(self.events(kind))
    }

    /// Signed degree values of one kind.
    pub fn values(&self, kind: EventKind) -> Vec<i32> {
        self.events(kind).iter().map(|e| e.degrees).collect()
    }

    /// Epoch-millisecond timestamps of one kind, for chart x-axes.
    pub fn timestamps(&self, kind: EventKind) -> Vec<i64> {
        self.events(kind)
            .iter()
            .map(|e| e.timestamp.epoch_millis())
            .collect()
    }

    /// Absolute degree values of one kind, as displayed.
    pub fn magnitudes(&self, kind: EventKind) -> Vec<u32> {
        self.events(kind).iter().map(AttitudeEvent::magnitude).collect()
    }

    pub fn len(&self, kind: EventKind) -> usize {
        self.events(kind).len()
    }

    pub fn is_empty(&self) -> bool {
        EventKind::ATTITUDE.iter().all(|&k| self.events(k).is_empty())
    }

    pub(crate) fn push(&mut self, event: AttitudeEvent, ordinal: usize) {
        let (series, ordinals) = match event.kind {
            EventKind::DroneAttitudeObserved => (&mut self.drone, &mut self.flushes.drone),
            EventKind::TargetAttitudeCommanded => (&mut self.target, &mut self.flushes.target),
            EventKind::HeadsetAttitudeObserved => (&mut self.headset, &mut self.flushes.headset),
            EventKind::ExpectedAttitudeComputed => {
                (&mut self.expected, &mut self.flushes.expected)
            }
            EventKind::PositionDelta => {
                tracing::warn!("Position event offered to attitude series, ignoring");
                return;
            }
        };
        series.push(event);
        ordinals.push(ordinal);
    }
}
