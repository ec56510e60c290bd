//! Event Reconciler
//!
//! Aligns three asynchronous attitude streams (drone, headset, expected) to
//! the commanded-target stream, which is the only periodic signal in the log.
//!
//! ## State machine
//!
//! One slot per asynchronous kind, each either empty or holding a pending
//! event.
//!
//! - Observing an asynchronous event overwrites its slot (last writer wins;
//!   an older pending value is dropped).
//! - Observing a target event appends it to the target series, then flushes:
//!   every non-empty slot moves into its series and is cleared. Empty slots
//!   contribute nothing, so series lengths can differ and alignment is by
//!   flush ordinal only. Each series records the ordinal of every event.
//! - At end of input anything still pending is discarded.

pub mod series;

pub use series::SeriesCollection;

use crate::types::{AttitudeEvent, EventKind};

/// Pending (unflushed) events, at most one per asynchronous kind.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PendingSlots {
    drone: Option<AttitudeEvent>,
    headset: Option<AttitudeEvent>,
    expected: Option<AttitudeEvent>,
}

impl PendingSlots {
    fn slot_mut(&mut self, kind: EventKind) -> Option<&mut Option<AttitudeEvent>> {
        match kind {
            EventKind::DroneAttitudeObserved => Some(&mut self.drone),
            EventKind::HeadsetAttitudeObserved => Some(&mut self.headset),
            EventKind::ExpectedAttitudeComputed => Some(&mut self.expected),
            EventKind::TargetAttitudeCommanded | EventKind::PositionDelta => None,
        }
    }

    pub const fn get(&self, kind: EventKind) -> Option<&AttitudeEvent> {
        match kind {
            EventKind::DroneAttitudeObserved => self.drone.as_ref(),
            EventKind::HeadsetAttitudeObserved => self.headset.as_ref(),
            EventKind::ExpectedAttitudeComputed => self.expected.as_ref(),
            EventKind::TargetAttitudeCommanded | EventKind::PositionDelta => None,
        }
    }

    pub const fn is_empty(&self) -> bool {
        self.drone.is_none() && self.headset.is_none() && self.expected.is_none()
    }

    /// Take every pending event, in series order, leaving all slots empty.
    fn drain(&mut self) -> Vec<AttitudeEvent> {
        [self.drone.take(), self.headset.take(), self.expected.take()]
            .into_iter()
            .flatten()
            .collect()
    }
}

/// Outcome of one flush.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlushResult {
    /// 1-based flush ordinal
    pub ordinal: usize,
    /// Pending events moved into their series by this flush
    pub flushed: Vec<AttitudeEvent>,
}

impl FlushResult {
    pub fn contributed(&self, kind: EventKind) -> bool {
        self.flushed.iter().any(|e| e.kind == kind)
    }
}

/// What observing one event did to the reconciler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Observation {
    /// Stored in its slot; `replaced` carries the pending event it overwrote
    Pending { replaced: Option<AttitudeEvent> },
    /// Synchronization pulse: target appended, pending slots flushed
    Flushed(FlushResult),
    /// Event kind the reconciler does not handle
    Ignored,
}

/// Series left after the input is exhausted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconciledSeries {
    pub series: SeriesCollection,
    /// Pending events that never saw a synchronization pulse
    pub discarded: Vec<AttitudeEvent>,
}

/// Reconciliation state for one extraction run.
#[derive(Debug, Clone, Default)]
pub struct Reconciler {
    pending: PendingSlots,
    series: SeriesCollection,
    flushes: usize,
}

impl Reconciler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one attitude event.
    pub fn observe(&mut self, event: AttitudeEvent) -> Observation {
        if event.kind.is_synchronizing() {
            self.series.push(event, self.flushes + 1);
            return Observation::Flushed(self.flush());
        }

        match self.pending.slot_mut(event.kind) {
            Some(slot) => {
                let replaced = slot.replace(event);
                if let Some(old) = &replaced {
                    tracing::trace!(kind = %old.kind, dropped = old.degrees, "Pending event overwritten");
                }
                Observation::Pending { replaced }
            }
            None => Observation::Ignored,
        }
    }

    /// Move every pending event into its series and clear the slots.
    pub fn flush(&mut self) -> FlushResult {
        self.flushes += 1;
        let flushed = self.pending.drain();
        for event in &flushed {
            self.series.push(*event, self.flushes);
        }
        FlushResult {
            ordinal: self.flushes,
            flushed,
        }
    }

    pub const fn pending(&self) -> &PendingSlots {
        &self.pending
    }

    pub const fn series(&self) -> &SeriesCollection {
        &self.series
    }

    pub const fn flush_count(&self) -> usize {
        self.flushes
    }

    /// End of input: keep the series, discard whatever is still pending.
    pub fn finish(mut self) -> ReconciledSeries {
        let discarded = self.pending.drain();
        if !discarded.is_empty() {
            tracing::debug!(count = discarded.len(), "Discarding pending events at end of input");
        }
        ReconciledSeries {
            series: self.series,
            discarded,
        }
    }
}
