//! Attitude event types

use serde::{Deserialize, Serialize};
use std::fmt;

use super::LogTimestamp;

/// Kind of event an extraction rule produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EventKind {
    /// Raw yaw reported by the drone's flight controller
    DroneAttitudeObserved,
    /// Yaw sent to the drone in a virtual-stick command (synchronization pulse)
    TargetAttitudeCommanded,
    /// Headset rotation relative to its benchmark orientation
    HeadsetAttitudeObserved,
    /// Target orientation computed before rate limiting
    ExpectedAttitudeComputed,
    /// Headset position change (position-delta variant only)
    PositionDelta,
}

impl EventKind {
    /// Attitude kinds in series order.
    pub const ATTITUDE: [Self; 4] = [
        Self::DroneAttitudeObserved,
        Self::TargetAttitudeCommanded,
        Self::HeadsetAttitudeObserved,
        Self::ExpectedAttitudeComputed,
    ];

    /// Kinds that wait in a pending slot until the next synchronization pulse.
    pub const ASYNCHRONOUS: [Self; 3] = [
        Self::DroneAttitudeObserved,
        Self::HeadsetAttitudeObserved,
        Self::ExpectedAttitudeComputed,
    ];

    /// Whether an event of this kind triggers a flush.
    pub const fn is_synchronizing(self) -> bool {
        matches!(self, Self::TargetAttitudeCommanded)
    }

    /// Short human-readable label used in logs and chart legends.
    pub const fn label(self) -> &'static str {
        match self {
            Self::DroneAttitudeObserved => "drone",
            Self::TargetAttitudeCommanded => "target",
            Self::HeadsetAttitudeObserved => "headset",
            Self::ExpectedAttitudeComputed => "expected",
            Self::PositionDelta => "position",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A normalized attitude reading in integer degrees.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttitudeEvent {
    pub kind: EventKind,
    pub degrees: i32,
    pub timestamp: LogTimestamp,
}

impl AttitudeEvent {
    pub const fn new(kind: EventKind, degrees: i32, timestamp: LogTimestamp) -> Self {
        Self {
            kind,
            degrees,
            timestamp,
        }
    }

    /// Absolute degree reading, as plotted.
    pub const fn magnitude(&self) -> u32 {
        self.degrees.unsigned_abs()
    }
}
