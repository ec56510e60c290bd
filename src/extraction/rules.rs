//! Extraction rules for drone-control log payloads
//!
//! Each rule is a compiled pattern plus a conversion. Captures are kept
//! permissive on purpose: a line that has the shape of a rule but carries a
//! non-numeric value must reach the normalizer and fail, not slip through as
//! "no match".
//!
//! Payload shapes (message part of a log line):
//! - `Drone attitude --> <yaw> / <roll> / <pitch>`
//! - `Sending advanced stick param to the drone: {"pitch":..,"roll":..,"yaw":<yaw>,..}`
//! - `... Headset benchmark orientation: <b>, Headset current orientation: <c>, ...`
//! - `The expected target drone orientation: <value>`
//! - `ControlViaHeadset ... from (<x1>, <y1>) to (<x2>, <y2>)`

use regex::{Captures, Regex};

use super::normalize::{headset_relative_degrees, parse_decimal, truncate_degrees};
use super::ExtractionError;
use crate::types::{EventKind, PlanarPoint};

pub mod patterns {
    pub const DRONE_ATTITUDE: &str =
        r"(?i)attitude\s*-->\s*(?P<yaw>[^/\s]+)\s*/\s*(?P<roll>[^/\s]+)\s*/\s*(?P<pitch>\S+)";
    pub const TARGET_ATTITUDE: &str =
        r#"Sending advanced stick param to the drone:.*?"yaw"\s*:\s*(?P<yaw>[^,}\s]+)"#;
    pub const HEADSET_ATTITUDE: &str = r"Headset benchmark orientation:\s*(?P<benchmark>[^,]+),\s*Headset current orientation:\s*(?P<current>[^,]+)";
    pub const EXPECTED_ATTITUDE: &str =
        r"The expected target drone orientation:\s*(?P<expected>\S+)";
    pub const POSITION_DELTA: &str = r"ControlViaHeadset.*from\s\((?P<from_x>.*?),\s(?P<from_y>.*?)\)\sto\s\((?P<to_x>.*?),\s(?P<to_y>.*?)\)";
}

/// Typed value produced by a matching rule, before it is timestamped.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Reading {
    Degrees(i32),
    Delta { from: PlanarPoint, to: PlanarPoint },
}

/// A single extraction rule: `line -> Option<Reading>`.
///
/// `Ok(None)` means the rule does not apply to the line. An error means the
/// rule applied but a captured field could not be converted.
pub trait ExtractionRule: Send + Sync {
    fn name(&self) -> &'static str;
    fn kind(&self) -> EventKind;
    fn apply(&self, line: &str) -> Result<Option<Reading>, ExtractionError>;
}

fn capture<'a>(caps: &'a Captures<'_>, field: &str) -> &'a str {
    caps.name(field).map_or("", |m| m.as_str())
}

/// Rule whose single captured field is truncated to integer degrees.
struct TruncatedYawRule {
    name: &'static str,
    kind: EventKind,
    field: &'static str,
    pattern: Regex,
}

impl TruncatedYawRule {
    fn new(
        name: &'static str,
        kind: EventKind,
        field: &'static str,
        pattern: &str,
    ) -> Result<Self, ExtractionError> {
        Ok(Self {
            name,
            kind,
            field,
            pattern: Regex::new(pattern)?,
        })
    }
}

impl ExtractionRule for TruncatedYawRule {
    fn name(&self) -> &'static str {
        self.name
    }

    fn kind(&self) -> EventKind {
        self.kind
    }

    fn apply(&self, line: &str) -> Result<Option<Reading>, ExtractionError> {
        let Some(caps) = self.pattern.captures(line) else {
            return Ok(None);
        };
        let raw = capture(&caps, self.field);
        let value = parse_decimal(self.name, self.field, raw)?;
        let degrees = truncate_degrees(value).ok_or_else(|| ExtractionError::FieldConversion {
            rule: self.name,
            field: self.field,
            value: raw.to_string(),
        })?;
        Ok(Some(Reading::Degrees(degrees)))
    }
}

/// Drone yaw from the flight controller's `yaw / roll / pitch` triple.
pub fn drone_attitude_rule() -> Result<Box<dyn ExtractionRule>, ExtractionError> {
    Ok(Box::new(TruncatedYawRule::new(
        "drone_attitude",
        EventKind::DroneAttitudeObserved,
        "yaw",
        patterns::DRONE_ATTITUDE,
    )?))
}

/// Commanded yaw from a virtual-stick parameter message.
pub fn target_attitude_rule() -> Result<Box<dyn ExtractionRule>, ExtractionError> {
    Ok(Box::new(TruncatedYawRule::new(
        "target_attitude",
        EventKind::TargetAttitudeCommanded,
        "yaw",
        patterns::TARGET_ATTITUDE,
    )?))
}

/// Target orientation computed before rate limiting was applied.
pub fn expected_attitude_rule() -> Result<Box<dyn ExtractionRule>, ExtractionError> {
    Ok(Box::new(TruncatedYawRule::new(
        "expected_attitude",
        EventKind::ExpectedAttitudeComputed,
        "expected",
        patterns::EXPECTED_ATTITUDE,
    )?))
}

/// Headset rotation relative to the benchmark taken when control started.
pub struct HeadsetAttitudeRule {
    pattern: Regex,
}

impl HeadsetAttitudeRule {
    pub fn new() -> Result<Self, ExtractionError> {
        Ok(Self {
            pattern: Regex::new(patterns::HEADSET_ATTITUDE)?,
        })
    }
}

impl ExtractionRule for HeadsetAttitudeRule {
    fn name(&self) -> &'static str {
        "headset_attitude"
    }

    fn kind(&self) -> EventKind {
        EventKind::HeadsetAttitudeObserved
    }

    fn apply(&self, line: &str) -> Result<Option<Reading>, ExtractionError> {
        let Some(caps) = self.pattern.captures(line) else {
            return Ok(None);
        };
        let benchmark = parse_decimal(self.name(), "benchmark", capture(&caps, "benchmark"))?;
        let current = parse_decimal(self.name(), "current", capture(&caps, "current"))?;
        Ok(Some(Reading::Degrees(headset_relative_degrees(
            benchmark, current,
        ))))
    }
}

/// Headset position change reported by the `ControlViaHeadset` strategy.
pub struct PositionDeltaRule {
    pattern: Regex,
}

impl PositionDeltaRule {
    pub fn new() -> Result<Self, ExtractionError> {
        Ok(Self {
            pattern: Regex::new(patterns::POSITION_DELTA)?,
        })
    }
}

impl ExtractionRule for PositionDeltaRule {
    fn name(&self) -> &'static str {
        "position_delta"
    }

    fn kind(&self) -> EventKind {
        EventKind::PositionDelta
    }

    fn apply(&self, line: &str) -> Result<Option<Reading>, ExtractionError> {
        let Some(caps) = self.pattern.captures(line) else {
            return Ok(None);
        };
        let coordinate = |field: &'static str| parse_decimal(self.name(), field, capture(&caps, field));
        Ok(Some(Reading::Delta {
            from: PlanarPoint::new(coordinate("from_x")?, coordinate("from_y")?),
            to: PlanarPoint::new(coordinate("to_x")?, coordinate("to_y")?),
        }))
    }
}
