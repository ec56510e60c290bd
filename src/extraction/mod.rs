//! Pattern Registry
//!
//! An ordered list of extraction rules applied to each timestamped line.
//! Rules are tried in priority order and the first one that applies wins;
//! a line no rule applies to is ignored. The patterns are not mutually
//! exclusive, so the order is part of the output contract:
//!
//! 1. drone attitude
//! 2. target attitude (synchronization pulse)
//! 3. headset attitude
//! 4. expected attitude

pub mod normalize;
pub mod rules;

pub use rules::{ExtractionRule, Reading};

use thiserror::Error;

use crate::types::{AttitudeEvent, EventKind, LogTimestamp, PositionDeltaEvent};

/// Extraction errors
#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("Invalid extraction pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("Rule '{rule}' captured unconvertible {field} value '{value}'")]
    FieldConversion {
        rule: &'static str,
        field: &'static str,
        value: String,
    },
}

/// A classified, timestamped event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Extracted {
    Attitude(AttitudeEvent),
    Position(PositionDeltaEvent),
}

impl Extracted {
    pub const fn kind(&self) -> EventKind {
        match self {
            Self::Attitude(event) => event.kind,
            Self::Position(_) => EventKind::PositionDelta,
        }
    }
}

/// Ordered set of extraction rules.
pub struct RuleRegistry {
    rules: Vec<Box<dyn ExtractionRule>>,
}

impl RuleRegistry {
    /// Build a registry from rules already in priority order.
    pub fn from_rules(rules: Vec<Box<dyn ExtractionRule>>) -> Self {
        Self { rules }
    }

    /// The four attitude rules in their fixed precedence order.
    pub fn attitude() -> Result<Self, ExtractionError> {
        Ok(Self::from_rules(vec![
            rules::drone_attitude_rule()?,
            rules::target_attitude_rule()?,
            Box::new(rules::HeadsetAttitudeRule::new()?),
            rules::expected_attitude_rule()?,
        ]))
    }

    /// The position-delta variant: a single rule, no reconciliation.
    pub fn position_delta() -> Result<Self, ExtractionError> {
        Ok(Self::from_rules(vec![Box::new(
            rules::PositionDeltaRule::new()?,
        )]))
    }

    pub fn rule_names(&self) -> Vec<&'static str> {
        self.rules.iter().map(|r| r.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Classify one line. Only the first applicable rule runs; a conversion
    /// failure in that rule is returned and never falls through to later rules.
    pub fn classify(
        &self,
        line: &str,
        timestamp: LogTimestamp,
    ) -> Result<Option<Extracted>, ExtractionError> {
        for rule in &self.rules {
            let Some(reading) = rule.apply(line)? else {
                continue;
            };
            let extracted = match reading {
                Reading::Degrees(degrees) => {
                    Extracted::Attitude(AttitudeEvent::new(rule.kind(), degrees, timestamp))
                }
                Reading::Delta { from, to } => Extracted::Position(PositionDeltaEvent {
                    from,
                    to,
                    timestamp,
                }),
            };
            tracing::trace!(rule = rule.name(), kind = %extracted.kind(), "Line classified");
            return Ok(Some(extracted));
        }
        Ok(None)
    }
}

impl std::fmt::Debug for RuleRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RuleRegistry")
            .field("rules", &self.rule_names())
            .finish()
    }
}
