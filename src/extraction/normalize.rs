//! Field Normalizer
//!
//! Converts captured substrings into typed values. The two angle conventions
//! are kept as separate functions: truncation for drone/target/expected yaw,
//! modulo wrap for headset rotation relative to its benchmark.

use super::ExtractionError;

/// Parse a captured decimal field. Surrounding whitespace is ignored;
/// anything else that is not a finite number is a conversion error.
pub fn parse_decimal(
    rule: &'static str,
    field: &'static str,
    raw: &str,
) -> Result<f64, ExtractionError> {
    let conversion_error = || ExtractionError::FieldConversion {
        rule,
        field,
        value: raw.to_string(),
    };
    let value: f64 = raw.trim().parse().map_err(|_| conversion_error())?;
    if value.is_finite() {
        Ok(value)
    } else {
        Err(conversion_error())
    }
}

/// Truncate toward zero into integer degrees (drone, target and expected yaw).
///
/// `None` when the truncated value does not fit in an `i32`.
#[allow(clippy::cast_possible_truncation)]
pub fn truncate_degrees(value: f64) -> Option<i32> {
    let truncated = value.trunc();
    (f64::from(i32::MIN)..=f64::from(i32::MAX))
        .contains(&truncated)
        .then_some(truncated as i32)
}

/// Headset rotation since benchmark: `((current - benchmark + 360) mod 360) - 180`.
///
/// Uses the Euclidean remainder so the result is in [-180, 180) for any
/// finite input, then truncates toward zero.
#[allow(clippy::cast_possible_truncation)]
pub fn headset_relative_degrees(benchmark: f64, current: f64) -> i32 {
    let raw = current - benchmark;
    let mut wrapped = (raw + 360.0).rem_euclid(360.0) - 180.0;
    // rem_euclid may round up to the modulus for tiny negative inputs
    if wrapped >= 180.0 {
        wrapped -= 360.0;
    }
    wrapped.trunc() as i32
}

/// Wrap an integer degree difference into [-180, 180).
///
/// Takes `i64` so the difference of any two `i32` readings is representable.
#[allow(clippy::cast_possible_truncation)]
pub const fn wrap_signed_degrees(degrees: i64) -> i32 {
    ((degrees + 180).rem_euclid(360) - 180) as i32
}
