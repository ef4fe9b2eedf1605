//! Count estimation from area and density.
//!
//! `count = round(area × density × reference_factor)` with round-half-up:
//! a fractional part of exactly .5 always rounds to the next integer.
//! Inputs are non-negative, so this matches rounding half away from zero.
//! Counts that do not fit in a `u64` are rejected.

use crate::error::{MeasureError, MeasureResult, ensure_non_negative};

/// Reference factor meaning "no correction".
pub const NO_REFERENCE_CORRECTION: f64 = 1.0;

/// Estimate a whole count for an area at a given density.
///
/// `reference_factor` corrects for known systematic bias, such as a
/// calibration photo taken at a different distance than the treatment area.
pub fn estimate_count(area_physical: f64, density: f64, reference_factor: f64) -> MeasureResult<u64> {
    let area = ensure_non_negative("physical area", area_physical)?;
    let density = ensure_non_negative("density", density)?;
    let factor = ensure_non_negative("reference factor", reference_factor)?;

    let raw = area * density * factor;
    if !raw.is_finite() {
        return Err(MeasureError::invalid_parameter("count", raw));
    }
    round_half_up(raw)
}

/// Round a non-negative value, sending exact halves upward.
///
/// `f64::round` rounds halves away from zero, which is upward here. Adding
/// 0.5 and flooring would misround values just below a half.
fn round_half_up(value: f64) -> MeasureResult<u64> {
    let rounded = value.round();
    if rounded >= u64::MAX as f64 {
        return Err(MeasureError::invalid_parameter("count", rounded));
    }
    Ok(rounded as u64)
}
