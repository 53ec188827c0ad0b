//! Gain bookkeeping for clipping-safe mixing.

use super::types::GainSpec;

/// Full-scale reference amplitude.
pub const FULL_SCALE: f64 = 1.0;

/// Worst-case peak of a mix of full-scale tracks: `max(1.0, sum of gains)`.
///
/// Only gains are inspected, never sample values.
pub fn peak_gain(specs: &[GainSpec]) -> f64 {
    let sum: f64 = specs.iter().map(|s| s.volume).sum();
    sum.max(FULL_SCALE)
}

/// Uniform scale that brings the worst-case peak of a mix back to full scale.
pub fn headroom_scale(specs: &[GainSpec]) -> f64 {
    FULL_SCALE / peak_gain(specs)
}
