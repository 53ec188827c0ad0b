//! Multi-track mixing with independent gain and clipping-safe rescaling.
//!
//! All tracks in a mix must already share duration, sample rate and channel
//! layout. The mixer sums gain-weighted samples and, when the gains add up to
//! more than full scale, scales the whole result down uniformly.

#[allow(clippy::module_inception)]
mod mixer;
mod processing;
mod types;

#[cfg(test)]
mod tests_mixing;
#[cfg(test)]
mod tests_peak_safety;
#[cfg(test)]
mod tests_validation;

// Re-export public API
pub use mixer::{mix, validate, Mixer};
pub use processing::{headroom_scale, peak_gain, FULL_SCALE};
pub use types::{GainSpec, MixOutput};
