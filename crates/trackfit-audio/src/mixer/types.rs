//! Core types for track mixing.

use crate::track::{Timeline, Track};

/// A track paired with a linear gain.
#[derive(Debug, Clone)]
pub struct GainSpec {
    /// Source track.
    pub track: Track,
    /// Linear gain (0.0 and up; conventionally at most 2.0).
    pub volume: f64,
}

impl GainSpec {
    /// Creates a gain spec. Negative and NaN volumes are clamped to silence.
    pub fn new(track: Track, volume: f64) -> Self {
        Self {
            track,
            volume: volume.max(0.0),
        }
    }

    /// Creates a gain spec at unity gain.
    pub fn unity(track: Track) -> Self {
        Self::new(track, 1.0)
    }

    /// Returns the same gain applied to a different track.
    pub fn with_track(&self, track: Track) -> Self {
        Self {
            track,
            volume: self.volume,
        }
    }

    /// Duration of the underlying track in seconds.
    pub fn duration(&self) -> f64 {
        self.track.duration()
    }
}

/// Output from the mixer.
#[derive(Debug, Clone)]
pub struct MixOutput {
    /// The mixed track.
    pub track: Track,
    /// Uniform scale applied after summing (1.0 when no rescale was needed).
    pub scale: f64,
}
