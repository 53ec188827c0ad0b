//! Duration normalization: force a filler track to an exact target length.
//!
//! Overlong fillers are cut at the target, underlong fillers are restarted
//! from time zero as many times as needed and the final repeat is truncated.
//! Policy is decided in frame space so that sub-sample jitter from upstream
//! decoders cannot flip a filler between trimming and looping.

mod fade;


use std::fmt;

use crate::error::{AudioError, AudioResult};
use crate::track::{frames_for, Timeline, Track};

pub use fade::fade_out;

/// Tolerance used when two already-normalized durations are compared.
pub const DURATION_EPSILON: f64 = 1e-3;

/// Durations closer than this are considered identical.
pub const EXACT_EPSILON: f64 = 1e-6;

/// How a filler was brought to the target duration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Policy {
    /// The filler already matched and was returned untouched.
    Exact,
    /// The filler was longer and its prefix was kept.
    Trimmed,
    /// The filler was shorter and was concatenated with itself.
    Looped,
}

impl Policy {
    /// Returns the string representation for reports.
    pub fn as_str(&self) -> &'static str {
        match self {
            Policy::Exact => "exact",
            Policy::Trimmed => "trimmed",
            Policy::Looped => "looped",
        }
    }
}

impl fmt::Display for Policy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Optional behavior on top of the hard-cut default.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NormalizeOptions {
    /// Linear fade applied to the tail of a trimmed filler, in seconds.
    ///
    /// `None` keeps the hard cut. Looped and exact fillers are never faded.
    pub fade_out_seconds: Option<f64>,
}

impl NormalizeOptions {
    /// Options with a fade-out on trimmed fillers.
    pub fn with_fade_out(seconds: f64) -> Self {
        Self {
            fade_out_seconds: Some(seconds),
        }
    }
}

/// A filler brought to its target duration.
#[derive(Debug, Clone)]
pub struct NormalizeOutcome {
    /// The normalized track.
    pub track: Track,
    /// The policy that was applied.
    pub policy: Policy,
    /// Number of copies of the filler that make up the result.
    pub repeats: u32,
}

/// Normalizes `filler` to `target_duration` seconds with a hard cut.
pub fn normalize_duration(filler: &Track, target_duration: f64) -> AudioResult<NormalizeOutcome> {
    normalize_duration_with(filler, target_duration, &NormalizeOptions::default())
}

/// Normalizes `filler` to `target_duration` seconds.
///
/// # Errors
/// Returns [`AudioError::InvalidDuration`] if the filler is empty or the
/// target is negative or not finite.
pub fn normalize_duration_with(
    filler: &Track,
    target_duration: f64,
    options: &NormalizeOptions,
) -> AudioResult<NormalizeOutcome> {
    if !target_duration.is_finite() || target_duration < 0.0 {
        return Err(AudioError::InvalidDuration {
            duration: target_duration,
        });
    }
    let source_duration = filler.duration();
    if source_duration <= 0.0 {
        return Err(AudioError::InvalidDuration {
            duration: source_duration,
        });
    }

    let source_frames = filler.frames();
    let target_frames = frames_for(target_duration, filler.sample_rate());

    if (source_duration - target_duration).abs() <= EXACT_EPSILON || source_frames == target_frames
    {
        return Ok(NormalizeOutcome {
            track: filler.clone(),
            policy: Policy::Exact,
            repeats: 1,
        });
    }

    if source_frames > target_frames {
        let mut track = filler.slice_frames(0, target_frames);
        if let Some(seconds) = options.fade_out_seconds {
            track = fade_out(&track, seconds)?;
        }
        return Ok(NormalizeOutcome {
            track,
            policy: Policy::Trimmed,
            repeats: 1,
        });
    }

    let (track, repeats) = loop_to_frames(filler, target_frames)?;
    Ok(NormalizeOutcome {
        track,
        policy: Policy::Looped,
        repeats,
    })
}

/// Number of full or partial copies needed to cover `target_frames`.
pub fn loop_repeats(source_frames: usize, target_frames: usize) -> u32 {
    if source_frames == 0 {
        return 0;
    }
    target_frames.div_ceil(source_frames) as u32
}

/// Concatenates copies of `source` from frame zero until `target_frames` is reached.
fn loop_to_frames(source: &Track, target_frames: usize) -> AudioResult<(Track, u32)> {
    let channels: Vec<Vec<f32>> = source
        .channels()
        .iter()
        .map(|src| {
            let mut out = Vec::with_capacity(target_frames);
            while out.len() < target_frames {
                let take = (target_frames - out.len()).min(src.len());
                out.extend_from_slice(&src[..take]);
            }
            out
        })
        .collect();

    let track = Track::new(source.sample_rate(), channels)?;
    Ok((track, loop_repeats(source.frames(), target_frames)))
}
