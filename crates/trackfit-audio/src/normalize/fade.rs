//! Linear fade-out for trimmed fillers.

use crate::error::{AudioError, AudioResult};
use crate::track::{frames_for, Timeline, Track};

/// Applies a linear fade to the last `seconds` of `track`.
///
/// The fade reaches exactly zero on the final frame. A fade longer than the
/// track covers the whole track.
pub fn fade_out(track: &Track, seconds: f64) -> AudioResult<Track> {
    if !seconds.is_finite() || seconds < 0.0 {
        return Err(AudioError::invalid_param(
            "fade_out_seconds",
            format!("must be a non-negative number of seconds, got {}", seconds),
        ));
    }

    let frames = track.frames();
    let fade_frames = frames_for(seconds, track.sample_rate()).min(frames);
    if fade_frames == 0 {
        return Ok(track.clone());
    }

    let fade_start = frames - fade_frames;
    let channels: Vec<Vec<f32>> = track
        .channels()
        .iter()
        .map(|src| {
            let mut out = src.clone();
            for (k, sample) in out[fade_start..].iter_mut().enumerate() {
                let gain = 1.0 - (k + 1) as f64 / fade_frames as f64;
                *sample = (*sample as f64 * gain) as f32;
            }
            out
        })
        .collect();

    Track::new(track.sample_rate(), channels)
}
