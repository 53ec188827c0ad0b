//! Sample rate conversion.

use crate::error::{AudioError, AudioResult};
use crate::track::{frames_for, Timeline, Track};

/// Resamples `track` to `to_rate` with linear interpolation.
///
/// The output has `round(duration * to_rate)` frames, so the duration is kept
/// to within one output frame. A track already at `to_rate` is returned as-is.
pub fn resample(track: &Track, to_rate: u32) -> AudioResult<Track> {
    if to_rate == 0 {
        return Err(AudioError::InvalidSampleRate { rate: to_rate });
    }
    let from_rate = track.sample_rate();
    if from_rate == to_rate {
        return Ok(track.clone());
    }

    let frames = frames_for(track.duration(), to_rate);
    let ratio = from_rate as f64 / to_rate as f64;
    let channels = track
        .channels()
        .iter()
        .map(|samples| resample_linear(samples, ratio, frames))
        .collect();

    Track::new(to_rate, channels)
}

fn resample_linear(samples: &[f32], ratio: f64, frames: usize) -> Vec<f32> {
    let Some(&last) = samples.last() else {
        return vec![0.0; frames];
    };

    (0..frames)
        .map(|i| {
            let pos = i as f64 * ratio;
            let idx = pos.floor() as usize;
            if idx + 1 < samples.len() {
                let frac = (pos - idx as f64) as f32;
                samples[idx] * (1.0 - frac) + samples[idx + 1] * frac
            } else {
                last
            }
        })
        .collect()
}
