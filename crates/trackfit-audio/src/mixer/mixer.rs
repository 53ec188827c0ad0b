//! Mixer for combining gain-adjusted tracks of equal length.

use crate::error::{AudioError, AudioResult};
use crate::normalize::DURATION_EPSILON;
use crate::track::{Timeline, Track};

use super::processing::headroom_scale;
use super::types::{GainSpec, MixOutput};

/// Mixer accumulating gain specs in order.
#[derive(Debug, Default)]
pub struct Mixer {
    /// Accumulated tracks, in mix order.
    specs: Vec<GainSpec>,
}

impl Mixer {
    /// Creates an empty mixer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a gain spec to the mix.
    pub fn add(&mut self, spec: GainSpec) {
        self.specs.push(spec);
    }

    /// Adds a track at the given gain.
    pub fn add_track(&mut self, track: Track, volume: f64) {
        self.add(GainSpec::new(track, volume));
    }

    /// Number of tracks in the mix.
    pub fn len(&self) -> usize {
        self.specs.len()
    }

    /// Returns true if nothing has been added.
    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }

    /// Mixes all tracks.
    pub fn mix(&self) -> AudioResult<MixOutput> {
        mix(&self.specs)
    }
}

/// Checks that every spec matches the first one in format and duration.
///
/// # Errors
/// [`AudioError::EmptyMix`] for an empty slice, otherwise the first
/// [`AudioError::FormatMismatch`] or [`AudioError::DurationMismatch`] found,
/// naming the index of the offending spec.
pub fn validate(specs: &[GainSpec]) -> AudioResult<()> {
    let first = specs.first().ok_or(AudioError::EmptyMix)?;
    let expected_rate = first.track.sample_rate();
    let expected_channels = first.track.channel_count();
    let expected = first.duration();

    for (index, spec) in specs.iter().enumerate().skip(1) {
        let found_rate = spec.track.sample_rate();
        let found_channels = spec.track.channel_count();
        if found_rate != expected_rate || found_channels != expected_channels {
            return Err(AudioError::FormatMismatch {
                index,
                expected_rate,
                found_rate,
                expected_channels,
                found_channels,
            });
        }

        let found = spec.duration();
        if (found - expected).abs() > DURATION_EPSILON {
            return Err(AudioError::DurationMismatch {
                index,
                expected,
                found,
            });
        }
    }

    Ok(())
}

/// Sums `sample * gain` over all specs, then rescales if the gains could clip.
///
/// The output takes its rate, channel layout and frame count from the first
/// spec. A track that is shorter by less than the duration tolerance
/// contributes silence for its missing frames.
pub fn mix(specs: &[GainSpec]) -> AudioResult<MixOutput> {
    validate(specs)?;

    let first = &specs[0].track;
    let frames = first.frames();
    let channel_count = first.channel_count() as usize;
    let mut acc = vec![vec![0.0f64; frames]; channel_count];

    for spec in specs {
        for (out, src) in acc.iter_mut().zip(spec.track.channels()) {
            for (o, &s) in out.iter_mut().zip(src.iter()) {
                *o += s as f64 * spec.volume;
            }
        }
    }

    let scale = headroom_scale(specs);
    let channels: Vec<Vec<f32>> = acc
        .into_iter()
        .map(|c| c.into_iter().map(|s| (s * scale) as f32).collect())
        .collect();

    Ok(MixOutput {
        track: Track::new(first.sample_rate(), channels)?,
        scale,
    })
}
