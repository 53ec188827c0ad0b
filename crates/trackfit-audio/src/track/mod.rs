//! Immutable audio track handles.
//!
//! A [`Track`] holds planar `f32` samples behind an `Arc`, so cloning a track
//! never copies audio and a track can be shared freely across threads. Every
//! operation in this crate returns a new track instead of mutating its input.

mod lead;


use std::sync::Arc;

use crate::error::{AudioError, AudioResult};

pub use lead::LeadSpec;

/// Anything with a known duration and output format.
///
/// The reconciler only needs these three values from its lead, which lets a
/// video (whose duration comes from an external prober) stand in for a track.
pub trait Timeline {
    /// Duration in seconds.
    fn duration(&self) -> f64;
    /// Sample rate in Hz.
    fn sample_rate(&self) -> u32;
    /// Number of channels.
    fn channel_count(&self) -> u16;
}

/// Number of whole frames covering `duration` seconds at `sample_rate`.
pub fn frames_for(duration: f64, sample_rate: u32) -> usize {
    if !duration.is_finite() || duration <= 0.0 {
        return 0;
    }
    (duration * sample_rate as f64).round() as usize
}

/// An immutable sequence of audio frames.
#[derive(Debug, Clone)]
pub struct Track {
    sample_rate: u32,
    channels: Arc<[Vec<f32>]>,
}

impl Track {
    /// Creates a track from planar channel data.
    ///
    /// Every channel must hold the same number of frames.
    pub fn new(sample_rate: u32, channels: Vec<Vec<f32>>) -> AudioResult<Self> {
        if sample_rate == 0 {
            return Err(AudioError::InvalidSampleRate { rate: sample_rate });
        }
        if channels.is_empty() {
            return Err(AudioError::invalid_param(
                "channels",
                "a track needs at least one channel",
            ));
        }
        if channels.len() > u16::MAX as usize {
            return Err(AudioError::invalid_param(
                "channels",
                format!("{} channels is more than supported", channels.len()),
            ));
        }
        let frames = channels[0].len();
        if let Some(pos) = channels.iter().position(|c| c.len() != frames) {
            return Err(AudioError::invalid_param(
                "channels",
                format!(
                    "channel {} has {} frames, channel 0 has {}",
                    pos,
                    channels[pos].len(),
                    frames
                ),
            ));
        }

        Ok(Self {
            sample_rate,
            channels: channels.into(),
        })
    }

    /// Creates a single-channel track.
    pub fn mono(sample_rate: u32, samples: Vec<f32>) -> AudioResult<Self> {
        Self::new(sample_rate, vec![samples])
    }

    /// Creates a two-channel track.
    pub fn stereo(sample_rate: u32, left: Vec<f32>, right: Vec<f32>) -> AudioResult<Self> {
        Self::new(sample_rate, vec![left, right])
    }

    /// Creates a silent track lasting `duration` seconds.
    pub fn silence(duration: f64, sample_rate: u32, channels: u16) -> AudioResult<Self> {
        if !duration.is_finite() || duration < 0.0 {
            return Err(AudioError::InvalidDuration { duration });
        }
        if channels == 0 {
            return Err(AudioError::invalid_param(
                "channels",
                "a track needs at least one channel",
            ));
        }
        let frames = frames_for(duration, sample_rate);
        Self::new(sample_rate, vec![vec![0.0; frames]; channels as usize])
    }

    /// Creates a track from interleaved samples.
    pub fn from_interleaved(sample_rate: u32, channels: u16, samples: &[f32]) -> AudioResult<Self> {
        if channels == 0 {
            return Err(AudioError::invalid_param(
                "channels",
                "a track needs at least one channel",
            ));
        }
        let count = channels as usize;
        let frames = samples.len() / count;
        let mut planar = vec![Vec::with_capacity(frames); count];
        for frame in samples.chunks_exact(count) {
            for (channel, &sample) in planar.iter_mut().zip(frame) {
                channel.push(sample);
            }
        }
        Self::new(sample_rate, planar)
    }

    /// Number of frames (samples per channel).
    pub fn frames(&self) -> usize {
        self.channels[0].len()
    }

    /// Planar sample data, one slice per channel.
    pub fn channels(&self) -> &[Vec<f32>] {
        &self.channels
    }

    /// Samples of a single channel.
    pub fn channel(&self, index: usize) -> Option<&[f32]> {
        self.channels.get(index).map(Vec::as_slice)
    }

    /// Interleaves all channels into one buffer (`[L0, R0, L1, R1, ...]`).
    pub fn interleaved(&self) -> Vec<f32> {
        let count = self.channels.len();
        let mut out = Vec::with_capacity(self.frames() * count);
        for frame in 0..self.frames() {
            for channel in self.channels.iter() {
                out.push(channel[frame]);
            }
        }
        out
    }

    /// Returns the sub-track covering frames `[start, end)`.
    ///
    /// Bounds are clamped to the track length.
    pub fn slice_frames(&self, start: usize, end: usize) -> Track {
        let end = end.min(self.frames());
        let start = start.min(end);
        let channels: Vec<Vec<f32>> = self
            .channels
            .iter()
            .map(|c| c[start..end].to_vec())
            .collect();
        Track {
            sample_rate: self.sample_rate,
            channels: channels.into(),
        }
    }

    /// Returns the sub-track covering `[start, end)` in seconds.
    pub fn slice_seconds(&self, start: f64, end: f64) -> Track {
        self.slice_frames(
            frames_for(start, self.sample_rate),
            frames_for(end, self.sample_rate),
        )
    }

    /// Maximum absolute sample value across all channels.
    pub fn peak(&self) -> f32 {
        self.channels
            .iter()
            .flat_map(|c| c.iter())
            .map(|s| s.abs())
            .fold(0.0f32, f32::max)
    }

    /// Returns true when both tracks point at the same sample buffer.
    pub fn shares_samples(&self, other: &Track) -> bool {
        Arc::ptr_eq(&self.channels, &other.channels)
    }
}

impl Timeline for Track {
    fn duration(&self) -> f64 {
        self.frames() as f64 / self.sample_rate as f64
    }

    fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    fn channel_count(&self) -> u16 {
        self.channels.len() as u16
    }
}

impl PartialEq for Track {
    fn eq(&self, other: &Self) -> bool {
        self.sample_rate == other.sample_rate && self.channels == other.channels
    }
}
