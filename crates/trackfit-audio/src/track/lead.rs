//! Sample-less lead descriptions.

use super::Timeline;
use crate::error::{AudioError, AudioResult};

/// Duration and output format of a lead whose samples are not needed.
///
/// Used when the lead is a rendered video: only its length matters, and the
/// rate/channels decide the shape of silence when there is nothing to mix.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LeadSpec {
    duration: f64,
    sample_rate: u32,
    channels: u16,
}

impl LeadSpec {
    /// Creates a lead description.
    pub fn new(duration: f64, sample_rate: u32, channels: u16) -> AudioResult<Self> {
        if !duration.is_finite() || duration < 0.0 {
            return Err(AudioError::InvalidDuration { duration });
        }
        if sample_rate == 0 {
            return Err(AudioError::InvalidSampleRate { rate: sample_rate });
        }
        if channels == 0 {
            return Err(AudioError::invalid_param(
                "channels",
                "a lead needs at least one channel",
            ));
        }
        Ok(Self {
            duration,
            sample_rate,
            channels,
        })
    }

    /// Captures the timeline of any other lead.
    pub fn of<T: Timeline + ?Sized>(timeline: &T) -> Self {
        Self {
            duration: timeline.duration(),
            sample_rate: timeline.sample_rate(),
            channels: timeline.channel_count(),
        }
    }
}

impl Timeline for LeadSpec {
    fn duration(&self) -> f64 {
        self.duration
    }

    fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    fn channel_count(&self) -> u16 {
        self.channels
    }
}
