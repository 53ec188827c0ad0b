//! Channel layout conversion.

use crate::error::{AudioError, AudioResult};
use crate::track::{Timeline, Track};

/// Converts `track` to `channels` channels.
///
/// Mono is duplicated onto every output channel. Anything else folded down to
/// mono is averaged. Other conversions keep the first `channels` channels, or
/// repeat the last one to fill extra outputs. A track that already has the
/// requested layout is returned as-is.
pub fn convert_channels(track: &Track, channels: u16) -> AudioResult<Track> {
    if channels == 0 {
        return Err(AudioError::invalid_param(
            "channels",
            "cannot convert to zero channels",
        ));
    }
    let current = track.channel_count();
    if current == channels {
        return Ok(track.clone());
    }

    let src = track.channels();
    let out: Vec<Vec<f32>> = if current == 1 {
        vec![src[0].clone(); channels as usize]
    } else if channels == 1 {
        let scale = 1.0 / current as f32;
        let mono = (0..track.frames())
            .map(|i| src.iter().map(|c| c[i]).sum::<f32>() * scale)
            .collect();
        vec![mono]
    } else {
        (0..channels as usize)
            .map(|i| src[i.min(src.len() - 1)].clone())
            .collect()
    };

    Track::new(track.sample_rate(), out)
}
