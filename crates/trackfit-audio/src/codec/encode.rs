//! Writing tracks as WAV files.

use std::io::{Cursor, Seek, Write};
use std::path::Path;

use tracing::debug;

use crate::error::AudioResult;
use crate::track::{Timeline, Track};

/// Sample encoding of written WAV files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SampleEncoding {
    /// 16-bit signed PCM, clipped to [-1.0, 1.0].
    #[default]
    Pcm16,
    /// 32-bit IEEE float, written unclipped.
    Float32,
}

impl SampleEncoding {
    /// Parses an encoding name (`pcm16` or `float32`).
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "pcm16" | "pcm" | "s16" => Some(Self::Pcm16),
            "float32" | "float" | "f32" => Some(Self::Float32),
            _ => None,
        }
    }

    /// Returns the string representation for reports.
    pub fn as_str(&self) -> &'static str {
        match self {
            SampleEncoding::Pcm16 => "pcm16",
            SampleEncoding::Float32 => "float32",
        }
    }

    fn wav_spec(&self, track: &Track) -> hound::WavSpec {
        let (bits_per_sample, sample_format) = match self {
            SampleEncoding::Pcm16 => (16, hound::SampleFormat::Int),
            SampleEncoding::Float32 => (32, hound::SampleFormat::Float),
        };
        hound::WavSpec {
            channels: track.channel_count(),
            sample_rate: track.sample_rate(),
            bits_per_sample,
            sample_format,
        }
    }
}

/// Converts a sample to 16-bit PCM, clipping to full scale.
#[inline]
pub fn sample_to_pcm16(sample: f32) -> i16 {
    (sample.clamp(-1.0, 1.0) * 32767.0).round() as i16
}

/// Writes `track` as a WAV file at `path`.
pub fn encode_wav(track: &Track, path: &Path, encoding: SampleEncoding) -> AudioResult<()> {
    let writer = hound::WavWriter::create(path, encoding.wav_spec(track))?;
    write_frames(writer, track, encoding)?;
    debug!(
        path = %path.display(),
        duration = track.duration(),
        encoding = encoding.as_str(),
        "encoded track"
    );
    Ok(())
}

/// Writes `track` as WAV bytes.
pub fn encode_wav_to_vec(track: &Track, encoding: SampleEncoding) -> AudioResult<Vec<u8>> {
    let mut cursor = Cursor::new(Vec::new());
    let writer = hound::WavWriter::new(&mut cursor, encoding.wav_spec(track))?;
    write_frames(writer, track, encoding)?;
    Ok(cursor.into_inner())
}

fn write_frames<W: Write + Seek>(
    mut writer: hound::WavWriter<W>,
    track: &Track,
    encoding: SampleEncoding,
) -> AudioResult<()> {
    for frame in 0..track.frames() {
        for channel in track.channels() {
            match encoding {
                SampleEncoding::Pcm16 => writer.write_sample(sample_to_pcm16(channel[frame]))?,
                SampleEncoding::Float32 => writer.write_sample(channel[frame])?,
            }
        }
    }
    writer.finalize()?;
    Ok(())
}

/// BLAKE3 hash of the 16-bit PCM rendering of a track.
///
/// Two tracks that would produce identical 16-bit WAV data share a hash.
pub fn pcm_hash(track: &Track) -> String {
    let mut hasher = blake3::Hasher::new();
    for frame in 0..track.frames() {
        for channel in track.channels() {
            hasher.update(&sample_to_pcm16(channel[frame]).to_le_bytes());
        }
    }
    hasher.finalize().to_hex().to_string()
}
