//! Decoding media files into tracks.

use std::fs::File;
use std::io::{Cursor, Read};
use std::path::Path;

use symphonia::core::audio::{AudioBufferRef, SampleBuffer, Signal};
use symphonia::core::codecs::DecoderOptions;
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::{MediaSource, MediaSourceStream};
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;
use tracing::debug;

use crate::error::{AudioError, AudioResult};
use crate::track::{Timeline, Track};

/// Extensions read directly with the WAV reader.
pub const WAV_EXTENSIONS: &[&str] = &["wav", "wave"];

/// Extensions handed to the general-purpose decoder.
pub const COMPRESSED_EXTENSIONS: &[&str] = &["mp3", "flac", "ogg", "oga", "m4a", "aac", "aif", "aiff"];

/// Returns true if the path has an extension this module can decode.
pub fn is_supported(path: &Path) -> bool {
    extension(path)
        .map(|ext| {
            WAV_EXTENSIONS.contains(&ext.as_str()) || COMPRESSED_EXTENSIONS.contains(&ext.as_str())
        })
        .unwrap_or(false)
}

fn extension(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
}

/// Decodes an audio file into a track.
///
/// WAV files go through the WAV reader; everything else is probed by content
/// with the extension as a hint.
pub fn decode_path(path: &Path) -> AudioResult<Track> {
    let is_wav = extension(path)
        .map(|ext| WAV_EXTENSIONS.contains(&ext.as_str()))
        .unwrap_or(false);

    let track = if is_wav {
        decode_wav_reader(File::open(path)?)?
    } else {
        decode_media(File::open(path)?, extension(path).as_deref())?
    };

    debug!(
        path = %path.display(),
        duration = track.duration(),
        sample_rate = track.sample_rate(),
        channels = track.channel_count(),
        "decoded track"
    );
    Ok(track)
}

/// Decodes WAV bytes held in memory.
pub fn decode_wav_bytes(bytes: &[u8]) -> AudioResult<Track> {
    decode_wav_reader(Cursor::new(bytes))
}

/// Decodes a WAV stream, normalizing integer samples to [-1.0, 1.0].
pub fn decode_wav_reader<R: Read>(reader: R) -> AudioResult<Track> {
    let reader = hound::WavReader::new(reader)?;
    let spec = reader.spec();

    let samples: Vec<f32> = match spec.sample_format {
        hound::SampleFormat::Int => {
            let max_val = (1i64 << (spec.bits_per_sample - 1)) as f32;
            reader
                .into_samples::<i32>()
                .map(|s| s.map(|v| v as f32 / max_val))
                .collect::<Result<_, _>>()?
        }
        hound::SampleFormat::Float => reader.into_samples::<f32>().collect::<Result<_, _>>()?,
    };

    Track::from_interleaved(spec.sample_rate, spec.channels, &samples)
}

/// Decodes any container/codec pair the general-purpose decoder understands.
pub fn decode_media<S>(source: S, extension_hint: Option<&str>) -> AudioResult<Track>
where
    S: MediaSource + 'static,
{
    let mss = MediaSourceStream::new(Box::new(source), Default::default());
    let mut hint = Hint::new();
    if let Some(ext) = extension_hint {
        hint.with_extension(ext);
    }

    let probed = symphonia::default::get_probe().format(
        &hint,
        mss,
        &FormatOptions::default(),
        &MetadataOptions::default(),
    )?;

    let mut format = probed.format;
    let (codec_params, track_id) = {
        let track = format.default_track().ok_or(AudioError::NoAudioTrack)?;
        (track.codec_params.clone(), track.id)
    };

    let mut decoder =
        symphonia::default::get_codecs().make(&codec_params, &DecoderOptions::default())?;

    let mut sample_rate = codec_params.sample_rate;
    let mut channel_data: Vec<Vec<f32>> = codec_params
        .channels
        .map(|c| vec![Vec::new(); c.count()])
        .unwrap_or_default();
    let mut sample_buffer: Option<SampleBuffer<f32>> = None;

    loop {
        let packet = match format.next_packet() {
            Ok(packet) => packet,
            Err(SymphoniaError::IoError(e)) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
                break
            }
            Err(e) => return Err(e.into()),
        };
        if packet.track_id() != track_id {
            continue;
        }

        let decoded = match decoder.decode(&packet) {
            Ok(decoded) => decoded,
            Err(SymphoniaError::DecodeError(msg)) => {
                debug!(reason = msg, "skipping undecodable packet");
                continue;
            }
            Err(e) => return Err(e.into()),
        };

        let spec = *decoded.spec();
        sample_rate.get_or_insert(spec.rate);
        let channel_count = spec.channels.count();
        if channel_data.is_empty() {
            channel_data = vec![Vec::new(); channel_count];
        }

        match decoded {
            AudioBufferRef::F32(buffer) => {
                for (index, channel) in channel_data.iter_mut().enumerate().take(channel_count) {
                    channel.extend_from_slice(buffer.chan(index));
                }
            }
            other => {
                let buf = sample_buffer.get_or_insert_with(|| {
                    SampleBuffer::<f32>::new(other.capacity() as u64, *other.spec())
                });
                buf.copy_interleaved_ref(other);
                let samples = buf.samples();
                for (index, channel) in channel_data.iter_mut().enumerate().take(channel_count) {
                    channel.extend(samples[index..].iter().step_by(channel_count).copied());
                }
            }
        }
    }

    let sample_rate = sample_rate.ok_or(AudioError::NoAudioTrack)?;
    if channel_data.is_empty() {
        return Err(AudioError::NoAudioTrack);
    }
    Track::new(sample_rate, channel_data)
}
