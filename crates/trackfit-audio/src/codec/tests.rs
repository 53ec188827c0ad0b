//! Tests for the media I/O boundary.

use std::io::Cursor;
use std::path::Path;

use pretty_assertions::assert_eq;

use super::*;
use crate::error::AudioError;
use crate::track::{Timeline, Track};

// =========================================================================
// WAV encoding
// =========================================================================

#[test]
fn test_pcm16_header_and_size() {
    let track = Track::stereo(8000, vec![0.0; 100], vec![0.0; 100]).unwrap();
    let bytes = encode_wav_to_vec(&track, SampleEncoding::Pcm16).unwrap();

    assert_eq!(&bytes[0..4], b"RIFF");
    assert_eq!(&bytes[8..12], b"WAVE");
    // 44-byte header + 100 frames * 2 channels * 2 bytes
    assert_eq!(bytes.len(), 44 + 400);
}

#[test]
fn test_pcm16_decode_preserves_shape() {
    let left: Vec<f32> = (0..64).map(|i| (i as f32 / 64.0) - 0.5).collect();
    let right: Vec<f32> = left.iter().map(|s| -s).collect();
    let track = Track::stereo(22050, left, right).unwrap();

    let bytes = encode_wav_to_vec(&track, SampleEncoding::Pcm16).unwrap();
    let decoded = decode_wav_bytes(&bytes).unwrap();

    assert_eq!(decoded.sample_rate(), 22050);
    assert_eq!(decoded.channel_count(), 2);
    assert_eq!(decoded.frames(), 64);
    for (a, b) in decoded.channel(1).unwrap().iter().zip(track.channel(1).unwrap()) {
        assert!((a - b).abs() < 1.0 / 16384.0);
    }
}

#[test]
fn test_float32_is_lossless() {
    let track = Track::mono(48000, vec![0.123_456_7, -0.75, 1.5]).unwrap();
    let bytes = encode_wav_to_vec(&track, SampleEncoding::Float32).unwrap();
    let decoded = decode_wav_bytes(&bytes).unwrap();
    assert_eq!(decoded, track);
}

#[test]
fn test_pcm16_clips_out_of_range() {
    assert_eq!(sample_to_pcm16(2.0), 32767);
    assert_eq!(sample_to_pcm16(-2.0), -32767);
    assert_eq!(sample_to_pcm16(0.0), 0);
}

#[test]
fn test_encode_to_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out.wav");
    let track = Track::mono(1000, vec![0.25; 1500]).unwrap();

    encode_wav(&track, &path, SampleEncoding::Pcm16).unwrap();
    let decoded = decode_path(&path).unwrap();

    assert_eq!(decoded.frames(), 1500);
    assert!((decoded.duration() - 1.5).abs() < 1e-9);
}

#[test]
fn test_decode_garbage_wav_fails() {
    let err = decode_wav_bytes(b"definitely not a wav file").unwrap_err();
    assert!(matches!(err, AudioError::Wav(_)));
}

#[test]
fn test_decode_missing_file_is_io_error() {
    let err = decode_path(Path::new("/nonexistent/trackfit/narration.wav")).unwrap_err();
    assert!(matches!(err, AudioError::Io(_)));
}

#[test]
fn test_sample_encoding_names() {
    assert_eq!(SampleEncoding::from_name("PCM16"), Some(SampleEncoding::Pcm16));
    assert_eq!(SampleEncoding::from_name("float32"), Some(SampleEncoding::Float32));
    assert_eq!(SampleEncoding::from_name("mp3"), None);
    assert_eq!(SampleEncoding::default().as_str(), "pcm16");
}

#[test]
fn test_supported_extensions() {
    assert!(is_supported(Path::new("music/epic.MP3")));
    assert!(is_supported(Path::new("voice.wav")));
    assert!(!is_supported(Path::new("video.mp4")));
    assert!(!is_supported(Path::new("no_extension")));
}

// =========================================================================
// Hashing
// =========================================================================

#[test]
fn test_pcm_hash_is_stable_and_content_sensitive() {
    let a = Track::mono(100, vec![0.5; 100]).unwrap();
    let b = Track::mono(100, vec![0.5; 100]).unwrap();
    let c = Track::mono(100, vec![0.25; 100]).unwrap();

    assert_eq!(pcm_hash(&a), pcm_hash(&b));
    assert_ne!(pcm_hash(&a), pcm_hash(&c));
    assert_eq!(pcm_hash(&a).len(), 64);
}

// =========================================================================
// General-purpose decoding
// =========================================================================

#[test]
fn test_decode_media_deinterleaves_pcm16_stereo() {
    let left: Vec<f32> = (0..300).map(|i| (i as f32 / 300.0) - 0.5).collect();
    let right: Vec<f32> = left.iter().map(|s| -s * 0.5).collect();
    let track = Track::stereo(11025, left, right).unwrap();
    let bytes = encode_wav_to_vec(&track, SampleEncoding::Pcm16).unwrap();

    let decoded = decode_media(Cursor::new(bytes), Some("wav")).unwrap();

    assert_eq!(decoded.sample_rate(), 11025);
    assert_eq!(decoded.channel_count(), 2);
    assert_eq!(decoded.frames(), 300);
    for channel in 0..2 {
        let got = decoded.channel(channel).unwrap();
        let want = track.channel(channel).unwrap();
        for (a, b) in got.iter().zip(want) {
            assert!((a - b).abs() < 1.0 / 16384.0, "channel {channel}: {a} vs {b}");
        }
    }
}

#[test]
fn test_decode_media_reads_float32() {
    let track = Track::mono(8000, vec![0.25, -0.75, 0.5, 0.0, 1.0]).unwrap();
    let bytes = encode_wav_to_vec(&track, SampleEncoding::Float32).unwrap();

    let decoded = decode_media(Cursor::new(bytes), Some("wav")).unwrap();

    assert_eq!(decoded.sample_rate(), 8000);
    assert_eq!(decoded.channel_count(), 1);
    assert_eq!(decoded.channel(0).unwrap(), track.channel(0).unwrap());
}

#[test]
fn test_decode_media_rejects_unknown_container() {
    let result = decode_media(Cursor::new(vec![0u8; 256]), None);
    assert!(matches!(result, Err(AudioError::Decode(_))));
}

// =========================================================================
// Resampling
// =========================================================================

#[test]
fn test_resample_keeps_duration() {
    let track = Track::stereo(24000, vec![0.5; 24000], vec![-0.5; 24000]).unwrap();
    let resampled = resample(&track, 44100).unwrap();

    assert_eq!(resampled.sample_rate(), 44100);
    assert_eq!(resampled.channel_count(), 2);
    assert_eq!(resampled.frames(), 44100);
    assert!(resampled.channel(0).unwrap().iter().all(|s| (*s - 0.5).abs() < 1e-6));
    assert!(resampled.channel(1).unwrap().iter().all(|s| (*s + 0.5).abs() < 1e-6));
}

#[test]
fn test_resample_interpolates_linearly() {
    let track = Track::mono(2, vec![0.0, 1.0]).unwrap();
    let up = resample(&track, 4).unwrap();
    // positions 0.0, 0.5, then clamped to the last sample
    assert_eq!(up.channel(0).unwrap(), &[0.0, 0.5, 1.0, 1.0]);

    let ramp = Track::mono(4, vec![0.0, 0.25, 0.5, 0.75]).unwrap();
    let down = resample(&ramp, 2).unwrap();
    assert_eq!(down.channel(0).unwrap(), &[0.0, 0.5]);
}

#[test]
fn test_resample_same_rate_is_shared() {
    let track = Track::mono(1000, vec![0.1; 10]).unwrap();
    let same = resample(&track, 1000).unwrap();
    assert!(same.shares_samples(&track));
}

#[test]
fn test_resample_rejects_zero_rate() {
    let track = Track::mono(1000, vec![0.1; 10]).unwrap();
    assert!(matches!(
        resample(&track, 0),
        Err(AudioError::InvalidSampleRate { rate: 0 })
    ));
}

// =========================================================================
// Channel conversion
// =========================================================================

#[test]
fn test_mono_to_stereo_duplicates() {
    let track = Track::mono(100, vec![0.1, 0.2]).unwrap();
    let stereo = convert_channels(&track, 2).unwrap();
    assert_eq!(stereo.channel(0).unwrap(), &[0.1, 0.2]);
    assert_eq!(stereo.channel(1).unwrap(), &[0.1, 0.2]);
}

#[test]
fn test_stereo_to_mono_averages() {
    let track = Track::stereo(100, vec![1.0, 0.0], vec![0.0, -1.0]).unwrap();
    let mono = convert_channels(&track, 1).unwrap();
    assert_eq!(mono.channel(0).unwrap(), &[0.5, -0.5]);
}

#[test]
fn test_same_layout_is_shared() {
    let track = Track::stereo(100, vec![0.0; 3], vec![0.0; 3]).unwrap();
    let same = convert_channels(&track, 2).unwrap();
    assert!(same.shares_samples(&track));
}

#[test]
fn test_zero_channels_rejected() {
    let track = Track::mono(100, vec![0.0]).unwrap();
    assert!(convert_channels(&track, 0).is_err());
}
