//! Tests for gain-weighted summing.

use super::*;
use crate::track::{Timeline, Track};

fn mono(samples: Vec<f32>) -> Track {
    Track::mono(100, samples).unwrap()
}

#[test]
fn test_mix_single_track_unity() {
    let output = mix(&[GainSpec::unity(mono(vec![0.5; 100]))]).unwrap();
    assert_eq!(output.scale, 1.0);
    assert_eq!(output.track.frames(), 100);
    assert!(output.track.channel(0).unwrap().iter().all(|&s| (s - 0.5).abs() < 1e-6));
}

#[test]
fn test_mix_single_track_with_volume() {
    let output = mix(&[GainSpec::new(mono(vec![1.0; 100]), 0.5)]).unwrap();
    assert!(output.track.channel(0).unwrap().iter().all(|&s| (s - 0.5).abs() < 1e-6));
}

#[test]
fn test_mix_sums_within_headroom() {
    let output = mix(&[
        GainSpec::new(mono(vec![1.0; 100]), 0.5),
        GainSpec::new(mono(vec![1.0; 100]), 0.25),
    ])
    .unwrap();

    // 0.5 + 0.25 = 0.75, no rescale
    assert_eq!(output.scale, 1.0);
    assert!(output.track.channel(0).unwrap().iter().all(|&s| (s - 0.75).abs() < 1e-6));
}

#[test]
fn test_mix_is_per_sample() {
    let output = mix(&[
        GainSpec::new(mono(vec![0.1, 0.2, 0.3]), 1.0),
        GainSpec::new(mono(vec![-0.1, 0.0, 0.4]), 0.0),
    ])
    .unwrap();

    let samples = output.track.channel(0).unwrap();
    assert!((samples[0] - 0.1).abs() < 1e-6);
    assert!((samples[1] - 0.2).abs() < 1e-6);
    assert!((samples[2] - 0.3).abs() < 1e-6);
}

#[test]
fn test_mix_stereo_keeps_channels_apart() {
    let a = Track::stereo(100, vec![0.5; 10], vec![0.0; 10]).unwrap();
    let b = Track::stereo(100, vec![0.0; 10], vec![0.25; 10]).unwrap();
    let output = mix(&[GainSpec::unity(a), GainSpec::new(b, 0.0)]).unwrap();

    assert_eq!(output.track.channel_count(), 2);
    assert!(output.track.channel(0).unwrap().iter().all(|&s| (s - 0.5).abs() < 1e-6));
    assert!(output.track.channel(1).unwrap().iter().all(|&s| s == 0.0));
}

#[test]
fn test_mix_output_format_from_first_track() {
    let a = Track::mono(22050, vec![0.1; 22050]).unwrap();
    let output = mix(&[GainSpec::unity(a.clone()), GainSpec::unity(a)]).unwrap();
    assert_eq!(output.track.sample_rate(), 22050);
    assert_eq!(output.track.frames(), 22050);
}

#[test]
fn test_mix_shorter_within_tolerance_pads_silence() {
    // one frame short at 10 kHz is 0.1ms
    let a = Track::mono(10_000, vec![0.5; 10_000]).unwrap();
    let b = Track::mono(10_000, vec![0.25; 9_999]).unwrap();
    let output = mix(&[GainSpec::unity(a), GainSpec::new(b, 0.0)]).unwrap();
    assert_eq!(output.track.frames(), 10_000);
}

#[test]
fn test_mix_is_deterministic() {
    let a = mono((0..100).map(|i| (i as f32 * 0.37).sin()).collect());
    let b = mono((0..100).map(|i| (i as f32 * 0.11).cos()).collect());
    let specs = [GainSpec::new(a, 0.9), GainSpec::new(b, 0.6)];

    let first = mix(&specs).unwrap();
    let second = mix(&specs).unwrap();
    assert_eq!(first.track, second.track);
    assert_eq!(first.scale, second.scale);
}

#[test]
fn test_mixer_builder_matches_free_function() {
    let a = mono(vec![0.3; 10]);
    let b = mono(vec![0.2; 10]);

    let mut mixer = Mixer::new();
    assert!(mixer.is_empty());
    mixer.add_track(a.clone(), 1.0);
    mixer.add(GainSpec::new(b.clone(), 0.5));
    assert_eq!(mixer.len(), 2);

    let built = mixer.mix().unwrap();
    let direct = mix(&[GainSpec::new(a, 1.0), GainSpec::new(b, 0.5)]).unwrap();
    assert_eq!(built.track, direct.track);
}

#[test]
fn test_gain_spec_clamps_negative_and_nan() {
    assert_eq!(GainSpec::new(mono(vec![0.0]), -1.0).volume, 0.0);
    assert_eq!(GainSpec::new(mono(vec![0.0]), f64::NAN).volume, 0.0);
    assert_eq!(GainSpec::new(mono(vec![0.0]), 1.7).volume, 1.7);
}
