//! Tests for mix preconditions.

use super::*;
use crate::error::AudioError;
use crate::track::Track;

#[test]
fn test_empty_mix_is_rejected() {
    assert!(matches!(mix(&[]), Err(AudioError::EmptyMix)));
    assert!(matches!(Mixer::new().mix(), Err(AudioError::EmptyMix)));
}

#[test]
fn test_duration_mismatch_names_offending_index() {
    let a = Track::mono(1000, vec![0.0; 5000]).unwrap(); // 5.00s
    let b = Track::mono(1000, vec![0.0; 5020]).unwrap(); // 5.02s

    match mix(&[GainSpec::unity(a), GainSpec::unity(b)]) {
        Err(AudioError::DurationMismatch {
            index,
            expected,
            found,
        }) => {
            assert_eq!(index, 1);
            assert!((expected - 5.0).abs() < 1e-9);
            assert!((found - 5.02).abs() < 1e-9);
        }
        other => panic!("expected duration mismatch, got {:?}", other.map(|o| o.scale)),
    }
}

#[test]
fn test_duration_mismatch_reports_first_bad_index() {
    let ok = Track::mono(1000, vec![0.0; 1000]).unwrap();
    let bad = Track::mono(1000, vec![0.0; 1500]).unwrap();
    let err = validate(&[
        GainSpec::unity(ok.clone()),
        GainSpec::unity(ok),
        GainSpec::unity(bad.clone()),
        GainSpec::unity(bad),
    ])
    .unwrap_err();
    assert!(matches!(err, AudioError::DurationMismatch { index: 2, .. }));
}

#[test]
fn test_within_tolerance_is_accepted() {
    let a = Track::mono(10_000, vec![0.0; 50_000]).unwrap();
    let b = Track::mono(10_000, vec![0.0; 50_005]).unwrap(); // +0.5ms
    assert!(validate(&[GainSpec::unity(a), GainSpec::unity(b)]).is_ok());
}

#[test]
fn test_sample_rate_mismatch_is_rejected() {
    let a = Track::mono(44100, vec![0.0; 44100]).unwrap();
    let b = Track::mono(48000, vec![0.0; 48000]).unwrap();
    let err = mix(&[GainSpec::unity(a), GainSpec::unity(b)]).unwrap_err();
    match err {
        AudioError::FormatMismatch {
            index,
            expected_rate,
            found_rate,
            ..
        } => {
            assert_eq!(index, 1);
            assert_eq!(expected_rate, 44100);
            assert_eq!(found_rate, 48000);
        }
        other => panic!("expected format mismatch, got {other}"),
    }
}

#[test]
fn test_channel_mismatch_is_rejected() {
    let a = Track::mono(100, vec![0.0; 100]).unwrap();
    let b = Track::stereo(100, vec![0.0; 100], vec![0.0; 100]).unwrap();
    assert!(matches!(
        mix(&[GainSpec::unity(a), GainSpec::unity(b)]),
        Err(AudioError::FormatMismatch {
            index: 1,
            expected_channels: 1,
            found_channels: 2,
            ..
        })
    ));
}
