//! Tests for the gain-sum clipping guard.

use super::*;
use crate::track::Track;

fn full_scale(frames: usize) -> Track {
    Track::mono(100, vec![1.0; frames]).unwrap()
}

#[test]
fn test_peak_gain_floor_is_full_scale() {
    let specs = [GainSpec::new(full_scale(1), 0.3)];
    assert_eq!(peak_gain(&specs), 1.0);
    assert_eq!(headroom_scale(&specs), 1.0);
}

#[test]
fn test_peak_gain_is_sum_of_gains() {
    let specs = [
        GainSpec::new(full_scale(1), 1.0),
        GainSpec::new(full_scale(1), 0.3),
    ];
    assert!((peak_gain(&specs) - 1.3).abs() < 1e-12);
    assert!((headroom_scale(&specs) - 1.0 / 1.3).abs() < 1e-12);
}

#[test]
fn test_two_full_scale_unity_tracks_do_not_clip() {
    let output = mix(&[
        GainSpec::unity(full_scale(100)),
        GainSpec::unity(full_scale(100)),
    ])
    .unwrap();

    assert_eq!(output.scale, 0.5);
    assert!(output.track.peak() <= 1.0);
    assert!(output.track.channel(0).unwrap().iter().all(|&s| (s - 1.0).abs() < 1e-6));
}

#[test]
fn test_single_boosted_track_is_scaled_back() {
    let output = mix(&[GainSpec::new(full_scale(10), 2.0)]).unwrap();
    assert_eq!(output.scale, 0.5);
    assert!(output.track.peak() <= 1.0);
}

#[test]
fn test_scale_ignores_actual_sample_values() {
    // Quiet material is still rescaled: the guard only looks at gains.
    let quiet = Track::mono(100, vec![0.1; 10]).unwrap();
    let output = mix(&[GainSpec::new(quiet.clone(), 1.0), GainSpec::new(quiet, 1.0)]).unwrap();
    assert_eq!(output.scale, 0.5);
    assert!(output.track.channel(0).unwrap().iter().all(|&s| (s - 0.1).abs() < 1e-6));
}

#[test]
fn test_worst_case_alternating_signs_stays_in_range() {
    let a = Track::mono(100, (0..100).map(|i| if i % 2 == 0 { 1.0 } else { -1.0 }).collect()).unwrap();
    let output = mix(&[
        GainSpec::new(a.clone(), 1.5),
        GainSpec::new(a.clone(), 0.8),
        GainSpec::new(a, 0.2),
    ])
    .unwrap();
    assert!(output.track.peak() <= 1.0 + 1e-6);
}
