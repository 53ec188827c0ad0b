//! Normalize-then-mix entry point.
//!
//! Every filler is forced to the lead's duration and the results are mixed.
//! With no fillers the output is silence of the lead's length and format.

use crate::error::AudioResult;
use crate::mixer::{mix, GainSpec};
use crate::normalize::{normalize_duration_with, NormalizeOptions, Policy};
use crate::track::{Timeline, Track};

/// What happened to one filler during reconciliation.
#[derive(Debug, Clone, PartialEq)]
pub struct FillerReport {
    /// Filler duration before normalization, in seconds.
    pub source_duration: f64,
    /// Gain the filler was mixed at.
    pub volume: f64,
    /// Policy applied to the filler.
    pub policy: Policy,
    /// Number of copies of the filler in the output.
    pub repeats: u32,
}

/// Output of [`reconcile`].
#[derive(Debug, Clone)]
pub struct ReconciliationResult {
    /// The reconciled track, exactly as long as the lead.
    pub track: Track,
    /// Overall policy: looped if any filler looped, else trimmed if any was
    /// trimmed, else exact.
    pub policy: Policy,
    /// Largest repeat count across fillers (0 when there were none).
    pub repeats: u32,
    /// Per-filler detail, in input order.
    pub fillers: Vec<FillerReport>,
    /// Uniform scale applied by the mixer's clipping guard.
    pub scale: f64,
}

/// Reconciles `fillers` against `lead` with hard-cut trimming.
pub fn reconcile<L: Timeline + ?Sized>(
    lead: &L,
    fillers: &[GainSpec],
) -> AudioResult<ReconciliationResult> {
    reconcile_with(lead, fillers, &NormalizeOptions::default())
}

/// Reconciles `fillers` against `lead`.
///
/// Errors from normalization or mixing are returned unchanged.
pub fn reconcile_with<L: Timeline + ?Sized>(
    lead: &L,
    fillers: &[GainSpec],
    options: &NormalizeOptions,
) -> AudioResult<ReconciliationResult> {
    let target = lead.duration();

    if fillers.is_empty() {
        return Ok(ReconciliationResult {
            track: Track::silence(target, lead.sample_rate(), lead.channel_count())?,
            policy: Policy::Exact,
            repeats: 0,
            fillers: Vec::new(),
            scale: 1.0,
        });
    }

    let mut normalized = Vec::with_capacity(fillers.len());
    let mut reports = Vec::with_capacity(fillers.len());
    for filler in fillers {
        let outcome = normalize_duration_with(&filler.track, target, options)?;
        reports.push(FillerReport {
            source_duration: filler.duration(),
            volume: filler.volume,
            policy: outcome.policy,
            repeats: outcome.repeats,
        });
        normalized.push(filler.with_track(outcome.track));
    }

    let output = mix(&normalized)?;

    Ok(ReconciliationResult {
        track: output.track,
        policy: overall_policy(&reports),
        repeats: reports.iter().map(|r| r.repeats).max().unwrap_or(0),
        fillers: reports,
        scale: output.scale,
    })
}

fn overall_policy(reports: &[FillerReport]) -> Policy {
    if reports.iter().any(|r| r.policy == Policy::Looped) {
        Policy::Looped
    } else if reports.iter().any(|r| r.policy == Policy::Trimmed) {
        Policy::Trimmed
    } else {
        Policy::Exact
    }
}
