//! Trackfit Audio
//!
//! Fits secondary audio ("fillers") to the duration of a lead timeline and
//! mixes them into one output track.
//!
//! # Overview
//!
//! Reconciliation runs in two stages:
//!
//! - **Normalize** - every filler is trimmed or loop-concatenated so it lasts
//!   exactly as long as the lead
//! - **Mix** - the normalized fillers are summed with per-track gain, scaled
//!   down uniformly whenever the gains add up to more than 1
//!
//! The lead can be a decoded [`Track`] or a [`LeadSpec`] built from an
//! externally probed duration, such as a video file.
//!
//! # Example
//!
//! ```ignore
//! use trackfit_audio::{codec, reconcile, GainSpec, Timeline};
//!
//! let narration = codec::decode_path("voice.wav".as_ref())?;
//! let music = codec::decode_path("music/calm.mp3".as_ref())?;
//! let music = codec::convert_channels(&music, narration.channel_count())?;
//!
//! let result = reconcile(
//!     &narration,
//!     &[GainSpec::new(narration.clone(), 1.0), GainSpec::new(music, 0.3)],
//! )?;
//! codec::encode_wav(&result.track, "mixed.wav".as_ref(), Default::default())?;
//! ```
//!
//! # Crate Structure
//!
//! - [`track`] - Immutable track handles and the [`Timeline`] trait
//! - [`normalize`] - Duration normalization (trim / loop)
//! - [`mixer`] - Gain-weighted mixing with the clipping guard
//! - [`reconcile()`] - Normalize-then-mix entry point
//! - [`codec`] - Decoding media files and writing WAV output

pub mod codec;
pub mod error;
pub mod mixer;
pub mod normalize;
pub mod reconcile;
pub mod track;

// Re-export main types at crate root
pub use error::{AudioError, AudioResult};
pub use mixer::{mix, GainSpec, MixOutput, Mixer};
pub use normalize::{
    normalize_duration, normalize_duration_with, NormalizeOptions, NormalizeOutcome, Policy,
};
pub use reconcile::{reconcile, reconcile_with, FillerReport, ReconciliationResult};
pub use track::{LeadSpec, Timeline, Track};
