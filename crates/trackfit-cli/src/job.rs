//! Reconcile job files.
//!
//! A job describes one reconciliation: the lead, the fillers with their gains,
//! optional mood-driven music, and where the result goes. Jobs are JSON files
//! for `trackfit reconcile --job` and `trackfit batch`, and are also built
//! from command-line flags so both paths share one pipeline.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use trackfit_audio::codec::SampleEncoding;

use crate::mood::Mood;

/// Default gain for narration fillers.
pub const DEFAULT_NARRATION_GAIN: f64 = 1.0;

/// Default gain for background music.
pub const DEFAULT_MUSIC_GAIN: f64 = 0.3;

/// Sample rate used for sample-less leads when nothing else decides it.
pub const DEFAULT_SAMPLE_RATE: u32 = 44100;

/// Channel count used for sample-less leads when nothing else decides it.
pub const DEFAULT_CHANNELS: u16 = 2;

/// Mood value that asks for keyword classification of `mood_text`.
pub const AUTO_MOOD: &str = "auto";

/// Where the lead duration comes from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeadSource {
    /// An audio or video file.
    Path(PathBuf),
    /// A fixed duration in seconds.
    Duration(f64),
}

/// One filler and the gain it is mixed at.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FillerEntry {
    /// Audio file to fit to the lead.
    pub path: PathBuf,
    /// Linear gain.
    #[serde(default = "default_filler_gain")]
    pub gain: f64,
}

fn default_filler_gain() -> f64 {
    1.0
}

fn default_music_gain() -> f64 {
    DEFAULT_MUSIC_GAIN
}

impl FillerEntry {
    /// Creates a filler entry.
    pub fn new(path: impl Into<PathBuf>, gain: f64) -> Self {
        Self {
            path: path.into(),
            gain,
        }
    }

    /// Parses a `PATH[:GAIN]` command-line argument.
    ///
    /// The gain is only split off when the text after the last `:` parses as
    /// a number, so paths containing colons still work.
    pub fn parse_arg(arg: &str) -> Result<Self, String> {
        if arg.is_empty() {
            return Err("filler path is empty".to_string());
        }
        if let Some((path, gain)) = arg.rsplit_once(':') {
            if let Ok(gain) = gain.trim().parse::<f64>() {
                if path.is_empty() {
                    return Err(format!("filler '{}' has a gain but no path", arg));
                }
                return Ok(Self::new(path, gain));
            }
        }
        Ok(Self::new(arg, default_filler_gain()))
    }
}

/// A reconciliation job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Job {
    /// Timeline every filler is fitted to.
    pub lead: LeadSource,
    /// When set and the lead is audio, the lead itself is mixed in at this gain.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lead_gain: Option<f64>,
    /// Fillers in mix order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fillers: Vec<FillerEntry>,
    /// Mood name, or `auto` to classify `mood_text`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mood: Option<String>,
    /// Text classified when `mood` is `auto` or absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mood_text: Option<String>,
    /// Directory searched for mood music.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub music_dir: Option<PathBuf>,
    /// Gain for mood music.
    #[serde(default = "default_music_gain")]
    pub music_gain: f64,
    /// Reconciled WAV output.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<PathBuf>,
    /// `pcm16` (default) or `float32`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub encoding: Option<String>,
    /// Fade applied to the tail of trimmed fillers, in seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fade_out_seconds: Option<f64>,
    /// Video written with the lead's picture and the reconciled audio.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mux_into: Option<PathBuf>,
    /// Output sample rate; every input is resampled to it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sample_rate: Option<u32>,
    /// Output channel count; every input is converted to it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channels: Option<u16>,
}

/// Errors from loading or validating a job.
#[derive(Debug, Error)]
pub enum JobError {
    /// The job file could not be read.
    #[error("failed to read job '{}': {source}", path.display())]
    FileRead {
        /// Job file path.
        path: PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },

    /// The job file is not valid job JSON.
    #[error("failed to parse job '{}': {message}", path.display())]
    Parse {
        /// Job file path.
        path: PathBuf,
        /// Parser message.
        message: String,
    },

    /// A job field holds an unusable value.
    #[error("invalid job field '{field}': {message}")]
    Invalid {
        /// Field name.
        field: &'static str,
        /// What is wrong with it.
        message: String,
    },
}

impl JobError {
    fn invalid(field: &'static str, message: impl Into<String>) -> Self {
        Self::Invalid {
            field,
            message: message.into(),
        }
    }
}

/// A job loaded from disk.
#[derive(Debug, Clone)]
pub struct LoadedJob {
    /// The job with paths resolved against the job file's directory.
    pub job: Job,
    /// Path of the job file.
    pub path: PathBuf,
    /// BLAKE3 hash of the job file content (hex string).
    pub source_hash: String,
}

/// Loads, resolves and validates a job file.
pub fn load_job(path: &Path) -> Result<LoadedJob, JobError> {
    let content = std::fs::read_to_string(path).map_err(|e| JobError::FileRead {
        path: path.to_path_buf(),
        source: e,
    })?;
    let source_hash = blake3::hash(content.as_bytes()).to_hex().to_string();

    let mut job: Job = serde_json::from_str(&content).map_err(|e| JobError::Parse {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    let base = path.parent().unwrap_or_else(|| Path::new(""));
    job.resolve_paths(base);
    job.validate()?;

    Ok(LoadedJob {
        job,
        path: path.to_path_buf(),
        source_hash,
    })
}

impl Job {
    /// A job with just a lead and an output path.
    pub fn new(lead: LeadSource, output: impl Into<PathBuf>) -> Self {
        Self {
            lead,
            lead_gain: None,
            fillers: Vec::new(),
            mood: None,
            mood_text: None,
            music_dir: None,
            music_gain: DEFAULT_MUSIC_GAIN,
            output: Some(output.into()),
            encoding: None,
            fade_out_seconds: None,
            mux_into: None,
            sample_rate: None,
            channels: None,
        }
    }

    /// Makes every relative path absolute against `base`.
    pub fn resolve_paths(&mut self, base: &Path) {
        let resolve = |p: &mut PathBuf| {
            if p.is_relative() {
                *p = base.join(&*p);
            }
        };

        if let LeadSource::Path(path) = &mut self.lead {
            resolve(path);
        }
        for filler in &mut self.fillers {
            resolve(&mut filler.path);
        }
        self.music_dir.iter_mut().for_each(resolve);
        self.output.iter_mut().for_each(resolve);
        self.mux_into.iter_mut().for_each(resolve);
    }

    /// Checks every field for values the pipeline cannot use.
    pub fn validate(&self) -> Result<(), JobError> {
        if let LeadSource::Duration(d) = self.lead {
            if !d.is_finite() || d < 0.0 {
                return Err(JobError::invalid(
                    "lead",
                    format!("duration must be a non-negative number of seconds, got {}", d),
                ));
            }
        }

        if let Some(gain) = self.lead_gain {
            check_gain("lead_gain", gain)?;
        }
        check_gain("music_gain", self.music_gain)?;
        for filler in &self.fillers {
            check_gain("fillers", filler.gain)?;
        }

        if let Some(mood) = &self.mood {
            if mood != AUTO_MOOD && Mood::from_name(mood).is_none() {
                return Err(JobError::invalid(
                    "mood",
                    format!("unknown mood '{}'", mood),
                ));
            }
        }

        if let Some(name) = &self.encoding {
            if SampleEncoding::from_name(name).is_none() {
                return Err(JobError::invalid(
                    "encoding",
                    format!("unknown encoding '{}' (expected pcm16 or float32)", name),
                ));
            }
        }

        if let Some(fade) = self.fade_out_seconds {
            if !fade.is_finite() || fade < 0.0 {
                return Err(JobError::invalid(
                    "fade_out_seconds",
                    format!("must be a non-negative number of seconds, got {}", fade),
                ));
            }
        }

        if self.sample_rate == Some(0) {
            return Err(JobError::invalid("sample_rate", "must be positive"));
        }
        if self.channels == Some(0) {
            return Err(JobError::invalid("channels", "must be positive"));
        }

        if self.mux_into.is_some() && !matches!(self.lead, LeadSource::Path(_)) {
            return Err(JobError::invalid(
                "mux_into",
                "muxing needs a video file as the lead",
            ));
        }
        if self.output.is_none() && self.mux_into.is_none() {
            return Err(JobError::invalid(
                "output",
                "set an output WAV path, a mux_into video, or both",
            ));
        }

        Ok(())
    }

    /// Output sample encoding.
    pub fn sample_encoding(&self) -> SampleEncoding {
        self.encoding
            .as_deref()
            .and_then(SampleEncoding::from_name)
            .unwrap_or_default()
    }
}

fn check_gain(field: &'static str, gain: f64) -> Result<(), JobError> {
    if !gain.is_finite() || gain < 0.0 {
        return Err(JobError::invalid(
            field,
            format!("gain must be a non-negative number, got {}", gain),
        ));
    }
    Ok(())
}
