//! JSON output types for machine-readable CLI output.
//!
//! This module provides structured output types for the `--json` flag on
//! `reconcile`, `probe`, `mood` and `batch`.

use serde::{Deserialize, Serialize};

use crate::pipeline::{error_code_for, JobOutcome};

/// Error codes for CLI operations.
///
/// These codes are stable and can be used for programmatic error handling.
/// Format: CLI_XXX for CLI-level errors, or passes through `TRACK_XXX` codes
/// from the audio core.
pub mod error_codes {
    /// Catch-all for errors without a more specific code
    pub const GENERAL: &str = "CLI_001";
    /// Job file missing, malformed or invalid
    pub const INVALID_JOB: &str = "CLI_002";
    /// ffmpeg / ffprobe missing or failing
    pub const MEDIA_TOOL: &str = "CLI_003";
}

/// A structured error in JSON output.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct JsonError {
    /// Stable error code (e.g., "CLI_002", "TRACK_003")
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// Source file path (if applicable)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
}

impl JsonError {
    /// Creates a new error with code and message.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            file: None,
        }
    }

    /// Builds an error from an error chain, using the most specific code found.
    pub fn from_anyhow(err: &anyhow::Error) -> Self {
        Self::new(error_code_for(err), format!("{:#}", err))
    }

    /// Sets the file path for this error.
    pub fn with_file(mut self, file: impl Into<String>) -> Self {
        self.file = Some(file.into());
        self
    }
}

/// Lead details in a reconcile report.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LeadInfo {
    /// Lead file, absent for fixed-duration leads
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    /// Lead duration in seconds
    pub duration: f64,
    /// Output sample rate
    pub sample_rate: u32,
    /// Output channel count
    pub channels: u16,
}

/// Per-filler details in a reconcile report.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FillerInfo {
    /// Source file, absent when the lead's own audio was mixed in
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    /// Duration before normalization, in seconds
    pub source_duration: f64,
    /// Linear gain
    pub gain: f64,
    /// "exact", "trimmed" or "looped"
    pub policy: String,
    /// Copies of the filler in the output
    pub repeats: u32,
}

/// Mood details in a reconcile report.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MoodInfo {
    /// Chosen mood
    pub mood: String,
    /// Narration voice for the mood
    pub voice: String,
    /// Music style for the mood
    pub music_style: String,
    /// True when the mood was classified from text
    pub classified: bool,
    /// Music file that was mixed in
    #[serde(skip_serializing_if = "Option::is_none")]
    pub music: Option<String>,
}

/// Successful reconcile details.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReconcileResult {
    /// The lead
    pub lead: LeadInfo,
    /// Output duration in seconds
    pub duration: f64,
    /// Overall policy
    pub policy: String,
    /// Largest repeat count across fillers
    pub repeats: u32,
    /// Uniform scale applied by the clipping guard
    pub scale: f64,
    /// Fillers in mix order
    pub fillers: Vec<FillerInfo>,
    /// Mood decision
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mood: Option<MoodInfo>,
    /// Written WAV file
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
    /// Written video file
    #[serde(skip_serializing_if = "Option::is_none")]
    pub muxed_into: Option<String>,
    /// Output sample encoding
    pub encoding: String,
    /// BLAKE3 hash of the 16-bit PCM rendering
    pub pcm_hash: String,
}

impl ReconcileResult {
    /// Summarizes a finished job.
    pub fn from_outcome(outcome: &JobOutcome) -> Self {
        use trackfit_audio::Timeline;

        let lead = &outcome.lead;
        let result = &outcome.result;
        let fillers = outcome
            .inputs
            .iter()
            .zip(&result.fillers)
            .map(|(input, report)| FillerInfo {
                path: input.path.as_ref().map(|p| p.display().to_string()),
                source_duration: report.source_duration,
                gain: report.volume,
                policy: report.policy.as_str().to_string(),
                repeats: report.repeats,
            })
            .collect();

        Self {
            lead: LeadInfo {
                path: lead.path.as_ref().map(|p| p.display().to_string()),
                duration: lead.spec.duration(),
                sample_rate: lead.spec.sample_rate(),
                channels: lead.spec.channel_count(),
            },
            duration: result.track.duration(),
            policy: result.policy.as_str().to_string(),
            repeats: result.repeats,
            scale: result.scale,
            fillers,
            mood: outcome.mood.as_ref().map(|m| MoodInfo {
                mood: m.mood.as_str().to_string(),
                voice: m.voice.to_string(),
                music_style: m.music_style.as_str().to_string(),
                classified: m.classified,
                music: m.music.as_ref().map(|p| p.display().to_string()),
            }),
            output: outcome.output.as_ref().map(|p| p.display().to_string()),
            muxed_into: outcome.muxed.as_ref().map(|p| p.display().to_string()),
            encoding: outcome.encoding.as_str().to_string(),
            pcm_hash: outcome.pcm_hash.clone(),
        }
    }
}

/// JSON output for the `reconcile` command.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReconcileOutput {
    /// Whether the job succeeded
    pub success: bool,
    /// Errors encountered
    pub errors: Vec<JsonError>,
    /// Result details (on success)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<ReconcileResult>,
    /// BLAKE3 hash of the job file, when one was used
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_hash: Option<String>,
}

impl ReconcileOutput {
    /// Creates a successful reconcile output.
    pub fn success(result: ReconcileResult, source_hash: Option<String>) -> Self {
        Self {
            success: true,
            errors: Vec::new(),
            result: Some(result),
            source_hash,
        }
    }

    /// Creates a failed reconcile output.
    pub fn failure(errors: Vec<JsonError>, source_hash: Option<String>) -> Self {
        Self {
            success: false,
            errors,
            result: None,
            source_hash,
        }
    }
}

/// JSON output for the `probe` command.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProbeOutput {
    /// Probed file
    pub path: String,
    /// Duration in seconds
    pub duration: f64,
    /// Sample rate (decoded audio only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sample_rate: Option<u32>,
    /// Channel count (decoded audio only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub channels: Option<u16>,
    /// Frame count (decoded audio only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frames: Option<usize>,
    /// Peak absolute sample (decoded audio only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub peak: Option<f32>,
    /// BLAKE3 hash of the 16-bit PCM rendering (decoded audio only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pcm_hash: Option<String>,
    /// "decoder" or "ffprobe"
    pub source: String,
}

/// One scene in mood output.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SceneMood {
    /// Position of the scene
    pub index: usize,
    /// Mood of the scene
    pub mood: String,
}

/// JSON output for the `mood` command.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MoodOutput {
    /// Dominant mood
    pub mood: String,
    /// Narration voice
    pub voice: String,
    /// Music style
    pub music_style: String,
    /// Per-scene moods
    pub scenes: Vec<SceneMood>,
}

/// One job in batch output.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BatchItem {
    /// Job file
    pub job: String,
    /// Whether the job succeeded
    pub success: bool,
    /// Exit code the job would have produced on its own
    pub exit_code: u8,
    /// Result details (on success)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<ReconcileResult>,
    /// Errors encountered
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub errors: Vec<JsonError>,
}

/// JSON output for the `batch` command.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BatchOutput {
    /// Jobs found
    pub total: usize,
    /// Jobs that succeeded
    pub succeeded: usize,
    /// Jobs that failed
    pub failed: usize,
    /// Per-job results, sorted by job path
    pub jobs: Vec<BatchItem>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_failure_output_shape() {
        let output = ReconcileOutput::failure(
            vec![JsonError::new(error_codes::INVALID_JOB, "bad lead").with_file("job.json")],
            None,
        );
        let json = serde_json::to_value(&output).unwrap();
        assert_eq!(json["success"], false);
        assert_eq!(json["errors"][0]["code"], "CLI_002");
        assert_eq!(json["errors"][0]["file"], "job.json");
        assert!(json.get("result").is_none());
        assert!(json.get("source_hash").is_none());
    }

    #[test]
    fn test_error_from_chain_uses_audio_code() {
        let err = anyhow::Error::new(trackfit_audio::AudioError::EmptyMix).context("mixing");
        let json = JsonError::from_anyhow(&err);
        assert_eq!(json.code, "TRACK_004");
        assert!(json.message.starts_with("mixing: "));
    }

    #[test]
    fn test_cli_error_codes_are_distinct() {
        let codes = [
            error_codes::GENERAL,
            error_codes::INVALID_JOB,
            error_codes::MEDIA_TOOL,
        ];
        let unique: std::collections::HashSet<_> = codes.iter().collect();
        assert_eq!(unique.len(), codes.len());
        assert!(codes.iter().all(|code| code.starts_with("CLI_")));
    }

    #[test]
    fn test_batch_item_omits_empty_errors() {
        let item = BatchItem {
            job: "a.json".to_string(),
            success: true,
            exit_code: 0,
            result: None,
            errors: Vec::new(),
        };
        let json = serde_json::to_value(&item).unwrap();
        assert!(json.get("errors").is_none());
    }
}
