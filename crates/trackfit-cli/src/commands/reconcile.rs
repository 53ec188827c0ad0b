//! Reconcile command implementation
//!
//! Fits fillers to a lead and writes the mix, from flags or a job file.

use anyhow::Result;
use colored::Colorize;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use super::json_output::{JsonError, ReconcileOutput, ReconcileResult};
use crate::job::{
    load_job, FillerEntry, Job, JobError, LeadSource, DEFAULT_MUSIC_GAIN, DEFAULT_NARRATION_GAIN,
};
use crate::pipeline::{exit_code_for, run_job, JobOutcome, EXIT_INPUT_ERROR};

/// Command-line description of a job.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReconcileFlags {
    /// Lead audio or video file
    pub lead: Option<String>,
    /// Fixed lead duration in seconds
    pub duration: Option<f64>,
    /// Narration file (also the lead when no other lead is given)
    pub narration: Option<String>,
    /// Narration gain
    pub narration_gain: Option<f64>,
    /// Background music file
    pub music: Option<String>,
    /// Music gain, shared with mood music
    pub music_gain: Option<f64>,
    /// Additional fillers
    pub fillers: Vec<FillerEntry>,
    /// Gain for mixing the lead's own audio
    pub lead_gain: Option<f64>,
    /// Mood name or `auto`
    pub mood: Option<String>,
    /// Text to classify
    pub mood_text: Option<String>,
    /// Directory with mood music
    pub music_dir: Option<String>,
    /// Output WAV
    pub output: Option<String>,
    /// Output encoding name
    pub encoding: Option<String>,
    /// Fade-out on trimmed fillers, in seconds
    pub fade_out: Option<f64>,
    /// Output video
    pub mux_into: Option<String>,
    /// Sample rate for sample-less leads
    pub sample_rate: Option<u32>,
    /// Channel count for sample-less leads
    pub channels: Option<u16>,
}

impl ReconcileFlags {
    /// Builds and validates a job from the flags.
    ///
    /// Narration comes first in the mix, then music, then extra fillers.
    pub fn into_job(self) -> Result<Job, JobError> {
        let lead = match (&self.lead, self.duration, &self.narration) {
            (Some(path), None, _) => LeadSource::Path(PathBuf::from(path)),
            (None, Some(duration), _) => LeadSource::Duration(duration),
            (None, None, Some(narration)) => LeadSource::Path(PathBuf::from(narration)),
            (Some(_), Some(_), _) => {
                return Err(JobError::Invalid {
                    field: "lead",
                    message: "--lead and --duration are mutually exclusive".to_string(),
                })
            }
            (None, None, None) => {
                return Err(JobError::Invalid {
                    field: "lead",
                    message: "one of --lead, --duration or --narration is required".to_string(),
                })
            }
        };

        let music_gain = self.music_gain.unwrap_or(DEFAULT_MUSIC_GAIN);
        let mut fillers = Vec::with_capacity(self.fillers.len() + 2);
        if let Some(narration) = self.narration {
            fillers.push(FillerEntry::new(
                narration,
                self.narration_gain.unwrap_or(DEFAULT_NARRATION_GAIN),
            ));
        }
        if let Some(music) = self.music {
            fillers.push(FillerEntry::new(music, music_gain));
        }
        fillers.extend(self.fillers);

        let job = Job {
            lead,
            lead_gain: self.lead_gain,
            fillers,
            mood: self.mood,
            mood_text: self.mood_text,
            music_dir: self.music_dir.map(PathBuf::from),
            music_gain,
            output: self.output.map(PathBuf::from),
            encoding: self.encoding,
            fade_out_seconds: self.fade_out,
            mux_into: self.mux_into.map(PathBuf::from),
            sample_rate: self.sample_rate,
            channels: self.channels,
        };
        job.validate()?;
        Ok(job)
    }
}

/// Run the reconcile command
///
/// # Arguments
/// * `job_path` - Optional job file; the parser keeps `flags` empty when set
/// * `flags` - Job described on the command line
/// * `json_output` - Whether to output machine-readable JSON
///
/// # Returns
/// Exit code: 0 success, 1 input error, 2 processing error
pub fn run(job_path: Option<&str>, flags: ReconcileFlags, json_output: bool) -> Result<ExitCode> {
    let (job, source_hash) = match job_path {
        Some(path) => match load_job(Path::new(path)) {
            Ok(loaded) => (loaded.job, Some(loaded.source_hash)),
            Err(e) => return report_input_error(&e, Some(path), json_output),
        },
        None => match flags.into_job() {
            Ok(job) => (job, None),
            Err(e) => return report_input_error(&e, None, json_output),
        },
    };

    if !json_output {
        print_header(&job, job_path);
    }

    match run_job(&job) {
        Ok(outcome) => {
            if json_output {
                let output =
                    ReconcileOutput::success(ReconcileResult::from_outcome(&outcome), source_hash);
                println!("{}", serde_json::to_string_pretty(&output)?);
            } else {
                print_outcome(&outcome);
            }
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            let code = exit_code_for(&e);
            if json_output {
                let output = ReconcileOutput::failure(vec![JsonError::from_anyhow(&e)], source_hash);
                println!("{}", serde_json::to_string_pretty(&output)?);
            } else {
                eprintln!("{} {:#}", "FAILED".red().bold(), e);
            }
            Ok(ExitCode::from(code))
        }
    }
}

fn report_input_error(err: &JobError, file: Option<&str>, json_output: bool) -> Result<ExitCode> {
    if json_output {
        let mut error = JsonError::new(
            super::json_output::error_codes::INVALID_JOB,
            err.to_string(),
        );
        if let Some(file) = file {
            error = error.with_file(file);
        }
        let output = ReconcileOutput::failure(vec![error], None);
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        eprintln!("{} {}", "error".red(), err);
    }
    Ok(ExitCode::from(EXIT_INPUT_ERROR))
}

fn print_header(job: &Job, job_path: Option<&str>) {
    if let Some(path) = job_path {
        println!("{} {}", "Job:".cyan().bold(), path);
    }
    match &job.lead {
        LeadSource::Path(path) => println!("{} {}", "Lead:".cyan().bold(), path.display()),
        LeadSource::Duration(d) => println!("{} {:.3}s", "Lead:".cyan().bold(), d),
    }
    for filler in &job.fillers {
        println!(
            "  {} {} {}",
            "+".dimmed(),
            filler.path.display(),
            format!("(gain {:.2})", filler.gain).dimmed()
        );
    }
}

fn print_outcome(outcome: &JobOutcome) {
    use trackfit_audio::Timeline;

    let result = &outcome.result;
    if let Some(choice) = &outcome.mood {
        let source = if choice.classified {
            "classified"
        } else {
            "manual"
        };
        println!(
            "{} {} {} voice {}, music style {}",
            "Mood:".cyan().bold(),
            choice.mood,
            format!("({})", source).dimmed(),
            choice.voice,
            choice.music_style
        );
        match &choice.music {
            Some(path) => println!("  {} {}", "+".dimmed(), path.display()),
            None => println!("  {} no music file found", "!".yellow()),
        }
    }

    for (input, report) in outcome.inputs.iter().zip(&result.fillers) {
        let name = input
            .path
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "<lead audio>".to_string());
        println!(
            "  {} {} {:.3}s -> {} x{}",
            "->".green(),
            name,
            report.source_duration,
            report.policy,
            report.repeats
        );
    }
    if result.scale < 1.0 {
        println!(
            "  {} gains sum above 1, mix scaled by {:.3}",
            "!".yellow(),
            result.scale
        );
    }

    if let Some(path) = &outcome.output {
        println!("{} {}", "Wrote:".cyan().bold(), path.display());
    }
    if let Some(path) = &outcome.muxed {
        println!("{} {}", "Muxed:".cyan().bold(), path.display());
    }
    println!(
        "{} {:.3}s {} ({}), pcm {}",
        "SUCCESS".green().bold(),
        result.track.duration(),
        result.policy,
        outcome.encoding.as_str(),
        &outcome.pcm_hash[..16]
    );
}
