//! Runs a job: decode, reconcile, encode, and optionally mux onto video.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{debug, info, warn};
use trackfit_audio::codec::{self, SampleEncoding};
use trackfit_audio::{
    reconcile_with, AudioError, GainSpec, LeadSpec, NormalizeOptions, ReconciliationResult,
    Timeline, Track,
};

use crate::job::{Job, LeadSource, AUTO_MOOD, DEFAULT_CHANNELS, DEFAULT_SAMPLE_RATE};
use crate::media::{self, MediaError};
use crate::mood::{self, Mood, MusicStyle, Preset};

/// Exit code for bad input: unreadable jobs, missing files, undecodable media.
pub const EXIT_INPUT_ERROR: u8 = 1;

/// Exit code for failures while reconciling or muxing valid input.
pub const EXIT_PROCESSING_ERROR: u8 = 2;

/// How the lead timeline was obtained.
#[derive(Debug, Clone)]
pub struct ResolvedLead {
    /// Duration and output format.
    pub spec: LeadSpec,
    /// Decoded samples, when the lead is an audio file.
    pub audio: Option<Track>,
    /// Source file, when the lead is a file.
    pub path: Option<PathBuf>,
}

/// Mood decision for a job.
#[derive(Debug, Clone, PartialEq)]
pub struct MoodChoice {
    /// Chosen mood.
    pub mood: Mood,
    /// Narration voice for the mood.
    pub voice: &'static str,
    /// Music style for the mood.
    pub music_style: MusicStyle,
    /// True when the mood came from keyword classification.
    pub classified: bool,
    /// Music file picked for the mood, if one was found.
    pub music: Option<PathBuf>,
}

/// One filler as it went into the mix.
#[derive(Debug, Clone)]
pub struct MixedInput {
    /// Source file (`None` for the lead's own audio).
    pub path: Option<PathBuf>,
    /// Gain it was mixed at.
    pub gain: f64,
}

/// Everything a finished job produced.
#[derive(Debug)]
pub struct JobOutcome {
    /// The resolved lead.
    pub lead: ResolvedLead,
    /// Inputs in mix order, parallel to `result.fillers`.
    pub inputs: Vec<MixedInput>,
    /// Reconciler output.
    pub result: ReconciliationResult,
    /// Mood decision, if the job asked for one.
    pub mood: Option<MoodChoice>,
    /// Written WAV file, if the job kept one.
    pub output: Option<PathBuf>,
    /// Written video, if the job muxed.
    pub muxed: Option<PathBuf>,
    /// Encoding of the written audio.
    pub encoding: SampleEncoding,
    /// BLAKE3 hash of the 16-bit rendering of the output.
    pub pcm_hash: String,
}

/// Runs a validated job end to end.
pub fn run_job(job: &Job) -> Result<JobOutcome> {
    let mood = resolve_mood(job);

    let mut entries: Vec<(PathBuf, f64)> = job
        .fillers
        .iter()
        .map(|f| (f.path.clone(), f.gain))
        .collect();
    if let Some(music) = mood.as_ref().and_then(|m| m.music.clone()) {
        entries.push((music, job.music_gain));
    }

    let decoded = entries
        .iter()
        .map(|(path, _)| {
            codec::decode_path(path)
                .with_context(|| format!("failed to decode filler '{}'", path.display()))
        })
        .collect::<Result<Vec<Track>>>()?;

    let lead = resolve_lead(job, decoded.first())?;
    info!(
        duration = lead.spec.duration(),
        sample_rate = lead.spec.sample_rate(),
        channels = lead.spec.channel_count(),
        fillers = decoded.len(),
        "resolved lead"
    );

    let mut specs = Vec::with_capacity(decoded.len() + 1);
    let mut inputs = Vec::with_capacity(decoded.len() + 1);
    if let (Some(audio), Some(gain)) = (&lead.audio, job.lead_gain) {
        specs.push(GainSpec::new(conform(audio, &lead.spec)?, gain));
        inputs.push(MixedInput { path: None, gain });
    }
    for ((path, gain), track) in entries.into_iter().zip(decoded) {
        specs.push(GainSpec::new(conform(&track, &lead.spec)?, gain));
        inputs.push(MixedInput {
            path: Some(path),
            gain,
        });
    }

    let options = NormalizeOptions {
        fade_out_seconds: job.fade_out_seconds,
    };
    let result = reconcile_with(&lead.spec, &specs, &options).context("reconciliation failed")?;
    info!(
        policy = %result.policy,
        repeats = result.repeats,
        scale = result.scale,
        "reconciled"
    );

    let encoding = job.sample_encoding();
    let pcm_hash = codec::pcm_hash(&result.track);
    let (output, muxed) = write_outputs(job, &lead, &result.track, encoding)?;

    Ok(JobOutcome {
        lead,
        inputs,
        result,
        mood,
        output,
        muxed,
        encoding,
        pcm_hash,
    })
}

/// Picks the mood and its music file.
///
/// Returns `None` when the job names no mood and has no text to classify.
pub fn resolve_mood(job: &Job) -> Option<MoodChoice> {
    let manual = job
        .mood
        .as_deref()
        .filter(|m| *m != AUTO_MOOD)
        .and_then(Preset::from_override);

    let (preset, classified) = match (manual, job.mood_text.as_deref()) {
        (Some(preset), _) => (preset, false),
        (None, Some(text)) => (mood::dominant_mood(mood::split_scenes(text)).preset(), true),
        (None, None) if job.mood.is_some() => (Mood::DEFAULT.preset(), true),
        (None, None) => return None,
    };

    let music = job
        .music_dir
        .as_deref()
        .and_then(|dir| mood::resolve_music(dir, preset.music_style));

    info!(
        mood = %preset.mood,
        voice = preset.voice,
        music_style = %preset.music_style,
        classified,
        "selected mood"
    );
    Some(MoodChoice {
        mood: preset.mood,
        voice: preset.voice,
        music_style: preset.music_style,
        classified,
        music,
    })
}

/// Brings `track` to the lead's channel layout and sample rate.
pub fn conform(track: &Track, lead: &LeadSpec) -> Result<Track> {
    let converted = codec::convert_channels(track, lead.channel_count())?;
    if converted.sample_rate() != lead.sample_rate() {
        debug!(
            from = converted.sample_rate(),
            to = lead.sample_rate(),
            "resampling"
        );
    }
    Ok(codec::resample(&converted, lead.sample_rate())?)
}

/// Resolves the lead's duration and output format.
///
/// Audio leads are decoded. Video leads are probed with ffprobe. The job's
/// `sample_rate` and `channels` set the output format when given. Otherwise
/// audio leads keep their own format, and sample-less leads take the first
/// filler's format, else the defaults.
pub fn resolve_lead(job: &Job, first_filler: Option<&Track>) -> Result<ResolvedLead> {
    let sample_rate = job
        .sample_rate
        .or(first_filler.map(|t| t.sample_rate()))
        .unwrap_or(DEFAULT_SAMPLE_RATE);
    let channels = job
        .channels
        .or(first_filler.map(|t| t.channel_count()))
        .unwrap_or(DEFAULT_CHANNELS);

    match &job.lead {
        LeadSource::Duration(duration) => Ok(ResolvedLead {
            spec: LeadSpec::new(*duration, sample_rate, channels)?,
            audio: None,
            path: None,
        }),
        LeadSource::Path(path) if codec::is_supported(path) => {
            let track = codec::decode_path(path)
                .with_context(|| format!("failed to decode lead '{}'", path.display()))?;
            let spec = LeadSpec::new(
                track.duration(),
                job.sample_rate.unwrap_or(track.sample_rate()),
                job.channels.unwrap_or(track.channel_count()),
            )?;
            Ok(ResolvedLead {
                spec,
                audio: Some(track),
                path: Some(path.clone()),
            })
        }
        LeadSource::Path(path) => {
            let duration = media::probe_duration(path)
                .with_context(|| format!("failed to probe lead '{}'", path.display()))?;
            Ok(ResolvedLead {
                spec: LeadSpec::new(duration, sample_rate, channels)?,
                audio: None,
                path: Some(path.clone()),
            })
        }
    }
}

fn write_outputs(
    job: &Job,
    lead: &ResolvedLead,
    track: &Track,
    encoding: SampleEncoding,
) -> Result<(Option<PathBuf>, Option<PathBuf>)> {
    if let Some(output) = &job.output {
        create_parent(output)?;
        codec::encode_wav(track, output, encoding)
            .with_context(|| format!("failed to write '{}'", output.display()))?;
        info!(path = %output.display(), "wrote reconciled audio");
    }

    let Some(mux_into) = &job.mux_into else {
        return Ok((job.output.clone(), None));
    };
    let video = lead
        .path
        .as_deref()
        .context("muxing needs a video file as the lead")?;
    if lead.audio.is_some() {
        warn!(lead = %video.display(), "lead is an audio file, ffmpeg will find no video stream");
    }

    // The temp dir is removed on every exit path, including ffmpeg failure.
    let scratch = tempfile::Builder::new()
        .prefix("trackfit-")
        .tempdir()
        .context("failed to create a temporary directory")?;
    let audio = match &job.output {
        Some(output) => output.clone(),
        None => {
            let path = scratch.path().join("reconciled.wav");
            codec::encode_wav(track, &path, encoding)?;
            path
        }
    };

    create_parent(mux_into)?;
    media::mux_audio(video, &audio, mux_into)
        .with_context(|| format!("failed to mux into '{}'", mux_into.display()))?;
    info!(path = %mux_into.display(), "wrote video");

    Ok((job.output.clone(), Some(mux_into.clone())))
}

fn create_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create directory '{}'", parent.display()))?;
    }
    Ok(())
}

/// Exit code for a failed job.
///
/// Reconciler errors and ffmpeg failures while muxing are processing errors;
/// everything else is an input error.
pub fn exit_code_for(err: &anyhow::Error) -> u8 {
    for cause in err.chain() {
        if let Some(audio) = cause.downcast_ref::<AudioError>() {
            if audio.is_reconcile_error() {
                return EXIT_PROCESSING_ERROR;
            }
        }
        if let Some(MediaError::ToolFailed { tool: "ffmpeg", .. }) =
            cause.downcast_ref::<MediaError>()
        {
            return EXIT_PROCESSING_ERROR;
        }
    }
    EXIT_INPUT_ERROR
}

/// Stable code for the first recognizable error in the chain.
pub fn error_code_for(err: &anyhow::Error) -> &'static str {
    for cause in err.chain() {
        if let Some(audio) = cause.downcast_ref::<AudioError>() {
            return audio.code();
        }
        if cause.downcast_ref::<MediaError>().is_some() {
            return crate::commands::json_output::error_codes::MEDIA_TOOL;
        }
        if cause.downcast_ref::<crate::job::JobError>().is_some() {
            return crate::commands::json_output::error_codes::INVALID_JOB;
        }
    }
    crate::commands::json_output::error_codes::GENERAL
}
