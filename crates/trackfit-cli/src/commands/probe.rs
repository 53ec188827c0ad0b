//! Probe command implementation
//!
//! Prints duration and format of a media file.

use anyhow::{Context, Result};
use colored::Colorize;
use std::path::Path;
use std::process::ExitCode;
use trackfit_audio::codec;
use trackfit_audio::Timeline;

use super::json_output::ProbeOutput;
use crate::media;

/// Run the probe command
///
/// Audio files are decoded; anything else is measured with ffprobe.
///
/// # Returns
/// Exit code: 0 success (errors are returned and reported by `main`)
pub fn run(path: &str, json_output: bool) -> Result<ExitCode> {
    let output = probe(Path::new(path))?;

    if json_output {
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(ExitCode::SUCCESS);
    }

    println!("{} {}", "File:".cyan().bold(), output.path);
    println!("  {} {:.3}s", "Duration:".dimmed(), output.duration);
    if let (Some(rate), Some(channels), Some(frames)) =
        (output.sample_rate, output.channels, output.frames)
    {
        println!("  {} {} Hz", "Sample rate:".dimmed(), rate);
        println!("  {} {}", "Channels:".dimmed(), channels);
        println!("  {} {}", "Frames:".dimmed(), frames);
    }
    if let Some(peak) = output.peak {
        println!("  {} {:.4}", "Peak:".dimmed(), peak);
    }
    if let Some(hash) = &output.pcm_hash {
        println!("  {} {}", "PCM hash:".dimmed(), hash);
    }
    println!("  {} {}", "Source:".dimmed(), output.source);
    Ok(ExitCode::SUCCESS)
}

/// Measures a media file.
pub fn probe(path: &Path) -> Result<ProbeOutput> {
    if codec::is_supported(path) {
        let track = codec::decode_path(path)
            .with_context(|| format!("failed to decode '{}'", path.display()))?;
        return Ok(ProbeOutput {
            path: path.display().to_string(),
            duration: track.duration(),
            sample_rate: Some(track.sample_rate()),
            channels: Some(track.channel_count()),
            frames: Some(track.frames()),
            peak: Some(track.peak()),
            pcm_hash: Some(codec::pcm_hash(&track)),
            source: "decoder".to_string(),
        });
    }

    let duration = media::probe_duration(path)
        .with_context(|| format!("failed to probe '{}'", path.display()))?;
    Ok(ProbeOutput {
        path: path.display().to_string(),
        duration,
        sample_rate: None,
        channels: None,
        frames: None,
        peak: None,
        pcm_hash: None,
        source: "ffprobe".to_string(),
    })
}
