//! ffprobe / ffmpeg subprocess helpers.
//!
//! Video files never go through the audio decoder. Their duration comes from
//! `ffprobe`, and reconciled audio is put back onto the picture with `ffmpeg`.

use std::path::Path;
use std::process::{Command, Output};

use thiserror::Error;
use tracing::{debug, info};

/// Errors from external media tools.
#[derive(Debug, Error)]
pub enum MediaError {
    /// The tool is not installed or not on `PATH`.
    #[error("{tool} not found in PATH")]
    ToolMissing {
        /// Tool name.
        tool: &'static str,
    },

    /// The tool ran and exited unsuccessfully.
    #[error("{tool} failed ({status}): {stderr}")]
    ToolFailed {
        /// Tool name.
        tool: &'static str,
        /// Exit status as printed by the OS.
        status: String,
        /// Last line of the tool's stderr.
        stderr: String,
    },

    /// ffprobe printed something that is not a positive duration.
    #[error("could not parse a duration from ffprobe output {output:?}")]
    BadDuration {
        /// The raw output.
        output: String,
    },

    /// Spawning the tool failed for another reason.
    #[error("I/O error running {tool}: {source}")]
    Io {
        /// Tool name.
        tool: &'static str,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },
}

/// Container duration of a media file in seconds, via ffprobe.
pub fn probe_duration(path: &Path) -> Result<f64, MediaError> {
    let output = run_tool(
        "ffprobe",
        Command::new("ffprobe")
            .args([
                "-v",
                "error",
                "-show_entries",
                "format=duration",
                "-of",
                "default=noprint_wrappers=1:nokey=1",
            ])
            .arg(path),
    )?;
    let duration = parse_duration(&String::from_utf8_lossy(&output.stdout))?;
    debug!(path = %path.display(), duration, "probed media duration");
    Ok(duration)
}

/// Parses ffprobe's bare `format=duration` output.
pub fn parse_duration(stdout: &str) -> Result<f64, MediaError> {
    let trimmed = stdout.trim();
    match trimmed.lines().next().map(str::trim).map(str::parse::<f64>) {
        Some(Ok(d)) if d.is_finite() && d > 0.0 => Ok(d),
        _ => Err(MediaError::BadDuration {
            output: trimmed.to_string(),
        }),
    }
}

/// Replaces the audio of `video` with `audio`, writing `output`.
///
/// The picture stream is copied, audio is encoded as AAC and the result is
/// cut to the shorter of the two streams.
pub fn mux_audio(video: &Path, audio: &Path, output: &Path) -> Result<(), MediaError> {
    info!(video = %video.display(), output = %output.display(), "muxing audio onto video");
    run_tool(
        "ffmpeg",
        Command::new("ffmpeg")
            .args(["-y", "-v", "error", "-i"])
            .arg(video)
            .arg("-i")
            .arg(audio)
            .args(MUX_ARGS)
            .arg(output),
    )?;
    Ok(())
}

/// Stream mapping and codec arguments used by [`mux_audio`].
pub const MUX_ARGS: [&str; 9] = [
    "-map", "0:v:0", "-map", "1:a:0", "-c:v", "copy", "-c:a", "aac", "-shortest",
];

/// Version string reported by `<tool> -version`, if the tool runs.
pub fn tool_version(tool: &str) -> Option<String> {
    let output = Command::new(tool).arg("-version").output().ok()?;
    if output.status.success() {
        parse_tool_version(&String::from_utf8_lossy(&output.stdout))
    } else {
        None
    }
}

/// Parses "ffmpeg version 6.1.1 Copyright ..." into "6.1.1".
pub fn parse_tool_version(output: &str) -> Option<String> {
    let line = output.lines().next()?;
    let mut words = line.split_whitespace();
    words.by_ref().find(|word| *word == "version")?;
    words.next().map(str::to_string)
}

fn run_tool(tool: &'static str, command: &mut Command) -> Result<Output, MediaError> {
    let output = command.output().map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            MediaError::ToolMissing { tool }
        } else {
            MediaError::Io { tool, source: e }
        }
    })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(MediaError::ToolFailed {
            tool,
            status: output.status.to_string(),
            stderr: stderr.trim().lines().last().unwrap_or("").to_string(),
        });
    }
    Ok(output)
}
