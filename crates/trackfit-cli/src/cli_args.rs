//! CLI argument definitions for the trackfit command-line interface.
//!
//! All `#[derive(Parser)]` and `#[derive(Subcommand)]` types are defined here,
//! keeping `main.rs` focused on dispatch logic.

use clap::{Parser, Subcommand};
use trackfit_cli::job::FillerEntry;

/// trackfit - fit narration and music to a lead timeline
#[derive(Parser)]
#[command(name = "trackfit")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub(crate) struct Cli {
    /// Log debug detail to stderr (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Trim or loop fillers to the lead's duration and mix them
    Reconcile {
        /// Job file (JSON); cannot be combined with the other job flags
        #[arg(
            short,
            long,
            conflicts_with_all = [
                "lead", "duration", "narration", "narration_gain", "music", "music_gain",
                "filler", "lead_gain", "mood", "mood_text", "music_dir", "output",
                "encoding", "fade_out", "mux_into", "sample_rate", "channels",
            ]
        )]
        job: Option<String>,

        /// Lead audio or video file
        #[arg(short, long, conflicts_with = "duration")]
        lead: Option<String>,

        /// Lead duration in seconds (instead of a lead file)
        #[arg(short, long)]
        duration: Option<f64>,

        /// Narration file; also the lead when neither --lead nor --duration is given
        #[arg(short, long)]
        narration: Option<String>,

        /// Narration gain (default: 1.0)
        #[arg(long)]
        narration_gain: Option<f64>,

        /// Background music file
        #[arg(short, long)]
        music: Option<String>,

        /// Music gain, also used for mood music (default: 0.3)
        #[arg(long)]
        music_gain: Option<f64>,

        /// Extra filler as PATH[:GAIN] (repeatable)
        #[arg(short, long, value_parser = parse_filler)]
        filler: Vec<FillerEntry>,

        /// Mix the lead's own audio in at this gain
        #[arg(long)]
        lead_gain: Option<f64>,

        /// Mood override, or "auto" to classify --mood-text
        #[arg(long)]
        mood: Option<String>,

        /// Text to classify for mood music
        #[arg(long)]
        mood_text: Option<String>,

        /// Directory with mood music files
        #[arg(long)]
        music_dir: Option<String>,

        /// Output WAV path
        #[arg(short, long)]
        output: Option<String>,

        /// Output sample encoding
        #[arg(long, value_parser = ["pcm16", "float32"])]
        encoding: Option<String>,

        /// Fade trimmed fillers out over this many seconds
        #[arg(long)]
        fade_out: Option<f64>,

        /// Write a copy of the lead video with the reconciled audio
        #[arg(long)]
        mux_into: Option<String>,

        /// Output sample rate (default: the lead's, else the first filler's)
        #[arg(long)]
        sample_rate: Option<u32>,

        /// Output channel count (default: the lead's, else the first filler's)
        #[arg(long)]
        channels: Option<u16>,

        /// Output machine-readable JSON (no colored output)
        #[arg(long)]
        json: bool,
    },

    /// Print duration and format of a media file
    Probe {
        /// File to probe
        path: String,

        /// Output machine-readable JSON (no colored output)
        #[arg(long)]
        json: bool,
    },

    /// Classify text into a mood with voice and music style
    Mood {
        /// Text to classify
        #[arg(short, long, conflicts_with = "file")]
        text: Option<String>,

        /// File to classify (scenes separated by blank lines)
        #[arg(short, long)]
        file: Option<String>,

        /// Output machine-readable JSON (no colored output)
        #[arg(long)]
        json: bool,
    },

    /// Run every job file in a directory in parallel
    Batch {
        /// Directory scanned recursively for *.json jobs
        dir: String,

        /// Worker threads (default: one per core)
        #[arg(short, long)]
        threads: Option<usize>,

        /// Output machine-readable JSON (no colored output)
        #[arg(long)]
        json: bool,
    },

    /// Check ffmpeg / ffprobe and the environment
    Doctor,
}

fn parse_filler(arg: &str) -> Result<FillerEntry, String> {
    FillerEntry::parse_arg(arg)
}
