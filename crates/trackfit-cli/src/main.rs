//! trackfit CLI - fit narration, music and other fillers to a lead timeline
//!
//! This binary provides commands for reconciling audio against a lead,
//! probing media, classifying mood and running batches of jobs.

mod cli_args;

use clap::Parser;
use std::process::ExitCode;

use cli_args::{Cli, Commands};
use trackfit_cli::commands;
use trackfit_cli::commands::reconcile::ReconcileFlags;
use trackfit_cli::logging;

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let result = match cli.command {
        Commands::Reconcile {
            job,
            lead,
            duration,
            narration,
            narration_gain,
            music,
            music_gain,
            filler,
            lead_gain,
            mood,
            mood_text,
            music_dir,
            output,
            encoding,
            fade_out,
            mux_into,
            sample_rate,
            channels,
            json,
        } => {
            let flags = ReconcileFlags {
                lead,
                duration,
                narration,
                narration_gain,
                music,
                music_gain,
                fillers: filler,
                lead_gain,
                mood,
                mood_text,
                music_dir,
                output,
                encoding,
                fade_out,
                mux_into,
                sample_rate,
                channels,
            };
            commands::reconcile::run(job.as_deref(), flags, json)
        }
        Commands::Probe { path, json } => commands::probe::run(&path, json),
        Commands::Mood { text, file, json } => {
            commands::mood::run(text.as_deref(), file.as_deref(), json)
        }
        Commands::Batch { dir, threads, json } => commands::batch::run(&dir, threads, json),
        Commands::Doctor => commands::doctor::run(),
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{}: {:#}", colored::Colorize::red("error"), e);
            ExitCode::from(1)
        }
    }
}
