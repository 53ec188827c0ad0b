//! Doctor command implementation
//!
//! Checks external tools and the working environment.

use anyhow::Result;
use colored::Colorize;
use std::env;
use std::process::ExitCode;
use trackfit_audio::codec::{COMPRESSED_EXTENSIONS, WAV_EXTENSIONS};

use crate::media::tool_version;

/// External tools trackfit shells out to, with what they are needed for.
const TOOLS: &[(&str, &str)] = &[
    ("ffprobe", "needed for video leads"),
    ("ffmpeg", "needed for --mux-into"),
];

/// Run the doctor command
///
/// Checks:
/// - ffmpeg and ffprobe installation
/// - Output directory permissions
/// - Version information
///
/// # Returns
/// Exit code: 0 if all checks pass, 1 if any fail
pub fn run() -> Result<ExitCode> {
    println!("{}", "trackfit doctor".cyan().bold());
    println!("{}", "===============".cyan());
    println!();

    let mut all_ok = true;

    println!("{}", "Versions:".bold());
    println!(
        "  {} trackfit-cli v{}",
        "->".green(),
        env!("CARGO_PKG_VERSION")
    );
    println!();

    println!("{}", "Dependencies:".bold());
    for (tool, purpose) in TOOLS {
        match tool_version(tool) {
            Some(version) => println!("  {} {} {} (found in PATH)", "ok".green(), tool, version),
            None => {
                println!("  {} {} not found in PATH", "!!".red(), tool);
                println!("     {}", format!("{} is {}.", tool, purpose).dimmed());
                all_ok = false;
            }
        }
    }
    println!();

    println!("{}", "Formats:".bold());
    println!(
        "  {} decoded: {}",
        "->".green(),
        WAV_EXTENSIONS
            .iter()
            .chain(COMPRESSED_EXTENSIONS)
            .copied()
            .collect::<Vec<_>>()
            .join(", ")
    );
    println!("  {} written: wav (pcm16, float32)", "->".green());
    println!();

    println!("{}", "Permissions:".bold());
    match env::current_dir() {
        Ok(dir) => {
            let test_file = dir.join(".trackfit_write_test");
            match std::fs::write(&test_file, "test") {
                Ok(_) => {
                    let _ = std::fs::remove_file(&test_file);
                    println!(
                        "  {} Current directory is writable ({})",
                        "ok".green(),
                        dir.display()
                    );
                }
                Err(e) => {
                    println!("  {} Cannot write to current directory: {}", "!!".red(), e);
                    all_ok = false;
                }
            }
        }
        Err(e) => {
            println!("  {} Cannot determine current directory: {}", "!!".red(), e);
            all_ok = false;
        }
    }
    println!();

    println!("{}", "Logging:".bold());
    match env::var("RUST_LOG") {
        Ok(filter) => println!("  {} RUST_LOG={}", "->".green(), filter),
        Err(_) => println!(
            "  {} RUST_LOG unset, using {}",
            "->".green(),
            crate::logging::DEFAULT_FILTER
        ),
    }
    println!();

    if all_ok {
        println!("{} All checks passed!", "SUCCESS".green().bold());
        Ok(ExitCode::SUCCESS)
    } else {
        println!(
            "{} Some checks failed. See above for details.",
            "WARNING".yellow().bold()
        );
        Ok(ExitCode::from(1))
    }
}
