//! Mood command implementation
//!
//! Classifies text and prints the mood with its voice and music style.

use anyhow::{bail, Context, Result};
use colored::Colorize;
use std::process::ExitCode;

use super::json_output::{MoodOutput, SceneMood};
use crate::mood::{classify, dominant_mood, split_scenes};

/// Run the mood command
///
/// Text is split into scenes on blank lines. Each scene is classified and the
/// most frequent mood wins.
pub fn run(text: Option<&str>, file: Option<&str>, json_output: bool) -> Result<ExitCode> {
    let content = match (text, file) {
        (Some(text), None) => text.to_string(),
        (None, Some(path)) => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read '{}'", path))?,
        _ => bail!("pass exactly one of --text or --file"),
    };

    let output = analyze(&content);

    if json_output {
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(ExitCode::SUCCESS);
    }

    for scene in &output.scenes {
        println!("  {} scene {}: {}", "->".green(), scene.index + 1, scene.mood);
    }
    println!("{} {}", "Mood:".cyan().bold(), output.mood);
    println!("  {} {}", "Voice:".dimmed(), output.voice);
    println!("  {} {}", "Music style:".dimmed(), output.music_style);
    Ok(ExitCode::SUCCESS)
}

/// Classifies every scene of `text`.
pub fn analyze(text: &str) -> MoodOutput {
    let scenes = split_scenes(text);
    let mood = dominant_mood(&scenes);
    MoodOutput {
        mood: mood.as_str().to_string(),
        voice: mood.voice().to_string(),
        music_style: mood.music_style().as_str().to_string(),
        scenes: scenes
            .iter()
            .enumerate()
            .map(|(index, scene)| SceneMood {
                index,
                mood: classify(scene).as_str().to_string(),
            })
            .collect(),
    }
}
