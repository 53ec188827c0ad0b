//! Mood presets: keyword classification and the voice / music tables.
//!
//! A mood picks a narration voice and a background music style. Music styles
//! resolve to files in a music directory by trying a short list of candidate
//! file stems per style.

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use trackfit_audio::codec::is_supported;

/// Extensions tried, in order, when resolving a music file.
pub const MUSIC_EXTENSIONS: &[&str] = &["mp3", "wav", "flac", "ogg", "m4a"];

/// Story mood.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mood {
    Happy,
    Sad,
    Epic,
    Peaceful,
    Mysterious,
    Dramatic,
}

impl Mood {
    /// All moods, in classification priority order.
    pub const ALL: [Mood; 6] = [
        Mood::Happy,
        Mood::Sad,
        Mood::Epic,
        Mood::Peaceful,
        Mood::Mysterious,
        Mood::Dramatic,
    ];

    /// Mood used when no keyword matches.
    pub const DEFAULT: Mood = Mood::Peaceful;

    /// Returns the string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Mood::Happy => "happy",
            Mood::Sad => "sad",
            Mood::Epic => "epic",
            Mood::Peaceful => "peaceful",
            Mood::Mysterious => "mysterious",
            Mood::Dramatic => "dramatic",
        }
    }

    /// Lower-case keywords that select this mood.
    pub fn keywords(&self) -> &'static [&'static str] {
        match self {
            Mood::Happy => &["happy", "joy", "smile", "bright", "cheerful", "upbeat"],
            Mood::Sad => &["sad", "gloomy", "dark", "tear", "lonely"],
            Mood::Epic => &["epic", "hero", "battle", "adventure", "grand"],
            Mood::Peaceful => &["peaceful", "calm", "serene", "quiet", "gentle"],
            Mood::Mysterious => &["mysterious", "mystery", "secret", "unknown", "shadow"],
            Mood::Dramatic => &["dramatic", "intense", "shock", "surprise", "powerful"],
        }
    }

    /// Text-to-speech voice for narration in this mood.
    pub fn voice(&self) -> &'static str {
        match self {
            Mood::Happy => "nova",
            Mood::Sad => "echo",
            Mood::Epic => "onyx",
            Mood::Peaceful => "fable",
            Mood::Mysterious => "shimmer",
            Mood::Dramatic => "alloy",
        }
    }

    /// Background music style for this mood.
    pub fn music_style(&self) -> MusicStyle {
        match self {
            Mood::Happy => MusicStyle::Upbeat,
            Mood::Sad => MusicStyle::Calm,
            Mood::Epic => MusicStyle::Epic,
            Mood::Peaceful => MusicStyle::Peaceful,
            Mood::Mysterious => MusicStyle::Mysterious,
            Mood::Dramatic => MusicStyle::Dramatic,
        }
    }

    /// Parses a manual override name. `calm` and `upbeat` are accepted as
    /// aliases.
    pub fn from_name(name: &str) -> Option<Self> {
        Preset::from_override(name).map(|preset| preset.mood)
    }

    /// Voice and music style picked when this mood is classified from text.
    pub fn preset(&self) -> Preset {
        Preset {
            mood: *self,
            voice: self.voice(),
            music_style: self.music_style(),
        }
    }
}

/// A mood with the narration voice and music style chosen for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Preset {
    /// The mood.
    pub mood: Mood,
    /// Text-to-speech voice.
    pub voice: &'static str,
    /// Background music style.
    pub music_style: MusicStyle,
}

impl Preset {
    /// Looks up a manual override by name.
    ///
    /// Overrides have their own voice table: `calm` and `peaceful` narrate
    /// with `alloy` and `dramatic` with `fable`, unlike classified moods.
    pub fn from_override(name: &str) -> Option<Self> {
        let (mood, voice, music_style) = match name.trim().to_ascii_lowercase().as_str() {
            "happy" | "upbeat" => (Mood::Happy, "nova", MusicStyle::Upbeat),
            "sad" => (Mood::Sad, "echo", MusicStyle::Calm),
            "calm" | "peaceful" => (Mood::Peaceful, "alloy", MusicStyle::Peaceful),
            "epic" => (Mood::Epic, "onyx", MusicStyle::Epic),
            "mysterious" => (Mood::Mysterious, "shimmer", MusicStyle::Mysterious),
            "dramatic" => (Mood::Dramatic, "fable", MusicStyle::Dramatic),
            _ => return None,
        };
        Some(Self {
            mood,
            voice,
            music_style,
        })
    }
}

impl fmt::Display for Mood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Background music style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MusicStyle {
    Calm,
    Epic,
    Mysterious,
    Upbeat,
    Dramatic,
    Peaceful,
}

impl MusicStyle {
    /// Returns the string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            MusicStyle::Calm => "calm",
            MusicStyle::Epic => "epic",
            MusicStyle::Mysterious => "mysterious",
            MusicStyle::Upbeat => "upbeat",
            MusicStyle::Dramatic => "dramatic",
            MusicStyle::Peaceful => "peaceful",
        }
    }

    /// File stems tried, in order, when looking for music of this style.
    pub fn candidates(&self) -> &'static [&'static str] {
        match self {
            MusicStyle::Calm => &["calm", "peaceful", "relaxing"],
            MusicStyle::Epic => &["epic", "heroic", "dramatic"],
            MusicStyle::Mysterious => &["mysterious", "suspense", "dark"],
            MusicStyle::Upbeat => &["upbeat", "happy", "energetic"],
            MusicStyle::Dramatic => &["dramatic", "intense", "epic"],
            MusicStyle::Peaceful => &["peaceful", "calm", "serene"],
        }
    }
}

impl fmt::Display for MusicStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Classifies text by keyword.
///
/// Moods are checked in priority order and the first one with any keyword
/// contained in the lower-cased text wins.
pub fn classify(text: &str) -> Mood {
    let lower = text.to_lowercase();
    Mood::ALL
        .into_iter()
        .find(|mood| mood.keywords().iter().any(|kw| lower.contains(kw)))
        .unwrap_or(Mood::DEFAULT)
}

/// The most frequent mood across scenes. Ties go to the mood seen first.
///
/// Returns [`Mood::DEFAULT`] when there are no scenes.
pub fn dominant_mood<I, S>(scenes: I) -> Mood
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut counts: HashMap<Mood, (usize, usize)> = HashMap::new();
    for (order, scene) in scenes.into_iter().enumerate() {
        let entry = counts.entry(classify(scene.as_ref())).or_insert((0, order));
        entry.0 += 1;
    }
    counts
        .into_iter()
        .max_by(|(_, (count_a, first_a)), (_, (count_b, first_b))| {
            count_a.cmp(count_b).then(first_b.cmp(first_a))
        })
        .map(|(mood, _)| mood)
        .unwrap_or(Mood::DEFAULT)
}

/// Splits text into scenes on blank lines.
pub fn split_scenes(text: &str) -> Vec<&str> {
    text.split("\n\n")
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}

/// Finds a music file for `style` in `music_dir`.
///
/// Candidate stems are tried first, each with every extension in
/// [`MUSIC_EXTENSIONS`]. Failing that, the first non-empty file (by name) with
/// an extension the decoder supports is used. Files are not decoded here, so
/// a corrupt file still fails later at decode time. Returns `None` when
/// nothing fits.
pub fn resolve_music(music_dir: &Path, style: MusicStyle) -> Option<PathBuf> {
    if !music_dir.is_dir() {
        warn!(dir = %music_dir.display(), "music directory not found, skipping background music");
        return None;
    }

    for stem in style.candidates() {
        for ext in MUSIC_EXTENSIONS {
            let path = music_dir.join(format!("{}.{}", stem, ext));
            if is_non_empty_file(&path) {
                debug!(style = %style, path = %path.display(), "resolved music file");
                return Some(path);
            }
        }
    }

    let mut fallback: Vec<PathBuf> = std::fs::read_dir(music_dir)
        .ok()?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| is_supported(path) && is_non_empty_file(path))
        .collect();
    fallback.sort();

    match fallback.into_iter().next() {
        Some(path) => {
            debug!(style = %style, path = %path.display(), "using fallback music file");
            Some(path)
        }
        None => {
            warn!(style = %style, "no suitable music file found, skipping background music");
            None
        }
    }
}

fn is_non_empty_file(path: &Path) -> bool {
    std::fs::metadata(path)
        .map(|m| m.is_file() && m.len() > 0)
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_classify_by_keyword() {
        assert_eq!(classify("The hero rode into battle"), Mood::Epic);
        assert_eq!(classify("A LONELY night"), Mood::Sad);
        assert_eq!(classify("a secret door"), Mood::Mysterious);
        assert_eq!(classify("nothing to see"), Mood::Peaceful);
    }

    #[test]
    fn test_classify_priority_order() {
        // both happy and dramatic keywords present
        assert_eq!(classify("an intense but cheerful day"), Mood::Happy);
        // "dark" belongs to sad, which outranks mysterious
        assert_eq!(classify("a dark mystery"), Mood::Sad);
    }

    #[test]
    fn test_tables() {
        assert_eq!(Mood::Happy.voice(), "nova");
        assert_eq!(Mood::Dramatic.voice(), "alloy");
        assert_eq!(Mood::Happy.music_style(), MusicStyle::Upbeat);
        assert_eq!(Mood::Sad.music_style(), MusicStyle::Calm);
        assert_eq!(Mood::Epic.music_style(), MusicStyle::Epic);
    }

    #[test]
    fn test_override_table_differs_from_classified_voices() {
        let calm = Preset::from_override("calm").unwrap();
        assert_eq!(calm.mood, Mood::Peaceful);
        assert_eq!(calm.voice, "alloy");
        assert_eq!(calm.music_style, MusicStyle::Peaceful);

        let dramatic = Preset::from_override("Dramatic").unwrap();
        assert_eq!(dramatic.voice, "fable");
        assert_eq!(dramatic.music_style, MusicStyle::Dramatic);

        let upbeat = Preset::from_override("upbeat").unwrap();
        assert_eq!(upbeat, Preset::from_override("happy").unwrap());
        assert_eq!(Preset::from_override("sad").unwrap().music_style, MusicStyle::Calm);
        assert_eq!(Preset::from_override("angry"), None);

        // classification keeps its own table
        assert_eq!(Mood::Peaceful.preset().voice, "fable");
        assert_eq!(Mood::Dramatic.preset().voice, "alloy");
    }

    #[test]
    fn test_override_names() {
        assert_eq!(Mood::from_name("Calm"), Some(Mood::Peaceful));
        assert_eq!(Mood::from_name("upbeat"), Some(Mood::Happy));
        assert_eq!(Mood::from_name(" epic "), Some(Mood::Epic));
        assert_eq!(Mood::from_name("angry"), None);
    }

    #[test]
    fn test_dominant_mood() {
        let scenes = ["a calm lake", "the hero wins", "quiet evening", "a battle"];
        // peaceful and epic tie at two; peaceful appears first
        assert_eq!(dominant_mood(scenes), Mood::Peaceful);

        let scenes = ["a secret", "shadow play", "a happy end"];
        assert_eq!(dominant_mood(scenes), Mood::Mysterious);

        assert_eq!(dominant_mood(Vec::<String>::new()), Mood::DEFAULT);
    }

    #[test]
    fn test_split_scenes() {
        let text = "First scene.\n\n\n  Second scene.  \n\n";
        assert_eq!(split_scenes(text), vec!["First scene.", "Second scene."]);
    }

    #[test]
    fn test_resolve_music_prefers_candidates() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("aaa.mp3"), b"x").unwrap();
        std::fs::write(dir.path().join("heroic.mp3"), b"x").unwrap();
        std::fs::write(dir.path().join("epic.mp3"), b"").unwrap();

        let found = resolve_music(dir.path(), MusicStyle::Epic).unwrap();
        assert_eq!(found, dir.path().join("heroic.mp3"));
    }

    #[test]
    fn test_resolve_music_falls_back_to_any_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("zz.wav"), b"x").unwrap();
        std::fs::write(dir.path().join("notes.txt"), b"x").unwrap();
        std::fs::write(dir.path().join("bb.mp3"), b"x").unwrap();

        let found = resolve_music(dir.path(), MusicStyle::Calm).unwrap();
        assert_eq!(found, dir.path().join("bb.mp3"));
    }

    #[test]
    fn test_resolve_music_fallback_skips_unsupported_and_empty() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a_notes.txt"), b"x").unwrap();
        std::fs::write(dir.path().join("b_empty.wav"), b"").unwrap();
        std::fs::write(dir.path().join("c_cover.png"), b"x").unwrap();
        std::fs::write(dir.path().join("d_track.ogg"), b"x").unwrap();

        let found = resolve_music(dir.path(), MusicStyle::Dramatic).unwrap();
        assert_eq!(found, dir.path().join("d_track.ogg"));
    }

    #[test]
    fn test_resolve_music_missing_dir() {
        assert_eq!(
            resolve_music(Path::new("/nonexistent/trackfit/music"), MusicStyle::Calm),
            None
        );
    }
}
