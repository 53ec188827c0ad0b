//! Error types for the audio core.

use thiserror::Error;

/// Result type for audio operations.
pub type AudioResult<T> = Result<T, AudioError>;

/// Errors that can occur while decoding, reconciling, mixing or encoding tracks.
#[derive(Debug, Error)]
pub enum AudioError {
    /// A duration was negative, zero where a positive value is required, or not finite.
    #[error("invalid duration: {duration} seconds")]
    InvalidDuration {
        /// The invalid duration.
        duration: f64,
    },

    /// Tracks handed to the mixer do not share a common duration.
    #[error("track {index} lasts {found:.6}s but the mix expects {expected:.6}s")]
    DurationMismatch {
        /// Position of the offending track in the mix.
        index: usize,
        /// Duration of the first track in the mix.
        expected: f64,
        /// Duration of the offending track.
        found: f64,
    },

    /// Tracks handed to the mixer do not share sample rate or channel layout.
    #[error(
        "track {index} is {found_rate} Hz / {found_channels} ch but the mix expects \
         {expected_rate} Hz / {expected_channels} ch"
    )]
    FormatMismatch {
        /// Position of the offending track in the mix.
        index: usize,
        /// Sample rate of the first track.
        expected_rate: u32,
        /// Sample rate of the offending track.
        found_rate: u32,
        /// Channel count of the first track.
        expected_channels: u16,
        /// Channel count of the offending track.
        found_channels: u16,
    },

    /// The mixer was called without any tracks.
    #[error("cannot mix an empty set of tracks")]
    EmptyMix,

    /// Invalid sample rate.
    #[error("invalid sample rate: {rate}")]
    InvalidSampleRate {
        /// The invalid sample rate.
        rate: u32,
    },

    /// Invalid parameter value.
    #[error("invalid parameter '{name}': {message}")]
    InvalidParameter {
        /// Parameter name.
        name: String,
        /// Error message.
        message: String,
    },

    /// The media container holds no decodable audio stream.
    #[error("no decodable audio track found")]
    NoAudioTrack,

    /// Compressed media could not be decoded.
    #[error("decode error: {0}")]
    Decode(#[from] symphonia::core::errors::Error),

    /// WAV reading or writing failed.
    #[error("WAV error: {0}")]
    Wav(#[from] hound::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl AudioError {
    /// Creates an invalid parameter error.
    pub fn invalid_param(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name: name.into(),
            message: message.into(),
        }
    }

    /// Stable code for machine-readable reports.
    pub fn code(&self) -> &'static str {
        match self {
            AudioError::InvalidDuration { .. } => "TRACK_001",
            AudioError::DurationMismatch { .. } => "TRACK_002",
            AudioError::FormatMismatch { .. } => "TRACK_003",
            AudioError::EmptyMix => "TRACK_004",
            AudioError::InvalidSampleRate { .. } => "TRACK_005",
            AudioError::InvalidParameter { .. } => "TRACK_006",
            AudioError::NoAudioTrack => "TRACK_007",
            AudioError::Decode(_) => "TRACK_008",
            AudioError::Wav(_) => "TRACK_009",
            AudioError::Io(_) => "TRACK_010",
        }
    }

    /// Returns true for errors raised by the reconciler itself rather than by media I/O.
    pub fn is_reconcile_error(&self) -> bool {
        matches!(
            self,
            AudioError::InvalidDuration { .. }
                | AudioError::DurationMismatch { .. }
                | AudioError::FormatMismatch { .. }
                | AudioError::EmptyMix
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_param_helper() {
        let err = AudioError::invalid_param("fade_out_seconds", "must be non-negative");
        assert!(err.to_string().contains("fade_out_seconds"));
        assert!(err.to_string().contains("non-negative"));
    }

    #[test]
    fn test_duration_mismatch_names_index() {
        let err = AudioError::DurationMismatch {
            index: 1,
            expected: 5.0,
            found: 5.02,
        };
        let msg = err.to_string();
        assert!(msg.contains("track 1"));
        assert!(msg.contains("5.020000"));
        assert_eq!(err.code(), "TRACK_002");
    }

    #[test]
    fn test_codes_are_unique() {
        let errors = [
            AudioError::InvalidDuration { duration: -1.0 },
            AudioError::DurationMismatch {
                index: 1,
                expected: 1.0,
                found: 2.0,
            },
            AudioError::FormatMismatch {
                index: 1,
                expected_rate: 44100,
                found_rate: 48000,
                expected_channels: 2,
                found_channels: 2,
            },
            AudioError::EmptyMix,
            AudioError::InvalidSampleRate { rate: 0 },
            AudioError::invalid_param("a", "b"),
            AudioError::NoAudioTrack,
        ];
        let mut codes: Vec<_> = errors.iter().map(AudioError::code).collect();
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), errors.len());
    }

    #[test]
    fn test_reconcile_errors_are_classified() {
        assert!(AudioError::EmptyMix.is_reconcile_error());
        assert!(AudioError::InvalidDuration { duration: 0.0 }.is_reconcile_error());
        assert!(!AudioError::NoAudioTrack.is_reconcile_error());
    }
}
