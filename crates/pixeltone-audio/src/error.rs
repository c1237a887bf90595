//! Error types for the audio engine.

use thiserror::Error;

/// Result type for audio operations.
pub type AudioResult<T> = Result<T, AudioError>;

/// Errors that can occur while processing or encoding audio.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AudioError {
    /// The input buffer has no sample frames.
    #[error("buffer contains no samples")]
    EmptyBuffer,

    /// The requested effect identifier is not known.
    #[error("unsupported effect: '{id}'")]
    UnsupportedEffect {
        /// The identifier that failed to resolve.
        id: String,
    },

    /// A numeric control is outside its documented range.
    #[error("invalid parameter '{name}': {message}")]
    InvalidParameter {
        /// Parameter name.
        name: String,
        /// Error message.
        message: String,
    },

    /// WAV serialization failed.
    #[error("WAV encoding failed: {message}")]
    Encoding {
        /// Error message.
        message: String,
    },
}

impl AudioError {
    /// Creates an invalid parameter error.
    pub fn invalid_param(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name: name.into(),
            message: message.into(),
        }
    }

    /// Creates an unsupported effect error.
    pub fn unsupported_effect(id: impl Into<String>) -> Self {
        Self::UnsupportedEffect { id: id.into() }
    }

    /// Creates an encoding error.
    pub fn encoding(message: impl Into<String>) -> Self {
        Self::Encoding {
            message: message.into(),
        }
    }

    /// Stable machine-readable error code.
    pub fn code(&self) -> &'static str {
        match self {
            AudioError::EmptyBuffer => "AUDIO_001",
            AudioError::UnsupportedEffect { .. } => "AUDIO_002",
            AudioError::InvalidParameter { .. } => "AUDIO_003",
            AudioError::Encoding { .. } => "AUDIO_004",
        }
    }

    /// Error category used when reporting.
    pub fn category(&self) -> &'static str {
        "audio"
    }
}
