//! Error types for the image mappers.

use pixeltone_audio::AudioError;
use thiserror::Error;

/// Result type for image operations.
pub type ImageResult<T> = Result<T, ImageError>;

/// Errors that can occur while mapping pixel data.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ImageError {
    /// The image has zero width or height.
    #[error("image has no pixels")]
    EmptyImage,

    /// The RGBA data does not match the stated dimensions.
    #[error(
        "{width}x{height} image needs {} RGBA bytes, got {len}",
        *width as u64 * *height as u64 * 4
    )]
    InvalidDimensions { width: u32, height: u32, len: usize },

    /// A control is outside its documented range.
    #[error("invalid parameter '{name}': {message}")]
    InvalidParameter {
        /// Parameter name.
        name: String,
        /// Error message.
        message: String,
    },

    /// Rendering through the audio engine failed.
    #[error(transparent)]
    Audio(#[from] AudioError),
}

impl ImageError {
    /// Creates an invalid parameter error.
    pub fn invalid_param(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name: name.into(),
            message: message.into(),
        }
    }

    /// Stable machine-readable error code.
    pub fn code(&self) -> &'static str {
        match self {
            ImageError::EmptyImage => "IMAGE_001",
            ImageError::InvalidDimensions { .. } => "IMAGE_002",
            ImageError::InvalidParameter { .. } => "IMAGE_003",
            ImageError::Audio(inner) => inner.code(),
        }
    }

    /// Error category used when reporting.
    pub fn category(&self) -> &'static str {
        match self {
            ImageError::Audio(inner) => inner.category(),
            _ => "image",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dimension_message() {
        let err = ImageError::InvalidDimensions {
            width: 2,
            height: 3,
            len: 5,
        };
        assert_eq!(err.to_string(), "2x3 image needs 24 RGBA bytes, got 5");
        assert_eq!(err.code(), "IMAGE_002");
        assert_eq!(err.category(), "image");
    }

    #[test]
    fn test_audio_errors_pass_through() {
        let err: ImageError = AudioError::EmptyBuffer.into();
        assert_eq!(err.code(), "AUDIO_001");
        assert_eq!(err.category(), "audio");
        assert_eq!(err.to_string(), "buffer contains no samples");
    }
}
