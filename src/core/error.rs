// src/core/error.rs
//
// Error type shared by the synthesis, preview and container code.

use thiserror::Error;

/// Errors produced by the conversion pipeline
#[derive(Debug, Error)]
pub enum SonifyError {
    #[error("invalid configuration: {field} {reason}")]
    InvalidConfig {
        field: &'static str,
        reason: String,
    },

    #[error("unsupported bit depth {0} (expected 8, 16, 24 or 32)")]
    UnsupportedBitDepth(u16),

    #[error("pixel buffer holds {len} pixels but {width}x{height} needs {}", .width * .height)]
    PixelBufferMismatch {
        width: usize,
        height: usize,
        len: usize,
    },

    #[error("audio data of {0} bytes does not fit in a RIFF container")]
    ContainerTooLarge(u64),

    #[error("malformed WAV header: {0}")]
    MalformedHeader(String),

    #[error("conversion cancelled")]
    Cancelled,

    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("config file error: {0}")]
    Config(#[from] serde_json::Error),
}

impl SonifyError {
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        SonifyError::InvalidConfig {
            field,
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, SonifyError>;
