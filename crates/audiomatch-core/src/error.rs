//! Error types for the audiomatch library

use std::path::PathBuf;
use thiserror::Error;

/// Failures surfaced to callers.
///
/// Only ingestion and configuration problems are errors. Numeric edge cases
/// inside fingerprinting and matching degrade to a zero score or a
/// non-match instead.
#[derive(Debug, Error)]
pub enum AudioMatchError {
    #[error("{} does not exist", .0.display())]
    NotFound(PathBuf),

    #[error("{} is not a supported format", .0.display())]
    UnsupportedFormat(PathBuf),

    #[error("failed to decode {}: {reason}", path.display())]
    Decode { path: PathBuf, reason: String },

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid configuration: {0}")]
    Config(String),
}

impl AudioMatchError {
    pub(crate) fn decode(path: &std::path::Path, reason: impl ToString) -> Self {
        Self::Decode {
            path: path.to_path_buf(),
            reason: reason.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, AudioMatchError>;
