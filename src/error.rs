use std::path::PathBuf;

use thiserror::Error;

/// Result alias for transcript reconstruction and storage
pub type TranscriptResult<T> = Result<T, TranscriptError>;

/// Errors raised while reading, reconstructing, or persisting a transcript
#[derive(Error, Debug)]
pub enum TranscriptError {
    /// Source document is missing or could not be opened
    #[error("transcript document not found or unreadable: {path:?} ({reason})")]
    NotFound { path: PathBuf, reason: String },

    /// Document layout does not match what the reconstruction expects
    #[error("malformed transcript: {0}")]
    MalformedInput(String),

    #[error("storage error: {0}")]
    Storage(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl TranscriptError {
    pub fn not_found(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::NotFound {
            path: path.into(),
            reason: reason.into(),
        }
    }

    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::MalformedInput(msg.into())
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    pub fn is_malformed(&self) -> bool {
        matches!(self, Self::MalformedInput(_))
    }
}
