//! Error types for the storage edges (high score, settings)
//!
//! None of these reach the simulation: callers log them and fall back to
//! defaults.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum StorageError {
    /// Error reading or writing a file
    #[error("I/O error on '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Stored high score is not a non-negative integer
    #[error("Invalid high score value: {0:?}")]
    InvalidScore(String),

    /// Settings JSON could not be (de)serialized
    #[error("Settings format error: {0}")]
    Json(#[from] serde_json::Error),

    /// Browser storage is not available (private mode, no window)
    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

impl StorageError {
    pub fn io(path: &std::path::Path, source: std::io::Error) -> Self {
        StorageError::Io {
            path: path.display().to_string(),
            source,
        }
    }

    /// Missing file, as opposed to a broken one
    pub fn is_not_found(&self) -> bool {
        matches!(self, StorageError::Io { source, .. } if source.kind() == std::io::ErrorKind::NotFound)
    }
}

pub type Result<T> = std::result::Result<T, StorageError>;
