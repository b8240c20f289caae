//! Error types for the loghandle library.

use std::path::PathBuf;

use thiserror::Error;

/// All errors that can occur in the loghandle library.
#[derive(Error, Debug)]
pub enum LogError {
    /// The path is empty or does not name a regular file location.
    #[error("Invalid log path: {0}")]
    InvalidPath(String),

    /// The log file, or the directory it should live in, is not writable.
    #[error("Permission denied: {}", path.display())]
    PermissionDenied { path: PathBuf },

    /// A message level could not be parsed.
    #[error("Invalid message level: {0}")]
    InvalidLevel(String),

    /// Configuration could not be read or written.
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl LogError {
    /// Classify an IO error raised while opening `path`.
    pub(crate) fn from_open(err: std::io::Error, path: &std::path::Path) -> Self {
        match err.kind() {
            std::io::ErrorKind::PermissionDenied => Self::PermissionDenied {
                path: path.to_path_buf(),
            },
            _ => Self::Io(err),
        }
    }
}

impl From<toml::de::Error> for LogError {
    fn from(err: toml::de::Error) -> Self {
        Self::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for LogError {
    fn from(err: toml::ser::Error) -> Self {
        Self::Config(err.to_string())
    }
}

/// Convenience result type for loghandle operations.
pub type LogResult<T> = Result<T, LogError>;
