use std::path::PathBuf;
use thiserror::Error;

/// Result type for scanner operations
pub type Result<T> = std::result::Result<T, ScannerError>;

/// Errors that can occur while scanning a source file
///
/// Lexical irregularities (unterminated comments, stray quotes) are never
/// reported here: they are absorbed by the scanner and surface as data on the
/// produced records instead.
#[derive(Error, Debug)]
pub enum ScannerError {
    /// The source file is missing, unreadable, or not a regular file
    #[error("Cannot read {}: {}", .path.display(), .source)]
    FileAccess {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl ScannerError {
    /// Create a file access error for `path`
    pub fn file_access(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::FileAccess {
            path: path.into(),
            source,
        }
    }

    /// Create an invalid config error
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }

    /// Path of the file that could not be read, if this is a file access error
    #[must_use]
    pub fn path(&self) -> Option<&std::path::Path> {
        match self {
            Self::FileAccess { path, .. } => Some(path.as_path()),
            Self::InvalidConfig(_) => None,
        }
    }
}
