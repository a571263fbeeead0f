//! Error types for the farmstat library.

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Main error type for farmstat operations.
#[derive(Debug, Error)]
pub enum FarmError {
    /// The file does not exist.
    #[error("File not found: '{path}'")]
    NotFound { path: PathBuf },

    /// The file exists but cannot be read or written.
    #[error("Permission denied for '{path}'")]
    PermissionDenied { path: PathBuf },

    /// Any other error reading or writing a file.
    #[error("IO error for '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Malformed CSV content.
    #[error("Parse error at row {row}: {message}")]
    Parse { row: usize, message: String },

    /// Error from the CSV library.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Unknown record field or column name.
    #[error("Unknown field: {0}")]
    InvalidField(String),

    /// Unknown comparison or boolean operator.
    #[error("Unknown operator: {0}")]
    InvalidOperator(String),

    /// A condition expression that could not be parsed.
    #[error("Invalid condition: {0}")]
    InvalidCondition(String),
}

impl FarmError {
    /// Classify an I/O error raised while touching `path`.
    pub fn from_io(path: &Path, source: io::Error) -> Self {
        match source.kind() {
            io::ErrorKind::NotFound => FarmError::NotFound {
                path: path.to_path_buf(),
            },
            io::ErrorKind::PermissionDenied => FarmError::PermissionDenied {
                path: path.to_path_buf(),
            },
            _ => FarmError::Io {
                path: path.to_path_buf(),
                source,
            },
        }
    }
}

/// Result type alias for farmstat operations.
pub type Result<T> = std::result::Result<T, FarmError>;
