//! Metadata about a loaded dataset file.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Describes the file a record collection was loaded from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetInfo {
    /// File name without path.
    pub file: String,
    /// Full path to the file.
    pub path: PathBuf,
    /// SHA-256 hash of the file contents.
    pub hash: String,
    /// File size in bytes.
    pub size_bytes: u64,
    /// Number of records loaded (after applying the record cap).
    pub record_count: usize,
    /// When the file was loaded.
    pub loaded_at: DateTime<Utc>,
}

impl DatasetInfo {
    /// Create metadata for a file that has just been loaded.
    pub fn new(path: PathBuf, hash: String, size_bytes: u64, record_count: usize) -> Self {
        let file = path
            .file_name()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();

        Self {
            file,
            path,
            hash,
            size_bytes,
            record_count,
            loaded_at: Utc::now(),
        }
    }
}
