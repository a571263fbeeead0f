//! CSV persistence for farm statistics records.

mod reader;
mod source;
mod writer;

pub use reader::DEFAULT_MAX_RECORDS;
pub use source::DatasetInfo;
pub use writer::write_csv;

/// UTF-8 byte-order mark accepted on read and emitted on write.
pub(crate) const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Repository configuration.
#[derive(Debug, Clone)]
pub struct RepositoryConfig {
    /// Field delimiter.
    pub delimiter: u8,
    /// Whether written files start with a UTF-8 byte-order mark.
    pub write_bom: bool,
}

impl Default for RepositoryConfig {
    fn default() -> Self {
        Self {
            delimiter: b',',
            write_bom: true,
        }
    }
}

/// Reads and writes record files.
///
/// Loading and saving live in `reader` and `writer`; this type only carries
/// the configuration they share.
#[derive(Debug, Clone, Default)]
pub struct Repository {
    config: RepositoryConfig,
}

impl Repository {
    /// Create a repository with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a repository with custom configuration.
    pub fn with_config(config: RepositoryConfig) -> Self {
        Self { config }
    }
}
