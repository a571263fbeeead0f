//! CLI command implementations.

pub mod filter;
pub mod menu;
pub mod search;
pub mod top;

use std::path::Path;

use farmstat::RecordService;

/// Line printed when the program ends, including on Ctrl-C.
pub const FAREWELL: &str = "Thank you for using Farmstat!";

/// Whether an interactive action wants the menu to keep going.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

/// Load a dataset for a one-shot command.
pub fn load_service(
    path: &Path,
    max_records: usize,
) -> Result<RecordService, Box<dyn std::error::Error>> {
    if !path.exists() {
        return Err(format!("Dataset not found: {}", path.display()).into());
    }

    let mut service = RecordService::new();
    if !service.load_from_file(path, Some(max_records)) {
        return Err(format!("Failed to load dataset: {}", path.display()).into());
    }
    Ok(service)
}
