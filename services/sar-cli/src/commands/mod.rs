pub mod bom;
pub mod config;
pub mod diff;
pub mod partslist;

use std::path::Path;

use anyhow::{Context, Result};
use catc_utils::sar::WORKBOOK_EXTENSIONS;
use catc_utils::{validate_file_exists, validate_file_type, PartsCatalog, SarDocument};
use tracing::info;

/// Open a SAR workbook and resolve its release.
pub fn open_document(sar_path: &Path) -> Result<SarDocument> {
    validate_file_exists(sar_path, "Specified SAR file")?;
    validate_file_type(sar_path, WORKBOOK_EXTENSIONS)?;
    let document = SarDocument::open(sar_path)
        .with_context(|| format!("Failed to read SAR file: {}", sar_path.display()))?;
    info!(path = %sar_path.display(), release = document.release.id(), "Opened SAR workbook");
    Ok(document)
}

pub fn load_catalog(parts_path: &Path) -> Result<PartsCatalog> {
    validate_file_exists(parts_path, "Parts file")?;
    PartsCatalog::load(parts_path)
        .with_context(|| format!("Failed to load parts file: {}", parts_path.display()))
}
