use std::path::Path;

use anyhow::Result;
use catc_utils::{BomReport, BomRuleEngine, ReportFormat};
use tracing::info;

/// Execute the `bom` command: derive and print every rack's BOM.
pub fn execute(sar_path: &Path, parts_path: &Path, format: ReportFormat) -> Result<()> {
    let document = super::open_document(sar_path)?;
    let catalog = super::load_catalog(parts_path)?;

    let configuration = document.configuration();
    let bom = BomRuleEngine::derive(&configuration, &catalog);
    info!(racks = bom.racks.len(), lines = bom.lines().count(), "Derived BOM");

    print!("{}", BomReport::new(&bom, &catalog).render(format)?);
    Ok(())
}
