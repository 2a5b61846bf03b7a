use std::path::Path;

use anyhow::Result;

/// Execute the `partslist` command: print the catalog in file order.
pub fn execute(parts_path: &Path) -> Result<()> {
    let catalog = super::load_catalog(parts_path)?;
    println!("{}", catalog.to_json_pretty()?);
    Ok(())
}
