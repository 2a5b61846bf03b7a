use std::path::Path;

use anyhow::Result;

/// Execute the `config` command: dump the resolved configuration as JSON.
pub fn execute(sar_path: &Path) -> Result<()> {
    let document = super::open_document(sar_path)?;
    let configuration = document.configuration();
    println!("{}", serde_json::to_string_pretty(&configuration)?);
    Ok(())
}
