use std::path::Path;

use anyhow::Result;
use catc_utils::{BomReconciler, BomRuleEngine};
use tracing::info;

/// Execute the `diff` command: reconcile the transcribed BOM of every rack.
/// Differences are reported, not treated as failures.
pub fn execute(sar_path: &Path, parts_path: &Path) -> Result<()> {
    let document = super::open_document(sar_path)?;
    let catalog = super::load_catalog(parts_path)?;

    let configuration = document.configuration();
    let bom = BomRuleEngine::derive(&configuration, &catalog);
    let report = BomReconciler::new(&catalog)?.reconcile(&bom, &document);

    info!(clean = report.is_clean(), "Reconciled transcribed BOM");
    print!("{}", report.render_text());
    Ok(())
}
