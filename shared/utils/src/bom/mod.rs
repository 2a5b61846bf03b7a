//! BOM (Bill of Materials) Module
//!
//! Derives per-rack part quantities from a resolved configuration, renders
//! them, and reconciles them against the BOM transcribed in the workbook.

pub mod catalog;
pub mod reconcile;
pub mod report;
pub mod rules;

pub use catalog::PartsCatalog;
pub use reconcile::{BomEntry, BomReconciler, RackReconciliation, ReconciliationReport};
pub use report::{BomReport, ReportFormat};
pub use rules::{BomRuleEngine, PartsBuilder, PartsContribution};
