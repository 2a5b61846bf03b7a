//! BOM Reconciliation
//!
//! Compares the BOM transcribed on the order information sheet with the
//! derived one, line by line.

use std::fmt::Write as _;

use catc_models::{Bom, RackBom};
use regex::Regex;
use tracing::warn;

use super::catalog::PartsCatalog;
use super::report::{describe_part, format_line};
use crate::error::{SarError, SarResult};
use crate::sar::SarDocument;

/// `<qty> x <sku> <label>`; a leading `* ` on the label is dropped.
const TRANSCRIBED_LINE_PATTERN: &str = r"^(\d+)\s* x \s*(.*?) \s*(.*)$";

/// One BOM line as (quantity, SKU, label)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BomEntry {
    pub quantity: u32,
    pub sku: String,
    pub label: String,
}

impl BomEntry {
    pub fn new(quantity: u32, sku: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            quantity,
            sku: sku.into(),
            label: label.into(),
        }
    }
}

/// Transcribed BOM text split into parsed entries and lines that did not parse
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TranscribedBom {
    pub entries: Vec<BomEntry>,
    pub ignored_lines: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RackReconciliation {
    pub rack_id: u32,
    pub in_document_not_generated: Vec<BomEntry>,
    pub generated_not_in_document: Vec<BomEntry>,
    pub ignored_lines: Vec<String>,
}

impl RackReconciliation {
    pub fn is_clean(&self) -> bool {
        self.in_document_not_generated.is_empty() && self.generated_not_in_document.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconciliationReport {
    pub racks: Vec<RackReconciliation>,
}

impl ReconciliationReport {
    pub fn is_clean(&self) -> bool {
        self.racks.iter().all(RackReconciliation::is_clean)
    }

    pub fn render_text(&self) -> String {
        let mut out = String::new();
        for rack in &self.racks {
            let _ = writeln!(out, "rack{}:", rack.rack_id);
            for line in &rack.ignored_lines {
                let _ = writeln!(out, "Ignored line: {}", line);
            }
            for entry in &rack.in_document_not_generated {
                let _ = writeln!(
                    out,
                    "in XLS but not generated:    {}",
                    format_line(entry.quantity, &entry.sku, &entry.label)
                );
            }
            for entry in &rack.generated_not_in_document {
                let _ = writeln!(
                    out,
                    "generated but not in XLS:    {}",
                    format_line(entry.quantity, &entry.sku, &entry.label)
                );
            }
            out.push('\n');
        }
        out
    }
}

pub struct BomReconciler<'a> {
    catalog: &'a PartsCatalog,
    line_pattern: Regex,
}

impl<'a> BomReconciler<'a> {
    pub fn new(catalog: &'a PartsCatalog) -> SarResult<Self> {
        let line_pattern =
            Regex::new(TRANSCRIBED_LINE_PATTERN).map_err(|e| SarError::report(e.to_string()))?;
        Ok(Self {
            catalog,
            line_pattern,
        })
    }

    /// Reconcile every rack against the BOM cell of its row on the order
    /// information sheet.
    pub fn reconcile(&self, bom: &Bom, document: &SarDocument) -> ReconciliationReport {
        let racks = bom
            .racks
            .iter()
            .enumerate()
            .map(|(index, rack)| {
                let cell = document.layout.order_bom.down(index as u32);
                let text = document.workbook.text(cell.sheet, cell.row, cell.col);
                self.reconcile_rack(rack, &text)
            })
            .collect();
        ReconciliationReport { racks }
    }

    pub fn reconcile_rack(&self, rack: &RackBom, transcribed: &str) -> RackReconciliation {
        let parsed = self.parse_transcribed(transcribed);
        for line in &parsed.ignored_lines {
            warn!(rack = rack.rack_id, line = %line, "Ignored transcribed BOM line");
        }

        let mut generated = self.generated_entries(rack);
        let mut in_document_not_generated = Vec::new();

        // multiset difference: each generated line can match one transcribed line
        for entry in parsed.entries {
            match generated.iter().position(|candidate| *candidate == entry) {
                Some(position) => {
                    generated.remove(position);
                }
                None => in_document_not_generated.push(entry),
            }
        }

        RackReconciliation {
            rack_id: rack.rack_id,
            in_document_not_generated,
            generated_not_in_document: generated,
            ignored_lines: parsed.ignored_lines,
        }
    }

    /// Split transcribed text into entries; blank lines are skipped and lines
    /// that do not match the pattern are returned as ignored.
    pub fn parse_transcribed(&self, text: &str) -> TranscribedBom {
        let mut transcribed = TranscribedBom::default();

        for line in text.lines().map(str::trim).filter(|line| !line.is_empty()) {
            match self.parse_line(line) {
                Some(entry) => transcribed.entries.push(entry),
                None => transcribed.ignored_lines.push(line.to_string()),
            }
        }

        transcribed
    }

    fn parse_line(&self, line: &str) -> Option<BomEntry> {
        let captures = self.line_pattern.captures(line)?;
        let quantity = captures.get(1)?.as_str().parse().ok()?;
        let sku = captures.get(2)?.as_str();
        let label = captures.get(3)?.as_str();
        let label = label.strip_prefix("* ").unwrap_or(label);
        Some(BomEntry::new(quantity, sku, label))
    }

    fn generated_entries(&self, rack: &RackBom) -> Vec<BomEntry> {
        rack.lines
            .iter()
            .filter(|line| line.quantity > 0)
            .map(|line| {
                let (sku, label) = describe_part(self.catalog, &line.part_key);
                BomEntry::new(line.quantity, sku, label)
            })
            .collect()
    }
}
