//! SAR Document Processing Module
//!
//! Turns a SAR order-intake workbook into a [`Configuration`]:
//! release schema lookup, extraction, then topology resolution.
//! The two phases never interleave: every rack is extracted before any
//! rack's connection is resolved.

pub mod extractor;
pub mod schema;
pub mod topology;
pub mod workbook;

pub use extractor::DocumentExtractor;
pub use schema::{CellRef, SarLayout, SarRelease, SchemaResolver};
pub use topology::TopologyResolver;
pub use workbook::{CellValue, SarSheet, SarWorkbook, WorkbookBuilder, WORKBOOK_EXTENSIONS};

use catc_models::Configuration;

use crate::error::SarResult;

/// A workbook together with its resolved release layout.
pub struct SarDocument {
    pub workbook: SarWorkbook,
    pub release: SarRelease,
    pub layout: SarLayout,
}

impl SarDocument {
    /// Resolve the workbook's release. Unsupported releases fail here, before
    /// anything is extracted.
    pub fn new(workbook: SarWorkbook) -> SarResult<Self> {
        let (release, layout) = SchemaResolver::resolve_workbook(&workbook)?;
        Ok(Self {
            workbook,
            release,
            layout,
        })
    }

    pub fn open(path: &std::path::Path) -> SarResult<Self> {
        Self::new(SarWorkbook::open(path)?)
    }

    /// Extract all racks, then resolve their topology.
    pub fn configuration(&self) -> Configuration {
        let mut configuration =
            DocumentExtractor::new(&self.workbook, &self.layout).extract(self.release);
        TopologyResolver::new(&self.workbook, &self.layout).resolve(&mut configuration);
        configuration
    }
}
