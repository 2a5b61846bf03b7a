//! SAR workbook access
//!
//! The six sheets the pipeline reads are loaded once into immutable in-memory
//! grids addressed by absolute (row, column), both 0-based.

use std::collections::HashMap;
use std::path::Path;

use calamine::{open_workbook_auto, DataType, Reader};
use tracing::{debug, info};

use crate::error::{SarError, SarResult};

/// File extensions the workbook reader accepts: Excel binary, Open XML,
/// add-in and OpenDocument spreadsheets.
pub const WORKBOOK_EXTENSIONS: &[&str] = &["xls", "xla", "xlsx", "xlsm", "xlam", "xlsb", "ods"];

/// Sheets of a SAR workbook used by the pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SarSheet {
    RevisionHistory,
    ContactInformation,
    CustomerSite,
    CloudSubscriptions,
    HardwareRequirements,
    OrderInformation,
}

impl SarSheet {
    pub const ALL: [SarSheet; 6] = [
        SarSheet::RevisionHistory,
        SarSheet::ContactInformation,
        SarSheet::CustomerSite,
        SarSheet::CloudSubscriptions,
        SarSheet::HardwareRequirements,
        SarSheet::OrderInformation,
    ];

    pub fn sheet_name(self) -> &'static str {
        match self {
            SarSheet::RevisionHistory => "Revision History",
            SarSheet::ContactInformation => "Contact Information",
            SarSheet::CustomerSite => "Customer and Site Requirements",
            SarSheet::CloudSubscriptions => "NEW Cloud Subscriptions",
            SarSheet::HardwareRequirements => "NEW Hardware Requirements",
            SarSheet::OrderInformation => "NEW Order Information",
        }
    }
}

/// Value of a single cell
#[derive(Debug, Clone, PartialEq, Default)]
pub enum CellValue {
    #[default]
    Empty,
    Int(i64),
    Float(f64),
    Text(String),
    Bool(bool),
}

impl CellValue {
    /// Cell content as displayed text. Whole floats lose their fraction so a
    /// length typed as `5` reads `5`, not `5.0`.
    pub fn as_text(&self) -> String {
        match self {
            CellValue::Empty => String::new(),
            CellValue::Int(value) => value.to_string(),
            CellValue::Float(value) if value.is_finite() && value.fract() == 0.0 => {
                format!("{}", *value as i64)
            }
            CellValue::Float(value) => value.to_string(),
            CellValue::Text(text) => text.clone(),
            CellValue::Bool(value) => value.to_string(),
        }
    }

    /// Numeric value; blank cells are zero. `None` for text that is not a number.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            CellValue::Empty => Some(0.0),
            CellValue::Int(value) => Some(*value as f64),
            CellValue::Float(value) => Some(*value),
            CellValue::Bool(value) => Some(if *value { 1.0 } else { 0.0 }),
            CellValue::Text(text) => {
                let trimmed = text.trim();
                if trimmed.is_empty() {
                    Some(0.0)
                } else {
                    trimmed.parse::<f64>().ok()
                }
            }
        }
    }
}

impl From<&DataType> for CellValue {
    fn from(data: &DataType) -> Self {
        match data {
            DataType::Empty => CellValue::Empty,
            DataType::Int(value) => CellValue::Int(*value),
            DataType::Float(value) => CellValue::Float(*value),
            DataType::String(text) => CellValue::Text(text.clone()),
            DataType::Bool(value) => CellValue::Bool(*value),
            other => CellValue::Text(other.to_string()),
        }
    }
}

/// Sparse grid of one sheet's non-empty cells
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SheetGrid {
    cells: HashMap<(u32, u32), CellValue>,
}

impl SheetGrid {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, row: u32, col: u32, value: CellValue) {
        if value == CellValue::Empty {
            self.cells.remove(&(row, col));
        } else {
            self.cells.insert((row, col), value);
        }
    }

    pub fn get(&self, row: u32, col: u32) -> Option<&CellValue> {
        self.cells.get(&(row, col))
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

static EMPTY_CELL: CellValue = CellValue::Empty;

/// Read-only SAR workbook
#[derive(Debug, Clone, Default)]
pub struct SarWorkbook {
    sheets: HashMap<SarSheet, SheetGrid>,
}

impl SarWorkbook {
    /// Open a workbook of any [`WORKBOOK_EXTENSIONS`] type. Every sheet in
    /// [`SarSheet::ALL`] is required.
    pub fn open(path: &Path) -> SarResult<Self> {
        let mut workbook = open_workbook_auto(path)?;
        let mut sheets = HashMap::new();

        for sheet in SarSheet::ALL {
            let range = workbook
                .worksheet_range(sheet.sheet_name())
                .ok_or_else(|| SarError::missing_sheet(sheet.sheet_name()))??;

            let mut grid = SheetGrid::new();
            if let Some((start_row, start_col)) = range.start() {
                for (row, col, data) in range.used_cells() {
                    grid.set(
                        start_row + row as u32,
                        start_col + col as u32,
                        CellValue::from(data),
                    );
                }
            }
            debug!(sheet = sheet.sheet_name(), cells = grid.len(), "Loaded sheet");
            sheets.insert(sheet, grid);
        }

        info!(path = %path.display(), "Opened SAR workbook");
        Ok(Self { sheets })
    }

    /// Start an in-memory workbook; all sheets present and empty.
    pub fn builder() -> WorkbookBuilder {
        WorkbookBuilder::default()
    }

    /// Cell at an absolute position; cells outside the used range read as empty.
    pub fn cell(&self, sheet: SarSheet, row: u32, col: u32) -> &CellValue {
        self.sheets
            .get(&sheet)
            .and_then(|grid| grid.get(row, col))
            .unwrap_or(&EMPTY_CELL)
    }

    pub fn text(&self, sheet: SarSheet, row: u32, col: u32) -> String {
        self.cell(sheet, row, col).as_text()
    }
}

/// Builds a [`SarWorkbook`] cell by cell
#[derive(Debug, Default)]
pub struct WorkbookBuilder {
    sheets: HashMap<SarSheet, SheetGrid>,
}

impl WorkbookBuilder {
    pub fn cell(mut self, sheet: SarSheet, row: u32, col: u32, value: CellValue) -> Self {
        self.set(sheet, row, col, value);
        self
    }

    pub fn set(&mut self, sheet: SarSheet, row: u32, col: u32, value: CellValue) -> &mut Self {
        self.sheets.entry(sheet).or_default().set(row, col, value);
        self
    }

    pub fn number(self, sheet: SarSheet, row: u32, col: u32, value: f64) -> Self {
        self.cell(sheet, row, col, CellValue::Float(value))
    }

    pub fn text(self, sheet: SarSheet, row: u32, col: u32, value: &str) -> Self {
        self.cell(sheet, row, col, CellValue::Text(value.to_string()))
    }

    pub fn build(mut self) -> SarWorkbook {
        for sheet in SarSheet::ALL {
            self.sheets.entry(sheet).or_default();
        }
        SarWorkbook {
            sheets: self.sheets,
        }
    }
}
