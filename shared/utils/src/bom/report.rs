//! BOM Report
//!
//! Renders a derived BOM as the text layout used on order sheets, as JSON, or
//! as CSV.

use std::fmt::Write as _;
use std::str::FromStr;

use catc_models::{Bom, BomLine, RackBom, RackFamily, RackType};
use serde::Serialize;

use super::catalog::PartsCatalog;
use crate::error::{SarError, SarResult};

const COLUMN_HEADER: &str = "Qty    Part  # Description";

/// SKU shown for a part key the catalog does not know
pub const UNKNOWN_SKU: &str = "N/A";

/// Supported report formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReportFormat {
    #[default]
    Text,
    Json,
    Csv,
}

impl FromStr for ReportFormat {
    type Err = String;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        match name.to_lowercase().as_str() {
            "text" | "txt" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            "csv" => Ok(Self::Csv),
            other => Err(format!("unknown report format '{}' (text, json, csv)", other)),
        }
    }
}

/// SKU and label of a part, falling back to the part key itself
pub fn describe_part(catalog: &PartsCatalog, part_key: &str) -> (String, String) {
    match catalog.get(part_key) {
        Some(info) => (info.sku.clone(), info.label.clone()),
        None => (UNKNOWN_SKU.to_string(), part_key.to_string()),
    }
}

/// `<qty> x  <sku>  <label>`, quantity padded to 3 and SKU to 7
pub fn format_line(quantity: u32, sku: &str, label: &str) -> String {
    format!("{:<3} x  {:<7}  {}", quantity.to_string(), sku, label)
}

#[derive(Debug, Serialize)]
struct CsvRow<'a> {
    rack: String,
    part_key: &'a str,
    sku: String,
    label: String,
    quantity: u32,
}

pub struct BomReport<'a> {
    bom: &'a Bom,
    catalog: &'a PartsCatalog,
}

impl<'a> BomReport<'a> {
    pub fn new(bom: &'a Bom, catalog: &'a PartsCatalog) -> Self {
        Self { bom, catalog }
    }

    pub fn render(&self, format: ReportFormat) -> SarResult<String> {
        match format {
            ReportFormat::Text => Ok(self.render_text()),
            ReportFormat::Json => self.render_json(),
            ReportFormat::Csv => self.render_csv(),
        }
    }

    /// One block per rack: the rack name, its lines, then a blank line. The
    /// primary unit of each product family is preceded by a banner.
    pub fn render_text(&self) -> String {
        let mut out = String::new();
        for rack in &self.bom.racks {
            let _ = writeln!(out, "{}", rack.rack_name());
            for line in &rack.lines {
                self.write_line(&mut out, rack, line);
            }
            out.push('\n');
        }
        out
    }

    fn write_line(&self, out: &mut String, rack: &RackBom, line: &BomLine) {
        let (sku, label) = describe_part(self.catalog, &line.part_key);
        let formatted = format_line(line.quantity, &sku, &label);

        match banner(rack.rack_type, &line.part_key) {
            Some((title, footer)) => {
                let _ = writeln!(out, "{}", title);
                let _ = writeln!(out, "{}", COLUMN_HEADER);
                let _ = writeln!(out, "{}", formatted);
                if let Some(footer) = footer {
                    let _ = writeln!(out, "{}", footer);
                }
            }
            None => {
                let _ = writeln!(out, "{}", formatted);
            }
        }
    }

    /// `{ "rack1": { "<part key>": qty, ... }, ... }`
    pub fn render_json(&self) -> SarResult<String> {
        Ok(serde_json::to_string_pretty(self.bom)?)
    }

    pub fn render_csv(&self) -> SarResult<String> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        for rack in &self.bom.racks {
            for line in &rack.lines {
                let (sku, label) = describe_part(self.catalog, &line.part_key);
                writer.serialize(CsvRow {
                    rack: rack.rack_name(),
                    part_key: &line.part_key,
                    sku,
                    label,
                    quantity: line.quantity,
                })?;
            }
        }
        let data = writer
            .into_inner()
            .map_err(|e| SarError::report(e.to_string()))?;
        String::from_utf8(data).map_err(|e| SarError::report(e.to_string()))
    }
}

/// Banner title and optional footer shown around a rack's primary unit
fn banner(rack_type: Option<RackType>, part_key: &str) -> Option<(&'static str, Option<&'static str>)> {
    let rack_type = rack_type?;
    match (rack_type.family(), part_key) {
        (RackFamily::Compute, "OCC") => {
            let footer = match rack_type {
                RackType::OccControlPlane => "Type   :New System",
                _ => "Type   :Expansion",
            };
            Some(("## ORACLE CLOUD AT CUSTOMER X6 ##", Some(footer)))
        }
        (RackFamily::ExascaleDatabase, "ExaCC") => {
            let footer = match rack_type {
                RackType::ExaccBase => "Rack Size : Base Rack",
                RackType::ExaccQuarter => "Rack Size : Quarter Rack",
                RackType::ExaccHalf => "Rack Size : Half Rack",
                _ => "Rack Size : Full Rack",
            };
            Some(("## EXADATA CLOUD AT CUSTOMER X7 ##", Some(footer)))
        }
        (RackFamily::BigData, "BDCC") => Some(("## BIG DATA CLOUD AT CUSTOMER X7 ##", None)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> PartsCatalog {
        PartsCatalog::from_json_str(
            r#"{
                "OCC": { "sku": "B88000", "label": "Oracle Cloud at Customer" },
                "OCC rack": { "sku": "7101010", "label": "Rack" },
                "ExaCC": { "sku": "B88100", "label": "Exadata Cloud at Customer" }
            }"#,
        )
        .unwrap()
    }

    fn bom() -> Bom {
        let line = |rack_id, key: &str, quantity| BomLine {
            rack_id,
            part_key: key.to_string(),
            quantity,
        };
        Bom {
            racks: vec![
                RackBom {
                    rack_id: 1,
                    rack_type: Some(RackType::OccControlPlane),
                    lines: vec![line(1, "OCC", 1), line(1, "OCC rack", 1)],
                },
                RackBom {
                    rack_id: 2,
                    rack_type: Some(RackType::ExaccQuarter),
                    lines: vec![line(2, "ExaCC", 1), line(2, "cable LC 10m", 10)],
                },
            ],
        }
    }

    #[test]
    fn test_format_line_padding() {
        assert_eq!(format_line(1, "B88000", "Cloud"), "1   x  B88000   Cloud");
        assert_eq!(format_line(1200, "7101010123", "Long"), "1200 x  7101010123  Long");
    }

    #[test]
    fn test_text_report_banners() {
        let catalog = catalog();
        let bom = bom();
        let text = BomReport::new(&bom, &catalog).render_text();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(
            lines,
            vec![
                "rack1",
                "## ORACLE CLOUD AT CUSTOMER X6 ##",
                "Qty    Part  # Description",
                "1   x  B88000   Oracle Cloud at Customer",
                "Type   :New System",
                "1   x  7101010  Rack",
                "",
                "rack2",
                "## EXADATA CLOUD AT CUSTOMER X7 ##",
                "Qty    Part  # Description",
                "1   x  B88100   Exadata Cloud at Customer",
                "Rack Size : Quarter Rack",
                "10  x  N/A      cable LC 10m",
                "",
            ]
        );
    }

    #[test]
    fn test_csv_report() {
        let catalog = catalog();
        let bom = bom();
        let csv = BomReport::new(&bom, &catalog).render(ReportFormat::Csv).unwrap();
        let mut lines = csv.lines();

        assert_eq!(lines.next(), Some("rack,part_key,sku,label,quantity"));
        assert_eq!(lines.next(), Some("rack1,OCC,B88000,Oracle Cloud at Customer,1"));
        assert_eq!(csv.lines().count(), 5);
    }

    #[test]
    fn test_json_report() {
        let catalog = catalog();
        let bom = bom();
        let json = BomReport::new(&bom, &catalog).render(ReportFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["rack2"]["cable LC 10m"], 10);
    }

    #[test]
    fn test_report_format_names() {
        assert_eq!("JSON".parse::<ReportFormat>(), Ok(ReportFormat::Json));
        assert_eq!("txt".parse::<ReportFormat>(), Ok(ReportFormat::Text));
        assert!("xml".parse::<ReportFormat>().is_err());
    }
}
