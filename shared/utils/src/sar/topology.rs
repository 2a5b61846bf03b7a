//! Topology Resolver
//!
//! Works out how each rack's network reaches the hub rack. Runs over the
//! complete rack list: ethernet-attached racks name a neighbour, which only
//! makes sense once every rack has been extracted.

use catc_models::{Configuration, InternalConnection, RackId, RackRecord};
use tracing::{debug, warn};

use crate::sar::schema::{CellRef, SarLayout};
use crate::sar::workbook::{CellValue, SarWorkbook};

pub struct TopologyResolver<'a> {
    workbook: &'a SarWorkbook,
    layout: &'a SarLayout,
}

impl<'a> TopologyResolver<'a> {
    pub fn new(workbook: &'a SarWorkbook, layout: &'a SarLayout) -> Self {
        Self { workbook, layout }
    }

    /// Set the internal connection of every rack in the configuration.
    pub fn resolve(&self, configuration: &mut Configuration) {
        let hub_has_spine = configuration.hub_has_spine();
        let rack_count = configuration.rack_count();

        let connections: Vec<InternalConnection> = configuration
            .racks
            .iter()
            .map(|rack| self.connection_for(rack, hub_has_spine, rack_count))
            .collect();

        for (rack, connection) in configuration.racks.iter_mut().zip(connections) {
            debug!(rack = rack.id, connection = ?connection, "Resolved internal connection");
            rack.connection = connection;
        }
    }

    fn connection_for(
        &self,
        rack: &RackRecord,
        hub_has_spine: bool,
        rack_count: usize,
    ) -> InternalConnection {
        let index = rack.id - 1;

        if rack.has_upstream_uplink() {
            if hub_has_spine {
                if rack.is_hub() {
                    // The hub's spine cabling is sized on rack 2's distance,
                    // read from the next row of the distance table.
                    InternalConnection::TorToSpine {
                        distance: self.distance(index + 1),
                        distance_to_oob: None,
                    }
                } else {
                    let distance = self.distance(index);
                    InternalConnection::TorToSpine {
                        distance_to_oob: Some(distance.clone()),
                        distance,
                    }
                }
            } else if !rack.is_hub() {
                let distance = self.distance(index);
                InternalConnection::TorToTor {
                    distance_to_oob: distance.clone(),
                    distance,
                }
            } else {
                InternalConnection::Absent
            }
        } else {
            // The document has no separate OOB distance column; the data
            // distance is reused.
            let distance = self.distance(index);
            InternalConnection::EthernetToTor {
                to_rack: self.neighbour(rack, index, rack_count),
                distance_to_oob: distance.clone(),
                distance,
            }
        }
    }

    fn distance(&self, index: u32) -> String {
        let hardware = &self.layout.hardware_table;
        self.text(hardware.cell(index, hardware.distance_col))
    }

    /// Rack named by the rack-connected cell, when it is one of the extracted
    /// racks. A rack may name itself.
    fn neighbour(&self, rack: &RackRecord, index: u32, rack_count: usize) -> Option<RackId> {
        let hardware = &self.layout.hardware_table;
        let cell = hardware.cell(index, hardware.rack_connected_col);
        let value = self.workbook.cell(cell.sheet, cell.row, cell.col);

        match parse_rack_reference(value) {
            Some(id) if id >= 1 && (id as usize) <= rack_count => Some(id),
            _ => {
                warn!(
                    rack = rack.id,
                    reference = ?value,
                    "Connected rack does not name a deployed rack"
                );
                None
            }
        }
    }

    fn text(&self, cell: CellRef) -> String {
        self.workbook.text(cell.sheet, cell.row, cell.col)
    }
}

/// Rack reference as written in the document: `rack1`, `Rack 2`, `3` or a number.
pub fn parse_rack_reference(value: &CellValue) -> Option<RackId> {
    match value {
        CellValue::Int(id) => RackId::try_from(*id).ok(),
        CellValue::Float(id) if id.fract() == 0.0 && *id >= 0.0 => RackId::try_from(*id as i64).ok(),
        CellValue::Text(text) => {
            let trimmed = text.trim();
            let digits_start = trimmed
                .char_indices()
                .rev()
                .take_while(|(_, c)| c.is_ascii_digit())
                .last()
                .map(|(i, _)| i)?;
            let prefix = trimmed[..digits_start].trim().to_ascii_lowercase();
            if prefix.is_empty() || prefix == "rack" {
                trimmed[digits_start..].parse().ok()
            } else {
                None
            }
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sar::extractor::DocumentExtractor;
    use crate::sar::schema::SarRelease;
    use crate::sar::workbook::{SarSheet, WorkbookBuilder};

    const SUBS: SarSheet = SarSheet::CloudSubscriptions;
    const HW: SarSheet = SarSheet::HardwareRequirements;

    fn resolve(builder: WorkbookBuilder) -> Configuration {
        let layout = SarRelease::R20180725.layout();
        let workbook = builder.build();
        let mut config = DocumentExtractor::new(&workbook, &layout).extract(SarRelease::R20180725);
        TopologyResolver::new(&workbook, &layout).resolve(&mut config);
        config
    }

    fn distances(builder: WorkbookBuilder, values: &[&str]) -> WorkbookBuilder {
        values
            .iter()
            .enumerate()
            .fold(builder, |b, (i, d)| b.text(HW, 21 + i as u32, 15, d))
    }

    #[test]
    fn test_spine_deployment() {
        let builder = SarWorkbook::builder()
            // rack1: OCC CP with ToR and spine
            .number(SUBS, 7, 63, 1.0)
            .number(SUBS, 7, 44, 1.0)
            .number(SUBS, 7, 45, 1.0)
            .text(SUBS, 7, 68, "Y")
            .text(SUBS, 7, 69, "Y")
            // rack2, rack3: OCC with ToR
            .number(SUBS, 8, 63, 1.0)
            .number(SUBS, 8, 44, 1.0)
            .text(SUBS, 8, 68, "Y")
            .number(SUBS, 9, 63, 1.0)
            .number(SUBS, 9, 44, 1.0)
            .text(SUBS, 9, 68, "Y");
        let config = resolve(distances(builder, &["1m", "5m", "10m"]));

        assert_eq!(
            config.racks[0].connection,
            InternalConnection::TorToSpine {
                distance: "5m".to_string(),
                distance_to_oob: None
            }
        );
        assert_eq!(
            config.racks[1].connection,
            InternalConnection::TorToSpine {
                distance: "5m".to_string(),
                distance_to_oob: Some("5m".to_string())
            }
        );
        assert_eq!(config.racks[2].connection.distance(), Some("10m"));
        assert_eq!(config.racks[2].connection.distance_to_oob(), Some("10m"));
    }

    #[test]
    fn test_tor_to_tor_without_spine() {
        let builder = SarWorkbook::builder()
            .number(SUBS, 7, 63, 1.0)
            .number(SUBS, 7, 44, 1.0)
            .text(SUBS, 7, 68, "Y")
            .number(SUBS, 8, 63, 1.0)
            .number(SUBS, 8, 56, 1.0)
            .text(SUBS, 8, 68, "Y");
        let config = resolve(distances(builder, &["", "15m"]));

        assert!(config.racks[0].connection.is_absent());
        assert_eq!(
            config.racks[1].connection,
            InternalConnection::TorToTor {
                distance: "15m".to_string(),
                distance_to_oob: "15m".to_string()
            }
        );
    }

    #[test]
    fn test_ethernet_neighbour() {
        let builder = SarWorkbook::builder()
            .number(SUBS, 7, 63, 1.0)
            .number(SUBS, 7, 56, 1.0)
            .text(SUBS, 7, 68, "Y")
            .number(SUBS, 8, 63, 1.0)
            .number(SUBS, 8, 59, 1.0)
            .text(HW, 22, 13, "rack1")
            .number(SUBS, 9, 63, 1.0)
            .number(SUBS, 9, 59, 1.0)
            .text(HW, 23, 13, "rack7");
        let config = resolve(distances(builder, &["", "10m", "3m"]));

        assert_eq!(
            config.racks[1].connection,
            InternalConnection::EthernetToTor {
                to_rack: Some(1),
                distance: "10m".to_string(),
                distance_to_oob: "10m".to_string()
            }
        );
        assert_eq!(config.racks[2].connection.neighbour(), None);
        assert_eq!(config.racks[2].connection.distance(), Some("3m"));
    }

    #[test]
    fn test_ethernet_rack_may_name_itself() {
        let builder = SarWorkbook::builder()
            .number(SUBS, 7, 63, 1.0)
            .number(SUBS, 7, 56, 1.0)
            .text(SUBS, 7, 68, "Y")
            .number(SUBS, 8, 63, 1.0)
            .number(SUBS, 8, 59, 1.0)
            .text(HW, 22, 13, "rack2");
        let config = resolve(distances(builder, &["", "5m"]));

        assert_eq!(config.racks[1].connection.neighbour(), Some(2));
        assert_eq!(config.racks[1].connection.distance(), Some("5m"));
    }

    #[test]
    fn test_big_data_rack_uses_uplink_branch() {
        let builder = SarWorkbook::builder()
            .number(SUBS, 7, 63, 1.0)
            .number(SUBS, 7, 44, 1.0)
            .text(SUBS, 7, 68, "Y")
            .text(SUBS, 7, 69, "Y")
            .number(SUBS, 8, 63, 1.0)
            .number(SUBS, 8, 60, 1.0);
        let config = resolve(distances(builder, &["", "20m"]));

        assert!(matches!(
            config.racks[1].connection,
            InternalConnection::TorToSpine { .. }
        ));
        assert_eq!(config.racks[1].connection.distance(), Some("20m"));
    }

    #[test]
    fn test_parse_rack_reference() {
        assert_eq!(parse_rack_reference(&CellValue::Text("rack1".into())), Some(1));
        assert_eq!(parse_rack_reference(&CellValue::Text(" Rack 12 ".into())), Some(12));
        assert_eq!(parse_rack_reference(&CellValue::Text("2".into())), Some(2));
        assert_eq!(parse_rack_reference(&CellValue::Float(3.0)), Some(3));
        assert_eq!(parse_rack_reference(&CellValue::Int(4)), Some(4));
        assert_eq!(parse_rack_reference(&CellValue::Text("switch1".into())), None);
        assert_eq!(parse_rack_reference(&CellValue::Text("rack".into())), None);
        assert_eq!(parse_rack_reference(&CellValue::Empty), None);
    }
}
