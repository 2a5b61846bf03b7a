//! Document Extractor
//!
//! Reads customer, subscription and per-rack data out of a SAR workbook at the
//! positions given by a release layout. Internal connections are left
//! [`InternalConnection::Absent`]; the topology resolver fills them in once
//! every rack has been extracted.

use catc_models::{
    Configuration, CustomerInfo, InternalConnection, PduType, RackQuantities, RackRecord,
    RackType, SubscriptionCounts, UpstreamCabling,
};
use tracing::{debug, info, warn};

use crate::sar::schema::{CellRef, SarLayout, SarRelease};
use crate::sar::workbook::SarWorkbook;

/// Trailing marker on the install country for countries sold through resellers
const INDIRECT_COUNTRY_MARKER: &str = "(**)";

/// Value of the indirect-sale cell that confirms a reseller deal
const INDIRECT_SALE_CONFIRMED: &str = "Yes";

/// Value of the ToR/spine columns when the switch is deployed
const DEPLOYED_MARKER: &str = "Y";

pub struct DocumentExtractor<'a> {
    workbook: &'a SarWorkbook,
    layout: &'a SarLayout,
}

impl<'a> DocumentExtractor<'a> {
    pub fn new(workbook: &'a SarWorkbook, layout: &'a SarLayout) -> Self {
        Self { workbook, layout }
    }

    /// Extract the configuration. Every rack is read before this returns.
    pub fn extract(&self, release: SarRelease) -> Configuration {
        let customer = self.customer_info();
        let subscriptions = self.subscriptions();
        let mut configuration = Configuration::new(release.id(), customer, subscriptions);

        let rack_count = self.rack_count();
        configuration.racks = (0..rack_count).map(|index| self.rack_record(index)).collect();

        info!(
            release = %release,
            customer = %configuration.customer.name,
            racks = rack_count,
            "Extracted SAR configuration"
        );
        configuration
    }

    pub fn customer_info(&self) -> CustomerInfo {
        let name = self.text(self.layout.customer_name);
        let country = self.text(self.layout.country);

        match country.strip_suffix(INDIRECT_COUNTRY_MARKER) {
            Some(stripped) => CustomerInfo {
                name,
                country: stripped.trim_end().to_string(),
                indirect: self.text(self.layout.indirect_sale) == INDIRECT_SALE_CONFIRMED,
            },
            None => CustomerInfo {
                name,
                country,
                indirect: false,
            },
        }
    }

    pub fn subscriptions(&self) -> SubscriptionCounts {
        let mut counts = SubscriptionCounts::new();
        for (product, cell) in &self.layout.subscriptions {
            counts.set(*product, self.count(*cell));
        }
        counts
    }

    /// Number of deployed racks: consecutive non-zero "deployed" cells from
    /// the first rack row, at most `scan_limit`.
    pub fn rack_count(&self) -> u32 {
        let table = &self.layout.rack_table;
        (0..table.scan_limit)
            .take_while(|&index| self.count(table.cell(index, table.deployed_col)) != 0)
            .count() as u32
    }

    fn rack_record(&self, index: u32) -> RackRecord {
        let table = &self.layout.rack_table;
        let hardware = &self.layout.hardware_table;

        let mut rack = RackRecord::new(index + 1);
        let (rack_type, quantities) = self.classify(index);
        rack.rack_type = rack_type;
        rack.quantities = quantities;
        rack.tor_deployed = self.text(table.cell(index, table.tor_col)) == DEPLOYED_MARKER;
        rack.spine_deployed = self.text(table.cell(index, table.spine_col)) == DEPLOYED_MARKER;
        rack.pdu_type =
            PduType::from_description(&self.text(hardware.cell(index, hardware.pdu_type_col)));
        rack.connection = InternalConnection::Absent;

        if rack.has_upstream_uplink() {
            rack.upstream = Some(UpstreamCabling {
                cable_type: self.text(hardware.cell(index, hardware.upstream_cable_type_col)),
                cable_length: self.text(hardware.cell(index, hardware.upstream_cable_length_col)),
                cable_count: self.count(hardware.cell(index, hardware.upstream_cable_count_col)),
            });
        }

        if rack.rack_type.is_none() {
            warn!(rack = rack.id, "No rack allocation recognized, rack type left unset");
        }
        if let PduType::Unrecognized(description) = &rack.pdu_type {
            warn!(rack = rack.id, pdu = %description, "Unrecognized PDU type");
        }
        debug!(
            rack = rack.id,
            rack_type = ?rack.rack_type,
            tor = rack.tor_deployed,
            spine = rack.spine_deployed,
            "Extracted rack"
        );
        rack
    }

    /// Rack type from the allocation columns. Compute first, then ExaCC
    /// largest to smallest, then BDCC; the first non-zero allocation wins.
    fn classify(&self, index: u32) -> (Option<RackType>, RackQuantities) {
        let table = &self.layout.rack_table;
        let allocation = |col: u32| self.number(table.cell(index, col));
        let quantity = |col: u32| self.count(table.cell(index, col));

        let occ = table.occ_allocation_col;
        if allocation(occ) > 0.0 {
            let mut quantities = RackQuantities {
                block_hdd: quantity(occ + 2),
                object: quantity(occ + 3),
                gateway: quantity(occ + 4),
                block_ssd: quantity(occ + 6),
                compute: quantity(occ + 7),
                ..RackQuantities::default()
            };
            let rack_type = if allocation(occ + 1) == 1.0 {
                quantities.control_plane = quantity(occ + 1);
                RackType::OccControlPlane
            } else {
                RackType::Occ
            };
            return (Some(rack_type), quantities);
        }

        let exacc = table.exacc_allocation_col;
        let exacc_sizes = [
            (exacc, RackType::ExaccFull),
            (exacc + 1, RackType::ExaccHalf),
            (exacc + 2, RackType::ExaccQuarter),
            (exacc + 3, RackType::ExaccBase),
        ];
        if let Some((_, rack_type)) = exacc_sizes.iter().find(|(col, _)| allocation(*col) > 0.0) {
            return (Some(*rack_type), RackQuantities::default());
        }

        let bdcc = table.bdcc_allocation_col;
        let bdcc_sizes = [(bdcc, RackType::BdccFull), (bdcc + 1, RackType::BdccStarter)];
        if let Some((_, rack_type)) = bdcc_sizes.iter().find(|(col, _)| allocation(*col) > 0.0) {
            let quantities = RackQuantities {
                nodes: quantity(bdcc + 2),
                ..RackQuantities::default()
            };
            return (Some(*rack_type), quantities);
        }

        (None, RackQuantities::default())
    }

    fn text(&self, cell: CellRef) -> String {
        self.workbook.text(cell.sheet, cell.row, cell.col)
    }

    /// Numeric cell; blank is zero, unreadable text is zero with a warning.
    fn number(&self, cell: CellRef) -> f64 {
        let value = self.workbook.cell(cell.sheet, cell.row, cell.col);
        match value.as_number() {
            Some(number) if number.is_finite() => number,
            _ => {
                warn!(
                    sheet = cell.sheet.sheet_name(),
                    row = cell.row,
                    col = cell.col,
                    value = ?value,
                    "Non-numeric cell read as zero"
                );
                0.0
            }
        }
    }

    /// Integer quantity; fractions are truncated and negatives read as zero.
    fn count(&self, cell: CellRef) -> u32 {
        let number = self.number(cell);
        if number < 0.0 {
            warn!(
                sheet = cell.sheet.sheet_name(),
                row = cell.row,
                col = cell.col,
                value = number,
                "Negative quantity read as zero"
            );
            return 0;
        }
        if number > f64::from(u32::MAX) {
            warn!(
                sheet = cell.sheet.sheet_name(),
                row = cell.row,
                col = cell.col,
                value = number,
                "Quantity out of range, clamped"
            );
            return u32::MAX;
        }
        number.trunc() as u32
    }
}
