//! SAR release schemas
//!
//! Every supported SAR release maps to a [`SarLayout`] giving the position of
//! each field the extractor reads. Releases are a closed enum: a workbook
//! from any other release is refused instead of being read at guessed
//! positions.

use std::fmt;

use catc_models::SubscriptionProduct;
use chrono::NaiveDate;
use tracing::info;

use crate::error::{SarError, SarResult};
use crate::sar::workbook::{SarSheet, SarWorkbook};

/// Where the release identifier lives: Revision History, cell U1.
pub const RELEASE_CELL: CellRef = CellRef::new(SarSheet::RevisionHistory, 0, 20);

/// Supported SAR releases, named after the date of the template snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SarRelease {
    R20180511,
    R20180514,
    R20180515,
    R20180516,
    R20180701,
    R20180725,
}

impl SarRelease {
    pub const ALL: [SarRelease; 6] = [
        SarRelease::R20180511,
        SarRelease::R20180514,
        SarRelease::R20180515,
        SarRelease::R20180516,
        SarRelease::R20180701,
        SarRelease::R20180725,
    ];

    pub fn id(self) -> u32 {
        match self {
            SarRelease::R20180511 => 20180511,
            SarRelease::R20180514 => 20180514,
            SarRelease::R20180515 => 20180515,
            SarRelease::R20180516 => 20180516,
            SarRelease::R20180701 => 20180701,
            SarRelease::R20180725 => 20180725,
        }
    }

    /// Look up a release identifier. Anything outside [`SarRelease::ALL`] is
    /// an error.
    pub fn from_id(release: i64) -> SarResult<Self> {
        Self::ALL
            .into_iter()
            .find(|known| i64::from(known.id()) == release)
            .ok_or(SarError::unsupported_release(release))
    }

    /// Date of the template snapshot encoded in the identifier
    pub fn snapshot_date(self) -> Option<NaiveDate> {
        let id = self.id();
        NaiveDate::from_ymd_opt((id / 10000) as i32, id / 100 % 100, id % 100)
    }

    /// Field positions for this release.
    pub fn layout(self) -> SarLayout {
        match self {
            SarRelease::R20180511
            | SarRelease::R20180514
            | SarRelease::R20180515
            | SarRelease::R20180516
            | SarRelease::R20180701
            | SarRelease::R20180725 => SarLayout::may_2018(),
        }
    }
}

impl fmt::Display for SarRelease {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id())
    }
}

/// Absolute cell position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CellRef {
    pub sheet: SarSheet,
    pub row: u32,
    pub col: u32,
}

impl CellRef {
    pub const fn new(sheet: SarSheet, row: u32, col: u32) -> Self {
        Self { sheet, row, col }
    }

    /// Same column, `offset` rows further down
    pub const fn down(self, offset: u32) -> Self {
        Self::new(self.sheet, self.row + offset, self.col)
    }
}

/// Per-rack table on the cloud subscriptions sheet, one row per rack starting
/// at `first_row`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RackTableLayout {
    pub first_row: u32,
    /// Rows scanned for deployed racks
    pub scan_limit: u32,
    pub deployed_col: u32,
    /// OCC allocation block: +1 CP, +2 block HDD, +3 object, +4 OASG,
    /// +6 block SSD, +7 compute
    pub occ_allocation_col: u32,
    /// ExaCC allocation block: +0 full, +1 half, +2 quarter, +3 base
    pub exacc_allocation_col: u32,
    /// BDCC allocation block: +0 full, +1 starter, +2 node count
    pub bdcc_allocation_col: u32,
    pub tor_col: u32,
    pub spine_col: u32,
}

impl RackTableLayout {
    pub const fn cell(&self, rack_index: u32, col: u32) -> CellRef {
        CellRef::new(SarSheet::CloudSubscriptions, self.first_row + rack_index, col)
    }
}

/// Per-rack table on the hardware requirements sheet
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HardwareTableLayout {
    pub first_row: u32,
    pub pdu_type_col: u32,
    pub rack_connected_col: u32,
    pub distance_col: u32,
    pub upstream_cable_type_col: u32,
    pub upstream_cable_length_col: u32,
    pub upstream_cable_count_col: u32,
}

impl HardwareTableLayout {
    pub const fn cell(&self, rack_index: u32, col: u32) -> CellRef {
        CellRef::new(SarSheet::HardwareRequirements, self.first_row + rack_index, col)
    }
}

/// Coordinate map of a SAR release
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SarLayout {
    pub customer_name: CellRef,
    pub country: CellRef,
    pub indirect_sale: CellRef,
    pub subscriptions: Vec<(SubscriptionProduct, CellRef)>,
    pub rack_table: RackTableLayout,
    pub hardware_table: HardwareTableLayout,
    /// First rack's transcribed BOM; one row per rack below it
    pub order_bom: CellRef,
}

impl SarLayout {
    /// Layout shared by every template released between May and July 2018
    fn may_2018() -> Self {
        const SUBSCRIPTION_COL: u32 = 7; // H
        let subscription = |row| CellRef::new(SarSheet::CloudSubscriptions, row, SUBSCRIPTION_COL);

        Self {
            customer_name: CellRef::new(SarSheet::ContactInformation, 6, 5),
            country: CellRef::new(SarSheet::CustomerSite, 29, 5),
            indirect_sale: CellRef::new(SarSheet::CustomerSite, 31, 5),
            subscriptions: vec![
                (SubscriptionProduct::OccControlPlane, subscription(10)),
                (SubscriptionProduct::OccCompute, subscription(12)),
                (SubscriptionProduct::OccBlockStorage, subscription(14)),
                (SubscriptionProduct::OccBlockStorageHighIo, subscription(16)),
                (SubscriptionProduct::OccObjectStorage, subscription(18)),
                (SubscriptionProduct::ExaccBase, subscription(25)),
                (SubscriptionProduct::ExaccQuarter, subscription(27)),
                (SubscriptionProduct::ExaccHalf, subscription(29)),
                (SubscriptionProduct::ExaccFull, subscription(31)),
                (SubscriptionProduct::BdccStarterPack, subscription(38)),
                (SubscriptionProduct::BdccAdditionalNodes, subscription(40)),
            ],
            rack_table: RackTableLayout {
                first_row: 7,
                scan_limit: 11,
                deployed_col: 63,        // BL
                occ_allocation_col: 44,  // AS
                exacc_allocation_col: 56, // BE
                bdcc_allocation_col: 60, // BI
                tor_col: 68,             // BQ
                spine_col: 69,           // BR
            },
            hardware_table: HardwareTableLayout {
                first_row: 21,
                pdu_type_col: 4,
                rack_connected_col: 13,
                distance_col: 15,
                upstream_cable_type_col: 16,
                upstream_cable_length_col: 17,
                upstream_cable_count_col: 18,
            },
            order_bom: CellRef::new(SarSheet::OrderInformation, 8, 2),
        }
    }
}

/// Resolves the layout of a workbook from its release cell.
pub struct SchemaResolver;

impl SchemaResolver {
    /// Layout of a release identifier; unknown identifiers fail.
    pub fn resolve(release: i64) -> SarResult<SarLayout> {
        Ok(SarRelease::from_id(release)?.layout())
    }

    /// Read the release from Revision History!U1 and resolve it.
    pub fn resolve_workbook(workbook: &SarWorkbook) -> SarResult<(SarRelease, SarLayout)> {
        let cell = workbook.cell(RELEASE_CELL.sheet, RELEASE_CELL.row, RELEASE_CELL.col);
        let release = cell
            .as_number()
            .filter(|value| value.is_finite() && value.fract() == 0.0)
            .map(|value| value as i64)
            .ok_or_else(|| {
                SarError::workbook(format!(
                    "SAR release cell does not hold a release number: {:?}",
                    cell
                ))
            })?;

        let release = SarRelease::from_id(release)?;
        info!(
            release = %release,
            snapshot = ?release.snapshot_date(),
            "Resolved SAR release"
        );
        Ok((release, release.layout()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_release_resolves_complete_layout() {
        for release in SarRelease::ALL {
            let layout = SchemaResolver::resolve(i64::from(release.id())).unwrap();
            for product in SubscriptionProduct::ALL {
                assert!(
                    layout.subscriptions.iter().any(|(p, _)| *p == product),
                    "{} has no cell for {:?}",
                    release,
                    product
                );
            }
            assert!(layout.rack_table.scan_limit > 0);
        }
    }

    #[test]
    fn test_unsupported_release_fails() {
        for release in [0, 20180512, 20180801, -1, 20190101] {
            let error = SchemaResolver::resolve(release).unwrap_err();
            assert_eq!(error.error_code(), "UNSUPPORTED_RELEASE");
        }
    }

    #[test]
    fn test_snapshot_dates() {
        assert_eq!(
            SarRelease::R20180725.snapshot_date(),
            NaiveDate::from_ymd_opt(2018, 7, 25)
        );
        for release in SarRelease::ALL {
            assert!(release.snapshot_date().is_some());
        }
    }

    #[test]
    fn test_resolve_from_workbook() {
        let workbook = SarWorkbook::builder()
            .number(SarSheet::RevisionHistory, 0, 20, 20180516.0)
            .build();
        let (release, layout) = SchemaResolver::resolve_workbook(&workbook).unwrap();
        assert_eq!(release, SarRelease::R20180516);
        assert_eq!(layout.customer_name, CellRef::new(SarSheet::ContactInformation, 6, 5));
    }

    #[test]
    fn test_resolve_from_workbook_rejects_text() {
        let workbook = SarWorkbook::builder()
            .text(SarSheet::RevisionHistory, 0, 20, "draft")
            .build();
        assert!(SchemaResolver::resolve_workbook(&workbook).is_err());
    }
}
