//! SAR pipeline property tests
//!
//! Properties that hold for any workbook the generators below can build.

use catc_models::{PduType, RackType};
use catc_utils::sar::{SarSheet, SarWorkbook, WorkbookBuilder};
use catc_utils::{BomReconciler, BomReport, BomRuleEngine, PartsCatalog, SarDocument};
use proptest::prelude::*;

const SUBS: SarSheet = SarSheet::CloudSubscriptions;
const HW: SarSheet = SarSheet::HardwareRequirements;

fn bundled_catalog() -> PartsCatalog {
    let data = include_str!(concat!(
        env!("CARGO_MANIFEST_DIR"),
        "/../../resources/CatC-partslist.json"
    ));
    PartsCatalog::from_json_str(data).unwrap()
}

/// Allocation column that selects each rack type
fn allocation_col(rack_type: RackType) -> u32 {
    match rack_type {
        RackType::Occ | RackType::OccControlPlane => 44,
        RackType::ExaccFull => 56,
        RackType::ExaccHalf => 57,
        RackType::ExaccQuarter => 58,
        RackType::ExaccBase => 59,
        RackType::BdccFull => 60,
        RackType::BdccStarter => 61,
    }
}

#[derive(Debug, Clone)]
struct RackSetup {
    rack_type: RackType,
    tor: bool,
    compute: u32,
    nodes: u32,
    pdu: PduType,
    distance: &'static str,
}

fn arb_rack_setup() -> impl Strategy<Value = RackSetup> {
    (
        prop::sample::select(RackType::ALL.to_vec()),
        any::<bool>(),
        0u32..8,
        0u32..18,
        prop::sample::select(vec![
            PduType::ThreePhase24kvaLowVoltage,
            PduType::SinglePhase15kvaLowVoltage,
            PduType::Unrecognized("* Custom supply".to_string()),
        ]),
        prop::sample::select(vec!["5m", "10m", "20m"]),
    )
        .prop_map(|(rack_type, tor, compute, nodes, pdu, distance)| RackSetup {
            rack_type,
            tor,
            compute,
            nodes,
            pdu,
            distance,
        })
}

fn workbook(racks: &[RackSetup], spine: bool) -> WorkbookBuilder {
    let mut builder = SarWorkbook::builder()
        .number(SarSheet::RevisionHistory, 0, 20, 20180511.0)
        .text(SarSheet::CustomerSite, 31, 5, "No");

    for (index, setup) in racks.iter().enumerate() {
        let row = 7 + index as u32;
        let hw_row = 21 + index as u32;
        builder = builder
            .number(SUBS, row, 63, 1.0)
            .number(SUBS, row, allocation_col(setup.rack_type), 1.0)
            .number(SUBS, row, 51, setup.compute as f64)
            .number(SUBS, row, 62, setup.nodes as f64)
            .text(SUBS, row, 68, if setup.tor { "Y" } else { "N" })
            .text(HW, hw_row, 4, setup.pdu.description())
            .text(HW, hw_row, 13, "rack1")
            .text(HW, hw_row, 15, setup.distance)
            .text(HW, hw_row, 16, "MPO_MPO")
            .text(HW, hw_row, 17, "10m")
            .number(HW, hw_row, 18, 2.0);
        if setup.rack_type == RackType::OccControlPlane {
            builder = builder.number(SUBS, row, 45, 1.0);
        }
    }

    if spine {
        builder = builder.text(SUBS, 7, 69, "Y");
    }
    builder
}

// ===== Property 1: Rack discovery stops at the first gap =====

mod rack_discovery_tests {
    use super::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// The rack list is the run of deployed rows before the first zero,
        /// never longer than the scanned table.
        #[test]
        fn prop_rack_count_is_leading_run(flags in prop::collection::vec(0u32..3, 0..15)) {
            let mut builder = SarWorkbook::builder()
                .number(SarSheet::RevisionHistory, 0, 20, 20180514.0);
            for (index, flag) in flags.iter().enumerate() {
                builder = builder.number(SUBS, 7 + index as u32, 63, *flag as f64);
            }

            let configuration = SarDocument::new(builder.build()).unwrap().configuration();
            let expected = flags.iter().take(11).take_while(|flag| **flag != 0).count();

            prop_assert_eq!(configuration.rack_count(), expected);
            for (index, rack) in configuration.racks.iter().enumerate() {
                prop_assert_eq!(rack.id as usize, index + 1);
            }
        }
    }
}

// ===== Property 2: BOM derivation =====

mod bom_derivation_tests {
    use super::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(50))]

        /// Deriving twice gives the same BOM, and every line has a positive
        /// quantity.
        #[test]
        fn prop_derivation_is_deterministic(
            racks in prop::collection::vec(arb_rack_setup(), 1..6),
            spine in any::<bool>(),
        ) {
            let catalog = bundled_catalog();
            let configuration = SarDocument::new(workbook(&racks, spine).build())
                .unwrap()
                .configuration();

            let first = BomRuleEngine::derive(&configuration, &catalog);
            let second = BomRuleEngine::derive(&configuration, &catalog);

            prop_assert_eq!(&first, &second);
            prop_assert_eq!(first.racks.len(), racks.len());
            prop_assert!(first.lines().all(|line| line.quantity > 0));
        }

        /// A power line appears exactly when the PDU description is recognized.
        #[test]
        fn prop_power_line_only_for_known_pdu(
            racks in prop::collection::vec(arb_rack_setup(), 1..6),
        ) {
            let catalog = bundled_catalog();
            let configuration = SarDocument::new(workbook(&racks, false).build())
                .unwrap()
                .configuration();
            let bom = BomRuleEngine::derive(&configuration, &catalog);

            for (setup, rack) in racks.iter().zip(&bom.racks) {
                let power_lines = rack
                    .lines
                    .iter()
                    .filter(|line| line.part_key.starts_with("PDU"))
                    .count();
                prop_assert_eq!(power_lines, usize::from(setup.pdu.part_key().is_some()));
            }
        }

        /// Only BDCC racks carry nodes, and only OCC racks carry compute nodes.
        #[test]
        fn prop_family_parts_stay_in_family(
            racks in prop::collection::vec(arb_rack_setup(), 1..6),
        ) {
            let catalog = bundled_catalog();
            let configuration = SarDocument::new(workbook(&racks, false).build())
                .unwrap()
                .configuration();
            let bom = BomRuleEngine::derive(&configuration, &catalog);

            for (setup, rack) in racks.iter().zip(&bom.racks) {
                if !setup.rack_type.is_big_data() {
                    prop_assert_eq!(rack.quantity("BDCC node"), 0);
                }
                if !matches!(setup.rack_type, RackType::Occ | RackType::OccControlPlane) {
                    prop_assert_eq!(rack.quantity("OCC compute"), 0);
                }
            }
        }
    }
}

// ===== Property 3: Reconciliation round trip =====

mod reconciliation_tests {
    use super::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(30))]

        /// A workbook whose transcribed BOM is the rendered report reconciles
        /// without differences.
        #[test]
        fn prop_rendered_bom_reconciles_cleanly(
            racks in prop::collection::vec(arb_rack_setup(), 1..5),
            spine in any::<bool>(),
        ) {
            let catalog = bundled_catalog();
            let configuration = SarDocument::new(workbook(&racks, spine).build())
                .unwrap()
                .configuration();
            let bom = BomRuleEngine::derive(&configuration, &catalog);
            let text = BomReport::new(&bom, &catalog).render_text();

            let mut builder = workbook(&racks, spine);
            for (index, block) in text.split("\n\n").filter(|b| !b.is_empty()).enumerate() {
                builder = builder.text(SarSheet::OrderInformation, 8 + index as u32, 2, block);
            }
            let document = SarDocument::new(builder.build()).unwrap();
            let report = BomReconciler::new(&catalog).unwrap().reconcile(&bom, &document);

            prop_assert!(report.is_clean(), "{}", report.render_text());
        }
    }
}
