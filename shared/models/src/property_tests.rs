//! Property-based tests for the CatC domain models
//!
//! Covers serialization round trips for the rack model and the closed
//! classification types used by the BOM rules.

use proptest::option;
use proptest::prelude::*;

use crate::{InternalConnection, PduType, RackQuantities, RackRecord, RackType, UpstreamCabling};

prop_compose! {
    fn arb_distance()(metres in 1u32..60) -> String {
        format!("{}m", metres)
    }
}

fn arb_rack_type() -> impl Strategy<Value = RackType> {
    prop::sample::select(RackType::ALL.to_vec())
}

fn arb_pdu_type() -> impl Strategy<Value = PduType> {
    prop_oneof![
        Just(PduType::SinglePhase22kvaHighVoltage),
        Just(PduType::SinglePhase15kvaLowVoltage),
        Just(PduType::SinglePhase22kvaLowVoltage),
        Just(PduType::ThreePhase15kvaHighVoltage),
        Just(PduType::ThreePhase24kvaHighVoltage),
        Just(PduType::ThreePhase15kvaLowVoltage),
        Just(PduType::ThreePhase24kvaLowVoltage),
        "[A-Za-z0-9 ()*]{0,40}".prop_map(PduType::Unrecognized),
    ]
}

fn arb_connection() -> impl Strategy<Value = InternalConnection> {
    prop_oneof![
        Just(InternalConnection::Absent),
        (arb_distance(), option::of(arb_distance())).prop_map(|(distance, distance_to_oob)| {
            InternalConnection::TorToSpine { distance, distance_to_oob }
        }),
        arb_distance().prop_map(|distance| InternalConnection::TorToTor {
            distance_to_oob: distance.clone(),
            distance,
        }),
        (option::of(1u32..12), arb_distance()).prop_map(|(to_rack, distance)| {
            InternalConnection::EthernetToTor {
                to_rack,
                distance_to_oob: distance.clone(),
                distance,
            }
        }),
    ]
}

prop_compose! {
    fn arb_quantities()(
        control_plane in 0u32..2,
        compute in 0u32..20,
        block_ssd in 0u32..10,
        block_hdd in 0u32..10,
        object in 0u32..10,
        gateway in 0u32..4,
        nodes in 0u32..18,
    ) -> RackQuantities {
        RackQuantities { control_plane, compute, block_ssd, block_hdd, object, gateway, nodes }
    }
}

prop_compose! {
    fn arb_upstream()(
        cable_type in prop::sample::select(vec!["MPO_MPO", "MPO_4LC"]),
        cable_length in arb_distance(),
        cable_count in 0u32..16,
    ) -> UpstreamCabling {
        UpstreamCabling { cable_type: cable_type.to_string(), cable_length, cable_count }
    }
}

prop_compose! {
    fn arb_rack_record()(
        id in 1u32..12,
        rack_type in option::of(arb_rack_type()),
        quantities in arb_quantities(),
        tor_deployed in any::<bool>(),
        spine_deployed in any::<bool>(),
        pdu_type in arb_pdu_type(),
        upstream in option::of(arb_upstream()),
        connection in arb_connection(),
    ) -> RackRecord {
        RackRecord {
            id,
            rack_type,
            quantities,
            tor_deployed,
            spine_deployed,
            pdu_type,
            upstream,
            connection,
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn property_rack_record_serialization_round_trip(rack in arb_rack_record()) {
        let json = serde_json::to_string(&rack)
            .expect("Serialization should succeed for RackRecord");
        let deserialized: RackRecord = serde_json::from_str(&json)
            .expect("Deserialization should succeed for valid JSON");

        prop_assert_eq!(rack, deserialized);
    }

    #[test]
    fn property_pdu_part_key_only_for_known_descriptions(pdu in arb_pdu_type()) {
        let reclassified = PduType::from_description(pdu.description());
        match &reclassified {
            PduType::Unrecognized(_) => prop_assert!(reclassified.part_key().is_none()),
            known => {
                prop_assert!(known.part_key().is_some());
                prop_assert_eq!(known, &pdu);
            }
        }
    }

    #[test]
    fn property_connection_distance_to_oob_implies_distance(connection in arb_connection()) {
        if connection.distance_to_oob().is_some() {
            prop_assert!(connection.distance().is_some());
        }
        prop_assert_eq!(connection.is_absent(), connection.distance().is_none());
    }
}

#[test]
fn rack_type_labels_are_unique() {
    let mut labels: Vec<&str> = RackType::ALL.iter().map(|t| t.label()).collect();
    labels.sort_unstable();
    labels.dedup();
    assert_eq!(labels.len(), RackType::ALL.len());
}
