//! BOM Rule Engine
//!
//! Each rule block is a pure function of one rack and the configuration it
//! belongs to. Blocks never see each other's output; the engine sums their
//! contributions, so the order they run in does not change the result.

use catc_models::{
    Bom, BomLine, Configuration, InternalConnection, RackBom, RackFamily, RackRecord, RackType,
};
use indexmap::IndexMap;
use tracing::{debug, warn};

use super::catalog::PartsCatalog;

/// Upstream cable type that needs ESR4 optics; every other type takes SR4.
const ESR4_CABLE_TYPE: &str = "MPO_4LC";

/// Part quantities contributed by one rule block
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PartsContribution {
    parts: Vec<(String, u32)>,
}

impl PartsContribution {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, part_key: impl Into<String>, quantity: u32) -> &mut Self {
        self.parts.push((part_key.into(), quantity));
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> {
        self.parts.iter().map(|(key, qty)| (key.as_str(), *qty))
    }
}

/// Accumulates contributions for one rack
#[derive(Debug, Default)]
pub struct PartsBuilder {
    quantities: IndexMap<String, u32>,
}

impl PartsBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a contribution. Totals saturate at `u32::MAX`.
    pub fn absorb(&mut self, contribution: &PartsContribution) {
        for (key, quantity) in contribution.iter() {
            let total = self.quantities.entry(key.to_string()).or_insert(0);
            *total = total.checked_add(quantity).unwrap_or_else(|| {
                warn!(part = key, "Part quantity saturated");
                u32::MAX
            });
        }
    }

    /// Non-zero lines in catalog order. Parts missing from the catalog go
    /// last, sorted by key.
    pub fn finish(mut self, rack: &RackRecord, catalog: &PartsCatalog) -> RackBom {
        self.quantities.retain(|_, quantity| *quantity > 0);

        for key in self.quantities.keys().filter(|key| !catalog.contains(key.as_str())) {
            warn!(rack = rack.id, part = %key, "Part missing from catalog");
        }

        let rank = |key: &str| catalog.position(key).unwrap_or(usize::MAX);
        self.quantities.sort_by(|a, _, b, _| {
            rank(a.as_str()).cmp(&rank(b.as_str())).then_with(|| a.cmp(b))
        });

        let lines = self
            .quantities
            .into_iter()
            .map(|(part_key, quantity)| BomLine {
                rack_id: rack.id,
                part_key,
                quantity,
            })
            .collect();

        RackBom {
            rack_id: rack.id,
            rack_type: rack.rack_type,
            lines,
        }
    }
}

/// Signature shared by every rule block
pub type RuleBlock = fn(&RackRecord, &Configuration) -> PartsContribution;

/// Rule blocks applied to every rack
pub const RULE_BLOCKS: [(&str, RuleBlock); 5] = [
    ("type parts", type_parts),
    ("north-south cabling", north_south_cabling),
    ("east-west cabling", east_west_cabling),
    ("out-of-band cabling", out_of_band_cabling),
    ("power distribution", power_distribution),
];

pub struct BomRuleEngine;

impl BomRuleEngine {
    /// Derive the BOM of every rack. Pure: the same configuration always
    /// yields the same BOM.
    pub fn derive(configuration: &Configuration, catalog: &PartsCatalog) -> Bom {
        let racks = configuration
            .racks
            .iter()
            .map(|rack| Self::derive_rack(rack, configuration, catalog))
            .collect();
        Bom { racks }
    }

    pub fn derive_rack(
        rack: &RackRecord,
        configuration: &Configuration,
        catalog: &PartsCatalog,
    ) -> RackBom {
        let mut builder = PartsBuilder::new();
        for (name, block) in RULE_BLOCKS {
            let contribution = block(rack, configuration);
            debug!(rack = rack.id, block = name, contribution = ?contribution, "Applied rule block");
            builder.absorb(&contribution);
        }
        builder.finish(rack, catalog)
    }
}

/// Base unit, bundles and directly ordered quantities for the rack's type.
pub fn type_parts(rack: &RackRecord, configuration: &Configuration) -> PartsContribution {
    let mut parts = PartsContribution::new();
    let Some(rack_type) = rack.rack_type else {
        return parts;
    };
    let quantities = &rack.quantities;

    match rack_type {
        RackType::Occ | RackType::OccControlPlane => {
            parts.add("OCC", 1);
            if configuration.customer.indirect {
                parts.add("OCC rack resale", 1);
            } else {
                parts.add("OCC rack", 1);
            }
            // one control plane: 5 admin nodes, 2 compute nodes and 1 block SSD
            if rack_type == RackType::OccControlPlane && quantities.control_plane == 1 {
                parts.add("OCC admin", 5).add("OCC compute", 2).add("OCC block ssd", 1);
            }
            parts
                .add("OCC compute", quantities.compute)
                .add("OCC block ssd", quantities.block_ssd)
                .add("OCC block hdd", quantities.block_hdd)
                .add("OCC object", quantities.object)
                .add("OCC software", 1)
                .add("Juniper support ToR", 1)
                .add("Juniper support Spine", 1)
                .add("install service Engineered Systems", 1)
                .add("Cisco support", 1)
                .add("OASG", quantities.gateway)
                .add("install service OASG", quantities.gateway);
            if quantities.gateway > 0 {
                parts.add("power cable", 2);
            }
        }
        RackType::ExaccBase | RackType::ExaccQuarter | RackType::ExaccHalf | RackType::ExaccFull => {
            parts.add("ExaCC", 1);
            if rack.tor_deployed {
                parts.add("ExaCC ToR", 2).add("ExaCC cable kit", 1);
            }
        }
        RackType::BdccStarter | RackType::BdccFull => {
            parts.add("BDCC", 1).add("BDCC base rack", 1);
            match rack_type {
                RackType::BdccStarter => parts.add("BDCC starter rack", 1),
                _ => parts.add("BDCC full rack", 1),
            };
            parts.add("BDCC node", quantities.nodes);
        }
    }

    parts
}

/// Upstream cables and their optics. BDCC gateways bring their own optics.
pub fn north_south_cabling(rack: &RackRecord, _configuration: &Configuration) -> PartsContribution {
    let mut parts = PartsContribution::new();
    let Some(upstream) = &rack.upstream else {
        return parts;
    };

    if rack.tor_deployed {
        parts.add(upstream.cable_key(), upstream.cable_count);
        let transceiver = if upstream.cable_type == ESR4_CABLE_TYPE {
            "TRX QSFP+ ESR4"
        } else {
            "TRX QSFP+ SR4"
        };
        parts.add(transceiver, upstream.cable_count);
    } else if rack.is_big_data() {
        parts.add(upstream.cable_key(), upstream.cable_count);
    }

    parts
}

/// Rack-to-rack data cabling towards the hub.
pub fn east_west_cabling(rack: &RackRecord, configuration: &Configuration) -> PartsContribution {
    let mut parts = PartsContribution::new();

    if rack.is_hub() {
        // 4 short cables and 8 optics for the spine, half installed in rack 1
        // and half in rack 2
        if rack.spine_deployed {
            parts
                .add("spine", 1)
                .add("cable MPO_MPO 5m", 4)
                .add("TRX QSFP+ SR4", 8);
        }
        return parts;
    }

    let Some(distance) = connection_distance(rack) else {
        warn!(rack = rack.id, "No internal connection distance, east-west cabling skipped");
        return parts;
    };

    if rack.tor_deployed {
        parts
            .add(format!("cable MPO_MPO {}", distance), 4)
            .add("TRX QSFP+ SR4", 8);
    } else if rack.is_big_data() {
        parts
            .add(format!("cable MPO_MPO {}", distance), 2)
            .add("TRX QSFP+ SR4", 2);
    } else if let InternalConnection::EthernetToTor { to_rack, .. } = &rack.connection {
        let neighbour_type = to_rack
            .and_then(|id| configuration.rack(id))
            .and_then(|neighbour| neighbour.rack_type);

        match neighbour_type.map(RackType::family) {
            Some(RackFamily::ExascaleDatabase) => {
                parts.add(format!("cable LC {}", distance), 10).add("TRX SFP+", 8);
            }
            Some(RackFamily::Compute) => {
                parts.add(format!("cable CAT6 {}", distance), 9);
            }
            Some(RackFamily::BigData) | None => {
                debug!(rack = rack.id, neighbour = ?to_rack, "No ethernet cabling for neighbour");
            }
        }
    }

    parts
}

/// Copper from the rack's out-of-band switch to the hub's.
pub fn out_of_band_cabling(rack: &RackRecord, _configuration: &Configuration) -> PartsContribution {
    let mut parts = PartsContribution::new();

    if rack.rack_type == Some(RackType::OccControlPlane) {
        // gateway and OOB switch share the rack
        parts.add("cable CAT6 5m", 1);
    } else if let Some(distance) = connection_distance(rack) {
        parts.add(format!("cable CAT6 {}", distance), 1);
    }

    parts
}

/// Cable length towards the hub; a blank distance cell orders no cable.
fn connection_distance(rack: &RackRecord) -> Option<&str> {
    rack.connection
        .distance()
        .map(str::trim)
        .filter(|distance| !distance.is_empty())
}

/// One power profile per rack, when the PDU description is recognized.
pub fn power_distribution(rack: &RackRecord, _configuration: &Configuration) -> PartsContribution {
    let mut parts = PartsContribution::new();
    if let Some(part_key) = rack.pdu_type.part_key() {
        parts.add(part_key, 1);
    }
    parts
}
