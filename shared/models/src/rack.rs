//! Rack domain models for the CatC order-intake pipeline.
//!
//! A rack is classified into one of a closed set of product types. The
//! classification, the power distribution unit and the inter-rack connection
//! are all sum types so every rule that depends on them has to match them
//! exhaustively.

use serde::{Deserialize, Serialize};

/// 1-based rack identifier. Rack 1 is the topology hub.
pub type RackId = u32;

/// The rack acting as topology hub for the whole deployment.
pub const HUB_RACK_ID: RackId = 1;

/// Closed set of rack product types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RackType {
    #[serde(rename = "OCC")]
    Occ,
    #[serde(rename = "OCC CP")]
    OccControlPlane,
    #[serde(rename = "ExaCC Base")]
    ExaccBase,
    #[serde(rename = "ExaCC Quarter")]
    ExaccQuarter,
    #[serde(rename = "ExaCC Half")]
    ExaccHalf,
    #[serde(rename = "ExaCC Full")]
    ExaccFull,
    #[serde(rename = "BDCC Starter")]
    BdccStarter,
    #[serde(rename = "BDCC Full")]
    BdccFull,
}

/// Product family a rack type belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RackFamily {
    /// Oracle Cloud at Customer compute racks
    Compute,
    /// Exadata Cloud at Customer database racks
    ExascaleDatabase,
    /// Big Data Cloud at Customer racks
    BigData,
}

impl RackType {
    pub const ALL: [RackType; 8] = [
        RackType::Occ,
        RackType::OccControlPlane,
        RackType::ExaccBase,
        RackType::ExaccQuarter,
        RackType::ExaccHalf,
        RackType::ExaccFull,
        RackType::BdccStarter,
        RackType::BdccFull,
    ];

    pub fn family(self) -> RackFamily {
        match self {
            RackType::Occ | RackType::OccControlPlane => RackFamily::Compute,
            RackType::ExaccBase
            | RackType::ExaccQuarter
            | RackType::ExaccHalf
            | RackType::ExaccFull => RackFamily::ExascaleDatabase,
            RackType::BdccStarter | RackType::BdccFull => RackFamily::BigData,
        }
    }

    pub fn is_big_data(self) -> bool {
        self.family() == RackFamily::BigData
    }

    /// Label used in the SAR document and in configuration dumps
    pub fn label(self) -> &'static str {
        match self {
            RackType::Occ => "OCC",
            RackType::OccControlPlane => "OCC CP",
            RackType::ExaccBase => "ExaCC Base",
            RackType::ExaccQuarter => "ExaCC Quarter",
            RackType::ExaccHalf => "ExaCC Half",
            RackType::ExaccFull => "ExaCC Full",
            RackType::BdccStarter => "BDCC Starter",
            RackType::BdccFull => "BDCC Full",
        }
    }
}

impl std::fmt::Display for RackType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Power distribution unit type, matched exactly against the descriptive
/// strings offered by the hardware requirements sheet. Serialized as that
/// string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", from = "String")]
pub enum PduType {
    SinglePhase22kvaHighVoltage,
    SinglePhase15kvaLowVoltage,
    SinglePhase22kvaLowVoltage,
    ThreePhase15kvaHighVoltage,
    ThreePhase24kvaHighVoltage,
    ThreePhase15kvaLowVoltage,
    ThreePhase24kvaLowVoltage,
    /// Any string outside the known set, kept verbatim
    Unrecognized(String),
}

impl PduType {
    // Matched byte for byte, including the doubled space before "(EMEA" on the
    // three-phase high voltage entries.
    const DESCRIPTIONS: [(&'static str, PduType); 7] = [
        (
            "* Single-Phase 2(Two)x22kVA High Voltage Power Supplies (EMEA & APAC (excluding Japan /Taiwan)",
            PduType::SinglePhase22kvaHighVoltage,
        ),
        (
            "* Single-Phase 2(Two)x15kVA Low Voltage Power Supplies (Americas / Japan /Taiwan)",
            PduType::SinglePhase15kvaLowVoltage,
        ),
        (
            "* Single-Phase 2(Two)x22kVA Low Voltage Power Supplies (Americas / Japan /Taiwan)",
            PduType::SinglePhase22kvaLowVoltage,
        ),
        (
            "* Three-Phase 2(Two)x15kVA High Voltage Power Supplies  (EMEA & APAC (excluding Japan /Taiwan)",
            PduType::ThreePhase15kvaHighVoltage,
        ),
        (
            "* Three-Phase 2(Two)x24kVA High Voltage Power Supplies  (EMEA & APAC (excluding Japan /Taiwan)",
            PduType::ThreePhase24kvaHighVoltage,
        ),
        (
            "* Three-Phase 2(Two)x15kVA Low Voltage Power Supplies (Americas / Japan /Taiwan)",
            PduType::ThreePhase15kvaLowVoltage,
        ),
        (
            "* Three-Phase 2(Two)x24kVA Low Voltage Power Supplies (Americas / Japan /Taiwan)",
            PduType::ThreePhase24kvaLowVoltage,
        ),
    ];

    /// Classify a PDU description. Case and whitespace sensitive.
    pub fn from_description(description: &str) -> Self {
        Self::DESCRIPTIONS
            .iter()
            .find(|(known, _)| *known == description)
            .map(|(_, pdu)| pdu.clone())
            .unwrap_or_else(|| PduType::Unrecognized(description.to_string()))
    }

    pub fn description(&self) -> &str {
        match self {
            PduType::Unrecognized(raw) => raw,
            known => Self::DESCRIPTIONS
                .iter()
                .find(|(_, pdu)| pdu == known)
                .map(|(text, _)| *text)
                .unwrap_or_default(),
        }
    }

    /// Power profile part key, `None` when the description is not recognized.
    ///
    /// The single-phase 15kVA low voltage supply orders the three-phase part;
    /// that is how the order sheet maps it.
    pub fn part_key(&self) -> Option<&'static str> {
        match self {
            PduType::SinglePhase22kvaHighVoltage => Some("PDU 1phase-230V-22kVA"),
            PduType::SinglePhase15kvaLowVoltage => Some("PDU 3phase-120V-15kVA"),
            PduType::SinglePhase22kvaLowVoltage => Some("PDU 3phase-120V-22kVA"),
            PduType::ThreePhase15kvaHighVoltage => Some("PDU 3phase-230V-15kVA"),
            PduType::ThreePhase24kvaHighVoltage => Some("PDU 3phase-230V-24kVA"),
            PduType::ThreePhase15kvaLowVoltage => Some("PDU 3phase-120V-15kVA"),
            PduType::ThreePhase24kvaLowVoltage => Some("PDU 3phase-120V-24kVA"),
            PduType::Unrecognized(_) => None,
        }
    }
}

impl From<String> for PduType {
    fn from(description: String) -> Self {
        PduType::from_description(&description)
    }
}

impl From<PduType> for String {
    fn from(pdu: PduType) -> Self {
        match pdu {
            PduType::Unrecognized(raw) => raw,
            known => known.description().to_string(),
        }
    }
}

impl Default for PduType {
    fn default() -> Self {
        PduType::Unrecognized(String::new())
    }
}

/// How a rack's network reaches the rest of the deployment.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum InternalConnection {
    /// Nothing recorded, e.g. the hub rack of a deployment without spine
    #[default]
    Absent,
    #[serde(rename = "ToR to spine")]
    TorToSpine {
        distance: String,
        #[serde(rename = "distance to OOB", skip_serializing_if = "Option::is_none")]
        distance_to_oob: Option<String>,
    },
    #[serde(rename = "ToR to ToR")]
    TorToTor {
        distance: String,
        #[serde(rename = "distance to OOB")]
        distance_to_oob: String,
    },
    #[serde(rename = "eth to ToR")]
    EthernetToTor {
        /// Neighbouring rack, `None` when the document reference does not
        /// name an extracted rack
        #[serde(rename = "to rack")]
        to_rack: Option<RackId>,
        distance: String,
        #[serde(rename = "distance to OOB")]
        distance_to_oob: String,
    },
}

impl InternalConnection {
    pub fn is_absent(&self) -> bool {
        matches!(self, InternalConnection::Absent)
    }

    pub fn distance(&self) -> Option<&str> {
        match self {
            InternalConnection::Absent => None,
            InternalConnection::TorToSpine { distance, .. }
            | InternalConnection::TorToTor { distance, .. }
            | InternalConnection::EthernetToTor { distance, .. } => Some(distance),
        }
    }

    pub fn distance_to_oob(&self) -> Option<&str> {
        match self {
            InternalConnection::Absent => None,
            InternalConnection::TorToSpine { distance_to_oob, .. } => distance_to_oob.as_deref(),
            InternalConnection::TorToTor { distance_to_oob, .. }
            | InternalConnection::EthernetToTor { distance_to_oob, .. } => Some(distance_to_oob),
        }
    }

    pub fn neighbour(&self) -> Option<RackId> {
        match self {
            InternalConnection::EthernetToTor { to_rack, .. } => *to_rack,
            _ => None,
        }
    }
}

/// Upstream (north-south) cabling requested for a rack.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct UpstreamCabling {
    #[serde(rename = "upstream cable type")]
    pub cable_type: String,
    #[serde(rename = "upstream cable length")]
    pub cable_length: String,
    #[serde(rename = "upstream cable count")]
    pub cable_count: u32,
}

impl UpstreamCabling {
    /// Catalog key of the cable, e.g. `cable MPO_MPO 10m`
    pub fn cable_key(&self) -> String {
        format!("cable {} {}", self.cable_type, self.cable_length)
    }
}

/// Per-type quantities read from the rack allocation table.
/// Fields that do not apply to a rack's type stay zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RackQuantities {
    #[serde(rename = "CP qty")]
    pub control_plane: u32,
    #[serde(rename = "compute qty")]
    pub compute: u32,
    #[serde(rename = "block ssd qty")]
    pub block_ssd: u32,
    #[serde(rename = "block hdd qty")]
    pub block_hdd: u32,
    #[serde(rename = "object qty")]
    pub object: u32,
    #[serde(rename = "oasg qty")]
    pub gateway: u32,
    #[serde(rename = "node qty")]
    pub nodes: u32,
}

/// One deployed rack as described by the SAR document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RackRecord {
    pub id: RackId,
    #[serde(rename = "type")]
    pub rack_type: Option<RackType>,
    #[serde(flatten)]
    pub quantities: RackQuantities,
    #[serde(rename = "ToR deployed")]
    pub tor_deployed: bool,
    #[serde(rename = "spine deployed")]
    pub spine_deployed: bool,
    #[serde(rename = "pdu type")]
    pub pdu_type: PduType,
    #[serde(rename = "upstream cabling", skip_serializing_if = "Option::is_none")]
    pub upstream: Option<UpstreamCabling>,
    #[serde(rename = "internal connection")]
    pub connection: InternalConnection,
}

impl RackRecord {
    pub fn new(id: RackId) -> Self {
        Self {
            id,
            rack_type: None,
            quantities: RackQuantities::default(),
            tor_deployed: false,
            spine_deployed: false,
            pdu_type: PduType::default(),
            upstream: None,
            connection: InternalConnection::Absent,
        }
    }

    /// Name used for the rack in reports, `rack1`, `rack2`, ...
    pub fn name(&self) -> String {
        format!("rack{}", self.id)
    }

    pub fn is_hub(&self) -> bool {
        self.id == HUB_RACK_ID
    }

    pub fn family(&self) -> Option<RackFamily> {
        self.rack_type.map(RackType::family)
    }

    pub fn is_big_data(&self) -> bool {
        self.rack_type.is_some_and(RackType::is_big_data)
    }

    /// Racks that carry their own upstream cabling: a ToR switch or a big-data
    /// gateway.
    pub fn has_upstream_uplink(&self) -> bool {
        self.tor_deployed || self.is_big_data()
    }
}
