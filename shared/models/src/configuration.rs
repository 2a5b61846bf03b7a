//! Normalized configuration extracted from a SAR document.

use indexmap::IndexMap;
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};

use crate::rack::{RackId, RackRecord, HUB_RACK_ID};

/// Customer and install site.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CustomerInfo {
    pub name: String,
    pub country: String,
    /// Indirect sale through a reseller; selects resale rack parts
    pub indirect: bool,
}

/// Cloud subscription products listed on the subscriptions sheet, in sheet order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SubscriptionProduct {
    #[serde(rename = "OCC CP")]
    OccControlPlane,
    #[serde(rename = "OCC Compute")]
    OccCompute,
    #[serde(rename = "OCC Block storage")]
    OccBlockStorage,
    #[serde(rename = "OCC Block storage High I/O")]
    OccBlockStorageHighIo,
    #[serde(rename = "OCC Object storage")]
    OccObjectStorage,
    #[serde(rename = "ExaCC X7 - Base System")]
    ExaccBase,
    #[serde(rename = "ExaCC X7 - Quarter System")]
    ExaccQuarter,
    #[serde(rename = "ExaCC X7 - Half System")]
    ExaccHalf,
    #[serde(rename = "ExaCC X7 - Full System")]
    ExaccFull,
    #[serde(rename = "BDCC - Starter Pack - 3 Nodes")]
    BdccStarterPack,
    #[serde(rename = "BDCC - Additional Nodes")]
    BdccAdditionalNodes,
}

impl SubscriptionProduct {
    pub const ALL: [SubscriptionProduct; 11] = [
        SubscriptionProduct::OccControlPlane,
        SubscriptionProduct::OccCompute,
        SubscriptionProduct::OccBlockStorage,
        SubscriptionProduct::OccBlockStorageHighIo,
        SubscriptionProduct::OccObjectStorage,
        SubscriptionProduct::ExaccBase,
        SubscriptionProduct::ExaccQuarter,
        SubscriptionProduct::ExaccHalf,
        SubscriptionProduct::ExaccFull,
        SubscriptionProduct::BdccStarterPack,
        SubscriptionProduct::BdccAdditionalNodes,
    ];
}

/// Subscription counts in first-insertion order, serialized as a map keyed
/// by product name.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubscriptionCounts {
    counts: IndexMap<SubscriptionProduct, u32>,
}

impl SubscriptionCounts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a product's count; a product already present keeps its position.
    pub fn set(&mut self, product: SubscriptionProduct, count: u32) {
        self.counts.insert(product, count);
    }

    /// Count for a product, zero when not recorded
    pub fn get(&self, product: SubscriptionProduct) -> u32 {
        self.counts.get(&product).copied().unwrap_or(0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (SubscriptionProduct, u32)> + '_ {
        self.counts.iter().map(|(product, count)| (*product, *count))
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }
}

/// Everything extracted from one SAR document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Configuration {
    #[serde(rename = "sar release")]
    pub release: u32,
    pub customer: CustomerInfo,
    pub subscriptions: SubscriptionCounts,
    #[serde(rename = "hw", serialize_with = "serialize_racks")]
    pub racks: Vec<RackRecord>,
}

impl Configuration {
    pub fn new(release: u32, customer: CustomerInfo, subscriptions: SubscriptionCounts) -> Self {
        Self {
            release,
            customer,
            subscriptions,
            racks: Vec::new(),
        }
    }

    pub fn rack(&self, id: RackId) -> Option<&RackRecord> {
        // ids are contiguous from 1
        id.checked_sub(1)
            .and_then(|index| self.racks.get(index as usize))
            .filter(|rack| rack.id == id)
    }

    /// The topology hub, absent only when no rack is deployed
    pub fn hub(&self) -> Option<&RackRecord> {
        self.rack(HUB_RACK_ID)
    }

    /// Whether the hub rack carries a spine switch. Only the hub's flag
    /// decides east-west topology for the whole deployment.
    pub fn hub_has_spine(&self) -> bool {
        self.hub().is_some_and(|hub| hub.spine_deployed)
    }

    pub fn rack_count(&self) -> usize {
        self.racks.len()
    }
}

fn serialize_racks<S: Serializer>(racks: &[RackRecord], serializer: S) -> Result<S::Ok, S::Error> {
    let mut map = serializer.serialize_map(Some(racks.len()))?;
    for rack in racks {
        map.serialize_entry(&rack.name(), rack)?;
    }
    map.end()
}
