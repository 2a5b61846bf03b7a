//! Bill of materials models.

use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::rack::{RackId, RackType};

/// Catalog description of an orderable part.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct PartInfo {
    #[validate(length(min = 1, message = "SKU must not be empty"))]
    pub sku: String,
    pub label: String,
}

/// A required quantity of one part for one rack.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BomLine {
    pub rack_id: RackId,
    pub part_key: String,
    pub quantity: u32,
}

/// Parts required by a single rack, in catalog order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RackBom {
    pub rack_id: RackId,
    pub rack_type: Option<RackType>,
    pub lines: Vec<BomLine>,
}

impl RackBom {
    pub fn rack_name(&self) -> String {
        format!("rack{}", self.rack_id)
    }

    /// Quantity of a part, zero when the rack does not need it
    pub fn quantity(&self, part_key: &str) -> u32 {
        self.lines
            .iter()
            .find(|line| line.part_key == part_key)
            .map(|line| line.quantity)
            .unwrap_or(0)
    }
}

impl Serialize for RackBom {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.lines.len()))?;
        for line in &self.lines {
            map.serialize_entry(&line.part_key, &line.quantity)?;
        }
        map.end()
    }
}

/// Bill of materials for a whole deployment, one entry per rack in rack order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Bom {
    pub racks: Vec<RackBom>,
}

impl Bom {
    pub fn rack(&self, id: RackId) -> Option<&RackBom> {
        self.racks.iter().find(|rack| rack.rack_id == id)
    }

    pub fn lines(&self) -> impl Iterator<Item = &BomLine> {
        self.racks.iter().flat_map(|rack| rack.lines.iter())
    }
}

impl Serialize for Bom {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.racks.len()))?;
        for rack in &self.racks {
            map.serialize_entry(&rack.rack_name(), rack)?;
        }
        map.end()
    }
}
