//! Parts Catalog
//!
//! Part key → SKU and label, loaded once from a JSON object whose key order is
//! the order BOM lines are listed in.

use std::path::Path;

use catc_models::PartInfo;
use indexmap::IndexMap;
use serde_json::Value;
use tracing::info;

use crate::error::{SarError, SarResult};
use crate::validation::validate_model;

#[derive(Debug, Clone, Default)]
pub struct PartsCatalog {
    parts: IndexMap<String, PartInfo>,
}

impl PartsCatalog {
    pub fn load(path: &Path) -> SarResult<Self> {
        let data = std::fs::read_to_string(path)
            .map_err(|e| SarError::catalog(format!("{}: {}", path.display(), e)))?;
        let catalog = Self::from_json_str(&data)?;
        info!(path = %path.display(), parts = catalog.len(), "Loaded parts catalog");
        Ok(catalog)
    }

    /// Parse a catalog JSON object `{ "<part key>": { "sku": .., "label": .. } }`.
    pub fn from_json_str(data: &str) -> SarResult<Self> {
        let object: IndexMap<String, Value> = serde_json::from_str(data)?;
        let mut parts = IndexMap::with_capacity(object.len());

        for (key, value) in object {
            let info: PartInfo = serde_json::from_value(value)
                .map_err(|e| SarError::catalog(format!("part '{}': {}", key, e)))?;
            validate_model(&key, &info)?;
            parts.insert(key, info);
        }

        Ok(Self { parts })
    }

    pub fn get(&self, key: &str) -> Option<&PartInfo> {
        self.parts.get(key)
    }

    /// Catalog position of a part, used to order BOM lines
    pub fn position(&self, key: &str) -> Option<usize> {
        self.parts.get_index_of(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.parts.contains_key(key)
    }

    /// Parts in catalog order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &PartInfo)> {
        self.parts.iter().map(|(key, info)| (key.as_str(), info))
    }

    pub fn len(&self) -> usize {
        self.parts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    /// Catalog as JSON, in catalog order
    pub fn to_json_pretty(&self) -> SarResult<String> {
        Ok(serde_json::to_string_pretty(&self.parts)?)
    }
}
