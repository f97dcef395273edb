// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Remap output types and the feature record handed to storage.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};

use ontomap_structures::{Hemisphere, OntologyStore};

use crate::error::RemapResult;

/// Lateralized region identity used as output key
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RegionKey {
    pub acronym: String,
    pub hemisphere: Hemisphere,
}

impl RegionKey {
    pub fn new(acronym: impl Into<String>, hemisphere: Hemisphere) -> Self {
        Self {
            acronym: acronym.into(),
            hemisphere,
        }
    }
}

impl Display for RegionKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.acronym, self.hemisphere)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MappingKind {
    Hierarchical,
    Coarse,
}

/// Aggregated values for one mapping
#[derive(Debug, Clone, PartialEq)]
pub struct MappingResult {
    pub kind: MappingKind,
    /// Every node touched by propagation, leaf facets under their partner acronym
    pub closure: BTreeMap<RegionKey, f64>,
    /// Representable nodes only; equal to `closure` for coarse mappings
    pub filtered: BTreeMap<RegionKey, f64>,
}

impl MappingResult {
    pub(crate) fn new(kind: MappingKind) -> Self {
        Self {
            kind,
            closure: BTreeMap::new(),
            filtered: BTreeMap::new(),
        }
    }
}

/// Two views of one mapping disagreeing on a node; the first view's value was kept
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewConflict {
    pub mapping: String,
    pub region: RegionKey,
    pub primary_view: String,
    pub primary_value: f64,
    pub other_view: String,
    pub other_value: f64,
}

/// Result of one `remap` call, one entry per mapping
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RemapOutput {
    pub mappings: BTreeMap<String, MappingResult>,
    pub conflicts: Vec<ViewConflict>,
}

impl RemapOutput {
    pub fn mapping(&self, name: &str) -> Option<&MappingResult> {
        self.mappings.get(name)
    }

    /// Filtered values of every mapping as signed-id arrays
    pub fn to_feature_record(&self, store: &OntologyStore) -> RemapResult<FeatureRecord> {
        let mut mappings = BTreeMap::new();
        for (name, result) in &self.mappings {
            let mut pairs = result
                .filtered
                .iter()
                .map(|(key, value)| -> RemapResult<(i64, f64)> {
                    Ok((store.acronym_to_id(&key.acronym, key.hemisphere)?, *value))
                })
                .collect::<RemapResult<Vec<_>>>()?;
            pairs.sort_by_key(|(id, _)| *id);
            let (index, values) = pairs.into_iter().unzip();
            mappings.insert(name.clone(), MappingFeature { index, values });
        }
        Ok(FeatureRecord {
            version: store.version().to_string(),
            mappings,
        })
    }
}

/// Storage payload: per mapping, parallel arrays of signed ids and values
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeatureRecord {
    pub version: String,
    pub mappings: BTreeMap<String, MappingFeature>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MappingFeature {
    pub index: Vec<i64>,
    pub values: Vec<f64>,
}

impl FeatureRecord {
    pub fn to_json_string(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ontomap_structures::templates::motor_cortex_store;

    #[test]
    fn test_region_key_ordering_and_display() {
        let a = RegionKey::new("MOp", Hemisphere::Left);
        let b = RegionKey::new("MOp", Hemisphere::Right);
        assert!(a < b);
        assert_eq!(a.to_string(), "MOp (left)");
    }

    #[test]
    fn test_feature_record_is_sorted_by_signed_id() {
        let store = motor_cortex_store().unwrap();
        let mut result = MappingResult::new(MappingKind::Coarse);
        result.filtered.insert(RegionKey::new("MOp", Hemisphere::Right), 2.5);
        result.filtered.insert(RegionKey::new("MOs", Hemisphere::Left), 1.0);
        result.filtered.insert(RegionKey::new("MOp", Hemisphere::Left), 3.0);
        let mut output = RemapOutput::default();
        output.mappings.insert("beryl".to_string(), result);

        let record = output.to_feature_record(&store).unwrap();
        let beryl = &record.mappings["beryl"];
        assert_eq!(beryl.index, vec![-993, -985, 985]);
        assert_eq!(beryl.values, vec![1.0, 3.0, 2.5]);

        let json = record.to_json_string().unwrap();
        let parsed: FeatureRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, record);
    }
}
