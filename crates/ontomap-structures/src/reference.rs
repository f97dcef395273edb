// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*!
Reference table document.

This is the serialized form of the external atlas catalog: the node table, the
hemisphere-neutral placeholder and the per-mapping tables. It is parsed as-is and only
cross-checked when handed to [`crate::OntologyStore::load`].

```json
{
  "version": "2017",
  "placeholder": { "acronym": "void", "id": 0 },
  "nodes": [
    { "id": 997, "acronym": "root", "level": 0, "parent": null },
    { "id": 500, "acronym": "MO", "level": 6, "parent": "Isocortex", "dual_role_partner": "MO-un" }
  ],
  "hierarchical": [
    { "name": "allen", "views": [ { "name": "allen", "representable": ["MOp", "MOs"] } ] }
  ],
  "coarse": [
    { "name": "beryl", "ancestor_remap": { "648": 985 } }
  ]
}
```
*/

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use crate::OntologyResult;

/// Complete reference dataset for one atlas version
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReferenceTables {
    #[serde(default)]
    pub version: String,

    /// Identity that denotes "outside the ontology"; dropped from input
    #[serde(default)]
    pub placeholder: Option<PlaceholderRecord>,

    pub nodes: Vec<NodeRecord>,

    /// Tree-shaped mappings aggregated through the hierarchy
    #[serde(default)]
    pub hierarchical: Vec<HierarchicalMappingRecord>,

    /// Flat mappings resolved through an ancestor table
    #[serde(default)]
    pub coarse: Vec<CoarseMappingRecord>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaceholderRecord {
    pub acronym: String,
    pub id: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeRecord {
    pub id: u32,
    pub acronym: String,
    pub level: u16,
    /// Parent acronym, `None` only for the root
    #[serde(default)]
    pub parent: Option<String>,
    #[serde(default)]
    pub dual_role_partner: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HierarchicalMappingRecord {
    pub name: String,
    /// First view is the primary one
    pub views: Vec<ViewRecord>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewRecord {
    pub name: String,

    /// Acronyms with a displayable counterpart in this view
    #[serde(default)]
    pub representable: Vec<String>,

    /// Nodes belonging to this view's tree; `None` means the whole ontology
    #[serde(default)]
    pub subtree: Option<Vec<String>>,

    /// Input acronym -> ancestor acronym from which subtree navigation starts
    #[serde(default)]
    pub entry_redirects: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoarseMappingRecord {
    pub name: String,
    /// Node id -> id of the ancestor representing it in this mapping
    pub ancestor_remap: BTreeMap<u32, u32>,
}

impl ReferenceTables {
    /// Parse reference tables from a JSON string
    pub fn from_json_str(json: &str) -> OntologyResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read and parse reference tables from a JSON file
    pub fn from_path(path: &Path) -> OntologyResult<Self> {
        let content = fs::read_to_string(path)?;
        tracing::debug!(
            target: "ontomap-structures",
            path = %path.display(),
            bytes = content.len(),
            "read reference tables"
        );
        Self::from_json_str(&content)
    }

    pub fn to_json_string(&self) -> OntologyResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
