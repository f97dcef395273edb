// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*!
OntologyStore - immutable arena of the reference hierarchy.

## Data Storage

- **Nodes**: flat `Vec<Node>` addressed by `NodeIndex`
- **Lookups**: acronym, id and dual-role partner hash indices (O(1))
- **Children**: `Vec<Vec<NodeIndex>>` in reference-table order
- **Mappings**: hierarchical views and coarse ancestor tables, resolved to indices

The store is validated once in [`OntologyStore::load`] and never mutated afterwards.
*/

use ahash::{AHashMap, AHashSet};
use std::path::Path;

use crate::mapping::{CoarseMapping, HierarchicalMapping, MappingView};
use crate::node::{Node, NodeIndex, NodeRef};
use crate::reference::{PlaceholderRecord, ReferenceTables, ViewRecord};
use crate::{OntologyError, OntologyResult};

/// Immutable in-memory representation of the classification hierarchy
#[derive(Debug, Clone)]
pub struct OntologyStore {
    version: String,
    nodes: Vec<Node>,
    children: Vec<Vec<NodeIndex>>,
    root: NodeIndex,
    by_acronym: AHashMap<String, NodeIndex>,
    by_id: AHashMap<u32, NodeIndex>,
    by_partner: AHashMap<String, NodeIndex>,
    placeholder: Option<PlaceholderRecord>,
    hierarchical: Vec<HierarchicalMapping>,
    coarse: Vec<CoarseMapping>,
}

fn integrity(msg: impl Into<String>) -> OntologyError {
    OntologyError::DataIntegrity(msg.into())
}

impl OntologyStore {
    /// Build and validate the store from reference tables
    ///
    /// # Errors
    ///
    /// Returns `OntologyError::DataIntegrity` if the node table is not a single rooted tree
    /// with consistent levels, or if any table references an id or acronym that does not
    /// exist.
    pub fn load(tables: ReferenceTables) -> OntologyResult<Self> {
        let ReferenceTables {
            version,
            placeholder,
            nodes: records,
            hierarchical,
            coarse,
        } = tables;

        if records.is_empty() {
            return Err(integrity("reference node table is empty"));
        }
        if records.len() > u32::MAX as usize {
            return Err(integrity("reference node table exceeds u32 index space"));
        }

        let mut by_acronym = AHashMap::with_capacity(records.len());
        let mut by_id = AHashMap::with_capacity(records.len());
        for (i, record) in records.iter().enumerate() {
            let index = NodeIndex(i as u32);
            if by_acronym.insert(record.acronym.clone(), index).is_some() {
                return Err(integrity(format!("duplicate acronym '{}'", record.acronym)));
            }
            if by_id.insert(record.id, index).is_some() {
                return Err(integrity(format!("duplicate region id {}", record.id)));
            }
        }

        let mut by_partner = AHashMap::new();
        for (i, record) in records.iter().enumerate() {
            if let Some(partner) = &record.dual_role_partner {
                if by_acronym.contains_key(partner) {
                    return Err(integrity(format!(
                        "dual-role partner '{}' of '{}' collides with a node acronym",
                        partner, record.acronym
                    )));
                }
                if by_partner.insert(partner.clone(), NodeIndex(i as u32)).is_some() {
                    return Err(integrity(format!("duplicate dual-role partner '{}'", partner)));
                }
            }
        }

        let mut root = None;
        let mut nodes = Vec::with_capacity(records.len());
        for (i, record) in records.into_iter().enumerate() {
            let parent = match &record.parent {
                None => {
                    if let Some(existing) = root {
                        return Err(integrity(format!(
                            "multiple roots: '{}' and node {}",
                            record.acronym, existing
                        )));
                    }
                    root = Some(NodeIndex(i as u32));
                    None
                }
                Some(parent) => Some(*by_acronym.get(parent).ok_or_else(|| {
                    integrity(format!(
                        "node '{}' references missing parent '{}'",
                        record.acronym, parent
                    ))
                })?),
            };
            nodes.push(Node {
                id: record.id,
                acronym: record.acronym,
                level: record.level,
                parent,
                dual_role_partner: record.dual_role_partner,
            });
        }
        let root = root.ok_or_else(|| integrity("node table has no root"))?;
        if nodes[root.as_usize()].level != 0 {
            return Err(integrity(format!(
                "root '{}' must be at level 0",
                nodes[root.as_usize()].acronym
            )));
        }

        let mut children = vec![Vec::new(); nodes.len()];
        for (i, node) in nodes.iter().enumerate() {
            if let Some(parent) = node.parent {
                let parent_level = nodes[parent.as_usize()].level;
                if parent_level.checked_add(1) != Some(node.level) {
                    return Err(integrity(format!(
                        "level of '{}' is {}, expected {} (parent '{}')",
                        node.acronym,
                        node.level,
                        u32::from(parent_level) + 1,
                        nodes[parent.as_usize()].acronym
                    )));
                }
                children[parent.as_usize()].push(NodeIndex(i as u32));
            }
        }

        // Levels strictly increase along parent links, so anything not reached from the
        // root sits on a cycle or under one.
        let mut reached = 0usize;
        let mut stack = vec![root];
        while let Some(index) = stack.pop() {
            reached += 1;
            stack.extend(children[index.as_usize()].iter().copied());
        }
        if reached != nodes.len() {
            return Err(integrity(format!(
                "{} node(s) are not reachable from the root",
                nodes.len() - reached
            )));
        }

        if let Some(placeholder) = &placeholder {
            if by_acronym.contains_key(&placeholder.acronym)
                || by_partner.contains_key(&placeholder.acronym)
            {
                return Err(integrity(format!(
                    "placeholder acronym '{}' is also a region acronym",
                    placeholder.acronym
                )));
            }
            if by_id.contains_key(&placeholder.id) {
                return Err(integrity(format!(
                    "placeholder id {} is also a region id",
                    placeholder.id
                )));
            }
        }

        let mut store = OntologyStore {
            version,
            nodes,
            children,
            root,
            by_acronym,
            by_id,
            by_partner,
            placeholder,
            hierarchical: Vec::new(),
            coarse: Vec::new(),
        };

        let mut mapping_names = AHashSet::new();
        for record in hierarchical {
            if !mapping_names.insert(record.name.clone()) {
                return Err(integrity(format!("duplicate mapping name '{}'", record.name)));
            }
            if record.views.is_empty() {
                return Err(integrity(format!("mapping '{}' has no views", record.name)));
            }
            let views = record
                .views
                .iter()
                .map(|view| store.build_view(&record.name, view))
                .collect::<OntologyResult<Vec<_>>>()?;
            store.hierarchical.push(HierarchicalMapping {
                name: record.name,
                views,
            });
        }
        for record in coarse {
            if !mapping_names.insert(record.name.clone()) {
                return Err(integrity(format!("duplicate mapping name '{}'", record.name)));
            }
            let mut ancestor_remap = AHashMap::with_capacity(record.ancestor_remap.len());
            for (node_id, ancestor_id) in record.ancestor_remap {
                let node = store.by_id.get(&node_id).copied().ok_or_else(|| {
                    integrity(format!(
                        "mapping '{}' remaps unknown region id {}",
                        record.name, node_id
                    ))
                })?;
                let ancestor = store.by_id.get(&ancestor_id).copied().ok_or_else(|| {
                    integrity(format!(
                        "mapping '{}' remaps {} to unknown region id {}",
                        record.name, node_id, ancestor_id
                    ))
                })?;
                if !store.is_ancestor_or_self(ancestor, node) {
                    return Err(integrity(format!(
                        "mapping '{}' remaps {} to {}, which is not one of its ancestors",
                        record.name, node_id, ancestor_id
                    )));
                }
                ancestor_remap.insert(node_id, ancestor_id);
            }
            store.coarse.push(CoarseMapping {
                name: record.name,
                ancestor_remap,
            });
        }

        tracing::info!(
            target: "ontomap-structures",
            version = %store.version,
            nodes = store.nodes.len(),
            dual_role = store.by_partner.len(),
            hierarchical = store.hierarchical.len(),
            coarse = store.coarse.len(),
            "loaded reference ontology"
        );
        Ok(store)
    }

    /// Parse and load reference tables from a JSON string
    pub fn from_json_str(json: &str) -> OntologyResult<Self> {
        Self::load(ReferenceTables::from_json_str(json)?)
    }

    /// Read, parse and load reference tables from a JSON file
    pub fn from_path(path: &Path) -> OntologyResult<Self> {
        Self::load(ReferenceTables::from_path(path)?)
    }

    fn build_view(&self, mapping: &str, record: &ViewRecord) -> OntologyResult<MappingView> {
        let lookup = |acronym: &str, table: &str| {
            self.by_acronym.get(acronym).copied().ok_or_else(|| {
                integrity(format!(
                    "view '{}/{}' {} table references unknown acronym '{}'",
                    mapping, record.name, table, acronym
                ))
            })
        };

        let mut representable = vec![false; self.nodes.len()];
        for acronym in &record.representable {
            representable[lookup(acronym, "representable")?.as_usize()] = true;
        }

        let members = match &record.subtree {
            Some(subtree) => {
                let mut members = vec![false; self.nodes.len()];
                for acronym in subtree {
                    members[lookup(acronym, "subtree")?.as_usize()] = true;
                }
                Some(members)
            }
            None => None,
        };

        if let Some(members) = &members {
            let tops: Vec<&str> = self
                .iter()
                .filter(|(index, node)| {
                    members[index.as_usize()]
                        && (node.is_root()
                            || node.parent.is_some_and(|p| !members[p.as_usize()]))
                })
                .map(|(_, node)| node.acronym.as_str())
                .collect();
            if tops.len() > 1 {
                return Err(integrity(format!(
                    "view '{}/{}' subtree is not connected: '{}' and '{}' have no parent in it",
                    mapping, record.name, tops[0], tops[1]
                )));
            }
        }

        let mut entry_redirects = AHashMap::with_capacity(record.entry_redirects.len());
        for (source, target) in &record.entry_redirects {
            let source_index = lookup(source, "redirect")?;
            let target_index = lookup(target, "redirect")?;
            if !self.is_ancestor_or_self(target_index, source_index) {
                return Err(integrity(format!(
                    "view '{}/{}' redirects '{}' to '{}', which is not one of its ancestors",
                    mapping, record.name, source, target
                )));
            }
            if let Some(members) = &members {
                // Every node from the source up to the target must stay inside the view
                let mut current = Some(source_index);
                while let Some(index) = current {
                    if !members[index.as_usize()] {
                        return Err(integrity(format!(
                            "view '{}/{}' redirect '{}' -> '{}' leaves the view at '{}'",
                            mapping,
                            record.name,
                            source,
                            target,
                            self.node(index).acronym
                        )));
                    }
                    if index == target_index {
                        break;
                    }
                    current = self.parent(index);
                }
            }
            entry_redirects.insert(source_index, target_index);
        }

        let view = MappingView {
            name: record.name.clone(),
            members,
            representable,
            entry_redirects,
        };
        tracing::debug!(
            target: "ontomap-structures",
            mapping,
            view = %view.name(),
            restricted = view.is_restricted(),
            representable = view.representable_count(),
            "built mapping view"
        );
        Ok(view)
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn root(&self) -> NodeIndex {
        self.root
    }

    /// Node at `index`
    ///
    /// # Panics
    ///
    /// Panics if `index` was not produced by this store.
    pub fn node(&self, index: NodeIndex) -> &Node {
        &self.nodes[index.as_usize()]
    }

    pub fn iter(&self) -> impl Iterator<Item = (NodeIndex, &Node)> + '_ {
        self.nodes
            .iter()
            .enumerate()
            .map(|(i, node)| (NodeIndex(i as u32), node))
    }

    pub fn lookup_by_acronym(&self, acronym: &str) -> OntologyResult<NodeIndex> {
        self.by_acronym
            .get(acronym)
            .copied()
            .ok_or_else(|| OntologyError::UnknownAcronym(acronym.to_string()))
    }

    /// Look up by hemisphere-neutral id
    pub fn lookup_by_id(&self, id: u32) -> OntologyResult<NodeIndex> {
        self.by_id
            .get(&id)
            .copied()
            .ok_or(OntologyError::UnknownId(i64::from(id)))
    }

    /// Resolve a structural acronym or a dual-role partner acronym
    pub fn resolve_acronym(&self, acronym: &str) -> OntologyResult<NodeRef> {
        if let Some(index) = self.by_acronym.get(acronym) {
            return Ok(NodeRef::structural(*index));
        }
        self.by_partner
            .get(acronym)
            .map(|index| NodeRef::leaf(*index))
            .ok_or_else(|| OntologyError::UnknownAcronym(acronym.to_string()))
    }

    /// Acronym under which a facet reference is exposed
    pub fn acronym_of(&self, node: NodeRef) -> &str {
        self.node(node.index).acronym_for(node.facet)
    }

    pub fn parent(&self, index: NodeIndex) -> Option<NodeIndex> {
        self.node(index).parent
    }

    pub fn children(&self, index: NodeIndex) -> &[NodeIndex] {
        &self.children[index.as_usize()]
    }

    /// All structural descendants of `index` in depth-first pre-order, excluding itself
    pub fn descendants(&self, index: NodeIndex) -> Vec<NodeIndex> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeIndex> = self.children(index).iter().rev().copied().collect();
        while let Some(current) = stack.pop() {
            out.push(current);
            stack.extend(self.children(current).iter().rev().copied());
        }
        out
    }

    /// True if `ancestor` lies on the path from `node` to the root (inclusive)
    pub fn is_ancestor_or_self(&self, ancestor: NodeIndex, node: NodeIndex) -> bool {
        let mut current = Some(node);
        while let Some(index) = current {
            if index == ancestor {
                return true;
            }
            current = self.parent(index);
        }
        false
    }

    pub fn dual_role_count(&self) -> usize {
        self.by_partner.len()
    }

    pub fn placeholder(&self) -> Option<&PlaceholderRecord> {
        self.placeholder.as_ref()
    }

    pub fn hierarchical_mappings(&self) -> &[HierarchicalMapping] {
        &self.hierarchical
    }

    pub fn coarse_mappings(&self) -> &[CoarseMapping] {
        &self.coarse
    }

    pub fn hierarchical_mapping(&self, name: &str) -> Option<&HierarchicalMapping> {
        self.hierarchical.iter().find(|m| m.name() == name)
    }

    pub fn coarse_mapping(&self, name: &str) -> Option<&CoarseMapping> {
        self.coarse.iter().find(|m| m.name() == name)
    }
}
