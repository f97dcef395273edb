// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Mapping views over the ontology.
//!
//! A [`HierarchicalMapping`] presents aggregated values through the tree and may be the
//! union of several [`MappingView`]s (primary first). A [`CoarseMapping`] bypasses the tree
//! and assigns every node to a fixed ancestor.

use ahash::AHashMap;

use crate::node::{NodeIndex, NodeRef};

/// One inclusion scheme over the ontology
#[derive(Debug, Clone)]
pub struct MappingView {
    pub(crate) name: String,
    /// Indexed by `NodeIndex`; `None` when every node belongs to the view
    pub(crate) members: Option<Vec<bool>>,
    /// Indexed by `NodeIndex`
    pub(crate) representable: Vec<bool>,
    pub(crate) entry_redirects: AHashMap<NodeIndex, NodeIndex>,
}

impl MappingView {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether the structural node belongs to this view's tree
    pub fn contains(&self, index: NodeIndex) -> bool {
        match &self.members {
            Some(members) => members.get(index.as_usize()).copied().unwrap_or(false),
            None => true,
        }
    }

    /// Leaf facets belong to a view exactly when their structural twin does
    pub fn contains_ref(&self, node: NodeRef) -> bool {
        self.contains(node.index)
    }

    pub fn is_representable(&self, index: NodeIndex) -> bool {
        self.representable
            .get(index.as_usize())
            .copied()
            .unwrap_or(false)
    }

    /// Node from which subtree navigation starts for an input on `index`
    pub fn entry_for(&self, index: NodeIndex) -> NodeIndex {
        self.entry_redirects.get(&index).copied().unwrap_or(index)
    }

    pub fn is_restricted(&self) -> bool {
        self.members.is_some()
    }

    pub fn representable_count(&self) -> usize {
        self.representable.iter().filter(|r| **r).count()
    }
}

/// Tree-aggregated mapping made of one or more views
#[derive(Debug, Clone)]
pub struct HierarchicalMapping {
    pub(crate) name: String,
    pub(crate) views: Vec<MappingView>,
}

impl HierarchicalMapping {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// All views, primary first
    pub fn views(&self) -> &[MappingView] {
        &self.views
    }

    pub fn primary(&self) -> &MappingView {
        // load() rejects mappings without views
        &self.views[0]
    }

    /// True if any view of the mapping can display the node
    pub fn is_representable(&self, index: NodeIndex) -> bool {
        self.views.iter().any(|view| view.is_representable(index))
    }
}

/// Flat mapping resolved through an explicit ancestor table
#[derive(Debug, Clone)]
pub struct CoarseMapping {
    pub(crate) name: String,
    pub(crate) ancestor_remap: AHashMap<u32, u32>,
}

impl CoarseMapping {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Hemisphere-neutral id of the ancestor standing in for `node_id`
    pub fn ancestor_of(&self, node_id: u32) -> Option<u32> {
        self.ancestor_remap.get(&node_id).copied()
    }

    pub fn len(&self) -> usize {
        self.ancestor_remap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ancestor_remap.is_empty()
    }
}
