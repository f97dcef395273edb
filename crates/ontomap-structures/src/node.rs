// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Node arena types.
//!
//! Nodes live in a flat `Vec` owned by [`crate::OntologyStore`] and are addressed by
//! [`NodeIndex`]. A dual-role node is a single arena entry; its two identities are told
//! apart by the [`Facet`] carried in a [`NodeRef`].

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Position of a node inside the ontology arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeIndex(pub u32);

impl NodeIndex {
    #[inline]
    pub fn as_usize(self) -> usize {
        self.0 as usize
    }
}

impl Display for NodeIndex {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Which identity of a node is meant.
///
/// Every node has a `Structural` facet (its place in the tree). Dual-role nodes also have a
/// `Leaf` facet: the directly measurable part of the region, addressed through the node's
/// partner acronym and treated as a terminal child of the structural facet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Facet {
    Structural,
    Leaf,
}

/// A facet-tagged reference to an arena node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeRef {
    pub index: NodeIndex,
    pub facet: Facet,
}

impl NodeRef {
    pub fn structural(index: NodeIndex) -> Self {
        Self {
            index,
            facet: Facet::Structural,
        }
    }

    pub fn leaf(index: NodeIndex) -> Self {
        Self {
            index,
            facet: Facet::Leaf,
        }
    }

    pub fn is_leaf_facet(&self) -> bool {
        self.facet == Facet::Leaf
    }
}

/// One element of the classification hierarchy
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    /// Stable, hemisphere-neutral id
    pub id: u32,
    pub acronym: String,
    /// Depth in the tree, root = 0
    pub level: u16,
    pub parent: Option<NodeIndex>,
    /// Acronym of the leaf facet, set only for dual-role nodes
    pub dual_role_partner: Option<String>,
}

impl Node {
    pub fn is_dual_role(&self) -> bool {
        self.dual_role_partner.is_some()
    }

    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    /// Acronym under which the given facet is exposed
    pub fn acronym_for(&self, facet: Facet) -> &str {
        match (facet, &self.dual_role_partner) {
            (Facet::Leaf, Some(partner)) => partner,
            _ => &self.acronym,
        }
    }

    /// Level used to order a facet: the leaf facet sorts one level below its twin
    pub fn effective_level(&self, facet: Facet) -> u16 {
        match facet {
            Facet::Structural => self.level,
            Facet::Leaf => self.level.saturating_add(1),
        }
    }
}
