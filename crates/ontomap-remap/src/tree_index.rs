// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*!
Derived navigation tables over an [`OntologyStore`].

Built once by an explicit depth-first traversal from the root:
- **children**: immediate children per structural node; a dual-role node gets its leaf
  facet appended as a terminal child
- **pre-order**: every facet in depth-first order, so the descendant closure of a node is a
  contiguous slice `order[pos + 1..end]`
*/

use ontomap_structures::{NodeIndex, NodeRef, OntologyStore};

#[derive(Debug, Clone)]
pub struct TreeIndex {
    /// Indexed by `NodeIndex`
    children: Vec<Vec<NodeRef>>,
    order: Vec<NodeRef>,
    /// Indexed by `NodeIndex`: pre-order position of the structural facet
    position: Vec<usize>,
    /// Indexed by `NodeIndex`: pre-order position of the leaf facet, dual-role nodes only
    leaf_position: Vec<Option<usize>>,
    /// Indexed by `NodeIndex`: end (exclusive) of the structural subtree in `order`
    subtree_end: Vec<usize>,
    parents: Vec<Option<NodeIndex>>,
}

impl TreeIndex {
    pub fn build(store: &OntologyStore) -> Self {
        let n = store.len();
        let mut children: Vec<Vec<NodeRef>> = vec![Vec::new(); n];
        let mut parents = vec![None; n];
        for (index, node) in store.iter() {
            let slot = &mut children[index.as_usize()];
            slot.extend(store.children(index).iter().map(|c| NodeRef::structural(*c)));
            if node.is_dual_role() {
                slot.push(NodeRef::leaf(index));
            }
            parents[index.as_usize()] = node.parent;
        }

        let mut order = Vec::with_capacity(n + store.dual_role_count());
        let mut position = vec![0; n];
        let mut leaf_position = vec![None; n];
        let mut subtree_end = vec![0; n];

        // (node, children expanded)
        let mut stack = vec![(NodeRef::structural(store.root()), false)];
        while let Some((node, expanded)) = stack.pop() {
            let slot = node.index.as_usize();
            if node.is_leaf_facet() {
                leaf_position[slot] = Some(order.len());
                order.push(node);
                continue;
            }
            if expanded {
                subtree_end[slot] = order.len();
                continue;
            }
            position[slot] = order.len();
            order.push(node);
            stack.push((node, true));
            stack.extend(children[slot].iter().rev().map(|c| (*c, false)));
        }

        TreeIndex {
            children,
            order,
            position,
            leaf_position,
            subtree_end,
            parents,
        }
    }

    /// Immediate children; empty for leaf facets
    pub fn children(&self, node: NodeRef) -> &[NodeRef] {
        if node.is_leaf_facet() {
            return &[];
        }
        &self.children[node.index.as_usize()]
    }

    /// All descendants in pre-order, leaf facets included
    pub fn descendants(&self, node: NodeRef) -> &[NodeRef] {
        if node.is_leaf_facet() {
            return &[];
        }
        let slot = node.index.as_usize();
        &self.order[self.position[slot] + 1..self.subtree_end[slot]]
    }

    /// Tree parent; the parent of a leaf facet is its own structural facet
    pub fn parent(&self, node: NodeRef) -> Option<NodeRef> {
        if node.is_leaf_facet() {
            return Some(NodeRef::structural(node.index));
        }
        self.parents[node.index.as_usize()].map(NodeRef::structural)
    }

    /// Depth-first pre-order position, unique per facet
    pub fn position(&self, node: NodeRef) -> usize {
        let slot = node.index.as_usize();
        if node.is_leaf_facet() {
            self.leaf_position[slot].unwrap_or(self.position[slot])
        } else {
            self.position[slot]
        }
    }

    /// Number of facets (structural nodes plus leaf facets)
    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}
