// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*!
Tree aggregation for a single mapping view.

1. **Working subtree**: from each input (or its entry redirect) take the descendant closure
   restricted to the view's members; a leaf facet joins only when it was itself supplied
2. **Bottom-up**: explicit post-order; a direct value wins, otherwise the mean of resolved
   children, otherwise unresolved
3. **Top-down**: unresolved nodes inherit from their parent inside the working subtree
*/

use ahash::{AHashMap, AHashSet};
use std::collections::BTreeMap;

use ontomap_structures::{MappingView, NodeRef, OntologyStore};

use crate::atlas::Atlas;
use crate::error::{RemapError, RemapResult};

/// One input value after identity resolution
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Measurement {
    pub node: NodeRef,
    pub value: f64,
}

/// Resolved values for every node of one view's working subtree
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ViewClosure {
    values: BTreeMap<NodeRef, f64>,
}

impl ViewClosure {
    pub fn contains(&self, node: NodeRef) -> bool {
        self.values.contains_key(&node)
    }

    pub fn iter(&self) -> impl Iterator<Item = (NodeRef, f64)> + '_ {
        self.values.iter().map(|(node, value)| (*node, *value))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Stable sort, root-most first; leaf facets count one level below their twin
pub fn sort_by_effective_level(store: &OntologyStore, entries: &mut [Measurement]) {
    entries.sort_by_key(|entry| store.node(entry.node.index).effective_level(entry.node.facet));
}

/// Aggregate `entries` (already level-sorted) through one view
pub fn aggregate_view(
    atlas: &Atlas,
    view: &MappingView,
    entries: &[Measurement],
) -> RemapResult<ViewClosure> {
    let index = atlas.index();
    let direct: AHashMap<NodeRef, f64> = entries.iter().map(|e| (e.node, e.value)).collect();

    let working = working_subtree(atlas, view, entries, &direct);
    if working.is_empty() {
        return Ok(ViewClosure::default());
    }

    let mut tops: Vec<NodeRef> = working
        .iter()
        .filter(|node| !index.parent(**node).is_some_and(|p| working.contains(&p)))
        .copied()
        .collect();
    tops.sort_by_key(|node| index.position(*node));

    let mut post_order = Vec::with_capacity(working.len());
    for top in tops {
        let mut stack = vec![(top, false)];
        while let Some((node, expanded)) = stack.pop() {
            if expanded {
                post_order.push(node);
                continue;
            }
            stack.push((node, true));
            for child in index.children(node).iter().rev() {
                if working.contains(child) {
                    stack.push((*child, false));
                }
            }
        }
    }

    let mut resolved: AHashMap<NodeRef, f64> = AHashMap::with_capacity(working.len());
    for node in &post_order {
        if let Some(value) = direct.get(node) {
            resolved.insert(*node, *value);
            continue;
        }
        let (sum, count) = index
            .children(*node)
            .iter()
            .filter_map(|child| resolved.get(child))
            .fold((0.0, 0usize), |(sum, count), value| (sum + value, count + 1));
        if count > 0 {
            resolved.insert(*node, sum / count as f64);
        }
    }

    // Reverse post-order visits every parent before its children
    for node in post_order.iter().rev() {
        if resolved.contains_key(node) {
            continue;
        }
        let inherited = index
            .parent(*node)
            .filter(|parent| working.contains(parent))
            .and_then(|parent| resolved.get(&parent).copied());
        match inherited {
            Some(value) => {
                resolved.insert(*node, value);
            }
            None => {
                return Err(RemapError::MissingAggregation {
                    view: view.name().to_string(),
                    region: atlas.store().acronym_of(*node).to_string(),
                })
            }
        }
    }

    tracing::debug!(
        target: "ontomap-remap",
        view = view.name(),
        inputs = entries.len(),
        working = working.len(),
        "aggregated view"
    );

    Ok(ViewClosure {
        values: resolved.into_iter().collect(),
    })
}

/// Union over all inputs of the start node and its view-member descendants
fn working_subtree(
    atlas: &Atlas,
    view: &MappingView,
    entries: &[Measurement],
    direct: &AHashMap<NodeRef, f64>,
) -> AHashSet<NodeRef> {
    let index = atlas.index();
    let mut working = AHashSet::new();
    for entry in entries {
        if !view.contains_ref(entry.node) {
            continue;
        }
        let start = if entry.node.is_leaf_facet() {
            entry.node
        } else {
            NodeRef::structural(view.entry_for(entry.node.index))
        };
        if !working.insert(start) {
            continue;
        }
        working.extend(index.descendants(start).iter().copied().filter(|node| {
            view.contains(node.index) && (!node.is_leaf_facet() || direct.contains_key(node))
        }));
    }
    working
}
