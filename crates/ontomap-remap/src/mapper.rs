// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*!
RegionMapper - entry point of the remap engine.

## Call flow

1. Validate shapes, identity form, hemisphere, values and coarse coverage
2. Split into a left and a right batch (signed ids carry the hemisphere in their sign);
   a region repeated within a batch enters the tree once, with the mean of its values
3. Per batch and hierarchical mapping: aggregate every view, merge (primary wins), filter
4. Per coarse mapping: group all inputs by signed ancestor id

Nothing is aggregated until every check has passed.
*/

use serde::{Deserialize, Serialize};
use std::collections::btree_map::Entry;
use std::collections::BTreeMap;
use std::sync::Arc;

use ontomap_structures::{Hemisphere, HierarchicalMapping, NodeRef, OntologyStore};

use crate::aggregation::{aggregate_view, sort_by_effective_level, Measurement, ViewClosure};
use crate::atlas::Atlas;
use crate::coarse::{check_coverage, remap_coarse, LateralMeasurement};
use crate::error::{RemapError, RemapResult};
use crate::result::{MappingKind, MappingResult, RegionKey, RemapOutput, ViewConflict};

/// Caller-supplied region identity
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RegionIdentity {
    /// Structural or dual-role partner acronym; needs an explicit hemisphere
    Acronym(String),
    /// Signed id, negative = left
    Id(i64),
}

impl From<&str> for RegionIdentity {
    fn from(acronym: &str) -> Self {
        RegionIdentity::Acronym(acronym.to_string())
    }
}

impl From<String> for RegionIdentity {
    fn from(acronym: String) -> Self {
        RegionIdentity::Acronym(acronym)
    }
}

impl From<i64> for RegionIdentity {
    fn from(id: i64) -> Self {
        RegionIdentity::Id(id)
    }
}

/// Tunables for one mapper
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RemapOptions {
    /// Views whose values differ by more than this are reported as conflicting
    pub conflict_tolerance: f64,
    pub record_conflicts: bool,
}

impl Default for RemapOptions {
    fn default() -> Self {
        Self {
            conflict_tolerance: 1e-9,
            record_conflicts: true,
        }
    }
}

#[derive(Debug, Clone)]
pub struct RegionMapper {
    atlas: Arc<Atlas>,
    options: RemapOptions,
}

impl RegionMapper {
    pub fn new(atlas: Arc<Atlas>, options: RemapOptions) -> Self {
        Self { atlas, options }
    }

    pub fn atlas(&self) -> &Arc<Atlas> {
        &self.atlas
    }

    pub fn options(&self) -> RemapOptions {
        self.options
    }

    /// Aggregate `values` attached to `identities` into every mapping of the atlas.
    ///
    /// `hemisphere` is required for acronym-form identities and ignored for signed ids.
    ///
    /// # Errors
    ///
    /// - `InvalidInput`: empty or mismatched inputs, mixed identity forms, missing
    ///   hemisphere, non-finite values
    /// - `UnknownNode`: an identity resolves to no node or partner
    /// - `Validation`: a coarse mapping has no ancestor for an input
    /// - `MissingAggregation`: the reference data left a node without any value
    pub fn remap(
        &self,
        identities: &[RegionIdentity],
        values: &[f64],
        hemisphere: Option<Hemisphere>,
    ) -> RemapResult<RemapOutput> {
        let store = self.atlas.store();
        let inputs = self.resolve_inputs(identities, values, hemisphere)?;

        for mapping in store.coarse_mappings() {
            check_coverage(store, mapping, &inputs)?;
        }

        let mut output = RemapOutput::default();
        for mapping in store.hierarchical_mappings() {
            output.mappings.insert(
                mapping.name().to_string(),
                MappingResult::new(MappingKind::Hierarchical),
            );
        }

        for batch_hemisphere in [Hemisphere::Left, Hemisphere::Right] {
            let mut batch = mean_per_node(
                inputs
                    .iter()
                    .filter(|input| input.hemisphere == batch_hemisphere),
            );
            if batch.is_empty() {
                continue;
            }
            sort_by_effective_level(store, &mut batch);

            for mapping in store.hierarchical_mappings() {
                let (result, conflicts) =
                    self.remap_hierarchical(mapping, &batch, batch_hemisphere)?;
                if let Some(slot) = output.mappings.get_mut(mapping.name()) {
                    slot.closure.extend(result.closure);
                    slot.filtered.extend(result.filtered);
                }
                output.conflicts.extend(conflicts);
            }
        }

        for mapping in store.coarse_mappings() {
            let values = remap_coarse(store, mapping, &inputs)?;
            output.mappings.insert(
                mapping.name().to_string(),
                MappingResult {
                    kind: MappingKind::Coarse,
                    closure: values.clone(),
                    filtered: values,
                },
            );
        }

        tracing::debug!(
            target: "ontomap-remap",
            inputs = inputs.len(),
            mappings = output.mappings.len(),
            conflicts = output.conflicts.len(),
            "remap complete"
        );
        Ok(output)
    }

    fn resolve_inputs(
        &self,
        identities: &[RegionIdentity],
        values: &[f64],
        hemisphere: Option<Hemisphere>,
    ) -> RemapResult<Vec<LateralMeasurement>> {
        if identities.is_empty() {
            return Err(RemapError::InvalidInput("no identities supplied".to_string()));
        }
        if identities.len() != values.len() {
            return Err(RemapError::InvalidInput(format!(
                "{} identities but {} values",
                identities.len(),
                values.len()
            )));
        }
        let acronym_form = matches!(identities[0], RegionIdentity::Acronym(_));
        if identities
            .iter()
            .any(|identity| matches!(identity, RegionIdentity::Acronym(_)) != acronym_form)
        {
            return Err(RemapError::InvalidInput(
                "identities mix acronyms and signed ids".to_string(),
            ));
        }
        if acronym_form && hemisphere.is_none() {
            return Err(RemapError::InvalidInput(
                "a hemisphere is required for acronym identities".to_string(),
            ));
        }
        if let Some(position) = values.iter().position(|value| !value.is_finite()) {
            return Err(RemapError::InvalidInput(format!(
                "value at position {} is not finite",
                position
            )));
        }

        let store = self.atlas.store();
        let mut inputs = Vec::with_capacity(identities.len());
        let mut dropped = 0usize;
        for (identity, value) in identities.iter().zip(values) {
            let resolved = match identity {
                RegionIdentity::Acronym(acronym) if store.is_placeholder_acronym(acronym) => None,
                RegionIdentity::Id(id) if store.is_placeholder_id(*id) => None,
                RegionIdentity::Acronym(acronym) => {
                    let node = store.resolve_acronym(acronym)?;
                    // acronym_form implies a hemisphere was checked above
                    hemisphere.map(|h| (node, h))
                }
                RegionIdentity::Id(id) => Some(store.resolve_signed_id(*id)?),
            };
            let Some((node, side)) = resolved else {
                dropped += 1;
                continue;
            };
            inputs.push(LateralMeasurement {
                node,
                hemisphere: side,
                value: *value,
            });
        }
        if dropped > 0 {
            tracing::warn!(
                target: "ontomap-remap",
                dropped,
                "dropped placeholder identities from input"
            );
        }
        Ok(inputs)
    }

    fn remap_hierarchical(
        &self,
        mapping: &HierarchicalMapping,
        batch: &[Measurement],
        hemisphere: Hemisphere,
    ) -> RemapResult<(MappingResult, Vec<ViewConflict>)> {
        let store = self.atlas.store();
        let closures = mapping
            .views()
            .iter()
            .map(|view| aggregate_view(&self.atlas, view, batch))
            .collect::<RemapResult<Vec<ViewClosure>>>()?;

        // node -> (value, index of the view that supplied it)
        let mut merged: BTreeMap<NodeRef, (f64, usize)> = BTreeMap::new();
        let mut conflicts = Vec::new();
        for (view_index, closure) in closures.iter().enumerate() {
            if closure.is_empty() {
                continue;
            }
            tracing::debug!(
                target: "ontomap-remap",
                mapping = mapping.name(),
                view = mapping.views()[view_index].name(),
                nodes = closure.len(),
                "merging view closure"
            );
            for (node, value) in closure.iter() {
                let (kept, kept_view) = match merged.entry(node) {
                    Entry::Vacant(slot) => {
                        slot.insert((value, view_index));
                        continue;
                    }
                    Entry::Occupied(slot) => *slot.get(),
                };
                if (kept - value).abs() <= self.options.conflict_tolerance {
                    continue;
                }
                let region = RegionKey::new(store.acronym_of(node), hemisphere);
                tracing::warn!(
                    target: "ontomap-remap",
                    mapping = mapping.name(),
                    region = %region,
                    kept,
                    discarded = value,
                    "views disagree"
                );
                if self.options.record_conflicts {
                    conflicts.push(ViewConflict {
                        mapping: mapping.name().to_string(),
                        region,
                        primary_view: mapping.views()[kept_view].name().to_string(),
                        primary_value: kept,
                        other_view: mapping.views()[view_index].name().to_string(),
                        other_value: value,
                    });
                }
            }
        }

        let mut result = MappingResult::new(MappingKind::Hierarchical);
        for (node, (value, _)) in &merged {
            let key = RegionKey::new(store.acronym_of(*node), hemisphere);
            result.closure.insert(key, *value);
        }
        filter_representable(store, mapping, &closures, &merged, hemisphere, &mut result);
        Ok((result, conflicts))
    }
}

/// One measurement per node; a repeated node carries the mean of its values
fn mean_per_node<'a>(inputs: impl Iterator<Item = &'a LateralMeasurement>) -> Vec<Measurement> {
    let mut groups: BTreeMap<NodeRef, (f64, usize)> = BTreeMap::new();
    for input in inputs {
        let group = groups.entry(input.node).or_insert((0.0, 0));
        group.0 += input.value;
        group.1 += 1;
    }
    groups
        .into_iter()
        .map(|(node, (sum, count))| Measurement {
            node,
            value: sum / count as f64,
        })
        .collect()
}

/// Keep nodes representable in a view whose closure holds them; resolved leaf facets
/// override their structural twin
fn filter_representable(
    store: &OntologyStore,
    mapping: &HierarchicalMapping,
    closures: &[ViewClosure],
    merged: &BTreeMap<NodeRef, (f64, usize)>,
    hemisphere: Hemisphere,
    result: &mut MappingResult,
) {
    for (node, (value, _)) in merged {
        if node.is_leaf_facet() {
            continue;
        }
        let shown = mapping
            .views()
            .iter()
            .zip(closures)
            .any(|(view, closure)| closure.contains(*node) && view.is_representable(node.index));
        if shown {
            result
                .filtered
                .insert(RegionKey::new(store.acronym_of(*node), hemisphere), *value);
        }
    }
    for (node, (value, _)) in merged {
        if node.is_leaf_facet() {
            let structural = NodeRef::structural(node.index);
            result
                .filtered
                .insert(RegionKey::new(store.acronym_of(structural), hemisphere), *value);
        }
    }
}
