// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Coarse ancestor remap: every input is replaced by the ancestor its mapping assigns to it
//! and inputs sharing an ancestor are averaged. The tree is not traversed.

use std::collections::BTreeMap;

use ontomap_structures::{lateralize, CoarseMapping, Hemisphere, NodeRef, OntologyStore};

use crate::error::{RemapError, RemapResult};
use crate::result::RegionKey;

/// Input for the coarse path; leaf facets are folded into their base node
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LateralMeasurement {
    pub node: NodeRef,
    pub hemisphere: Hemisphere,
    pub value: f64,
}

/// Fail with `Validation` if any input has no ancestor in `mapping`
pub fn check_coverage(
    store: &OntologyStore,
    mapping: &CoarseMapping,
    entries: &[LateralMeasurement],
) -> RemapResult<()> {
    for entry in entries {
        let node = store.node(entry.node.index);
        if mapping.ancestor_of(node.id).is_none() {
            return Err(RemapError::Validation(format!(
                "mapping '{}' has no ancestor for '{}' (id {})",
                mapping.name(),
                store.acronym_of(entry.node),
                node.id
            )));
        }
    }
    Ok(())
}

/// Mean value per signed ancestor id
pub fn remap_coarse(
    store: &OntologyStore,
    mapping: &CoarseMapping,
    entries: &[LateralMeasurement],
) -> RemapResult<BTreeMap<RegionKey, f64>> {
    let mut groups: BTreeMap<i64, (f64, usize)> = BTreeMap::new();
    for entry in entries {
        let id = store.node(entry.node.index).id;
        let ancestor = mapping.ancestor_of(id).ok_or_else(|| {
            RemapError::Validation(format!(
                "mapping '{}' has no ancestor for id {}",
                mapping.name(),
                id
            ))
        })?;
        let group = groups
            .entry(lateralize(ancestor, entry.hemisphere))
            .or_insert((0.0, 0));
        group.0 += entry.value;
        group.1 += 1;
    }

    let mut out = BTreeMap::new();
    for (signed, (sum, count)) in groups {
        let (acronym, hemisphere) = store.id_to_acronym(signed)?;
        out.insert(RegionKey::new(acronym, hemisphere), sum / count as f64);
    }
    tracing::debug!(
        target: "ontomap-remap",
        mapping = mapping.name(),
        inputs = entries.len(),
        groups = out.len(),
        "coarse remap"
    );
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ontomap_structures::templates::motor_cortex_store;

    fn entry(
        store: &OntologyStore,
        acronym: &str,
        hemisphere: Hemisphere,
        value: f64,
    ) -> LateralMeasurement {
        LateralMeasurement {
            node: store.resolve_acronym(acronym).unwrap(),
            hemisphere,
            value,
        }
    }

    #[test]
    fn test_layers_collapse_into_area() {
        let store = motor_cortex_store().unwrap();
        let beryl = store.coarse_mapping("beryl").unwrap();
        let entries = vec![
            entry(&store, "MOs", Hemisphere::Left, 1.0),
            entry(&store, "MOp5", Hemisphere::Left, 2.0),
            entry(&store, "MOp1", Hemisphere::Left, 3.0),
        ];
        let out = remap_coarse(&store, beryl, &entries).unwrap();
        assert_eq!(out.len(), 2);
        assert_eq!(out[&RegionKey::new("MOp", Hemisphere::Left)], 2.5);
        assert_eq!(out[&RegionKey::new("MOs", Hemisphere::Left)], 1.0);
    }

    #[test]
    fn test_hemispheres_are_grouped_separately() {
        let store = motor_cortex_store().unwrap();
        let cosmos = store.coarse_mapping("cosmos").unwrap();
        let entries = vec![
            entry(&store, "MOp5", Hemisphere::Left, 2.0),
            entry(&store, "SSp-n1", Hemisphere::Left, 4.0),
            entry(&store, "MOp5", Hemisphere::Right, 10.0),
        ];
        let out = remap_coarse(&store, cosmos, &entries).unwrap();
        assert_eq!(out[&RegionKey::new("Isocortex", Hemisphere::Left)], 3.0);
        assert_eq!(out[&RegionKey::new("Isocortex", Hemisphere::Right)], 10.0);
    }

    #[test]
    fn test_leaf_facet_uses_base_node() {
        let store = motor_cortex_store().unwrap();
        let beryl = store.coarse_mapping("beryl").unwrap();
        let entries = vec![entry(&store, "HY-un", Hemisphere::Right, 6.0)];
        let out = remap_coarse(&store, beryl, &entries).unwrap();
        assert_eq!(out[&RegionKey::new("HY", Hemisphere::Right)], 6.0);
    }

    #[test]
    fn test_missing_ancestor_is_validation_error() {
        let mut tables = ontomap_structures::templates::load_motor_cortex_reference().unwrap();
        tables.coarse[0].ancestor_remap.remove(&648);
        let store = OntologyStore::load(tables).unwrap();
        let beryl = store.coarse_mapping("beryl").unwrap();
        let entries = vec![entry(&store, "MOp5", Hemisphere::Left, 2.0)];
        assert!(matches!(
            check_coverage(&store, beryl, &entries),
            Err(RemapError::Validation(_))
        ));
        assert!(remap_coarse(&store, beryl, &entries).is_err());
    }
}
