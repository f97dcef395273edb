// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! End-to-end remap behaviour against the embedded motor cortex reference.

use std::collections::BTreeMap;
use std::sync::Arc;

use ontomap::prelude::*;
use ontomap::structures::templates::{load_motor_cortex_reference, motor_cortex_store};

fn mapper() -> RegionMapper {
    RegionMapper::new(
        Arc::new(Atlas::new(motor_cortex_store().unwrap())),
        RemapOptions::default(),
    )
}

fn remap_left(pairs: &[(&str, f64)]) -> RemapOutput {
    let identities: Vec<RegionIdentity> = pairs.iter().map(|(a, _)| (*a).into()).collect();
    let values: Vec<f64> = pairs.iter().map(|(_, v)| *v).collect();
    mapper()
        .remap(&identities, &values, Some(Hemisphere::Left))
        .unwrap()
}

fn left(acronym: &str) -> RegionKey {
    RegionKey::new(acronym, Hemisphere::Left)
}

fn as_map(pairs: &[(&str, f64)]) -> BTreeMap<RegionKey, f64> {
    pairs.iter().map(|(a, v)| (left(a), *v)).collect()
}

mod test_hierarchical {
    use super::*;

    #[test]
    fn test_isolated_leaves_pass_through() {
        let output = remap_left(&[("MOp1", 1.0), ("MOs5", 2.0)]);
        let allen = output.mapping("allen").unwrap();
        let expected = as_map(&[("MOp1", 1.0), ("MOs5", 2.0)]);
        assert_eq!(allen.kind, MappingKind::Hierarchical);
        assert_eq!(allen.closure, expected);
        assert_eq!(allen.filtered, expected);
        assert!(output.conflicts.is_empty());
    }

    #[test]
    fn test_parent_value_with_two_children() {
        let output = remap_left(&[("MO", 1.0), ("MOp5", 2.0), ("MOp1", 3.0)]);
        let allen = output.mapping("allen").unwrap();

        assert_eq!(allen.closure[&left("MO")], 1.0);
        assert_eq!(allen.closure[&left("MOp")], 2.5);
        for layer in ["MOp2/3", "MOp6a", "MOp6b"] {
            assert_eq!(allen.closure[&left(layer)], 2.5, "{}", layer);
        }
        for region in ["MOs", "MOs1", "MOs2/3", "MOs5", "MOs6a", "MOs6b"] {
            assert_eq!(allen.closure[&left(region)], 1.0, "{}", region);
        }
        assert!(!allen.closure.contains_key(&left("Isocortex")));
        assert!(!allen.closure.contains_key(&left("MO-un")));

        assert!(!allen.filtered.contains_key(&left("MO")));
        assert_eq!(allen.filtered[&left("MOp")], 2.5);
        assert_eq!(allen.filtered[&left("MOs")], 1.0);
        assert_eq!(allen.filtered[&left("MOp1")], 3.0);
    }

    #[test]
    fn test_region_outside_primary_subtree_comes_from_alternate_view() {
        let output = remap_left(&[("HY", 1.0), ("HY-un", 2.0)]);
        let allen = output.mapping("allen").unwrap();

        assert_eq!(allen.closure[&left("HY")], 1.0);
        assert_eq!(allen.closure[&left("HY-un")], 2.0);
        assert_eq!(allen.closure[&left("LZ")], 1.0);
        assert_eq!(allen.closure[&left("MEZ")], 1.0);

        assert_eq!(allen.filtered[&left("HY")], 2.0);
        assert_eq!(allen.filtered[&left("LZ")], 1.0);
        assert!(!allen.filtered.contains_key(&left("HY-un")));
    }

    #[test]
    fn test_structural_children_and_twin_all_supplied() {
        let output = remap_left(&[("MO", 5.0), ("MOp", 1.0), ("MOs", 3.0), ("MO-un", 9.0)]);
        let allen = output.mapping("allen").unwrap();

        assert_eq!(allen.closure[&left("MO")], 5.0);
        assert_eq!(allen.closure[&left("MO-un")], 9.0);
        assert_eq!(allen.closure[&left("MOp5")], 1.0);
        assert_eq!(allen.closure[&left("MOs5")], 3.0);

        assert_eq!(allen.filtered[&left("MO")], 9.0);
        assert_eq!(allen.filtered[&left("MOp")], 1.0);
        assert_eq!(allen.filtered[&left("MOs")], 3.0);
    }

    #[test]
    fn test_twin_wins_over_representable_base() {
        let mut tables = load_motor_cortex_reference().unwrap();
        for view in &mut tables.hierarchical[0].views {
            view.representable.push("MO".to_string());
        }
        let mapper = RegionMapper::new(
            Arc::new(Atlas::from_tables(tables).unwrap()),
            RemapOptions::default(),
        );
        let output = mapper
            .remap(
                &["MO".into(), "MO-un".into(), "MOp".into()],
                &[1.0, 8.0, 2.0],
                Some(Hemisphere::Left),
            )
            .unwrap();
        let allen = output.mapping("allen").unwrap();
        assert_eq!(allen.closure[&left("MO")], 1.0);
        assert_eq!(allen.closure[&left("MO-un")], 8.0);
        assert_eq!(allen.filtered[&left("MO")], 8.0);
        assert_eq!(allen.filtered[&left("MOs")], 1.0);

        // Without the twin the representable base shows its own value
        let output = mapper
            .remap(&["MO".into(), "MOp".into()], &[1.0, 2.0], Some(Hemisphere::Left))
            .unwrap();
        assert_eq!(output.mapping("allen").unwrap().filtered[&left("MO")], 1.0);
    }

    #[test]
    fn test_twin_alone_starts_at_its_own_facet() {
        let output = remap_left(&[("MO-un", 4.0), ("MOp", 2.0)]);
        let allen = output.mapping("allen").unwrap();
        assert_eq!(allen.closure[&left("MO-un")], 4.0);
        assert_eq!(allen.closure[&left("MOp5")], 2.0);
        assert!(!allen.closure.contains_key(&left("MO")));
        assert!(!allen.closure.contains_key(&left("MOs")));
        assert_eq!(allen.filtered[&left("MO")], 4.0);
    }

    #[test]
    fn test_entry_redirect_starts_navigation_at_target() {
        let output = remap_left(&[("SSp-n1", 6.0)]);
        let allen = output.mapping("allen").unwrap();

        assert_eq!(allen.closure[&left("SSp-n1")], 6.0);
        assert_eq!(allen.closure[&left("SSp-n")], 6.0);
        assert_eq!(allen.closure[&left("SSp-n4")], 6.0);
        assert_eq!(allen.filtered[&left("SSp-n")], 6.0);
        assert_eq!(allen.filtered[&left("SSp-n1")], 6.0);
        assert!(!allen.filtered.contains_key(&left("SSp-n4")));
    }

    #[test]
    fn test_filtered_entries_are_representable_or_twins() {
        let store = motor_cortex_store().unwrap();
        let output = remap_left(&[
            ("root", 0.5),
            ("MO", 1.0),
            ("MOp5", 2.0),
            ("HY-un", 3.0),
            ("SSp-n4", 4.0),
            ("FRP1", 5.0),
        ]);
        let mapping = store.hierarchical_mapping("allen").unwrap();
        let allen = output.mapping("allen").unwrap();
        for (key, value) in &allen.filtered {
            let node = store.resolve_acronym(&key.acronym).unwrap();
            assert!(!node.is_leaf_facet(), "{}", key);
            let twin_supplied = store
                .node(node.index)
                .dual_role_partner
                .as_deref()
                .is_some_and(|partner| allen.closure.contains_key(&left(partner)));
            if twin_supplied {
                let partner = store.node(node.index).dual_role_partner.clone().unwrap();
                assert_eq!(*value, allen.closure[&left(&partner)]);
            } else {
                assert!(mapping.is_representable(node.index), "{}", key);
                assert_eq!(*value, allen.closure[key]);
            }
        }
    }

    #[test]
    fn test_hemispheres_from_signed_ids_stay_apart() {
        let output = mapper()
            .remap(&[RegionIdentity::Id(-985), RegionIdentity::Id(985)], &[1.0, 4.0], None)
            .unwrap();
        let allen = output.mapping("allen").unwrap();
        assert_eq!(allen.closure[&left("MOp")], 1.0);
        assert_eq!(allen.closure[&RegionKey::new("MOp", Hemisphere::Right)], 4.0);
        assert_eq!(allen.closure[&RegionKey::new("MOp5", Hemisphere::Right)], 4.0);
    }
}

mod test_coarse {
    use super::*;

    #[test]
    fn test_layers_average_into_area() {
        let output = remap_left(&[("MOs", 1.0), ("MOp5", 2.0), ("MOp1", 3.0)]);
        let beryl = output.mapping("beryl").unwrap();
        assert_eq!(beryl.kind, MappingKind::Coarse);
        assert_eq!(beryl.filtered, as_map(&[("MOp", 2.5), ("MOs", 1.0)]));
        assert_eq!(beryl.closure, beryl.filtered);

        let cosmos = output.mapping("cosmos").unwrap();
        assert_eq!(cosmos.filtered, as_map(&[("Isocortex", 2.0)]));
    }

    #[test]
    fn test_twin_and_structural_share_an_ancestor() {
        let output = remap_left(&[("HY", 1.0), ("HY-un", 2.0)]);
        assert_eq!(output.mapping("beryl").unwrap().filtered, as_map(&[("HY", 1.5)]));
    }
}

mod test_edge_cases {
    use super::*;

    #[test]
    fn test_only_placeholders_give_empty_results() {
        let output = mapper()
            .remap(&["void".into()], &[1.0], Some(Hemisphere::Right))
            .unwrap();
        assert_eq!(output.mappings.len(), 3);
        assert!(output.mappings.values().all(|m| m.closure.is_empty() && m.filtered.is_empty()));
    }

    #[test]
    fn test_validation_errors_leave_no_output() {
        let mapper = mapper();
        assert!(matches!(
            mapper.remap(&["MOp".into(), "MOs".into()], &[1.0, 2.0], None),
            Err(RemapError::InvalidInput(_))
        ));
        assert!(matches!(
            mapper.remap(
                &["MOp".into(), RegionIdentity::Id(985)],
                &[1.0, 2.0],
                Some(Hemisphere::Left)
            ),
            Err(RemapError::InvalidInput(_))
        ));
        assert!(matches!(
            mapper.remap(&[RegionIdentity::Id(123456)], &[1.0], None),
            Err(RemapError::UnknownNode(_))
        ));
    }
}

mod test_properties {
    use super::*;
    use proptest::prelude::*;

    const POOL: &[&str] = &[
        "root", "Isocortex", "MO", "MO-un", "MOp", "MOs", "MOp1", "MOp5", "MOs5", "SSp-n",
        "SSp-n1", "SSp-n4", "FRP", "FRP1", "HY", "HY-un", "LZ",
    ];

    // Integer-valued inputs keep coarse means exact regardless of summation order
    fn arb_inputs() -> impl Strategy<Value = Vec<(&'static str, f64)>> {
        proptest::sample::subsequence(POOL.to_vec(), 1..=8).prop_flat_map(|acronyms| {
            let len = acronyms.len();
            prop::collection::vec(0u8..100, len).prop_map(move |values| {
                acronyms
                    .iter()
                    .copied()
                    .zip(values.into_iter().map(f64::from))
                    .collect()
            })
        })
    }

    fn arb_permuted_inputs(
    ) -> impl Strategy<Value = (Vec<(&'static str, f64)>, Vec<(&'static str, f64)>)> {
        arb_inputs().prop_flat_map(|pairs| (Just(pairs.clone()), Just(pairs).prop_shuffle()))
    }

    proptest! {
        #[test]
        fn repeated_calls_are_identical(pairs in arb_inputs()) {
            prop_assert_eq!(remap_left(&pairs), remap_left(&pairs));
        }

        #[test]
        fn input_order_does_not_change_output((pairs, shuffled) in arb_permuted_inputs()) {
            prop_assert_eq!(remap_left(&pairs), remap_left(&shuffled));
        }

        #[test]
        fn leaf_facets_never_reach_filtered_output(pairs in arb_inputs()) {
            let output = remap_left(&pairs);
            let allen = output.mapping("allen").unwrap();
            prop_assert!(!allen.filtered.keys().any(|k| k.acronym.ends_with("-un")));
        }
    }
}
