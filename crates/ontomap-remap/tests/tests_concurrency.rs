// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Concurrent remap calls against a shared, swappable atlas

use std::sync::Arc;
use std::thread;

use ontomap_remap::{Atlas, AtlasHandle, RegionIdentity, RegionKey, RegionMapper, RemapOptions};
use ontomap_structures::templates::{load_motor_cortex_reference, motor_cortex_store};
use ontomap_structures::Hemisphere;

fn scenario_inputs() -> (Vec<RegionIdentity>, Vec<f64>) {
    (
        vec!["MO".into(), "MOp5".into(), "MOp1".into()],
        vec![1.0, 2.0, 3.0],
    )
}

#[test]
fn test_parallel_calls_share_one_atlas() {
    let atlas = Arc::new(Atlas::new(motor_cortex_store().unwrap()));
    let (identities, values) = scenario_inputs();
    let expected = RegionMapper::new(Arc::clone(&atlas), RemapOptions::default())
        .remap(&identities, &values, Some(Hemisphere::Left))
        .unwrap();

    thread::scope(|scope| {
        for _ in 0..8 {
            let atlas = Arc::clone(&atlas);
            let identities = identities.clone();
            let values = values.clone();
            let expected = &expected;
            scope.spawn(move || {
                let mapper = RegionMapper::new(atlas, RemapOptions::default());
                for _ in 0..25 {
                    let output = mapper
                        .remap(&identities, &values, Some(Hemisphere::Left))
                        .unwrap();
                    assert_eq!(&output, expected);
                }
            });
        }
    });
}

#[test]
fn test_swap_while_reading() {
    let handle = Arc::new(AtlasHandle::new(Atlas::new(motor_cortex_store().unwrap())));
    let (identities, values) = scenario_inputs();

    thread::scope(|scope| {
        for _ in 0..4 {
            let handle = Arc::clone(&handle);
            let identities = identities.clone();
            let values = values.clone();
            scope.spawn(move || {
                for _ in 0..50 {
                    let mapper = RegionMapper::new(handle.snapshot(), RemapOptions::default());
                    let output = mapper
                        .remap(&identities, &values, Some(Hemisphere::Left))
                        .unwrap();
                    let allen = output.mapping("allen").unwrap();
                    assert_eq!(allen.closure[&RegionKey::new("MOp", Hemisphere::Left)], 2.5);
                }
            });
        }

        let handle = Arc::clone(&handle);
        scope.spawn(move || {
            for round in 0..10 {
                let mut tables = load_motor_cortex_reference().unwrap();
                tables.version = format!("round-{}", round);
                handle.swap(Atlas::from_tables(tables).unwrap());
            }
        });
    });

    assert_eq!(handle.snapshot().store().version(), "round-9");
}
