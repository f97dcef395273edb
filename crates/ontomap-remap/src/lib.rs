// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*!
# ontomap-remap

Aggregates sparse values attached to ontology regions into every mapping of an atlas.

- **Hierarchical mappings**: closure over the working subtree of each view (bottom-up mean,
  top-down inheritance), views merged with the primary view winning, then filtered to
  representable regions with dual-role substitution
- **Coarse mappings**: inputs grouped by their assigned ancestor and averaged

```
use std::sync::Arc;
use ontomap_remap::{Atlas, RegionIdentity, RegionMapper, RemapOptions};
use ontomap_structures::{templates, Hemisphere};

let atlas = Arc::new(Atlas::new(templates::motor_cortex_store().unwrap()));
let mapper = RegionMapper::new(atlas, RemapOptions::default());
let output = mapper
    .remap(
        &[RegionIdentity::from("MOp5"), RegionIdentity::from("MOp1")],
        &[2.0, 3.0],
        Some(Hemisphere::Left),
    )
    .unwrap();
let beryl = output.mapping("beryl").unwrap();
assert_eq!(beryl.filtered.values().copied().collect::<Vec<_>>(), vec![2.5]);
```
*/

pub mod aggregation;
pub mod atlas;
pub mod coarse;
mod error;
pub mod mapper;
pub mod result;
pub mod tree_index;

pub use atlas::{Atlas, AtlasHandle};
pub use error::{RemapError, RemapResult};
pub use mapper::{RegionIdentity, RegionMapper, RemapOptions};
pub use result::{
    FeatureRecord, MappingFeature, MappingKind, MappingResult, RegionKey, RemapOutput,
    ViewConflict,
};
pub use tree_index::TreeIndex;
