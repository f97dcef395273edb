// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # ontomap - hierarchical ontology value remapping
//!
//! Takes sparse per-region values (one number per brain region, for one hemisphere) and
//! aggregates them through the region hierarchy of a reference atlas into every mapping the
//! atlas defines: tree-propagated hierarchical mappings and flat coarse ancestor mappings.
//!
//! ## Quick Start
//!
//! ```toml
//! [dependencies]
//! ontomap = "0.1"
//! ```
//!
//! ```rust
//! use ontomap::prelude::*;
//!
//! let engine = RemapEngine::from_config(&OntomapConfig::default())?;
//! let output = engine.remap(
//!     &["MOs".into(), "MOp5".into(), "MOp1".into()],
//!     &[1.0, 2.0, 3.0],
//!     Some(Hemisphere::Left),
//! )?;
//! let beryl = output.mapping("beryl").unwrap();
//! assert_eq!(beryl.filtered[&RegionKey::new("MOp", Hemisphere::Left)], 2.5);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Feature Flags
//!
//! - **`file-logging`**: rolling per-crate log files through `tracing-appender`
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │  Foundation: ontomap-structures, ontomap-config         │
//! │  (Node arena, reference tables, codec, TOML config)     │
//! └─────────────────────────────────────────────────────────┘
//!                         ↓
//! ┌─────────────────────────────────────────────────────────┐
//! │  Algorithms: ontomap-remap                              │
//! │  (Tree index, view aggregation, merge, coarse remap)    │
//! └─────────────────────────────────────────────────────────┘
//!                         ↓
//! ┌─────────────────────────────────────────────────────────┐
//! │  Wiring: ontomap (RemapEngine)                          │
//! │  (Config -> atlas -> mapper, atomic reference reload)   │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! `ontomap-observability` sits beside all of them and only installs the logging stack.
//!
//! ## License
//!
//! Apache-2.0

pub mod engine;

// Re-export foundation
pub use ontomap_config as config;
pub use ontomap_structures as structures;

// Re-export algorithms
pub use ontomap_remap as remap;

// Re-export infrastructure
pub use ontomap_observability as observability;

pub use engine::{init_observability, EngineError, EngineResult, RemapEngine};

/// Prelude - commonly used types
pub mod prelude {
    pub use crate::config::{load_config, OntomapConfig};
    pub use crate::engine::{EngineError, RemapEngine};
    pub use crate::remap::{
        Atlas, FeatureRecord, MappingKind, MappingResult, RegionIdentity, RegionKey,
        RegionMapper, RemapError, RemapOptions, RemapOutput, ViewConflict,
    };
    pub use crate::structures::{Hemisphere, OntologyError, OntologyStore};
}
