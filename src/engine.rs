// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Wiring from configuration to a running mapper.
//!
//! [`RemapEngine`] owns the swappable atlas and the remap options taken from an
//! [`OntomapConfig`]. Every call works on one atlas snapshot, so a concurrent
//! [`RemapEngine::reload`] never mixes two reference versions inside a single result.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::anyhow;
use thiserror::Error;
use tracing::info;

use ontomap_config::{validate_config, ConfigError, OntomapConfig};
use ontomap_observability::{
    init_logging, CrateDebugFlags, LogFormat, LoggingConfig, LoggingGuard,
};
use ontomap_remap::{
    Atlas, AtlasHandle, FeatureRecord, RegionIdentity, RegionMapper, RemapError, RemapOptions,
    RemapOutput, RemapResult,
};
use ontomap_structures::templates::motor_cortex_store;
use ontomap_structures::{Hemisphere, OntologyError};

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("reference error: {0}")]
    Ontology(#[from] OntologyError),

    #[error(transparent)]
    Remap(#[from] RemapError),
}

pub type EngineResult<T> = Result<T, EngineError>;

#[derive(Debug)]
pub struct RemapEngine {
    atlas: AtlasHandle,
    options: RemapOptions,
    reference_path: Option<PathBuf>,
}

impl RemapEngine {
    /// Validate `config` and load the reference it points at (embedded template when unset)
    pub fn from_config(config: &OntomapConfig) -> EngineResult<Self> {
        validate_config(config)?;
        let reference_path = config.reference.path.clone();
        let atlas = load_atlas(reference_path.as_deref())?;
        info!(
            target: "ontomap",
            version = %atlas.store().version(),
            nodes = atlas.store().len(),
            "remap engine ready"
        );
        Ok(Self {
            atlas: AtlasHandle::new(atlas),
            options: RemapOptions {
                conflict_tolerance: config.remap.conflict_tolerance,
                record_conflicts: config.remap.record_conflicts,
            },
            reference_path,
        })
    }

    pub fn with_atlas(atlas: Atlas, options: RemapOptions) -> Self {
        Self {
            atlas: AtlasHandle::new(atlas),
            options,
            reference_path: None,
        }
    }

    pub fn options(&self) -> RemapOptions {
        self.options
    }

    pub fn reference_path(&self) -> Option<&Path> {
        self.reference_path.as_deref()
    }

    /// Current atlas snapshot
    pub fn atlas(&self) -> Arc<Atlas> {
        self.atlas.snapshot()
    }

    /// Mapper bound to the current snapshot
    pub fn mapper(&self) -> RegionMapper {
        RegionMapper::new(self.atlas.snapshot(), self.options)
    }

    pub fn remap(
        &self,
        identities: &[RegionIdentity],
        values: &[f64],
        hemisphere: Option<Hemisphere>,
    ) -> RemapResult<RemapOutput> {
        self.mapper().remap(identities, values, hemisphere)
    }

    /// Remap and flatten the filtered results into the storage payload
    pub fn feature_record(
        &self,
        identities: &[RegionIdentity],
        values: &[f64],
        hemisphere: Option<Hemisphere>,
    ) -> EngineResult<FeatureRecord> {
        let mapper = self.mapper();
        let output = mapper.remap(identities, values, hemisphere)?;
        Ok(output.to_feature_record(mapper.atlas().store())?)
    }

    /// Re-read the configured reference source and swap it in; returns the replaced atlas.
    ///
    /// On error the current atlas stays in place.
    pub fn reload(&self) -> EngineResult<Arc<Atlas>> {
        let atlas = load_atlas(self.reference_path.as_deref())?;
        Ok(self.atlas.swap(atlas))
    }

    /// Swap in the reference tables at `path` without changing the configured source
    pub fn reload_from(&self, path: &Path) -> EngineResult<Arc<Atlas>> {
        let atlas = Atlas::from_path(path)?;
        Ok(self.atlas.swap(atlas))
    }
}

fn load_atlas(path: Option<&Path>) -> Result<Atlas, OntologyError> {
    match path {
        Some(path) => Atlas::from_path(path),
        None => Ok(Atlas::new(motor_cortex_store()?)),
    }
}

/// Install the tracing subscriber described by the `[logging]` section.
///
/// Keep the returned guard alive for the lifetime of the process.
pub fn init_observability(
    config: &OntomapConfig,
    debug_flags: &CrateDebugFlags,
) -> anyhow::Result<LoggingGuard> {
    let format: LogFormat = config.logging.format.parse().map_err(|e: String| anyhow!(e))?;
    let logging = LoggingConfig {
        level: config.logging.level.to_lowercase(),
        format,
        ..LoggingConfig::default()
    };
    init_logging(debug_flags, &logging)
}
