// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Configuration type definitions
//!
//! This module defines all configuration structs that map to sections in
//! `ontomap_configuration.toml`.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct OntomapConfig {
    pub reference: ReferenceConfig,
    pub remap: RemapConfig,
    pub logging: LoggingConfig,
}

/// Reference ontology source
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ReferenceConfig {
    /// Reference tables JSON; `None` selects the embedded motor cortex template
    pub path: Option<PathBuf>,
}

/// Aggregation behaviour
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct RemapConfig {
    /// Absolute difference above which two views are reported as conflicting
    pub conflict_tolerance: f64,
    pub record_conflicts: bool,
}

impl Default for RemapConfig {
    fn default() -> Self {
        Self {
            conflict_tolerance: 1e-9,
            record_conflicts: true,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// trace, debug, info, warn or error
    pub level: String,
    /// "text" or "json"
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "text".to_string(),
        }
    }
}
