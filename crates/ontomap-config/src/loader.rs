// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Locating and reading `ontomap_configuration.toml`.
//!
//! Values are layered: the TOML file first, then `ONTOMAP_*` environment variables, then
//! the caller's CLI map. Later layers win.

use crate::{ConfigError, ConfigResult, OntomapConfig};
use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Default configuration file name
pub const CONFIG_FILE_NAME: &str = "ontomap_configuration.toml";

/// Find the ontomap configuration file
///
/// Search order:
/// 1. `ONTOMAP_CONFIG_PATH` environment variable
/// 2. Current working directory
/// 3. Up to 5 parent directories
///
/// # Errors
///
/// Returns `ConfigError::FileNotFound` if no config file is found in any location
pub fn find_config_file() -> ConfigResult<PathBuf> {
    if let Ok(env_path) = env::var("ONTOMAP_CONFIG_PATH") {
        let path = PathBuf::from(env_path);
        if path.exists() {
            return Ok(path);
        }
        return Err(ConfigError::FileNotFound(format!(
            "Config file specified by ONTOMAP_CONFIG_PATH not found: {}",
            path.display()
        )));
    }

    let mut search_paths = Vec::new();
    if let Ok(cwd) = env::current_dir() {
        search_paths.push(cwd.join(CONFIG_FILE_NAME));
        let mut current = cwd.as_path();
        for _ in 0..5 {
            match current.parent() {
                Some(parent) => {
                    search_paths.push(parent.join(CONFIG_FILE_NAME));
                    current = parent;
                }
                None => break,
            }
        }
    }

    if let Some(path) = search_paths.iter().find(|p| p.exists()) {
        return Ok(path.clone());
    }

    let search_list = search_paths
        .iter()
        .map(|p| format!("  - {}", p.display()))
        .collect::<Vec<_>>()
        .join("\n");

    Err(ConfigError::FileNotFound(format!(
        "'{}' not found in any of these locations:\n{}\n\nSet ONTOMAP_CONFIG_PATH environment variable to specify custom location.",
        CONFIG_FILE_NAME, search_list
    )))
}

/// Load configuration from TOML file
///
/// # Arguments
///
/// * `config_path` - Optional path to config file. If `None`, will search for config file.
/// * `cli_args` - Optional CLI argument overrides
///
/// # Errors
///
/// Returns error if config file is not found or contains invalid TOML
pub fn load_config(
    config_path: Option<&Path>,
    cli_args: Option<&HashMap<String, String>>,
) -> ConfigResult<OntomapConfig> {
    let config_file = match config_path {
        Some(path) => path.to_path_buf(),
        None => find_config_file()?,
    };

    let content = fs::read_to_string(&config_file)?;
    let mut config: OntomapConfig = toml::from_str(&content)?;

    apply_environment_overrides(&mut config);
    if let Some(cli) = cli_args {
        apply_cli_overrides(&mut config, cli);
    }

    Ok(config)
}

fn parse_flag(value: &str) -> bool {
    let value = value.to_lowercase();
    value == "true" || value == "1" || value == "yes"
}

/// Apply environment variable overrides to configuration
///
/// Supported environment variables:
/// - `ONTOMAP_REFERENCE_PATH` -> `reference.path`
/// - `ONTOMAP_CONFLICT_TOLERANCE` -> `remap.conflict_tolerance`
/// - `ONTOMAP_RECORD_CONFLICTS` -> `remap.record_conflicts`
/// - `ONTOMAP_LOG_LEVEL` -> `logging.level`
/// - `ONTOMAP_LOG_FORMAT` -> `logging.format`
pub fn apply_environment_overrides(config: &mut OntomapConfig) {
    if let Ok(value) = env::var("ONTOMAP_REFERENCE_PATH") {
        config.reference.path = Some(PathBuf::from(value));
    }
    if let Ok(value) = env::var("ONTOMAP_CONFLICT_TOLERANCE") {
        if let Ok(tolerance) = value.parse::<f64>() {
            config.remap.conflict_tolerance = tolerance;
        }
    }
    if let Ok(value) = env::var("ONTOMAP_RECORD_CONFLICTS") {
        config.remap.record_conflicts = parse_flag(&value);
    }
    if let Ok(value) = env::var("ONTOMAP_LOG_LEVEL") {
        config.logging.level = value;
    }
    if let Ok(value) = env::var("ONTOMAP_LOG_FORMAT") {
        config.logging.format = value;
    }
}

/// Apply CLI argument overrides to configuration
///
/// # Arguments
///
/// * `config` - Configuration to modify
/// * `cli_args` - CLI arguments by name, e.g. `reference_path` or `log_level`
pub fn apply_cli_overrides(config: &mut OntomapConfig, cli_args: &HashMap<String, String>) {
    if let Some(value) = cli_args.get("reference_path") {
        config.reference.path = Some(PathBuf::from(value));
    }
    if let Some(value) = cli_args.get("conflict_tolerance") {
        if let Ok(tolerance) = value.parse::<f64>() {
            config.remap.conflict_tolerance = tolerance;
        }
    }
    if let Some(value) = cli_args.get("record_conflicts") {
        config.remap.record_conflicts = parse_flag(value);
    }
    if let Some(value) = cli_args.get("log_level") {
        config.logging.level = value.clone();
    }
}
