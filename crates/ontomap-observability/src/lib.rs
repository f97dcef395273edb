// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # ontomap-observability
//!
//! Logging infrastructure shared by the ontomap crates, with per-crate debug flag support.
//!
//! ## Features
//! - `file-logging`: rolling per-crate log files in timestamped run folders

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod cli;
pub mod config;
pub mod init;

pub use cli::*;
pub use config::*;
pub use init::*;

/// Known ontomap crate names for debug flags
pub const KNOWN_CRATES: &[&str] = &[
    "ontomap",
    "ontomap-structures",
    "ontomap-remap",
    "ontomap-config",
];
