// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Immutable atlas snapshot and its swap handle.
//!
//! An [`Atlas`] pairs a validated [`OntologyStore`] with the [`TreeIndex`] derived from it.
//! Readers share it through `Arc`; a refresh builds a complete new atlas and replaces the
//! pointer inside an [`AtlasHandle`], so no reader ever sees a partially updated tree.

use parking_lot::RwLock;
use std::path::Path;
use std::sync::Arc;

use ontomap_structures::{OntologyResult, OntologyStore, ReferenceTables};

use crate::tree_index::TreeIndex;

#[derive(Debug)]
pub struct Atlas {
    store: OntologyStore,
    index: TreeIndex,
}

impl Atlas {
    pub fn new(store: OntologyStore) -> Self {
        let index = TreeIndex::build(&store);
        Self { store, index }
    }

    pub fn from_tables(tables: ReferenceTables) -> OntologyResult<Self> {
        Ok(Self::new(OntologyStore::load(tables)?))
    }

    /// Read, validate and index a reference document on disk
    pub fn from_path(path: &Path) -> OntologyResult<Self> {
        Ok(Self::new(OntologyStore::from_path(path)?))
    }

    pub fn store(&self) -> &OntologyStore {
        &self.store
    }

    pub fn index(&self) -> &TreeIndex {
        &self.index
    }
}

/// Shared, atomically replaceable atlas
#[derive(Debug)]
pub struct AtlasHandle {
    current: RwLock<Arc<Atlas>>,
}

impl AtlasHandle {
    pub fn new(atlas: Atlas) -> Self {
        Self {
            current: RwLock::new(Arc::new(atlas)),
        }
    }

    /// Current atlas; stays valid for the caller even if a swap happens meanwhile
    pub fn snapshot(&self) -> Arc<Atlas> {
        Arc::clone(&self.current.read())
    }

    /// Replace the atlas and return the previous one
    pub fn swap(&self, atlas: Atlas) -> Arc<Atlas> {
        let next = Arc::new(atlas);
        let previous = std::mem::replace(&mut *self.current.write(), Arc::clone(&next));
        tracing::info!(
            target: "ontomap-remap",
            from = %previous.store().version(),
            to = %next.store().version(),
            "swapped reference atlas"
        );
        previous
    }
}
