// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Core data structures for ontomap.
//!
//! Holds the immutable reference ontology ([`OntologyStore`]), its serialized form
//! ([`ReferenceTables`]), the mapping views defined over it and the hemisphere codec that
//! converts between acronym-form and signed-id-form region identities.

pub mod codec;
mod error;
pub mod mapping;
pub mod node;
pub mod reference;
mod store;
pub mod templates;

pub use codec::{lateralize, split_lateral, Hemisphere};
pub use error::{OntologyError, OntologyResult};
pub use mapping::{CoarseMapping, HierarchicalMapping, MappingView};
pub use node::{Facet, Node, NodeIndex, NodeRef};
pub use reference::{
    CoarseMappingRecord, HierarchicalMappingRecord, NodeRecord, PlaceholderRecord,
    ReferenceTables, ViewRecord,
};
pub use store::OntologyStore;
