// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

use ontomap_structures::OntologyError;

/// Result type for remap operations
pub type RemapResult<T> = Result<T, RemapError>;

/// Errors that can occur during a remap call.
///
/// Everything except `MissingAggregation` is detected before aggregation starts, so a
/// failed call never leaves partial results behind.
#[derive(Debug, thiserror::Error)]
pub enum RemapError {
    /// Shape or form mismatch in the caller's input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Unknown region: {0}")]
    UnknownNode(String),

    /// A coarse mapping has no ancestor for an input region
    #[error("Validation failed: {0}")]
    Validation(String),

    /// A working-subtree node ended up without any value; the reference data is corrupt
    #[error("No value could be aggregated for '{region}' in view '{view}'")]
    MissingAggregation { view: String, region: String },

    #[error(transparent)]
    Ontology(OntologyError),
}

impl From<OntologyError> for RemapError {
    fn from(err: OntologyError) -> Self {
        if err.is_unknown_node() {
            RemapError::UnknownNode(err.to_string())
        } else {
            RemapError::Ontology(err)
        }
    }
}

impl RemapError {
    /// True for the fatal class that indicates broken reference data
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            RemapError::MissingAggregation { .. } | RemapError::Ontology(_)
        )
    }
}
