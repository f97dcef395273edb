// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/// Result type for ontology operations
pub type OntologyResult<T> = Result<T, OntologyError>;

/// Errors raised while loading or querying the reference ontology.
///
/// # Examples
/// ```
/// use ontomap_structures::OntologyError;
///
/// fn require_level(level: u16) -> Result<(), OntologyError> {
///     if level == 0 {
///         return Err(OntologyError::DataIntegrity("only the root may sit at level 0".into()));
///     }
///     Ok(())
/// }
///
/// assert!(require_level(0).is_err());
/// assert!(require_level(3).is_ok());
/// ```
#[derive(Debug, thiserror::Error)]
pub enum OntologyError {
    /// The reference tables contradict themselves (missing cross-reference, broken tree, ...)
    #[error("Reference data integrity violation: {0}")]
    DataIntegrity(String),

    /// No node (or dual-role partner) carries this acronym
    #[error("Unknown region acronym: {0}")]
    UnknownAcronym(String),

    /// No node carries this (possibly lateralized) id
    #[error("Unknown region id: {0}")]
    UnknownId(i64),

    /// Hemisphere label could not be parsed
    #[error("Invalid hemisphere '{0}', expected 'left' or 'right'")]
    InvalidHemisphere(String),

    /// Reading the reference file failed
    #[error("Failed to read reference tables: {0}")]
    Io(#[from] std::io::Error),

    /// The reference document is not valid JSON for `ReferenceTables`
    #[error("Failed to parse reference tables: {0}")]
    Parse(String),
}

impl From<serde_json::Error> for OntologyError {
    fn from(err: serde_json::Error) -> Self {
        OntologyError::Parse(err.to_string())
    }
}

impl OntologyError {
    /// True for lookup failures (as opposed to broken reference data)
    pub fn is_unknown_node(&self) -> bool {
        matches!(
            self,
            OntologyError::UnknownAcronym(_) | OntologyError::UnknownId(_)
        )
    }
}
