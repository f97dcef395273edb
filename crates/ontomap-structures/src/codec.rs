// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Hemisphere-aware identity codec.
//!
//! Nodes are stored hemisphere-neutral. Callers address them either by acronym plus an
//! explicit hemisphere, or by a signed id whose sign carries the hemisphere
//! (negative = left, non-negative = right).

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

use crate::node::NodeRef;
use crate::store::OntologyStore;
use crate::{OntologyError, OntologyResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Hemisphere {
    Left,
    Right,
}

impl Hemisphere {
    pub fn as_str(&self) -> &'static str {
        match self {
            Hemisphere::Left => "left",
            Hemisphere::Right => "right",
        }
    }
}

impl Display for Hemisphere {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Hemisphere {
    type Err = OntologyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "left" | "l" => Ok(Hemisphere::Left),
            "right" | "r" => Ok(Hemisphere::Right),
            _ => Err(OntologyError::InvalidHemisphere(s.to_string())),
        }
    }
}

/// Attach a hemisphere to a neutral id
#[inline]
pub fn lateralize(id: u32, hemisphere: Hemisphere) -> i64 {
    match hemisphere {
        Hemisphere::Left => -i64::from(id),
        Hemisphere::Right => i64::from(id),
    }
}

/// Split a signed id into its hemisphere and magnitude.
///
/// Returns `None` when the magnitude does not fit a neutral id.
#[inline]
pub fn split_lateral(signed: i64) -> Option<(u32, Hemisphere)> {
    let hemisphere = if signed < 0 {
        Hemisphere::Left
    } else {
        Hemisphere::Right
    };
    u32::try_from(signed.unsigned_abs())
        .ok()
        .map(|id| (id, hemisphere))
}

impl OntologyStore {
    /// Signed id of an acronym (structural or partner) in the given hemisphere
    pub fn acronym_to_id(&self, acronym: &str, hemisphere: Hemisphere) -> OntologyResult<i64> {
        let node = self.resolve_acronym(acronym)?;
        Ok(lateralize(self.node(node.index).id, hemisphere))
    }

    /// Acronym and hemisphere of a signed id
    pub fn id_to_acronym(&self, signed: i64) -> OntologyResult<(&str, Hemisphere)> {
        let (id, hemisphere) = split_lateral(signed).ok_or(OntologyError::UnknownId(signed))?;
        let index = self
            .lookup_by_id(id)
            .map_err(|_| OntologyError::UnknownId(signed))?;
        Ok((self.node(index).acronym.as_str(), hemisphere))
    }

    /// Resolve a signed id to the structural facet it names
    pub fn resolve_signed_id(&self, signed: i64) -> OntologyResult<(NodeRef, Hemisphere)> {
        let (id, hemisphere) = split_lateral(signed).ok_or(OntologyError::UnknownId(signed))?;
        let index = self
            .lookup_by_id(id)
            .map_err(|_| OntologyError::UnknownId(signed))?;
        Ok((NodeRef::structural(index), hemisphere))
    }

    pub fn is_placeholder_acronym(&self, acronym: &str) -> bool {
        self.placeholder()
            .is_some_and(|placeholder| placeholder.acronym == acronym)
    }

    /// Placeholder ids are hemisphere-neutral, both signs match
    pub fn is_placeholder_id(&self, signed: i64) -> bool {
        self.placeholder()
            .is_some_and(|placeholder| signed.unsigned_abs() == u64::from(placeholder.id))
    }
}
