// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*!
Embedded reference templates.

Provides a small, self-consistent reference dataset compiled into the crate:
- Motor cortex subtree (MO, MOp, MOs and their layers) with somatosensory and frontal neighbours
- Hypothalamus branch reachable only through the alternate view
- Dual-role pairs `MO`/`MO-un` and `HY`/`HY-un`
- Two coarse mappings (`beryl`, `cosmos`)
*/

use crate::reference::ReferenceTables;
use crate::store::OntologyStore;
use crate::OntologyResult;

/// Embedded motor cortex reference (loaded at compile time)
pub const MOTOR_CORTEX_REFERENCE_JSON: &str =
    include_str!("../references/motor_cortex_reference.json");

/// Name of the hierarchical mapping in the motor cortex reference
pub const MOTOR_CORTEX_HIERARCHICAL_MAPPING: &str = "allen";

/// Parse the embedded motor cortex reference tables
pub fn load_motor_cortex_reference() -> OntologyResult<ReferenceTables> {
    ReferenceTables::from_json_str(MOTOR_CORTEX_REFERENCE_JSON)
}

/// Parse and validate the embedded motor cortex reference
pub fn motor_cortex_store() -> OntologyResult<OntologyStore> {
    OntologyStore::load(load_motor_cortex_reference()?)
}
