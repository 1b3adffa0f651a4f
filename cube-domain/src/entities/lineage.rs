// /////////////////////////////////////////////////////////////////////////////
// Adaptive Pipeline RS
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # LineageEntry — one ancestor row in a Cube's derivation chain
//!
//! Lineage rows are append-only and read-only once written (§4.5): they are
//! produced wholesale by `ExportCube` (self appended, §4.1/I2) and by
//! `ImportCube` (all ancestors copied verbatim from the envelope's
//! `metadata.json`). Ordering by `generation` ascending is authoritative
//! everywhere lineage is read.

use crate::value_objects::{CubeId, CubeUuid};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineageEntry {
    pub cube_id: CubeId,
    pub ancestor_uuid: CubeUuid,
    pub ancestor_owner: String,
    /// Unix-ms timestamp of the export that produced this ancestor row.
    pub exported_at_ms: i64,
    /// 1-based; root = 1 (I2).
    pub generation: u32,
}

impl LineageEntry {
    pub fn new(cube_id: CubeId, ancestor_uuid: CubeUuid, ancestor_owner: impl Into<String>, exported_at_ms: i64, generation: u32) -> Self {
        Self {
            cube_id,
            ancestor_uuid,
            ancestor_owner: ancestor_owner.into(),
            exported_at_ms,
            generation,
        }
    }
}
