// /////////////////////////////////////////////////////////////////////////////
// Adaptive Pipeline RS
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # LineageRepository — persistence port for the append-only ancestor chain (§4.5)
//!
//! `append_on_export` does not itself write rows: the ledger retains a
//! Cube's existing ancestors unchanged until that Cube is itself exported
//! again (§4.5). It only computes the extended list that `ExportCube`
//! serializes into the envelope's `metadata.json`. Ancestor rows are
//! actually inserted by `CubeRepository::insert_with_carried_history` as
//! part of the import transaction; `copy_on_import` below remains a
//! standalone single-table equivalent, always ordered `generation ASC` on
//! read.

use async_trait::async_trait;

use crate::entities::LineageEntry;
use crate::error::CubeError;
use crate::value_objects::{CubeId, TenantId};

#[async_trait]
pub trait LineageRepository: Send + Sync {
    /// Ancestors of `cube_id`, ordered `generation ASC` (§4.5 — this
    /// ordering is authoritative everywhere lineage is read).
    async fn ancestors_of(&self, tenant: &TenantId, cube_id: CubeId) -> Result<Vec<LineageEntry>, CubeError>;

    /// Inserts one row per `ancestors`, preserving their original `uuid`,
    /// `owner`, `exported_at`, and `generation` verbatim (`ImportCube`).
    async fn copy_on_import(&self, tenant: &TenantId, new_cube_id: CubeId, ancestors: &[LineageEntry]) -> Result<(), CubeError>;

    async fn delete_for_cube(&self, tenant: &TenantId, cube_id: CubeId) -> Result<(), CubeError>;
}
