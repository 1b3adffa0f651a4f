// /////////////////////////////////////////////////////////////////////////////
// Adaptive Pipeline RS
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # ExportRepository — persistence port for Export rows
//!
//! `ExportCube` must, in one transaction, re-read `export_limit`, reject if
//! `Forbidden`, consume it, persist the Cube's new permissions, AND insert
//! the new `Export` row (§4.3 step 7). That cross-aggregate atomicity is
//! exposed as a single named method, not composed ad hoc by the application
//! layer from two separate repositories.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::entities::{Cube, Export};
use crate::error::CubeError;
use crate::value_objects::{CubeId, CubeUuid, ExportId, TenantId};

/// The fields of an `Export` row not yet assigned a store id.
pub struct NewExport {
    pub cube_id: CubeId,
    pub new_uuid: CubeUuid,
    pub hash: String,
    pub private_key_pem: String,
    pub tenant: TenantId,
}

#[async_trait]
pub trait ExportRepository: Send + Sync {
    /// Atomically consumes the source Cube's `export_limit` and inserts
    /// `new_export`, returning both updated rows. Fails with
    /// [`CubeError::Conflict`] if the re-read `export_limit` is already
    /// `Forbidden`.
    async fn create_with_limit_consumption(&self, tenant: &TenantId, source_cube_id: CubeId, new_export: NewExport, now: DateTime<Utc>) -> Result<(Cube, Export), CubeError>;

    async fn find_by_id(&self, tenant: &TenantId, id: ExportId) -> Result<Option<Export>, CubeError>;

    async fn delete_for_cube(&self, tenant: &TenantId, cube_id: CubeId) -> Result<(), CubeError>;
}
