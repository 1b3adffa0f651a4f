// /////////////////////////////////////////////////////////////////////////////
// Adaptive Pipeline RS
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Cube — the aggregate root of the portability subsystem
//!
//! A `Cube` is a portable knowledge container: an opaque inner database file
//! plus the lineage and permission state that travel with it across
//! export/import. Every mutating operation in `cube::application::use_cases`
//! goes through [`Cube::consuming`] or [`Cube::with_permissions`] rather than
//! touching `permissions`/`expire_at` directly, so the tri-state limit
//! algebra (I3, I5) is never bypassed by ad-hoc field writes.

use chrono::{DateTime, Utc};

use crate::error::CubeError;
use crate::value_objects::{CubeId, CubeUuid, EmbeddingConfig, ExportId, OwnerId, PermissionField, Permissions, TenantId};

#[derive(Debug, Clone, PartialEq)]
pub struct Cube {
    pub id: CubeId,
    pub uuid: CubeUuid,
    pub owner_id: OwnerId,
    pub name: String,
    pub description: Option<String>,
    pub expire_at: Option<DateTime<Utc>>,
    pub permissions: Permissions,
    /// `Some` iff this Cube was produced by `ImportCube` (I1).
    pub source_export_id: Option<ExportId>,
    pub embedding_config: EmbeddingConfig,
    pub tenant: TenantId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Cube {
    /// Builds a freshly created Cube (`CreateCube`): no source export,
    /// all permissions unlimited (I1).
    #[allow(clippy::too_many_arguments)]
    pub fn new_created(
        id: CubeId,
        uuid: CubeUuid,
        owner_id: OwnerId,
        name: impl Into<String>,
        description: Option<String>,
        embedding_config: EmbeddingConfig,
        tenant: TenantId,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            uuid,
            owner_id,
            name: name.into(),
            description,
            expire_at: None,
            permissions: Permissions::unlimited(),
            source_export_id: None,
            embedding_config,
            tenant,
            created_at: now,
            updated_at: now,
        }
    }

    /// Builds an imported Cube (`ImportCube`): has a source export, and the
    /// permissions/expiration carried by the licensing token (I1).
    #[allow(clippy::too_many_arguments)]
    pub fn new_imported(
        id: CubeId,
        uuid: CubeUuid,
        owner_id: OwnerId,
        name: impl Into<String>,
        description: Option<String>,
        permissions: Permissions,
        expire_at: Option<DateTime<Utc>>,
        source_export_id: ExportId,
        embedding_config: EmbeddingConfig,
        tenant: TenantId,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            uuid,
            owner_id,
            name: name.into(),
            description,
            expire_at,
            permissions,
            source_export_id: Some(source_export_id),
            embedding_config,
            tenant,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_imported(&self) -> bool {
        self.source_export_id.is_some()
    }

    pub fn is_owned_by(&self, owner_id: OwnerId) -> bool {
        self.owner_id == owner_id
    }

    /// Returns whether this Cube's grant has expired as of `now`.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expire_at.is_some_and(|exp| exp < now)
    }

    /// Consumes one unit of the named permission field (§4.1), returning the
    /// updated Cube. Used by `AbsorbCube`, `ExportCube`, `GenKeyCube`,
    /// `ReKeyCube` under their respective transactional boundaries.
    ///
    /// # Errors
    /// Propagates [`CubeError::Conflict`] when `field` is already `Forbidden`.
    pub fn consuming(&self, field: PermissionField, now: DateTime<Utc>) -> Result<Self, CubeError> {
        let mut next = self.clone();
        next.permissions = self.permissions.consuming(field)?;
        next.updated_at = now;
        Ok(next)
    }

    /// Replaces the whole permission grant and expiration (`ReKeyCube`).
    pub fn with_permissions(&self, permissions: Permissions, expire_at: Option<DateTime<Utc>>, now: DateTime<Utc>) -> Self {
        let mut next = self.clone();
        next.permissions = permissions;
        next.expire_at = expire_at;
        next.updated_at = now;
        next
    }
}
