// /////////////////////////////////////////////////////////////////////////////
// Adaptive Pipeline RS
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # External collaborator ports (§2, §5)
//!
//! `CubeOperations` depends on a handful of narrow interfaces for concerns
//! the core does not own: the Cube's inner database file on disk, display
//! names for contributors, wall-clock time, and randomness. Keeping these as
//! traits here (rather than reaching for `std::fs`/`chrono::Utc::now()`
//! directly from `cube::application::use_cases`) is what makes the
//! transactional use cases in §4.6 deterministically testable.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::CubeError;
use crate::value_objects::{CubeUuid, OwnerId, TenantId};

/// The inner database file abstraction (`CubeStoreAdapter` in §2/§5).
///
/// Inner-DB file paths are derived deterministically from tenant + owner +
/// Cube UUID (§5) and are never shared across Cubes. This port only ever
/// sees opaque bytes — it has no notion of what a Cube's database contains
/// (Non-goals, §1).
#[async_trait]
pub trait CubeStoreAdapter: Send + Sync {
    /// Creates the inner store for a brand-new Cube (`CreateCube`). On any
    /// failure elsewhere in the same operation, the caller MUST delete this
    /// file (§4.6).
    async fn create(&self, tenant: &TenantId, owner_id: OwnerId, uuid: CubeUuid) -> Result<(), CubeError>;

    /// Reads the whole inner store as bytes, for packing into an envelope's
    /// `db/` entry (`ExportCube`).
    async fn read_bytes(&self, tenant: &TenantId, owner_id: OwnerId, uuid: CubeUuid) -> Result<Vec<u8>, CubeError>;

    /// Writes `bytes` as the inner store for a newly imported Cube
    /// (`ImportCube`); removed by the caller if the surrounding transaction
    /// fails.
    async fn write_bytes(&self, tenant: &TenantId, owner_id: OwnerId, uuid: CubeUuid, bytes: &[u8]) -> Result<(), CubeError>;

    /// Applies absorbed content to an existing Cube's inner store
    /// (`AbsorbCube`). Per OQ1, this happens before the limit-consuming
    /// transaction and is not itself rolled back if that transaction fails.
    async fn absorb(&self, tenant: &TenantId, owner_id: OwnerId, uuid: CubeUuid, content: &[u8]) -> Result<(), CubeError>;

    async fn delete(&self, tenant: &TenantId, owner_id: OwnerId, uuid: CubeUuid) -> Result<(), CubeError>;
}

/// Contributor-name lookup (`OwnerDirectory` in §2/§5), used by `ExportCube`
/// to resolve the exporting owner's display name for the lineage row it
/// appends (§4.3 step 1).
#[async_trait]
pub trait OwnerDirectory: Send + Sync {
    async fn display_name(&self, tenant: &TenantId, owner_id: OwnerId) -> Result<String, CubeError>;
}

/// Wall-clock time, injected so every use case and test controls `now`
/// explicitly rather than reaching for an ambient clock.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// A process-wide secure randomness source (§5), used for Cube UUIDs, AES
/// keys, GCM nonces, and RSA key generation. [`crate::services::CryptoEngine`]
/// owns the crypto-specific generation methods; this port covers the
/// remaining identity randomness (fresh [`CubeUuid`]s) that isn't itself a
/// cryptographic primitive.
pub trait IdGenerator: Send + Sync {
    fn new_cube_uuid(&self) -> CubeUuid;
}
