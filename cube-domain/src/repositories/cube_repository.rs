// /////////////////////////////////////////////////////////////////////////////
// Adaptive Pipeline RS
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # CubeRepository — persistence port for the Cube aggregate
//!
//! Per the design notes, "the re-read inside the transaction" pattern (§5)
//! must be a named method here, never an ad-hoc SQL statement composed at a
//! call site. [`CubeRepository::consume_limit_transactional`] is that named
//! method: implementations open a transaction, re-read the field's current
//! value, fail with [`CubeError::Conflict`] if it is already `Forbidden`,
//! decrement it, persist, and commit — all inside one call.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::entities::{ContributorStat, Cube, LineageEntry, UsageStat};
use crate::error::CubeError;
use crate::value_objects::{CubeId, CubeUuid, LimitValue, OwnerId, PermissionField, Permissions, TenantId};

#[async_trait]
pub trait CubeRepository: Send + Sync {
    /// Inserts a new Cube row, returning it with the store-assigned
    /// [`CubeId`] populated.
    async fn insert(&self, cube: &Cube) -> Result<Cube, CubeError>;

    async fn find_by_id(&self, tenant: &TenantId, id: CubeId) -> Result<Option<Cube>, CubeError>;

    async fn find_by_uuid(&self, tenant: &TenantId, uuid: CubeUuid) -> Result<Option<Cube>, CubeError>;

    /// Whole-row replace, used by `ReKeyCube` after its own transactional
    /// limit consumption already ran.
    async fn update(&self, cube: &Cube) -> Result<(), CubeError>;

    async fn delete(&self, tenant: &TenantId, id: CubeId) -> Result<(), CubeError>;

    /// Atomically re-reads `field`, fails if it is `Forbidden`, consumes one
    /// unit, persists, and returns the updated Cube — all within a single
    /// transaction (§5, I5). Used by `AbsorbCube` and `GenKeyCube`
    /// (`genkey_limit` on the source Cube) where no sibling row is written
    /// in the same transaction.
    async fn consume_limit_transactional(&self, tenant: &TenantId, id: CubeId, field: PermissionField, now: DateTime<Utc>) -> Result<Cube, CubeError>;

    /// Atomically re-reads `rekey_limit`, fails if `Forbidden`, consumes it,
    /// replaces the whole permission grant and expiration, and persists —
    /// all within a single transaction. Used by `ReKeyCube`.
    async fn consume_rekey_and_replace_transactional(&self, tenant: &TenantId, id: CubeId, new_permissions: Permissions, new_expire_at: Option<DateTime<Utc>>, now: DateTime<Utc>) -> Result<Cube, CubeError>;

    /// A fast-fail, out-of-transaction read of one limit field. Carries no
    /// authority (§5) — callers MUST still go through one of the
    /// transactional methods above before treating a limit as consumed.
    async fn peek_limit(&self, tenant: &TenantId, id: CubeId, field: PermissionField) -> Result<LimitValue, CubeError>;

    /// Atomically inserts a freshly imported Cube row together with the
    /// ancestor, usage, and contributor rows carried forward from its
    /// envelope (§4.6, §9) — one transaction, so a crash partway through
    /// never leaves an orphan Cube row with missing lineage or stats. Used
    /// by `ImportCube` in place of a separate insert plus three separate
    /// copy calls.
    async fn insert_with_carried_history(&self, cube: &Cube, lineage: &[LineageEntry], usage: &[UsageStat], contributors: &[ContributorStat]) -> Result<Cube, CubeError>;

    /// Atomically consumes `absorb_limit` and accumulates the usage and
    /// contributor counters for one absorb, all within one transaction
    /// (§4.6). Used by `AbsorbCube` in place of three separate calls.
    #[allow(clippy::too_many_arguments)]
    async fn consume_absorb_and_accumulate_transactional(
        &self,
        tenant: &TenantId,
        id: CubeId,
        memory_group: &str,
        model_name: &str,
        action_type: &str,
        contributor_owner_id: OwnerId,
        now: DateTime<Utc>,
    ) -> Result<(Cube, UsageStat, ContributorStat), CubeError>;

    /// Atomically removes a Cube's exports, lineage, stats, and cube row as
    /// one transaction (§4.6), before the caller's best-effort filesystem
    /// removal. Used by `DeleteCube` in place of four independently
    /// committed deletes.
    async fn delete_cascade_transactional(&self, tenant: &TenantId, id: CubeId) -> Result<(), CubeError>;
}
