// /////////////////////////////////////////////////////////////////////////////
// Adaptive Pipeline RS
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # StatsRepository — persistence port for usage/contributor counters (§5)
//!
//! Both `accumulate_usage` and `accumulate_contributor` implement the
//! `FirstOrCreate` + accumulate + save pattern described in §5, bounded by
//! their composite keys; implementations MUST serialize concurrent updates
//! to the same key within their own transaction, not rely on the caller.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::entities::{ContributorStat, UsageStat};
use crate::error::CubeError;
use crate::value_objects::{CubeId, OwnerId, TenantId};

#[async_trait]
pub trait StatsRepository: Send + Sync {
    /// `FirstOrCreate` + accumulate on `(cube_id, memory_group, model_name,
    /// action_type, tenant)`. `AbsorbCube` accumulates through
    /// `CubeRepository::consume_absorb_and_accumulate_transactional` instead
    /// of calling this directly, so the limit consumption and both counters
    /// share one transaction; this method remains the standalone
    /// single-table equivalent.
    async fn accumulate_usage(
        &self,
        tenant: &TenantId,
        cube_id: CubeId,
        memory_group: &str,
        model_name: &str,
        action_type: &str,
        now: DateTime<Utc>,
    ) -> Result<UsageStat, CubeError>;

    async fn accumulate_contributor(&self, tenant: &TenantId, cube_id: CubeId, contributor_owner_id: OwnerId, now: DateTime<Utc>) -> Result<ContributorStat, CubeError>;

    async fn usage_for_cube(&self, tenant: &TenantId, cube_id: CubeId) -> Result<Vec<UsageStat>, CubeError>;

    async fn contributors_for_cube(&self, tenant: &TenantId, cube_id: CubeId) -> Result<Vec<ContributorStat>, CubeError>;

    /// Bulk-inserts rows copied verbatim from an envelope's
    /// `stats_usage.json`/`stats_contributors.json` against the freshly
    /// created child Cube (`ImportCube`); these do not go through
    /// `accumulate_*` since they are not being incremented, only carried
    /// forward.
    async fn copy_usage_on_import(&self, tenant: &TenantId, new_cube_id: CubeId, rows: &[UsageStat]) -> Result<(), CubeError>;

    async fn copy_contributors_on_import(&self, tenant: &TenantId, new_cube_id: CubeId, rows: &[ContributorStat]) -> Result<(), CubeError>;

    async fn delete_for_cube(&self, tenant: &TenantId, cube_id: CubeId) -> Result<(), CubeError>;
}
