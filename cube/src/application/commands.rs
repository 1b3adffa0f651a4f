// /////////////////////////////////////////////////////////////////////////////
// Adaptive Pipeline
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Application Commands
//!
//! One command struct per Cube operation (§4.6 of the design notes), plus
//! the result struct its use case returns. Commands are plain data,
//! assembled by `cube::presentation` from a validated CLI invocation; they
//! carry no behavior of their own. The command/result split exists purely
//! so each use case's `execute` signature stays self-describing instead of
//! growing a long parameter list.

use chrono::{DateTime, Utc};
use cube_domain::entities::{ContributorStat, Cube, UsageStat};
use cube_domain::value_objects::{CubeId, EmbeddingConfig, ExportId, OwnerId, Permissions, TenantId};

/// `CreateCube`: register a new, empty Cube owned by `owner_id`.
pub struct CreateCubeCommand {
    pub tenant: TenantId,
    pub owner_id: OwnerId,
    pub name: String,
    pub description: Option<String>,
    pub embedding_config: EmbeddingConfig,
}

pub struct CreateCubeResult {
    pub cube: Cube,
}

/// `AbsorbCube`: feed `content` into an existing Cube, consuming
/// `absorb_limit` and accumulating the usage/contributor counters named by
/// the remaining fields.
pub struct AbsorbCubeCommand {
    pub tenant: TenantId,
    pub cube_id: CubeId,
    pub content: Vec<u8>,
    pub memory_group: String,
    pub model_name: String,
    pub action_type: String,
    pub contributor_owner_id: OwnerId,
}

pub struct AbsorbCubeResult {
    pub cube: Cube,
    pub usage: UsageStat,
    pub contributor: ContributorStat,
}

/// `ExportCube`: produce a portable envelope from an existing Cube,
/// consuming `export_limit`.
pub struct ExportCubeCommand {
    pub tenant: TenantId,
    pub cube_id: CubeId,
}

pub struct ExportCubeResult {
    pub envelope_bytes: Vec<u8>,
    pub export_id: ExportId,
}

/// `GenKeyCube`: mint a licensing token against a previously exported
/// envelope. `requested_permissions`/`requested_expire_at` become the
/// token's `KeyPayload` once they pass the inheritance check against the
/// source Cube's own grant; consumes `genkey_limit` on the source Cube.
pub struct GenKeyCubeCommand {
    pub tenant: TenantId,
    pub requesting_owner: OwnerId,
    pub envelope_bytes: Vec<u8>,
    pub requested_permissions: Permissions,
    pub requested_expire_at: Option<DateTime<Utc>>,
}

pub struct GenKeyCubeResult {
    pub token: String,
}

/// `ImportCube`: materialize a new Cube from an envelope plus a licensing
/// token. No limit is consumed on the (already-remote) source Cube — the
/// token itself represents the grant.
pub struct ImportCubeCommand {
    pub tenant: TenantId,
    pub owner_id: OwnerId,
    pub envelope_bytes: Vec<u8>,
    pub token: String,
}

pub struct ImportCubeResult {
    pub cube: Cube,
}

/// `ReKeyCube`: replace an imported Cube's permissions and expiration using
/// a fresh token, consuming `rekey_limit`.
pub struct ReKeyCubeCommand {
    pub tenant: TenantId,
    pub requesting_owner: OwnerId,
    pub cube_id: CubeId,
    pub token: String,
}

pub struct ReKeyCubeResult {
    pub cube: Cube,
}

/// `StatsCube`: read usage and contributor statistics for a Cube whose
/// grant allows it (`allow_stats`).
pub struct StatsCubeCommand {
    pub tenant: TenantId,
    pub cube_id: CubeId,
}

pub struct StatsCubeResult {
    pub usage: Vec<UsageStat>,
    pub contributors: Vec<ContributorStat>,
}

/// `DeleteCube`: remove a Cube, its lineage, its stats, and its inner
/// store. Only the owner may delete.
pub struct DeleteCubeCommand {
    pub tenant: TenantId,
    pub requesting_owner: OwnerId,
    pub cube_id: CubeId,
}

pub struct DeleteCubeResult;
