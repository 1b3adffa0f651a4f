// /////////////////////////////////////////////////////////////////////////////
// Adaptive Pipeline
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Presentation Layer
//!
//! The only caller of `cube::application`. Bridges a `ValidatedCommand`
//! (parsed and security-checked by `cube_bootstrap::cli`) onto the matching
//! use case, and formats its result as the line the CLI prints to stdout.
//!
//! `BoundaryCode` classifies a `CubeError` into the handful of buckets a
//! boundary (CLI today, conceivably an API tomorrow) distinguishes when
//! deciding how to present a failure; `cube_bootstrap::exit_code` derives
//! the finer-grained Unix exit status from the same `CubeError` indepedently.

use std::io::{self, Write as _};

use chrono::{DateTime, Utc};
use cube_bootstrap::cli::ValidatedCommand;
use cube_domain::error::CubeError;
use cube_domain::value_objects::{CubeId, EmbeddingConfig, LimitValue, MemifyConfigLimit, OwnerId, Permissions, TenantId};

use crate::application::commands::{
    AbsorbCubeCommand, CreateCubeCommand, DeleteCubeCommand, ExportCubeCommand, GenKeyCubeCommand, ImportCubeCommand, ReKeyCubeCommand, StatsCubeCommand,
};
use crate::application::use_cases::{AbsorbCubeUseCase, CreateCubeUseCase, DeleteCubeUseCase, ExportCubeUseCase, GenKeyCubeUseCase, ImportCubeUseCase, ReKeyCubeUseCase, StatsCubeUseCase};

/// The handful of outcome buckets a boundary distinguishes, independent of
/// the finer Unix exit code `cube_bootstrap::exit_code` computes from the
/// same error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundaryCode {
    Ok,
    BadRequest,
    Unauthorized,
    Forbidden,
    NotFound,
    InternalServerError,
}

impl BoundaryCode {
    pub fn classify(error: &CubeError) -> Self {
        match error {
            CubeError::Malformed(_) => BoundaryCode::BadRequest,
            CubeError::Unauthorized(_) => BoundaryCode::Unauthorized,
            CubeError::Forbidden(_) | CubeError::Tampered(_) => BoundaryCode::Forbidden,
            CubeError::NotFound(_) => BoundaryCode::NotFound,
            CubeError::Conflict(_) | CubeError::Cancelled => BoundaryCode::BadRequest,
            CubeError::Io(_) | CubeError::Serialization(_) | CubeError::Database(_) | CubeError::Crypto(_) | CubeError::InvalidConfiguration(_) | CubeError::Internal(_) => {
                BoundaryCode::InternalServerError
            }
        }
    }
}

fn parse_cube_id(raw: &str) -> Result<CubeId, CubeError> {
    raw.trim()
        .parse::<i64>()
        .map(CubeId::from_db)
        .map_err(|_| CubeError::malformed(format!("'{raw}' is not a valid cube id")))
}

fn parse_expire_at(raw: &str) -> Result<DateTime<Utc>, CubeError> {
    DateTime::parse_from_rfc3339(raw).map(|dt| dt.with_timezone(&Utc)).map_err(|e| CubeError::malformed(format!("invalid --expire-at: {e}")))
}

/// Wires the eight use cases together behind the single identity (tenant +
/// owner) this single-user CLI binary always acts as.
pub struct Application {
    pub tenant: TenantId,
    pub owner_id: OwnerId,
    pub create_cube: CreateCubeUseCase,
    pub absorb_cube: AbsorbCubeUseCase,
    pub export_cube: ExportCubeUseCase,
    pub genkey_cube: GenKeyCubeUseCase,
    pub import_cube: ImportCubeUseCase,
    pub rekey_cube: ReKeyCubeUseCase,
    pub stats_cube: StatsCubeUseCase,
    pub delete_cube: DeleteCubeUseCase,
}

impl Application {
    /// Dispatches a validated CLI command to its use case and formats the
    /// result as the line the CLI prints on success.
    pub async fn dispatch(&self, command: ValidatedCommand) -> Result<String, CubeError> {
        match command {
            ValidatedCommand::Create { name, description } => {
                let result = self
                    .create_cube
                    .execute(CreateCubeCommand {
                        tenant: self.tenant.clone(),
                        owner_id: self.owner_id,
                        name,
                        description,
                        embedding_config: EmbeddingConfig::empty(),
                    })
                    .await?;
                Ok(format!("created cube {} (uuid {})", result.cube.id, result.cube.uuid))
            }

            ValidatedCommand::Absorb { cube, input } => {
                let cube_id = parse_cube_id(&cube)?;
                let content = tokio::fs::read(&input).await.map_err(CubeError::from)?;
                let result = self
                    .absorb_cube
                    .execute(AbsorbCubeCommand {
                        tenant: self.tenant.clone(),
                        cube_id,
                        content,
                        memory_group: "default".to_string(),
                        model_name: "default".to_string(),
                        action_type: "absorb".to_string(),
                        contributor_owner_id: self.owner_id,
                    })
                    .await?;
                Ok(format!("absorbed into cube {} (usage count {})", result.cube.id, result.usage.count))
            }

            ValidatedCommand::Export { cube, output } => {
                let cube_id = parse_cube_id(&cube)?;
                let result = self.export_cube.execute(ExportCubeCommand { tenant: self.tenant.clone(), cube_id }).await?;
                tokio::fs::write(&output, &result.envelope_bytes).await.map_err(CubeError::from)?;
                Ok(format!("exported cube {} to {} (export {})", cube_id, output.display(), result.export_id))
            }

            ValidatedCommand::GenKey {
                envelope,
                export_limit,
                rekey_limit,
                genkey_limit,
                absorb_limit,
                memify_limit,
                query_limit,
                allow_stats,
                expire_at,
                output,
            } => {
                let envelope_bytes = tokio::fs::read(&envelope).await.map_err(CubeError::from)?;
                let requested_permissions = Permissions {
                    export_limit: LimitValue::from_raw(export_limit)?,
                    rekey_limit: LimitValue::from_raw(rekey_limit)?,
                    genkey_limit: LimitValue::from_raw(genkey_limit)?,
                    absorb_limit: LimitValue::from_raw(absorb_limit)?,
                    memify_limit: LimitValue::from_raw(memify_limit)?,
                    query_limit: LimitValue::from_raw(query_limit)?,
                    allow_stats,
                    memify_config_limit: MemifyConfigLimit::unrestricted(),
                    query_type_limit: Default::default(),
                };
                let requested_expire_at = expire_at.as_deref().map(parse_expire_at).transpose()?;

                let result = self
                    .genkey_cube
                    .execute(GenKeyCubeCommand {
                        tenant: self.tenant.clone(),
                        requesting_owner: self.owner_id,
                        envelope_bytes,
                        requested_permissions,
                        requested_expire_at,
                    })
                    .await?;

                if let Some(path) = output {
                    tokio::fs::write(&path, &result.token).await.map_err(CubeError::from)?;
                    Ok(format!("wrote licensing token to {}", path.display()))
                } else {
                    Ok(result.token)
                }
            }

            ValidatedCommand::Import { envelope, token } => {
                let envelope_bytes = tokio::fs::read(&envelope).await.map_err(CubeError::from)?;
                let token = tokio::fs::read_to_string(&token).await.map_err(CubeError::from)?;
                let result = self
                    .import_cube
                    .execute(ImportCubeCommand {
                        tenant: self.tenant.clone(),
                        owner_id: self.owner_id,
                        envelope_bytes,
                        token,
                    })
                    .await?;
                Ok(format!("imported cube {} (uuid {})", result.cube.id, result.cube.uuid))
            }

            ValidatedCommand::ReKey { cube, token } => {
                let cube_id = parse_cube_id(&cube)?;
                let token = tokio::fs::read_to_string(&token).await.map_err(CubeError::from)?;
                let result = self
                    .rekey_cube
                    .execute(ReKeyCubeCommand {
                        tenant: self.tenant.clone(),
                        requesting_owner: self.owner_id,
                        cube_id,
                        token,
                    })
                    .await?;
                Ok(format!("rekeyed cube {}", result.cube.id))
            }

            ValidatedCommand::Stats { cube } => {
                let cube_id = parse_cube_id(&cube)?;
                let result = self.stats_cube.execute(StatsCubeCommand { tenant: self.tenant.clone(), cube_id }).await?;
                Ok(format!("{} usage rows, {} contributor rows", result.usage.len(), result.contributors.len()))
            }

            ValidatedCommand::Delete { cube, force } => {
                let cube_id = parse_cube_id(&cube)?;
                if !force && !confirm_delete(&cube)? {
                    return Ok(format!("cube {cube} not deleted (not confirmed)"));
                }
                self.delete_cube
                    .execute(DeleteCubeCommand {
                        tenant: self.tenant.clone(),
                        requesting_owner: self.owner_id,
                        cube_id,
                    })
                    .await?;
                Ok(format!("deleted cube {cube_id}"))
            }
        }
    }
}

/// Interactive confirmation for a destructive delete, matching the
/// stdin-prompt convention the rest of this binary's CLI uses for
/// irreversible operations.
fn confirm_delete(cube: &str) -> Result<bool, CubeError> {
    print!("Delete cube {cube}? This cannot be undone. [y/N] ");
    io::stdout().flush().map_err(CubeError::from)?;
    let mut answer = String::new();
    io::stdin().read_line(&mut answer).map_err(CubeError::from)?;
    Ok(matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"))
}
