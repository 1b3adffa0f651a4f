// /////////////////////////////////////////////////////////////////////////////
// Adaptive Pipeline
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # ReKey Cube Use Case
//!
//! Replaces an imported Cube's permissions and expiration using a fresh
//! licensing token (§4.4), consuming `rekey_limit`. Only an imported Cube
//! (`source_export_id.is_some()`) can be re-keyed, and the token must have
//! been minted against that same export — re-keying does not re-check the
//! token's grant against the original source Cube's permissions (OQ2): the
//! export's own signature is the only authority consulted here.

use std::sync::Arc;

use cube_bootstrap::shutdown::CancellationToken;
use cube_domain::aggregates::CubeAggregate;
use cube_domain::error::CubeError;
use cube_domain::repositories::{CubeRepository, ExportRepository};
use cube_domain::services::{Clock, CryptoEngine, KeyTokenCodec};
use tracing::info;

use crate::application::commands::{ReKeyCubeCommand, ReKeyCubeResult};

pub struct ReKeyCubeUseCase {
    cube_repository: Arc<dyn CubeRepository>,
    export_repository: Arc<dyn ExportRepository>,
    crypto: Arc<dyn CryptoEngine>,
    key_token_codec: Arc<dyn KeyTokenCodec>,
    clock: Arc<dyn Clock>,
    cancellation: CancellationToken,
}

impl ReKeyCubeUseCase {
    #[allow(clippy::too_many_arguments)]
    pub fn new(cube_repository: Arc<dyn CubeRepository>, export_repository: Arc<dyn ExportRepository>, crypto: Arc<dyn CryptoEngine>, key_token_codec: Arc<dyn KeyTokenCodec>, clock: Arc<dyn Clock>, cancellation: CancellationToken) -> Self {
        Self {
            cube_repository,
            export_repository,
            crypto,
            key_token_codec,
            clock,
            cancellation,
        }
    }

    pub async fn execute(&self, command: ReKeyCubeCommand) -> Result<ReKeyCubeResult, CubeError> {
        let now = self.clock.now();

        let cube = self
            .cube_repository
            .find_by_id(&command.tenant, command.cube_id)
            .await?
            .ok_or_else(|| CubeError::not_found(format!("cube {} not found", command.cube_id)))?;

        if !cube.is_owned_by(command.requesting_owner) {
            return Err(CubeError::unauthorized("only the owning user may rekey a cube"));
        }

        let source_export_id = cube.source_export_id.ok_or_else(|| CubeError::forbidden("rekey requires an imported cube with a source export"))?;

        let decoded = self.key_token_codec.decode(&command.token)?;
        if decoded.payload.export_id != source_export_id {
            return Err(CubeError::forbidden("token was not minted for this cube's source export"));
        }
        if decoded.payload.is_expired(now) {
            return Err(CubeError::forbidden("licensing token has expired"));
        }

        let export = self
            .export_repository
            .find_by_id(&command.tenant, source_export_id)
            .await?
            .ok_or_else(|| CubeError::not_found(format!("export {source_export_id} not found")))?;

        let crypto = self.crypto.clone();
        let private_key_pem = export.private_key_pem.clone();
        let payload_json = decoded.payload_json.clone();
        let signature = decoded.signature.clone();
        tokio::task::spawn_blocking(move || {
            let public_key_pem = crypto.rsa_public_key_pem_from_private(&private_key_pem)?;
            crypto.rsa_pss_verify(&public_key_pem, &payload_json, &signature)
        })
        .await
        .map_err(|e| CubeError::internal(format!("token signature verification task panicked: {e}")))??;

        let new_permissions = decoded.payload.permissions;
        let new_expire_at = decoded.payload.expire_at;

        let mut fast_fail = CubeAggregate::load(cube.clone());
        fast_fail.rekey(new_permissions.clone(), new_expire_at, now)?;

        if self.cancellation.is_cancelled() {
            return Err(CubeError::Cancelled);
        }
        let updated_cube = self
            .cube_repository
            .consume_rekey_and_replace_transactional(&command.tenant, command.cube_id, new_permissions, new_expire_at, now)
            .await?;

        info!(cube_id = command.cube_id.value(), "cube rekeyed");

        Ok(ReKeyCubeResult { cube: updated_cube })
    }
}
