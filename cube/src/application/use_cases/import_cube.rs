// /////////////////////////////////////////////////////////////////////////////
// Adaptive Pipeline
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Import Cube Use Case
//!
//! Materializes a brand-new Cube from an envelope plus a licensing token
//! (§4.4): verifies the token was minted for this exact envelope (P3 — a
//! token cannot be replayed against a different export), decrypts the inner
//! archive under the token's AES key, writes the inner store, then inserts
//! the Cube row together with its carried lineage and stats rows inside one
//! transaction (`CubeRepository::insert_with_carried_history`, §4.6/§9), so a
//! crash never leaves a Cube row with missing history. No limit is consumed
//! on the source Cube; the token itself is the grant.

use std::sync::Arc;

use cube_bootstrap::shutdown::CancellationToken;
use cube_domain::aggregates::CubeAggregate;
use cube_domain::entities::Cube;
use cube_domain::error::CubeError;
use cube_domain::repositories::CubeRepository;
use cube_domain::services::{Clock, CryptoEngine, CubeStoreAdapter, EnvelopeCodec, IdGenerator, KeyTokenCodec};
use tracing::{info, warn};

use crate::application::commands::{ImportCubeCommand, ImportCubeResult};

pub struct ImportCubeUseCase {
    cube_repository: Arc<dyn CubeRepository>,
    cube_store: Arc<dyn CubeStoreAdapter>,
    crypto: Arc<dyn CryptoEngine>,
    envelope_codec: Arc<dyn EnvelopeCodec>,
    key_token_codec: Arc<dyn KeyTokenCodec>,
    id_generator: Arc<dyn IdGenerator>,
    clock: Arc<dyn Clock>,
    cancellation: CancellationToken,
}

impl ImportCubeUseCase {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        cube_repository: Arc<dyn CubeRepository>,
        cube_store: Arc<dyn CubeStoreAdapter>,
        crypto: Arc<dyn CryptoEngine>,
        envelope_codec: Arc<dyn EnvelopeCodec>,
        key_token_codec: Arc<dyn KeyTokenCodec>,
        id_generator: Arc<dyn IdGenerator>,
        clock: Arc<dyn Clock>,
        cancellation: CancellationToken,
    ) -> Self {
        Self {
            cube_repository,
            cube_store,
            crypto,
            envelope_codec,
            key_token_codec,
            id_generator,
            clock,
            cancellation,
        }
    }

    pub async fn execute(&self, command: ImportCubeCommand) -> Result<ImportCubeResult, CubeError> {
        let now = self.clock.now();

        let outer = self.envelope_codec.parse_outer(&command.envelope_bytes)?;
        let decoded = self.key_token_codec.decode(&command.token)?;

        if decoded.payload.export_id != outer.export_id {
            return Err(CubeError::forbidden("licensing token was not minted for this envelope"));
        }
        if decoded.payload.is_expired(now) {
            return Err(CubeError::forbidden("licensing token has expired"));
        }

        let crypto = self.crypto.clone();
        let public_key_pem = outer.public_key_pem.clone();
        let payload_json = decoded.payload_json.clone();
        let signature = decoded.signature.clone();
        tokio::task::spawn_blocking(move || crypto.rsa_pss_verify(&public_key_pem, &payload_json, &signature))
            .await
            .map_err(|e| CubeError::internal(format!("token signature verification task panicked: {e}")))??;

        let crypto = self.crypto.clone();
        let encrypted_data = outer.encrypted_data.clone();
        let aes_key = decoded.payload.aes_key.clone();
        let inner_bytes = tokio::task::spawn_blocking(move || crypto.aes_gcm_decrypt(&encrypted_data, &aes_key))
            .await
            .map_err(|e| CubeError::internal(format!("inner archive decryption task panicked: {e}")))??;

        let inner = self.envelope_codec.parse_inner(&inner_bytes)?;

        let new_uuid = self.id_generator.new_cube_uuid();
        let name = format!("imported-{new_uuid}");
        let draft = Cube::new_imported(
            cube_domain::value_objects::CubeId::from_db(0),
            new_uuid,
            command.owner_id,
            name,
            None,
            decoded.payload.permissions,
            decoded.payload.expire_at,
            decoded.payload.export_id,
            inner.embedding_config.clone(),
            command.tenant.clone(),
            now,
        );
        let mut aggregate = CubeAggregate::load(draft);
        aggregate.record_import(decoded.payload.export_id, now);
        let (cube, _events) = aggregate.into_parts();

        if self.cancellation.is_cancelled() {
            return Err(CubeError::Cancelled);
        }
        self.cube_store.create(&command.tenant, cube.owner_id, cube.uuid).await?;
        self.cube_store.write_bytes(&command.tenant, cube.owner_id, cube.uuid, &inner.db_bytes).await?;

        if self.cancellation.is_cancelled() {
            self.cleanup_store(&command.tenant, cube.owner_id, cube.uuid).await;
            return Err(CubeError::Cancelled);
        }

        // Cube row, lineage, and stats are inserted inside one transaction
        // (§4.6, §9): a crash here either leaves nothing or leaves the whole
        // imported Cube, never an orphan row missing its history.
        let inserted = match self.cube_repository.insert_with_carried_history(&cube, &inner.lineage, &inner.usage_stats, &inner.contributor_stats).await {
            Ok(inserted) => inserted,
            Err(e) => {
                self.cleanup_store(&command.tenant, cube.owner_id, cube.uuid).await;
                return Err(e);
            }
        };

        info!(cube_id = inserted.id.value(), export_id = outer.export_id.value(), "cube imported");

        Ok(ImportCubeResult { cube: inserted })
    }

    async fn cleanup_store(&self, tenant: &cube_domain::value_objects::TenantId, owner_id: cube_domain::value_objects::OwnerId, uuid: cube_domain::value_objects::CubeUuid) {
        if let Err(e) = self.cube_store.delete(tenant, owner_id, uuid).await {
            warn!(error = %e, "failed to roll back inner store after import failure");
        }
    }
}

#[cfg(test)]
mod tests {
    #[tokio::test]
    #[ignore] // Requires mock repositories, crypto engine, and envelope/token codecs
    async fn test_import_rejects_token_minted_for_a_different_export() {
        // See tests/integration for the end-to-end scenario (S5/P3).
    }
}
