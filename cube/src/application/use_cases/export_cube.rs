// /////////////////////////////////////////////////////////////////////////////
// Adaptive Pipeline
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Export Cube Use Case
//!
//! Builds a portable envelope from an existing Cube (§4.3): gathers its
//! lineage and stats, packs them with the inner store into the inner
//! archive, seals the inner archive under a fresh AES key, wraps that key
//! and signs the ciphertext under a fresh RSA key pair, then consumes
//! `export_limit` and records the matching `Export` row in one transaction.
//!
//! The crypto steps are CPU-bound and synchronous (§5); they run on
//! `spawn_blocking` rather than the async executor.

use std::sync::Arc;

use cube_bootstrap::shutdown::CancellationToken;
use cube_domain::aggregates::CubeAggregate;
use cube_domain::entities::LineageEntry;
use cube_domain::error::CubeError;
use cube_domain::repositories::{CubeRepository, ExportRepository, LineageRepository, NewExport, StatsRepository};
use cube_domain::services::{Clock, CryptoEngine, CubeStoreAdapter, EnvelopeCodec, IdGenerator, InnerArchive, OuterEnvelope, OwnerDirectory};

use crate::application::commands::{ExportCubeCommand, ExportCubeResult};
use tracing::info;

pub struct ExportCubeUseCase {
    cube_repository: Arc<dyn CubeRepository>,
    export_repository: Arc<dyn ExportRepository>,
    lineage_repository: Arc<dyn LineageRepository>,
    stats_repository: Arc<dyn StatsRepository>,
    cube_store: Arc<dyn CubeStoreAdapter>,
    owner_directory: Arc<dyn OwnerDirectory>,
    crypto: Arc<dyn CryptoEngine>,
    envelope_codec: Arc<dyn EnvelopeCodec>,
    id_generator: Arc<dyn IdGenerator>,
    clock: Arc<dyn Clock>,
    cancellation: CancellationToken,
}

/// Output of the blocking crypto stage: everything the outer envelope and
/// the `Export` row need, computed off the async executor.
struct SealedEnvelope {
    encrypted_data: Vec<u8>,
    signature: Vec<u8>,
    public_key_pem: String,
    encrypted_aes_key: Vec<u8>,
    private_key_pem: String,
    hash: String,
}

impl ExportCubeUseCase {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        cube_repository: Arc<dyn CubeRepository>,
        export_repository: Arc<dyn ExportRepository>,
        lineage_repository: Arc<dyn LineageRepository>,
        stats_repository: Arc<dyn StatsRepository>,
        cube_store: Arc<dyn CubeStoreAdapter>,
        owner_directory: Arc<dyn OwnerDirectory>,
        crypto: Arc<dyn CryptoEngine>,
        envelope_codec: Arc<dyn EnvelopeCodec>,
        id_generator: Arc<dyn IdGenerator>,
        clock: Arc<dyn Clock>,
        cancellation: CancellationToken,
    ) -> Self {
        Self {
            cube_repository,
            export_repository,
            lineage_repository,
            stats_repository,
            cube_store,
            owner_directory,
            crypto,
            envelope_codec,
            id_generator,
            clock,
            cancellation,
        }
    }

    pub async fn execute(&self, command: ExportCubeCommand) -> Result<ExportCubeResult, CubeError> {
        let now = self.clock.now();

        let cube = self
            .cube_repository
            .find_by_id(&command.tenant, command.cube_id)
            .await?
            .ok_or_else(|| CubeError::not_found(format!("cube {} not found", command.cube_id)))?;

        if cube.permissions.export_limit.is_forbidden() {
            return Err(CubeError::forbidden("export_limit is forbidden"));
        }

        let ancestors = self.lineage_repository.ancestors_of(&command.tenant, command.cube_id).await?;
        let owner_name = self.owner_directory.display_name(&command.tenant, cube.owner_id).await?;
        let mut lineage = ancestors;
        let generation = lineage.len() as u32 + 1;
        lineage.push(LineageEntry::new(cube.id, cube.uuid, owner_name, now.timestamp_millis(), generation));

        let usage_stats = self.stats_repository.usage_for_cube(&command.tenant, command.cube_id).await?;
        let contributor_stats = self.stats_repository.contributors_for_cube(&command.tenant, command.cube_id).await?;

        if self.cancellation.is_cancelled() {
            return Err(CubeError::Cancelled);
        }
        let db_bytes = self.cube_store.read_bytes(&command.tenant, cube.owner_id, cube.uuid).await?;

        let inner = InnerArchive {
            db_bytes,
            lineage,
            usage_stats,
            contributor_stats,
            embedding_config: cube.embedding_config.clone(),
        };
        let inner_bytes = self.envelope_codec.build_inner(&inner)?;

        let crypto = self.crypto.clone();
        let sealed = tokio::task::spawn_blocking(move || seal_inner_archive(crypto.as_ref(), &inner_bytes))
            .await
            .map_err(|e| CubeError::internal(format!("export crypto task panicked: {e}")))??;

        let new_uuid = self.id_generator.new_cube_uuid();
        let new_export = NewExport {
            cube_id: cube.id,
            new_uuid,
            hash: sealed.hash,
            private_key_pem: sealed.private_key_pem,
            tenant: command.tenant.clone(),
        };

        if self.cancellation.is_cancelled() {
            return Err(CubeError::Cancelled);
        }
        let (_updated_cube, export) = self
            .export_repository
            .create_with_limit_consumption(&command.tenant, cube.id, new_export, now)
            .await?;

        let mut aggregate = CubeAggregate::load(cube);
        aggregate.export(export.id, now)?;

        let outer = OuterEnvelope {
            encrypted_data: sealed.encrypted_data,
            signature: sealed.signature,
            public_key_pem: sealed.public_key_pem,
            encrypted_aes_key: sealed.encrypted_aes_key,
            export_id: export.id,
        };
        let envelope_bytes = self.envelope_codec.build_outer(&outer)?;

        info!(cube_id = command.cube_id.value(), export_id = export.id.value(), "cube exported");

        Ok(ExportCubeResult {
            envelope_bytes,
            export_id: export.id,
        })
    }
}

fn seal_inner_archive(crypto: &dyn CryptoEngine, inner_bytes: &[u8]) -> Result<SealedEnvelope, CubeError> {
    let aes_key = crypto.generate_aes_key();
    let nonce = crypto.generate_nonce();
    let encrypted_data = crypto.aes_gcm_encrypt(inner_bytes, &aes_key, nonce)?;

    let rsa_pair = crypto.generate_rsa_keypair()?;
    let encrypted_aes_key = crypto.rsa_oaep_encrypt(&rsa_pair.public_key_pem, aes_key.as_bytes())?;
    let signature = crypto.rsa_pss_sign(&rsa_pair.private_key_pem, &encrypted_data)?;
    let hash = crypto.sha256_hex(&encrypted_data);

    Ok(SealedEnvelope {
        encrypted_data,
        signature,
        public_key_pem: rsa_pair.public_key_pem,
        encrypted_aes_key,
        private_key_pem: rsa_pair.private_key_pem,
        hash,
    })
}
