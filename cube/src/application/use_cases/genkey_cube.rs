// /////////////////////////////////////////////////////////////////////////////
// Adaptive Pipeline
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # GenKey Cube Use Case
//!
//! Mints a licensing token against a previously exported envelope (§4.4):
//! verifies the envelope's signature, checks the requested grant doesn't
//! exceed the source Cube's own permissions (I4), then signs a `KeyPayload`
//! carrying the unwrapped AES key under the export's own RSA key. Consumes
//! `genkey_limit` on the source Cube, not on the envelope.

use std::sync::Arc;

use cube_bootstrap::shutdown::CancellationToken;
use cube_domain::aggregates::CubeAggregate;
use cube_domain::entities::KeyPayload;
use cube_domain::error::CubeError;
use cube_domain::repositories::{CubeRepository, ExportRepository};
use cube_domain::services::{check_inheritance, Clock, CryptoEngine, EnvelopeCodec, KeyTokenCodec};
use cube_domain::value_objects::{AesKey, PermissionField};
use tracing::info;

use crate::application::commands::{GenKeyCubeCommand, GenKeyCubeResult};

pub struct GenKeyCubeUseCase {
    cube_repository: Arc<dyn CubeRepository>,
    export_repository: Arc<dyn ExportRepository>,
    crypto: Arc<dyn CryptoEngine>,
    envelope_codec: Arc<dyn EnvelopeCodec>,
    key_token_codec: Arc<dyn KeyTokenCodec>,
    clock: Arc<dyn Clock>,
    cancellation: CancellationToken,
}

impl GenKeyCubeUseCase {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        cube_repository: Arc<dyn CubeRepository>,
        export_repository: Arc<dyn ExportRepository>,
        crypto: Arc<dyn CryptoEngine>,
        envelope_codec: Arc<dyn EnvelopeCodec>,
        key_token_codec: Arc<dyn KeyTokenCodec>,
        clock: Arc<dyn Clock>,
        cancellation: CancellationToken,
    ) -> Self {
        Self {
            cube_repository,
            export_repository,
            crypto,
            envelope_codec,
            key_token_codec,
            clock,
            cancellation,
        }
    }

    pub async fn execute(&self, command: GenKeyCubeCommand) -> Result<GenKeyCubeResult, CubeError> {
        let now = self.clock.now();

        let outer = self.envelope_codec.parse_outer(&command.envelope_bytes)?;

        let export = self
            .export_repository
            .find_by_id(&command.tenant, outer.export_id)
            .await?
            .ok_or_else(|| CubeError::not_found(format!("export {} not found", outer.export_id)))?;

        let source_cube = self
            .cube_repository
            .find_by_id(&command.tenant, export.cube_id)
            .await?
            .ok_or_else(|| CubeError::not_found(format!("cube {} not found", export.cube_id)))?;

        if !source_cube.is_owned_by(command.requesting_owner) {
            return Err(CubeError::forbidden("only the source cube's owner may mint a licensing token for it"));
        }

        if source_cube.permissions.genkey_limit.is_forbidden() {
            return Err(CubeError::forbidden("genkey_limit is forbidden"));
        }

        check_inheritance(
            &source_cube.permissions,
            &command.requested_permissions,
            source_cube.expire_at,
            command.requested_expire_at,
        )?;

        let crypto = self.crypto.clone();
        let public_key_pem = outer.public_key_pem.clone();
        let encrypted_data = outer.encrypted_data.clone();
        let signature = outer.signature.clone();
        tokio::task::spawn_blocking(move || crypto.rsa_pss_verify(&public_key_pem, &encrypted_data, &signature))
            .await
            .map_err(|e| CubeError::internal(format!("signature verification task panicked: {e}")))??;

        let crypto = self.crypto.clone();
        let private_key_pem = export.private_key_pem.clone();
        let encrypted_aes_key = outer.encrypted_aes_key.clone();
        let aes_key_bytes = tokio::task::spawn_blocking(move || crypto.rsa_oaep_decrypt(&private_key_pem, &encrypted_aes_key))
            .await
            .map_err(|e| CubeError::internal(format!("key unwrap task panicked: {e}")))??;
        let aes_key = AesKey::from_bytes(&aes_key_bytes)?;

        let payload = KeyPayload::new(aes_key, command.requested_permissions, command.requested_expire_at, export.id);

        let crypto = self.crypto.clone();
        let key_token_codec = self.key_token_codec.clone();
        let private_key_pem = export.private_key_pem.clone();
        let payload_for_signing = payload.clone();
        let signature = tokio::task::spawn_blocking(move || {
            let payload_bytes = key_token_codec.payload_bytes(&payload_for_signing)?;
            crypto.rsa_pss_sign(&private_key_pem, &payload_bytes)
        })
        .await
        .map_err(|e| CubeError::internal(format!("token signing task panicked: {e}")))??;

        if self.cancellation.is_cancelled() {
            return Err(CubeError::Cancelled);
        }
        self.cube_repository
            .consume_limit_transactional(&command.tenant, source_cube.id, PermissionField::Genkey, now)
            .await?;

        let mut aggregate = CubeAggregate::load(source_cube);
        aggregate.genkey(export.id, now)?;

        let token = self.key_token_codec.encode(&payload, &signature)?;

        info!(export_id = export.id.value(), "licensing token minted");

        Ok(GenKeyCubeResult { token })
    }
}
