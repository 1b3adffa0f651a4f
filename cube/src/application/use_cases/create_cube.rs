// /////////////////////////////////////////////////////////////////////////////
// Adaptive Pipeline
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Create Cube Use Case
//!
//! Registers a brand-new, empty Cube owned by the calling user: every
//! permission limit starts `Unlimited` (I1), there is no source export, and
//! the inner store is an empty file the Cube will later absorb content
//! into. If the inner store cannot be created after the row is inserted,
//! the row is rolled back so a Cube never outlives its own store (§4.6).

use std::sync::Arc;

use cube_bootstrap::shutdown::CancellationToken;
use cube_domain::aggregates::CubeAggregate;
use cube_domain::entities::Cube;
use cube_domain::error::CubeError;
use cube_domain::repositories::CubeRepository;
use cube_domain::services::{Clock, CubeStoreAdapter, IdGenerator};
use tracing::{info, warn};

use crate::application::commands::{CreateCubeCommand, CreateCubeResult};

pub struct CreateCubeUseCase {
    cube_repository: Arc<dyn CubeRepository>,
    cube_store: Arc<dyn CubeStoreAdapter>,
    id_generator: Arc<dyn IdGenerator>,
    clock: Arc<dyn Clock>,
    cancellation: CancellationToken,
}

impl CreateCubeUseCase {
    pub fn new(cube_repository: Arc<dyn CubeRepository>, cube_store: Arc<dyn CubeStoreAdapter>, id_generator: Arc<dyn IdGenerator>, clock: Arc<dyn Clock>, cancellation: CancellationToken) -> Self {
        Self {
            cube_repository,
            cube_store,
            id_generator,
            clock,
            cancellation,
        }
    }

    pub async fn execute(&self, command: CreateCubeCommand) -> Result<CreateCubeResult, CubeError> {
        let now = self.clock.now();
        let uuid = self.id_generator.new_cube_uuid();

        info!(cube_name = %command.name, owner_id = command.owner_id.value(), "creating cube");

        let draft = Cube::new_created(
            cube_domain::value_objects::CubeId::from_db(0),
            uuid,
            command.owner_id,
            command.name,
            command.description,
            command.embedding_config,
            command.tenant.clone(),
            now,
        );
        let aggregate = CubeAggregate::create(draft);
        let (cube, _events) = aggregate.into_parts();

        if self.cancellation.is_cancelled() {
            return Err(CubeError::Cancelled);
        }
        let inserted = self.cube_repository.insert(&cube).await?;

        if self.cancellation.is_cancelled() {
            if let Err(cleanup_err) = self.cube_repository.delete(&command.tenant, inserted.id).await {
                warn!(cube_id = inserted.id.value(), error = %cleanup_err, "failed to roll back cube row after cancellation");
            }
            return Err(CubeError::Cancelled);
        }
        if let Err(store_err) = self.cube_store.create(&command.tenant, inserted.owner_id, inserted.uuid).await {
            warn!(cube_id = inserted.id.value(), error = %store_err, "inner store creation failed, rolling back cube row");
            if let Err(cleanup_err) = self.cube_repository.delete(&command.tenant, inserted.id).await {
                warn!(cube_id = inserted.id.value(), error = %cleanup_err, "failed to roll back cube row after store creation failure");
            }
            return Err(store_err);
        }

        info!(cube_id = inserted.id.value(), "cube created");
        Ok(CreateCubeResult { cube: inserted })
    }
}

#[cfg(test)]
mod tests {
    // Use-case tests exercise mocked ports; full transactional behavior is
    // covered by the sqlite repository tests and tests/integration.

    #[tokio::test]
    #[ignore] // Requires mock CubeRepository/CubeStoreAdapter
    async fn test_create_cube_deletes_row_when_store_creation_fails() {
        // See tests/integration for the end-to-end scenario (S1).
    }
}
