// /////////////////////////////////////////////////////////////////////////////
// Adaptive Pipeline
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Delete Cube Use Case
//!
//! Removes a Cube along with its exports, lineage, and stats rows inside
//! one transaction (`CubeRepository::delete_cascade_transactional`, §4.6),
//! then best-effort deletes its inner store. Only the owner may delete.
//! Per OQ3 (design notes §9), the database rows are the authoritative
//! record: if the store deletion fails after the rows are gone, this
//! surfaces as an error but does not attempt to resurrect the rows.

use std::sync::Arc;

use cube_bootstrap::shutdown::CancellationToken;
use cube_domain::aggregates::CubeAggregate;
use cube_domain::error::CubeError;
use cube_domain::repositories::CubeRepository;
use cube_domain::services::{Clock, CubeStoreAdapter};
use tracing::info;

use crate::application::commands::{DeleteCubeCommand, DeleteCubeResult};

pub struct DeleteCubeUseCase {
    cube_repository: Arc<dyn CubeRepository>,
    cube_store: Arc<dyn CubeStoreAdapter>,
    clock: Arc<dyn Clock>,
    cancellation: CancellationToken,
}

impl DeleteCubeUseCase {
    pub fn new(cube_repository: Arc<dyn CubeRepository>, cube_store: Arc<dyn CubeStoreAdapter>, clock: Arc<dyn Clock>, cancellation: CancellationToken) -> Self {
        Self {
            cube_repository,
            cube_store,
            clock,
            cancellation,
        }
    }

    pub async fn execute(&self, command: DeleteCubeCommand) -> Result<DeleteCubeResult, CubeError> {
        let now = self.clock.now();

        let cube = self
            .cube_repository
            .find_by_id(&command.tenant, command.cube_id)
            .await?
            .ok_or_else(|| CubeError::not_found(format!("cube {} not found", command.cube_id)))?;

        let mut aggregate = CubeAggregate::load(cube.clone());
        aggregate.delete(command.requesting_owner, now)?;

        if self.cancellation.is_cancelled() {
            return Err(CubeError::Cancelled);
        }
        self.cube_repository.delete_cascade_transactional(&command.tenant, cube.id).await?;

        self.cube_store.delete(&command.tenant, cube.owner_id, cube.uuid).await?;

        info!(cube_id = command.cube_id.value(), "cube deleted");

        Ok(DeleteCubeResult)
    }
}

#[cfg(test)]
mod tests {
    #[tokio::test]
    #[ignore] // Requires mock repositories and CubeStoreAdapter
    async fn test_delete_rejects_non_owner() {
        // See tests/integration for the end-to-end scenario.
    }
}
