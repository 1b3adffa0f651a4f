// /////////////////////////////////////////////////////////////////////////////
// Adaptive Pipeline
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Absorb Cube Use Case
//!
//! Feeds new content into an existing Cube's inner store, then consumes
//! `absorb_limit` and accumulates the usage/contributor counters for it
//! inside one transaction (`CubeRepository::consume_absorb_and_accumulate_transactional`,
//! §4.6).
//!
//! Per OQ1 (design notes §9), the inner-store write happens before that
//! transaction. If the transaction then fails, the content has already
//! landed in the store with nothing decremented or accumulated — a
//! documented skew this use case accepts rather than tries to paper over
//! with a two-phase commit the ports don't support.

use std::sync::Arc;

use cube_bootstrap::shutdown::CancellationToken;
use cube_domain::aggregates::CubeAggregate;
use cube_domain::error::CubeError;
use cube_domain::repositories::CubeRepository;
use cube_domain::services::{Clock, CubeStoreAdapter};
use tracing::info;

use crate::application::commands::{AbsorbCubeCommand, AbsorbCubeResult};

pub struct AbsorbCubeUseCase {
    cube_repository: Arc<dyn CubeRepository>,
    cube_store: Arc<dyn CubeStoreAdapter>,
    clock: Arc<dyn Clock>,
    cancellation: CancellationToken,
}

impl AbsorbCubeUseCase {
    pub fn new(cube_repository: Arc<dyn CubeRepository>, cube_store: Arc<dyn CubeStoreAdapter>, clock: Arc<dyn Clock>, cancellation: CancellationToken) -> Self {
        Self {
            cube_repository,
            cube_store,
            clock,
            cancellation,
        }
    }

    pub async fn execute(&self, command: AbsorbCubeCommand) -> Result<AbsorbCubeResult, CubeError> {
        let now = self.clock.now();

        let cube = self
            .cube_repository
            .find_by_id(&command.tenant, command.cube_id)
            .await?
            .ok_or_else(|| CubeError::not_found(format!("cube {} not found", command.cube_id)))?;

        // Fast-fail only; the repository's transactional consume re-checks
        // this against a value it re-reads itself (§5).
        let mut fast_fail = CubeAggregate::load(cube.clone());
        fast_fail.absorb(now)?;

        if self.cancellation.is_cancelled() {
            return Err(CubeError::Cancelled);
        }
        self.cube_store.absorb(&command.tenant, cube.owner_id, cube.uuid, &command.content).await?;

        if self.cancellation.is_cancelled() {
            return Err(CubeError::Cancelled);
        }
        let (updated_cube, usage, contributor) = self
            .cube_repository
            .consume_absorb_and_accumulate_transactional(&command.tenant, command.cube_id, &command.memory_group, &command.model_name, &command.action_type, command.contributor_owner_id, now)
            .await?;

        info!(cube_id = command.cube_id.value(), "cube absorbed content");

        Ok(AbsorbCubeResult {
            cube: updated_cube,
            usage,
            contributor,
        })
    }
}

#[cfg(test)]
mod tests {
    #[tokio::test]
    #[ignore] // Requires mock CubeRepository/StatsRepository/CubeStoreAdapter
    async fn test_absorb_rejects_forbidden_limit_without_touching_store() {
        // See tests/integration for the end-to-end scenario (S2).
    }
}
