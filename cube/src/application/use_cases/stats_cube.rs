// /////////////////////////////////////////////////////////////////////////////
// Adaptive Pipeline
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Stats Cube Use Case
//!
//! Reads the usage and contributor statistics accumulated for a Cube,
//! gated by its own `allow_stats` grant.

use std::sync::Arc;

use cube_domain::error::CubeError;
use cube_domain::repositories::{CubeRepository, StatsRepository};
use tracing::info;

use crate::application::commands::{StatsCubeCommand, StatsCubeResult};

pub struct StatsCubeUseCase {
    cube_repository: Arc<dyn CubeRepository>,
    stats_repository: Arc<dyn StatsRepository>,
}

impl StatsCubeUseCase {
    pub fn new(cube_repository: Arc<dyn CubeRepository>, stats_repository: Arc<dyn StatsRepository>) -> Self {
        Self {
            cube_repository,
            stats_repository,
        }
    }

    pub async fn execute(&self, command: StatsCubeCommand) -> Result<StatsCubeResult, CubeError> {
        let cube = self
            .cube_repository
            .find_by_id(&command.tenant, command.cube_id)
            .await?
            .ok_or_else(|| CubeError::not_found(format!("cube {} not found", command.cube_id)))?;

        if !cube.permissions.allow_stats {
            return Err(CubeError::forbidden("this cube's grant does not allow reading stats"));
        }

        let usage = self.stats_repository.usage_for_cube(&command.tenant, command.cube_id).await?;
        let contributors = self.stats_repository.contributors_for_cube(&command.tenant, command.cube_id).await?;

        info!(cube_id = command.cube_id.value(), "stats read");

        Ok(StatsCubeResult { usage, contributors })
    }
}

#[cfg(test)]
mod tests {
    #[tokio::test]
    #[ignore] // Requires mock CubeRepository/StatsRepository
    async fn test_stats_rejects_when_allow_stats_is_false() {
        // See tests/integration for the end-to-end scenario (S7).
    }
}
