// /////////////////////////////////////////////////////////////////////////////
// Adaptive Pipeline RS
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # RandomIdGenerator — the production `IdGenerator` (§5)
//!
//! Cube UUIDs are v4 (random); `ExportCube` and `ImportCube` reserve them
//! through this port rather than calling `Uuid::new_v4()` directly, so tests
//! can substitute a deterministic sequence.

use cube_domain::services::IdGenerator;
use cube_domain::value_objects::CubeUuid;

#[derive(Debug, Default, Clone, Copy)]
pub struct RandomIdGenerator;

impl RandomIdGenerator {
    pub fn new() -> Self {
        Self
    }
}

impl IdGenerator for RandomIdGenerator {
    fn new_cube_uuid(&self) -> CubeUuid {
        CubeUuid::new_random()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn successive_uuids_differ() {
        let gen = RandomIdGenerator::new();
        assert_ne!(gen.new_cube_uuid(), gen.new_cube_uuid());
    }
}
