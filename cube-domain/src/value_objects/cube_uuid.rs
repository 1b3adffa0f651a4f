// /////////////////////////////////////////////////////////////////////////////
// Adaptive Pipeline RS
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # CubeUuid — the portable, 128-bit identity carried across export/import
//!
//! Unlike [`super::cube_id::CubeId`], a `CubeUuid` travels: it is the
//! identity recorded in lineage rows, and `ExportCube` reserves a fresh
//! `CubeUuid` to be assumed by the Cube a future `ImportCube` will create.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CubeUuid(Uuid);

impl CubeUuid {
    /// Reserves a fresh, random (v4) Cube identity.
    pub fn new_random() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl fmt::Display for CubeUuid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Uuid> for CubeUuid {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl From<CubeUuid> for Uuid {
    fn from(id: CubeUuid) -> Self {
        id.0
    }
}
