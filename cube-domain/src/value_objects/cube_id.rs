// /////////////////////////////////////////////////////////////////////////////
// Adaptive Pipeline RS
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # CubeId — monotonic integer identity
//!
//! The persistence-assigned primary key of a Cube. Unlike [`super::cube_uuid::CubeUuid`]
//! (which is portable and travels inside an exported envelope), a `CubeId` is
//! only meaningful within this deployment's store and is never exported.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A Cube's monotonic, store-assigned integer identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CubeId(i64);

impl CubeId {
    /// Wraps an id already assigned by the store (e.g. `last_insert_rowid()`).
    pub fn from_db(id: i64) -> Self {
        Self(id)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for CubeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<CubeId> for i64 {
    fn from(id: CubeId) -> Self {
        id.0
    }
}
