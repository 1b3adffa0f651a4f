// /////////////////////////////////////////////////////////////////////////////
// Adaptive Pipeline RS
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Tenant scoping and owner identity
//!
//! `TenantId` pairs the two scoping identifiers every persisted row carries
//! (`apx_id`, `vdr_id` — the host multi-tenant layer's application and vendor
//! partitions, out of scope per spec §1 but threaded through as opaque
//! scoping keys). `OwnerId` identifies the user that owns a Cube; ownership
//! checks (`GenKeyCube`, `ReKeyCube`, `DeleteCube`) compare `OwnerId` values
//! directly.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TenantId {
    pub apx_id: String,
    pub vdr_id: String,
}

impl TenantId {
    pub fn new(apx_id: impl Into<String>, vdr_id: impl Into<String>) -> Self {
        Self {
            apx_id: apx_id.into(),
            vdr_id: vdr_id.into(),
        }
    }
}

impl fmt::Display for TenantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.apx_id, self.vdr_id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct OwnerId(i64);

impl OwnerId {
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for OwnerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
