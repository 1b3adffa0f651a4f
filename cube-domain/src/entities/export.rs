// /////////////////////////////////////////////////////////////////////////////
// Adaptive Pipeline RS
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Export — the server-side record retaining an envelope's RSA private key
//!
//! An `Export` row is created in the same transaction that consumes
//! `export_limit` (I5), and is the only place the envelope's RSA private key
//! is retained (I4): the envelope itself carries only the public half. A new
//! envelope without a matching `Export` row can never be tokenized, which is
//! what keeps `GenKeyCube` from forging tokens against a replayed envelope.

use chrono::{DateTime, Utc};

use crate::value_objects::{CubeId, CubeUuid, ExportId, TenantId};

#[derive(Debug, Clone, PartialEq)]
pub struct Export {
    pub id: ExportId,
    pub cube_id: CubeId,
    /// Reserved identity the future imported child Cube will assume.
    pub new_uuid: CubeUuid,
    /// `sha256_hex` of the outer envelope's `encrypted_data.bin` (I4).
    pub hash: String,
    /// PKCS#1 PEM, `"RSA PRIVATE KEY"` — never leaves this row.
    pub private_key_pem: String,
    pub tenant: TenantId,
    pub created_at: DateTime<Utc>,
}

impl Export {
    pub fn new(
        id: ExportId,
        cube_id: CubeId,
        new_uuid: CubeUuid,
        hash: impl Into<String>,
        private_key_pem: impl Into<String>,
        tenant: TenantId,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            cube_id,
            new_uuid,
            hash: hash.into(),
            private_key_pem: private_key_pem.into(),
            tenant,
            created_at: now,
        }
    }
}
