// /////////////////////////////////////////////////////////////////////////////
// Adaptive Pipeline RS
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # KeyPayload — the signed body of a licensing token
//!
//! Transient: minted by `GenKeyCube`, verified and consumed by `ImportCube`
//! and `ReKeyCube`, never persisted server-side in plaintext. The wire form
//! (`base64(json).base64(signature)`, `aes_key` as base64 text within the
//! JSON) is owned entirely by `cube::infrastructure::adapters::key_token`,
//! which depends on `base64` and `serde_json`; this type only carries the
//! validated, already-decoded values.

use chrono::{DateTime, Utc};

use crate::value_objects::{AesKey, ExportId, Permissions};

#[derive(Clone)]
pub struct KeyPayload {
    pub aes_key: AesKey,
    pub permissions: Permissions,
    pub expire_at: Option<DateTime<Utc>>,
    pub export_id: ExportId,
}

impl KeyPayload {
    pub fn new(aes_key: AesKey, permissions: Permissions, expire_at: Option<DateTime<Utc>>, export_id: ExportId) -> Self {
        Self {
            aes_key,
            permissions,
            expire_at,
            export_id,
        }
    }

    /// P7: a token is rejected once `expire_at < now`.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expire_at.is_some_and(|exp| exp < now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload(expire_at: Option<DateTime<Utc>>) -> KeyPayload {
        KeyPayload::new(AesKey::from_bytes(&[0u8; 32]).unwrap(), Permissions::unlimited(), expire_at, ExportId::from_db(1))
    }

    #[test]
    fn no_expiration_never_expires() {
        assert!(!payload(None).is_expired(DateTime::UNIX_EPOCH + chrono::Duration::days(9999)));
    }

    #[test]
    fn past_expiration_is_expired() {
        let exp = DateTime::UNIX_EPOCH;
        assert!(payload(Some(exp)).is_expired(exp + chrono::Duration::seconds(1)));
    }

    #[test]
    fn future_expiration_is_not_yet_expired() {
        let exp = DateTime::UNIX_EPOCH + chrono::Duration::hours(1);
        assert!(!payload(Some(exp)).is_expired(DateTime::UNIX_EPOCH));
    }
}
