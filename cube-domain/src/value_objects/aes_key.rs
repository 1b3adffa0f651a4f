// /////////////////////////////////////////////////////////////////////////////
// Adaptive Pipeline RS
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # AesKey — the 32-byte AES-256 session key (I6)
//!
//! `AesKey` is a domain-level wrapper enforcing invariant I6 ("`aes_key` size
//! is exactly 32 bytes") at construction time, and zeroizing its bytes on
//! drop via `zeroize` since this is the single secret that, once leaked,
//! lets a holder decrypt an entire Cube's inner archive.
//!
//! This type intentionally has no `Serialize`/`Deserialize` impl: the wire
//! form (`base64` inside `KeyPayload` JSON) is produced and parsed by the
//! `cube::infrastructure` token codec adapter, which owns the `base64`
//! dependency. The domain only ever sees raw, validated key bytes.

use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::CubeError;

pub const AES_KEY_LEN: usize = 32;

#[derive(Clone, ZeroizeOnDrop)]
pub struct AesKey([u8; AES_KEY_LEN]);

impl AesKey {
    /// Validates and wraps exactly 32 bytes.
    ///
    /// # Errors
    /// Returns [`CubeError::Malformed`] if `bytes` is not exactly
    /// [`AES_KEY_LEN`] long.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CubeError> {
        if bytes.len() != AES_KEY_LEN {
            return Err(CubeError::malformed(format!(
                "AES key must be exactly {AES_KEY_LEN} bytes, got {}",
                bytes.len()
            )));
        }
        let mut buf = [0u8; AES_KEY_LEN];
        buf.copy_from_slice(bytes);
        Ok(Self(buf))
    }

    pub fn as_bytes(&self) -> &[u8; AES_KEY_LEN] {
        &self.0
    }
}

impl std::fmt::Debug for AesKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AesKey").field("bytes", &"<redacted>").finish()
    }
}

impl Drop for AesKey {
    fn drop(&mut self) {
        self.0.zeroize();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_exactly_32_bytes() {
        assert!(AesKey::from_bytes(&[0u8; 32]).is_ok());
    }

    #[test]
    fn rejects_short_key() {
        assert!(AesKey::from_bytes(&[0u8; 16]).is_err());
    }

    #[test]
    fn rejects_long_key() {
        assert!(AesKey::from_bytes(&[0u8; 33]).is_err());
    }

    #[test]
    fn debug_never_prints_key_material() {
        let key = AesKey::from_bytes(&[0xAB; 32]).unwrap();
        assert!(!format!("{key:?}").contains("171"));
    }
}
