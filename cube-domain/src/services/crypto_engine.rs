// /////////////////////////////////////////////////////////////////////////////
// Adaptive Pipeline RS
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # CryptoEngine — the cryptographic primitives port (§4.2)
//!
//! The domain defines only the contract; concrete AES-GCM/RSA/SHA-256
//! backends live in `cube::infrastructure::adapters::crypto` (the `aes-gcm`,
//! `rsa`, `sha2`, `signature` crates are infrastructure dependencies, not
//! domain ones). Every method here is synchronous — §5 notes the crypto
//! primitives are CPU-bound, not suspension points.
//!
//! Implementations MUST NOT include key material or plaintext in any
//! [`CubeError`] they return (§7).

use crate::error::CubeError;
use crate::value_objects::AesKey;

/// GCM nonce length in bytes (I6): the convention this subsystem uses for
/// every AES-GCM seal.
pub const AES_GCM_NONCE_LEN: usize = 12;

/// RSA modulus size in bits (I7).
pub const RSA_KEY_BITS: usize = 2048;

#[derive(Debug, Clone)]
pub struct RsaKeyPair {
    /// PKCS#1 PEM, type `"RSA PRIVATE KEY"`.
    pub private_key_pem: String,
    /// PKCS#1 PEM, type `"RSA PUBLIC KEY"`.
    pub public_key_pem: String,
}

pub trait CryptoEngine: Send + Sync {
    /// 2048-bit RSA key pair generation (I7).
    fn generate_rsa_keypair(&self) -> Result<RsaKeyPair, CubeError>;

    /// A fresh random 32-byte AES-256 key.
    fn generate_aes_key(&self) -> AesKey;

    /// A fresh random 12-byte GCM nonce.
    fn generate_nonce(&self) -> [u8; AES_GCM_NONCE_LEN];

    /// Seals `plaintext` under `key` with `nonce`, returning
    /// `nonce || gcm_seal_output` per the wire convention of §4.2/§6.
    fn aes_gcm_encrypt(&self, plaintext: &[u8], key: &AesKey, nonce: [u8; AES_GCM_NONCE_LEN]) -> Result<Vec<u8>, CubeError>;

    /// Opens `envelope_bytes` (`nonce || ciphertext_with_tag`) under `key`.
    ///
    /// # Errors
    /// [`CubeError::Malformed`] if shorter than [`AES_GCM_NONCE_LEN`];
    /// [`CubeError::Tampered`] on GCM authentication failure.
    fn aes_gcm_decrypt(&self, envelope_bytes: &[u8], key: &AesKey) -> Result<Vec<u8>, CubeError>;

    /// RSA-OAEP-SHA256 session-key wrapping.
    fn rsa_oaep_encrypt(&self, public_key_pem: &str, key_bytes: &[u8]) -> Result<Vec<u8>, CubeError>;

    /// RSA-OAEP-SHA256 session-key unwrapping.
    fn rsa_oaep_decrypt(&self, private_key_pem: &str, wrapped_key: &[u8]) -> Result<Vec<u8>, CubeError>;

    /// RSA-PSS-SHA256 signing.
    fn rsa_pss_sign(&self, private_key_pem: &str, message: &[u8]) -> Result<Vec<u8>, CubeError>;

    /// Derives the PKCS#1 public key PEM that corresponds to `private_key_pem`.
    ///
    /// `Export` rows store only the private key (§6); `ReKeyCube` re-derives
    /// the matching public key from it to verify a token's signature instead
    /// of the caller needing to carry the public key around separately.
    fn rsa_public_key_pem_from_private(&self, private_key_pem: &str) -> Result<String, CubeError>;

    /// RSA-PSS-SHA256 verification.
    ///
    /// # Errors
    /// [`CubeError::Tampered`] when the signature does not match.
    fn rsa_pss_verify(&self, public_key_pem: &str, message: &[u8], signature: &[u8]) -> Result<(), CubeError>;

    fn sha256(&self, bytes: &[u8]) -> [u8; 32];

    fn sha256_hex(&self, bytes: &[u8]) -> String {
        hex::encode(self.sha256(bytes))
    }
}
