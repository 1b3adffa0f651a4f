// /////////////////////////////////////////////////////////////////////////////
// Adaptive Pipeline RS
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # RsaAesCryptoEngine — the concrete backend for `cube_domain::CryptoEngine`
//!
//! Implements §4.2 exactly: AES-256-GCM content sealing with the nonce
//! prepended on the wire (I6), RSA-2048 keys (I7), RSA-OAEP-SHA256 session
//! key wrapping, RSA-PSS-SHA256 signing, and SHA-256 hashing. PKCS#1 PEM is
//! used for key serialization per §4.2/§6 (`"RSA PRIVATE KEY"` /
//! `"RSA PUBLIC KEY"`, not PKCS#8).
//!
//! No key material or plaintext is ever included in a returned
//! [`CubeError`] (§7) — failures surface only as `Tampered`/`Crypto` with a
//! fixed, generic message.

use aes_gcm::aead::Aead;
use aes_gcm::{Aes256Gcm, KeyInit, Nonce};
use rsa::pkcs1::{DecodeRsaPrivateKey, DecodeRsaPublicKey, EncodeRsaPrivateKey, EncodeRsaPublicKey, LineEnding};
use rsa::pss::{SigningKey, VerifyingKey};
use rsa::rand_core::OsRng;
use rsa::sha2::{Digest, Sha256};
use rsa::signature::{RandomizedSigner, Verifier};
use rsa::{Oaep, RsaPrivateKey, RsaPublicKey};

use cube_domain::services::crypto_engine::{AES_GCM_NONCE_LEN, RSA_KEY_BITS};
use cube_domain::services::{CryptoEngine, RsaKeyPair};
use cube_domain::value_objects::AesKey;
use cube_domain::CubeError;

#[derive(Debug, Default, Clone, Copy)]
pub struct RsaAesCryptoEngine;

impl RsaAesCryptoEngine {
    pub fn new() -> Self {
        Self
    }

    fn parse_private(pem: &str) -> Result<RsaPrivateKey, CubeError> {
        RsaPrivateKey::from_pkcs1_pem(pem).map_err(|_| CubeError::crypto("invalid RSA private key"))
    }

    fn parse_public(pem: &str) -> Result<RsaPublicKey, CubeError> {
        RsaPublicKey::from_pkcs1_pem(pem).map_err(|_| CubeError::crypto("invalid RSA public key"))
    }
}

impl CryptoEngine for RsaAesCryptoEngine {
    fn generate_rsa_keypair(&self) -> Result<RsaKeyPair, CubeError> {
        let mut rng = OsRng;
        let private_key = RsaPrivateKey::new(&mut rng, RSA_KEY_BITS).map_err(|_| CubeError::crypto("RSA key generation failed"))?;
        let public_key = RsaPublicKey::from(&private_key);

        let private_key_pem = private_key.to_pkcs1_pem(LineEnding::LF).map_err(|_| CubeError::crypto("failed to encode RSA private key"))?.to_string();
        let public_key_pem = public_key.to_pkcs1_pem(LineEnding::LF).map_err(|_| CubeError::crypto("failed to encode RSA public key"))?;

        Ok(RsaKeyPair {
            private_key_pem,
            public_key_pem,
        })
    }

    fn generate_aes_key(&self) -> AesKey {
        use rand::RngCore;
        let mut bytes = [0u8; 32];
        rand::rng().fill_bytes(&mut bytes);
        AesKey::from_bytes(&bytes).expect("32 bytes is always a valid AesKey")
    }

    fn generate_nonce(&self) -> [u8; AES_GCM_NONCE_LEN] {
        use rand::RngCore;
        let mut nonce = [0u8; AES_GCM_NONCE_LEN];
        rand::rng().fill_bytes(&mut nonce);
        nonce
    }

    fn aes_gcm_encrypt(&self, plaintext: &[u8], key: &AesKey, nonce: [u8; AES_GCM_NONCE_LEN]) -> Result<Vec<u8>, CubeError> {
        let cipher = Aes256Gcm::new_from_slice(key.as_bytes()).map_err(|_| CubeError::crypto("invalid AES key length"))?;
        let gcm_nonce = Nonce::from_slice(&nonce);
        let sealed = cipher.encrypt(gcm_nonce, plaintext).map_err(|_| CubeError::crypto("AES-GCM seal failed"))?;

        let mut wire = Vec::with_capacity(AES_GCM_NONCE_LEN + sealed.len());
        wire.extend_from_slice(&nonce);
        wire.extend_from_slice(&sealed);
        Ok(wire)
    }

    fn aes_gcm_decrypt(&self, envelope_bytes: &[u8], key: &AesKey) -> Result<Vec<u8>, CubeError> {
        if envelope_bytes.len() < AES_GCM_NONCE_LEN {
            return Err(CubeError::malformed("ciphertext shorter than the GCM nonce"));
        }
        let (nonce_bytes, ciphertext) = envelope_bytes.split_at(AES_GCM_NONCE_LEN);
        let cipher = Aes256Gcm::new_from_slice(key.as_bytes()).map_err(|_| CubeError::crypto("invalid AES key length"))?;
        let nonce = Nonce::from_slice(nonce_bytes);

        cipher.decrypt(nonce, ciphertext).map_err(|_| CubeError::tampered("AES-GCM authentication failed"))
    }

    fn rsa_oaep_encrypt(&self, public_key_pem: &str, key_bytes: &[u8]) -> Result<Vec<u8>, CubeError> {
        let public_key = Self::parse_public(public_key_pem)?;
        let mut rng = OsRng;
        public_key.encrypt(&mut rng, Oaep::new::<Sha256>(), key_bytes).map_err(|_| CubeError::crypto("RSA-OAEP wrap failed"))
    }

    fn rsa_oaep_decrypt(&self, private_key_pem: &str, wrapped_key: &[u8]) -> Result<Vec<u8>, CubeError> {
        let private_key = Self::parse_private(private_key_pem)?;
        private_key.decrypt(Oaep::new::<Sha256>(), wrapped_key).map_err(|_| CubeError::crypto("RSA-OAEP unwrap failed"))
    }

    fn rsa_pss_sign(&self, private_key_pem: &str, message: &[u8]) -> Result<Vec<u8>, CubeError> {
        let private_key = Self::parse_private(private_key_pem)?;
        let signing_key = SigningKey::<Sha256>::new(private_key);
        let mut rng = OsRng;
        let signature = signing_key.sign_with_rng(&mut rng, message);
        Ok(signature.to_vec())
    }

    fn rsa_public_key_pem_from_private(&self, private_key_pem: &str) -> Result<String, CubeError> {
        let private_key = Self::parse_private(private_key_pem)?;
        let public_key = RsaPublicKey::from(&private_key);
        public_key.to_pkcs1_pem(LineEnding::LF).map_err(|_| CubeError::crypto("failed to encode RSA public key"))
    }

    fn rsa_pss_verify(&self, public_key_pem: &str, message: &[u8], signature: &[u8]) -> Result<(), CubeError> {
        let public_key = Self::parse_public(public_key_pem)?;
        let verifying_key = VerifyingKey::<Sha256>::new(public_key);
        let sig = rsa::pss::Signature::try_from(signature).map_err(|_| CubeError::tampered("malformed signature"))?;
        verifying_key.verify(message, &sig).map_err(|_| CubeError::tampered("signature verification failed"))
    }

    fn sha256(&self, bytes: &[u8]) -> [u8; 32] {
        let digest = Sha256::digest(bytes);
        let mut out = [0u8; 32];
        out.copy_from_slice(&digest);
        out
    }
}
