// /////////////////////////////////////////////////////////////////////////////
// Adaptive Pipeline RS
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Domain Services Integration Tests
//!
//! Integration-level coverage for `cube_domain::services` exercised through
//! the real `cube::infrastructure::adapters::RsaAesCryptoEngine`: a full
//! generate → encrypt → sign → verify → decrypt round trip, and
//! multi-field permission-inheritance scenarios that mix several §4.1
//! rules in one check rather than isolating a single field as the unit
//! tests alongside `permission_algebra.rs` do.

use chrono::{Duration, Utc};
use cube::infrastructure::adapters::RsaAesCryptoEngine;
use cube_domain::services::{check_inheritance, CryptoEngine};
use cube_domain::value_objects::{LimitValue, MemifyConfigLimit, Permissions};
use std::collections::BTreeSet;

fn crypto() -> RsaAesCryptoEngine {
    RsaAesCryptoEngine::new()
}

/// Full envelope-sealing round trip: AES-GCM content encryption, RSA-OAEP
/// key wrap/unwrap, and RSA-PSS sign/verify, chained the way
/// `export_cube`/`genkey_cube` chain them.
#[test]
fn test_full_seal_and_unseal_round_trip() {
    let engine = crypto();
    let plaintext = b"inner archive bytes go here, in full".to_vec();

    let aes_key = engine.generate_aes_key();
    let nonce = engine.generate_nonce();
    let ciphertext = engine.aes_gcm_encrypt(&plaintext, &aes_key, nonce).expect("encrypt");

    let rsa_pair = engine.generate_rsa_keypair().expect("keypair");
    let wrapped_key = engine.rsa_oaep_encrypt(&rsa_pair.public_key_pem, aes_key.as_bytes()).expect("wrap key");
    let signature = engine.rsa_pss_sign(&rsa_pair.private_key_pem, &ciphertext).expect("sign");

    engine.rsa_pss_verify(&rsa_pair.public_key_pem, &ciphertext, &signature).expect("verify");

    let unwrapped_key_bytes = engine.rsa_oaep_decrypt(&rsa_pair.private_key_pem, &wrapped_key).expect("unwrap key");
    assert_eq!(unwrapped_key_bytes.as_slice(), aes_key.as_bytes().as_slice());

    let decrypted = engine.aes_gcm_decrypt(&ciphertext, &aes_key).expect("decrypt");
    assert_eq!(decrypted, plaintext);
}

/// A single flipped byte in the signed ciphertext must fail verification —
/// this is the tamper-evidence property the outer envelope relies on.
#[test]
fn test_tampered_ciphertext_fails_signature_verification() {
    let engine = crypto();
    let plaintext = b"don't touch me".to_vec();

    let aes_key = engine.generate_aes_key();
    let nonce = engine.generate_nonce();
    let mut ciphertext = engine.aes_gcm_encrypt(&plaintext, &aes_key, nonce).expect("encrypt");

    let rsa_pair = engine.generate_rsa_keypair().expect("keypair");
    let signature = engine.rsa_pss_sign(&rsa_pair.private_key_pem, &ciphertext).expect("sign");

    ciphertext[0] ^= 0xFF;

    assert!(engine.rsa_pss_verify(&rsa_pair.public_key_pem, &ciphertext, &signature).is_err());
}

fn unlimited_with<F: FnOnce(&mut Permissions)>(f: F) -> Permissions {
    let mut p = Permissions::unlimited();
    f(&mut p);
    p
}

/// A child that narrows one field, matches another, and restricts
/// query-type tags to a subset must pass as a whole.
#[test]
fn test_inheritance_allows_child_that_narrows_every_dimension() {
    let parent = unlimited_with(|p| {
        p.memify_config_limit = MemifyConfigLimit { max_epochs: Some(10) };
        p.query_type_limit = BTreeSet::from(["summarize".to_string(), "recall".to_string()]);
    });
    let child = unlimited_with(|c| {
        c.export_limit = LimitValue::Remaining(1);
        c.memify_config_limit = MemifyConfigLimit { max_epochs: Some(5) };
        c.query_type_limit = BTreeSet::from(["recall".to_string()]);
    });

    let now = Utc::now();
    assert!(check_inheritance(&parent, &child, Some(now + Duration::days(10)), Some(now + Duration::days(5))).is_ok());
}

/// Even if every limit field narrows correctly, a query-type tag outside
/// the parent's restricted set must still be rejected (I3 applies
/// per-dimension, not just per-limit-field).
#[test]
fn test_inheritance_rejects_query_type_outside_parent_subset() {
    let parent = unlimited_with(|p| {
        p.query_type_limit = BTreeSet::from(["summarize".to_string()]);
    });
    let child = unlimited_with(|c| {
        c.query_type_limit = BTreeSet::from(["summarize".to_string(), "recall".to_string()]);
    });

    assert!(check_inheritance(&parent, &child, None, None).is_err());
}

/// A child expiring after its parent is rejected even when every limit
/// field and the query-type set are otherwise compliant.
#[test]
fn test_inheritance_rejects_later_expiration_despite_compliant_limits() {
    let parent = Permissions::unlimited();
    let child = unlimited_with(|c| c.export_limit = LimitValue::Remaining(1));

    let now = Utc::now();
    let parent_expire = Some(now + Duration::days(5));
    let child_expire = Some(now + Duration::days(6));

    assert!(check_inheritance(&parent, &child, parent_expire, child_expire).is_err());
}
