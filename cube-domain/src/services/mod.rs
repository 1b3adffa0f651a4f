// /////////////////////////////////////////////////////////////////////////////
// Adaptive Pipeline RS
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Domain Services
//!
//! Stateless operations and infrastructure ports (§4.2–§4.4): pure functions
//! ([`permission_algebra`]) live directly in the domain; I/O-bound
//! contracts ([`CryptoEngine`], [`EnvelopeCodec`], [`KeyTokenCodec`]) are
//! `trait`s implemented by `cube::infrastructure::adapters`.

pub mod crypto_engine;
pub mod envelope_codec;
pub mod key_token_codec;
pub mod permission_algebra;
pub mod ports;

pub use crypto_engine::{CryptoEngine, RsaKeyPair, AES_GCM_NONCE_LEN, RSA_KEY_BITS};
pub use envelope_codec::{EnvelopeCodec, InnerArchive, OuterEnvelope};
pub use key_token_codec::{DecodedToken, KeyTokenCodec};
pub use permission_algebra::{check_inheritance, InheritanceViolation, ViolationKind};
pub use ports::{Clock, CubeStoreAdapter, IdGenerator, OwnerDirectory};
