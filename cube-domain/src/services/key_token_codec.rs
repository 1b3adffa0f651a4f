// /////////////////////////////////////////////////////////////////////////////
// Adaptive Pipeline RS
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # KeyTokenCodec — the licensing token format port (§4.4, §6)
//!
//! Token wire format: `base64(payload_json).base64(signature)`. The domain
//! defines the contract and the decoded shape; the concrete `base64` +
//! `serde_json` implementation lives in
//! `cube::infrastructure::adapters::key_token`.

use crate::entities::KeyPayload;
use crate::error::CubeError;

/// A parsed-but-not-yet-verified token: the raw JSON bytes of the payload
/// (needed to recompute the signature digest), the strongly-typed payload
/// itself, and the detached signature bytes.
pub struct DecodedToken {
    pub payload_json: Vec<u8>,
    pub payload: KeyPayload,
    pub signature: Vec<u8>,
}

pub trait KeyTokenCodec: Send + Sync {
    /// Serializes `payload` to the same canonical JSON `encode` would embed
    /// in the token, without base64 or a signature attached. Callers sign
    /// these bytes with the export's private key and pass the resulting
    /// signature to `encode`, which reproduces the identical bytes since
    /// the serialization is a pure function of `payload`.
    fn payload_bytes(&self, payload: &KeyPayload) -> Result<Vec<u8>, CubeError>;

    /// Serializes `payload` to canonical JSON, base64-encodes it and
    /// `signature`, and joins them with `.`.
    fn encode(&self, payload: &KeyPayload, signature: &[u8]) -> Result<String, CubeError>;

    /// Splits `token` on `.` into exactly two parts, base64-decodes each,
    /// and JSON-decodes the payload.
    ///
    /// # Errors
    /// [`CubeError::Malformed`] for a non-two-part token, a non-base64
    /// segment, or a non-JSON payload. Does not itself verify the signature
    /// — callers hold the public key needed for that (from the archive, for
    /// `ImportCube`, or re-derived from the stored `Export`, for
    /// `ReKeyCube`).
    fn decode(&self, token: &str) -> Result<DecodedToken, CubeError>;
}
