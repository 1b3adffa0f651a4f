// /////////////////////////////////////////////////////////////////////////////
// Adaptive Pipeline RS
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Base64JsonKeyTokenCodec — the licensing token wire format (§4.4, §6)
//!
//! `base64(payload_json).base64(signature)`. `KeyPayload`'s `aes_key` has no
//! `Serialize` impl in the domain crate by design (§2) — this module is the
//! only place that ever turns AES key bytes into base64 text, immediately
//! before/after they cross the wire.

use base64::engine::general_purpose::STANDARD as B64;
use base64::Engine as _;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use cube_domain::entities::KeyPayload;
use cube_domain::services::key_token_codec::DecodedToken;
use cube_domain::services::KeyTokenCodec;
use cube_domain::value_objects::{AesKey, ExportId, Permissions};
use cube_domain::CubeError;

#[derive(Debug, Default, Clone, Copy)]
pub struct Base64JsonKeyTokenCodec;

impl Base64JsonKeyTokenCodec {
    pub fn new() -> Self {
        Self
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct KeyPayloadDto {
    aes_key: String,
    permissions: Permissions,
    expire_at: Option<DateTime<Utc>>,
    export_id: i64,
}

fn payload_dto(payload: &KeyPayload) -> KeyPayloadDto {
    KeyPayloadDto {
        aes_key: B64.encode(payload.aes_key.as_bytes()),
        permissions: payload.permissions.clone(),
        expire_at: payload.expire_at,
        export_id: payload.export_id.value(),
    }
}

impl KeyTokenCodec for Base64JsonKeyTokenCodec {
    fn payload_bytes(&self, payload: &KeyPayload) -> Result<Vec<u8>, CubeError> {
        Ok(serde_json::to_vec(&payload_dto(payload))?)
    }

    fn encode(&self, payload: &KeyPayload, signature: &[u8]) -> Result<String, CubeError> {
        let payload_json = serde_json::to_vec(&payload_dto(payload))?;
        Ok(format!("{}.{}", B64.encode(&payload_json), B64.encode(signature)))
    }

    fn decode(&self, token: &str) -> Result<DecodedToken, CubeError> {
        let mut parts = token.split('.');
        let payload_part = parts.next().ok_or_else(|| CubeError::malformed("empty token"))?;
        let signature_part = parts.next().ok_or_else(|| CubeError::malformed("token is missing its signature segment"))?;
        if parts.next().is_some() {
            return Err(CubeError::malformed("token has more than two segments"));
        }

        let payload_json = B64.decode(payload_part).map_err(|e| CubeError::malformed(format!("token payload is not valid base64: {e}")))?;
        let signature = B64.decode(signature_part).map_err(|e| CubeError::malformed(format!("token signature is not valid base64: {e}")))?;

        let dto: KeyPayloadDto = serde_json::from_slice(&payload_json)?;
        let aes_key_bytes = B64.decode(&dto.aes_key).map_err(|e| CubeError::malformed(format!("token aes_key is not valid base64: {e}")))?;
        let aes_key = AesKey::from_bytes(&aes_key_bytes)?;

        let payload = KeyPayload::new(aes_key, dto.permissions, dto.expire_at, ExportId::from_db(dto.export_id));

        Ok(DecodedToken {
            payload_json,
            payload,
            signature,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_then_decode_recovers_the_payload() {
        let codec = Base64JsonKeyTokenCodec::new();
        let payload = KeyPayload::new(AesKey::from_bytes(&[7u8; 32]).unwrap(), Permissions::unlimited(), None, ExportId::from_db(9));
        let token = codec.encode(&payload, b"signature-bytes").unwrap();
        assert_eq!(token.matches('.').count(), 1);

        let decoded = codec.decode(&token).unwrap();
        assert_eq!(decoded.signature, b"signature-bytes");
        assert_eq!(decoded.payload.export_id, payload.export_id);
        assert_eq!(decoded.payload.aes_key.as_bytes(), payload.aes_key.as_bytes());
    }

    #[test]
    fn decode_rejects_single_segment_token() {
        let codec = Base64JsonKeyTokenCodec::new();
        assert!(matches!(codec.decode("onlyonepart"), Err(CubeError::Malformed(_))));
    }

    #[test]
    fn decode_rejects_three_segment_token() {
        let codec = Base64JsonKeyTokenCodec::new();
        assert!(matches!(codec.decode("a.b.c"), Err(CubeError::Malformed(_))));
    }

    #[test]
    fn decode_rejects_non_base64_payload() {
        let codec = Base64JsonKeyTokenCodec::new();
        assert!(matches!(codec.decode("not-base64-!!!.c2ln"), Err(CubeError::Malformed(_))));
    }
}
