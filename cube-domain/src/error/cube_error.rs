// /////////////////////////////////////////////////////////////////////////////
// Adaptive Pipeline RS
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Domain Error System
//!
//! A single, flat error taxonomy threaded through every trait and use case in
//! the Cube cryptographic portability subsystem. Every operation boundary
//! (CLI, and eventually any host API) maps each variant to one of a small set
//! of response codes — see `cube::presentation::BoundaryCode` — so callers
//! never need to pattern-match on message text.
//!
//! ## Categories
//!
//! - **Malformed** — archive missing entries, non-two-part token, non-base64
//!   segment, non-JSON payload, unsupported key size.
//! - **Tampered** — signature verification failed, AES-GCM auth-tag mismatch.
//! - **Unauthorized** — caller is not the owner when ownership is required,
//!   tenant mismatch.
//! - **Forbidden** — limit is in the Forbidden state, inheritance violation,
//!   expired token, stats disallowed.
//! - **NotFound** — referenced Cube or Export does not exist in the tenant.
//! - **Conflict** — the in-transaction re-read of a limit found it already
//!   Forbidden (lost the race with a concurrent consumer).
//! - **Cancelled** — the operation was cancelled before its transaction ran.
//! - **Io / Serialization / Database / Crypto** — infrastructure failures.
//! - **InvalidConfiguration** — bad layered configuration at startup.
//! - **Internal** — anything else unexpected.

use thiserror::Error;

/// Domain-specific errors for the Cube cryptographic portability and
/// permission-inheritance subsystem.
///
/// Crypto failures in particular MUST NOT carry key material or plaintext in
/// their message — see the module docs on tamper/crypto handling in
/// `cube::infrastructure::adapters::crypto`.
#[derive(Error, Debug, Clone)]
pub enum CubeError {
    #[error("malformed: {0}")]
    Malformed(String),

    #[error("tampered: {0}")]
    Tampered(String),

    #[error("unauthorized: {0}")]
    Unauthorized(String),

    #[error("forbidden: {0}")]
    Forbidden(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("cancelled")]
    Cancelled,

    #[error("io error: {0}")]
    Io(String),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("database error: {0}")]
    Database(String),

    #[error("crypto error: {0}")]
    Crypto(String),

    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl CubeError {
    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::Malformed(msg.into())
    }

    pub fn tampered(msg: impl Into<String>) -> Self {
        Self::Tampered(msg.into())
    }

    pub fn unauthorized(msg: impl Into<String>) -> Self {
        Self::Unauthorized(msg.into())
    }

    pub fn forbidden(msg: impl Into<String>) -> Self {
        Self::Forbidden(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    pub fn crypto(msg: impl Into<String>) -> Self {
        Self::Crypto(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Whether a caller may reasonably retry the operation unchanged.
    ///
    /// Only `Conflict` (lost a race against a concurrent limit consumer) and
    /// `Cancelled` (the caller may resubmit) are recoverable without the
    /// caller changing anything about the request itself.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, CubeError::Conflict(_) | CubeError::Cancelled)
    }

    /// Whether this failure should be treated as a security-relevant event
    /// for audit logging.
    pub fn is_security_error(&self) -> bool {
        matches!(self, CubeError::Tampered(_) | CubeError::Unauthorized(_) | CubeError::Forbidden(_))
    }

    /// Coarse category label, used for log fields and metrics grouping.
    pub fn category(&self) -> &'static str {
        match self {
            CubeError::Malformed(_) => "malformed",
            CubeError::Tampered(_) => "tampered",
            CubeError::Unauthorized(_) => "unauthorized",
            CubeError::Forbidden(_) => "forbidden",
            CubeError::NotFound(_) => "not_found",
            CubeError::Conflict(_) => "conflict",
            CubeError::Cancelled => "cancelled",
            CubeError::Io(_) => "io",
            CubeError::Serialization(_) => "serialization",
            CubeError::Database(_) => "database",
            CubeError::Crypto(_) => "crypto",
            CubeError::InvalidConfiguration(_) => "configuration",
            CubeError::Internal(_) => "internal",
        }
    }
}

impl From<std::io::Error> for CubeError {
    fn from(err: std::io::Error) -> Self {
        CubeError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for CubeError {
    fn from(err: serde_json::Error) -> Self {
        CubeError::Serialization(err.to_string())
    }
}

// NOTE: sqlx::Error -> CubeError is not implemented here: the domain crate
// does not depend on sqlx, and orphan rules forbid implementing a foreign
// trait (`From`) for a foreign type (`sqlx::Error`) from the `cube`
// infrastructure crate either, since `CubeError` is not local to it. The
// infrastructure crate instead exposes a `map_sqlx_error` helper used at
// every repository boundary. See DESIGN.md.

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forbidden_is_not_recoverable() {
        assert!(!CubeError::forbidden("absorb_limit exhausted").is_recoverable());
    }

    #[test]
    fn conflict_is_recoverable() {
        assert!(CubeError::conflict("limit re-check lost the race").is_recoverable());
    }

    #[test]
    fn tampered_is_security_error() {
        assert!(CubeError::tampered("signature mismatch").is_security_error());
        assert!(!CubeError::not_found("cube").is_security_error());
    }

    #[test]
    fn category_labels_are_stable() {
        assert_eq!(CubeError::forbidden("x").category(), "forbidden");
        assert_eq!(CubeError::Cancelled.category(), "cancelled");
    }

    #[test]
    fn io_error_converts() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: CubeError = io_err.into();
        assert!(matches!(err, CubeError::Io(_)));
    }
}
