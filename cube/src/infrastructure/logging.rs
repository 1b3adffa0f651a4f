// /////////////////////////////////////////////////////////////////////////////
// Adaptive Pipeline RS
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Infrastructure Logging
//!
//! Structured logging for the Cube subsystem, built on `tracing` /
//! `tracing-subscriber`. Every use case in `application::use_cases` logs its
//! entry, its [`cube_domain::CubeError::category`] on failure, and the
//! domain events it emits on success — never key material, plaintext, or
//! full envelope/token bytes (§7).

use tracing_subscriber::{fmt, EnvFilter};

use cube_bootstrap::config::LogLevel;

/// Initializes the global `tracing` subscriber for the `cube` binary.
///
/// Honors `RUST_LOG` if set; otherwise falls back to `level`. Call once,
/// from `main`, before any other infrastructure is wired up.
pub fn init_tracing(level: LogLevel) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.to_tracing_level().to_string().to_lowercase()));

    fmt().with_env_filter(filter).with_target(true).with_level(true).compact().init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_to_tracing_level_round_trips_through_lowercase_string() {
        assert_eq!(LogLevel::Debug.to_tracing_level().to_string(), "DEBUG");
    }
}
