// /////////////////////////////////////////////////////////////////////////////
// Adaptive Pipeline RS
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Layered Configuration
//!
//! Loads `CubeConfig` from, in increasing precedence: built-in defaults, an
//! optional TOML file (`--config`), and `CUBE_*` environment variables, via
//! the `config` crate. `cube_bootstrap::config::AppConfig` only carries what
//! bootstrap itself needs (log level, grace period); this module owns
//! everything the application/infrastructure layers need once the process is
//! already running.

use std::path::Path;

use cube_domain::CubeError;
use serde::Deserialize;

/// Fully-resolved runtime configuration for the `cube` binary.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CubeConfig {
    /// SQLite connection URL, e.g. `sqlite://./cube.db`.
    pub database_url: String,
    /// Directory root under which inner Cube store files are written,
    /// scoped per-tenant/owner/uuid (§5, §6).
    pub storage_root: String,
    /// Default tenant scoping used when the caller does not supply one
    /// explicitly (single-tenant CLI usage).
    pub default_apx_id: String,
    pub default_vdr_id: String,
    /// Owner identity the CLI acts as; the binary has no login step of its
    /// own, so every command runs as this configured owner.
    pub default_owner_id: i64,
}

impl Default for CubeConfig {
    fn default() -> Self {
        Self {
            database_url: "sqlite://./cube.db".to_string(),
            storage_root: "./cube-store".to_string(),
            default_apx_id: "default".to_string(),
            default_vdr_id: "default".to_string(),
            default_owner_id: 1,
        }
    }
}

impl CubeConfig {
    /// Loads defaults, then an optional TOML file, then `CUBE_*` environment
    /// overrides (e.g. `CUBE_DATABASE_URL`).
    pub fn load(config_file: Option<&Path>) -> Result<Self, CubeError> {
        let mut builder = config::Config::builder().add_source(config::Config::try_from(&CubeConfig::default()).map_err(|e| CubeError::InvalidConfiguration(e.to_string()))?);

        if let Some(path) = config_file {
            builder = builder.add_source(config::File::from(path));
        }

        builder = builder.add_source(config::Environment::with_prefix("CUBE").separator("_"));

        let resolved = builder.build().map_err(|e| CubeError::InvalidConfiguration(e.to_string()))?;

        resolved.try_deserialize().map_err(|e| CubeError::InvalidConfiguration(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_load_without_a_file() {
        let cfg = CubeConfig::load(None).unwrap();
        assert_eq!(cfg.database_url, "sqlite://./cube.db");
    }
}
