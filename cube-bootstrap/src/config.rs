// /////////////////////////////////////////////////////////////////////////////
// Adaptive Pipeline RS
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Bootstrap Configuration
//!
//! Bootstrap-phase configuration structure, populated before the layered
//! `cube::infrastructure::config` loader runs. `AppConfig` holds only what the
//! bootstrap layer itself needs: where the SQLite database and the inner-Cube
//! storage root live, the grace period for shutdown, and the log level.
//!
//! ## Immutability
//!
//! All configuration is immutable after creation, so it can be shared across
//! async tasks without synchronization.

use std::path::PathBuf;

/// Log level configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    /// Convert to tracing Level
    pub fn to_tracing_level(&self) -> tracing::Level {
        match self {
            LogLevel::Error => tracing::Level::ERROR,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Trace => tracing::Level::TRACE,
        }
    }
}

/// Application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    app_name: String,
    log_level: LogLevel,
    database_url: Option<String>,
    storage_root: Option<PathBuf>,
    grace_period_secs: u64,
    verbose: bool,
}

impl AppConfig {
    pub fn builder() -> AppConfigBuilder {
        AppConfigBuilder::default()
    }

    pub fn app_name(&self) -> &str {
        &self.app_name
    }

    pub fn log_level(&self) -> LogLevel {
        self.log_level
    }

    pub fn database_url(&self) -> Option<&str> {
        self.database_url.as_deref()
    }

    pub fn storage_root(&self) -> Option<&PathBuf> {
        self.storage_root.as_ref()
    }

    pub fn grace_period_secs(&self) -> u64 {
        self.grace_period_secs
    }

    pub fn is_verbose(&self) -> bool {
        self.verbose
    }
}

/// Builder for AppConfig
#[derive(Debug, Default)]
pub struct AppConfigBuilder {
    app_name: Option<String>,
    log_level: Option<LogLevel>,
    database_url: Option<String>,
    storage_root: Option<PathBuf>,
    grace_period_secs: Option<u64>,
    verbose: bool,
}

impl AppConfigBuilder {
    pub fn app_name(mut self, name: impl Into<String>) -> Self {
        self.app_name = Some(name.into());
        self
    }

    pub fn log_level(mut self, level: LogLevel) -> Self {
        self.log_level = Some(level);
        self
    }

    pub fn database_url(mut self, url: impl Into<String>) -> Self {
        self.database_url = Some(url.into());
        self
    }

    pub fn storage_root(mut self, path: impl Into<PathBuf>) -> Self {
        self.storage_root = Some(path.into());
        self
    }

    pub fn grace_period_secs(mut self, secs: u64) -> Self {
        self.grace_period_secs = Some(secs);
        self
    }

    pub fn verbose(mut self, enabled: bool) -> Self {
        self.verbose = enabled;
        self
    }

    /// Build the configuration
    ///
    /// # Panics
    ///
    /// Panics if app_name was not set
    pub fn build(self) -> AppConfig {
        AppConfig {
            app_name: self.app_name.expect("app_name is required"),
            log_level: self.log_level.unwrap_or_default(),
            database_url: self.database_url,
            storage_root: self.storage_root,
            grace_period_secs: self.grace_period_secs.unwrap_or(crate::shutdown::DEFAULT_GRACE_PERIOD_SECS),
            verbose: self.verbose,
        }
    }

    /// Try to build the configuration, returning an error instead of panicking
    pub fn try_build(self) -> Result<AppConfig, String> {
        Ok(AppConfig {
            app_name: self.app_name.ok_or("app_name is required")?,
            log_level: self.log_level.unwrap_or_default(),
            database_url: self.database_url,
            storage_root: self.storage_root,
            grace_period_secs: self.grace_period_secs.unwrap_or(crate::shutdown::DEFAULT_GRACE_PERIOD_SECS),
            verbose: self.verbose,
        })
    }
}
