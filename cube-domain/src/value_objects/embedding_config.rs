// /////////////////////////////////////////////////////////////////////////////
// Adaptive Pipeline RS
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # EmbeddingConfig — opaque pass-through configuration
//!
//! The subsystem never interprets embedding configuration: it is recorded at
//! `CreateCube`, carried unchanged through export/import, and handed back
//! verbatim to callers. Fields are `Option` because a Cube may be created
//! before its embedding provider is decided.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmbeddingConfig {
    pub provider: Option<String>,
    pub model: Option<String>,
    pub dimension: Option<u32>,
    pub base_url: Option<String>,
}

impl EmbeddingConfig {
    pub fn empty() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_has_no_fields_set() {
        let cfg = EmbeddingConfig::empty();
        assert!(cfg.provider.is_none());
        assert!(cfg.model.is_none());
        assert!(cfg.dimension.is_none());
        assert!(cfg.base_url.is_none());
    }
}
