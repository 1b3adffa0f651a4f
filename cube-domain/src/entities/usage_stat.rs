// /////////////////////////////////////////////////////////////////////////////
// Adaptive Pipeline RS
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # UsageStat — per-(memory_group, model_name, action_type) counters
//!
//! Updated via `FirstOrCreate` + accumulate + save, keyed by
//! `(cube_id, memory_group, model_name, action_type, tenant)` (§5); concurrent
//! updates to the same key are serialized by the owning transaction, not by
//! this type.

use chrono::{DateTime, Utc};

use crate::value_objects::{CubeId, TenantId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UsageStat {
    pub cube_id: CubeId,
    pub memory_group: String,
    pub model_name: String,
    pub action_type: String,
    pub tenant: TenantId,
    pub count: u64,
    pub updated_at: DateTime<Utc>,
}

impl UsageStat {
    pub fn first(cube_id: CubeId, memory_group: impl Into<String>, model_name: impl Into<String>, action_type: impl Into<String>, tenant: TenantId, now: DateTime<Utc>) -> Self {
        Self {
            cube_id,
            memory_group: memory_group.into(),
            model_name: model_name.into(),
            action_type: action_type.into(),
            tenant,
            count: 1,
            updated_at: now,
        }
    }

    pub fn accumulate(&self, now: DateTime<Utc>) -> Self {
        let mut next = self.clone();
        next.count += 1;
        next.updated_at = now;
        next
    }

    pub fn matches_key(&self, cube_id: CubeId, memory_group: &str, model_name: &str, action_type: &str, tenant: &TenantId) -> bool {
        self.cube_id == cube_id && self.memory_group == memory_group && self.model_name == model_name && self.action_type == action_type && &self.tenant == tenant
    }
}
