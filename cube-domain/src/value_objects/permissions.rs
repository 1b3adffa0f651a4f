// /////////////////////////////////////////////////////////////////////////////
// Adaptive Pipeline RS
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Permissions — the full grant embedded on a Cube
//!
//! `Permissions` bundles the six tri-state limit counters plus the two
//! non-numeric grants (`allow_stats`, `memify_config_limit`,
//! `query_type_limit`). It is embedded directly on `Cube` and is the payload
//! carried, unmodified in shape, through `KeyPayload` during licensing.
//!
//! Persistence stores this as a single JSON document (see
//! `cube::infrastructure::repositories`); the strongly-typed form here is the
//! only thing application code and the inheritance algebra ever see.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use super::limit_value::LimitValue;
use crate::error::CubeError;

/// Recognized `memify_config_limit` options. Currently the only recognized
/// key is `max_epochs`, a cap on how many metacognition epochs a memify
/// operation downstream of this Cube may run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct MemifyConfigLimit {
    /// `None` means no cap is asserted.
    pub max_epochs: Option<u32>,
}

impl MemifyConfigLimit {
    pub fn unrestricted() -> Self {
        Self { max_epochs: None }
    }

    /// A child's cap may only ever be tighter than (or equal to) its
    /// parent's: a `None` parent accepts any child; a `Some(p)` parent
    /// rejects a child with no cap, or a child cap greater than `p`.
    pub fn permits_child(&self, child: &MemifyConfigLimit) -> bool {
        match self.max_epochs {
            None => true,
            Some(parent_cap) => matches!(child.max_epochs, Some(child_cap) if child_cap <= parent_cap),
        }
    }
}

/// The complete permission grant embedded on a Cube.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Permissions {
    pub export_limit: LimitValue,
    pub rekey_limit: LimitValue,
    pub genkey_limit: LimitValue,
    pub absorb_limit: LimitValue,
    pub memify_limit: LimitValue,
    pub query_limit: LimitValue,
    pub allow_stats: bool,
    pub memify_config_limit: MemifyConfigLimit,
    /// Allowed query-type tags; empty means any query type is permitted.
    pub query_type_limit: BTreeSet<String>,
}

impl Permissions {
    /// The grant assigned to a freshly created Cube: every limit Unlimited,
    /// stats allowed, no memify cap, any query type.
    pub fn unlimited() -> Self {
        Self {
            export_limit: LimitValue::Unlimited,
            rekey_limit: LimitValue::Unlimited,
            genkey_limit: LimitValue::Unlimited,
            absorb_limit: LimitValue::Unlimited,
            memify_limit: LimitValue::Unlimited,
            query_limit: LimitValue::Unlimited,
            allow_stats: true,
            memify_config_limit: MemifyConfigLimit::unrestricted(),
            query_type_limit: BTreeSet::new(),
        }
    }

    /// Returns whether `query_type` is permitted under `query_type_limit`
    /// (an empty set permits any tag).
    pub fn permits_query_type(&self, query_type: &str) -> bool {
        self.query_type_limit.is_empty() || self.query_type_limit.contains(query_type)
    }

    /// Applies [`LimitValue::consume`] to the named field, returning the
    /// updated `Permissions` with that single field replaced.
    ///
    /// # Errors
    /// Propagates [`CubeError`] from [`LimitValue::consume`] when the named
    /// field is already `Forbidden`.
    pub fn consuming(&self, field: PermissionField) -> Result<Self, CubeError> {
        let mut next = self.clone();
        match field {
            PermissionField::Export => next.export_limit = self.export_limit.consume()?,
            PermissionField::Rekey => next.rekey_limit = self.rekey_limit.consume()?,
            PermissionField::Genkey => next.genkey_limit = self.genkey_limit.consume()?,
            PermissionField::Absorb => next.absorb_limit = self.absorb_limit.consume()?,
            PermissionField::Memify => next.memify_limit = self.memify_limit.consume()?,
            PermissionField::Query => next.query_limit = self.query_limit.consume()?,
        }
        Ok(next)
    }

    pub fn field(&self, field: PermissionField) -> LimitValue {
        match field {
            PermissionField::Export => self.export_limit,
            PermissionField::Rekey => self.rekey_limit,
            PermissionField::Genkey => self.genkey_limit,
            PermissionField::Absorb => self.absorb_limit,
            PermissionField::Memify => self.memify_limit,
            PermissionField::Query => self.query_limit,
        }
    }
}

/// Names one of the six tri-state limit fields, used by
/// [`Permissions::consuming`] and the inheritance algebra so call sites never
/// need to spell out every field by hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionField {
    Export,
    Rekey,
    Genkey,
    Absorb,
    Memify,
    Query,
}

impl PermissionField {
    pub const ALL: [PermissionField; 6] = [
        PermissionField::Export,
        PermissionField::Rekey,
        PermissionField::Genkey,
        PermissionField::Absorb,
        PermissionField::Memify,
        PermissionField::Query,
    ];

    pub fn name(self) -> &'static str {
        match self {
            PermissionField::Export => "export_limit",
            PermissionField::Rekey => "rekey_limit",
            PermissionField::Genkey => "genkey_limit",
            PermissionField::Absorb => "absorb_limit",
            PermissionField::Memify => "memify_limit",
            PermissionField::Query => "query_limit",
        }
    }
}
