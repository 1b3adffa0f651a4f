// /////////////////////////////////////////////////////////////////////////////
// Adaptive Pipeline RS
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # PermissionAlgebra — inheritance checking over the tri-state limit fields (§4.1)
//!
//! `check_inheritance` is the single place I3 ("a child's value never
//! strengthens over the parent") is enforced. Per limit field the rule
//! collapses to one comparison under [`LimitValue`]'s `Ord` impl
//! (`Forbidden < Remaining(n) < Unlimited`): a child is valid exactly when
//! `child <= parent`. `allow_stats` uses the same `false <= true` ordering;
//! `memify_config_limit` and `query_type_limit` have their own narrower
//! comparisons since they aren't `LimitValue`s.

use chrono::{DateTime, Utc};

use crate::error::CubeError;
use crate::value_objects::{PermissionField, Permissions};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViolationKind {
    LimitExceedsParent,
    AllowStatsExceedsParent,
    MemifyConfigExceedsParent,
    QueryTypeNotSubsetOfParent,
    ExpirationExceedsParent,
    ExpirationMissingWhenParentExpires,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InheritanceViolation {
    pub kind: ViolationKind,
    pub field: Option<PermissionField>,
}

impl std::fmt::Display for InheritanceViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match (self.kind, self.field) {
            (ViolationKind::LimitExceedsParent, Some(field)) => write!(f, "{} exceeds parent's grant", field.name()),
            (ViolationKind::AllowStatsExceedsParent, _) => write!(f, "allow_stats is true under a parent that forbids stats"),
            (ViolationKind::MemifyConfigExceedsParent, _) => write!(f, "memify_config_limit exceeds parent's cap"),
            (ViolationKind::QueryTypeNotSubsetOfParent, _) => write!(f, "query_type_limit is not a subset of the parent's"),
            (ViolationKind::ExpirationExceedsParent, _) => write!(f, "expire_at is later than the parent's"),
            (ViolationKind::ExpirationMissingWhenParentExpires, _) => write!(f, "expire_at is missing but the parent expires"),
            (_, None) => write!(f, "inheritance violation"),
        }
    }
}

impl From<InheritanceViolation> for CubeError {
    fn from(violation: InheritanceViolation) -> Self {
        CubeError::forbidden(violation.to_string())
    }
}

/// Checks every inheritance rule of §4.1 between a parent Cube's grant and a
/// proposed child grant, returning the first violation encountered.
pub fn check_inheritance(parent: &Permissions, child: &Permissions, parent_expire: Option<DateTime<Utc>>, child_expire: Option<DateTime<Utc>>) -> Result<(), InheritanceViolation> {
    for field in PermissionField::ALL {
        if child.field(field) > parent.field(field) {
            return Err(InheritanceViolation {
                kind: ViolationKind::LimitExceedsParent,
                field: Some(field),
            });
        }
    }

    if child.allow_stats && !parent.allow_stats {
        return Err(InheritanceViolation {
            kind: ViolationKind::AllowStatsExceedsParent,
            field: None,
        });
    }

    if !parent.memify_config_limit.permits_child(&child.memify_config_limit) {
        return Err(InheritanceViolation {
            kind: ViolationKind::MemifyConfigExceedsParent,
            field: None,
        });
    }

    if !parent.query_type_limit.is_empty() && !child.query_type_limit.is_subset(&parent.query_type_limit) {
        return Err(InheritanceViolation {
            kind: ViolationKind::QueryTypeNotSubsetOfParent,
            field: None,
        });
    }

    match (parent_expire, child_expire) {
        (Some(_), None) => {
            return Err(InheritanceViolation {
                kind: ViolationKind::ExpirationMissingWhenParentExpires,
                field: None,
            });
        }
        (Some(p), Some(c)) if c > p => {
            return Err(InheritanceViolation {
                kind: ViolationKind::ExpirationExceedsParent,
                field: None,
            });
        }
        _ => {}
    }

    Ok(())
}
