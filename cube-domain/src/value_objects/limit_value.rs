// /////////////////////////////////////////////////////////////////////////////
// Adaptive Pipeline RS
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Limit Value — the tri-state permission-counter encoding
//!
//! Every per-operation counter in [`super::permissions::Permissions`]
//! (`export_limit`, `rekey_limit`, `genkey_limit`, `absorb_limit`,
//! `memify_limit`, `query_limit`) is stored on the wire and in the database as
//! a plain `i64` using the encoding:
//!
//! - `0` — **Unlimited**: the operation may be performed any number of times.
//! - `N > 0` — **Remaining(N)**: the operation may be performed `N` more
//!   times.
//! - `-1` — **Forbidden**: the operation may never be performed.
//!
//! [`LimitValue`] wraps that raw integer in an enum so the consumption step
//! (§4.1 of the design spec) and the inheritance check can never be
//! expressed as ad-hoc arithmetic on a bare `i64` — a defect the design
//! explicitly calls out. All conversions to/from the raw wire representation
//! go through [`LimitValue::from_raw`] / [`LimitValue::to_raw`].

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

use crate::error::CubeError;

/// A permission counter in its tri-state form.
///
/// # Ordering
///
/// `LimitValue` orders `Forbidden < Remaining(n) < Unlimited`, with
/// `Remaining(n) < Remaining(m)` iff `n < m`. This ordering is exactly the
/// one used by the inheritance check (§4.1): a child's classification must
/// never be strictly greater than its parent's under this order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LimitValue {
    Forbidden,
    Remaining(u32),
    Unlimited,
}

impl LimitValue {
    /// Classifies a raw wire/database integer into its tri-state form.
    ///
    /// # Errors
    /// Returns [`CubeError::Malformed`] for any value less than `-1`, which
    /// is not a valid encoding of a limit.
    pub fn from_raw(raw: i64) -> Result<Self, CubeError> {
        match raw {
            -1 => Ok(LimitValue::Forbidden),
            0 => Ok(LimitValue::Unlimited),
            n if n > 0 => Ok(LimitValue::Remaining(n as u32)),
            other => Err(CubeError::malformed(format!("invalid permission limit encoding: {other}"))),
        }
    }

    /// Encodes back to the raw wire/database representation.
    pub fn to_raw(self) -> i64 {
        match self {
            LimitValue::Forbidden => -1,
            LimitValue::Unlimited => 0,
            LimitValue::Remaining(n) => n as i64,
        }
    }

    /// Applies one consumption step (§4.1):
    ///
    /// - `Unlimited` stays `Unlimited` — unlimited counters are never
    ///   decremented.
    /// - `Remaining(1)` becomes `Forbidden` — the last use transitions the
    ///   field out of existence, it does NOT wrap to `Unlimited`.
    /// - `Remaining(n > 1)` becomes `Remaining(n - 1)`.
    /// - `Forbidden` is an error: consuming an already-forbidden limit is a
    ///   programming error in the caller, which should have checked
    ///   `classify` first.
    pub fn consume(self) -> Result<Self, CubeError> {
        match self {
            LimitValue::Unlimited => Ok(LimitValue::Unlimited),
            LimitValue::Remaining(1) => Ok(LimitValue::Forbidden),
            LimitValue::Remaining(n) => Ok(LimitValue::Remaining(n - 1)),
            LimitValue::Forbidden => Err(CubeError::conflict("cannot consume an already-forbidden limit")),
        }
    }

    pub fn is_forbidden(self) -> bool {
        matches!(self, LimitValue::Forbidden)
    }

    pub fn is_unlimited(self) -> bool {
        matches!(self, LimitValue::Unlimited)
    }
}

/// Orders `Forbidden < Remaining(n) < Unlimited`; `Remaining` compares by `n`.
impl PartialOrd for LimitValue {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for LimitValue {
    fn cmp(&self, other: &Self) -> Ordering {
        fn rank(v: &LimitValue) -> (u8, u32) {
            match v {
                LimitValue::Forbidden => (0, 0),
                LimitValue::Remaining(n) => (1, *n),
                LimitValue::Unlimited => (2, 0),
            }
        }
        rank(self).cmp(&rank(other))
    }
}

impl fmt::Display for LimitValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LimitValue::Forbidden => write!(f, "forbidden"),
            LimitValue::Remaining(n) => write!(f, "remaining({n})"),
            LimitValue::Unlimited => write!(f, "unlimited"),
        }
    }
}

impl Serialize for LimitValue {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_i64(self.to_raw())
    }
}

impl<'de> Deserialize<'de> for LimitValue {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = i64::deserialize(deserializer)?;
        LimitValue::from_raw(raw).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_raw_classifies_correctly() {
        assert_eq!(LimitValue::from_raw(-1).unwrap(), LimitValue::Forbidden);
        assert_eq!(LimitValue::from_raw(0).unwrap(), LimitValue::Unlimited);
        assert_eq!(LimitValue::from_raw(5).unwrap(), LimitValue::Remaining(5));
    }

    #[test]
    fn from_raw_rejects_invalid_negatives() {
        assert!(LimitValue::from_raw(-2).is_err());
    }

    #[test]
    fn to_raw_round_trips() {
        for raw in [-1, 0, 1, 7, 1000] {
            let v = LimitValue::from_raw(raw).unwrap();
            assert_eq!(v.to_raw(), raw);
        }
    }

    #[test]
    fn consume_unlimited_stays_unlimited() {
        assert_eq!(LimitValue::Unlimited.consume().unwrap(), LimitValue::Unlimited);
    }

    #[test]
    fn consume_last_remaining_becomes_forbidden_not_unlimited() {
        assert_eq!(LimitValue::Remaining(1).consume().unwrap(), LimitValue::Forbidden);
    }

    #[test]
    fn consume_decrements_remaining() {
        assert_eq!(LimitValue::Remaining(3).consume().unwrap(), LimitValue::Remaining(2));
    }

    #[test]
    fn consume_forbidden_errors() {
        assert!(LimitValue::Forbidden.consume().is_err());
    }

    #[test]
    fn consume_law_k_times_then_rejected() {
        let mut v = LimitValue::Remaining(3);
        for _ in 0..3 {
            v = v.consume().unwrap();
        }
        assert_eq!(v, LimitValue::Forbidden);
        assert!(v.consume().is_err());
    }

    #[test]
    fn ordering_matches_inheritance_strength() {
        assert!(LimitValue::Forbidden < LimitValue::Remaining(1));
        assert!(LimitValue::Remaining(1) < LimitValue::Remaining(2));
        assert!(LimitValue::Remaining(u32::MAX) < LimitValue::Unlimited);
    }
}
