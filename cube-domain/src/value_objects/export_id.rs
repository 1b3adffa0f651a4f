// /////////////////////////////////////////////////////////////////////////////
// Adaptive Pipeline RS
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # ExportId — links an envelope, a token, and a server-side Export row
//!
//! `ExportId` is the single value that ties the three artifacts of the
//! licensing protocol together: it is carried in plaintext as
//! `export_id.txt` inside the outer envelope, embedded in every
//! [`crate::entities::key_payload::KeyPayload`] minted against that
//! envelope, and used to look up the `Export` row holding the RSA private
//! key that signed it. `ImportCube` rejects a token whose `export_id` does
//! not equal the envelope's own (§6, P3: token non-transferability).

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::CubeError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ExportId(i64);

impl ExportId {
    pub fn from_db(id: i64) -> Self {
        Self(id)
    }

    pub fn value(&self) -> i64 {
        self.0
    }

    /// Parses the ASCII-decimal form stored in `export_id.txt`.
    ///
    /// # Errors
    /// Returns [`CubeError::Malformed`] if the text is not a valid decimal
    /// integer.
    pub fn parse_decimal(text: &str) -> Result<Self, CubeError> {
        text.trim()
            .parse::<i64>()
            .map(Self)
            .map_err(|_| CubeError::malformed(format!("export_id.txt is not a valid decimal integer: {text:?}")))
    }

    /// Renders the ASCII-decimal form written to `export_id.txt`.
    pub fn to_decimal(self) -> String {
        self.0.to_string()
    }
}

impl fmt::Display for ExportId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ExportId {
    type Err = CubeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_decimal(s)
    }
}

impl From<ExportId> for i64 {
    fn from(id: ExportId) -> Self {
        id.0
    }
}
