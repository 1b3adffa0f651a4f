// /////////////////////////////////////////////////////////////////////////////
// Adaptive Pipeline
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Common Test Helpers
//!
//! Shared utilities for integration and end-to-end tests.

/// Get the path to the compiled `cube` binary.
///
/// Tries the `CARGO_BIN_EXE_cube` environment variable first (set by cargo
/// test), then falls back to constructing the path from
/// `CARGO_MANIFEST_DIR`.
pub fn get_cube_bin() -> String {
    if let Ok(path) = std::env::var("CARGO_BIN_EXE_cube") {
        return path;
    }

    let manifest_dir = env!("CARGO_MANIFEST_DIR");
    let mut bin_path = std::path::PathBuf::from(manifest_dir);
    bin_path.pop(); // workspace root
    bin_path.push("target");
    bin_path.push(if cfg!(debug_assertions) { "debug" } else { "release" });
    bin_path.push("cube");

    bin_path.to_str().expect("Invalid UTF-8 in binary path").to_string()
}

/// Calculate SHA256 checksum of data, hex-encoded.
pub fn calculate_sha256(data: &[u8]) -> String {
    use sha2::{Digest, Sha256};
    let mut hasher = Sha256::new();
    hasher.update(data);
    format!("{:x}", hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_cube_bin_returns_path() {
        let bin_path = get_cube_bin();
        assert!(!bin_path.is_empty());
        assert!(bin_path.contains("cube"));
    }

    #[test]
    fn test_calculate_sha256() {
        let data = b"test data";
        let hash = calculate_sha256(data);
        assert_eq!(hash.len(), 64);
        assert_eq!(hash, calculate_sha256(data));
    }
}
