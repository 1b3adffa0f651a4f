// /////////////////////////////////////////////////////////////////////////////
// Adaptive Pipeline RS
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Secure Argument Validation
//!
//! Defends the CLI boundary against path traversal, shell-metacharacter
//! injection, and oversized input before any argument reaches the
//! application layer.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Maximum number of CLI arguments accepted in a single invocation
const MAX_ARG_COUNT: usize = 100;

/// Maximum length (bytes) of a single argument
const MAX_ARG_LENGTH: usize = 1000;

/// Maximum length (bytes) of a filesystem path argument
const MAX_PATH_LENGTH: usize = 4096;

/// Substrings that are never permitted in an argument, regardless of position
const DANGEROUS_PATTERNS: &[&str] = &[
    "..", "~", "$", "`", ";", "&", "|", ">", "<", "\n", "\r", "\0",
];

/// Absolute directories a path argument may never resolve into
const PROTECTED_DIRS: &[&str] = &["/etc", "/bin", "/sbin", "/usr/bin", "/usr/sbin", "/boot", "/sys", "/proc", "/dev"];

/// Errors raised while parsing or validating CLI arguments
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("too many arguments (max {MAX_ARG_COUNT})")]
    TooManyArguments,

    #[error("argument too long (max {MAX_ARG_LENGTH} bytes): {0}")]
    ArgumentTooLong(String),

    #[error("argument '{arg}' contains disallowed pattern '{pattern}'")]
    DangerousPattern { pattern: String, arg: String },

    #[error("path too long (max {MAX_PATH_LENGTH} bytes)")]
    PathTooLong,

    #[error("path resolves into a protected directory: {0}")]
    ProtectedDirectory(String),

    #[error("path does not exist: {0}")]
    PathNotFound(String),

    #[error("invalid path: {0}")]
    InvalidPath(String),

    #[error("missing required argument: {0}")]
    MissingArgument(String),

    #[error("invalid value for '{arg}': {reason}")]
    InvalidValue { arg: String, reason: String },
}

/// Stateless validation routines applied to every CLI argument
pub struct SecureArgParser;

impl SecureArgParser {
    /// Validate a raw argument count against [`MAX_ARG_COUNT`]
    pub fn validate_argument_count(args: &[String]) -> Result<(), ParseError> {
        if args.len() > MAX_ARG_COUNT {
            return Err(ParseError::TooManyArguments);
        }
        Ok(())
    }

    /// Validate a single free-text argument: length and dangerous substrings
    pub fn validate_argument(arg: &str) -> Result<(), ParseError> {
        if arg.len() > MAX_ARG_LENGTH {
            return Err(ParseError::ArgumentTooLong(arg.to_string()));
        }

        for pattern in DANGEROUS_PATTERNS {
            if arg.contains(pattern) {
                return Err(ParseError::DangerousPattern {
                    pattern: pattern.to_string(),
                    arg: arg.to_string(),
                });
            }
        }

        Ok(())
    }

    /// Validate and canonicalize a path argument that must already exist
    ///
    /// Checks length, dangerous substrings, and protected-directory
    /// membership, then canonicalizes so the returned path can't be a
    /// disguised traversal.
    pub fn validate_path(path: &str) -> Result<PathBuf, ParseError> {
        if path.len() > MAX_PATH_LENGTH {
            return Err(ParseError::PathTooLong);
        }

        for pattern in DANGEROUS_PATTERNS {
            if path.contains(pattern) {
                return Err(ParseError::DangerousPattern {
                    pattern: pattern.to_string(),
                    arg: path.to_string(),
                });
            }
        }

        let candidate = Path::new(path);
        let canonical = candidate
            .canonicalize()
            .map_err(|_| ParseError::PathNotFound(path.to_string()))?;

        Self::check_protected(&canonical)?;

        Ok(canonical)
    }

    /// Validate a path argument that refers to an output location which
    /// need not exist yet (the parent directory must).
    pub fn validate_optional_path(path: &str) -> Result<PathBuf, ParseError> {
        if path.len() > MAX_PATH_LENGTH {
            return Err(ParseError::PathTooLong);
        }

        for pattern in DANGEROUS_PATTERNS {
            if path.contains(pattern) {
                return Err(ParseError::DangerousPattern {
                    pattern: pattern.to_string(),
                    arg: path.to_string(),
                });
            }
        }

        let candidate = PathBuf::from(path);
        let parent = candidate.parent().filter(|p| !p.as_os_str().is_empty());

        if let Some(parent) = parent {
            let canonical_parent = parent
                .canonicalize()
                .map_err(|_| ParseError::InvalidPath(format!("parent directory does not exist: {}", parent.display())))?;
            Self::check_protected(&canonical_parent)?;
        }

        Ok(candidate)
    }

    fn check_protected(path: &Path) -> Result<(), ParseError> {
        let path_str = path.to_string_lossy();
        for protected in PROTECTED_DIRS {
            if path_str.starts_with(protected) {
                return Err(ParseError::ProtectedDirectory(path_str.to_string()));
            }
        }
        Ok(())
    }

    /// Validate a numeric argument fits in range `[min, max]`
    pub fn validate_number<T>(arg_name: &str, value: T, min: T, max: T) -> Result<T, ParseError>
    where
        T: PartialOrd + std::fmt::Display + Copy,
    {
        if value < min || value > max {
            return Err(ParseError::InvalidValue {
                arg: arg_name.to_string(),
                reason: format!("must be between {min} and {max}, got {value}"),
            });
        }
        Ok(value)
    }
}
