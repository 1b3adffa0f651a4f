// /////////////////////////////////////////////////////////////////////////////
// Adaptive Pipeline RS
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Exit Code Management
//!
//! Provides standardized Unix exit codes following BSD `sysexits.h` conventions,
//! with a mapping from `cube_domain::CubeError` categories so the CLI always
//! terminates with a code a shell script can branch on.
//!
//! ## Exit Code Conventions
//!
//! - **0**: Success
//! - **1**: General error
//! - **64-78**: Specific error conditions (BSD sysexits.h)
//! - **128+N**: Fatal signal N (e.g., 130 = SIGINT)

use std::fmt;

/// Exit codes following Unix conventions (BSD sysexits.h)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(i32)]
pub enum ExitCode {
    /// Successful termination (0)
    #[default]
    Success = 0,

    /// General error (1)
    Error = 1,

    /// Command line usage error (64)
    UsageError = 64,

    /// Malformed envelope, token, or request payload (65)
    DataError = 65,

    /// Cannot open input file (66)
    NoInput = 66,

    /// User does not exist (67)
    NoUser = 67,

    /// Host name unknown (68)
    NoHost = 68,

    /// Cube or Export not found, or dependent service unavailable (69)
    Unavailable = 69,

    /// Internal software error (70)
    Software = 70,

    /// System error (71)
    OsError = 71,

    /// Critical OS file missing (72)
    OsFile = 72,

    /// Cannot create output file (73)
    CantCreate = 73,

    /// I/O error (74)
    IoError = 74,

    /// Temporary failure, retry (75)
    TempFail = 75,

    /// Protocol/signature-verification violation (76)
    Protocol = 76,

    /// Permission denied - limit forbidden, ownership violation, expired token (77)
    NoPerm = 77,

    /// Configuration error (78)
    Config = 78,

    /// Interrupted by signal (SIGINT - Ctrl+C) (130)
    Interrupted = 130,

    /// Terminated by signal (SIGTERM) (143)
    Terminated = 143,
}

impl ExitCode {
    /// Convert to i32 for use with std::process::exit
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    /// Create ExitCode from an error type using substring heuristics.
    ///
    /// Used for errors that did not originate from `cube_domain::CubeError`
    /// (e.g. configuration loading failures). Prefer
    /// [`map_error_to_exit_code`] for `CubeError` values, which classifies
    /// by variant instead of message text.
    pub fn from_error(error: &dyn std::error::Error) -> Self {
        let error_string = error.to_string().to_lowercase();

        if error_string.contains("permission") || error_string.contains("forbidden") {
            ExitCode::NoPerm
        } else if error_string.contains("not found") || error_string.contains("no such") {
            ExitCode::Unavailable
        } else if error_string.contains("tampered") || error_string.contains("signature") {
            ExitCode::Protocol
        } else if error_string.contains("invalid") || error_string.contains("argument") {
            ExitCode::UsageError
        } else if error_string.contains("malformed") || error_string.contains("parse") {
            ExitCode::DataError
        } else if error_string.contains("io") || error_string.contains("read") || error_string.contains("write") {
            ExitCode::IoError
        } else if error_string.contains("config") {
            ExitCode::Config
        } else {
            ExitCode::Error
        }
    }

    /// Human-readable description of the exit code
    pub fn description(self) -> &'static str {
        match self {
            ExitCode::Success => "Success",
            ExitCode::Error => "General error",
            ExitCode::UsageError => "Command line usage error",
            ExitCode::DataError => "Malformed envelope, token, or request data",
            ExitCode::NoInput => "Cannot open input",
            ExitCode::NoUser => "User does not exist",
            ExitCode::NoHost => "Host name unknown",
            ExitCode::Unavailable => "Cube, Export, or dependent service unavailable",
            ExitCode::Software => "Internal software error",
            ExitCode::OsError => "System error",
            ExitCode::OsFile => "Critical OS file missing",
            ExitCode::CantCreate => "Cannot create output file",
            ExitCode::IoError => "I/O error",
            ExitCode::TempFail => "Temporary failure, retry",
            ExitCode::Protocol => "Tamper/signature verification failed",
            ExitCode::NoPerm => "Permission denied",
            ExitCode::Config => "Configuration error",
            ExitCode::Interrupted => "Interrupted by signal (SIGINT)",
            ExitCode::Terminated => "Terminated by signal (SIGTERM)",
        }
    }

    pub fn is_success(self) -> bool {
        matches!(self, ExitCode::Success)
    }

    pub fn is_error(self) -> bool {
        !self.is_success()
    }

    pub fn is_signal(self) -> bool {
        matches!(self, ExitCode::Interrupted | ExitCode::Terminated)
    }
}

impl fmt::Display for ExitCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.description(), self.as_i32())
    }
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> i32 {
        code.as_i32()
    }
}

/// Map a `CubeError` to the exit code a shell script can branch on.
///
/// Classification is by variant, not by message text: `Forbidden` (limit
/// exhausted, ownership violation, expired token) always maps to
/// [`ExitCode::NoPerm`] regardless of which forbidding condition fired.
pub fn map_error_to_exit_code(error: &cube_domain::error::CubeError) -> ExitCode {
    use cube_domain::error::CubeError;

    match error {
        CubeError::Malformed(_) => ExitCode::DataError,
        CubeError::Tampered(_) => ExitCode::Protocol,
        CubeError::Unauthorized(_) => ExitCode::NoPerm,
        CubeError::Forbidden(_) => ExitCode::NoPerm,
        CubeError::NotFound(_) => ExitCode::Unavailable,
        CubeError::Conflict(_) => ExitCode::TempFail,
        CubeError::Cancelled => ExitCode::Interrupted,
        CubeError::Io(_) => ExitCode::IoError,
        CubeError::Serialization(_) => ExitCode::DataError,
        CubeError::Database(_) => ExitCode::Unavailable,
        CubeError::Crypto(_) => ExitCode::Software,
        CubeError::InvalidConfiguration(_) => ExitCode::Config,
        CubeError::Internal(_) => ExitCode::Software,
    }
}

/// Map a `Result<T, CubeError>` to a process exit code, logging the error
/// (if any) before returning.
pub fn result_to_exit_code<T>(result: Result<T, cube_domain::error::CubeError>) -> std::process::ExitCode {
    match result {
        Ok(_) => std::process::ExitCode::from(ExitCode::Success.as_i32() as u8),
        Err(e) => {
            let code = map_error_to_exit_code(&e);
            tracing::error!("{}", e);
            std::process::ExitCode::from(code.as_i32() as u8)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_code_values() {
        assert_eq!(ExitCode::Success.as_i32(), 0);
        assert_eq!(ExitCode::Error.as_i32(), 1);
        assert_eq!(ExitCode::UsageError.as_i32(), 64);
        assert_eq!(ExitCode::Config.as_i32(), 78);
        assert_eq!(ExitCode::Interrupted.as_i32(), 130);
        assert_eq!(ExitCode::Terminated.as_i32(), 143);
    }

    #[test]
    fn test_is_success_and_error() {
        assert!(ExitCode::Success.is_success());
        assert!(!ExitCode::Error.is_success());
        assert!(ExitCode::Error.is_error());
    }

    #[test]
    fn test_is_signal() {
        assert!(ExitCode::Interrupted.is_signal());
        assert!(ExitCode::Terminated.is_signal());
        assert!(!ExitCode::Success.is_signal());
    }

    #[test]
    fn test_default() {
        assert_eq!(ExitCode::default(), ExitCode::Success);
    }

    #[test]
    fn test_display() {
        let display = format!("{}", ExitCode::UsageError);
        assert!(display.contains("usage error"));
        assert!(display.contains("64"));
    }

    #[test]
    fn test_from_error_permission() {
        use std::io;
        let err = io::Error::new(io::ErrorKind::PermissionDenied, "forbidden: limit exhausted");
        assert_eq!(ExitCode::from_error(&err), ExitCode::NoPerm);
    }

    #[test]
    fn test_from_error_not_found() {
        use std::io;
        let err = io::Error::new(io::ErrorKind::NotFound, "cube not found");
        assert_eq!(ExitCode::from_error(&err), ExitCode::Unavailable);
    }

    #[test]
    fn test_conversion_to_i32() {
        let code: i32 = ExitCode::Config.into();
        assert_eq!(code, 78);
    }

    #[test]
    fn test_map_error_to_exit_code() {
        use cube_domain::error::CubeError;

        assert_eq!(
            map_error_to_exit_code(&CubeError::Forbidden("absorb_limit exhausted".into())),
            ExitCode::NoPerm
        );
        assert_eq!(
            map_error_to_exit_code(&CubeError::Tampered("signature mismatch".into())),
            ExitCode::Protocol
        );
        assert_eq!(map_error_to_exit_code(&CubeError::NotFound("cube".into())), ExitCode::Unavailable);
        assert_eq!(map_error_to_exit_code(&CubeError::Cancelled), ExitCode::Interrupted);
    }
}
