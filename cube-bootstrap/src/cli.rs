// /////////////////////////////////////////////////////////////////////////////
// Adaptive Pipeline RS
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Command-Line Interface Module
//!
//! Bootstrap-layer CLI handling with security-first design.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────┐
//! │  1. parser::parse()                 │  Parse CLI with clap
//! └─────────────────┬───────────────────┘
//!                   ↓
//! ┌─────────────────────────────────────┐
//! │  2. validator::validate()           │  Security validation
//! └─────────────────┬───────────────────┘
//!                   ↓
//! ┌─────────────────────────────────────┐
//! │  3. ValidatedConfig                 │  Safe, validated config
//! └─────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - `parser` - CLI structure and clap parsing
//! - `validator` - Security validation layer

pub mod parser;
pub mod validator;

pub use parser::{parse_cli, Cli, Commands};
pub use validator::{ParseError, SecureArgParser};

use std::path::PathBuf;

/// Validated CLI configuration
///
/// Holds all CLI arguments after security validation: paths are canonicalized
/// (when they must already exist) or pattern-checked (when they are an output
/// location), and every numeric argument is range-checked.
#[derive(Debug, Clone)]
pub struct ValidatedCli {
    pub command: ValidatedCommand,
    pub verbose: bool,
    pub config: Option<PathBuf>,
    pub database_url: Option<String>,
}

/// Validated command variants, one per Cube operation.
#[derive(Debug, Clone)]
pub enum ValidatedCommand {
    /// CreateCube: register a new, empty Cube owned by the caller.
    Create { name: String, description: Option<String> },
    /// AbsorbCube: feed content into an existing Cube, consuming `absorb_limit`.
    Absorb { cube: String, input: PathBuf },
    /// ExportCube: produce a portable envelope file, consuming `export_limit`.
    Export { cube: String, output: PathBuf },
    /// GenKeyCube: mint a licensing token against a previously exported envelope.
    GenKey {
        envelope: PathBuf,
        export_limit: i64,
        rekey_limit: i64,
        genkey_limit: i64,
        absorb_limit: i64,
        memify_limit: i64,
        query_limit: i64,
        allow_stats: bool,
        expire_at: Option<String>,
        output: Option<PathBuf>,
    },
    /// ImportCube: materialize a new Cube from an envelope plus a licensing token.
    Import { envelope: PathBuf, token: PathBuf },
    /// ReKeyCube: replace an imported Cube's permissions using a fresh token.
    ReKey { cube: String, token: PathBuf },
    /// StatsCube: read usage and contributor statistics for a Cube.
    Stats { cube: String },
    /// DeleteCube: remove a Cube, its lineage, its stats, and its inner store.
    Delete { cube: String, force: bool },
}

/// Parse and validate CLI arguments
///
/// Combines parsing and validation:
/// 1. Parse CLI with clap
/// 2. Validate all paths with SecureArgParser
/// 3. Validate all numeric values (including the permission tri-state range)
/// 4. Return ValidatedCli on success
///
/// # Errors
///
/// Returns `ParseError` if any validation fails.
pub fn parse_and_validate() -> Result<ValidatedCli, ParseError> {
    let cli = parse_cli();
    validate_cli(cli)
}

/// Validate a permission limit argument against the tri-state encoding:
/// `0 = unlimited`, `N > 0 = N remaining`, `-1 = forbidden`. Any other
/// negative value is not a valid limit.
fn validate_limit(arg_name: &str, value: i64) -> Result<i64, ParseError> {
    if value < -1 {
        return Err(ParseError::InvalidValue {
            arg: arg_name.to_string(),
            reason: "must be -1 (forbidden), 0 (unlimited), or a positive remaining count".to_string(),
        });
    }
    Ok(value)
}

/// Validate parsed CLI arguments
fn validate_cli(cli: Cli) -> Result<ValidatedCli, ParseError> {
    let config = if let Some(ref path) = cli.config {
        SecureArgParser::validate_argument(&path.to_string_lossy())?;
        Some(path.clone())
    } else {
        None
    };

    if let Some(ref url) = cli.database_url {
        SecureArgParser::validate_argument(url)?;
    }

    let command = match cli.command {
        Commands::Create { name, description } => {
            SecureArgParser::validate_argument(&name)?;
            if let Some(ref d) = description {
                SecureArgParser::validate_argument(d)?;
            }
            ValidatedCommand::Create { name, description }
        }
        Commands::Absorb { cube, input } => {
            SecureArgParser::validate_argument(&cube)?;
            let validated_input = SecureArgParser::validate_path(&input.to_string_lossy())?;
            ValidatedCommand::Absorb {
                cube,
                input: validated_input,
            }
        }
        Commands::Export { cube, output } => {
            SecureArgParser::validate_argument(&cube)?;
            SecureArgParser::validate_argument(&output.to_string_lossy())?;
            ValidatedCommand::Export { cube, output }
        }
        Commands::GenKey {
            envelope,
            export_limit,
            rekey_limit,
            genkey_limit,
            absorb_limit,
            memify_limit,
            query_limit,
            allow_stats,
            expire_at,
            output,
        } => {
            let validated_envelope = SecureArgParser::validate_path(&envelope.to_string_lossy())?;
            let export_limit = validate_limit("export-limit", export_limit)?;
            let rekey_limit = validate_limit("rekey-limit", rekey_limit)?;
            let genkey_limit = validate_limit("genkey-limit", genkey_limit)?;
            let absorb_limit = validate_limit("absorb-limit", absorb_limit)?;
            let memify_limit = validate_limit("memify-limit", memify_limit)?;
            let query_limit = validate_limit("query-limit", query_limit)?;

            if let Some(ref e) = expire_at {
                SecureArgParser::validate_argument(e)?;
            }
            if let Some(ref path) = output {
                SecureArgParser::validate_argument(&path.to_string_lossy())?;
            }

            ValidatedCommand::GenKey {
                envelope: validated_envelope,
                export_limit,
                rekey_limit,
                genkey_limit,
                absorb_limit,
                memify_limit,
                query_limit,
                allow_stats,
                expire_at,
                output,
            }
        }
        Commands::Import { envelope, token } => {
            let validated_envelope = SecureArgParser::validate_path(&envelope.to_string_lossy())?;
            let validated_token = SecureArgParser::validate_path(&token.to_string_lossy())?;
            ValidatedCommand::Import {
                envelope: validated_envelope,
                token: validated_token,
            }
        }
        Commands::ReKey { cube, token } => {
            SecureArgParser::validate_argument(&cube)?;
            let validated_token = SecureArgParser::validate_path(&token.to_string_lossy())?;
            ValidatedCommand::ReKey {
                cube,
                token: validated_token,
            }
        }
        Commands::Stats { cube } => {
            SecureArgParser::validate_argument(&cube)?;
            ValidatedCommand::Stats { cube }
        }
        Commands::Delete { cube, force } => {
            SecureArgParser::validate_argument(&cube)?;
            ValidatedCommand::Delete { cube, force }
        }
    };

    Ok(ValidatedCli {
        command,
        verbose: cli.verbose,
        config,
        database_url: cli.database_url,
    })
}
