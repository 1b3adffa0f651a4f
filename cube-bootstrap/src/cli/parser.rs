// /////////////////////////////////////////////////////////////////////////////
// Adaptive Pipeline RS
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # CLI Structure and Parsing
//!
//! Defines the `clap`-derived CLI surface for the `cube` binary and the raw
//! `parse_cli()` entry point. Values produced here are untrusted until they
//! pass through [`super::validator::SecureArgParser`].

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Cube: a cryptographic container with inheritable, tri-state permissions.
#[derive(Parser, Debug)]
#[command(name = "cube")]
#[command(author, version, about = "Create, export, and share cryptographically sealed Cubes", long_about = None)]
pub struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to a layered configuration file (TOML)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Override the database connection URL (defaults to the configured SQLite file)
    #[arg(long, global = true)]
    pub database_url: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Register a new, empty Cube owned by the caller
    Create {
        /// Human-readable name for the Cube
        name: String,

        /// Optional free-text description
        #[arg(short, long)]
        description: Option<String>,
    },

    /// Absorb a file's content into an existing Cube, consuming absorb_limit
    Absorb {
        /// Name or id of the target Cube
        cube: String,

        /// Path to the content to absorb
        #[arg(short, long)]
        input: PathBuf,
    },

    /// Export a Cube to a portable, encrypted envelope, consuming export_limit
    Export {
        /// Name or id of the Cube to export
        cube: String,

        /// Destination path for the envelope archive
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Mint a licensing token for a previously exported envelope
    GenKey {
        /// Path to the exported envelope
        #[arg(short, long)]
        envelope: PathBuf,

        /// Remaining export operations granted to the holder (-1 forbidden, 0 unlimited)
        #[arg(long, default_value_t = -1)]
        export_limit: i64,

        /// Remaining re-key operations granted to the holder
        #[arg(long, default_value_t = -1)]
        rekey_limit: i64,

        /// Remaining key-generation operations granted to the holder
        #[arg(long, default_value_t = -1)]
        genkey_limit: i64,

        /// Remaining absorb operations granted to the holder
        #[arg(long, default_value_t = 0)]
        absorb_limit: i64,

        /// Remaining memify (embedding-config update) operations granted to the holder
        #[arg(long, default_value_t = -1)]
        memify_limit: i64,

        /// Remaining query operations granted to the holder
        #[arg(long, default_value_t = 0)]
        query_limit: i64,

        /// Grant permission to read usage/contributor statistics
        #[arg(long)]
        allow_stats: bool,

        /// Optional RFC 3339 expiry timestamp after which the token is rejected
        #[arg(long)]
        expire_at: Option<String>,

        /// Destination path for the generated token (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Materialize a new Cube from an envelope plus a licensing token
    Import {
        /// Path to the envelope archive
        #[arg(short, long)]
        envelope: PathBuf,

        /// Path to the licensing token
        #[arg(short, long)]
        token: PathBuf,
    },

    /// Replace an imported Cube's permissions using a fresh token
    ReKey {
        /// Name or id of the target Cube
        cube: String,

        /// Path to the replacement licensing token
        #[arg(short, long)]
        token: PathBuf,
    },

    /// Read usage and contributor statistics for a Cube
    Stats {
        /// Name or id of the target Cube
        cube: String,
    },

    /// Delete a Cube, its lineage, its stats, and its inner store
    Delete {
        /// Name or id of the target Cube
        cube: String,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        force: bool,
    },
}

/// Parse CLI arguments using clap
///
/// Clap handles `--help`/`--version` and malformed-argument errors itself,
/// exiting the process before this function returns in those cases.
pub fn parse_cli() -> Cli {
    Cli::parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_create_command() {
        let cli = Cli::parse_from(["cube", "create", "vault", "--description", "test cube"]);
        match cli.command {
            Commands::Create { name, description } => {
                assert_eq!(name, "vault");
                assert_eq!(description.as_deref(), Some("test cube"));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn parses_genkey_defaults() {
        let cli = Cli::parse_from(["cube", "genkey", "--envelope", "out.cube"]);
        match cli.command {
            Commands::GenKey {
                export_limit,
                rekey_limit,
                genkey_limit,
                absorb_limit,
                memify_limit,
                query_limit,
                allow_stats,
                ..
            } => {
                assert_eq!(export_limit, -1);
                assert_eq!(rekey_limit, -1);
                assert_eq!(genkey_limit, -1);
                assert_eq!(absorb_limit, 0);
                assert_eq!(memify_limit, -1);
                assert_eq!(query_limit, 0);
                assert!(!allow_stats);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn parses_delete_force_flag() {
        let cli = Cli::parse_from(["cube", "delete", "vault", "--force"]);
        match cli.command {
            Commands::Delete { cube, force } => {
                assert_eq!(cube, "vault");
                assert!(force);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
