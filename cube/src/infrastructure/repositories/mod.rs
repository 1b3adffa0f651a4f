// /////////////////////////////////////////////////////////////////////////////
// Adaptive Pipeline RS
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # SQLite Repository Implementations
//!
//! Concrete, sqlx-backed implementations of the `cube_domain::repositories`
//! ports. Every transactional method named in those traits opens exactly one
//! `sqlx` transaction and commits or rolls back as a unit (§5, I5).

pub mod schema;
pub mod sqlite_cube_repository;
pub mod sqlite_export_repository;
pub mod sqlite_lineage_repository;
pub mod sqlite_stats_repository;

pub use sqlite_cube_repository::SqliteCubeRepository;
pub use sqlite_export_repository::SqliteExportRepository;
pub use sqlite_lineage_repository::SqliteLineageRepository;
pub use sqlite_stats_repository::SqliteStatsRepository;

use cube_domain::CubeError;

/// `cube_domain::CubeError` cannot carry a `From<sqlx::Error>` impl (orphan
/// rules — see the note in `cube_domain::error::cube_error`); every query
/// site in this module maps through this helper instead.
pub fn map_sqlx_error(err: sqlx::Error) -> CubeError {
    match err {
        sqlx::Error::RowNotFound => CubeError::not_found("row not found"),
        other => CubeError::Database(other.to_string()),
    }
}
