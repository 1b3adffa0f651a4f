// /////////////////////////////////////////////////////////////////////////////
// Adaptive Pipeline RS
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Repositories
//!
//! Persistence ports for the aggregates and child records of §3.
//! Concrete `sqlx`-backed implementations live in
//! `cube::infrastructure::repositories`. Every transactional-limit method
//! named here (`consume_limit_transactional`,
//! `consume_rekey_and_replace_transactional`,
//! `create_with_limit_consumption`) is the single named place the "re-read
//! inside the transaction" rule of §5/I5 is implemented — application code
//! never composes that re-read from smaller repository calls.

pub mod cube_repository;
pub mod export_repository;
pub mod lineage_repository;
pub mod stats_repository;

pub use cube_repository::CubeRepository;
pub use export_repository::{ExportRepository, NewExport};
pub use lineage_repository::LineageRepository;
pub use stats_repository::StatsRepository;
