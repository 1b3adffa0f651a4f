// /////////////////////////////////////////////////////////////////////////////
// Adaptive Pipeline RS
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Entities
//!
//! Identity-bearing types in the Cube domain model, keyed by the data model
//! of §3: [`Cube`] is the aggregate root; [`Export`], [`LineageEntry`],
//! [`UsageStat`], [`ContributorStat`] are owned child records; [`KeyPayload`]
//! is the transient body of a licensing token.

pub mod contributor_stat;
pub mod cube;
pub mod export;
pub mod key_payload;
pub mod lineage;
pub mod usage_stat;

pub use contributor_stat::ContributorStat;
pub use cube::Cube;
pub use export::Export;
pub use key_payload::KeyPayload;
pub use lineage::LineageEntry;
pub use usage_stat::UsageStat;
