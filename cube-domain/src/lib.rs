// /////////////////////////////////////////////////////////////////////////////
// Adaptive Pipeline RS
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # cube-domain
//!
//! Pure, reusable business logic for the Cube cryptographic portability and
//! permission-inheritance subsystem: entities, value objects, domain
//! services, and the repository/collaborator ports that `cube`'s
//! application and infrastructure layers implement and drive.
//!
//! This crate follows the same Domain-Driven Design layering as the rest of
//! the workspace: no I/O, no async runtime, no logging — only types and pure
//! functions, plus the `async-trait` ports that describe the shape of I/O
//! the surrounding layers must provide. See the module-level docs under
//! [`aggregates`], [`entities`], [`value_objects`], [`services`], and
//! [`repositories`] for the design rationale behind each piece; `DESIGN.md`
//! at the workspace root is the grounding ledger for how this maps onto the
//! specification.

pub mod aggregates;
pub mod entities;
pub mod error;
pub mod events;
pub mod repositories;
pub mod services;
pub mod value_objects;

pub use aggregates::CubeAggregate;
pub use entities::{Cube, Export, KeyPayload};
pub use error::CubeError;
pub use events::CubeEvent;
