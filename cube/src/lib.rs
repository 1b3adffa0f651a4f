// /////////////////////////////////////////////////////////////////////////////
// Adaptive Pipeline
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

// Production code safety enforced via CI and `make lint-strict`
// (lib/bins checked separately from tests - tests may use unwrap/expect)

//! # Cube
//!
//! A cryptographic portability and permission-inheritance subsystem for
//! memory cubes: register a Cube, absorb content into it, export it as a
//! signed, encrypted envelope, mint licensing tokens that carve out a
//! permission subset of the source grant, and import those envelopes back
//! into new Cubes that carry forward their full lineage and usage history.
//!
//! ## Architecture Overview
//!
//! This crate follows Clean Architecture / Domain-Driven Design, split
//! across three crates in the workspace:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    cube-bootstrap                           │
//! │  (CLI parsing, signal handling, exit codes, composition)    │
//! └─────────────────────────────────────────────────────────────┘
//!                                │
//! ┌─────────────────────────────────────────────────────────────┐
//! │                  cube (this crate)                           │
//! │  application/      use cases, commands                      │
//! │  infrastructure/   sqlite repositories, crypto/envelope/     │
//! │                    key-token adapters, config, logging       │
//! │  presentation/     CLI command dispatch                      │
//! └─────────────────────────────────────────────────────────────┘
//!                                │
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     cube-domain                              │
//! │  entities, value objects, the CubeAggregate, the permission  │
//! │  inheritance algebra, and the port traits infrastructure     │
//! │  implements                                                  │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Core Concepts
//!
//! - **Cube**: a named, owned container with a tri-state permission grant
//!   (`LimitValue`: forbidden / remaining(N) / unlimited per operation) and
//!   an inner store of absorbed content.
//! - **Export**: a point-in-time, RSA-signed, AES-sealed envelope of a
//!   Cube's inner store plus its full lineage and stats history.
//! - **Licensing token**: a signed `KeyPayload` minted against an export,
//!   carrying a permission subset that must never exceed the source Cube's
//!   own grant (the inheritance algebra in `cube_domain::services`).
//! - **Import**: materializes a brand-new Cube from an envelope plus a
//!   token, carrying lineage and stats forward without consuming any limit
//!   on the original Cube.
//!
//! ## Error Handling
//!
//! Every fallible operation in `application` and `infrastructure` returns
//! `cube_domain::error::CubeError`. `cube::presentation::BoundaryCode`
//! classifies an error for a boundary layer's own purposes;
//! `cube_bootstrap::exit_code::map_error_to_exit_code` derives the Unix
//! exit status the CLI process terminates with.
//!
//! ## Testing
//!
//! Unit tests live alongside the code they cover (`#[cfg(test)]` modules);
//! end-to-end scenarios live under `tests/`.

pub mod application;
pub mod infrastructure;
pub mod presentation;

pub use cube_domain::aggregates::CubeAggregate;
pub use cube_domain::entities::{Cube, Export, KeyPayload};
pub use cube_domain::error::CubeError;
pub use cube_domain::events::CubeEvent;
