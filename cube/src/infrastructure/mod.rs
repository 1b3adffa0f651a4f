// /////////////////////////////////////////////////////////////////////////////
// Adaptive Pipeline RS
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Infrastructure Layer
//!
//! Adapters and repositories implementing the `cube_domain::services` and
//! `cube_domain::repositories` ports, plus the ambient concerns that sit
//! outside the domain entirely: configuration loading and tracing
//! initialization.

pub mod adapters;
pub mod config;
pub mod logging;
pub mod repositories;
