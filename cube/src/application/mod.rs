// /////////////////////////////////////////////////////////////////////////////
// Adaptive Pipeline
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Application Layer
//!
//! Commands and use cases. `cube::presentation` is the only caller of
//! anything in here; everything below talks to `cube_domain` and
//! `cube::infrastructure` through ports, never directly to sqlx or the
//! filesystem.

pub mod commands;
pub mod use_cases;
