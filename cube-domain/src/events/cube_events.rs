// /////////////////////////////////////////////////////////////////////////////
// Adaptive Pipeline RS
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Domain Events
//!
//! One variant per state transition of §4.6. Events are collected by
//! [`crate::aggregates::cube_aggregate::CubeAggregate`] and drained by the
//! application layer after a successful transactional commit — they are
//! never published from inside the domain itself, which has no event bus
//! dependency.

use chrono::{DateTime, Utc};

use crate::value_objects::{CubeId, CubeUuid, ExportId, OwnerId};

#[derive(Debug, Clone, PartialEq)]
pub enum CubeEvent {
    Created {
        cube_id: CubeId,
        uuid: CubeUuid,
        owner_id: OwnerId,
        at: DateTime<Utc>,
    },
    Absorbed {
        cube_id: CubeId,
        at: DateTime<Utc>,
    },
    Exported {
        cube_id: CubeId,
        export_id: ExportId,
        at: DateTime<Utc>,
    },
    KeyGenerated {
        source_cube_id: CubeId,
        export_id: ExportId,
        at: DateTime<Utc>,
    },
    Imported {
        cube_id: CubeId,
        source_export_id: ExportId,
        at: DateTime<Utc>,
    },
    ReKeyed {
        cube_id: CubeId,
        at: DateTime<Utc>,
    },
    Deleted {
        cube_id: CubeId,
        owner_id: OwnerId,
        at: DateTime<Utc>,
    },
}

impl CubeEvent {
    pub fn cube_id(&self) -> CubeId {
        match self {
            CubeEvent::Created { cube_id, .. }
            | CubeEvent::Absorbed { cube_id, .. }
            | CubeEvent::Exported { cube_id, .. }
            | CubeEvent::Imported { cube_id, .. }
            | CubeEvent::ReKeyed { cube_id, .. }
            | CubeEvent::Deleted { cube_id, .. } => *cube_id,
            CubeEvent::KeyGenerated { source_cube_id, .. } => *source_cube_id,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            CubeEvent::Created { .. } => "cube.created",
            CubeEvent::Absorbed { .. } => "cube.absorbed",
            CubeEvent::Exported { .. } => "cube.exported",
            CubeEvent::KeyGenerated { .. } => "cube.key_generated",
            CubeEvent::Imported { .. } => "cube.imported",
            CubeEvent::ReKeyed { .. } => "cube.rekeyed",
            CubeEvent::Deleted { .. } => "cube.deleted",
        }
    }
}
