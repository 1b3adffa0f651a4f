// /////////////////////////////////////////////////////////////////////////////
// Adaptive Pipeline RS
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # CubeAggregate — the transactional consistency boundary around a Cube
//!
//! `CubeAggregate` wraps a [`Cube`] and enforces the state-machine
//! transitions of §4.6 as pure, in-memory operations: every limit-consuming
//! method re-checks the relevant field's classification before consuming it,
//! so the "re-read inside the transaction" rule (§5) has exactly one place
//! to live. Persistence and crypto I/O never happen here — the application
//! layer wraps these calls in its own transactional scope and is responsible
//! for calling them against a limit value it just re-read from the store,
//! not a stale in-memory copy.
//!
//! Events are buffered on the aggregate rather than published immediately,
//! since several transitions (`ExportCube`, `ImportCube`) only learn their
//! own id after the triggering row is inserted; the application layer drains
//! [`CubeAggregate::into_parts`] and publishes events only after its
//! transaction commits.

use chrono::{DateTime, Utc};

use crate::entities::Cube;
use crate::error::CubeError;
use crate::events::CubeEvent;
use crate::value_objects::{EmbeddingConfig, ExportId, OwnerId, PermissionField, Permissions};

pub struct CubeAggregate {
    cube: Cube,
    pending_events: Vec<CubeEvent>,
}

impl CubeAggregate {
    /// Wraps an already-loaded Cube (the common case: load, mutate, save).
    pub fn load(cube: Cube) -> Self {
        Self {
            cube,
            pending_events: Vec::new(),
        }
    }

    /// `CreateCube`: builds a brand-new aggregate and records its `Created`
    /// event. `embedding_config` validation (if any) is the caller's
    /// responsibility — the domain treats it as an opaque bag.
    #[allow(clippy::too_many_arguments)]
    pub fn create(cube: Cube) -> Self {
        let event = CubeEvent::Created {
            cube_id: cube.id,
            uuid: cube.uuid,
            owner_id: cube.owner_id,
            at: cube.created_at,
        };
        Self {
            cube,
            pending_events: vec![event],
        }
    }

    pub fn cube(&self) -> &Cube {
        &self.cube
    }

    pub fn into_parts(self) -> (Cube, Vec<CubeEvent>) {
        (self.cube, self.pending_events)
    }

    fn push(&mut self, event: CubeEvent) {
        self.pending_events.push(event);
    }

    /// Fails fast if `field` is already `Forbidden`; this is the fast-fail
    /// check of §5 — it carries no authority on its own, the application
    /// layer MUST repeat it against a value re-read inside its transaction
    /// immediately before calling the corresponding `consume_*` method.
    fn require_not_forbidden(&self, field: PermissionField) -> Result<(), CubeError> {
        if self.cube.permissions.field(field).is_forbidden() {
            return Err(CubeError::forbidden(format!("{} is forbidden", field.name())));
        }
        Ok(())
    }

    /// `AbsorbCube`: consumes `absorb_limit` (OQ1 — the application layer
    /// performs the inner-DB absorption before calling this, and accepts the
    /// documented skew if this step then fails).
    pub fn absorb(&mut self, now: DateTime<Utc>) -> Result<(), CubeError> {
        self.require_not_forbidden(PermissionField::Absorb)?;
        self.cube = self.cube.consuming(PermissionField::Absorb, now)?;
        self.push(CubeEvent::Absorbed { cube_id: self.cube.id, at: now });
        Ok(())
    }

    /// `ExportCube`: consumes `export_limit`. The event is recorded with the
    /// `export_id` assigned by the repository's insert, passed in by the
    /// caller once known.
    pub fn export(&mut self, export_id: ExportId, now: DateTime<Utc>) -> Result<(), CubeError> {
        self.require_not_forbidden(PermissionField::Export)?;
        self.cube = self.cube.consuming(PermissionField::Export, now)?;
        self.push(CubeEvent::Exported {
            cube_id: self.cube.id,
            export_id,
            at: now,
        });
        Ok(())
    }

    /// `GenKeyCube`: consumes `genkey_limit` on the *source* Cube (this
    /// aggregate must already be loaded as the source, not the eventual
    /// child). Inheritance (`check_inheritance`) is verified by the caller
    /// via [`crate::services::permission_algebra`] before calling this.
    pub fn genkey(&mut self, export_id: ExportId, now: DateTime<Utc>) -> Result<(), CubeError> {
        self.require_not_forbidden(PermissionField::Genkey)?;
        self.cube = self.cube.consuming(PermissionField::Genkey, now)?;
        self.push(CubeEvent::KeyGenerated {
            source_cube_id: self.cube.id,
            export_id,
            at: now,
        });
        Ok(())
    }

    /// `ImportCube`: no limit is consumed on the parent (the token itself
    /// represents consumption, §4.6); this records the `Imported` event on
    /// the freshly created child aggregate.
    pub fn record_import(&mut self, source_export_id: ExportId, now: DateTime<Utc>) {
        self.push(CubeEvent::Imported {
            cube_id: self.cube.id,
            source_export_id,
            at: now,
        });
    }

    /// `ReKeyCube`: requires an imported Cube (I1), consumes `rekey_limit`
    /// *before* the new grant replaces the old one (§4.6), then replaces
    /// permissions and expiration wholesale. Per OQ2, inheritance is not
    /// re-checked here — the supplied token already passed inheritance at
    /// `GenKeyCube` time.
    pub fn rekey(&mut self, new_permissions: Permissions, new_expire_at: Option<DateTime<Utc>>, now: DateTime<Utc>) -> Result<(), CubeError> {
        if self.cube.source_export_id.is_none() {
            return Err(CubeError::forbidden("rekey requires an imported cube (source_export_id is null)"));
        }
        self.require_not_forbidden(PermissionField::Rekey)?;
        self.cube = self.cube.consuming(PermissionField::Rekey, now)?;
        self.cube = self.cube.with_permissions(new_permissions, new_expire_at, now);
        self.push(CubeEvent::ReKeyed { cube_id: self.cube.id, at: now });
        Ok(())
    }

    /// `DeleteCube`: requires ownership; the aggregate only validates and
    /// records the event, actual row/file removal is the repository's job.
    pub fn delete(&mut self, requesting_owner: OwnerId, now: DateTime<Utc>) -> Result<(), CubeError> {
        if !self.cube.is_owned_by(requesting_owner) {
            return Err(CubeError::unauthorized("only the owning user may delete a cube"));
        }
        self.push(CubeEvent::Deleted {
            cube_id: self.cube.id,
            owner_id: requesting_owner,
            at: now,
        });
        Ok(())
    }

    /// Pass-through accessor used by application code that needs to
    /// recompute the embedding config without reaching into `cube()`.
    pub fn embedding_config(&self) -> &EmbeddingConfig {
        &self.cube.embedding_config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value_objects::{CubeId, CubeUuid, LimitValue, TenantId};

    fn cube() -> Cube {
        Cube::new_created(
            CubeId::from_db(1),
            CubeUuid::from_uuid(uuid::Uuid::nil()),
            OwnerId::new(1),
            "c",
            None,
            EmbeddingConfig::empty(),
            TenantId::new("a", "v"),
            DateTime::UNIX_EPOCH,
        )
    }

    #[test]
    fn absorb_consumes_limit_and_records_event() {
        let mut agg = CubeAggregate::load(cube());
        agg.absorb(DateTime::UNIX_EPOCH).unwrap();
        let (cube, events) = agg.into_parts();
        assert_eq!(cube.permissions.absorb_limit, LimitValue::Unlimited);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].name(), "cube.absorbed");
    }

    #[test]
    fn absorb_forbidden_rejects_before_touching_cube() {
        let mut c = cube();
        c.permissions.absorb_limit = LimitValue::Forbidden;
        let mut agg = CubeAggregate::load(c);
        assert!(agg.absorb(DateTime::UNIX_EPOCH).is_err());
        let (_, events) = agg.into_parts();
        assert!(events.is_empty());
    }

    #[test]
    fn rekey_requires_imported_cube() {
        let mut agg = CubeAggregate::load(cube());
        let err = agg.rekey(Permissions::unlimited(), None, DateTime::UNIX_EPOCH).unwrap_err();
        assert!(matches!(err, CubeError::Forbidden(_)));
    }

    #[test]
    fn rekey_replaces_permissions_after_consuming_rekey_limit() {
        let mut c = cube();
        c.source_export_id = Some(ExportId::from_db(5));
        let mut agg = CubeAggregate::load(c);
        let mut next_perms = Permissions::unlimited();
        next_perms.query_limit = LimitValue::Remaining(100);
        agg.rekey(next_perms.clone(), None, DateTime::UNIX_EPOCH).unwrap();
        let (cube, _) = agg.into_parts();
        assert_eq!(cube.permissions.query_limit, LimitValue::Remaining(100));
        assert_eq!(cube.permissions.rekey_limit, LimitValue::Unlimited);
    }

    #[test]
    fn delete_rejects_non_owner() {
        let mut agg = CubeAggregate::load(cube());
        let err = agg.delete(OwnerId::new(999), DateTime::UNIX_EPOCH).unwrap_err();
        assert!(matches!(err, CubeError::Unauthorized(_)));
    }
}
