// /////////////////////////////////////////////////////////////////////////////
// Adaptive Pipeline RS
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # FilesystemCubeStore — the inner Cube database file, on disk (§2, §5)
//!
//! Paths are derived deterministically from tenant + owner + Cube UUID, never
//! shared across Cubes:
//! `<storage_root>/<apx_id>/<vdr_id>/<owner_id>/<uuid>.db`. The adapter has
//! no notion of what the file contains — it is an opaque blob to everything
//! above this module, per the Non-goals of §1.

use std::path::PathBuf;

use async_trait::async_trait;
use tokio::fs;

use cube_domain::services::CubeStoreAdapter;
use cube_domain::value_objects::{CubeUuid, OwnerId, TenantId};
use cube_domain::CubeError;

#[derive(Debug, Clone)]
pub struct FilesystemCubeStore {
    storage_root: PathBuf,
}

impl FilesystemCubeStore {
    pub fn new(storage_root: impl Into<PathBuf>) -> Self {
        Self { storage_root: storage_root.into() }
    }

    fn path_for(&self, tenant: &TenantId, owner_id: OwnerId, uuid: CubeUuid) -> PathBuf {
        self.storage_root.join(&tenant.apx_id).join(&tenant.vdr_id).join(owner_id.value().to_string()).join(format!("{uuid}.db"))
    }
}

#[async_trait]
impl CubeStoreAdapter for FilesystemCubeStore {
    async fn create(&self, tenant: &TenantId, owner_id: OwnerId, uuid: CubeUuid) -> Result<(), CubeError> {
        let path = self.path_for(tenant, owner_id, uuid);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }
        fs::write(&path, []).await?;
        Ok(())
    }

    async fn read_bytes(&self, tenant: &TenantId, owner_id: OwnerId, uuid: CubeUuid) -> Result<Vec<u8>, CubeError> {
        let path = self.path_for(tenant, owner_id, uuid);
        Ok(fs::read(&path).await?)
    }

    async fn write_bytes(&self, tenant: &TenantId, owner_id: OwnerId, uuid: CubeUuid, bytes: &[u8]) -> Result<(), CubeError> {
        let path = self.path_for(tenant, owner_id, uuid);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }
        fs::write(&path, bytes).await?;
        Ok(())
    }

    async fn absorb(&self, tenant: &TenantId, owner_id: OwnerId, uuid: CubeUuid, content: &[u8]) -> Result<(), CubeError> {
        // §4.6/OQ1: absorbing appends to the existing store; what "absorb"
        // means for the opaque blob is host-defined, so the adapter simply
        // overwrites with the caller-assembled result.
        self.write_bytes(tenant, owner_id, uuid, content).await
    }

    async fn delete(&self, tenant: &TenantId, owner_id: OwnerId, uuid: CubeUuid) -> Result<(), CubeError> {
        let path = self.path_for(tenant, owner_id, uuid);
        match fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
