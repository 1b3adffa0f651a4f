// /////////////////////////////////////////////////////////////////////////////
// Adaptive Pipeline RS
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # SqliteOwnerDirectory — contributor display-name lookup (§2)
//!
//! Full identity/user management is a host concern (Non-goals, §1); this
//! adapter only resolves the display name `ExportCube` embeds in the
//! lineage row it appends (§4.3 step 1). An owner with no directory entry
//! falls back to a stable, synthetic name rather than failing the export.

use async_trait::async_trait;
use sqlx::{Row, SqlitePool};

use cube_domain::services::OwnerDirectory;
use cube_domain::value_objects::{OwnerId, TenantId};
use cube_domain::CubeError;

use super::super::repositories::map_sqlx_error;

#[derive(Debug, Clone)]
pub struct SqliteOwnerDirectory {
    pool: SqlitePool,
}

impl SqliteOwnerDirectory {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl OwnerDirectory for SqliteOwnerDirectory {
    async fn display_name(&self, tenant: &TenantId, owner_id: OwnerId) -> Result<String, CubeError> {
        let row = sqlx::query("SELECT display_name FROM owners WHERE id = ? AND apx_id = ? AND vdr_id = ?")
            .bind(owner_id.value())
            .bind(&tenant.apx_id)
            .bind(&tenant.vdr_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        Ok(match row {
            Some(row) => row.get::<String, _>("display_name"),
            None => format!("owner-{}", owner_id.value()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::repositories::schema::initialize_database;

    #[tokio::test]
    async fn falls_back_to_a_synthetic_name_when_unregistered() {
        let pool = initialize_database("sqlite::memory:").await.unwrap();
        let directory = SqliteOwnerDirectory::new(pool);
        let tenant = TenantId::new("apx", "vdr");
        assert_eq!(directory.display_name(&tenant, OwnerId::new(42)).await.unwrap(), "owner-42");
    }

    #[tokio::test]
    async fn returns_the_registered_display_name() {
        let pool = initialize_database("sqlite::memory:").await.unwrap();
        sqlx::query("INSERT INTO owners (id, apx_id, vdr_id, display_name) VALUES (?, ?, ?, ?)")
            .bind(7_i64)
            .bind("apx")
            .bind("vdr")
            .bind("alice")
            .execute(&pool)
            .await
            .unwrap();

        let directory = SqliteOwnerDirectory::new(pool);
        let tenant = TenantId::new("apx", "vdr");
        assert_eq!(directory.display_name(&tenant, OwnerId::new(7)).await.unwrap(), "alice");
    }
}
