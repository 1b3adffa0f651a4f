// /////////////////////////////////////////////////////////////////////////////
// Adaptive Pipeline RS
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # SqliteLineageRepository — the append-only ancestor ledger (§4.5)

use async_trait::async_trait;
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

use cube_domain::entities::LineageEntry;
use cube_domain::repositories::LineageRepository;
use cube_domain::value_objects::{CubeId, CubeUuid, TenantId};
use cube_domain::CubeError;

use super::map_sqlx_error;

pub struct SqliteLineageRepository {
    pool: SqlitePool,
}

impl SqliteLineageRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LineageRepository for SqliteLineageRepository {
    async fn ancestors_of(&self, tenant: &TenantId, cube_id: CubeId) -> Result<Vec<LineageEntry>, CubeError> {
        let rows = sqlx::query("SELECT * FROM lineage_entries WHERE cube_id = ? AND apx_id = ? AND vdr_id = ? ORDER BY generation ASC")
            .bind(cube_id.value())
            .bind(&tenant.apx_id)
            .bind(&tenant.vdr_id)
            .fetch_all(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        rows.iter()
            .map(|row| {
                let ancestor_uuid_text: String = row.get("ancestor_uuid");
                Ok(LineageEntry::new(
                    CubeId::from_db(row.get("cube_id")),
                    CubeUuid::from_uuid(Uuid::parse_str(&ancestor_uuid_text).map_err(|e| CubeError::Database(format!("corrupt uuid column: {e}")))?),
                    row.get::<String, _>("ancestor_owner"),
                    row.get("exported_at_ms"),
                    row.get::<i64, _>("generation") as u32,
                ))
            })
            .collect()
    }

    async fn copy_on_import(&self, tenant: &TenantId, new_cube_id: CubeId, ancestors: &[LineageEntry]) -> Result<(), CubeError> {
        let mut tx = self.pool.begin().await.map_err(map_sqlx_error)?;
        for ancestor in ancestors {
            sqlx::query("INSERT INTO lineage_entries (cube_id, ancestor_uuid, ancestor_owner, exported_at_ms, generation, apx_id, vdr_id) VALUES (?, ?, ?, ?, ?, ?, ?)")
                .bind(new_cube_id.value())
                .bind(ancestor.ancestor_uuid.as_uuid().to_string())
                .bind(&ancestor.ancestor_owner)
                .bind(ancestor.exported_at_ms)
                .bind(ancestor.generation as i64)
                .bind(&tenant.apx_id)
                .bind(&tenant.vdr_id)
                .execute(&mut *tx)
                .await
                .map_err(map_sqlx_error)?;
        }
        tx.commit().await.map_err(map_sqlx_error)?;
        Ok(())
    }

    async fn delete_for_cube(&self, tenant: &TenantId, cube_id: CubeId) -> Result<(), CubeError> {
        sqlx::query("DELETE FROM lineage_entries WHERE cube_id = ? AND apx_id = ? AND vdr_id = ?")
            .bind(cube_id.value())
            .bind(&tenant.apx_id)
            .bind(&tenant.vdr_id)
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::repositories::schema::initialize_database;

    fn tenant() -> TenantId {
        TenantId::new("apx", "vdr")
    }

    #[tokio::test]
    async fn copy_on_import_then_ancestors_of_is_ordered_by_generation() {
        let pool = initialize_database("sqlite::memory:").await.unwrap();
        let repo = SqliteLineageRepository::new(pool);

        let ancestors = vec![
            LineageEntry::new(CubeId::from_db(1), CubeUuid::new_random(), "alice", 1000, 2),
            LineageEntry::new(CubeId::from_db(1), CubeUuid::new_random(), "bob", 500, 1),
        ];
        repo.copy_on_import(&tenant(), CubeId::from_db(5), &ancestors).await.unwrap();

        let found = repo.ancestors_of(&tenant(), CubeId::from_db(5)).await.unwrap();
        assert_eq!(found.len(), 2);
        assert_eq!(found[0].generation, 1);
        assert_eq!(found[1].generation, 2);
    }

    #[tokio::test]
    async fn delete_for_cube_removes_all_rows() {
        let pool = initialize_database("sqlite::memory:").await.unwrap();
        let repo = SqliteLineageRepository::new(pool);
        let ancestors = vec![LineageEntry::new(CubeId::from_db(1), CubeUuid::new_random(), "alice", 1000, 1)];
        repo.copy_on_import(&tenant(), CubeId::from_db(5), &ancestors).await.unwrap();

        repo.delete_for_cube(&tenant(), CubeId::from_db(5)).await.unwrap();
        assert!(repo.ancestors_of(&tenant(), CubeId::from_db(5)).await.unwrap().is_empty());
    }
}
