// /////////////////////////////////////////////////////////////////////////////
// Adaptive Pipeline RS
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # SqliteCubeRepository — the Cube aggregate's persistence adapter (§5, I5)

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{Row, Sqlite, SqlitePool, Transaction};
use uuid::Uuid;

use cube_domain::entities::{ContributorStat, Cube, LineageEntry, UsageStat};
use cube_domain::repositories::CubeRepository;
use cube_domain::value_objects::{CubeId, CubeUuid, EmbeddingConfig, ExportId, LimitValue, OwnerId, PermissionField, Permissions, TenantId};
use cube_domain::CubeError;

use super::map_sqlx_error;

pub struct SqliteCubeRepository {
    pool: SqlitePool,
}

impl SqliteCubeRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub(crate) fn row_to_cube(row: &sqlx::sqlite::SqliteRow) -> Result<Cube, CubeError> {
        let uuid_text: String = row.get("uuid");
        let uuid = CubeUuid::from_uuid(Uuid::parse_str(&uuid_text).map_err(|e| CubeError::Database(format!("corrupt uuid column: {e}")))?);

        let permissions_json: String = row.get("permissions_json");
        let permissions: Permissions = serde_json::from_str(&permissions_json)?;

        let embedding_config_json: String = row.get("embedding_config_json");
        let embedding_config: EmbeddingConfig = serde_json::from_str(&embedding_config_json)?;

        let expire_at: Option<String> = row.get("expire_at");
        let expire_at = expire_at.map(|s| parse_rfc3339(&s)).transpose()?;

        let created_at: String = row.get("created_at");
        let updated_at: String = row.get("updated_at");

        let source_export_id: Option<i64> = row.get("source_export_id");

        Ok(Cube {
            id: CubeId::from_db(row.get("id")),
            uuid,
            owner_id: OwnerId::new(row.get("owner_id")),
            name: row.get("name"),
            description: row.get("description"),
            expire_at,
            permissions,
            source_export_id: source_export_id.map(ExportId::from_db),
            embedding_config,
            tenant: TenantId::new(row.get::<String, _>("apx_id"), row.get::<String, _>("vdr_id")),
            created_at: parse_rfc3339(&created_at)?,
            updated_at: parse_rfc3339(&updated_at)?,
        })
    }

    async fn consume_field_in_tx(tx: &mut Transaction<'_, Sqlite>, tenant: &TenantId, id: CubeId, field: PermissionField, now: DateTime<Utc>) -> Result<Cube, CubeError> {
        let row = sqlx::query("SELECT * FROM cubes WHERE id = ? AND apx_id = ? AND vdr_id = ?")
            .bind(id.value())
            .bind(&tenant.apx_id)
            .bind(&tenant.vdr_id)
            .fetch_optional(&mut **tx)
            .await
            .map_err(map_sqlx_error)?
            .ok_or_else(|| CubeError::not_found(format!("cube {id} not found")))?;

        let cube = Self::row_to_cube(&row)?;
        if cube.permissions.field(field).is_forbidden() {
            return Err(CubeError::conflict(format!("{} is already forbidden", field.name())));
        }
        let updated = cube.consuming(field, now)?;

        let permissions_json = serde_json::to_string(&updated.permissions)?;
        sqlx::query("UPDATE cubes SET permissions_json = ?, updated_at = ? WHERE id = ?")
            .bind(&permissions_json)
            .bind(updated.updated_at.to_rfc3339())
            .bind(id.value())
            .execute(&mut **tx)
            .await
            .map_err(map_sqlx_error)?;

        Ok(updated)
    }

    async fn insert_cube_in_tx(tx: &mut Transaction<'_, Sqlite>, cube: &Cube) -> Result<Cube, CubeError> {
        let permissions_json = serde_json::to_string(&cube.permissions)?;
        let embedding_config_json = serde_json::to_string(&cube.embedding_config)?;

        let result = sqlx::query(
            "INSERT INTO cubes (uuid, owner_id, name, description, expire_at, permissions_json, source_export_id, embedding_config_json, apx_id, vdr_id, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(cube.uuid.as_uuid().to_string())
        .bind(cube.owner_id.value())
        .bind(&cube.name)
        .bind(&cube.description)
        .bind(cube.expire_at.map(|t| t.to_rfc3339()))
        .bind(&permissions_json)
        .bind(cube.source_export_id.map(|id| id.value()))
        .bind(&embedding_config_json)
        .bind(&cube.tenant.apx_id)
        .bind(&cube.tenant.vdr_id)
        .bind(cube.created_at.to_rfc3339())
        .bind(cube.updated_at.to_rfc3339())
        .execute(&mut **tx)
        .await
        .map_err(map_sqlx_error)?;

        let mut inserted = cube.clone();
        inserted.id = CubeId::from_db(result.last_insert_rowid());
        Ok(inserted)
    }
}

fn parse_rfc3339(text: &str) -> Result<DateTime<Utc>, CubeError> {
    DateTime::parse_from_rfc3339(text).map(|dt| dt.with_timezone(&Utc)).map_err(|e| CubeError::Database(format!("corrupt timestamp column: {e}")))
}

#[async_trait]
impl CubeRepository for SqliteCubeRepository {
    async fn insert(&self, cube: &Cube) -> Result<Cube, CubeError> {
        let permissions_json = serde_json::to_string(&cube.permissions)?;
        let embedding_config_json = serde_json::to_string(&cube.embedding_config)?;

        let result = sqlx::query(
            "INSERT INTO cubes (uuid, owner_id, name, description, expire_at, permissions_json, source_export_id, embedding_config_json, apx_id, vdr_id, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(cube.uuid.as_uuid().to_string())
        .bind(cube.owner_id.value())
        .bind(&cube.name)
        .bind(&cube.description)
        .bind(cube.expire_at.map(|t| t.to_rfc3339()))
        .bind(&permissions_json)
        .bind(cube.source_export_id.map(|id| id.value()))
        .bind(&embedding_config_json)
        .bind(&cube.tenant.apx_id)
        .bind(&cube.tenant.vdr_id)
        .bind(cube.created_at.to_rfc3339())
        .bind(cube.updated_at.to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        let mut inserted = cube.clone();
        inserted.id = CubeId::from_db(result.last_insert_rowid());
        Ok(inserted)
    }

    async fn find_by_id(&self, tenant: &TenantId, id: CubeId) -> Result<Option<Cube>, CubeError> {
        let row = sqlx::query("SELECT * FROM cubes WHERE id = ? AND apx_id = ? AND vdr_id = ?")
            .bind(id.value())
            .bind(&tenant.apx_id)
            .bind(&tenant.vdr_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        row.as_ref().map(Self::row_to_cube).transpose()
    }

    async fn find_by_uuid(&self, tenant: &TenantId, uuid: CubeUuid) -> Result<Option<Cube>, CubeError> {
        let row = sqlx::query("SELECT * FROM cubes WHERE uuid = ? AND apx_id = ? AND vdr_id = ?")
            .bind(uuid.as_uuid().to_string())
            .bind(&tenant.apx_id)
            .bind(&tenant.vdr_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        row.as_ref().map(Self::row_to_cube).transpose()
    }

    async fn update(&self, cube: &Cube) -> Result<(), CubeError> {
        let permissions_json = serde_json::to_string(&cube.permissions)?;
        let embedding_config_json = serde_json::to_string(&cube.embedding_config)?;

        sqlx::query(
            "UPDATE cubes SET name = ?, description = ?, expire_at = ?, permissions_json = ?, embedding_config_json = ?, updated_at = ?
             WHERE id = ? AND apx_id = ? AND vdr_id = ?",
        )
        .bind(&cube.name)
        .bind(&cube.description)
        .bind(cube.expire_at.map(|t| t.to_rfc3339()))
        .bind(&permissions_json)
        .bind(&embedding_config_json)
        .bind(cube.updated_at.to_rfc3339())
        .bind(cube.id.value())
        .bind(&cube.tenant.apx_id)
        .bind(&cube.tenant.vdr_id)
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(())
    }

    async fn delete(&self, tenant: &TenantId, id: CubeId) -> Result<(), CubeError> {
        sqlx::query("DELETE FROM cubes WHERE id = ? AND apx_id = ? AND vdr_id = ?")
            .bind(id.value())
            .bind(&tenant.apx_id)
            .bind(&tenant.vdr_id)
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;
        Ok(())
    }

    async fn consume_limit_transactional(&self, tenant: &TenantId, id: CubeId, field: PermissionField, now: DateTime<Utc>) -> Result<Cube, CubeError> {
        let mut tx = self.pool.begin().await.map_err(map_sqlx_error)?;
        let updated = Self::consume_field_in_tx(&mut tx, tenant, id, field, now).await?;
        tx.commit().await.map_err(map_sqlx_error)?;
        Ok(updated)
    }

    async fn consume_rekey_and_replace_transactional(&self, tenant: &TenantId, id: CubeId, new_permissions: Permissions, new_expire_at: Option<DateTime<Utc>>, now: DateTime<Utc>) -> Result<Cube, CubeError> {
        let mut tx = self.pool.begin().await.map_err(map_sqlx_error)?;

        let consumed = Self::consume_field_in_tx(&mut tx, tenant, id, PermissionField::Rekey, now).await?;
        let replaced = consumed.with_permissions(new_permissions, new_expire_at, now);

        let permissions_json = serde_json::to_string(&replaced.permissions)?;
        sqlx::query("UPDATE cubes SET permissions_json = ?, expire_at = ?, updated_at = ? WHERE id = ?")
            .bind(&permissions_json)
            .bind(replaced.expire_at.map(|t| t.to_rfc3339()))
            .bind(replaced.updated_at.to_rfc3339())
            .bind(id.value())
            .execute(&mut *tx)
            .await
            .map_err(map_sqlx_error)?;

        tx.commit().await.map_err(map_sqlx_error)?;
        Ok(replaced)
    }

    async fn peek_limit(&self, tenant: &TenantId, id: CubeId, field: PermissionField) -> Result<LimitValue, CubeError> {
        let cube = self.find_by_id(tenant, id).await?.ok_or_else(|| CubeError::not_found(format!("cube {id} not found")))?;
        Ok(cube.permissions.field(field))
    }

    async fn insert_with_carried_history(&self, cube: &Cube, lineage: &[LineageEntry], usage: &[UsageStat], contributors: &[ContributorStat]) -> Result<Cube, CubeError> {
        let mut tx = self.pool.begin().await.map_err(map_sqlx_error)?;

        let inserted = Self::insert_cube_in_tx(&mut tx, cube).await?;

        for ancestor in lineage {
            sqlx::query("INSERT INTO lineage_entries (cube_id, ancestor_uuid, ancestor_owner, exported_at_ms, generation, apx_id, vdr_id) VALUES (?, ?, ?, ?, ?, ?, ?)")
                .bind(inserted.id.value())
                .bind(ancestor.ancestor_uuid.as_uuid().to_string())
                .bind(&ancestor.ancestor_owner)
                .bind(ancestor.exported_at_ms)
                .bind(ancestor.generation as i64)
                .bind(&cube.tenant.apx_id)
                .bind(&cube.tenant.vdr_id)
                .execute(&mut *tx)
                .await
                .map_err(map_sqlx_error)?;
        }

        for row in usage {
            sqlx::query("INSERT INTO usage_stats (cube_id, memory_group, model_name, action_type, apx_id, vdr_id, count, updated_at) VALUES (?, ?, ?, ?, ?, ?, ?, ?)")
                .bind(inserted.id.value())
                .bind(&row.memory_group)
                .bind(&row.model_name)
                .bind(&row.action_type)
                .bind(&cube.tenant.apx_id)
                .bind(&cube.tenant.vdr_id)
                .bind(row.count as i64)
                .bind(row.updated_at.to_rfc3339())
                .execute(&mut *tx)
                .await
                .map_err(map_sqlx_error)?;
        }

        for row in contributors {
            sqlx::query("INSERT INTO contributor_stats (cube_id, contributor_owner_id, apx_id, vdr_id, count, updated_at) VALUES (?, ?, ?, ?, ?, ?)")
                .bind(inserted.id.value())
                .bind(row.contributor_owner_id.value())
                .bind(&cube.tenant.apx_id)
                .bind(&cube.tenant.vdr_id)
                .bind(row.count as i64)
                .bind(row.updated_at.to_rfc3339())
                .execute(&mut *tx)
                .await
                .map_err(map_sqlx_error)?;
        }

        tx.commit().await.map_err(map_sqlx_error)?;
        Ok(inserted)
    }

    async fn consume_absorb_and_accumulate_transactional(
        &self,
        tenant: &TenantId,
        id: CubeId,
        memory_group: &str,
        model_name: &str,
        action_type: &str,
        contributor_owner_id: OwnerId,
        now: DateTime<Utc>,
    ) -> Result<(Cube, UsageStat, ContributorStat), CubeError> {
        let mut tx = self.pool.begin().await.map_err(map_sqlx_error)?;

        let updated_cube = Self::consume_field_in_tx(&mut tx, tenant, id, PermissionField::Absorb, now).await?;

        let existing_usage = sqlx::query("SELECT * FROM usage_stats WHERE cube_id = ? AND memory_group = ? AND model_name = ? AND action_type = ? AND apx_id = ? AND vdr_id = ?")
            .bind(id.value())
            .bind(memory_group)
            .bind(model_name)
            .bind(action_type)
            .bind(&tenant.apx_id)
            .bind(&tenant.vdr_id)
            .fetch_optional(&mut *tx)
            .await
            .map_err(map_sqlx_error)?;

        let usage = match existing_usage {
            Some(row) => {
                let current = row.get::<i64, _>("count") as u64;
                let updated_at = parse_rfc3339(&row.get::<String, _>("updated_at"))?;
                let prior = UsageStat {
                    cube_id: id,
                    memory_group: memory_group.to_string(),
                    model_name: model_name.to_string(),
                    action_type: action_type.to_string(),
                    tenant: tenant.clone(),
                    count: current,
                    updated_at,
                };
                let next = prior.accumulate(now);
                sqlx::query("UPDATE usage_stats SET count = ?, updated_at = ? WHERE cube_id = ? AND memory_group = ? AND model_name = ? AND action_type = ? AND apx_id = ? AND vdr_id = ?")
                    .bind(next.count as i64)
                    .bind(next.updated_at.to_rfc3339())
                    .bind(id.value())
                    .bind(memory_group)
                    .bind(model_name)
                    .bind(action_type)
                    .bind(&tenant.apx_id)
                    .bind(&tenant.vdr_id)
                    .execute(&mut *tx)
                    .await
                    .map_err(map_sqlx_error)?;
                next
            }
            None => {
                let first = UsageStat::first(id, memory_group, model_name, action_type, tenant.clone(), now);
                sqlx::query("INSERT INTO usage_stats (cube_id, memory_group, model_name, action_type, apx_id, vdr_id, count, updated_at) VALUES (?, ?, ?, ?, ?, ?, ?, ?)")
                    .bind(id.value())
                    .bind(memory_group)
                    .bind(model_name)
                    .bind(action_type)
                    .bind(&tenant.apx_id)
                    .bind(&tenant.vdr_id)
                    .bind(first.count as i64)
                    .bind(first.updated_at.to_rfc3339())
                    .execute(&mut *tx)
                    .await
                    .map_err(map_sqlx_error)?;
                first
            }
        };

        let existing_contributor = sqlx::query("SELECT * FROM contributor_stats WHERE cube_id = ? AND contributor_owner_id = ? AND apx_id = ? AND vdr_id = ?")
            .bind(id.value())
            .bind(contributor_owner_id.value())
            .bind(&tenant.apx_id)
            .bind(&tenant.vdr_id)
            .fetch_optional(&mut *tx)
            .await
            .map_err(map_sqlx_error)?;

        let contributor = match existing_contributor {
            Some(row) => {
                let current = row.get::<i64, _>("count") as u64;
                let updated_at = parse_rfc3339(&row.get::<String, _>("updated_at"))?;
                let prior = ContributorStat {
                    cube_id: id,
                    contributor_owner_id,
                    tenant: tenant.clone(),
                    count: current,
                    updated_at,
                };
                let next = prior.accumulate(now);
                sqlx::query("UPDATE contributor_stats SET count = ?, updated_at = ? WHERE cube_id = ? AND contributor_owner_id = ? AND apx_id = ? AND vdr_id = ?")
                    .bind(next.count as i64)
                    .bind(next.updated_at.to_rfc3339())
                    .bind(id.value())
                    .bind(contributor_owner_id.value())
                    .bind(&tenant.apx_id)
                    .bind(&tenant.vdr_id)
                    .execute(&mut *tx)
                    .await
                    .map_err(map_sqlx_error)?;
                next
            }
            None => {
                let first = ContributorStat::first(id, contributor_owner_id, tenant.clone(), now);
                sqlx::query("INSERT INTO contributor_stats (cube_id, contributor_owner_id, apx_id, vdr_id, count, updated_at) VALUES (?, ?, ?, ?, ?, ?)")
                    .bind(id.value())
                    .bind(contributor_owner_id.value())
                    .bind(&tenant.apx_id)
                    .bind(&tenant.vdr_id)
                    .bind(first.count as i64)
                    .bind(first.updated_at.to_rfc3339())
                    .execute(&mut *tx)
                    .await
                    .map_err(map_sqlx_error)?;
                first
            }
        };

        tx.commit().await.map_err(map_sqlx_error)?;
        Ok((updated_cube, usage, contributor))
    }

    async fn delete_cascade_transactional(&self, tenant: &TenantId, id: CubeId) -> Result<(), CubeError> {
        let mut tx = self.pool.begin().await.map_err(map_sqlx_error)?;

        sqlx::query("DELETE FROM exports WHERE cube_id = ? AND apx_id = ? AND vdr_id = ?")
            .bind(id.value())
            .bind(&tenant.apx_id)
            .bind(&tenant.vdr_id)
            .execute(&mut *tx)
            .await
            .map_err(map_sqlx_error)?;

        sqlx::query("DELETE FROM lineage_entries WHERE cube_id = ? AND apx_id = ? AND vdr_id = ?")
            .bind(id.value())
            .bind(&tenant.apx_id)
            .bind(&tenant.vdr_id)
            .execute(&mut *tx)
            .await
            .map_err(map_sqlx_error)?;

        sqlx::query("DELETE FROM usage_stats WHERE cube_id = ? AND apx_id = ? AND vdr_id = ?")
            .bind(id.value())
            .bind(&tenant.apx_id)
            .bind(&tenant.vdr_id)
            .execute(&mut *tx)
            .await
            .map_err(map_sqlx_error)?;

        sqlx::query("DELETE FROM contributor_stats WHERE cube_id = ? AND apx_id = ? AND vdr_id = ?")
            .bind(id.value())
            .bind(&tenant.apx_id)
            .bind(&tenant.vdr_id)
            .execute(&mut *tx)
            .await
            .map_err(map_sqlx_error)?;

        sqlx::query("DELETE FROM cubes WHERE id = ? AND apx_id = ? AND vdr_id = ?")
            .bind(id.value())
            .bind(&tenant.apx_id)
            .bind(&tenant.vdr_id)
            .execute(&mut *tx)
            .await
            .map_err(map_sqlx_error)?;

        tx.commit().await.map_err(map_sqlx_error)?;
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

    fn new_cube(now: DateTime<Utc>) -> Cube {
        Cube::new_created(CubeId::from_db(0), CubeUuid::new_random(), OwnerId::new(1), "my-cube", None, EmbeddingConfig::empty(), tenant(), now)
    }

    #[tokio::test]
    async fn insert_then_find_by_id_round_trips() {
        let pool = initialize_database("sqlite::memory:").await.unwrap();
        let repo = SqliteCubeRepository::new(pool);
        let now = Utc::now();
        let inserted = repo.insert(&new_cube(now)).await.unwrap();

        let found = repo.find_by_id(&tenant(), inserted.id).await.unwrap().unwrap();
        assert_eq!(found.name, "my-cube");
        assert_eq!(found.permissions, Permissions::unlimited());
    }

    #[tokio::test]
    async fn consume_limit_transactional_decrements_and_persists() {
        let pool = initialize_database("sqlite::memory:").await.unwrap();
        let repo = SqliteCubeRepository::new(pool);
        let now = Utc::now();
        let mut cube = new_cube(now);
        cube.permissions.absorb_limit = LimitValue::Remaining(1);
        let inserted = repo.insert(&cube).await.unwrap();

        let updated = repo.consume_limit_transactional(&tenant(), inserted.id, PermissionField::Absorb, now).await.unwrap();
        assert_eq!(updated.permissions.absorb_limit, LimitValue::Forbidden);

        let second = repo.consume_limit_transactional(&tenant(), inserted.id, PermissionField::Absorb, now).await;
        assert!(matches!(second, Err(CubeError::Conflict(_))));
    }

    #[tokio::test]
    async fn consume_rekey_and_replace_transactional_replaces_whole_grant() {
        let pool = initialize_database("sqlite::memory:").await.unwrap();
        let repo = SqliteCubeRepository::new(pool);
        let now = Utc::now();
        let inserted = repo.insert(&new_cube(now)).await.unwrap();

        let mut next_permissions = Permissions::unlimited();
        next_permissions.export_limit = LimitValue::Remaining(3);
        let updated = repo.consume_rekey_and_replace_transactional(&tenant(), inserted.id, next_permissions.clone(), None, now).await.unwrap();

        assert_eq!(updated.permissions.export_limit, LimitValue::Remaining(3));
        assert_eq!(updated.permissions.rekey_limit, LimitValue::Unlimited);
    }

    #[tokio::test]
    async fn insert_with_carried_history_writes_cube_lineage_and_stats_in_one_call() {
        let pool = initialize_database("sqlite::memory:").await.unwrap();
        let repo = SqliteCubeRepository::new(pool);
        let now = Utc::now();
        let draft = new_cube(now);

        let lineage = vec![LineageEntry::new(CubeId::from_db(0), CubeUuid::new_random(), "alice", 1000, 1)];
        let usage = vec![UsageStat::first(CubeId::from_db(0), "grp", "model", "import", tenant(), now)];
        let contributors = vec![ContributorStat::first(CubeId::from_db(0), OwnerId::new(9), tenant(), now)];

        let inserted = repo.insert_with_carried_history(&draft, &lineage, &usage, &contributors).await.unwrap();
        assert_ne!(inserted.id.value(), 0);

        let found = repo.find_by_id(&tenant(), inserted.id).await.unwrap().unwrap();
        assert_eq!(found.name, "my-cube");
    }

    #[tokio::test]
    async fn consume_absorb_and_accumulate_transactional_updates_all_three_in_one_call() {
        let pool = initialize_database("sqlite::memory:").await.unwrap();
        let repo = SqliteCubeRepository::new(pool);
        let now = Utc::now();
        let mut cube = new_cube(now);
        cube.permissions.absorb_limit = LimitValue::Remaining(2);
        let inserted = repo.insert(&cube).await.unwrap();

        let (updated_cube, usage, contributor) = repo
            .consume_absorb_and_accumulate_transactional(&tenant(), inserted.id, "grp", "model", "absorb", OwnerId::new(5), now)
            .await
            .unwrap();

        assert_eq!(updated_cube.permissions.absorb_limit, LimitValue::Remaining(1));
        assert_eq!(usage.count, 1);
        assert_eq!(contributor.count, 1);

        let (_, usage_again, contributor_again) = repo
            .consume_absorb_and_accumulate_transactional(&tenant(), inserted.id, "grp", "model", "absorb", OwnerId::new(5), now)
            .await
            .unwrap();
        assert_eq!(usage_again.count, 2);
        assert_eq!(contributor_again.count, 2);
    }

    #[tokio::test]
    async fn consume_absorb_and_accumulate_transactional_rejects_already_forbidden() {
        let pool = initialize_database("sqlite::memory:").await.unwrap();
        let repo = SqliteCubeRepository::new(pool);
        let now = Utc::now();
        let mut cube = new_cube(now);
        cube.permissions.absorb_limit = LimitValue::Forbidden;
        let inserted = repo.insert(&cube).await.unwrap();

        let result = repo.consume_absorb_and_accumulate_transactional(&tenant(), inserted.id, "grp", "model", "absorb", OwnerId::new(5), now).await;
        assert!(matches!(result, Err(CubeError::Conflict(_))));
    }

    #[tokio::test]
    async fn delete_cascade_transactional_removes_cube_and_child_rows() {
        let pool = initialize_database("sqlite::memory:").await.unwrap();
        let repo = SqliteCubeRepository::new(pool);
        let now = Utc::now();
        let mut cube = new_cube(now);
        cube.permissions.absorb_limit = LimitValue::Remaining(2);
        let inserted = repo.insert(&cube).await.unwrap();

        repo.consume_absorb_and_accumulate_transactional(&tenant(), inserted.id, "grp", "model", "absorb", OwnerId::new(5), now).await.unwrap();

        repo.delete_cascade_transactional(&tenant(), inserted.id).await.unwrap();
        assert!(repo.find_by_id(&tenant(), inserted.id).await.unwrap().is_none());
    }
}
