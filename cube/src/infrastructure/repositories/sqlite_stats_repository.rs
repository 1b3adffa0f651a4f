// /////////////////////////////////////////////////////////////////////////////
// Adaptive Pipeline RS
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # SqliteStatsRepository — usage/contributor counters (§5)
//!
//! `accumulate_usage`/`accumulate_contributor` implement `FirstOrCreate` +
//! accumulate + save inside a single transaction, keyed by their composite
//! uniqueness constraints so concurrent callers serialize on the row lock
//! rather than racing two inserts.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{Row, SqlitePool};

use cube_domain::entities::{ContributorStat, UsageStat};
use cube_domain::repositories::StatsRepository;
use cube_domain::value_objects::{CubeId, OwnerId, TenantId};
use cube_domain::CubeError;

use super::map_sqlx_error;

pub struct SqliteStatsRepository {
    pool: SqlitePool,
}

impl SqliteStatsRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

fn parse_updated_at(text: &str) -> Result<DateTime<Utc>, CubeError> {
    DateTime::parse_from_rfc3339(text).map(|dt| dt.with_timezone(&Utc)).map_err(|e| CubeError::Database(format!("corrupt timestamp column: {e}")))
}

#[async_trait]
impl StatsRepository for SqliteStatsRepository {
    async fn accumulate_usage(&self, tenant: &TenantId, cube_id: CubeId, memory_group: &str, model_name: &str, action_type: &str, now: DateTime<Utc>) -> Result<UsageStat, CubeError> {
        let mut tx = self.pool.begin().await.map_err(map_sqlx_error)?;

        let existing = sqlx::query("SELECT * FROM usage_stats WHERE cube_id = ? AND memory_group = ? AND model_name = ? AND action_type = ? AND apx_id = ? AND vdr_id = ?")
            .bind(cube_id.value())
            .bind(memory_group)
            .bind(model_name)
            .bind(action_type)
            .bind(&tenant.apx_id)
            .bind(&tenant.vdr_id)
            .fetch_optional(&mut *tx)
            .await
            .map_err(map_sqlx_error)?;

        let next = match existing {
            Some(row) => {
                let current = row.get::<i64, _>("count") as u64;
                let updated_at = parse_updated_at(&row.get::<String, _>("updated_at"))?;
                let prior = UsageStat {
                    cube_id,
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
                    .bind(cube_id.value())
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
                let first = UsageStat::first(cube_id, memory_group, model_name, action_type, tenant.clone(), now);
                sqlx::query("INSERT INTO usage_stats (cube_id, memory_group, model_name, action_type, apx_id, vdr_id, count, updated_at) VALUES (?, ?, ?, ?, ?, ?, ?, ?)")
                    .bind(cube_id.value())
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

        tx.commit().await.map_err(map_sqlx_error)?;
        Ok(next)
    }

    async fn accumulate_contributor(&self, tenant: &TenantId, cube_id: CubeId, contributor_owner_id: OwnerId, now: DateTime<Utc>) -> Result<ContributorStat, CubeError> {
        let mut tx = self.pool.begin().await.map_err(map_sqlx_error)?;

        let existing = sqlx::query("SELECT * FROM contributor_stats WHERE cube_id = ? AND contributor_owner_id = ? AND apx_id = ? AND vdr_id = ?")
            .bind(cube_id.value())
            .bind(contributor_owner_id.value())
            .bind(&tenant.apx_id)
            .bind(&tenant.vdr_id)
            .fetch_optional(&mut *tx)
            .await
            .map_err(map_sqlx_error)?;

        let next = match existing {
            Some(row) => {
                let current = row.get::<i64, _>("count") as u64;
                let updated_at = parse_updated_at(&row.get::<String, _>("updated_at"))?;
                let prior = ContributorStat {
                    cube_id,
                    contributor_owner_id,
                    tenant: tenant.clone(),
                    count: current,
                    updated_at,
                };
                let next = prior.accumulate(now);
                sqlx::query("UPDATE contributor_stats SET count = ?, updated_at = ? WHERE cube_id = ? AND contributor_owner_id = ? AND apx_id = ? AND vdr_id = ?")
                    .bind(next.count as i64)
                    .bind(next.updated_at.to_rfc3339())
                    .bind(cube_id.value())
                    .bind(contributor_owner_id.value())
                    .bind(&tenant.apx_id)
                    .bind(&tenant.vdr_id)
                    .execute(&mut *tx)
                    .await
                    .map_err(map_sqlx_error)?;
                next
            }
            None => {
                let first = ContributorStat::first(cube_id, contributor_owner_id, tenant.clone(), now);
                sqlx::query("INSERT INTO contributor_stats (cube_id, contributor_owner_id, apx_id, vdr_id, count, updated_at) VALUES (?, ?, ?, ?, ?, ?)")
                    .bind(cube_id.value())
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
        Ok(next)
    }

    async fn usage_for_cube(&self, tenant: &TenantId, cube_id: CubeId) -> Result<Vec<UsageStat>, CubeError> {
        let rows = sqlx::query("SELECT * FROM usage_stats WHERE cube_id = ? AND apx_id = ? AND vdr_id = ?")
            .bind(cube_id.value())
            .bind(&tenant.apx_id)
            .bind(&tenant.vdr_id)
            .fetch_all(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        rows.iter()
            .map(|row| {
                Ok(UsageStat {
                    cube_id,
                    memory_group: row.get("memory_group"),
                    model_name: row.get("model_name"),
                    action_type: row.get("action_type"),
                    tenant: tenant.clone(),
                    count: row.get::<i64, _>("count") as u64,
                    updated_at: parse_updated_at(&row.get::<String, _>("updated_at"))?,
                })
            })
            .collect()
    }

    async fn contributors_for_cube(&self, tenant: &TenantId, cube_id: CubeId) -> Result<Vec<ContributorStat>, CubeError> {
        let rows = sqlx::query("SELECT * FROM contributor_stats WHERE cube_id = ? AND apx_id = ? AND vdr_id = ?")
            .bind(cube_id.value())
            .bind(&tenant.apx_id)
            .bind(&tenant.vdr_id)
            .fetch_all(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        rows.iter()
            .map(|row| {
                Ok(ContributorStat {
                    cube_id,
                    contributor_owner_id: OwnerId::new(row.get("contributor_owner_id")),
                    tenant: tenant.clone(),
                    count: row.get::<i64, _>("count") as u64,
                    updated_at: parse_updated_at(&row.get::<String, _>("updated_at"))?,
                })
            })
            .collect()
    }

    async fn copy_usage_on_import(&self, tenant: &TenantId, new_cube_id: CubeId, rows: &[UsageStat]) -> Result<(), CubeError> {
        let mut tx = self.pool.begin().await.map_err(map_sqlx_error)?;
        for row in rows {
            sqlx::query("INSERT INTO usage_stats (cube_id, memory_group, model_name, action_type, apx_id, vdr_id, count, updated_at) VALUES (?, ?, ?, ?, ?, ?, ?, ?)")
                .bind(new_cube_id.value())
                .bind(&row.memory_group)
                .bind(&row.model_name)
                .bind(&row.action_type)
                .bind(&tenant.apx_id)
                .bind(&tenant.vdr_id)
                .bind(row.count as i64)
                .bind(row.updated_at.to_rfc3339())
                .execute(&mut *tx)
                .await
                .map_err(map_sqlx_error)?;
        }
        tx.commit().await.map_err(map_sqlx_error)?;
        Ok(())
    }

    async fn copy_contributors_on_import(&self, tenant: &TenantId, new_cube_id: CubeId, rows: &[ContributorStat]) -> Result<(), CubeError> {
        let mut tx = self.pool.begin().await.map_err(map_sqlx_error)?;
        for row in rows {
            sqlx::query("INSERT INTO contributor_stats (cube_id, contributor_owner_id, apx_id, vdr_id, count, updated_at) VALUES (?, ?, ?, ?, ?, ?)")
                .bind(new_cube_id.value())
                .bind(row.contributor_owner_id.value())
                .bind(&tenant.apx_id)
                .bind(&tenant.vdr_id)
                .bind(row.count as i64)
                .bind(row.updated_at.to_rfc3339())
                .execute(&mut *tx)
                .await
                .map_err(map_sqlx_error)?;
        }
        tx.commit().await.map_err(map_sqlx_error)?;
        Ok(())
    }

    async fn delete_for_cube(&self, tenant: &TenantId, cube_id: CubeId) -> Result<(), CubeError> {
        sqlx::query("DELETE FROM usage_stats WHERE cube_id = ? AND apx_id = ? AND vdr_id = ?")
            .bind(cube_id.value())
            .bind(&tenant.apx_id)
            .bind(&tenant.vdr_id)
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;
        sqlx::query("DELETE FROM contributor_stats WHERE cube_id = ? AND apx_id = ? AND vdr_id = ?")
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
    async fn accumulate_usage_creates_then_increments() {
        let pool = initialize_database("sqlite::memory:").await.unwrap();
        let repo = SqliteStatsRepository::new(pool);
        let now = Utc::now();

        let first = repo.accumulate_usage(&tenant(), CubeId::from_db(1), "grp", "model", "query", now).await.unwrap();
        assert_eq!(first.count, 1);

        let second = repo.accumulate_usage(&tenant(), CubeId::from_db(1), "grp", "model", "query", now).await.unwrap();
        assert_eq!(second.count, 2);

        let all = repo.usage_for_cube(&tenant(), CubeId::from_db(1)).await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].count, 2);
    }

    #[tokio::test]
    async fn accumulate_contributor_creates_then_increments() {
        let pool = initialize_database("sqlite::memory:").await.unwrap();
        let repo = SqliteStatsRepository::new(pool);
        let now = Utc::now();

        repo.accumulate_contributor(&tenant(), CubeId::from_db(1), OwnerId::new(9), now).await.unwrap();
        let second = repo.accumulate_contributor(&tenant(), CubeId::from_db(1), OwnerId::new(9), now).await.unwrap();
        assert_eq!(second.count, 2);

        let all = repo.contributors_for_cube(&tenant(), CubeId::from_db(1)).await.unwrap();
        assert_eq!(all.len(), 1);
    }

    #[tokio::test]
    async fn copy_on_import_then_delete_for_cube() {
        let pool = initialize_database("sqlite::memory:").await.unwrap();
        let repo = SqliteStatsRepository::new(pool);
        let now = Utc::now();

        let usage = vec![UsageStat::first(CubeId::from_db(1), "grp", "model", "query", tenant(), now)];
        let contributors = vec![ContributorStat::first(CubeId::from_db(1), OwnerId::new(1), tenant(), now)];

        repo.copy_usage_on_import(&tenant(), CubeId::from_db(5), &usage).await.unwrap();
        repo.copy_contributors_on_import(&tenant(), CubeId::from_db(5), &contributors).await.unwrap();

        assert_eq!(repo.usage_for_cube(&tenant(), CubeId::from_db(5)).await.unwrap().len(), 1);
        assert_eq!(repo.contributors_for_cube(&tenant(), CubeId::from_db(5)).await.unwrap().len(), 1);

        repo.delete_for_cube(&tenant(), CubeId::from_db(5)).await.unwrap();
        assert!(repo.usage_for_cube(&tenant(), CubeId::from_db(5)).await.unwrap().is_empty());
        assert!(repo.contributors_for_cube(&tenant(), CubeId::from_db(5)).await.unwrap().is_empty());
    }
}
