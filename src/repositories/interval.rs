use async_trait::async_trait;
use chrono::{DateTime, Utc};
use deadpool_postgres::Pool;
use tokio_postgres::Row;
use uuid::Uuid;

use super::traits::IntervalRepository;
use crate::{db::to_u32, error::Result, models::interval::CustomInterval};

const COLUMNS: &str = "id, user_id, name, work_duration, break_duration, session_mode, \
     is_active, usage_count, last_used_at, created_at, updated_at";

fn row_to_interval(row: &Row) -> Result<CustomInterval> {
    Ok(CustomInterval {
        id: row.try_get("id")?,
        user_id: row.try_get("user_id")?,
        name: row.try_get("name")?,
        work_duration: to_u32(row.try_get::<_, i32>("work_duration")?.into(), "work_duration")?,
        break_duration: to_u32(row.try_get::<_, i32>("break_duration")?.into(), "break_duration")?,
        session_mode: row.try_get("session_mode")?,
        is_active: row.try_get("is_active")?,
        usage_count: to_u32(row.try_get("usage_count")?, "usage_count")?,
        last_used_at: row.try_get("last_used_at")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

/// Custom interval table access.
#[derive(Clone)]
pub struct PgIntervalRepository {
    pool: Pool,
}

impl PgIntervalRepository {
    pub fn new(pool: Pool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl IntervalRepository for PgIntervalRepository {
    async fn list(&self, user_id: Uuid) -> Result<Vec<CustomInterval>> {
        let client = self.pool.get().await?;
        let stmt = client
            .prepare_cached(&format!(
                "SELECT {} FROM custom_intervals WHERE user_id = $1 \
                 ORDER BY usage_count DESC, created_at DESC",
                COLUMNS
            ))
            .await?;
        let rows = client.query(&stmt, &[&user_id]).await?;
        rows.iter().map(row_to_interval).collect()
    }

    async fn insert(&self, interval: &CustomInterval) -> Result<()> {
        let client = self.pool.get().await?;
        let stmt = client
            .prepare_cached(&format!(
                "INSERT INTO custom_intervals ({}) \
                 VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)",
                COLUMNS
            ))
            .await?;
        client
            .execute(
                &stmt,
                &[
                    &interval.id,
                    &interval.user_id,
                    &interval.name,
                    &(interval.work_duration as i32),
                    &(interval.break_duration as i32),
                    &interval.session_mode,
                    &interval.is_active,
                    &i64::from(interval.usage_count),
                    &interval.last_used_at,
                    &interval.created_at,
                    &interval.updated_at,
                ],
            )
            .await?;
        Ok(())
    }

    async fn find(&self, user_id: Uuid, id: Uuid) -> Result<Option<CustomInterval>> {
        let client = self.pool.get().await?;
        let stmt = client
            .prepare_cached(&format!(
                "SELECT {} FROM custom_intervals WHERE id = $1 AND user_id = $2",
                COLUMNS
            ))
            .await?;
        let row = client.query_opt(&stmt, &[&id, &user_id]).await?;
        row.map(|r| row_to_interval(&r)).transpose()
    }

    async fn update(&self, interval: &CustomInterval) -> Result<bool> {
        let client = self.pool.get().await?;
        let stmt = client
            .prepare_cached(
                r#"
                UPDATE custom_intervals
                SET name = $3, work_duration = $4, break_duration = $5, session_mode = $6,
                    is_active = $7, usage_count = $8, last_used_at = $9, updated_at = $10
                WHERE id = $1 AND user_id = $2
                "#,
            )
            .await?;
        let updated = client
            .execute(
                &stmt,
                &[
                    &interval.id,
                    &interval.user_id,
                    &interval.name,
                    &(interval.work_duration as i32),
                    &(interval.break_duration as i32),
                    &interval.session_mode,
                    &interval.is_active,
                    &i64::from(interval.usage_count),
                    &interval.last_used_at,
                    &interval.updated_at,
                ],
            )
            .await?;
        Ok(updated > 0)
    }

    async fn delete(&self, user_id: Uuid, id: Uuid) -> Result<bool> {
        let client = self.pool.get().await?;
        let stmt = client
            .prepare_cached("DELETE FROM custom_intervals WHERE id = $1 AND user_id = $2")
            .await?;
        let deleted = client.execute(&stmt, &[&id, &user_id]).await?;
        Ok(deleted > 0)
    }

    async fn record_use(&self, user_id: Uuid, id: Uuid, now: DateTime<Utc>) -> Result<Option<CustomInterval>> {
        let client = self.pool.get().await?;
        let stmt = client
            .prepare_cached(&format!(
                "UPDATE custom_intervals \
                 SET usage_count = usage_count + 1, last_used_at = $3, updated_at = $3 \
                 WHERE id = $1 AND user_id = $2 \
                 RETURNING {}",
                COLUMNS
            ))
            .await?;
        let row = client.query_opt(&stmt, &[&id, &user_id, &now]).await?;
        row.map(|r| row_to_interval(&r)).transpose()
    }
}
