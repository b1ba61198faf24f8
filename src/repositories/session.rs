use async_trait::async_trait;
use chrono::{DateTime, Utc};
use deadpool_postgres::Pool;
use tokio_postgres::Row;
use uuid::Uuid;

use super::traits::SessionRepository;
use crate::{
    db::to_u32,
    error::{AppError, Result},
    models::{
        enums::SessionMode,
        focus_session::{FocusSession, SessionFilter},
        owner::{GuestKey, Owner},
    },
};

const COLUMNS: &str = "id, user_id, guest_key, mode, start_time, end_time, planned_duration, \
     actual_duration, completed_fully, pause_count, total_pause_time, ambient_sound, notes, \
     created_at, updated_at";

/// Rows are matched on both owner columns; exactly one of them is set.
const OWNER_MATCH: &str =
    "user_id IS NOT DISTINCT FROM $1 AND guest_key IS NOT DISTINCT FROM $2";

const FILTER_MATCH: &str = "($3::session_mode IS NULL OR mode = $3) \
     AND ($4::timestamptz IS NULL OR start_time >= $4) \
     AND ($5::timestamptz IS NULL OR start_time <= $5)";

fn row_to_session(row: &Row) -> Result<FocusSession> {
    let user_id: Option<Uuid> = row.try_get("user_id")?;
    let guest_key: Option<String> = row.try_get("guest_key")?;
    let owner = match (user_id, guest_key) {
        (Some(id), _) => Owner::User(id),
        (None, Some(key)) => Owner::Guest(GuestKey::parse(&key)?),
        (None, None) => {
            return Err(AppError::Internal("Session row has no owner".to_string()));
        }
    };

    Ok(FocusSession {
        id: row.try_get("id")?,
        owner,
        mode: row.try_get("mode")?,
        start_time: row.try_get("start_time")?,
        end_time: row.try_get("end_time")?,
        planned_duration: to_u32(row.try_get::<_, i32>("planned_duration")?.into(), "planned_duration")?,
        actual_duration: to_u32(row.try_get("actual_duration")?, "actual_duration")?,
        completed_fully: row.try_get("completed_fully")?,
        pause_count: to_u32(row.try_get("pause_count")?, "pause_count")?,
        total_pause_time: to_u32(row.try_get("total_pause_time")?, "total_pause_time")?,
        ambient_sound: row.try_get("ambient_sound")?,
        notes: row.try_get("notes")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

/// Focus session history in PostgreSQL.
#[derive(Clone)]
pub struct PgSessionRepository {
    pool: Pool,
}

impl PgSessionRepository {
    pub fn new(pool: Pool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SessionRepository for PgSessionRepository {
    async fn insert(&self, session: &FocusSession) -> Result<()> {
        let client = self.pool.get().await?;
        let stmt = client
            .prepare_cached(&format!(
                "INSERT INTO focus_sessions ({}) \
                 VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)",
                COLUMNS
            ))
            .await?;

        client
            .execute(
                &stmt,
                &[
                    &session.id,
                    &session.owner.user_id(),
                    &session.owner.guest_key(),
                    &session.mode,
                    &session.start_time,
                    &session.end_time,
                    &(session.planned_duration as i32),
                    &i64::from(session.actual_duration),
                    &session.completed_fully,
                    &i64::from(session.pause_count),
                    &i64::from(session.total_pause_time),
                    &session.ambient_sound,
                    &session.notes,
                    &session.created_at,
                    &session.updated_at,
                ],
            )
            .await?;
        Ok(())
    }

    async fn find(&self, owner: &Owner, id: Uuid) -> Result<Option<FocusSession>> {
        let client = self.pool.get().await?;
        let stmt = client
            .prepare_cached(&format!(
                "SELECT {} FROM focus_sessions WHERE {} AND id = $3",
                COLUMNS, OWNER_MATCH
            ))
            .await?;
        let row = client
            .query_opt(&stmt, &[&owner.user_id(), &owner.guest_key(), &id])
            .await?;
        row.map(|r| row_to_session(&r)).transpose()
    }

    async fn update(&self, session: &FocusSession) -> Result<bool> {
        let client = self.pool.get().await?;
        let stmt = client
            .prepare_cached(&format!(
                r#"
                UPDATE focus_sessions
                SET mode = $4, start_time = $5, end_time = $6, planned_duration = $7,
                    actual_duration = $8, completed_fully = $9, pause_count = $10,
                    total_pause_time = $11, ambient_sound = $12, notes = $13, updated_at = $14
                WHERE {} AND id = $3
                "#,
                OWNER_MATCH
            ))
            .await?;

        let updated = client
            .execute(
                &stmt,
                &[
                    &session.owner.user_id(),
                    &session.owner.guest_key(),
                    &session.id,
                    &session.mode,
                    &session.start_time,
                    &session.end_time,
                    &(session.planned_duration as i32),
                    &i64::from(session.actual_duration),
                    &session.completed_fully,
                    &i64::from(session.pause_count),
                    &i64::from(session.total_pause_time),
                    &session.ambient_sound,
                    &session.notes,
                    &session.updated_at,
                ],
            )
            .await?;
        Ok(updated > 0)
    }

    async fn list(&self, owner: &Owner, filter: &SessionFilter) -> Result<(Vec<FocusSession>, u64)> {
        let client = self.pool.get().await?;
        let user_id = owner.user_id();
        let guest_key = owner.guest_key();
        let mode: Option<SessionMode> = filter.mode;
        let from: Option<DateTime<Utc>> = filter.from;
        let to: Option<DateTime<Utc>> = filter.to;

        let count_stmt = client
            .prepare_cached(&format!(
                "SELECT COUNT(*) FROM focus_sessions WHERE {} AND {}",
                OWNER_MATCH, FILTER_MATCH
            ))
            .await?;
        let total: i64 = client
            .query_one(&count_stmt, &[&user_id, &guest_key, &mode, &from, &to])
            .await?
            .try_get(0)?;

        let page_stmt = client
            .prepare_cached(&format!(
                "SELECT {} FROM focus_sessions WHERE {} AND {} \
                 ORDER BY start_time DESC, created_at DESC LIMIT $6 OFFSET $7",
                COLUMNS, OWNER_MATCH, FILTER_MATCH
            ))
            .await?;
        let rows = client
            .query(
                &page_stmt,
                &[
                    &user_id,
                    &guest_key,
                    &mode,
                    &from,
                    &to,
                    &i64::from(filter.limit),
                    &i64::from(filter.offset),
                ],
            )
            .await?;

        let sessions = rows.iter().map(row_to_session).collect::<Result<Vec<_>>>()?;
        Ok((sessions, total.max(0) as u64))
    }
}
