use async_trait::async_trait;
use deadpool_postgres::Pool;
use tokio_postgres::Row;
use uuid::Uuid;

use super::traits::PreferencesRepository;
use crate::{
    error::{AppError, Result},
    models::preferences::UserPreferences,
};

fn row_to_preferences(row: &Row) -> Result<UserPreferences> {
    let volume: i16 = row.try_get("ambient_volume")?;
    Ok(UserPreferences {
        user_id: row.try_get("user_id")?,
        theme: row.try_get("theme")?,
        default_session_mode: row.try_get("default_session_mode")?,
        ambient_sound: row.try_get("ambient_sound")?,
        ambient_volume: u8::try_from(volume)
            .map_err(|_| AppError::Internal(format!("Stored volume {} out of range", volume)))?,
        notifications: row.try_get("notifications")?,
        auto_start_breaks: row.try_get("auto_start_breaks")?,
        updated_at: row.try_get("updated_at")?,
    })
}

/// One preferences row per user.
#[derive(Clone)]
pub struct PgPreferencesRepository {
    pool: Pool,
}

impl PgPreferencesRepository {
    pub fn new(pool: Pool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PreferencesRepository for PgPreferencesRepository {
    async fn get(&self, user_id: Uuid) -> Result<Option<UserPreferences>> {
        let client = self.pool.get().await?;
        let stmt = client
            .prepare_cached(
                r#"
                SELECT user_id, theme, default_session_mode, ambient_sound, ambient_volume,
                       notifications, auto_start_breaks, updated_at
                FROM user_preferences
                WHERE user_id = $1
                "#,
            )
            .await?;
        let row = client.query_opt(&stmt, &[&user_id]).await?;
        row.map(|r| row_to_preferences(&r)).transpose()
    }

    async fn upsert(&self, preferences: &UserPreferences) -> Result<()> {
        let client = self.pool.get().await?;
        let stmt = client
            .prepare_cached(
                r#"
                INSERT INTO user_preferences (
                    user_id, theme, default_session_mode, ambient_sound, ambient_volume,
                    notifications, auto_start_breaks, updated_at
                )
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
                ON CONFLICT (user_id) DO UPDATE SET
                    theme = EXCLUDED.theme,
                    default_session_mode = EXCLUDED.default_session_mode,
                    ambient_sound = EXCLUDED.ambient_sound,
                    ambient_volume = EXCLUDED.ambient_volume,
                    notifications = EXCLUDED.notifications,
                    auto_start_breaks = EXCLUDED.auto_start_breaks,
                    updated_at = EXCLUDED.updated_at
                "#,
            )
            .await?;
        client
            .execute(
                &stmt,
                &[
                    &preferences.user_id,
                    &preferences.theme,
                    &preferences.default_session_mode,
                    &preferences.ambient_sound,
                    &i16::from(preferences.ambient_volume),
                    &preferences.notifications,
                    &preferences.auto_start_breaks,
                    &preferences.updated_at,
                ],
            )
            .await?;
        Ok(())
    }
}
