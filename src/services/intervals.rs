use chrono::Utc;
use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::models::interval::{CreateIntervalRequest, CustomInterval, UpdateIntervalRequest};
use crate::state::AppState;

/// The user's intervals, most used first.
pub async fn list(state: &AppState, user_id: Uuid) -> Result<Vec<CustomInterval>> {
    state.intervals.list(user_id).await
}

pub async fn create(state: &AppState, user_id: Uuid, req: CreateIntervalRequest) -> Result<CustomInterval> {
    let interval = CustomInterval::new(user_id, req, Utc::now());
    state.intervals.insert(&interval).await?;
    tracing::info!("✅ Interval created: {} ({})", interval.id, interval.name);
    Ok(interval)
}

pub async fn update(
    state: &AppState,
    user_id: Uuid,
    id: Uuid,
    patch: UpdateIntervalRequest,
) -> Result<CustomInterval> {
    let mut interval = state
        .intervals
        .find(user_id, id)
        .await?
        .ok_or(AppError::NotFound)?;
    interval.apply(patch, Utc::now());

    if !state.intervals.update(&interval).await? {
        return Err(AppError::NotFound);
    }
    Ok(interval)
}

pub async fn delete(state: &AppState, user_id: Uuid, id: Uuid) -> Result<()> {
    if !state.intervals.delete(user_id, id).await? {
        return Err(AppError::NotFound);
    }
    tracing::info!("🗑️ Interval deleted: {}", id);
    Ok(())
}

/// Counts one use of the interval and stamps `lastUsedAt`.
pub async fn mark_used(state: &AppState, user_id: Uuid, id: Uuid) -> Result<CustomInterval> {
    state
        .intervals
        .record_use(user_id, id, Utc::now())
        .await?
        .ok_or(AppError::NotFound)
}
