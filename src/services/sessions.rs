use chrono::Utc;
use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::models::focus_session::{
    CreateSessionRequest, FocusSession, SessionFilter, SessionPage, UpdateSessionRequest,
};
use crate::models::owner::Owner;
use crate::state::AppState;

/// Lists one page of the owner's sessions, newest start first.
pub async fn list(state: &AppState, owner: &Owner, filter: SessionFilter) -> Result<SessionPage> {
    let (sessions, total) = state.sessions.list(owner, &filter).await?;
    Ok(SessionPage::new(sessions, total, &filter))
}

pub async fn create(state: &AppState, owner: Owner, req: CreateSessionRequest) -> Result<FocusSession> {
    let session = FocusSession::new(owner, req, Utc::now())?;
    state.sessions.insert(&session).await?;
    tracing::info!("✅ Session {} recorded for {}", session.id, session.owner);
    Ok(session)
}

/// Fetches a session. Sessions of other owners are reported as missing.
pub async fn get(state: &AppState, owner: &Owner, id: Uuid) -> Result<FocusSession> {
    state.sessions.find(owner, id).await?.ok_or(AppError::NotFound)
}

/// Merges `patch` into the session and re-validates the merged record.
pub async fn update(
    state: &AppState,
    owner: &Owner,
    id: Uuid,
    patch: UpdateSessionRequest,
) -> Result<FocusSession> {
    let mut session = get(state, owner, id).await?;
    session.apply(patch, Utc::now())?;

    if !state.sessions.update(&session).await? {
        return Err(AppError::NotFound);
    }
    Ok(session)
}
