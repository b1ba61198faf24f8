use chrono::Utc;
use uuid::Uuid;

use crate::error::Result;
use crate::models::preferences::{UpdatePreferencesRequest, UserPreferences};
use crate::state::AppState;

/// The user's saved preferences, or the defaults if none were saved yet.
pub async fn get(state: &AppState, user_id: Uuid) -> Result<UserPreferences> {
    Ok(match state.preferences.get(user_id).await? {
        Some(preferences) => preferences,
        None => UserPreferences::defaults(user_id, Utc::now()),
    })
}

/// Replaces every preference field at once.
pub async fn update(
    state: &AppState,
    user_id: Uuid,
    req: UpdatePreferencesRequest,
) -> Result<UserPreferences> {
    let preferences = UserPreferences::replaced(user_id, req, Utc::now());
    state.preferences.upsert(&preferences).await?;
    tracing::debug!("⚙️ Preferences saved for user: {}", user_id);
    Ok(preferences)
}
