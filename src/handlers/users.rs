use axum::{Extension, extract::State, http::StatusCode, response::Response};

use crate::{
    error::Result,
    extract::{ValidJson, Validated},
    models::{auth_session::AuthUser, preferences::UpdatePreferencesRequest},
    response,
    services::{auth as auth_service, preferences as preferences_service},
    state::AppState,
    validation::{rules, schema::FieldRule},
};

impl Validated for UpdatePreferencesRequest {
    const RULES: &'static [FieldRule] = rules::PREFERENCES;
}

/// Returns the authenticated user.
pub async fn me(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
) -> Result<Response> {
    let user = auth_service::current_user(&state, auth.user_id).await?;
    response::json(StatusCode::OK, &user)
}

pub async fn get_preferences(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
) -> Result<Response> {
    let preferences = preferences_service::get(&state, auth.user_id).await?;
    response::json(StatusCode::OK, &preferences)
}

pub async fn update_preferences(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    ValidJson(payload): ValidJson<UpdatePreferencesRequest>,
) -> Result<Response> {
    let preferences = preferences_service::update(&state, auth.user_id, payload).await?;
    response::json(StatusCode::OK, &preferences)
}
