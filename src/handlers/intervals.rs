use axum::{
    Extension,
    extract::{Path, State},
    http::StatusCode,
    response::Response,
};

use crate::{
    error::Result,
    extract::{ValidJson, Validated, parse_path_id},
    models::{
        auth_session::AuthUser,
        interval::{CreateIntervalRequest, UpdateIntervalRequest},
    },
    response,
    services::intervals as interval_service,
    state::AppState,
    validation::{rules, schema::FieldRule},
};

impl Validated for CreateIntervalRequest {
    const RULES: &'static [FieldRule] = rules::INTERVAL_CREATE;
}

impl Validated for UpdateIntervalRequest {
    const RULES: &'static [FieldRule] = rules::INTERVAL_UPDATE;
}

pub async fn list_intervals(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
) -> Result<Response> {
    let intervals = interval_service::list(&state, auth.user_id).await?;
    response::json(StatusCode::OK, &intervals)
}

pub async fn create_interval(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    ValidJson(payload): ValidJson<CreateIntervalRequest>,
) -> Result<Response> {
    let interval = interval_service::create(&state, auth.user_id, payload).await?;
    response::json(StatusCode::CREATED, &interval)
}

pub async fn update_interval(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(interval_id): Path<String>,
    ValidJson(payload): ValidJson<UpdateIntervalRequest>,
) -> Result<Response> {
    let id = parse_path_id(&interval_id)?;
    let interval = interval_service::update(&state, auth.user_id, id, payload).await?;
    response::json(StatusCode::OK, &interval)
}

pub async fn delete_interval(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(interval_id): Path<String>,
) -> Result<Response> {
    let id = parse_path_id(&interval_id)?;
    interval_service::delete(&state, auth.user_id, id).await?;
    Ok(response::no_content())
}

/// Records that the user started a timer with this interval.
pub async fn use_interval(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(interval_id): Path<String>,
) -> Result<Response> {
    let id = parse_path_id(&interval_id)?;
    let interval = interval_service::mark_used(&state, auth.user_id, id).await?;
    response::json(StatusCode::OK, &interval)
}
