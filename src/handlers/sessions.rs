use std::collections::HashMap;

use axum::{
    Extension,
    extract::{Path, Query, State},
    http::StatusCode,
    response::Response,
};

use crate::{
    error::Result,
    extract::{ValidJson, Validated, parse_path_id},
    models::{
        focus_session::{CreateSessionRequest, SessionFilter, UpdateSessionRequest},
        owner::Owner,
    },
    response,
    services::sessions as session_service,
    state::AppState,
    validation::{rules, schema::FieldRule},
};

impl Validated for CreateSessionRequest {
    const RULES: &'static [FieldRule] = rules::SESSION_CREATE;
}

impl Validated for UpdateSessionRequest {
    const RULES: &'static [FieldRule] = rules::SESSION_UPDATE;
}

/// Lists the caller's sessions.
///
/// Accepts `limit`, `offset`, `mode`, `fromDate` and `toDate` query parameters.
pub async fn list_sessions(
    State(state): State<AppState>,
    Extension(owner): Extension<Owner>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Response> {
    let filter = SessionFilter::from_query(&params)?;
    let page = session_service::list(&state, &owner, filter).await?;
    response::json(StatusCode::OK, &page)
}

pub async fn create_session(
    State(state): State<AppState>,
    Extension(owner): Extension<Owner>,
    ValidJson(payload): ValidJson<CreateSessionRequest>,
) -> Result<Response> {
    let session = session_service::create(&state, owner, payload).await?;
    response::json(StatusCode::CREATED, &session)
}

pub async fn get_session(
    State(state): State<AppState>,
    Extension(owner): Extension<Owner>,
    Path(session_id): Path<String>,
) -> Result<Response> {
    let id = parse_path_id(&session_id)?;
    let session = session_service::get(&state, &owner, id).await?;
    response::json(StatusCode::OK, &session)
}

pub async fn update_session(
    State(state): State<AppState>,
    Extension(owner): Extension<Owner>,
    Path(session_id): Path<String>,
    ValidJson(payload): ValidJson<UpdateSessionRequest>,
) -> Result<Response> {
    let id = parse_path_id(&session_id)?;
    let session = session_service::update(&state, &owner, id, payload).await?;
    response::json(StatusCode::OK, &session)
}
