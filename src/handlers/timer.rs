use std::collections::HashMap;

use axum::{
    Extension,
    extract::{Query, State},
    http::StatusCode,
    response::Response,
};

use crate::{
    error::Result,
    extract::{ValidJson, Validated, parse_uuid},
    models::{owner::Owner, timer::SaveTimerRequest},
    response,
    services::timer as timer_service,
    state::AppState,
    validation::{rules, schema::FieldRule},
};

impl Validated for SaveTimerRequest {
    const RULES: &'static [FieldRule] = rules::TIMER_STATE;
}

pub async fn get_timer(
    State(state): State<AppState>,
    Extension(owner): Extension<Owner>,
) -> Result<Response> {
    let timer = timer_service::get(&state, &owner).await?;
    response::json(StatusCode::OK, &timer)
}

pub async fn save_timer(
    State(state): State<AppState>,
    Extension(owner): Extension<Owner>,
    ValidJson(payload): ValidJson<SaveTimerRequest>,
) -> Result<Response> {
    let timer = timer_service::save(&state, &owner, payload).await?;
    response::json(StatusCode::OK, &timer)
}

pub async fn clear_timer(
    State(state): State<AppState>,
    Extension(owner): Extension<Owner>,
) -> Result<Response> {
    timer_service::clear(&state, &owner).await?;
    Ok(response::no_content())
}

/// Moves the timer to its next phase, optionally sized by `?intervalId=`.
pub async fn advance_timer(
    State(state): State<AppState>,
    Extension(owner): Extension<Owner>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Response> {
    let interval_id = params
        .get("intervalId")
        .map(|raw| parse_uuid("intervalId", raw))
        .transpose()?;
    let timer = timer_service::advance(&state, &owner, interval_id).await?;
    response::json(StatusCode::OK, &timer)
}
