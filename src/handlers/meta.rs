use axum::{http::StatusCode, response::Response};

use crate::{error::Result, models::session_mode::SESSION_MODES, response};

/// The fixed catalog of session modes.
pub async fn session_modes() -> Result<Response> {
    response::json(StatusCode::OK, &SESSION_MODES)
}

pub async fn health() -> Result<Response> {
    response::json(StatusCode::OK, &sonic_rs::json!({ "status": "ok" }))
}
