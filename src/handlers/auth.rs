use axum::{Extension, extract::State, http::StatusCode, response::Response};
use garde::Validate;
use serde::Deserialize;

use crate::{
    error::Result,
    extract::{ValidJson, Validated},
    models::auth_session::AuthUser,
    response,
    services::auth as auth_service,
    state::AppState,
    validation::{auth::check_garde, rules, schema::FieldRule},
};

/// The request payload for user registration.
#[derive(Deserialize, Validate)]
pub struct RegisterRequest {
    #[garde(email, length(max = 254))]
    pub email: String,
    #[garde(length(chars, min = 8, max = 128))]
    pub password: String,
    #[garde(skip)]
    pub name: Option<String>,
}

impl Validated for RegisterRequest {
    const RULES: &'static [FieldRule] = rules::REGISTER;

    fn check(&self) -> Result<()> {
        check_garde(self)
    }
}

/// The request payload for user login.
#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl Validated for LoginRequest {
    const RULES: &'static [FieldRule] = rules::LOGIN;
}

/// Handles user registration.
pub async fn register(
    State(state): State<AppState>,
    ValidJson(payload): ValidJson<RegisterRequest>,
) -> Result<Response> {
    tracing::info!("📝 Register attempt for: {}", payload.email);

    let auth = auth_service::register(&state, &payload.email, payload.password, payload.name).await?;
    response::json(StatusCode::CREATED, &auth)
}

/// Handles user login.
pub async fn login(
    State(state): State<AppState>,
    ValidJson(payload): ValidJson<LoginRequest>,
) -> Result<Response> {
    tracing::info!("🔓 Login attempt for: {}", payload.email);

    let auth = auth_service::login(&state, &payload.email, payload.password).await?;
    response::json(StatusCode::OK, &auth)
}

/// Handles user logout.
pub async fn logout(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
) -> Result<Response> {
    auth_service::logout(&state, &auth).await?;
    Ok(response::no_content())
}
