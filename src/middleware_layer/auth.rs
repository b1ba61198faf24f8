use axum::{
    body::Body,
    extract::State,
    http::{HeaderMap, Request, header},
    middleware::Next,
    response::Response,
};

use crate::{
    error::{AppError, Result},
    models::owner::{GuestKey, Owner},
    services::auth as auth_service,
    state::AppState,
};

/// Header carrying the client-generated guest identifier.
pub const GUEST_ID_HEADER: &str = "x-guest-id";

/// Extracts the bearer token from the `Authorization` header.
///
/// # Returns
///
/// `Ok(None)` when the header is absent, an error when it is present but not
/// a usable bearer credential.
fn extract_bearer_token(headers: &HeaderMap) -> Result<Option<&str>> {
    let Some(value) = headers.get(header::AUTHORIZATION) else {
        return Ok(None);
    };

    let value = value
        .to_str()
        .map_err(|_| AppError::AuthenticationFailed("Malformed Authorization header".to_string()))?;

    match value.split_once(' ') {
        Some((scheme, token)) if scheme.eq_ignore_ascii_case("bearer") && !token.trim().is_empty() => {
            Ok(Some(token.trim()))
        }
        _ => Err(AppError::AuthenticationFailed(
            "Authorization header must be 'Bearer <token>'".to_string(),
        )),
    }
}

/// A middleware that requires a valid bearer token.
///
/// Inserts the `AuthUser` and its `Owner::User` into the request extensions.
pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response> {
    tracing::debug!("🔐 Checking authentication...");

    let token = extract_bearer_token(request.headers())?
        .ok_or_else(|| AppError::AuthenticationFailed("Missing bearer token".to_string()))?;
    let auth = auth_service::authenticate(&state, token).await?;

    tracing::debug!("✅ User authenticated: {}", auth.user_id);

    request.extensions_mut().insert(Owner::User(auth.user_id));
    request.extensions_mut().insert(auth);

    Ok(next.run(request).await)
}

/// A middleware for routes open to both users and guests.
///
/// A bearer token, when sent, must be valid. Without one the caller is the
/// guest named by `X-Guest-Id`.
pub async fn identify_owner(
    State(state): State<AppState>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response> {
    let owner = match extract_bearer_token(request.headers())? {
        Some(token) => Owner::User(auth_service::authenticate(&state, token).await?.user_id),
        None => {
            let raw = request
                .headers()
                .get(GUEST_ID_HEADER)
                .ok_or_else(|| {
                    AppError::AuthenticationFailed(
                        "Send a bearer token or an X-Guest-Id header".to_string(),
                    )
                })?
                .to_str()
                .map_err(|_| {
                    AppError::Validation(
                        "X-Guest-Id can only contain letters, numbers, underscores, and hyphens"
                            .to_string(),
                    )
                })?;
            Owner::Guest(GuestKey::parse(raw)?)
        }
    };

    tracing::debug!("👤 Request owner: {}", owner);
    request.extensions_mut().insert(owner);

    Ok(next.run(request).await)
}
