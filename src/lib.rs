use axum::{
    Router,
    extract::DefaultBodyLimit,
    middleware::from_fn_with_state,
    routing::{get, post, put},
};

use http::{HeaderName, HeaderValue, Method, header};
use std::sync::Arc;
use std::time::Duration;
use tower_governor::governor::GovernorConfigBuilder;
use tower_http::{
    compression::CompressionLayer,
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

pub mod config;
pub mod db;
pub mod error;
pub mod extract;
pub mod response;
pub mod state;

pub mod crypto {
    pub mod password;
    pub mod token;
}

pub mod models {
    pub mod auth_session;
    pub mod enums;
    pub mod focus_session;
    pub mod interval;
    pub mod owner;
    pub mod preferences;
    pub mod session_mode;
    pub mod timer;
    pub mod user;
}

pub mod repositories {
    pub mod interval;
    pub mod memory;
    pub mod preferences;
    pub mod session;
    pub mod timer;
    pub mod token;
    pub mod traits;
    pub mod user;
}

pub mod services {
    pub mod auth;
    pub mod intervals;
    pub mod preferences;
    pub mod sessions;
    pub mod timer;
}

pub mod handlers {
    pub mod auth;
    pub mod intervals;
    pub mod meta;
    pub mod sessions;
    pub mod timer;
    pub mod users;
}

pub mod middleware_layer {
    pub mod auth;
}

pub mod validation {
    pub mod auth;
    pub mod predicates;
    pub mod rules;
    pub mod schema;
}

use config::Config;
use state::AppState;

/// Request bodies are small JSON documents.
pub const MAX_BODY_BYTES: usize = 64 * 1024;

fn cors_layer(config: &Config) -> anyhow::Result<CorsLayer> {
    let origins = config
        .cors_origins
        .iter()
        .map(|origin| {
            origin
                .parse::<HeaderValue>()
                .map_err(|e| anyhow::anyhow!("Invalid CORS origin '{}': {}", origin, e))
        })
        .collect::<anyhow::Result<Vec<_>>>()?;

    Ok(CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            header::ACCEPT,
            HeaderName::from_static(middleware_layer::auth::GUEST_ID_HEADER),
        ])
        .max_age(Duration::from_secs(86400)))
}

/// Builds the full HTTP router on top of `state`.
///
/// Routes are grouped by how the caller is identified, each group with its
/// own auth middleware.
pub fn build_router(state: AppState) -> anyhow::Result<Router> {
    let mut auth_routes = Router::new()
        .route("/api/auth/register", post(handlers::auth::register))
        .route("/api/auth/login", post(handlers::auth::login));

    if let Some(limit) = state.config.auth_rate_limit {
        let governor_conf = Arc::new(
            GovernorConfigBuilder::default()
                .per_second(limit.per_second)
                .burst_size(limit.burst_size)
                .use_headers()
                .finish()
                .ok_or_else(|| anyhow::anyhow!("Invalid auth rate limit settings"))?,
        );
        auth_routes = auth_routes.layer(tower_governor::GovernorLayer::new(governor_conf));
        tracing::info!(
            "✅ Auth rate limit: 1 request per {}s, burst {}",
            limit.per_second,
            limit.burst_size
        );
    }

    let public_routes = Router::new()
        .route("/api/health", get(handlers::meta::health))
        .route("/api/session-modes", get(handlers::meta::session_modes))
        .merge(auth_routes)
        .with_state(state.clone());

    let user_routes = Router::new()
        .route("/api/auth/logout", post(handlers::auth::logout))
        .route("/api/users/me", get(handlers::users::me))
        .route(
            "/api/users/me/preferences",
            get(handlers::users::get_preferences).put(handlers::users::update_preferences),
        )
        .route(
            "/api/custom-intervals",
            get(handlers::intervals::list_intervals).post(handlers::intervals::create_interval),
        )
        .route(
            "/api/custom-intervals/{interval_id}",
            put(handlers::intervals::update_interval).delete(handlers::intervals::delete_interval),
        )
        .route(
            "/api/custom-intervals/{interval_id}/use",
            post(handlers::intervals::use_interval),
        )
        .route_layer(from_fn_with_state(
            state.clone(),
            middleware_layer::auth::require_auth,
        ))
        .with_state(state.clone());

    let owner_routes = Router::new()
        .route(
            "/api/sessions",
            get(handlers::sessions::list_sessions).post(handlers::sessions::create_session),
        )
        .route(
            "/api/sessions/{session_id}",
            get(handlers::sessions::get_session).put(handlers::sessions::update_session),
        )
        .route(
            "/api/timer/state",
            get(handlers::timer::get_timer)
                .post(handlers::timer::save_timer)
                .delete(handlers::timer::clear_timer),
        )
        .route("/api/timer/state/advance", post(handlers::timer::advance_timer))
        .route_layer(from_fn_with_state(
            state.clone(),
            middleware_layer::auth::identify_owner,
        ))
        .with_state(state.clone());

    let app = Router::new()
        .merge(public_routes)
        .merge(user_routes)
        .merge(owner_routes)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::default().include_headers(false))
                .on_request(DefaultOnRequest::default().level(Level::DEBUG))
                .on_response(DefaultOnResponse::default().level(Level::DEBUG))
                .on_failure(DefaultOnFailure::default().level(Level::ERROR)),
        )
        .layer(CompressionLayer::new())
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(cors_layer(&state.config)?);

    Ok(app)
}
