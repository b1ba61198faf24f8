mod common;

use axum::http::StatusCode;
use chrono::{Duration, Utc};
use common::{TestApp, bearer, error_code};
use serde_json::json;
use uuid::Uuid;
use zenfocus::{
    config::{Config, RateLimitSettings},
    crypto::token::{digest_token, generate_token},
    models::auth_session::AuthSession,
};

#[tokio::test]
async fn register_returns_token_user_and_default_preferences() {
    let app = TestApp::new();
    let (status, body) = app
        .post(
            "/api/auth/register",
            &[],
            json!({ "email": "a@b.com", "password": "12345678" }),
        )
        .await;

    assert_eq!(status, StatusCode::CREATED);
    assert!(!body["token"].as_str().unwrap().is_empty());
    assert_eq!(body["user"]["email"], "a@b.com");
    assert!(body["user"].get("passwordHash").is_none());

    let volume = body["preferences"]["ambientVolume"].as_i64().unwrap();
    assert!((0..=100).contains(&volume));
    let theme = body["preferences"]["theme"].as_str().unwrap();
    assert!(["light", "dark", "system"].contains(&theme));
}

#[tokio::test]
async fn register_validates_credentials() {
    let app = TestApp::new();

    let (status, body) = app
        .post(
            "/api/auth/register",
            &[],
            json!({ "email": "not-an-email", "password": "12345678" }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_code(&body), "VALIDATION_ERROR");

    let (status, _) = app
        .post(
            "/api/auth/register",
            &[],
            json!({ "email": "short@b.com", "password": "1234567" }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    app.register("taken@b.com").await;
    let (status, body) = app
        .post(
            "/api/auth/register",
            &[],
            json!({ "email": "Taken@B.com", "password": "12345678" }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_code(&body), "EMAIL_EXISTS");
}

#[tokio::test]
async fn login_and_me() {
    let app = TestApp::new();
    app.register("login@b.com").await;

    let (status, body) = app
        .post(
            "/api/auth/login",
            &[],
            json!({ "email": "login@b.com", "password": "wrong-password" }),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(error_code(&body), "INVALID_CREDENTIALS");

    let (status, body) = app
        .post(
            "/api/auth/login",
            &[],
            json!({ "email": "login@b.com", "password": "12345678" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    let auth = bearer(body["token"].as_str().unwrap());

    let (status, me) = app.get("/api/users/me", &[("authorization", auth.as_str())]).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(me["email"], "login@b.com");
}

#[tokio::test]
async fn unknown_email_and_wrong_password_look_the_same() {
    let app = TestApp::new();
    app.register("known@b.com").await;

    let (unknown_status, unknown) = app
        .post(
            "/api/auth/login",
            &[],
            json!({ "email": "nobody@b.com", "password": "12345678" }),
        )
        .await;
    let (wrong_status, wrong) = app
        .post(
            "/api/auth/login",
            &[],
            json!({ "email": "known@b.com", "password": "87654321" }),
        )
        .await;

    assert_eq!(unknown_status, StatusCode::UNAUTHORIZED);
    assert_eq!(unknown, wrong);
    assert_eq!(wrong_status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn auth_routes_are_rate_limited_per_peer() {
    let app = TestApp::with_config(Config {
        auth_rate_limit: Some(RateLimitSettings {
            per_second: 60,
            burst_size: 2,
        }),
        ..Config::default()
    });
    let attempt = json!({ "email": "limited@b.com", "password": "12345678" });

    for _ in 0..2 {
        let (status, body) = app.post("/api/auth/login", &[], attempt.clone()).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(error_code(&body), "INVALID_CREDENTIALS");
    }

    let (status, _) = app.post("/api/auth/login", &[], attempt).await;
    assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);

    let (status, _) = app.get("/api/health", &[]).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn bearer_routes_reject_missing_and_unknown_tokens() {
    let app = TestApp::new();

    let (status, body) = app.get("/api/users/me", &[]).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(error_code(&body), "AUTHENTICATION_FAILED");

    let (status, body) = app
        .get("/api/users/me", &[("authorization", "Bearer not-a-real-token")])
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(error_code(&body), "AUTHENTICATION_FAILED");

    // Guests cannot reach user-only routes.
    let (status, _) = app
        .get("/api/custom-intervals", &[("x-guest-id", common::GUEST)])
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn expired_token_is_reported_as_expired() {
    let app = TestApp::new();
    let token = generate_token();
    let expired_at = Utc::now() - Duration::minutes(5);
    app.state
        .tokens
        .store(
            &digest_token(&token),
            &AuthSession {
                user_id: Uuid::new_v4(),
                created_at: expired_at - Duration::days(7),
                expires_at: expired_at,
            },
        )
        .await
        .unwrap();

    let auth = bearer(&token);
    let (status, body) = app.get("/api/users/me", &[("authorization", auth.as_str())]).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(error_code(&body), "TOKEN_EXPIRED");
}

#[tokio::test]
async fn logout_revokes_the_token() {
    let app = TestApp::new();
    let token = app.register("bye@b.com").await;
    let auth = bearer(&token);
    let headers = [("authorization", auth.as_str())];

    let (status, body) = app.send("POST", "/api/auth/logout", &headers, None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert!(body.is_null());

    let (status, body) = app.get("/api/users/me", &headers).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(error_code(&body), "AUTHENTICATION_FAILED");
}

#[tokio::test]
async fn preferences_default_then_replace() {
    let app = TestApp::new();
    let token = app.register("prefs@b.com").await;
    let auth = bearer(&token);
    let headers = [("authorization", auth.as_str())];

    let (status, prefs) = app.get("/api/users/me/preferences", &headers).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(prefs["theme"], "system");
    assert_eq!(prefs["ambientVolume"], 50);

    for volume in [0, 100] {
        let (status, saved) = app
            .put(
                "/api/users/me/preferences",
                &headers,
                json!({
                    "theme": "dark",
                    "defaultSessionMode": "zen",
                    "ambientSound": "forest",
                    "ambientVolume": volume,
                    "notifications": false,
                    "autoStartBreaks": true
                }),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "volume {}", volume);
        assert_eq!(saved["ambientVolume"], volume);
    }

    for volume in [-1, 101] {
        let (status, body) = app
            .put(
                "/api/users/me/preferences",
                &headers,
                json!({
                    "theme": "dark",
                    "defaultSessionMode": "zen",
                    "ambientSound": "forest",
                    "ambientVolume": volume,
                    "notifications": false,
                    "autoStartBreaks": true
                }),
            )
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "volume {}", volume);
        assert_eq!(error_code(&body), "VALIDATION_ERROR");
    }

    let (_, prefs) = app.get("/api/users/me/preferences", &headers).await;
    assert_eq!(prefs["theme"], "dark");
    assert_eq!(prefs["ambientVolume"], 100);

    let (status, _) = app
        .put("/api/users/me/preferences", &headers, json!({ "theme": "dark" }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
