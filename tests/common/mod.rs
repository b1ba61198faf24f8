#![allow(dead_code)]

use std::net::SocketAddr;

use axum::{
    Router,
    body::Body,
    extract::ConnectInfo,
    http::{Request, StatusCode, header},
};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

use zenfocus::{
    build_router,
    config::{Argon2Settings, Config},
    state::AppState,
};

pub const GUEST: &str = "guest-test-0001";

/// The router on a fresh in-memory backend, driven in-process.
pub struct TestApp {
    pub state: AppState,
    router: Router,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    /// Like `new`, on top of `config` with cheap Argon2 settings.
    pub fn with_config(config: Config) -> Self {
        let config = Config {
            argon2: Argon2Settings::minimal(),
            ..config
        };
        let state = AppState::in_memory(config);
        let router = build_router(state.clone()).unwrap();
        Self { state, router }
    }

    /// Sends a request from a fixed peer address and returns the status and the
    /// parsed JSON body (`Null` when empty, a JSON string when not JSON).
    pub async fn send(
        &self,
        method: &str,
        uri: &str,
        headers: &[(&str, &str)],
        body: Option<String>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }
        let mut request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        request
            .extensions_mut()
            .insert(ConnectInfo(SocketAddr::from(([127, 0, 0, 1], 40000))));

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes)
                .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
        };
        (status, value)
    }

    pub async fn get(&self, uri: &str, headers: &[(&str, &str)]) -> (StatusCode, Value) {
        self.send("GET", uri, headers, None).await
    }

    pub async fn post(&self, uri: &str, headers: &[(&str, &str)], body: Value) -> (StatusCode, Value) {
        self.send("POST", uri, headers, Some(body.to_string())).await
    }

    pub async fn put(&self, uri: &str, headers: &[(&str, &str)], body: Value) -> (StatusCode, Value) {
        self.send("PUT", uri, headers, Some(body.to_string())).await
    }

    pub async fn delete(&self, uri: &str, headers: &[(&str, &str)]) -> (StatusCode, Value) {
        self.send("DELETE", uri, headers, None).await
    }

    /// Registers `email` and returns its bearer token.
    pub async fn register(&self, email: &str) -> String {
        let (status, body) = self
            .post(
                "/api/auth/register",
                &[],
                json!({ "email": email, "password": "12345678" }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "register failed: {}", body);
        body["token"].as_str().unwrap().to_string()
    }
}

pub fn bearer(token: &str) -> String {
    format!("Bearer {}", token)
}

/// Asserts the `{error, message}` error shape and returns the code.
pub fn error_code(body: &Value) -> &str {
    assert!(body["message"].is_string(), "missing message in {}", body);
    body["error"].as_str().unwrap()
}
