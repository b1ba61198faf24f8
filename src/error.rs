use axum::{
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use thiserror::Error;

/// The application's error type.
///
/// Every variant maps onto one wire code of the `{error, message}` body.
#[derive(Error, Debug)]
pub enum AppError {
    /// A request field failed validation. Carries the first failing field's message.
    #[error("Validation error: {0}")]
    Validation(String),

    /// The request body was not a JSON object.
    #[error("Invalid JSON: {0}")]
    InvalidJson(String),

    /// The request body went past the configured size limit.
    #[error("Payload too large")]
    PayloadTooLarge,

    /// A bearer token was missing, malformed or unknown.
    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    /// Login with an unknown email or a wrong password.
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// The bearer token is known but past its expiry.
    #[error("Token expired")]
    TokenExpired,

    /// Registration with an email that already has an account.
    #[error("Email already registered")]
    EmailExists,

    /// A resource not found error.
    #[error("Resource not found")]
    NotFound,

    /// A PostgreSQL error.
    #[error("Database error: {0}")]
    Database(#[from] tokio_postgres::Error),

    /// A connection pool error.
    #[error("Pool error: {0}")]
    Pool(#[from] deadpool_postgres::PoolError),

    /// A Redis error.
    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    /// An internal server error.
    #[error("Internal server error: {0}")]
    Internal(String),
}

/// A `Result` type that uses `AppError` as the error type.
pub type Result<T> = std::result::Result<T, AppError>;

impl AppError {
    /// The machine-readable code written to the `error` field.
    pub fn code(&self) -> &'static str {
        match self {
            AppError::Validation(_) => "VALIDATION_ERROR",
            AppError::InvalidJson(_) => "INVALID_JSON",
            AppError::PayloadTooLarge => "PAYLOAD_TOO_LARGE",
            AppError::AuthenticationFailed(_) => "AUTHENTICATION_FAILED",
            AppError::InvalidCredentials => "INVALID_CREDENTIALS",
            AppError::TokenExpired => "TOKEN_EXPIRED",
            AppError::EmailExists => "EMAIL_EXISTS",
            AppError::NotFound => "NOT_FOUND",
            AppError::Database(_)
            | AppError::Pool(_)
            | AppError::Redis(_)
            | AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) | AppError::InvalidJson(_) | AppError::EmailExists => {
                StatusCode::BAD_REQUEST
            }
            AppError::AuthenticationFailed(_)
            | AppError::InvalidCredentials
            | AppError::TokenExpired => StatusCode::UNAUTHORIZED,
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            AppError::Database(_)
            | AppError::Pool(_)
            | AppError::Redis(_)
            | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let message = match self {
            AppError::Database(ref e) => {
                tracing::error!("Database error: {}", e);
                "Internal server error".to_string()
            }

            AppError::Pool(ref e) => {
                tracing::error!("Pool error: {}", e);
                "Internal server error".to_string()
            }

            AppError::Redis(ref e) => {
                tracing::error!("Redis error: {}", e);
                "Internal server error".to_string()
            }

            AppError::Internal(ref msg) => {
                tracing::error!("Internal error: {}", msg);
                "Internal server error".to_string()
            }

            AppError::AuthenticationFailed(ref msg) => {
                tracing::warn!("Authentication failed: {}", msg);
                msg.clone()
            }

            AppError::InvalidCredentials => {
                tracing::warn!("Invalid credentials");
                "Invalid email or password".to_string()
            }

            AppError::TokenExpired => {
                tracing::warn!("Token expired");
                "Session token has expired".to_string()
            }

            AppError::EmailExists => {
                tracing::debug!("Email already registered");
                "An account with this email already exists".to_string()
            }

            AppError::NotFound => {
                tracing::debug!("Resource not found");
                "Resource not found".to_string()
            }

            AppError::Validation(ref msg) => {
                tracing::debug!("Validation error: {}", msg);
                msg.clone()
            }

            AppError::InvalidJson(ref msg) => {
                tracing::debug!("Invalid JSON: {}", msg);
                msg.clone()
            }

            AppError::PayloadTooLarge => {
                tracing::warn!("Request body over {} bytes rejected", crate::MAX_BODY_BYTES);
                format!("Request body must be at most {} bytes", crate::MAX_BODY_BYTES)
            }
        };

        let body = sonic_rs::to_string(&sonic_rs::json!({
            "error": self.code(),
            "message": message
        }))
        .unwrap_or_else(|_| {
            r#"{"error":"INTERNAL_ERROR","message":"Internal server error"}"#.to_string()
        });

        (
            self.status(),
            [(header::CONTENT_TYPE, "application/json")],
            body,
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backend_failures_share_the_internal_code() {
        let err = AppError::Internal("boom".to_string());
        assert_eq!(err.code(), "INTERNAL_ERROR");
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn auth_errors_are_unauthorized() {
        for err in [
            AppError::AuthenticationFailed("x".into()),
            AppError::InvalidCredentials,
            AppError::TokenExpired,
        ] {
            assert_eq!(err.status(), StatusCode::UNAUTHORIZED);
        }
        assert_eq!(AppError::EmailExists.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn oversized_bodies_are_413() {
        let err = AppError::PayloadTooLarge;
        assert_eq!(err.code(), "PAYLOAD_TOO_LARGE");
        assert_eq!(err.into_response().status(), StatusCode::PAYLOAD_TOO_LARGE);
    }
}
