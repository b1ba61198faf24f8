use axum::{
    body::Bytes,
    extract::{FromRequest, Request},
    http::StatusCode,
};
use serde::de::DeserializeOwned;
use uuid::Uuid;

use crate::{
    error::{AppError, Result},
    validation::{
        predicates::is_uuid,
        schema::{FieldRule, validate},
    },
};

/// A request body type with a constraint table.
pub trait Validated: DeserializeOwned {
    /// Checked against the raw JSON before typed deserialization.
    const RULES: &'static [FieldRule];

    /// Extra checks that need the typed value.
    fn check(&self) -> Result<()> {
        Ok(())
    }
}

/// A JSON body that has passed its constraint table.
///
/// Malformed JSON is rejected as `INVALID_JSON`; everything after that is a
/// `VALIDATION_ERROR` naming the first failing field.
pub struct ValidJson<T>(pub T);

impl<S, T> FromRequest<S> for ValidJson<T>
where
    S: Send + Sync,
    T: Validated,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self> {
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|e| match e.status() {
                StatusCode::PAYLOAD_TOO_LARGE => AppError::PayloadTooLarge,
                _ => AppError::InvalidJson(e.body_text()),
            })?;

        let raw: sonic_rs::Value = sonic_rs::from_slice(&bytes)
            .map_err(|e| AppError::InvalidJson(format!("Malformed JSON body: {}", e)))?;

        validate(&raw, T::RULES)?;

        let value: T = sonic_rs::from_slice(&bytes)
            .map_err(|e| AppError::Validation(format!("Invalid request body: {}", e)))?;
        value.check()?;

        Ok(ValidJson(value))
    }
}

/// Parses a UUID taken from the path or query, rejecting anything but the hyphenated form.
pub fn parse_uuid(field: &str, raw: &str) -> Result<Uuid> {
    let invalid = || AppError::Validation(format!("{} must be a valid UUID", field));
    if !is_uuid(raw) {
        return Err(invalid());
    }
    Uuid::parse_str(raw).map_err(|_| invalid())
}

/// Parses an `{id}` path segment.
pub fn parse_path_id(raw: &str) -> Result<Uuid> {
    parse_uuid("id", raw)
}
