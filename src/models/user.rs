use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// Represents a user in the system.
#[derive(Serialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// The unique identifier for the user.
    pub id: Uuid,
    /// The user's email address, lower-cased.
    pub email: String,
    /// The user's display name.
    pub name: Option<String>,
    /// The user's Argon2 password hash. Never serialized.
    #[serde(skip)]
    pub password_hash: String,
    /// The timestamp when the user was created.
    pub created_at: DateTime<Utc>,
}
