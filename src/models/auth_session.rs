use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A bearer token session.
///
/// Stored under the SHA-256 digest of the token; the raw token only ever
/// exists in the client and in the login/register response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthSession {
    /// The ID of the user this session belongs to.
    pub user_id: Uuid,
    /// The timestamp when the session was created.
    pub created_at: DateTime<Utc>,
    /// The timestamp when the session expires.
    pub expires_at: DateTime<Utc>,
}

impl AuthSession {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

/// The authenticated caller, inserted into request extensions by `require_auth`.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: Uuid,
    /// Digest of the presented token, kept so logout can revoke it.
    pub token_digest: String,
}
