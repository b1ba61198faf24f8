use async_trait::async_trait;
use chrono::Utc;
use redis::{AsyncCommands, aio::ConnectionManager};

use super::traits::TokenRepository;
use crate::{
    error::{AppError, Result},
    models::auth_session::AuthSession,
};

fn session_key(digest: &str) -> String {
    format!("session:{}", digest)
}

/// Bearer token sessions in Redis. Keys expire with the session.
#[derive(Clone)]
pub struct RedisTokenRepository {
    redis: ConnectionManager,
}

impl RedisTokenRepository {
    pub fn new(redis: ConnectionManager) -> Self {
        Self { redis }
    }
}

#[async_trait]
impl TokenRepository for RedisTokenRepository {
    async fn store(&self, digest: &str, session: &AuthSession) -> Result<()> {
        let session_json = sonic_rs::to_string(session)
            .map_err(|e| AppError::Internal(format!("Session serialization failed: {}", e)))?;
        let ttl = (session.expires_at - Utc::now()).num_seconds().max(1) as u64;

        let mut conn = self.redis.clone();
        let _: () = conn
            .set_ex(session_key(digest), &session_json, ttl)
            .await
            .map_err(|e| {
                tracing::error!("❌ Redis set_ex failed: {}", e);
                AppError::Redis(e)
            })?;
        Ok(())
    }

    async fn find(&self, digest: &str) -> Result<Option<AuthSession>> {
        let mut conn = self.redis.clone();
        let raw: Option<String> = conn.get(session_key(digest)).await?;
        raw.map(|json| {
            sonic_rs::from_str(&json)
                .map_err(|e| AppError::Internal(format!("Invalid session JSON: {}", e)))
        })
        .transpose()
    }

    async fn revoke(&self, digest: &str) -> Result<()> {
        let mut conn = self.redis.clone();
        let _: () = conn.del(session_key(digest)).await?;
        Ok(())
    }

    async fn purge_expired(&self) -> Result<u64> {
        // Redis TTLs already drop expired sessions.
        Ok(0)
    }
}
