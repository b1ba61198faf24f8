use async_trait::async_trait;
use redis::{AsyncCommands, aio::ConnectionManager};

use super::traits::TimerRepository;
use crate::{
    error::{AppError, Result},
    models::{owner::Owner, timer::TimerState},
};

/// Abandoned guest timers fall out of Redis after this long.
const TIMER_TTL_SECS: u64 = 30 * 86400;

fn timer_key(owner: &Owner) -> String {
    format!("timer:{}", owner.storage_key())
}

/// Timer snapshots as JSON blobs in Redis, one key per owner.
#[derive(Clone)]
pub struct RedisTimerRepository {
    redis: ConnectionManager,
}

impl RedisTimerRepository {
    pub fn new(redis: ConnectionManager) -> Self {
        Self { redis }
    }
}

#[async_trait]
impl TimerRepository for RedisTimerRepository {
    async fn get(&self, owner: &Owner) -> Result<Option<TimerState>> {
        let mut conn = self.redis.clone();
        let raw: Option<String> = conn.get(timer_key(owner)).await?;
        raw.map(|json| {
            sonic_rs::from_str(&json)
                .map_err(|e| AppError::Internal(format!("Corrupt timer snapshot for {}: {}", owner, e)))
        })
        .transpose()
    }

    async fn save(&self, owner: &Owner, state: &TimerState) -> Result<()> {
        let json = sonic_rs::to_string(state)
            .map_err(|e| AppError::Internal(format!("Timer serialization failed: {}", e)))?;
        let mut conn = self.redis.clone();
        let _: () = conn.set_ex(timer_key(owner), json, TIMER_TTL_SECS).await?;
        tracing::debug!("💾 Timer saved for {}", owner);
        Ok(())
    }

    async fn clear(&self, owner: &Owner) -> Result<()> {
        let mut conn = self.redis.clone();
        let _: () = conn.del(timer_key(owner)).await?;
        Ok(())
    }
}
