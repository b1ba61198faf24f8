use redis::aio::ConnectionManager;
use std::sync::Arc;
use crate::config::{Config, StorageBackend};
use crate::error::{AppError, Result};
use crate::repositories::{
    interval::PgIntervalRepository,
    memory::MemoryStore,
    preferences::PgPreferencesRepository,
    session::PgSessionRepository,
    timer::RedisTimerRepository,
    token::RedisTokenRepository,
    traits::{
        IntervalRepository, PreferencesRepository, SessionRepository, TimerRepository,
        TokenRepository, UserRepository,
    },
    user::PgUserRepository,
};

/// The application's state.
#[derive(Clone)]
pub struct AppState {
    /// The application's configuration.
    pub config: Arc<Config>,
    /// Registered accounts.
    pub users: Arc<dyn UserRepository>,
    /// Bearer token sessions, keyed by token digest.
    pub tokens: Arc<dyn TokenRepository>,
    /// One timer snapshot per owner.
    pub timers: Arc<dyn TimerRepository>,
    /// Focus session history.
    pub sessions: Arc<dyn SessionRepository>,
    /// Custom work/break intervals.
    pub intervals: Arc<dyn IntervalRepository>,
    /// Per-user preferences.
    pub preferences: Arc<dyn PreferencesRepository>,
}

impl AppState {
    /// Creates a new `AppState` on the backend named by `config.storage`.
    ///
    /// The PostgreSQL backend applies the schema before returning.
    pub async fn new(config: &Config) -> Result<Self> {
        match config.storage {
            StorageBackend::Memory => {
                tracing::warn!("⚠️ Using in-memory storage; nothing survives a restart");
                Ok(Self::in_memory(config.clone()))
            }
            StorageBackend::Postgres => {
                let database_url = config.database_url.as_deref().ok_or_else(|| {
                    AppError::Internal("DATABASE_URL is required for postgres storage".to_string())
                })?;

                let db = crate::db::create_pool(database_url, config.database_pool_size)?;
                crate::db::run_migrations(&db).await?;
                tracing::info!(
                    "✅ PostgreSQL Pool initialized with deadpool-postgres (max {} connections)",
                    config.database_pool_size
                );

                let redis_client = redis::Client::open(config.redis_url.as_str())?;
                let redis = ConnectionManager::new(redis_client).await?;
                tracing::info!("✅ Redis Connection Manager initialized (pooled)");

                Ok(AppState {
                    config: Arc::new(config.clone()),
                    users: Arc::new(PgUserRepository::new(db.clone())),
                    tokens: Arc::new(RedisTokenRepository::new(redis.clone())),
                    timers: Arc::new(RedisTimerRepository::new(redis)),
                    sessions: Arc::new(PgSessionRepository::new(db.clone())),
                    intervals: Arc::new(PgIntervalRepository::new(db.clone())),
                    preferences: Arc::new(PgPreferencesRepository::new(db)),
                })
            }
        }
    }

    /// Every store backed by one shared `MemoryStore`.
    pub fn in_memory(config: Config) -> Self {
        let store = Arc::new(MemoryStore::new());
        AppState {
            config: Arc::new(config),
            users: store.clone(),
            tokens: store.clone(),
            timers: store.clone(),
            sessions: store.clone(),
            intervals: store.clone(),
            preferences: store,
        }
    }
}
