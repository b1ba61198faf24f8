use std::env;
use std::net::SocketAddr;
use std::str::FromStr;
use anyhow::{Context, Result};

/// Which persistence backend the stores are built on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StorageBackend {
    /// PostgreSQL for records, Redis for token sessions and timer snapshots.
    Postgres,
    /// Process-local maps. Nothing survives a restart.
    Memory,
}

impl FromStr for StorageBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "postgres" => Ok(StorageBackend::Postgres),
            "memory" => Ok(StorageBackend::Memory),
            other => anyhow::bail!("Unknown STORAGE_BACKEND '{}' (expected postgres or memory)", other),
        }
    }
}

/// Argon2id cost parameters.
#[derive(Clone, Copy, Debug)]
pub struct Argon2Settings {
    /// Memory cost in KiB.
    pub memory_kib: u32,
    /// Number of passes.
    pub iterations: u32,
    /// Degree of parallelism.
    pub parallelism: u32,
}

impl Default for Argon2Settings {
    fn default() -> Self {
        Self {
            memory_kib: 19 * 1024,
            iterations: 2,
            parallelism: 1,
        }
    }
}

impl Argon2Settings {
    /// The cheapest parameters argon2 accepts. For tests and local development only.
    pub fn minimal() -> Self {
        Self {
            memory_kib: 8,
            iterations: 1,
            parallelism: 1,
        }
    }
}

/// Token bucket settings for the auth routes.
#[derive(Clone, Copy, Debug)]
pub struct RateLimitSettings {
    /// Seconds between replenished requests.
    pub per_second: u64,
    /// Bucket size.
    pub burst_size: u32,
}

/// The application's configuration.
#[derive(Clone, Debug)]
pub struct Config {
    /// The address the HTTP server binds to.
    pub bind_addr: SocketAddr,
    /// The persistence backend.
    pub storage: StorageBackend,
    /// The URL of the PostgreSQL database.
    pub database_url: Option<String>,
    /// Maximum number of pooled PostgreSQL connections.
    pub database_pool_size: usize,
    /// The URL of the Redis server.
    pub redis_url: String,
    /// The duration of a bearer token session in days.
    pub session_duration_days: i64,
    /// Origins allowed by the CORS layer.
    pub cors_origins: Vec<String>,
    /// Password hashing cost.
    pub argon2: Argon2Settings,
    /// Rate limiting for login and registration; `None` disables it.
    pub auth_rate_limit: Option<RateLimitSettings>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 3000)),
            storage: StorageBackend::Memory,
            database_url: None,
            database_pool_size: 16,
            redis_url: "redis://127.0.0.1:6379".to_string(),
            session_duration_days: 7,
            cors_origins: vec![
                "http://localhost:3000".to_string(),
                "http://127.0.0.1:3000".to_string(),
                "http://[::1]:3000".to_string(),
            ],
            argon2: Argon2Settings::default(),
            auth_rate_limit: None,
        }
    }
}

fn parse_var<T>(name: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|e| anyhow::anyhow!("Invalid {}: {}", name, e)),
        Err(_) => Ok(default),
    }
}

impl Config {
    /// Creates a new `Config` from environment variables.
    ///
    /// # Returns
    ///
    /// A `Result` containing the `Config`.
    pub fn from_env() -> Result<Self> {
        let defaults = Config::default();

        let storage: StorageBackend = env::var("STORAGE_BACKEND")
            .unwrap_or_else(|_| "postgres".to_string())
            .parse()?;

        let database_url = env::var("DATABASE_URL").ok();
        if storage == StorageBackend::Postgres && database_url.is_none() {
            anyhow::bail!("DATABASE_URL must be set when STORAGE_BACKEND=postgres");
        }

        let session_duration_days: i64 = parse_var("SESSION_DURATION_DAYS", 7)?;
        if session_duration_days < 1 {
            anyhow::bail!("SESSION_DURATION_DAYS must be at least 1");
        }

        let cors_origins = match env::var("CORS_ORIGINS") {
            Ok(raw) => raw
                .split(',')
                .map(str::trim)
                .filter(|origin| !origin.is_empty())
                .map(str::to_string)
                .collect(),
            Err(_) => defaults.cors_origins,
        };

        let argon2 = Argon2Settings {
            memory_kib: parse_var("ARGON2_MEMORY_KIB", defaults.argon2.memory_kib)?,
            iterations: parse_var("ARGON2_ITERATIONS", defaults.argon2.iterations)?,
            parallelism: parse_var("ARGON2_PARALLELISM", defaults.argon2.parallelism)?,
        };

        let per_second: u64 = parse_var("AUTH_RATE_PER_SECOND", 2)?;
        let burst_size: u32 = parse_var("AUTH_RATE_BURST", 10)?;
        let auth_rate_limit = (per_second > 0 && burst_size > 0).then_some(RateLimitSettings {
            per_second,
            burst_size,
        });

        Ok(Self {
            bind_addr: parse_var("BIND_ADDR", defaults.bind_addr)?,
            storage,
            database_url,
            database_pool_size: parse_var("DATABASE_POOL_SIZE", defaults.database_pool_size)
                .context("DATABASE_POOL_SIZE must be a positive integer")?,
            redis_url: env::var("REDIS_URL").unwrap_or(defaults.redis_url),
            session_duration_days,
            cors_origins,
            argon2,
            auth_rate_limit,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn storage_backend_parses_case_insensitively() {
        assert_eq!("Memory".parse::<StorageBackend>().unwrap(), StorageBackend::Memory);
        assert_eq!(" postgres ".parse::<StorageBackend>().unwrap(), StorageBackend::Postgres);
        assert!("sqlite".parse::<StorageBackend>().is_err());
    }

    #[test]
    fn default_config_is_in_memory_without_rate_limits() {
        let config = Config::default();
        assert_eq!(config.storage, StorageBackend::Memory);
        assert!(config.auth_rate_limit.is_none());
        assert_eq!(config.session_duration_days, 7);
    }
}
