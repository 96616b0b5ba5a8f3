/// Configuration for post storage
///
/// Everything is read from environment variables with defaults. Pool
/// settings live in [`DbConfig`].
use crate::db::DbConfig;
use crate::telemetry::LogFormat;
use chrono::{DateTime, Utc};
use id_generator::{default_epoch, parse_machine_id, MACHINE_ID_ENV};
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Config {
    /// Postgres pool (metadata and content)
    pub database: DbConfig,
    pub cache: CacheConfig,
    pub ids: IdConfig,
    /// Optional upper bound for each store call
    pub step_timeout: Option<Duration>,
    pub log_format: LogFormat,
}

/// Cache (Redis) configuration
#[derive(Debug, Clone)]
pub struct CacheConfig {
    pub url: String,
    pub post_ttl: Duration,
}

/// Id generator configuration
#[derive(Debug, Clone)]
pub struct IdConfig {
    /// `None` resolves from the host at startup
    pub machine_id: Option<u16>,
    pub epoch: DateTime<Utc>,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, String>
    where
        F: Fn(&str) -> Option<String>,
    {
        let post_ttl_ms = match lookup("POST_CACHE_TTL_MS") {
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .map_err(|e| format!("POST_CACHE_TTL_MS={:?}: {}", raw, e))?,
            None => 5_000,
        };
        if post_ttl_ms == 0 {
            return Err("POST_CACHE_TTL_MS must be greater than zero".to_string());
        }

        let machine_id = lookup(MACHINE_ID_ENV)
            .map(|raw| parse_machine_id(&raw))
            .transpose()
            .map_err(|e| e.to_string())?;

        let epoch = match lookup("ID_EPOCH") {
            Some(raw) => DateTime::parse_from_rfc3339(raw.trim())
                .map(|dt| dt.with_timezone(&Utc))
                .map_err(|e| format!("ID_EPOCH={:?}: {}", raw, e))?,
            None => default_epoch(),
        };
        if epoch > Utc::now() {
            return Err(format!("ID_EPOCH {} is in the future", epoch.to_rfc3339()));
        }

        let step_timeout = lookup("POST_STEP_TIMEOUT_MS")
            .map(|raw| {
                raw.trim()
                    .parse::<u64>()
                    .map(Duration::from_millis)
                    .map_err(|e| format!("POST_STEP_TIMEOUT_MS={:?}: {}", raw, e))
            })
            .transpose()?;

        let log_format = match lookup("LOG_FORMAT") {
            Some(raw) => raw.parse()?,
            None => LogFormat::default(),
        };

        Ok(Config {
            database: DbConfig::from_lookup(&lookup),
            cache: CacheConfig {
                url: lookup("REDIS_URL").unwrap_or_else(|| "redis://localhost:6379".to_string()),
                post_ttl: Duration::from_millis(post_ttl_ms),
            },
            ids: IdConfig { machine_id, epoch },
            step_timeout,
            log_format,
        })
    }
}
