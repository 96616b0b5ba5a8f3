use crate::{CacheError, CacheMetrics, CacheResult, CacheStore};
use redis::aio::ConnectionManager;
use redis::{AsyncCommands, Client};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

/// Shared Redis connection manager
pub type SharedRedis = Arc<Mutex<ConnectionManager>>;

/// Redis-backed [`CacheStore`]
#[derive(Clone)]
pub struct RedisCache {
    redis: SharedRedis,
    metrics: CacheMetrics,
}

impl RedisCache {
    pub fn new(redis: SharedRedis) -> Self {
        Self {
            redis,
            metrics: CacheMetrics::new(),
        }
    }

    /// Open a managed connection and verify it with a PING
    pub async fn connect(redis_url: &str) -> CacheResult<Self> {
        let client = Client::open(redis_url)?;
        let manager = ConnectionManager::new(client).await?;
        let cache = Self::new(Arc::new(Mutex::new(manager)));
        cache.status_check().await?;
        info!("Redis cache connected");
        Ok(cache)
    }
}

#[async_trait::async_trait]
impl CacheStore for RedisCache {
    async fn set_with_ttl(&self, key: &str, value: &[u8], ttl: Duration) -> CacheResult<()> {
        let ttl_ms = ttl.as_millis() as u64;
        if ttl_ms == 0 {
            return Err(CacheError::InvalidTtl);
        }

        let mut conn = self.redis.lock().await;
        let result = redis::cmd("SET")
            .arg(key)
            .arg(value)
            .arg("PX")
            .arg(ttl_ms)
            .query_async::<_, ()>(&mut *conn)
            .await;

        match result {
            Ok(()) => {
                debug!(key = %key, ttl_ms, "Cache set");
                self.metrics.record_write(key);
                Ok(())
            }
            Err(e) => {
                warn!(key = %key, error = %e, "Redis set error");
                self.metrics.record_error(key, "set");
                Err(CacheError::Redis(e))
            }
        }
    }

    async fn get_non_fatal(&self, key: &str) -> CacheResult<Option<Vec<u8>>> {
        let mut conn = self.redis.lock().await;

        match conn.get::<_, Option<Vec<u8>>>(key).await {
            Ok(Some(data)) => {
                debug!(key = %key, "Cache hit");
                self.metrics.record_hit(key);
                Ok(Some(data))
            }
            Ok(None) => {
                debug!(key = %key, "Cache miss");
                self.metrics.record_miss(key);
                Ok(None)
            }
            Err(e) => {
                warn!(key = %key, error = %e, "Redis get error");
                self.metrics.record_error(key, "get");
                Err(CacheError::Redis(e))
            }
        }
    }

    async fn delete(&self, key: &str) -> CacheResult<()> {
        let mut conn = self.redis.lock().await;
        conn.del::<_, ()>(key).await.map_err(|e| {
            self.metrics.record_error(key, "delete");
            CacheError::Redis(e)
        })?;

        debug!(key = %key, "Cache delete");
        self.metrics.record_invalidation(key);
        Ok(())
    }

    async fn status_check(&self) -> CacheResult<()> {
        let mut conn = self.redis.lock().await;
        let pong: String = redis::cmd("PING").query_async(&mut *conn).await?;
        if pong != "PONG" {
            return Err(CacheError::Unavailable(format!(
                "unexpected PING reply: {}",
                pong
            )));
        }
        Ok(())
    }
}
