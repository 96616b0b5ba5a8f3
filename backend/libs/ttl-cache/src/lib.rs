//! TTL key/value cache
//!
//! A non-authoritative byte cache used as a read-through accelerator:
//! - Unconditional overwrite with expiry (`set_with_ttl`)
//! - Miss-tolerant reads (`get_non_fatal`): a miss is `Ok(None)`, a transport
//!   failure is an `Err` the caller is expected to treat as a miss
//! - Best-effort deletes: removing an absent key is not an error
//!
//! Two adapters are provided: [`RedisCache`] for production and
//! [`MemoryCache`] for tests and single-process deployments.

mod error;
mod memory;
mod metrics;
mod redis_cache;

pub use error::{CacheError, CacheResult};
pub use memory::MemoryCache;
pub use metrics::CacheMetrics;
pub use redis_cache::{RedisCache, SharedRedis};

use std::time::Duration;

/// Core cache operations
#[async_trait::async_trait]
pub trait CacheStore: Send + Sync {
    /// Overwrite `key` with `value`, expiring after `ttl`
    async fn set_with_ttl(&self, key: &str, value: &[u8], ttl: Duration) -> CacheResult<()>;

    /// `Ok(None)` on a clean miss
    async fn get_non_fatal(&self, key: &str) -> CacheResult<Option<Vec<u8>>>;

    /// Like [`CacheStore::get_non_fatal`] but a miss is [`CacheError::NotFound`]
    async fn get_fatal(&self, key: &str) -> CacheResult<Vec<u8>> {
        self.get_non_fatal(key)
            .await?
            .ok_or_else(|| CacheError::NotFound(key.to_string()))
    }

    /// Remove `key`; absence is not an error
    async fn delete(&self, key: &str) -> CacheResult<()>;

    /// Round trip to the backend
    async fn status_check(&self) -> CacheResult<()>;
}
