//! Post read-through cache
//!
//! Assembled posts are cached as JSON under `posts:<id>` for a short TTL.
//! Every operation here is best-effort: failures are logged and absorbed,
//! never surfaced to the caller.

use crate::models::Post;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};
use ttl_cache::{CacheResult, CacheStore};

/// Default expiry for cached posts
pub const DEFAULT_POST_TTL: Duration = Duration::from_secs(5);

/// Cache key for an assembled post
pub fn post_key(post_id: u64) -> String {
    format!("posts:{}", post_id)
}

/// Typed post cache over a byte [`CacheStore`]
#[derive(Clone)]
pub struct PostCache {
    store: Arc<dyn CacheStore>,
    ttl: Duration,
}

impl PostCache {
    pub fn new(store: Arc<dyn CacheStore>) -> Self {
        Self::with_ttl(store, DEFAULT_POST_TTL)
    }

    pub fn with_ttl(store: Arc<dyn CacheStore>, ttl: Duration) -> Self {
        Self { store, ttl }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Cached post, or `None` on a miss, a transport error or an entry
    /// that no longer decodes
    pub async fn get_post(&self, post_id: u64) -> Option<Post> {
        let key = post_key(post_id);
        let bytes = match self.store.get_non_fatal(&key).await {
            Ok(Some(bytes)) => bytes,
            Ok(None) => return None,
            Err(e) => {
                warn!(key = %key, error = %e, "Cache read failed, treating as miss");
                return None;
            }
        };

        match serde_json::from_slice(&bytes) {
            Ok(post) => {
                debug!(key = %key, "Post cache hit");
                Some(post)
            }
            Err(e) => {
                warn!(key = %key, error = %e, "Invalid cached post, treating as miss");
                None
            }
        }
    }

    pub async fn set_post(&self, post: &Post) {
        let key = post_key(post.id());
        let bytes = match serde_json::to_vec(post) {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!(key = %key, error = %e, "Failed to encode post for cache");
                return;
            }
        };

        if let Err(e) = self.store.set_with_ttl(&key, &bytes, self.ttl).await {
            warn!(key = %key, error = %e, "Cache write failed");
        }
    }

    pub async fn invalidate(&self, post_id: u64) {
        let key = post_key(post_id);
        if let Err(e) = self.store.delete(&key).await {
            warn!(key = %key, error = %e, "Cache invalidation failed");
        }
    }

    pub async fn status_check(&self) -> CacheResult<()> {
        self.store.status_check().await
    }
}
