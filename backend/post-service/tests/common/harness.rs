//! In-memory wiring for orchestrator tests
//!
//! Every backend is an in-process fake that counts its calls, so tests can
//! assert which stores an operation touched.

use chrono::{DateTime, Duration as ChronoDuration, TimeZone, Utc};
use id_generator::{IdGenConfig, IdGenerator};
use post_service::stores::memory::{InMemoryContentStore, InMemoryMetadataStore};
use post_service::{Block, Content, NewPost, PostCache, PostMetadata, PostOrchestrator};
use std::sync::Arc;
use std::time::Duration;
use ttl_cache::MemoryCache;

pub const TEST_TTL: Duration = Duration::from_secs(5);

pub struct Harness {
    pub orchestrator: Arc<PostOrchestrator>,
    pub metadata: Arc<InMemoryMetadataStore>,
    pub content: Arc<InMemoryContentStore>,
    pub cache: Arc<MemoryCache>,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_machine_id(1)
    }

    pub fn with_machine_id(machine_id: u16) -> Self {
        let ids = IdGenerator::new(IdGenConfig::new(machine_id)).expect("id generator");
        let metadata = Arc::new(InMemoryMetadataStore::new());
        let content = Arc::new(InMemoryContentStore::new());
        let cache = Arc::new(MemoryCache::new());

        let orchestrator = PostOrchestrator::new(
            Arc::new(ids),
            metadata.clone(),
            content.clone(),
            PostCache::with_ttl(cache.clone(), TEST_TTL),
        );

        Self {
            orchestrator: Arc::new(orchestrator),
            metadata,
            content,
            cache,
        }
    }

    /// Store calls across both durable stores
    pub fn store_calls(&self) -> usize {
        self.metadata.calls().total() + self.content.calls().total()
    }
}

pub fn new_post(user_id: i64, title: &str) -> NewPost {
    NewPost {
        user_id,
        title: title.to_string(),
        description: format!("{} description", title),
        front_image: Some(format!("https://img.example/{}.png", user_id)),
        content: Content::new(vec![
            Block::paragraph(format!("{} body", title)),
            Block::image("https://img.example/inline.png", None),
        ]),
    }
}

pub fn base_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap()
}

pub fn at_minute(minute: i64) -> DateTime<Utc> {
    base_time() + ChronoDuration::minutes(minute)
}

/// Metadata row with fixed timestamps, for seeding list queries
pub fn metadata_row(id: u64, user_id: i64, created_min: i64, updated_min: i64) -> PostMetadata {
    PostMetadata {
        id,
        user_id,
        title: format!("post {}", id),
        description: String::new(),
        front_image: None,
        content_id: 10_000 + id,
        created_at: at_minute(created_min),
        updated_at: at_minute(updated_min),
    }
}
