/// Post Storage Library
///
/// Stores a post across three backends and keeps them consistent in a
/// fixed order: metadata in a relational table, rich content as a
/// document, and the assembled post in a short-lived cache.
///
/// # Modules
///
/// - `models`: posts, content blocks, filters, ordering and paging
/// - `stores`: metadata and content store contracts plus in-memory adapters
/// - `db`: Postgres pool and store adapters
/// - `cache`: typed post cache over a TTL byte cache
/// - `orchestrator`: the create/delete/read/list coordinator
/// - `context`: per-operation cancellation and deadlines
/// - `error`: error taxonomy
/// - `config`: environment configuration
/// - `telemetry`: tracing bootstrap
pub mod cache;
pub mod config;
pub mod context;
pub mod db;
pub mod error;
pub mod models;
pub mod orchestrator;
pub mod stores;
pub mod telemetry;

pub use cache::PostCache;
pub use config::Config;
pub use context::OpContext;
pub use error::{PostError, Result, Step};
pub use models::{
    Block, Content, Direction, NewPost, OrderBy, OrderField, Page, Post, PostMetadata,
    QueryFilter, Style,
};
pub use orchestrator::{BackendStatus, PostOrchestrator, StatusReport};
pub use stores::{ContentStore, MetadataStore};

use anyhow::Context;
use id_generator::{resolve_machine_id, IdGenConfig, IdGenerator};
use std::sync::Arc;
use tracing::info;
use ttl_cache::RedisCache;

/// Migrations for the `posts` and `post_contents` tables
pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");

/// Production wiring
pub struct PostStorage;

impl PostStorage {
    /// Connect every backend and return a ready orchestrator.
    ///
    /// Builds the Postgres pool and runs migrations, connects Redis, resolves
    /// the machine id (configured value first, then host identity) and
    /// constructs the id generator.
    pub async fn connect(config: &Config) -> anyhow::Result<PostOrchestrator> {
        config.database.log_config();
        let pool = db::create_pool(&config.database)
            .await
            .context("Failed to create database pool")?;
        MIGRATOR
            .run(&pool)
            .await
            .context("Failed to run database migrations")?;

        let redis = RedisCache::connect(&config.cache.url)
            .await
            .context("Failed to connect to Redis")?;

        let machine_id = match config.ids.machine_id {
            Some(id) => id,
            None => resolve_machine_id().context("Failed to resolve id generator machine id")?,
        };
        let ids = IdGenerator::new(IdGenConfig::new(machine_id).with_start_time(config.ids.epoch))
            .context("Failed to create id generator")?;

        info!(
            machine_id,
            cache_ttl_ms = config.cache.post_ttl.as_millis() as u64,
            "Post storage connected"
        );

        let orchestrator = PostOrchestrator::new(
            Arc::new(ids),
            Arc::new(db::PgMetadataStore::new(pool.clone())),
            Arc::new(db::PgContentStore::new(pool)),
            PostCache::with_ttl(Arc::new(redis), config.cache.post_ttl),
        );

        Ok(match config.step_timeout {
            Some(timeout) => orchestrator.with_step_timeout(timeout),
            None => orchestrator,
        })
    }
}
