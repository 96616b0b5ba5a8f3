/// Store contracts consumed by the orchestrator
///
/// Each backend is reached only through one of these traits, so the
/// orchestrator can run against Postgres (`crate::db`), the in-memory
/// adapters in [`memory`], or mocks.
///
/// Cancellation is the caller's concern: the orchestrator drops an
/// in-flight store future when its operation context is cancelled or its
/// deadline passes.
pub mod memory;

use crate::error::Result;
use crate::models::{Content, OrderBy, Page, PostMetadata, QueryFilter};
use async_trait::async_trait;

pub use ttl_cache::CacheStore;

/// Relational store for post metadata
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MetadataStore: Send + Sync {
    /// Insert a full row. `Conflict` if the id already exists.
    async fn create(&self, post: &PostMetadata) -> Result<()>;

    /// Remove the row, returning the number of rows affected.
    /// Zero rows is not an error at this layer.
    async fn delete(&self, id: u64) -> Result<u64>;

    /// `NotFound` if absent
    async fn query_by_id(&self, id: u64) -> Result<PostMetadata>;

    async fn query(
        &self,
        filter: &QueryFilter,
        order_by: OrderBy,
        page: Page,
    ) -> Result<Vec<PostMetadata>>;

    async fn status_check(&self) -> Result<()>;
}

/// Document store for post content, keyed by content id
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ContentStore: Send + Sync {
    async fn create(&self, content_id: u64, content: &Content) -> Result<()>;

    /// `NotFound` if absent
    async fn delete(&self, content_id: u64) -> Result<()>;

    /// `NotFound` if absent
    async fn query_by_id(&self, content_id: u64) -> Result<Content>;

    async fn status_check(&self) -> Result<()>;
}
