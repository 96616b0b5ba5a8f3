//! Post orchestrator
//!
//! Coordinates the id generator and the three stores. Metadata is the
//! system of record for existence, so it is written first and deleted
//! first; the cache is written last and invalidated last, and its failures
//! never reach the caller.
//!
//! Steps run one at a time under the caller's [`OpContext`]. There are no
//! retries and no compensation: a failure after a durable step is returned
//! as [`PostError::PartialFailure`].

use crate::cache::PostCache;
use crate::context::OpContext;
use crate::error::{PostError, Result, Step};
use crate::models::{NewPost, OrderBy, Page, Post, PostMetadata, QueryFilter};
use crate::stores::{ContentStore, MetadataStore};
use chrono::Utc;
use id_generator::IdSource;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, warn};

/// Health of one backend
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendStatus {
    Healthy,
    Unavailable(String),
}

impl BackendStatus {
    fn from_result<E: fmt::Display>(result: std::result::Result<(), E>) -> Self {
        match result {
            Ok(()) => BackendStatus::Healthy,
            Err(e) => BackendStatus::Unavailable(e.to_string()),
        }
    }

    pub fn is_healthy(&self) -> bool {
        matches!(self, BackendStatus::Healthy)
    }
}

impl fmt::Display for BackendStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackendStatus::Healthy => write!(f, "healthy"),
            BackendStatus::Unavailable(reason) => write!(f, "unavailable: {}", reason),
        }
    }
}

/// Per-backend health report
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusReport {
    pub metadata: BackendStatus,
    pub content: BackendStatus,
    pub cache: BackendStatus,
}

impl StatusReport {
    /// The cache is not authoritative, so only the durable stores count
    pub fn is_serving(&self) -> bool {
        self.metadata.is_healthy() && self.content.is_healthy()
    }

    pub fn is_healthy(&self) -> bool {
        self.is_serving() && self.cache.is_healthy()
    }
}

pub struct PostOrchestrator {
    ids: Arc<dyn IdSource>,
    metadata: Arc<dyn MetadataStore>,
    content: Arc<dyn ContentStore>,
    cache: PostCache,
    step_timeout: Option<Duration>,
}

impl PostOrchestrator {
    pub fn new(
        ids: Arc<dyn IdSource>,
        metadata: Arc<dyn MetadataStore>,
        content: Arc<dyn ContentStore>,
        cache: PostCache,
    ) -> Self {
        Self {
            ids,
            metadata,
            content,
            cache,
            step_timeout: None,
        }
    }

    /// Upper bound applied to every individual store call, on top of the
    /// context's own deadline
    pub fn with_step_timeout(mut self, timeout: Duration) -> Self {
        self.step_timeout = Some(timeout);
        self
    }

    pub fn cache(&self) -> &PostCache {
        &self.cache
    }

    /// Create a post: ids, then metadata, then content, then cache.
    pub async fn create(&self, ctx: &OpContext, new_post: NewPost) -> Result<Post> {
        ctx.check()?;

        let id = self.ids.next_id()?.as_u64();
        let content_id = self.ids.next_id()?.as_u64();
        let post = new_post.into_post(id, content_id, Utc::now());

        if let Err(e) = ctx
            .run(self.step_timeout, || self.metadata.create(&post.metadata))
            .await
        {
            error!(post_id = id, error = %e, "Metadata write failed");
            return Err(e);
        }

        if let Err(e) = ctx
            .run(self.step_timeout, || self.content.create(content_id, &post.content))
            .await
        {
            warn!(
                post_id = id,
                content_id,
                error = %e,
                "Content write failed after metadata write, metadata row left in place"
            );
            return Err(PostError::partial(Step::MetadataWrite, e));
        }

        self.cache_post(ctx, &post).await;

        info!(post_id = id, content_id, user_id = post.metadata.user_id, "Post created");
        Ok(post)
    }

    /// Delete a post: metadata, then content, then cache invalidation.
    ///
    /// Zero metadata rows affected is `NotFound` and nothing else is touched.
    pub async fn delete(&self, ctx: &OpContext, post: &PostMetadata) -> Result<()> {
        ctx.check()?;

        let rows = ctx
            .run(self.step_timeout, || self.metadata.delete(post.id))
            .await
            .map_err(|e| {
                error!(post_id = post.id, error = %e, "Metadata delete failed");
                e
            })?;

        if rows == 0 {
            return Err(PostError::NotFound(format!("post {}", post.id)));
        }

        if let Err(e) = ctx
            .run(self.step_timeout, || self.content.delete(post.content_id))
            .await
        {
            warn!(
                post_id = post.id,
                content_id = post.content_id,
                error = %e,
                "Content delete failed after metadata delete, content document orphaned"
            );
            // The post no longer exists in the system of record
            self.invalidate_post(ctx, post.id).await;
            return Err(PostError::partial(Step::MetadataDelete, e));
        }

        self.invalidate_post(ctx, post.id).await;

        info!(post_id = post.id, "Post deleted");
        Ok(())
    }

    /// Cache-aside read of one assembled post
    pub async fn query_by_id(&self, ctx: &OpContext, id: u64) -> Result<Post> {
        let cache = &self.cache;
        let cached = ctx
            .run(self.step_timeout, move || async move { Ok(cache.get_post(id).await) })
            .await?;
        if let Some(post) = cached {
            return Ok(post);
        }
        debug!(post_id = id, "Post cache miss");

        let metadata = ctx
            .run(self.step_timeout, || self.metadata.query_by_id(id))
            .await?;
        let content = ctx
            .run(self.step_timeout, || self.content.query_by_id(metadata.content_id))
            .await?;

        let post = Post { metadata, content };
        self.cache_post(ctx, &post).await;

        Ok(post)
    }

    /// List metadata only; content and cache are never consulted
    pub async fn query(
        &self,
        ctx: &OpContext,
        filter: &QueryFilter,
        order_by: OrderBy,
        page: Page,
    ) -> Result<Vec<PostMetadata>> {
        debug!(
            ?filter,
            order_by = %order_by,
            page = page.number(),
            rows_per_page = page.rows_per_page(),
            "Querying posts"
        );

        ctx.run(self.step_timeout, || self.metadata.query(filter, order_by, page))
            .await
    }

    /// Round trip to every backend. Failures are reported, not returned.
    pub async fn status_check(&self, ctx: &OpContext) -> StatusReport {
        let metadata = ctx.run(self.step_timeout, || self.metadata.status_check()).await;
        let content = ctx.run(self.step_timeout, || self.content.status_check()).await;
        let post_cache = &self.cache;
        let cache = ctx
            .run(self.step_timeout, move || async move {
                post_cache
                    .status_check()
                    .await
                    .map_err(|e| PostError::StoreUnavailable(e.to_string()))
            })
            .await;

        let report = StatusReport {
            metadata: BackendStatus::from_result(metadata),
            content: BackendStatus::from_result(content),
            cache: BackendStatus::from_result(cache),
        };
        if !report.is_healthy() {
            warn!(
                metadata = %report.metadata,
                content = %report.content,
                cache = %report.cache,
                "Post storage backend unhealthy"
            );
        }
        report
    }

    async fn cache_post(&self, ctx: &OpContext, post: &Post) {
        let cache = &self.cache;
        let write = ctx
            .run(self.step_timeout, move || async move {
                cache.set_post(post).await;
                Ok(())
            })
            .await;
        if let Err(e) = write {
            debug!(post_id = post.id(), error = %e, "Skipped cache write");
        }
    }

    async fn invalidate_post(&self, ctx: &OpContext, post_id: u64) {
        let cache = &self.cache;
        let invalidate = ctx
            .run(self.step_timeout, move || async move {
                cache.invalidate(post_id).await;
                Ok(())
            })
            .await;
        if let Err(e) = invalidate {
            debug!(post_id, error = %e, "Skipped cache invalidation");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::post_key;
    use crate::models::{Block, Content};
    use crate::stores::{MockContentStore, MockMetadataStore};
    use id_generator::{GeneratedId, IdError, IdResult};
    use mockall::Sequence;
    use std::sync::atomic::{AtomicU64, Ordering};
    use ttl_cache::{CacheStore, MemoryCache};

    struct CountingIds(AtomicU64);

    impl IdSource for CountingIds {
        fn next_id(&self) -> IdResult<GeneratedId> {
            Ok(GeneratedId::from_raw(self.0.fetch_add(1, Ordering::SeqCst)))
        }
    }

    struct RolledBackIds;

    impl IdSource for RolledBackIds {
        fn next_id(&self) -> IdResult<GeneratedId> {
            Err(IdError::ClockRolledBack {
                last_tick: 5,
                observed_tick: 4,
            })
        }
    }

    fn new_post() -> NewPost {
        NewPost {
            user_id: 9,
            title: "ordering".into(),
            description: "desc".into(),
            front_image: None,
            content: Content::new(vec![Block::paragraph("hello")]),
        }
    }

    fn sample_metadata(id: u64, content_id: u64) -> PostMetadata {
        new_post().into_post(id, content_id, Utc::now()).metadata
    }

    fn orchestrator(
        ids: Arc<dyn IdSource>,
        metadata: MockMetadataStore,
        content: MockContentStore,
        cache: Arc<MemoryCache>,
    ) -> PostOrchestrator {
        PostOrchestrator::new(
            ids,
            Arc::new(metadata),
            Arc::new(content),
            PostCache::new(cache),
        )
    }

    fn counting_ids() -> Arc<dyn IdSource> {
        Arc::new(CountingIds(AtomicU64::new(100)))
    }

    #[tokio::test]
    async fn test_create_writes_metadata_then_content_then_cache() {
        let mut seq = Sequence::new();
        let mut metadata = MockMetadataStore::new();
        let mut content = MockContentStore::new();

        metadata
            .expect_create()
            .withf(|m| m.id == 100 && m.content_id == 101)
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(()));
        content
            .expect_create()
            .withf(|id, _| *id == 101)
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| Ok(()));

        let cache = Arc::new(MemoryCache::new());
        let orch = orchestrator(counting_ids(), metadata, content, cache.clone());

        let post = orch.create(&OpContext::background(), new_post()).await.unwrap();
        assert_eq!(post.id(), 100);
        assert_eq!(post.content_id(), 101);
        assert!(cache.get_non_fatal(&post_key(100)).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_create_metadata_failure_stops_everything() {
        let mut metadata = MockMetadataStore::new();
        metadata
            .expect_create()
            .times(1)
            .returning(|_| Err(PostError::StoreUnavailable("connection refused".into())));
        let mut content = MockContentStore::new();
        content.expect_create().times(0);

        let cache = Arc::new(MemoryCache::new());
        let orch = orchestrator(counting_ids(), metadata, content, cache.clone());

        let err = orch
            .create(&OpContext::background(), new_post())
            .await
            .unwrap_err();
        assert!(matches!(err, PostError::StoreUnavailable(_)));
        assert_eq!(cache.set_calls(), 0);
    }

    #[tokio::test]
    async fn test_create_content_failure_is_partial() {
        let mut metadata = MockMetadataStore::new();
        metadata.expect_create().times(1).returning(|_| Ok(()));
        let mut content = MockContentStore::new();
        content
            .expect_create()
            .times(1)
            .returning(|_, _| Err(PostError::StoreUnavailable("timeout".into())));

        let cache = Arc::new(MemoryCache::new());
        let orch = orchestrator(counting_ids(), metadata, content, cache.clone());

        let err = orch
            .create(&OpContext::background(), new_post())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            PostError::PartialFailure {
                completed: Step::MetadataWrite,
                ..
            }
        ));
        assert!(matches!(err.root(), PostError::StoreUnavailable(_)));
        assert_eq!(cache.set_calls(), 0);
    }

    #[tokio::test]
    async fn test_create_id_failure_touches_no_store() {
        let orch = orchestrator(
            Arc::new(RolledBackIds),
            MockMetadataStore::new(),
            MockContentStore::new(),
            Arc::new(MemoryCache::new()),
        );

        let err = orch
            .create(&OpContext::background(), new_post())
            .await
            .unwrap_err();
        assert!(matches!(err, PostError::ClockRolledBack { .. }));
    }

    #[tokio::test]
    async fn test_create_survives_cache_outage() {
        let mut metadata = MockMetadataStore::new();
        metadata.expect_create().returning(|_| Ok(()));
        let mut content = MockContentStore::new();
        content.expect_create().returning(|_, _| Ok(()));

        let cache = Arc::new(MemoryCache::new());
        cache.set_unavailable(true);
        let orch = orchestrator(counting_ids(), metadata, content, cache.clone());

        assert!(orch.create(&OpContext::background(), new_post()).await.is_ok());
        assert_eq!(cache.set_calls(), 1);
    }

    #[tokio::test]
    async fn test_cancelled_context_runs_no_step() {
        let ctx = OpContext::background();
        ctx.cancel();

        let orch = orchestrator(
            counting_ids(),
            MockMetadataStore::new(),
            MockContentStore::new(),
            Arc::new(MemoryCache::new()),
        );

        assert!(matches!(
            orch.create(&ctx, new_post()).await,
            Err(PostError::Cancelled)
        ));
        assert!(matches!(
            orch.delete(&ctx, &sample_metadata(1, 2)).await,
            Err(PostError::Cancelled)
        ));
        assert!(matches!(
            orch.query_by_id(&ctx, 1).await,
            Err(PostError::Cancelled)
        ));
    }

    #[tokio::test]
    async fn test_cancel_during_metadata_write_skips_content() {
        let ctx = OpContext::background();
        let cancel = ctx.clone();

        let mut metadata = MockMetadataStore::new();
        metadata.expect_create().times(1).returning(move |_| {
            cancel.cancel();
            Ok(())
        });
        let mut content = MockContentStore::new();
        content.expect_create().times(0);

        let cache = Arc::new(MemoryCache::new());
        let orch = orchestrator(counting_ids(), metadata, content, cache.clone());

        // The metadata row landed, so the caller must see a partial failure
        let err = orch.create(&ctx, new_post()).await.unwrap_err();
        assert!(matches!(
            err,
            PostError::PartialFailure {
                completed: Step::MetadataWrite,
                ..
            }
        ));
        assert!(matches!(err.root(), PostError::Cancelled));
        assert_eq!(cache.set_calls(), 0);
    }

    #[tokio::test]
    async fn test_delete_zero_rows_is_not_found() {
        let mut metadata = MockMetadataStore::new();
        metadata.expect_delete().times(1).returning(|_| Ok(0));
        let mut content = MockContentStore::new();
        content.expect_delete().times(0);

        let cache = Arc::new(MemoryCache::new());
        let orch = orchestrator(counting_ids(), metadata, content, cache.clone());

        let err = orch
            .delete(&OpContext::background(), &sample_metadata(1, 2))
            .await
            .unwrap_err();
        assert!(matches!(err, PostError::NotFound(_)));
        assert_eq!(cache.delete_calls(), 0);
    }

    #[tokio::test]
    async fn test_delete_order_and_invalidation() {
        let mut seq = Sequence::new();
        let mut metadata = MockMetadataStore::new();
        let mut content = MockContentStore::new();
        metadata
            .expect_delete()
            .withf(|id| *id == 1)
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(1));
        content
            .expect_delete()
            .withf(|id| *id == 2)
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(()));

        let cache = Arc::new(MemoryCache::new());
        cache
            .set_with_ttl(&post_key(1), b"{}", Duration::from_secs(5))
            .await
            .unwrap();
        let orch = orchestrator(counting_ids(), metadata, content, cache.clone());

        orch.delete(&OpContext::background(), &sample_metadata(1, 2))
            .await
            .unwrap();
        assert!(cache.get_non_fatal(&post_key(1)).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_delete_content_failure_is_partial() {
        let mut metadata = MockMetadataStore::new();
        metadata.expect_delete().returning(|_| Ok(1));
        let mut content = MockContentStore::new();
        content
            .expect_delete()
            .returning(|id| Err(PostError::NotFound(format!("content {}", id))));

        let cache = Arc::new(MemoryCache::new());
        let orch = orchestrator(counting_ids(), metadata, content, cache.clone());

        let err = orch
            .delete(&OpContext::background(), &sample_metadata(1, 2))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            PostError::PartialFailure {
                completed: Step::MetadataDelete,
                ..
            }
        ));
        assert!(err.is_not_found());
        assert_eq!(cache.delete_calls(), 1);
    }

    #[tokio::test]
    async fn test_query_by_id_hit_skips_stores() {
        let cache = Arc::new(MemoryCache::new());
        let post = new_post().into_post(7, 8, Utc::now());
        PostCache::new(cache.clone()).set_post(&post).await;

        // Mocks without expectations panic if called
        let orch = orchestrator(
            counting_ids(),
            MockMetadataStore::new(),
            MockContentStore::new(),
            cache,
        );

        let found = orch.query_by_id(&OpContext::background(), 7).await.unwrap();
        assert_eq!(found, post);
    }

    #[tokio::test]
    async fn test_query_by_id_miss_assembles_and_writes_back() {
        let stored = new_post().into_post(7, 8, Utc::now());
        let meta = stored.metadata.clone();
        let body = stored.content.clone();

        let mut seq = Sequence::new();
        let mut metadata = MockMetadataStore::new();
        let mut content = MockContentStore::new();
        metadata
            .expect_query_by_id()
            .withf(|id| *id == 7)
            .times(1)
            .in_sequence(&mut seq)
            .returning(move |_| Ok(meta.clone()));
        content
            .expect_query_by_id()
            .withf(|id| *id == 8)
            .times(1)
            .in_sequence(&mut seq)
            .returning(move |_| Ok(body.clone()));

        let cache = Arc::new(MemoryCache::new());
        let orch = orchestrator(counting_ids(), metadata, content, cache.clone());

        let found = orch.query_by_id(&OpContext::background(), 7).await.unwrap();
        assert_eq!(found, stored);
        assert_eq!(orch.cache().get_post(7).await, Some(stored));
    }

    struct StalledCache;

    #[async_trait::async_trait]
    impl CacheStore for StalledCache {
        async fn set_with_ttl(
            &self,
            _key: &str,
            _value: &[u8],
            _ttl: Duration,
        ) -> ttl_cache::CacheResult<()> {
            std::future::pending().await
        }
        async fn get_non_fatal(&self, _key: &str) -> ttl_cache::CacheResult<Option<Vec<u8>>> {
            std::future::pending().await
        }
        async fn delete(&self, _key: &str) -> ttl_cache::CacheResult<()> {
            std::future::pending().await
        }
        async fn status_check(&self) -> ttl_cache::CacheResult<()> {
            std::future::pending().await
        }
    }

    fn stalled_cache_orchestrator() -> PostOrchestrator {
        let mut metadata = MockMetadataStore::new();
        metadata.expect_query_by_id().times(0);
        let mut content = MockContentStore::new();
        content.expect_query_by_id().times(0);
        PostOrchestrator::new(
            counting_ids(),
            Arc::new(metadata),
            Arc::new(content),
            PostCache::new(Arc::new(StalledCache)),
        )
    }

    #[tokio::test(start_paused = true)]
    async fn test_query_by_id_stalled_cache_hits_step_timeout() {
        let orch = stalled_cache_orchestrator().with_step_timeout(Duration::from_millis(50));

        let err = tokio::time::timeout(
            Duration::from_secs(1),
            orch.query_by_id(&OpContext::background(), 7),
        )
        .await
        .expect("cache read bounded by the step timeout")
        .unwrap_err();
        assert!(matches!(err, PostError::DeadlineExceeded(_)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_query_by_id_stalled_cache_honours_context() {
        let orch = stalled_cache_orchestrator();

        let ctx = OpContext::with_timeout(Duration::from_millis(50));
        let err = tokio::time::timeout(Duration::from_secs(1), orch.query_by_id(&ctx, 7))
            .await
            .expect("cache read bounded by the context deadline")
            .unwrap_err();
        assert!(matches!(err, PostError::DeadlineExceeded(_)));

        let token = tokio_util::sync::CancellationToken::new();
        let ctx = OpContext::with_cancel(token.clone());
        let canceller = tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(10)).await;
            token.cancel();
        });
        let err = tokio::time::timeout(Duration::from_secs(1), orch.query_by_id(&ctx, 7))
            .await
            .expect("cache read interrupted by cancellation")
            .unwrap_err();
        assert!(matches!(err, PostError::Cancelled));
        canceller.await.unwrap();
    }

    #[tokio::test]
    async fn test_query_by_id_not_found_propagates() {
        let mut metadata = MockMetadataStore::new();
        metadata
            .expect_query_by_id()
            .returning(|id| Err(PostError::NotFound(format!("post {}", id))));
        let mut content = MockContentStore::new();
        content.expect_query_by_id().times(0);

        let cache = Arc::new(MemoryCache::new());
        let orch = orchestrator(counting_ids(), metadata, content, cache.clone());

        let err = orch
            .query_by_id(&OpContext::background(), 7)
            .await
            .unwrap_err();
        assert!(matches!(err, PostError::NotFound(_)));
        assert_eq!(cache.set_calls(), 0);
    }

    #[tokio::test]
    async fn test_query_uses_metadata_only() {
        let mut metadata = MockMetadataStore::new();
        metadata
            .expect_query()
            .withf(|filter, order, page| {
                filter.user_id == Some(9) && *order == OrderBy::default() && page.number() == 2
            })
            .times(1)
            .returning(|_, _, _| Ok(vec![sample_metadata(1, 2)]));

        let cache = Arc::new(MemoryCache::new());
        let orch = orchestrator(counting_ids(), metadata, MockContentStore::new(), cache.clone());

        let rows = orch
            .query(
                &OpContext::background(),
                &QueryFilter::new().with_user_id(9),
                OrderBy::default(),
                Page::new(2, 10).unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(cache.get_calls(), 0);
    }

    #[tokio::test]
    async fn test_status_check_reports_each_backend() {
        let mut metadata = MockMetadataStore::new();
        metadata.expect_status_check().returning(|| Ok(()));
        let mut content = MockContentStore::new();
        content
            .expect_status_check()
            .returning(|| Err(PostError::StoreUnavailable("down".into())));

        let cache = Arc::new(MemoryCache::new());
        cache.set_unavailable(true);
        let orch = orchestrator(counting_ids(), metadata, content, cache);

        let report = orch.status_check(&OpContext::background()).await;
        assert!(report.metadata.is_healthy());
        assert!(!report.content.is_healthy());
        assert!(!report.cache.is_healthy());
        assert!(!report.is_serving());
    }

    #[tokio::test(start_paused = true)]
    async fn test_step_timeout_bounds_slow_store() {
        struct SlowMetadata;

        #[async_trait::async_trait]
        impl MetadataStore for SlowMetadata {
            async fn create(&self, _post: &PostMetadata) -> Result<()> {
                tokio::time::sleep(Duration::from_secs(60)).await;
                Ok(())
            }
            async fn delete(&self, _id: u64) -> Result<u64> {
                Ok(0)
            }
            async fn query_by_id(&self, id: u64) -> Result<PostMetadata> {
                Err(PostError::NotFound(format!("post {}", id)))
            }
            async fn query(
                &self,
                _filter: &QueryFilter,
                _order_by: OrderBy,
                _page: Page,
            ) -> Result<Vec<PostMetadata>> {
                Ok(Vec::new())
            }
            async fn status_check(&self) -> Result<()> {
                Ok(())
            }
        }

        let mut content = MockContentStore::new();
        content.expect_create().times(0);
        let orch = PostOrchestrator::new(
            counting_ids(),
            Arc::new(SlowMetadata),
            Arc::new(content),
            PostCache::new(Arc::new(MemoryCache::new())),
        )
        .with_step_timeout(Duration::from_millis(100));

        let err = orch
            .create(&OpContext::background(), new_post())
            .await
            .unwrap_err();
        assert!(matches!(err, PostError::DeadlineExceeded(_)));
    }
}
