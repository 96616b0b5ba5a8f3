//! In-memory store adapters
//!
//! Behave like the Postgres adapters (same filter, order and paging rules)
//! and count calls so callers can verify which stores an operation touched.

use super::{ContentStore, MetadataStore};
use crate::error::{PostError, Result};
use crate::models::{Content, OrderBy, Page, PostMetadata, QueryFilter};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

/// Per-operation call counters
#[derive(Debug, Default)]
pub struct CallCounts {
    creates: AtomicUsize,
    deletes: AtomicUsize,
    reads: AtomicUsize,
    queries: AtomicUsize,
}

impl CallCounts {
    pub fn creates(&self) -> usize {
        self.creates.load(Ordering::SeqCst)
    }

    pub fn deletes(&self) -> usize {
        self.deletes.load(Ordering::SeqCst)
    }

    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    pub fn queries(&self) -> usize {
        self.queries.load(Ordering::SeqCst)
    }

    pub fn total(&self) -> usize {
        self.creates() + self.deletes() + self.reads() + self.queries()
    }
}

fn unavailable(flag: &AtomicBool, store: &str) -> Result<()> {
    if flag.load(Ordering::SeqCst) {
        return Err(PostError::StoreUnavailable(format!(
            "{} store marked unavailable",
            store
        )));
    }
    Ok(())
}

#[derive(Default)]
pub struct InMemoryMetadataStore {
    rows: Mutex<HashMap<u64, PostMetadata>>,
    unavailable: AtomicBool,
    calls: CallCounts,
}

impl InMemoryMetadataStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> &CallCounts {
        &self.calls
    }

    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    pub fn contains(&self, id: u64) -> bool {
        self.rows.lock().contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.rows.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl MetadataStore for InMemoryMetadataStore {
    async fn create(&self, post: &PostMetadata) -> Result<()> {
        self.calls.creates.fetch_add(1, Ordering::SeqCst);
        unavailable(&self.unavailable, "metadata")?;

        let mut rows = self.rows.lock();
        if rows.contains_key(&post.id) {
            return Err(PostError::Conflict(format!("post {} already exists", post.id)));
        }
        rows.insert(post.id, post.clone());
        Ok(())
    }

    async fn delete(&self, id: u64) -> Result<u64> {
        self.calls.deletes.fetch_add(1, Ordering::SeqCst);
        unavailable(&self.unavailable, "metadata")?;
        Ok(u64::from(self.rows.lock().remove(&id).is_some()))
    }

    async fn query_by_id(&self, id: u64) -> Result<PostMetadata> {
        self.calls.reads.fetch_add(1, Ordering::SeqCst);
        unavailable(&self.unavailable, "metadata")?;
        self.rows
            .lock()
            .get(&id)
            .cloned()
            .ok_or_else(|| PostError::NotFound(format!("post {}", id)))
    }

    async fn query(
        &self,
        filter: &QueryFilter,
        order_by: OrderBy,
        page: Page,
    ) -> Result<Vec<PostMetadata>> {
        self.calls.queries.fetch_add(1, Ordering::SeqCst);
        unavailable(&self.unavailable, "metadata")?;

        let mut matching: Vec<PostMetadata> = self
            .rows
            .lock()
            .values()
            .filter(|row| filter.matches(row))
            .cloned()
            .collect();
        matching.sort_by(|a, b| order_by.compare(a, b));

        Ok(matching
            .into_iter()
            .skip(page.offset() as usize)
            .take(page.limit() as usize)
            .collect())
    }

    async fn status_check(&self) -> Result<()> {
        unavailable(&self.unavailable, "metadata")
    }
}

#[derive(Default)]
pub struct InMemoryContentStore {
    documents: Mutex<HashMap<u64, Content>>,
    unavailable: AtomicBool,
    calls: CallCounts,
}

impl InMemoryContentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> &CallCounts {
        &self.calls
    }

    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    pub fn contains(&self, content_id: u64) -> bool {
        self.documents.lock().contains_key(&content_id)
    }

    pub fn len(&self) -> usize {
        self.documents.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl ContentStore for InMemoryContentStore {
    async fn create(&self, content_id: u64, content: &Content) -> Result<()> {
        self.calls.creates.fetch_add(1, Ordering::SeqCst);
        unavailable(&self.unavailable, "content")?;

        let mut documents = self.documents.lock();
        if documents.contains_key(&content_id) {
            return Err(PostError::Conflict(format!(
                "content {} already exists",
                content_id
            )));
        }
        documents.insert(content_id, content.clone());
        Ok(())
    }

    async fn delete(&self, content_id: u64) -> Result<()> {
        self.calls.deletes.fetch_add(1, Ordering::SeqCst);
        unavailable(&self.unavailable, "content")?;
        self.documents
            .lock()
            .remove(&content_id)
            .map(|_| ())
            .ok_or_else(|| PostError::NotFound(format!("content {}", content_id)))
    }

    async fn query_by_id(&self, content_id: u64) -> Result<Content> {
        self.calls.reads.fetch_add(1, Ordering::SeqCst);
        unavailable(&self.unavailable, "content")?;
        self.documents
            .lock()
            .get(&content_id)
            .cloned()
            .ok_or_else(|| PostError::NotFound(format!("content {}", content_id)))
    }

    async fn status_check(&self) -> Result<()> {
        unavailable(&self.unavailable, "content")
    }
}
