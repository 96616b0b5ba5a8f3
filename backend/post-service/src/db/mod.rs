//! Postgres-backed stores
//!
//! Metadata lives in the `posts` table; content documents live as JSONB in
//! `post_contents`. Both share one pool.

pub mod content_repo;
pub mod pool;
pub mod post_repo;

pub use content_repo::PgContentStore;
pub use pool::{create_pool, DbConfig};
pub use post_repo::PgMetadataStore;

/// Ids are unsigned in the domain and stored as BIGINT
pub(crate) fn to_db_id(id: u64) -> i64 {
    id as i64
}

pub(crate) fn from_db_id(id: i64) -> u64 {
    id as u64
}
