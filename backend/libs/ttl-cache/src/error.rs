//! Cache error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CacheError {
    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("Cache unavailable: {0}")]
    Unavailable(String),

    #[error("Key not found: {0}")]
    NotFound(String),

    #[error("TTL must be positive")]
    InvalidTtl,
}

impl CacheError {
    /// Transport-level failure, as opposed to a miss or a caller mistake
    pub fn is_transport(&self) -> bool {
        matches!(self, CacheError::Redis(_) | CacheError::Unavailable(_))
    }
}

pub type CacheResult<T> = Result<T, CacheError>;
