/// Error types for post storage
///
/// Callers can tell "nothing happened" (`NotFound`, `Validation`, or a
/// failure of the first step) apart from "an earlier store was already
/// written when a later step failed" (`PartialFailure`).
use id_generator::IdError;
use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// Result type for post storage operations
pub type Result<T> = std::result::Result<T, PostError>;

/// Durable orchestrator steps. Cache steps never appear here since they
/// are best-effort.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    MetadataWrite,
    ContentWrite,
    MetadataDelete,
    ContentDelete,
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Step::MetadataWrite => "metadata write",
            Step::ContentWrite => "content write",
            Step::MetadataDelete => "metadata delete",
            Step::ContentDelete => "content delete",
        };
        f.write_str(name)
    }
}

#[derive(Error, Debug)]
pub enum PostError {
    /// Entity absent at a given store
    #[error("Not found: {0}")]
    NotFound(String),

    /// Id collision
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Transport or connectivity failure
    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),

    /// Id generator saw the clock move backwards
    #[error("Clock rolled back: last tick {last_tick}, observed tick {observed_tick}")]
    ClockRolledBack { last_tick: u64, observed_tick: i64 },

    #[error("Id generation failed: {0}")]
    IdGeneration(IdError),

    /// Caller-supplied filter, order or page is invalid
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Operation cancelled")]
    Cancelled,

    #[error("Deadline exceeded after {0:?}")]
    DeadlineExceeded(Duration),

    /// A later step failed after `completed` was already durable.
    /// No rollback was attempted.
    #[error("Partial failure after {completed}: {source}")]
    PartialFailure {
        completed: Step,
        #[source]
        source: Box<PostError>,
    },
}

impl PostError {
    pub(crate) fn partial(completed: Step, source: PostError) -> Self {
        PostError::PartialFailure {
            completed,
            source: Box::new(source),
        }
    }

    /// The error of the step that actually failed
    pub fn root(&self) -> &PostError {
        match self {
            PostError::PartialFailure { source, .. } => source.root(),
            other => other,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self.root(), PostError::NotFound(_))
    }

    pub fn is_partial(&self) -> bool {
        matches!(self, PostError::PartialFailure { .. })
    }
}

impl From<IdError> for PostError {
    fn from(err: IdError) -> Self {
        match err {
            IdError::ClockRolledBack {
                last_tick,
                observed_tick,
            } => PostError::ClockRolledBack {
                last_tick,
                observed_tick,
            },
            other => PostError::IdGeneration(other),
        }
    }
}

/// Postgres unique violation
const UNIQUE_VIOLATION: &str = "23505";

impl From<sqlx::Error> for PostError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::RowNotFound => PostError::NotFound(err.to_string()),
            sqlx::Error::Database(db) if db.code().as_deref() == Some(UNIQUE_VIOLATION) => {
                PostError::Conflict(db.message().to_string())
            }
            _ => PostError::StoreUnavailable(err.to_string()),
        }
    }
}
