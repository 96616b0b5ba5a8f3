//! Filtering, ordering and pagination for post listings

use super::PostMetadata;
use crate::error::{PostError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// Listing filter.
///
/// Composition rule: `user_id` is AND'ed with the time predicates, and the
/// two time predicates are OR'ed with each other when both are present:
///
/// ```text
/// user_id = ? AND (created_at > ? OR updated_at > ?)
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryFilter {
    pub user_id: Option<i64>,
    pub created_after: Option<DateTime<Utc>>,
    pub updated_after: Option<DateTime<Utc>>,
}

impl QueryFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_user_id(mut self, user_id: i64) -> Self {
        self.user_id = Some(user_id);
        self
    }

    pub fn with_created_after(mut self, at: DateTime<Utc>) -> Self {
        self.created_after = Some(at);
        self
    }

    pub fn with_updated_after(mut self, at: DateTime<Utc>) -> Self {
        self.updated_after = Some(at);
        self
    }

    /// Build a filter from raw request parameters (RFC 3339 timestamps)
    pub fn from_params(
        user_id: Option<&str>,
        created_after: Option<&str>,
        updated_after: Option<&str>,
    ) -> Result<Self> {
        let mut filter = Self::new();

        if let Some(raw) = non_empty(user_id) {
            let id = raw
                .parse::<i64>()
                .map_err(|e| PostError::Validation(format!("user_id: {}", e)))?;
            filter = filter.with_user_id(id);
        }
        if let Some(raw) = non_empty(created_after) {
            filter = filter.with_created_after(parse_timestamp("created_after", raw)?);
        }
        if let Some(raw) = non_empty(updated_after) {
            filter = filter.with_updated_after(parse_timestamp("updated_after", raw)?);
        }

        Ok(filter)
    }

    pub fn is_empty(&self) -> bool {
        self.user_id.is_none() && self.created_after.is_none() && self.updated_after.is_none()
    }

    /// In-process evaluation of the composition rule
    pub fn matches(&self, post: &PostMetadata) -> bool {
        let user_ok = self.user_id.map_or(true, |id| post.user_id == id);

        let time_ok = match (self.created_after, self.updated_after) {
            (None, None) => true,
            (Some(created), None) => post.created_at > created,
            (None, Some(updated)) => post.updated_at > updated,
            (Some(created), Some(updated)) => {
                post.created_at > created || post.updated_at > updated
            }
        };

        user_ok && time_ok
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn parse_timestamp(field: &str, raw: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| PostError::Validation(format!("{}: {}", field, e)))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderField {
    CreatedAt,
    UpdatedAt,
}

impl OrderField {
    pub fn column(self) -> &'static str {
        match self {
            OrderField::CreatedAt => "created_at",
            OrderField::UpdatedAt => "updated_at",
        }
    }
}

impl FromStr for OrderField {
    type Err = PostError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "created_at" => Ok(OrderField::CreatedAt),
            "updated_at" => Ok(OrderField::UpdatedAt),
            other => Err(PostError::Validation(format!(
                "order field {:?} does not exist",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Direction {
    Asc,
    Desc,
}

impl Direction {
    pub fn as_sql(self) -> &'static str {
        match self {
            Direction::Asc => "ASC",
            Direction::Desc => "DESC",
        }
    }
}

impl FromStr for Direction {
    type Err = PostError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "ASC" => Ok(Direction::Asc),
            "DESC" => Ok(Direction::Desc),
            other => Err(PostError::Validation(format!(
                "order direction {:?} is not ASC or DESC",
                other
            ))),
        }
    }
}

/// Sort order for listings. Defaults to `created_at ASC`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderBy {
    pub field: OrderField,
    pub direction: Direction,
}

impl Default for OrderBy {
    fn default() -> Self {
        Self::new(OrderField::CreatedAt, Direction::Asc)
    }
}

impl OrderBy {
    pub fn new(field: OrderField, direction: Direction) -> Self {
        Self { field, direction }
    }

    /// Parse caller-supplied values; an empty direction means ASC
    pub fn parse(field: &str, direction: &str) -> Result<Self> {
        let field = field.parse()?;
        let direction = if direction.trim().is_empty() {
            Direction::Asc
        } else {
            direction.parse()?
        };
        Ok(Self { field, direction })
    }

    /// Ties on the timestamp fall back to id so paging is stable
    pub fn compare(&self, a: &PostMetadata, b: &PostMetadata) -> Ordering {
        let ord = match self.field {
            OrderField::CreatedAt => a.created_at.cmp(&b.created_at),
            OrderField::UpdatedAt => a.updated_at.cmp(&b.updated_at),
        }
        .then(a.id.cmp(&b.id));

        match self.direction {
            Direction::Asc => ord,
            Direction::Desc => ord.reverse(),
        }
    }
}

impl fmt::Display for OrderBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.field.column(), self.direction.as_sql())
    }
}

/// 1-indexed, offset-based page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    number: u32,
    rows_per_page: u32,
}

impl Page {
    pub fn new(number: u32, rows_per_page: u32) -> Result<Self> {
        if number == 0 {
            return Err(PostError::Validation("page number starts at 1".into()));
        }
        if rows_per_page == 0 {
            return Err(PostError::Validation("rows per page must be positive".into()));
        }
        Ok(Self {
            number,
            rows_per_page,
        })
    }

    pub fn number(&self) -> u32 {
        self.number
    }

    pub fn rows_per_page(&self) -> u32 {
        self.rows_per_page
    }

    /// `(number - 1) * rows_per_page`
    pub fn offset(&self) -> u64 {
        u64::from(self.number - 1) * u64::from(self.rows_per_page)
    }

    pub fn limit(&self) -> u64 {
        u64::from(self.rows_per_page)
    }
}
