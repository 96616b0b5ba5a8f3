/// Data models for post storage
///
/// - `PostMetadata`: the relational row (system of record for existence)
/// - `Content`: the rich body, stored as one document per post
/// - `Post`: metadata and content assembled together
/// - `NewPost`: caller input for creation
mod query;

pub use query::{Direction, OrderBy, OrderField, Page, QueryFilter};

use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};

/// Post metadata row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostMetadata {
    pub id: u64,
    pub user_id: i64,
    pub title: String,
    pub description: String,
    pub front_image: Option<String>,
    /// Key of the content document; issued together with `id`
    pub content_id: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fully assembled post
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    #[serde(flatten)]
    pub metadata: PostMetadata,
    pub content: Content,
}

impl Post {
    pub fn id(&self) -> u64 {
        self.metadata.id
    }

    pub fn content_id(&self) -> u64 {
        self.metadata.content_id
    }
}

/// Input for creating a post. `user_id` comes from the verified caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPost {
    pub user_id: i64,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub front_image: Option<String>,
    #[serde(default)]
    pub content: Content,
}

impl NewPost {
    /// Stamp server-side fields. Timestamps are truncated to microseconds,
    /// the resolution Postgres keeps.
    pub(crate) fn into_post(self, id: u64, content_id: u64, now: DateTime<Utc>) -> Post {
        let now = now.trunc_subsecs(6);
        Post {
            metadata: PostMetadata {
                id,
                user_id: self.user_id,
                title: self.title,
                description: self.description,
                front_image: self.front_image,
                content_id,
                created_at: now,
                updated_at: now,
            },
            content: self.content,
        }
    }
}

/// Rich content body: ordered blocks, replaced or deleted as a whole
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Content {
    pub blocks: Vec<Block>,
}

impl Content {
    pub fn new(blocks: Vec<Block>) -> Self {
        Self { blocks }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    #[serde(rename = "type")]
    pub block_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub styles: Vec<Style>,
}

impl Block {
    pub fn paragraph(text: impl Into<String>) -> Self {
        Self {
            block_type: "paragraph".to_string(),
            content: Some(text.into()),
            url: None,
            caption: None,
            styles: Vec::new(),
        }
    }

    pub fn image(url: impl Into<String>, caption: Option<String>) -> Self {
        Self {
            block_type: "image".to_string(),
            content: None,
            url: Some(url.into()),
            caption,
            styles: Vec::new(),
        }
    }

    pub fn with_style(mut self, style: Style) -> Self {
        self.styles.push(style);
        self
    }
}

/// Rich-text range inside a block, in characters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Style {
    pub offset: u32,
    pub length: u32,
    pub style: String,
}
