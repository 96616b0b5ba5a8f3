use super::to_db_id;
use crate::error::{PostError, Result};
use crate::models::{Block, Content};
use crate::stores::ContentStore;
use async_trait::async_trait;
use sqlx::types::Json;
use sqlx::PgPool;
use tracing::debug;

/// Content store over the `post_contents` JSONB table
#[derive(Clone)]
pub struct PgContentStore {
    pool: PgPool,
}

impl PgContentStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ContentStore for PgContentStore {
    async fn create(&self, content_id: u64, content: &Content) -> Result<()> {
        sqlx::query("INSERT INTO post_contents (id, blocks) VALUES ($1, $2)")
            .bind(to_db_id(content_id))
            .bind(Json(&content.blocks))
            .execute(&self.pool)
            .await?;

        debug!(content_id, blocks = content.blocks.len(), "Inserted post content");
        Ok(())
    }

    async fn delete(&self, content_id: u64) -> Result<()> {
        let result = sqlx::query("DELETE FROM post_contents WHERE id = $1")
            .bind(to_db_id(content_id))
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(PostError::NotFound(format!("content {}", content_id)));
        }
        Ok(())
    }

    async fn query_by_id(&self, content_id: u64) -> Result<Content> {
        let blocks: Option<Json<Vec<Block>>> =
            sqlx::query_scalar("SELECT blocks FROM post_contents WHERE id = $1")
                .bind(to_db_id(content_id))
                .fetch_optional(&self.pool)
                .await?;

        blocks
            .map(|Json(blocks)| Content::new(blocks))
            .ok_or_else(|| PostError::NotFound(format!("content {}", content_id)))
    }

    async fn status_check(&self) -> Result<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
