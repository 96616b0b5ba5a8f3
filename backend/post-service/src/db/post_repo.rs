use super::{from_db_id, to_db_id};
use crate::error::{PostError, Result};
use crate::models::{OrderBy, Page, PostMetadata, QueryFilter};
use crate::stores::MetadataStore;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, QueryBuilder};
use tracing::debug;

const SELECT_POSTS: &str = "SELECT id, user_id, title, description, front_image, content_id, \
                            created_at, updated_at FROM posts";

#[derive(Debug, sqlx::FromRow)]
struct PostRow {
    id: i64,
    user_id: i64,
    title: String,
    description: String,
    front_image: Option<String>,
    content_id: i64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<PostRow> for PostMetadata {
    fn from(row: PostRow) -> Self {
        Self {
            id: from_db_id(row.id),
            user_id: row.user_id,
            title: row.title,
            description: row.description,
            front_image: row.front_image,
            content_id: from_db_id(row.content_id),
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Metadata store over the `posts` table
#[derive(Clone)]
pub struct PgMetadataStore {
    pool: PgPool,
}

impl PgMetadataStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

/// Listing query: `user_id` AND'ed with the OR of the time predicates,
/// ordered by the requested column with `id` as tie-break.
fn build_list_query(
    filter: &QueryFilter,
    order_by: OrderBy,
    page: Page,
) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::new(SELECT_POSTS);
    let mut has_where = false;
    let mut clause = |qb: &mut QueryBuilder<'static, Postgres>| {
        qb.push(if has_where { " AND " } else { " WHERE " });
        has_where = true;
    };

    if let Some(user_id) = filter.user_id {
        clause(&mut qb);
        qb.push("user_id = ");
        qb.push_bind(user_id);
    }

    match (filter.created_after, filter.updated_after) {
        (None, None) => {}
        (Some(created), None) => {
            clause(&mut qb);
            qb.push("created_at > ");
            qb.push_bind(created);
        }
        (None, Some(updated)) => {
            clause(&mut qb);
            qb.push("updated_at > ");
            qb.push_bind(updated);
        }
        (Some(created), Some(updated)) => {
            clause(&mut qb);
            qb.push("(created_at > ");
            qb.push_bind(created);
            qb.push(" OR updated_at > ");
            qb.push_bind(updated);
            qb.push(")");
        }
    }

    let direction = order_by.direction.as_sql();
    qb.push(format!(
        " ORDER BY {} {}, id {}",
        order_by.field.column(),
        direction,
        direction
    ));
    qb.push(" LIMIT ");
    qb.push_bind(page.limit() as i64);
    qb.push(" OFFSET ");
    qb.push_bind(page.offset() as i64);

    qb
}

#[async_trait]
impl MetadataStore for PgMetadataStore {
    async fn create(&self, post: &PostMetadata) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO posts (id, user_id, title, description, front_image, content_id,
                               created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(to_db_id(post.id))
        .bind(post.user_id)
        .bind(&post.title)
        .bind(&post.description)
        .bind(&post.front_image)
        .bind(to_db_id(post.content_id))
        .bind(post.created_at)
        .bind(post.updated_at)
        .execute(&self.pool)
        .await?;

        debug!(post_id = post.id, "Inserted post metadata");
        Ok(())
    }

    async fn delete(&self, id: u64) -> Result<u64> {
        let result = sqlx::query("DELETE FROM posts WHERE id = $1")
            .bind(to_db_id(id))
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    async fn query_by_id(&self, id: u64) -> Result<PostMetadata> {
        let row = sqlx::query_as::<_, PostRow>(&format!("{} WHERE id = $1", SELECT_POSTS))
            .bind(to_db_id(id))
            .fetch_optional(&self.pool)
            .await?;

        row.map(PostMetadata::from)
            .ok_or_else(|| PostError::NotFound(format!("post {}", id)))
    }

    async fn query(
        &self,
        filter: &QueryFilter,
        order_by: OrderBy,
        page: Page,
    ) -> Result<Vec<PostMetadata>> {
        let mut qb = build_list_query(filter, order_by, page);
        let rows = qb.build_query_as::<PostRow>().fetch_all(&self.pool).await?;

        Ok(rows.into_iter().map(PostMetadata::from).collect())
    }

    async fn status_check(&self) -> Result<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
