//! Repository for the `posts` table.

use keepsake_core::slug;
use keepsake_core::types::DbId;
use keepsake_core::validation::normalize_title;
use sqlx::PgPool;

use crate::is_unique_violation;
use crate::models::post::{CreatePost, Post, UpdatePost};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, scrapbook_id, author_id, title, slug, image, content, \
                       status, approved, created_at, updated_at";

/// Name of the slug unique constraint, used to detect residual collisions.
pub const SLUG_CONSTRAINT: &str = "uq_posts_slug";

/// Provides CRUD operations for posts within a scrapbook.
pub struct PostRepo;

impl PostRepo {
    /// Insert a new post, generating its slug from the trimmed title with
    /// the same collision policy as scrapbooks: one existence check, an
    /// 8-hex-char suffix on collision, and a single retry should the
    /// unique constraint still fire.
    pub async fn create(
        pool: &PgPool,
        scrapbook_id: DbId,
        author_id: DbId,
        input: &CreatePost,
    ) -> Result<Post, sqlx::Error> {
        let title = normalize_title(&input.title);
        let base = slug::slugify(&title);

        let taken = Self::slug_exists(pool, &base).await?;
        let candidate = if taken { slug::with_suffix(&base) } else { base.clone() };

        match Self::insert(pool, scrapbook_id, author_id, &title, &candidate, input).await {
            Err(e) if is_unique_violation(&e, SLUG_CONSTRAINT) => {
                tracing::warn!(slug = %candidate, "post slug collision, retrying with fresh suffix");
                Self::insert(
                    pool,
                    scrapbook_id,
                    author_id,
                    &title,
                    &slug::with_suffix(&base),
                    input,
                )
                .await
            }
            other => other,
        }
    }

    async fn insert(
        pool: &PgPool,
        scrapbook_id: DbId,
        author_id: DbId,
        title: &str,
        slug: &str,
        input: &CreatePost,
    ) -> Result<Post, sqlx::Error> {
        let query = format!(
            "INSERT INTO posts (scrapbook_id, author_id, title, slug, image, content, status)
             VALUES ($1, $2, $3, $4, $5, COALESCE($6, ''), COALESCE($7, 0))
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Post>(&query)
            .bind(scrapbook_id)
            .bind(author_id)
            .bind(title)
            .bind(slug)
            .bind(&input.image)
            .bind(&input.content)
            .bind(input.status)
            .fetch_one(pool)
            .await
    }

    pub async fn slug_exists(pool: &PgPool, slug: &str) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM posts WHERE slug = $1)")
            .bind(slug)
            .fetch_one(pool)
            .await
    }

    /// Find a post by slug *within* a given scrapbook. A valid post slug
    /// paired with the wrong scrapbook does not resolve.
    pub async fn find_by_slug_in_scrapbook(
        pool: &PgPool,
        scrapbook_id: DbId,
        post_slug: &str,
    ) -> Result<Option<Post>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM posts WHERE scrapbook_id = $1 AND slug = $2");
        sqlx::query_as::<_, Post>(&query)
            .bind(scrapbook_id)
            .bind(post_slug)
            .fetch_optional(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Post>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM posts WHERE id = $1");
        sqlx::query_as::<_, Post>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List posts in a scrapbook, newest first. With `include_drafts`
    /// false, draft posts are filtered out (the view offered to viewers
    /// who are not the scrapbook author).
    pub async fn list_by_scrapbook(
        pool: &PgPool,
        scrapbook_id: DbId,
        include_drafts: bool,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Post>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM posts \
             WHERE scrapbook_id = $1 AND (status <> 0 OR $2) \
             ORDER BY created_at DESC LIMIT $3 OFFSET $4"
        );
        sqlx::query_as::<_, Post>(&query)
            .bind(scrapbook_id)
            .bind(include_drafts)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    pub async fn count_by_scrapbook(
        pool: &PgPool,
        scrapbook_id: DbId,
        include_drafts: bool,
    ) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM posts WHERE scrapbook_id = $1 AND (status <> 0 OR $2)",
        )
        .bind(scrapbook_id)
        .bind(include_drafts)
        .fetch_one(pool)
        .await
    }

    /// Update a post. Only non-`None` fields are applied; slug and parent
    /// scrapbook are immutable. Returns `None` if no row matches.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdatePost,
    ) -> Result<Option<Post>, sqlx::Error> {
        let title = input.title.as_deref().map(normalize_title);
        let query = format!(
            "UPDATE posts SET
                title = COALESCE($2, title),
                image = COALESCE($3, image),
                content = COALESCE($4, content),
                status = COALESCE($5, status)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Post>(&query)
            .bind(id)
            .bind(title)
            .bind(&input.image)
            .bind(&input.content)
            .bind(input.status)
            .fetch_optional(pool)
            .await
    }

    /// Delete a post. Grant rows referencing it go via FK cascade.
    /// Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM posts WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
