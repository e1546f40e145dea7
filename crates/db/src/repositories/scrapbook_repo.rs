//! Repository for the `scrapbooks` table.

use keepsake_core::slug;
use keepsake_core::types::DbId;
use keepsake_core::validation::normalize_title;
use sqlx::PgPool;

use crate::is_unique_violation;
use crate::models::scrapbook::{CreateScrapbook, Scrapbook, UpdateScrapbook};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, author_id, title, slug, image, content, description, \
                       status, created_at, updated_at";

/// Name of the slug unique constraint, used to detect residual collisions.
pub const SLUG_CONSTRAINT: &str = "uq_scrapbooks_slug";

/// Provides CRUD and visibility-filtered listing for scrapbooks.
pub struct ScrapbookRepo;

impl ScrapbookRepo {
    /// Insert a new scrapbook, generating its slug from the trimmed title.
    ///
    /// The base slug is checked once for a collision; if taken, an
    /// 8-hex-char suffix is appended. Should the insert still hit the slug
    /// unique constraint (concurrent creation with the same title), it is
    /// retried once with a fresh suffix before the conflict surfaces.
    pub async fn create(
        pool: &PgPool,
        author_id: DbId,
        input: &CreateScrapbook,
    ) -> Result<Scrapbook, sqlx::Error> {
        let title = normalize_title(&input.title);
        let base = slug::slugify(&title);

        let taken = Self::slug_exists(pool, &base).await?;
        let candidate = if taken { slug::with_suffix(&base) } else { base.clone() };

        match Self::insert(pool, author_id, &title, &candidate, input).await {
            Err(e) if is_unique_violation(&e, SLUG_CONSTRAINT) => {
                tracing::warn!(slug = %candidate, "scrapbook slug collision, retrying with fresh suffix");
                Self::insert(pool, author_id, &title, &slug::with_suffix(&base), input).await
            }
            other => other,
        }
    }

    async fn insert(
        pool: &PgPool,
        author_id: DbId,
        title: &str,
        slug: &str,
        input: &CreateScrapbook,
    ) -> Result<Scrapbook, sqlx::Error> {
        let query = format!(
            "INSERT INTO scrapbooks (author_id, title, slug, image, content, description, status)
             VALUES ($1, $2, $3, $4, COALESCE($5, ''), COALESCE($6, ''), COALESCE($7, 1))
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Scrapbook>(&query)
            .bind(author_id)
            .bind(title)
            .bind(slug)
            .bind(&input.image)
            .bind(&input.content)
            .bind(&input.description)
            .bind(input.status)
            .fetch_one(pool)
            .await
    }

    pub async fn slug_exists(pool: &PgPool, slug: &str) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM scrapbooks WHERE slug = $1)")
            .bind(slug)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_slug(pool: &PgPool, slug: &str) -> Result<Option<Scrapbook>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM scrapbooks WHERE slug = $1");
        sqlx::query_as::<_, Scrapbook>(&query)
            .bind(slug)
            .fetch_optional(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Scrapbook>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM scrapbooks WHERE id = $1");
        sqlx::query_as::<_, Scrapbook>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List public scrapbooks, newest first. The status filter *is* the
    /// visibility policy for this listing; nothing is post-filtered.
    pub async fn list_public(
        pool: &PgPool,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Scrapbook>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM scrapbooks WHERE status = 2 \
             ORDER BY created_at DESC LIMIT $1 OFFSET $2"
        );
        sqlx::query_as::<_, Scrapbook>(&query)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    pub async fn count_public(pool: &PgPool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM scrapbooks WHERE status = 2")
            .fetch_one(pool)
            .await
    }

    /// List a user's own scrapbooks, newest first.
    pub async fn list_by_author(
        pool: &PgPool,
        author_id: DbId,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Scrapbook>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM scrapbooks WHERE author_id = $1 \
             ORDER BY created_at DESC LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, Scrapbook>(&query)
            .bind(author_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    pub async fn count_by_author(pool: &PgPool, author_id: DbId) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM scrapbooks WHERE author_id = $1")
            .bind(author_id)
            .fetch_one(pool)
            .await
    }

    /// List scrapbooks shared with a user, newest first.
    ///
    /// Post-level grant rows also carry the scrapbook id, so the join is
    /// deduplicated by scrapbook.
    pub async fn list_shared_with(
        pool: &PgPool,
        user_id: DbId,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Scrapbook>, sqlx::Error> {
        sqlx::query_as::<_, Scrapbook>(
            "SELECT DISTINCT s.id, s.author_id, s.title, s.slug, s.image, s.content, \
                    s.description, s.status, s.created_at, s.updated_at \
             FROM scrapbooks s \
             JOIN shared_access sa ON sa.scrapbook_id = s.id \
             WHERE sa.user_id = $1 \
             ORDER BY s.created_at DESC LIMIT $2 OFFSET $3",
        )
            .bind(user_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    pub async fn count_shared_with(pool: &PgPool, user_id: DbId) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(DISTINCT sa.scrapbook_id) FROM shared_access sa \
             WHERE sa.user_id = $1 AND sa.scrapbook_id IS NOT NULL",
        )
        .bind(user_id)
        .fetch_one(pool)
        .await
    }

    /// Update a scrapbook. Only non-`None` fields are applied; the slug is
    /// never regenerated. Returns `None` if no row with the given id exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateScrapbook,
    ) -> Result<Option<Scrapbook>, sqlx::Error> {
        let title = input.title.as_deref().map(normalize_title);
        let query = format!(
            "UPDATE scrapbooks SET
                title = COALESCE($2, title),
                image = COALESCE($3, image),
                content = COALESCE($4, content),
                description = COALESCE($5, description),
                status = COALESCE($6, status)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Scrapbook>(&query)
            .bind(id)
            .bind(title)
            .bind(&input.image)
            .bind(&input.content)
            .bind(&input.description)
            .bind(input.status)
            .fetch_optional(pool)
            .await
    }

    /// Delete a scrapbook. Posts and grants go with it via FK cascade.
    /// Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM scrapbooks WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
