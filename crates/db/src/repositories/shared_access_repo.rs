//! Repository for the `shared_access` table and the share workflow.

use keepsake_core::types::DbId;
use sqlx::PgPool;

use crate::models::shared_access::SharedAccess;

const COLUMNS: &str = "id, user_id, scrapbook_id, post_id, shared_by, created_at";

/// Name of the grant unique constraint, used to detect duplicate shares
/// that race past the pre-check.
pub const GRANT_CONSTRAINT: &str = "uq_shared_access_user_scrapbook_post";

/// Provides grant lookups and the atomic share operation.
pub struct SharedAccessRepo;

impl SharedAccessRepo {
    /// Does the user hold any grant touching this scrapbook?
    ///
    /// This is the predicate the visibility policy consults: the `post_id`
    /// column is irrelevant because both scrapbook-level and post-level
    /// rows carry the scrapbook id, and either implies the scrapbook was
    /// shared with the user.
    pub async fn has_scrapbook_grant(
        pool: &PgPool,
        user_id: DbId,
        scrapbook_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM shared_access \
             WHERE user_id = $1 AND scrapbook_id = $2)",
        )
        .bind(user_id)
        .bind(scrapbook_id)
        .fetch_one(pool)
        .await
    }

    /// Does a scrapbook-level grant (post_id IS NULL) already exist?
    ///
    /// Used as the duplicate-share pre-check. Best effort only: the unique
    /// constraint decides under concurrency.
    pub async fn scrapbook_grant_exists(
        pool: &PgPool,
        user_id: DbId,
        scrapbook_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM shared_access \
             WHERE user_id = $1 AND scrapbook_id = $2 AND post_id IS NULL)",
        )
        .bind(user_id)
        .bind(scrapbook_id)
        .fetch_one(pool)
        .await
    }

    /// Share a scrapbook with a user: one scrapbook-level grant plus one
    /// post-level grant per post currently in the scrapbook, in a single
    /// transaction. Posts added later are not covered until re-shared.
    ///
    /// Returns the number of grant rows written. A duplicate scrapbook-level
    /// grant aborts the whole operation with the unique-violation error;
    /// per-post rows use `ON CONFLICT DO NOTHING` so a re-share after the
    /// grant set was partially cleaned up stays well-defined.
    pub async fn share_scrapbook(
        pool: &PgPool,
        grantee: DbId,
        scrapbook_id: DbId,
        shared_by: DbId,
    ) -> Result<u64, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let scrapbook_grant = sqlx::query(
            "INSERT INTO shared_access (user_id, scrapbook_id, post_id, shared_by) \
             VALUES ($1, $2, NULL, $3)",
        )
        .bind(grantee)
        .bind(scrapbook_id)
        .bind(shared_by)
        .execute(&mut *tx)
        .await?;

        let post_grants = sqlx::query(
            "INSERT INTO shared_access (user_id, scrapbook_id, post_id, shared_by) \
             SELECT $1, p.scrapbook_id, p.id, $3 FROM posts p WHERE p.scrapbook_id = $2 \
             ON CONFLICT ON CONSTRAINT uq_shared_access_user_scrapbook_post DO NOTHING",
        )
        .bind(grantee)
        .bind(scrapbook_id)
        .bind(shared_by)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(scrapbook_grant.rows_affected() + post_grants.rows_affected())
    }

    /// All grants a user holds on a scrapbook, scrapbook-level row first.
    pub async fn list_for_user_and_scrapbook(
        pool: &PgPool,
        user_id: DbId,
        scrapbook_id: DbId,
    ) -> Result<Vec<SharedAccess>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM shared_access \
             WHERE user_id = $1 AND scrapbook_id = $2 \
             ORDER BY post_id NULLS FIRST, id"
        );
        sqlx::query_as::<_, SharedAccess>(&query)
            .bind(user_id)
            .bind(scrapbook_id)
            .fetch_all(pool)
            .await
    }

    /// Count scrapbook-level grants for `(user, scrapbook)`. At most 1 by
    /// constraint; exposed so tests can assert the invariant directly.
    pub async fn count_scrapbook_grants(
        pool: &PgPool,
        user_id: DbId,
        scrapbook_id: DbId,
    ) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM shared_access \
             WHERE user_id = $1 AND scrapbook_id = $2 AND post_id IS NULL",
        )
        .bind(user_id)
        .bind(scrapbook_id)
        .fetch_one(pool)
        .await
    }
}
