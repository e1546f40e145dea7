//! Sharing grant model.

use keepsake_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `shared_access` table.
///
/// `post_id IS NULL` denotes a scrapbook-level grant ("user may view the
/// scrapbook as a whole"); a set `post_id` denotes a grant on one post.
/// Rows are only ever created by the share workflow and removed by
/// cascade; they are never updated.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct SharedAccess {
    pub id: DbId,
    pub user_id: DbId,
    pub scrapbook_id: Option<DbId>,
    pub post_id: Option<DbId>,
    pub shared_by: DbId,
    pub created_at: Timestamp,
}
