//! Post entity model and DTOs.

use keepsake_core::status::StatusId;
use keepsake_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A row from the `posts` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Post {
    pub id: DbId,
    pub scrapbook_id: DbId,
    pub author_id: DbId,
    pub title: String,
    pub slug: String,
    pub image: String,
    pub content: String,
    pub status: StatusId,
    /// Moderation flag carried on the record; unused by the read policy.
    pub approved: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a post inside a scrapbook. Author and scrapbook come
/// from the request context, never from the body.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreatePost {
    #[validate(length(max = 100, message = "Title must be 100 characters or fewer."))]
    pub title: String,
    /// Upload reference returned by the uploads endpoint.
    pub image: String,
    #[validate(length(max = 200, message = "Content must be 200 characters or fewer."))]
    #[serde(default)]
    pub content: Option<String>,
    /// Defaults to 0 (Draft) if omitted.
    #[serde(default)]
    pub status: Option<StatusId>,
}

/// DTO for updating a post. All fields optional; slug immutable.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdatePost {
    #[validate(length(max = 100, message = "Title must be 100 characters or fewer."))]
    pub title: Option<String>,
    pub image: Option<String>,
    #[validate(length(max = 200, message = "Content must be 200 characters or fewer."))]
    pub content: Option<String>,
    pub status: Option<StatusId>,
}
