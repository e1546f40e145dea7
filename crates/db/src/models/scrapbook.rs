//! Scrapbook entity model and DTOs.

use keepsake_core::status::StatusId;
use keepsake_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A row from the `scrapbooks` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Scrapbook {
    pub id: DbId,
    pub author_id: DbId,
    pub title: String,
    pub slug: String,
    pub image: String,
    pub content: String,
    pub description: String,
    pub status: StatusId,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a scrapbook. The author comes from the authenticated
/// requester, the slug from the title; neither is client-supplied.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateScrapbook {
    #[validate(length(max = 100, message = "Title must be 100 characters or fewer."))]
    pub title: String,
    /// Upload reference returned by the uploads endpoint.
    pub image: String,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    /// Defaults to 1 (Private) if omitted.
    #[serde(default)]
    pub status: Option<StatusId>,
}

/// DTO for updating a scrapbook. All fields optional; the slug is
/// immutable after creation and deliberately absent here.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateScrapbook {
    #[validate(length(max = 100, message = "Title must be 100 characters or fewer."))]
    pub title: Option<String>,
    pub image: Option<String>,
    pub content: Option<String>,
    pub description: Option<String>,
    pub status: Option<StatusId>,
}
