//! HTTP handlers, one module per resource.
//!
//! Shared helpers below cover the steps every scrapbook/post handler
//! repeats: slug resolution, grant lookup, and mapping a policy DENY to
//! the right HTTP outcome (401 for anonymous, 403 for authenticated).

pub mod auth;
pub mod post;
pub mod scrapbook;
pub mod share;
pub mod uploads;

use keepsake_core::error::CoreError;
use keepsake_core::status::{Status, StatusId};
use keepsake_core::validation::field_errors;
use keepsake_core::visibility::Requester;
use keepsake_db::models::scrapbook::Scrapbook;
use keepsake_db::repositories::{ScrapbookRepo, SharedAccessRepo};
use keepsake_db::DbPool;
use validator::Validate;

use crate::error::{AppError, AppResult};

/// Run declarative DTO validation, converting failures to field errors.
pub(crate) fn validated<T: Validate>(input: &T) -> AppResult<()> {
    input
        .validate()
        .map_err(|e| AppError::Validation(field_errors(&e)))
}

/// Resolve a scrapbook by slug or fail with 404.
pub(crate) async fn scrapbook_by_slug(pool: &DbPool, slug: &str) -> AppResult<Scrapbook> {
    ScrapbookRepo::find_by_slug(pool, slug)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::NotFoundSlug {
                entity: "Scrapbook",
                slug: slug.to_string(),
            })
        })
}

/// Parse a stored status id. Values outside the enum cannot be written
/// through the API or the schema check constraint, so a mismatch here is
/// an internal fault, not client error.
pub(crate) fn stored_status(id: StatusId) -> AppResult<Status> {
    Status::from_id(id)
        .ok_or_else(|| AppError::InternalError(format!("invalid stored status {id}")))
}

/// Does the requester hold any grant touching this scrapbook?
/// Anonymous requesters never do.
pub(crate) async fn requester_grant(
    pool: &DbPool,
    requester: Requester,
    scrapbook_id: i64,
) -> AppResult<bool> {
    match requester.user_id() {
        Some(user_id) => {
            Ok(SharedAccessRepo::has_scrapbook_grant(pool, user_id, scrapbook_id).await?)
        }
        None => Ok(false),
    }
}

/// The outcome of a visibility DENY: anonymous requesters are asked to
/// sign in (401), authenticated ones are refused (403).
pub(crate) fn view_denied(requester: Requester, entity: &str) -> AppError {
    match requester {
        Requester::Anonymous => AppError::Core(CoreError::Unauthorized(format!(
            "Sign in to view this {entity}."
        ))),
        Requester::User(_) => AppError::Core(CoreError::Forbidden(format!(
            "You do not have permission to view this {entity}."
        ))),
    }
}
