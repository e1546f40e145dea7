//! Handlers for sharing a scrapbook with another user.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use keepsake_core::error::CoreError;
use keepsake_core::types::DbId;
use keepsake_core::visibility;
use keepsake_db::models::user::UserSummary;
use keepsake_db::repositories::shared_access_repo::GRANT_CONSTRAINT;
use keepsake_db::repositories::{SharedAccessRepo, UserRepo};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::handlers::scrapbook_by_slug;
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// Form-level error when a scrapbook was already shared with the grantee.
const DUPLICATE_GRANT_MSG: &str = "This scrapbook has already been shared with this user.";

/// Request body for `POST /scrapbooks/{slug}/share`.
#[derive(Debug, Deserialize)]
pub struct ShareRequest {
    /// The grantee's user id, picked from the candidates listing.
    pub user_id: DbId,
}

/// Response for a successful share.
#[derive(Debug, Serialize)]
pub struct ShareResponse {
    /// Grant rows written: one for the scrapbook plus one per post that
    /// existed at share time.
    pub grants_created: u64,
}

/// GET /api/v1/scrapbooks/{slug}/share/candidates
///
/// Users the scrapbook may be shared with. The requester is excluded, so
/// self-sharing is impossible by construction of the offered set.
pub async fn candidates(
    State(state): State<AppState>,
    user: AuthUser,
    Path(slug): Path<String>,
) -> AppResult<Json<Vec<UserSummary>>> {
    let scrapbook = scrapbook_by_slug(&state.pool, &slug).await?;
    require_author(&user, scrapbook.author_id)?;

    let users = UserRepo::list_share_candidates(&state.pool, user.user_id).await?;
    Ok(Json(users))
}

/// POST /api/v1/scrapbooks/{slug}/share
///
/// Grants the scrapbook and all its current posts to the grantee in one
/// transaction. The duplicate pre-check is best effort; the unique
/// constraint on `(user, scrapbook, post)` decides under concurrency, and
/// its violation maps to the same 409 outcome.
pub async fn share(
    State(state): State<AppState>,
    user: AuthUser,
    Path(slug): Path<String>,
    Json(input): Json<ShareRequest>,
) -> AppResult<(StatusCode, Json<ShareResponse>)> {
    let scrapbook = scrapbook_by_slug(&state.pool, &slug).await?;
    require_author(&user, scrapbook.author_id)?;

    let grantee = UserRepo::find_by_id(&state.pool, input.user_id)
        .await?
        .filter(|u| u.is_active)
        .ok_or_else(|| AppError::field("user", "Select a valid user."))?;

    if grantee.id == user.user_id {
        return Err(AppError::field(
            "user",
            "You cannot share a scrapbook with yourself.",
        ));
    }

    if SharedAccessRepo::scrapbook_grant_exists(&state.pool, grantee.id, scrapbook.id).await? {
        return Err(AppError::Core(CoreError::Conflict(
            DUPLICATE_GRANT_MSG.into(),
        )));
    }

    let grants_created =
        match SharedAccessRepo::share_scrapbook(&state.pool, grantee.id, scrapbook.id, user.user_id)
            .await
        {
            Ok(count) => count,
            Err(e) if keepsake_db::is_unique_violation(&e, GRANT_CONSTRAINT) => {
                return Err(AppError::Core(CoreError::Conflict(
                    DUPLICATE_GRANT_MSG.into(),
                )));
            }
            Err(e) => return Err(e.into()),
        };

    tracing::info!(
        scrapbook_id = scrapbook.id,
        grantee_id = grantee.id,
        grants_created,
        "scrapbook shared"
    );
    Ok((StatusCode::CREATED, Json(ShareResponse { grants_created })))
}

/// Sharing is an author-only operation.
fn require_author(user: &AuthUser, author_id: DbId) -> AppResult<()> {
    if !visibility::can_modify(user.requester(), author_id) {
        return Err(AppError::Core(CoreError::Forbidden(
            "Only the author may share this scrapbook.".into(),
        )));
    }
    Ok(())
}
