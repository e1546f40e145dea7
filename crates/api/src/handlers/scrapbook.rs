//! Handlers for the `/scrapbooks` resource.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use keepsake_core::error::CoreError;
use keepsake_core::validation::{
    normalize_title, validate_image_required, validate_status, FieldError,
};
use keepsake_core::visibility;
use keepsake_db::models::scrapbook::{CreateScrapbook, Scrapbook, UpdateScrapbook};
use keepsake_db::repositories::ScrapbookRepo;

use crate::error::{AppError, AppResult};
use crate::handlers::{requester_grant, scrapbook_by_slug, stored_status, validated, view_denied};
use crate::middleware::auth::{AuthUser, MaybeUser};
use crate::query::PaginationParams;
use crate::response::Page;
use crate::state::AppState;

/// GET /api/v1/scrapbooks
///
/// Public listing: the `status = Public` filter is the visibility policy
/// applied as a query predicate, so anonymous requesters are welcome.
pub async fn list_public(
    State(state): State<AppState>,
    Query(params): Query<PaginationParams>,
) -> AppResult<Json<Page<Scrapbook>>> {
    let (limit, offset) = params.resolve(state.config.page_size);
    let items = ScrapbookRepo::list_public(&state.pool, limit, offset).await?;
    let total = ScrapbookRepo::count_public(&state.pool).await?;
    Ok(Json(Page {
        items,
        total,
        limit,
        offset,
    }))
}

/// GET /api/v1/scrapbooks/mine
pub async fn list_mine(
    State(state): State<AppState>,
    user: AuthUser,
    Query(params): Query<PaginationParams>,
) -> AppResult<Json<Page<Scrapbook>>> {
    let (limit, offset) = params.resolve(state.config.page_size);
    let items = ScrapbookRepo::list_by_author(&state.pool, user.user_id, limit, offset).await?;
    let total = ScrapbookRepo::count_by_author(&state.pool, user.user_id).await?;
    Ok(Json(Page {
        items,
        total,
        limit,
        offset,
    }))
}

/// GET /api/v1/scrapbooks/shared-with-me
pub async fn list_shared_with_me(
    State(state): State<AppState>,
    user: AuthUser,
    Query(params): Query<PaginationParams>,
) -> AppResult<Json<Page<Scrapbook>>> {
    let (limit, offset) = params.resolve(state.config.page_size);
    let items = ScrapbookRepo::list_shared_with(&state.pool, user.user_id, limit, offset).await?;
    let total = ScrapbookRepo::count_shared_with(&state.pool, user.user_id).await?;
    Ok(Json(Page {
        items,
        total,
        limit,
        offset,
    }))
}

/// POST /api/v1/scrapbooks
pub async fn create(
    State(state): State<AppState>,
    user: AuthUser,
    Json(input): Json<CreateScrapbook>,
) -> AppResult<(StatusCode, Json<Scrapbook>)> {
    validated(&input)?;
    let mut fields = Vec::new();
    if normalize_title(&input.title).is_empty() {
        fields.push(FieldError::new("title", "Title is required."));
    }
    if let Err(e) = validate_image_required(&input.image) {
        fields.push(e);
    }
    if let Err(e) = validate_status(input.status) {
        fields.push(e);
    }
    if !fields.is_empty() {
        return Err(AppError::Validation(fields));
    }

    let scrapbook = ScrapbookRepo::create(&state.pool, user.user_id, &input).await?;
    tracing::info!(scrapbook_id = scrapbook.id, slug = %scrapbook.slug, "scrapbook created");
    Ok((StatusCode::CREATED, Json(scrapbook)))
}

/// GET /api/v1/scrapbooks/{slug}
///
/// Detail view, gated by the visibility policy.
pub async fn get_by_slug(
    State(state): State<AppState>,
    identity: MaybeUser,
    Path(slug): Path<String>,
) -> AppResult<Json<Scrapbook>> {
    let scrapbook = scrapbook_by_slug(&state.pool, &slug).await?;
    let requester = identity.requester();
    let status = stored_status(scrapbook.status)?;
    let has_grant = requester_grant(&state.pool, requester, scrapbook.id).await?;

    if !visibility::can_view_scrapbook(requester, scrapbook.author_id, status, has_grant) {
        return Err(view_denied(requester, "scrapbook"));
    }
    Ok(Json(scrapbook))
}

/// PUT /api/v1/scrapbooks/{slug}
///
/// Author only. The slug is immutable even when the title changes.
pub async fn update(
    State(state): State<AppState>,
    user: AuthUser,
    Path(slug): Path<String>,
    Json(input): Json<UpdateScrapbook>,
) -> AppResult<Json<Scrapbook>> {
    let scrapbook = scrapbook_by_slug(&state.pool, &slug).await?;
    if !visibility::can_modify(user.requester(), scrapbook.author_id) {
        return Err(AppError::Core(CoreError::Forbidden(
            "Only the author may edit this scrapbook.".into(),
        )));
    }

    validated(&input)?;
    let mut fields = Vec::new();
    if let Some(title) = &input.title {
        if normalize_title(title).is_empty() {
            fields.push(FieldError::new("title", "Title is required."));
        }
    }
    if let Some(image) = &input.image {
        if let Err(e) = validate_image_required(image) {
            fields.push(e);
        }
    }
    if let Err(e) = validate_status(input.status) {
        fields.push(e);
    }
    if !fields.is_empty() {
        return Err(AppError::Validation(fields));
    }

    let updated = ScrapbookRepo::update(&state.pool, scrapbook.id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Scrapbook",
            id: scrapbook.id,
        }))?;
    Ok(Json(updated))
}

/// DELETE /api/v1/scrapbooks/{slug}
///
/// Author only. Posts and grants cascade away with the scrapbook.
pub async fn delete(
    State(state): State<AppState>,
    user: AuthUser,
    Path(slug): Path<String>,
) -> AppResult<StatusCode> {
    let scrapbook = scrapbook_by_slug(&state.pool, &slug).await?;
    if !visibility::can_modify(user.requester(), scrapbook.author_id) {
        return Err(AppError::Core(CoreError::Forbidden(
            "Only the author may delete this scrapbook.".into(),
        )));
    }

    ScrapbookRepo::delete(&state.pool, scrapbook.id).await?;
    tracing::info!(scrapbook_id = scrapbook.id, "scrapbook deleted");
    Ok(StatusCode::NO_CONTENT)
}
