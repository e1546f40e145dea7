//! Handlers for posts, nested under `/scrapbooks/{slug}/posts`.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use keepsake_core::error::CoreError;
use keepsake_core::validation::{
    normalize_title, validate_image_required, validate_status, FieldError,
};
use keepsake_core::visibility::{self, Requester};
use keepsake_db::models::post::{CreatePost, Post, UpdatePost};
use keepsake_db::repositories::PostRepo;

use crate::error::{AppError, AppResult};
use crate::handlers::{requester_grant, scrapbook_by_slug, stored_status, validated, view_denied};
use crate::middleware::auth::{AuthUser, MaybeUser};
use crate::query::PaginationParams;
use crate::response::Page;
use crate::state::AppState;

/// GET /api/v1/scrapbooks/{slug}/posts
///
/// Listing is gated by the *scrapbook* policy. The scrapbook author sees
/// every post; other permitted viewers see drafts filtered out.
pub async fn list_in_scrapbook(
    State(state): State<AppState>,
    identity: MaybeUser,
    Path(slug): Path<String>,
    Query(params): Query<PaginationParams>,
) -> AppResult<Json<Page<Post>>> {
    let scrapbook = scrapbook_by_slug(&state.pool, &slug).await?;
    let requester = identity.requester();
    let status = stored_status(scrapbook.status)?;
    let has_grant = requester_grant(&state.pool, requester, scrapbook.id).await?;

    if !visibility::can_view_scrapbook(requester, scrapbook.author_id, status, has_grant) {
        return Err(view_denied(requester, "scrapbook"));
    }

    let include_drafts = requester == Requester::User(scrapbook.author_id);
    let (limit, offset) = params.resolve(state.config.page_size);
    let items =
        PostRepo::list_by_scrapbook(&state.pool, scrapbook.id, include_drafts, limit, offset)
            .await?;
    let total = PostRepo::count_by_scrapbook(&state.pool, scrapbook.id, include_drafts).await?;
    Ok(Json(Page {
        items,
        total,
        limit,
        offset,
    }))
}

/// POST /api/v1/scrapbooks/{slug}/posts
///
/// The scrapbook author and users the scrapbook was shared with may add
/// posts; public visibility alone does not confer write access.
pub async fn create(
    State(state): State<AppState>,
    user: AuthUser,
    Path(slug): Path<String>,
    Json(input): Json<CreatePost>,
) -> AppResult<(StatusCode, Json<Post>)> {
    let scrapbook = scrapbook_by_slug(&state.pool, &slug).await?;
    let has_grant = requester_grant(&state.pool, user.requester(), scrapbook.id).await?;

    if !visibility::can_add_post(user.requester(), scrapbook.author_id, has_grant) {
        return Err(AppError::Core(CoreError::Forbidden(
            "You do not have permission to add posts to this scrapbook.".into(),
        )));
    }

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

    let post = PostRepo::create(&state.pool, scrapbook.id, user.user_id, &input).await?;
    tracing::info!(post_id = post.id, scrapbook_id = scrapbook.id, "post created");
    Ok((StatusCode::CREATED, Json(post)))
}

/// GET /api/v1/scrapbooks/{slug}/posts/{post_slug}
///
/// Detail view, gated by the post policy: a grant on the parent scrapbook
/// is sufficient, matching what the share workflow hands out.
pub async fn get_by_slug(
    State(state): State<AppState>,
    identity: MaybeUser,
    Path((slug, post_slug)): Path<(String, String)>,
) -> AppResult<Json<Post>> {
    let scrapbook = scrapbook_by_slug(&state.pool, &slug).await?;
    let post = post_in_scrapbook(&state, scrapbook.id, &post_slug).await?;

    let requester = identity.requester();
    let status = stored_status(post.status)?;
    let has_grant = requester_grant(&state.pool, requester, scrapbook.id).await?;

    if !visibility::can_view_post(requester, post.author_id, status, has_grant) {
        return Err(view_denied(requester, "post"));
    }
    Ok(Json(post))
}

/// PUT /api/v1/scrapbooks/{slug}/posts/{post_slug}
///
/// Post author only.
pub async fn update(
    State(state): State<AppState>,
    user: AuthUser,
    Path((slug, post_slug)): Path<(String, String)>,
    Json(input): Json<UpdatePost>,
) -> AppResult<Json<Post>> {
    let scrapbook = scrapbook_by_slug(&state.pool, &slug).await?;
    let post = post_in_scrapbook(&state, scrapbook.id, &post_slug).await?;

    if !visibility::can_modify(user.requester(), post.author_id) {
        return Err(AppError::Core(CoreError::Forbidden(
            "Only the author may edit this post.".into(),
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

    let updated = PostRepo::update(&state.pool, post.id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Post",
            id: post.id,
        }))?;
    Ok(Json(updated))
}

/// DELETE /api/v1/scrapbooks/{slug}/posts/{post_slug}
///
/// Post author only.
pub async fn delete(
    State(state): State<AppState>,
    user: AuthUser,
    Path((slug, post_slug)): Path<(String, String)>,
) -> AppResult<StatusCode> {
    let scrapbook = scrapbook_by_slug(&state.pool, &slug).await?;
    let post = post_in_scrapbook(&state, scrapbook.id, &post_slug).await?;

    if !visibility::can_modify(user.requester(), post.author_id) {
        return Err(AppError::Core(CoreError::Forbidden(
            "Only the author may delete this post.".into(),
        )));
    }

    PostRepo::delete(&state.pool, post.id).await?;
    tracing::info!(post_id = post.id, "post deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// Resolve a post by slug within a scrapbook. A post slug that exists but
/// belongs to another scrapbook is a 404, not a leak.
async fn post_in_scrapbook(
    state: &AppState,
    scrapbook_id: i64,
    post_slug: &str,
) -> AppResult<Post> {
    PostRepo::find_by_slug_in_scrapbook(&state.pool, scrapbook_id, post_slug)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::NotFoundSlug {
                entity: "Post",
                slug: post_slug.to_string(),
            })
        })
}
