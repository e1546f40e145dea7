//! Route definitions for the `/scrapbooks` resource.
//!
//! Also nests post and share routes under `/scrapbooks/{slug}/...`.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{post as post_handlers, scrapbook, share};
use crate::state::AppState;

/// Routes mounted at `/scrapbooks`.
///
/// ```text
/// GET    /                                  -> list_public (anonymous ok)
/// POST   /                                  -> create
/// GET    /mine                              -> list_mine
/// GET    /shared-with-me                    -> list_shared_with_me
/// GET    /{slug}                            -> get_by_slug
/// PUT    /{slug}                            -> update
/// DELETE /{slug}                            -> delete
///
/// GET    /{slug}/posts                      -> list_in_scrapbook
/// POST   /{slug}/posts                      -> create
/// GET    /{slug}/posts/{post_slug}          -> get_by_slug
/// PUT    /{slug}/posts/{post_slug}          -> update
/// DELETE /{slug}/posts/{post_slug}          -> delete
///
/// POST   /{slug}/share                      -> share
/// GET    /{slug}/share/candidates           -> candidates
/// ```
pub fn router() -> Router<AppState> {
    let post_routes = Router::new()
        .route(
            "/",
            get(post_handlers::list_in_scrapbook).post(post_handlers::create),
        )
        .route(
            "/{post_slug}",
            get(post_handlers::get_by_slug)
                .put(post_handlers::update)
                .delete(post_handlers::delete),
        );

    let share_routes = Router::new()
        .route("/", post(share::share))
        .route("/candidates", get(share::candidates));

    Router::new()
        .route("/", get(scrapbook::list_public).post(scrapbook::create))
        .route("/mine", get(scrapbook::list_mine))
        .route("/shared-with-me", get(scrapbook::list_shared_with_me))
        .route(
            "/{slug}",
            get(scrapbook::get_by_slug)
                .put(scrapbook::update)
                .delete(scrapbook::delete),
        )
        .nest("/{slug}/posts", post_routes)
        .nest("/{slug}/share", share_routes)
}
