//! Route definitions.

pub mod auth;
pub mod health;
pub mod scrapbook;
pub mod uploads;

use axum::Router;

use crate::config::ServerConfig;
use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/login                                      login (public)
/// /auth/refresh                                    refresh (public)
/// /auth/logout                                     logout (requires auth)
///
/// /uploads                                         store image (POST, auth)
///
/// /scrapbooks                                      public list, create
/// /scrapbooks/mine                                 my scrapbooks (auth)
/// /scrapbooks/shared-with-me                       shared with me (auth)
/// /scrapbooks/{slug}                               get, update, delete
/// /scrapbooks/{slug}/posts                         list, create
/// /scrapbooks/{slug}/posts/{post_slug}             get, update, delete
/// /scrapbooks/{slug}/share                         share (POST, author)
/// /scrapbooks/{slug}/share/candidates              grantee candidates (GET)
/// ```
pub fn api_routes(config: &ServerConfig) -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/uploads", uploads::router(config))
        .nest("/scrapbooks", scrapbook::router())
}
