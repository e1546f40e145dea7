//! Route definitions for the `/uploads` resource.

use axum::extract::DefaultBodyLimit;
use axum::routing::post;
use axum::Router;

use crate::config::ServerConfig;
use crate::handlers::uploads;
use crate::state::AppState;

/// Routes mounted at `/uploads`.
///
/// The body limit sits above the configured upload ceiling so the image
/// validator, not the transport layer, reports oversize uploads with a
/// field-level error instead of a bare 413.
pub fn router(config: &ServerConfig) -> Router<AppState> {
    Router::new()
        .route("/", post(uploads::upload))
        .layer(DefaultBodyLimit::max(
            config.max_upload_bytes.saturating_add(64 * 1024),
        ))
}
