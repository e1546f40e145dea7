//! Handler for image uploads.
//!
//! Uploads are validated synchronously (size ceiling, decodable raster
//! format) before anything touches disk. The returned filename is the
//! reference scrapbook/post creation requires in its `image` field, and
//! the file is served read-only under `/uploads`.

use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use keepsake_core::upload::validate_image;
use serde::Serialize;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// Response for a stored upload.
#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub filename: String,
    pub width: u32,
    pub height: u32,
}

/// POST /api/v1/uploads
pub async fn upload(
    State(state): State<AppState>,
    user: AuthUser,
    body: Bytes,
) -> AppResult<(StatusCode, Json<UploadResponse>)> {
    let info = validate_image(&body, state.config.max_upload_bytes)
        .map_err(|e| AppError::field("image", e.to_string()))?;

    let filename = format!("{}.{}", Uuid::new_v4().simple(), info.extension);

    tokio::fs::create_dir_all(&state.config.upload_dir)
        .await
        .map_err(|e| AppError::InternalError(format!("Failed to create upload dir: {e}")))?;
    tokio::fs::write(state.config.upload_dir.join(&filename), &body)
        .await
        .map_err(|e| AppError::InternalError(format!("Failed to store upload: {e}")))?;

    tracing::info!(
        user_id = user.user_id,
        %filename,
        width = info.width,
        height = info.height,
        "image uploaded"
    );

    Ok((
        StatusCode::CREATED,
        Json(UploadResponse {
            filename,
            width: info.width,
            height: info.height,
        }),
    ))
}
