//! HTTP-level integration tests for image uploads.

mod common;

use std::io::Cursor;

use axum::http::StatusCode;
use common::{body_json, build_test_app, post_bytes_auth, seed_user};
use image::ImageFormat;
use keepsake_core::upload::MAX_IMAGE_BYTES;
use sqlx::PgPool;

/// Encode a 1x1 PNG in memory.
fn tiny_png() -> Vec<u8> {
    let img = image::RgbaImage::new(1, 1);
    let mut bytes = Cursor::new(Vec::new());
    img.write_to(&mut bytes, ImageFormat::Png)
        .expect("encoding a 1x1 PNG should succeed");
    bytes.into_inner()
}

/// Pad a valid PNG with trailing zeros to an exact total size.
fn padded_png(total: usize) -> Vec<u8> {
    let mut bytes = tiny_png();
    assert!(bytes.len() <= total);
    bytes.resize(total, 0);
    bytes
}

#[sqlx::test(migrations = "../db/migrations")]
async fn valid_image_is_stored_and_described(pool: PgPool) {
    let alice = seed_user(&pool, "alice").await;

    let response = post_bytes_auth(
        build_test_app(pool),
        "/api/v1/uploads",
        tiny_png(),
        &alice.token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let json = body_json(response).await;
    let filename = json["filename"].as_str().unwrap();
    assert!(filename.ends_with(".png"));
    assert_eq!(json["width"].as_u64(), Some(1));
    assert_eq!(json["height"].as_u64(), Some(1));
}

#[sqlx::test(migrations = "../db/migrations")]
async fn upload_requires_authentication(pool: PgPool) {
    let response = common::post_json(
        build_test_app(pool),
        "/api/v1/uploads",
        serde_json::json!({}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn exactly_two_mebibytes_passes(pool: PgPool) {
    let alice = seed_user(&pool, "alice").await;

    let response = post_bytes_auth(
        build_test_app(pool),
        "/api/v1/uploads",
        padded_png(MAX_IMAGE_BYTES),
        &alice.token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn one_byte_over_the_ceiling_fails(pool: PgPool) {
    let alice = seed_user(&pool, "alice").await;

    let response = post_bytes_auth(
        build_test_app(pool),
        "/api/v1/uploads",
        padded_png(MAX_IMAGE_BYTES + 1),
        &alice.token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = body_json(response).await;
    assert_eq!(json["fields"][0]["field"], "image");
    assert_eq!(
        json["fields"][0]["message"],
        "Image file too large. Size should not exceed 2.0 MB."
    );
}

#[sqlx::test(migrations = "../db/migrations")]
async fn non_image_bytes_fail(pool: PgPool) {
    let alice = seed_user(&pool, "alice").await;

    let response = post_bytes_auth(
        build_test_app(pool),
        "/api/v1/uploads",
        b"definitely not an image".to_vec(),
        &alice.token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = body_json(response).await;
    assert_eq!(
        json["fields"][0]["message"],
        "Upload a valid image or an uncorrupted image."
    );
}
