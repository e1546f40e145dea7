//! Shared test harness: router construction mirroring `main.rs`, seeded
//! users with ready-made tokens, and request helpers driving the app via
//! `tower::ServiceExt` without a TCP listener.

#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;

use keepsake_api::auth::jwt::{generate_access_token, JwtConfig};
use keepsake_api::auth::password::hash_password;
use keepsake_api::config::ServerConfig;
use keepsake_api::router::build_app_router;
use keepsake_api::state::AppState;
use keepsake_db::models::user::CreateUser;
use keepsake_db::repositories::UserRepo;

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        page_size: 6,
        max_upload_bytes: keepsake_core::upload::MAX_IMAGE_BYTES,
        upload_dir: std::env::temp_dir().join("keepsake-test-uploads"),
        jwt: JwtConfig {
            secret: "test-secret-that-is-long-enough-for-hmac".to_string(),
            access_token_expiry_mins: 15,
            refresh_token_expiry_days: 7,
        },
    }
}

/// Build the full application router with all middleware layers, using the
/// given database pool.
///
/// This mirrors the router construction in `main.rs` so integration tests
/// exercise the same middleware stack (CORS, request ID, timeout, tracing,
/// panic recovery) that production uses.
pub fn build_test_app(pool: PgPool) -> Router {
    let config = test_config();
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
    };
    build_app_router(state, &config)
}

/// A seeded user plus a valid access token for it.
pub struct TestUser {
    pub id: i64,
    pub username: String,
    pub token: String,
}

/// Password every seeded user gets.
pub const TEST_PASSWORD: &str = "correct-horse-battery-staple";

/// Insert a user directly through the repository and mint an access token,
/// skipping the login round-trip.
pub async fn seed_user(pool: &PgPool, username: &str) -> TestUser {
    let password_hash = hash_password(TEST_PASSWORD).expect("hashing should succeed");
    let user = UserRepo::create(
        pool,
        &CreateUser {
            username: username.to_string(),
            email: format!("{username}@example.com"),
            password_hash,
        },
    )
    .await
    .expect("user creation should succeed");

    let token = generate_access_token(user.id, username, &test_config().jwt)
        .expect("token generation should succeed");

    TestUser {
        id: user.id,
        username: user.username,
        token,
    }
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

fn bearer(token: &str) -> String {
    format!("Bearer {token}")
}

pub async fn get(app: Router, uri: &str) -> Response {
    app.oneshot(
        Request::builder()
            .method("GET")
            .uri(uri)
            .body(Body::empty())
            .unwrap(),
    )
    .await
    .unwrap()
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response {
    app.oneshot(
        Request::builder()
            .method("GET")
            .uri(uri)
            .header(header::AUTHORIZATION, bearer(token))
            .body(Body::empty())
            .unwrap(),
    )
    .await
    .unwrap()
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response {
    app.oneshot(
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
    )
    .await
    .unwrap()
}

pub async fn post_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response {
    app.oneshot(
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .header(header::AUTHORIZATION, bearer(token))
            .body(Body::from(body.to_string()))
            .unwrap(),
    )
    .await
    .unwrap()
}

pub async fn put_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response {
    app.oneshot(
        Request::builder()
            .method("PUT")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .header(header::AUTHORIZATION, bearer(token))
            .body(Body::from(body.to_string()))
            .unwrap(),
    )
    .await
    .unwrap()
}

pub async fn delete_auth(app: Router, uri: &str, token: &str) -> Response {
    app.oneshot(
        Request::builder()
            .method("DELETE")
            .uri(uri)
            .header(header::AUTHORIZATION, bearer(token))
            .body(Body::empty())
            .unwrap(),
    )
    .await
    .unwrap()
}

pub async fn post_bytes_auth(app: Router, uri: &str, bytes: Vec<u8>, token: &str) -> Response {
    app.oneshot(
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/octet-stream")
            .header(header::AUTHORIZATION, bearer(token))
            .body(Body::from(bytes))
            .unwrap(),
    )
    .await
    .unwrap()
}

/// Collect a response body into parsed JSON.
pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body collection should succeed")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("body should be valid JSON")
}

// ---------------------------------------------------------------------------
// Fixture helpers
// ---------------------------------------------------------------------------

/// Create a scrapbook through the API, returning its JSON representation.
pub async fn create_scrapbook(
    pool: &PgPool,
    token: &str,
    title: &str,
    status: i16,
) -> serde_json::Value {
    let response = post_json_auth(
        build_test_app(pool.clone()),
        "/api/v1/scrapbooks",
        serde_json::json!({"title": title, "image": "cover.png", "status": status}),
        token,
    )
    .await;
    assert_eq!(response.status(), axum::http::StatusCode::CREATED);
    body_json(response).await
}

/// Create a post through the API, returning its JSON representation.
pub async fn create_post(
    pool: &PgPool,
    token: &str,
    scrapbook_slug: &str,
    title: &str,
    status: i16,
) -> serde_json::Value {
    let response = post_json_auth(
        build_test_app(pool.clone()),
        &format!("/api/v1/scrapbooks/{scrapbook_slug}/posts"),
        serde_json::json!({"title": title, "image": "photo.png", "status": status}),
        token,
    )
    .await;
    assert_eq!(response.status(), axum::http::StatusCode::CREATED);
    body_json(response).await
}
