//! HTTP-level integration tests for the share workflow.

mod common;

use axum::http::StatusCode;
use common::{
    body_json, build_test_app, create_post, create_scrapbook, get_auth, post_json_auth, seed_user,
};
use sqlx::PgPool;

#[sqlx::test(migrations = "../db/migrations")]
async fn share_grants_scrapbook_and_existing_posts(pool: PgPool) {
    let alice = seed_user(&pool, "alice").await;
    let bob = seed_user(&pool, "bob").await;
    create_scrapbook(&pool, &alice.token, "Trip", 1).await;
    create_post(&pool, &alice.token, "trip", "Day One", 1).await;
    create_post(&pool, &alice.token, "trip", "Day Two", 1).await;

    let response = post_json_auth(
        build_test_app(pool),
        "/api/v1/scrapbooks/trip/share",
        serde_json::json!({"user_id": bob.id}),
        &alice.token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let json = body_json(response).await;
    assert_eq!(json["grants_created"].as_u64(), Some(3));
}

#[sqlx::test(migrations = "../db/migrations")]
async fn duplicate_share_is_rejected_with_409(pool: PgPool) {
    let alice = seed_user(&pool, "alice").await;
    let bob = seed_user(&pool, "bob").await;
    create_scrapbook(&pool, &alice.token, "Trip", 1).await;

    let first = post_json_auth(
        build_test_app(pool.clone()),
        "/api/v1/scrapbooks/trip/share",
        serde_json::json!({"user_id": bob.id}),
        &alice.token,
    )
    .await;
    assert_eq!(first.status(), StatusCode::CREATED);

    let second = post_json_auth(
        build_test_app(pool),
        "/api/v1/scrapbooks/trip/share",
        serde_json::json!({"user_id": bob.id}),
        &alice.token,
    )
    .await;
    assert_eq!(second.status(), StatusCode::CONFLICT);

    let json = body_json(second).await;
    assert_eq!(
        json["error"],
        "This scrapbook has already been shared with this user."
    );
}

#[sqlx::test(migrations = "../db/migrations")]
async fn self_share_is_rejected(pool: PgPool) {
    let alice = seed_user(&pool, "alice").await;
    create_scrapbook(&pool, &alice.token, "Trip", 1).await;

    let response = post_json_auth(
        build_test_app(pool),
        "/api/v1/scrapbooks/trip/share",
        serde_json::json!({"user_id": alice.id}),
        &alice.token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = body_json(response).await;
    assert_eq!(json["fields"][0]["field"], "user");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn unknown_grantee_is_rejected(pool: PgPool) {
    let alice = seed_user(&pool, "alice").await;
    create_scrapbook(&pool, &alice.token, "Trip", 1).await;

    let response = post_json_auth(
        build_test_app(pool),
        "/api/v1/scrapbooks/trip/share",
        serde_json::json!({"user_id": 999_999}),
        &alice.token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = body_json(response).await;
    assert_eq!(json["fields"][0]["message"], "Select a valid user.");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn only_the_author_may_share(pool: PgPool) {
    let alice = seed_user(&pool, "alice").await;
    let bob = seed_user(&pool, "bob").await;
    let carol = seed_user(&pool, "carol").await;
    create_scrapbook(&pool, &alice.token, "Trip", 1).await;

    let response = post_json_auth(
        build_test_app(pool),
        "/api/v1/scrapbooks/trip/share",
        serde_json::json!({"user_id": carol.id}),
        &bob.token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn candidates_exclude_the_requesting_author(pool: PgPool) {
    let alice = seed_user(&pool, "alice").await;
    seed_user(&pool, "bob").await;
    seed_user(&pool, "carol").await;
    create_scrapbook(&pool, &alice.token, "Trip", 1).await;

    let response = get_auth(
        build_test_app(pool),
        "/api/v1/scrapbooks/trip/share/candidates",
        &alice.token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    let names: Vec<_> = json
        .as_array()
        .unwrap()
        .iter()
        .map(|u| u["username"].as_str().unwrap())
        .collect();
    assert_eq!(names, ["bob", "carol"]);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn sharing_an_unknown_scrapbook_is_404(pool: PgPool) {
    let alice = seed_user(&pool, "alice").await;
    let bob = seed_user(&pool, "bob").await;

    let response = post_json_auth(
        build_test_app(pool),
        "/api/v1/scrapbooks/missing/share",
        serde_json::json!({"user_id": bob.id}),
        &alice.token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
