//! Repository-level tests for the share workflow: grant bundles,
//! duplicate rejection via the unique constraint, and the shared-with-me
//! listing.

use sqlx::PgPool;

use keepsake_db::models::post::CreatePost;
use keepsake_db::models::scrapbook::CreateScrapbook;
use keepsake_db::models::user::CreateUser;
use keepsake_db::repositories::shared_access_repo::GRANT_CONSTRAINT;
use keepsake_db::repositories::{PostRepo, ScrapbookRepo, SharedAccessRepo, UserRepo};

async fn new_user(pool: &PgPool, username: &str) -> i64 {
    UserRepo::create(
        pool,
        &CreateUser {
            username: username.to_string(),
            email: format!("{username}@example.com"),
            password_hash: "x".to_string(),
        },
    )
    .await
    .unwrap()
    .id
}

async fn new_scrapbook(pool: &PgPool, author: i64, title: &str) -> i64 {
    ScrapbookRepo::create(
        pool,
        author,
        &CreateScrapbook {
            title: title.to_string(),
            image: "cover.png".to_string(),
            content: None,
            description: None,
            status: None,
        },
    )
    .await
    .unwrap()
    .id
}

async fn new_post(pool: &PgPool, scrapbook: i64, author: i64, title: &str) -> i64 {
    PostRepo::create(
        pool,
        scrapbook,
        author,
        &CreatePost {
            title: title.to_string(),
            image: "photo.png".to_string(),
            content: None,
            status: None,
        },
    )
    .await
    .unwrap()
    .id
}

#[sqlx::test]
async fn share_creates_scrapbook_and_post_grants(pool: PgPool) {
    let alice = new_user(&pool, "alice").await;
    let bob = new_user(&pool, "bob").await;
    let scrapbook = new_scrapbook(&pool, alice, "Trip").await;
    let p1 = new_post(&pool, scrapbook, alice, "Day One").await;
    let p2 = new_post(&pool, scrapbook, alice, "Day Two").await;

    let grants = SharedAccessRepo::share_scrapbook(&pool, bob, scrapbook, alice)
        .await
        .unwrap();
    assert_eq!(grants, 3, "one scrapbook-level plus two post-level grants");

    let rows = SharedAccessRepo::list_for_user_and_scrapbook(&pool, bob, scrapbook)
        .await
        .unwrap();
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0].post_id, None, "scrapbook-level grant sorts first");
    assert_eq!(rows[0].shared_by, alice);

    let post_ids: Vec<_> = rows[1..].iter().filter_map(|r| r.post_id).collect();
    assert!(post_ids.contains(&p1));
    assert!(post_ids.contains(&p2));

    assert!(SharedAccessRepo::has_scrapbook_grant(&pool, bob, scrapbook)
        .await
        .unwrap());
}

#[sqlx::test]
async fn share_covers_drafts_but_not_later_posts(pool: PgPool) {
    let alice = new_user(&pool, "alice").await;
    let bob = new_user(&pool, "bob").await;
    let scrapbook = new_scrapbook(&pool, alice, "Trip").await;
    // Default post status is Draft; drafts are still granted.
    new_post(&pool, scrapbook, alice, "Draft entry").await;

    let grants = SharedAccessRepo::share_scrapbook(&pool, bob, scrapbook, alice)
        .await
        .unwrap();
    assert_eq!(grants, 2);

    // A post created after the share gets no grant row of its own.
    new_post(&pool, scrapbook, alice, "Late entry").await;
    let rows = SharedAccessRepo::list_for_user_and_scrapbook(&pool, bob, scrapbook)
        .await
        .unwrap();
    assert_eq!(rows.len(), 2);
}

#[sqlx::test]
async fn duplicate_share_hits_unique_constraint(pool: PgPool) {
    let alice = new_user(&pool, "alice").await;
    let bob = new_user(&pool, "bob").await;
    let scrapbook = new_scrapbook(&pool, alice, "Trip").await;
    new_post(&pool, scrapbook, alice, "Day One").await;

    SharedAccessRepo::share_scrapbook(&pool, bob, scrapbook, alice)
        .await
        .unwrap();
    assert!(SharedAccessRepo::scrapbook_grant_exists(&pool, bob, scrapbook)
        .await
        .unwrap());

    let err = SharedAccessRepo::share_scrapbook(&pool, bob, scrapbook, alice)
        .await
        .expect_err("second share must fail");
    assert!(
        keepsake_db::is_unique_violation(&err, GRANT_CONSTRAINT),
        "expected unique violation on {GRANT_CONSTRAINT}, got {err:?}"
    );

    // The failed share rolled back atomically: still exactly one
    // scrapbook-level grant.
    assert_eq!(
        SharedAccessRepo::count_scrapbook_grants(&pool, bob, scrapbook)
            .await
            .unwrap(),
        1
    );
}

#[sqlx::test]
async fn shared_with_me_listing_is_distinct_per_scrapbook(pool: PgPool) {
    let alice = new_user(&pool, "alice").await;
    let bob = new_user(&pool, "bob").await;
    let scrapbook = new_scrapbook(&pool, alice, "Trip").await;
    new_post(&pool, scrapbook, alice, "Day One").await;
    new_post(&pool, scrapbook, alice, "Day Two").await;

    SharedAccessRepo::share_scrapbook(&pool, bob, scrapbook, alice)
        .await
        .unwrap();

    // Three grant rows reference the scrapbook, but it lists once.
    let shared = ScrapbookRepo::list_shared_with(&pool, bob, 10, 0)
        .await
        .unwrap();
    assert_eq!(shared.len(), 1);
    assert_eq!(shared[0].id, scrapbook);
    assert_eq!(
        ScrapbookRepo::count_shared_with(&pool, bob).await.unwrap(),
        1
    );

    // Nothing is shared with Alice herself.
    assert!(ScrapbookRepo::list_shared_with(&pool, alice, 10, 0)
        .await
        .unwrap()
        .is_empty());
}

#[sqlx::test]
async fn share_candidates_exclude_the_grantor(pool: PgPool) {
    let alice = new_user(&pool, "alice").await;
    new_user(&pool, "bob").await;
    new_user(&pool, "carol").await;

    let candidates = UserRepo::list_share_candidates(&pool, alice).await.unwrap();
    let names: Vec<_> = candidates.iter().map(|u| u.username.as_str()).collect();
    assert_eq!(names, ["bob", "carol"]);
}
