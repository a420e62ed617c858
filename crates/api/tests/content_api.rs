//! HTTP-level integration tests for content API endpoints.
//!
//! Uses Axum's tower::ServiceExt to send requests directly to the router.

mod common;

use axum::http::StatusCode;
use common::{body_json, build_test_app, delete, get, post_json, put_json};
use serde_json::json;
use sqlx::PgPool;

use postrelay_db::models::content::CreateContent;
use postrelay_db::repositories::ContentRepo;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn new_content_body(title: &str, platform: &str) -> serde_json::Value {
    json!({
        "title": title,
        "platform": platform,
        "content_type": "post",
        "content_text": "Initial draft",
    })
}

async fn seed_content(pool: &PgPool, title: &str, platform: &str) -> i64 {
    ContentRepo::create(
        pool,
        &CreateContent {
            title: title.to_string(),
            platform: platform.to_string(),
            content_type: "post".to_string(),
            content_text: "Initial draft".to_string(),
        },
    )
    .await
    .unwrap()
    .id
}

// ---------------------------------------------------------------------------
// Test: POST /content/ creates a record with version 1
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
async fn test_create_content(pool: PgPool) {
    let app = build_test_app(pool);

    let response = post_json(app, "/content/", new_content_body("Launch post", "twitter")).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let json = body_json(response).await;
    assert_eq!(json["title"], "Launch post");
    assert_eq!(json["platform"], "twitter");
    assert_eq!(json["version"], 1);
    assert_eq!(json["is_latest"], true);
    assert!(json["id"].as_i64().unwrap() > 0);
}

// ---------------------------------------------------------------------------
// Test: repeated creates increment the version chain
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
async fn test_repeated_creates_increment_versions(pool: PgPool) {
    let app = build_test_app(pool);

    post_json(
        app.clone(),
        "/content/",
        new_content_body("Launch post", "twitter"),
    )
    .await;
    let response = post_json(
        app.clone(),
        "/content/",
        new_content_body("Launch post", "twitter"),
    )
    .await;
    let second = body_json(response).await;
    assert_eq!(second["version"], 2);
    assert_eq!(second["is_latest"], true);

    let response = get(app, "/content/versions/Launch%20post/twitter").await;
    assert_eq!(response.status(), StatusCode::OK);

    let versions = body_json(response).await;
    let arr = versions.as_array().unwrap();
    assert_eq!(arr.len(), 2);
    // Newest first.
    assert_eq!(arr[0]["version"], 2);
    assert_eq!(arr[1]["version"], 1);
    assert_eq!(arr[0]["is_latest"], true);
    assert_eq!(arr[1]["is_latest"], false);
}

// ---------------------------------------------------------------------------
// Test: GET /content/ list filters
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
async fn test_list_latest_only(pool: PgPool) {
    seed_content(&pool, "Launch post", "twitter").await;
    seed_content(&pool, "Launch post", "twitter").await;
    let app = build_test_app(pool);

    let response = get(app.clone(), "/content/?latest_only=true").await;
    let json = body_json(response).await;
    let arr = json.as_array().unwrap();
    assert_eq!(arr.len(), 1);
    assert_eq!(arr[0]["version"], 2);

    let response = get(app, "/content/").await;
    let json = body_json(response).await;
    assert_eq!(json.as_array().unwrap().len(), 2);
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_list_platform_filter_is_case_insensitive(pool: PgPool) {
    seed_content(&pool, "Launch post", "twitter").await;
    seed_content(&pool, "Hiring post", "linkedin").await;
    let app = build_test_app(pool);

    let response = get(app, "/content/?platform=LINKED").await;
    let json = body_json(response).await;
    let arr = json.as_array().unwrap();
    assert_eq!(arr.len(), 1);
    assert_eq!(arr[0]["platform"], "linkedin");
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_list_invalid_date_returns_400(pool: PgPool) {
    let app = build_test_app(pool);

    let response = get(app, "/content/?date=not-a-date").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = body_json(response).await;
    assert!(json["error"].as_str().unwrap().contains("not-a-date"));
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_list_valid_date_filters_by_day(pool: PgPool) {
    seed_content(&pool, "Launch post", "twitter").await;
    let app = build_test_app(pool);

    let today = chrono::Utc::now().date_naive();
    let response = get(app.clone(), &format!("/content/?date={today}")).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json.as_array().unwrap().len(), 1);

    let response = get(app, "/content/?date=2000-01-01").await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert!(json.as_array().unwrap().is_empty());
}

// ---------------------------------------------------------------------------
// Test: GET /content/{id}
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
async fn test_get_by_id(pool: PgPool) {
    let id = seed_content(&pool, "Launch post", "twitter").await;
    let app = build_test_app(pool);

    let response = get(app.clone(), &format!("/content/{id}")).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["id"], id);

    let response = get(app, "/content/999999").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Test: GET /content/versions/{title}/{platform} with no records → 404
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
async fn test_versions_for_unknown_key_returns_404(pool: PgPool) {
    let app = build_test_app(pool);

    let response = get(app, "/content/versions/Nothing/twitter").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let json = body_json(response).await;
    assert!(json["error"].as_str().unwrap().contains("Nothing"));
}

// ---------------------------------------------------------------------------
// Test: PUT /content/{id} creates a new version
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
async fn test_update_creates_new_version(pool: PgPool) {
    let id = seed_content(&pool, "Launch post", "twitter").await;
    let app = build_test_app(pool);

    let response = put_json(
        app.clone(),
        &format!("/content/{id}"),
        json!({ "content_text": "Revised draft" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["version"], 2);
    assert_eq!(json["is_latest"], true);
    assert_eq!(json["content_text"], "Revised draft");
    assert_eq!(json["title"], "Launch post");
    assert_ne!(json["id"], id, "update inserts a new record");

    // The original record still exists, demoted.
    let response = get(app, &format!("/content/{id}")).await;
    let original = body_json(response).await;
    assert_eq!(original["is_latest"], false);
    assert_eq!(original["content_text"], "Initial draft");
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_update_unknown_id_returns_404(pool: PgPool) {
    let app = build_test_app(pool);

    let response = put_json(
        app,
        "/content/999999",
        json!({ "content_text": "Revised draft" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Test: DELETE /content/{id}
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
async fn test_delete_content(pool: PgPool) {
    let id = seed_content(&pool, "Launch post", "twitter").await;
    let keep = seed_content(&pool, "Launch post", "twitter").await;
    let app = build_test_app(pool);

    let response = delete(app.clone(), &format!("/content/{id}")).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert!(json["message"].as_str().unwrap().contains(&id.to_string()));

    // Exactly that record is gone; the other survives.
    let response = get(app.clone(), &format!("/content/{id}")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let response = get(app.clone(), &format!("/content/{keep}")).await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = delete(app, "/content/999999").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
