//! HTTP-level integration tests for the feedback endpoints.
//!
//! Tests cover the public snapshot, authenticated creation with
//! validation, author-only deletion, and the change events mutations
//! publish.

mod common;

use axum::http::StatusCode;
use common::{body_json, delete_anon, delete_auth, get, post_json, post_json_auth, signup};
use sqlx::PgPool;

use feedboard_events::FeedEvent;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Create a feedback item via the API, returning its JSON representation.
async fn create_item(
    app: &axum::Router,
    token: &str,
    title: &str,
    description: &str,
) -> serde_json::Value {
    let body = serde_json::json!({ "title": title, "description": description });
    let response = post_json_auth(app, "/api/v1/feedback", body, token).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await
}

// ---------------------------------------------------------------------------
// Snapshot
// ---------------------------------------------------------------------------

/// The snapshot of an empty board is an empty sequence, not an error.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_snapshot_empty(pool: PgPool) {
    let app = common::build_test_app(pool);

    let response = get(&app, "/api/v1/feedback").await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["data"], serde_json::json!([]));
}

/// The snapshot is public: no session required.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_snapshot_is_public(pool: PgPool) {
    let app = common::build_test_app(pool);
    let auth = signup(&app, "author@example.com", "hunter2hunter2").await;
    let token = auth["access_token"].as_str().expect("access token");

    create_item(&app, token, "Dark mode", "Please add a dark theme.").await;

    let response = get(&app, "/api/v1/feedback").await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["data"][0]["title"], "Dark mode");
    assert_eq!(json["data"][0]["user_email"], "author@example.com");
}

/// The snapshot is ordered newest first.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_snapshot_newest_first(pool: PgPool) {
    let app = common::build_test_app(pool);
    let auth = signup(&app, "order@example.com", "hunter2hunter2").await;
    let token = auth["access_token"].as_str().expect("access token");

    create_item(&app, token, "First", "The older item.").await;
    create_item(&app, token, "Second", "The newer item.").await;

    let json = body_json(get(&app, "/api/v1/feedback").await).await;

    assert_eq!(json["data"][0]["title"], "Second");
    assert_eq!(json["data"][1]["title"], "First");
}

// ---------------------------------------------------------------------------
// Create
// ---------------------------------------------------------------------------

/// Creating feedback requires a session.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_create_requires_auth(pool: PgPool) {
    let app = common::build_test_app(pool);

    let body = serde_json::json!({ "title": "Nope", "description": "No session." });
    let response = post_json(&app, "/api/v1/feedback", body).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

/// A created item carries the author identity from the session.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_create_success(pool: PgPool) {
    let app = common::build_test_app(pool);
    let auth = signup(&app, "creator@example.com", "hunter2hunter2").await;
    let token = auth["access_token"].as_str().expect("access token");

    let json = create_item(&app, token, "Export to CSV", "Line one.\nLine two.").await;

    assert!(json["data"]["id"].is_number());
    assert_eq!(json["data"]["title"], "Export to CSV");
    assert_eq!(json["data"]["description"], "Line one.\nLine two.");
    assert_eq!(json["data"]["user_id"], auth["user"]["id"]);
    assert_eq!(json["data"]["user_email"], "creator@example.com");
    assert!(json["data"]["created_at"].is_string());
}

/// A blank title is rejected with 400.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_create_blank_title_rejected(pool: PgPool) {
    let app = common::build_test_app(pool);
    let auth = signup(&app, "blank@example.com", "hunter2hunter2").await;
    let token = auth["access_token"].as_str().expect("access token");

    let body = serde_json::json!({ "title": "   ", "description": "Has a description." });
    let response = post_json_auth(&app, "/api/v1/feedback", body, token).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

/// An overlong description is rejected with 400.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_create_overlong_description_rejected(pool: PgPool) {
    let app = common::build_test_app(pool);
    let auth = signup(&app, "long@example.com", "hunter2hunter2").await;
    let token = auth["access_token"].as_str().expect("access token");

    let body = serde_json::json!({
        "title": "Too long",
        "description": "x".repeat(10_001),
    });
    let response = post_json_auth(&app, "/api/v1/feedback", body, token).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// ---------------------------------------------------------------------------
// Delete
// ---------------------------------------------------------------------------

/// The author can delete their own item.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_delete_own_item(pool: PgPool) {
    let app = common::build_test_app(pool);
    let auth = signup(&app, "deleter@example.com", "hunter2hunter2").await;
    let token = auth["access_token"].as_str().expect("access token");

    let json = create_item(&app, token, "Delete me", "Short-lived.").await;
    let id = json["data"]["id"].as_i64().expect("item id");

    let response = delete_auth(&app, &format!("/api/v1/feedback/{id}"), token).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let snapshot = body_json(get(&app, "/api/v1/feedback").await).await;
    assert_eq!(snapshot["data"], serde_json::json!([]));
}

/// Deleting someone else's item is forbidden and changes nothing.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_delete_foreign_item_forbidden(pool: PgPool) {
    let app = common::build_test_app(pool);
    let owner = signup(&app, "owner@example.com", "hunter2hunter2").await;
    let owner_token = owner["access_token"].as_str().expect("access token");
    let other = signup(&app, "other@example.com", "hunter2hunter2").await;
    let other_token = other["access_token"].as_str().expect("access token");

    let json = create_item(&app, owner_token, "Mine", "Hands off.").await;
    let id = json["data"]["id"].as_i64().expect("item id");

    let response = delete_auth(&app, &format!("/api/v1/feedback/{id}"), other_token).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let snapshot = body_json(get(&app, "/api/v1/feedback").await).await;
    assert_eq!(snapshot["data"][0]["title"], "Mine");
}

/// Deleting an unknown id returns 404.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_delete_unknown_id_not_found(pool: PgPool) {
    let app = common::build_test_app(pool);
    let auth = signup(&app, "missing@example.com", "hunter2hunter2").await;
    let token = auth["access_token"].as_str().expect("access token");

    let response = delete_auth(&app, "/api/v1/feedback/424242", token).await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

/// Deleting without a session is unauthorized.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_delete_requires_auth(pool: PgPool) {
    let app = common::build_test_app(pool);

    let response = delete_anon(&app, "/api/v1/feedback/1").await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

// ---------------------------------------------------------------------------
// Change events
// ---------------------------------------------------------------------------

/// Create and delete each publish the matching change event on the bus
/// (which the broadcaster fans out to every connected client).
#[sqlx::test(migrations = "../db/migrations")]
async fn test_mutations_publish_change_events(pool: PgPool) {
    let (app, bus) = common::build_test_app_with_bus(pool);
    let mut events = bus.subscribe();

    let auth = signup(&app, "events@example.com", "hunter2hunter2").await;
    let token = auth["access_token"].as_str().expect("access token");

    let json = create_item(&app, token, "Watched", "Every move I make.").await;
    let id = json["data"]["id"].as_i64().expect("item id");

    let created = events.recv().await.expect("created event should publish");
    match created {
        FeedEvent::Created { item } => {
            assert_eq!(item.id, id);
            assert_eq!(item.title, "Watched");
        }
        other => panic!("expected feedback.created, got: {other:?}"),
    }

    let response = delete_auth(&app, &format!("/api/v1/feedback/{id}"), token).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let deleted = events.recv().await.expect("deleted event should publish");
    assert_eq!(deleted, FeedEvent::Deleted { id });
}
