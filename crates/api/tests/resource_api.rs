//! HTTP-level integration tests for resources, locks, and versioning.
//!
//! Drives the real router via tower::ServiceExt with no TCP listener.

mod common;

use axum::http::StatusCode;
use common::{admin_token, body_json, build_test_app, delete, get, post, post_json, put_json};
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Resource CRUD
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn create_resource_with_initial_content(pool: PgPool) {
    let token = admin_token(1, "Alice");
    let app = build_test_app(pool.clone());

    let response = post_json(
        app,
        "/api/v1/resources",
        &token,
        serde_json::json!({
            "slug": "pre_description",
            "label": "Pre-inspection description prompt",
            "kind": "prompt",
            "content": "Describe the scene.",
        }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["slug"], "pre_description");
    assert!(json["data"]["current_version_id"].is_number());

    // Detail view serves the seeded content as version 1.
    let id = json["data"]["id"].as_i64().unwrap();
    let app = build_test_app(pool);
    let detail = body_json(get(app, &format!("/api/v1/resources/{id}"), &token).await).await;
    assert_eq!(detail["data"]["current_version"]["version"], 1);
    assert_eq!(
        detail["data"]["current_version"]["content"],
        "Describe the scene."
    );
    assert_eq!(detail["data"]["lock"]["locked"], false);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn duplicate_slug_returns_409(pool: PgPool) {
    let token = admin_token(1, "Alice");
    common::create_resource_fixture(&pool, &token, "hvac_notes", "prompt", None).await;

    let app = build_test_app(pool);
    let response = post_json(
        app,
        "/api/v1/resources",
        &token,
        serde_json::json!({
            "slug": "hvac_notes",
            "label": "Duplicate",
            "kind": "prompt",
        }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CONFLICT);
    let json = body_json(response).await;
    assert_eq!(json["code"], "CONFLICT");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn invalid_kind_returns_400(pool: PgPool) {
    let token = admin_token(1, "Alice");
    let app = build_test_app(pool);

    let response = post_json(
        app,
        "/api/v1/resources",
        &token,
        serde_json::json!({
            "slug": "weird",
            "label": "Weird",
            "kind": "spreadsheet",
        }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn list_resources_filters_by_kind(pool: PgPool) {
    let token = admin_token(1, "Alice");
    common::create_resource_fixture(&pool, &token, "prompt_one", "prompt", None).await;
    common::create_resource_fixture(&pool, &token, "sop_nc", "sop_document", None).await;

    let app = build_test_app(pool);
    let json = body_json(get(app, "/api/v1/resources?kind=sop_document", &token).await).await;

    let items = json["data"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["slug"], "sop_nc");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn get_nonexistent_resource_returns_404(pool: PgPool) {
    let token = admin_token(1, "Alice");
    let app = build_test_app(pool);
    let response = get(app, "/api/v1/resources/999999", &token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Edit locks
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn lock_conflict_names_the_holder(pool: PgPool) {
    let alice = admin_token(1, "Alice");
    let bob = admin_token(2, "Bob");
    let id = common::create_resource_fixture(&pool, &alice, "pre_description", "prompt", None).await;

    let app = build_test_app(pool.clone());
    let response = post(app, &format!("/api/v1/resources/{id}/lock"), &alice).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["locked"], true);
    assert_eq!(json["data"]["holder_id"], 1);

    let app = build_test_app(pool);
    let response = post(app, &format!("/api/v1/resources/{id}/lock"), &bob).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    let json = body_json(response).await;
    assert_eq!(json["code"], "LOCKED_BY_OTHER");
    assert_eq!(json["error"], "Resource is locked by Alice");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn reacquiring_own_lock_succeeds(pool: PgPool) {
    let alice = admin_token(1, "Alice");
    let id = common::create_resource_fixture(&pool, &alice, "pre_description", "prompt", None).await;

    let app = build_test_app(pool.clone());
    let first = post(app, &format!("/api/v1/resources/{id}/lock"), &alice).await;
    assert_eq!(first.status(), StatusCode::OK);

    let app = build_test_app(pool);
    let second = post(app, &format!("/api/v1/resources/{id}/lock"), &alice).await;
    assert_eq!(second.status(), StatusCode::OK);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn releasing_someone_elses_lock_returns_409(pool: PgPool) {
    let alice = admin_token(1, "Alice");
    let bob = admin_token(2, "Bob");
    let id = common::create_resource_fixture(&pool, &alice, "pre_description", "prompt", None).await;

    let app = build_test_app(pool.clone());
    post(app, &format!("/api/v1/resources/{id}/lock"), &alice).await;

    let app = build_test_app(pool);
    let response = delete(app, &format!("/api/v1/resources/{id}/lock"), &bob).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    let json = body_json(response).await;
    assert_eq!(json["code"], "NOT_LOCK_HOLDER");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn releasing_an_unlocked_resource_is_a_noop(pool: PgPool) {
    let alice = admin_token(1, "Alice");
    let id = common::create_resource_fixture(&pool, &alice, "pre_description", "prompt", None).await;

    let app = build_test_app(pool);
    let response = delete(app, &format!("/api/v1/resources/{id}/lock"), &alice).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn renew_extends_a_held_lock(pool: PgPool) {
    let alice = admin_token(1, "Alice");
    let id = common::create_resource_fixture(&pool, &alice, "pre_description", "prompt", None).await;

    let app = build_test_app(pool.clone());
    let lock = body_json(post(app, &format!("/api/v1/resources/{id}/lock"), &alice).await).await;
    let first_expiry = lock["data"]["lease_expires_at"].as_str().unwrap().to_string();

    let app = build_test_app(pool);
    let response = post(app, &format!("/api/v1/resources/{id}/lock/renew"), &alice).await;
    assert_eq!(response.status(), StatusCode::OK);
    let renewed = body_json(response).await;
    let second_expiry = renewed["data"]["lease_expires_at"].as_str().unwrap();
    assert!(second_expiry >= first_expiry.as_str());
}

#[sqlx::test(migrations = "../db/migrations")]
async fn renew_without_holding_returns_409(pool: PgPool) {
    let alice = admin_token(1, "Alice");
    let id = common::create_resource_fixture(&pool, &alice, "pre_description", "prompt", None).await;

    let app = build_test_app(pool);
    let response = post(app, &format!("/api/v1/resources/{id}/lock/renew"), &alice).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

// ---------------------------------------------------------------------------
// Save, history, restore
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn save_appends_version_and_releases_lock(pool: PgPool) {
    let alice = admin_token(1, "Alice");
    let id = common::create_resource_fixture(
        &pool,
        &alice,
        "pre_description",
        "prompt",
        Some("old text"),
    )
    .await;

    let app = build_test_app(pool.clone());
    post(app, &format!("/api/v1/resources/{id}/lock"), &alice).await;

    let app = build_test_app(pool.clone());
    let response = put_json(
        app,
        &format!("/api/v1/resources/{id}"),
        &alice,
        serde_json::json!({"content": "new text"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let saved = body_json(response).await;
    assert_eq!(saved["data"]["version"], 2);

    // History lists newest first.
    let app = build_test_app(pool.clone());
    let history =
        body_json(get(app, &format!("/api/v1/resources/{id}/history"), &alice).await).await;
    assert_eq!(history["data"]["total"], 2);
    assert_eq!(history["data"]["items"][0]["version"], 2);
    assert_eq!(history["data"]["items"][1]["version"], 1);

    // Saving released the lock.
    let app = build_test_app(pool);
    let detail = body_json(get(app, &format!("/api/v1/resources/{id}"), &alice).await).await;
    assert_eq!(detail["data"]["lock"]["locked"], false);
    assert_eq!(detail["data"]["current_version"]["content"], "new text");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn save_without_lock_returns_409(pool: PgPool) {
    let alice = admin_token(1, "Alice");
    let id = common::create_resource_fixture(&pool, &alice, "pre_description", "prompt", None).await;

    let app = build_test_app(pool);
    let response = put_json(
        app,
        &format!("/api/v1/resources/{id}"),
        &alice,
        serde_json::json!({"content": "sneaky write"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    let json = body_json(response).await;
    assert_eq!(json["code"], "NOT_LOCK_HOLDER");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn restore_creates_a_new_version_with_old_content(pool: PgPool) {
    let alice = admin_token(1, "Alice");
    let id = common::create_resource_fixture(
        &pool,
        &alice,
        "pre_description",
        "prompt",
        Some("version one"),
    )
    .await;

    // Save v2.
    let app = build_test_app(pool.clone());
    post(app, &format!("/api/v1/resources/{id}/lock"), &alice).await;
    let app = build_test_app(pool.clone());
    put_json(
        app,
        &format!("/api/v1/resources/{id}"),
        &alice,
        serde_json::json!({"content": "version two"}),
    )
    .await;

    // Find v1's id from history.
    let app = build_test_app(pool.clone());
    let history =
        body_json(get(app, &format!("/api/v1/resources/{id}/history"), &alice).await).await;
    let v1_id = history["data"]["items"][1]["id"].as_i64().unwrap();

    // Restore v1 (requires the lock again).
    let app = build_test_app(pool.clone());
    post(app, &format!("/api/v1/resources/{id}/lock"), &alice).await;
    let app = build_test_app(pool.clone());
    let response = post_json(
        app,
        &format!("/api/v1/resources/{id}/restore"),
        &alice,
        serde_json::json!({"version_id": v1_id}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let restored = body_json(response).await;
    assert_eq!(restored["data"]["version"], 3);
    assert_eq!(restored["data"]["content"], "version one");

    // History is untouched apart from the new head.
    let app = build_test_app(pool);
    let history =
        body_json(get(app, &format!("/api/v1/resources/{id}/history"), &alice).await).await;
    assert_eq!(history["data"]["total"], 3);
    assert_eq!(history["data"]["items"][2]["content"], "version one");
    assert_eq!(history["data"]["items"][1]["content"], "version two");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn restore_rejects_version_from_another_resource(pool: PgPool) {
    let alice = admin_token(1, "Alice");
    let first = common::create_resource_fixture(&pool, &alice, "one", "prompt", Some("a")).await;
    let second = common::create_resource_fixture(&pool, &alice, "two", "prompt", Some("b")).await;

    let app = build_test_app(pool.clone());
    let detail = body_json(get(app, &format!("/api/v1/resources/{first}"), &alice).await).await;
    let foreign_version = detail["data"]["current_version"]["id"].as_i64().unwrap();

    let app = build_test_app(pool.clone());
    post(app, &format!("/api/v1/resources/{second}/lock"), &alice).await;
    let app = build_test_app(pool);
    let response = post_json(
        app,
        &format!("/api/v1/resources/{second}/restore"),
        &alice,
        serde_json::json!({"version_id": foreign_version}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
