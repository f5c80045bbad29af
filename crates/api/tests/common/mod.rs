//! Shared helpers for HTTP-level integration tests.
//!
//! Tests drive the real router via `tower::ServiceExt::oneshot`, so the full
//! middleware stack (auth, request ID, timeout, panic recovery) is exercised
//! without a TCP listener.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;

use fieldlight_api::auth::jwt::{generate_access_token, JwtConfig};
use fieldlight_api::config::ServerConfig;
use fieldlight_api::router::build_app_router;
use fieldlight_api::state::AppState;
use fieldlight_core::locking::DEFAULT_LEASE_SECS;
use fieldlight_core::roles::{ROLE_ADMIN, ROLE_SERVICE};
use fieldlight_core::types::DbId;

/// Build a test `ServerConfig` with safe defaults and a fixed JWT secret.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        lock_lease_secs: DEFAULT_LEASE_SECS,
        jwt: JwtConfig {
            secret: "integration-test-secret".to_string(),
            access_token_expiry_mins: 60,
        },
    }
}

/// Build the full application router with all middleware layers, using the
/// given database pool.
///
/// Uses the same [`build_app_router`] as `main.rs` so integration tests
/// exercise the exact production stack.
pub fn build_test_app(pool: PgPool) -> Router {
    let config = test_config();
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
    };
    build_app_router(state, &config)
}

/// Bearer token for an admin actor with the given id and display name.
pub fn admin_token(actor_id: DbId, name: &str) -> String {
    generate_access_token(actor_id, ROLE_ADMIN, name, &test_config().jwt)
        .expect("failed to generate admin token")
}

/// Bearer token for a non-admin service actor.
pub fn service_token(actor_id: DbId) -> String {
    generate_access_token(actor_id, ROLE_SERVICE, "statement-service", &test_config().jwt)
        .expect("failed to generate service token")
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

/// Send a GET request with a bearer token.
pub async fn get(app: Router, uri: &str, token: &str) -> Response<Body> {
    app.oneshot(
        Request::builder()
            .method("GET")
            .uri(uri)
            .header(header::AUTHORIZATION, format!("Bearer {token}"))
            .body(Body::empty())
            .unwrap(),
    )
    .await
    .unwrap()
}

/// Send a GET request with no Authorization header.
pub async fn get_unauthenticated(app: Router, uri: &str) -> Response<Body> {
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

/// Send a POST request with a JSON body and bearer token.
pub async fn post_json(
    app: Router,
    uri: &str,
    token: &str,
    body: serde_json::Value,
) -> Response<Body> {
    app.oneshot(
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::AUTHORIZATION, format!("Bearer {token}"))
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
    )
    .await
    .unwrap()
}

/// Send a POST request with no body and a bearer token.
pub async fn post(app: Router, uri: &str, token: &str) -> Response<Body> {
    app.oneshot(
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::AUTHORIZATION, format!("Bearer {token}"))
            .body(Body::empty())
            .unwrap(),
    )
    .await
    .unwrap()
}

/// Send a PUT request with a JSON body and bearer token.
pub async fn put_json(
    app: Router,
    uri: &str,
    token: &str,
    body: serde_json::Value,
) -> Response<Body> {
    app.oneshot(
        Request::builder()
            .method("PUT")
            .uri(uri)
            .header(header::AUTHORIZATION, format!("Bearer {token}"))
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
    )
    .await
    .unwrap()
}

/// Send a DELETE request with a bearer token.
pub async fn delete(app: Router, uri: &str, token: &str) -> Response<Body> {
    app.oneshot(
        Request::builder()
            .method("DELETE")
            .uri(uri)
            .header(header::AUTHORIZATION, format!("Bearer {token}"))
            .body(Body::empty())
            .unwrap(),
    )
    .await
    .unwrap()
}

/// Collect a response body as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("failed to read response body")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("response body is not valid JSON")
}

/// Collect a response body as a UTF-8 string (for CSV responses).
pub async fn body_text(response: Response<Body>) -> String {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("failed to read response body")
        .to_bytes();
    String::from_utf8(bytes.to_vec()).expect("response body is not valid UTF-8")
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// Create a resource through the API and return its id.
pub async fn create_resource_fixture(
    pool: &PgPool,
    token: &str,
    slug: &str,
    kind: &str,
    content: Option<&str>,
) -> DbId {
    let app = build_test_app(pool.clone());
    let response = post_json(
        app,
        "/api/v1/resources",
        token,
        serde_json::json!({
            "slug": slug,
            "label": format!("Fixture {slug}"),
            "kind": kind,
            "content": content,
        }),
    )
    .await;
    assert!(
        response.status().is_success(),
        "fixture resource creation failed: {}",
        response.status()
    );
    let json = body_json(response).await;
    json["data"]["id"].as_i64().expect("fixture id missing")
}
