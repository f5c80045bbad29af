//! Route definitions for editable resources.
//!
//! Reads require authentication; mutations additionally require admin role
//! (enforced in the handlers via `RequireAdmin`).

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::resources;
use crate::state::AppState;

/// Resource routes mounted at `/resources`.
///
/// ```text
/// GET    /                 -> list_resources
/// POST   /                 -> create_resource
/// GET    /{id}             -> get_resource
/// PUT    /{id}             -> save_content
/// POST   /{id}/lock        -> acquire_lock
/// DELETE /{id}/lock        -> release_lock
/// POST   /{id}/lock/renew  -> renew_lock
/// GET    /{id}/history     -> get_history
/// POST   /{id}/restore     -> restore_version
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(resources::list_resources).post(resources::create_resource),
        )
        .route(
            "/{id}",
            get(resources::get_resource).put(resources::save_content),
        )
        .route(
            "/{id}/lock",
            post(resources::acquire_lock).delete(resources::release_lock),
        )
        .route("/{id}/lock/renew", post(resources::renew_lock))
        .route("/{id}/history", get(resources::get_history))
        .route("/{id}/restore", post(resources::restore_version))
}
