//! Route definitions for SOP assignments and resolution.

use axum::routing::{delete, get};
use axum::Router;

use crate::handlers::assignments;
use crate::state::AppState;

/// Assignment routes mounted at `/assignments`.
///
/// `/resolve` is registered before `/{id}` so the literal segment wins.
///
/// ```text
/// GET    /          -> list_assignments
/// POST   /          -> create_assignment
/// GET    /resolve   -> resolve
/// DELETE /{id}      -> remove_assignment
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(assignments::list_assignments).post(assignments::create_assignment),
        )
        .route("/resolve", get(assignments::resolve))
        .route("/{id}", delete(assignments::remove_assignment))
}
