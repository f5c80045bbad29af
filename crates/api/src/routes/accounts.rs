//! Route definitions for audited account actions. Admin only.

use axum::routing::post;
use axum::Router;

use crate::handlers::accounts;
use crate::state::AppState;

/// Account routes mounted at `/accounts`.
///
/// ```text
/// POST /{id}/suspend       -> suspend_account
/// POST /{id}/gift-credits  -> gift_credits
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/{id}/suspend", post(accounts::suspend_account))
        .route("/{id}/gift-credits", post(accounts::gift_credits))
}
