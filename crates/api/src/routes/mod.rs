pub mod accounts;
pub mod assignments;
pub mod audit;
pub mod health;
pub mod resources;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /resources                        list, create
/// /resources/{id}                   get (with current version + lock state), save (PUT)
/// /resources/{id}/lock              acquire (POST), release (DELETE)
/// /resources/{id}/lock/renew        extend lease (POST)
/// /resources/{id}/history           paginated version history
/// /resources/{id}/restore           restore prior version (POST)
///
/// /assignments                      list, create
/// /assignments/{id}                 retract (DELETE)
/// /assignments/resolve              resolve active SOP per scope (GET)
///
/// /audit                            filtered query / activity feed (GET)
/// /audit/export.csv                 CSV export (GET)
///
/// /accounts/{id}/suspend            record suspension (POST)
/// /accounts/{id}/gift-credits       record credit gift (POST)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Editable resources: CRUD, locks, versions.
        .nest("/resources", resources::router())
        // SOP assignments and read-side resolution.
        .nest("/assignments", assignments::router())
        // Audit trail (admin only).
        .nest("/audit", audit::router())
        // Audited account actions (admin only).
        .nest("/accounts", accounts::router())
}
