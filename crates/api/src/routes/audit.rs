//! Route definitions for the audit trail. Admin only.

use axum::routing::get;
use axum::Router;

use crate::handlers::audit;
use crate::state::AppState;

/// Audit routes mounted at `/audit`.
///
/// ```text
/// GET /             -> query_audit
/// GET /export.csv   -> export_audit_csv
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(audit::query_audit))
        .route("/export.csv", get(audit::export_audit_csv))
}
