//! Handlers for SOP document assignments and read-side resolution.

use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;

use fieldlight_core::types::DbId;
use fieldlight_db::models::assignment::{AssignmentFilter, CreateAssignment};
use fieldlight_db::repositories::AssignmentRepo;

use crate::error::AppResult;
use crate::facade;
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireAdmin;
use crate::query::PaginationParams;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Query parameters for resolution (`?state=NC&organization=Acme`).
///
/// Both scopes are optional; an omitted scope is simply not resolved.
#[derive(Debug, Deserialize)]
pub struct ResolveParams {
    pub state: Option<String>,
    pub organization: Option<String>,
}

// ---------------------------------------------------------------------------
// Assignment management
// ---------------------------------------------------------------------------

/// GET /assignments?scope_type=&scope_value=&document_id=&include_inactive=
///
/// List assignments, active only unless `include_inactive=true`.
pub async fn list_assignments(
    _auth: AuthUser,
    State(state): State<AppState>,
    Query(filter): Query<AssignmentFilter>,
    Query(page): Query<PaginationParams>,
) -> AppResult<impl IntoResponse> {
    let (limit, offset) = page.clamp();
    let assignments = AssignmentRepo::list(&state.pool, &filter, limit, offset).await?;
    Ok(Json(DataResponse { data: assignments }))
}

/// POST /assignments
///
/// Assign an SOP document to a scope. Admin only. The new assignment is
/// immediately the active one for its scope.
pub async fn create_assignment(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<CreateAssignment>,
) -> AppResult<impl IntoResponse> {
    let assignment = facade::create_assignment(&state.pool, &admin, &input).await?;
    Ok(Json(DataResponse { data: assignment }))
}

/// DELETE /assignments/{id}
///
/// Retract an assignment (soft deactivation). Admin only.
pub async fn remove_assignment(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let assignment = facade::remove_assignment(&state.pool, &admin, id).await?;
    Ok(Json(DataResponse { data: assignment }))
}

// ---------------------------------------------------------------------------
// Resolution
// ---------------------------------------------------------------------------

/// GET /assignments/resolve?state=NC&organization=Acme
///
/// Resolve the active SOP document for each requested scope. Available to
/// any authenticated caller (the statement-generation service included).
/// An empty result is the valid "no SOP configured" default.
pub async fn resolve(
    _auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<ResolveParams>,
) -> AppResult<impl IntoResponse> {
    let resolution = facade::resolve_sop(
        &state.pool,
        params.state.as_deref(),
        params.organization.as_deref(),
    )
    .await?;

    Ok(Json(DataResponse { data: resolution }))
}
