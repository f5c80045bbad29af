//! Handlers for editable resources: CRUD, edit locks, version history.
//!
//! All mutations flow through the facade so each one commits atomically with
//! its audit entry. Read endpoints hit the repositories directly.

use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};

use fieldlight_core::error::CoreError;
use fieldlight_core::types::DbId;
use fieldlight_db::models::lock::LockState;
use fieldlight_db::models::resource::{CreateResource, Resource};
use fieldlight_db::models::version::{
    ResourceVersion, RestoreVersionRequest, SaveContentRequest,
};
use fieldlight_db::repositories::{LockRepo, ResourceRepo, VersionRepo};

use crate::error::{AppError, AppResult};
use crate::facade;
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireAdmin;
use crate::query::PaginationParams;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Query parameters for listing resources.
#[derive(Debug, Deserialize)]
pub struct ListResourcesParams {
    pub kind: Option<String>,
}

/// A resource together with its live content and lock state.
#[derive(Debug, Serialize)]
pub struct ResourceDetail {
    #[serde(flatten)]
    pub resource: Resource,
    /// The version currently served to readers, `None` before the first save.
    pub current_version: Option<ResourceVersion>,
    pub lock: LockState,
}

/// One page of version history plus the total version count.
#[derive(Debug, Serialize)]
pub struct HistoryPage {
    pub items: Vec<ResourceVersion>,
    pub total: i64,
}

// ---------------------------------------------------------------------------
// Resource CRUD
// ---------------------------------------------------------------------------

/// GET /resources?kind=prompt|sop_document
///
/// List resources, ordered by slug.
pub async fn list_resources(
    _auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<ListResourcesParams>,
) -> AppResult<impl IntoResponse> {
    if let Some(ref kind) = params.kind {
        if !fieldlight_core::locking::is_valid_resource_kind(kind) {
            return Err(AppError::BadRequest(format!(
                "Unknown resource kind '{kind}'"
            )));
        }
    }

    let resources = ResourceRepo::list(&state.pool, params.kind.as_deref()).await?;
    Ok(Json(DataResponse { data: resources }))
}

/// POST /resources
///
/// Create a resource, optionally with initial content as version 1. Admin only.
pub async fn create_resource(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<CreateResource>,
) -> AppResult<impl IntoResponse> {
    let resource = facade::create_resource(&state.pool, &admin, &input).await?;
    Ok(Json(DataResponse { data: resource }))
}

/// GET /resources/{id}
///
/// Fetch one resource with its current version and lock state, so an editor
/// screen renders from a single request.
pub async fn get_resource(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let resource = ResourceRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Resource",
            id,
        }))?;

    let current_version = VersionRepo::current(&state.pool, id).await?;
    let lock = LockRepo::peek(&state.pool, id)
        .await?
        .map(LockState::from)
        .unwrap_or_else(LockState::unlocked);

    Ok(Json(DataResponse {
        data: ResourceDetail {
            resource,
            current_version,
            lock,
        },
    }))
}

// ---------------------------------------------------------------------------
// Edit locks
// ---------------------------------------------------------------------------

/// POST /resources/{id}/lock
///
/// Begin an edit session by acquiring the edit lock. Admin only. Returns 409
/// naming the holder if another admin has an active lease.
pub async fn acquire_lock(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let lock = facade::begin_edit(&state.pool, &admin, id, state.config.lock_lease_secs).await?;

    tracing::info!(
        actor_id = admin.actor_id,
        resource_id = id,
        lease_expires_at = %lock.lease_expires_at,
        "edit lock acquired"
    );
    Ok(Json(DataResponse {
        data: LockState::from(lock),
    }))
}

/// DELETE /resources/{id}/lock
///
/// End an edit session without saving. Admin only.
pub async fn release_lock(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    facade::end_edit(&state.pool, &admin, id).await?;

    tracing::info!(actor_id = admin.actor_id, resource_id = id, "edit lock released");
    Ok(Json(DataResponse {
        data: serde_json::json!({ "released": true }),
    }))
}

/// POST /resources/{id}/lock/renew
///
/// Extend the lease on a held lock. Admin only.
pub async fn renew_lock(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let lock = facade::renew_lease(&state.pool, &admin, id, state.config.lock_lease_secs).await?;
    Ok(Json(DataResponse {
        data: LockState::from(lock),
    }))
}

// ---------------------------------------------------------------------------
// Content: save, history, restore
// ---------------------------------------------------------------------------

/// PUT /resources/{id}
///
/// Save new content as the next version. Requires holding the edit lock;
/// a successful save also releases it. Admin only.
pub async fn save_content(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<SaveContentRequest>,
) -> AppResult<impl IntoResponse> {
    let version = facade::save(&state.pool, &admin, id, &input.content).await?;
    Ok(Json(DataResponse { data: version }))
}

/// GET /resources/{id}/history?limit=&offset=
///
/// Paginated version history, newest first.
pub async fn get_history(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Query(params): Query<PaginationParams>,
) -> AppResult<impl IntoResponse> {
    ResourceRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Resource",
            id,
        }))?;

    let (limit, offset) = params.clamp();
    let items = VersionRepo::history(&state.pool, id, limit, offset).await?;
    let total = VersionRepo::count_for_resource(&state.pool, id).await?;

    Ok(Json(DataResponse {
        data: HistoryPage { items, total },
    }))
}

/// POST /resources/{id}/restore
///
/// Restore a prior version as a new version. Requires holding the edit lock.
/// Admin only.
pub async fn restore_version(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<RestoreVersionRequest>,
) -> AppResult<impl IntoResponse> {
    let version = facade::restore_version(&state.pool, &admin, id, input.version_id).await?;
    Ok(Json(DataResponse { data: version }))
}
