//! Handlers for audited account actions.
//!
//! Account state lives in the upstream identity service; these endpoints
//! record the administrative act so it lands in the same audit trail and
//! activity feed as everything else.

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;

use fieldlight_core::types::DbId;

use crate::error::AppResult;
use crate::facade;
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for account suspension.
#[derive(Debug, Deserialize)]
pub struct SuspendAccountRequest {
    pub reason: String,
}

/// Request body for gifting credits.
#[derive(Debug, Deserialize)]
pub struct GiftCreditsRequest {
    pub amount: i64,
}

/// POST /accounts/{id}/suspend
///
/// Record an account suspension. Admin only.
pub async fn suspend_account(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<SuspendAccountRequest>,
) -> AppResult<impl IntoResponse> {
    let entry = facade::suspend_account(&state.pool, &admin, id, &input.reason).await?;

    tracing::info!(actor_id = admin.actor_id, account_id = id, "account suspended");
    Ok(Json(DataResponse { data: entry }))
}

/// POST /accounts/{id}/gift-credits
///
/// Record a credit gift. Admin only.
pub async fn gift_credits(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<GiftCreditsRequest>,
) -> AppResult<impl IntoResponse> {
    let entry = facade::gift_credits(&state.pool, &admin, id, input.amount).await?;

    tracing::info!(
        actor_id = admin.actor_id,
        account_id = id,
        amount = input.amount,
        "credits gifted"
    );
    Ok(Json(DataResponse { data: entry }))
}
