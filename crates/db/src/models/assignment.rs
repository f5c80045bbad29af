//! Scope -> document assignment models and DTOs.

use fieldlight_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `assignments` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Assignment {
    pub id: DbId,
    /// `state` or `organization`.
    pub scope_type: String,
    pub scope_value: String,
    pub document_id: DbId,
    pub assigned_by: DbId,
    /// Retracted assignments stay in history with `is_active = false`.
    pub is_active: bool,
    pub assigned_at: Timestamp,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating an assignment.
#[derive(Debug, Deserialize)]
pub struct CreateAssignment {
    pub scope_type: String,
    pub scope_value: String,
    pub document_id: DbId,
}

/// Filter parameters for listing assignments.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AssignmentFilter {
    pub scope_type: Option<String>,
    pub scope_value: Option<String>,
    pub document_id: Option<DbId>,
    #[serde(default)]
    pub include_inactive: bool,
}
