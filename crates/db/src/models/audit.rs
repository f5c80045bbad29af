//! Audit entry models and query DTOs.
//!
//! Audit entries are append-only and immutable once created (no updated_at).

use fieldlight_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `audit_entries` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct AuditEntry {
    pub id: DbId,
    pub actor_id: DbId,
    pub action_type: String,
    pub target_type: String,
    pub target_id: DbId,
    pub details: Option<serde_json::Value>,
    /// SHA-256 chained to the previous entry for tamper evidence.
    pub integrity_hash: Option<String>,
    pub created_at: Timestamp,
}

/// DTO for inserting a new audit entry.
#[derive(Debug, Clone)]
pub struct CreateAuditEntry {
    pub actor_id: DbId,
    pub action_type: String,
    pub target_type: String,
    pub target_id: DbId,
    pub details: Option<serde_json::Value>,
    pub integrity_hash: Option<String>,
}

/// Filter parameters for querying audit entries.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuditFilter {
    pub actor_id: Option<DbId>,
    pub action_type: Option<String>,
    pub target_type: Option<String>,
    pub target_id: Option<DbId>,
    pub from: Option<Timestamp>,
    pub to: Option<Timestamp>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// One page of audit entries plus the total match count.
#[derive(Debug, Serialize)]
pub struct AuditPage {
    pub items: Vec<AuditEntry>,
    pub total: i64,
}
