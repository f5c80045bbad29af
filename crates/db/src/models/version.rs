//! Resource version models and DTOs. Versions are immutable snapshots
//! (no updated_at).

use fieldlight_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `resource_versions` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ResourceVersion {
    pub id: DbId,
    pub resource_id: DbId,
    /// Monotonic per resource, starting at 1. Authoritative "newest" ordering.
    pub version: i32,
    pub content: String,
    pub author_id: DbId,
    pub created_at: Timestamp,
}

/// DTO for saving new content to a locked resource.
#[derive(Debug, Deserialize)]
pub struct SaveContentRequest {
    pub content: String,
}

/// DTO for restoring a prior version.
#[derive(Debug, Deserialize)]
pub struct RestoreVersionRequest {
    pub version_id: DbId,
}
