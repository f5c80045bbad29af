//! Resource entity models and DTOs.

use fieldlight_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `resources` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Resource {
    pub id: DbId,
    /// Stable human-readable key, e.g. a prompt name like `pre_description`.
    pub slug: String,
    pub label: String,
    /// `prompt` or `sop_document`.
    pub kind: String,
    /// The version currently served to readers, or `None` before the first save.
    pub current_version_id: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a resource.
#[derive(Debug, Deserialize)]
pub struct CreateResource {
    pub slug: String,
    pub label: String,
    pub kind: String,
    /// Optional initial content, stored as version 1 when present.
    pub content: Option<String>,
}
