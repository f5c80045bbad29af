//! Edit lock models. At most one lock row exists per resource.

use fieldlight_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `resource_locks` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ResourceLock {
    pub resource_id: DbId,
    pub holder_id: DbId,
    pub holder_display_name: Option<String>,
    pub acquired_at: Timestamp,
    /// A lock whose lease has passed reads as unlocked and may be taken over.
    pub lease_expires_at: Timestamp,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Read-only lock state for rendering UI affordances.
#[derive(Debug, Clone, Serialize)]
pub struct LockState {
    pub locked: bool,
    pub holder_id: Option<DbId>,
    pub holder_display_name: Option<String>,
    pub acquired_at: Option<Timestamp>,
    pub lease_expires_at: Option<Timestamp>,
}

impl LockState {
    /// The unlocked state (no active lease).
    pub fn unlocked() -> Self {
        Self {
            locked: false,
            holder_id: None,
            holder_display_name: None,
            acquired_at: None,
            lease_expires_at: None,
        }
    }
}

impl From<ResourceLock> for LockState {
    fn from(lock: ResourceLock) -> Self {
        Self {
            locked: true,
            holder_id: Some(lock.holder_id),
            holder_display_name: lock.holder_display_name,
            acquired_at: Some(lock.acquired_at),
            lease_expires_at: Some(lock.lease_expires_at),
        }
    }
}
