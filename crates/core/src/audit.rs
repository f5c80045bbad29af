//! Audit action taxonomy, typed payloads, and integrity hashing.
//!
//! Every state-changing administrative action is recorded as exactly one
//! audit entry. The set of actions is closed and each action carries a typed
//! payload shape, so the audit log stays queryable and schema-checked
//! instead of accumulating free-form JSON blobs.
//!
//! This module lives in `core` (zero internal deps) so the API/repository
//! layer and any future tooling share the same action strings and hash rule.

use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::hashing;
use crate::types::DbId;

// ---------------------------------------------------------------------------
// Action type constants
// ---------------------------------------------------------------------------

/// Known action types for audit entries.
pub mod action_types {
    pub const RESOURCE_CREATED: &str = "resource_created";
    pub const LOCK_ACQUIRED: &str = "lock_acquired";
    pub const LOCK_RELEASED: &str = "lock_released";
    pub const CONTENT_SAVED: &str = "content_saved";
    pub const VERSION_RESTORED: &str = "version_restored";
    pub const ASSIGNMENT_CREATED: &str = "assignment_created";
    pub const ASSIGNMENT_REMOVED: &str = "assignment_removed";
    pub const ACCOUNT_SUSPENDED: &str = "account_suspended";
    pub const CREDITS_GIFTED: &str = "credits_gifted";
}

/// The set of all valid action types.
pub const VALID_ACTION_TYPES: &[&str] = &[
    action_types::RESOURCE_CREATED,
    action_types::LOCK_ACQUIRED,
    action_types::LOCK_RELEASED,
    action_types::CONTENT_SAVED,
    action_types::VERSION_RESTORED,
    action_types::ASSIGNMENT_CREATED,
    action_types::ASSIGNMENT_REMOVED,
    action_types::ACCOUNT_SUSPENDED,
    action_types::CREDITS_GIFTED,
];

/// Returns `true` if the given action type is valid.
pub fn is_valid_action_type(action_type: &str) -> bool {
    VALID_ACTION_TYPES.contains(&action_type)
}

// ---------------------------------------------------------------------------
// Target type constants
// ---------------------------------------------------------------------------

/// Known target types for audit entries.
pub mod target_types {
    pub const RESOURCE: &str = "resource";
    pub const ASSIGNMENT: &str = "assignment";
    pub const ACCOUNT: &str = "account";
}

// ---------------------------------------------------------------------------
// Typed audit actions
// ---------------------------------------------------------------------------

/// One administrative action with its typed payload.
///
/// Serialized as JSON with an internally-tagged `"action"` discriminator.
/// The variant determines `action_type`, `target_type`, and `target_id`;
/// the remaining fields become the entry's `details` payload.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "action")]
pub enum AuditAction {
    #[serde(rename = "resource_created")]
    ResourceCreated {
        resource_id: DbId,
        slug: String,
        kind: String,
    },

    #[serde(rename = "lock_acquired")]
    LockAcquired { resource_id: DbId, slug: String },

    #[serde(rename = "lock_released")]
    LockReleased { resource_id: DbId, slug: String },

    #[serde(rename = "content_saved")]
    ContentSaved {
        resource_id: DbId,
        slug: String,
        version_id: DbId,
        version: i32,
    },

    #[serde(rename = "version_restored")]
    VersionRestored {
        resource_id: DbId,
        slug: String,
        restored_from_version_id: DbId,
        new_version_id: DbId,
        new_version: i32,
    },

    #[serde(rename = "assignment_created")]
    AssignmentCreated {
        assignment_id: DbId,
        scope_type: String,
        scope_value: String,
        document_id: DbId,
    },

    #[serde(rename = "assignment_removed")]
    AssignmentRemoved {
        assignment_id: DbId,
        scope_type: String,
        scope_value: String,
        document_id: DbId,
    },

    #[serde(rename = "account_suspended")]
    AccountSuspended { account_id: DbId, reason: String },

    #[serde(rename = "credits_gifted")]
    CreditsGifted { account_id: DbId, amount: i64 },
}

impl AuditAction {
    /// The `action_type` string recorded for this action.
    pub fn action_type(&self) -> &'static str {
        match self {
            AuditAction::ResourceCreated { .. } => action_types::RESOURCE_CREATED,
            AuditAction::LockAcquired { .. } => action_types::LOCK_ACQUIRED,
            AuditAction::LockReleased { .. } => action_types::LOCK_RELEASED,
            AuditAction::ContentSaved { .. } => action_types::CONTENT_SAVED,
            AuditAction::VersionRestored { .. } => action_types::VERSION_RESTORED,
            AuditAction::AssignmentCreated { .. } => action_types::ASSIGNMENT_CREATED,
            AuditAction::AssignmentRemoved { .. } => action_types::ASSIGNMENT_REMOVED,
            AuditAction::AccountSuspended { .. } => action_types::ACCOUNT_SUSPENDED,
            AuditAction::CreditsGifted { .. } => action_types::CREDITS_GIFTED,
        }
    }

    /// The `target_type` string recorded for this action.
    pub fn target_type(&self) -> &'static str {
        match self {
            AuditAction::ResourceCreated { .. }
            | AuditAction::LockAcquired { .. }
            | AuditAction::LockReleased { .. }
            | AuditAction::ContentSaved { .. }
            | AuditAction::VersionRestored { .. } => target_types::RESOURCE,
            AuditAction::AssignmentCreated { .. } | AuditAction::AssignmentRemoved { .. } => {
                target_types::ASSIGNMENT
            }
            AuditAction::AccountSuspended { .. } | AuditAction::CreditsGifted { .. } => {
                target_types::ACCOUNT
            }
        }
    }

    /// The primary target id recorded for this action.
    pub fn target_id(&self) -> DbId {
        match self {
            AuditAction::ResourceCreated { resource_id, .. }
            | AuditAction::LockAcquired { resource_id, .. }
            | AuditAction::LockReleased { resource_id, .. }
            | AuditAction::ContentSaved { resource_id, .. }
            | AuditAction::VersionRestored { resource_id, .. } => *resource_id,
            AuditAction::AssignmentCreated { assignment_id, .. }
            | AuditAction::AssignmentRemoved { assignment_id, .. } => *assignment_id,
            AuditAction::AccountSuspended { account_id, .. }
            | AuditAction::CreditsGifted { account_id, .. } => *account_id,
        }
    }

    /// The structured `details` payload for this action.
    ///
    /// The payload repeats the variant's fields (minus the tag) so the audit
    /// log stays self-describing even when read outside this codebase.
    pub fn details(&self) -> serde_json::Value {
        let mut value = serde_json::to_value(self).unwrap_or_else(|_| json!({}));
        if let Some(map) = value.as_object_mut() {
            map.remove("action");
        }
        value
    }
}

// ---------------------------------------------------------------------------
// Integrity hash chain
// ---------------------------------------------------------------------------

/// Known seed value for the first entry in the hash chain.
const CHAIN_SEED: &str = "FIELDLIGHT_AUDIT_CHAIN_SEED_V1";

/// Compute the SHA-256 integrity hash for an audit entry.
///
/// `prev_hash` is the integrity hash of the previous entry, or `None` for
/// the first entry in the chain (which uses a known seed value).
pub fn compute_integrity_hash(prev_hash: Option<&str>, entry_data: &str) -> String {
    let prev = prev_hash.unwrap_or(CHAIN_SEED);
    let combined = format!("{prev}|{entry_data}");
    hashing::sha256_hex(combined.as_bytes())
}

/// Build the canonical string representation of an entry for hashing.
///
/// Field order is fixed; the details payload is serialized with serde_json's
/// default key-sorted object representation, so recomputing the hash from a
/// stored (JSONB) payload yields the same string.
pub fn canonical_entry_data(actor_id: DbId, action: &AuditAction) -> String {
    format!(
        "{actor_id}|{}|{}|{}|{}",
        action.action_type(),
        action.target_type(),
        action.target_id(),
        action.details()
    )
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
