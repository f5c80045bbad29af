//! Edit-lock constants, resource kinds, and validation.
//!
//! This module lives in `core` (zero internal deps) so the API/repository
//! layer and any future tooling reference the same lease durations and
//! resource-kind whitelist.

// ---------------------------------------------------------------------------
// Lease duration constants
// ---------------------------------------------------------------------------

/// Default lock lease duration in seconds (15 minutes).
///
/// A lock whose lease has expired reads as unlocked and may be taken over
/// by another admin without an explicit release.
pub const DEFAULT_LEASE_SECS: i64 = 900;

/// Minimum allowed lease duration in seconds.
pub const MIN_LEASE_SECS: i64 = 30;

/// Maximum allowed lease duration in seconds (4 hours).
pub const MAX_LEASE_SECS: i64 = 14_400;

// ---------------------------------------------------------------------------
// Resource kinds (the things that can be locked and versioned)
// ---------------------------------------------------------------------------

/// Known resource kinds for locking and versioning.
pub mod resource_kinds {
    /// An AI prompt template edited in the back office.
    pub const PROMPT: &str = "prompt";
    /// A Standard-of-Practice document assignable to a scope.
    pub const SOP_DOCUMENT: &str = "sop_document";
}

/// The set of all valid resource kinds.
pub const VALID_RESOURCE_KINDS: &[&str] =
    &[resource_kinds::PROMPT, resource_kinds::SOP_DOCUMENT];

/// Returns `true` if the given resource kind is valid.
pub fn is_valid_resource_kind(kind: &str) -> bool {
    VALID_RESOURCE_KINDS.contains(&kind)
}

// ---------------------------------------------------------------------------
// Slug / label limits
// ---------------------------------------------------------------------------

/// Maximum length for a resource slug in characters.
pub const MAX_SLUG_LENGTH: usize = 200;

/// Maximum length for a resource label in characters.
pub const MAX_LABEL_LENGTH: usize = 300;

// ---------------------------------------------------------------------------
// Validation helpers
// ---------------------------------------------------------------------------

/// Validate a lease duration in seconds. Returns `Ok(())` or an error message.
pub fn validate_lease_secs(secs: i64) -> Result<(), String> {
    if secs < MIN_LEASE_SECS {
        return Err(format!(
            "Lock lease must be at least {MIN_LEASE_SECS} second(s), got {secs}"
        ));
    }
    if secs > MAX_LEASE_SECS {
        return Err(format!(
            "Lock lease must be at most {MAX_LEASE_SECS} seconds, got {secs}"
        ));
    }
    Ok(())
}

/// Validate a resource slug: non-empty, within length limit, and restricted
/// to lowercase alphanumerics, `_`, `-`, and `.` so slugs are URL- and
/// log-safe.
pub fn validate_slug(slug: &str) -> Result<(), String> {
    if slug.is_empty() {
        return Err("Resource slug must not be empty".to_string());
    }
    if slug.len() > MAX_SLUG_LENGTH {
        return Err(format!(
            "Resource slug exceeds maximum length of {MAX_SLUG_LENGTH} characters (got {})",
            slug.len()
        ));
    }
    if !slug
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || matches!(c, '_' | '-' | '.'))
    {
        return Err(format!(
            "Resource slug '{slug}' may only contain lowercase letters, digits, '_', '-', '.'"
        ));
    }
    Ok(())
}

/// Validate a resource label: non-empty and within length limit.
pub fn validate_label(label: &str) -> Result<(), String> {
    if label.trim().is_empty() {
        return Err("Resource label must not be empty".to_string());
    }
    if label.len() > MAX_LABEL_LENGTH {
        return Err(format!(
            "Resource label exceeds maximum length of {MAX_LABEL_LENGTH} characters (got {})",
            label.len()
        ));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
