//! Read-side SOP resolution: which document governs a given scope.
//!
//! Pure logic, shared by the HTTP layer and the statement-generation
//! consumer. The database layer supplies candidate assignments; this module
//! owns the ordering rule and the combination semantics. Resolution never
//! consults the lock manager.

use serde::{Deserialize, Serialize};

use crate::types::{DbId, Timestamp};

// ---------------------------------------------------------------------------
// Scope types
// ---------------------------------------------------------------------------

/// Known assignment scope types.
pub mod scope_types {
    pub const STATE: &str = "state";
    pub const ORGANIZATION: &str = "organization";
}

/// The set of all valid scope types.
pub const VALID_SCOPE_TYPES: &[&str] = &[scope_types::STATE, scope_types::ORGANIZATION];

/// Returns `true` if the given scope type is valid.
pub fn is_valid_scope_type(scope_type: &str) -> bool {
    VALID_SCOPE_TYPES.contains(&scope_type)
}

/// Maximum length of an organization scope value.
pub const MAX_SCOPE_VALUE_LENGTH: usize = 200;

/// Validate a `(scope_type, scope_value)` pair. Returns `Ok(())` or an error
/// message.
///
/// State scopes are two-letter uppercase US state codes; organization scopes
/// are free-form non-empty names.
pub fn validate_scope(scope_type: &str, scope_value: &str) -> Result<(), String> {
    if !is_valid_scope_type(scope_type) {
        return Err(format!(
            "Invalid scope_type '{scope_type}'. Must be one of: {}",
            VALID_SCOPE_TYPES.join(", ")
        ));
    }
    if scope_value.trim().is_empty() {
        return Err("scope_value must not be empty".to_string());
    }
    if scope_type == scope_types::STATE {
        let valid = scope_value.len() == 2
            && scope_value.chars().all(|c| c.is_ascii_uppercase());
        if !valid {
            return Err(format!(
                "State scope value must be a two-letter uppercase code, got '{scope_value}'"
            ));
        }
    }
    if scope_value.len() > MAX_SCOPE_VALUE_LENGTH {
        return Err(format!(
            "scope_value exceeds maximum length of {MAX_SCOPE_VALUE_LENGTH} characters (got {})",
            scope_value.len()
        ));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Candidate ordering
// ---------------------------------------------------------------------------

/// An active assignment considered during resolution.
#[derive(Debug, Clone, PartialEq)]
pub struct AssignmentCandidate {
    pub assignment_id: DbId,
    pub document_id: DbId,
    pub assigned_at: Timestamp,
}

/// Pick the winning assignment from a scope's active candidates.
///
/// Highest `assigned_at` wins; `assignment_id` breaks exact-timestamp ties
/// deterministically. Returns `None` for an unconfigured scope.
pub fn latest_active(candidates: &[AssignmentCandidate]) -> Option<&AssignmentCandidate> {
    candidates
        .iter()
        .max_by_key(|c| (c.assigned_at, c.assignment_id))
}

// ---------------------------------------------------------------------------
// Resolution result
// ---------------------------------------------------------------------------

/// A document resolved for one scope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedDocument {
    pub scope_type: String,
    pub scope_value: String,
    pub assignment_id: DbId,
    pub document_id: DbId,
}

/// The outcome of resolving SOP documents for a request.
///
/// When both scopes were requested and both have an active assignment, both
/// documents are present; the caller combines their guidance. Absence of any
/// assignment is the valid `default` outcome, not an error.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SopResolution {
    pub state: Option<ResolvedDocument>,
    pub organization: Option<ResolvedDocument>,
}

impl SopResolution {
    /// Combine per-scope resolution results.
    pub fn new(state: Option<ResolvedDocument>, organization: Option<ResolvedDocument>) -> Self {
        Self {
            state,
            organization,
        }
    }

    /// True when no scope resolved to a document (the "no SOP configured"
    /// default).
    pub fn is_default(&self) -> bool {
        self.state.is_none() && self.organization.is_none()
    }

    /// Which scopes contributed documents: `"both"`, `"state"`,
    /// `"organization"`, or `"default"`.
    pub fn source(&self) -> &'static str {
        match (&self.state, &self.organization) {
            (Some(_), Some(_)) => "both",
            (Some(_), None) => "state",
            (None, Some(_)) => "organization",
            (None, None) => "default",
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
