//! Role name constants shared between the API layer and token issuers.

/// Back-office administrators: may edit resources, manage assignments, and
/// read the audit trail.
pub const ROLE_ADMIN: &str = "admin";

/// Machine callers (e.g. the statement-generation engine): read-only access
/// to resolution and current-content endpoints.
pub const ROLE_SERVICE: &str = "service";
