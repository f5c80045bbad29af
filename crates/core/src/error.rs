use crate::types::DbId;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Validation failed: {0}")]
    Validation(String),

    /// The resource is locked by another admin. Carries the holder's display
    /// name when known so the UI can say "locked by Jane" instead of a
    /// generic conflict message.
    #[error("Resource is locked by {}", .holder_display_name.as_deref().unwrap_or("another user"))]
    LockConflict {
        holder_display_name: Option<String>,
    },

    /// The caller does not hold the edit lock required for this mutation.
    /// Distinct from [`CoreError::LockConflict`]: this is raised on save or
    /// restore when the caller's lock was lost or never acquired.
    #[error("You do not hold the edit lock on this resource")]
    NotHolder,

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lock_conflict_names_the_holder() {
        let err = CoreError::LockConflict {
            holder_display_name: Some("Jane".to_string()),
        };
        assert_eq!(err.to_string(), "Resource is locked by Jane");
    }

    #[test]
    fn lock_conflict_without_name_falls_back() {
        let err = CoreError::LockConflict {
            holder_display_name: None,
        };
        assert_eq!(err.to_string(), "Resource is locked by another user");
    }
}
