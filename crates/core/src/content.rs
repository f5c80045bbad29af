//! Content validation for versioned configuration documents.

use crate::error::CoreError;

/// Maximum length for prompt or SOP document content in characters.
pub const MAX_CONTENT_LENGTH: usize = 100_000;

/// Validate document content: must be non-empty and within the length limit.
///
/// Runs before any write so a rejected save leaves no partial state.
pub fn validate_content(text: &str) -> Result<(), CoreError> {
    if text.trim().is_empty() {
        return Err(CoreError::Validation(
            "Document content must not be empty".to_string(),
        ));
    }
    if text.len() > MAX_CONTENT_LENGTH {
        return Err(CoreError::Validation(format!(
            "Document content exceeds maximum length of {MAX_CONTENT_LENGTH} characters (got {})",
            text.len()
        )));
    }
    Ok(())
}
