//! Feedback item entity and field validation.
//!
//! [`FeedbackItem`] is the canonical entity shared by the API server, the
//! event bus, and the client-side feed. The database layer converts its
//! row type into this struct so nothing outside `feedboard-db` depends on
//! sqlx.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::{DbId, Timestamp};

// ---------------------------------------------------------------------------
// Validation constants
// ---------------------------------------------------------------------------

/// Maximum length for the title field (bytes).
pub const MAX_TITLE_LENGTH: usize = 200;

/// Maximum length for the description field (bytes).
pub const MAX_DESCRIPTION_LENGTH: usize = 10_000;

// ---------------------------------------------------------------------------
// Entity
// ---------------------------------------------------------------------------

/// One user-submitted feedback entry.
///
/// `id` is assigned by the database and is the merge/dedup key for the
/// live feed. `user_email` is a display string only; deletion is
/// authorized against `user_id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedbackItem {
    pub id: DbId,
    pub title: String,
    /// Free text; newlines are preserved verbatim on display.
    pub description: String,
    pub user_id: DbId,
    pub user_email: String,
    pub created_at: Timestamp,
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Validate a feedback title: required, non-blank, bounded length.
pub fn validate_title(title: &str) -> Result<(), CoreError> {
    if title.trim().is_empty() {
        return Err(CoreError::Validation("Title must not be empty".into()));
    }
    if title.len() > MAX_TITLE_LENGTH {
        return Err(CoreError::Validation(format!(
            "Title exceeds maximum length of {} characters (got {})",
            MAX_TITLE_LENGTH,
            title.len()
        )));
    }
    Ok(())
}

/// Validate a feedback description: required, non-blank, bounded length.
pub fn validate_description(description: &str) -> Result<(), CoreError> {
    if description.trim().is_empty() {
        return Err(CoreError::Validation(
            "Description must not be empty".into(),
        ));
    }
    if description.len() > MAX_DESCRIPTION_LENGTH {
        return Err(CoreError::Validation(format!(
            "Description exceeds maximum length of {} characters (got {})",
            MAX_DESCRIPTION_LENGTH,
            description.len()
        )));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_item() -> FeedbackItem {
        FeedbackItem {
            id: 7,
            title: "Dark mode".to_string(),
            description: "Please add a dark theme.\nMy eyes hurt.".to_string(),
            user_id: 3,
            user_email: "ada@example.com".to_string(),
            created_at: chrono::Utc::now(),
        }
    }

    #[test]
    fn valid_title_passes() {
        assert!(validate_title("Dark mode").is_ok());
    }

    #[test]
    fn blank_title_fails() {
        assert!(validate_title("").is_err());
        assert!(validate_title("   ").is_err());
    }

    #[test]
    fn overlong_title_fails() {
        let title = "x".repeat(MAX_TITLE_LENGTH + 1);
        let err = validate_title(&title).unwrap_err();
        assert!(matches!(err, CoreError::Validation(_)));
    }

    #[test]
    fn title_at_limit_passes() {
        let title = "x".repeat(MAX_TITLE_LENGTH);
        assert!(validate_title(&title).is_ok());
    }

    #[test]
    fn blank_description_fails() {
        assert!(validate_description("\n  \n").is_err());
    }

    #[test]
    fn overlong_description_fails() {
        let description = "y".repeat(MAX_DESCRIPTION_LENGTH + 1);
        assert!(validate_description(&description).is_err());
    }

    #[test]
    fn item_serialization_preserves_newlines() {
        let item = sample_item();
        let json = serde_json::to_string(&item).expect("serialization should succeed");
        let back: FeedbackItem =
            serde_json::from_str(&json).expect("deserialization should succeed");
        assert_eq!(back, item);
        assert!(back.description.contains('\n'));
    }
}
