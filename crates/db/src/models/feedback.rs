//! Feedback entity model and DTOs.

use serde::Deserialize;
use sqlx::FromRow;

use feedboard_core::feedback::FeedbackItem;
use feedboard_core::types::{DbId, Timestamp};

/// A row from the `feedback` table.
#[derive(Debug, Clone, FromRow)]
pub struct Feedback {
    pub id: DbId,
    pub title: String,
    pub description: String,
    pub user_id: DbId,
    pub user_email: String,
    pub created_at: Timestamp,
}

impl Feedback {
    /// Convert the row into the shared domain entity.
    pub fn into_item(self) -> FeedbackItem {
        FeedbackItem {
            id: self.id,
            title: self.title,
            description: self.description,
            user_id: self.user_id,
            user_email: self.user_email,
            created_at: self.created_at,
        }
    }
}

/// DTO for creating a new feedback item.
///
/// Author identity is not part of the DTO; it comes from the
/// authenticated session.
#[derive(Debug, Deserialize)]
pub struct CreateFeedback {
    pub title: String,
    pub description: String,
}
