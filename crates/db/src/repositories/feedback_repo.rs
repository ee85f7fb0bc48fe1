//! Repository for the `feedback` table.

use sqlx::PgPool;

use feedboard_core::types::DbId;

use crate::models::feedback::{CreateFeedback, Feedback};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, title, description, user_id, user_email, created_at";

/// Provides CRUD operations for feedback items.
pub struct FeedbackRepo;

impl FeedbackRepo {
    /// Insert a new feedback item, returning the created row.
    ///
    /// `user_id` and `user_email` come from the authenticated session, not
    /// from client input.
    pub async fn create(
        pool: &PgPool,
        user_id: DbId,
        user_email: &str,
        input: &CreateFeedback,
    ) -> Result<Feedback, sqlx::Error> {
        let query = format!(
            "INSERT INTO feedback (title, description, user_id, user_email)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Feedback>(&query)
            .bind(&input.title)
            .bind(&input.description)
            .bind(user_id)
            .bind(user_email)
            .fetch_one(pool)
            .await
    }

    /// Find a feedback item by its ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Feedback>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM feedback WHERE id = $1");
        sqlx::query_as::<_, Feedback>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List all feedback items, newest first.
    ///
    /// This is the snapshot every page load starts from.
    pub async fn list_newest_first(pool: &PgPool) -> Result<Vec<Feedback>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM feedback ORDER BY created_at DESC");
        sqlx::query_as::<_, Feedback>(&query).fetch_all(pool).await
    }

    /// Delete a feedback item by ID. Returns `true` if a row was deleted.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM feedback WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
