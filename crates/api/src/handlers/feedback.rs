//! Handlers for the `/feedback` resource.
//!
//! The snapshot list is public (the landing page shows it without a
//! session); creating and deleting require authentication. Every mutation
//! publishes a [`FeedEvent`] so connected clients see the change live.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

use feedboard_core::error::CoreError;
use feedboard_core::feedback::{validate_description, validate_title, FeedbackItem};
use feedboard_core::types::DbId;
use feedboard_db::models::feedback::CreateFeedback;
use feedboard_db::repositories::FeedbackRepo;
use feedboard_events::FeedEvent;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// GET /feedback
// ---------------------------------------------------------------------------

/// Return the full snapshot of feedback items, newest first.
pub async fn list_feedback(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let rows = FeedbackRepo::list_newest_first(&state.pool).await?;
    let items: Vec<FeedbackItem> = rows.into_iter().map(|row| row.into_item()).collect();

    Ok(Json(DataResponse { data: items }))
}

// ---------------------------------------------------------------------------
// POST /feedback
// ---------------------------------------------------------------------------

/// Create a feedback item authored by the authenticated user.
///
/// Publishes `feedback.created` so every connected session (including this
/// one) sees the new item without reloading.
pub async fn create_feedback(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateFeedback>,
) -> AppResult<impl IntoResponse> {
    validate_title(&input.title)?;
    validate_description(&input.description)?;

    let row = FeedbackRepo::create(&state.pool, auth.user_id, &auth.email, &input).await?;
    let item = row.into_item();

    tracing::info!(
        feedback_id = item.id,
        user_id = auth.user_id,
        "Feedback created",
    );

    state.event_bus.publish(FeedEvent::Created { item: item.clone() });

    Ok((StatusCode::CREATED, Json(DataResponse { data: item })))
}

// ---------------------------------------------------------------------------
// DELETE /feedback/:id
// ---------------------------------------------------------------------------

/// Delete a feedback item. Only the author may delete their own item.
///
/// Publishes `feedback.deleted` on success; clients that already removed
/// the item locally absorb the notification as a no-op.
pub async fn delete_feedback(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let item = FeedbackRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Feedback",
            id,
        }))?;

    if item.user_id != auth.user_id {
        return Err(AppError::Core(CoreError::Forbidden(
            "You can only delete your own feedback".into(),
        )));
    }

    let deleted = FeedbackRepo::delete(&state.pool, id).await?;

    // A concurrent delete may have won the race; the winner already
    // published the notification.
    if deleted {
        tracing::info!(feedback_id = id, user_id = auth.user_id, "Feedback deleted");
        state.event_bus.publish(FeedEvent::Deleted { id });
    }

    Ok(StatusCode::NO_CONTENT)
}
