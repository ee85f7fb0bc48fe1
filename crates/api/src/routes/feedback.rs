//! Route definitions for the `/feedback` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::feedback;
use crate::state::AppState;

/// Routes mounted at `/feedback`.
///
/// ```text
/// GET    /       -> list_feedback (public snapshot, newest first)
/// POST   /       -> create_feedback (requires auth)
/// DELETE /{id}   -> delete_feedback (requires auth, author only)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(feedback::list_feedback).post(feedback::create_feedback),
        )
        .route("/{id}", axum::routing::delete(feedback::delete_feedback))
}
