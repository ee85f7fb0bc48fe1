pub mod auth;
pub mod feedback;
pub mod health;

use axum::routing::get;
use axum::Router;

use crate::state::AppState;
use crate::ws;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /ws                WebSocket change feed (public)
///
/// /auth/signup       create account (public)
/// /auth/login        login (public)
/// /auth/refresh      refresh (public)
/// /auth/logout       logout (requires auth)
/// /auth/me           current identity (requires auth)
///
/// /feedback          list snapshot (public), create (requires auth)
/// /feedback/{id}     delete own item (requires auth)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // WebSocket change feed.
        .route("/ws", get(ws::ws_handler))
        // Authentication routes.
        .nest("/auth", auth::router())
        // Feedback list and mutations.
        .nest("/feedback", feedback::router())
}
