//! `feedboard-watch` -- terminal watcher for the live feedback feed.
//!
//! Fetches the snapshot, opens the live subscription, and logs every
//! change to the shared list until interrupted. With credentials it logs
//! in first so the session knows which items the viewer could delete.
//!
//! # Environment variables
//!
//! | Variable             | Required | Default                 | Description                      |
//! |----------------------|----------|-------------------------|----------------------------------|
//! | `FEEDBOARD_URL`      | no       | `http://localhost:3000` | API base URL                     |
//! | `FEEDBOARD_WS_URL`   | no       | derived from base URL   | WebSocket change-feed endpoint   |
//! | `FEEDBOARD_EMAIL`    | no       | --                      | Login email (anonymous if unset) |
//! | `FEEDBOARD_PASSWORD` | no       | --                      | Login password                   |

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use feedboard_client::{FeedSession, HttpBackend, WsChangeSource};
use feedboard_events::FeedEvent;

/// Default API base URL for local development.
const DEFAULT_BASE_URL: &str = "http://localhost:3000";

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "feedboard_client=info,feedboard_watch=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let base_url =
        std::env::var("FEEDBOARD_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());

    let ws_url = std::env::var("FEEDBOARD_WS_URL").unwrap_or_else(|_| derive_ws_url(&base_url));

    // Authenticate when credentials are provided; watch anonymously otherwise.
    let email = std::env::var("FEEDBOARD_EMAIL").ok();
    let password = std::env::var("FEEDBOARD_PASSWORD").ok();

    let (backend, viewer_id) = match (email, password) {
        (Some(email), Some(password)) => {
            match HttpBackend::login(&base_url, &email, &password).await {
                Ok((backend, user_id)) => {
                    tracing::info!(user_id, "Logged in");
                    (backend, Some(user_id))
                }
                Err(e) => {
                    tracing::error!(error = %e, "Login failed");
                    std::process::exit(1);
                }
            }
        }
        _ => {
            tracing::info!("No credentials provided, watching anonymously");
            (HttpBackend::new(base_url.as_str()), None)
        }
    };

    // Initial snapshot, then the live subscription.
    let snapshot = match backend.fetch_snapshot().await {
        Ok(snapshot) => snapshot,
        Err(e) => {
            tracing::error!(error = %e, "Failed to fetch snapshot");
            std::process::exit(1);
        }
    };
    tracing::info!(items = snapshot.len(), "Snapshot loaded");

    let source = WsChangeSource::start(ws_url);
    let mut session = FeedSession::new(snapshot, &source, backend, viewer_id);

    if session.is_empty() {
        tracing::info!("No feedback yet");
    }

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Interrupted, closing session");
                break;
            }
            change = session.next_change() => {
                match change {
                    Some(FeedEvent::Created { item }) => {
                        tracing::info!(
                            item_id = item.id,
                            author = %item.user_email,
                            title = %item.title,
                            total = session.items().len(),
                            "Feedback created",
                        );
                    }
                    Some(FeedEvent::Deleted { id }) => {
                        tracing::info!(
                            item_id = id,
                            total = session.items().len(),
                            "Feedback deleted",
                        );
                    }
                    None => {
                        tracing::info!("Change feed closed");
                        break;
                    }
                }
            }
        }
    }

    session.close();
    source.shutdown();
}

/// Derive the WebSocket endpoint from the API base URL.
fn derive_ws_url(base_url: &str) -> String {
    let ws_base = if let Some(rest) = base_url.strip_prefix("https://") {
        format!("wss://{rest}")
    } else if let Some(rest) = base_url.strip_prefix("http://") {
        format!("ws://{rest}")
    } else {
        format!("ws://{base_url}")
    };
    format!("{ws_base}/api/v1/ws")
}
