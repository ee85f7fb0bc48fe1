//! Fan-out of feedback change events to connected WebSocket clients.
//!
//! [`ChangeBroadcaster`] subscribes to the event bus and pushes every
//! published [`FeedEvent`] to all connections as a JSON text frame. The
//! feed is shared: every session receives every change, including the
//! session whose own mutation caused it (clients absorb their own echo as
//! a no-op).

use std::sync::Arc;

use axum::extract::ws::Message;
use tokio::sync::broadcast;

use feedboard_events::FeedEvent;

use crate::ws::WsManager;

/// Background service that bridges the event bus onto the WebSocket feed.
pub struct ChangeBroadcaster {
    ws_manager: Arc<WsManager>,
}

impl ChangeBroadcaster {
    /// Create a new broadcaster with the given WebSocket manager.
    pub fn new(ws_manager: Arc<WsManager>) -> Self {
        Self { ws_manager }
    }

    /// Run the fan-out loop.
    ///
    /// Subscribes to the event bus via `receiver` and broadcasts each event.
    /// The loop exits when the channel is closed (i.e. the
    /// [`EventBus`](feedboard_events::EventBus) is dropped).
    pub async fn run(self, mut receiver: broadcast::Receiver<FeedEvent>) {
        loop {
            match receiver.recv().await {
                Ok(event) => {
                    let json = match serde_json::to_string(&event) {
                        Ok(json) => json,
                        Err(e) => {
                            tracing::error!(error = %e, "Failed to serialize feed event");
                            continue;
                        }
                    };
                    tracing::debug!(item_id = event.item_id(), "Broadcasting feed event");
                    self.ws_manager.broadcast(Message::Text(json.into())).await;
                }
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    tracing::warn!(skipped = n, "Change broadcaster lagged");
                }
                Err(broadcast::error::RecvError::Closed) => {
                    tracing::info!("Event bus closed, change broadcaster shutting down");
                    break;
                }
            }
        }
    }
}
