//! In-process event bus backed by a `tokio::sync::broadcast` channel.
//!
//! [`EventBus`] is the central publish/subscribe hub for [`FeedEvent`]s.
//! It is designed to be shared via `Arc<EventBus>` across the application.

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use feedboard_core::feedback::FeedbackItem;
use feedboard_core::types::DbId;

// ---------------------------------------------------------------------------
// FeedEvent
// ---------------------------------------------------------------------------

/// A change to the shared feedback list.
///
/// The serde representation is the wire format: events are serialized
/// verbatim onto the WebSocket as JSON text frames, with the `type` tag
/// carrying the dot-separated event name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum FeedEvent {
    /// A new feedback item was created.
    #[serde(rename = "feedback.created")]
    Created { item: FeedbackItem },

    /// A feedback item was deleted.
    #[serde(rename = "feedback.deleted")]
    Deleted { id: DbId },
}

impl FeedEvent {
    /// The id of the feedback item this event concerns.
    pub fn item_id(&self) -> DbId {
        match self {
            FeedEvent::Created { item } => item.id,
            FeedEvent::Deleted { id } => *id,
        }
    }
}

// ---------------------------------------------------------------------------
// EventBus
// ---------------------------------------------------------------------------

/// Default buffer capacity for the broadcast channel.
const DEFAULT_CAPACITY: usize = 1024;

/// In-process fan-out event bus.
///
/// Wraps a [`broadcast::Sender`] so that any number of subscribers can
/// independently receive every published [`FeedEvent`].
pub struct EventBus {
    sender: broadcast::Sender<FeedEvent>,
}

impl EventBus {
    /// Create a bus with a specific channel capacity.
    ///
    /// When the buffer is full, the oldest un-consumed messages are dropped
    /// and slow receivers will observe a `RecvError::Lagged`.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish an event to all current subscribers.
    ///
    /// If there are no active subscribers the event is silently dropped.
    pub fn publish(&self, event: FeedEvent) {
        // Ignore the SendError — it only means there are zero receivers.
        let _ = self.sender.send(event);
    }

    /// Subscribe to all events published on this bus.
    pub fn subscribe(&self) -> broadcast::Receiver<FeedEvent> {
        self.sender.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
