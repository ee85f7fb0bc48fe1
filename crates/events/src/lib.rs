//! Feedboard change-event infrastructure.
//!
//! - [`EventBus`] — in-process publish/subscribe hub backed by
//!   `tokio::sync::broadcast`.
//! - [`FeedEvent`] — the canonical change notification, shared between the
//!   API's WebSocket broadcaster and the client-side feed.

pub mod bus;

pub use bus::{EventBus, FeedEvent};
