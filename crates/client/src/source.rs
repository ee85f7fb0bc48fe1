//! Change-source abstraction and the WebSocket-backed implementation.
//!
//! [`ChangeSource`] is the interface a [`FeedSession`](crate::FeedSession)
//! acquires its live subscription from; [`WsChangeSource`] is the
//! production implementation that reads the server's WebSocket feed.
//! Tests substitute their own source to script deliveries and assert
//! release.

use std::time::Duration;

use futures::{SinkExt, StreamExt};
use tokio::sync::broadcast;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;
use tokio_util::sync::CancellationToken;

use feedboard_events::FeedEvent;

/// Provider of live feedback change notifications.
pub trait ChangeSource {
    /// Open a live subscription to the change feed.
    ///
    /// A mounted view holds exactly one subscription and releases it on
    /// teardown.
    fn subscribe(&self) -> ChangeSubscription;
}

// ---------------------------------------------------------------------------
// ChangeSubscription
// ---------------------------------------------------------------------------

/// A live subscription to the change feed.
///
/// Pairs the receiving half of the feed with a release guard. Dropping
/// the subscription releases it; [`release`](Self::release) does the same
/// explicitly. Once released, no further notifications are delivered.
pub struct ChangeSubscription {
    events: broadcast::Receiver<FeedEvent>,
    guard: CancellationToken,
}

impl ChangeSubscription {
    /// Pair a receiver with a release guard.
    ///
    /// The guard is cancelled exactly once, on release or drop; sources
    /// can retain a clone to observe the release.
    pub fn new(events: broadcast::Receiver<FeedEvent>, guard: CancellationToken) -> Self {
        Self { events, guard }
    }

    /// Receive the next change notification.
    ///
    /// Returns `None` once the subscription is released or its source has
    /// shut down. A lagged receiver skips the dropped notifications with
    /// a diagnostic and keeps going.
    pub async fn recv(&mut self) -> Option<FeedEvent> {
        loop {
            if self.guard.is_cancelled() {
                return None;
            }
            tokio::select! {
                () = self.guard.cancelled() => return None,
                result = self.events.recv() => match result {
                    Ok(event) => return Some(event),
                    Err(broadcast::error::RecvError::Lagged(n)) => {
                        tracing::warn!(skipped = n, "Change subscription lagged");
                    }
                    Err(broadcast::error::RecvError::Closed) => return None,
                },
            }
        }
    }

    /// Receive a notification that is already waiting, without blocking.
    pub fn try_recv(&mut self) -> Option<FeedEvent> {
        if self.guard.is_cancelled() {
            return None;
        }
        loop {
            match self.events.try_recv() {
                Ok(event) => return Some(event),
                Err(broadcast::error::TryRecvError::Lagged(n)) => {
                    tracing::warn!(skipped = n, "Change subscription lagged");
                }
                Err(_) => return None,
            }
        }
    }

    /// Release the subscription explicitly.
    pub fn release(self) {
        // Drop cancels the guard.
    }
}

impl Drop for ChangeSubscription {
    fn drop(&mut self) {
        self.guard.cancel();
    }
}

// ---------------------------------------------------------------------------
// WsChangeSource
// ---------------------------------------------------------------------------

/// Reconnection delay after a WebSocket failure.
const RECONNECT_DELAY: Duration = Duration::from_secs(5);

/// Buffer capacity for the internal fan-out channel.
const SOURCE_CAPACITY: usize = 256;

/// WebSocket-backed change source.
///
/// Spawns a reader task that connects to the server's change feed, parses
/// each JSON text frame into a [`FeedEvent`], and republishes it on an
/// internal broadcast channel that subscriptions read from. The reader
/// reconnects with a fixed delay until [`shutdown`](Self::shutdown) is
/// called.
pub struct WsChangeSource {
    bus: broadcast::Sender<FeedEvent>,
    shutdown: CancellationToken,
}

impl WsChangeSource {
    /// Start reading the change feed at `ws_url` (e.g.
    /// `ws://localhost:3000/api/v1/ws`).
    pub fn start(ws_url: String) -> Self {
        let (bus, _) = broadcast::channel(SOURCE_CAPACITY);
        let shutdown = CancellationToken::new();

        tokio::spawn(run_reader(ws_url, bus.clone(), shutdown.clone()));

        Self { bus, shutdown }
    }

    /// Stop the reader task and release every open subscription.
    pub fn shutdown(&self) {
        self.shutdown.cancel();
    }
}

impl ChangeSource for WsChangeSource {
    fn subscribe(&self) -> ChangeSubscription {
        // Child token: releasing one subscription does not affect the
        // source; shutting the source down releases every subscription.
        ChangeSubscription::new(self.bus.subscribe(), self.shutdown.child_token())
    }
}

/// Connect-and-read loop with fixed-delay reconnection.
async fn run_reader(
    ws_url: String,
    bus: broadcast::Sender<FeedEvent>,
    shutdown: CancellationToken,
) {
    loop {
        tracing::info!(url = %ws_url, "Connecting to change feed");

        tokio::select! {
            () = shutdown.cancelled() => return,
            result = connect_async(ws_url.as_str()) => match result {
                Ok((ws_stream, _response)) => {
                    tracing::info!("Change feed connected");
                    run_feed(ws_stream, &bus, &shutdown).await;
                    if shutdown.is_cancelled() {
                        return;
                    }
                    tracing::warn!("Change feed session ended, reconnecting");
                }
                Err(e) => {
                    tracing::error!(error = %e, "Change feed connection failed");
                }
            },
        }

        tokio::select! {
            () = shutdown.cancelled() => return,
            () = tokio::time::sleep(RECONNECT_DELAY) => {}
        }
    }
}

/// Drive a single WebSocket session until it ends or shutdown is requested.
async fn run_feed(
    ws_stream: tokio_tungstenite::WebSocketStream<
        tokio_tungstenite::MaybeTlsStream<tokio::net::TcpStream>,
    >,
    bus: &broadcast::Sender<FeedEvent>,
    shutdown: &CancellationToken,
) {
    let (mut sink, mut stream) = ws_stream.split();

    loop {
        tokio::select! {
            () = shutdown.cancelled() => {
                let _ = sink.send(Message::Close(None)).await;
                return;
            }
            msg = stream.next() => {
                match msg {
                    Some(Ok(Message::Text(text))) => {
                        handle_frame(bus, &text);
                    }
                    Some(Ok(Message::Ping(_) | Message::Pong(_))) => {
                        // Handled automatically by tungstenite.
                    }
                    Some(Ok(Message::Close(frame))) => {
                        tracing::info!(?frame, "Server closed the change feed");
                        return;
                    }
                    Some(Ok(_)) => {
                        // Binary / Frame — ignore.
                    }
                    Some(Err(e)) => {
                        tracing::error!(error = %e, "Change feed receive error");
                        return;
                    }
                    None => {
                        tracing::info!("Change feed stream exhausted");
                        return;
                    }
                }
            }
        }
    }
}

/// Parse one text frame and republish it; malformed frames are skipped.
fn handle_frame(bus: &broadcast::Sender<FeedEvent>, text: &str) {
    match serde_json::from_str::<FeedEvent>(text) {
        Ok(event) => {
            // SendError only means there are zero open subscriptions.
            let _ = bus.send(event);
        }
        Err(e) => {
            tracing::warn!(error = %e, raw = %text, "Unknown or malformed feed frame");
        }
    }
}
