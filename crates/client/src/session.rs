//! One viewer's live feedback session: snapshot, live changes, and
//! optimistic deletion.

use feedboard_core::feedback::FeedbackItem;
use feedboard_core::types::DbId;
use feedboard_events::FeedEvent;

use crate::backend::FeedbackBackend;
use crate::feed::LiveFeed;
use crate::source::{ChangeSource, ChangeSubscription};

/// The live list synchronization component.
///
/// Owns the in-memory list for one mounted view, folds change
/// notifications into it, and drives the optimistic delete path. All
/// state is mutated through `&mut self` on the owning task, so no
/// locking is needed; the idempotent merge rules in [`LiveFeed`] stand
/// in for ordering guarantees between local completions and the
/// notifications that echo them.
pub struct FeedSession<B: FeedbackBackend> {
    feed: LiveFeed,
    /// At most one locally-issued delete is in flight at a time; its id
    /// drives the "deleting" affordance for exactly that item while
    /// everything else stays interactive.
    pending_delete: Option<DbId>,
    backend: B,
    subscription: ChangeSubscription,
    /// The viewer's user id, when authenticated.
    viewer_id: Option<DbId>,
}

impl<B: FeedbackBackend> FeedSession<B> {
    /// Create a session from the initial snapshot.
    ///
    /// Acquires exactly one live subscription from `source`; it is
    /// released when the session is closed or dropped.
    pub fn new(
        snapshot: Vec<FeedbackItem>,
        source: &dyn ChangeSource,
        backend: B,
        viewer_id: Option<DbId>,
    ) -> Self {
        Self {
            feed: LiveFeed::new(snapshot),
            pending_delete: None,
            backend,
            subscription: source.subscribe(),
            viewer_id,
        }
    }

    /// Items in display order.
    pub fn items(&self) -> &[FeedbackItem] {
        self.feed.items()
    }

    /// True when there is nothing to show.
    pub fn is_empty(&self) -> bool {
        self.feed.is_empty()
    }

    /// The id of the in-flight local delete, if any.
    pub fn pending_delete(&self) -> Option<DbId> {
        self.pending_delete
    }

    /// Whether the delete affordance applies to an item.
    ///
    /// Only the author may delete, and not while a delete for that item
    /// is already in flight. UIs gate the affordance on this check; the
    /// server enforces the same rule independently.
    pub fn can_delete(&self, item: &FeedbackItem) -> bool {
        self.viewer_id == Some(item.user_id) && self.pending_delete != Some(item.id)
    }

    /// Apply every change notification that is already waiting, without
    /// blocking. Returns the number applied.
    pub fn poll_changes(&mut self) -> usize {
        let mut applied = 0;
        while let Some(event) = self.subscription.try_recv() {
            self.feed.apply(event);
            applied += 1;
        }
        applied
    }

    /// Await the next change notification and fold it into the list.
    ///
    /// Returns the applied event, or `None` once the subscription has
    /// been released or its source has shut down.
    pub async fn next_change(&mut self) -> Option<FeedEvent> {
        let event = self.subscription.recv().await?;
        self.feed.apply(event.clone());
        Some(event)
    }

    /// Delete one of the viewer's items, optimistically.
    ///
    /// Returns `true` when the item was removed locally. The request is
    /// ignored when a delete for this id is already pending or the id is
    /// no longer in the list. On success the item is removed immediately
    /// rather than waiting for the echoing notification, which is later
    /// absorbed as a no-op. On failure the list is left untouched and
    /// the error goes to the log only. `pending_delete` is cleared on
    /// both paths.
    pub async fn request_delete(&mut self, id: DbId) -> bool {
        if self.pending_delete == Some(id) {
            tracing::debug!(item_id = id, "Delete already pending, ignoring");
            return false;
        }
        if !self.feed.contains(id) {
            tracing::debug!(item_id = id, "Delete requested for absent item, ignoring");
            return false;
        }

        self.pending_delete = Some(id);
        let result = self.backend.delete_item(id).await;
        self.pending_delete = None;

        match result {
            Ok(()) => self.feed.remove(id),
            Err(e) => {
                tracing::error!(item_id = id, error = %e, "Failed to delete feedback");
                false
            }
        }
    }

    /// Tear the session down, releasing the live subscription.
    ///
    /// Dropping the session has the same effect; this makes the release
    /// explicit at call sites.
    pub fn close(self) {
        self.subscription.release();
    }
}
