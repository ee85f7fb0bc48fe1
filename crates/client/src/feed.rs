//! The in-memory live list: snapshot plus merge rules.

use feedboard_core::feedback::FeedbackItem;
use feedboard_core::types::DbId;
use feedboard_events::FeedEvent;

/// The authoritative in-memory ordered list of feedback items for one
/// viewing session.
///
/// Owns the snapshot it was created from and folds change notifications
/// into it. Notification-driven and locally-initiated removals both
/// converge on [`remove`](Self::remove), keyed by id, so the order in
/// which they arrive never matters.
#[derive(Debug)]
pub struct LiveFeed {
    items: Vec<FeedbackItem>,
}

impl LiveFeed {
    /// Take ownership of the initial snapshot (already newest-first).
    pub fn new(snapshot: Vec<FeedbackItem>) -> Self {
        Self { items: snapshot }
    }

    /// Items in display order.
    ///
    /// The feed never re-sorts: new arrivals are prepended and the
    /// snapshot order is otherwise preserved.
    pub fn items(&self) -> &[FeedbackItem] {
        &self.items
    }

    /// True when there is nothing to show. Callers render a distinct
    /// empty state rather than a blank list.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of items currently in the list.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether an item with the given id is currently in the list.
    pub fn contains(&self, id: DbId) -> bool {
        self.items.iter().any(|item| item.id == id)
    }

    /// Fold one change notification into the list.
    ///
    /// Inserts prepend at the front unless the id is already present
    /// (duplicate delivery); deletes remove if present. Either way an
    /// event for an id the list already reflects is a no-op, which is
    /// what makes the merge safe under reordering.
    pub fn apply(&mut self, event: FeedEvent) {
        match event {
            FeedEvent::Created { item } => {
                if self.contains(item.id) {
                    tracing::debug!(item_id = item.id, "Duplicate insert notification ignored");
                    return;
                }
                self.items.insert(0, item);
            }
            FeedEvent::Deleted { id } => {
                if !self.remove(id) {
                    tracing::debug!(item_id = id, "Delete notification for absent item ignored");
                }
            }
        }
    }

    /// Remove the item with the given id. Returns `true` if it was present.
    ///
    /// The single mutation primitive both delete paths converge on.
    pub fn remove(&mut self, id: DbId) -> bool {
        let before = self.items.len();
        self.items.retain(|item| item.id != id);
        self.items.len() < before
    }
}
