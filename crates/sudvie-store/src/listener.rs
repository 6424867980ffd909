//! # Change Feeds
//!
//! Live listeners: surfaces subscribe and re-fetch snapshots on change.
//!
//! ## Delivery Model
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Change Feed Semantics                              │
//! │                                                                         │
//! │  Repository write succeeds                                             │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  feed.notify()  ── bumps a monotone revision on a watch channel        │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Subscriber: rx.changed().await  → re-fetch the FULL snapshot          │
//! │                                                                         │
//! │  watch coalesces: a slow subscriber may see one tick for many writes.  │
//! │  That is fine: every tick means "re-read", and re-reading the same     │
//! │  revision twice is harmless (idempotent re-render).                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! No payload travels on the feed. Consumers always go back to the store
//! for the snapshot, so duplicate or out-of-order delivery cannot corrupt
//! derived state.

use tokio::sync::watch;

/// Monotone revision counter for one collection.
#[derive(Debug)]
pub struct ChangeFeed {
    tx: watch::Sender<u64>,
}

impl ChangeFeed {
    /// Creates a feed at revision zero.
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(0);
        ChangeFeed { tx }
    }

    /// Signals that the collection changed. Never blocks; subscribers that
    /// lag simply coalesce revisions.
    pub fn notify(&self) {
        self.tx.send_modify(|rev| *rev += 1);
    }

    /// Subscribes to change notifications.
    ///
    /// ## Usage
    /// ```rust,ignore
    /// let mut rx = store.inventory_feed().subscribe();
    /// while rx.changed().await.is_ok() {
    ///     let snapshot = store.inventory().list().await?;
    ///     render(snapshot);
    /// }
    /// ```
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.tx.subscribe()
    }

    /// Current revision (diagnostics only).
    pub fn revision(&self) -> u64 {
        *self.tx.borrow()
    }
}

impl Default for ChangeFeed {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_notify_wakes_subscriber() {
        let feed = ChangeFeed::new();
        let mut rx = feed.subscribe();

        feed.notify();
        rx.changed().await.unwrap();
        assert_eq!(*rx.borrow_and_update(), 1);
    }

    #[tokio::test]
    async fn test_coalesced_ticks_are_harmless() {
        let feed = ChangeFeed::new();
        let mut rx = feed.subscribe();

        // Three writes before the subscriber polls: one tick, latest revision
        feed.notify();
        feed.notify();
        feed.notify();

        rx.changed().await.unwrap();
        assert_eq!(*rx.borrow_and_update(), 3);

        // No further ticks pending
        assert!(!rx.has_changed().unwrap());
    }

    #[tokio::test]
    async fn test_late_subscriber_sees_current_revision() {
        let feed = ChangeFeed::new();
        feed.notify();

        let rx = feed.subscribe();
        assert_eq!(*rx.borrow(), 1);
    }
}
