//! The single current-snapshot slot shared by every store
//!
//! A [`SnapshotCell`] owns the one "current" state value. Each publish
//! replaces it wholesale with a new `Arc`, so a [`Snapshot`] handed out
//! earlier never changes underneath its holder.
//!
//! Observers subscribe with [`SnapshotCell::subscribe`]. Delivery is
//! coalescing (a slow observer may skip intermediate revisions) but
//! ordered: an observer never receives a revision older than one it has
//! already seen.

use std::fmt;
use std::ops::Deref;
use std::sync::Arc;

use tokio::sync::watch;

/// One published state value and its revision number.
///
/// Revision 0 is the initial state; every publish increments it by one.
pub struct Snapshot<S> {
    revision: u64,
    state: Arc<S>,
}

impl<S> Snapshot<S> {
    /// Revision number of this snapshot
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Shared handle to the state value
    pub fn state(&self) -> &Arc<S> {
        &self.state
    }

    /// Consume the snapshot, keeping only the state
    pub fn into_state(self) -> Arc<S> {
        self.state
    }
}

impl<S> Clone for Snapshot<S> {
    fn clone(&self) -> Self {
        Self {
            revision: self.revision,
            state: Arc::clone(&self.state),
        }
    }
}

impl<S> Deref for Snapshot<S> {
    type Target = S;

    fn deref(&self) -> &S {
        &self.state
    }
}

impl<S: fmt::Debug> fmt::Debug for Snapshot<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Snapshot")
            .field("revision", &self.revision)
            .field("state", &self.state)
            .finish()
    }
}

/// Holder of the current snapshot.
///
/// Only the owner can publish (`&mut self`), which keeps the store
/// single-writer; any number of [`StateWatcher`]s can read.
pub struct SnapshotCell<S> {
    tx: watch::Sender<Snapshot<S>>,
}

impl<S> SnapshotCell<S> {
    /// Create a cell whose revision-0 snapshot is `state`
    pub fn new(state: S) -> Self {
        let (tx, _rx) = watch::channel(Snapshot {
            revision: 0,
            state: Arc::new(state),
        });
        Self { tx }
    }

    /// The current snapshot
    pub fn current(&self) -> Snapshot<S> {
        self.tx.borrow().clone()
    }

    /// The current state value
    pub fn state(&self) -> Arc<S> {
        Arc::clone(&self.tx.borrow().state)
    }

    /// Revision of the current snapshot
    pub fn revision(&self) -> u64 {
        self.tx.borrow().revision
    }

    /// Replace the current snapshot with `state`, returning the new revision.
    pub fn publish(&mut self, state: S) -> u64 {
        let revision = self.revision() + 1;
        self.tx.send_replace(Snapshot {
            revision,
            state: Arc::new(state),
        });
        revision
    }

    /// Register a new observer. The current snapshot counts as already seen.
    pub fn subscribe(&self) -> StateWatcher<S> {
        StateWatcher {
            rx: self.tx.subscribe(),
        }
    }

    /// Number of live observers
    pub fn observer_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl<S: fmt::Debug> fmt::Debug for SnapshotCell<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SnapshotCell")
            .field("current", &*self.tx.borrow())
            .field("observers", &self.tx.receiver_count())
            .finish()
    }
}

/// Read side of a [`SnapshotCell`].
pub struct StateWatcher<S> {
    rx: watch::Receiver<Snapshot<S>>,
}

impl<S> Clone for StateWatcher<S> {
    fn clone(&self) -> Self {
        Self {
            rx: self.rx.clone(),
        }
    }
}

impl<S> StateWatcher<S> {
    /// The most recently published snapshot. Never blocks on the writer.
    pub fn current(&self) -> Snapshot<S> {
        self.rx.borrow().clone()
    }

    /// Whether a snapshot newer than the last one returned by
    /// [`changed`](Self::changed) has been published.
    pub fn has_changed(&self) -> bool {
        self.rx.has_changed().unwrap_or(false)
    }

    /// Wait for the next unseen snapshot.
    ///
    /// Returns `None` once the owning store has been dropped.
    pub async fn changed(&mut self) -> Option<Snapshot<S>> {
        self.rx.changed().await.ok()?;
        Some(self.rx.borrow_and_update().clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_publish_bumps_revision() {
        let mut cell = SnapshotCell::new(1);
        assert_eq!(cell.revision(), 0);
        assert_eq!(*cell.state(), 1);

        assert_eq!(cell.publish(2), 1);
        assert_eq!(cell.publish(3), 2);
        assert_eq!(*cell.current(), 3);
    }

    #[test]
    fn test_old_snapshot_is_untouched() {
        let mut cell = SnapshotCell::new(String::from("before"));
        let old = cell.current();

        cell.publish(String::from("after"));

        assert_eq!(old.as_str(), "before");
        assert_eq!(old.revision(), 0);
        assert_eq!(cell.current().as_str(), "after");
    }

    #[tokio::test]
    async fn test_watcher_coalesces_in_order() {
        let mut cell = SnapshotCell::new(0u32);
        let mut watcher = cell.subscribe();
        assert!(!watcher.has_changed());

        cell.publish(1);
        cell.publish(2);
        cell.publish(3);
        assert!(watcher.has_changed());

        let seen = watcher.changed().await.expect("cell alive");
        assert_eq!(seen.revision(), 3);
        assert_eq!(*seen, 3);
        assert!(!watcher.has_changed());

        cell.publish(4);
        let seen = watcher.changed().await.expect("cell alive");
        assert_eq!(seen.revision(), 4);
    }

    #[tokio::test]
    async fn test_watcher_ends_when_cell_dropped() {
        let cell = SnapshotCell::new(());
        let mut watcher = cell.subscribe();
        assert_eq!(cell.observer_count(), 1);

        drop(cell);
        assert!(watcher.changed().await.is_none());
        assert_eq!(watcher.current().revision(), 0);
    }
}
