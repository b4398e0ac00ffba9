use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};

use tokio::sync::watch;
use tracing::debug;

use crate::Result;
use crate::config::QueueConfig;
use crate::error::Error;

use super::capacity::CapacityGuard;
use super::entry::{Entry, EntryId, ToastData};
use super::resolve::resolve;
use super::snapshot::Snapshot;

/// Owner of the toast queue.
///
/// Producers and renderers get a [`QueueHandle`] instead of a reference to
/// this type; dropping the `ToastQueue` detaches every handle and closes every
/// subscription.
#[derive(Debug)]
pub struct ToastQueue {
    inner: Arc<Inner>,
}

/// Weak, cloneable access to a [`ToastQueue`].
///
/// Every operation fails with [`Error::Detached`] once the queue is gone, or
/// if the handle was never bound to one (`QueueHandle::default()`).
#[derive(Clone, Debug, Default)]
pub struct QueueHandle {
    inner: Weak<Inner>,
}

#[derive(Debug)]
struct Inner {
    config: QueueConfig,
    capacity: CapacityGuard,
    next_id: AtomicU64,
    snapshot: watch::Sender<Snapshot>,
}

impl ToastQueue {
    #[must_use]
    pub fn new(config: QueueConfig) -> Self {
        let (snapshot, _) = watch::channel(Snapshot::default());
        Self {
            inner: Arc::new(Inner {
                capacity: CapacityGuard::new(config.max_entries),
                config,
                next_id: AtomicU64::new(1),
                snapshot,
            }),
        }
    }

    #[must_use]
    pub fn handle(&self) -> QueueHandle {
        QueueHandle {
            inner: Arc::downgrade(&self.inner),
        }
    }

    #[must_use]
    pub fn config(&self) -> &QueueConfig {
        &self.inner.config
    }

    /// Append a visible entry at the tail, unless the queue is full.
    ///
    /// Returns the new entry's id, or `None` when the capacity guard dropped
    /// the request.
    pub fn create(&self, data: ToastData) -> Option<EntryId> {
        self.inner.create(data)
    }

    /// Hide a visible entry. Returns `false` when the id is unknown or the
    /// entry is already hidden; nothing is published in that case.
    pub fn close(&self, id: EntryId) -> bool {
        self.inner.close(id)
    }

    /// Delete an entry whether or not it was closed first.
    pub fn remove(&self, id: EntryId) -> bool {
        self.inner.remove(id)
    }

    /// Delete every entry in a single publish.
    pub fn clear(&self) -> bool {
        self.inner.clear()
    }

    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        self.inner.snapshot.borrow().clone()
    }

    /// Receiver notified after every mutation that changed the queue.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Snapshot> {
        self.inner.snapshot.subscribe()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.snapshot.borrow().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for ToastQueue {
    fn default() -> Self {
        Self::new(QueueConfig::default())
    }
}

impl QueueHandle {
    fn inner(&self) -> Result<Arc<Inner>> {
        self.inner.upgrade().ok_or(Error::Detached)
    }

    /// Whether the owning queue is still alive.
    #[must_use]
    pub fn is_attached(&self) -> bool {
        self.inner.strong_count() > 0
    }

    /// See [`ToastQueue::create`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::Detached`] when no queue backs this handle.
    pub fn create(&self, data: ToastData) -> Result<Option<EntryId>> {
        Ok(self.inner()?.create(data))
    }

    /// See [`ToastQueue::close`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::Detached`] when no queue backs this handle.
    pub fn close(&self, id: EntryId) -> Result<bool> {
        Ok(self.inner()?.close(id))
    }

    /// See [`ToastQueue::remove`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::Detached`] when no queue backs this handle.
    pub fn remove(&self, id: EntryId) -> Result<bool> {
        Ok(self.inner()?.remove(id))
    }

    /// See [`ToastQueue::clear`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::Detached`] when no queue backs this handle.
    pub fn clear(&self) -> Result<bool> {
        Ok(self.inner()?.clear())
    }

    /// # Errors
    ///
    /// Returns [`Error::Detached`] when no queue backs this handle.
    pub fn snapshot(&self) -> Result<Snapshot> {
        Ok(self.inner()?.snapshot.borrow().clone())
    }

    /// # Errors
    ///
    /// Returns [`Error::Detached`] when no queue backs this handle.
    pub fn subscribe(&self) -> Result<watch::Receiver<Snapshot>> {
        Ok(self.inner()?.snapshot.subscribe())
    }

    /// # Errors
    ///
    /// Returns [`Error::Detached`] when no queue backs this handle.
    pub fn config(&self) -> Result<QueueConfig> {
        Ok(self.inner()?.config.clone())
    }
}

impl Inner {
    // Each mutation runs inside `send_if_modified`, which holds the channel's
    // write lock: id assignment and append are one step, and readers only
    // ever see whole snapshots.

    fn create(&self, data: ToastData) -> Option<EntryId> {
        let mut created = None;
        let mut dropped_at = 0;
        self.snapshot.send_if_modified(|snapshot| {
            if !self.capacity.admits(snapshot.len()) {
                dropped_at = snapshot.len();
                return false;
            }
            let id = EntryId::new(self.next_id.fetch_add(1, Ordering::Relaxed));
            let mut entries = Vec::with_capacity(snapshot.len() + 1);
            entries.extend_from_slice(snapshot.entries());
            entries.push(resolve(id, data));
            *snapshot = Snapshot::from(entries);
            created = Some(id);
            true
        });

        match created {
            Some(id) => debug!(%id, "toast created"),
            None => debug!(
                len = dropped_at,
                max_entries = ?self.capacity.max_entries(),
                "queue full; dropping toast"
            ),
        }
        created
    }

    fn close(&self, id: EntryId) -> bool {
        let changed = self.snapshot.send_if_modified(|snapshot| {
            let Some(pos) = snapshot
                .iter()
                .position(|entry| entry.id() == id && entry.is_visible())
            else {
                return false;
            };
            let entries: Vec<Entry> = snapshot
                .iter()
                .enumerate()
                .map(|(idx, entry)| if idx == pos { entry.hidden() } else { entry.clone() })
                .collect();
            *snapshot = Snapshot::from(entries);
            true
        });
        if changed {
            debug!(%id, "toast hidden");
        }
        changed
    }

    fn remove(&self, id: EntryId) -> bool {
        let changed = self.snapshot.send_if_modified(|snapshot| {
            if !snapshot.contains(id) {
                return false;
            }
            let entries: Vec<Entry> = snapshot
                .iter()
                .filter(|entry| entry.id() != id)
                .cloned()
                .collect();
            *snapshot = Snapshot::from(entries);
            true
        });
        if changed {
            debug!(%id, "toast removed");
        }
        changed
    }

    fn clear(&self) -> bool {
        let changed = self.snapshot.send_if_modified(|snapshot| {
            if snapshot.is_empty() {
                return false;
            }
            *snapshot = Snapshot::default();
            true
        });
        if changed {
            debug!("toast queue cleared");
        }
        changed
    }
}
