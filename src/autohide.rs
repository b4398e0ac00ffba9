//! Timed `close` for entries created with `autohide` set.
//!
//! The scheduler follows the queue's snapshots: it arms one [`ScopedTimer`] per
//! visible autohide entry and disarms it as soon as the entry is hidden or
//! removed by someone else. When the queue is dropped the subscription closes
//! and every pending timer is cancelled with the scheduler.

use std::collections::HashMap;
use std::time::Duration;

use tracing::debug;

use crate::Result;
use crate::queue::{Entry, EntryId, QueueHandle, Snapshot, ToastQueue};
use crate::timer::ScopedTimer;

#[derive(Debug)]
pub struct AutohideScheduler {
    queue: QueueHandle,
    delay: Duration,
    timers: HashMap<EntryId, ScopedTimer>,
}

impl AutohideScheduler {
    #[must_use]
    pub fn new(queue: QueueHandle, delay: Duration) -> Self {
        Self {
            queue,
            delay,
            timers: HashMap::new(),
        }
    }

    /// Scheduler using the queue's own `autohide_delay`.
    #[must_use]
    pub fn for_queue(queue: &ToastQueue) -> Self {
        Self::new(queue.handle(), queue.config().autohide_delay)
    }

    /// Number of armed timers.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.timers.len()
    }

    /// Bring the armed timers in line with `snapshot`.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn sync(&mut self, snapshot: &Snapshot) {
        self.timers
            .retain(|id, _| snapshot.get(*id).is_some_and(Entry::is_visible));

        for entry in snapshot.visible().filter(|entry| entry.autohide()) {
            let id = entry.id();
            if self.timers.contains_key(&id) {
                continue;
            }
            let queue = self.queue.clone();
            let timer = ScopedTimer::spawn(self.delay, move || {
                if let Err(err) = queue.close(id) {
                    debug!(%id, error = %err, "autohide fired after queue teardown");
                }
            });
            debug!(%id, delay_ms = self.delay.as_millis(), "autohide armed");
            self.timers.insert(id, timer);
        }
    }

    /// Follow the queue until it is dropped.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Detached`](crate::error::Error::Detached) if the queue
    /// is already gone when the scheduler starts.
    pub async fn run(mut self) -> Result<()> {
        let mut rx = self.queue.subscribe()?;
        let initial = rx.borrow_and_update().clone();
        self.sync(&initial);

        while rx.changed().await.is_ok() {
            let snapshot = rx.borrow_and_update().clone();
            self.sync(&snapshot);
        }

        debug!(pending = self.timers.len(), "toast queue dropped; cancelling autohide timers");
        Ok(())
    }
}
