//! Toast queue state machine.
//!
//! Entries move through `visible → hidden → removed`; `remove` may also be
//! applied to a visible entry directly. Every mutation publishes a fresh
//! [`Snapshot`], so a renderer holding an older one never sees a partial update.

mod capacity;
mod entry;
mod resolve;
mod snapshot;
mod store;

pub use capacity::CapacityGuard;
pub use entry::{Entry, EntryId, ToastData};
pub use resolve::resolve;
pub use snapshot::Snapshot;
pub use store::{QueueHandle, ToastQueue};
