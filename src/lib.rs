#![forbid(unsafe_code)]
#![deny(clippy::unwrap_used, clippy::expect_used)]

pub mod autohide;
pub mod config;
pub mod error;
pub mod queue;
pub mod telemetry;
pub mod timer;
pub mod types;

pub use queue::{Entry, EntryId, QueueHandle, Snapshot, ToastData, ToastQueue};

pub type Result<T> = std::result::Result<T, error::Error>;
