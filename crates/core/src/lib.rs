//! Scanlab domain core.
//!
//! Pure job-lifecycle logic shared by the HTTP service and its clients:
//! clock and id abstractions, the elapsed-time stage schedule, deterministic
//! result selection, and the client-side status poller.

pub mod clock;
pub mod error;
pub mod ids;
pub mod polling;
pub mod scan;
pub mod selector;
pub mod stage;
pub mod types;
