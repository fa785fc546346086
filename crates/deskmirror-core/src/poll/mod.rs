//! Polling refresh — one controller per remote list.
//!
//! # Usage
//!
//! ```ignore
//! let mut editing = PollingRefreshController::new(
//!     PollTarget::new("editing", Duration::from_secs(5)).with_precheck(),
//!     Arc::new(JsonExportSource::new(ListKind::Editing, config)),
//!     waker,
//! )
//! .with_focus(Arc::clone(&focus));
//! editing.start(Duration::from_secs(5));
//!
//! // every frame, on the UI thread:
//! for event in editing.process_messages() { /* log activity */ }
//! ```
pub mod controller;
pub mod status;
mod ticker;

pub use controller::{PollTarget, PollingRefreshController};
pub use status::{ControllerState, RefreshEvent, RefreshStatus, TickOutcome};
