//! Remote sources polled by [`PollingRefreshController`](crate::poll::PollingRefreshController).
//!
//! Sources are called from fetch worker threads, never from the consumer,
//! so they must be `Send + Sync` and may block.
pub mod json_export;

use crate::error::SourceError;
use crate::model::TaskItem;

pub use json_export::JsonExportSource;

/// A pluggable remote list.
pub trait RemoteSource: Send + Sync {
    /// Cheap "has anything changed since `last_marker`" probe.
    ///
    /// Only called when the poll target has its pre-check enabled. The
    /// default assumes a change so sources without a cheap probe still work.
    fn check_for_updates(&self, last_marker: Option<&str>) -> Result<bool, SourceError> {
        let _ = last_marker;
        Ok(true)
    }

    /// Fetch the full, ordered list.
    fn fetch(&self) -> Result<Vec<TaskItem>, SourceError>;

    /// Marker recorded after a successful fetch and handed to the next
    /// [`check_for_updates`](Self::check_for_updates). Defaults to the item
    /// count.
    fn marker(&self, items: &[TaskItem]) -> String {
        items.len().to_string()
    }
}
