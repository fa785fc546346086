//! A list mirrored from a board export on disk.
//!
//! The export is a JSON array of [`TaskItem`] written by an external sync
//! job. Its path is the list identifier stored under the list kind's
//! `list_id_key`; the board credentials must also be configured, matching
//! what the live API needs.
use crate::config::{ConfigStore, API_KEY, API_TOKEN};
use crate::error::SourceError;
use crate::model::{ListKind, TaskItem};
use crate::source::RemoteSource;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::UNIX_EPOCH;
use tracing::debug;

pub struct JsonExportSource {
    kind: ListKind,
    config: Arc<dyn ConfigStore>,
}

impl JsonExportSource {
    pub fn new(kind: ListKind, config: Arc<dyn ConfigStore>) -> Self {
        Self { kind, config }
    }

    pub fn kind(&self) -> ListKind {
        self.kind
    }

    /// Resolve the export path, failing on the first missing setting.
    fn export_path(&self) -> Result<PathBuf, SourceError> {
        let list_key = self.kind.settings().list_id_key;
        for key in [API_KEY, API_TOKEN, list_key] {
            if self.config.get_non_empty(key).is_none() {
                return Err(SourceError::ConfigMissing(key.to_owned()));
            }
        }
        self.config
            .get_non_empty(list_key)
            .map(PathBuf::from)
            .ok_or_else(|| SourceError::ConfigMissing(list_key.to_owned()))
    }

    /// Modification time and length; changes whenever the export is rewritten.
    fn stamp(&self) -> Result<String, SourceError> {
        let path = self.export_path()?;
        let meta = std::fs::metadata(&path)
            .map_err(|e| SourceError::Network(format!("{}: {e}", path.display())))?;
        let modified = meta
            .modified()
            .ok()
            .and_then(|t| t.duration_since(UNIX_EPOCH).ok())
            .map_or(0, |d| d.as_nanos());
        Ok(format!("{modified}:{}", meta.len()))
    }
}

impl RemoteSource for JsonExportSource {
    fn check_for_updates(&self, last_marker: Option<&str>) -> Result<bool, SourceError> {
        let stamp = self.stamp()?;
        Ok(last_marker != Some(stamp.as_str()))
    }

    fn fetch(&self) -> Result<Vec<TaskItem>, SourceError> {
        let path = self.export_path()?;
        let text = std::fs::read_to_string(&path)
            .map_err(|e| SourceError::Network(format!("{}: {e}", path.display())))?;
        let items: Vec<TaskItem> =
            serde_json::from_str(&text).map_err(|e| SourceError::Payload(e.to_string()))?;
        debug!("{} export: {} items from {}", self.kind.title(), items.len(), path.display());
        Ok(items)
    }

    fn marker(&self, items: &[TaskItem]) -> String {
        // Fall back to the item count if the file vanished right after the read.
        self.stamp().unwrap_or_else(|_| items.len().to_string())
    }
}
