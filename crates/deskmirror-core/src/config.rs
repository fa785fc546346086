//! Key/value settings consumed by remote sources and the frontend.
//!
//! Credentials and list identifiers live in an external store; the core only
//! needs read access. A missing key is a normal condition, reported by the
//! source as [`SourceError::ConfigMissing`](crate::error::SourceError).

use crate::error::ConfigError;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};

/// Shared credential keys, used by every list.
pub const API_KEY: &str = "board.api_key";
pub const API_TOKEN: &str = "board.token";

/// Environment variable overriding the config file location.
pub const CONFIG_PATH_ENV: &str = "DESKMIRROR_CONFIG";

/// Default config file name, resolved against the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "deskmirror.json";

/// Poll cadence in whole seconds.
pub const POLL_INTERVAL_SECS: &str = "poll.interval_secs";

/// Folder mirrored at startup when none is given on the command line.
pub const FOLDER_ROOT: &str = "folder.root";

/// Comma-separated extensions shown in the folder tree, e.g. `png,jpg`.
/// Absent means every file is shown.
pub const FOLDER_EXTENSIONS: &str = "folder.extensions";

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(5);

/// Read-only access to settings.
pub trait ConfigStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;

    /// Like [`get`](Self::get) but treats blank values as absent.
    fn get_non_empty(&self, key: &str) -> Option<String> {
        self.get(key).filter(|v| !v.trim().is_empty())
    }
}

/// Poll cadence from [`POLL_INTERVAL_SECS`]; zero or unparsable values fall
/// back to [`DEFAULT_POLL_INTERVAL`].
pub fn poll_interval(store: &dyn ConfigStore) -> Duration {
    store
        .get_non_empty(POLL_INTERVAL_SECS)
        .and_then(|v| v.trim().parse::<u64>().ok())
        .filter(|secs| *secs > 0)
        .map_or(DEFAULT_POLL_INTERVAL, Duration::from_secs)
}

/// In-memory store. Used by tests and as the fallback when no file exists.
#[derive(Debug, Default)]
pub struct MemoryConfigStore {
    values: RwLock<HashMap<String, String>>,
}

impl MemoryConfigStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(self, key: &str, value: &str) -> Self {
        self.set(key, value);
        self
    }

    pub fn set(&self, key: &str, value: &str) {
        self.values.write().insert(key.to_owned(), value.to_owned());
    }

    pub fn remove(&self, key: &str) {
        self.values.write().remove(key);
    }
}

impl ConfigStore for MemoryConfigStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.read().get(key).cloned()
    }
}

/// A flat JSON object on disk, e.g.
///
/// ```json
/// { "board.api_key": "…", "board.token": "…", "board.editing_list": "exports/editing.json" }
/// ```
///
/// Loaded once; the store does not watch its own file.
#[derive(Debug)]
pub struct JsonConfigStore {
    path: PathBuf,
    inner: MemoryConfigStore,
}

impl JsonConfigStore {
    /// Load `path`. A missing file yields an empty store.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let inner = MemoryConfigStore::new();
        if !path.exists() {
            debug!("Config: {} does not exist, starting empty", path.display());
            return Ok(Self {
                path: path.to_path_buf(),
                inner,
            });
        }

        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let map: HashMap<String, serde_json::Value> =
            serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?;

        for (key, value) in map {
            // Non-string scalars are kept in their JSON spelling.
            let value = match value {
                serde_json::Value::String(s) => s,
                other => other.to_string(),
            };
            inner.set(&key, &value);
        }
        info!("Config: loaded {} keys from {}", inner.values.read().len(), path.display());

        Ok(Self {
            path: path.to_path_buf(),
            inner,
        })
    }

    /// Resolve the config path from `DESKMIRROR_CONFIG`, falling back to
    /// [`DEFAULT_CONFIG_FILE`].
    pub fn default_path() -> PathBuf {
        std::env::var_os(CONFIG_PATH_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ConfigStore for JsonConfigStore {
    fn get(&self, key: &str) -> Option<String> {
        self.inner.get(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_file_is_empty_store() {
        let tmp = TempDir::new().unwrap();
        let store = JsonConfigStore::load(&tmp.path().join("nope.json")).unwrap();
        assert_eq!(store.get(API_KEY), None);
    }

    #[test]
    fn loads_flat_object() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("cfg.json");
        std::fs::write(&path, r#"{ "board.api_key": "k", "poll.interval_secs": 30 }"#).unwrap();

        let store = JsonConfigStore::load(&path).unwrap();
        assert_eq!(store.get(API_KEY).as_deref(), Some("k"));
        assert_eq!(store.get(POLL_INTERVAL_SECS).as_deref(), Some("30"));
        assert_eq!(poll_interval(&store), Duration::from_secs(30));
    }

    #[test]
    fn bad_interval_falls_back() {
        let store = MemoryConfigStore::new().with(POLL_INTERVAL_SECS, "0");
        assert_eq!(poll_interval(&store), DEFAULT_POLL_INTERVAL);
        store.set(POLL_INTERVAL_SECS, "soon");
        assert_eq!(poll_interval(&store), DEFAULT_POLL_INTERVAL);
    }

    #[test]
    fn rejects_non_object() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("cfg.json");
        std::fs::write(&path, "[1, 2]").unwrap();
        assert!(matches!(
            JsonConfigStore::load(&path),
            Err(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn blank_values_count_as_missing() {
        let store = MemoryConfigStore::new().with(API_TOKEN, "   ");
        assert_eq!(store.get_non_empty(API_TOKEN), None);
        assert!(store.get(API_TOKEN).is_some());
    }
}
