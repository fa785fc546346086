//! Recursive directory watcher with debounced invalidation.
//!
//! The `notify` callback runs on notify's own thread and only forwards a
//! unit signal to a debounce thread; the debounce thread calls
//! `on_invalidate` once per settled burst. `on_invalidate` is expected to
//! post into the consumer's mailbox and return.
use crate::error::WatchError;
use crate::watch::debounce::{run_debounce, DEFAULT_DEBOUNCE};
use crossbeam_channel::{bounded, Sender};
use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use tracing::{debug, trace};

/// Raw signals buffered between notify and the debounce thread. Overflow is
/// harmless: one pending signal is enough to keep a burst open.
const RAW_EVENT_CAPACITY: usize = 1_024;

struct ActiveWatch {
    path: PathBuf,
    /// Dropping this releases the OS watch.
    os_watcher: Option<RecommendedWatcher>,
    alive: Arc<AtomicBool>,
    stop_tx: Option<Sender<()>>,
    debounce: Option<thread::JoinHandle<()>>,
}

impl ActiveWatch {
    fn release(mut self) {
        self.alive.store(false, Ordering::Release);
        self.os_watcher.take();
        self.stop_tx.take();
        if let Some(handle) = self.debounce.take() {
            let _ = handle.join();
        }
        debug!("Watcher: released {}", self.path.display());
    }
}

pub struct FileSystemTreeWatcher {
    window: Duration,
    active: Option<ActiveWatch>,
}

impl Default for FileSystemTreeWatcher {
    fn default() -> Self {
        Self::new(DEFAULT_DEBOUNCE)
    }
}

impl FileSystemTreeWatcher {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            active: None,
        }
    }

    /// Start watching `path` recursively, replacing any previous watch.
    ///
    /// Returns `Ok(false)` without creating anything when `path` is not an
    /// existing directory.
    pub fn watch(
        &mut self,
        path: &Path,
        on_invalidate: impl Fn() + Send + 'static,
    ) -> Result<bool, WatchError> {
        self.unwatch();

        if !path.is_dir() {
            debug!("Watcher: {} does not exist, not watching", path.display());
            return Ok(false);
        }

        let (raw_tx, raw_rx) = bounded::<()>(RAW_EVENT_CAPACITY);
        let mut os_watcher = RecommendedWatcher::new(
            move |result: notify::Result<Event>| match result {
                Ok(event) if is_structural(&event.kind) => {
                    trace!(?event, "Watcher: raw event");
                    let _ = raw_tx.try_send(());
                }
                Ok(_) => {}
                Err(e) => debug!("Watcher: notify error: {}", e),
            },
            Config::default(),
        )?;
        os_watcher
            .watch(path, RecursiveMode::Recursive)
            .map_err(|source| WatchError::Watch {
                path: path.to_path_buf(),
                source,
            })?;

        let alive = Arc::new(AtomicBool::new(true));
        let (stop_tx, stop_rx) = bounded::<()>(0);
        let window = self.window;
        let thread_alive = Arc::clone(&alive);
        let debounce = thread::Builder::new()
            .name("deskmirror-debounce".into())
            .spawn(move || {
                run_debounce(&raw_rx, &stop_rx, window, &thread_alive, on_invalidate);
            })
            .map_err(WatchError::Thread)?;

        debug!("Watcher: watching {} (window {:?})", path.display(), window);
        self.active = Some(ActiveWatch {
            path: path.to_path_buf(),
            os_watcher: Some(os_watcher),
            alive,
            stop_tx: Some(stop_tx),
            debounce: Some(debounce),
        });
        Ok(true)
    }

    /// Release the OS watch and the debounce thread.
    ///
    /// Safe to call repeatedly or before any `watch`. Once this returns no
    /// further invalidation is delivered.
    pub fn unwatch(&mut self) {
        if let Some(active) = self.active.take() {
            active.release();
        }
    }

    pub fn is_watching(&self) -> bool {
        self.active.is_some()
    }

    pub fn watched_path(&self) -> Option<&Path> {
        self.active.as_ref().map(|a| a.path.as_path())
    }

    pub fn window(&self) -> Duration {
        self.window
    }
}

impl Drop for FileSystemTreeWatcher {
    fn drop(&mut self) {
        self.unwatch();
    }
}

/// Creation, deletion, rename and content/metadata modification.
fn is_structural(kind: &EventKind) -> bool {
    matches!(
        kind,
        EventKind::Create(_) | EventKind::Remove(_) | EventKind::Modify(_)
    )
}
