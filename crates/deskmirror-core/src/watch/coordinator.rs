//! One watched root: watcher + current snapshot.
//!
//! `set_path` builds the first snapshot synchronously. After that, every
//! debounced invalidation is walked on a rebuild worker, and the finished
//! tree comes back through the mailbox; the consumer only swaps the `Arc`.
//! Invalidations and rebuilt trees carry the generation they were started
//! under, so anything from a replaced or disposed root is ignored.
use crate::dispatch::{Mailbox, Waker};
use crate::model::{build_snapshot, FolderTreeSnapshot, TreeBuildOptions};
use crate::watch::debounce::DEFAULT_DEBOUNCE;
use crate::watch::watcher::FileSystemTreeWatcher;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Invalidations are coalesced upstream, so a small budget is plenty.
const MAX_MESSAGES_PER_FRAME: usize = 16;

pub(crate) enum RootMessage {
    Invalidated {
        generation: u64,
    },
    Rebuilt {
        generation: u64,
        snapshot: Option<FolderTreeSnapshot>,
    },
}

pub struct FolderRootCoordinator {
    path: Option<PathBuf>,
    options: TreeBuildOptions,
    watcher: FileSystemTreeWatcher,
    mailbox: Mailbox<RootMessage>,
    generation: u64,
    snapshot: Option<Arc<FolderTreeSnapshot>>,
    rebuild_count: u64,
    /// The root did not exist when last watched; retry once it appears.
    awaiting_root: bool,
    /// A rebuild worker is walking the current generation.
    rebuilding: bool,
    /// An invalidation arrived while `rebuilding`; walk again when it lands.
    rebuild_pending: bool,
}

impl FolderRootCoordinator {
    pub fn new(waker: Waker) -> Self {
        Self {
            path: None,
            options: TreeBuildOptions::default(),
            watcher: FileSystemTreeWatcher::new(DEFAULT_DEBOUNCE),
            mailbox: Mailbox::new(waker),
            generation: 0,
            snapshot: None,
            rebuild_count: 0,
            awaiting_root: false,
            rebuilding: false,
            rebuild_pending: false,
        }
    }

    /// Filter applied on every build. Takes effect on the next build.
    pub fn with_options(mut self, options: TreeBuildOptions) -> Self {
        self.options = options;
        self
    }

    /// Quiet window for future watchers.
    pub fn with_debounce(mut self, window: Duration) -> Self {
        self.watcher = FileSystemTreeWatcher::new(window);
        self
    }

    /// Point the coordinator at `path`.
    ///
    /// The old watcher is released before anything else happens. The new
    /// snapshot is published before the new watcher starts, so the first
    /// invalidation always lands on top of a built tree.
    pub fn set_path(&mut self, path: impl Into<PathBuf>) {
        let path = path.into();
        self.release_watcher();
        info!("Folder: root set to {}", path.display());
        self.path = Some(path);
        self.rebuild();
        self.try_watch();
    }

    /// Re-walk the current path on the calling thread and publish the result.
    ///
    /// A path that no longer exists publishes `None`.
    pub fn rebuild(&mut self) {
        let Some(path) = &self.path else {
            self.snapshot = None;
            return;
        };
        let snapshot = build_snapshot(path, &self.options);
        self.publish(snapshot);
    }

    /// Apply pending invalidations and finished rebuilds. Returns `true` if
    /// the snapshot changed.
    ///
    /// Never walks the tree itself: an invalidation starts a rebuild worker
    /// (or queues one behind the worker already running). Also retries the
    /// watch when the root was missing and has since appeared, and drops the
    /// watch when the root has disappeared.
    pub fn process_messages(&mut self) -> bool {
        let mut changed = false;
        for msg in self.mailbox.drain(MAX_MESSAGES_PER_FRAME) {
            match msg {
                RootMessage::Invalidated { generation } => {
                    if generation == self.generation {
                        self.request_rebuild();
                    }
                }
                RootMessage::Rebuilt {
                    generation,
                    snapshot,
                } => {
                    if generation != self.generation {
                        continue;
                    }
                    self.rebuilding = false;
                    self.publish(snapshot);
                    changed = true;
                    if self.snapshot.is_none() && self.watcher.is_watching() {
                        self.release_watcher();
                        self.awaiting_root = true;
                    } else if self.rebuild_pending {
                        self.rebuild_pending = false;
                        self.request_rebuild();
                    }
                }
            }
        }

        if self.awaiting_root && self.path.as_deref().is_some_and(Path::is_dir) {
            debug!("Folder: root reappeared, watching again");
            self.try_watch();
            self.request_rebuild();
        }
        changed
    }

    /// Whether a rebuild worker is walking the current root.
    pub fn is_rebuilding(&self) -> bool {
        self.rebuilding
    }

    /// Release the watcher and the snapshot. Safe to call more than once.
    pub fn dispose(&mut self) {
        self.release_watcher();
        self.awaiting_root = false;
        self.snapshot = None;
        self.path = None;
    }

    /// Expand or collapse one directory node, replacing the published tree.
    pub fn set_expanded(&mut self, path: &Path, expanded: bool) -> bool {
        let Some(next) = self
            .snapshot
            .as_ref()
            .and_then(|tree| tree.with_expanded(path, expanded))
        else {
            return false;
        };
        self.snapshot = Some(Arc::new(next));
        true
    }

    pub fn snapshot(&self) -> Option<&Arc<FolderTreeSnapshot>> {
        self.snapshot.as_ref()
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn is_watching(&self) -> bool {
        self.watcher.is_watching()
    }

    pub fn watched_path(&self) -> Option<&Path> {
        self.watcher.watched_path()
    }

    pub fn rebuild_count(&self) -> u64 {
        self.rebuild_count
    }

    fn try_watch(&mut self) {
        self.awaiting_root = false;
        let Some(path) = &self.path else {
            return;
        };
        self.generation += 1;
        self.rebuilding = false;
        self.rebuild_pending = false;
        let generation = self.generation;
        let poster = self.mailbox.poster();
        let result = self.watcher.watch(path, move || {
            poster.offer(RootMessage::Invalidated { generation });
        });
        match result {
            Ok(true) => {}
            Ok(false) => {
                debug!("Folder: {} missing, not watched", path.display());
                self.awaiting_root = true;
            }
            Err(e) => warn!("Folder: could not watch {}: {}", path.display(), e),
        }
    }

    fn release_watcher(&mut self) {
        self.watcher.unwatch();
        self.generation += 1;
        self.rebuilding = false;
        self.rebuild_pending = false;
    }

    fn publish(&mut self, snapshot: Option<FolderTreeSnapshot>) {
        self.snapshot = snapshot.map(Arc::new);
        self.rebuild_count += 1;
        let Some(path) = &self.path else {
            return;
        };
        match &self.snapshot {
            Some(tree) => debug!(
                "Folder: rebuilt {} ({} dirs, {} files)",
                path.display(),
                tree.dir_count(),
                tree.file_count()
            ),
            None => debug!("Folder: {} is gone, snapshot cleared", path.display()),
        }
    }

    /// Walk the current root on a worker. At most one worker runs per
    /// generation; a request made while one is running is queued behind it.
    fn request_rebuild(&mut self) {
        if self.rebuilding {
            self.rebuild_pending = true;
            return;
        }
        let Some(path) = self.path.clone() else {
            return;
        };
        let options = self.options.clone();
        let generation = self.generation;
        let poster = self.mailbox.poster();

        let spawned = thread::Builder::new()
            .name("deskmirror-rebuild".into())
            .spawn(move || {
                let snapshot = build_snapshot(&path, &options);
                poster.post(RootMessage::Rebuilt {
                    generation,
                    snapshot,
                });
            });
        match spawned {
            Ok(_) => self.rebuilding = true,
            Err(e) => warn!("Folder: failed to spawn rebuild worker: {}", e),
        }
    }
}

impl Drop for FolderRootCoordinator {
    fn drop(&mut self) {
        self.dispose();
    }
}
