/// Application state management.
///
/// Centralises all mutable state that the UI reads and writes. This struct
/// is the consumer context: polling controllers and the folder coordinator
/// are owned here and their mailboxes are drained in `process_messages()`,
/// which runs once per frame on the UI thread.
use chrono::{DateTime, Local};
use deskmirror_core::config::{self, ConfigStore};
use deskmirror_core::dispatch::Waker;
use deskmirror_core::focus::FocusSignalBroadcaster;
use deskmirror_core::model::{parse_hex_color, ListKind, TreeBuildOptions};
use deskmirror_core::poll::{PollTarget, PollingRefreshController, RefreshEvent, RefreshStatus};
use deskmirror_core::source::{JsonExportSource, RemoteSource};
use deskmirror_core::watch::FolderRootCoordinator;
use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

/// Maximum entries kept in the activity log.
///
/// Oldest entries are evicted first so a long-running session with a busy
/// board does not grow without bound.
pub const MAX_ACTIVITY_ENTRIES: usize = 200;

/// One line in the activity log.
#[derive(Debug, Clone)]
pub struct ActivityEntry {
    pub at: DateTime<Local>,
    pub list: Option<ListKind>,
    pub text: String,
}

/// One mirrored list and its controller.
pub struct ListView {
    pub kind: ListKind,
    pub controller: PollingRefreshController,
    /// Accent colour from config, or the kind's default.
    pub accent: [u8; 3],
}

/// All application state.
pub struct AppState {
    pub config: Arc<dyn ConfigStore>,
    pub focus: Arc<FocusSignalBroadcaster>,

    // ── Lists ──────────────────────────────────────────
    pub lists: Vec<ListView>,
    pub poll_interval: Duration,

    // ── Folder ─────────────────────────────────────────
    pub folder: FolderRootCoordinator,
    /// Text in the folder path box.
    pub folder_input: String,

    // ── Activity ───────────────────────────────────────
    pub activity: VecDeque<ActivityEntry>,

    // ── UI state ───────────────────────────────────────
    pub dark_mode: bool,
    pub show_about: bool,
    /// Last value handed to the focus broadcaster.
    last_focus: Option<bool>,
}

impl AppState {
    /// Create state with one controller per [`ListKind`], not yet started.
    ///
    /// `waker` is called from background threads whenever a message lands in
    /// any mailbox; the GUI passes `egui::Context::request_repaint`.
    pub fn new(config: Arc<dyn ConfigStore>, waker: Waker) -> Self {
        let sources = ListKind::ALL.map(|kind| {
            let source: Arc<dyn RemoteSource> =
                Arc::new(JsonExportSource::new(kind, Arc::clone(&config)));
            (kind, source)
        });
        Self::with_sources(config, waker, sources)
    }

    /// Like [`new`](Self::new) but with caller-provided sources.
    pub fn with_sources(
        config: Arc<dyn ConfigStore>,
        waker: Waker,
        sources: impl IntoIterator<Item = (ListKind, Arc<dyn RemoteSource>)>,
    ) -> Self {
        let focus = Arc::new(FocusSignalBroadcaster::new());
        let poll_interval = config::poll_interval(config.as_ref());

        let lists = sources
            .into_iter()
            .map(|(kind, source)| {
                let target = PollTarget::new(kind.title(), poll_interval).with_precheck();
                let controller = PollingRefreshController::new(target, source, waker.clone())
                    .with_focus(Arc::clone(&focus));
                let accent = config
                    .get_non_empty(kind.settings().accent_color_key)
                    .and_then(|c| parse_hex_color(&c))
                    .unwrap_or(kind.settings().default_accent);
                ListView {
                    kind,
                    controller,
                    accent,
                }
            })
            .collect();

        let options = config
            .get_non_empty(config::FOLDER_EXTENSIONS)
            .map(|exts| TreeBuildOptions::with_extensions(exts.split(',').map(str::trim)))
            .unwrap_or_default();
        let folder = FolderRootCoordinator::new(waker).with_options(options);

        Self {
            config,
            focus,
            lists,
            poll_interval,
            folder,
            folder_input: String::new(),
            activity: VecDeque::new(),
            dark_mode: true,
            show_about: false,
            last_focus: None,
        }
    }

    // ── Polling ──────────────────────────────────────────────────────────

    /// Start every controller at the configured cadence and refresh once.
    pub fn start_polling(&mut self) {
        for list in &mut self.lists {
            list.controller.start(self.poll_interval);
            list.controller.refresh_now();
        }
        tracing::info!(
            "Polling {} lists every {:?}",
            self.lists.len(),
            self.poll_interval
        );
    }

    pub fn stop_polling(&mut self) {
        for list in &mut self.lists {
            list.controller.stop();
        }
    }

    /// Manual refresh of every list. Busy lists are left alone.
    pub fn refresh_all(&mut self) {
        for list in &mut self.lists {
            list.controller.refresh_now();
        }
    }

    pub fn list(&self, kind: ListKind) -> Option<&ListView> {
        self.lists.iter().find(|l| l.kind == kind)
    }

    pub fn any_busy(&self) -> bool {
        self.lists.iter().any(|l| l.controller.is_busy())
    }

    // ── Focus ────────────────────────────────────────────────────────────

    /// Forward the window's focus state. Only changes are published.
    pub fn on_focus_changed(&mut self, focused: bool) {
        if self.last_focus == Some(focused) {
            return;
        }
        self.last_focus = Some(focused);
        let delivered = self.focus.publish(focused);
        tracing::debug!("Focus: foregrounded={} ({} listeners)", focused, delivered);
    }

    // ── Folder ───────────────────────────────────────────────────────────

    /// Mirror `path`, replacing any previously mirrored folder.
    pub fn set_folder(&mut self, path: PathBuf) {
        self.folder_input = path.to_string_lossy().into_owned();
        self.folder.set_path(path);
        if self.folder.snapshot().is_none() {
            self.log(None, format!("Folder not found: {}", self.folder_input));
        }
    }

    /// Stop mirroring the current folder.
    pub fn close_folder(&mut self) {
        self.folder.dispose();
    }

    pub fn toggle_expanded(&mut self, path: &Path) {
        let Some(expanded) = self
            .folder
            .snapshot()
            .and_then(|tree| tree.find(path))
            .map(|node| node.is_expanded)
        else {
            return;
        };
        self.folder.set_expanded(path, !expanded);
    }

    // ── Per-frame ────────────────────────────────────────────────────────

    /// Drain every mailbox. Returns `true` if anything visible changed.
    ///
    /// New cards are always logged; failures only when the status changes,
    /// so a list that stays misconfigured does not log on every tick.
    pub fn process_messages(&mut self) -> bool {
        let mut changed = false;
        let mut lines = Vec::new();

        for list in &mut self.lists {
            let before = list.controller.status().clone();
            for event in list.controller.process_messages() {
                changed = true;
                if let RefreshEvent::NewItems(n) = event {
                    let text = if n == 1 {
                        "1 new card".to_owned()
                    } else {
                        format!("{n} new cards")
                    };
                    lines.push((list.kind, text));
                }
            }
            let after = list.controller.status();
            if *after != before && !matches!(after, RefreshStatus::Loaded) {
                lines.push((list.kind, status_line(after)));
            }
        }
        for (kind, text) in lines {
            self.log(Some(kind), text);
        }

        if self.folder.process_messages() {
            changed = true;
        }
        changed
    }

    /// Append an activity line, evicting the oldest past the cap.
    pub fn log(&mut self, list: Option<ListKind>, text: String) {
        if self.activity.len() >= MAX_ACTIVITY_ENTRIES {
            self.activity.pop_front();
        }
        self.activity.push_back(ActivityEntry {
            at: Local::now(),
            list,
            text,
        });
    }
}

fn status_line(status: &RefreshStatus) -> String {
    match status {
        RefreshStatus::ConfigurationMissing => "Configuration missing".to_owned(),
        RefreshStatus::Error(msg) => format!("Refresh failed: {msg}"),
        other => other.to_string(),
    }
}

impl Drop for AppState {
    fn drop(&mut self) {
        self.stop_polling();
        self.folder.dispose();
    }
}
