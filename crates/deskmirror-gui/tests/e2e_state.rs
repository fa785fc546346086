/// End-to-end tests for `AppState` — the GUI's consumer context.
///
/// These exercise the real controllers, board-export sources and folder
/// coordinator without spinning up an egui window. The test thread plays
/// the UI thread: it calls `process_messages()` in a loop.
use deskmirror_core::config::{MemoryConfigStore, API_KEY, API_TOKEN, POLL_INTERVAL_SECS};
use deskmirror_core::dispatch::Waker;
use deskmirror_core::model::ListKind;
use deskmirror_core::poll::{ControllerState, RefreshStatus};
use deskmirror_gui::state::{AppState, MAX_ACTIVITY_ENTRIES};
use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};
use tempfile::TempDir;

// ── Helpers ───────────────────────────────────────────────────────────────────

fn write_export(path: &Path, count: usize) {
    let items: Vec<String> = (0..count)
        .map(|i| format!(r#"{{ "id": "{i}", "name": "card {i}" }}"#))
        .collect();
    fs::write(path, format!("[{}]", items.join(","))).unwrap();
}

/// Credentials plus an export for the Editing list only. Polling is slowed
/// down so only explicit refreshes run during a test.
fn editing_only_config(export: &Path) -> Arc<MemoryConfigStore> {
    Arc::new(
        MemoryConfigStore::new()
            .with(API_KEY, "key")
            .with(API_TOKEN, "token")
            .with(POLL_INTERVAL_SECS, "3600")
            .with(
                ListKind::Editing.settings().list_id_key,
                &export.to_string_lossy(),
            )
            .with(ListKind::Late.settings().accent_color_key, "#102030"),
    )
}

fn pump_until(state: &mut AppState, what: &str, mut done: impl FnMut(&AppState) -> bool) {
    let deadline = Instant::now() + Duration::from_secs(30);
    loop {
        state.process_messages();
        if done(state) {
            return;
        }
        assert!(Instant::now() < deadline, "timed out waiting for {what}");
        thread::sleep(Duration::from_millis(10));
    }
}

fn status(state: &AppState, kind: ListKind) -> RefreshStatus {
    state.list(kind).unwrap().controller.status().clone()
}

fn activity_texts(state: &AppState) -> Vec<String> {
    state.activity.iter().map(|e| e.text.clone()).collect()
}

// ── Construction ──────────────────────────────────────────────────────────────

#[test]
fn one_list_per_kind_with_configured_accents() {
    let tmp = TempDir::new().unwrap();
    let state = AppState::new(
        editing_only_config(&tmp.path().join("editing.json")),
        Waker::noop(),
    );

    assert_eq!(state.lists.len(), ListKind::ALL.len());
    assert_eq!(state.poll_interval, Duration::from_secs(3600));
    assert_eq!(state.list(ListKind::Late).unwrap().accent, [0x10, 0x20, 0x30]);
    assert_eq!(
        state.list(ListKind::Editing).unwrap().accent,
        ListKind::Editing.settings().default_accent
    );
    assert!(state
        .lists
        .iter()
        .all(|l| l.controller.state() == ControllerState::Idle));
}

// ── Polling ───────────────────────────────────────────────────────────────────

#[test]
fn start_polling_loads_configured_list_and_flags_the_rest() {
    let tmp = TempDir::new().unwrap();
    let export = tmp.path().join("editing.json");
    write_export(&export, 2);

    let mut state = AppState::new(editing_only_config(&export), Waker::noop());
    state.start_polling();
    pump_until(&mut state, "all lists to settle", |s| !s.any_busy());

    assert_eq!(status(&state, ListKind::Editing), RefreshStatus::Loaded);
    assert_eq!(state.list(ListKind::Editing).unwrap().controller.items().len(), 2);
    assert_eq!(
        status(&state, ListKind::Revision),
        RefreshStatus::ConfigurationMissing
    );
    assert_eq!(status(&state, ListKind::Late), RefreshStatus::ConfigurationMissing);

    let texts = activity_texts(&state);
    assert_eq!(
        texts.iter().filter(|t| *t == "Configuration missing").count(),
        2
    );

    // A repeat of the same failure is not logged again.
    state.refresh_all();
    pump_until(&mut state, "second refresh", |s| !s.any_busy());
    assert_eq!(activity_texts(&state).len(), texts.len());
}

#[test]
fn growing_export_logs_new_cards() {
    let tmp = TempDir::new().unwrap();
    let export = tmp.path().join("editing.json");
    write_export(&export, 1);

    let mut state = AppState::new(editing_only_config(&export), Waker::noop());
    state.start_polling();
    pump_until(&mut state, "first load", |s| !s.any_busy());

    write_export(&export, 4);
    state.refresh_all();
    pump_until(&mut state, "second load", |s| {
        s.list(ListKind::Editing).unwrap().controller.items().len() == 4
    });

    let last = state.activity.back().unwrap();
    assert_eq!(last.list, Some(ListKind::Editing));
    assert_eq!(last.text, "3 new cards");
}

#[test]
fn process_messages_reports_visible_changes() {
    let tmp = TempDir::new().unwrap();
    let export = tmp.path().join("editing.json");
    write_export(&export, 2);

    let mut state = AppState::new(editing_only_config(&export), Waker::noop());
    state.start_polling();

    let deadline = Instant::now() + Duration::from_secs(30);
    let mut changed = false;
    while state.any_busy() {
        changed |= state.process_messages();
        assert!(Instant::now() < deadline, "timed out waiting for first load");
        thread::sleep(Duration::from_millis(10));
    }
    changed |= state.process_messages();
    assert!(changed);

    // Nothing queued: the frame has nothing new to show.
    assert!(!state.process_messages());
}

#[test]
fn focus_loss_pauses_every_list() {
    let tmp = TempDir::new().unwrap();
    let mut state = AppState::new(
        editing_only_config(&tmp.path().join("editing.json")),
        Waker::noop(),
    );
    state.start_polling();
    pump_until(&mut state, "initial refresh", |s| !s.any_busy());

    state.on_focus_changed(false);
    pump_until(&mut state, "pause", |s| {
        s.lists
            .iter()
            .all(|l| l.controller.state() == ControllerState::Paused)
    });

    state.on_focus_changed(true);
    pump_until(&mut state, "resume", |s| {
        s.lists
            .iter()
            .all(|l| l.controller.state() == ControllerState::Running)
    });

    state.stop_polling();
    assert_eq!(state.focus.subscriber_count(), 0);
}

// ── Folder ────────────────────────────────────────────────────────────────────

#[test]
fn set_folder_publishes_snapshot_and_toggles_expansion() {
    let tmp = TempDir::new().unwrap();
    let sub = tmp.path().join("sub");
    fs::create_dir(&sub).unwrap();
    fs::write(sub.join("a.png"), b"x").unwrap();

    let mut state = AppState::new(
        editing_only_config(&tmp.path().join("editing.json")),
        Waker::noop(),
    );
    state.set_folder(tmp.path().to_path_buf());

    assert!(state.folder.is_watching());
    assert_eq!(state.folder_input, tmp.path().to_string_lossy());
    let snapshot = state.folder.snapshot().unwrap();
    assert!(snapshot.find(&sub).unwrap().is_expanded);

    state.toggle_expanded(&sub);
    assert!(!state.folder.snapshot().unwrap().find(&sub).unwrap().is_expanded);

    state.close_folder();
    assert!(state.folder.snapshot().is_none());
    assert!(!state.folder.is_watching());
}

#[test]
fn missing_folder_is_logged() {
    let tmp = TempDir::new().unwrap();
    let mut state = AppState::new(
        editing_only_config(&tmp.path().join("editing.json")),
        Waker::noop(),
    );
    state.set_folder(tmp.path().join("missing"));

    assert!(state.folder.snapshot().is_none());
    assert!(activity_texts(&state)[0].starts_with("Folder not found"));
}

// ── Activity log ──────────────────────────────────────────────────────────────

#[test]
fn activity_log_is_capped() {
    let tmp = TempDir::new().unwrap();
    let mut state = AppState::new(
        editing_only_config(&tmp.path().join("editing.json")),
        Waker::noop(),
    );
    for i in 0..MAX_ACTIVITY_ENTRIES + 25 {
        state.log(None, format!("line {i}"));
    }
    assert_eq!(state.activity.len(), MAX_ACTIVITY_ENTRIES);
    assert_eq!(state.activity.front().unwrap().text, "line 25");
}
