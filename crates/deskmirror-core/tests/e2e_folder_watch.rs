/// End-to-end folder watching tests.
///
/// These run the real `notify` backend against temporary directories, so
/// every assertion that depends on an OS event waits with a generous
/// deadline instead of a fixed sleep.
use deskmirror_core::dispatch::Waker;
use deskmirror_core::model::TreeBuildOptions;
use deskmirror_core::watch::FolderRootCoordinator;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};
use tempfile::TempDir;

const WINDOW: Duration = Duration::from_millis(200);

// ── Helpers ──────────────────────────────────────────────────────────────────

fn coordinator() -> FolderRootCoordinator {
    FolderRootCoordinator::new(Waker::noop()).with_debounce(WINDOW)
}

fn touch(path: &Path) {
    fs::write(path, b"x").unwrap();
}

/// Act as the consumer until `done` holds, up to 30 seconds.
fn pump_until(
    coord: &mut FolderRootCoordinator,
    what: &str,
    mut done: impl FnMut(&FolderRootCoordinator) -> bool,
) {
    let deadline = Instant::now() + Duration::from_secs(30);
    loop {
        coord.process_messages();
        if done(coord) {
            return;
        }
        assert!(Instant::now() < deadline, "timed out waiting for {what}");
        thread::sleep(Duration::from_millis(10));
    }
}

fn pump_for(coord: &mut FolderRootCoordinator, span: Duration) {
    let until = Instant::now() + span;
    while Instant::now() < until {
        coord.process_messages();
        thread::sleep(Duration::from_millis(10));
    }
}

fn child_names(coord: &FolderRootCoordinator) -> Vec<String> {
    coord
        .snapshot()
        .map(|s| s.child_names().into_iter().map(str::to_owned).collect())
        .unwrap_or_default()
}

// ── Tests ────────────────────────────────────────────────────────────────────

#[test]
fn set_path_builds_sorted_snapshot() {
    let tmp = TempDir::new().unwrap();
    fs::create_dir(tmp.path().join("Zeta")).unwrap();
    fs::create_dir(tmp.path().join("alpha")).unwrap();
    touch(&tmp.path().join("b.png"));
    touch(&tmp.path().join("A.png"));
    touch(&tmp.path().join("alpha").join("inner.png"));

    let mut coord = coordinator();
    coord.set_path(tmp.path());

    assert!(coord.is_watching());
    assert_eq!(coord.rebuild_count(), 1);
    assert_eq!(child_names(&coord), ["alpha", "Zeta", "A.png", "b.png"]);
    let snapshot = coord.snapshot().unwrap();
    assert_eq!(snapshot.file_count(), 3);
    assert_eq!(snapshot.dir_count(), 2);
    assert!(snapshot.is_expanded);
}

#[test]
fn burst_inside_window_rebuilds_once() {
    let tmp = TempDir::new().unwrap();
    touch(&tmp.path().join("a.png"));
    touch(&tmp.path().join("b.png"));

    let mut coord = coordinator();
    coord.set_path(tmp.path());
    assert_eq!(child_names(&coord), ["a.png", "b.png"]);

    touch(&tmp.path().join("c.png"));
    fs::remove_file(tmp.path().join("a.png")).unwrap();

    pump_until(&mut coord, "debounced rebuild", |c| c.rebuild_count() == 2);
    pump_for(&mut coord, WINDOW * 3);

    assert_eq!(coord.rebuild_count(), 2);
    assert_eq!(child_names(&coord), ["b.png", "c.png"]);
}

#[test]
fn nested_changes_are_seen() {
    let tmp = TempDir::new().unwrap();
    let nested = tmp.path().join("photos").join("2024");
    fs::create_dir_all(&nested).unwrap();

    let mut coord = coordinator();
    coord.set_path(tmp.path());
    touch(&nested.join("shot.png"));

    pump_until(&mut coord, "nested rebuild", |c| {
        c.snapshot().is_some_and(|s| s.file_count() == 1)
    });
    let found = coord.snapshot().unwrap().find(&nested.join("shot.png"));
    assert!(found.is_some_and(|n| !n.is_directory));
}

#[test]
fn second_set_path_replaces_first_watch() {
    let first = TempDir::new().unwrap();
    let second = TempDir::new().unwrap();

    let mut coord = coordinator();
    coord.set_path(first.path());
    coord.set_path(second.path());

    assert_eq!(coord.watched_path(), Some(second.path()));
    assert_eq!(coord.path(), Some(second.path()));
    assert_eq!(coord.rebuild_count(), 2);

    // The first root is no longer observed.
    touch(&first.path().join("ignored.png"));
    pump_for(&mut coord, WINDOW * 3);
    assert_eq!(coord.rebuild_count(), 2);

    touch(&second.path().join("seen.png"));
    pump_until(&mut coord, "rebuild of second root", |c| c.rebuild_count() == 3);
    assert_eq!(child_names(&coord), ["seen.png"]);
}

#[test]
fn missing_path_has_no_snapshot_and_no_watcher() {
    let tmp = TempDir::new().unwrap();
    let missing = tmp.path().join("not-yet");

    let mut coord = coordinator();
    coord.set_path(&missing);

    assert!(coord.snapshot().is_none());
    assert!(!coord.is_watching());

    fs::create_dir(&missing).unwrap();
    touch(&missing.join("late.png"));
    pump_until(&mut coord, "root to appear", |c| {
        c.is_watching() && child_names(c) == ["late.png"]
    });
}

#[test]
fn deleted_root_clears_snapshot() {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path().join("root");
    fs::create_dir(&root).unwrap();
    touch(&root.join("a.png"));

    let mut coord = coordinator();
    coord.set_path(&root);
    assert!(coord.snapshot().is_some());

    fs::remove_dir_all(&root).unwrap();
    pump_until(&mut coord, "root removal", |c| {
        c.snapshot().is_none() && !c.is_watching()
    });

    fs::create_dir(&root).unwrap();
    pump_until(&mut coord, "root to come back", |c| {
        c.snapshot().is_some() && c.is_watching()
    });
}

#[test]
fn dispose_is_idempotent_and_silences_events() {
    let tmp = TempDir::new().unwrap();
    let mut coord = coordinator();
    coord.set_path(tmp.path());
    let rebuilds = coord.rebuild_count();

    coord.dispose();
    coord.dispose();
    assert!(coord.snapshot().is_none());
    assert!(!coord.is_watching());
    assert!(coord.path().is_none());

    touch(&tmp.path().join("after.png"));
    pump_for(&mut coord, WINDOW * 3);
    assert_eq!(coord.rebuild_count(), rebuilds);
    assert!(coord.snapshot().is_none());
}

#[test]
fn extension_filter_keeps_directories() {
    let tmp = TempDir::new().unwrap();
    fs::create_dir(tmp.path().join("sub")).unwrap();
    touch(&tmp.path().join("keep.PNG"));
    touch(&tmp.path().join("drop.txt"));
    touch(&tmp.path().join("desktop.ini"));

    let mut coord = FolderRootCoordinator::new(Waker::noop())
        .with_debounce(WINDOW)
        .with_options(TreeBuildOptions::with_extensions(["png", "jpg"]));
    coord.set_path(tmp.path());

    assert_eq!(child_names(&coord), ["sub", "keep.PNG"]);
}

#[test]
fn expanding_replaces_published_snapshot() {
    let tmp = TempDir::new().unwrap();
    let sub = tmp.path().join("sub");
    fs::create_dir(&sub).unwrap();

    let mut coord = coordinator();
    coord.set_path(tmp.path());
    let before = Arc::clone(coord.snapshot().unwrap());

    assert!(coord.set_expanded(&sub, false));
    assert!(before.find(&sub).unwrap().is_expanded);
    assert!(!coord.snapshot().unwrap().find(&sub).unwrap().is_expanded);
    assert!(!coord.set_expanded(&tmp.path().join("nope"), false));
}

#[test]
fn invalidation_rebuilds_off_the_consumer() {
    let tmp = TempDir::new().unwrap();
    for d in 0..20 {
        let dir = tmp.path().join(format!("dir{d:02}"));
        fs::create_dir(&dir).unwrap();
        for f in 0..20 {
            touch(&dir.join(format!("f{f:02}.png")));
        }
    }

    let mut coord = coordinator();
    coord.set_path(tmp.path());
    let before = Arc::clone(coord.snapshot().unwrap());
    touch(&tmp.path().join("new.png"));

    // The call that drains the invalidation only hands the walk to a
    // worker; the tree it publishes is still the old one.
    let deadline = Instant::now() + Duration::from_secs(30);
    while !coord.is_rebuilding() {
        coord.process_messages();
        assert!(Instant::now() < deadline, "timed out waiting for rebuild worker");
        thread::sleep(Duration::from_millis(10));
    }
    assert_eq!(coord.rebuild_count(), 1);
    assert!(Arc::ptr_eq(coord.snapshot().unwrap(), &before));

    pump_until(&mut coord, "worker rebuild to land", |c| c.rebuild_count() == 2);
    assert!(!coord.is_rebuilding());
    assert_eq!(coord.snapshot().unwrap().file_count(), 401);
}

#[test]
fn rebuild_for_replaced_root_is_dropped() {
    let first = TempDir::new().unwrap();
    let second = TempDir::new().unwrap();
    touch(&second.path().join("second.png"));

    let mut coord = coordinator();
    coord.set_path(first.path());
    touch(&first.path().join("first.png"));

    let deadline = Instant::now() + Duration::from_secs(30);
    while !coord.is_rebuilding() {
        coord.process_messages();
        assert!(Instant::now() < deadline, "timed out waiting for rebuild worker");
        thread::sleep(Duration::from_millis(10));
    }

    coord.set_path(second.path());
    assert!(!coord.is_rebuilding());
    pump_for(&mut coord, WINDOW * 3);

    assert_eq!(coord.rebuild_count(), 2);
    assert_eq!(child_names(&coord), ["second.png"]);
}
