//! Immutable folder tree snapshot.
//!
//! A snapshot is built in one synchronous walk and published whole; the
//! coordinator swaps an `Arc<FolderTreeSnapshot>` rather than editing the
//! tree it already handed to the consumer. UI-facing edits such as
//! expanding a node go through [`FolderTreeSnapshot::with_expanded`], which
//! returns a new tree.
//!
//! # Ordering
//!
//! Directories first, then files. Within each group names compare
//! case-insensitively, with a case-sensitive tie-break so the order is
//! total and identical on every platform.
use compact_str::CompactString;
use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::debug;

/// OS clutter that never appears in a snapshot (compared lowercase).
pub const IGNORED_FILE_NAMES: &[&str] = &["desktop.ini", "thumbs.db", ".ds_store"];

/// One node of a folder snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FolderTreeSnapshot {
    /// Absolute path; unique within one snapshot.
    pub path: PathBuf,
    /// File or directory name only. Drive roots fall back to the full path.
    pub display_name: CompactString,
    pub is_directory: bool,
    /// Ordered children. Always empty for files.
    pub children: Vec<FolderTreeSnapshot>,
    /// UI expansion state; `true` for freshly built nodes.
    pub is_expanded: bool,
}

/// Filters applied while walking.
#[derive(Debug, Clone, Default)]
pub struct TreeBuildOptions {
    /// Lowercase extensions without the dot. `None` keeps every file.
    /// Directories are never filtered.
    pub allowed_extensions: Option<HashSet<String>>,
}

impl TreeBuildOptions {
    /// Keep only files whose extension is in `extensions`.
    ///
    /// Accepts `"png"`, `".png"` or `"PNG"` alike.
    pub fn with_extensions<I, S>(extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let set: HashSet<String> = extensions
            .into_iter()
            .map(|e| e.as_ref().trim_start_matches('.').to_ascii_lowercase())
            .filter(|e| !e.is_empty())
            .collect();
        Self {
            allowed_extensions: (!set.is_empty()).then_some(set),
        }
    }

    fn accepts_file(&self, path: &Path) -> bool {
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            return false;
        };
        let lower = name.to_ascii_lowercase();
        if IGNORED_FILE_NAMES.contains(&lower.as_str()) {
            return false;
        }
        match &self.allowed_extensions {
            None => true,
            Some(allowed) => path
                .extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| allowed.contains(&e.to_ascii_lowercase())),
        }
    }
}

impl FolderTreeSnapshot {
    fn new(path: PathBuf, is_directory: bool) -> Self {
        let display_name = display_name(&path);
        Self {
            path,
            display_name,
            is_directory,
            children: Vec::new(),
            is_expanded: true,
        }
    }

    /// Find the node at `path` anywhere in this tree.
    pub fn find(&self, path: &Path) -> Option<&FolderTreeSnapshot> {
        if self.path == path {
            return Some(self);
        }
        if !path.starts_with(&self.path) {
            return None;
        }
        self.children.iter().find_map(|c| c.find(path))
    }

    /// Display names of the direct children, in order.
    pub fn child_names(&self) -> Vec<&str> {
        self.children.iter().map(|c| c.display_name.as_str()).collect()
    }

    /// Number of descendant files.
    pub fn file_count(&self) -> usize {
        self.children
            .iter()
            .map(|c| if c.is_directory { c.file_count() } else { 1 })
            .sum()
    }

    /// Number of descendant directories (excluding `self`).
    pub fn dir_count(&self) -> usize {
        self.children
            .iter()
            .filter(|c| c.is_directory)
            .map(|c| 1 + c.dir_count())
            .sum()
    }

    /// A copy of this tree with the node at `path` expanded or collapsed.
    ///
    /// Returns `None` if no node has that path.
    pub fn with_expanded(&self, path: &Path, expanded: bool) -> Option<FolderTreeSnapshot> {
        let mut copy = self.clone();
        copy.set_expanded_in_place(path, expanded).then_some(copy)
    }

    fn set_expanded_in_place(&mut self, path: &Path, expanded: bool) -> bool {
        if self.path == path {
            self.is_expanded = expanded;
            return true;
        }
        if !path.starts_with(&self.path) {
            return false;
        }
        self.children
            .iter_mut()
            .any(|c| c.set_expanded_in_place(path, expanded))
    }
}

/// Walk `root` and build a complete snapshot.
///
/// Returns `None` when `root` does not exist or is not a directory.
/// Entries that cannot be read (permission denied, removed mid-walk) are
/// skipped.
pub fn build_snapshot(root: &Path, options: &TreeBuildOptions) -> Option<FolderTreeSnapshot> {
    if !root.is_dir() {
        debug!("Snapshot: {} is not a directory", root.display());
        return None;
    }

    let start = Instant::now();

    // Parent path -> (child path, is_dir), filled in a single walk and then
    // assembled top-down so no node is published half-built.
    let mut children_of: HashMap<PathBuf, Vec<(PathBuf, bool)>> = HashMap::new();
    let mut skipped = 0usize;

    let walker = jwalk::WalkDir::new(root)
        .skip_hidden(false)
        .follow_links(false)
        .parallelism(jwalk::Parallelism::Serial);

    for entry_result in walker {
        let entry = match entry_result {
            Ok(e) => e,
            Err(err) => {
                skipped += 1;
                debug!("Snapshot: skipping unreadable entry: {}", err);
                continue;
            }
        };
        if entry.depth == 0 {
            continue;
        }

        let path = entry.path();
        let is_dir = entry.file_type().is_dir();
        if !is_dir && !options.accepts_file(&path) {
            continue;
        }
        let Some(parent) = path.parent().map(Path::to_path_buf) else {
            continue;
        };
        children_of.entry(parent).or_default().push((path, is_dir));
    }

    let tree = assemble(root.to_path_buf(), true, &mut children_of);
    debug!(
        "Snapshot: built {} ({} files, {} dirs, {} skipped) in {:?}",
        root.display(),
        tree.file_count(),
        tree.dir_count(),
        skipped,
        start.elapsed()
    );
    Some(tree)
}

fn assemble(
    path: PathBuf,
    is_dir: bool,
    children_of: &mut HashMap<PathBuf, Vec<(PathBuf, bool)>>,
) -> FolderTreeSnapshot {
    let mut node = FolderTreeSnapshot::new(path, is_dir);
    if !is_dir {
        return node;
    }
    let entries = children_of.remove(&node.path).unwrap_or_default();
    node.children = entries
        .into_iter()
        .map(|(child, child_is_dir)| assemble(child, child_is_dir, children_of))
        .collect();
    node.children.sort_by(compare_nodes);
    node
}

/// Directories first, then case-insensitive name, then exact name.
pub fn compare_nodes(a: &FolderTreeSnapshot, b: &FolderTreeSnapshot) -> Ordering {
    b.is_directory
        .cmp(&a.is_directory)
        .then_with(|| {
            a.display_name
                .to_lowercase()
                .cmp(&b.display_name.to_lowercase())
        })
        .then_with(|| a.display_name.cmp(&b.display_name))
}

fn display_name(path: &Path) -> CompactString {
    match path.file_name() {
        Some(name) => CompactString::new(name.to_string_lossy()),
        // Drive or filesystem root.
        None => CompactString::new(path.to_string_lossy()),
    }
}
