//! Folder watching — OS notifications, debounce, snapshot rebuilds.
pub mod coordinator;
mod debounce;
pub mod watcher;

pub use coordinator::FolderRootCoordinator;
pub use debounce::DEFAULT_DEBOUNCE;
pub use watcher::FileSystemTreeWatcher;
