//! Data model: folder snapshots, task items and the list-kind table.
pub mod folder_tree;
pub mod list_kind;
pub mod task_item;

pub use folder_tree::{build_snapshot, FolderTreeSnapshot, TreeBuildOptions};
pub use list_kind::{parse_hex_color, ListKind, ListSettings};
pub use task_item::TaskItem;
