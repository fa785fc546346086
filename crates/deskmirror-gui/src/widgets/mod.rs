/// UI widgets for DeskMirror.

pub mod folder_tree;
pub mod status_bar;
pub mod toolbar;
