/// Panels composed by the main window.

pub mod activity_panel;
pub mod folder_panel;
pub mod lists_panel;
