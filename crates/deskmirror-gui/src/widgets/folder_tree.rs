/// Folder tree widget.
///
/// Renders a `FolderTreeSnapshot` as indented rows. Clicking a directory row
/// toggles it; the toggle is returned instead of applied so the caller can
/// mutate state after the snapshot borrow ends.
use crate::theme;
use deskmirror_core::model::FolderTreeSnapshot;
use egui::Ui;
use std::path::PathBuf;

/// Indentation per depth level in pixels.
const INDENT_PX: f32 = 16.0;

/// Draw `root` and its expanded descendants. Returns the directory the user
/// clicked, if any.
pub fn folder_tree(ui: &mut Ui, root: &FolderTreeSnapshot) -> Option<PathBuf> {
    let mut toggled = None;
    for child in &root.children {
        render_node(ui, child, 0, &mut toggled);
    }
    if root.children.is_empty() {
        ui.label(egui::RichText::new("(empty)").color(ui.visuals().weak_text_color()));
    }
    toggled
}

fn render_node(ui: &mut Ui, node: &FolderTreeSnapshot, depth: usize, toggled: &mut Option<PathBuf>) {
    ui.horizontal(|ui| {
        ui.add_space(depth as f32 * INDENT_PX);
        if node.is_directory {
            let arrow = if node.is_expanded { "▼" } else { "▶" };
            let text = egui::RichText::new(format!("{arrow} 📁 {}", node.display_name))
                .color(theme::FOLDER_ICON);
            if ui
                .add(egui::Label::new(text).sense(egui::Sense::click()))
                .clicked()
            {
                *toggled = Some(node.path.clone());
            }
        } else {
            ui.label(format!("   📄 {}", node.display_name));
        }
    });

    if node.is_directory && node.is_expanded {
        for child in &node.children {
            render_node(ui, child, depth + 1, toggled);
        }
    }
}
