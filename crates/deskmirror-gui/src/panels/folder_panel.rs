/// Mirrored folder panel.
use crate::state::AppState;
use crate::widgets;
use egui::Ui;

/// Draw the folder tree, or a hint when nothing is mirrored.
pub fn folder_panel(ui: &mut Ui, state: &mut AppState) {
    let weak = ui.visuals().weak_text_color();

    let Some(snapshot) = state.folder.snapshot().cloned() else {
        let hint = match state.folder.path() {
            Some(path) => format!("{} does not exist yet.", path.display()),
            None => "Enter a folder path above and press Open.".to_owned(),
        };
        ui.label(egui::RichText::new(hint).color(weak));
        return;
    };

    ui.horizontal(|ui| {
        ui.label(egui::RichText::new(snapshot.display_name.as_str()).strong());
        ui.label(
            egui::RichText::new(format!(
                "{} folders, {} files",
                snapshot.dir_count(),
                snapshot.file_count()
            ))
            .size(11.0)
            .color(weak),
        );
    });
    ui.separator();

    // The Arc clone keeps this frame's tree alive while state is mutated.
    if let Some(path) = widgets::folder_tree::folder_tree(ui, &snapshot) {
        state.toggle_expanded(&path);
    }
}
