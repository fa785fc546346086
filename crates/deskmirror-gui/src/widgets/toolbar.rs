/// Top action bar -- refresh, folder picker, theme toggle and branding.
use crate::state::AppState;
use egui::Ui;
use std::path::PathBuf;

/// Draw the toolbar.
pub fn toolbar(ui: &mut Ui, state: &mut AppState) {
    ui.horizontal(|ui| {
        ui.label(
            egui::RichText::new("DeskMirror")
                .size(18.0)
                .strong()
                .color(ui.visuals().hyperlink_color),
        );

        ui.separator();

        // Busy lists skip the manual refresh anyway; disabling says so.
        let busy = state.any_busy();
        if ui
            .add_enabled(!busy, egui::Button::new("🔄 Refresh"))
            .on_hover_text(if busy {
                "A refresh is already running"
            } else {
                "Refresh every list now"
            })
            .clicked()
        {
            state.refresh_all();
        }

        ui.separator();

        ui.label("Folder:");
        let edit = ui.add(
            egui::TextEdit::singleline(&mut state.folder_input)
                .hint_text("Path to mirror")
                .desired_width(320.0),
        );
        let submitted = edit.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
        let can_open = !state.folder_input.trim().is_empty();
        let open_clicked = ui
            .add_enabled(can_open, egui::Button::new("📂 Open"))
            .clicked();
        if can_open && (submitted || open_clicked) {
            let path = PathBuf::from(state.folder_input.trim());
            state.set_folder(path);
        }

        if state.folder.path().is_some() && ui.button("✖").on_hover_text("Stop mirroring").clicked()
        {
            state.close_folder();
        }

        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            if ui.button("ℹ").on_hover_text("About DeskMirror").clicked() {
                state.show_about = true;
            }

            let theme_label = if state.dark_mode { "☀" } else { "🌙" };
            let theme_tip = if state.dark_mode {
                "Switch to light mode"
            } else {
                "Switch to dark mode"
            };
            if ui.button(theme_label).on_hover_text(theme_tip).clicked() {
                state.dark_mode = !state.dark_mode;
            }
        });
    });
}
