/// Bottom status bar -- per-list status and folder watch state.
use crate::state::AppState;
use crate::theme;
use deskmirror_core::poll::ControllerState;
use egui::Ui;

/// Draw the status bar at the bottom of the window.
pub fn status_bar(ui: &mut Ui, state: &AppState) {
    let color_weak = ui.visuals().weak_text_color();
    let color_normal = ui.visuals().text_color();

    ui.horizontal(|ui| {
        for list in &state.lists {
            let controller = &list.controller;
            if controller.is_busy() {
                ui.spinner();
            }
            ui.label(
                egui::RichText::new(list.kind.title())
                    .size(12.0)
                    .strong()
                    .color(theme::accent(list.accent)),
            );
            ui.label(
                egui::RichText::new(controller.status().to_string())
                    .size(12.0)
                    .color(theme::status_color(controller.status(), ui.visuals())),
            );
            if controller.state() == ControllerState::Paused {
                ui.label(egui::RichText::new("(paused)").size(11.0).color(color_weak));
            }
            ui.separator();
        }

        match (state.folder.path(), state.folder.is_watching()) {
            (Some(path), true) => {
                ui.label(
                    egui::RichText::new(format!("Watching {}", truncate_path(&path.to_string_lossy(), 50)))
                        .size(12.0)
                        .color(color_normal),
                );
            }
            (Some(path), false) => {
                ui.label(
                    egui::RichText::new(format!(
                        "Waiting for {}",
                        truncate_path(&path.to_string_lossy(), 50)
                    ))
                    .size(12.0)
                    .color(theme::WARNING),
                );
            }
            (None, _) => {
                ui.label(egui::RichText::new("No folder").size(12.0).color(color_weak));
            }
        }
    });
}

/// Truncate a path string to at most `max_len` characters, replacing the
/// middle with "..." if needed.
fn truncate_path(path: &str, max_len: usize) -> String {
    let chars: Vec<char> = path.chars().collect();
    if chars.len() <= max_len {
        return path.to_string();
    }
    let half = (max_len - 3) / 2;
    let head: String = chars[..half].iter().collect();
    let tail: String = chars[chars.len() - half..].iter().collect();
    format!("{head}...{tail}")
}
