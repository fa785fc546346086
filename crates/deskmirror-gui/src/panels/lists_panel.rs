/// Mirrored task lists, one collapsible section per list.
use crate::state::{AppState, ListView};
use crate::theme;
use chrono::Utc;
use egui::Ui;

/// Draw every list side by side in one scrollable column.
pub fn lists_panel(ui: &mut Ui, state: &AppState) {
    for list in &state.lists {
        list_section(ui, list);
        ui.add_space(6.0);
    }
}

fn list_section(ui: &mut Ui, list: &ListView) {
    let controller = &list.controller;
    let accent = theme::accent(list.accent);
    let header = egui::RichText::new(format!("{} ({})", list.kind.title(), controller.items().len()))
        .strong()
        .color(accent);

    egui::CollapsingHeader::new(header)
        .id_salt(list.kind.title())
        .default_open(true)
        .show(ui, |ui| {
            ui.horizontal(|ui| {
                ui.label(
                    egui::RichText::new(controller.status().to_string())
                        .size(11.0)
                        .color(theme::status_color(controller.status(), ui.visuals())),
                );
                if let Some(at) = controller.last_refreshed() {
                    ui.label(
                        egui::RichText::new(format!("updated {}", at.format("%H:%M:%S")))
                            .size(11.0)
                            .color(ui.visuals().weak_text_color()),
                    );
                }
            });

            if controller.items().is_empty() {
                ui.label(
                    egui::RichText::new("No cards")
                        .italics()
                        .color(ui.visuals().weak_text_color()),
                );
                return;
            }

            let now = Utc::now();
            for item in controller.items() {
                let name = if item.is_overdue(now) {
                    egui::RichText::new(&item.name).color(theme::ERROR)
                } else {
                    egui::RichText::new(&item.name)
                };
                let row = ui.label(name);
                let labels = item.labels_text();
                if !item.description.is_empty() || !labels.is_empty() {
                    row.on_hover_text(format!("{}\n{}", labels, item.description).trim().to_owned());
                }
            }
        });
}
