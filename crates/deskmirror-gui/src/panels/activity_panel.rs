/// Activity log -- new cards and refresh problems, newest first.
use crate::state::AppState;
use crate::theme;
use egui::Ui;

pub fn activity_panel(ui: &mut Ui, state: &mut AppState) {
    ui.horizontal(|ui| {
        ui.label(
            egui::RichText::new("Activity")
                .strong()
                .color(ui.visuals().hyperlink_color),
        );
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            if ui
                .button("🗑 Clear")
                .on_hover_text("Clear the activity log")
                .clicked()
            {
                state.activity.clear();
            }
        });
    });
    ui.separator();

    let weak = ui.visuals().weak_text_color();
    egui::ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui| {
            if state.activity.is_empty() {
                ui.label(egui::RichText::new("Nothing yet").color(weak));
            }
            for entry in state.activity.iter().rev() {
                ui.horizontal(|ui| {
                    ui.label(
                        egui::RichText::new(entry.at.format("%H:%M:%S").to_string())
                            .size(11.0)
                            .color(weak),
                    );
                    if let Some(kind) = entry.list {
                        let accent = state
                            .list(kind)
                            .map_or(weak, |l| theme::accent(l.accent));
                        ui.label(egui::RichText::new(kind.title()).size(11.0).color(accent));
                    }
                    ui.label(entry.text.as_str());
                });
            }
        });
}
