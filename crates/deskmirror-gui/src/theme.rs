/// Colours shared by the panels.
///
/// Status colours are fixed across dark and light mode; everything else
/// comes from `ui.visuals()` so it follows the active theme.
use deskmirror_core::poll::RefreshStatus;
use egui::{Color32, Visuals};

pub const SUCCESS: Color32 = Color32::from_rgb(0xa6, 0xe3, 0xa1);
pub const WARNING: Color32 = Color32::from_rgb(0xfa, 0xb3, 0x87);
pub const ERROR: Color32 = Color32::from_rgb(0xf3, 0x8b, 0xa8);
pub const FOLDER_ICON: Color32 = Color32::from_rgb(0xf9, 0xe2, 0xaf);

/// A list's configured accent as an egui colour.
pub fn accent(rgb: [u8; 3]) -> Color32 {
    Color32::from_rgb(rgb[0], rgb[1], rgb[2])
}

/// Colour for a refresh status label.
pub fn status_color(status: &RefreshStatus, visuals: &Visuals) -> Color32 {
    match status {
        RefreshStatus::NotLoaded => visuals.weak_text_color(),
        RefreshStatus::Loaded => SUCCESS,
        RefreshStatus::ConfigurationMissing => WARNING,
        RefreshStatus::Error(_) => ERROR,
    }
}

/// GPU clear colour matching the panel background, so there is no flash
/// between frames.
pub fn clear_color(visuals: &Visuals) -> [f32; 4] {
    let [r, g, b, a] = visuals.panel_fill.to_array();
    [
        r as f32 / 255.0,
        g as f32 / 255.0,
        b as f32 / 255.0,
        a as f32 / 255.0,
    ]
}
