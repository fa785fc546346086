/// Main `eframe::App` implementation for DeskMirror.
///
/// This is the top-level UI layout that composes all panels and widgets.
/// Every frame it forwards the window focus to the broadcaster, drains the
/// background mailboxes and then renders.
use crate::panels;
use crate::state::AppState;
use crate::theme;
use crate::widgets;
use deskmirror_core::config::{self, ConfigStore};
use deskmirror_core::dispatch::Waker;
use parking_lot::Mutex;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

/// Fallback repaint cadence so relative timestamps stay fresh even when no
/// background message arrives.
const IDLE_REPAINT: Duration = Duration::from_secs(1);

/// Startup inputs, resolved before the window exists.
///
/// `build` only settles the config store and which folder to mirror.
/// The first folder walk and polling both start in
/// [`DeskMirrorApp::with_state`], once there is an egui context to wake.
pub struct DeskMirrorState {
    config: Arc<dyn ConfigStore>,
    initial_folder: Option<PathBuf>,
    repaint: RepaintSlot,
}

/// Filled with the egui context once the window exists. Background threads
/// that post before that simply do not wake anyone.
#[derive(Clone, Default)]
struct RepaintSlot(Arc<Mutex<Option<egui::Context>>>);

impl RepaintSlot {
    fn waker(&self) -> Waker {
        let slot = self.clone();
        Waker::new(move || {
            if let Some(ctx) = slot.0.lock().as_ref() {
                ctx.request_repaint();
            }
        })
    }

    fn attach(&self, ctx: &egui::Context) {
        *self.0.lock() = Some(ctx.clone());
    }
}

impl DeskMirrorState {
    /// Resolve the initial folder: the command-line argument wins, then the
    /// `folder.root` setting.
    pub fn build(config: Arc<dyn ConfigStore>, folder_arg: Option<PathBuf>) -> Self {
        let initial_folder = folder_arg.or_else(|| {
            config
                .get_non_empty(config::FOLDER_ROOT)
                .map(PathBuf::from)
        });
        Self {
            config,
            initial_folder,
            repaint: RepaintSlot::default(),
        }
    }
}

/// The DeskMirror application.
pub struct DeskMirrorApp {
    state: AppState,
}

impl DeskMirrorApp {
    /// Create the application from pre-built state.
    pub fn with_state(cc: &eframe::CreationContext<'_>, built: DeskMirrorState) -> Self {
        cc.egui_ctx.set_visuals(egui::Visuals::dark());
        built.repaint.attach(&cc.egui_ctx);

        let mut state = AppState::new(built.config, built.repaint.waker());
        if let Some(folder) = built.initial_folder {
            state.set_folder(folder);
        }
        state.start_polling();

        Self { state }
    }
}

impl eframe::App for DeskMirrorApp {
    fn clear_color(&self, visuals: &egui::Visuals) -> [f32; 4] {
        theme::clear_color(visuals)
    }

    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ── Apply theme ───────────────────────────────────────────────────
        if self.state.dark_mode {
            ctx.set_visuals(egui::Visuals::dark());
        } else {
            ctx.set_visuals(egui::Visuals::light());
        }

        // ── Focus and background messages ─────────────────────────────────
        let focused = ctx.input(|i| i.focused);
        self.state.on_focus_changed(focused);
        if self.state.process_messages() {
            // The per-frame budget may have left messages queued.
            ctx.request_repaint();
        }

        // Keep spinning while a fetch or folder rebuild is in flight;
        // otherwise the waker covers new messages and this covers the clock.
        if self.state.any_busy() || self.state.folder.is_rebuilding() {
            ctx.request_repaint_after(Duration::from_millis(100));
        } else {
            ctx.request_repaint_after(IDLE_REPAINT);
        }

        // ── Top toolbar ───────────────────────────────────────────────────
        egui::TopBottomPanel::top("toolbar")
            .min_height(36.0)
            .show(ctx, |ui| {
                ui.add_space(4.0);
                widgets::toolbar::toolbar(ui, &mut self.state);
                ui.add_space(4.0);
            });

        // ── About dialog ──────────────────────────────────────────────────
        let mut show_about = self.state.show_about;
        egui::Window::new("About DeskMirror")
            .open(&mut show_about)
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .fixed_size([320.0, 0.0])
            .show(ctx, |ui| {
                let muted = ui.visuals().weak_text_color();
                ui.vertical_centered(|ui| {
                    ui.add_space(8.0);
                    ui.label(
                        egui::RichText::new("DeskMirror")
                            .size(24.0)
                            .strong()
                            .color(ui.visuals().hyperlink_color),
                    );
                    ui.label(
                        egui::RichText::new(format!("v{}", env!("CARGO_PKG_VERSION")))
                            .size(13.0)
                            .color(muted),
                    );
                    ui.add_space(8.0);
                    ui.label("Mirrors your board lists and a working folder, live.");
                    ui.add_space(8.0);
                });
            });
        self.state.show_about = show_about;

        // ── Bottom status bar ─────────────────────────────────────────────
        egui::TopBottomPanel::bottom("status_bar")
            .min_height(24.0)
            .show(ctx, |ui| {
                ui.add_space(2.0);
                widgets::status_bar::status_bar(ui, &self.state);
                ui.add_space(2.0);
            });

        // ── Activity log ──────────────────────────────────────────────────
        egui::TopBottomPanel::bottom("activity_panel")
            .resizable(true)
            .default_height(140.0)
            .min_height(80.0)
            .max_height(400.0)
            .show(ctx, |ui| {
                panels::activity_panel::activity_panel(ui, &mut self.state);
            });

        // ── Lists sidebar ─────────────────────────────────────────────────
        egui::SidePanel::left("lists_panel")
            .default_width(380.0)
            .min_width(260.0)
            .resizable(true)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    panels::lists_panel::lists_panel(ui, &self.state);
                });
            });

        // ── Central panel (folder tree) ───────────────────────────────────
        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui| {
                    panels::folder_panel::folder_panel(ui, &mut self.state);
                });
        });
    }
}
