//! DeskMirror — mirrors board lists and a working folder into a live view.
//!
//! Thin binary entry point. All logic lives in the `deskmirror-core`
//! and `deskmirror-gui` crates.
//!
//! Usage: `DeskMirror [FOLDER] [--config PATH]`. Settings are read from
//! `--config`, `$DESKMIRROR_CONFIG` or `deskmirror.json` in the working
//! directory.

#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

mod cli;

use clap::Parser;
use deskmirror_core::config::{ConfigStore, JsonConfigStore, MemoryConfigStore};
use std::sync::Arc;

fn main() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();

    // Initialise structured logging.
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    tracing::info!("DeskMirror starting");

    let config_path = cli.config.unwrap_or_else(JsonConfigStore::default_path);
    let config: Arc<dyn ConfigStore> = match JsonConfigStore::load(&config_path) {
        Ok(store) => Arc::new(store),
        Err(e) => {
            // Lists will report "configuration missing" until this is fixed.
            tracing::warn!("{e} -- continuing without settings");
            Arc::new(MemoryConfigStore::new())
        }
    };

    let state = deskmirror_gui::DeskMirrorState::build(config, cli.folder);
    let icon = deskmirror_gui::icon::generate_icon(64);

    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default()
            .with_title("DeskMirror")
            .with_inner_size([1200.0, 780.0])
            .with_min_inner_size([720.0, 480.0])
            .with_icon(icon),
        ..Default::default()
    };

    eframe::run_native(
        "DeskMirror",
        options,
        Box::new(|cc| {
            Ok(Box::new(deskmirror_gui::DeskMirrorApp::with_state(
                cc, state,
            )))
        }),
    )
    .map_err(|e| anyhow::anyhow!("eframe error: {e}"))?;

    Ok(())
}
