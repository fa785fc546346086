/// DeskMirror GUI — egui-based desktop frontend.
///
/// This crate contains all UI code. Refresh orchestration lives in
/// `deskmirror-core`; this crate owns the consumer context that drains it.
pub mod app;
pub mod icon;
pub mod panels;
pub mod state;
pub mod theme;
pub mod widgets;

pub use app::{DeskMirrorApp, DeskMirrorState};
