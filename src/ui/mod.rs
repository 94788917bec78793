//! egui panels for files, the pen, the grid and playback.
pub mod animation_panel;
pub mod brush_settings;
pub mod files;
pub mod top_bar;
