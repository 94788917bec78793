pub mod animation;
pub mod app;
pub mod brush_engine;
pub mod canvas;
pub mod config;
pub mod document;
pub mod render;
pub mod sketch;
pub mod tablet;
pub mod ui;
pub mod utils;

pub use app::WigglePainterApp;
pub use config::Settings;
pub use sketch::Sketch;
