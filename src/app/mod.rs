pub mod input_handler;
pub mod painter;
pub mod render_helper;
pub mod state;

pub use painter::WigglePainterApp;
