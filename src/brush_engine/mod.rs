//! Stroke capture: pen settings, sampled geometry and the stroke history.
pub mod brush;
pub mod store;
pub mod stroke;
