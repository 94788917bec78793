//! Stroke and grid rendering against any [`crate::canvas::surface::DrawingSurface`].
pub mod grid;
pub mod renderer;
