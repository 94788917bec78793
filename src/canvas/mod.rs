//! Raster surface, view transform and snapshot-based undo.
pub mod canvas;
pub mod history;
pub mod surface;
pub mod transform;
