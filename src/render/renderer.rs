use crate::brush_engine::stroke::{Point, Stroke};
use crate::canvas::surface::{DrawingSurface, LineStyle};
use crate::render::grid::{self, GridSettings};
use crate::utils::profiler::ScopeTimer;

/// Width and color of the segment ending at `trailing`: pressure widens the
/// line and makes it more opaque.
pub fn segment_style(stroke: &Stroke, trailing: &Point) -> LineStyle {
    LineStyle {
        width: stroke.base_size() * (trailing.pressure * 2.0),
        color: stroke.color().with_alpha((trailing.pressure * 1.5).min(1.0)),
    }
}

/// Draw the displayed geometry of one stroke, one segment per point pair.
pub fn render_stroke<S: DrawingSurface>(surface: &mut S, stroke: &Stroke) {
    for pair in stroke.points().windows(2) {
        let (prev, point) = (&pair[0], &pair[1]);
        surface.stroke_segment(prev.pos(), point.pos(), &segment_style(stroke, point));
    }
}

/// Scene renderer. Owns the overlay settings so callers never need to know
/// whether a grid is active.
#[derive(Clone, Debug, Default)]
pub struct Renderer {
    pub grid: GridSettings,
}

impl Renderer {
    pub fn new(grid: GridSettings) -> Self {
        Self { grid }
    }

    /// Clear and draw `strokes` in order, later strokes on top. No overlay.
    pub fn render_strokes<S: DrawingSurface>(&self, surface: &mut S, strokes: &[Stroke]) {
        let _timer = ScopeTimer::new("render_strokes");
        surface.clear();
        for stroke in strokes {
            render_stroke(surface, stroke);
        }
    }

    /// Full redraw: strokes then the grid overlay.
    pub fn render_all<S: DrawingSurface>(&self, surface: &mut S, strokes: &[Stroke]) {
        self.render_strokes(surface, strokes);
        self.render_overlay(surface);
    }

    pub fn render_overlay<S: DrawingSurface>(&self, surface: &mut S) {
        grid::draw_grid(surface, &self.grid);
    }

    /// Incremental preview while drawing: only the newest segment.
    pub fn render_live_segment<S: DrawingSurface>(&self, surface: &mut S, stroke: &Stroke) {
        if let [.., prev, point] = stroke.points() {
            surface.stroke_segment(prev.pos(), point.pos(), &segment_style(stroke, point));
        }
    }
}
