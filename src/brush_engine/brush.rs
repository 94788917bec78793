use crate::brush_engine::stroke::{DEFAULT_PRESSURE, Point};
use crate::utils::{color::Color, profiler::ScopeTimer, vector::Vec2};

pub const MIN_BASE_SIZE: f32 = 1.0;
pub const MAX_BASE_SIZE: f32 = 100.0;

/// Ruler strokes get one sample per this many canvas pixels.
const RULER_SAMPLE_SPACING: f32 = 10.0;

/// User-facing pen configuration applied to the next stroke.
#[derive(Clone, Debug, PartialEq)]
pub struct BrushSettings {
    pub color: Color,
    pub base_size: f32,
    /// Straight-line mode: the stroke is a line from the press point to the
    /// current pointer position.
    pub ruler: bool,
}

impl Default for BrushSettings {
    fn default() -> Self {
        Self {
            color: Color::black(),
            base_size: 5.0,
            ruler: false,
        }
    }
}

impl BrushSettings {
    pub fn set_base_size(&mut self, size: f32) {
        self.base_size = size.clamp(MIN_BASE_SIZE, MAX_BASE_SIZE);
    }
}

/// Clamp device pressure into [0, 1]; missing or zero readings fall back to
/// the default, matching mice that report no pressure at all.
pub fn normalize_pressure(raw: Option<f32>) -> f32 {
    match raw {
        Some(p) if p.is_finite() && p > 0.0 => p.min(1.0),
        _ => DEFAULT_PRESSURE,
    }
}

/// Evenly spaced samples on the segment `start..end`, at least two.
pub fn ruler_points(start: Vec2, end: Vec2, pressure: f32) -> Vec<Point> {
    let delta = end - start;
    let count = ((delta.length() / RULER_SAMPLE_SPACING).ceil() as usize).max(2);
    (0..count)
        .map(|i| {
            let t = i as f32 / (count - 1) as f32;
            Point::at(start + delta * t, pressure)
        })
        .collect()
}

/// Per-stroke capture state kept while the pointer is down.
pub struct StrokeState {
    pub last_pos: Option<Vec2>,
    ruler_anchor: Option<Vec2>,
    stroke_timer: Option<ScopeTimer>,
}

impl StrokeState {
    /// Create an empty stroke state and start the profiling timer.
    pub fn new(start: Vec2, ruler: bool) -> Self {
        Self {
            last_pos: Some(start),
            ruler_anchor: ruler.then_some(start),
            stroke_timer: Some(ScopeTimer::new("stroke")),
        }
    }

    pub fn ruler_anchor(&self) -> Option<Vec2> {
        self.ruler_anchor
    }

    /// Emit the stroke timing and forget the capture state.
    pub fn end(&mut self) {
        self.last_pos = None;
        self.ruler_anchor = None;
        self.stroke_timer.take();
    }
}
