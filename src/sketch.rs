//! The drawing session: every piece of mutable state the front end touches,
//! owned in one place and driven through a handful of operations.

use std::path::Path;
use std::time::{Duration, Instant};

use crate::animation::{
    AnimationEngine, StepDirection, TickOutcome, TimelapseStepping, jitter::Jitter,
};
use crate::brush_engine::brush::{BrushSettings, StrokeState, normalize_pressure, ruler_points};
use crate::brush_engine::store::StrokeStore;
use crate::brush_engine::stroke::Point;
use crate::canvas::history::UndoManager;
use crate::canvas::surface::DrawingSurface;
use crate::canvas::transform::ViewTransform;
use crate::config::Settings;
use crate::document::{Document, DocumentError};
use crate::render::grid::GridSettings;
use crate::render::renderer::Renderer;
use crate::utils::vector::Vec2;

pub struct Sketch<S: DrawingSurface> {
    surface: S,
    store: StrokeStore,
    view: ViewTransform,
    undo: UndoManager<S::Snapshot>,
    animation: AnimationEngine,
    renderer: Renderer,
    capture: Option<StrokeState>,
    auto_wiggle: bool,
    pub brush: BrushSettings,
}

impl<S: DrawingSurface> Sketch<S> {
    pub fn new(surface: S, settings: &Settings) -> Self {
        let animation = AnimationEngine::new(settings.frame_ms, settings.wiggle_amount);
        Self::with_animation(surface, settings, animation)
    }

    /// Like [`Sketch::new`] with a fixed jitter seed.
    pub fn seeded(surface: S, settings: &Settings, seed: u64) -> Self {
        let animation =
            AnimationEngine::with_jitter(settings.frame_ms, settings.wiggle_amount, Jitter::seeded(seed));
        Self::with_animation(surface, settings, animation)
    }

    fn with_animation(surface: S, settings: &Settings, animation: AnimationEngine) -> Self {
        let view = ViewTransform::new(surface.width() as f32, surface.height() as f32);
        let mut sketch = Self {
            surface,
            store: StrokeStore::new(),
            view,
            undo: UndoManager::with_limit(settings.history_limit),
            animation,
            renderer: Renderer::new(settings.grid),
            capture: None,
            auto_wiggle: settings.auto_wiggle,
            brush: settings.brush.clone(),
        };
        sketch.reset_history();
        sketch
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn strokes(&self) -> &StrokeStore {
        &self.store
    }

    pub fn view(&self) -> &ViewTransform {
        &self.view
    }

    pub fn animation(&self) -> &AnimationEngine {
        &self.animation
    }

    pub fn undo_history(&self) -> &UndoManager<S::Snapshot> {
        &self.undo
    }

    pub fn grid(&self) -> &GridSettings {
        &self.renderer.grid
    }

    pub fn is_drawing(&self) -> bool {
        self.capture.is_some()
    }

    pub fn auto_wiggle(&self) -> bool {
        self.auto_wiggle
    }

    pub fn set_auto_wiggle(&mut self, on: bool) {
        self.auto_wiggle = on;
    }

    pub fn set_frame_ms(&mut self, ms: u64) {
        self.animation.set_frame_ms(ms);
    }

    pub fn set_wiggle_amount(&mut self, amount: f32) {
        self.animation.set_wiggle_amount(amount);
    }

    pub fn set_grid(&mut self, grid: GridSettings) {
        if self.renderer.grid != grid {
            self.renderer.grid = grid;
            self.render_all();
        }
    }

    pub fn canvas_size(&self) -> (f32, f32) {
        (self.surface.width() as f32, self.surface.height() as f32)
    }

    /// Redraw strokes without the overlay, capture the undo entry, then put
    /// the overlay back on top.
    fn snapshot_strokes(&mut self) {
        self.renderer.render_strokes(&mut self.surface, self.store.strokes());
        self.undo.snapshot(&self.surface);
        self.renderer.render_overlay(&mut self.surface);
    }

    /// Empty the undo stack and seed it with the current raster.
    fn reset_history(&mut self) {
        self.undo.clear();
        self.snapshot_strokes();
    }

    // --- drawing ---

    /// Press at `local`, a pointer position relative to the displayed canvas.
    pub fn begin_stroke(&mut self, local: Vec2, pressure: Option<f32>) -> bool {
        if self.capture.is_some() {
            log::debug!("begin_stroke ignored: already drawing");
            return false;
        }
        if self.animation.state().is_timelapsing() {
            log::debug!("begin_stroke ignored during time-lapse");
            return false;
        }
        let pos = self.view.to_canvas_space(local);
        if !self.store.begin_stroke(self.brush.color, self.brush.base_size) {
            return false;
        }
        self.store.append_point(Point::at(pos, normalize_pressure(pressure)));
        self.capture = Some(StrokeState::new(pos, self.brush.ruler));
        true
    }

    pub fn append_point(&mut self, local: Vec2, pressure: Option<f32>) -> bool {
        let pos = self.view.to_canvas_space(local);
        let pressure = normalize_pressure(pressure);
        let Some(capture) = self.capture.as_mut() else {
            return false;
        };
        if capture.last_pos == Some(pos) {
            return false;
        }
        capture.last_pos = Some(pos);

        match capture.ruler_anchor() {
            Some(anchor) => {
                self.store.replace_open_points(&ruler_points(anchor, pos, pressure));
                self.renderer.render_all(&mut self.surface, self.store.strokes());
            }
            None => {
                self.store.append_point(Point::at(pos, pressure));
                if let Some(stroke) = self.store.open_stroke() {
                    self.renderer.render_live_segment(&mut self.surface, stroke);
                }
            }
        }
        true
    }

    /// Close the open stroke and record the undo entry.
    pub fn finalize_stroke(&mut self) -> bool {
        let Some(mut capture) = self.capture.take() else {
            return false;
        };
        capture.end();
        self.store.finalize_stroke();
        self.snapshot_strokes();
        self.animation
            .on_history_changed(&mut self.store, &mut self.surface, &self.renderer);

        if self.auto_wiggle && self.store.len() == 1 && self.animation.is_idle() {
            self.animation.start_wiggle(&self.store);
        }
        true
    }

    pub fn undo(&mut self) -> bool {
        if self.capture.is_some() {
            log::debug!("undo ignored while drawing");
            return false;
        }
        if !self.undo.undo(&mut self.surface, &mut self.store) {
            return false;
        }
        self.renderer.render_overlay(&mut self.surface);
        self.animation
            .on_history_changed(&mut self.store, &mut self.surface, &self.renderer);
        // The restored snapshot holds every remaining stroke; playback shows a prefix.
        if !self.animation.is_idle() {
            self.animation.redraw(&self.store, &mut self.surface, &self.renderer);
        }
        true
    }

    pub fn clear(&mut self) {
        self.animation.reset(&mut self.store);
        self.capture = None;
        self.store.clear();
        self.reset_history();
        log::info!("canvas cleared");
    }

    // --- playback ---

    pub fn start_wiggle(&mut self) -> bool {
        self.animation.start_wiggle(&self.store)
    }

    pub fn stop_wiggle(&mut self) -> bool {
        self.animation
            .stop(&mut self.store, &mut self.surface, &self.renderer)
    }

    pub fn toggle_wiggle(&mut self) -> bool {
        if self.animation.state().is_wiggling() {
            self.stop_wiggle()
        } else {
            self.start_wiggle()
        }
    }

    pub fn start_timelapse(&mut self, stepping: TimelapseStepping) -> bool {
        if self.capture.is_some() {
            return false;
        }
        self.animation
            .start_timelapse(stepping, &mut self.store, &mut self.surface, &self.renderer)
    }

    pub fn step_timelapse(&mut self, direction: StepDirection) -> bool {
        self.animation
            .step_timelapse(direction, &mut self.store, &mut self.surface, &self.renderer)
    }

    pub fn tick(&mut self, now: Instant) -> TickOutcome {
        self.animation
            .tick(now, &mut self.store, &mut self.surface, &self.renderer)
    }

    pub fn next_frame_in(&self, now: Instant) -> Option<Duration> {
        self.animation.next_frame_in(now)
    }

    /// Full redraw of what the current playback state shows.
    pub fn render_all(&mut self) {
        self.animation
            .redraw(&self.store, &mut self.surface, &self.renderer);
    }

    // --- view ---

    pub fn zoom_at_point(&mut self, x: f32, y: f32, delta: f32) -> bool {
        self.view.zoom_at_point(x, y, delta)
    }

    pub fn change_zoom(&mut self, delta: f32) -> bool {
        self.view.change_zoom(delta)
    }

    pub fn pan(&mut self, dx: f32, dy: f32) -> bool {
        self.view.pan(dx, dy)
    }

    pub fn reset_view(&mut self) {
        self.view.reset();
    }

    pub fn resize_view(&mut self, width: f32, height: f32) {
        self.view.set_visible_size(width, height);
    }

    // --- persistence ---

    /// Replace the sketch with `doc`, rescaled to this canvas. On error
    /// nothing changes.
    pub fn load_document(&mut self, doc: &Document) -> Result<(), DocumentError> {
        let (w, h) = self.canvas_size();
        let strokes = doc.to_strokes(w, h)?;
        self.animation.reset(&mut self.store);
        self.capture = None;
        self.store.adopt(strokes);
        self.view.reset();
        self.reset_history();
        log::info!("loaded {} strokes", self.store.len());
        Ok(())
    }

    pub fn save_document(&self) -> Document {
        let (w, h) = self.canvas_size();
        Document::from_strokes(self.store.strokes(), w, h)
    }

    pub fn load_file(&mut self, path: &Path) -> Result<(), DocumentError> {
        let doc = Document::read(path)?;
        self.load_document(&doc)
    }

    pub fn save_file(&self, path: &Path) -> Result<(), DocumentError> {
        self.save_document().write(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::AnimationState;
    use crate::canvas::surface::Recorder;
    use crate::render::grid::GridKind;

    fn settings() -> Settings {
        Settings {
            auto_wiggle: false,
            ..Settings::default()
        }
    }

    fn sketch() -> Sketch<Recorder> {
        Sketch::seeded(Recorder::new(200, 100), &settings(), 5)
    }

    fn draw(sketch: &mut Sketch<Recorder>, points: &[(f32, f32)]) {
        let (first, rest) = points.split_first().unwrap();
        assert!(sketch.begin_stroke(Vec2::new(first.0, first.1), Some(0.5)));
        for &(x, y) in rest {
            sketch.append_point(Vec2::new(x, y), Some(0.5));
        }
        assert!(sketch.finalize_stroke());
    }

    #[test]
    fn pointer_positions_are_divided_by_zoom() {
        let mut s = sketch();
        s.view.scale = 2.0;
        draw(&mut s, &[(20.0, 10.0), (40.0, 30.0)]);
        let pts = s.strokes().strokes()[0].original_points();
        assert_eq!(pts[0].pos(), Vec2::new(10.0, 5.0));
        assert_eq!(pts[1].pos(), Vec2::new(20.0, 15.0));
    }

    #[test]
    fn first_stroke_is_undoable_back_to_blank() {
        let mut s = sketch();
        let blank = s.surface().snapshot();
        draw(&mut s, &[(0.0, 0.0), (10.0, 10.0)]);
        assert_eq!(s.undo_history().len(), 2);

        assert!(s.undo());
        assert!(s.strokes().is_empty());
        assert_eq!(s.surface().snapshot(), blank);
        assert!(!s.undo());
    }

    #[test]
    fn grid_is_not_part_of_undo_snapshots() {
        let mut settings = settings();
        settings.grid.kind = Some(GridKind::Oblique);
        let mut s = Sketch::seeded(Recorder::new(40, 40), &settings, 1);
        draw(&mut s, &[(0.0, 0.0), (5.0, 5.0)]);
        draw(&mut s, &[(9.0, 9.0), (15.0, 15.0)]);
        s.undo();
        // One stroke segment plus the grid drawn again on top.
        let segs = s.surface().visible_segments();
        assert_eq!(segs[0].0, Vec2::ZERO);
        assert!(segs[1..].iter().all(|(_, _, style)| style.width == 1.0));
    }

    #[test]
    fn ruler_mode_replaces_the_line_while_dragging() {
        let mut s = sketch();
        s.brush.ruler = true;
        s.begin_stroke(Vec2::new(0.0, 0.0), None);
        s.append_point(Vec2::new(100.0, 0.0), None);
        s.append_point(Vec2::new(20.0, 0.0), None);
        s.finalize_stroke();
        let stroke = &s.strokes().strokes()[0];
        assert_eq!(stroke.len(), 2);
        assert_eq!(stroke.original_points()[1].x, 20.0);
    }

    #[test]
    fn auto_wiggle_starts_after_first_stroke_only() {
        let mut settings = settings();
        settings.auto_wiggle = true;
        let mut s = Sketch::seeded(Recorder::new(50, 50), &settings, 2);
        draw(&mut s, &[(0.0, 0.0), (10.0, 0.0)]);
        assert_eq!(s.animation().state(), &AnimationState::Wiggling);

        s.stop_wiggle();
        draw(&mut s, &[(0.0, 5.0), (10.0, 5.0)]);
        assert!(s.animation().is_idle());
    }

    #[test]
    fn no_drawing_during_timelapse() {
        let mut s = sketch();
        draw(&mut s, &[(0.0, 0.0), (10.0, 0.0)]);
        draw(&mut s, &[(0.0, 5.0), (10.0, 5.0)]);
        assert!(s.start_timelapse(TimelapseStepping::Manual));
        assert!(!s.begin_stroke(Vec2::new(1.0, 1.0), None));
        assert!(s.step_timelapse(StepDirection::Next));
    }

    #[test]
    fn undo_to_one_stroke_ends_timelapse() {
        let mut s = sketch();
        draw(&mut s, &[(0.0, 0.0), (10.0, 0.0)]);
        draw(&mut s, &[(0.0, 5.0), (10.0, 5.0)]);
        s.start_timelapse(TimelapseStepping::Auto { looping: true });
        s.undo();
        assert!(s.animation().is_idle());
    }

    #[test]
    fn undo_during_manual_timelapse_keeps_showing_the_cursor_prefix() {
        let mut s = sketch();
        draw(&mut s, &[(0.0, 0.0), (10.0, 0.0)]);
        draw(&mut s, &[(0.0, 5.0), (10.0, 5.0)]);
        draw(&mut s, &[(0.0, 9.0), (10.0, 9.0)]);
        assert!(s.start_timelapse(TimelapseStepping::Manual));
        assert_eq!(s.surface().visible_segments().len(), 1);

        assert!(s.undo());
        assert_eq!(s.animation().state().timelapse().map(|t| t.cursor), Some(0));
        assert_eq!(s.surface().visible_segments().len(), 1);

        assert!(s.step_timelapse(StepDirection::Next));
        assert_eq!(s.surface().visible_segments().len(), 2);
    }

    #[test]
    fn clear_stops_everything_and_keeps_a_baseline() {
        let mut s = sketch();
        draw(&mut s, &[(0.0, 0.0), (10.0, 0.0)]);
        s.start_wiggle();
        s.clear();
        assert!(s.animation().is_idle());
        assert!(s.strokes().is_empty());
        assert_eq!(s.undo_history().len(), 1);
        assert!(!s.undo());
    }

    #[test]
    fn failed_load_leaves_sketch_untouched() {
        let mut s = sketch();
        draw(&mut s, &[(0.0, 0.0), (10.0, 0.0)]);
        let bad = Document {
            width: Some(0.0),
            height: Some(10.0),
            strokes: Vec::new(),
        };
        assert!(s.load_document(&bad).is_err());
        assert_eq!(s.strokes().len(), 1);
    }

    #[test]
    fn load_resets_view_and_history() {
        let mut s = sketch();
        s.change_zoom(1.0);
        let mut other = sketch();
        draw(&mut other, &[(0.0, 0.0), (10.0, 0.0)]);
        draw(&mut other, &[(0.0, 9.0), (10.0, 9.0)]);

        s.load_document(&other.save_document()).unwrap();
        assert_eq!(s.view().scale, 1.0);
        assert_eq!(s.strokes().len(), 2);
        assert_eq!(s.undo_history().len(), 1);
        assert!(!s.undo());
    }
}
