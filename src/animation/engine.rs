use std::time::{Duration, Instant};

use crate::animation::jitter::{DEFAULT_WIGGLE, Jitter, MAX_WIGGLE};
use crate::animation::state::{Advance, AnimationState, StepDirection, TimelapseStepping};
use crate::brush_engine::{store::StrokeStore, stroke::Stroke};
use crate::canvas::surface::DrawingSurface;
use crate::render::renderer::Renderer;
use crate::utils::profiler::ScopeTimer;

pub const DEFAULT_FRAME_MS: u64 = 125;
pub const MIN_FRAME_MS: u64 = 1;
pub const MAX_FRAME_MS: u64 = 2048;

/// Result of offering the engine a tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TickOutcome {
    /// Nothing is animating; the host may stop scheduling ticks.
    Inactive,
    /// Less than one frame duration since the last processed tick.
    Throttled,
    Rendered,
}

/// Drives wiggle and time-lapse playback on top of the stroke store.
///
/// The engine never owns the strokes or the surface; every call borrows them
/// for the duration of one update. While idle every stroke shows its
/// original geometry.
pub struct AnimationEngine {
    state: AnimationState,
    frame_duration: Duration,
    wiggle_amount: f32,
    last_frame: Option<Instant>,
    jitter: Jitter,
}

impl AnimationEngine {
    pub fn new(frame_ms: u64, wiggle_amount: f32) -> Self {
        Self::with_jitter(frame_ms, wiggle_amount, Jitter::new())
    }

    pub fn with_jitter(frame_ms: u64, wiggle_amount: f32, jitter: Jitter) -> Self {
        let mut engine = Self {
            state: AnimationState::Idle,
            frame_duration: Duration::from_millis(DEFAULT_FRAME_MS),
            wiggle_amount: DEFAULT_WIGGLE,
            last_frame: None,
            jitter,
        };
        engine.set_frame_ms(frame_ms);
        engine.set_wiggle_amount(wiggle_amount);
        engine
    }

    pub fn state(&self) -> &AnimationState {
        &self.state
    }

    pub fn is_idle(&self) -> bool {
        self.state.is_idle()
    }

    /// Whether the host should keep scheduling ticks.
    pub fn is_running(&self) -> bool {
        self.state.needs_ticks()
    }

    pub fn frame_duration(&self) -> Duration {
        self.frame_duration
    }

    pub fn set_frame_ms(&mut self, ms: u64) {
        self.frame_duration = Duration::from_millis(ms.clamp(MIN_FRAME_MS, MAX_FRAME_MS));
    }

    pub fn wiggle_amount(&self) -> f32 {
        self.wiggle_amount
    }

    /// Takes effect on the next processed tick.
    pub fn set_wiggle_amount(&mut self, amount: f32) {
        self.wiggle_amount = if amount.is_finite() {
            amount.clamp(0.0, MAX_WIGGLE)
        } else {
            DEFAULT_WIGGLE
        };
    }

    /// Time until the next tick would be processed, or `None` when idle.
    pub fn next_frame_in(&self, now: Instant) -> Option<Duration> {
        if !self.state.needs_ticks() {
            return None;
        }
        Some(match self.last_frame {
            Some(last) => self
                .frame_duration
                .saturating_sub(now.saturating_duration_since(last)),
            None => Duration::ZERO,
        })
    }

    pub fn start_wiggle(&mut self, store: &StrokeStore) -> bool {
        match self.state.start_wiggle(store.len()) {
            Some(next) => {
                log::info!("wiggle started ({} strokes)", store.len());
                self.state = next;
                self.last_frame = None;
                true
            }
            None => {
                log::debug!("start_wiggle ignored in {:?} with {} strokes", self.state, store.len());
                false
            }
        }
    }

    /// Stop all playback, restore every stroke exactly and redraw.
    pub fn stop<S: DrawingSurface>(
        &mut self,
        store: &mut StrokeStore,
        surface: &mut S,
        renderer: &Renderer,
    ) -> bool {
        match self.state.stop() {
            Some(next) => {
                log::info!("animation stopped");
                self.apply(next, store, surface, renderer);
                true
            }
            None => false,
        }
    }

    /// Begin a time-lapse, or end the running one.
    pub fn start_timelapse<S: DrawingSurface>(
        &mut self,
        stepping: TimelapseStepping,
        store: &mut StrokeStore,
        surface: &mut S,
        renderer: &Renderer,
    ) -> bool {
        if let Some(next) = self.state.end_timelapse() {
            log::info!("time-lapse toggled off");
            self.apply(next, store, surface, renderer);
            return true;
        }
        match self.state.start_timelapse(store.len(), stepping) {
            Some(next) => {
                log::info!("time-lapse started ({stepping:?}, {} strokes)", store.len());
                self.apply(next, store, surface, renderer);
                true
            }
            None => {
                log::debug!("start_timelapse ignored with {} strokes", store.len());
                false
            }
        }
    }

    /// Move a manual time-lapse by one stroke and redraw the visible prefix.
    pub fn step_timelapse<S: DrawingSurface>(
        &mut self,
        direction: StepDirection,
        store: &mut StrokeStore,
        surface: &mut S,
        renderer: &Renderer,
    ) -> bool {
        match self.state.step(direction, store.len()) {
            Some(next) => {
                self.state = next;
                self.redraw(store, surface, renderer);
                true
            }
            None => {
                log::debug!("step {direction:?} ignored in {:?}", self.state);
                false
            }
        }
    }

    /// Process one frame if the state animates and the throttle allows it.
    pub fn tick<S: DrawingSurface>(
        &mut self,
        now: Instant,
        store: &mut StrokeStore,
        surface: &mut S,
        renderer: &Renderer,
    ) -> TickOutcome {
        if !self.state.needs_ticks() {
            self.last_frame = None;
            return TickOutcome::Inactive;
        }
        if let Some(last) = self.last_frame {
            if now.saturating_duration_since(last) < self.frame_duration {
                return TickOutcome::Throttled;
            }
        }
        self.last_frame = Some(now);
        let _timer = ScopeTimer::new("animation_frame");

        let visible = self.state.visible_count(store.len());
        if self.state.is_wiggling() && self.wiggle_amount > 0.0 {
            self.jitter_strokes(&mut store.strokes_mut()[..visible]);
        }
        self.redraw(store, surface, renderer);

        match self.state.advance(store.len()) {
            Some(Advance::Continue(next)) => self.state = next,
            Some(Advance::Finished(next)) => {
                log::info!("time-lapse finished");
                self.state = next;
                if !next.is_wiggling() {
                    store.restore_originals();
                }
            }
            None => {}
        }
        TickOutcome::Rendered
    }

    /// Re-validate playback after strokes were added, undone or cleared.
    pub fn on_history_changed<S: DrawingSurface>(
        &mut self,
        store: &mut StrokeStore,
        surface: &mut S,
        renderer: &Renderer,
    ) {
        let next = self.state.fit_history(store.len());
        if next != self.state {
            log::debug!("history now {} strokes: {:?} -> {:?}", store.len(), self.state, next);
            self.apply(next, store, surface, renderer);
        }
    }

    /// Drop playback state without touching any surface, for a full reset.
    pub fn reset(&mut self, store: &mut StrokeStore) {
        self.state = AnimationState::Idle;
        self.last_frame = None;
        store.restore_originals();
    }

    fn apply<S: DrawingSurface>(
        &mut self,
        next: AnimationState,
        store: &mut StrokeStore,
        surface: &mut S,
        renderer: &Renderer,
    ) {
        self.state = next;
        if !next.needs_ticks() {
            self.last_frame = None;
        }
        if !next.is_wiggling() {
            store.restore_originals();
        }
        self.redraw(store, surface, renderer);
    }

    fn jitter_strokes(&mut self, strokes: &mut [Stroke]) {
        for stroke in strokes {
            let displaced = self.jitter.displace(stroke.original_points(), self.wiggle_amount);
            stroke.set_displayed(displaced);
        }
    }

    /// Draw whatever the current state shows: every stroke, or the
    /// time-lapse prefix, then the overlay.
    pub fn redraw<S: DrawingSurface>(
        &self,
        store: &StrokeStore,
        surface: &mut S,
        renderer: &Renderer,
    ) {
        let visible = self.state.visible_count(store.len());
        renderer.render_strokes(surface, &store.strokes()[..visible]);
        renderer.render_overlay(surface);
    }
}

impl Default for AnimationEngine {
    fn default() -> Self {
        Self::new(DEFAULT_FRAME_MS, DEFAULT_WIGGLE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::brush_engine::stroke::Point;
    use crate::canvas::surface::Recorder;
    use crate::utils::color::Color;

    const FRAME: Duration = Duration::from_millis(DEFAULT_FRAME_MS);

    fn store_with(n: usize) -> StrokeStore {
        let mut store = StrokeStore::new();
        store.adopt(
            (0..n)
                .map(|i| {
                    let y = i as f32 * 10.0;
                    Stroke::from_points(
                        vec![Point::new(0.0, y, 0.5), Point::new(20.0, y, 0.5)],
                        Color::black(),
                        2.0,
                    )
                })
                .collect(),
        );
        store
    }

    fn engine() -> AnimationEngine {
        AnimationEngine::with_jitter(DEFAULT_FRAME_MS, 5.0, Jitter::seeded(11))
    }

    #[test]
    fn stop_restores_originals_exactly() {
        let mut store = store_with(3);
        let mut surface = Recorder::new(64, 64);
        let renderer = Renderer::default();
        let mut engine = engine();
        let t0 = Instant::now();

        assert!(engine.start_wiggle(&store));
        for i in 0..4 {
            engine.tick(t0 + FRAME * i, &mut store, &mut surface, &renderer);
        }
        assert!(store.strokes().iter().any(Stroke::is_displaced));

        assert!(engine.stop(&mut store, &mut surface, &renderer));
        assert!(engine.is_idle());
        for stroke in store.strokes() {
            assert_eq!(stroke.points(), stroke.original_points());
        }
        let drawn = surface.visible_segments();
        assert_eq!(drawn.len(), 3);
        assert_eq!(drawn[2].0, store.strokes()[2].original_points()[0].pos());
        assert!(!engine.stop(&mut store, &mut surface, &renderer));
    }

    #[test]
    fn wiggle_needs_strokes() {
        let store = StrokeStore::new();
        let mut engine = engine();
        assert!(!engine.start_wiggle(&store));
        assert!(engine.is_idle());
    }

    #[test]
    fn ticks_are_throttled_to_frame_duration() {
        let mut store = store_with(1);
        let mut surface = Recorder::new(32, 32);
        let renderer = Renderer::default();
        let mut engine = engine();
        let t0 = Instant::now();

        assert_eq!(
            engine.tick(t0, &mut store, &mut surface, &renderer),
            TickOutcome::Inactive
        );
        engine.start_wiggle(&store);
        assert_eq!(engine.next_frame_in(t0), Some(Duration::ZERO));
        assert_eq!(
            engine.tick(t0, &mut store, &mut surface, &renderer),
            TickOutcome::Rendered
        );
        let t1 = t0 + Duration::from_millis(10);
        assert_eq!(
            engine.tick(t1, &mut store, &mut surface, &renderer),
            TickOutcome::Throttled
        );
        assert_eq!(engine.next_frame_in(t1), Some(FRAME - Duration::from_millis(10)));
        assert_eq!(
            engine.tick(t0 + FRAME, &mut store, &mut surface, &renderer),
            TickOutcome::Rendered
        );
    }

    #[test]
    fn zero_wiggle_leaves_geometry_alone() {
        let mut store = store_with(2);
        let mut surface = Recorder::new(32, 32);
        let renderer = Renderer::default();
        let mut engine = engine();
        engine.set_wiggle_amount(0.0);
        engine.start_wiggle(&store);
        let t0 = Instant::now();
        for i in 0..3 {
            engine.tick(t0 + FRAME * i, &mut store, &mut surface, &renderer);
        }
        assert!(!store.strokes().iter().any(Stroke::is_displaced));
    }

    #[test]
    fn auto_timelapse_shows_each_prefix_once() {
        let mut store = store_with(3);
        let mut surface = Recorder::new(64, 64);
        let renderer = Renderer::default();
        let mut engine = engine();
        let t0 = Instant::now();

        assert!(engine.start_timelapse(
            TimelapseStepping::Auto { looping: false },
            &mut store,
            &mut surface,
            &renderer
        ));
        let mut shown = Vec::new();
        for i in 0..10 {
            if engine.tick(t0 + FRAME * i, &mut store, &mut surface, &renderer)
                == TickOutcome::Rendered
            {
                shown.push(surface.visible_segments().len());
            }
        }
        assert_eq!(shown, vec![1, 2, 3]);
        assert!(engine.is_idle());
    }

    #[test]
    fn looping_timelapse_wraps() {
        let mut store = store_with(2);
        let mut surface = Recorder::new(64, 64);
        let renderer = Renderer::default();
        let mut engine = engine();
        let t0 = Instant::now();
        engine.start_timelapse(
            TimelapseStepping::Auto { looping: true },
            &mut store,
            &mut surface,
            &renderer,
        );
        let mut shown = Vec::new();
        for i in 0..5 {
            engine.tick(t0 + FRAME * i, &mut store, &mut surface, &renderer);
            shown.push(surface.visible_segments().len());
        }
        assert_eq!(shown, vec![1, 2, 1, 2, 1]);
    }

    #[test]
    fn manual_timelapse_steps_and_stays_put_without_wiggle() {
        let mut store = store_with(3);
        let mut surface = Recorder::new(64, 64);
        let renderer = Renderer::default();
        let mut engine = engine();

        engine.start_timelapse(TimelapseStepping::Manual, &mut store, &mut surface, &renderer);
        assert_eq!(surface.visible_segments().len(), 1);
        assert!(!engine.step_timelapse(StepDirection::Previous, &mut store, &mut surface, &renderer));
        assert!(engine.step_timelapse(StepDirection::Next, &mut store, &mut surface, &renderer));
        assert!(engine.step_timelapse(StepDirection::Next, &mut store, &mut surface, &renderer));
        assert!(!engine.step_timelapse(StepDirection::Next, &mut store, &mut surface, &renderer));
        assert_eq!(surface.visible_segments().len(), 3);

        assert_eq!(
            engine.tick(Instant::now(), &mut store, &mut surface, &renderer),
            TickOutcome::Inactive
        );
    }

    #[test]
    fn starting_a_running_timelapse_toggles_it_off() {
        let mut store = store_with(2);
        let mut surface = Recorder::new(64, 64);
        let renderer = Renderer::default();
        let mut engine = engine();
        engine.start_wiggle(&store);
        let auto = TimelapseStepping::Auto { looping: false };
        assert!(engine.start_timelapse(auto, &mut store, &mut surface, &renderer));
        assert!(engine.state().is_timelapsing());
        assert!(engine.start_timelapse(auto, &mut store, &mut surface, &renderer));
        assert_eq!(engine.state(), &AnimationState::Wiggling);
    }

    #[test]
    fn emptied_history_stops_playback() {
        let mut store = store_with(2);
        let mut surface = Recorder::new(64, 64);
        let renderer = Renderer::default();
        let mut engine = engine();
        engine.start_timelapse(TimelapseStepping::Manual, &mut store, &mut surface, &renderer);
        engine.step_timelapse(StepDirection::Next, &mut store, &mut surface, &renderer);

        store.remove_last();
        engine.on_history_changed(&mut store, &mut surface, &renderer);
        assert!(engine.is_idle());

        engine.start_wiggle(&store);
        store.clear();
        engine.on_history_changed(&mut store, &mut surface, &renderer);
        assert!(engine.is_idle());
    }

    #[test]
    fn frame_duration_is_clamped() {
        let mut engine = engine();
        engine.set_frame_ms(0);
        assert_eq!(engine.frame_duration(), Duration::from_millis(MIN_FRAME_MS));
        engine.set_frame_ms(10_000);
        assert_eq!(engine.frame_duration(), Duration::from_millis(MAX_FRAME_MS));
        engine.set_wiggle_amount(99.0);
        assert_eq!(engine.wiggle_amount(), MAX_WIGGLE);
    }
}
