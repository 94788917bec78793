use std::collections::VecDeque;

use crate::brush_engine::store::StrokeStore;
use crate::canvas::surface::DrawingSurface;

/// Number of raster snapshots kept for undo.
pub const HISTORY_LIMIT: usize = 50;

/// Bounded stack of full-canvas snapshots, one pushed per completed stroke.
///
/// `cursor` indexes the snapshot matching what is on the surface. Once the
/// window is full, pushing drops the oldest entry and the cursor stays on the
/// newest, so the oldest recoverable state rotates out for good.
pub struct UndoManager<S> {
    snapshots: VecDeque<S>,
    cursor: Option<usize>,
    limit: usize,
}

impl<S> UndoManager<S> {
    pub fn new() -> Self {
        Self::with_limit(HISTORY_LIMIT)
    }

    pub fn with_limit(limit: usize) -> Self {
        Self {
            snapshots: VecDeque::new(),
            cursor: None,
            limit: limit.max(1),
        }
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    pub fn can_undo(&self) -> bool {
        matches!(self.cursor, Some(c) if c > 0)
    }

    /// Capture the surface after a completed stroke.
    pub fn snapshot<D>(&mut self, surface: &D)
    where
        D: DrawingSurface<Snapshot = S>,
    {
        match self.cursor {
            Some(c) => self.snapshots.truncate(c + 1),
            None => self.snapshots.clear(),
        }
        self.snapshots.push_back(surface.snapshot());
        if self.snapshots.len() > self.limit {
            self.snapshots.pop_front();
        } else {
            self.cursor = Some(self.snapshots.len() - 1);
        }
    }

    /// Step back one stroke: blit the previous snapshot and drop the newest
    /// stroke. A no-op at the floor of the retained window.
    pub fn undo<D>(&mut self, surface: &mut D, strokes: &mut StrokeStore) -> bool
    where
        D: DrawingSurface<Snapshot = S>,
    {
        let Some(cursor) = self.cursor.filter(|c| *c > 0) else {
            log::debug!("undo ignored: nothing left in the retained window");
            return false;
        };
        let cursor = cursor - 1;
        self.cursor = Some(cursor);
        if let Some(snapshot) = self.snapshots.get(cursor) {
            surface.restore(snapshot);
        }
        strokes.remove_last();
        true
    }

    pub fn clear(&mut self) {
        self.snapshots.clear();
        self.cursor = None;
    }
}

impl<S> Default for UndoManager<S> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::brush_engine::stroke::Point;
    use crate::canvas::surface::{DrawCommand, LineStyle, Recorder};
    use crate::utils::{color::Color, vector::Vec2};

    fn draw_one(
        surface: &mut Recorder,
        strokes: &mut StrokeStore,
        undo: &mut UndoManager<Vec<DrawCommand>>,
        i: usize,
    ) {
        strokes.begin_stroke(Color::black(), 4.0);
        strokes.append_point(Point::new(i as f32, 0.0, 0.5));
        strokes.finalize_stroke();
        surface.stroke_segment(
            Vec2::new(i as f32, 0.0),
            Vec2::new(i as f32, 1.0),
            &LineStyle {
                width: 1.0,
                color: Color::black(),
            },
        );
        undo.snapshot(&*surface);
    }

    #[test]
    fn undo_without_history_is_a_noop() {
        let mut surface = Recorder::new(10, 10);
        let mut strokes = StrokeStore::new();
        let mut undo = UndoManager::new();
        assert!(!undo.undo(&mut surface, &mut strokes));
        assert!(surface.commands().is_empty());

        undo.snapshot(&surface);
        assert!(!undo.undo(&mut surface, &mut strokes));
        assert_eq!(undo.cursor(), Some(0));
    }

    #[test]
    fn undo_restores_previous_snapshot_and_pops_stroke() {
        let mut surface = Recorder::new(10, 10);
        let mut strokes = StrokeStore::new();
        let mut undo = UndoManager::new();
        undo.snapshot(&surface);
        draw_one(&mut surface, &mut strokes, &mut undo, 0);
        let after_first = surface.snapshot();
        draw_one(&mut surface, &mut strokes, &mut undo, 1);

        assert!(undo.undo(&mut surface, &mut strokes));
        assert_eq!(strokes.len(), 1);
        assert_eq!(surface.snapshot(), after_first);

        assert!(undo.undo(&mut surface, &mut strokes));
        assert!(strokes.is_empty());
        assert!(surface.commands().is_empty());
        assert!(!undo.undo(&mut surface, &mut strokes));
    }

    #[test]
    fn full_window_rotates_out_oldest() {
        let mut surface = Recorder::new(10, 10);
        let mut strokes = StrokeStore::new();
        let mut undo = UndoManager::with_limit(3);
        undo.snapshot(&surface);
        for i in 0..5 {
            draw_one(&mut surface, &mut strokes, &mut undo, i);
        }
        assert_eq!(undo.len(), 3);
        assert_eq!(undo.cursor(), Some(2));

        assert!(undo.undo(&mut surface, &mut strokes));
        assert!(undo.undo(&mut surface, &mut strokes));
        assert!(!undo.undo(&mut surface, &mut strokes));
        assert_eq!(strokes.len(), 3);
    }

    #[test]
    fn snapshot_after_undo_discards_newer_entries() {
        let mut surface = Recorder::new(10, 10);
        let mut strokes = StrokeStore::new();
        let mut undo = UndoManager::new();
        undo.snapshot(&surface);
        draw_one(&mut surface, &mut strokes, &mut undo, 0);
        draw_one(&mut surface, &mut strokes, &mut undo, 1);
        undo.undo(&mut surface, &mut strokes);
        draw_one(&mut surface, &mut strokes, &mut undo, 2);
        assert_eq!(undo.len(), 3);
        assert_eq!(undo.cursor(), Some(2));
    }

    #[test]
    fn clear_resets_cursor() {
        let surface = Recorder::new(10, 10);
        let mut undo = UndoManager::new();
        undo.snapshot(&surface);
        undo.clear();
        assert!(undo.is_empty());
        assert_eq!(undo.cursor(), None);
    }
}
