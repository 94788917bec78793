use crate::brush_engine::stroke::{Point, Stroke};
use crate::utils::color::Color;

/// Ordered stroke history. Insertion order is drawing order.
///
/// At most one stroke, always the last, is open for appending.
#[derive(Clone, Debug, Default)]
pub struct StrokeStore {
    strokes: Vec<Stroke>,
    open: bool,
}

impl StrokeStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn strokes(&self) -> &[Stroke] {
        &self.strokes
    }

    pub fn strokes_mut(&mut self) -> &mut [Stroke] {
        &mut self.strokes
    }

    pub fn len(&self) -> usize {
        self.strokes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strokes.is_empty()
    }

    pub fn last(&self) -> Option<&Stroke> {
        self.strokes.last()
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    /// The stroke currently receiving points, if any.
    pub fn open_stroke(&self) -> Option<&Stroke> {
        if self.open { self.strokes.last() } else { None }
    }

    /// Start a new stroke. Ignored while another stroke is open.
    pub fn begin_stroke(&mut self, color: Color, base_size: f32) -> bool {
        if self.open {
            log::debug!("begin_stroke ignored: a stroke is already open");
            return false;
        }
        self.strokes.push(Stroke::new(color, base_size));
        self.open = true;
        true
    }

    /// Append to the open stroke; no-op when nothing is open.
    pub fn append_point(&mut self, point: Point) -> bool {
        match self.open_stroke_mut() {
            Some(stroke) => {
                stroke.push(point);
                true
            }
            None => false,
        }
    }

    /// Replace the whole geometry of the open stroke.
    pub fn replace_open_points(&mut self, points: &[Point]) -> bool {
        match self.open_stroke_mut() {
            Some(stroke) => {
                stroke.replace_points(points);
                true
            }
            None => false,
        }
    }

    pub fn finalize_stroke(&mut self) -> bool {
        std::mem::replace(&mut self.open, false)
    }

    pub fn remove_last(&mut self) -> Option<Stroke> {
        let removed = self.strokes.pop();
        if removed.is_some() {
            self.open = false;
        }
        removed
    }

    pub fn clear(&mut self) {
        self.strokes.clear();
        self.open = false;
    }

    /// Replace the history with already finished strokes.
    pub fn adopt(&mut self, strokes: Vec<Stroke>) {
        self.strokes = strokes;
        self.open = false;
    }

    /// Reset every displayed buffer to its original geometry.
    pub fn restore_originals(&mut self) {
        for stroke in &mut self.strokes {
            stroke.restore_original();
        }
    }

    fn open_stroke_mut(&mut self) -> Option<&mut Stroke> {
        if self.open { self.strokes.last_mut() } else { None }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_one_stroke_is_open_at_a_time() {
        let mut store = StrokeStore::new();
        assert!(store.begin_stroke(Color::black(), 4.0));
        assert!(!store.begin_stroke(Color::white(), 8.0));
        assert_eq!(store.len(), 1);

        assert!(store.finalize_stroke());
        assert!(!store.finalize_stroke());
        assert!(store.begin_stroke(Color::white(), 8.0));
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn append_without_open_stroke_is_ignored() {
        let mut store = StrokeStore::new();
        assert!(!store.append_point(Point::new(1.0, 1.0, 0.5)));
        store.begin_stroke(Color::black(), 4.0);
        store.append_point(Point::new(1.0, 1.0, 0.5));
        store.finalize_stroke();
        assert!(!store.append_point(Point::new(2.0, 2.0, 0.5)));
        assert_eq!(store.strokes()[0].len(), 1);
    }

    #[test]
    fn remove_last_on_empty_is_noop() {
        let mut store = StrokeStore::new();
        assert!(store.remove_last().is_none());
        store.begin_stroke(Color::black(), 4.0);
        assert!(store.remove_last().is_some());
        assert!(!store.is_open());
    }

    #[test]
    fn replace_open_points_copies_into_both_buffers() {
        let mut store = StrokeStore::new();
        store.begin_stroke(Color::black(), 4.0);
        let line = [Point::new(0.0, 0.0, 0.3), Point::new(10.0, 0.0, 0.3)];
        assert!(store.replace_open_points(&line));
        let stroke = &store.strokes()[0];
        assert_eq!(stroke.points(), &line);
        assert_eq!(stroke.original_points(), &line);
    }
}
