//! Drawing-surface abstraction shared by the renderer and the undo stack.
//!
//! The renderer only ever asks a surface for a handful of immediate-mode
//! primitives, so the stroke and grid algorithms run unchanged against the
//! CPU raster ([`crate::canvas::canvas::Canvas`]) or the command
//! [`Recorder`] used in tests and benchmarks.

use crate::utils::{color::Color, vector::Vec2};

/// How a single segment is stroked. Caps and joins are always round.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LineStyle {
    pub width: f32,
    pub color: Color,
}

/// Axis-aligned clip rectangle in surface pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ClipRect {
    pub min: Vec2,
    pub max: Vec2,
}

impl ClipRect {
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.min.x && p.x < self.max.x && p.y >= self.min.y && p.y < self.max.y
    }
}

/// Minimal immediate-mode 2D backend.
pub trait DrawingSurface {
    /// Opaque copy of the full pixel state.
    type Snapshot;

    fn width(&self) -> usize;
    fn height(&self) -> usize;

    /// Erase every pixel back to the background.
    fn clear(&mut self);

    /// Stroke the segment `from..to` with round caps.
    fn stroke_segment(&mut self, from: Vec2, to: Vec2, style: &LineStyle);

    /// Restrict subsequent strokes to `clip`, or lift the restriction.
    fn set_clip(&mut self, clip: Option<ClipRect>);

    fn snapshot(&self) -> Self::Snapshot;
    fn restore(&mut self, snapshot: &Self::Snapshot);
}

/// One primitive issued against a [`Recorder`].
#[derive(Clone, Debug, PartialEq)]
pub enum DrawCommand {
    Clear,
    Segment {
        from: Vec2,
        to: Vec2,
        style: LineStyle,
    },
    Clip(Option<ClipRect>),
}

/// Surface that keeps the issued commands instead of rasterizing them.
///
/// A snapshot is the command list itself, so restoring one replays history
/// exactly the way a pixel blit would.
#[derive(Clone, Debug, Default)]
pub struct Recorder {
    width: usize,
    height: usize,
    commands: Vec<DrawCommand>,
}

impl Recorder {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            commands: Vec::new(),
        }
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Segments drawn since the last clear.
    pub fn visible_segments(&self) -> Vec<(Vec2, Vec2, LineStyle)> {
        let start = self
            .commands
            .iter()
            .rposition(|c| matches!(c, DrawCommand::Clear))
            .map_or(0, |idx| idx + 1);
        self.commands[start..]
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Segment { from, to, style } => Some((*from, *to, *style)),
                _ => None,
            })
            .collect()
    }

    pub fn reset(&mut self) {
        self.commands.clear();
    }
}

impl DrawingSurface for Recorder {
    type Snapshot = Vec<DrawCommand>;

    fn width(&self) -> usize {
        self.width
    }

    fn height(&self) -> usize {
        self.height
    }

    fn clear(&mut self) {
        self.commands.push(DrawCommand::Clear);
    }

    fn stroke_segment(&mut self, from: Vec2, to: Vec2, style: &LineStyle) {
        self.commands.push(DrawCommand::Segment {
            from,
            to,
            style: *style,
        });
    }

    fn set_clip(&mut self, clip: Option<ClipRect>) {
        self.commands.push(DrawCommand::Clip(clip));
    }

    fn snapshot(&self) -> Self::Snapshot {
        self.commands.clone()
    }

    fn restore(&mut self, snapshot: &Self::Snapshot) {
        self.commands = snapshot.clone();
    }
}
