//! Procedural drawing guides drawn over the strokes.
//!
//! The grid is a pure render-time overlay: it is drawn in canvas pixels
//! after content, never captured by undo snapshots and never saved.

use crate::canvas::surface::{ClipRect, DrawingSurface, LineStyle};
use crate::utils::{color::Color, vector::Vec2};

pub const DEFAULT_SPACING: f32 = 20.0;
pub const DEFAULT_OPACITY: f32 = 0.25;
const MIN_SPACING: f32 = 2.0;
/// Every n-th line of a major family is emphasized.
const MAJOR_EVERY: usize = 10;
const MAJOR_BOOST: f32 = 0.25;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GridKind {
    /// 60° and 120° diagonals plus dense verticals.
    Isometric,
    /// 45° receding diagonals over a square grid.
    Oblique,
    /// Oblique on the left half, isometric on the right half.
    Split,
}

impl GridKind {
    pub const ALL: [GridKind; 3] = [GridKind::Isometric, GridKind::Oblique, GridKind::Split];

    pub fn label(&self) -> &'static str {
        match self {
            GridKind::Isometric => "Isometric",
            GridKind::Oblique => "Oblique",
            GridKind::Split => "Oblique | Isometric",
        }
    }

    /// Parse the command-line spelling.
    pub fn parse(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "isometric" | "iso" => Some(GridKind::Isometric),
            "oblique" => Some(GridKind::Oblique),
            "split" | "obliso" => Some(GridKind::Split),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GridSettings {
    pub kind: Option<GridKind>,
    pub spacing: f32,
    pub opacity: f32,
}

impl Default for GridSettings {
    fn default() -> Self {
        Self {
            kind: None,
            spacing: DEFAULT_SPACING,
            opacity: DEFAULT_OPACITY,
        }
    }
}

impl GridSettings {
    fn spacing(&self) -> f32 {
        if self.spacing.is_finite() {
            self.spacing.max(MIN_SPACING)
        } else {
            DEFAULT_SPACING
        }
    }

    fn opacity(&self) -> f32 {
        self.opacity.clamp(0.0, 1.0)
    }
}

/// One guide line and the alpha it is drawn with.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GridLine {
    pub from: Vec2,
    pub to: Vec2,
    pub alpha: f32,
}

fn grid_color() -> Color {
    Color::rgb(0xcc, 0xcc, 0xcc)
}

/// `start, start + step, ...` for as long as `keep` holds, with the index.
fn stepped(start: f32, step: f32, keep: impl Fn(f32) -> bool) -> impl Iterator<Item = (usize, f32)> {
    (0..)
        .map(move |i| (i, start + step * i as f32))
        .take_while(move |(_, v)| keep(*v))
}

fn line_alpha(index: usize, base: f32, emphasize: bool) -> f32 {
    if emphasize && index % MAJOR_EVERY == 0 {
        (base + MAJOR_BOOST).min(1.0)
    } else {
        base
    }
}

pub fn isometric_lines(width: f32, height: f32, spacing: f32, opacity: f32) -> Vec<GridLine> {
    let reach = height * 3f32.sqrt();
    let mut lines = Vec::new();

    for (i, x) in stepped(-reach, spacing, |x| x < width + reach) {
        lines.push(GridLine {
            from: Vec2::new(x, 0.0),
            to: Vec2::new(x + reach, height),
            alpha: line_alpha(i, opacity, true),
        });
    }
    for (i, x) in stepped(width + reach, -spacing, |x| x > -reach) {
        lines.push(GridLine {
            from: Vec2::new(x, 0.0),
            to: Vec2::new(x - reach, height),
            alpha: line_alpha(i, opacity, true),
        });
    }
    let first_x = (-reach).rem_euclid(spacing);
    for (_, x) in stepped(first_x, spacing / 2.0, |x| x < width) {
        lines.push(GridLine {
            from: Vec2::new(x, 0.0),
            to: Vec2::new(x, height),
            alpha: opacity,
        });
    }
    lines
}

pub fn oblique_lines(width: f32, height: f32, spacing: f32, opacity: f32) -> Vec<GridLine> {
    let half = spacing / 2.0;
    let mut lines = Vec::new();

    for (_, x) in stepped(width + height, -half, |x| x > -height) {
        lines.push(GridLine {
            from: Vec2::new(x, 0.0),
            to: Vec2::new(x - height, height),
            alpha: opacity,
        });
    }
    for (i, x) in stepped(0.0, half, |x| x < width) {
        lines.push(GridLine {
            from: Vec2::new(x, 0.0),
            to: Vec2::new(x, height),
            alpha: line_alpha(i, opacity, true),
        });
    }
    for (i, y) in stepped(0.0, half, |y| y < height) {
        lines.push(GridLine {
            from: Vec2::new(0.0, y),
            to: Vec2::new(width, y),
            alpha: line_alpha(i, opacity, true),
        });
    }
    lines
}

fn draw_lines<S: DrawingSurface>(surface: &mut S, lines: &[GridLine]) {
    let color = grid_color();
    for line in lines {
        surface.stroke_segment(
            line.from,
            line.to,
            &LineStyle {
                width: 1.0,
                color: color.with_alpha(line.alpha),
            },
        );
    }
}

/// Draw the selected grid over whatever is on the surface.
pub fn draw_grid<S: DrawingSurface>(surface: &mut S, settings: &GridSettings) {
    let Some(kind) = settings.kind else {
        return;
    };
    let w = surface.width() as f32;
    let h = surface.height() as f32;
    let spacing = settings.spacing();
    let opacity = settings.opacity();

    match kind {
        GridKind::Isometric => draw_lines(surface, &isometric_lines(w, h, spacing, opacity)),
        GridKind::Oblique => draw_lines(surface, &oblique_lines(w, h, spacing, opacity)),
        GridKind::Split => {
            let mid = w / 2.0;
            surface.set_clip(Some(ClipRect::new(Vec2::ZERO, Vec2::new(mid, h))));
            draw_lines(surface, &oblique_lines(w, h, spacing, opacity));
            surface.set_clip(Some(ClipRect::new(Vec2::new(mid, 0.0), Vec2::new(w, h))));
            draw_lines(surface, &isometric_lines(w, h, spacing, opacity));
            surface.set_clip(None);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::surface::{DrawCommand, Recorder};

    #[test]
    fn oblique_grid_line_counts_and_emphasis() {
        let lines = oblique_lines(100.0, 100.0, 20.0, 0.25);
        // 30 diagonals, 10 verticals, 10 horizontals at half spacing.
        assert_eq!(lines.len(), 50);
        let verticals: Vec<_> = lines.iter().filter(|l| l.from.x == l.to.x).collect();
        assert_eq!(verticals.len(), 10);
        assert_eq!(verticals[0].alpha, 0.5);
        assert_eq!(verticals[1].alpha, 0.25);
    }

    #[test]
    fn isometric_diagonals_share_the_sixty_degree_slope() {
        let lines = isometric_lines(200.0, 100.0, 20.0, 0.25);
        let reach = 100.0 * 3f32.sqrt();
        assert!(lines.iter().any(|l| l.from.x == l.to.x));
        for l in lines.iter().filter(|l| l.from.x != l.to.x) {
            assert!(((l.to.x - l.from.x).abs() - reach).abs() < 1e-3);
        }
    }

    #[test]
    fn no_grid_draws_nothing() {
        let mut surface = Recorder::new(50, 50);
        draw_grid(&mut surface, &GridSettings::default());
        assert!(surface.commands().is_empty());
    }

    #[test]
    fn split_grid_clips_each_half_and_resets() {
        let mut surface = Recorder::new(100, 60);
        let settings = GridSettings {
            kind: Some(GridKind::Split),
            ..GridSettings::default()
        };
        draw_grid(&mut surface, &settings);
        let clips: Vec<_> = surface
            .commands()
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Clip(clip) => Some(*clip),
                _ => None,
            })
            .collect();
        assert_eq!(clips.len(), 3);
        assert_eq!(clips[0].unwrap().max.x, 50.0);
        assert_eq!(clips[1].unwrap().min.x, 50.0);
        assert_eq!(clips[2], None);
    }

    #[test]
    fn degenerate_spacing_is_bounded() {
        let settings = GridSettings {
            kind: Some(GridKind::Oblique),
            spacing: 0.0,
            opacity: 3.0,
        };
        let mut surface = Recorder::new(20, 20);
        draw_grid(&mut surface, &settings);
        assert!(!surface.commands().is_empty());
    }

    #[test]
    fn grid_kind_names_parse() {
        assert_eq!(GridKind::parse("ISO"), Some(GridKind::Isometric));
        assert_eq!(GridKind::parse("obliso"), Some(GridKind::Split));
        assert_eq!(GridKind::parse("hex"), None);
    }
}
