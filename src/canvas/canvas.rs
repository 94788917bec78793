use eframe::egui::{Color32, ColorImage};
use rayon::prelude::*;

use crate::canvas::surface::{ClipRect, DrawingSurface, LineStyle};
use crate::utils::{color::Color, vector::Vec2, vector::distance_to_segment};

/// Below this many covered pixels a segment is rasterized on the calling thread.
const PARALLEL_MIN_PIXELS: usize = 16 * 1024;

/// Full-canvas pixel copy captured by the undo stack.
#[derive(Clone, Debug, PartialEq)]
pub struct RasterSnapshot {
    width: usize,
    height: usize,
    pixels: Vec<Color32>,
}

impl RasterSnapshot {
    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }
}

/// CPU raster the strokes are painted into. The view transform never touches
/// it: pixels are always addressed in canvas space.
pub struct Canvas {
    width: usize,
    height: usize,
    clear_color: Color32,
    pixels: Vec<Color32>,
    clip: Option<ClipRect>,
}

impl Canvas {
    pub fn new(width: usize, height: usize, clear_color: Color) -> Self {
        let (width, height) = (width.max(1), height.max(1));
        let clear_color = clear_color.to_color32();
        Self {
            width,
            height,
            clear_color,
            pixels: vec![clear_color; width * height],
            clip: None,
        }
    }

    pub fn pixel(&self, x: usize, y: usize) -> Option<Color32> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.pixels.get(y * self.width + x).copied()
    }

    pub fn clear_color(&self) -> Color32 {
        self.clear_color
    }

    /// Copy the whole raster into an egui image for texture upload.
    pub fn write_to_color_image(&self, out: &mut ColorImage) {
        if out.size != [self.width, self.height] {
            out.size = [self.width, self.height];
        }
        out.pixels.clear();
        out.pixels.extend_from_slice(&self.pixels);
    }

    /// Straight (unmultiplied) RGBA bytes, row-major.
    pub fn to_rgba_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.pixels.len() * 4);
        for px in &self.pixels {
            bytes.extend_from_slice(&px.to_srgba_unmultiplied());
        }
        bytes
    }

    /// Pixel rows/columns touched by a capsule of `radius` around `from..to`,
    /// intersected with the canvas and the active clip.
    fn covered_bounds(&self, from: Vec2, to: Vec2, radius: f32) -> Option<(usize, usize, usize, usize)> {
        let pad = radius + 1.0;
        let mut min_x = from.x.min(to.x) - pad;
        let mut max_x = from.x.max(to.x) + pad;
        let mut min_y = from.y.min(to.y) - pad;
        let mut max_y = from.y.max(to.y) + pad;
        if let Some(clip) = self.clip {
            min_x = min_x.max(clip.min.x);
            min_y = min_y.max(clip.min.y);
            max_x = max_x.min(clip.max.x);
            max_y = max_y.min(clip.max.y);
        }

        let x0 = min_x.floor().max(0.0) as usize;
        let y0 = min_y.floor().max(0.0) as usize;
        let x1 = (max_x.ceil().max(0.0) as usize).min(self.width);
        let y1 = (max_y.ceil().max(0.0) as usize).min(self.height);
        if x0 >= x1 || y0 >= y1 {
            return None;
        }
        Some((x0, x1, y0, y1))
    }
}

/// Blend one row of a capsule into `row`, which holds canvas row `y`.
fn blend_capsule_row(
    row: &mut [Color32],
    y: usize,
    x0: usize,
    x1: usize,
    seg: (Vec2, Vec2),
    radius: f32,
    color: Color,
    clip: Option<ClipRect>,
) {
    for (x, px) in row.iter_mut().enumerate().take(x1).skip(x0) {
        let center = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
        if let Some(clip) = clip {
            if !clip.contains(center) {
                continue;
            }
        }
        let d = distance_to_segment(center, seg.0, seg.1);
        let coverage = (radius + 0.5 - d).clamp(0.0, 1.0);
        if coverage <= 0.0 {
            continue;
        }
        let src = color.with_alpha(color.a * coverage);
        let dst = Color::from_color32(*px);
        *px = alpha_over(src, dst).to_color32();
    }
}

impl DrawingSurface for Canvas {
    type Snapshot = RasterSnapshot;

    fn width(&self) -> usize {
        self.width
    }

    fn height(&self) -> usize {
        self.height
    }

    fn clear(&mut self) {
        self.pixels.fill(self.clear_color);
    }

    fn stroke_segment(&mut self, from: Vec2, to: Vec2, style: &LineStyle) {
        if style.width <= 0.0 || style.color.a <= 0.0 {
            return;
        }
        let radius = style.width * 0.5;
        let Some((x0, x1, y0, y1)) = self.covered_bounds(from, to, radius) else {
            return;
        };

        let color = style.color;
        let clip = self.clip;
        if (x1 - x0) * (y1 - y0) < PARALLEL_MIN_PIXELS {
            self.pixels
                .chunks_mut(self.width)
                .enumerate()
                .skip(y0)
                .take(y1 - y0)
                .for_each(|(y, row)| {
                    blend_capsule_row(row, y, x0, x1, (from, to), radius, color, clip)
                });
        } else {
            self.pixels
                .par_chunks_mut(self.width)
                .enumerate()
                .skip(y0)
                .take(y1 - y0)
                .for_each(|(y, row)| {
                    blend_capsule_row(row, y, x0, x1, (from, to), radius, color, clip)
                });
        }
    }

    fn set_clip(&mut self, clip: Option<ClipRect>) {
        self.clip = clip;
    }

    fn snapshot(&self) -> Self::Snapshot {
        RasterSnapshot {
            width: self.width,
            height: self.height,
            pixels: self.pixels.clone(),
        }
    }

    fn restore(&mut self, snapshot: &Self::Snapshot) {
        if snapshot.width != self.width || snapshot.height != self.height {
            log::warn!(
                "ignoring {}x{} snapshot on a {}x{} canvas",
                snapshot.width,
                snapshot.height,
                self.width,
                self.height
            );
            return;
        }
        self.pixels.copy_from_slice(&snapshot.pixels);
    }
}

/// Source-over compositing of straight-alpha colors.
pub fn alpha_over(src: Color, dst: Color) -> Color {
    let out_a = src.a + dst.a * (1.0 - src.a);
    if out_a <= 0.0 {
        return Color {
            r: 0.0,
            g: 0.0,
            b: 0.0,
            a: 0.0,
        };
    }

    let r = (src.r * src.a + dst.r * dst.a * (1.0 - src.a)) / out_a;
    let g = (src.g * src.a + dst.g * dst.a * (1.0 - src.a)) / out_a;
    let b = (src.b * src.a + dst.b * dst.a * (1.0 - src.a)) / out_a;

    Color { r, g, b, a: out_a }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn red(width: f32) -> LineStyle {
        LineStyle {
            width,
            color: Color::rgb(255, 0, 0),
        }
    }

    #[test]
    fn segment_paints_its_core_and_leaves_far_pixels() {
        let mut canvas = Canvas::new(32, 32, Color::white());
        canvas.stroke_segment(Vec2::new(4.0, 16.0), Vec2::new(28.0, 16.0), &red(6.0));
        assert_eq!(canvas.pixel(16, 16), Some(Color32::from_rgb(255, 0, 0)));
        assert_eq!(canvas.pixel(16, 2), Some(Color32::WHITE));
    }

    #[test]
    fn clip_masks_pixels_outside() {
        let mut canvas = Canvas::new(32, 32, Color::white());
        canvas.set_clip(Some(ClipRect::new(Vec2::ZERO, Vec2::new(16.0, 32.0))));
        canvas.stroke_segment(Vec2::new(0.0, 16.0), Vec2::new(32.0, 16.0), &red(4.0));
        assert_eq!(canvas.pixel(8, 16), Some(Color32::from_rgb(255, 0, 0)));
        assert_eq!(canvas.pixel(24, 16), Some(Color32::WHITE));
    }

    #[test]
    fn restore_brings_back_snapshot_pixels() {
        let mut canvas = Canvas::new(16, 16, Color::white());
        let blank = canvas.snapshot();
        canvas.stroke_segment(Vec2::new(0.0, 8.0), Vec2::new(16.0, 8.0), &red(4.0));
        assert_ne!(canvas.snapshot(), blank);
        canvas.restore(&blank);
        assert_eq!(canvas.snapshot(), blank);
    }

    #[test]
    fn segments_off_canvas_are_ignored() {
        let mut canvas = Canvas::new(8, 8, Color::white());
        let before = canvas.snapshot();
        canvas.stroke_segment(Vec2::new(-50.0, -50.0), Vec2::new(-40.0, -40.0), &red(2.0));
        assert_eq!(canvas.snapshot(), before);
    }
}
