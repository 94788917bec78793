use eframe::egui::{self, Color32, ColorImage, TextureHandle, TextureOptions};

use crate::canvas::canvas::Canvas;
use crate::canvas::transform::ViewTransform;
use crate::utils::{profiler::ScopeTimer, vector::Vec2};

/// Where the canvas landed on screen this frame.
pub struct CanvasView {
    pub container: egui::Rect,
    pub rect: egui::Rect,
    pub response: egui::Response,
}

impl CanvasView {
    /// Pointer position relative to the displayed canvas' top-left.
    pub fn local(&self, pos: egui::Pos2) -> Vec2 {
        local_position(self.rect, pos)
    }

    /// Re-place the canvas after a zoom or pan earlier in the same event batch.
    pub fn refresh(&mut self, view: &ViewTransform) {
        self.rect = canvas_rect(self.container, view);
    }
}

pub fn local_position(rect: egui::Rect, pos: egui::Pos2) -> Vec2 {
    let d = pos - rect.min;
    Vec2::new(d.x, d.y)
}

/// GPU copy of the raster, re-uploaded only when the raster changed.
pub struct CanvasTexture {
    texture: Option<TextureHandle>,
    image: ColorImage,
    dirty: bool,
}

impl CanvasTexture {
    pub fn new() -> Self {
        Self {
            texture: None,
            image: ColorImage::new([1, 1], Color32::TRANSPARENT),
            dirty: true,
        }
    }

    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub fn upload(&mut self, ctx: &egui::Context, canvas: &Canvas) {
        if !self.dirty && self.texture.is_some() {
            return;
        }
        let _timer = ScopeTimer::new("texture_set");
        canvas.write_to_color_image(&mut self.image);
        match &mut self.texture {
            Some(texture) => texture.set(self.image.clone(), TextureOptions::LINEAR),
            None => {
                self.texture =
                    Some(ctx.load_texture("canvas", self.image.clone(), TextureOptions::LINEAR));
            }
        }
        self.dirty = false;
    }

    pub fn id(&self) -> Option<egui::TextureId> {
        self.texture.as_ref().map(|t| t.id())
    }
}

impl Default for CanvasTexture {
    fn default() -> Self {
        Self::new()
    }
}

/// Screen rectangle of the canvas inside `container`: centred, shifted by
/// `offset * scale`, sized `content * scale`.
pub fn canvas_rect(container: egui::Rect, view: &ViewTransform) -> egui::Rect {
    let size = view.displayed_size();
    let shift = view.offset * view.scale;
    egui::Rect::from_center_size(
        container.center() + egui::vec2(shift.x, shift.y),
        egui::vec2(size.x, size.y),
    )
}

/// Reserve the central area and work out where the canvas sits in it.
pub fn allocate_canvas(ui: &mut egui::Ui, view: &ViewTransform) -> (egui::Rect, CanvasView) {
    let (container, response) =
        ui.allocate_exact_size(ui.available_size(), egui::Sense::click_and_drag());
    let rect = canvas_rect(container, view);
    (
        container,
        CanvasView {
            container,
            rect,
            response,
        },
    )
}

pub fn paint_canvas(
    ui: &egui::Ui,
    container: egui::Rect,
    rect: egui::Rect,
    texture: &CanvasTexture,
    canvas: &Canvas,
) {
    let painter = ui.painter_at(container);
    painter.rect_filled(container, 0.0, Color32::from_gray(48));
    match texture.id() {
        Some(id) => {
            let uv = egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0));
            painter.image(id, rect, uv, Color32::WHITE);
        }
        None => {
            painter.rect_filled(rect, 0.0, canvas.clear_color());
        }
    }
    painter.rect_stroke(rect, 0.0, egui::Stroke::new(1.0, Color32::from_gray(90)));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canvas_is_centred_and_shifted_by_scaled_offset() {
        let container = egui::Rect::from_min_size(egui::pos2(0.0, 0.0), egui::vec2(400.0, 300.0));
        let mut view = ViewTransform::new(200.0, 100.0);
        view.set_visible_size(400.0, 300.0);
        let rect = canvas_rect(container, &view);
        assert_eq!(rect.min, egui::pos2(100.0, 100.0));

        view.scale = 2.0;
        view.offset = Vec2::new(10.0, -5.0);
        let rect = canvas_rect(container, &view);
        assert_eq!(rect.size(), egui::vec2(400.0, 200.0));
        assert_eq!(rect.center(), egui::pos2(220.0, 140.0));
    }

    #[test]
    fn replaced_rect_tracks_a_zoom_within_the_frame() {
        let container = egui::Rect::from_min_size(egui::pos2(0.0, 0.0), egui::vec2(400.0, 300.0));
        let mut view = ViewTransform::new(200.0, 100.0);
        view.set_visible_size(400.0, 300.0);
        let before = canvas_rect(container, &view);

        assert!(view.zoom_at_point(50.0, 20.0, 1.0));
        let after = canvas_rect(container, &view);
        assert_ne!(before, after);

        let top_left = view.to_canvas_space(local_position(after, after.min));
        let bottom_right = view.to_canvas_space(local_position(after, after.max));
        assert_eq!(top_left, Vec2::ZERO);
        assert!((bottom_right.x - 200.0).abs() < 1e-3);
        assert!((bottom_right.y - 100.0).abs() < 1e-3);

        // The stale rect no longer maps its corner to the canvas origin.
        let stale = view.to_canvas_space(local_position(before, after.min));
        assert_ne!(stale, Vec2::ZERO);
    }
}
