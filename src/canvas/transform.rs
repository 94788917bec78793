use crate::utils::vector::Vec2;

pub const MIN_SCALE: f32 = 0.1;
pub const MAX_SCALE: f32 = 10.0;

/// Pan/zoom applied when the canvas is displayed.
///
/// Stored stroke coordinates never include the pan: the front end places the
/// displayed canvas at `container_center + offset * scale`, and pointer
/// positions measured from that rectangle's top-left only need dividing by
/// `scale` to land in canvas space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewTransform {
    pub scale: f32,
    pub offset: Vec2,
    content: Vec2,
    visible: Vec2,
}

impl ViewTransform {
    /// Identity view for a canvas of `content` size shown in a container of
    /// the same size.
    pub fn new(content_w: f32, content_h: f32) -> Self {
        Self {
            scale: 1.0,
            offset: Vec2::ZERO,
            content: Vec2::new(content_w, content_h),
            visible: Vec2::new(content_w, content_h),
        }
    }

    pub fn content_size(&self) -> Vec2 {
        self.content
    }

    pub fn visible_size(&self) -> Vec2 {
        self.visible
    }

    /// Pointer position relative to the displayed canvas rectangle, mapped
    /// into canvas space.
    pub fn to_canvas_space(&self, screen: Vec2) -> Vec2 {
        screen / self.scale
    }

    /// Size of the canvas as currently displayed.
    pub fn displayed_size(&self) -> Vec2 {
        self.content * self.scale
    }

    /// Zoom by an additive `delta` keeping the canvas point under `(x, y)`
    /// visually stationary. Returns false when the clamped scale and the
    /// offset did not change.
    pub fn zoom_at_point(&mut self, x: f32, y: f32, delta: f32) -> bool {
        let before = *self;
        let old_scale = self.scale;
        let new_scale = (old_scale + delta).clamp(MIN_SCALE, MAX_SCALE);

        let under_cursor = Vec2::new(x, y) / old_scale;
        self.offset = self.offset + under_cursor * (old_scale - new_scale) / new_scale;
        self.scale = new_scale;
        self.clamp_to_view();

        log::debug!("zoom {:.2} -> {:.2}", old_scale, new_scale);
        *self != before
    }

    /// Zoom around the middle of the displayed canvas.
    pub fn change_zoom(&mut self, delta: f32) -> bool {
        let center = self.displayed_size() * 0.5;
        self.zoom_at_point(center.x, center.y, delta)
    }

    /// Pan by a screen-space delta.
    pub fn pan(&mut self, dx: f32, dy: f32) -> bool {
        let before = self.offset;
        self.offset = self.offset + Vec2::new(dx, dy) / self.scale;
        self.clamp_to_view();
        self.offset != before
    }

    pub fn reset(&mut self) {
        self.scale = 1.0;
        self.offset = Vec2::ZERO;
    }

    /// View-resize notification. Only the clamp extent changes.
    pub fn set_visible_size(&mut self, width: f32, height: f32) {
        self.visible = Vec2::new(width.max(0.0), height.max(0.0));
        self.clamp_to_view();
    }

    /// Keep the scaled canvas from drifting out of the visible container.
    pub fn clamp_to_view(&mut self) {
        let scaled = self.displayed_size();
        let max_x = ((scaled.x - self.visible.x) / 2.0).max(0.0);
        let max_y = ((scaled.y - self.visible.y) / 2.0).max(0.0);
        self.offset.x = self.offset.x.clamp(-max_x, max_x);
        self.offset.y = self.offset.y.clamp(-max_y, max_y);
    }
}
