use std::path::{Path, PathBuf};
use std::time::Instant;

use eframe::egui;

use super::input_handler::handle_input;
use super::render_helper::{self, CanvasTexture};
use super::state::{PointerMode, TimelapseOptions};
use crate::{
    animation::TickOutcome,
    canvas::canvas::Canvas,
    config::Settings,
    sketch::Sketch,
    tablet::TabletInput,
    ui,
    utils::{color::Color, exporter},
};

/// Main egui application: owns the sketch, the canvas texture and the
/// front-end only state such as the pointer mode.
pub struct WigglePainterApp {
    pub(crate) sketch: Sketch<Canvas>,
    pub(crate) texture: CanvasTexture,
    pub(crate) tablet: Option<TabletInput>,
    pub(crate) mode: PointerMode,
    pub(crate) is_panning: bool,
    pub(crate) timelapse: TimelapseOptions,
    pub(crate) status: Option<String>,
    pub(crate) document_path: Option<PathBuf>,
    container: Option<egui::Vec2>,
}

impl WigglePainterApp {
    pub fn new(cc: &eframe::CreationContext<'_>, settings: Settings) -> Self {
        let canvas = Canvas::new(settings.canvas_width, settings.canvas_height, Color::white());
        let mut app = Self {
            sketch: Sketch::new(canvas, &settings),
            texture: CanvasTexture::new(),
            tablet: TabletInput::new(cc),
            mode: PointerMode::Draw,
            is_panning: false,
            timelapse: TimelapseOptions::default(),
            status: None,
            document_path: None,
            container: None,
        };
        if let Some(path) = &settings.open {
            app.open_path(path);
        }
        app
    }

    pub(crate) fn set_status(&mut self, msg: impl Into<String>) {
        self.status = Some(msg.into());
    }

    /// Load a sketch file, reporting failures in the status bar.
    pub(crate) fn open_path(&mut self, path: &Path) -> bool {
        match self.sketch.load_file(path) {
            Ok(()) => {
                self.document_path = Some(path.to_path_buf());
                self.set_status(format!("Opened {}", path.display()));
                self.texture.mark_dirty();
                true
            }
            Err(err) => {
                log::error!("failed to open {}: {err}", path.display());
                self.set_status(format!("Open failed: {err}"));
                false
            }
        }
    }

    pub(crate) fn open_dialog(&mut self) -> bool {
        match ui::files::pick_sketch_to_open() {
            Some(path) => self.open_path(&path),
            None => false,
        }
    }

    pub(crate) fn save_dialog(&mut self) {
        let Some(path) = ui::files::pick_sketch_to_save("sketch.json") else {
            return;
        };
        match self.sketch.save_file(&path) {
            Ok(()) => {
                self.set_status(format!("Saved {}", path.display()));
                self.document_path = Some(path);
            }
            Err(err) => {
                log::error!("failed to save {}: {err}", path.display());
                self.set_status(format!("Save failed: {err}"));
            }
        }
    }

    pub(crate) fn export_dialog(&mut self) {
        let Some(path) = ui::files::pick_frame_to_export("frame.png") else {
            return;
        };
        match exporter::export_png(self.sketch.surface(), &path) {
            Ok(()) => self.set_status(format!("Exported {}", path.display())),
            Err(err) => {
                log::error!("export failed: {err}");
                self.set_status(format!("Export failed: {err}"));
            }
        }
    }
}

impl eframe::App for WigglePainterApp {
    /// Panels, input, one animation tick, texture upload, then paint.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let mut changed = false;
        changed |= ui::top_bar::top_bar(self, ctx);
        changed |= ui::brush_settings::brush_settings_panel(self, ctx);
        changed |= ui::animation_panel::animation_panel(self, ctx);
        ui::top_bar::status_bar(self, ctx);

        egui::CentralPanel::default()
            .frame(egui::Frame::none())
            .show(ctx, |ui| {
                let available = ui.available_size();
                if self.container != Some(available) {
                    self.sketch.resize_view(available.x, available.y);
                    self.container = Some(available);
                }

                let (container, mut view) = render_helper::allocate_canvas(ui, self.sketch.view());
                changed |= handle_input(self, ctx, &mut view);
                changed |= self.sketch.tick(Instant::now()) == TickOutcome::Rendered;

                if changed {
                    self.texture.mark_dirty();
                }
                self.texture.upload(ctx, self.sketch.surface());

                let rect = render_helper::canvas_rect(container, self.sketch.view());
                render_helper::paint_canvas(ui, container, rect, &self.texture, self.sketch.surface());
            });

        if self.sketch.is_drawing() || self.is_panning {
            ctx.request_repaint();
        } else if let Some(wait) = self.sketch.next_frame_in(Instant::now()) {
            ctx.request_repaint_after(wait);
        }
    }
}
