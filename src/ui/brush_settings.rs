use crate::app::WigglePainterApp;
use crate::brush_engine::brush::{MAX_BASE_SIZE, MIN_BASE_SIZE};
use crate::render::grid::GridKind;
use crate::utils::color::Color;
use eframe::egui;

/// Pen and drawing-guide settings. Returns whether the raster changed.
pub fn brush_settings_panel(app: &mut WigglePainterApp, ctx: &egui::Context) -> bool {
    let mut changed = false;
    egui::SidePanel::left("brush_settings")
        .resizable(false)
        .default_width(200.0)
        .show(ctx, |ui| {
            ui.heading("Brush");
            ui.separator();

            let brush = &mut app.sketch.brush;
            ui.horizontal(|ui| {
                ui.label("Color:");
                let mut rgb = brush.color.to_srgb();
                if ui.color_edit_button_srgb(&mut rgb).changed() {
                    brush.color = Color::from_srgb(rgb);
                }
            });

            ui.label("Size:");
            let mut size = brush.base_size;
            if ui
                .add(egui::Slider::new(&mut size, MIN_BASE_SIZE..=MAX_BASE_SIZE).logarithmic(true))
                .changed()
            {
                brush.set_base_size(size);
            }
            ui.checkbox(&mut brush.ruler, "Ruler (straight lines)");

            ui.add_space(8.0);
            ui.heading("Grid");
            ui.separator();

            let mut grid = *app.sketch.grid();
            egui::ComboBox::from_id_salt("grid_kind")
                .selected_text(grid.kind.map_or("None", |k| k.label()))
                .show_ui(ui, |ui| {
                    ui.selectable_value(&mut grid.kind, None, "None");
                    for kind in GridKind::ALL {
                        ui.selectable_value(&mut grid.kind, Some(kind), kind.label());
                    }
                });
            ui.add_enabled(
                grid.kind.is_some(),
                egui::Slider::new(&mut grid.spacing, 5.0..=100.0).text("Spacing"),
            );
            ui.add_enabled(
                grid.kind.is_some(),
                egui::Slider::new(&mut grid.opacity, 0.05..=1.0).text("Opacity"),
            );
            if grid != *app.sketch.grid() {
                app.sketch.set_grid(grid);
                changed = true;
            }
        });
    changed
}
