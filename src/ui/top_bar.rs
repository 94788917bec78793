use crate::animation::AnimationState;
use crate::app::WigglePainterApp;
use crate::app::state::{PointerMode, ZOOM_STEP};
use eframe::egui;

/// File, history, pointer-mode and zoom controls. Returns whether the raster changed.
pub fn top_bar(app: &mut WigglePainterApp, ctx: &egui::Context) -> bool {
    let mut changed = false;
    egui::TopBottomPanel::top("quick_settings").show(ctx, |ui| {
        ui.horizontal(|ui| {
            if ui.button("Open").clicked() {
                changed |= app.open_dialog();
            }
            if ui.button("Save").clicked() {
                app.save_dialog();
            }
            if ui.button("Export PNG").clicked() {
                app.export_dialog();
            }
            ui.separator();

            let can_undo = app.sketch.undo_history().can_undo();
            if ui.add_enabled(can_undo, egui::Button::new("⟲ Undo")).clicked() {
                changed |= app.sketch.undo();
            }
            if ui.button("Clear").clicked() {
                app.sketch.clear();
                changed = true;
            }
            ui.separator();

            for mode in [PointerMode::Draw, PointerMode::Pan] {
                ui.selectable_value(&mut app.mode, mode, mode.label());
            }
            ui.separator();

            if ui.button("−").clicked() {
                app.sketch.change_zoom(-ZOOM_STEP);
            }
            ui.label(format!("{:.0}%", app.sketch.view().scale * 100.0));
            if ui.button("+").clicked() {
                app.sketch.change_zoom(ZOOM_STEP);
            }
            if ui.button("Reset view").clicked() {
                app.sketch.reset_view();
            }
        });
    });
    changed
}

fn describe(state: &AnimationState, strokes: usize) -> String {
    match state {
        AnimationState::Idle => "Idle".to_string(),
        AnimationState::Wiggling => "Wiggling".to_string(),
        AnimationState::Timelapse(t) => format!(
            "Time-lapse {}/{}{}",
            t.cursor + 1,
            strokes,
            if t.wiggle { " + wiggle" } else { "" }
        ),
    }
}

pub fn status_bar(app: &WigglePainterApp, ctx: &egui::Context) {
    egui::TopBottomPanel::bottom("status").show(ctx, |ui| {
        ui.horizontal(|ui| {
            let strokes = app.sketch.strokes().len();
            ui.label(format!("{strokes} strokes"));
            ui.separator();
            ui.label(describe(app.sketch.animation().state(), strokes));
            if app.sketch.brush.ruler {
                ui.separator();
                ui.label("Ruler");
            }
            if let Some(path) = &app.document_path {
                ui.separator();
                ui.label(path.display().to_string());
            }
            if let Some(msg) = &app.status {
                ui.separator();
                ui.label(msg);
            }
        });
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::{TimelapseStepping, state::Timelapse};

    #[test]
    fn timelapse_status_is_one_based() {
        let state = AnimationState::Timelapse(Timelapse {
            cursor: 0,
            stepping: TimelapseStepping::Manual,
            wiggle: true,
        });
        assert_eq!(describe(&state, 3), "Time-lapse 1/3 + wiggle");
        assert_eq!(describe(&AnimationState::Idle, 0), "Idle");
    }
}
