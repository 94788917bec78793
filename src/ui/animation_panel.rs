use crate::animation::StepDirection;
use crate::animation::engine::{MAX_FRAME_MS, MIN_FRAME_MS};
use crate::animation::jitter::MAX_WIGGLE;
use crate::animation::state::TimelapseStepping;
use crate::app::WigglePainterApp;
use eframe::egui;

/// Wiggle and time-lapse controls. Returns whether the raster changed.
pub fn animation_panel(app: &mut WigglePainterApp, ctx: &egui::Context) -> bool {
    let mut changed = false;
    egui::SidePanel::right("animation")
        .resizable(false)
        .default_width(220.0)
        .show(ctx, |ui| {
            ui.heading("Wiggle");
            ui.separator();

            let wiggling = app.sketch.animation().state().is_wiggling();
            let label = if wiggling { "⏹ Stop wiggle" } else { "▶ Wiggle" };
            if ui.button(label).clicked() {
                changed |= app.sketch.toggle_wiggle();
            }

            let mut amount = app.sketch.animation().wiggle_amount();
            if ui
                .add(egui::Slider::new(&mut amount, 0.0..=MAX_WIGGLE).text("Amount"))
                .changed()
            {
                app.sketch.set_wiggle_amount(amount);
            }

            let mut frame_ms = app.sketch.animation().frame_duration().as_millis() as u64;
            if ui
                .add(
                    egui::Slider::new(&mut frame_ms, MIN_FRAME_MS..=MAX_FRAME_MS)
                        .logarithmic(true)
                        .text("Frame (ms)"),
                )
                .changed()
            {
                app.sketch.set_frame_ms(frame_ms);
            }

            let mut auto = app.sketch.auto_wiggle();
            if ui.checkbox(&mut auto, "Wiggle after first stroke").changed() {
                app.sketch.set_auto_wiggle(auto);
            }

            ui.add_space(8.0);
            ui.heading("Time-lapse");
            ui.separator();

            ui.checkbox(&mut app.timelapse.manual, "Step manually");
            ui.add_enabled(
                !app.timelapse.manual,
                egui::Checkbox::new(&mut app.timelapse.looping, "Loop"),
            );

            let state = *app.sketch.animation().state();
            let label = if state.is_timelapsing() {
                "⏹ End time-lapse"
            } else {
                "▶ Play time-lapse"
            };
            if ui.button(label).clicked() {
                changed |= app.sketch.start_timelapse(app.timelapse.stepping());
            }

            if let Some(t) = state.timelapse() {
                if t.stepping == TimelapseStepping::Manual {
                    ui.horizontal(|ui| {
                        if ui.button("◀").clicked() {
                            changed |= app.sketch.step_timelapse(StepDirection::Previous);
                        }
                        ui.label(format!("{} / {}", t.cursor + 1, app.sketch.strokes().len()));
                        if ui.button("▶").clicked() {
                            changed |= app.sketch.step_timelapse(StepDirection::Next);
                        }
                    });
                }
            }

            ui.add_space(8.0);
            ui.separator();
            if ui
                .add_enabled(!state.is_idle(), egui::Button::new("Stop all"))
                .clicked()
            {
                changed |= app.sketch.stop_wiggle();
            }

            ui.add_space(8.0);
            ui.label("Keys: W wiggle, T time-lapse, ←/→ step, Esc stop");
            ui.label("D draw/pan, R ruler, +/−/0 zoom, Ctrl+Z undo");
        });
    changed
}
