use eframe::egui;

use crate::animation::StepDirection;
use crate::app::render_helper::CanvasView;
use crate::app::state::{PointerMode, WHEEL_ZOOM_STEP, ZOOM_STEP};
use crate::app::WigglePainterApp;

/// Feed this frame's pointer, wheel, tablet and keyboard input to the sketch.
/// Returns whether the raster changed.
pub fn handle_input(app: &mut WigglePainterApp, ctx: &egui::Context, view: &mut CanvasView) -> bool {
    let pressure = app.tablet.as_mut().and_then(|t| t.poll());
    let mut changed = false;

    let events = ctx.input(|i| i.events.clone());
    for event in events {
        match event {
            egui::Event::PointerButton {
                pos,
                button,
                pressed,
                ..
            } => match button {
                egui::PointerButton::Primary => {
                    if pressed && view.response.hovered() {
                        let space_down = ctx.input(|i| i.key_down(egui::Key::Space));
                        if app.mode == PointerMode::Pan || space_down {
                            app.is_panning = true;
                        } else {
                            changed |= app.sketch.begin_stroke(view.local(pos), pressure);
                        }
                    } else if !pressed {
                        app.is_panning = false;
                        changed |= app.sketch.finalize_stroke();
                    }
                }
                egui::PointerButton::Secondary => {
                    app.is_panning = pressed && view.response.hovered();
                }
                _ => {}
            },

            egui::Event::PointerMoved(pos) => {
                if !app.is_panning && app.sketch.is_drawing() {
                    changed |= app.sketch.append_point(view.local(pos), pressure);
                }
            }

            egui::Event::MouseWheel { delta, .. } => {
                if view.response.hovered() && delta.y != 0.0 {
                    if let Some(pos) = ctx.input(|i| i.pointer.hover_pos()) {
                        let local = view.local(pos);
                        let step = WHEEL_ZOOM_STEP * delta.y.signum();
                        if app.sketch.zoom_at_point(local.x, local.y, step) {
                            view.refresh(app.sketch.view());
                        }
                    }
                }
            }

            egui::Event::Key {
                key,
                pressed: true,
                modifiers,
                ..
            } => {
                if !ctx.wants_keyboard_input() {
                    changed |= handle_key(app, key, modifiers);
                    view.refresh(app.sketch.view());
                }
            }

            _ => {}
        }
    }

    if app.is_panning {
        let delta = ctx.input(|i| i.pointer.delta());
        if delta != egui::Vec2::ZERO {
            if app.sketch.pan(delta.x, delta.y) {
                view.refresh(app.sketch.view());
            }
        }
    }
    changed
}

fn handle_key(app: &mut WigglePainterApp, key: egui::Key, modifiers: egui::Modifiers) -> bool {
    use egui::Key;

    if modifiers.command {
        return match key {
            Key::Z => app.sketch.undo(),
            Key::S => {
                app.save_dialog();
                false
            }
            Key::O | Key::L => app.open_dialog(),
            Key::E => {
                app.export_dialog();
                false
            }
            _ => false,
        };
    }

    match key {
        Key::D => {
            app.mode = app.mode.toggled();
            false
        }
        Key::R => {
            app.sketch.brush.ruler = !app.sketch.brush.ruler;
            false
        }
        Key::Plus | Key::Equals => {
            app.sketch.change_zoom(ZOOM_STEP);
            false
        }
        Key::Minus => {
            app.sketch.change_zoom(-ZOOM_STEP);
            false
        }
        Key::Num0 => {
            app.sketch.reset_view();
            false
        }
        Key::ArrowRight => app.sketch.step_timelapse(StepDirection::Next),
        Key::ArrowLeft => app.sketch.step_timelapse(StepDirection::Previous),
        Key::W => app.sketch.toggle_wiggle(),
        Key::T => app.sketch.start_timelapse(app.timelapse.stepping()),
        Key::Escape => app.sketch.stop_wiggle(),
        _ => false,
    }
}
