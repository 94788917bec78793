use wiggle_painter::{Settings, WigglePainterApp};

fn main() -> eframe::Result<()> {
    env_logger::init();

    let settings = Settings::from_env();
    log::info!(
        "starting with a {}x{} canvas, {} ms frames",
        settings.canvas_width,
        settings.canvas_height,
        settings.frame_ms
    );

    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default().with_inner_size([1280.0, 860.0]),
        ..Default::default()
    };
    eframe::run_native(
        "Wiggle Painter",
        options,
        Box::new(|cc| Ok(Box::new(WigglePainterApp::new(cc, settings)))),
    )
}
