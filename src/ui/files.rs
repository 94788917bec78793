use std::path::PathBuf;

pub const SKETCH_EXTENSION: &str = "json";
pub const FRAME_EXTENSION: &str = "png";

pub fn pick_sketch_to_open() -> Option<PathBuf> {
    rfd::FileDialog::new()
        .add_filter("Wiggle sketch", &[SKETCH_EXTENSION])
        .pick_file()
}

pub fn pick_sketch_to_save(default_name: &str) -> Option<PathBuf> {
    rfd::FileDialog::new()
        .add_filter("Wiggle sketch", &[SKETCH_EXTENSION])
        .set_file_name(default_name)
        .save_file()
        .map(|p| ensure_extension(p, SKETCH_EXTENSION))
}

pub fn pick_frame_to_export(default_name: &str) -> Option<PathBuf> {
    rfd::FileDialog::new()
        .add_filter("PNG image", &[FRAME_EXTENSION])
        .set_file_name(default_name)
        .save_file()
        .map(|p| ensure_extension(p, FRAME_EXTENSION))
}

pub fn ensure_extension(mut path: PathBuf, ext: &str) -> PathBuf {
    match path.extension().and_then(|e| e.to_str()) {
        Some(current) if current.eq_ignore_ascii_case(ext) => path,
        _ => {
            path.set_extension(ext);
            path
        }
    }
}
