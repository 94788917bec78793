use std::path::Path;

use image::{ImageFormat, RgbaImage};
use thiserror::Error;

use crate::canvas::canvas::Canvas;
use crate::canvas::surface::DrawingSurface;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("raster of {width}x{height} does not match its pixel buffer")]
    Size { width: usize, height: usize },
    #[error("failed to encode image: {0}")]
    Image(#[from] image::ImageError),
}

/// Build an RGBA image of the current raster frame, grid overlay included.
pub fn canvas_image(canvas: &Canvas) -> Result<RgbaImage, ExportError> {
    let (width, height) = (canvas.width(), canvas.height());
    RgbaImage::from_raw(width as u32, height as u32, canvas.to_rgba_bytes())
        .ok_or(ExportError::Size { width, height })
}

/// Write the current frame as a PNG.
pub fn export_png(canvas: &Canvas, path: &Path) -> Result<(), ExportError> {
    let img = canvas_image(canvas)?;
    img.save_with_format(path, ImageFormat::Png)?;
    log::info!("exported {}x{} frame to {}", img.width(), img.height(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::surface::LineStyle;
    use crate::utils::{color::Color, vector::Vec2};

    #[test]
    fn image_matches_raster_pixels() {
        let mut canvas = Canvas::new(16, 8, Color::white());
        canvas.stroke_segment(
            Vec2::new(2.0, 4.0),
            Vec2::new(14.0, 4.0),
            &LineStyle {
                width: 3.0,
                color: Color::rgb(255, 0, 0),
            },
        );
        let img = canvas_image(&canvas).unwrap();
        assert_eq!(img.dimensions(), (16, 8));
        assert_eq!(img.get_pixel(0, 0).0, [255, 255, 255, 255]);
        let center = img.get_pixel(8, 4).0;
        assert_eq!(center[0], 255);
        assert!(center[1] < 50);
    }

    #[test]
    fn png_is_written() {
        let canvas = Canvas::new(4, 4, Color::black());
        let path = std::env::temp_dir().join(format!("wiggle-export-{}.png", std::process::id()));
        export_png(&canvas, &path).unwrap();
        let decoded = image::open(&path).unwrap().to_rgba8();
        assert_eq!(decoded.get_pixel(3, 3).0, [0, 0, 0, 255]);
        std::fs::remove_file(&path).unwrap();
    }
}
