//! The single flat document format: a JSON list of strokes plus the canvas
//! size they were drawn on.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::brush_engine::stroke::{Point, Stroke};
use crate::utils::color::Color;

#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("cannot access document: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed document: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid document: {0}")]
    Invalid(String),
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StrokeRecord {
    pub points: Vec<Point>,
    /// `#rrggbb`; `#rgb` is accepted when reading.
    pub color: String,
    pub base_size: f32,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f32>,
    #[serde(default)]
    pub strokes: Vec<StrokeRecord>,
}

fn invalid(msg: impl Into<String>) -> DocumentError {
    DocumentError::Invalid(msg.into())
}

impl Document {
    /// Capture the authoritative geometry of `strokes`, never the jittered copy.
    pub fn from_strokes(strokes: &[Stroke], width: f32, height: f32) -> Self {
        Self {
            width: Some(width),
            height: Some(height),
            strokes: strokes
                .iter()
                .map(|s| StrokeRecord {
                    points: s.original_points().to_vec(),
                    color: s.color().to_hex(),
                    base_size: s.base_size(),
                })
                .collect(),
        }
    }

    pub fn from_json(json: &str) -> Result<Self, DocumentError> {
        let doc: Document = serde_json::from_str(json)?;
        doc.validate()?;
        Ok(doc)
    }

    pub fn to_json(&self) -> Result<String, DocumentError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn read(path: &Path) -> Result<Self, DocumentError> {
        let json = fs::read_to_string(path)?;
        let doc = Self::from_json(&json)?;
        log::info!("read {} strokes from {}", doc.strokes.len(), path.display());
        Ok(doc)
    }

    pub fn write(&self, path: &Path) -> Result<(), DocumentError> {
        fs::write(path, self.to_json()?)?;
        log::info!("wrote {} strokes to {}", self.strokes.len(), path.display());
        Ok(())
    }

    pub fn validate(&self) -> Result<(), DocumentError> {
        for (name, dim) in [("width", self.width), ("height", self.height)] {
            if let Some(v) = dim {
                if !(v.is_finite() && v > 0.0) {
                    return Err(invalid(format!("{name} must be positive, got {v}")));
                }
            }
        }
        for (i, stroke) in self.strokes.iter().enumerate() {
            if !(stroke.base_size.is_finite() && stroke.base_size > 0.0) {
                return Err(invalid(format!(
                    "stroke {i}: base size must be positive, got {}",
                    stroke.base_size
                )));
            }
            Color::from_hex(&stroke.color).map_err(|e| invalid(format!("stroke {i}: {e}")))?;
            for p in &stroke.points {
                if !(p.x.is_finite() && p.y.is_finite()) {
                    return Err(invalid(format!("stroke {i}: non-finite coordinate")));
                }
                if !(0.0..=1.0).contains(&p.pressure) {
                    return Err(invalid(format!(
                        "stroke {i}: pressure {} outside [0, 1]",
                        p.pressure
                    )));
                }
            }
        }
        Ok(())
    }

    /// Per-axis factors mapping this document onto a canvas of the given size.
    /// Identity unless both dimensions were saved and differ.
    pub fn scale_to(&self, canvas_w: f32, canvas_h: f32) -> (f32, f32) {
        match (self.width, self.height) {
            (Some(w), Some(h)) if w != canvas_w || h != canvas_h => (canvas_w / w, canvas_h / h),
            _ => (1.0, 1.0),
        }
    }

    /// Build finished strokes for a canvas of the given size. Displayed and
    /// original geometry start out equal.
    pub fn to_strokes(&self, canvas_w: f32, canvas_h: f32) -> Result<Vec<Stroke>, DocumentError> {
        self.validate()?;
        let (sx, sy) = self.scale_to(canvas_w, canvas_h);
        if (sx, sy) != (1.0, 1.0) {
            log::info!("rescaling document by ({sx:.3}, {sy:.3})");
        }
        self.strokes
            .iter()
            .enumerate()
            .map(|(i, record)| {
                let color = Color::from_hex(&record.color).map_err(|e| invalid(e.to_string()))?;
                let points: Vec<Point> = record.points.iter().map(|p| p.scaled(sx, sy)).collect();
                if points.iter().any(|p| !(p.x.is_finite() && p.y.is_finite())) {
                    return Err(invalid(format!(
                        "stroke {i}: coordinates overflow when rescaled by ({sx}, {sy})"
                    )));
                }
                Ok(Stroke::from_points(points, color, record.base_size))
            })
            .collect()
    }
}
