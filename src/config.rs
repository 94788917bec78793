use std::path::PathBuf;

use crate::animation::engine::{DEFAULT_FRAME_MS, MAX_FRAME_MS, MIN_FRAME_MS};
use crate::animation::jitter::{DEFAULT_WIGGLE, MAX_WIGGLE};
use crate::brush_engine::brush::BrushSettings;
use crate::canvas::history::HISTORY_LIMIT;
use crate::render::grid::{GridKind, GridSettings};
use crate::utils::color::Color;

/// A4 landscape at 120 dpi.
pub const DEFAULT_CANVAS_WIDTH: usize = 1414;
pub const DEFAULT_CANVAS_HEIGHT: usize = 1000;
pub const MAX_CANVAS_SIDE: usize = 8192;
pub const MAX_HISTORY_LIMIT: usize = 200;

/// Launch configuration.
#[derive(Clone, Debug, PartialEq)]
pub struct Settings {
    pub canvas_width: usize,
    pub canvas_height: usize,
    pub frame_ms: u64,
    pub wiggle_amount: f32,
    pub history_limit: usize,
    pub grid: GridSettings,
    /// Start wiggling as soon as the first stroke of a blank sketch lands.
    pub auto_wiggle: bool,
    pub brush: BrushSettings,
    pub open: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            canvas_width: DEFAULT_CANVAS_WIDTH,
            canvas_height: DEFAULT_CANVAS_HEIGHT,
            frame_ms: DEFAULT_FRAME_MS,
            wiggle_amount: DEFAULT_WIGGLE,
            history_limit: HISTORY_LIMIT,
            grid: GridSettings::default(),
            auto_wiggle: true,
            brush: BrushSettings::default(),
            open: None,
        }
    }
}

fn parse_value<T: std::str::FromStr>(flag: &str, value: Option<String>) -> Option<T> {
    let Some(raw) = value else {
        log::warn!("{flag} expects a value");
        return None;
    };
    match raw.parse() {
        Ok(v) => Some(v),
        Err(_) => {
            log::warn!("ignoring {flag}: cannot parse `{raw}`");
            None
        }
    }
}

impl Settings {
    /// Settings from the process command line.
    pub fn from_env() -> Self {
        Self::from_args(std::env::args().skip(1))
    }

    /// Parse flags in `--flag value` or `--flag=value` form. Anything unknown
    /// or malformed is skipped with a warning; numbers are clamped.
    pub fn from_args<I>(args: I) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        let mut settings = Settings::default();
        let mut args = args.into_iter();
        while let Some(arg) = args.next() {
            let (flag, inline) = match arg.split_once('=') {
                Some((flag, value)) => (flag.to_string(), Some(value.to_string())),
                None => (arg.clone(), None),
            };
            let mut value = || inline.clone().or_else(|| args.next());

            match flag.as_str() {
                "--width" => {
                    if let Some(v) = parse_value::<usize>(&flag, value()) {
                        settings.canvas_width = v.clamp(1, MAX_CANVAS_SIDE);
                    }
                }
                "--height" => {
                    if let Some(v) = parse_value::<usize>(&flag, value()) {
                        settings.canvas_height = v.clamp(1, MAX_CANVAS_SIDE);
                    }
                }
                "--frame-ms" => {
                    if let Some(v) = parse_value::<u64>(&flag, value()) {
                        settings.frame_ms = v.clamp(MIN_FRAME_MS, MAX_FRAME_MS);
                    }
                }
                "--wiggle" => {
                    if let Some(v) = parse_value::<f32>(&flag, value()) {
                        if v.is_finite() {
                            settings.wiggle_amount = v.clamp(0.0, MAX_WIGGLE);
                        }
                    }
                }
                "--history" => {
                    if let Some(v) = parse_value::<usize>(&flag, value()) {
                        settings.history_limit = v.clamp(1, MAX_HISTORY_LIMIT);
                    }
                }
                "--grid" => {
                    if let Some(name) = value() {
                        match name.as_str() {
                            "none" | "off" => settings.grid.kind = None,
                            other => match GridKind::parse(other) {
                                Some(kind) => settings.grid.kind = Some(kind),
                                None => log::warn!("unknown grid type `{other}`"),
                            },
                        }
                    }
                }
                "--grid-spacing" => {
                    if let Some(v) = parse_value::<f32>(&flag, value()) {
                        if v.is_finite() {
                            settings.grid.spacing = v.clamp(2.0, 500.0);
                        }
                    }
                }
                "--grid-opacity" => {
                    if let Some(v) = parse_value::<f32>(&flag, value()) {
                        if v.is_finite() {
                            settings.grid.opacity = v.clamp(0.0, 1.0);
                        }
                    }
                }
                "--color" => {
                    if let Some(raw) = value() {
                        match Color::from_hex(&raw) {
                            Ok(color) => settings.brush.color = color,
                            Err(err) => log::warn!("ignoring --color: {err}"),
                        }
                    }
                }
                "--brush-size" => {
                    if let Some(v) = parse_value::<f32>(&flag, value()) {
                        if v.is_finite() {
                            settings.brush.set_base_size(v);
                        }
                    }
                }
                "--no-auto-wiggle" => settings.auto_wiggle = false,
                "--auto-wiggle" => settings.auto_wiggle = true,
                "--open" => match value() {
                    Some(path) => settings.open = Some(PathBuf::from(path)),
                    None => log::warn!("--open expects a file"),
                },
                other => log::warn!("ignoring unknown argument `{other}`"),
            }
        }
        settings
    }
}
