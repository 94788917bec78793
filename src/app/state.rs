use crate::animation::TimelapseStepping;

/// What a primary-button drag does on the canvas.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PointerMode {
    #[default]
    Draw,
    Pan,
}

impl PointerMode {
    pub fn toggled(self) -> Self {
        match self {
            PointerMode::Draw => PointerMode::Pan,
            PointerMode::Pan => PointerMode::Draw,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            PointerMode::Draw => "✏ Draw",
            PointerMode::Pan => "✋ Pan",
        }
    }
}

/// Time-lapse options picked in the animation panel before starting.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TimelapseOptions {
    pub looping: bool,
    pub manual: bool,
}

impl TimelapseOptions {
    /// Manual stepping ignores the loop flag.
    pub fn stepping(&self) -> TimelapseStepping {
        if self.manual {
            TimelapseStepping::Manual
        } else {
            TimelapseStepping::Auto {
                looping: self.looping,
            }
        }
    }
}

/// Zoom step for toolbar buttons and the `+`/`-` keys.
pub const ZOOM_STEP: f32 = 0.1;
/// Zoom step per wheel notch.
pub const WHEEL_ZOOM_STEP: f32 = 0.05;
