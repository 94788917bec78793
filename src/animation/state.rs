//! Playback state machine. Transitions are pure: each returns the next state
//! or `None` when the move is not allowed from here, and the engine applies
//! the side effects.

/// How a time-lapse advances through the stroke history.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TimelapseStepping {
    /// One stroke per processed tick; optionally wraps back to the start.
    Auto { looping: bool },
    /// Only explicit next/previous steps move the cursor.
    Manual,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StepDirection {
    Next,
    Previous,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Timelapse {
    /// Strokes `0..=cursor` are visible.
    pub cursor: usize,
    pub stepping: TimelapseStepping,
    /// Jitter the visible strokes while replaying.
    pub wiggle: bool,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AnimationState {
    #[default]
    Idle,
    Wiggling,
    Timelapse(Timelapse),
}

/// What an auto time-lapse does after showing its current frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Advance {
    Continue(AnimationState),
    /// The last stroke was shown and looping is off.
    Finished(AnimationState),
}

pub const MIN_WIGGLE_STROKES: usize = 1;
pub const MIN_TIMELAPSE_STROKES: usize = 2;

impl AnimationState {
    pub fn is_idle(&self) -> bool {
        matches!(self, AnimationState::Idle)
    }

    /// Whether jitter is being applied, alone or during a time-lapse.
    pub fn is_wiggling(&self) -> bool {
        match self {
            AnimationState::Wiggling => true,
            AnimationState::Timelapse(t) => t.wiggle,
            AnimationState::Idle => false,
        }
    }

    pub fn timelapse(&self) -> Option<&Timelapse> {
        match self {
            AnimationState::Timelapse(t) => Some(t),
            _ => None,
        }
    }

    pub fn is_timelapsing(&self) -> bool {
        self.timelapse().is_some()
    }

    /// Whether the state needs the periodic tick. A manual time-lapse only
    /// ticks when it is also wiggling.
    pub fn needs_ticks(&self) -> bool {
        match self {
            AnimationState::Idle => false,
            AnimationState::Wiggling => true,
            AnimationState::Timelapse(t) => {
                t.wiggle || matches!(t.stepping, TimelapseStepping::Auto { .. })
            }
        }
    }

    /// How many strokes from the start of history are currently shown.
    pub fn visible_count(&self, total: usize) -> usize {
        match self {
            AnimationState::Timelapse(t) => (t.cursor + 1).min(total),
            _ => total,
        }
    }

    /// State to fall back to when a time-lapse ends.
    fn after_timelapse(wiggle: bool) -> Self {
        if wiggle {
            AnimationState::Wiggling
        } else {
            AnimationState::Idle
        }
    }

    pub fn start_wiggle(&self, strokes: usize) -> Option<Self> {
        if strokes < MIN_WIGGLE_STROKES {
            return None;
        }
        match *self {
            AnimationState::Idle => Some(AnimationState::Wiggling),
            AnimationState::Timelapse(t) if !t.wiggle => {
                Some(AnimationState::Timelapse(Timelapse { wiggle: true, ..t }))
            }
            _ => None,
        }
    }

    /// Start a time-lapse from `Idle`/`Wiggling`. Manual stepping never loops.
    pub fn start_timelapse(&self, strokes: usize, stepping: TimelapseStepping) -> Option<Self> {
        if strokes < MIN_TIMELAPSE_STROKES {
            return None;
        }
        let wiggle = match self {
            AnimationState::Idle => false,
            AnimationState::Wiggling => true,
            AnimationState::Timelapse(_) => return None,
        };
        Some(AnimationState::Timelapse(Timelapse {
            cursor: 0,
            stepping,
            wiggle,
        }))
    }

    /// Leave a running time-lapse, keeping the wiggle if it was on.
    pub fn end_timelapse(&self) -> Option<Self> {
        self.timelapse().map(|t| Self::after_timelapse(t.wiggle))
    }

    pub fn stop(&self) -> Option<Self> {
        if self.is_idle() {
            None
        } else {
            Some(AnimationState::Idle)
        }
    }

    /// Manual stepping; moving past either end is refused.
    pub fn step(&self, direction: StepDirection, strokes: usize) -> Option<Self> {
        let t = self.timelapse()?;
        if t.stepping != TimelapseStepping::Manual {
            return None;
        }
        let cursor = match direction {
            StepDirection::Next if t.cursor + 1 < strokes => t.cursor + 1,
            StepDirection::Previous if t.cursor > 0 => t.cursor - 1,
            _ => return None,
        };
        Some(AnimationState::Timelapse(Timelapse { cursor, ..*t }))
    }

    /// Move an auto time-lapse on by one stroke after a frame was shown.
    pub fn advance(&self, strokes: usize) -> Option<Advance> {
        let t = self.timelapse()?;
        let TimelapseStepping::Auto { looping } = t.stepping else {
            return None;
        };
        let next = t.cursor + 1;
        if next < strokes {
            return Some(Advance::Continue(AnimationState::Timelapse(Timelapse {
                cursor: next,
                ..*t
            })));
        }
        if looping {
            Some(Advance::Continue(AnimationState::Timelapse(Timelapse {
                cursor: 0,
                ..*t
            })))
        } else {
            Some(Advance::Finished(Self::after_timelapse(t.wiggle)))
        }
    }

    /// Re-validate after the stroke history changed length.
    pub fn fit_history(&self, strokes: usize) -> Self {
        match *self {
            _ if strokes == 0 => AnimationState::Idle,
            AnimationState::Timelapse(t) if strokes < MIN_TIMELAPSE_STROKES => {
                Self::after_timelapse(t.wiggle)
            }
            AnimationState::Timelapse(t) => AnimationState::Timelapse(Timelapse {
                cursor: t.cursor.min(strokes - 1),
                ..t
            }),
            other => other,
        }
    }
}
