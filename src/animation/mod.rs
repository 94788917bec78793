//! Wiggle and time-lapse playback.

pub mod engine;
pub mod jitter;
pub mod state;

pub use engine::{AnimationEngine, TickOutcome};
pub use state::{AnimationState, StepDirection, TimelapseStepping};
