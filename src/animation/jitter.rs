use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::brush_engine::stroke::Point;

/// Maximum per-axis displacement, in canvas pixels.
pub const MAX_WIGGLE: f32 = 30.0;
pub const DEFAULT_WIGGLE: f32 = 1.0;

/// Source of the per-frame displacement noise.
pub struct Jitter {
    rng: StdRng,
}

impl Jitter {
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_os_rng(),
        }
    }

    /// Deterministic noise for tests and benchmarks.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// A new displayed buffer: every original sample offset independently on
    /// each axis by `U(-amount, amount)`. Pressure is never touched and
    /// nothing accumulates between frames.
    pub fn displace(&mut self, originals: &[Point], amount: f32) -> Vec<Point> {
        if amount <= 0.0 {
            return originals.to_vec();
        }
        originals
            .iter()
            .map(|p| Point {
                x: p.x + self.rng.random_range(-1.0f32..=1.0) * amount,
                y: p.y + self.rng.random_range(-1.0f32..=1.0) * amount,
                pressure: p.pressure,
            })
            .collect()
    }
}

impl Default for Jitter {
    fn default() -> Self {
        Self::new()
    }
}
