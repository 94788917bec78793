use std::time::{Duration, Instant};

/// Scopes slower than this are logged at debug level, the rest at trace.
pub const SLOW_SCOPE: Duration = Duration::from_millis(16);

/// Logs how long a scope took when dropped.
pub struct ScopeTimer {
    label: &'static str,
    started: Instant,
    slow_after: Duration,
}

impl ScopeTimer {
    pub fn new(label: &'static str) -> Self {
        Self::with_threshold(label, SLOW_SCOPE)
    }

    pub fn with_threshold(label: &'static str, slow_after: Duration) -> Self {
        Self {
            label,
            started: Instant::now(),
            slow_after,
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    fn is_slow(&self, elapsed: Duration) -> bool {
        elapsed >= self.slow_after
    }
}

impl Drop for ScopeTimer {
    fn drop(&mut self) {
        let elapsed = self.elapsed();
        if self.is_slow(elapsed) {
            log::debug!("{} took {:?} (slow)", self.label, elapsed);
        } else {
            log::trace!("{} took {:?}", self.label, elapsed);
        }
    }
}
