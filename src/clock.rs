// Copyright 2026 Hypermesh Foundation. All rights reserved.
// PoP Pulse Simulation Suite - Wall Clock

use std::cell::Cell;

/// Source of history sample timestamps, in milliseconds since the Unix epoch.
pub trait Clock {
    fn now_ms(&self) -> f64;
}

/// Browser `Date.now()` on wasm32, `SystemTime` elsewhere.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    #[cfg(target_arch = "wasm32")]
    fn now_ms(&self) -> f64 {
        js_sys::Date::now()
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn now_ms(&self) -> f64 {
        use std::time::{SystemTime, UNIX_EPOCH};
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs_f64() * 1000.0)
            .unwrap_or(0.0)
    }
}

/// Deterministic clock that advances a fixed step on every read.
#[derive(Debug, Clone)]
pub struct SteppingClock {
    next: Cell<f64>,
    step_ms: f64,
}

impl SteppingClock {
    pub fn new(start_ms: f64, step_ms: f64) -> Self {
        Self { next: Cell::new(start_ms), step_ms }
    }
}

impl Clock for SteppingClock {
    fn now_ms(&self) -> f64 {
        let now = self.next.get();
        self.next.set(now + self.step_ms);
        now
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stepping_clock_advances() {
        let clock = SteppingClock::new(1000.0, 250.0);
        assert_eq!(clock.now_ms(), 1000.0);
        assert_eq!(clock.now_ms(), 1250.0);
        assert_eq!(clock.now_ms(), 1500.0);
    }

    #[test]
    fn test_system_clock_after_epoch() {
        assert!(SystemClock.now_ms() > 0.0);
    }
}
