//! Platform abstraction layer
//!
//! Timing sources for the tick loop. Each `lap` returns the seconds since the
//! previous lap and restarts the measurement, like a stopwatch that is read and
//! reset in one step.

use std::time::{Duration, Instant};

/// Source of per-tick time deltas
pub trait Clock: Send {
    /// Seconds since the previous lap (or since creation / reset)
    fn lap(&mut self) -> f64;

    /// Restart the measurement without reporting it
    fn reset(&mut self);
}

/// Wall clock backed by [`Instant`]
#[derive(Debug, Clone)]
pub struct MonotonicClock {
    last: Instant,
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self { last: Instant::now() }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MonotonicClock {
    fn lap(&mut self) -> f64 {
        let now = Instant::now();
        let dt = now.duration_since(self.last);
        self.last = now;
        dt.as_secs_f64()
    }

    fn reset(&mut self) {
        self.last = Instant::now();
    }
}

/// Clock that reports the same step every lap (deterministic runs)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedClock {
    step: f64,
}

impl FixedClock {
    pub fn new(step: f64) -> Self {
        Self { step }
    }

    pub fn from_rate(hz: f64) -> Self {
        Self { step: 1.0 / hz }
    }
}

impl Clock for FixedClock {
    fn lap(&mut self) -> f64 {
        self.step
    }

    fn reset(&mut self) {}
}

/// Sleep off whatever is left of `period` since `started`
///
/// Returns immediately when the tick already overran its period.
pub fn pace(started: Instant, period: Duration) {
    let spent = started.elapsed();
    if spent < period {
        std::thread::sleep(period - spent);
    }
}
