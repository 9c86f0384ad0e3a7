//! Time management utilities
//!
//! Everything animated in a session is a function of one monotonic
//! "seconds since start" value. [`SessionClock`] is that value's source;
//! [`MonotonicClock`] backs real runs and [`ManualClock`] lets tests and
//! offline hosts step time explicitly.

use std::cell::Cell;
use std::rc::Rc;
use std::time::{Duration, Instant};

/// Source of elapsed session time
pub trait SessionClock {
    /// Seconds since the session started. Never decreases.
    fn elapsed(&self) -> f32;
}

/// Wall-clock session time based on [`Instant`]
#[derive(Debug, Clone, Copy)]
pub struct MonotonicClock {
    started: Instant,
}

impl MonotonicClock {
    /// Start a clock at the current instant
    pub fn start() -> Self {
        Self {
            started: Instant::now(),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::start()
    }
}

impl SessionClock for MonotonicClock {
    fn elapsed(&self) -> f32 {
        self.started.elapsed().as_secs_f32()
    }
}

/// Manually stepped clock
///
/// Clones share the same time value, so a host can keep one handle and give
/// another to the engine.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Rc<Cell<f32>>,
}

impl ManualClock {
    /// Create a clock at t = 0
    pub fn new() -> Self {
        Self::default()
    }

    /// Move time forward by `seconds`; negative steps are ignored
    pub fn advance(&self, seconds: f32) {
        if seconds > 0.0 {
            self.now.set(self.now.get() + seconds);
        }
    }

    /// Jump to an absolute time, never earlier than the current one
    pub fn set(&self, seconds: f32) {
        if seconds > self.now.get() {
            self.now.set(seconds);
        }
    }
}

impl SessionClock for ManualClock {
    fn elapsed(&self) -> f32 {
        self.now.get()
    }
}

/// Simple stopwatch for measuring elapsed time
#[derive(Debug, Clone, Copy)]
pub struct Stopwatch {
    start_time: Instant,
}

impl Stopwatch {
    /// Create a new stopwatch and start it immediately
    pub fn start_new() -> Self {
        Self {
            start_time: Instant::now(),
        }
    }

    /// Get the elapsed time
    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }

    /// Get the elapsed time in milliseconds
    pub fn elapsed_millis(&self) -> f32 {
        self.elapsed().as_secs_f32() * 1000.0
    }
}
