// SPDX-License-Identifier: MIT OR Apache-2.0
//! Time sources for driving playback.

use std::cell::Cell;
use std::time::{Duration, Instant};

/// Monotonic time source
pub trait Clock {
    /// Time since the clock's origin
    fn now(&self) -> Duration;
}

/// Wall clock backed by [`Instant`]
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    /// Create a clock starting now
    pub fn new() -> Self {
        Self { origin: Instant::now() }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }
}

/// Clock advanced by hand, for tests and offline baking
#[derive(Debug, Default)]
pub struct ManualClock {
    now: Cell<Duration>,
}

impl ManualClock {
    /// Create a clock at zero
    pub fn new() -> Self {
        Self::default()
    }

    /// Move the clock forward
    pub fn advance(&self, delta: Duration) {
        self.now.set(self.now.get() + delta);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Duration {
        self.now.get()
    }
}

/// Turns clock readings into per-tick deltas
#[derive(Debug)]
pub struct Ticker<C: Clock> {
    clock: C,
    last: Option<Duration>,
}

impl<C: Clock> Ticker<C> {
    /// Create a ticker over `clock`
    pub fn new(clock: C) -> Self {
        Self { clock, last: None }
    }

    /// Time since the previous call; zero on the first call
    pub fn delta(&mut self) -> Duration {
        let now = self.clock.now();
        let delta = self.last.map_or(Duration::ZERO, |last| now.saturating_sub(last));
        self.last = Some(now);
        delta
    }

    /// Forget the previous reading so the next delta is zero
    pub fn reset(&mut self) {
        self.last = None;
    }

    /// Underlying clock
    pub fn clock(&self) -> &C {
        &self.clock
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ticker_deltas() {
        let mut ticker = Ticker::new(ManualClock::new());
        assert_eq!(ticker.delta(), Duration::ZERO);

        ticker.clock().advance(Duration::from_millis(16));
        assert_eq!(ticker.delta(), Duration::from_millis(16));

        ticker.clock().advance(Duration::from_millis(20));
        ticker.reset();
        assert_eq!(ticker.delta(), Duration::ZERO);
    }

    #[test]
    fn test_system_clock_is_monotonic() {
        let clock = SystemClock::new();
        let a = clock.now();
        let b = clock.now();
        assert!(b >= a);
    }
}
