//! Gravity timing
//!
//! A fixed-timestep accumulator: the caller feeds elapsed frame time and gets
//! back how many one-row drops are due.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Gravity interval tuning, in milliseconds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GravityConfig {
    /// Interval at level 1
    pub initial_interval_ms: u64,
    /// Reduction per level
    pub step_ms: u64,
    /// Fastest allowed interval
    pub floor_interval_ms: u64,
}

impl Default for GravityConfig {
    fn default() -> Self {
        Self {
            initial_interval_ms: 800,
            step_ms: 75,
            floor_interval_ms: 100,
        }
    }
}

impl GravityConfig {
    /// `max(initial - (level - 1) * step, floor)`
    pub fn interval_for(&self, level: u32) -> Duration {
        let reduction = u64::from(level.saturating_sub(1)).saturating_mul(self.step_ms);
        let ms = self
            .initial_interval_ms
            .saturating_sub(reduction)
            .max(self.floor_interval_ms);
        Duration::from_millis(ms)
    }
}

#[derive(Debug, Clone)]
pub struct Gravity {
    config: GravityConfig,
    interval: Duration,
    accumulated: Duration,
}

impl Gravity {
    pub fn new(config: GravityConfig) -> Self {
        Self {
            config,
            interval: config.interval_for(1),
            accumulated: Duration::ZERO,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Recompute the interval for a new level. Takes effect for the pending tick.
    pub fn set_level(&mut self, level: u32) {
        self.interval = self.config.interval_for(level);
    }

    /// Add elapsed time and return how many drops are now due
    pub fn advance(&mut self, dt: Duration) -> u32 {
        // A zero interval would never drain the accumulator
        if self.interval.is_zero() {
            self.accumulated = Duration::ZERO;
            return 1;
        }
        self.accumulated += dt;
        let mut due = 0;
        while self.accumulated >= self.interval {
            self.accumulated -= self.interval;
            due += 1;
        }
        due
    }

    /// Drop any partially elapsed interval
    pub fn reset(&mut self) {
        self.accumulated = Duration::ZERO;
    }

    /// Restart from level 1
    pub fn restart(&mut self) {
        self.reset();
        self.set_level(1);
    }
}
