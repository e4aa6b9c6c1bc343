//! One-second countdown primitive.
//!
//! The countdown owns no thread and no clock; the caller invokes `tick()`
//! once per elapsed second. Expiry is reported exactly once: reaching zero
//! stops the countdown, so a further `tick()` is idle rather than a second
//! expiry.

use serde::{Deserialize, Serialize};

/// Outcome of a single `tick()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    /// Not running; nothing happened.
    Idle,
    /// One second elapsed; this many remain.
    Running(u32),
    /// The final second elapsed. Fires once, then the countdown stops.
    Expired,
}

/// A suspendable, resettable per-second countdown.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Countdown {
    remaining_secs: u32,
    running: bool,
}

impl Countdown {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn remaining_secs(&self) -> u32 {
        self.remaining_secs
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Begin counting down from `secs`.
    ///
    /// A no-op while already running: there must never be two concurrent
    /// tick sources for one countdown. Starting with zero seconds leaves
    /// the countdown stopped (used for manual-advance exercises).
    pub fn start(&mut self, secs: u32) {
        if self.running {
            return;
        }
        self.remaining_secs = secs;
        self.running = secs > 0;
    }

    /// Stop ticking without losing the remaining time. No-op when idle.
    pub fn pause(&mut self) {
        self.running = false;
    }

    /// Continue from the exact remaining second count.
    ///
    /// A no-op while running, and a no-op with nothing left to count
    /// (resume without a prior start must not conjure a timer).
    pub fn resume(&mut self) {
        if self.remaining_secs > 0 {
            self.running = true;
        }
    }

    /// Load a new duration, stopped.
    pub fn reset(&mut self, secs: u32) {
        self.remaining_secs = secs;
        self.running = false;
    }

    /// Advance by one second. Call once per elapsed wall-clock second.
    pub fn tick(&mut self) -> Tick {
        if !self.running {
            return Tick::Idle;
        }
        self.remaining_secs -= 1;
        if self.remaining_secs == 0 {
            self.running = false;
            Tick::Expired
        } else {
            Tick::Running(self.remaining_secs)
        }
    }
}
