use serde::{Deserialize, Serialize};

/// Countdown timer used for cooldowns, grace windows, and invulnerability.
///
/// A plain value type: no global clock, no hidden side effects. The owner
/// advances it explicitly with [`Timer::tick`] each simulation step, which
/// keeps every state machine that embeds one fully serializable.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Timer {
    pub duration: f32,
    pub remaining: f32,
    pub active: bool,
}

impl Timer {
    /// A stopped timer that remembers `duration` for [`Timer::start_default`].
    pub fn new(duration: f32) -> Self {
        Self {
            duration,
            remaining: 0.0,
            active: false,
        }
    }

    /// Start (or restart) the timer with an explicit duration.
    pub fn start(&mut self, duration: f32) {
        self.duration = duration;
        self.remaining = duration;
        self.active = true;
    }

    /// Start (or restart) the timer with its configured duration.
    pub fn start_default(&mut self) {
        self.remaining = self.duration;
        self.active = true;
    }

    /// Advance by `dt` seconds. Returns true on the tick the timer expires.
    pub fn tick(&mut self, dt: f32) -> bool {
        if !self.active {
            return false;
        }
        self.remaining -= dt;
        if self.remaining <= 0.0 {
            self.remaining = 0.0;
            self.active = false;
            return true;
        }
        false
    }

    /// Deactivate without expiring.
    pub fn stop(&mut self) {
        self.active = false;
        self.remaining = 0.0;
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn remaining(&self) -> f32 {
        self.remaining
    }

    /// Progress ratio in `[0, 1]`: 0 just started, 1 expired or inactive.
    pub fn ratio(&self) -> f32 {
        if self.duration == 0.0 {
            return 0.0;
        }
        1.0 - self.remaining / self.duration
    }
}

/// Elapsed-time accumulator (level timers, shake phase).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Stopwatch {
    pub elapsed: f32,
    pub active: bool,
}

impl Stopwatch {
    pub fn start(&mut self) {
        self.active = true;
    }

    pub fn stop(&mut self) {
        self.active = false;
    }

    pub fn reset(&mut self) {
        self.elapsed = 0.0;
    }

    pub fn tick(&mut self, dt: f32) {
        if self.active {
            self.elapsed += dt;
        }
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }
}
