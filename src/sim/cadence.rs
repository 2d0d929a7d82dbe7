//! Tick-based cadences
//!
//! Every repeating gameplay action (formation step, alien fire, mother ship
//! spawn, ambient cue) is a period plus the tick it is next due on. Cadences
//! are checked by the frame driver against the world's tick counter, never
//! against a wall clock.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cadence {
    /// Ticks between firings
    pub period: u64,
    /// Tick on which the cadence next fires
    pub next_due: u64,
}

impl Cadence {
    /// First firing one full period after `now`
    pub fn new(period: u64, now: u64) -> Self {
        Self {
            period,
            next_due: now + period,
        }
    }

    /// First firing on `now` itself
    pub fn starting_at(period: u64, now: u64) -> Self {
        Self {
            period,
            next_due: now,
        }
    }

    pub fn is_due(&self, now: u64) -> bool {
        now >= self.next_due
    }

    /// Fire if due, scheduling the next firing one period from `now`.
    ///
    /// Missed firings are never replayed: a cadence that fell behind fires once
    /// and then continues from the current tick.
    pub fn fire(&mut self, now: u64) -> bool {
        if self.is_due(now) {
            self.next_due = now + self.period;
            true
        } else {
            false
        }
    }

    /// Restart the period from `now` (used after a pause in play)
    pub fn resync(&mut self, now: u64) {
        self.next_due = now + self.period;
    }
}
