//! Passive income loop: `passive_rate / 10` boba every 100ms.

use super::config::PASSIVE_TICKS_PER_SEC;
use super::state::ProgressSnapshot;
use crate::time::GameTime;

/// At most one interval exists at a time; `None` means stopped.
#[derive(Clone, Debug, Default)]
pub struct PassiveAccrual {
    clock: Option<GameTime>,
}

impl PassiveAccrual {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start the interval. Returns false if it was already running.
    pub fn start(&mut self, now_ms: f64) -> bool {
        if self.clock.is_some() {
            return false;
        }
        let mut clock = GameTime::new(PASSIVE_TICKS_PER_SEC);
        clock.update(now_ms);
        self.clock = Some(clock);
        true
    }

    /// Cancel the interval; no ticks fire until the next `start`.
    pub fn stop(&mut self) {
        self.clock = None;
    }

    pub fn is_running(&self) -> bool {
        self.clock.is_some()
    }

    /// Process every tick due at `now_ms`. Returns the boba added.
    pub fn advance(&mut self, s: &mut ProgressSnapshot, now_ms: f64) -> f64 {
        let Some(clock) = self.clock.as_mut() else {
            return 0.0;
        };
        let ticks = clock.update(now_ms);
        accrue(s, ticks)
    }
}

/// Apply `ticks` passive ticks.
pub fn accrue(s: &mut ProgressSnapshot, ticks: u32) -> f64 {
    if s.passive_rate <= 0.0 {
        return 0.0;
    }
    let per_tick = s.passive_rate / PASSIVE_TICKS_PER_SEC as f64;
    for _ in 0..ticks {
        s.currency += per_tick;
        s.total_earned += per_tick;
    }
    per_tick * ticks as f64
}
