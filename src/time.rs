//! Frame timestamps to fixed ticks.
//!
//! `draw_web()` fires at whatever rate the browser picks. The passive loop
//! wants 10 ticks per second and the countdown wants exactly one, so each
//! owns a `GameTime` that turns wall-clock deltas into whole ticks and carries
//! the remainder into the next frame.

/// Catch-up allowed after a stalled frame unless the owner asks for more.
const DEFAULT_MAX_DELTA_MS: f64 = 500.0;

#[derive(Clone, Debug)]
pub struct GameTime {
    tick_ms: f64,
    catch_up_ms: f64,
    /// Time seen but not yet emitted as a tick.
    carry_ms: f64,
    last_ms: Option<f64>,
}

impl GameTime {
    pub fn new(ticks_per_sec: u32) -> Self {
        Self::with_max_delta(ticks_per_sec, DEFAULT_MAX_DELTA_MS)
    }

    /// No catch-up limit: every elapsed millisecond is accounted for. For
    /// wall-clock countdowns whose owner stops on its own once done.
    pub fn uncapped(ticks_per_sec: u32) -> Self {
        Self::with_max_delta(ticks_per_sec, f64::INFINITY)
    }

    /// `max_delta_ms` caps how much time one frame may account for, so a tab
    /// returning from the background does not replay minutes of ticks.
    pub fn with_max_delta(ticks_per_sec: u32, max_delta_ms: f64) -> Self {
        Self {
            tick_ms: 1000.0 / f64::from(ticks_per_sec.max(1)),
            catch_up_ms: max_delta_ms,
            carry_ms: 0.0,
            last_ms: None,
        }
    }

    /// Whole ticks elapsed since the previous call. The first call only
    /// records the timestamp.
    pub fn update(&mut self, now_ms: f64) -> u32 {
        if let Some(last) = self.last_ms.replace(now_ms) {
            self.carry_ms += (now_ms - last).clamp(0.0, self.catch_up_ms);
        }
        let ticks = (self.carry_ms / self.tick_ms).floor();
        self.carry_ms -= ticks * self.tick_ms;
        ticks as u32
    }

    /// Start a fresh interval: the next `update` counts from its own timestamp.
    pub fn restart(&mut self) {
        self.carry_ms = 0.0;
        self.last_ms = None;
    }
}
