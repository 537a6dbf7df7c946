//! Pomodoro countdown: focus ↔ break.
//!
//! The countdown decrements once per real second while running. Elapsed
//! session minutes are measured on the wall clock from the first `start`
//! of a session, so paused intervals still count towards the reward.
//!
//! Frames stop while the page is hidden. The next frame replays every
//! second that passed, so a session finished in another tab completes on
//! return, stamped at the second it actually ran out.

use super::config::{
    BREAK_MINUTES_RANGE, DEFAULT_BREAK_MINUTES, DEFAULT_FOCUS_MINUTES, FOCUS_MINUTES_RANGE,
};
use crate::time::GameTime;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TimerMode {
    Focus,
    Break,
}

impl TimerMode {
    pub fn other(self) -> TimerMode {
        match self {
            TimerMode::Focus => TimerMode::Break,
            TimerMode::Break => TimerMode::Focus,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            TimerMode::Focus => "Focus",
            TimerMode::Break => "Break",
        }
    }
}

/// Emitted when the countdown reaches zero.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TimerCompletion {
    /// Mode that just finished.
    pub mode: TimerMode,
    /// Wall-clock minutes since the session was started, rounded.
    pub minutes: u32,
}

/// Per-mode configured durations in minutes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TimerSettings {
    pub focus_minutes: u32,
    pub break_minutes: u32,
}

impl Default for TimerSettings {
    fn default() -> Self {
        Self {
            focus_minutes: DEFAULT_FOCUS_MINUTES,
            break_minutes: DEFAULT_BREAK_MINUTES,
        }
    }
}

impl TimerSettings {
    pub fn minutes(&self, mode: TimerMode) -> u32 {
        match mode {
            TimerMode::Focus => self.focus_minutes,
            TimerMode::Break => self.break_minutes,
        }
    }

    pub fn seconds(&self, mode: TimerMode) -> u32 {
        self.minutes(mode) * 60
    }

    /// Store a clamped duration; returns the value actually stored.
    fn set(&mut self, mode: TimerMode, minutes: u32) -> u32 {
        match mode {
            TimerMode::Focus => {
                self.focus_minutes =
                    minutes.clamp(*FOCUS_MINUTES_RANGE.start(), *FOCUS_MINUTES_RANGE.end());
                self.focus_minutes
            }
            TimerMode::Break => {
                self.break_minutes =
                    minutes.clamp(*BREAK_MINUTES_RANGE.start(), *BREAK_MINUTES_RANGE.end());
                self.break_minutes
            }
        }
    }
}

#[derive(Clone, Debug)]
pub struct FocusTimer {
    pub mode: TimerMode,
    pub remaining_secs: u32,
    pub settings: TimerSettings,
    running: bool,
    /// Wall-clock start of the current session. Survives pause.
    started_at_ms: Option<f64>,
    clock: GameTime,
}

impl FocusTimer {
    pub fn new() -> Self {
        Self::with_settings(TimerSettings::default())
    }

    pub fn with_settings(settings: TimerSettings) -> Self {
        Self {
            mode: TimerMode::Focus,
            remaining_secs: settings.seconds(TimerMode::Focus),
            settings,
            running: false,
            started_at_ms: None,
            clock: GameTime::uncapped(1),
        }
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn configured_secs(&self) -> u32 {
        self.settings.seconds(self.mode)
    }

    /// Begin counting down. No-op if already running.
    pub fn start(&mut self, now_ms: f64) {
        if self.running {
            return;
        }
        self.running = true;
        self.started_at_ms.get_or_insert(now_ms);
        self.clock.restart();
        self.clock.update(now_ms);
    }

    pub fn pause(&mut self) {
        self.running = false;
    }

    pub fn toggle(&mut self, now_ms: f64) {
        if self.running {
            self.pause();
        } else {
            self.start(now_ms);
        }
    }

    /// Stop and refill the current mode's countdown.
    pub fn reset(&mut self) {
        self.running = false;
        self.remaining_secs = self.configured_secs();
        self.started_at_ms = None;
    }

    /// Feed a frame timestamp; processes every whole second that elapsed.
    pub fn advance(&mut self, now_ms: f64) -> Option<TimerCompletion> {
        if !self.running {
            return None;
        }
        let ticks = self.clock.update(now_ms);
        // The last tick of the batch is `now_ms`, earlier ones a second apart.
        for behind in (0..ticks).rev() {
            if let Some(done) = self.tick(now_ms - f64::from(behind) * 1000.0) {
                return Some(done);
            }
        }
        None
    }

    /// One-second step.
    pub fn tick(&mut self, now_ms: f64) -> Option<TimerCompletion> {
        if !self.running {
            return None;
        }
        self.remaining_secs = self.remaining_secs.saturating_sub(1);
        if self.remaining_secs > 0 {
            return None;
        }

        let completed = self.mode;
        let elapsed_ms = self
            .started_at_ms
            .map(|start| (now_ms - start).max(0.0))
            .unwrap_or(0.0);
        let minutes = (elapsed_ms / 60_000.0).round() as u32;

        self.mode = completed.other();
        self.reset();

        Some(TimerCompletion {
            mode: completed,
            minutes,
        })
    }

    /// Change a mode's duration. For the active mode while stopped, the
    /// countdown is refilled immediately; otherwise it applies on next entry
    /// or reset.
    pub fn set_duration(&mut self, mode: TimerMode, minutes: u32) -> u32 {
        let stored = self.settings.set(mode, minutes);
        if mode == self.mode && !self.running {
            self.remaining_secs = self.configured_secs();
        }
        stored
    }

    pub fn adjust_duration(&mut self, mode: TimerMode, delta_minutes: i32) -> u32 {
        let current = self.settings.minutes(mode) as i64;
        let target = (current + delta_minutes as i64).max(0) as u32;
        self.set_duration(mode, target)
    }

    /// Remaining fraction of the current countdown, in `[0, 1]`.
    pub fn progress(&self) -> f64 {
        let total = self.configured_secs();
        if total == 0 {
            return 0.0;
        }
        (self.remaining_secs as f64 / total as f64).clamp(0.0, 1.0)
    }

    /// `MM:SS`
    pub fn display(&self) -> String {
        format!("{:02}:{:02}", self.remaining_secs / 60, self.remaining_secs % 60)
    }
}

impl Default for FocusTimer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Drive the timer in one-second frames from `from` to `to` (inclusive).
    fn run(timer: &mut FocusTimer, from_ms: f64, to_ms: f64) -> Option<TimerCompletion> {
        let mut t = from_ms;
        while t <= to_ms {
            if let Some(done) = timer.advance(t) {
                return Some(done);
            }
            t += 1_000.0;
        }
        None
    }

    #[test]
    fn defaults() {
        let timer = FocusTimer::new();
        assert_eq!(timer.mode, TimerMode::Focus);
        assert_eq!(timer.remaining_secs, 1500);
        assert!(!timer.is_running());
        assert_eq!(timer.display(), "25:00");
        assert_eq!(timer.settings.seconds(TimerMode::Break), 300);
    }

    #[test]
    fn start_decrements_once_per_second() {
        let mut timer = FocusTimer::new();
        timer.start(0.0);
        assert_eq!(timer.advance(999.0), None);
        assert_eq!(timer.remaining_secs, 1500);
        timer.advance(1_000.0);
        assert_eq!(timer.remaining_secs, 1499);
        timer.advance(3_500.0);
        assert_eq!(timer.remaining_secs, 1497);
    }

    #[test]
    fn start_while_running_is_noop() {
        let mut timer = FocusTimer::new();
        timer.start(0.0);
        timer.advance(2_000.0);
        timer.start(2_500.0);
        timer.advance(3_000.0);
        assert_eq!(timer.remaining_secs, 1497);
    }

    #[test]
    fn pause_retains_remaining() {
        let mut timer = FocusTimer::new();
        timer.start(0.0);
        timer.advance(5_000.0);
        timer.pause();
        assert_eq!(timer.advance(60_000.0), None);
        assert_eq!(timer.remaining_secs, 1495);
        // Resume: the paused gap is not counted down
        timer.start(100_000.0);
        timer.advance(101_000.0);
        assert_eq!(timer.remaining_secs, 1494);
    }

    #[test]
    fn reset_refills_and_stops() {
        let mut timer = FocusTimer::new();
        timer.start(0.0);
        timer.advance(10_000.0);
        timer.reset();
        assert!(!timer.is_running());
        assert_eq!(timer.remaining_secs, 1500);
    }

    #[test]
    fn twenty_minute_focus_session_completes() {
        let mut timer = FocusTimer::new();
        timer.set_duration(TimerMode::Focus, 20);
        timer.start(0.0);
        let done = run(&mut timer, 1_000.0, 1_200_000.0).unwrap();
        assert_eq!(
            done,
            TimerCompletion {
                mode: TimerMode::Focus,
                minutes: 20
            }
        );
        assert_eq!(timer.mode, TimerMode::Break);
        assert_eq!(timer.remaining_secs, 300);
        assert!(!timer.is_running());
    }

    #[test]
    fn break_completion_returns_to_focus() {
        let mut timer = FocusTimer::new();
        timer.mode = TimerMode::Break;
        timer.set_duration(TimerMode::Break, 1);
        timer.start(0.0);
        let done = run(&mut timer, 1_000.0, 60_000.0).unwrap();
        assert_eq!(done.mode, TimerMode::Break);
        assert_eq!(timer.mode, TimerMode::Focus);
        assert_eq!(timer.remaining_secs, 1500);
    }

    #[test]
    fn paused_time_counts_towards_elapsed_minutes() {
        let mut timer = FocusTimer::new();
        timer.set_duration(TimerMode::Focus, 1);
        timer.start(0.0);
        run(&mut timer, 1_000.0, 30_000.0);
        timer.pause();
        timer.start(90_000.0);
        let done = run(&mut timer, 91_000.0, 200_000.0).unwrap();
        // Finished at 120s on the wall clock
        assert_eq!(done.minutes, 2);
    }

    #[test]
    fn hidden_tab_gap_is_counted_in_full() {
        let mut timer = FocusTimer::new();
        timer.start(0.0);
        assert_eq!(timer.advance(600_000.0), None);
        assert_eq!(timer.remaining_secs, 900);
        assert!(timer.is_running());
    }

    #[test]
    fn session_finished_while_hidden_completes_on_return() {
        let mut timer = FocusTimer::new();
        timer.start(0.0);
        timer.advance(60_000.0);
        // Back after two hours; the 25 minutes ran out at 1_500s
        let done = timer.advance(7_200_000.0).unwrap();
        assert_eq!(
            done,
            TimerCompletion {
                mode: TimerMode::Focus,
                minutes: 25
            }
        );
        assert_eq!(timer.mode, TimerMode::Break);
        assert_eq!(timer.remaining_secs, 300);
        assert!(!timer.is_running());
        assert_eq!(timer.advance(7_300_000.0), None);
    }

    #[test]
    fn duration_change_resets_active_mode_when_stopped() {
        let mut timer = FocusTimer::new();
        timer.set_duration(TimerMode::Focus, 30);
        assert_eq!(timer.remaining_secs, 1800);
    }

    #[test]
    fn duration_change_while_running_waits() {
        let mut timer = FocusTimer::new();
        timer.start(0.0);
        timer.advance(1_000.0);
        timer.set_duration(TimerMode::Focus, 10);
        assert_eq!(timer.remaining_secs, 1499);
        timer.reset();
        assert_eq!(timer.remaining_secs, 600);
    }

    #[test]
    fn inactive_mode_change_applies_on_entry() {
        let mut timer = FocusTimer::new();
        timer.set_duration(TimerMode::Break, 10);
        assert_eq!(timer.remaining_secs, 1500);
        timer.set_duration(TimerMode::Focus, 1);
        timer.start(0.0);
        run(&mut timer, 1_000.0, 60_000.0).unwrap();
        assert_eq!(timer.remaining_secs, 600);
    }

    #[test]
    fn durations_are_clamped() {
        let mut timer = FocusTimer::new();
        assert_eq!(timer.set_duration(TimerMode::Focus, 0), 1);
        assert_eq!(timer.set_duration(TimerMode::Focus, 500), 60);
        assert_eq!(timer.adjust_duration(TimerMode::Break, -100), 1);
        assert_eq!(timer.adjust_duration(TimerMode::Break, 5), 6);
        assert_eq!(timer.adjust_duration(TimerMode::Break, 100), 30);
    }

    #[test]
    fn progress_counts_down() {
        let mut timer = FocusTimer::new();
        timer.set_duration(TimerMode::Focus, 1);
        assert_eq!(timer.progress(), 1.0);
        timer.start(0.0);
        run(&mut timer, 1_000.0, 30_000.0);
        assert!((timer.progress() - 0.5).abs() < 1e-9);
    }
}
