//! Boba Focus: an idle boba shop that pays out for finished Pomodoro sessions.
pub mod accrual;
pub mod actions;
pub mod auth;
pub mod catalog;
pub mod challenges;
pub mod config;
pub mod economy;
pub mod error;
pub mod events;
pub mod persist;
pub mod render;
pub mod save;
pub mod state;
pub mod timer;

#[cfg(test)]
mod simulator;

use std::cell::RefCell;
use std::rc::Rc;

use ratzilla::ratatui::layout::Rect;
use ratzilla::ratatui::Frame;

use crate::games::Game;
use crate::input::{ClickState, InputEvent};

use accrual::PassiveAccrual;
use actions::*;
use auth::AuthSession;
use config::{AUTOSAVE_INTERVAL_MS, RESET_CONFIRM_WINDOW_MS};
use economy::ComboTracker;
use error::PersistError;
use events::{EventLog, GameEvent};
use persist::{Reconciler, SaveOutcome};
use save::{LocalStore, RemoteStore};
use state::ProgressSnapshot;
use timer::{FocusTimer, TimerMode};

/// Which panel the right-hand side shows.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tab {
    Shop,
    Challenges,
    Stats,
}

impl Tab {
    pub fn next(self) -> Tab {
        match self {
            Tab::Shop => Tab::Challenges,
            Tab::Challenges => Tab::Stats,
            Tab::Stats => Tab::Shop,
        }
    }
}

/// What a read of the active store produced.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum LoadResult {
    Loaded,
    Missing,
    Failed,
}

/// Owns everything for one play session. All mutation happens here, on the
/// single render/event thread.
pub struct BobaGame {
    pub state: ProgressSnapshot,
    pub timer: FocusTimer,
    pub auth: AuthSession,
    pub log: EventLog,
    pub tab: Tab,
    pub combo: ComboTracker,
    accrual: PassiveAccrual,
    persist: Reconciler,
    next_autosave_ms: f64,
    /// The active store could not be read. Writes stay off until a read
    /// succeeds, so a stale snapshot never replaces the stored one.
    store_unread: bool,
    reset_armed_at: Option<f64>,
    /// Timestamp of the latest `update`, for time-dependent rendering.
    pub now_ms: f64,
}

impl BobaGame {
    /// Load anonymous progress from `local` and start the passive loop.
    pub fn new(
        local: Box<dyn LocalStore>,
        remote: Option<Box<dyn RemoteStore>>,
        now_ms: f64,
    ) -> Self {
        let mut game = Self {
            state: ProgressSnapshot::new(),
            timer: FocusTimer::new(),
            auth: AuthSession::anonymous(),
            log: EventLog::new(),
            tab: Tab::Shop,
            combo: ComboTracker::new(),
            accrual: PassiveAccrual::new(),
            persist: Reconciler::new(local, remote),
            next_autosave_ms: now_ms + AUTOSAVE_INTERVAL_MS,
            store_unread: false,
            reset_armed_at: None,
            now_ms,
        };
        game.log.add_log("Welcome to the boba shop! Press [c] to brew.", false);
        game.reload();
        game.accrual.start(now_ms);
        game
    }

    pub fn last_saved_at(&self) -> Option<f64> {
        self.persist.last_saved_at
    }

    /// True while writes are held back after a failed read.
    pub fn sync_blocked(&self) -> bool {
        self.store_unread
    }

    pub fn save_pending(&self) -> bool {
        self.persist.is_pending()
    }

    pub fn reset_armed(&self) -> bool {
        self.reset_armed_at
            .is_some_and(|at| self.now_ms - at <= RESET_CONFIRM_WINDOW_MS)
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        self.log.drain()
    }

    // ── Player actions ──────────────────────────────────────────

    pub fn brew(&mut self, now_ms: f64) {
        let amount = economy::apply_click(&mut self.state);
        self.log.push(GameEvent::Brewed { amount });
        if let Some(n) = self.combo.register(now_ms) {
            self.log.push(GameEvent::Combo(n));
        }
        self.settle();
        self.persist.request_save(now_ms);
    }

    pub fn buy(&mut self, index: usize, now_ms: f64) -> bool {
        let Some(entry) = catalog::entry(index) else {
            return false;
        };
        match economy::purchase_entry(&mut self.state, index) {
            Ok(receipt) => {
                self.log.push(GameEvent::Purchased {
                    name: entry.name,
                    cost: receipt.cost,
                    level: receipt.level,
                });
                self.settle();
                self.persist.request_save(now_ms);
                true
            }
            Err(e) => {
                log::debug!("[SHOP] {} rejected: {}", entry.name, e);
                self.log.push(GameEvent::PurchaseRejected {
                    name: entry.name,
                    cost: entry.next_cost(&self.state),
                });
                false
            }
        }
    }

    pub fn toggle_timer(&mut self, now_ms: f64) {
        self.timer.toggle(now_ms);
    }

    pub fn adjust_duration(&mut self, delta_minutes: i32) {
        let mode = self.timer.mode;
        let minutes = self.timer.adjust_duration(mode, delta_minutes);
        self.log
            .add_log(&format!("{} length: {} min", mode.label(), minutes), false);
    }

    /// Flush immediately, whichever backend is active. If the last read
    /// failed, it is retried first and nothing is written unless it succeeds.
    pub fn save_now(&mut self, now_ms: f64) {
        if self.store_unread {
            self.sync_from_store(now_ms);
            if self.store_unread {
                return;
            }
        }
        let result = self
            .persist
            .save(self.auth.user_id(), &self.state, now_ms);
        self.report_save(result);
    }

    /// First call arms, a second call within the confirm window erases.
    pub fn request_reset(&mut self, now_ms: f64) {
        match self.reset_armed_at {
            Some(at) if now_ms - at <= RESET_CONFIRM_WINDOW_MS => {
                self.reset_armed_at = None;
                self.reset_progress();
            }
            _ => {
                self.reset_armed_at = Some(now_ms);
                self.log.push(GameEvent::ResetArmed);
            }
        }
    }

    pub fn reset_progress(&mut self) {
        if let Err(e) = self.persist.reset() {
            self.report_failure(e);
        }
        self.state = ProgressSnapshot::new();
        self.timer = FocusTimer::with_settings(self.timer.settings);
        self.combo = ComboTracker::new();
        log::info!("[SAVE] progress reset");
        self.log.push(GameEvent::ProgressReset);
    }

    pub fn sign_in(&mut self, user_id: &str, now_ms: f64) {
        if !self.auth.sign_in(user_id) {
            return;
        }
        self.log.push(GameEvent::SignedIn(user_id.trim().to_string()));
        self.switch_identity(now_ms);
    }

    pub fn sign_out(&mut self, now_ms: f64) {
        if !self.auth.sign_out() {
            return;
        }
        self.log.push(GameEvent::SignedOut);
        self.switch_identity(now_ms);
    }

    /// Stop every loop. Any pending write is flushed first so nothing fires
    /// against a torn-down game.
    pub fn shutdown(&mut self, now_ms: f64) {
        if self.persist.is_pending() {
            self.save_now(now_ms);
        }
        self.persist.cancel();
        self.timer.pause();
        self.accrual.stop();
    }

    // ── Internals ───────────────────────────────────────────────

    fn switch_identity(&mut self, now_ms: f64) {
        self.persist.forget();
        self.store_unread = false;
        if !self.auth.is_signed_in() {
            // Signed-in progress never lands in the anonymous save.
            self.state = ProgressSnapshot::new();
        }
        self.sync_from_store(now_ms);
    }

    /// Read the active identity's snapshot. Unsaved progress is carried over
    /// only when the store answered that nothing is stored.
    fn sync_from_store(&mut self, now_ms: f64) {
        let had_progress = self.state != ProgressSnapshot::new();
        if self.reload() == LoadResult::Missing && had_progress {
            self.persist.request_save(now_ms);
        }
    }

    /// Replace in-memory state from the active backend.
    fn reload(&mut self) -> LoadResult {
        let remote = self.auth.is_signed_in();
        let result = match self.persist.load(self.auth.user_id()) {
            Ok(Some(snapshot)) => {
                self.state = snapshot;
                self.log.push(GameEvent::Loaded { remote });
                self.settle();
                LoadResult::Loaded
            }
            Ok(None) => LoadResult::Missing,
            Err(e) => {
                log::warn!("[LOAD] {}, holding writes until a read succeeds", e);
                self.log.push(GameEvent::LoadFailed(e.to_string()));
                LoadResult::Failed
            }
        };
        self.store_unread = result == LoadResult::Failed;
        result
    }

    /// Goal escalation and challenge rewards after any earning. Returns true
    /// if either granted anything.
    fn settle(&mut self) -> bool {
        let mut changed = false;
        // A challenge reward can cross a goal, so evaluate challenges first.
        for challenge in challenges::evaluate(&mut self.state) {
            log::info!(
                "[CHALLENGE] {} completed, +{} boba",
                challenge.id,
                challenge.reward
            );
            self.log.push(GameEvent::ChallengeCompleted {
                name: challenge.name,
                reward: challenge.reward,
            });
            changed = true;
        }
        for (goal, next_goal) in economy::advance_goals(&mut self.state) {
            log::info!("[GOAL] reached {}, next {}", goal, next_goal);
            self.log.push(GameEvent::GoalReached { goal, next_goal });
            changed = true;
        }
        changed
    }

    fn on_timer_complete(&mut self, mode: TimerMode, minutes: u32, now_ms: f64) {
        match mode {
            TimerMode::Focus => {
                let reward = economy::complete_focus_session(&mut self.state, minutes);
                log::info!("[TIMER] focus session of {} min, +{} boba", minutes, reward);
                self.log
                    .push(GameEvent::SessionCompleted { minutes, reward });
                self.settle();
                self.persist.request_save(now_ms);
            }
            TimerMode::Break => {
                log::info!("[TIMER] break finished");
                self.log.push(GameEvent::BreakFinished);
            }
        }
    }

    fn report_save(&mut self, result: Result<SaveOutcome, PersistError>) {
        match result {
            Ok(outcome) => self.log.push(GameEvent::Saved(outcome)),
            Err(e) => self.report_failure(e),
        }
    }

    fn report_failure(&mut self, e: PersistError) {
        log::warn!("[SAVE] {}", e);
        self.log.push(GameEvent::PersistFailed(e.to_string()));
    }

    fn dispatch(&mut self, action: u16, now_ms: f64) -> bool {
        match action {
            BREW => self.brew(now_ms),
            TIMER_TOGGLE => self.toggle_timer(now_ms),
            TIMER_RESET => self.timer.reset(),
            DURATION_UP => self.adjust_duration(1),
            DURATION_DOWN => self.adjust_duration(-1),
            TAB_SHOP => self.tab = Tab::Shop,
            TAB_CHALLENGES => self.tab = Tab::Challenges,
            TAB_STATS => self.tab = Tab::Stats,
            SAVE_NOW => self.save_now(now_ms),
            RESET_PROGRESS => self.request_reset(now_ms),
            id if id >= BUY_ENTRY_BASE && ((id - BUY_ENTRY_BASE) as usize) < catalog::CATALOG.len() => {
                self.buy((id - BUY_ENTRY_BASE) as usize, now_ms);
            }
            _ => return false,
        }
        true
    }

    pub fn handle_input_at(&mut self, event: &InputEvent, now_ms: f64) -> bool {
        let action = match event {
            InputEvent::Click(id) => *id,
            InputEvent::Key(c) => match c {
                'c' | ' ' => BREW,
                '1'..='9' => BUY_ENTRY_BASE + (*c as u16 - '1' as u16),
                's' => TIMER_TOGGLE,
                'r' => TIMER_RESET,
                '+' | '=' => DURATION_UP,
                '-' => DURATION_DOWN,
                't' => {
                    self.tab = self.tab.next();
                    return true;
                }
                'w' => SAVE_NOW,
                'X' => RESET_PROGRESS,
                _ => return false,
            },
        };
        self.dispatch(action, now_ms)
    }

    /// Advance every loop to `now_ms` and run any persistence that is due.
    pub fn update(&mut self, now_ms: f64) {
        self.now_ms = now_ms;

        // Passive income does not request a debounced write; autosave covers it.
        if self.accrual.advance(&mut self.state, now_ms) > 0.0 {
            self.settle();
        }

        if let Some(done) = self.timer.advance(now_ms) {
            self.on_timer_complete(done.mode, done.minutes, now_ms);
        }

        if !self.store_unread {
            if let Some(result) = self.persist.poll(self.auth.user_id(), &self.state, now_ms) {
                self.report_save(result);
            }
        }

        if now_ms >= self.next_autosave_ms {
            self.next_autosave_ms = now_ms + AUTOSAVE_INTERVAL_MS;
            self.save_now(now_ms);
        }
    }
}

impl Game for BobaGame {
    fn handle_input(&mut self, event: &InputEvent, now_ms: f64) -> bool {
        self.handle_input_at(event, now_ms)
    }

    fn update(&mut self, now_ms: f64) {
        BobaGame::update(self, now_ms);
    }

    fn render(&self, f: &mut Frame, area: Rect, click_state: &Rc<RefCell<ClickState>>) {
        render::render(self, f, area, click_state);
    }
}
