//! Notifications for the presentation layer, plus the on-screen message log.

use super::economy::format_number;
use super::persist::SaveOutcome;

const LOG_CAPACITY: usize = 50;
/// Undrained events beyond this are dropped oldest-first.
const PENDING_CAPACITY: usize = 256;

/// Something the UI may want to react to.
#[derive(Clone, Debug, PartialEq)]
pub enum GameEvent {
    Brewed { amount: f64 },
    Combo(u32),
    Purchased { name: &'static str, cost: u64, level: u32 },
    PurchaseRejected { name: &'static str, cost: u64 },
    SessionCompleted { minutes: u32, reward: f64 },
    BreakFinished,
    GoalReached { goal: f64, next_goal: f64 },
    ChallengeCompleted { name: &'static str, reward: f64 },
    Saved(SaveOutcome),
    PersistFailed(String),
    LoadFailed(String),
    Loaded { remote: bool },
    SignedIn(String),
    SignedOut,
    ProgressReset,
    ResetArmed,
}

impl GameEvent {
    /// Log line for this event; `None` for high-frequency events.
    pub fn message(&self) -> Option<String> {
        let text = match self {
            GameEvent::Brewed { .. } => return None,
            GameEvent::Combo(n) => format!("{}x combo!", n),
            GameEvent::Purchased { name, cost, level } => {
                format!("Bought {} for {} (Lv.{})", name, format_number(*cost as f64), level)
            }
            GameEvent::PurchaseRejected { name, cost } => {
                format!("Not enough boba for {} ({})", name, format_number(*cost as f64))
            }
            GameEvent::SessionCompleted { minutes, reward } => format!(
                "Focus session done: {} min, +{} boba",
                minutes,
                format_number(*reward)
            ),
            GameEvent::BreakFinished => "Break over. Back to focus!".to_string(),
            GameEvent::GoalReached { goal, next_goal } => format!(
                "Goal reached: {} boba! Next goal {}",
                format_number(*goal),
                format_number(*next_goal)
            ),
            GameEvent::ChallengeCompleted { name, reward } => {
                format!("Challenge complete: {} (+{} boba)", name, format_number(*reward))
            }
            GameEvent::Saved(SaveOutcome::Unchanged) => return None,
            GameEvent::Saved(outcome) => format!("Saved ({})", outcome.label()),
            GameEvent::PersistFailed(reason) => format!("Save failed: {}", reason),
            GameEvent::LoadFailed(reason) => {
                format!("Could not load progress ({}), saving paused", reason)
            }
            GameEvent::Loaded { remote: true } => "Cloud progress loaded".to_string(),
            GameEvent::Loaded { remote: false } => "Local progress loaded".to_string(),
            GameEvent::SignedIn(user) => format!("Signed in as {}", user),
            GameEvent::SignedOut => "Signed out".to_string(),
            GameEvent::ProgressReset => "Progress reset".to_string(),
            GameEvent::ResetArmed => "Press X again to erase all progress".to_string(),
        };
        Some(text)
    }

    pub fn is_important(&self) -> bool {
        matches!(
            self,
            GameEvent::SessionCompleted { .. }
                | GameEvent::GoalReached { .. }
                | GameEvent::ChallengeCompleted { .. }
                | GameEvent::PersistFailed(_)
                | GameEvent::LoadFailed(_)
                | GameEvent::ResetArmed
        )
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct LogEntry {
    pub text: String,
    pub is_important: bool,
}

/// Bounded message log plus an undrained event queue.
#[derive(Clone, Debug, Default)]
pub struct EventLog {
    pub entries: Vec<LogEntry>,
    pending: Vec<GameEvent>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: GameEvent) {
        if let Some(text) = event.message() {
            self.add_log(&text, event.is_important());
        }
        self.pending.push(event);
        if self.pending.len() > PENDING_CAPACITY {
            self.pending.remove(0);
        }
    }

    pub fn add_log(&mut self, text: &str, is_important: bool) {
        self.entries.push(LogEntry {
            text: text.to_string(),
            is_important,
        });
        if self.entries.len() > LOG_CAPACITY {
            self.entries.remove(0);
        }
    }

    /// Take every event since the last drain.
    pub fn drain(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.pending)
    }

    /// Most recent `n` entries, oldest first.
    pub fn recent(&self, n: usize) -> &[LogEntry] {
        let start = self.entries.len().saturating_sub(n);
        &self.entries[start..]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_truncation() {
        let mut log = EventLog::new();
        for i in 0..60 {
            log.add_log(&format!("msg {}", i), false);
        }
        assert_eq!(log.entries.len(), 50);
        assert_eq!(log.entries[0].text, "msg 10");
    }

    #[test]
    fn brew_events_are_queued_but_not_logged() {
        let mut log = EventLog::new();
        log.push(GameEvent::Brewed { amount: 1.0 });
        assert!(log.entries.is_empty());
        assert_eq!(log.drain(), vec![GameEvent::Brewed { amount: 1.0 }]);
        assert!(log.drain().is_empty());
    }

    #[test]
    fn challenge_event_is_important() {
        let mut log = EventLog::new();
        log.push(GameEvent::ChallengeCompleted {
            name: "Rookie Brewer",
            reward: 50.0,
        });
        let entry = &log.entries[0];
        assert!(entry.is_important);
        assert_eq!(entry.text, "Challenge complete: Rookie Brewer (+50 boba)");
    }

    #[test]
    fn recent_returns_tail() {
        let mut log = EventLog::new();
        for i in 0..5 {
            log.add_log(&format!("{}", i), false);
        }
        let texts: Vec<&str> = log.recent(2).iter().map(|e| e.text.as_str()).collect();
        assert_eq!(texts, vec!["3", "4"]);
        assert_eq!(log.recent(10).len(), 5);
    }
}
