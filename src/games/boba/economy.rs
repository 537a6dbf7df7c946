//! Economy engine: pure functions over [`ProgressSnapshot`].

use super::catalog::{self, CatalogEntry};
use super::config::{
    BASE_CLICK, COMBO_EVENT_EVERY, COMBO_WINDOW_MS, GOAL_MULTIPLIER, LONG_SESSION_THRESHOLD_MINUTES,
    MARKETING_BONUS_PER_LEVEL, REWARD_PER_MINUTE, SESSION_BONUS_PER_COMPLETED,
    STAFF_RATE_PER_LEVEL,
};
use super::error::PurchaseError;
use super::state::{ProgressSnapshot, UpgradeId};

/// What a successful purchase bought.
#[derive(Clone, Debug, PartialEq)]
pub struct PurchaseReceipt {
    pub entry: usize,
    pub id: UpgradeId,
    pub cost: u64,
    /// Shared level after the purchase.
    pub level: u32,
}

/// Manual click: adds the per-click rate to balance and lifetime total.
pub fn apply_click(s: &mut ProgressSnapshot) -> f64 {
    let amount = s.per_click_rate;
    s.total_clicks += 1;
    s.currency += amount;
    s.total_earned += amount;
    amount
}

/// Combined percentage bonus from marketing-class levels.
pub fn marketing_multiplier(s: &ProgressSnapshot) -> f64 {
    1.0 + s.level(UpgradeId::Marketing) as f64 * MARKETING_BONUS_PER_LEVEL
}

/// Recompute both derived rates from the upgrade levels, from scratch.
pub fn recompute_rates(s: &mut ProgressSnapshot) {
    let multiplier = marketing_multiplier(s);
    s.per_click_rate = BASE_CLICK * s.level(UpgradeId::Tapioca) as f64 * multiplier;
    s.passive_rate = s.level(UpgradeId::Staff) as f64 * STAFF_RATE_PER_LEVEL * multiplier;
}

/// Buy the next level through a specific catalog entry.
pub fn purchase_entry(s: &mut ProgressSnapshot, index: usize) -> Result<PurchaseReceipt, PurchaseError> {
    let entry: &CatalogEntry = catalog::entry(index).ok_or(PurchaseError::UnknownEntry(index))?;
    let level = s.level(entry.id);
    let cost = entry.cost_at(level);

    if s.currency < cost as f64 {
        return Err(PurchaseError::InsufficientFunds {
            cost,
            balance: s.currency,
        });
    }

    s.currency -= cost as f64;
    let new_level = level + 1;
    s.upgrade_levels.insert(entry.id, new_level);
    recompute_rates(s);

    Ok(PurchaseReceipt {
        entry: index,
        id: entry.id,
        cost,
        level: new_level,
    })
}

/// Buy the next level of `id` through its first catalog entry.
pub fn purchase(s: &mut ProgressSnapshot, id: UpgradeId) -> Result<PurchaseReceipt, PurchaseError> {
    let index = catalog::primary_entry(id).ok_or(PurchaseError::UnknownEntry(usize::MAX))?;
    purchase_entry(s, index)
}

pub fn can_afford(s: &ProgressSnapshot, index: usize) -> bool {
    catalog::entry(index).is_some_and(|e| s.currency >= e.next_cost(s) as f64)
}

/// Credit challenge or session rewards. No failure mode.
pub fn grant_reward(s: &mut ProgressSnapshot, amount: f64) {
    s.currency += amount;
    s.total_earned += amount;
}

/// Whether lifetime earnings have reached the current goal.
pub fn check_goal(s: &ProgressSnapshot) -> bool {
    s.total_earned >= s.current_goal
}

/// Escalate the goal once per crossing. Returns `(reached, next)` for each
/// goal passed, so a single large reward may cross several.
pub fn advance_goals(s: &mut ProgressSnapshot) -> Vec<(f64, f64)> {
    let mut crossed = Vec::new();
    while check_goal(s) && s.current_goal > 0.0 {
        let reached = s.current_goal;
        s.current_goal *= GOAL_MULTIPLIER;
        crossed.push((reached, s.current_goal));
    }
    crossed
}

/// Unscaled reward for a focus session of `minutes` elapsed minutes.
pub fn session_reward(minutes: u32) -> f64 {
    let m = minutes as f64;
    REWARD_PER_MINUTE * m + (m - LONG_SESSION_THRESHOLD_MINUTES).max(0.0)
}

/// Credit a finished focus session. The bonus uses the session count from
/// before this completion. Returns the granted amount.
pub fn complete_focus_session(s: &mut ProgressSnapshot, minutes: u32) -> f64 {
    let scale = 1.0 + s.completed_sessions as f64 * SESSION_BONUS_PER_COMPLETED;
    let reward = session_reward(minutes) * scale;
    grant_reward(s, reward);
    s.completed_sessions += 1;
    reward
}

/// Tracks rapid consecutive clicks. Presentation only, never persisted.
#[derive(Clone, Debug, Default)]
pub struct ComboTracker {
    last_click_ms: Option<f64>,
    pub count: u32,
}

impl ComboTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a click at `now_ms`. Returns `Some(count)` whenever the
    /// chain reaches a multiple of `COMBO_EVENT_EVERY`.
    pub fn register(&mut self, now_ms: f64) -> Option<u32> {
        let chained = self
            .last_click_ms
            .is_some_and(|prev| now_ms - prev <= COMBO_WINDOW_MS && now_ms >= prev);
        self.count = if chained { self.count + 1 } else { 1 };
        self.last_click_ms = Some(now_ms);

        (self.count % COMBO_EVENT_EVERY == 0).then_some(self.count)
    }

    /// Current chain length, or 0 if the window has lapsed.
    pub fn active(&self, now_ms: f64) -> u32 {
        match self.last_click_ms {
            Some(prev) if now_ms - prev <= COMBO_WINDOW_MS => self.count,
            _ => 0,
        }
    }
}

/// Format a number with commas (e.g. 1234567 → "1,234,567").
pub fn format_number(n: f64) -> String {
    if n < 0.0 {
        return format!("-{}", format_number(-n));
    }
    let int_part = n.floor() as u64;
    let frac = n - int_part as f64;

    let s = int_part.to_string();
    let mut result = String::new();
    for (i, c) in s.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push(',');
        }
        result.push(c);
    }
    let result: String = result.chars().rev().collect();

    let tenth = (frac * 10.0).floor() as u8;
    if tenth > 0 {
        format!("{}.{}", result, tenth)
    } else {
        result
    }
}
