//! Boba shop progression state.

use std::collections::{BTreeMap, BTreeSet};

use super::config::{BASE_CLICK, INITIAL_GOAL};

/// Level counters that upgrades feed into. Several catalog entries may share
/// one id; the level is stored once per id.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum UpgradeId {
    Tapioca,
    Staff,
    Marketing,
}

impl UpgradeId {
    pub fn all() -> &'static [UpgradeId] {
        &[UpgradeId::Tapioca, UpgradeId::Staff, UpgradeId::Marketing]
    }

    /// Stable key used in save data.
    pub fn key(&self) -> &'static str {
        match self {
            UpgradeId::Tapioca => "tapioca",
            UpgradeId::Staff => "staff",
            UpgradeId::Marketing => "marketing",
        }
    }

    pub fn from_key(key: &str) -> Option<UpgradeId> {
        UpgradeId::all().iter().copied().find(|id| id.key() == key)
    }

    /// Level every new shop starts with. Tapioca starts at 1 so the first
    /// click is worth exactly `BASE_CLICK`.
    pub fn starting_level(&self) -> u32 {
        match self {
            UpgradeId::Tapioca => 1,
            UpgradeId::Staff | UpgradeId::Marketing => 0,
        }
    }
}

/// The persisted unit of state. Mutated only through the economy, timer,
/// accrual and challenge modules.
#[derive(Clone, Debug, PartialEq)]
pub struct ProgressSnapshot {
    /// Spendable balance.
    pub currency: f64,
    /// Lifetime boba earned; never spent, never decreases.
    pub total_earned: f64,
    pub total_clicks: u64,
    pub completed_sessions: u64,
    /// Next milestone on `total_earned`.
    pub current_goal: f64,
    /// Derived from upgrade levels after every purchase.
    pub per_click_rate: f64,
    /// Derived from upgrade levels after every purchase.
    pub passive_rate: f64,
    pub upgrade_levels: BTreeMap<UpgradeId, u32>,
    /// Ids of challenges already rewarded.
    pub completed_challenge_ids: BTreeSet<String>,
}

impl ProgressSnapshot {
    pub fn new() -> Self {
        let upgrade_levels = UpgradeId::all()
            .iter()
            .map(|id| (*id, id.starting_level()))
            .collect();

        Self {
            currency: 0.0,
            total_earned: 0.0,
            total_clicks: 0,
            completed_sessions: 0,
            current_goal: INITIAL_GOAL,
            per_click_rate: BASE_CLICK,
            passive_rate: 0.0,
            upgrade_levels,
            completed_challenge_ids: BTreeSet::new(),
        }
    }

    pub fn level(&self, id: UpgradeId) -> u32 {
        self.upgrade_levels
            .get(&id)
            .copied()
            .unwrap_or_else(|| id.starting_level())
    }

    /// Fraction of the current goal reached, clamped to `[0, 1]`.
    pub fn goal_progress(&self) -> f64 {
        if self.current_goal <= 0.0 {
            return 1.0;
        }
        (self.total_earned / self.current_goal).clamp(0.0, 1.0)
    }

    pub fn is_challenge_completed(&self, id: &str) -> bool {
        self.completed_challenge_ids.contains(id)
    }
}

impl Default for ProgressSnapshot {
    fn default() -> Self {
        Self::new()
    }
}
