//! Tuning constants for the boba economy, timer and persistence.

use std::ops::RangeInclusive;

// ── Economy ─────────────────────────────────────────────────────
/// Each purchased level multiplies the next price by this factor.
pub const GROWTH_FACTOR: f64 = 1.5;
/// Boba per click before any upgrade multiplier.
pub const BASE_CLICK: f64 = 1.0;
/// Flat bonus per marketing-class level, applied to click and passive totals.
pub const MARKETING_BONUS_PER_LEVEL: f64 = 0.1;
/// Passive boba per second contributed by each staff level.
pub const STAFF_RATE_PER_LEVEL: f64 = 0.5;

// ── Goals ───────────────────────────────────────────────────────
pub const INITIAL_GOAL: f64 = 1000.0;
pub const GOAL_MULTIPLIER: f64 = 5.0;

// ── Sessions ────────────────────────────────────────────────────
/// Boba per elapsed focus minute.
pub const REWARD_PER_MINUTE: f64 = 5.0;
/// Minutes after which each additional minute earns one bonus boba.
pub const LONG_SESSION_THRESHOLD_MINUTES: f64 = 15.0;
/// Reward scaling per previously completed session.
pub const SESSION_BONUS_PER_COMPLETED: f64 = 0.1;

pub const DEFAULT_FOCUS_MINUTES: u32 = 25;
pub const DEFAULT_BREAK_MINUTES: u32 = 5;
pub const FOCUS_MINUTES_RANGE: RangeInclusive<u32> = 1..=60;
pub const BREAK_MINUTES_RANGE: RangeInclusive<u32> = 1..=30;

// ── Loops ───────────────────────────────────────────────────────
pub const PASSIVE_TICK_MS: u32 = 100;
pub const PASSIVE_TICKS_PER_SEC: u32 = 1000 / PASSIVE_TICK_MS;
pub const COMBO_WINDOW_MS: f64 = 500.0;
/// A combo event is emitted every this many chained clicks.
pub const COMBO_EVENT_EVERY: u32 = 10;

// ── Persistence ─────────────────────────────────────────────────
pub const LOCAL_SAVE_KEY: &str = "localSave";
pub const PERSIST_DEBOUNCE_MS: f64 = 2500.0;
pub const AUTOSAVE_INTERVAL_MS: f64 = 30_000.0;
/// Second press of the reset key must land inside this window.
pub const RESET_CONFIRM_WINDOW_MS: f64 = 3_000.0;
