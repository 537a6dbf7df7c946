//! Semantic action IDs for Boba Focus click targets.
//!
//! Registered during render and dispatched back via `InputEvent::Click`.

// ── Shop floor ──────────────────────────────────────────────────
pub const BREW: u16 = 0;

// ── Timer ───────────────────────────────────────────────────────
pub const TIMER_TOGGLE: u16 = 10;
pub const TIMER_RESET: u16 = 11;
pub const DURATION_UP: u16 = 12;
pub const DURATION_DOWN: u16 = 13;

// ── Tabs ────────────────────────────────────────────────────────
pub const TAB_SHOP: u16 = 20;
pub const TAB_CHALLENGES: u16 = 21;
pub const TAB_STATS: u16 = 22;

// ── Persistence ─────────────────────────────────────────────────
pub const SAVE_NOW: u16 = 30;
pub const RESET_PROGRESS: u16 = 31;

// ── Catalog purchase (base + catalog index) ─────────────────────
pub const BUY_ENTRY_BASE: u16 = 100;
