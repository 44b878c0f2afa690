//! Semantic action IDs for Reborn Clicker click targets.
//!
//! Registered during render and dispatched via `InputEvent::Click`.

// ── Core actions ────────────────────────────────────────────────
pub const CLICK_BUTTON: u16 = 0;

// ── Track purchase (base + track index 0..4) ────────────────────
pub const BUY_TRACK_BASE: u16 = 100;

// ── Reborn ──────────────────────────────────────────────────────
pub const REBORN_REQUEST: u16 = 500;
pub const REBORN_CONFIRM: u16 = 501;
pub const REBORN_CANCEL: u16 = 502;
