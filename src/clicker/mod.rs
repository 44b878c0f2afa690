//! Reborn Clicker: click for points, buy upgrade tracks, reborn for a permanent multiplier.

pub mod actions;
pub mod error;
pub mod logic;
pub mod render;
pub mod save;
pub mod state;

use std::cell::RefCell;
use std::rc::Rc;

use ratzilla::ratatui::layout::Rect;
use ratzilla::ratatui::Frame;

use crate::input::{ClickState, InputEvent};
use crate::time::Interval;

use actions::*;
use error::EngineError;
use logic::format_number;
use state::{PlayerState, Track};

/// Clock ticks per real-time second.
pub const TICKS_PER_SECOND: u32 = 10;
/// Clock ticks between engine ticks (1 second).
pub const ENGINE_TICK_INTERVAL: u32 = 10;
/// Clock ticks between autosaves (10 seconds).
pub const AUTOSAVE_INTERVAL: u32 = 100;

/// Flash lengths, in clock ticks.
const CLICK_FLASH_TICKS: u32 = 3;
const PURCHASE_FLASH_TICKS: u32 = 3;
const ERROR_FLASH_TICKS: u32 = 4;

const MAX_LOG: usize = 50;

#[derive(Clone, Debug)]
pub struct LogEntry {
    pub text: String,
    pub is_important: bool,
}

/// The engine state plus everything the host shell needs around it:
/// periodic tasks, feedback timers and the reborn confirmation step.
pub struct ClickerGame {
    pub state: PlayerState,
    /// Waiting for the player to confirm a reborn.
    pub confirm_reborn: bool,
    pub log: Vec<LogEntry>,
    /// Amount added by the latest click, shown as floating "+N".
    pub last_click: f64,
    pub click_flash: u32,
    /// Track whose buy row flashes after a purchase.
    pub purchase_flash: Option<(Track, u32)>,
    pub error_flash: u32,
    engine_clock: Interval,
    autosave_clock: Interval,
    save_requested: bool,
}

impl ClickerGame {
    pub fn new() -> Self {
        Self::with_state(PlayerState::new())
    }

    pub fn with_state(state: PlayerState) -> Self {
        let mut game = Self {
            state,
            confirm_reborn: false,
            log: Vec::new(),
            last_click: 0.0,
            click_flash: 0,
            purchase_flash: None,
            error_flash: 0,
            engine_clock: Interval::new(ENGINE_TICK_INTERVAL),
            autosave_clock: Interval::new(AUTOSAVE_INTERVAL),
            save_requested: false,
        };
        game.add_log("Reborn Clicker へようこそ！", true);
        game
    }

    pub fn add_log(&mut self, text: &str, is_important: bool) {
        self.log.push(LogEntry {
            text: text.to_string(),
            is_important,
        });
        if self.log.len() > MAX_LOG {
            self.log.remove(0);
        }
    }

    /// Returns true once after a purchase, reborn or autosave interval asked for a save.
    pub fn take_save_request(&mut self) -> bool {
        std::mem::take(&mut self.save_requested)
    }

    /// Handle an input event. Returns true if the event was consumed.
    pub fn handle_input(&mut self, event: &InputEvent) -> bool {
        if self.confirm_reborn {
            return match event {
                InputEvent::Key('y') | InputEvent::Click(REBORN_CONFIRM) => {
                    self.confirm_reborn = false;
                    self.do_reborn();
                    true
                }
                InputEvent::Key('n') | InputEvent::Click(REBORN_CANCEL) => {
                    self.confirm_reborn = false;
                    true
                }
                _ => false,
            };
        }

        match event {
            InputEvent::Key('c') | InputEvent::Key(' ') | InputEvent::Click(CLICK_BUTTON) => {
                self.do_click();
                true
            }
            InputEvent::Key(c) if Track::from_key(*c).is_some() => {
                if let Some(track) = Track::from_key(*c) {
                    self.do_purchase(track);
                }
                true
            }
            InputEvent::Click(id)
                if (BUY_TRACK_BASE..BUY_TRACK_BASE + Track::all().len() as u16).contains(id) =>
            {
                let track = Track::all()[(id - BUY_TRACK_BASE) as usize];
                self.do_purchase(track);
                true
            }
            InputEvent::Key('r') | InputEvent::Click(REBORN_REQUEST) => {
                if self.state.can_reborn() {
                    self.confirm_reborn = true;
                } else {
                    self.error_flash = ERROR_FLASH_TICKS;
                    let err = if self.state.reborn_count == u32::MAX {
                        EngineError::RebornMaxed
                    } else {
                        EngineError::InsufficientFunds {
                            needed: self.state.reborn_cost(),
                            available: self.state.points,
                        }
                    };
                    let msg = format!("転生できません: {}", describe_error(&err));
                    self.add_log(&msg, false);
                }
                true
            }
            _ => false,
        }
    }

    fn do_click(&mut self) {
        self.last_click = logic::click(&mut self.state);
        self.click_flash = CLICK_FLASH_TICKS;
    }

    fn do_purchase(&mut self, track: Track) {
        match logic::purchase(&mut self.state, track) {
            Ok(p) => {
                self.purchase_flash = Some((track, PURCHASE_FLASH_TICKS));
                self.save_requested = true;
                let msg = format!("{} Lv.{} を購入 (-{})", track.name(), p.level, format_number(p.cost));
                self.add_log(&msg, false);
            }
            Err(e) => {
                self.error_flash = ERROR_FLASH_TICKS;
                self.add_log(&format!("{}: {}", track.name(), describe_error(&e)), false);
            }
        }
    }

    fn do_reborn(&mut self) {
        match logic::reborn(&mut self.state) {
            Ok(r) => {
                self.save_requested = true;
                let msg = format!(
                    "★ 転生 {} 回目！ 倍率 x{:.1}",
                    r.reborn_count, r.multiplier
                );
                self.add_log(&msg, true);
            }
            Err(e) => {
                self.error_flash = ERROR_FLASH_TICKS;
                self.add_log(&format!("転生失敗: {}", describe_error(&e)), false);
            }
        }
    }

    /// Advance by `delta_ticks` clock ticks, running the engine tick and
    /// autosave on their own cadences.
    pub fn tick(&mut self, delta_ticks: u32) {
        if delta_ticks == 0 {
            return;
        }
        self.click_flash = self.click_flash.saturating_sub(delta_ticks);
        self.error_flash = self.error_flash.saturating_sub(delta_ticks);
        self.purchase_flash = self
            .purchase_flash
            .and_then(|(t, left)| left.checked_sub(delta_ticks).filter(|l| *l > 0).map(|l| (t, l)));

        for _ in 0..self.engine_clock.advance(delta_ticks) {
            logic::tick(&mut self.state);
        }
        if self.autosave_clock.advance(delta_ticks) > 0 {
            self.save_requested = true;
        }
    }

    pub fn render(&self, f: &mut Frame, area: Rect, click_state: &Rc<RefCell<ClickState>>) {
        render::render(self, f, area, click_state);
    }
}

/// Log text for an engine rejection.
fn describe_error(err: &EngineError) -> String {
    match err {
        EngineError::InsufficientFunds { needed, available } => format!(
            "ポイント不足 (必要 {} / 所持 {})",
            format_number(*needed),
            format_number(*available)
        ),
        EngineError::LevelMaxed { .. } => "これ以上強化できません".to_string(),
        EngineError::RebornMaxed => "これ以上転生できません".to_string(),
    }
}

impl Default for ClickerGame {
    fn default() -> Self {
        Self::new()
    }
}
