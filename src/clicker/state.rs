//! Reborn Clicker player state and static balance definitions.

/// Multiplier gained per reborn.
pub const REBORN_MULTIPLIER_BONUS: f64 = 0.5;
/// Price of the first reborn.
pub const REBORN_BASE_COST: f64 = 1_000_000.0;
/// Growth factor of the reborn price per reborn already performed.
pub const REBORN_COST_MULTIPLIER: f64 = 2.5;

/// Upgrade tracks, each leveled independently.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Track {
    ClickPower,
    SuperClickPower,
    AutoClicker,
    SuperAutoClicker,
    HyperAutoClicker,
}

/// What a track's owned units feed into.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Yield {
    Click,
    PerSecond,
}

impl Track {
    /// All tracks in display order. Indices into `PlayerState::levels` follow this order.
    pub fn all() -> &'static [Track] {
        &[
            Track::ClickPower,
            Track::SuperClickPower,
            Track::AutoClicker,
            Track::SuperAutoClicker,
            Track::HyperAutoClicker,
        ]
    }

    pub fn index(&self) -> usize {
        match self {
            Track::ClickPower => 0,
            Track::SuperClickPower => 1,
            Track::AutoClicker => 2,
            Track::SuperAutoClicker => 3,
            Track::HyperAutoClicker => 4,
        }
    }

    /// Display name.
    pub fn name(&self) -> &str {
        match self {
            Track::ClickPower => "Click Power",
            Track::SuperClickPower => "Super Click",
            Track::AutoClicker => "Auto Clicker",
            Track::SuperAutoClicker => "Super Auto",
            Track::HyperAutoClicker => "Hyper Auto",
        }
    }

    pub fn description(&self) -> &str {
        match self {
            Track::ClickPower => "click +1",
            Track::SuperClickPower => "click +5",
            Track::AutoClicker => "+1/s",
            Track::SuperAutoClicker => "+5/s",
            Track::HyperAutoClicker => "+10/s",
        }
    }

    /// Key to buy (1-5 mapped to track index).
    pub fn key(&self) -> char {
        match self {
            Track::ClickPower => '1',
            Track::SuperClickPower => '2',
            Track::AutoClicker => '3',
            Track::SuperAutoClicker => '4',
            Track::HyperAutoClicker => '5',
        }
    }

    pub fn from_key(key: char) -> Option<Track> {
        Track::all().iter().copied().find(|t| t.key() == key)
    }

    /// Price of level 0 -> 1.
    pub fn base_cost(&self) -> f64 {
        match self {
            Track::ClickPower => 10.0,
            Track::SuperClickPower => 300.0,
            Track::AutoClicker => 50.0,
            Track::SuperAutoClicker => 100.0,
            Track::HyperAutoClicker => 500.0,
        }
    }

    pub fn cost_multiplier(&self) -> f64 {
        1.5
    }

    /// Owned units before any purchase. Only the base click starts at one.
    pub fn base_owned(&self) -> u64 {
        match self {
            Track::ClickPower => 1,
            _ => 0,
        }
    }

    /// Owned units added by each level.
    pub fn owned_per_level(&self) -> u64 {
        match self {
            Track::SuperClickPower => 5,
            _ => 1,
        }
    }

    /// Points contributed per owned unit (before the reborn multiplier).
    pub fn yield_weight(&self) -> f64 {
        match self {
            Track::ClickPower | Track::SuperClickPower | Track::AutoClicker => 1.0,
            Track::SuperAutoClicker => 5.0,
            Track::HyperAutoClicker => 10.0,
        }
    }

    pub fn yields(&self) -> Yield {
        match self {
            Track::ClickPower | Track::SuperClickPower => Yield::Click,
            _ => Yield::PerSecond,
        }
    }

    /// Price of the next purchase when the track sits at `level`.
    ///
    /// `floor(base_cost * cost_multiplier^level)`. Kept as `f64` like
    /// `points`, so the price never stops growing; past `f64::MAX` it is infinite.
    pub fn cost_at(&self, level: u32) -> f64 {
        (self.base_cost() * self.cost_multiplier().powf(level as f64)).floor()
    }

    pub fn owned_at(&self, level: u32) -> u64 {
        self.base_owned() + self.owned_per_level() * level as u64
    }
}

/// `1 + bonus * reborn_count`.
pub fn multiplier_for(reborn_count: u32) -> f64 {
    1.0 + REBORN_MULTIPLIER_BONUS * reborn_count as f64
}

/// `floor(base * growth^reborn_count)`.
pub fn reborn_cost_for(reborn_count: u32) -> f64 {
    (REBORN_BASE_COST * REBORN_COST_MULTIPLIER.powf(reborn_count as f64)).floor()
}

/// The player's economic state.
///
/// Only raw counters are stored. Cost, owned amount, multiplier and reborn
/// price are always computed from them, so they can never disagree with
/// the formulas.
#[derive(Clone, Debug, PartialEq)]
pub struct PlayerState {
    /// Spendable balance. Never negative.
    pub points: f64,
    /// Level per track, indexed by `Track::index()`.
    pub levels: [u32; 5],
    /// Times the reborn cycle has run.
    pub reborn_count: u32,
}

impl Default for PlayerState {
    fn default() -> Self {
        Self::new()
    }
}

impl PlayerState {
    pub fn new() -> Self {
        Self {
            points: 0.0,
            levels: [0; 5],
            reborn_count: 0,
        }
    }

    pub fn level(&self, track: Track) -> u32 {
        self.levels[track.index()]
    }

    pub fn owned(&self, track: Track) -> u64 {
        track.owned_at(self.level(track))
    }

    pub fn cost(&self, track: Track) -> f64 {
        track.cost_at(self.level(track))
    }

    /// Enough points and the level counter still has room.
    pub fn can_afford(&self, track: Track) -> bool {
        self.level(track) < u32::MAX && self.points >= self.cost(track)
    }

    pub fn click_multiplier(&self) -> f64 {
        multiplier_for(self.reborn_count)
    }

    /// Multiplier the next reborn would grant.
    pub fn next_multiplier(&self) -> f64 {
        multiplier_for(self.reborn_count.saturating_add(1))
    }

    pub fn reborn_cost(&self) -> f64 {
        reborn_cost_for(self.reborn_count)
    }

    pub fn can_reborn(&self) -> bool {
        self.reborn_count < u32::MAX && self.points >= self.reborn_cost()
    }

    /// Sum of unmultiplied contributions for one yield kind.
    fn raw_yield(&self, kind: Yield) -> f64 {
        Track::all()
            .iter()
            .filter(|t| t.yields() == kind)
            .map(|t| self.owned(*t) as f64 * t.yield_weight())
            .sum()
    }

    /// `(clickPower + superClickPower) * multiplier`.
    pub fn effective_click_power(&self) -> f64 {
        self.raw_yield(Yield::Click) * self.click_multiplier()
    }

    /// `(auto*1 + superAuto*5 + hyperAuto*10) * multiplier`.
    pub fn effective_per_second(&self) -> f64 {
        self.raw_yield(Yield::PerSecond) * self.click_multiplier()
    }
}
