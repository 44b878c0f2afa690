//! Reborn Clicker progression engine. Pure functions over `PlayerState`.
//!
//! Every operation takes the state by `&mut` and either fully applies or
//! leaves it untouched.

use super::error::EngineError;
use super::state::{PlayerState, Track};

/// Result of a successful purchase.
#[derive(Clone, Debug, PartialEq)]
pub struct Purchase {
    pub track: Track,
    /// Price paid.
    pub cost: f64,
    /// Level after the purchase.
    pub level: u32,
}

/// Result of a successful reborn.
#[derive(Clone, Debug, PartialEq)]
pub struct Reborn {
    pub reborn_count: u32,
    pub multiplier: f64,
    pub next_cost: f64,
}

/// One track as the renderer sees it.
#[derive(Clone, Debug, PartialEq)]
pub struct TrackView {
    pub track: Track,
    pub level: u32,
    pub owned: u64,
    pub cost: f64,
    pub affordable: bool,
}

/// Read-only snapshot handed to the renderer after every operation.
#[derive(Clone, Debug, PartialEq)]
pub struct EngineView {
    pub points: f64,
    pub click_power: f64,
    pub per_second: f64,
    pub tracks: Vec<TrackView>,
    pub reborn_count: u32,
    pub multiplier: f64,
    pub next_multiplier: f64,
    pub reborn_cost: f64,
    pub can_reborn: bool,
}

/// Add one click's worth of points. Returns the amount added.
pub fn click(state: &mut PlayerState) -> f64 {
    let power = state.effective_click_power();
    state.points += power;
    power
}

/// Add one second of generator output.
///
/// Returns `None` without touching the state when nothing is generated.
pub fn tick(state: &mut PlayerState) -> Option<f64> {
    let produced = state.effective_per_second();
    if produced <= 0.0 {
        return None;
    }
    state.points += produced;
    Some(produced)
}

/// Buy one level of `track`.
pub fn purchase(state: &mut PlayerState, track: Track) -> Result<Purchase, EngineError> {
    let current = state.level(track);
    let next = current
        .checked_add(1)
        .ok_or(EngineError::LevelMaxed { track })?;
    let cost = state.cost(track);
    if state.points < cost {
        return Err(EngineError::InsufficientFunds {
            needed: cost,
            available: state.points,
        });
    }
    state.points = (state.points - cost).max(0.0);
    state.levels[track.index()] = next;
    Ok(Purchase {
        track,
        cost,
        level: next,
    })
}

/// Trade all progress for a permanent multiplier.
///
/// Only `reborn_count` survives; points and every track level go back to zero.
pub fn reborn(state: &mut PlayerState) -> Result<Reborn, EngineError> {
    let reborn_count = state
        .reborn_count
        .checked_add(1)
        .ok_or(EngineError::RebornMaxed)?;
    let cost = state.reborn_cost();
    if state.points < cost {
        return Err(EngineError::InsufficientFunds {
            needed: cost,
            available: state.points,
        });
    }
    *state = PlayerState {
        reborn_count,
        ..PlayerState::new()
    };
    Ok(Reborn {
        reborn_count: state.reborn_count,
        multiplier: state.click_multiplier(),
        next_cost: state.reborn_cost(),
    })
}

/// Build the renderer snapshot.
pub fn view(state: &PlayerState) -> EngineView {
    EngineView {
        points: state.points,
        click_power: state.effective_click_power(),
        per_second: state.effective_per_second(),
        tracks: Track::all()
            .iter()
            .map(|&track| TrackView {
                track,
                level: state.level(track),
                owned: state.owned(track),
                cost: state.cost(track),
                affordable: state.can_afford(track),
            })
            .collect(),
        reborn_count: state.reborn_count,
        multiplier: state.click_multiplier(),
        next_multiplier: state.next_multiplier(),
        reborn_cost: state.reborn_cost(),
        can_reborn: state.can_reborn(),
    }
}

/// Format a number with thousands separators. Fractions keep one decimal.
/// Values past the exact-integer range of `f64` switch to scientific notation.
pub fn format_number(n: f64) -> String {
    if !n.is_finite() || n.abs() >= 1e15 {
        return format!("{:.3e}", n);
    }
    let negative = n < 0.0;
    let abs = n.abs();
    let int_part = abs.floor() as u64;
    let frac = abs - int_part as f64;

    let digits = int_part.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let mut out = String::new();
    if negative {
        out.push('-');
    }
    out.push_str(&grouped);
    let tenth = (frac * 10.0).floor() as u32;
    if tenth > 0 {
        out.push('.');
        out.push_str(&tenth.to_string());
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clicker::save;

    #[test]
    fn purchase_click_power_example() {
        let mut state = PlayerState::new();
        state.points = 10.0;
        let receipt = purchase(&mut state, Track::ClickPower).unwrap();
        assert_eq!(receipt.cost, 10.0);
        assert_eq!(receipt.level, 1);
        assert!((state.points - 0.0).abs() < 1e-9);
        assert_eq!(state.level(Track::ClickPower), 1);
        assert_eq!(state.cost(Track::ClickPower), 15.0);
        assert_eq!(state.owned(Track::ClickPower), 2);
    }

    #[test]
    fn purchase_rejected_leaves_state_unchanged() {
        let mut state = PlayerState::new();
        state.points = 9.0;
        let before = state.clone();
        let err = purchase(&mut state, Track::ClickPower).unwrap_err();
        assert_eq!(
            err,
            EngineError::InsufficientFunds {
                needed: 10.0,
                available: 9.0
            }
        );
        assert_eq!(state, before);
    }

    #[test]
    fn super_click_adds_five_owned() {
        let mut state = PlayerState::new();
        state.points = 300.0;
        purchase(&mut state, Track::SuperClickPower).unwrap();
        assert_eq!(state.owned(Track::SuperClickPower), 5);
        assert_eq!(state.cost(Track::SuperClickPower), 450.0);
        assert!((state.effective_click_power() - 6.0).abs() < 1e-9);
    }

    #[test]
    fn click_with_multiplier() {
        let mut state = PlayerState::new();
        state.reborn_count = 1;
        let added = click(&mut state);
        assert!((added - 1.5).abs() < 1e-9);
        assert!((state.points - 1.5).abs() < 1e-9);
    }

    #[test]
    fn clicks_in_same_tick_are_additive() {
        let mut state = PlayerState::new();
        state.levels[Track::ClickPower.index()] = 2;
        for _ in 0..3 {
            click(&mut state);
        }
        assert!((state.points - 9.0).abs() < 1e-9);
    }

    #[test]
    fn tick_without_generators_is_noop() {
        let mut state = PlayerState::new();
        state.points = 42.0;
        assert_eq!(tick(&mut state), None);
        assert!((state.points - 42.0).abs() < 1e-9);
    }

    #[test]
    fn tick_adds_per_second() {
        let mut state = PlayerState::new();
        state.levels[Track::AutoClicker.index()] = 1;
        state.levels[Track::HyperAutoClicker.index()] = 1;
        assert_eq!(tick(&mut state), Some(11.0));
        assert!((state.points - 11.0).abs() < 1e-9);
    }

    #[test]
    fn reborn_example() {
        let mut state = PlayerState::new();
        state.points = 1_000_000.0;
        state.levels = [3, 1, 4, 1, 5];
        let receipt = reborn(&mut state).unwrap();
        assert_eq!(receipt.reborn_count, 1);
        assert!((receipt.multiplier - 1.5).abs() < 1e-9);
        assert_eq!(receipt.next_cost, 2_500_000.0);
        assert_eq!(state.reborn_count, 1);
        assert!((state.click_multiplier() - 1.5).abs() < 1e-9);
        assert_eq!(state.reborn_cost(), 2_500_000.0);
        assert!((state.points - 0.0).abs() < 1e-9);
        for &track in Track::all() {
            assert_eq!(state.level(track), 0);
            assert_eq!(state.cost(track), track.cost_at(0));
            assert_eq!(state.owned(track), track.base_owned());
        }
    }

    #[test]
    fn reborn_rejected_leaves_state_unchanged() {
        let mut state = PlayerState::new();
        state.points = 999_999.0;
        state.levels = [1, 0, 2, 0, 0];
        let before = state.clone();
        assert!(matches!(
            reborn(&mut state),
            Err(EngineError::InsufficientFunds { needed, .. }) if needed == 1_000_000.0
        ));
        assert_eq!(state, before);
    }

    #[test]
    fn high_level_purchase_pays_full_formula_price() {
        let mut state = PlayerState::new();
        state.points = 1e21;
        state.levels[Track::ClickPower.index()] = 110;
        let expected = (10.0 * 1.5f64.powf(110.0)).floor();
        let receipt = purchase(&mut state, Track::ClickPower).unwrap();
        assert_eq!(receipt.cost, expected);
        assert!(receipt.cost > 2e20);
        assert_eq!(state.points, (1e21 - expected).max(0.0));
        assert_eq!(state.level(Track::ClickPower), 111);
    }

    #[test]
    fn maxed_level_purchase_is_rejected_untouched() {
        let mut state = save::deserialize(
            r#"{"saveVersion":1,"points":1e300,"clickPowerLevel":1e12}"#,
        );
        assert_eq!(state.level(Track::ClickPower), u32::MAX);
        let before = state.clone();
        assert_eq!(
            purchase(&mut state, Track::ClickPower),
            Err(EngineError::LevelMaxed {
                track: Track::ClickPower
            })
        );
        assert_eq!(state, before);
    }

    #[test]
    fn maxed_reborn_count_is_rejected_untouched() {
        let mut state = PlayerState::new();
        state.points = f64::MAX;
        state.levels = [4, 0, 2, 0, 1];
        state.reborn_count = u32::MAX;
        let before = state.clone();
        assert_eq!(reborn(&mut state), Err(EngineError::RebornMaxed));
        assert_eq!(state, before);
    }

    #[test]
    fn view_reports_affordability() {
        let mut state = PlayerState::new();
        state.points = 60.0;
        let v = view(&state);
        assert_eq!(v.tracks.len(), 5);
        assert!(v.tracks[Track::ClickPower.index()].affordable);
        assert!(v.tracks[Track::AutoClicker.index()].affordable);
        assert!(!v.tracks[Track::SuperAutoClicker.index()].affordable);
        assert!(!v.can_reborn);
        assert!((v.next_multiplier - 1.5).abs() < 1e-9);
        assert_eq!(v.reborn_cost, 1_000_000.0);
    }

    #[test]
    fn format_number_groups_thousands() {
        assert_eq!(format_number(0.0), "0");
        assert_eq!(format_number(999.0), "999");
        assert_eq!(format_number(1_000.0), "1,000");
        assert_eq!(format_number(1_234_567.0), "1,234,567");
        assert_eq!(format_number(12.5), "12.5");
        assert_eq!(format_number(-1_500.0), "-1,500");
    }

    #[test]
    fn format_number_switches_to_scientific_for_huge_values() {
        assert_eq!(format_number(999_999_999_999_999.0), "999,999,999,999,999");
        assert_eq!(format_number(2.344e20), "2.344e20");
        assert_eq!(format_number(f64::INFINITY), "inf");
    }
}
