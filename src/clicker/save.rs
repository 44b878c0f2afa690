//! Reborn Clicker save/load.
//!
//! ## Save format
//!
//! One flat JSON object under a single `localStorage` key. Every field of the
//! player state is written, derived values included, so the blob is readable
//! on its own. On load only raw counters (levels, `rebornCount`, `points`) are
//! read back; costs, owned counts and multipliers are recomputed.
//!
//! ## Migration
//!
//! - `SAVE_VERSION`: written as `saveVersion`. Blobs without it predate
//!   versioning.
//! - Unversioned blobs carrying `autoGenLevel`/`autoGen` use the pre-rename
//!   layout: `autoGen` was the basic auto clicker, `autoClicker` the super
//!   auto clicker, `megaGen` the hyper auto clicker.
//! - Each level falls back through its legacy names, then to the level implied
//!   by a stored owned count, then to 0.
//!
//! Loading never fails. Unreadable blobs or fields degrade to defaults.

use serde::Serialize;
use serde_json::{Map, Value};

use super::state::{PlayerState, Track};

/// Current save format version.
pub const SAVE_VERSION: u32 = 1;

/// localStorage key.
#[cfg(target_arch = "wasm32")]
const STORAGE_KEY: &str = "clickerGameState";

/// Flat on-disk record.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SaveData {
    save_version: u32,
    points: f64,

    click_power_level: u32,
    click_power: u64,
    click_power_cost: f64,

    super_click_power_level: u32,
    super_click_power: u64,
    super_click_power_cost: f64,

    auto_clicker_level: u32,
    auto_clicker: u64,
    auto_clicker_cost: f64,

    super_auto_clicker_level: u32,
    super_auto_clicker: u64,
    super_auto_clicker_cost: f64,

    hyper_auto_clicker_level: u32,
    hyper_auto_clicker: u64,
    hyper_auto_clicker_cost: f64,

    reborn_count: u32,
    click_multiplier: f64,
    reborn_cost: f64,
}

fn extract_save(state: &PlayerState) -> SaveData {
    let t = |track: Track| (state.level(track), state.owned(track), state.cost(track));
    let (click_power_level, click_power, click_power_cost) = t(Track::ClickPower);
    let (super_click_power_level, super_click_power, super_click_power_cost) =
        t(Track::SuperClickPower);
    let (auto_clicker_level, auto_clicker, auto_clicker_cost) = t(Track::AutoClicker);
    let (super_auto_clicker_level, super_auto_clicker, super_auto_clicker_cost) =
        t(Track::SuperAutoClicker);
    let (hyper_auto_clicker_level, hyper_auto_clicker, hyper_auto_clicker_cost) =
        t(Track::HyperAutoClicker);

    SaveData {
        save_version: SAVE_VERSION,
        points: state.points,
        click_power_level,
        click_power,
        click_power_cost,
        super_click_power_level,
        super_click_power,
        super_click_power_cost,
        auto_clicker_level,
        auto_clicker,
        auto_clicker_cost,
        super_auto_clicker_level,
        super_auto_clicker,
        super_auto_clicker_cost,
        hyper_auto_clicker_level,
        hyper_auto_clicker,
        hyper_auto_clicker_cost,
        reborn_count: state.reborn_count,
        click_multiplier: state.click_multiplier(),
        reborn_cost: state.reborn_cost(),
    }
}

/// Encode the full state as one flat JSON object.
pub fn serialize(state: &PlayerState) -> Result<String, serde_json::Error> {
    serde_json::to_string(&extract_save(state))
}

/// Where a decoded state came from.
#[derive(Clone, Debug, PartialEq)]
pub enum SaveSource {
    /// Written by this save format version.
    Current,
    /// Older (or unversioned) layout, migrated.
    Migrated { from: Option<u32> },
    /// Written by a newer build; known fields were kept.
    Newer { from: u32 },
    /// Not a JSON object; defaults were used.
    Unreadable,
}

/// Decode a blob into a state. Never fails.
pub fn deserialize(blob: &str) -> PlayerState {
    decode(blob).0
}

/// Decode a blob, also reporting which layout it was read as.
pub fn decode(blob: &str) -> (PlayerState, SaveSource) {
    let map = match serde_json::from_str::<Value>(blob) {
        Ok(Value::Object(map)) => map,
        _ => return (PlayerState::new(), SaveSource::Unreadable),
    };

    let version = map.get("saveVersion").and_then(read_count);
    let pre_rename =
        version.is_none() && (map.contains_key("autoGenLevel") || map.contains_key("autoGen"));

    let mut state = PlayerState::new();
    state.points = map.get("points").and_then(read_points).unwrap_or(0.0);
    state.reborn_count = map.get("rebornCount").and_then(read_count).unwrap_or(0);
    for &track in Track::all() {
        state.levels[track.index()] = read_level(&map, track, pre_rename);
    }

    let source = match version {
        Some(v) if v == SAVE_VERSION => SaveSource::Current,
        Some(v) if v > SAVE_VERSION => SaveSource::Newer { from: v },
        from => SaveSource::Migrated { from },
    };
    (state, source)
}

type Keys = &'static [&'static str];

/// Storage key chains `(level keys, owned keys)` for a track, newest first.
fn field_chain(track: Track, pre_rename: bool) -> (Keys, Keys) {
    match (track, pre_rename) {
        (Track::ClickPower, _) => (&["clickPowerLevel"], &["clickPower"]),
        (Track::SuperClickPower, _) => (&["superClickPowerLevel"], &["superClickPower"]),
        (Track::AutoClicker, false) => {
            (&["autoClickerLevel", "autoGenLevel"], &["autoClicker", "autoGen"])
        }
        (Track::AutoClicker, true) => (&["autoGenLevel"], &["autoGen"]),
        (Track::SuperAutoClicker, false) => (&["superAutoClickerLevel"], &["superAutoClicker"]),
        (Track::SuperAutoClicker, true) => (
            &["superAutoClickerLevel", "autoClickerLevel"],
            &["superAutoClicker", "autoClicker"],
        ),
        (Track::HyperAutoClicker, _) => (
            &["hyperAutoClickerLevel", "megaGenLevel"],
            &["hyperAutoClicker", "megaGen"],
        ),
    }
}

fn read_level(map: &Map<String, Value>, track: Track, pre_rename: bool) -> u32 {
    let (level_keys, owned_keys) = field_chain(track, pre_rename);
    if let Some(level) = level_keys.iter().find_map(|k| map.get(*k).and_then(read_count)) {
        return level;
    }
    owned_keys
        .iter()
        .find_map(|k| map.get(*k).and_then(read_count))
        .map(|owned| level_from_owned(track, owned as u64))
        .unwrap_or(0)
}

/// Invert `Track::owned_at`, rounding down.
fn level_from_owned(track: Track, owned: u64) -> u32 {
    let level = owned.saturating_sub(track.base_owned()) / track.owned_per_level();
    level.min(u32::MAX as u64) as u32
}

/// Non-negative integer counter. Accepts integral or fractional JSON numbers
/// (fractions are floored); rejects negatives and non-numbers.
fn read_count(v: &Value) -> Option<u32> {
    if let Some(n) = v.as_u64() {
        return Some(n.min(u32::MAX as u64) as u32);
    }
    let f = v.as_f64()?;
    if f.is_finite() && f >= 0.0 {
        Some(f.floor().min(u32::MAX as f64) as u32)
    } else {
        None
    }
}

fn read_points(v: &Value) -> Option<f64> {
    let f = v.as_f64()?;
    f.is_finite().then(|| f.max(0.0))
}

/// localStorage handle. Only available in the browser.
#[cfg(target_arch = "wasm32")]
fn get_storage() -> Option<web_sys::Storage> {
    web_sys::window()?.local_storage().ok()?
}

/// Write the state to localStorage. Failures are logged and ignored.
#[cfg(target_arch = "wasm32")]
pub fn save_game(state: &PlayerState) {
    let json = match serialize(state) {
        Ok(j) => j,
        Err(e) => {
            web_sys::console::warn_1(&format!("Reborn Clicker: save serialization failed: {e}").into());
            return;
        }
    };

    if let Some(storage) = get_storage() {
        if let Err(e) = storage.set_item(STORAGE_KEY, &json) {
            web_sys::console::warn_1(
                &format!("Reborn Clicker: localStorage write failed: {e:?}").into(),
            );
        }
    }
}

/// Read the state from localStorage, or start fresh when nothing is saved.
#[cfg(target_arch = "wasm32")]
pub fn load_game() -> PlayerState {
    let storage = match get_storage() {
        Some(s) => s,
        None => return PlayerState::new(),
    };

    let json = match storage.get_item(STORAGE_KEY) {
        Ok(Some(j)) => j,
        _ => return PlayerState::new(),
    };

    let (state, source) = decode(&json);
    match source {
        SaveSource::Current => {}
        SaveSource::Migrated { from } => {
            web_sys::console::log_1(
                &format!(
                    "Reborn Clicker: migrated save (saved={}, current={})",
                    from.map_or_else(|| "unversioned".to_string(), |v| v.to_string()),
                    SAVE_VERSION
                )
                .into(),
            );
        }
        SaveSource::Newer { from } => {
            web_sys::console::warn_1(
                &format!(
                    "Reborn Clicker: save is from a newer version (saved={from}, current={SAVE_VERSION}); unknown fields ignored"
                )
                .into(),
            );
        }
        SaveSource::Unreadable => {
            web_sys::console::warn_1(
                &"Reborn Clicker: unreadable save discarded, starting fresh".into(),
            );
            let _ = storage.remove_item(STORAGE_KEY);
        }
    }
    state
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clicker::logic;

    #[test]
    fn roundtrip_preserves_state() {
        let mut original = PlayerState::new();
        original.points = 12345.6;
        original.levels = [4, 2, 7, 1, 3];
        original.reborn_count = 2;

        let json = serialize(&original).unwrap();
        let (restored, source) = decode(&json);
        assert_eq!(restored, original);
        assert_eq!(source, SaveSource::Current);
    }

    #[test]
    fn serialized_blob_is_flat_and_complete() {
        let mut state = PlayerState::new();
        state.levels[Track::ClickPower.index()] = 1;
        state.reborn_count = 1;
        let json = serialize(&state).unwrap();
        let v: Value = serde_json::from_str(&json).unwrap();
        let map = v.as_object().unwrap();

        assert_eq!(map["saveVersion"], 1);
        assert_eq!(map["clickPowerLevel"], 1);
        assert_eq!(map["clickPower"], 2);
        assert_eq!(map["clickPowerCost"], 15.0);
        assert_eq!(map["hyperAutoClickerCost"], 500.0);
        assert_eq!(map["rebornCost"], 2_500_000.0);
        assert_eq!(map["clickMultiplier"], 1.5);
        assert!(map.values().all(|v| !v.is_object() && !v.is_array()));
    }

    #[test]
    fn legacy_auto_gen_level_loads_as_auto_clicker() {
        let (state, source) = decode(r#"{"autoGenLevel": 3}"#);
        assert_eq!(state.level(Track::AutoClicker), 3);
        assert_eq!(state.cost(Track::AutoClicker), Track::AutoClicker.cost_at(3));
        assert_eq!(state.cost(Track::AutoClicker), 168.0);
        assert_eq!(source, SaveSource::Migrated { from: None });
    }

    #[test]
    fn pre_rename_layout_shifts_auto_tracks() {
        let json = r#"{
            "points": 1234.5,
            "clickPower": 4, "clickPowerLevel": 3, "clickPowerCost": 33,
            "superClickPower": 5, "superClickPowerLevel": 1, "superClickPowerCost": 450,
            "autoGen": 2, "autoGenLevel": 2, "autoGenCost": 112,
            "autoClicker": 6, "autoClickerLevel": 6, "autoClickerCost": 1139,
            "megaGen": 1, "megaGenLevel": 1, "megaGenCost": 750
        }"#;
        let state = deserialize(json);
        assert!((state.points - 1234.5).abs() < 1e-9);
        assert_eq!(state.level(Track::ClickPower), 3);
        assert_eq!(state.level(Track::SuperClickPower), 1);
        assert_eq!(state.level(Track::AutoClicker), 2);
        assert_eq!(state.level(Track::SuperAutoClicker), 6);
        assert_eq!(state.level(Track::HyperAutoClicker), 1);
        assert_eq!(state.reborn_count, 0);
    }

    #[test]
    fn stored_derived_values_are_ignored() {
        let json = r#"{
            "saveVersion": 1,
            "clickPowerLevel": 2,
            "clickPower": 999,
            "clickPowerCost": 1,
            "rebornCount": 1,
            "clickMultiplier": 50.0,
            "rebornCost": 3
        }"#;
        let state = deserialize(json);
        assert_eq!(state.owned(Track::ClickPower), 3);
        assert_eq!(state.cost(Track::ClickPower), 22.0);
        assert!((state.click_multiplier() - 1.5).abs() < 1e-9);
        assert_eq!(state.reborn_cost(), 2_500_000.0);
    }

    #[test]
    fn level_falls_back_to_owned_count() {
        let state = deserialize(r#"{"clickPower": 6, "superClickPower": 10, "megaGen": 4}"#);
        assert_eq!(state.level(Track::ClickPower), 5);
        assert_eq!(state.level(Track::SuperClickPower), 2);
        assert_eq!(state.level(Track::HyperAutoClicker), 4);
    }

    #[test]
    fn bad_fields_degrade_individually() {
        let json = r#"{
            "saveVersion": 1,
            "points": -50,
            "clickPowerLevel": "three",
            "autoClickerLevel": -2,
            "superAutoClickerLevel": 2.7,
            "rebornCount": null
        }"#;
        let state = deserialize(json);
        assert!((state.points - 0.0).abs() < 1e-9);
        assert_eq!(state.level(Track::ClickPower), 0);
        assert_eq!(state.level(Track::AutoClicker), 0);
        assert_eq!(state.level(Track::SuperAutoClicker), 2);
        assert_eq!(state.reborn_count, 0);
    }

    #[test]
    fn unreadable_blob_gives_defaults() {
        for blob in ["", "not json", "[1,2,3]", "42", "null"] {
            let (state, source) = decode(blob);
            assert_eq!(state, PlayerState::new());
            assert_eq!(source, SaveSource::Unreadable);
        }
    }

    #[test]
    fn newer_version_keeps_known_fields() {
        let (state, source) =
            decode(r#"{"saveVersion": 9, "hyperAutoClickerLevel": 2, "futureThing": true}"#);
        assert_eq!(state.level(Track::HyperAutoClicker), 2);
        assert_eq!(source, SaveSource::Newer { from: 9 });
    }

    #[test]
    fn versioned_blob_does_not_use_pre_rename_layout() {
        let state = deserialize(r#"{"saveVersion": 1, "autoClickerLevel": 4, "autoGenLevel": 1}"#);
        assert_eq!(state.level(Track::AutoClicker), 4);
        assert_eq!(state.level(Track::SuperAutoClicker), 0);
    }

    #[test]
    fn maxed_counters_roundtrip_with_unbounded_costs() {
        let mut state = PlayerState::new();
        state.points = 1e20;
        state.levels[Track::HyperAutoClicker.index()] = u32::MAX;
        state.levels[Track::ClickPower.index()] = 110;
        let json = serialize(&state).unwrap();
        let v: Value = serde_json::from_str(&json).unwrap();
        // Past f64::MAX the price is infinite and JSON has no spelling for it
        assert!(v["hyperAutoClickerCost"].is_null());
        assert!(v["clickPowerCost"].as_f64().unwrap() > u64::MAX as f64);
        assert_eq!(deserialize(&json), state);
    }

    #[test]
    fn state_after_play_roundtrips() {
        let mut state = PlayerState::new();
        for _ in 0..200 {
            logic::click(&mut state);
        }
        let _ = logic::purchase(&mut state, Track::ClickPower);
        let _ = logic::purchase(&mut state, Track::AutoClicker);
        logic::tick(&mut state);
        assert_eq!(deserialize(&serialize(&state).unwrap()), state);
    }
}
