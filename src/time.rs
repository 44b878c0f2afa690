//! Fixed-timestep game clock using an accumulator pattern.
//!
//! `draw_web()` calls at ~60fps with variable delta. GameTime converts
//! this into a fixed number of discrete ticks per second, and `Interval`
//! divides those ticks into slower periodic tasks (engine tick, autosave).

pub struct GameTime {
    /// Milliseconds per tick (e.g. 100ms = 10 ticks/sec)
    ms_per_tick: f64,
    /// Accumulated milliseconds not yet consumed as ticks
    accumulator: f64,
    /// Timestamp of the last update (ms), None if first frame
    last_timestamp: Option<f64>,
}

impl GameTime {
    /// `ticks_per_sec`: how many clock ticks per real-time second (e.g. 10).
    pub fn new(ticks_per_sec: u32) -> Self {
        Self {
            ms_per_tick: 1000.0 / ticks_per_sec as f64,
            accumulator: 0.0,
            last_timestamp: None,
        }
    }

    /// Feed wall-clock timestamp (from `performance.now()`).
    /// Returns the number of discrete ticks to process this frame.
    pub fn update(&mut self, now_ms: f64) -> u32 {
        let delta = match self.last_timestamp {
            // Clamp to avoid spiral-of-death if tab was backgrounded
            Some(prev) => (now_ms - prev).clamp(0.0, 500.0),
            None => 0.0,
        };
        self.last_timestamp = Some(now_ms);

        self.accumulator += delta;
        let ticks = (self.accumulator / self.ms_per_tick) as u32;
        self.accumulator -= ticks as f64 * self.ms_per_tick;
        ticks
    }
}

/// Fires once every `period` clock ticks.
pub struct Interval {
    period: u32,
    elapsed: u32,
}

impl Interval {
    pub fn new(period: u32) -> Self {
        Self {
            period: period.max(1),
            elapsed: 0,
        }
    }

    /// Advance by `ticks`; returns how many times the interval fired.
    pub fn advance(&mut self, ticks: u32) -> u32 {
        let total = self.elapsed as u64 + ticks as u64;
        let fired = total / self.period as u64;
        self.elapsed = (total % self.period as u64) as u32;
        fired as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_frame_returns_zero_ticks() {
        let mut gt = GameTime::new(10);
        assert_eq!(gt.update(0.0), 0);
    }

    #[test]
    fn multiple_ticks_accumulated() {
        let mut gt = GameTime::new(10);
        gt.update(0.0);
        assert_eq!(gt.update(350.0), 3); // 350ms = 3 ticks + 50ms remainder
        assert_eq!(gt.update(400.0), 1); // 50ms + 50ms
    }

    #[test]
    fn clamp_large_delta() {
        let mut gt = GameTime::new(10);
        gt.update(0.0);
        // Backgrounded tab: 10 s gap clamped to 500ms
        assert_eq!(gt.update(10_000.0), 5);
    }

    #[test]
    fn backwards_timestamp_is_ignored() {
        let mut gt = GameTime::new(10);
        gt.update(1_000.0);
        assert_eq!(gt.update(500.0), 0);
        assert_eq!(gt.update(600.0), 1);
    }

    #[test]
    fn steady_60fps() {
        let mut gt = GameTime::new(10);
        gt.update(0.0);
        let mut total = 0u32;
        for i in 1..=60 {
            total += gt.update(i as f64 * 16.667);
        }
        assert!((9..=11).contains(&total), "expected ~10 ticks, got {}", total);
    }

    #[test]
    fn interval_fires_on_period() {
        let mut iv = Interval::new(10);
        assert_eq!(iv.advance(9), 0);
        assert_eq!(iv.advance(1), 1);
        assert_eq!(iv.advance(25), 2);
        assert_eq!(iv.advance(5), 1);
    }

    #[test]
    fn interval_zero_period_acts_as_one() {
        let mut iv = Interval::new(0);
        assert_eq!(iv.advance(3), 3);
    }

    #[test]
    fn independent_intervals() {
        let mut second = Interval::new(10);
        let mut autosave = Interval::new(100);
        let mut seconds = 0;
        let mut saves = 0;
        for _ in 0..250 {
            seconds += second.advance(1);
            saves += autosave.advance(1);
        }
        assert_eq!(seconds, 25);
        assert_eq!(saves, 2);
    }
}
