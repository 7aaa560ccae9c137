//! Per-session play state: score, jar fill, and the embedded countdown.

use super::modes::GameMode;
use super::shake::ShakeEvent;
use super::timer::SessionTimer;

/// Jar fill gained per counted shake, in percent.
const FILL_STEP: f64 = 0.5;

/// The jar is full at 100%; fill saturates there and never decreases.
pub const FILL_MAX: f64 = 100.0;

/// Points per 100 units of shake magnitude.
const SCORE_DIVISOR: f64 = 100.0;

/// State of the one active play session. Exactly one exists at a time, owned
/// by the controller while the view is `Playing` (and read back on `Result`).
#[derive(Debug)]
pub struct SessionState {
    pub mode: GameMode,
    pub score: u64,
    pub fill_level: f64,
    pub timer: SessionTimer,
}

impl SessionState {
    pub fn new(mode: GameMode) -> Self {
        SessionState {
            mode,
            score: 0,
            fill_level: 0.0,
            timer: SessionTimer::start(mode.seconds()),
        }
    }

    pub fn time_left_secs(&self) -> u32 {
        self.timer.remaining_secs()
    }

    pub fn is_active(&self) -> bool {
        self.timer.is_running()
    }

    /// Fold one shake into the session: `floor(magnitude / 100)` points and a
    /// fixed fill increment, saturating at the jar rim. Score and fill move
    /// together, in one step per event.
    pub fn apply_shake(&mut self, event: &ShakeEvent) {
        self.score += (event.magnitude / SCORE_DIVISOR).floor() as u64;
        self.fill_level = (self.fill_level + FILL_STEP).min(FILL_MAX);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_session_starts_empty_and_running() {
        let s = SessionState::new(GameMode::ThreeMin);
        assert_eq!(s.score, 0);
        assert_eq!(s.fill_level, 0.0);
        assert_eq!(s.time_left_secs(), 180);
        assert!(s.is_active());
    }

    #[test]
    fn shake_score_is_floor_of_magnitude_over_hundred() {
        let mut s = SessionState::new(GameMode::OneMin);
        s.apply_shake(&ShakeEvent { magnitude: 850.0 });
        assert_eq!(s.score, 8);
        s.apply_shake(&ShakeEvent { magnitude: 899.999 });
        assert_eq!(s.score, 16);
        s.apply_shake(&ShakeEvent { magnitude: 2304.0 });
        assert_eq!(s.score, 39);
    }

    #[test]
    fn fill_grows_half_percent_per_shake_and_saturates() {
        let mut s = SessionState::new(GameMode::Infinite);
        for _ in 0..5 {
            s.apply_shake(&ShakeEvent { magnitude: 850.0 });
        }
        assert!((s.fill_level - 2.5).abs() < 1e-9);
        for _ in 0..500 {
            s.apply_shake(&ShakeEvent { magnitude: 850.0 });
        }
        assert_eq!(s.fill_level, FILL_MAX);
    }

    #[test]
    fn fill_is_monotonically_non_decreasing() {
        let mut s = SessionState::new(GameMode::FiveMin);
        let mut previous = s.fill_level;
        for i in 0..300 {
            s.apply_shake(&ShakeEvent {
                magnitude: 801.0 + i as f64,
            });
            assert!(s.fill_level >= previous);
            assert!(s.fill_level <= FILL_MAX);
            previous = s.fill_level;
        }
    }

    #[test]
    fn score_keeps_growing_past_full_jar() {
        let mut s = SessionState::new(GameMode::Infinite);
        for _ in 0..250 {
            s.apply_shake(&ShakeEvent { magnitude: 1000.0 });
        }
        assert_eq!(s.fill_level, FILL_MAX);
        let before = s.score;
        s.apply_shake(&ShakeEvent { magnitude: 1000.0 });
        assert_eq!(s.score, before + 10);
    }
}
