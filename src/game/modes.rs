//! Game modes and the shared time display helper.

use serde::{Deserialize, Serialize};

/// Sentinel duration for the infinite mode. Large enough to never expire in
/// practice; such sessions only end on manual stop.
pub const INFINITE_SENTINEL_SECS: u32 = 999_999;

/// Remaining times above this render as the infinity glyph instead of M:SS.
const INFINITE_DISPLAY_CUTOFF_SECS: u32 = 9_999;

/// Selectable session modes. Serialized as the short display label so stored
/// leaderboard payloads stay compatible with what the app has always written.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameMode {
    #[serde(rename = "1m")]
    OneMin,
    #[serde(rename = "3m")]
    ThreeMin,
    #[serde(rename = "5m")]
    FiveMin,
    #[serde(rename = "7m")]
    SevenMin,
    #[serde(rename = "∞")]
    Infinite,
}

impl GameMode {
    pub const ALL: [GameMode; 5] = [
        GameMode::OneMin,
        GameMode::ThreeMin,
        GameMode::FiveMin,
        GameMode::SevenMin,
        GameMode::Infinite,
    ];

    /// Session length in seconds.
    pub fn seconds(self) -> u32 {
        match self {
            GameMode::OneMin => 60,
            GameMode::ThreeMin => 180,
            GameMode::FiveMin => 300,
            GameMode::SevenMin => 420,
            GameMode::Infinite => INFINITE_SENTINEL_SECS,
        }
    }

    /// Short label used on buttons, in the leaderboard, and in storage.
    pub fn label(self) -> &'static str {
        match self {
            GameMode::OneMin => "1m",
            GameMode::ThreeMin => "3m",
            GameMode::FiveMin => "5m",
            GameMode::SevenMin => "7m",
            GameMode::Infinite => "∞",
        }
    }
}

/// Format remaining seconds as `M:SS`; infinite-mode remainders render as `∞`.
pub fn format_time(seconds: u32) -> String {
    if seconds > INFINITE_DISPLAY_CUTOFF_SECS {
        return "∞".to_string();
    }
    format!("{}:{:02}", seconds / 60, seconds % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timed_modes_have_expected_durations() {
        assert_eq!(GameMode::OneMin.seconds(), 60);
        assert_eq!(GameMode::ThreeMin.seconds(), 180);
        assert_eq!(GameMode::FiveMin.seconds(), 300);
        assert_eq!(GameMode::SevenMin.seconds(), 420);
    }

    #[test]
    fn infinite_mode_uses_sentinel() {
        assert_eq!(GameMode::Infinite.seconds(), INFINITE_SENTINEL_SECS);
        assert!(GameMode::Infinite.seconds() > INFINITE_DISPLAY_CUTOFF_SECS);
    }

    #[test]
    fn labels_are_unique() {
        use std::collections::HashSet;
        let labels: HashSet<&str> = GameMode::ALL.iter().map(|m| m.label()).collect();
        assert_eq!(labels.len(), GameMode::ALL.len());
    }

    #[test]
    fn serde_uses_display_labels() {
        for mode in GameMode::ALL {
            let json = serde_json::to_string(&mode).unwrap();
            assert_eq!(json, format!("\"{}\"", mode.label()));
            let back: GameMode = serde_json::from_str(&json).unwrap();
            assert_eq!(back, mode);
        }
    }

    #[test]
    fn format_time_renders_minutes_and_seconds() {
        assert_eq!(format_time(0), "0:00");
        assert_eq!(format_time(9), "0:09");
        assert_eq!(format_time(60), "1:00");
        assert_eq!(format_time(185), "3:05");
    }

    #[test]
    fn format_time_renders_infinity_above_cutoff() {
        assert_eq!(format_time(INFINITE_SENTINEL_SECS), "∞");
        assert_eq!(format_time(10_000), "∞");
        assert_eq!(format_time(9_999), "166:39");
    }
}
