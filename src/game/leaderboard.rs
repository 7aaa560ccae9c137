//! Local leaderboard: a capped, score-sorted list of finished sessions,
//! persisted through an injected storage collaborator.
//!
//! Persistence is strictly best-effort. A write failure leaves the in-memory
//! list authoritative for the rest of the process; a malformed or missing
//! payload at load time yields an empty board. Neither is ever surfaced to the
//! caller as an error.

use serde::{Deserialize, Serialize};

use super::modes::GameMode;

/// Single fixed key the whole board is serialized under.
pub const STORAGE_KEY: &str = "shakemaster_scores";

/// The board keeps only the top entries by score.
pub const MAX_ENTRIES: usize = 100;

/// One finished session. Immutable once recorded.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScoreEntry {
    pub username: String,
    pub score: u64,
    pub mode: GameMode,
    /// Unix epoch milliseconds at finalization.
    pub date: u64,
}

/// Durable key-value backend for the serialized board.
///
/// `read` returns the previously stored payload, if any; `write` reports
/// success so callers can log degradation. A `false` is never an error, the
/// board simply continues in memory.
pub trait ScoreStorage {
    fn read(&self) -> Option<String>;
    fn write(&self, payload: &str) -> bool;
}

/// In-memory backend: the test double, and the degraded mode when the browser
/// exposes no usable `localStorage`.
#[derive(Default)]
pub struct MemoryStorage {
    payload: std::cell::RefCell<Option<String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        MemoryStorage::default()
    }

    pub fn preloaded(payload: &str) -> Self {
        MemoryStorage {
            payload: std::cell::RefCell::new(Some(payload.to_string())),
        }
    }
}

impl ScoreStorage for MemoryStorage {
    fn read(&self) -> Option<String> {
        self.payload.borrow().clone()
    }

    fn write(&self, payload: &str) -> bool {
        *self.payload.borrow_mut() = Some(payload.to_string());
        true
    }
}

/// Browser `localStorage` backend.
pub struct LocalStorage;

impl ScoreStorage for LocalStorage {
    fn read(&self) -> Option<String> {
        let storage = web_sys::window()?.local_storage().ok().flatten()?;
        storage.get_item(STORAGE_KEY).ok().flatten()
    }

    fn write(&self, payload: &str) -> bool {
        let Some(storage) = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
        else {
            return false;
        };
        storage.set_item(STORAGE_KEY, payload).is_ok()
    }
}

/// The leaderboard proper.
pub struct Leaderboard {
    entries: Vec<ScoreEntry>,
    storage: Box<dyn ScoreStorage>,
}

impl Leaderboard {
    /// Load the persisted board, or start empty when the payload is absent or
    /// malformed. The sorted/capped invariant is re-established on load in
    /// case the stored payload was edited by hand.
    pub fn load(storage: Box<dyn ScoreStorage>) -> Self {
        let entries = storage
            .read()
            .and_then(|payload| serde_json::from_str::<Vec<ScoreEntry>>(&payload).ok())
            .unwrap_or_default();
        let mut board = Leaderboard { entries, storage };
        board.restore_invariant();
        board
    }

    /// Record one finished session: insert, re-sort, cap, persist. Returns
    /// whether the persist succeeded so the caller can log degradation.
    pub fn record(&mut self, entry: ScoreEntry) -> bool {
        self.entries.push(entry);
        self.restore_invariant();
        match serde_json::to_string(&self.entries) {
            Ok(payload) => self.storage.write(&payload),
            Err(_) => false,
        }
    }

    /// Entries for display, freshly sorted descending by score, optionally
    /// restricted to one mode. Empty when nothing matches.
    pub fn list(&self, filter: Option<GameMode>) -> Vec<ScoreEntry> {
        let mut out: Vec<ScoreEntry> = self
            .entries
            .iter()
            .filter(|e| filter.is_none_or(|m| e.mode == m))
            .cloned()
            .collect();
        out.sort_by(|a, b| b.score.cmp(&a.score));
        out
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn restore_invariant(&mut self) {
        // Stable sort: equal scores keep insertion (recording) order.
        self.entries.sort_by(|a, b| b.score.cmp(&a.score));
        self.entries.truncate(MAX_ENTRIES);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(name: &str, score: u64, mode: GameMode) -> ScoreEntry {
        ScoreEntry {
            username: name.to_string(),
            score,
            mode,
            date: 1_700_000_000_000,
        }
    }

    fn empty_board() -> Leaderboard {
        Leaderboard::load(Box::new(MemoryStorage::new()))
    }

    #[test]
    fn absent_storage_loads_empty() {
        assert!(empty_board().is_empty());
    }

    #[test]
    fn malformed_storage_loads_empty() {
        for garbage in ["", "not json", "{\"username\":1}", "[{\"bad\":true}]"] {
            let board = Leaderboard::load(Box::new(MemoryStorage::preloaded(garbage)));
            assert!(board.is_empty(), "payload {garbage:?} should load empty");
        }
    }

    #[test]
    fn record_keeps_descending_order() {
        let mut board = empty_board();
        board.record(entry("a", 10, GameMode::OneMin));
        board.record(entry("b", 30, GameMode::OneMin));
        board.record(entry("c", 20, GameMode::ThreeMin));
        let scores: Vec<u64> = board.list(None).iter().map(|e| e.score).collect();
        assert_eq!(scores, vec![30, 20, 10]);
    }

    #[test]
    fn equal_scores_keep_recording_order() {
        let mut board = empty_board();
        board.record(entry("first", 50, GameMode::OneMin));
        board.record(entry("second", 50, GameMode::OneMin));
        let names: Vec<String> = board
            .list(None)
            .iter()
            .map(|e| e.username.clone())
            .collect();
        assert_eq!(names, vec!["first", "second"]);
    }

    #[test]
    fn board_caps_at_one_hundred_entries() {
        let mut board = empty_board();
        for score in 1..=101 {
            board.record(entry("p", score, GameMode::FiveMin));
        }
        let listed = board.list(None);
        assert_eq!(listed.len(), MAX_ENTRIES);
        assert_eq!(listed.first().unwrap().score, 101);
        // The lowest score (1) was evicted.
        assert_eq!(listed.last().unwrap().score, 2);
    }

    #[test]
    fn mode_filter_selects_only_matching_entries() {
        let mut board = empty_board();
        board.record(entry("a", 5, GameMode::OneMin));
        board.record(entry("b", 9, GameMode::Infinite));
        board.record(entry("c", 7, GameMode::OneMin));
        let one_min = board.list(Some(GameMode::OneMin));
        assert_eq!(one_min.len(), 2);
        assert!(one_min.iter().all(|e| e.mode == GameMode::OneMin));
        assert!(board.list(Some(GameMode::SevenMin)).is_empty());
    }

    #[test]
    fn list_is_idempotent_between_records() {
        let mut board = empty_board();
        board.record(entry("a", 12, GameMode::OneMin));
        board.record(entry("b", 3, GameMode::ThreeMin));
        assert_eq!(board.list(None), board.list(None));
    }

    #[test]
    fn recorded_entries_survive_reload() {
        let payload;
        {
            let mut board = empty_board();
            board.record(entry("keeper", 42, GameMode::SevenMin));
            payload = serde_json::to_string(&board.list(None)).unwrap();
        }
        let board = Leaderboard::load(Box::new(MemoryStorage::preloaded(&payload)));
        let listed = board.list(None);
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].username, "keeper");
        assert_eq!(listed[0].score, 42);
        assert_eq!(listed[0].mode, GameMode::SevenMin);
    }

    #[test]
    fn tampered_payload_is_recapped_on_load() {
        let oversized: Vec<ScoreEntry> = (0..150)
            .map(|i| entry("x", i as u64, GameMode::OneMin))
            .collect();
        let payload = serde_json::to_string(&oversized).unwrap();
        let board = Leaderboard::load(Box::new(MemoryStorage::preloaded(&payload)));
        assert_eq!(board.len(), MAX_ENTRIES);
        let listed = board.list(None);
        assert!(listed.windows(2).all(|w| w[0].score >= w[1].score));
    }

    #[test]
    fn stored_payload_uses_mode_labels() {
        let storage = MemoryStorage::new();
        let payload_probe = {
            let mut board = Leaderboard::load(Box::new(MemoryStorage::new()));
            board.record(entry("a", 1, GameMode::Infinite));
            serde_json::to_string(&board.list(None)).unwrap()
        };
        assert!(payload_probe.contains("\"∞\""));
        // And the same shape round-trips through a fresh board.
        storage.write(&payload_probe);
        let board = Leaderboard::load(Box::new(storage));
        assert_eq!(board.list(None)[0].mode, GameMode::Infinite);
    }
}
