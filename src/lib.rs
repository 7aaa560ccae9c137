//! Shake Master core crate.
//!
//! A motion-controlled jar-filling mini-game for the browser: the player
//! shakes the device, qualifying shakes add score and fill the jar, a
//! countdown ends the session, and results land on a local leaderboard with a
//! generated flavor message. `start_game()` is the single JS entrypoint; the
//! gameplay logic (shake detection, countdown, scoring, leaderboard) is plain
//! Rust and runs host-side under `cargo test`.

use wasm_bindgen::prelude::*;

mod game;

pub use game::flavor::{FALLBACK_ON_EMPTY, FALLBACK_ON_ERROR};
pub use game::leaderboard::{
    Leaderboard, MAX_ENTRIES, MemoryStorage, STORAGE_KEY, ScoreEntry, ScoreStorage,
};
pub use game::modes::{GameMode, INFINITE_SENTINEL_SECS, format_time};
pub use game::session::SessionState;
pub use game::shake::{Sample, ShakeDetector, ShakeEvent};
pub use game::timer::{SessionTimer, Tick, TimerPhase};

// Optional small allocator for size (feature gated)
#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

#[wasm_bindgen(start)]
pub fn wasm_start() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Build the screens and hand control to the session state machine.
#[wasm_bindgen]
pub fn start_game() -> Result<(), JsValue> {
    game::start_app()
}
