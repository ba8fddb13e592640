//! Target Rush core crate.
//!
//! Targets pop up at random spots and sizes; the player clicks them for points
//! before the round clock runs out. Smaller targets score more, streaks of hits
//! earn a bonus, and the best five rounds are kept in a local high score table.
//!
//! All game logic lives in [`engine::RoundEngine`], which talks to its host only
//! through the traits in [`capability`]. The browser host is in [`web`]; the
//! headless [`clock::ManualClock`] and [`highscores::MemoryStore`] drive the
//! same engine natively.

use wasm_bindgen::prelude::*;

pub mod capability;
pub mod clock;
pub mod config;
pub mod engine;
pub mod error;
pub mod highscores;
pub mod rng;
pub mod web;

pub use capability::{Clock, Display, InputEvent, RandomSource, Store};
pub use config::{GameConfig, ResetBehavior};
pub use engine::{HitOutcome, RoundEngine, RoundState, RoundSummary, Target, TargetId};
pub use error::{GameError, GameResult};
pub use highscores::{HighScoreTable, ScoreEntry};

// Optional small allocator for size (feature gated)
#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

#[wasm_bindgen(start)]
pub fn wasm_start() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
    let level = if cfg!(debug_assertions) { log::Level::Debug } else { log::Level::Info };
    let _ = console_log::init_with_level(level);
}
