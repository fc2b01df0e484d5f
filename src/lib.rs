//! Whack-a-Mole core crate.
//!
//! The engine in [`game`] is plain Rust and runs natively under `cargo test`;
//! rendering, audio and storage are injected through the traits in [`host`].
//! The [`web`] module wires the engine to the DOM and exposes the
//! `WhackAMole` handle to JavaScript.

use wasm_bindgen::prelude::*;

pub mod error;
pub mod game;
pub mod host;
pub mod leaderboard;
pub mod web;

pub use error::{ConfigError, ParseError, StoreError};
pub use game::config::{Difficulty, GameConfig, Mode, Settings};
pub use game::targets::{ActiveTargets, TargetKind};
pub use game::{Game, GameState};
pub use host::{AudioCues, Cue, KeyValueStore, MemoryStore, Renderer, Screen};
pub use leaderboard::{LEADERBOARD_KEY, LeaderboardEntry, ScoreStore};
pub use web::WhackAMole;

// Optional small allocator for size (feature gated)
#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

#[wasm_bindgen(start)]
pub fn wasm_start() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
    // a second start in the same page keeps the first logger
    let _ = console_log::init_with_level(log::Level::Info);
}
