//! Collaborators the engine talks to. Rendering, audio and storage live on the
//! host side (the browser in production, recording fakes in tests); the engine
//! only projects its state through these calls and never reads back from them.

use std::collections::HashMap;

use crate::error::StoreError;
use crate::game::targets::TargetKind;

/// Audio cues requested by the engine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Cue {
    GameStart,
    Hit,
    Bomb,
    Freeze,
}

impl Cue {
    pub const ALL: [Cue; 4] = [Cue::GameStart, Cue::Hit, Cue::Bomb, Cue::Freeze];

    pub fn as_str(self) -> &'static str {
        match self {
            Cue::GameStart => "gameStart",
            Cue::Hit => "hit",
            Cue::Bomb => "bomb",
            Cue::Freeze => "freeze",
        }
    }
}

/// Top-level screens.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Screen {
    MainMenu,
    Game,
    Pause,
    End,
}

impl Screen {
    pub fn as_str(self) -> &'static str {
        match self {
            Screen::MainMenu => "mainMenu",
            Screen::Game => "gameScreen",
            Screen::Pause => "pauseScreen",
            Screen::End => "endScreen",
        }
    }
}

/// Visual projection of engine state. Calls are fire-and-forget.
pub trait Renderer {
    /// Build a `size` x `size` grid of empty holes, replacing any previous one.
    fn create_grid(&mut self, size: u8);
    fn show_target(&mut self, slot: usize, kind: TargetKind);
    fn hide_target(&mut self, slot: usize);
    fn show_hit_feedback(&mut self, slot: usize);
    fn update_score(&mut self, score: u32);
    fn update_combo(&mut self, combo: u32);
    fn update_time(&mut self, secs: u32);
    fn show_end_screen(&mut self, final_score: u32, high_score: u32);
    fn show_screen(&mut self, screen: Screen);
}

/// Sound effects. Failures are the player's problem, never the engine's.
pub trait AudioCues {
    fn play(&mut self, cue: Cue);
}

/// Durable string key-value storage.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError>;
}

/// Process-local store; used by tests and when browser storage is unavailable.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    items: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.items.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.items.insert(key.to_owned(), value.to_owned());
        Ok(())
    }
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Box<S> {
    fn get(&self, key: &str) -> Option<String> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        (**self).set(key, value)
    }
}
