//! Browser bindings.
//!
//! `WhackAMole` owns the engine behind an `Rc<RefCell<_>>` shared with two
//! closures: an animation-frame loop that advances virtual time to
//! `performance.now()`, and a delegated pointer listener on the grid that turns
//! clicks into `attempt_hit` calls. JS drives menus through the exported
//! methods.
//!
//! ```javascript
//! import init, { WhackAMole } from './whack_a_mole.js';
//! await init();
//! const game = new WhackAMole();
//! game.set_difficulty('hard');
//! game.start();
//! ```

pub mod audio;
pub mod dom;
pub mod storage;

use std::cell::RefCell;
use std::rc::Rc;

use log::warn;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Element, Event, window};

use crate::game::Game;
use crate::game::config::{Difficulty, Mode, Settings};
use crate::host::{KeyValueStore, MemoryStore, Renderer, Screen};
use audio::WebAudio;
use dom::DomRenderer;
use storage::LocalStore;

const SOUND_DIR: &str = "sounds";

type WebGame = Game<DomRenderer, WebAudio, Box<dyn KeyValueStore>>;

type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>;

#[wasm_bindgen]
pub struct WhackAMole {
    game: Rc<RefCell<WebGame>>,
}

#[wasm_bindgen]
impl WhackAMole {
    /// Boot with the built-in difficulty table.
    #[wasm_bindgen(constructor)]
    pub fn new() -> Result<WhackAMole, JsValue> {
        Self::boot(Settings::default())
    }

    /// Boot with a JSON difficulty table (`{"easy": {...}, "medium": ..., "hard": ...}`).
    pub fn with_settings(json: &str) -> Result<WhackAMole, JsValue> {
        let settings = Settings::from_json(json).map_err(to_js)?;
        Self::boot(settings)
    }

    pub fn set_mode(&self, mode: &str) -> Result<(), JsValue> {
        let mode: Mode = mode.parse().map_err(to_js)?;
        self.game.borrow_mut().set_mode(mode);
        Ok(())
    }

    pub fn set_difficulty(&self, difficulty: &str) -> Result<(), JsValue> {
        let difficulty: Difficulty = difficulty.parse().map_err(to_js)?;
        self.game.borrow_mut().set_difficulty(difficulty);
        Ok(())
    }

    pub fn start(&self) {
        self.with_game(|g| g.start());
    }

    pub fn restart(&self) {
        self.with_game(|g| g.restart());
    }

    pub fn pause(&self) {
        self.with_game(|g| g.pause());
    }

    pub fn resume(&self) {
        self.with_game(|g| g.resume());
    }

    pub fn end(&self) {
        self.with_game(|g| g.end());
    }

    /// Attempt a hit on `slot` (for hosts that route input themselves).
    pub fn hit(&self, slot: usize) {
        self.with_game(|g| g.attempt_hit(slot));
    }

    #[wasm_bindgen(getter)]
    pub fn score(&self) -> u32 {
        self.game.borrow().state().score
    }

    #[wasm_bindgen(getter)]
    pub fn combo(&self) -> u32 {
        self.game.borrow().state().combo
    }

    #[wasm_bindgen(getter)]
    pub fn time(&self) -> u32 {
        self.game.borrow().state().time
    }

    #[wasm_bindgen(getter)]
    pub fn missed(&self) -> u32 {
        self.game.borrow().state().missed
    }

    #[wasm_bindgen(getter)]
    pub fn running(&self) -> bool {
        self.game.borrow().state().running
    }

    #[wasm_bindgen(getter)]
    pub fn paused(&self) -> bool {
        self.game.borrow().state().paused
    }

    #[wasm_bindgen(getter)]
    pub fn freeze_active(&self) -> bool {
        self.game.borrow().state().freeze_active
    }

    pub fn high_score(&self, mode: &str, difficulty: &str) -> Result<u32, JsValue> {
        let mode: Mode = mode.parse().map_err(to_js)?;
        let difficulty: Difficulty = difficulty.parse().map_err(to_js)?;
        Ok(self.game.borrow().high_score(mode, difficulty))
    }

    /// Top-10 leaderboard as a JSON array.
    pub fn leaderboard_json(&self) -> String {
        self.game.borrow().scores().to_json()
    }
}

impl WhackAMole {
    fn boot(settings: Settings) -> Result<WhackAMole, JsValue> {
        let document = window()
            .and_then(|w| w.document())
            .ok_or_else(|| JsValue::from_str("no document"))?;
        let renderer = DomRenderer::attach(document)?;
        let grid = renderer.grid().clone();
        let store: Box<dyn KeyValueStore> = match LocalStore::open() {
            Ok(store) => Box::new(store),
            Err(err) => {
                warn!("{err}; scores will not survive a reload");
                Box::new(MemoryStore::new())
            }
        };

        let mut game = Game::new(
            settings,
            renderer,
            WebAudio::load(SOUND_DIR),
            store,
            entropy_seed(),
        );
        game.advance(performance_now());
        game.renderer_mut().show_screen(Screen::MainMenu);

        let game = Rc::new(RefCell::new(game));
        attach_hit_listener(game.clone(), &grid)?;
        start_frame_loop(game.clone());
        Ok(WhackAMole { game })
    }

    fn with_game(&self, f: impl FnOnce(&mut WebGame)) {
        let mut game = self.game.borrow_mut();
        game.advance(performance_now());
        f(&mut game);
    }
}

fn to_js(err: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&err.to_string())
}

fn performance_now() -> f64 {
    window()
        .and_then(|w| w.performance())
        .map(|p| p.now())
        .unwrap_or(0.0)
}

fn entropy_seed() -> u64 {
    #[cfg(feature = "rng")]
    {
        let mut buf = [0u8; 8];
        if getrandom::getrandom(&mut buf).is_ok() {
            return u64::from_le_bytes(buf);
        }
    }
    performance_now().to_bits()
}

/// Map a pointer event inside the grid to the slot index of its hole.
fn slot_from_event(evt: &Event) -> Option<usize> {
    let target: Element = evt.target()?.dyn_into().ok()?;
    let hole = target.closest(".mole-hole").ok().flatten()?;
    hole.get_attribute("data-index")?.parse().ok()
}

fn attach_hit_listener(game: Rc<RefCell<WebGame>>, grid: &Element) -> Result<(), JsValue> {
    let closure = Closure::wrap(Box::new(move |evt: Event| {
        let Some(slot) = slot_from_event(&evt) else {
            return;
        };
        if let Ok(mut game) = game.try_borrow_mut() {
            game.advance(performance_now());
            game.attempt_hit(slot);
        }
    }) as Box<dyn FnMut(_)>);
    grid.add_event_listener_with_callback("mousedown", closure.as_ref().unchecked_ref())?;
    closure.forget();
    Ok(())
}

fn start_frame_loop(game: Rc<RefCell<WebGame>>) {
    let f: FrameCallback = Rc::new(RefCell::new(None));
    let g = f.clone();
    *g.borrow_mut() = Some(Closure::wrap(Box::new(move |_ts: f64| {
        if let Ok(mut game) = game.try_borrow_mut() {
            game.advance(performance_now());
        }
        request_frame(&f);
    }) as Box<dyn FnMut(f64)>));
    request_frame(&g);
}

fn request_frame(f: &FrameCallback) {
    if let (Some(w), Some(cb)) = (window(), f.borrow().as_ref()) {
        let _ = w.request_animation_frame(cb.as_ref().unchecked_ref());
    }
}
