//! DOM projection of the engine.
//!
//! Expected page skeleton: a `#game-grid` container (created if missing),
//! `#score`, `#combo`, `#time`, `#final-score`, `#high-score` text nodes and
//! one `.screen` element per [`Screen`] id (`mainMenu`, `gameScreen`,
//! `pauseScreen`, `endScreen`). Missing elements are skipped.

use log::debug;
use wasm_bindgen::JsValue;
use web_sys::{Document, Element};

use crate::game::targets::TargetKind;
use crate::host::{Renderer, Screen};

pub const GRID_ID: &str = "game-grid";
const SCREENS: [Screen; 4] = [Screen::MainMenu, Screen::Game, Screen::Pause, Screen::End];

pub struct DomRenderer {
    document: Document,
    grid: Element,
    // `.mole` element inside each hole, indexed by slot
    moles: Vec<Element>,
}

impl DomRenderer {
    pub fn attach(document: Document) -> Result<Self, JsValue> {
        let grid = match document.get_element_by_id(GRID_ID) {
            Some(el) => el,
            None => {
                let el = document.create_element("div")?;
                el.set_id(GRID_ID);
                let body = document
                    .body()
                    .ok_or_else(|| JsValue::from_str("no body"))?;
                body.append_child(&el)?;
                el
            }
        };
        Ok(Self {
            document,
            grid,
            moles: Vec::new(),
        })
    }

    pub fn grid(&self) -> &Element {
        &self.grid
    }

    fn build_hole(&self, index: usize) -> Result<Element, JsValue> {
        let hole = self.document.create_element("div")?;
        hole.set_class_name("mole-hole");
        hole.set_attribute("data-index", &index.to_string())?;
        let mole = self.document.create_element("div")?;
        mole.set_class_name("mole");
        hole.append_child(&mole)?;
        self.grid.append_child(&hole)?;
        Ok(mole)
    }

    fn set_text(&self, id: &str, text: &str) {
        if let Some(el) = self.document.get_element_by_id(id) {
            el.set_text_content(Some(text));
        }
    }

    fn mole(&self, slot: usize) -> Option<&Element> {
        self.moles.get(slot)
    }
}

impl Renderer for DomRenderer {
    fn create_grid(&mut self, size: u8) {
        self.grid.set_inner_html("");
        self.grid
            .set_attribute(
                "style",
                &format!("display:grid; grid-template-columns:repeat({size}, 1fr);"),
            )
            .ok();
        let holes = size as usize * size as usize;
        self.moles = (0..holes)
            .filter_map(|i| match self.build_hole(i) {
                Ok(mole) => Some(mole),
                Err(err) => {
                    debug!("hole {i} not created: {err:?}");
                    None
                }
            })
            .collect();
    }

    fn show_target(&mut self, slot: usize, kind: TargetKind) {
        if let Some(el) = self.mole(slot) {
            el.set_class_name(&format!("mole {} up", kind.as_str()));
        }
    }

    fn hide_target(&mut self, slot: usize) {
        if let Some(el) = self.mole(slot) {
            el.set_class_name("mole");
        }
    }

    fn show_hit_feedback(&mut self, slot: usize) {
        if let Some(el) = self.mole(slot) {
            let class = el.class_name();
            el.set_class_name(&format!("{class} hit"));
        }
    }

    fn update_score(&mut self, score: u32) {
        self.set_text("score", &score.to_string());
    }

    fn update_combo(&mut self, combo: u32) {
        self.set_text("combo", &combo.to_string());
    }

    fn update_time(&mut self, secs: u32) {
        self.set_text("time", &secs.to_string());
    }

    fn show_end_screen(&mut self, final_score: u32, high_score: u32) {
        self.set_text("final-score", &final_score.to_string());
        self.set_text("high-score", &high_score.to_string());
        self.show_screen(Screen::End);
    }

    fn show_screen(&mut self, screen: Screen) {
        for s in SCREENS {
            if let Some(el) = self.document.get_element_by_id(s.as_str()) {
                el.set_class_name(if s == screen { "screen active" } else { "screen" });
            }
        }
    }
}
