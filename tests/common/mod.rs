// Recording collaborators shared by the native integration tests.
#![allow(dead_code)]

use whack_a_mole::{
    AudioCues, Cue, Difficulty, Game, GameConfig, MemoryStore, Mode, Renderer, Screen, Settings,
    TargetKind,
};

#[derive(Clone, Debug, PartialEq)]
pub enum Draw {
    Grid(u8),
    Show(usize, TargetKind),
    Hide(usize),
    HitFeedback(usize),
    Score(u32),
    Combo(u32),
    Time(u32),
    EndScreen { score: u32, high: u32 },
    Screen(Screen),
}

#[derive(Default)]
pub struct RecordingRenderer {
    pub draws: Vec<Draw>,
}

impl RecordingRenderer {
    pub fn end_screens(&self) -> Vec<(u32, u32)> {
        self.draws
            .iter()
            .filter_map(|d| match d {
                Draw::EndScreen { score, high } => Some((*score, *high)),
                _ => None,
            })
            .collect()
    }
}

impl Renderer for RecordingRenderer {
    fn create_grid(&mut self, size: u8) {
        self.draws.push(Draw::Grid(size));
    }
    fn show_target(&mut self, slot: usize, kind: TargetKind) {
        self.draws.push(Draw::Show(slot, kind));
    }
    fn hide_target(&mut self, slot: usize) {
        self.draws.push(Draw::Hide(slot));
    }
    fn show_hit_feedback(&mut self, slot: usize) {
        self.draws.push(Draw::HitFeedback(slot));
    }
    fn update_score(&mut self, score: u32) {
        self.draws.push(Draw::Score(score));
    }
    fn update_combo(&mut self, combo: u32) {
        self.draws.push(Draw::Combo(combo));
    }
    fn update_time(&mut self, secs: u32) {
        self.draws.push(Draw::Time(secs));
    }
    fn show_end_screen(&mut self, final_score: u32, high_score: u32) {
        self.draws.push(Draw::EndScreen {
            score: final_score,
            high: high_score,
        });
    }
    fn show_screen(&mut self, screen: Screen) {
        self.draws.push(Draw::Screen(screen));
    }
}

#[derive(Default)]
pub struct RecordingAudio {
    pub cues: Vec<Cue>,
}

impl AudioCues for RecordingAudio {
    fn play(&mut self, cue: Cue) {
        self.cues.push(cue);
    }
}

pub type TestGame = Game<RecordingRenderer, RecordingAudio, MemoryStore>;

pub fn game_with(settings: Settings, mode: Mode, difficulty: Difficulty) -> TestGame {
    let mut game = Game::new(
        settings,
        RecordingRenderer::default(),
        RecordingAudio::default(),
        MemoryStore::new(),
        42,
    );
    game.set_mode(mode);
    game.set_difficulty(difficulty);
    game
}

/// Settings where every spawn on `difficulty` is `kind`.
pub fn only(kind: TargetKind, difficulty: Difficulty) -> Settings {
    let base = *Settings::default().get(difficulty);
    let (bomb, freeze) = match kind {
        TargetKind::Mole => (0.0, 0.0),
        TargetKind::Bomb => (1.0, 0.0),
        TargetKind::Freeze => (0.0, 1.0),
    };
    let cfg = GameConfig {
        bomb_probability: bomb,
        freeze_probability: freeze,
        ..base
    };
    Settings::default().with_config(difficulty, cfg).unwrap()
}

/// The single occupied, unstruck slot, if exactly one exists.
pub fn lone_target(game: &TestGame) -> usize {
    let up: Vec<usize> = game
        .targets()
        .iter()
        .filter(|(_, t)| !t.is_struck())
        .map(|(i, _)| i)
        .collect();
    assert_eq!(up.len(), 1, "expected exactly one live target, got {up:?}");
    up[0]
}
