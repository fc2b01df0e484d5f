//! Whack-a-mole engine.
//!
//! [`Game`] owns the run lifecycle (start / pause / resume / end), the spawn
//! scheduler, hit resolution and the leaderboard hand-off. Time is virtual:
//! the host calls [`Game::advance`] with a monotonic millisecond clock (in the
//! browser, `performance.now()` from the animation frame loop) and every timer
//! that came due runs to completion in order.
//!
//! Each run gets a fresh epoch; timers carry the epoch they were created in and
//! are dropped if a restart happened in between.

pub mod config;
pub mod scoring;
pub mod spawn;
pub mod targets;
pub mod timers;

use log::{debug, info, trace};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::host::{AudioCues, Cue, KeyValueStore, Renderer, Screen};
use crate::leaderboard::ScoreStore;
use config::{
    BOMB_PENALTY, CLOCK_PERIOD_MS, Difficulty, FREEZE_DURATION_MS, GameConfig,
    HIT_CLEAR_DELAY_MS, MAX_MISSED_MOLES, Mode, Settings,
};
use targets::{ActiveTargets, Phase, TargetKind};
use timers::{Fired, Task, TimerId, TimerQueue};

/// Per-run state. Reset by every `start()`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GameState {
    pub score: u32,
    /// Consecutive mole hits; a bomb or an escaped mole resets it.
    pub combo: u32,
    /// Seconds left (classic) or survived (survival).
    pub time: u32,
    pub running: bool,
    pub paused: bool,
    pub mode: Mode,
    pub difficulty: Difficulty,
    /// Escaped moles; only counted in survival.
    pub missed: u32,
    pub freeze_active: bool,
}

pub struct Game<R, A, S> {
    settings: Settings,
    selected_mode: Mode,
    selected_difficulty: Difficulty,
    state: GameState,
    targets: ActiveTargets,
    timers: TimerQueue,
    epoch: u64,
    now_ms: f64,
    clock_timer: Option<TimerId>,
    spawn_timer: Option<TimerId>,
    freeze_timer: Option<TimerId>,
    spawn_interval_ms: f64,
    rng: SmallRng,
    renderer: R,
    audio: A,
    scores: ScoreStore<S>,
}

impl<R: Renderer, A: AudioCues, S: KeyValueStore> Game<R, A, S> {
    pub fn new(settings: Settings, renderer: R, audio: A, store: S, seed: u64) -> Self {
        Self {
            settings,
            selected_mode: Mode::default(),
            selected_difficulty: Difficulty::default(),
            state: GameState::default(),
            targets: ActiveTargets::default(),
            timers: TimerQueue::new(),
            epoch: 0,
            now_ms: 0.0,
            clock_timer: None,
            spawn_timer: None,
            freeze_timer: None,
            spawn_interval_ms: 0.0,
            rng: SmallRng::seed_from_u64(seed),
            renderer,
            audio,
            scores: ScoreStore::new(store),
        }
    }

    // --- Accessors ----------------------------------------------------------

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn targets(&self) -> &ActiveTargets {
        &self.targets
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Period the spawn tick is currently armed with (0 before the first start).
    pub fn spawn_interval_ms(&self) -> f64 {
        self.spawn_interval_ms
    }

    pub fn now_ms(&self) -> f64 {
        self.now_ms
    }

    pub fn selected_mode(&self) -> Mode {
        self.selected_mode
    }

    pub fn selected_difficulty(&self) -> Difficulty {
        self.selected_difficulty
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    pub fn audio(&self) -> &A {
        &self.audio
    }

    pub fn scores(&self) -> &ScoreStore<S> {
        &self.scores
    }

    pub fn high_score(&self, mode: Mode, difficulty: Difficulty) -> u32 {
        self.scores.high_score(mode, difficulty)
    }

    fn config(&self) -> &GameConfig {
        self.settings.get(self.state.difficulty)
    }

    // --- Selection ----------------------------------------------------------

    /// Applies from the next `start()`.
    pub fn set_mode(&mut self, mode: Mode) {
        self.selected_mode = mode;
    }

    /// Applies from the next `start()`.
    pub fn set_difficulty(&mut self, difficulty: Difficulty) {
        self.selected_difficulty = difficulty;
    }

    // --- Lifecycle ----------------------------------------------------------

    /// Begin a fresh run with the selected mode and difficulty, abandoning any
    /// run in progress without recording it.
    pub fn start(&mut self) {
        self.timers.clear();
        self.epoch += 1;
        self.clock_timer = None;
        self.spawn_timer = None;
        self.freeze_timer = None;

        let mode = self.selected_mode;
        let difficulty = self.selected_difficulty;
        let config = *self.settings.get(difficulty);
        self.state = GameState {
            score: 0,
            combo: 0,
            time: match mode {
                Mode::Classic => config.game_time,
                Mode::Survival => 0,
            },
            running: true,
            paused: false,
            mode,
            difficulty,
            missed: 0,
            freeze_active: false,
        };
        self.targets = ActiveTargets::with_holes(config.hole_count());

        self.renderer.create_grid(config.grid_size);
        self.renderer.show_screen(Screen::Game);
        self.renderer.update_score(self.state.score);
        self.renderer.update_combo(self.state.combo);
        self.renderer.update_time(self.state.time);
        self.audio.play(Cue::GameStart);
        info!("run {} started: {mode} / {difficulty}", self.epoch);

        self.restart_clock();
        self.restart_spawner();
    }

    pub fn restart(&mut self) {
        self.start();
    }

    /// Suspend the run. Periodic ticks are cancelled; pending one-shot timers
    /// (target expiry, hit clear, freeze end) keep their remaining delay.
    pub fn pause(&mut self) {
        if !self.state.running || self.state.paused {
            return;
        }
        self.state.paused = true;
        self.cancel_periodic();
        self.timers.suspend(self.now_ms);
        self.renderer.show_screen(Screen::Pause);
        debug!("paused at {}ms", self.now_ms);
    }

    pub fn resume(&mut self) {
        if !self.state.running || !self.state.paused {
            return;
        }
        self.state.paused = false;
        self.timers.resume(self.now_ms);
        self.renderer.show_screen(Screen::Game);
        self.restart_clock();
        self.restart_spawner();
        debug!("resumed at {}ms", self.now_ms);
    }

    /// Finish the run: stop every timer, clear the grid, record the score and
    /// show the end screen.
    pub fn end(&mut self) {
        if !self.state.running {
            return;
        }
        self.state.running = false;
        self.state.paused = false;
        self.state.freeze_active = false;
        self.timers.clear();
        self.clock_timer = None;
        self.spawn_timer = None;
        self.freeze_timer = None;

        for slot in self.targets.drain() {
            self.renderer.hide_target(slot);
        }

        let GameState {
            mode,
            difficulty,
            score,
            ..
        } = self.state;
        self.scores.record_score(mode, difficulty, score);
        let high_score = self.scores.high_score(mode, difficulty);
        info!("run {} ended: {mode} / {difficulty} score {score} (best {high_score})", self.epoch);
        self.renderer.show_end_screen(score, high_score);
    }

    // --- Time ---------------------------------------------------------------

    /// Move virtual time forward to `now_ms`, running every timer that comes
    /// due on the way. Earlier timestamps are ignored.
    pub fn advance(&mut self, now_ms: f64) {
        if now_ms < self.now_ms {
            return;
        }
        while let Some(fired) = self.timers.pop_due(now_ms) {
            self.now_ms = fired.due_ms;
            if fired.epoch != self.epoch {
                trace!("dropping stale {:?} from run {}", fired.task, fired.epoch);
                continue;
            }
            self.dispatch(fired);
        }
        self.now_ms = now_ms;
    }

    fn dispatch(&mut self, fired: Fired) {
        match fired.task {
            Task::ClockTick => self.clock_tick(),
            Task::SpawnTick => self.spawn_tick(),
            Task::Expire { slot } => self.expire(slot, fired.id),
            Task::ClearHit { slot } => self.clear_hit(slot, fired.id),
            Task::FreezeEnd => self.end_freeze(fired.id),
        }
    }

    fn cancel_periodic(&mut self) {
        for id in [self.clock_timer.take(), self.spawn_timer.take()]
            .into_iter()
            .flatten()
        {
            self.timers.cancel(id);
        }
    }

    fn restart_clock(&mut self) {
        if let Some(id) = self.clock_timer.take() {
            self.timers.cancel(id);
        }
        self.clock_timer = Some(self.timers.schedule_every(
            self.now_ms,
            CLOCK_PERIOD_MS,
            self.epoch,
            Task::ClockTick,
        ));
    }

    /// Re-arm the spawn tick with an interval computed from current conditions.
    fn restart_spawner(&mut self) {
        if let Some(id) = self.spawn_timer.take() {
            self.timers.cancel(id);
        }
        if !self.state.running || self.state.paused {
            return;
        }
        let interval = spawn::spawn_interval_ms(
            self.config(),
            self.state.mode,
            self.state.time,
            self.state.freeze_active,
        );
        self.spawn_interval_ms = interval;
        self.spawn_timer = Some(self.timers.schedule_every(
            self.now_ms,
            interval,
            self.epoch,
            Task::SpawnTick,
        ));
    }

    fn clock_tick(&mut self) {
        if !self.state.running || self.state.paused {
            return;
        }
        match self.state.mode {
            Mode::Classic => {
                self.state.time = self.state.time.saturating_sub(1);
                self.renderer.update_time(self.state.time);
                if self.state.time == 0 {
                    self.end();
                }
            }
            Mode::Survival => {
                self.state.time += 1;
                self.renderer.update_time(self.state.time);
            }
        }
    }

    // --- Spawn scheduler ----------------------------------------------------

    fn spawn_tick(&mut self) {
        if !self.state.running || self.state.paused {
            return;
        }
        let Some(slot) = spawn::pick_free_slot(&self.targets, &mut self.rng) else {
            trace!("grid full, skipping spawn");
            return;
        };
        let roll: f64 = self.rng.random();
        let config = *self.config();
        let kind = spawn::choose_kind(roll, &config);
        let expiry = self.timers.schedule(
            self.now_ms,
            config.mole_show_time as f64,
            self.epoch,
            Task::Expire { slot },
        );
        self.targets.occupy(slot, kind, expiry);
        self.renderer.show_target(slot, kind);
        trace!("{} up in slot {slot} at {}ms", kind.as_str(), self.now_ms);
    }

    /// A target stayed up for its full show time without being hit.
    fn expire(&mut self, slot: usize, timer: TimerId) {
        let Some(target) = self.targets.get(slot) else {
            return;
        };
        if target.phase != (Phase::Showing { expiry: timer }) {
            return;
        }
        let kind = target.kind;
        self.targets.remove(slot);
        self.renderer.hide_target(slot);

        if kind != TargetKind::Mole {
            return;
        }
        if self.state.combo > 0 {
            self.state.combo = 0;
            self.renderer.update_combo(0);
        }
        if self.state.mode == Mode::Survival {
            self.state.missed += 1;
            debug!("mole escaped ({}/{MAX_MISSED_MOLES})", self.state.missed);
            if self.state.missed >= MAX_MISSED_MOLES {
                self.end();
            }
        }
    }

    // --- Hit resolver -------------------------------------------------------

    /// Player swung at `slot`. Ignored unless a target occupies it. A target
    /// still showing its hit feedback resolves again; the first hit's clear
    /// timer removes it.
    pub fn attempt_hit(&mut self, slot: usize) {
        if !self.state.running || self.state.paused {
            return;
        }
        let Some(&target) = self.targets.get(slot) else {
            return;
        };
        let pending_clear = match target.phase {
            Phase::Showing { expiry } => {
                self.timers.cancel(expiry);
                None
            }
            Phase::Struck { clear } => Some(clear),
        };

        match target.kind {
            TargetKind::Bomb => {
                self.audio.play(Cue::Bomb);
                self.state.score = self.state.score.saturating_sub(BOMB_PENALTY);
                self.state.combo = 0;
            }
            TargetKind::Freeze => {
                self.audio.play(Cue::Freeze);
                self.activate_freeze();
            }
            TargetKind::Mole => {
                self.audio.play(Cue::Hit);
                self.state.combo += 1;
                let points = scoring::mole_points(self.config().score_multiplier, self.state.combo);
                self.state.score += points;
            }
        }

        self.renderer.show_hit_feedback(slot);
        self.renderer.update_score(self.state.score);
        self.renderer.update_combo(self.state.combo);

        if pending_clear.is_none() {
            let clear = self.timers.schedule(
                self.now_ms,
                HIT_CLEAR_DELAY_MS,
                self.epoch,
                Task::ClearHit { slot },
            );
            self.targets.set_phase(slot, Phase::Struck { clear });
        }
    }

    fn clear_hit(&mut self, slot: usize, timer: TimerId) {
        let matches = self
            .targets
            .get(slot)
            .is_some_and(|t| t.phase == Phase::Struck { clear: timer });
        if matches {
            self.targets.remove(slot);
            self.renderer.hide_target(slot);
        }
    }

    /// Slow spawns for `FREEZE_DURATION_MS`. A second freeze restarts the
    /// window rather than extending it.
    fn activate_freeze(&mut self) {
        self.state.freeze_active = true;
        self.restart_spawner();
        if let Some(id) = self.freeze_timer.take() {
            self.timers.cancel(id);
        }
        self.freeze_timer = Some(self.timers.schedule(
            self.now_ms,
            FREEZE_DURATION_MS,
            self.epoch,
            Task::FreezeEnd,
        ));
        debug!("freeze on, spawn interval {}ms", self.spawn_interval_ms);
    }

    fn end_freeze(&mut self, timer: TimerId) {
        if self.freeze_timer != Some(timer) {
            return;
        }
        self.freeze_timer = None;
        self.state.freeze_active = false;
        self.restart_spawner();
        debug!("freeze off, spawn interval {}ms", self.spawn_interval_ms);
    }
}
