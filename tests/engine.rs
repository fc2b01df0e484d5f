// Native integration tests for the game engine: lifecycle, spawning, hit
// resolution and the leaderboard hand-off, driven through virtual time.

mod common;

use common::{Draw, game_with, lone_target, only};
use whack_a_mole::{Cue, Difficulty, GameConfig, Mode, Screen, Settings, TargetKind};

#[test]
fn start_resets_and_announces_run() {
    let mut game = game_with(Settings::default(), Mode::Classic, Difficulty::Hard);
    game.start();

    let state = game.state();
    assert!(state.running && !state.paused);
    assert_eq!((state.score, state.combo, state.time, state.missed), (0, 0, 60, 0));
    assert_eq!(game.targets().hole_count(), 16);
    assert!(game.targets().is_empty());
    assert_eq!(game.spawn_interval_ms(), 800.0);
    assert_eq!(game.audio().cues, vec![Cue::GameStart]);
    assert_eq!(
        game.renderer().draws,
        vec![
            Draw::Grid(4),
            Draw::Screen(Screen::Game),
            Draw::Score(0),
            Draw::Combo(0),
            Draw::Time(60),
        ]
    );
}

#[test]
fn operations_before_start_are_ignored() {
    let mut game = game_with(Settings::default(), Mode::Classic, Difficulty::Easy);
    game.attempt_hit(0);
    game.pause();
    game.resume();
    game.end();
    game.advance(10_000.0);
    assert!(!game.state().running);
    assert!(game.renderer().draws.is_empty());
    assert!(game.scores().entries().is_empty());
}

#[test]
fn classic_clock_ends_run_exactly_once() {
    let mut game = game_with(Settings::default(), Mode::Classic, Difficulty::Medium);
    game.start();

    game.advance(59_000.0);
    assert!(game.state().running);
    assert_eq!(game.state().time, 1);

    game.advance(60_000.0);
    assert!(!game.state().running);
    assert_eq!(game.state().time, 0);
    assert!(game.targets().is_empty());

    game.advance(120_000.0);
    assert_eq!(game.renderer().end_screens().len(), 1);
    assert_eq!(game.scores().entries().len(), 1);
}

#[test]
fn survival_clock_counts_up() {
    let mut game = game_with(Settings::default(), Mode::Survival, Difficulty::Medium);
    game.start();
    assert_eq!(game.state().time, 0);
    game.advance(3_000.0);
    assert_eq!(game.state().time, 3);
    assert!(game.renderer().draws.contains(&Draw::Time(3)));
}

#[test]
fn survival_ends_on_fifth_escaped_mole() {
    let settings = only(TargetKind::Mole, Difficulty::Medium);
    let mut game = game_with(settings, Mode::Survival, Difficulty::Medium);
    game.start();

    // spawns every 1000ms, each mole escapes 1500ms later
    game.advance(5_500.0);
    assert_eq!(game.state().missed, 4);
    assert!(game.state().running);

    game.advance(6_499.0);
    assert!(game.state().running);

    game.advance(6_500.0);
    assert_eq!(game.state().missed, 5);
    assert!(!game.state().running);
    assert_eq!(game.renderer().end_screens(), vec![(0, 0)]);
    assert_eq!(
        game.high_score(Mode::Survival, Difficulty::Medium),
        0,
        "a zero score is still recorded"
    );
    assert_eq!(game.scores().entries().len(), 1);
}

#[test]
fn classic_escapes_are_not_counted() {
    let settings = only(TargetKind::Mole, Difficulty::Medium);
    let mut game = game_with(settings, Mode::Classic, Difficulty::Medium);
    game.start();
    game.advance(20_000.0);
    assert_eq!(game.state().missed, 0);
    assert!(game.state().running);
    assert!(game.renderer().draws.iter().any(|d| matches!(d, Draw::Hide(_))));
}

#[test]
fn bombs_never_push_score_below_zero() {
    let settings = only(TargetKind::Bomb, Difficulty::Easy);
    let mut game = game_with(settings, Mode::Classic, Difficulty::Easy);
    game.start();
    for k in 1..=3 {
        game.advance(1_500.0 * k as f64);
        let slot = lone_target(&game);
        game.attempt_hit(slot);
        assert_eq!(game.state().score, 0);
        assert_eq!(game.state().combo, 0);
    }
    assert_eq!(
        game.audio().cues,
        vec![Cue::GameStart, Cue::Bomb, Cue::Bomb, Cue::Bomb]
    );
}

#[test]
fn mole_streak_scores_with_capped_combo_bonus() {
    let settings = only(TargetKind::Mole, Difficulty::Easy);
    let mut game = game_with(settings, Mode::Classic, Difficulty::Easy);
    game.start();

    let mut last_score = 0;
    let mut deltas = Vec::new();
    for k in 1..=10 {
        game.advance(1_500.0 * k as f64);
        let slot = lone_target(&game);
        game.attempt_hit(slot);
        assert_eq!(game.state().combo, k);
        deltas.push(game.state().score - last_score);
        last_score = game.state().score;
    }
    assert_eq!(deltas, vec![1, 1, 1, 2, 2, 2, 2, 2, 2, 2]);
    assert_eq!(game.state().score, 17);
}

#[test]
fn bomb_resets_combo_and_moles_extend_it() {
    let base = *Settings::default().get(Difficulty::Easy);
    let cfg = GameConfig {
        bomb_probability: 0.3,
        freeze_probability: 0.0,
        ..base
    };
    let settings = Settings::default()
        .with_config(Difficulty::Easy, cfg)
        .unwrap();
    let mut game = game_with(settings, Mode::Classic, Difficulty::Easy);
    game.start();

    let (mut bombs, mut moles) = (0, 0);
    for k in 1..=30 {
        game.advance(1_500.0 * k as f64);
        let slot = lone_target(&game);
        let kind = game.targets().kind(slot).unwrap();
        let before = game.state().clone();
        game.attempt_hit(slot);
        let after = game.state();
        match kind {
            TargetKind::Bomb => {
                bombs += 1;
                assert_eq!(after.combo, 0);
                assert_eq!(after.score, before.score.saturating_sub(10));
            }
            TargetKind::Mole => {
                moles += 1;
                assert_eq!(after.combo, before.combo + 1);
                assert!(after.score > before.score);
            }
            TargetKind::Freeze => unreachable!("freeze disabled"),
        }
    }
    assert!(bombs > 0 && moles > 0, "bombs={bombs} moles={moles}");
}

#[test]
fn struck_target_resolves_again_until_cleared() {
    let settings = only(TargetKind::Mole, Difficulty::Easy);
    let mut game = game_with(settings, Mode::Classic, Difficulty::Easy);
    game.start();
    game.advance(1_500.0);
    let slot = lone_target(&game);

    game.attempt_hit(slot);
    assert_eq!(game.state().combo, 1);
    assert!(game.targets().get(slot).unwrap().is_struck());
    assert!(game.renderer().draws.contains(&Draw::HitFeedback(slot)));

    // still occupied during the hit feedback, so the second swing counts
    game.advance(1_600.0);
    game.attempt_hit(slot);
    assert_eq!((game.state().combo, game.state().score), (2, 2));

    // the first hit's clear timer removes it
    game.advance(1_799.0);
    assert!(game.targets().get(slot).is_some());
    game.advance(1_800.0);
    assert!(game.targets().get(slot).is_none());
    assert_eq!(game.renderer().draws.last(), Some(&Draw::Hide(slot)));

    game.attempt_hit(slot);
    game.attempt_hit(999);
    assert_eq!((game.state().combo, game.state().score), (2, 2));
}

#[test]
fn struck_bomb_penalises_each_hit() {
    let settings = only(TargetKind::Bomb, Difficulty::Easy);
    let mut game = game_with(settings, Mode::Classic, Difficulty::Easy);
    game.start();
    game.advance(1_500.0);
    let slot = lone_target(&game);
    game.attempt_hit(slot);
    game.attempt_hit(slot);
    assert_eq!(game.state().score, 0);
    let bombs = game.audio().cues.iter().filter(|c| **c == Cue::Bomb).count();
    assert_eq!(bombs, 2);
}

#[test]
fn hit_mole_does_not_count_as_escaped() {
    let settings = only(TargetKind::Mole, Difficulty::Medium);
    let mut game = game_with(settings, Mode::Survival, Difficulty::Medium);
    game.start();
    game.advance(1_000.0);
    let slot = lone_target(&game);
    // hit right before its show time runs out
    game.advance(2_400.0);
    game.attempt_hit(slot);
    game.advance(2_600.0);
    assert_eq!(game.state().missed, 0);
}

#[test]
fn escaped_mole_breaks_combo() {
    let settings = only(TargetKind::Mole, Difficulty::Easy);
    let mut game = game_with(settings, Mode::Classic, Difficulty::Easy);
    game.start();
    game.advance(1_500.0);
    game.attempt_hit(lone_target(&game));
    game.advance(3_000.0);
    game.attempt_hit(lone_target(&game));
    assert_eq!(game.state().combo, 2);

    // the 4500ms mole is left alone and escapes at 6500ms
    game.advance(6_500.0);
    assert_eq!(game.state().combo, 0);
    assert_eq!(game.state().missed, 0);
    assert_eq!(game.state().score, 2);
}

#[test]
fn full_grid_skips_spawns() {
    let base = *Settings::default().get(Difficulty::Easy);
    let cfg = GameConfig {
        mole_show_time: 1_000_000,
        bomb_probability: 0.0,
        freeze_probability: 0.0,
        ..base
    };
    let settings = Settings::default()
        .with_config(Difficulty::Easy, cfg)
        .unwrap();
    let mut game = game_with(settings, Mode::Classic, Difficulty::Easy);
    game.start();
    game.advance(18_000.0);
    assert_eq!(game.targets().len(), 9);
    assert!(game.targets().free_slots().is_empty());
    assert!(game.state().running);
    let shows = game
        .renderer()
        .draws
        .iter()
        .filter(|d| matches!(d, Draw::Show(..)))
        .count();
    assert_eq!(shows, 9);
}

#[test]
fn freeze_slows_spawns_for_five_seconds() {
    let settings = only(TargetKind::Freeze, Difficulty::Medium);
    let mut game = game_with(settings, Mode::Classic, Difficulty::Medium);
    game.start();
    game.advance(1_000.0);
    assert_eq!(game.spawn_interval_ms(), 1_000.0);

    let slot = lone_target(&game);
    game.attempt_hit(slot);
    assert!(game.state().freeze_active);
    assert_eq!(game.spawn_interval_ms(), 1_500.0);
    assert_eq!((game.state().score, game.state().combo), (0, 0));
    assert_eq!(game.audio().cues.last(), Some(&Cue::Freeze));

    game.advance(5_999.0);
    assert!(game.state().freeze_active);
    game.advance(6_000.0);
    assert!(!game.state().freeze_active);
    assert_eq!(game.spawn_interval_ms(), 1_000.0);
}

#[test]
fn second_freeze_restarts_window_without_stacking() {
    let settings = only(TargetKind::Freeze, Difficulty::Medium);
    let mut game = game_with(settings, Mode::Classic, Difficulty::Medium);
    game.start();
    game.advance(1_000.0);
    game.attempt_hit(lone_target(&game));

    // next spawn comes one slowed interval later
    game.advance(2_500.0);
    game.attempt_hit(lone_target(&game));
    assert_eq!(game.spawn_interval_ms(), 1_500.0);

    game.advance(6_000.0);
    assert!(game.state().freeze_active);
    assert_eq!(game.spawn_interval_ms(), 1_500.0);

    game.advance(7_499.0);
    assert!(game.state().freeze_active);
    game.advance(7_500.0);
    assert!(!game.state().freeze_active);
    assert_eq!(game.spawn_interval_ms(), 1_000.0);
}

#[test]
fn pause_resume_preserves_run() {
    let settings = only(TargetKind::Mole, Difficulty::Medium);
    let mut game = game_with(settings, Mode::Classic, Difficulty::Medium);
    game.start();
    game.advance(3_000.0);
    let (slot, _) = game.targets().iter().next().unwrap();
    game.attempt_hit(slot);
    game.advance(3_100.0);

    let state = game.state().clone();
    let targets = game.targets().clone();
    assert!(targets.len() >= 2);

    game.pause();
    assert!(game.state().paused);
    assert_eq!(game.renderer().draws.last(), Some(&Draw::Screen(Screen::Pause)));
    game.advance(50_000.0);
    let other = targets.iter().find(|(_, t)| !t.is_struck()).unwrap().0;
    game.attempt_hit(other);

    game.resume();
    assert_eq!(game.state(), &state);
    assert_eq!(game.targets(), &targets);
    assert_eq!(game.spawn_interval_ms(), 1_000.0);

    // the struck target had 200ms of its clear delay left
    game.advance(50_199.0);
    assert!(game.targets().get(slot).is_some());
    game.advance(50_200.0);
    assert!(game.targets().get(slot).is_none());
}

#[test]
fn survival_resume_rearms_spawn_with_ramp() {
    // bombs escape without counting, so the run survives a full minute
    let settings = only(TargetKind::Bomb, Difficulty::Medium);
    let mut game = game_with(settings, Mode::Survival, Difficulty::Medium);
    game.start();
    game.advance(60_000.0);
    assert_eq!(game.state().time, 60);
    assert_eq!(game.spawn_interval_ms(), 1_000.0);

    game.pause();
    game.resume();
    assert_eq!(game.spawn_interval_ms(), 500.0);
    assert!(game.state().running);
}

#[test]
fn pause_suspends_freeze_window() {
    let settings = only(TargetKind::Freeze, Difficulty::Easy);
    let mut game = game_with(settings, Mode::Classic, Difficulty::Easy);
    game.start();
    game.advance(1_500.0);
    game.attempt_hit(lone_target(&game));
    assert!(game.state().freeze_active);
    assert_eq!(game.spawn_interval_ms(), 2_250.0);

    // 3000ms of the window left when paused
    game.advance(3_500.0);
    game.pause();
    game.advance(20_000.0);
    assert!(game.state().freeze_active);

    game.resume();
    assert_eq!(game.spawn_interval_ms(), 2_250.0);
    game.advance(22_999.0);
    assert!(game.state().freeze_active);
    game.advance(23_000.0);
    assert!(!game.state().freeze_active);
    assert_eq!(game.spawn_interval_ms(), 1_500.0);
}

#[test]
fn end_while_paused_records_score() {
    let settings = only(TargetKind::Mole, Difficulty::Easy);
    let mut game = game_with(settings, Mode::Classic, Difficulty::Easy);
    game.start();
    game.advance(1_500.0);
    game.attempt_hit(lone_target(&game));
    game.pause();
    game.end();
    assert!(!game.state().running && !game.state().paused);
    assert!(game.targets().is_empty());
    assert_eq!(game.renderer().end_screens(), vec![(1, 1)]);
    game.resume();
    assert!(!game.state().running);
}

#[test]
fn end_hides_targets_and_reports_high_score() {
    let settings = only(TargetKind::Mole, Difficulty::Easy);
    let mut game = game_with(settings, Mode::Classic, Difficulty::Easy);
    game.start();
    for k in 1..=3 {
        game.advance(1_500.0 * k as f64);
        game.attempt_hit(lone_target(&game));
    }
    game.advance(6_000.0);
    let shown = game.targets().iter().map(|(i, _)| i).collect::<Vec<_>>();
    assert_eq!(shown.len(), 1);
    game.end();
    assert!(game.targets().is_empty());
    assert!(game.renderer().draws.contains(&Draw::Hide(shown[0])));
    assert_eq!(game.renderer().end_screens(), vec![(3, 3)]);

    game.restart();
    game.end();
    assert_eq!(game.renderer().end_screens(), vec![(3, 3), (0, 3)]);
    assert_eq!(game.high_score(Mode::Classic, Difficulty::Easy), 3);
    assert_eq!(game.high_score(Mode::Survival, Difficulty::Easy), 0);
}

#[test]
fn restart_discards_timers_from_previous_run() {
    let mut game = game_with(Settings::default(), Mode::Classic, Difficulty::Medium);
    game.start();
    game.advance(30_500.0);
    assert_eq!(game.state().time, 30);

    game.restart();
    assert_eq!(game.state().time, 60);
    assert!(game.targets().is_empty());

    game.advance(31_499.0);
    assert_eq!(game.state().time, 60);
    game.advance(31_500.0);
    assert_eq!(game.state().time, 59);
    assert!(game.renderer().end_screens().is_empty());
}

#[test]
fn selection_applies_on_next_start() {
    let mut game = game_with(Settings::default(), Mode::Classic, Difficulty::Easy);
    game.start();
    game.set_mode(Mode::Survival);
    game.set_difficulty(Difficulty::Hard);
    assert_eq!(game.state().mode, Mode::Classic);
    assert_eq!(game.state().difficulty, Difficulty::Easy);

    game.restart();
    assert_eq!(game.state().mode, Mode::Survival);
    assert_eq!(game.state().difficulty, Difficulty::Hard);
    assert_eq!(game.state().time, 0);
    assert_eq!(game.targets().hole_count(), 16);
}

#[test]
fn time_never_runs_backwards() {
    let mut game = game_with(Settings::default(), Mode::Classic, Difficulty::Medium);
    game.start();
    game.advance(2_000.0);
    game.advance(500.0);
    assert_eq!(game.now_ms(), 2_000.0);
    assert_eq!(game.state().time, 58);
}
