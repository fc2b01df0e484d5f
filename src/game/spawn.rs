//! Spawn scheduling math: how often targets appear, where, and what kind.

use rand::Rng;

use super::config::{
    FREEZE_SLOWDOWN, GameConfig, Mode, SURVIVAL_MIN_FACTOR, SURVIVAL_RAMP_SECS,
};
use super::targets::{ActiveTargets, TargetKind};

/// Spawn period for the current conditions. Survival ramps from the base
/// interval down to half of it over two minutes; freeze stretches it by 1.5.
pub fn spawn_interval_ms(
    config: &GameConfig,
    mode: Mode,
    elapsed_secs: u32,
    freeze_active: bool,
) -> f64 {
    let mut interval = config.mole_interval as f64;
    if mode == Mode::Survival {
        let factor = (1.0 - elapsed_secs as f64 / SURVIVAL_RAMP_SECS).max(SURVIVAL_MIN_FACTOR);
        interval *= factor;
    }
    if freeze_active {
        interval *= FREEZE_SLOWDOWN;
    }
    interval
}

/// Map a uniform roll in [0, 1) to a target kind. Bomb mass comes first, then
/// freeze; whatever remains is a mole.
pub fn choose_kind(roll: f64, config: &GameConfig) -> TargetKind {
    if roll < config.bomb_probability {
        TargetKind::Bomb
    } else if roll < config.bomb_probability + config.freeze_probability {
        TargetKind::Freeze
    } else {
        TargetKind::Mole
    }
}

/// Uniformly pick an unoccupied slot, or `None` when the grid is full.
pub fn pick_free_slot<R: Rng>(targets: &ActiveTargets, rng: &mut R) -> Option<usize> {
    let free = targets.free_slots();
    if free.is_empty() {
        return None;
    }
    Some(free[rng.random_range(0..free.len())])
}
