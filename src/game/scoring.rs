//! Combo scoring for mole hits.

/// Bonus per combo step beyond the first hit.
pub const COMBO_STEP_BONUS: f64 = 0.2;
/// Combo steps that earn a bonus; caps the bonus at +100%.
pub const MAX_COMBO_STEPS: u32 = 5;

/// Points for a mole hit that brought the streak to `combo` (>= 1).
pub fn mole_points(score_multiplier: f64, combo: u32) -> u32 {
    let base = 1.0 * score_multiplier;
    let steps = combo.saturating_sub(1).min(MAX_COMBO_STEPS);
    let bonus = steps as f64 * COMBO_STEP_BONUS;
    (base * (1.0 + bonus)).round() as u32
}
