//! Difficulty table and game-wide constants.
//!
//! One `GameConfig` row per difficulty; the built-in rows mirror the shipped
//! balance and can be replaced from JSON at startup.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ParseError};

/// Clock tick period.
pub const CLOCK_PERIOD_MS: f64 = 1_000.0;
/// Survival runs end once this many moles escape.
pub const MAX_MISSED_MOLES: u32 = 5;
/// Freeze power-up lifetime; a new freeze restarts the window.
pub const FREEZE_DURATION_MS: f64 = 5_000.0;
/// Spawn interval multiplier while frozen (slower spawns).
pub const FREEZE_SLOWDOWN: f64 = 1.5;
/// Seconds of survival play until the spawn rate stops increasing.
pub const SURVIVAL_RAMP_SECS: f64 = 120.0;
/// Lowest survival interval factor (2x base spawn rate).
pub const SURVIVAL_MIN_FACTOR: f64 = 0.5;
/// Delay between a registered hit and the target leaving its slot.
pub const HIT_CLEAR_DELAY_MS: f64 = 300.0;
pub const BOMB_PENALTY: u32 = 10;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Countdown from `gameTime`; ends when the clock hits zero.
    #[default]
    Classic,
    /// Count-up clock; ends after `MAX_MISSED_MOLES` escaped moles.
    Survival,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Mode {
    pub fn as_str(self) -> &'static str {
        match self {
            Mode::Classic => "classic",
            Mode::Survival => "survival",
        }
    }
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    pub fn as_str(self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mode {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "classic" => Ok(Mode::Classic),
            "survival" => Ok(Mode::Survival),
            _ => Err(ParseError {
                what: "mode",
                value: s.to_owned(),
            }),
        }
    }
}

impl FromStr for Difficulty {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            _ => Err(ParseError {
                what: "difficulty",
                value: s.to_owned(),
            }),
        }
    }
}

/// Per-difficulty tuning. Field names serialize to the camelCase keys used by
/// settings JSON (`gridSize`, `moleShowTime`, ...).
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameConfig {
    /// Grid edge length; the grid holds `grid_size²` holes.
    pub grid_size: u8,
    /// How long a target stays up before it escapes (ms).
    pub mole_show_time: u32,
    /// Base spawn period (ms).
    pub mole_interval: u32,
    pub bomb_probability: f64,
    pub freeze_probability: f64,
    /// Classic round length in seconds.
    pub game_time: u32,
    pub score_multiplier: f64,
}

impl GameConfig {
    pub fn hole_count(&self) -> usize {
        self.grid_size as usize * self.grid_size as usize
    }

    fn validate(&self, difficulty: Difficulty) -> Result<(), ConfigError> {
        for (field, value) in [
            ("bombProbability", self.bomb_probability),
            ("freezeProbability", self.freeze_probability),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::ProbabilityRange {
                    difficulty,
                    field,
                    value,
                });
            }
        }
        let total = self.bomb_probability + self.freeze_probability;
        if total > 1.0 {
            return Err(ConfigError::ProbabilityOverflow { difficulty, total });
        }
        let positive = [
            ("gridSize", self.grid_size > 0),
            ("moleShowTime", self.mole_show_time > 0),
            ("moleInterval", self.mole_interval > 0),
            ("gameTime", self.game_time > 0),
            ("scoreMultiplier", self.score_multiplier > 0.0),
        ];
        if let Some(&(field, _)) = positive.iter().find(|(_, ok)| !ok) {
            return Err(ConfigError::NotPositive { difficulty, field });
        }
        Ok(())
    }
}

const EASY: GameConfig = GameConfig {
    grid_size: 3,
    mole_show_time: 2000,
    mole_interval: 1500,
    bomb_probability: 0.1,
    freeze_probability: 0.05,
    game_time: 60,
    score_multiplier: 1.0,
};

const MEDIUM: GameConfig = GameConfig {
    grid_size: 4,
    mole_show_time: 1500,
    mole_interval: 1000,
    bomb_probability: 0.15,
    freeze_probability: 0.03,
    game_time: 60,
    score_multiplier: 1.5,
};

const HARD: GameConfig = GameConfig {
    grid_size: 4,
    mole_show_time: 1000,
    mole_interval: 800,
    bomb_probability: 0.2,
    freeze_probability: 0.02,
    game_time: 60,
    score_multiplier: 2.0,
};

/// The full difficulty table, immutable once a `Game` owns it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    pub easy: GameConfig,
    pub medium: GameConfig,
    pub hard: GameConfig,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            easy: EASY,
            medium: MEDIUM,
            hard: HARD,
        }
    }
}

impl Settings {
    /// Parse and validate a `{ "easy": {..}, "medium": {..}, "hard": {..} }` table.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        Difficulty::ALL
            .iter()
            .try_for_each(|&d| self.get(d).validate(d))
    }

    pub fn get(&self, difficulty: Difficulty) -> &GameConfig {
        match difficulty {
            Difficulty::Easy => &self.easy,
            Difficulty::Medium => &self.medium,
            Difficulty::Hard => &self.hard,
        }
    }

    /// Replace one row, validating it.
    pub fn with_config(
        mut self,
        difficulty: Difficulty,
        config: GameConfig,
    ) -> Result<Self, ConfigError> {
        config.validate(difficulty)?;
        match difficulty {
            Difficulty::Easy => self.easy = config,
            Difficulty::Medium => self.medium = config,
            Difficulty::Hard => self.hard = config,
        }
        Ok(self)
    }
}
