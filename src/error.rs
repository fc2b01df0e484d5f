//! Error types. Engine operations never return these; they surface from
//! settings loading, name parsing and the leaderboard storage layer.

use thiserror::Error;

use crate::game::config::Difficulty;

/// Invalid difficulty table.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{difficulty}: {field} = {value} is outside [0, 1]")]
    ProbabilityRange {
        difficulty: Difficulty,
        field: &'static str,
        value: f64,
    },
    #[error("{difficulty}: bomb + freeze probability {total} exceeds 1")]
    ProbabilityOverflow { difficulty: Difficulty, total: f64 },
    #[error("{difficulty}: {field} must be positive")]
    NotPositive {
        difficulty: Difficulty,
        field: &'static str,
    },
    #[error("invalid settings json: {0}")]
    Json(#[from] serde_json::Error),
}

/// Failure talking to the persistent key-value store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage unavailable")]
    Unavailable,
    #[error("failed to write '{key}': {reason}")]
    Write { key: String, reason: String },
    #[error("corrupt leaderboard: {0}")]
    Corrupt(#[from] serde_json::Error),
}

/// Unknown mode / difficulty name.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown {what} '{value}'")]
pub struct ParseError {
    pub what: &'static str,
    pub value: String,
}
