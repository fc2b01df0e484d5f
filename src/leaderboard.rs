//! Persistent top-10 leaderboard.
//!
//! Stored as a JSON array under [`LEADERBOARD_KEY`]:
//! `[{"mode":"classic","difficulty":"easy","score":20,"date":"2026-10-19T12:00:00.000Z"}]`.
//! An absent or unreadable value is treated as an empty board.

use chrono::{DateTime, SecondsFormat, Utc};
use log::warn;
use serde::{Deserialize, Serialize};

use crate::error::StoreError;
use crate::game::config::{Difficulty, Mode};
use crate::host::KeyValueStore;

pub const LEADERBOARD_KEY: &str = "whackAMole_leaderboard";
pub const LEADERBOARD_SIZE: usize = 10;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub mode: Mode,
    pub difficulty: Difficulty,
    pub score: u32,
    #[serde(with = "iso_millis")]
    pub date: DateTime<Utc>,
}

// ISO-8601 with millisecond precision, e.g. `2026-10-19T08:30:00.000Z`.
mod iso_millis {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(date: &DateTime<Utc>, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&date.to_rfc3339_opts(SecondsFormat::Millis, true))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(d)?;
        DateTime::parse_from_rfc3339(&raw)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(serde::de::Error::custom)
    }
}

/// Score Store over any key-value backend.
#[derive(Debug)]
pub struct ScoreStore<S> {
    store: S,
}

impl<S: KeyValueStore> ScoreStore<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    fn load(&self) -> Result<Vec<LeaderboardEntry>, StoreError> {
        match self.store.get(LEADERBOARD_KEY) {
            Some(raw) => Ok(serde_json::from_str(&raw)?),
            None => Ok(Vec::new()),
        }
    }

    /// Persisted entries, best first. Corrupt data reads as empty.
    pub fn entries(&self) -> Vec<LeaderboardEntry> {
        self.load().unwrap_or_else(|err| {
            warn!("ignoring leaderboard: {err}");
            Vec::new()
        })
    }

    /// Append a score stamped with the current time.
    pub fn record_score(&mut self, mode: Mode, difficulty: Difficulty, score: u32) {
        self.record(LeaderboardEntry {
            mode,
            difficulty,
            score,
            date: Utc::now(),
        });
    }

    /// Append, sort descending by score, keep the top ten, persist.
    pub fn record(&mut self, entry: LeaderboardEntry) {
        let mut entries = self.entries();
        entries.push(entry);
        // stable: equal scores keep insertion order
        entries.sort_by(|a, b| b.score.cmp(&a.score));
        entries.truncate(LEADERBOARD_SIZE);
        let result = serde_json::to_string(&entries)
            .map_err(StoreError::from)
            .and_then(|json| self.store.set(LEADERBOARD_KEY, &json));
        if let Err(err) = result {
            warn!("could not persist leaderboard: {err}");
        }
    }

    /// Best persisted score for (mode, difficulty), or 0.
    pub fn high_score(&self, mode: Mode, difficulty: Difficulty) -> u32 {
        self.entries()
            .iter()
            .filter(|e| e.mode == mode && e.difficulty == difficulty)
            .map(|e| e.score)
            .max()
            .unwrap_or(0)
    }

    /// Leaderboard as the JSON array stored on disk, for display.
    pub fn to_json(&self) -> String {
        serde_json::to_string(&self.entries()).unwrap_or_else(|_| "[]".to_owned())
    }
}

impl LeaderboardEntry {
    pub fn date_string(&self) -> String {
        self.date.to_rfc3339_opts(SecondsFormat::Millis, true)
    }
}
