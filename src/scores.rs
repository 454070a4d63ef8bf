//! Score records and leaderboards
//!
//! One record per game id in the key-value store, each holding the top 10
//! scores. Every read or write failure degrades to defaults and is logged;
//! nothing here ever fails gameplay.

use std::collections::BTreeMap;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::consts::{DEFAULT_PLAYER_NAME, MAX_LEADERBOARD, MAX_NAME_CHARS};
use crate::persistence::{KeyValueStore, StorageError};
use crate::sim::GameId;

/// Store key holding the last used player name
const PLAYER_NAME_KEY: &str = "player-name";

/// A single leaderboard entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreRecord {
    pub name: String,
    pub score: u64,
    /// ISO-8601 time the score was recorded
    pub date: String,
    /// Unix timestamp (ms) when achieved
    pub timestamp: f64,
}

/// Top scores, sorted descending; ties keep the older entry first
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Leaderboard {
    entries: Vec<ScoreRecord>,
}

impl Leaderboard {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Build from arbitrary records, restoring order and length
    pub fn from_entries(mut entries: Vec<ScoreRecord>) -> Self {
        entries.sort_by(|a, b| b.score.cmp(&a.score));
        entries.truncate(MAX_LEADERBOARD);
        Self { entries }
    }

    pub fn entries(&self) -> &[ScoreRecord] {
        &self.entries
    }

    pub fn into_entries(self) -> Vec<ScoreRecord> {
        self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if a score would make the board
    pub fn qualifies(&self, score: u64) -> bool {
        if self.entries.len() < MAX_LEADERBOARD {
            return true;
        }
        // Must beat the lowest entry; ties lose to the older record
        self.entries.last().map(|e| score > e.score).unwrap_or(true)
    }

    /// Get the rank a score would achieve (1-indexed, None if doesn't qualify)
    pub fn potential_rank(&self, score: u64) -> Option<usize> {
        if !self.qualifies(score) {
            return None;
        }
        let rank = self.entries.iter().position(|e| score > e.score);
        Some(rank.unwrap_or(self.entries.len()) + 1)
    }

    /// Insert a record; returns the rank achieved (1-indexed) or None if it
    /// fell off the bottom
    pub fn add(&mut self, record: ScoreRecord) -> Option<usize> {
        let pos = self.entries.iter().position(|e| record.score > e.score);
        let rank = match pos {
            Some(i) => {
                self.entries.insert(i, record);
                i + 1
            }
            None => {
                self.entries.push(record);
                self.entries.len()
            }
        };

        self.entries.truncate(MAX_LEADERBOARD);
        (rank <= MAX_LEADERBOARD).then_some(rank)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn top_score(&self) -> Option<u64> {
        self.entries.first().map(|e| e.score)
    }
}

/// Everything stored for one game
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameScore {
    /// Score of the most recent recorded game
    pub current_score: u64,
    pub high_score: u64,
    /// ISO-8601 time of the last update
    pub last_played: String,
    pub play_count: u32,
    pub leaderboard: Leaderboard,
}

impl GameScore {
    /// Zeroed record
    pub fn initial(now_iso: String) -> Self {
        Self {
            current_score: 0,
            high_score: 0,
            last_played: now_iso,
            play_count: 0,
            leaderboard: Leaderboard::new(),
        }
    }

    /// Parse a stored record, tolerating missing or mistyped fields.
    ///
    /// Only invalid JSON is an error. A missing or non-array leaderboard
    /// becomes empty and unreadable entries are dropped.
    pub fn from_json_lenient(json: &str, now_iso: &str) -> Result<Self, serde_json::Error> {
        let value: Value = serde_json::from_str(json)?;

        let leaderboard = match value.get("leaderboard") {
            Some(Value::Array(items)) => items
                .iter()
                .filter_map(|item| ScoreRecord::deserialize(item).ok())
                .collect(),
            _ => {
                log::debug!("Stored score has no leaderboard array, using empty");
                Vec::new()
            }
        };

        Ok(Self {
            current_score: lenient_u64(value.get("currentScore")),
            high_score: lenient_u64(value.get("highScore")),
            last_played: value
                .get("lastPlayed")
                .and_then(Value::as_str)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .unwrap_or_else(|| now_iso.to_string()),
            play_count: lenient_u64(value.get("playCount")).min(u64::from(u32::MAX)) as u32,
            leaderboard: Leaderboard::from_entries(leaderboard),
        })
    }
}

/// Non-negative integer from a JSON number, 0 for anything else
fn lenient_u64(value: Option<&Value>) -> u64 {
    match value {
        Some(v) => v
            .as_u64()
            .or_else(|| v.as_f64().filter(|f| f.is_finite() && *f >= 0.0).map(|f| f as u64))
            .unwrap_or(0),
        None => 0,
    }
}

/// Errors for player name entry
#[derive(Debug, Error, PartialEq, Eq)]
pub enum NameError {
    #[error("player name is empty")]
    Empty,
}

/// A trimmed display name of 1 to 20 characters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerName(String);

impl PlayerName {
    /// Trim and cap to 20 characters; blank input is rejected
    pub fn parse(raw: &str) -> Result<Self, NameError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(NameError::Empty);
        }
        let capped: String = trimmed.chars().take(MAX_NAME_CHARS).collect();
        Ok(Self(capped.trim_end().to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Source of "now" for score records
pub trait Clock {
    /// Unix time in milliseconds
    fn now_ms(&self) -> f64;

    fn now_iso(&self) -> String {
        iso8601_from_millis(self.now_ms())
    }
}

/// Wall clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    #[cfg(target_arch = "wasm32")]
    fn now_ms(&self) -> f64 {
        js_sys::Date::now()
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn now_ms(&self) -> f64 {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_millis() as f64)
            .unwrap_or(0.0)
    }
}

/// Clock frozen at a given instant
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    ms: f64,
}

impl FixedClock {
    pub fn new(ms: f64) -> Self {
        Self { ms }
    }
}

impl Clock for FixedClock {
    fn now_ms(&self) -> f64 {
        self.ms
    }
}

/// UTC instant for Unix milliseconds; out-of-range values fall back to the epoch
fn datetime_from_millis(ms: f64) -> DateTime<Utc> {
    DateTime::<Utc>::from_timestamp_millis(ms.max(0.0) as i64).unwrap_or_default()
}

/// Format Unix milliseconds as `YYYY-MM-DDTHH:MM:SS.mmmZ`
pub fn iso8601_from_millis(ms: f64) -> String {
    datetime_from_millis(ms).to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Format a timestamp as a relative date string
pub fn format_date(timestamp: f64, now: f64) -> String {
    let diff_secs = (now - timestamp) / 1000.0;
    let diff_mins = diff_secs / 60.0;
    let diff_hours = diff_mins / 60.0;
    let diff_days = diff_hours / 24.0;

    if diff_days >= 1.0 {
        let days = diff_days.floor() as i32;
        if days == 1 {
            "Yesterday".to_string()
        } else if days < 7 {
            format!("{} days ago", days)
        } else {
            datetime_from_millis(timestamp).format("%-m/%-d/%y").to_string()
        }
    } else if diff_hours >= 1.0 {
        let hours = diff_hours.floor() as i32;
        if hours == 1 {
            "1 hour ago".to_string()
        } else {
            format!("{} hours ago", hours)
        }
    } else if diff_mins >= 1.0 {
        let mins = diff_mins.floor() as i32;
        if mins == 1 {
            "1 min ago".to_string()
        } else {
            format!("{} mins ago", mins)
        }
    } else {
        "Just now".to_string()
    }
}

/// Reads and writes per-game score data through a key-value store
pub struct ScoreGateway<S: KeyValueStore> {
    store: S,
    clock: Box<dyn Clock>,
}

impl<S: KeyValueStore> ScoreGateway<S> {
    pub fn new(store: S) -> Self {
        Self::with_clock(store, SystemClock)
    }

    pub fn with_clock(store: S, clock: impl Clock + 'static) -> Self {
        Self {
            store,
            clock: Box::new(clock),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    /// Store key for a game's record
    pub fn storage_key(game: GameId) -> String {
        format!("game-score-{}", game.as_str())
    }

    /// Load a game's record; defaults when missing or unreadable
    pub fn load_score(&self, game: GameId) -> GameScore {
        let key = Self::storage_key(game);
        match self.store.get_item(&key) {
            Ok(Some(json)) => match GameScore::from_json_lenient(&json, &self.clock.now_iso()) {
                Ok(score) => score,
                Err(err) => {
                    log::error!("Corrupt score data for {}: {}", game, err);
                    GameScore::initial(self.clock.now_iso())
                }
            },
            Ok(None) => {
                log::debug!("No score data for {}, starting fresh", game);
                GameScore::initial(self.clock.now_iso())
            }
            Err(err) => {
                log::error!("Failed to load score data for {}: {}", game, err);
                GameScore::initial(self.clock.now_iso())
            }
        }
    }

    /// Persist a game's record; failures are logged and dropped
    pub fn save_score(&mut self, game: GameId, score: &GameScore) {
        let key = Self::storage_key(game);
        let result = serde_json::to_string(score)
            .map_err(StorageError::from)
            .and_then(|json| self.store.set_item(&key, &json));
        if let Err(err) = result {
            log::error!("Failed to save score data for {}: {}", game, err);
        }
    }

    /// Record a finished game and return the updated data
    pub fn update_score(&mut self, game: GameId, final_score: u64, player_name: &str) -> GameScore {
        let current = self.load_score(game);
        let now_ms = self.clock.now_ms();
        let now_iso = iso8601_from_millis(now_ms);

        let mut leaderboard = current.leaderboard;
        let rank = leaderboard.add(ScoreRecord {
            name: player_name.to_string(),
            score: final_score,
            date: now_iso.clone(),
            timestamp: now_ms,
        });

        let updated = GameScore {
            current_score: final_score,
            high_score: current.high_score.max(final_score),
            last_played: now_iso,
            play_count: current.play_count.saturating_add(1),
            leaderboard,
        };

        match rank {
            Some(rank) => log::info!(
                "{} scored {} in {} (rank {})",
                player_name,
                final_score,
                game,
                rank
            ),
            None => log::info!("{} scored {} in {}", player_name, final_score, game),
        }

        self.save_score(game, &updated);
        updated
    }

    pub fn high_score(&self, game: GameId) -> u64 {
        self.load_score(game).high_score
    }

    pub fn leaderboard(&self, game: GameId) -> Vec<ScoreRecord> {
        self.load_score(game).leaderboard.into_entries()
    }

    /// High score of every game
    pub fn all_high_scores(&self) -> BTreeMap<GameId, u64> {
        GameId::ALL
            .iter()
            .map(|&game| (game, self.high_score(game)))
            .collect()
    }

    /// Wipe one game's record back to zero
    pub fn reset_game_score(&mut self, game: GameId) {
        let initial = GameScore::initial(self.clock.now_iso());
        self.save_score(game, &initial);
        log::info!("Reset scores for {}", game);
    }

    pub fn reset_all_scores(&mut self) {
        for game in GameId::ALL {
            self.reset_game_score(game);
        }
    }

    /// Last used player name, or the anonymous default
    pub fn player_name(&self) -> String {
        match self.store.get_item(PLAYER_NAME_KEY) {
            Ok(Some(name)) if !name.trim().is_empty() => name,
            Ok(_) => DEFAULT_PLAYER_NAME.to_string(),
            Err(err) => {
                log::warn!("Failed to load player name: {}", err);
                DEFAULT_PLAYER_NAME.to_string()
            }
        }
    }

    pub fn save_player_name(&mut self, name: &str) {
        if let Err(err) = self.store.set_item(PLAYER_NAME_KEY, name) {
            log::error!("Failed to save player name: {}", err);
        }
    }
}
