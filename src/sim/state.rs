//! Types shared by every engine
//!
//! Phase machine, game identity and the terminal outcome handed to the driver.

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

/// Lifecycle of one game session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GamePhase {
    /// Waiting for the explicit start transition
    #[default]
    NotStarted,
    /// Ticks advance the simulation
    Running,
    /// Lost; absorbing
    GameOver,
    /// Won; absorbing
    Won,
}

impl GamePhase {
    /// True for GameOver and Won
    pub fn is_terminal(&self) -> bool {
        matches!(self, GamePhase::GameOver | GamePhase::Won)
    }
}

/// Which game a score belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum GameId {
    #[serde(rename = "prison-break")]
    PrisonBreak,
    #[serde(rename = "snake")]
    Snake,
    #[serde(rename = "tetris")]
    Tetris,
}

impl GameId {
    pub const ALL: [GameId; 3] = [GameId::PrisonBreak, GameId::Snake, GameId::Tetris];

    pub fn as_str(&self) -> &'static str {
        match self {
            GameId::PrisonBreak => "prison-break",
            GameId::Snake => "snake",
            GameId::Tetris => "tetris",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "prison-break" | "prison" | "chase" => Some(GameId::PrisonBreak),
            "snake" => Some(GameId::Snake),
            "tetris" => Some(GameId::Tetris),
            _ => None,
        }
    }
}

impl std::fmt::Display for GameId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutcomeKind {
    GameOver,
    Won,
}

/// Final result, produced once on the tick that enters a terminal phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Outcome {
    pub game: GameId,
    pub kind: OutcomeKind,
    /// Frozen final score
    pub score: u64,
}

impl Outcome {
    pub fn game_over(game: GameId, score: u64) -> Self {
        Self {
            game,
            kind: OutcomeKind::GameOver,
            score,
        }
    }

    pub fn won(game: GameId, score: u64) -> Self {
        Self {
            game,
            kind: OutcomeKind::Won,
            score,
        }
    }

    /// Phase the engine is left in
    pub fn phase(&self) -> GamePhase {
        match self.kind {
            OutcomeKind::GameOver => GamePhase::GameOver,
            OutcomeKind::Won => GamePhase::Won,
        }
    }
}

/// Seeded per-instance RNG
pub fn seeded_rng(seed: u64) -> Pcg32 {
    Pcg32::seed_from_u64(seed)
}
