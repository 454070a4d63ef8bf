//! Mini Arcade - simulation cores for three browser mini-games
//!
//! Core modules:
//! - `sim`: Deterministic tick-based engines (snake, tetris, prison-break)
//! - `driver`: Fixed-interval tick scheduling and terminal-state hand-off
//! - `scores`: Per-game score records and top-10 leaderboards
//! - `persistence`: Key-value stores backing the score gateway
//! - `settings`: Tunable cadences and viewport

pub mod driver;
pub mod persistence;
pub mod scores;
pub mod settings;
pub mod sim;
#[cfg(target_arch = "wasm32")]
pub mod web;

pub use driver::{Engine, NamePrompt, TickDriver};
pub use scores::{GameScore, Leaderboard, ScoreGateway, ScoreRecord};
pub use settings::Settings;
pub use sim::{GameId, GamePhase, Outcome, OutcomeKind};

/// Game configuration constants
pub mod consts {
    /// Max ticks a driver runs per `advance` call to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Snake tick interval (ms)
    pub const SNAKE_TICK_MS: u64 = 150;
    /// Points per apple
    pub const SNAKE_APPLE_SCORE: u64 = 10;
    /// Bonus for filling the whole grid
    pub const SNAKE_WIN_BONUS: u64 = 1000;

    /// Tetris board dimensions
    pub const BOARD_WIDTH: usize = 10;
    pub const BOARD_HEIGHT: usize = 20;
    /// Gravity interval at level 1 (ms)
    pub const TETRIS_BASE_GRAVITY_MS: u64 = 1000;
    /// Gravity speed-up per level (ms)
    pub const TETRIS_GRAVITY_STEP_MS: u64 = 100;
    /// Fastest gravity interval (ms)
    pub const TETRIS_MIN_GRAVITY_MS: u64 = 100;
    /// Minimum gap between two accepted key actions (ms)
    pub const TETRIS_KEY_DEBOUNCE_MS: u64 = 50;
    /// Points by number of rows cleared in one lock, multiplied by level
    pub const LINE_CLEAR_SCORES: [u64; 5] = [0, 100, 300, 500, 800];
    /// Lines per level
    pub const LINES_PER_LEVEL: u32 = 10;

    /// Prison-break tick interval (ms, ~60 Hz)
    pub const CHASE_TICK_MS: u64 = 16;
    /// Arena size (px)
    pub const ARENA_WIDTH: f32 = 900.0;
    pub const ARENA_HEIGHT: f32 = 600.0;
    /// Player and guard bounding box edge (px)
    pub const BODY_SIZE: f32 = 6.0;
    /// Player speed (px per tick, per axis)
    pub const PLAYER_SPEED: f32 = 2.0;
    /// Guard speeds (px per tick)
    pub const GUARD_PATROL_SPEED: f32 = 1.0;
    pub const GUARD_CHASE_SPEED: f32 = 1.5;
    /// Guard starts chasing below this distance
    pub const DETECTION_RANGE: f32 = 80.0;
    /// Guard gives up above DETECTION_RANGE * LOSE_TRACK_FACTOR
    pub const LOSE_TRACK_FACTOR: f32 = 1.5;
    /// Distance at which a patrol waypoint counts as reached
    pub const WAYPOINT_ARRIVAL: f32 = 10.0;
    /// Player and guard radii combined
    pub const CATCH_DISTANCE: f32 = 12.0;
    /// Bonus for reaching the exit
    pub const ESCAPE_BONUS: u64 = 1000;

    /// Leaderboard length
    pub const MAX_LEADERBOARD: usize = 10;
    /// Longest accepted player name (chars)
    pub const MAX_NAME_CHARS: usize = 20;
    /// Name used when none has been saved
    pub const DEFAULT_PLAYER_NAME: &str = "익명";
}
