//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - No rendering, storage or platform dependencies

pub mod chase;
pub mod geometry;
pub mod snake;
pub mod state;
pub mod tetris;

pub use chase::{ChaseInput, ChaseLevel, ChaseState, Guard, GuardMode};
pub use geometry::{Rect, aabb_overlap, circular_distance, overlaps_any};
pub use snake::{Direction, GridSize, SnakeInput, SnakeState};
pub use state::{GameId, GamePhase, Outcome, OutcomeKind, seeded_rng};
pub use tetris::{Board, Piece, TetrisAction, TetrisState, TetrominoKind};
