//! Prison-break engine
//!
//! Continuous-space escape: the player walks to the exit while a guard
//! patrols fixed waypoints and gives chase when the player gets close.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::geometry::{Rect, aabb_overlap, circular_distance, overlaps_any};
use super::state::{GameId, GamePhase, Outcome};
use crate::consts::*;

/// Static layout of a level
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChaseLevel {
    /// Arena extent; positions are clamped to `[0, size]`
    pub size: Vec2,
    pub walls: Vec<Rect>,
    pub exit: Rect,
    pub player_start: Vec2,
    pub guard_start: Vec2,
    /// Guard patrol route, walked cyclically
    pub patrol: Vec<Vec2>,
}

impl ChaseLevel {
    /// The prison map
    pub fn prison() -> Self {
        let walls = vec![
            // Outer walls
            Rect::new(0.0, 0.0, 900.0, 6.0),
            Rect::new(0.0, 594.0, 900.0, 6.0),
            Rect::new(0.0, 0.0, 6.0, 600.0),
            Rect::new(894.0, 0.0, 6.0, 600.0),
            // Corridors
            Rect::new(30.0, 30.0, 192.0, 6.0),
            Rect::new(60.0, 60.0, 6.0, 192.0),
            Rect::new(90.0, 90.0, 288.0, 6.0),
            Rect::new(120.0, 120.0, 6.0, 144.0),
            // Cell bars
            Rect::new(60.0, 180.0, 192.0, 12.0),
            Rect::new(60.0, 180.0, 12.0, 96.0),
            Rect::new(102.0, 180.0, 12.0, 96.0),
            Rect::new(60.0, 198.0, 192.0, 12.0),
            // Obstacles
            Rect::new(150.0, 150.0, 36.0, 36.0),
            Rect::new(300.0, 222.0, 36.0, 36.0),
            Rect::new(222.0, 300.0, 36.0, 36.0),
            Rect::new(450.0, 372.0, 36.0, 36.0),
        ];

        Self {
            size: Vec2::new(ARENA_WIDTH, ARENA_HEIGHT),
            walls,
            exit: Rect::centered(Vec2::new(825.0, 525.0), 48.0),
            player_start: Vec2::new(50.0, 50.0),
            guard_start: Vec2::new(300.0, 200.0),
            patrol: vec![
                Vec2::new(300.0, 200.0),
                Vec2::new(500.0, 200.0),
                Vec2::new(500.0, 300.0),
                Vec2::new(300.0, 300.0),
            ],
        }
    }

    /// True if a body centered at `pos` would overlap a wall
    pub fn is_blocked(&self, pos: Vec2) -> bool {
        overlaps_any(pos, BODY_SIZE, &self.walls)
    }
}

impl Default for ChaseLevel {
    fn default() -> Self {
        Self::prison()
    }
}

/// Guard behavior
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GuardMode {
    #[default]
    Patrol,
    Chase,
}

impl GuardMode {
    /// Mode after seeing the player at `distance`.
    ///
    /// Chase starts below the detection range and only ends beyond 1.5x that
    /// range; in between the current mode is kept.
    pub fn next(self, distance: f32) -> GuardMode {
        if distance < DETECTION_RANGE {
            GuardMode::Chase
        } else if distance > DETECTION_RANGE * LOSE_TRACK_FACTOR {
            GuardMode::Patrol
        } else {
            self
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Guard {
    pub pos: Vec2,
    pub mode: GuardMode,
    pub patrol: Vec<Vec2>,
    /// Index of the waypoint being walked to
    pub waypoint: usize,
}

impl Guard {
    pub fn new(pos: Vec2, patrol: Vec<Vec2>) -> Self {
        Self {
            pos,
            mode: GuardMode::Patrol,
            patrol,
            waypoint: 0,
        }
    }

    pub fn is_chasing(&self) -> bool {
        self.mode == GuardMode::Chase
    }

    /// One AI step against the player's current position
    pub fn update(&mut self, player: Vec2, level: &ChaseLevel) {
        let mode = self.mode.next(circular_distance(player, self.pos));
        if mode != self.mode {
            log::debug!("Guard switched {:?} -> {:?} at {:?}", self.mode, mode, self.pos);
            self.mode = mode;
        }

        match self.mode {
            GuardMode::Chase => self.walk_toward(player, GUARD_CHASE_SPEED, level),
            GuardMode::Patrol => {
                let Some(&target) = self.patrol.get(self.waypoint) else {
                    return;
                };
                if circular_distance(target, self.pos) < WAYPOINT_ARRIVAL {
                    self.waypoint = (self.waypoint + 1) % self.patrol.len();
                } else {
                    self.walk_toward(target, GUARD_PATROL_SPEED, level);
                }
            }
        }
    }

    fn walk_toward(&mut self, target: Vec2, speed: f32, level: &ChaseLevel) {
        let dir = (target - self.pos).normalize_or_zero();
        if dir == Vec2::ZERO {
            return;
        }
        let candidate = self.pos + dir * speed;
        if !level.is_blocked(candidate) {
            self.pos = candidate;
        }
    }
}

/// Held movement keys, sampled at the tick boundary
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ChaseInput {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
}

/// Complete prison-break session state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChaseState {
    pub level: ChaseLevel,
    pub player: Vec2,
    pub guard: Guard,
    pub score: u64,
    pub phase: GamePhase,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Tick interval (ms)
    pub tick_ms: u64,
}

impl ChaseState {
    /// Create a session on `level` waiting for `start`
    pub fn new(level: ChaseLevel) -> Self {
        let guard = Guard::new(level.guard_start, level.patrol.clone());
        Self {
            player: level.player_start,
            guard,
            level,
            score: 0,
            phase: GamePhase::NotStarted,
            time_ticks: 0,
            tick_ms: CHASE_TICK_MS,
        }
    }

    /// Same level and cadence, everyone back at the start, already running
    pub fn restart(&self) -> Self {
        let mut state = Self::new(self.level.clone());
        state.tick_ms = self.tick_ms;
        state.start();
        state
    }

    pub fn start(&mut self) {
        if self.phase == GamePhase::NotStarted {
            self.phase = GamePhase::Running;
            log::info!("Prison break started");
        }
    }

    /// Player bounding box
    pub fn player_box(&self) -> Rect {
        Rect::centered(self.player, BODY_SIZE)
    }

    fn finish(&mut self, outcome: Outcome) -> Option<Outcome> {
        self.phase = outcome.phase();
        log::info!(
            "Prison break finished: {:?} with score {}",
            outcome.kind,
            outcome.score
        );
        Some(outcome)
    }
}

/// Move the player one tick. Each axis is validated on its own so sliding
/// along a wall still works when the diagonal is blocked.
fn move_player(state: &mut ChaseState, input: &ChaseInput) {
    let level = &state.level;
    let mut pos = state.player;

    if input.up {
        let test = Vec2::new(pos.x, (pos.y - PLAYER_SPEED).max(0.0));
        if !level.is_blocked(test) {
            pos = test;
        }
    }
    if input.down {
        let test = Vec2::new(pos.x, (pos.y + PLAYER_SPEED).min(level.size.y));
        if !level.is_blocked(test) {
            pos = test;
        }
    }
    if input.left {
        let test = Vec2::new((pos.x - PLAYER_SPEED).max(0.0), pos.y);
        if !level.is_blocked(test) {
            pos = test;
        }
    }
    if input.right {
        let test = Vec2::new((pos.x + PLAYER_SPEED).min(level.size.x), pos.y);
        if !level.is_blocked(test) {
            pos = test;
        }
    }

    state.player = pos;
}

/// Advance the escape by one tick.
///
/// Order: player movement, exit check, capture check, guard AI.
pub fn tick(state: &mut ChaseState, input: &ChaseInput) -> Option<Outcome> {
    if state.phase != GamePhase::Running {
        return None;
    }
    state.time_ticks += 1;

    move_player(state, input);

    if aabb_overlap(&state.player_box(), &state.level.exit) {
        state.score += ESCAPE_BONUS;
        let score = state.score;
        return state.finish(Outcome::won(GameId::PrisonBreak, score));
    }

    if circular_distance(state.player, state.guard.pos) < CATCH_DISTANCE {
        let score = state.score;
        return state.finish(Outcome::game_over(GameId::PrisonBreak, score));
    }

    let player = state.player;
    state.guard.update(player, &state.level);
    None
}

/// Pure form of [`tick`]
pub fn step(state: &ChaseState, input: &ChaseInput) -> (ChaseState, Option<Outcome>) {
    let mut next = state.clone();
    let outcome = tick(&mut next, input);
    (next, outcome)
}

impl crate::driver::Engine for ChaseState {
    type Input = ChaseInput;

    fn game_id(&self) -> GameId {
        GameId::PrisonBreak
    }

    fn phase(&self) -> GamePhase {
        self.phase
    }

    fn score(&self) -> u64 {
        self.score
    }

    fn start(&mut self) {
        ChaseState::start(self);
    }

    fn tick_interval_ms(&self) -> u64 {
        self.tick_ms
    }

    fn tick(&mut self, input: &ChaseInput) -> Option<Outcome> {
        tick(self, input)
    }
}
