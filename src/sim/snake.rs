//! Snake engine
//!
//! Grid-based self-avoiding path that grows by one cell per apple.

use std::collections::VecDeque;

use glam::IVec2;
use rand::Rng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::state::{GameId, GamePhase, Outcome, seeded_rng};
use crate::consts::*;

/// Heading of the snake
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Unit step in grid coordinates (y grows down)
    pub fn delta(self) -> IVec2 {
        match self {
            Direction::Up => IVec2::new(0, -1),
            Direction::Down => IVec2::new(0, 1),
            Direction::Left => IVec2::new(-1, 0),
            Direction::Right => IVec2::new(1, 0),
        }
    }

    pub fn opposite(self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    /// Arrow keys and WASD, by `KeyboardEvent.key`
    pub fn from_key(key: &str) -> Option<Direction> {
        match key {
            "ArrowUp" | "w" | "W" => Some(Direction::Up),
            "ArrowDown" | "s" | "S" => Some(Direction::Down),
            "ArrowLeft" | "a" | "A" => Some(Direction::Left),
            "ArrowRight" | "d" | "D" => Some(Direction::Right),
            _ => None,
        }
    }
}

/// Playfield dimensions in cells
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "GridDims")]
pub struct GridSize {
    pub width: i32,
    pub height: i32,
}

impl GridSize {
    /// Cells per side of the square layout
    const CELLS_PER_SIDE: u32 = 40;
    /// Smallest playable grid
    const MIN_CELLS: i32 = 2;
    /// Largest grid per axis; one cell per pixel of the widest board
    const MAX_CELLS: i32 = 1200;

    pub fn new(width: i32, height: i32) -> Self {
        Self {
            width: width.clamp(Self::MIN_CELLS, Self::MAX_CELLS),
            height: height.clamp(Self::MIN_CELLS, Self::MAX_CELLS),
        }
    }

    /// Derive the grid from the browser viewport.
    ///
    /// The board is the largest square that fits beside the page padding and
    /// navigation bar, divided into whole cells of `side / 40` pixels.
    pub fn from_viewport(width: u32, height: u32) -> Self {
        let side = width.saturating_sub(48).min(1200).min(height.saturating_sub(80));
        let cell = (side / Self::CELLS_PER_SIDE).max(1);
        let cells = (side / cell) as i32;
        Self::new(cells, cells)
    }

    pub fn cell_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    pub fn contains(&self, cell: IVec2) -> bool {
        cell.x >= 0 && cell.x < self.width && cell.y >= 0 && cell.y < self.height
    }

    fn index(&self, cell: IVec2) -> usize {
        (cell.y * self.width + cell.x) as usize
    }

    fn cell_at(&self, index: usize) -> IVec2 {
        let i = index as i32;
        IVec2::new(i % self.width, i / self.width)
    }
}

/// Unchecked wire form; deserializing goes through [`GridSize::new`]
#[derive(Deserialize)]
struct GridDims {
    width: i32,
    height: i32,
}

impl From<GridDims> for GridSize {
    fn from(dims: GridDims) -> Self {
        GridSize::new(dims.width, dims.height)
    }
}

impl Default for GridSize {
    fn default() -> Self {
        Self::new(Self::CELLS_PER_SIDE as i32, Self::CELLS_PER_SIDE as i32)
    }
}

/// Input sampled at a tick boundary
#[derive(Debug, Clone, Copy, Default)]
pub struct SnakeInput {
    /// Latest buffered turn
    pub turn: Option<Direction>,
}

impl SnakeInput {
    /// Buffer a key press. Presses that reverse the committed heading are
    /// dropped so an earlier valid press in the same tick survives.
    pub fn press(&mut self, dir: Direction, committed: Direction) -> bool {
        if dir == committed.opposite() {
            return false;
        }
        self.turn = Some(dir);
        true
    }
}

/// Complete snake session state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnakeState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub grid: GridSize,
    /// Body cells, head first
    pub body: VecDeque<IVec2>,
    pub apple: IVec2,
    /// Last committed heading
    pub direction: Direction,
    pub score: u64,
    pub phase: GamePhase,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Tick interval (ms)
    pub tick_ms: u64,
    rng: Pcg32,
}

impl SnakeState {
    /// Create a session waiting for `start`
    pub fn new(grid: GridSize, seed: u64) -> Self {
        let mut rng = seeded_rng(seed);
        let head = IVec2::new(10.min(grid.width - 1), 10.min(grid.height - 1));
        let mut body = VecDeque::new();
        body.push_back(head);

        let preferred = IVec2::new(15.min(grid.width - 1), 15.min(grid.height - 1));
        let apple = if preferred != head {
            preferred
        } else {
            random_empty_cell(&grid, &body, &mut rng).unwrap_or(preferred)
        };

        Self {
            seed,
            grid,
            body,
            apple,
            direction: Direction::Right,
            score: 0,
            phase: GamePhase::NotStarted,
            time_ticks: 0,
            tick_ms: SNAKE_TICK_MS,
            rng,
        }
    }

    /// Same grid and cadence, fresh board, already running
    pub fn restart(&self, seed: u64) -> Self {
        let mut state = Self::new(self.grid, seed);
        state.tick_ms = self.tick_ms;
        state.start();
        state
    }

    pub fn start(&mut self) {
        if self.phase == GamePhase::NotStarted {
            self.phase = GamePhase::Running;
            log::info!(
                "Snake started on {}x{} grid (seed {})",
                self.grid.width,
                self.grid.height,
                self.seed
            );
        }
    }

    pub fn head(&self) -> IVec2 {
        self.body[0]
    }

    /// Commit a turn unless it reverses the current heading
    pub fn turn(&mut self, dir: Direction) -> bool {
        if dir == self.direction.opposite() {
            return false;
        }
        self.direction = dir;
        true
    }

    fn finish(&mut self, outcome: Outcome) -> Option<Outcome> {
        self.phase = outcome.phase();
        log::info!("Snake finished: {:?} with score {}", outcome.kind, outcome.score);
        Some(outcome)
    }
}

/// Pick a uniformly random cell not covered by the body
fn random_empty_cell(grid: &GridSize, body: &VecDeque<IVec2>, rng: &mut Pcg32) -> Option<IVec2> {
    let mut occupied = vec![false; grid.cell_count()];
    for &cell in body {
        if grid.contains(cell) {
            occupied[grid.index(cell)] = true;
        }
    }
    let free = occupied.iter().filter(|o| !**o).count();
    if free == 0 {
        return None;
    }
    let pick = rng.random_range(0..free);
    occupied
        .iter()
        .enumerate()
        .filter(|(_, o)| !**o)
        .nth(pick)
        .map(|(i, _)| grid.cell_at(i))
}

/// Advance the snake by one tick.
///
/// Returns the outcome on the tick that ends the game; terminal and
/// not-started states are left untouched.
pub fn tick(state: &mut SnakeState, input: &SnakeInput) -> Option<Outcome> {
    if state.phase != GamePhase::Running {
        return None;
    }

    if let Some(dir) = input.turn {
        state.turn(dir);
    }
    state.time_ticks += 1;

    let head = state.head() + state.direction.delta();

    if !state.grid.contains(head) {
        log::debug!("Snake hit the wall at {:?}", head);
        let score = state.score;
        return state.finish(Outcome::game_over(GameId::Snake, score));
    }

    if state.body.contains(&head) {
        log::debug!("Snake bit itself at {:?}", head);
        let score = state.score;
        return state.finish(Outcome::game_over(GameId::Snake, score));
    }

    state.body.push_front(head);

    if head == state.apple {
        state.score += SNAKE_APPLE_SCORE;
        log::debug!("Apple eaten, length {} score {}", state.body.len(), state.score);

        if state.body.len() >= state.grid.cell_count() {
            state.score += SNAKE_WIN_BONUS;
            let score = state.score;
            return state.finish(Outcome::won(GameId::Snake, score));
        }

        if let Some(cell) = random_empty_cell(&state.grid, &state.body, &mut state.rng) {
            state.apple = cell;
        }
    } else {
        state.body.pop_back();
    }

    None
}

/// Pure form of [`tick`]: returns the next state and leaves `state` alone
pub fn step(state: &SnakeState, input: &SnakeInput) -> (SnakeState, Option<Outcome>) {
    let mut next = state.clone();
    let outcome = tick(&mut next, input);
    (next, outcome)
}

impl crate::driver::Engine for SnakeState {
    type Input = SnakeInput;

    fn game_id(&self) -> GameId {
        GameId::Snake
    }

    fn phase(&self) -> GamePhase {
        self.phase
    }

    fn score(&self) -> u64 {
        self.score
    }

    fn start(&mut self) {
        SnakeState::start(self);
    }

    fn tick_interval_ms(&self) -> u64 {
        self.tick_ms
    }

    fn tick(&mut self, input: &SnakeInput) -> Option<Outcome> {
        tick(self, input)
    }

    fn clear_one_shot(input: &mut SnakeInput) {
        input.turn = None;
    }
}

impl crate::driver::TickDriver<SnakeState> {
    /// Buffer a turn for the next tick, checked against the committed heading
    pub fn steer(&mut self, dir: Direction) -> bool {
        if self.engine().phase != GamePhase::Running {
            return false;
        }
        let committed = self.engine().direction;
        self.input_mut().press(dir, committed)
    }
}
