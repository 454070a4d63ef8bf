//! Tetris engine
//!
//! Falling-piece board with line clearing. Gravity is a tick; player actions
//! are applied between ticks and rate-limited by a key debounce window.

use glam::IVec2;
use rand::Rng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::state::{GameId, GamePhase, Outcome, seeded_rng};
use crate::consts::*;

/// The seven tetromino kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TetrominoKind {
    I,
    O,
    T,
    S,
    Z,
    J,
    L,
}

impl TetrominoKind {
    pub const ALL: [TetrominoKind; 7] = [
        TetrominoKind::I,
        TetrominoKind::O,
        TetrominoKind::T,
        TetrominoKind::S,
        TetrominoKind::Z,
        TetrominoKind::J,
        TetrominoKind::L,
    ];

    /// Spawn orientation
    pub fn shape(self) -> Shape {
        match self {
            TetrominoKind::I => Shape::from_rows(&[
                &[0, 0, 0, 0],
                &[1, 1, 1, 1],
                &[0, 0, 0, 0],
                &[0, 0, 0, 0],
            ]),
            TetrominoKind::O => Shape::from_rows(&[&[1, 1], &[1, 1]]),
            TetrominoKind::T => Shape::from_rows(&[&[0, 1, 0], &[1, 1, 1], &[0, 0, 0]]),
            TetrominoKind::S => Shape::from_rows(&[&[0, 1, 1], &[1, 1, 0], &[0, 0, 0]]),
            TetrominoKind::Z => Shape::from_rows(&[&[1, 1, 0], &[0, 1, 1], &[0, 0, 0]]),
            TetrominoKind::J => Shape::from_rows(&[&[1, 0, 0], &[1, 1, 1], &[0, 0, 0]]),
            TetrominoKind::L => Shape::from_rows(&[&[0, 0, 1], &[1, 1, 1], &[0, 0, 0]]),
        }
    }

    pub fn random(rng: &mut Pcg32) -> Self {
        Self::ALL[rng.random_range(0..Self::ALL.len())]
    }
}

/// Square occupancy matrix of a piece (2x2, 3x3 or 4x4)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shape {
    size: usize,
    cells: [[bool; 4]; 4],
}

impl Shape {
    fn from_rows(rows: &[&[u8]]) -> Self {
        let mut cells = [[false; 4]; 4];
        for (r, row) in rows.iter().enumerate() {
            for (c, &v) in row.iter().enumerate() {
                cells[r][c] = v != 0;
            }
        }
        Self {
            size: rows.len(),
            cells,
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn is_filled(&self, row: usize, col: usize) -> bool {
        row < self.size && col < self.size && self.cells[row][col]
    }

    /// 90° clockwise: transpose, then reverse each row
    pub fn rotated(&self) -> Shape {
        let n = self.size;
        let mut cells = [[false; 4]; 4];
        for (r, row) in cells.iter_mut().enumerate().take(n) {
            for (c, cell) in row.iter_mut().enumerate().take(n) {
                *cell = self.cells[n - 1 - c][r];
            }
        }
        Shape { size: n, cells }
    }

    /// Filled cells as (col, row) offsets from the anchor
    pub fn filled_cells(&self) -> impl Iterator<Item = IVec2> + '_ {
        (0..self.size).flat_map(move |r| {
            (0..self.size)
                .filter(move |&c| self.cells[r][c])
                .map(move |c| IVec2::new(c as i32, r as i32))
        })
    }
}

/// A tetromino placed on the board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Piece {
    pub kind: TetrominoKind,
    pub shape: Shape,
    /// Top-left anchor of the shape matrix
    pub pos: IVec2,
}

impl Piece {
    /// New piece at the top-center of the board
    pub fn spawn(kind: TetrominoKind) -> Self {
        let shape = kind.shape();
        let x = (BOARD_WIDTH / 2) as i32 - (shape.size() / 2) as i32;
        Self {
            kind,
            shape,
            pos: IVec2::new(x, 0),
        }
    }

    pub fn translated(&self, dx: i32, dy: i32) -> Self {
        Self {
            pos: self.pos + IVec2::new(dx, dy),
            ..*self
        }
    }

    pub fn rotated(&self) -> Self {
        Self {
            shape: self.shape.rotated(),
            ..*self
        }
    }

    /// Board coordinates of every filled cell
    pub fn cells(&self) -> impl Iterator<Item = IVec2> + '_ {
        self.shape.filled_cells().map(move |c| self.pos + c)
    }
}

/// Board cell: empty or the kind of the piece that locked there
pub type Cell = Option<TetrominoKind>;

/// Fixed 10x20 playfield, row 0 at the top
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    rows: Vec<[Cell; BOARD_WIDTH]>,
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Board {
    pub fn new() -> Self {
        Self {
            rows: vec![[None; BOARD_WIDTH]; BOARD_HEIGHT],
        }
    }

    pub fn rows(&self) -> &[[Cell; BOARD_WIDTH]] {
        &self.rows
    }

    pub fn cell(&self, x: usize, y: usize) -> Cell {
        self.rows[y][x]
    }

    pub fn set(&mut self, x: usize, y: usize, cell: Cell) {
        self.rows[y][x] = cell;
    }

    /// True if any filled cell of `piece` is outside the side walls, below
    /// the floor, or on an occupied cell. Cells above row 0 never collide.
    pub fn collides(&self, piece: &Piece) -> bool {
        piece.cells().any(|c| {
            c.x < 0
                || c.x >= BOARD_WIDTH as i32
                || c.y >= BOARD_HEIGHT as i32
                || (c.y >= 0 && self.rows[c.y as usize][c.x as usize].is_some())
        })
    }

    /// Write the piece's in-bounds cells into the board
    pub fn merge(&mut self, piece: &Piece) {
        for c in piece.cells() {
            if c.x >= 0 && c.x < BOARD_WIDTH as i32 && c.y >= 0 && c.y < BOARD_HEIGHT as i32 {
                self.rows[c.y as usize][c.x as usize] = Some(piece.kind);
            }
        }
    }

    /// Remove full rows, refill from the top, return how many were removed
    pub fn clear_lines(&mut self) -> u32 {
        let before = self.rows.len();
        self.rows.retain(|row| row.iter().any(|c| c.is_none()));
        let cleared = before - self.rows.len();
        for _ in 0..cleared {
            self.rows.insert(0, [None; BOARD_WIDTH]);
        }
        cleared as u32
    }

    pub fn is_empty(&self) -> bool {
        self.rows.iter().all(|row| row.iter().all(|c| c.is_none()))
    }
}

/// Player actions, applied outside the gravity tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TetrisAction {
    MoveLeft,
    MoveRight,
    SoftDrop,
    Rotate,
    HardDrop,
}

impl TetrisAction {
    /// Arrows or WASD move, down drops, up rotates, space hard-drops
    pub fn from_key(key: &str) -> Option<TetrisAction> {
        match key {
            "ArrowLeft" | "a" | "A" => Some(TetrisAction::MoveLeft),
            "ArrowRight" | "d" | "D" => Some(TetrisAction::MoveRight),
            "ArrowDown" | "s" | "S" => Some(TetrisAction::SoftDrop),
            "ArrowUp" | "w" | "W" => Some(TetrisAction::Rotate),
            " " | "Space" => Some(TetrisAction::HardDrop),
            _ => None,
        }
    }
}

/// Complete tetris session state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TetrisState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub board: Board,
    pub current: Option<Piece>,
    /// Queued piece shown in the preview
    pub next: Option<Piece>,
    pub score: u64,
    pub level: u32,
    pub lines: u32,
    pub phase: GamePhase,
    /// Gravity tick counter
    pub time_ticks: u64,
    /// Minimum gap between accepted actions (ms)
    pub key_debounce_ms: u64,
    /// Timestamp of the last action that passed the debounce
    last_action_ms: Option<u64>,
    rng: Pcg32,
}

impl TetrisState {
    /// Create a session waiting for `start`
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            board: Board::new(),
            current: None,
            next: None,
            score: 0,
            level: 1,
            lines: 0,
            phase: GamePhase::NotStarted,
            time_ticks: 0,
            key_debounce_ms: TETRIS_KEY_DEBOUNCE_MS,
            last_action_ms: None,
            rng: seeded_rng(seed),
        }
    }

    /// Fresh board, already running
    pub fn restart(&self, seed: u64) -> Self {
        let mut state = Self::new(seed);
        state.key_debounce_ms = self.key_debounce_ms;
        state.start();
        state
    }

    pub fn start(&mut self) {
        if self.phase != GamePhase::NotStarted {
            return;
        }
        self.current = Some(Piece::spawn(TetrominoKind::random(&mut self.rng)));
        self.next = Some(Piece::spawn(TetrominoKind::random(&mut self.rng)));
        self.phase = GamePhase::Running;
        log::info!("Tetris started (seed {})", self.seed);
    }

    /// Rows the current piece can still fall
    pub fn drop_distance(&self) -> i32 {
        let Some(piece) = self.current else {
            return 0;
        };
        let mut dy = 0;
        while !self.board.collides(&piece.translated(0, dy + 1)) {
            dy += 1;
        }
        dy
    }

    /// Current gravity interval (ms)
    pub fn gravity_interval_ms(&self) -> u64 {
        gravity_interval_ms(self.level)
    }
}

/// `max(100, 1000 - (level - 1) * 100)`
pub fn gravity_interval_ms(level: u32) -> u64 {
    let speedup = u64::from(level.saturating_sub(1)) * TETRIS_GRAVITY_STEP_MS;
    TETRIS_BASE_GRAVITY_MS
        .saturating_sub(speedup)
        .max(TETRIS_MIN_GRAVITY_MS)
}

/// Apply a player action at time `now_ms`.
///
/// Returns true if the piece moved. Actions inside the debounce window, on a
/// session that is not running, or that would collide change nothing.
pub fn handle_action(state: &mut TetrisState, action: TetrisAction, now_ms: u64) -> bool {
    if state.phase != GamePhase::Running {
        return false;
    }
    if let Some(last) = state.last_action_ms {
        if now_ms.saturating_sub(last) < state.key_debounce_ms {
            return false;
        }
    }
    state.last_action_ms = Some(now_ms);

    let Some(piece) = state.current else {
        return false;
    };

    let moved = match action {
        TetrisAction::MoveLeft => piece.translated(-1, 0),
        TetrisAction::MoveRight => piece.translated(1, 0),
        TetrisAction::SoftDrop => piece.translated(0, 1),
        TetrisAction::Rotate => piece.rotated(),
        TetrisAction::HardDrop => {
            let rows = state.drop_distance();
            if rows == 0 {
                return false;
            }
            state.score += 2 * rows as u64;
            state.current = Some(piece.translated(0, rows));
            return true;
        }
    };

    if state.board.collides(&moved) {
        return false;
    }
    if action == TetrisAction::SoftDrop {
        state.score += 1;
    }
    state.current = Some(moved);
    true
}

/// Gravity tick: fall one row, or lock, clear lines and spawn the next piece.
pub fn tick(state: &mut TetrisState) -> Option<Outcome> {
    if state.phase != GamePhase::Running {
        return None;
    }
    let piece = state.current?;
    state.time_ticks += 1;

    let fallen = piece.translated(0, 1);
    if !state.board.collides(&fallen) {
        state.current = Some(fallen);
        return None;
    }

    lock_piece(state, piece)
}

fn lock_piece(state: &mut TetrisState, piece: Piece) -> Option<Outcome> {
    state.board.merge(&piece);
    let cleared = state.board.clear_lines();

    state.lines += cleared;
    state.level = state.lines / LINES_PER_LEVEL + 1;
    if cleared > 0 {
        let base = LINE_CLEAR_SCORES[(cleared as usize).min(LINE_CLEAR_SCORES.len() - 1)];
        state.score += base * u64::from(state.level);
        log::debug!(
            "Cleared {} line(s), lines {} level {} score {}",
            cleared,
            state.lines,
            state.level,
            state.score
        );
    }

    let spawned = match state.next.take() {
        Some(next) => next,
        None => Piece::spawn(TetrominoKind::random(&mut state.rng)),
    };

    if state.board.collides(&spawned) {
        state.current = None;
        state.phase = GamePhase::GameOver;
        log::info!("Tetris over with score {} ({} lines)", state.score, state.lines);
        return Some(Outcome::game_over(GameId::Tetris, state.score));
    }

    state.current = Some(spawned);
    state.next = Some(Piece::spawn(TetrominoKind::random(&mut state.rng)));
    None
}

/// Pure form of [`tick`]
pub fn step(state: &TetrisState) -> (TetrisState, Option<Outcome>) {
    let mut next = state.clone();
    let outcome = tick(&mut next);
    (next, outcome)
}

impl crate::driver::Engine for TetrisState {
    type Input = ();

    fn game_id(&self) -> GameId {
        GameId::Tetris
    }

    fn phase(&self) -> GamePhase {
        self.phase
    }

    fn score(&self) -> u64 {
        self.score
    }

    fn start(&mut self) {
        TetrisState::start(self);
    }

    fn tick_interval_ms(&self) -> u64 {
        self.gravity_interval_ms()
    }

    fn tick(&mut self, _input: &()) -> Option<Outcome> {
        tick(self)
    }
}

impl crate::driver::TickDriver<TetrisState> {
    /// Apply a player action between gravity ticks
    pub fn act(&mut self, action: TetrisAction, now_ms: u64) -> bool {
        handle_action(self.engine_mut(), action, now_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::OutcomeKind;

    fn running(seed: u64) -> TetrisState {
        let mut state = TetrisState::new(seed);
        state.start();
        state
    }

    fn fill_row_except(board: &mut Board, y: usize, gap: Option<usize>) {
        for x in 0..BOARD_WIDTH {
            if Some(x) != gap {
                board.set(x, y, Some(TetrominoKind::O));
            }
        }
    }

    /// Vertical I occupying column `col`, rows `top..top + 4`
    fn vertical_i(col: i32, top: i32) -> Piece {
        let mut piece = Piece::spawn(TetrominoKind::I).rotated();
        piece.pos = IVec2::new(col - 2, top);
        piece
    }

    #[test]
    fn test_spawn_positions() {
        assert_eq!(Piece::spawn(TetrominoKind::I).pos, IVec2::new(3, 0));
        assert_eq!(Piece::spawn(TetrominoKind::O).pos, IVec2::new(4, 0));
        assert_eq!(Piece::spawn(TetrominoKind::T).pos, IVec2::new(4, 0));
    }

    #[test]
    fn test_rotation_clockwise() {
        let t = TetrominoKind::T.shape().rotated();
        // .#.      .#.
        // ###  ->  .##
        // ...      .#.
        assert!(t.is_filled(0, 1));
        assert!(t.is_filled(1, 1));
        assert!(t.is_filled(1, 2));
        assert!(t.is_filled(2, 1));
        assert!(!t.is_filled(1, 0));
    }

    #[test]
    fn test_four_rotations_identity() {
        for kind in TetrominoKind::ALL {
            let shape = kind.shape();
            let back = shape.rotated().rotated().rotated().rotated();
            assert_eq!(shape, back, "{:?}", kind);
            assert_eq!(shape.filled_cells().count(), 4);
        }
    }

    #[test]
    fn test_cells_above_board_do_not_collide() {
        let board = Board::new();
        let mut piece = Piece::spawn(TetrominoKind::T);
        piece.pos.y = -1;
        assert!(!board.collides(&piece));
        piece.pos.x = -1;
        assert!(board.collides(&piece));
    }

    #[test]
    fn test_gravity_moves_piece_down() {
        let mut state = running(7);
        let before = state.current.unwrap();
        assert_eq!(tick(&mut state), None);
        assert_eq!(state.current.unwrap().pos, before.pos + IVec2::new(0, 1));
        assert!(state.board.is_empty());
    }

    #[test]
    fn test_single_line_clear() {
        let mut state = running(3);
        fill_row_except(&mut state.board, BOARD_HEIGHT - 1, Some(BOARD_WIDTH - 1));
        state.current = Some(vertical_i(BOARD_WIDTH as i32 - 1, BOARD_HEIGHT as i32 - 4));

        assert_eq!(tick(&mut state), None);
        assert_eq!(state.lines, 1);
        assert_eq!(state.score, 100);
        assert_eq!(state.level, 1);
        assert_eq!(state.board.rows().len(), BOARD_HEIGHT);
        // The three remaining I cells shifted down one row
        for y in BOARD_HEIGHT - 3..BOARD_HEIGHT {
            assert_eq!(state.board.cell(BOARD_WIDTH - 1, y), Some(TetrominoKind::I));
            assert_eq!(state.board.cell(0, y), None);
        }
        assert_eq!(state.board.cell(BOARD_WIDTH - 1, BOARD_HEIGHT - 4), None);
    }

    #[test]
    fn test_four_line_clear_scores_tetris() {
        let mut state = running(3);
        for y in BOARD_HEIGHT - 4..BOARD_HEIGHT {
            fill_row_except(&mut state.board, y, Some(0));
        }
        state.current = Some(vertical_i(0, BOARD_HEIGHT as i32 - 4));
        tick(&mut state);
        assert_eq!(state.lines, 4);
        assert_eq!(state.score, 800);
        assert!(state.board.is_empty());
    }

    #[test]
    fn test_clear_uses_new_level() {
        let mut state = running(3);
        state.lines = 9;
        fill_row_except(&mut state.board, BOARD_HEIGHT - 1, Some(BOARD_WIDTH - 1));
        state.current = Some(vertical_i(BOARD_WIDTH as i32 - 1, BOARD_HEIGHT as i32 - 4));
        tick(&mut state);
        assert_eq!(state.lines, 10);
        assert_eq!(state.level, 2);
        assert_eq!(state.score, 200);
        assert_eq!(state.gravity_interval_ms(), 900);
    }

    #[test]
    fn test_clear_keeps_row_order() {
        let mut board = Board::new();
        board.set(0, 17, Some(TetrominoKind::S));
        fill_row_except(&mut board, 18, None);
        board.set(1, 19, Some(TetrominoKind::Z));
        assert_eq!(board.clear_lines(), 1);
        assert_eq!(board.rows().len(), BOARD_HEIGHT);
        assert_eq!(board.cell(0, 18), Some(TetrominoKind::S));
        assert_eq!(board.cell(1, 19), Some(TetrominoKind::Z));
    }

    #[test]
    fn test_lock_promotes_next_piece() {
        let mut state = running(11);
        let queued = state.next.unwrap();
        let mut grounded = state.current.unwrap();
        grounded.pos.y = BOARD_HEIGHT as i32 - 4;
        let grounded = grounded.translated(0, state_drop(&state.board, &grounded));
        state.current = Some(grounded);
        tick(&mut state);
        assert_eq!(state.current, Some(queued));
        assert!(state.next.is_some());
        assert!(!state.board.is_empty());
    }

    fn state_drop(board: &Board, piece: &Piece) -> i32 {
        let mut dy = 0;
        while !board.collides(&piece.translated(0, dy + 1)) {
            dy += 1;
        }
        dy
    }

    #[test]
    fn test_spawn_collision_is_game_over() {
        let mut state = running(5);
        fill_row_except(&mut state.board, 0, Some(BOARD_WIDTH - 1));
        fill_row_except(&mut state.board, 1, Some(BOARD_WIDTH - 1));
        let mut o = Piece::spawn(TetrominoKind::O);
        o.pos = IVec2::new(0, BOARD_HEIGHT as i32 - 2);
        state.current = Some(o);
        state.next = Some(Piece::spawn(TetrominoKind::T));
        state.score = 50;

        let outcome = tick(&mut state).expect("spawn blocked");
        assert_eq!(outcome.kind, OutcomeKind::GameOver);
        assert_eq!(outcome.score, 50);
        assert_eq!(state.phase, GamePhase::GameOver);
        assert_eq!(state.current, None);

        // Absorbing
        let frozen = state.board.clone();
        assert_eq!(tick(&mut state), None);
        assert!(!handle_action(&mut state, TetrisAction::MoveLeft, 10_000));
        assert_eq!(state.board, frozen);
    }

    #[test]
    fn test_rejected_move_leaves_state_unchanged() {
        let mut state = running(1);
        let mut o = Piece::spawn(TetrominoKind::O);
        o.pos.x = 0;
        state.current = Some(o);
        let board = state.board.clone();
        assert!(!handle_action(&mut state, TetrisAction::MoveLeft, 1000));
        assert_eq!(state.current, Some(o));
        assert_eq!(state.board, board);
        assert_eq!(state.score, 0);
        assert_eq!(state.phase, GamePhase::Running);
    }

    #[test]
    fn test_rotation_blocked_by_stack() {
        let mut state = running(1);
        let mut i = Piece::spawn(TetrominoKind::I);
        i.pos = IVec2::new(6, 0);
        state.current = Some(i);
        state.board.set(8, 3, Some(TetrominoKind::L));
        assert!(!handle_action(&mut state, TetrisAction::Rotate, 1000));
        assert_eq!(state.current, Some(i));

        state.board.set(8, 3, None);
        assert!(handle_action(&mut state, TetrisAction::Rotate, 2000));
        assert_eq!(state.current.unwrap().shape, i.shape.rotated());
    }

    #[test]
    fn test_debounce_window() {
        let mut state = running(1);
        state.current = Some(Piece::spawn(TetrominoKind::O));
        assert!(handle_action(&mut state, TetrisAction::MoveLeft, 1000));
        assert!(!handle_action(&mut state, TetrisAction::MoveLeft, 1010));
        assert!(handle_action(&mut state, TetrisAction::MoveLeft, 1060));
        assert_eq!(state.current.unwrap().pos.x, 2);
    }

    #[test]
    fn test_soft_drop_scores_one() {
        let mut state = running(1);
        state.current = Some(Piece::spawn(TetrominoKind::O));
        assert!(handle_action(&mut state, TetrisAction::SoftDrop, 0));
        assert_eq!(state.score, 1);
        assert_eq!(state.current.unwrap().pos.y, 1);
    }

    #[test]
    fn test_hard_drop_scores_and_defers_lock() {
        let mut state = running(1);
        state.current = Some(Piece::spawn(TetrominoKind::O));
        assert!(handle_action(&mut state, TetrisAction::HardDrop, 0));
        assert_eq!(state.score, 2 * (BOARD_HEIGHT as u64 - 2));
        assert_eq!(state.current.unwrap().pos.y, BOARD_HEIGHT as i32 - 2);
        assert!(state.board.is_empty());

        // Still movable until gravity locks it
        assert!(handle_action(&mut state, TetrisAction::MoveRight, 100));
        tick(&mut state);
        assert_eq!(state.board.cell(5, BOARD_HEIGHT - 1), Some(TetrominoKind::O));
        assert_eq!(state.board.cell(6, BOARD_HEIGHT - 1), Some(TetrominoKind::O));
    }

    #[test]
    fn test_soft_drop_on_floor_is_rejected() {
        let mut state = running(1);
        let mut o = Piece::spawn(TetrominoKind::O);
        o.pos.y = BOARD_HEIGHT as i32 - 2;
        state.current = Some(o);
        assert!(!handle_action(&mut state, TetrisAction::SoftDrop, 0));
        assert_eq!(state.current, Some(o));
        assert_eq!(state.score, 0);
        assert!(state.board.is_empty());
    }

    #[test]
    fn test_hard_drop_without_room_is_rejected() {
        let mut state = running(1);
        let mut o = Piece::spawn(TetrominoKind::O);
        o.pos.y = BOARD_HEIGHT as i32 - 2;
        state.current = Some(o);
        assert_eq!(state.drop_distance(), 0);
        assert!(!handle_action(&mut state, TetrisAction::HardDrop, 0));
        assert_eq!(state.current, Some(o));
        assert_eq!(state.score, 0);
        assert!(state.board.is_empty());
    }

    #[test]
    fn test_key_mapping() {
        assert_eq!(TetrisAction::from_key("ArrowLeft"), Some(TetrisAction::MoveLeft));
        assert_eq!(TetrisAction::from_key("a"), Some(TetrisAction::MoveLeft));
        assert_eq!(TetrisAction::from_key("D"), Some(TetrisAction::MoveRight));
        assert_eq!(TetrisAction::from_key("s"), Some(TetrisAction::SoftDrop));
        assert_eq!(TetrisAction::from_key("W"), Some(TetrisAction::Rotate));
        assert_eq!(TetrisAction::from_key(" "), Some(TetrisAction::HardDrop));
        assert_eq!(TetrisAction::from_key("q"), None);
    }

    #[test]
    fn test_gravity_interval() {
        assert_eq!(gravity_interval_ms(1), 1000);
        assert_eq!(gravity_interval_ms(5), 600);
        assert_eq!(gravity_interval_ms(10), 100);
        assert_eq!(gravity_interval_ms(25), 100);
    }

    #[test]
    fn test_same_seed_same_pieces() {
        let a = running(99);
        let b = running(99);
        assert_eq!(a.current, b.current);
        assert_eq!(a.next, b.next);
    }
}
