//! Browser bindings
//!
//! One exported wrapper per game. JavaScript owns the animation frame loop
//! and forwards elapsed time and key events; state comes back as JSON
//! snapshots. Scores and settings live in LocalStorage.

use glam::{IVec2, Vec2};
use serde::Serialize;
use wasm_bindgen::prelude::*;

use crate::driver::{Engine, TickDriver, submit_outcome};
use crate::persistence::LocalStorageStore;
use crate::scores::{GameScore, ScoreGateway};
use crate::settings::Settings;
use crate::sim::chase::ChaseInput;
use crate::sim::geometry::Rect;
use crate::sim::tetris::Cell;
use crate::sim::{
    ChaseState, Direction, GameId, GamePhase, GridSize, Outcome, SnakeState, TetrisAction,
    TetrisState, TetrominoKind,
};

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        web_sys::console::warn_1(&"logger already initialized".into());
    }
    log::info!("Mini Arcade ready");
}

fn gateway() -> ScoreGateway<LocalStorageStore> {
    ScoreGateway::new(LocalStorageStore::new())
}

fn load_settings() -> Settings {
    Settings::load(&LocalStorageStore::new())
}

fn fresh_seed(settings: &Settings) -> u64 {
    settings.seed_or(js_sys::Date::now() as u64)
}

fn to_json<T: Serialize>(value: &T) -> Result<String, JsValue> {
    serde_json::to_string(value).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Shared plumbing for the exported wrappers
struct Session<E: Engine> {
    driver: TickDriver<E>,
    submitted: bool,
}

impl<E: Engine> Session<E> {
    fn new(engine: E) -> Self {
        Self {
            driver: TickDriver::new(engine),
            submitted: false,
        }
    }

    fn reset(&mut self, engine: E) {
        self.driver.reset(engine);
        self.submitted = false;
    }

    /// True on the call that ends the game
    fn advance(&mut self, elapsed_ms: f64) -> bool {
        self.driver.advance(elapsed_ms.max(0.0) as u64).is_some()
    }

    /// Record the finished game under `name`; `None` discards it
    fn submit(&mut self, name: Option<String>) -> Result<Option<GameScore>, JsValue> {
        let Some(outcome) = self.driver.outcome() else {
            return Err(JsValue::from_str("game is still running"));
        };
        if self.submitted {
            return Err(JsValue::from_str("score already submitted"));
        }
        self.submitted = true;

        let mut prompt = move |_: &Outcome, _: &str| name.clone();
        Ok(submit_outcome(&outcome, &mut gateway(), &mut prompt))
    }
}

// === Snake ===

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SnakeView<'a> {
    grid: GridSize,
    body: Vec<IVec2>,
    apple: IVec2,
    direction: Direction,
    score: u64,
    phase: GamePhase,
    #[serde(skip_serializing_if = "Option::is_none")]
    outcome: Option<&'a Outcome>,
}

#[wasm_bindgen]
pub struct SnakeGame {
    settings: Settings,
    session: Session<SnakeState>,
}

#[wasm_bindgen]
impl SnakeGame {
    /// Board sized from the viewport
    #[wasm_bindgen(constructor)]
    pub fn new(viewport_width: u32, viewport_height: u32) -> SnakeGame {
        let mut settings = load_settings();
        settings.viewport_width = viewport_width;
        settings.viewport_height = viewport_height;
        let seed = fresh_seed(&settings);
        let session = Session::new(settings.snake(seed));
        Self { settings, session }
    }

    pub fn start(&mut self) {
        self.session.driver.start();
    }

    pub fn restart(&mut self) {
        let seed = fresh_seed(&self.settings);
        self.session.reset(self.settings.snake(seed));
        self.session.driver.start();
    }

    pub fn advance(&mut self, elapsed_ms: f64) -> bool {
        self.session.advance(elapsed_ms)
    }

    /// Returns true if the key was used
    #[wasm_bindgen(js_name = keyDown)]
    pub fn key_down(&mut self, key: &str) -> bool {
        Direction::from_key(key)
            .map(|dir| self.session.driver.steer(dir))
            .unwrap_or(false)
    }

    pub fn snapshot(&self) -> Result<String, JsValue> {
        let state = self.session.driver.engine();
        let outcome = self.session.driver.outcome();
        to_json(&SnakeView {
            grid: state.grid,
            body: state.body.iter().copied().collect(),
            apple: state.apple,
            direction: state.direction,
            score: state.score,
            phase: state.phase,
            outcome: outcome.as_ref(),
        })
    }

    #[wasm_bindgen(js_name = submitScore)]
    pub fn submit_score(&mut self, name: Option<String>) -> Result<String, JsValue> {
        to_json(&self.session.submit(name)?)
    }
}

// === Tetris ===

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct TetrisView<'a> {
    board: &'a [[Cell; crate::consts::BOARD_WIDTH]],
    current: Vec<IVec2>,
    current_kind: Option<TetrominoKind>,
    ghost: Vec<IVec2>,
    next: Option<TetrominoKind>,
    score: u64,
    level: u32,
    lines: u32,
    phase: GamePhase,
}

#[wasm_bindgen]
pub struct TetrisGame {
    settings: Settings,
    session: Session<TetrisState>,
}

#[wasm_bindgen]
impl TetrisGame {
    #[wasm_bindgen(constructor)]
    pub fn new() -> TetrisGame {
        let settings = load_settings();
        let seed = fresh_seed(&settings);
        let session = Session::new(settings.tetris(seed));
        Self { settings, session }
    }

    pub fn start(&mut self) {
        self.session.driver.start();
    }

    pub fn restart(&mut self) {
        let seed = fresh_seed(&self.settings);
        self.session.reset(self.settings.tetris(seed));
        self.session.driver.start();
    }

    pub fn advance(&mut self, elapsed_ms: f64) -> bool {
        self.session.advance(elapsed_ms)
    }

    /// Returns true if the key produced an accepted action
    #[wasm_bindgen(js_name = keyDown)]
    pub fn key_down(&mut self, key: &str) -> bool {
        let Some(action) = TetrisAction::from_key(key) else {
            return false;
        };
        self.session.driver.act(action, js_sys::Date::now() as u64)
    }

    pub fn snapshot(&self) -> Result<String, JsValue> {
        let state = self.session.driver.engine();
        let drop = state.drop_distance();
        to_json(&TetrisView {
            board: state.board.rows(),
            current: state.current.map(|p| p.cells().collect()).unwrap_or_default(),
            current_kind: state.current.map(|p| p.kind),
            ghost: state
                .current
                .map(|p| p.translated(0, drop).cells().collect())
                .unwrap_or_default(),
            next: state.next.map(|p| p.kind),
            score: state.score,
            level: state.level,
            lines: state.lines,
            phase: state.phase,
        })
    }

    #[wasm_bindgen(js_name = submitScore)]
    pub fn submit_score(&mut self, name: Option<String>) -> Result<String, JsValue> {
        to_json(&self.session.submit(name)?)
    }
}

impl Default for TetrisGame {
    fn default() -> Self {
        Self::new()
    }
}

// === Prison break ===

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ChaseView<'a> {
    size: Vec2,
    walls: &'a [Rect],
    exit: Rect,
    player: Vec2,
    guard: Vec2,
    chasing: bool,
    score: u64,
    phase: GamePhase,
}

#[wasm_bindgen]
pub struct PrisonBreakGame {
    settings: Settings,
    session: Session<ChaseState>,
}

#[wasm_bindgen]
impl PrisonBreakGame {
    #[wasm_bindgen(constructor)]
    pub fn new() -> PrisonBreakGame {
        let settings = load_settings();
        let session = Session::new(settings.chase());
        Self { settings, session }
    }

    pub fn start(&mut self) {
        self.session.driver.start();
    }

    pub fn restart(&mut self) {
        self.session.reset(self.settings.chase());
        self.session.driver.start();
    }

    pub fn advance(&mut self, elapsed_ms: f64) -> bool {
        self.session.advance(elapsed_ms)
    }

    #[wasm_bindgen(js_name = keyDown)]
    pub fn key_down(&mut self, key: &str) -> bool {
        self.set_key(key, true)
    }

    #[wasm_bindgen(js_name = keyUp)]
    pub fn key_up(&mut self, key: &str) -> bool {
        self.set_key(key, false)
    }

    fn set_key(&mut self, key: &str, pressed: bool) -> bool {
        let Some(dir) = Direction::from_key(key) else {
            return false;
        };
        let input: &mut ChaseInput = self.session.driver.input_mut();
        match dir {
            Direction::Up => input.up = pressed,
            Direction::Down => input.down = pressed,
            Direction::Left => input.left = pressed,
            Direction::Right => input.right = pressed,
        }
        true
    }

    pub fn snapshot(&self) -> Result<String, JsValue> {
        let state = self.session.driver.engine();
        to_json(&ChaseView {
            size: state.level.size,
            walls: &state.level.walls,
            exit: state.level.exit,
            player: state.player,
            guard: state.guard.pos,
            chasing: state.guard.is_chasing(),
            score: state.score,
            phase: state.phase,
        })
    }

    #[wasm_bindgen(js_name = submitScore)]
    pub fn submit_score(&mut self, name: Option<String>) -> Result<String, JsValue> {
        to_json(&self.session.submit(name)?)
    }
}

impl Default for PrisonBreakGame {
    fn default() -> Self {
        Self::new()
    }
}

// === Scores ===

fn parse_game(game: &str) -> Result<GameId, JsValue> {
    GameId::from_str(game).ok_or_else(|| JsValue::from_str(&format!("unknown game '{}'", game)))
}

#[wasm_bindgen(js_name = playerName)]
pub fn player_name() -> String {
    gateway().player_name()
}

#[wasm_bindgen(js_name = highScores)]
pub fn high_scores() -> Result<String, JsValue> {
    to_json(&gateway().all_high_scores())
}

#[wasm_bindgen(js_name = gameScore)]
pub fn game_score(game: &str) -> Result<String, JsValue> {
    to_json(&gateway().load_score(parse_game(game)?))
}

/// Rank a score would reach, 0 if it misses the board
#[wasm_bindgen(js_name = potentialRank)]
pub fn potential_rank(game: &str, score: f64) -> Result<u32, JsValue> {
    let board = gateway().load_score(parse_game(game)?).leaderboard;
    Ok(board.potential_rank(score.max(0.0) as u64).unwrap_or(0) as u32)
}

/// Reset one game, or every game when `game` is omitted
#[wasm_bindgen(js_name = resetScores)]
pub fn reset_scores(game: Option<String>) -> Result<(), JsValue> {
    let mut gateway = gateway();
    match game {
        Some(game) => gateway.reset_game_score(parse_game(&game)?),
        None => gateway.reset_all_scores(),
    }
    Ok(())
}
