//! Arcade settings
//!
//! Persisted separately from scores in the same key-value store.

use serde::{Deserialize, Serialize};

use crate::consts::{CHASE_TICK_MS, SNAKE_TICK_MS, TETRIS_KEY_DEBOUNCE_MS};
use crate::persistence::{KeyValueStore, StorageError};
use crate::sim::{ChaseLevel, ChaseState, GridSize, SnakeState, TetrisState};

/// Tunable cadences and board sizing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Snake tick interval (ms)
    pub snake_tick_ms: u64,
    /// Prison-break tick interval (ms)
    pub chase_tick_ms: u64,
    /// Minimum gap between accepted tetris actions (ms)
    pub tetris_key_debounce_ms: u64,

    /// Viewport the snake grid is derived from (px)
    pub viewport_width: u32,
    pub viewport_height: u32,

    /// Fixed RNG seed; random per run when unset
    pub seed: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            snake_tick_ms: SNAKE_TICK_MS,
            chase_tick_ms: CHASE_TICK_MS,
            tetris_key_debounce_ms: TETRIS_KEY_DEBOUNCE_MS,
            viewport_width: 1024,
            viewport_height: 768,
            seed: None,
        }
    }
}

impl Settings {
    /// Store key
    const STORAGE_KEY: &'static str = "arcade_settings";

    /// Load settings from the store, falling back to defaults
    pub fn load(store: &impl KeyValueStore) -> Self {
        match store.get_item(Self::STORAGE_KEY) {
            Ok(Some(json)) => match serde_json::from_str::<Settings>(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings");
                    return settings.sanitized();
                }
                Err(err) => log::warn!("Ignoring unreadable settings: {}", err),
            },
            Ok(None) => {}
            Err(err) => log::warn!("Failed to load settings: {}", err),
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings to the store
    pub fn save(&self, store: &mut impl KeyValueStore) {
        let result = serde_json::to_string(self)
            .map_err(StorageError::from)
            .and_then(|json| store.set_item(Self::STORAGE_KEY, &json));
        match result {
            Ok(()) => log::info!("Settings saved"),
            Err(err) => log::error!("Failed to save settings: {}", err),
        }
    }

    /// Zero intervals would stall the driver
    pub fn sanitized(mut self) -> Self {
        self.snake_tick_ms = self.snake_tick_ms.max(1);
        self.chase_tick_ms = self.chase_tick_ms.max(1);
        self
    }

    /// Configured seed, or `fallback` when none is pinned
    pub fn seed_or(&self, fallback: u64) -> u64 {
        self.seed.unwrap_or(fallback)
    }

    pub fn snake_grid(&self) -> GridSize {
        GridSize::from_viewport(self.viewport_width, self.viewport_height)
    }

    /// Snake session using these settings
    pub fn snake(&self, seed: u64) -> SnakeState {
        let mut state = SnakeState::new(self.snake_grid(), seed);
        state.tick_ms = self.snake_tick_ms;
        state
    }

    /// Tetris session using these settings
    pub fn tetris(&self, seed: u64) -> TetrisState {
        let mut state = TetrisState::new(seed);
        state.key_debounce_ms = self.tetris_key_debounce_ms;
        state
    }

    /// Prison-break session using these settings
    pub fn chase(&self) -> ChaseState {
        let mut state = ChaseState::new(ChaseLevel::prison());
        state.tick_ms = self.chase_tick_ms;
        state
    }
}
