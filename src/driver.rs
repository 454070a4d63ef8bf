//! Fixed-interval tick driver
//!
//! Turns wall-clock time into whole simulation ticks for one game instance,
//! holds the input sampled between ticks, and stops for good once the engine
//! reaches a terminal phase.

use crate::consts::MAX_SUBSTEPS;
use crate::persistence::KeyValueStore;
use crate::scores::{GameScore, PlayerName, ScoreGateway};
use crate::sim::{GameId, GamePhase, Outcome};

/// A tick-based game simulation
pub trait Engine {
    /// Input snapshot consumed by one tick
    type Input: Default + Clone;

    fn game_id(&self) -> GameId;
    fn phase(&self) -> GamePhase;
    fn score(&self) -> u64;
    /// NotStarted -> Running
    fn start(&mut self);
    /// Interval until the next tick; may change between ticks
    fn tick_interval_ms(&self) -> u64;
    /// Advance one tick; returns the outcome on the tick that ends the game
    fn tick(&mut self, input: &Self::Input) -> Option<Outcome>;
    /// Reset inputs that must only count for one tick
    fn clear_one_shot(_input: &mut Self::Input) {}
}

/// Drives one engine instance from elapsed time
pub struct TickDriver<E: Engine> {
    engine: E,
    input: E::Input,
    accumulator_ms: u64,
    outcome: Option<Outcome>,
}

impl<E: Engine> TickDriver<E> {
    pub fn new(engine: E) -> Self {
        Self {
            engine,
            input: E::Input::default(),
            accumulator_ms: 0,
            outcome: None,
        }
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut E {
        &mut self.engine
    }

    /// Input accumulated for the next tick
    pub fn input(&self) -> &E::Input {
        &self.input
    }

    pub fn input_mut(&mut self) -> &mut E::Input {
        &mut self.input
    }

    pub fn start(&mut self) {
        self.engine.start();
    }

    /// Replace the engine (restart) and clear timing and input
    pub fn reset(&mut self, engine: E) {
        *self = Self::new(engine);
    }

    /// Outcome of the finished game, if it has finished
    pub fn outcome(&self) -> Option<Outcome> {
        self.outcome
    }

    /// True once no further ticks will run
    pub fn is_stopped(&self) -> bool {
        self.engine.phase().is_terminal()
    }

    /// Feed elapsed wall-clock time; runs every tick that came due.
    ///
    /// At most `MAX_SUBSTEPS` ticks run per call; older backlog is dropped.
    /// Returns the outcome on the call that ends the game.
    pub fn advance(&mut self, elapsed_ms: u64) -> Option<Outcome> {
        if self.engine.phase() != GamePhase::Running {
            return None;
        }

        let cap = self
            .engine
            .tick_interval_ms()
            .max(1)
            .saturating_mul(u64::from(MAX_SUBSTEPS));
        self.accumulator_ms = self.accumulator_ms.saturating_add(elapsed_ms).min(cap);

        let mut substeps = 0;
        while substeps < MAX_SUBSTEPS {
            let interval = self.engine.tick_interval_ms().max(1);
            if self.accumulator_ms < interval {
                break;
            }
            self.accumulator_ms -= interval;
            substeps += 1;

            if let Some(outcome) = self.tick_once() {
                return Some(outcome);
            }
        }
        None
    }

    /// Run exactly one tick regardless of elapsed time
    pub fn tick_once(&mut self) -> Option<Outcome> {
        if self.engine.phase() != GamePhase::Running {
            return None;
        }
        let outcome = self.engine.tick(&self.input);
        E::clear_one_shot(&mut self.input);

        if let Some(outcome) = outcome {
            self.accumulator_ms = 0;
            self.outcome = Some(outcome);
        }
        outcome
    }
}

/// Asks the player for a display name after a game ends
pub trait NamePrompt {
    /// `suggested` is the last saved name. `None` means the prompt was
    /// cancelled and the score must be discarded.
    fn request_name(&mut self, outcome: &Outcome, suggested: &str) -> Option<String>;
}

impl<F> NamePrompt for F
where
    F: FnMut(&Outcome, &str) -> Option<String>,
{
    fn request_name(&mut self, outcome: &Outcome, suggested: &str) -> Option<String> {
        self(outcome, suggested)
    }
}

/// Prompt that always accepts the suggested name
#[derive(Debug, Clone, Copy, Default)]
pub struct AcceptSuggested;

impl NamePrompt for AcceptSuggested {
    fn request_name(&mut self, _outcome: &Outcome, suggested: &str) -> Option<String> {
        Some(suggested.to_string())
    }
}

/// Hand a terminal outcome to the prompt and record it.
///
/// Returns the updated score data, or `None` if the prompt was cancelled or
/// returned an unusable name.
pub fn submit_outcome<S, P>(
    outcome: &Outcome,
    gateway: &mut ScoreGateway<S>,
    prompt: &mut P,
) -> Option<GameScore>
where
    S: KeyValueStore,
    P: NamePrompt + ?Sized,
{
    let suggested = gateway.player_name();
    let Some(raw) = prompt.request_name(outcome, &suggested) else {
        log::info!(
            "Name entry cancelled, discarding {} score {}",
            outcome.game,
            outcome.score
        );
        return None;
    };

    let name = match PlayerName::parse(&raw) {
        Ok(name) => name,
        Err(err) => {
            log::warn!("Rejected player name {:?}: {}", raw, err);
            return None;
        }
    };

    gateway.save_player_name(name.as_str());
    Some(gateway.update_score(outcome.game, outcome.score, name.as_str()))
}
