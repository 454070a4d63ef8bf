//! Property tests for engine and leaderboard invariants.
//!
//! Random seeds and input sequences drive each engine; after every tick the
//! structural invariants must still hold.

use std::collections::HashSet;

use proptest::prelude::*;

use mini_arcade::consts::{BOARD_HEIGHT, BOARD_WIDTH, ESCAPE_BONUS, LINES_PER_LEVEL, MAX_LEADERBOARD};
use mini_arcade::persistence::MemoryStore;
use mini_arcade::scores::{FixedClock, ScoreGateway};
use mini_arcade::sim::{chase, snake, tetris};
use mini_arcade::sim::{
    ChaseInput, ChaseLevel, ChaseState, Direction, GridSize, SnakeInput, SnakeState,
    TetrisAction, TetrisState,
};
use mini_arcade::{GameId, GamePhase};

const DIRECTIONS: [Direction; 4] = [
    Direction::Up,
    Direction::Down,
    Direction::Left,
    Direction::Right,
];

const ACTIONS: [Option<TetrisAction>; 6] = [
    None,
    Some(TetrisAction::MoveLeft),
    Some(TetrisAction::MoveRight),
    Some(TetrisAction::SoftDrop),
    Some(TetrisAction::Rotate),
    Some(TetrisAction::HardDrop),
];

proptest! {
    #[test]
    fn snake_body_grows_only_on_apples(
        seed in any::<u64>(),
        side in 4i32..16,
        turns in prop::collection::vec(prop::option::of(0usize..4), 1..300),
    ) {
        let mut state = SnakeState::new(GridSize::new(side, side), seed);
        state.start();

        for turn in turns {
            let before_len = state.body.len();
            let before_score = state.score;
            let mut input = SnakeInput::default();
            if let Some(i) = turn {
                input.press(DIRECTIONS[i], state.direction);
            }
            let outcome = snake::tick(&mut state, &input);

            prop_assert!(state.score >= before_score);
            let unique: HashSet<_> = state.body.iter().collect();
            prop_assert_eq!(unique.len(), state.body.len());
            prop_assert!(state.body.iter().all(|&c| state.grid.contains(c)));

            match state.phase {
                GamePhase::Running => {
                    let grew = state.score > before_score;
                    prop_assert_eq!(state.body.len(), before_len + usize::from(grew));
                    prop_assert!(!state.body.contains(&state.apple));
                }
                GamePhase::GameOver => {
                    prop_assert!(outcome.is_some());
                    prop_assert_eq!(state.score, before_score);
                    break;
                }
                GamePhase::Won => {
                    prop_assert_eq!(state.body.len(), state.grid.cell_count());
                    break;
                }
                GamePhase::NotStarted => prop_assert!(false, "fell back to NotStarted"),
            }
        }
    }

    #[test]
    fn tetris_board_stays_well_formed(
        seed in any::<u64>(),
        moves in prop::collection::vec((0usize..6, 0usize..3), 1..400),
    ) {
        let mut state = TetrisState::new(seed);
        state.start();
        let mut now_ms = 0u64;

        for (action, gravity) in moves {
            let before = (state.score, state.lines);
            now_ms += 60;
            if let Some(action) = ACTIONS[action] {
                tetris::handle_action(&mut state, action, now_ms);
            }
            if gravity > 0 {
                tetris::tick(&mut state);
            }

            prop_assert_eq!(state.board.rows().len(), BOARD_HEIGHT);
            prop_assert!(state.score >= before.0);
            prop_assert!(state.lines >= before.1);
            prop_assert_eq!(state.level, 1 + state.lines / LINES_PER_LEVEL);
            for row in state.board.rows() {
                prop_assert!(row.iter().any(|c| c.is_none()), "full row left on board");
                prop_assert_eq!(row.len(), BOARD_WIDTH);
            }
            if state.phase == GamePhase::GameOver {
                break;
            }
            if let Some(piece) = state.current {
                prop_assert!(!state.board.collides(&piece));
            }
        }
    }

    #[test]
    fn tetris_step_is_pure(seed in any::<u64>(), ticks in 1usize..60) {
        let mut state = TetrisState::new(seed);
        state.start();
        for _ in 0..ticks {
            let snapshot = serde_json::to_string(&state).unwrap();
            let (next, outcome) = tetris::step(&state);
            prop_assert_eq!(serde_json::to_string(&state).unwrap(), snapshot);
            let mut in_place = state.clone();
            prop_assert_eq!(tetris::tick(&mut in_place), outcome);
            prop_assert_eq!(&in_place.board, &next.board);
            state = next;
        }
    }

    #[test]
    fn chase_player_never_enters_walls(
        keys in prop::collection::vec((any::<bool>(), any::<bool>(), any::<bool>(), any::<bool>()), 1..600),
    ) {
        let mut state = ChaseState::new(ChaseLevel::prison());
        state.start();

        for (up, down, left, right) in keys {
            let input = ChaseInput { up, down, left, right };
            let outcome = chase::tick(&mut state, &input);
            prop_assert!(!state.level.is_blocked(state.player));
            prop_assert!(state.score == 0 || state.score == ESCAPE_BONUS);
            if let Some(outcome) = outcome {
                prop_assert_eq!(outcome.game, GameId::PrisonBreak);
                prop_assert!(state.phase.is_terminal());
                break;
            }
        }
    }

    #[test]
    fn leaderboard_sorted_and_bounded(scores in prop::collection::vec(0u64..5_000, 1..30)) {
        let mut gateway = ScoreGateway::with_clock(MemoryStore::new(), FixedClock::new(1_700_000_000_000.0));
        for (i, &score) in scores.iter().enumerate() {
            gateway.update_score(GameId::Snake, score, &format!("p{}", i));
        }

        let data = gateway.load_score(GameId::Snake);
        let board: Vec<u64> = data.leaderboard.entries().iter().map(|e| e.score).collect();
        prop_assert_eq!(board.len(), scores.len().min(MAX_LEADERBOARD));
        prop_assert!(board.windows(2).all(|w| w[0] >= w[1]));
        prop_assert_eq!(data.high_score, *scores.iter().max().unwrap());
        prop_assert_eq!(data.play_count as usize, scores.len());

        let mut expected = scores.clone();
        expected.sort_by(|a, b| b.cmp(a));
        expected.truncate(MAX_LEADERBOARD);
        prop_assert_eq!(board, expected);
    }
}

#[test]
fn rejected_snake_reversal_leaves_state_unchanged() {
    let mut state = SnakeState::new(GridSize::default(), 9);
    state.start();
    let before = serde_json::to_string(&state).unwrap();
    assert!(!state.turn(Direction::Left));
    assert_eq!(serde_json::to_string(&state).unwrap(), before);
}
