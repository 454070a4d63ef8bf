//! Mini Arcade entry point
//!
//! Natively this plays headless autopilot rounds of one game and records the
//! results in a directory of JSON files. The browser build drives the engines
//! through the library's `web` module instead.

#[cfg(target_arch = "wasm32")]
fn main() {}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> anyhow::Result<()> {
    native::run()
}

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::collections::{HashMap, VecDeque};
    use std::path::PathBuf;

    use anyhow::{Context, Result, bail};
    use clap::Parser;
    use glam::{IVec2, Vec2};

    use mini_arcade::consts::{BOARD_HEIGHT, BOARD_WIDTH, BODY_SIZE, PLAYER_SPEED};
    use mini_arcade::driver::{NamePrompt, TickDriver, submit_outcome};
    use mini_arcade::persistence::{FileStore, KeyValueStore};
    use mini_arcade::scores::{Clock, ScoreGateway, SystemClock, format_date};
    use mini_arcade::sim::{
        Board, ChaseInput, ChaseLevel, ChaseState, Direction, Rect, SnakeState, TetrisAction,
        TetrisState, aabb_overlap,
    };
    use mini_arcade::{Engine, GameId, Outcome, Settings};

    #[derive(Parser, Debug)]
    #[command(
        name = "mini-arcade",
        version,
        about = "Play headless autopilot rounds and keep the leaderboards"
    )]
    struct Opts {
        /// Game to play: snake, tetris or prison-break
        #[arg(long, short, default_value = "snake", value_parser = parse_game)]
        game: GameId,

        /// RNG seed; overrides the stored settings
        #[arg(long)]
        seed: Option<u64>,

        /// Number of rounds to play
        #[arg(long, default_value_t = 1)]
        rounds: u32,

        /// Abandon a round after this many ticks
        #[arg(long, default_value_t = 50_000)]
        max_ticks: u64,

        /// Directory holding scores and settings
        #[arg(long, default_value = ".mini-arcade")]
        data_dir: PathBuf,

        /// Name to record scores under (defaults to the saved name)
        #[arg(long)]
        name: Option<String>,

        /// Wipe all stored scores first
        #[arg(long)]
        reset: bool,

        /// Print every leaderboard and exit
        #[arg(long)]
        show: bool,
    }

    fn parse_game(s: &str) -> Result<GameId, String> {
        GameId::from_str(s).ok_or_else(|| format!("unknown game '{}'", s))
    }

    /// Uses the name given on the command line, else the saved one
    struct CliPrompt {
        name: Option<String>,
    }

    impl NamePrompt for CliPrompt {
        fn request_name(&mut self, _outcome: &Outcome, suggested: &str) -> Option<String> {
            Some(self.name.clone().unwrap_or_else(|| suggested.to_string()))
        }
    }

    pub fn run() -> Result<()> {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
        let opts = Opts::parse();

        std::fs::create_dir_all(&opts.data_dir)
            .with_context(|| format!("creating data directory {}", opts.data_dir.display()))?;

        let store = FileStore::new(&opts.data_dir);
        let settings = Settings::load(&store);
        let mut gateway = ScoreGateway::new(store);

        if opts.reset {
            gateway.reset_all_scores();
        }
        if opts.show {
            for game in GameId::ALL {
                print_leaderboard(&gateway, game);
            }
            return Ok(());
        }
        if opts.rounds == 0 {
            bail!("--rounds must be at least 1");
        }

        let base_seed = opts
            .seed
            .unwrap_or_else(|| settings.seed_or(SystemClock.now_ms() as u64));
        log::info!(
            "Playing {} round(s) of {} from seed {}",
            opts.rounds,
            opts.game,
            base_seed
        );

        let mut prompt = CliPrompt {
            name: opts.name.clone(),
        };
        for round in 0..opts.rounds {
            let seed = base_seed.wrapping_add(u64::from(round));
            let outcome = match opts.game {
                GameId::Snake => play_snake(settings.snake(seed), opts.max_ticks),
                GameId::Tetris => play_tetris(settings.tetris(seed), opts.max_ticks),
                GameId::PrisonBreak => play_chase(settings.chase(), opts.max_ticks),
            };

            let Some(outcome) = outcome else {
                log::warn!(
                    "Round {} hit the {} tick limit, not recorded",
                    round + 1,
                    opts.max_ticks
                );
                continue;
            };
            if let Some(data) = submit_outcome(&outcome, &mut gateway, &mut prompt) {
                println!(
                    "round {}: {:?} with {} points (high score {})",
                    round + 1,
                    outcome.kind,
                    outcome.score,
                    data.high_score
                );
            }
        }

        print_leaderboard(&gateway, opts.game);
        Ok(())
    }

    fn print_leaderboard<S: KeyValueStore>(gateway: &ScoreGateway<S>, game: GameId) {
        let data = gateway.load_score(game);
        println!(
            "\n{}: high score {} over {} play(s)",
            game, data.high_score, data.play_count
        );
        let now = SystemClock.now_ms();
        for (i, entry) in data.leaderboard.entries().iter().enumerate() {
            println!(
                "{:>2}. {:<20} {:>8}  {}",
                i + 1,
                entry.name,
                entry.score,
                format_date(entry.timestamp, now)
            );
        }
    }

    // === Snake ===

    fn play_snake(state: SnakeState, max_ticks: u64) -> Option<Outcome> {
        let mut driver = TickDriver::new(state);
        driver.start();
        for _ in 0..max_ticks {
            if let Some(dir) = snake_move(driver.engine()) {
                driver.steer(dir);
            }
            if let Some(outcome) = driver.tick_once() {
                return Some(outcome);
            }
        }
        None
    }

    /// Greedy: the safe neighbour closest to the apple
    fn snake_move(state: &SnakeState) -> Option<Direction> {
        let head = state.head();
        [Direction::Up, Direction::Down, Direction::Left, Direction::Right]
            .into_iter()
            .filter(|&dir| dir != state.direction.opposite())
            .filter(|&dir| {
                let next = head + dir.delta();
                state.grid.contains(next) && !state.body.contains(&next)
            })
            .min_by_key(|&dir| {
                let d = (head + dir.delta() - state.apple).abs();
                d.x + d.y
            })
    }

    // === Tetris ===

    fn play_tetris(state: TetrisState, max_ticks: u64) -> Option<Outcome> {
        let mut driver = TickDriver::new(state);
        driver.start();
        let action_gap = driver.engine().key_debounce_ms.max(1);
        let mut now_ms = 0;

        for _ in 0..max_ticks {
            if let Some(actions) = plan_placement(driver.engine()) {
                for action in actions {
                    now_ms += action_gap;
                    driver.act(action, now_ms);
                }
            }
            now_ms += driver.engine().tick_interval_ms();
            if let Some(outcome) = driver.tick_once() {
                return Some(outcome);
            }
        }
        None
    }

    /// Try every reachable rotation and column for the current piece and
    /// return the actions reaching the best resting spot.
    ///
    /// Candidates replay the emitted actions: rotations happen in place
    /// first, then one column at a time, so a blocked step prunes the
    /// candidate instead of silently changing the placement.
    fn plan_placement(state: &TetrisState) -> Option<Vec<TetrisAction>> {
        let mut piece = state.current?;
        let width = BOARD_WIDTH as i32;
        let mut best: Option<(i64, usize, i32)> = None;

        for rotations in 0..4 {
            if rotations > 0 {
                let turned = piece.rotated();
                if state.board.collides(&turned) {
                    break;
                }
                piece = turned;
            }

            for shift in -width..=width {
                let step = shift.signum();
                let mut moved = piece;
                let reachable = (0..shift.abs()).all(|_| {
                    let next = moved.translated(step, 0);
                    let free = !state.board.collides(&next);
                    if free {
                        moved = next;
                    }
                    free
                });
                if !reachable {
                    continue;
                }

                let mut landed = moved;
                while !state.board.collides(&landed.translated(0, 1)) {
                    landed = landed.translated(0, 1);
                }

                let mut board = state.board.clone();
                board.merge(&landed);
                let cleared = board.clear_lines();
                let value = evaluate(&board, cleared);
                if best.is_none_or(|(b, _, _)| value > b) {
                    best = Some((value, rotations, shift));
                }
            }
        }

        let (_, rotations, shift) = best?;
        let sideways = if shift < 0 {
            TetrisAction::MoveLeft
        } else {
            TetrisAction::MoveRight
        };
        let mut actions = vec![TetrisAction::Rotate; rotations];
        actions.extend(std::iter::repeat_n(sideways, shift.unsigned_abs() as usize));
        actions.push(TetrisAction::HardDrop);
        Some(actions)
    }

    /// Higher is better: reward cleared lines, punish height, holes and
    /// uneven columns
    fn evaluate(board: &Board, cleared: u32) -> i64 {
        let mut heights = [0i64; BOARD_WIDTH];
        let mut holes = 0i64;
        for (x, height) in heights.iter_mut().enumerate() {
            let mut seen_block = false;
            for y in 0..BOARD_HEIGHT {
                if board.cell(x, y).is_some() {
                    if !seen_block {
                        *height = (BOARD_HEIGHT - y) as i64;
                        seen_block = true;
                    }
                } else if seen_block {
                    holes += 1;
                }
            }
        }
        let aggregate: i64 = heights.iter().sum();
        let bumpiness: i64 = heights.windows(2).map(|w| (w[0] - w[1]).abs()).sum();

        i64::from(cleared) * 760 - aggregate * 51 - holes * 356 - bumpiness * 18
    }

    // === Prison break ===

    fn play_chase(state: ChaseState, max_ticks: u64) -> Option<Outcome> {
        let route = escape_route(&state.level, state.player).unwrap_or_else(|| {
            log::warn!("No route to the exit");
            Vec::new()
        });
        let mut steps = route.into_iter();

        let mut driver = TickDriver::new(state);
        driver.start();
        for _ in 0..max_ticks {
            *driver.input_mut() = steps.next().map(hold).unwrap_or_default();
            if let Some(outcome) = driver.tick_once() {
                return Some(outcome);
            }
        }
        None
    }

    fn hold(dir: Direction) -> ChaseInput {
        ChaseInput {
            up: dir == Direction::Up,
            down: dir == Direction::Down,
            left: dir == Direction::Left,
            right: dir == Direction::Right,
        }
    }

    /// Breadth-first search over single-key moves from `start` until the
    /// player's box touches the exit. Ignores the guard.
    fn escape_route(level: &ChaseLevel, start: Vec2) -> Option<Vec<Direction>> {
        let key = |p: Vec2| IVec2::new(p.x.round() as i32, p.y.round() as i32);
        let mut parents: HashMap<IVec2, (Vec2, Direction)> = HashMap::new();
        let mut queue = VecDeque::from([start]);
        parents.insert(key(start), (start, Direction::Right));

        while let Some(pos) = queue.pop_front() {
            if aabb_overlap(&Rect::centered(pos, BODY_SIZE), &level.exit) {
                let mut route = Vec::new();
                let mut at = pos;
                while key(at) != key(start) {
                    let (prev, dir) = parents[&key(at)];
                    route.push(dir);
                    at = prev;
                }
                route.reverse();
                return Some(route);
            }

            for dir in [Direction::Up, Direction::Down, Direction::Left, Direction::Right] {
                let step = dir.delta().as_vec2() * PLAYER_SPEED;
                let next = (pos + step).clamp(Vec2::ZERO, level.size);
                if next == pos || level.is_blocked(next) || parents.contains_key(&key(next)) {
                    continue;
                }
                parents.insert(key(next), (pos, dir));
                queue.push_back(next);
            }
        }
        None
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        use mini_arcade::sim::tetris::handle_action;
        use mini_arcade::sim::{Piece, TetrominoKind};

        #[test]
        fn test_escape_route_reaches_exit() {
            let level = ChaseLevel::prison();
            let route = escape_route(&level, level.player_start).expect("exit reachable");
            assert!(!route.is_empty());
        }

        #[test]
        fn test_planner_ends_with_hard_drop() {
            let mut state = TetrisState::new(1);
            state.start();
            let actions = plan_placement(&state).expect("piece in play");
            assert_eq!(actions.last(), Some(&TetrisAction::HardDrop));
        }

        #[test]
        fn test_planner_skips_rotation_blocked_at_spawn() {
            let mut state = TetrisState::new(1);
            state.start();
            state.current = Some(Piece::spawn(TetrominoKind::I));
            // Upright I would cover column 5, rows 0-3
            state.board.set(5, 3, Some(TetrominoKind::L));
            assert!(state.board.collides(&Piece::spawn(TetrominoKind::I).rotated()));

            let actions = plan_placement(&state).expect("piece in play");
            assert!(!actions.contains(&TetrisAction::Rotate));

            // The plan lands where the candidate was scored
            let mut played = state.clone();
            for (i, action) in actions.iter().enumerate() {
                let now_ms = 1000 * (i as u64 + 1);
                assert!(handle_action(&mut played, *action, now_ms), "{:?} blocked", action);
            }
            assert_eq!(played.drop_distance(), 0);
        }

        #[test]
        fn test_snake_autopilot_scores() {
            let mut driver = TickDriver::new(Settings::default().snake(5));
            driver.start();
            for _ in 0..200 {
                if let Some(dir) = snake_move(driver.engine()) {
                    driver.steer(dir);
                }
                driver.tick_once();
            }
            assert!(driver.engine().score >= 10);
        }
    }
}
