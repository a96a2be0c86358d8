use rand::{SeedableRng, rngs::StdRng};

use crate::{
    board::{Direction, Grid},
    search::Expectimax,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameOutcome {
    pub grid: Grid,
    /// Sum of all merge gains.
    pub score: u64,
    pub moves: Vec<Direction>,
}

/// What happened during one turn of [`Game::step`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// The move was played and a tile spawned.
    Moved(Direction),
    /// No move changes the grid.
    GameOver,
    /// The move was played but no cell was left to spawn into.
    NoSpace(Direction),
}

/// A game in progress. Owns the only random source, so equal seeds replay equal games.
pub struct Game {
    grid: Grid,
    score: u64,
    moves: Vec<Direction>,
    rng: StdRng,
}

impl Game {
    /// Starts from `start`, or from an empty grid with two spawned tiles.
    pub fn new(start: Option<Grid>, seed: Option<u64>) -> Self {
        let mut rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };

        let grid = start.unwrap_or_else(|| {
            let mut grid = Grid::EMPTY;
            for _ in 0..2 {
                grid = grid.spawn_random(&mut rng).unwrap_or(grid);
            }
            grid
        });

        Self {
            grid,
            score: 0,
            moves: Vec::new(),
            rng,
        }
    }

    pub fn step(&mut self, engine: &mut Expectimax) -> Step {
        if !self.grid.can_move() {
            return Step::GameOver;
        }

        let Some(best) = engine.search(self.grid) else {
            return Step::GameOver;
        };

        let swipe = self.grid.swipe(best.direction);
        debug_assert!(swipe.moved);

        self.grid = swipe.grid;
        self.score += swipe.score;
        self.moves.push(best.direction);

        log::debug!(
            "Move #{}: {} (expected {:.1}, +{})",
            self.moves.len(),
            best.direction,
            best.value,
            swipe.score
        );

        match self.grid.spawn_random(&mut self.rng) {
            Some(grid) => {
                self.grid = grid;
                Step::Moved(best.direction)
            }
            None => Step::NoSpace(best.direction),
        }
    }

    pub fn grid(&self) -> Grid {
        self.grid
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn moves(&self) -> &[Direction] {
        &self.moves
    }

    pub fn into_outcome(self) -> GameOutcome {
        GameOutcome {
            grid: self.grid,
            score: self.score,
            moves: self.moves,
        }
    }
}

/// Play until no move is legal, no cell is free, or `max_steps` moves were made.
pub fn solve(
    engine: &mut Expectimax,
    start: Option<Grid>,
    seed: Option<u64>,
    max_steps: usize,
) -> GameOutcome {
    solve_with(engine, start, seed, max_steps, |_, _| {})
}

/// Like [`solve`], calling `on_step` after every turn.
pub fn solve_with(
    engine: &mut Expectimax,
    start: Option<Grid>,
    seed: Option<u64>,
    max_steps: usize,
    mut on_step: impl FnMut(&Game, &Expectimax),
) -> GameOutcome {
    let mut game = Game::new(start, seed);

    for _ in 0..max_steps {
        let step = game.step(engine);
        on_step(&game, engine);

        match step {
            Step::Moved(_) => {}
            Step::GameOver | Step::NoSpace(_) => break,
        }
    }

    log::info!(
        "Finished after {} moves with score {}, max tile {}",
        game.moves().len(),
        game.score(),
        game.grid().max_value()
    );

    game.into_outcome()
}

#[cfg(test)]
mod test {
    use super::{Game, Step, solve, solve_with};
    use crate::{
        board::Grid,
        search::{Expectimax, HeuristicConfig, SearchConfig},
    };

    fn engine() -> Expectimax {
        Expectimax::new(
            HeuristicConfig::default(),
            SearchConfig {
                depth_base: 1,
                depth_bonus: 1,
                ..Default::default()
            },
        )
    }

    #[test]
    fn test_zero_steps() {
        let start = Grid::from_values([[2, 0, 0, 0], [0; 4], [0; 4], [0, 0, 0, 4]]).unwrap();

        let outcome = solve(&mut engine(), Some(start), Some(1), 0);
        assert_eq!(outcome.grid, start);
        assert_eq!(outcome.score, 0);
        assert!(outcome.moves.is_empty());
    }

    #[test]
    fn test_zero_steps_fresh_board() {
        let outcome = solve(&mut engine(), None, Some(1), 0);

        assert_eq!(outcome.grid.num_empty(), 14);
        assert!(outcome.moves.is_empty());
        assert_eq!(outcome.score, 0);
    }

    #[test]
    fn test_stuck_start() {
        let start =
            Grid::from_values([[2, 4, 2, 4], [4, 2, 4, 2], [2, 4, 2, 4], [4, 2, 4, 2]]).unwrap();

        let mut engine = engine();
        let mut game = Game::new(Some(start), Some(3));
        assert_eq!(game.step(&mut engine), Step::GameOver);
        // Rejected before searching.
        assert_eq!(engine.last_stats().nodes, 0);

        let outcome = solve(&mut engine, Some(start), Some(3), 100);
        assert_eq!(outcome.grid, start);
        assert_eq!(outcome.score, 0);
        assert!(outcome.moves.is_empty());
    }

    #[test]
    fn test_step_budget() {
        // Twelve tiles can never fill the board, so every turn has a move.
        let outcome = solve(&mut engine(), None, Some(8), 10);

        assert_eq!(outcome.moves.len(), 10);
        assert!(outcome.grid.num_empty() >= 4);
    }

    #[test]
    fn test_solve_with_reports_every_turn() {
        let mut seen = Vec::new();
        let outcome = solve_with(&mut engine(), None, Some(8), 10, |game, engine| {
            seen.push((game.moves().len(), game.score(), engine.last_stats().depth));
        });

        assert_eq!(seen.len(), 10);
        assert!(seen.iter().enumerate().all(|(i, &(moves, _, _))| moves == i + 1));
        assert_eq!(seen.last().map(|s| s.1), Some(outcome.score));
        assert!(seen.iter().all(|&(_, _, depth)| depth >= 1));

        let plain = solve(&mut engine(), None, Some(8), 10);
        assert_eq!(plain, outcome);
    }

    #[test]
    fn test_step_spawns() {
        let start = Grid::from_values([[0; 4], [0; 4], [0; 4], [2, 2, 0, 0]]).unwrap();
        let mut game = Game::new(Some(start), Some(5));

        let Step::Moved(direction) = game.step(&mut engine()) else {
            panic!("a move is available");
        };
        let swipe = start.swipe(direction);

        assert_eq!(game.score(), swipe.score);
        assert_eq!(game.moves(), [direction]);
        assert_eq!(game.grid().num_empty(), swipe.grid.num_empty() - 1);

        let changed = (0..4)
            .flat_map(|r| (0..4).map(move |c| (r, c)))
            .filter(|&(r, c)| game.grid().rank(r, c) != swipe.grid.rank(r, c))
            .count();
        assert_eq!(changed, 1);
    }
}
