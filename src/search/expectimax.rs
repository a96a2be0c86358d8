use super::{
    SearchConfig, SearchResult,
    cache::EvaluationCache,
    heuristic::{HeuristicConfig, evaluate},
};
use crate::board::{Direction, Grid};

/// Whose turn a search node represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Node {
    /// The player picks the best move.
    Max,
    /// A tile spawns at random.
    Chance,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchStats {
    pub depth: i32,
    /// Nodes expanded, leaves included.
    pub nodes: u64,
    /// Spawn outcomes skipped by the probability cutoff.
    pub pruned: u64,
    pub cache_hits: u64,
    pub cache_lookups: u64,
}

pub struct Expectimax {
    pub heuristic: HeuristicConfig,
    pub config: SearchConfig,

    cache: EvaluationCache,
    stats: SearchStats,
}

impl Expectimax {
    pub fn new(heuristic: HeuristicConfig, config: SearchConfig) -> Self {
        Self {
            heuristic,
            config,
            cache: EvaluationCache::new(),
            stats: SearchStats::default(),
        }
    }

    /// Best move for `grid`, searched to the depth its empty cells allow.
    ///
    /// Returns `None` when no move changes the grid.
    pub fn search(&mut self, grid: Grid) -> Option<SearchResult> {
        let depth = self.config.depth_for(&grid);
        self.search_with_depth(grid, depth)
    }

    pub fn search_with_depth(&mut self, grid: Grid, depth: i32) -> Option<SearchResult> {
        self.cache.clear();
        self.stats = SearchStats {
            depth,
            ..Default::default()
        };

        let mut best: Option<SearchResult> = None;

        for direction in Direction::ALL {
            let swipe = grid.swipe(direction);
            if !swipe.moved {
                continue;
            }

            let value = swipe.score as f64 + self.value(swipe.grid, Node::Chance, depth - 1);
            log::trace!("{direction}: {value:.2}\n{:?}", swipe.grid);

            if best.is_none_or(|best| value > best.value) {
                best = Some(SearchResult { direction, value });
            }
        }

        self.stats.cache_hits = self.cache.hit_counter();
        self.stats.cache_lookups = self.cache.lookup_counter();

        log::debug!(
            "Depth {}: {} nodes, {} pruned, cache hit rate {:.1}% ({}/{})",
            depth,
            self.stats.nodes,
            self.stats.pruned,
            self.cache.hit_rate() * 100.0,
            self.stats.cache_hits,
            self.stats.cache_lookups
        );

        best
    }

    pub fn last_stats(&self) -> SearchStats {
        self.stats
    }

    fn value(&mut self, grid: Grid, node: Node, depth: i32) -> f64 {
        self.stats.nodes += 1;

        if depth <= 0 {
            return evaluate(&grid, &self.heuristic);
        }

        if let Some(value) = self.cache.get(grid, node, depth) {
            return value;
        }

        let value = match node {
            Node::Max => self.max_value(grid, depth),
            Node::Chance => self.chance_value(grid, depth),
        };

        self.cache.insert(grid, node, depth, value);
        value
    }

    fn max_value(&mut self, grid: Grid, depth: i32) -> f64 {
        let mut best = None;

        for direction in Direction::ALL {
            let swipe = grid.swipe(direction);
            if !swipe.moved {
                continue;
            }

            let value = swipe.score as f64 + self.value(swipe.grid, Node::Chance, depth - 1);
            best = Some(best.map_or(value, |best: f64| best.max(value)));
        }

        // No legal move: the game is over here.
        best.unwrap_or_else(|| evaluate(&grid, &self.heuristic))
    }

    fn chance_value(&mut self, grid: Grid, depth: i32) -> f64 {
        if grid.num_empty() == 0 {
            return evaluate(&grid, &self.heuristic);
        }

        let mut expected = 0.0;

        for spawn in grid.spawn_outcomes() {
            // Pruned mass is dropped, not redistributed.
            if spawn.probability < self.config.prune_prob {
                self.stats.pruned += 1;
                continue;
            }

            expected += spawn.probability * self.value(spawn.grid, Node::Max, depth);
        }

        expected
    }
}
