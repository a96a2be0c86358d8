use std::{fmt, str::FromStr};

use thiserror::Error;

use crate::board::{Direction, Grid};

pub mod cache;
pub mod expectimax;
pub mod heuristic;

pub use expectimax::{Expectimax, SearchStats};
pub use heuristic::{Corner, HeuristicConfig, HeuristicWeights, evaluate};

/// Empty-cell counts above which extra search depth is granted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DepthThresholds {
    pub low: usize,
    pub high: usize,
}

impl Default for DepthThresholds {
    fn default() -> Self {
        Self { low: 8, high: 12 }
    }
}

#[derive(Debug, Error)]
#[error("depth thresholds must be two integers separated by a comma, e.g. 8,12 (got {0:?})")]
pub struct ParseThresholdsError(String);

impl FromStr for DepthThresholds {
    type Err = ParseThresholdsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseThresholdsError(s.to_string());

        let (low, high) = s.split_once(',').ok_or_else(err)?;
        let low = low.trim().parse().map_err(|_| err())?;
        let high = high.trim().parse().map_err(|_| err())?;

        Ok(Self { low, high })
    }
}

impl fmt::Display for DepthThresholds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.low, self.high)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchConfig {
    pub depth_base: i32,
    pub depth_bonus: i32,
    pub thresholds: DepthThresholds,
    /// Spawn outcomes less likely than this are skipped.
    pub prune_prob: f64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            depth_base: 3,
            depth_bonus: 2,
            thresholds: DepthThresholds::default(),
            prune_prob: 1e-4,
        }
    }
}

impl SearchConfig {
    /// Search depth for a turn: the full bonus on open boards, half of it in between.
    pub fn depth_for(&self, grid: &Grid) -> i32 {
        let empty = grid.num_empty();
        let DepthThresholds { low, high } = self.thresholds;

        if empty >= high {
            self.depth_base + self.depth_bonus
        } else if empty >= low {
            self.depth_base + self.depth_bonus / 2
        } else {
            self.depth_base
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchResult {
    pub direction: Direction,
    /// Expected value of playing `direction`.
    pub value: f64,
}

#[cfg(test)]
mod test {
    use super::*;

    fn with_empty(n: usize) -> Grid {
        let mut ranks = [[1; 4]; 4];
        for idx in 0..n {
            ranks[idx / 4][idx % 4] = 0;
        }
        Grid::from_ranks(ranks)
    }

    #[test]
    fn test_adaptive_depth() {
        let config = SearchConfig {
            depth_base: 2,
            depth_bonus: 3,
            thresholds: DepthThresholds { low: 6, high: 10 },
            prune_prob: 0.0,
        };

        assert_eq!(config.depth_for(&with_empty(0)), 2);
        assert_eq!(config.depth_for(&with_empty(5)), 2);
        assert_eq!(config.depth_for(&with_empty(6)), 3);
        assert_eq!(config.depth_for(&with_empty(9)), 3);
        assert_eq!(config.depth_for(&with_empty(10)), 5);
        assert_eq!(config.depth_for(&with_empty(16)), 5);
    }

    #[test]
    fn test_parse_thresholds() {
        assert_eq!(
            "8,12".parse::<DepthThresholds>().unwrap(),
            DepthThresholds { low: 8, high: 12 }
        );
        assert_eq!(
            " 4 , 6 ".parse::<DepthThresholds>().unwrap(),
            DepthThresholds { low: 4, high: 6 }
        );
        assert!("8".parse::<DepthThresholds>().is_err());
        assert!("8,12,16".parse::<DepthThresholds>().is_err());
        assert!("a,b".parse::<DepthThresholds>().is_err());
    }
}
