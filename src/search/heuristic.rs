use std::{fmt, str::FromStr};

use thiserror::Error;

use crate::board::{Grid, SIZE};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeuristicWeights {
    pub empty: f64,
    pub monotonicity: f64,
    pub smoothness: f64,
    pub max_on_corner: f64,
}

impl Default for HeuristicWeights {
    fn default() -> Self {
        Self {
            empty: 270.0,
            monotonicity: 47.0,
            smoothness: 0.3,
            max_on_corner: 1000.0,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Corner {
    TopLeft,
    TopRight,
    #[default]
    BottomLeft,
    BottomRight,
}

impl Corner {
    pub fn position(self) -> (usize, usize) {
        match self {
            Corner::TopLeft => (0, 0),
            Corner::TopRight => (0, SIZE - 1),
            Corner::BottomLeft => (SIZE - 1, 0),
            Corner::BottomRight => (SIZE - 1, SIZE - 1),
        }
    }

    /// Gradient weight of a cell: 15 on the corner, decreasing along its row first,
    /// then by 4 per row away from it, down to 0 on the opposite corner.
    pub fn gradient(self, row: usize, col: usize) -> u8 {
        let (corner_row, corner_col) = self.position();
        let steps = row.abs_diff(corner_row) * SIZE + col.abs_diff(corner_col);

        (SIZE * SIZE - 1 - steps) as u8
    }
}

#[derive(Debug, Error)]
#[error("unknown corner {0:?}, expected one of TL, TR, BL, BR")]
pub struct ParseCornerError(String);

impl FromStr for Corner {
    type Err = ParseCornerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "TL" => Ok(Corner::TopLeft),
            "TR" => Ok(Corner::TopRight),
            "BL" => Ok(Corner::BottomLeft),
            "BR" => Ok(Corner::BottomRight),
            _ => Err(ParseCornerError(s.to_string())),
        }
    }
}

impl fmt::Display for Corner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Corner::TopLeft => "TL",
            Corner::TopRight => "TR",
            Corner::BottomLeft => "BL",
            Corner::BottomRight => "BR",
        })
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct HeuristicConfig {
    pub weights: HeuristicWeights,
    pub corner: Corner,
}

/// Static evaluation of a grid. Higher is better.
pub fn evaluate(grid: &Grid, config: &HeuristicConfig) -> f64 {
    let HeuristicConfig { weights, corner } = config;

    weights.empty * grid.num_empty() as f64
        + weights.monotonicity * monotonicity(grid, *corner)
        + weights.smoothness * smoothness(grid)
        + weights.max_on_corner * corner_bonus(grid, *corner)
}

/// Sum of tile ranks weighted by the corner gradient.
pub fn monotonicity(grid: &Grid, corner: Corner) -> f64 {
    let mut sum = 0;

    for row in 0..SIZE {
        for col in 0..SIZE {
            sum += corner.gradient(row, col) as u32 * grid.rank(row, col) as u32;
        }
    }

    sum as f64
}

/// Negated rank difference summed over occupied neighbour pairs.
pub fn smoothness(grid: &Grid) -> f64 {
    let mut penalty = 0;

    for row in 0..SIZE {
        for col in 0..SIZE {
            let rank = grid.rank(row, col);
            if rank == 0 {
                continue;
            }

            if row + 1 < SIZE && grid.rank(row + 1, col) != 0 {
                penalty += rank.abs_diff(grid.rank(row + 1, col)) as u32;
            }

            if col + 1 < SIZE && grid.rank(row, col + 1) != 0 {
                penalty += rank.abs_diff(grid.rank(row, col + 1)) as u32;
            }
        }
    }

    -(penalty as f64)
}

/// The largest tile value when it sits on `corner`, otherwise 0.
pub fn corner_bonus(grid: &Grid, corner: Corner) -> f64 {
    let (row, col) = corner.position();
    let max = grid.max_rank();

    if max != 0 && grid.rank(row, col) == max {
        grid.value(row, col) as f64
    } else {
        0.0
    }
}
