use std::{
    fmt::{self, Write},
    str::FromStr,
};

use thiserror::Error;

pub mod spawn;

pub const SIZE: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// All directions, in the order ties are broken during search.
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// Coordinates of line `idx`, starting at the edge tiles slide toward.
    fn line(self, idx: usize) -> [(usize, usize); SIZE] {
        std::array::from_fn(|k| match self {
            Direction::Left => (idx, k),
            Direction::Right => (idx, SIZE - 1 - k),
            Direction::Up => (k, idx),
            Direction::Down => (SIZE - 1 - k, idx),
        })
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

#[derive(Debug, Error)]
pub enum GridError {
    #[error("tile value {0} is not a power of two greater than or equal to 2")]
    InvalidTile(u64),

    #[error("start position must contain exactly 16 integers (row-major), got {0}")]
    WrongCellCount(usize),

    #[error("invalid integer {0:?} in start position")]
    InvalidInteger(String),

    #[error("start position must be a 4x4 array of integers")]
    WrongShape,

    #[error("malformed start position JSON")]
    Json(#[from] serde_json::Error),
}

/// A 4x4 board. Each cell holds the tile rank, `log2(value)`, with 0 for an empty cell.
#[derive(Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Grid([[u8; SIZE]; SIZE]);

/// Result of sliding a grid in one direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Swipe {
    pub grid: Grid,
    /// Sum of the values created by merges.
    pub score: u64,
    pub moved: bool,
}

impl Grid {
    pub const EMPTY: Self = Grid([[0; SIZE]; SIZE]);

    pub fn from_ranks(ranks: [[u8; SIZE]; SIZE]) -> Self {
        Self(ranks)
    }

    pub fn ranks(&self) -> [[u8; SIZE]; SIZE] {
        self.0
    }

    pub fn rank(&self, row: usize, col: usize) -> u8 {
        self.0[row][col]
    }

    /// Builds a grid from tile values.
    ///
    /// # Errors
    /// Returns [`GridError::InvalidTile`] if a nonzero value is not a power of two of at least 2.
    pub fn from_values(values: [[u64; SIZE]; SIZE]) -> Result<Self, GridError> {
        let mut ranks = [[0; SIZE]; SIZE];

        for (row, values) in ranks.iter_mut().zip(values) {
            for (rank, value) in row.iter_mut().zip(values) {
                *rank = value_to_rank(value)?;
            }
        }

        Ok(Self(ranks))
    }

    pub fn to_values(&self) -> [[u64; SIZE]; SIZE] {
        self.0.map(|row| row.map(rank_to_value))
    }

    pub fn value(&self, row: usize, col: usize) -> u64 {
        rank_to_value(self.0[row][col])
    }

    /// Parses a JSON document holding a 4x4 array of tile values.
    pub fn from_json(json: &str) -> Result<Self, GridError> {
        let rows: Vec<Vec<u64>> = serde_json::from_str(json)?;

        let values: [[u64; SIZE]; SIZE] = rows
            .into_iter()
            .map(|row| <[u64; SIZE]>::try_from(row).map_err(|_| GridError::WrongShape))
            .collect::<Result<Vec<_>, _>>()?
            .try_into()
            .map_err(|_| GridError::WrongShape)?;

        Self::from_values(values)
    }

    pub fn with_rank(mut self, row: usize, col: usize, rank: u8) -> Self {
        self.0[row][col] = rank;
        self
    }

    pub fn empty_cells(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        (0..SIZE * SIZE)
            .map(|idx| (idx / SIZE, idx % SIZE))
            .filter(|&(row, col)| self.0[row][col] == 0)
    }

    pub fn num_empty(&self) -> usize {
        self.0.as_flattened().iter().filter(|&&c| c == 0).count()
    }

    pub fn max_rank(&self) -> u8 {
        self.0.as_flattened().iter().copied().max().unwrap_or(0)
    }

    pub fn max_value(&self) -> u64 {
        rank_to_value(self.max_rank())
    }

    /// Slide every tile toward `direction`, merging equal neighbours once.
    pub fn swipe(self, direction: Direction) -> Swipe {
        let mut grid = self;
        let mut score = 0;

        for idx in 0..SIZE {
            let coords = direction.line(idx);
            let mut line = coords.map(|(row, col)| self.0[row][col]);
            score += crate::swipe_line(&mut line);

            for ((row, col), rank) in coords.into_iter().zip(line) {
                grid.0[row][col] = rank;
            }
        }

        Swipe {
            grid,
            score,
            moved: grid != self,
        }
    }

    /// Whether any direction changes the grid.
    pub fn can_move(&self) -> bool {
        if self.num_empty() > 0 {
            return true;
        }

        (0..SIZE).any(|row| {
            (0..SIZE).any(|col| {
                let rank = self.0[row][col];
                rank < crate::MAX_RANK
                    && ((row + 1 < SIZE && self.0[row + 1][col] == rank)
                        || (col + 1 < SIZE && self.0[row][col + 1] == rank))
            })
        })
    }

    pub fn as_u128(self) -> u128 {
        self.0
            .as_flattened()
            .iter()
            .fold(0, |acc, &rank| acc << 8 | rank as u128)
    }
}

fn value_to_rank(value: u64) -> Result<u8, GridError> {
    match value {
        0 => Ok(0),
        v if v >= 2 && v.is_power_of_two() => Ok(v.trailing_zeros() as u8),
        v => Err(GridError::InvalidTile(v)),
    }
}

fn rank_to_value(rank: u8) -> u64 {
    match rank {
        0 => 0,
        r => 1 << r,
    }
}

/// Parses 16 integers separated by `,` or `;`, in row-major order.
impl FromStr for Grid {
    type Err = GridError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let values = s
            .split([',', ';'])
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(|v| {
                v.parse::<u64>()
                    .map_err(|_| GridError::InvalidInteger(v.to_string()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        if values.len() != SIZE * SIZE {
            return Err(GridError::WrongCellCount(values.len()));
        }

        let mut values = values.into_iter();
        Self::from_values(std::array::from_fn(|_| {
            std::array::from_fn(|_| values.next().unwrap_or(0))
        }))
    }
}

/// Tile values, right aligned, one row per line.
impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let values = self.to_values();
        let width = values
            .as_flattened()
            .iter()
            .map(|v| v.to_string().len())
            .max()
            .unwrap_or(1)
            .max(4);

        for (i, row) in values.iter().enumerate() {
            if i > 0 {
                f.write_char('\n')?;
            }

            for (j, v) in row.iter().enumerate() {
                if j > 0 {
                    f.write_char(' ')?;
                }
                write!(f, "{v:>width$}")?;
            }
        }

        Ok(())
    }
}

impl fmt::Debug for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut rows = self.0.iter();

        if let Some(row) = rows.next() {
            row.iter().try_for_each(|c| write!(f, "{c:2x}"))?
        }

        for row in rows {
            f.write_char('\n')?;
            row.iter().try_for_each(|c| write!(f, "{c:2x}"))?
        }

        Ok(())
    }
}

pub mod test_utils {
    use itertools::Itertools as _;
    use rand::Rng;
    use rand::seq::{IndexedRandom as _, SliceRandom};

    use super::{Direction, Grid, SIZE};

    /// A board with `filled` distinct ranks plus `duplicates` repeated ones, shuffled.
    pub fn generate_random_board(rng: &mut impl Rng, filled: u8, duplicates: u8) -> Grid {
        let mut nums = Vec::with_capacity(16);
        nums.extend(1..filled + 1);

        // Add duplicates
        if !nums.is_empty() {
            let duplicates = (0..duplicates)
                .map(|_| *nums.choose(rng).unwrap())
                .collect_vec();

            nums.extend(duplicates);
        }

        nums.resize(SIZE * SIZE, 0);
        nums.shuffle(rng);
        let mut nums = nums.into_iter();

        use std::array as arr;
        Grid::from_ranks(arr::from_fn(|_| arr::from_fn(|_| nums.next().unwrap_or(0))))
    }

    /// Compress, merge pairs, compress again: a slow reference for one row of values.
    pub fn baseline_row_left(row: [u64; SIZE]) -> ([u64; SIZE], u64) {
        let tiles = row.into_iter().filter(|&v| v != 0).collect_vec();
        let mut out = Vec::with_capacity(SIZE);
        let mut score = 0;

        let mut i = 0;
        while i < tiles.len() {
            if i + 1 < tiles.len() && tiles[i] == tiles[i + 1] {
                out.push(tiles[i] * 2);
                score += tiles[i] * 2;
                i += 2;
            } else {
                out.push(tiles[i]);
                i += 1;
            }
        }

        out.resize(SIZE, 0);
        (out.try_into().unwrap(), score)
    }

    /// Reference swipe built from [`baseline_row_left`] by reflecting and transposing.
    pub fn baseline_swipe(grid: Grid, direction: Direction) -> ([[u64; SIZE]; SIZE], u64) {
        let values = grid.to_values();
        let transpose = |v: [[u64; SIZE]; SIZE]| -> [[u64; SIZE]; SIZE] {
            std::array::from_fn(|r| std::array::from_fn(|c| v[c][r]))
        };
        let reverse = |v: [[u64; SIZE]; SIZE]| {
            v.map(|mut row| {
                row.reverse();
                row
            })
        };

        let mut score = 0;
        let mut left = |v: [[u64; SIZE]; SIZE]| {
            v.map(|row| {
                let (row, gained) = baseline_row_left(row);
                score += gained;
                row
            })
        };

        let out = match direction {
            Direction::Left => left(values),
            Direction::Right => reverse(left(reverse(values))),
            Direction::Up => transpose(left(transpose(values))),
            Direction::Down => transpose(reverse(left(reverse(transpose(values))))),
        };

        (out, score)
    }
}
