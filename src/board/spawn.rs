use rand::{Rng, seq::IndexedRandom as _};

use super::{Grid, SIZE};

pub const TWO_PROBABILITY: f64 = 0.9;
pub const FOUR_PROBABILITY: f64 = 0.1;

/// One possible tile placement and its probability.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Spawn {
    pub grid: Grid,
    pub probability: f64,
}

impl Grid {
    /// Place a 2 (or a 4 with probability 0.1) in a uniformly chosen empty cell.
    ///
    /// Returns `None` when the grid has no empty cell.
    pub fn spawn_random(self, rng: &mut impl Rng) -> Option<Grid> {
        let cells: Vec<_> = self.empty_cells().collect();
        let &(row, col) = cells.choose(rng)?;
        let rank = if rng.random_bool(FOUR_PROBABILITY) { 2 } else { 1 };

        Some(self.with_rank(row, col, rank))
    }

    /// Every spawn the environment can make: all empty cells with a 2, then all with a 4.
    pub fn spawn_outcomes(self) -> SpawnOutcomes {
        SpawnOutcomes {
            grid: self,
            num_empty: self.num_empty(),
            cell: 0,
            rank: 1,
        }
    }
}

#[derive(Debug, Clone)]
pub struct SpawnOutcomes {
    grid: Grid,
    num_empty: usize,
    cell: usize,
    rank: u8,
}

impl Iterator for SpawnOutcomes {
    type Item = Spawn;

    fn next(&mut self) -> Option<Spawn> {
        loop {
            if self.cell == SIZE * SIZE {
                if self.rank == 2 {
                    return None;
                }

                self.rank = 2;
                self.cell = 0;
            }

            let (row, col) = (self.cell / SIZE, self.cell % SIZE);
            self.cell += 1;

            if self.grid.rank(row, col) != 0 {
                continue;
            }

            let weight = match self.rank {
                1 => TWO_PROBABILITY,
                _ => FOUR_PROBABILITY,
            };

            return Some(Spawn {
                grid: self.grid.with_rank(row, col, self.rank),
                probability: weight / self.num_empty as f64,
            });
        }
    }
}
