pub mod board;
pub mod game;
pub mod search;

/// Highest rank a tile can hold. Tiles of this rank no longer merge, so scores fit a `u64`.
pub const MAX_RANK: u8 = 63;

/// Swipe a line of tile ranks toward index 0 and return the score gained.
///
/// A tile produced by a merge is never merged again in the same swipe, and tiles of
/// [`MAX_RANK`] never merge.
pub fn swipe_line(cells: &mut [u8]) -> u64 {
    // Find first non empty cell
    let Some(current) = cells
        .iter()
        .enumerate()
        .find_map(|(i, &c)| (c != 0).then_some(i))
    else {
        return 0;
    };

    let mut score = 0;
    let mut last = 0; // Write ptr
    cells.swap(last, current);

    for current in current + 1..cells.len() {
        if cells[current] == 0 {
            continue;
        } else if cells[current] == cells[last] && cells[last] < MAX_RANK {
            cells[last] += 1;
            cells[current] = 0;
            score += 1 << cells[last];
            last += 1;
        } else {
            (cells[last] != 0).then(|| last += 1);
            cells.swap(last, current);
        }
    }

    score
}
