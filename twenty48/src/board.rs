use std::fmt;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::visualization::render_grid;

/// How many tiles a freshly created board starts with.
pub const STARTING_TILE_COUNT: usize = 2;
/// How many tiles spawn after each move.
pub const TILE_SPAWN_AMOUNT: usize = 1;

/// A direction to slide and merge tiles in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// All four directions, in the order used for game-over probing.
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];
}

/// The result of a move.
///
/// The game-over condition is reported here as a plain return value, so
/// callers poll it after each move instead of registering a callback that
/// would fire in the middle of a mutation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MoveOutcome {
    /// The game continues.
    Continue,
    /// No empty cells remain and no move changes the grid.
    ///
    /// The score is always 0; the core accumulates no score.
    GameOver { score: u32 },
}

impl MoveOutcome {
    pub fn is_game_over(self) -> bool {
        matches!(self, MoveOutcome::GameOver { .. })
    }
}

/// A rectangular grid of power-of-two tiles, with 0 marking empty cells.
///
/// The dimensions are fixed for the lifetime of the board. There is no
/// internal locking; a board shared across threads must be wrapped in a
/// mutex by the caller.
#[derive(Clone, Debug)]
pub struct Board {
    rows: usize,
    columns: usize,
    grid: Vec<Vec<u32>>,
    rng: StdRng,
}

impl Board {
    /// Creates a board and spawns the starting tiles.
    ///
    /// Panics if `rows` or `columns` is zero.
    pub fn new(rows: usize, columns: usize) -> Self {
        Self::with_rng(rows, columns, StdRng::from_entropy())
    }

    /// Like [`Self::new()`], but with a caller-supplied RNG, so that tile
    /// spawning is reproducible.
    pub fn with_rng(rows: usize, columns: usize, rng: StdRng) -> Self {
        assert!(rows > 0 && columns > 0);
        let mut board = Self {
            rows,
            columns,
            grid: vec![vec![0; columns]; rows],
            rng,
        };
        board.add_tiles(STARTING_TILE_COUNT);
        board
    }

    /// Creates a board holding exactly the given tile values, without
    /// spawning any starting tiles.
    ///
    /// Panics if the grid is empty or its rows have unequal lengths.
    pub fn from_grid(grid: Vec<Vec<u32>>) -> Self {
        Self::from_grid_with_rng(grid, StdRng::from_entropy())
    }

    /// Like [`Self::from_grid()`], but with a caller-supplied RNG.
    pub fn from_grid_with_rng(grid: Vec<Vec<u32>>, rng: StdRng) -> Self {
        assert!(!grid.is_empty() && !grid[0].is_empty());
        assert!(grid.iter().all(|row| row.len() == grid[0].len()));
        Self {
            rows: grid.len(),
            columns: grid[0].len(),
            grid,
            rng,
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    /// The tile value at the given cell. 0 means empty.
    pub fn get(&self, row: usize, column: usize) -> u32 {
        self.grid[row][column]
    }

    /// The full grid, row-major.
    pub fn tiles(&self) -> &[Vec<u32>] {
        &self.grid
    }

    /// The maximum tile value anywhere on the grid, or 0 if it is empty.
    pub fn highest_value(&self) -> u32 {
        self.grid.iter().flatten().copied().max().unwrap_or(0)
    }

    /// Slides, merges and re-slides the grid in `direction`, then spawns a
    /// new tile.
    ///
    /// When the board is full there is nothing to spawn; instead the move
    /// probes whether any direction still changes the grid and reports
    /// [`MoveOutcome::GameOver`] if none does.
    pub fn make_move(&mut self, direction: Direction) -> MoveOutcome {
        self.shift(direction);
        self.add_tiles(TILE_SPAWN_AMOUNT)
    }

    /// Slides, merges and re-slides without spawning.
    ///
    /// This is the probing variant of [`Self::make_move()`]; game-over
    /// detection uses it so that probe moves cannot recurse into further
    /// game-over checks.
    pub fn shift(&mut self, direction: Direction) {
        let mut shifted = self.slide(direction);
        merge(&mut shifted, direction);
        self.grid = shifted;
        self.grid = self.slide(direction);
    }

    /// Rearranges the whole grid: all values sorted descending, written
    /// back in boustrophedon order (row 0 left to right, row 1 right to
    /// left, and so on). No merging happens.
    pub fn auto_chain(&mut self) {
        let mut values: Vec<u32> = self.grid.iter().flatten().copied().collect();
        values.sort_unstable_by(|a, b| b.cmp(a));
        let mut values = values.into_iter();
        for (row_idx, row) in self.grid.iter_mut().enumerate() {
            if row_idx % 2 == 0 {
                for cell in row.iter_mut() {
                    *cell = values.next().expect("one sorted value per cell");
                }
            } else {
                for cell in row.iter_mut().rev() {
                    *cell = values.next().expect("one sorted value per cell");
                }
            }
        }
    }

    // Packs every tile against the target edge into a fresh grid. Tiles are
    // visited starting from that edge, so nearer tiles claim slots first
    // and the line order is preserved.
    fn slide(&self, direction: Direction) -> Vec<Vec<u32>> {
        let mut out = vec![vec![0; self.columns]; self.rows];
        match direction {
            Direction::Up => {
                for column in 0..self.columns {
                    let mut next = 0;
                    for row in 0..self.rows {
                        if self.grid[row][column] != 0 {
                            out[next][column] = self.grid[row][column];
                            next += 1;
                        }
                    }
                }
            }
            Direction::Down => {
                for column in 0..self.columns {
                    let mut next = self.rows;
                    for row in (0..self.rows).rev() {
                        if self.grid[row][column] != 0 {
                            next -= 1;
                            out[next][column] = self.grid[row][column];
                        }
                    }
                }
            }
            Direction::Left => {
                for row in 0..self.rows {
                    let mut next = 0;
                    for column in 0..self.columns {
                        if self.grid[row][column] != 0 {
                            out[row][next] = self.grid[row][column];
                            next += 1;
                        }
                    }
                }
            }
            Direction::Right => {
                for row in 0..self.rows {
                    let mut next = self.columns;
                    for column in (0..self.columns).rev() {
                        if self.grid[row][column] != 0 {
                            next -= 1;
                            out[row][next] = self.grid[row][column];
                        }
                    }
                }
            }
        }
        out
    }

    /// Spawns `count` random tiles, or, when the board is full, checks
    /// whether the game has ended.
    ///
    /// The empty-cell set is computed once at the start of the call, and
    /// every spawn picks from that initial set. With a count above one the
    /// same cell can be picked twice.
    fn add_tiles(&mut self, count: usize) -> MoveOutcome {
        let empty = self.empty_positions();
        if empty.is_empty() {
            // Probe all four directions on a copy, with spawning disabled.
            // The probes apply cumulatively to the same copy; only if the
            // grid still matches after all four is the game over.
            let mut probe = self.clone();
            for direction in Direction::ALL {
                probe.shift(direction);
            }
            if probe.grid == self.grid {
                return MoveOutcome::GameOver { score: 0 };
            }
            return MoveOutcome::Continue;
        }
        for _ in 0..count {
            let position = empty[self.rng.gen_range(0..empty.len())];
            self.spawn_tile(position);
        }
        MoveOutcome::Continue
    }

    fn empty_positions(&self) -> Vec<(usize, usize)> {
        let mut positions = Vec::new();
        for row in 0..self.rows {
            for column in 0..self.columns {
                if self.grid[row][column] == 0 {
                    positions.push((row, column));
                }
            }
        }
        positions
    }

    // 2 with probability 8/9, 4 with probability 1/9.
    fn spawn_tile(&mut self, (row, column): (usize, usize)) {
        let value = if self.rng.gen_range(1..10) < 9 { 2 } else { 4 };
        self.grid[row][column] = value;
    }
}

// Single pass over each line, scanning from the target edge outward: equal
// nonzero neighbors collapse into the nearer cell, the farther one is
// zeroed. Each cell merges at most once per move, so three equal tiles
// never chain into one.
fn merge(grid: &mut [Vec<u32>], direction: Direction) {
    let rows = grid.len();
    let columns = grid[0].len();
    match direction {
        Direction::Up => {
            for column in 0..columns {
                for row in 0..rows - 1 {
                    if grid[row][column] != 0 && grid[row][column] == grid[row + 1][column] {
                        grid[row][column] *= 2;
                        grid[row + 1][column] = 0;
                    }
                }
            }
        }
        Direction::Down => {
            for column in 0..columns {
                for row in (1..rows).rev() {
                    if grid[row][column] != 0 && grid[row][column] == grid[row - 1][column] {
                        grid[row][column] *= 2;
                        grid[row - 1][column] = 0;
                    }
                }
            }
        }
        Direction::Left => {
            for row in 0..rows {
                for column in 0..columns - 1 {
                    if grid[row][column] != 0 && grid[row][column] == grid[row][column + 1] {
                        grid[row][column] *= 2;
                        grid[row][column + 1] = 0;
                    }
                }
            }
        }
        Direction::Right => {
            for row in 0..rows {
                for column in (1..columns).rev() {
                    if grid[row][column] != 0 && grid[row][column] == grid[row][column - 1] {
                        grid[row][column] *= 2;
                        grid[row][column - 1] = 0;
                    }
                }
            }
        }
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&render_grid(self))
    }
}

#[cfg(test)]
mod tests {
    use quickcheck::{quickcheck, TestResult};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;
    use crate::arbitrary::GridInput;

    fn board(grid: &[&[u32]]) -> Board {
        Board::from_grid(grid.iter().map(|row| row.to_vec()).collect())
    }

    fn count_empty(grid: &[Vec<u32>]) -> usize {
        grid.iter().flatten().filter(|&&v| v == 0).count()
    }

    quickcheck! {
        fn shift_conserves_tile_sum(input: GridInput, direction: Direction) -> bool {
            let sum_before: u32 = input.grid.iter().flatten().sum();
            let mut board = Board::from_grid(input.grid);
            board.shift(direction);
            let sum_after: u32 = board.tiles().iter().flatten().sum();
            sum_before == sum_after
        }

        fn shift_never_increases_tile_count(input: GridInput, direction: Direction) -> bool {
            let mut board = Board::from_grid(input.grid);
            let before = board.tiles().len() * board.tiles()[0].len() - count_empty(board.tiles());
            board.shift(direction);
            let after = board.tiles().len() * board.tiles()[0].len() - count_empty(board.tiles());
            after <= before
        }

        fn construction_spawns_starting_tiles(seed: u64) -> bool {
            let board = Board::with_rng(3, 3, StdRng::seed_from_u64(seed));
            let spawned: Vec<u32> = board
                .tiles()
                .iter()
                .flatten()
                .copied()
                .filter(|&v| v != 0)
                .collect();
            // Both starting spawns can land on the same cell, leaving one tile.
            (1..=STARTING_TILE_COUNT).contains(&spawned.len())
                && spawned.iter().all(|&v| v == 2 || v == 4)
        }

        fn make_move_spawns_one_tile_when_space_remains(
            input: GridInput,
            direction: Direction,
            seed: u64
        ) -> TestResult {
            let mut shifted = Board::from_grid(input.grid.clone());
            shifted.shift(direction);
            let empty_after_shift = count_empty(shifted.tiles());
            if empty_after_shift == 0 {
                return TestResult::discard();
            }
            let mut board = Board::from_grid_with_rng(input.grid, StdRng::seed_from_u64(seed));
            board.make_move(direction);
            TestResult::from_bool(count_empty(board.tiles()) == empty_after_shift - 1)
        }
    }

    #[test]
    fn merge_left_single_pair() {
        let mut b = board(&[&[2, 2, 0, 0]]);
        b.shift(Direction::Left);
        assert_eq!(b.tiles(), [vec![4, 0, 0, 0]]);
    }

    #[test]
    fn merge_left_is_single_pass() {
        // The pair merges to 4, the lone 2 slides up next to it but does
        // not merge again in the same move.
        let mut b = board(&[&[2, 0, 2, 2]]);
        b.shift(Direction::Left);
        assert_eq!(b.tiles(), [vec![4, 2, 0, 0]]);
    }

    #[test]
    fn merge_works_in_all_directions() {
        let mut b = board(&[&[2, 0], &[2, 0]]);
        b.shift(Direction::Up);
        assert_eq!(b.tiles(), [vec![4, 0], vec![0, 0]]);

        let mut b = board(&[&[2, 0], &[2, 0]]);
        b.shift(Direction::Down);
        assert_eq!(b.tiles(), [vec![0, 0], vec![4, 0]]);

        let mut b = board(&[&[0, 2, 0, 2]]);
        b.shift(Direction::Right);
        assert_eq!(b.tiles(), [vec![0, 0, 0, 4]]);
    }

    #[test]
    fn pair_nearest_the_target_edge_merges_first() {
        let mut b = board(&[&[2], &[2], &[2], &[0]]);
        b.shift(Direction::Down);
        assert_eq!(b.tiles(), [vec![0], vec![0], vec![2], vec![4]]);
    }

    #[test]
    fn packed_board_without_merges_is_unchanged_by_shift() {
        let mut b = board(&[&[2, 4, 8, 16]]);
        b.shift(Direction::Left);
        assert_eq!(b.tiles(), [vec![2, 4, 8, 16]]);
    }

    #[test]
    fn make_move_spawns_into_the_only_empty_cell() {
        let mut b = Board::from_grid_with_rng(
            vec![vec![2, 4], vec![8, 0]],
            StdRng::seed_from_u64(1),
        );
        let outcome = b.make_move(Direction::Left);
        assert_eq!(outcome, MoveOutcome::Continue);
        assert!(b.get(1, 1) == 2 || b.get(1, 1) == 4);
        assert_eq!(b.get(0, 0), 2);
        assert_eq!(b.get(0, 1), 4);
    }

    #[test]
    fn full_board_with_no_moves_reports_game_over() {
        let mut b = board(&[
            &[2, 4, 2, 4],
            &[4, 2, 4, 2],
            &[2, 4, 2, 4],
            &[4, 2, 4, 2],
        ]);
        let before = b.tiles().to_vec();
        let outcome = b.make_move(Direction::Left);
        assert_eq!(outcome, MoveOutcome::GameOver { score: 0 });
        // Detection runs on a copy; the board itself stays untouched.
        assert_eq!(b.tiles(), before);
    }

    #[test]
    fn full_board_with_a_possible_merge_is_not_game_over() {
        let mut b = board(&[&[2, 2], &[4, 8]]);
        let outcome = b.make_move(Direction::Up);
        assert_eq!(outcome, MoveOutcome::Continue);
        // Nothing spawns while the board is full.
        assert_eq!(b.tiles(), [vec![2, 2], vec![4, 8]]);
    }

    #[test]
    fn auto_chain_sorts_descending_in_boustrophedon_order() {
        let mut b = board(&[&[2, 0, 8], &[4, 32, 0], &[16, 0, 64]]);
        b.auto_chain();
        assert_eq!(
            b.tiles(),
            [vec![64, 32, 16], vec![2, 4, 8], vec![0, 0, 0]]
        );
    }

    #[test]
    fn highest_value_of_empty_grid_is_zero() {
        let b = board(&[&[0, 0], &[0, 0]]);
        assert_eq!(b.highest_value(), 0);
    }

    #[test]
    fn highest_value_finds_the_maximum() {
        let b = board(&[&[2, 128], &[64, 4]]);
        assert_eq!(b.highest_value(), 128);
    }

    #[test]
    fn clones_share_no_state() {
        let mut b = board(&[&[2, 2, 0, 0]]);
        let snapshot = b.clone();
        b.shift(Direction::Left);
        assert_eq!(b.tiles(), [vec![4, 0, 0, 0]]);
        assert_eq!(snapshot.tiles(), [vec![2, 2, 0, 0]]);
    }

    #[test]
    #[should_panic]
    fn zero_dimensions_panic() {
        let _ = Board::new(0, 4);
    }
}
