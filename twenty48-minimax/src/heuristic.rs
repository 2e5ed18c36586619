//! The static evaluation used at the leaves of the search, plus the cheaper measures the
//! environment ply uses to pick its most annoying spawns.
//!
//! Everything here works in `log2` space, so the difference between two tiles is the number of
//! merges it would take to bring the smaller one up to the larger.

use std::collections::VecDeque;

use crate::board::{Board, Direction, Position};

/// Stands in for `ln(0)` when a board has no empty cells. Any board with at least one empty cell
/// scores `ln(1) = 0` or better, so a full board always ranks below it.
pub const NO_EMPTY_CELLS_TERM: f64 = -1000.0;

#[derive(Debug, Clone, Copy, PartialEq)]
/// The weight given to each term of the evaluation
///
/// ```
/// use twenty48_minimax::heuristic::HeuristicWeights;
///
/// let defaults = HeuristicWeights::default();
///
/// assert_eq!(defaults.smoothness, 0.1);
/// assert_eq!(defaults.monotonicity, 1.0);
/// assert_eq!(defaults.empty_cells, 2.7);
/// assert_eq!(defaults.max_value, 1.0);
/// ```
pub struct HeuristicWeights {
    #[allow(missing_docs)]
    pub smoothness: f64,
    #[allow(missing_docs)]
    pub monotonicity: f64,
    /// Applied to the natural log of the number of empty cells
    pub empty_cells: f64,
    /// Applied to `log2` of the largest tile
    pub max_value: f64,
}

impl Default for HeuristicWeights {
    fn default() -> Self {
        Self {
            smoothness: 0.1,
            monotonicity: 1.0,
            empty_cells: 2.7,
            max_value: 1.0,
        }
    }
}

impl HeuristicWeights {
    /// Score a board. Higher is better for the player
    pub fn evaluate<const N: usize>(&self, board: &Board<N>) -> f64 {
        board.smoothness() * self.smoothness
            + board.monotonicity() * self.monotonicity
            + board.empty_cells_term() * self.empty_cells
            + board.max_value_term() * self.max_value
    }
}

/// Score a board with the default weights
pub fn evaluate<const N: usize>(board: &Board<N>) -> f64 {
    HeuristicWeights::default().evaluate(board)
}

fn log2_or_zero<const N: usize>(board: &Board<N>, pos: Position) -> f64 {
    board.cell_at(pos).map_or(0.0, |tile| tile.log2())
}

impl<const N: usize> Board<N> {
    /// Pairwise difference between each tile and the nearest tile to its right and below it,
    /// skipping over empty cells. Never positive, `0` is a perfectly smooth board
    pub fn smoothness(&self) -> f64 {
        let mut smoothness = 0.0;

        for tile in self.tiles() {
            let value = tile.log2();

            for direction in [Direction::Right, Direction::Down] {
                let next = self.find_farthest(tile.position, direction.vector()).next;

                if let Some(target) = self.cell_at(next) {
                    smoothness -= (value - target.log2()).abs();
                }
            }
        }

        smoothness
    }

    /// How far each row and column is from being monotonic. Never positive.
    ///
    /// Each line is walked keeping two running costs, one for every step that goes down and one
    /// for every step that goes up. Runs of empty cells are skipped to the next tile, and an empty
    /// cell at the end of a line counts as `0`. The cheaper direction is taken per axis.
    pub fn monotonicity(&self) -> f64 {
        let n = N as i32;
        let mut columns = [0.0_f64; 2];
        let mut rows = [0.0_f64; 2];

        for x in 0..n {
            self.accumulate_line(&mut columns, |i| Position::new(x, i));
        }
        for y in 0..n {
            self.accumulate_line(&mut rows, |i| Position::new(i, y));
        }

        columns[0].max(columns[1]) + rows[0].max(rows[1])
    }

    /// `totals[0]` collects the decreasing steps of the line, `totals[1]` the increasing ones
    fn accumulate_line(&self, totals: &mut [f64; 2], at: impl Fn(i32) -> Position) {
        let n = N as i32;
        let mut current = 0;
        let mut next = current + 1;

        while next < n {
            while next < n && !self.cell_occupied(at(next)) {
                next += 1;
            }
            if next >= n {
                next -= 1;
            }

            let current_value = log2_or_zero(self, at(current));
            let next_value = log2_or_zero(self, at(next));

            if current_value > next_value {
                totals[0] += next_value - current_value;
            } else if next_value > current_value {
                totals[1] += current_value - next_value;
            }

            current = next;
            next += 1;
        }
    }

    /// The number of groups of equal, orthogonally connected tiles
    pub fn islands(&self) -> usize {
        let mut marked = [[false; N]; N];
        let mut islands = 0;

        for tile in self.tiles() {
            let Position { x, y } = tile.position;
            if marked[x as usize][y as usize] {
                continue;
            }

            islands += 1;
            marked[x as usize][y as usize] = true;

            let mut to_search = VecDeque::from([tile.position]);
            while let Some(pos) = to_search.pop_front() {
                for direction in Direction::all() {
                    let neighbor = pos.step(direction.vector());

                    match self.cell_at(neighbor) {
                        Some(other)
                            if other.value == tile.value
                                && !marked[neighbor.x as usize][neighbor.y as usize] =>
                        {
                            marked[neighbor.x as usize][neighbor.y as usize] = true;
                            to_search.push_back(neighbor);
                        }
                        _ => {}
                    }
                }
            }
        }

        islands
    }

    /// `ln` of the number of empty cells, see [NO_EMPTY_CELLS_TERM] for a full board
    pub fn empty_cells_term(&self) -> f64 {
        match self.available_cells().len() {
            0 => NO_EMPTY_CELLS_TERM,
            empty => (empty as f64).ln(),
        }
    }

    /// `log2` of the largest tile, `0` on an empty board
    pub fn max_value_term(&self) -> f64 {
        self.max_value()
            .map_or(0.0, |value| f64::from(value.trailing_zeros()))
    }

    /// How much the environment would like this board. Rough and fragmented is good for it
    pub fn annoyance(&self) -> f64 {
        -self.smoothness() + self.islands() as f64
    }
}
