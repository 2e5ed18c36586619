use crate::{board::Board, heuristic::HeuristicWeights};

/// The score of any node where the player has made the winning tile. Overrides the scoring
/// function entirely
pub const WIN_SCORE: f64 = 10_000.0;

/// Scores above this can only have come from a win further down the tree. They lose a point per
/// ply on the way up so that nearer wins are preferred
pub const WIN_THRESHOLD: f64 = 9_900.0;

/// The lower bound of the window every top level search starts with
pub const LOWEST_SCORE: f64 = -10_000.0;

/// The upper bound of the window every top level search starts with
pub const HIGHEST_SCORE: f64 = 10_000.0;

/// This trait is used to control something that can return a score from a board
///
/// Higher is better for the player. Scores should stay well inside
/// [LOWEST_SCORE]..[WIN_THRESHOLD] so they don't get confused with wins
pub trait Scorable<const N: usize> {
    /// Score the given board
    fn score(&self, board: &Board<N>) -> f64;
}

impl<const N: usize, FnLike: Fn(&Board<N>) -> f64> Scorable<N> for FnLike {
    fn score(&self, board: &Board<N>) -> f64 {
        (self)(board)
    }
}

impl<const N: usize> Scorable<N> for HeuristicWeights {
    fn score(&self, board: &Board<N>) -> f64 {
        self.evaluate(board)
    }
}
