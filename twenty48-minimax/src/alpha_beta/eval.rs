use std::time::{Duration, Instant};

use derivative::Derivative;
use itertools::Itertools;
use tracing::{debug, info, info_span};

use crate::{
    board::{Board, Direction, Position, Tile},
    heuristic::HeuristicWeights,
};

use super::{
    score::{Scorable, HIGHEST_SCORE, LOWEST_SCORE, WIN_SCORE, WIN_THRESHOLD},
    RootAnalysis, SearchResult, SearchStats,
};

/// The tiles the environment may spawn, in the order they are considered
pub const SPAWN_VALUES: [u32; 2] = [2, 4];

#[derive(Derivative, Clone)]
#[derivative(Debug)]
/// This is the struct that wraps a board and a scoring function and can be used to run the
/// alpha-beta search
///
/// It also outputs traces using the [tracing] crate.
pub struct AlphaBetaSearcher<ScorableType, const N: usize>
where
    ScorableType: Scorable<N>,
{
    /// The board to pick a move for
    pub board: Board<N>,
    #[derivative(Debug = "ignore")]
    score_function: ScorableType,
    /// Used to label traces
    pub name: &'static str,
    options: SearchOptions,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Optional properties that can be defined for an [AlphaBetaSearcher]
///
/// The defaults (as implemented by [Default]) are as follows:
/// ```
/// use std::time::Duration;
/// use twenty48_minimax::alpha_beta::SearchOptions;
///
/// let defaults: SearchOptions = Default::default();
///
/// assert_eq!(defaults.time_budget, Duration::from_millis(100));
/// assert_eq!(defaults.max_depth, None);
/// ```
pub struct SearchOptions {
    /// How long iterative deepening keeps starting new depths
    ///
    /// The clock is only checked between depths. A depth that starts inside the budget always
    /// runs to completion, so the search can overshoot by up to one full depth
    ///
    /// Defaults to 100 milliseconds
    pub time_budget: Duration,
    /// The deepest level iterative deepening will run, regardless of time left
    ///
    /// Defaults to no limit
    pub max_depth: Option<usize>,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            time_budget: Duration::from_millis(100),
            max_depth: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// The two kinds of ply. Which one a node is comes from [Board::player_turn]
enum NodeKind {
    /// Picks the best of up to four directions
    Player,
    /// Picks the most damaging spawn among a heuristically chosen few
    Environment,
}

impl NodeKind {
    fn of<const N: usize>(board: &Board<N>) -> Self {
        if board.player_turn {
            NodeKind::Player
        } else {
            NodeKind::Environment
        }
    }
}

impl<const N: usize> AlphaBetaSearcher<HeuristicWeights, N> {
    /// Construct a new `AlphaBetaSearcher` using the standard evaluation
    ///
    /// ```rust
    /// use twenty48_minimax::{alpha_beta::AlphaBetaSearcher, board::StandardBoard};
    ///
    /// let board = StandardBoard::from_rows([
    ///     [2, 0, 0, 0],
    ///     [0, 0, 0, 0],
    ///     [0, 0, 2, 0],
    ///     [0, 0, 0, 0],
    /// ]);
    ///
    /// let searcher = AlphaBetaSearcher::from_board(board, "hint");
    ///
    /// assert!(searcher.single_search(1).direction.is_some());
    /// ```
    pub fn from_board(board: Board<N>, name: &'static str) -> Self {
        Self::new(board, HeuristicWeights::default(), name, Default::default())
    }

    /// Construct a new `AlphaBetaSearcher` using the standard evaluation and the given
    /// [SearchOptions]
    ///
    /// [SearchOptions] implements [Default] so you can override specific options and rely on
    /// defaults for the rest.
    ///
    /// ```rust
    /// use std::time::Duration;
    /// use twenty48_minimax::{
    ///     alpha_beta::{AlphaBetaSearcher, SearchOptions},
    ///     board::StandardBoard,
    /// };
    ///
    /// let options = SearchOptions {
    ///     time_budget: Duration::from_millis(20),
    ///     ..Default::default()
    /// };
    ///
    /// let searcher =
    ///     AlphaBetaSearcher::from_board_with_options(StandardBoard::new(), "empty", options);
    ///
    /// // Nothing on the board means nothing can move
    /// assert_eq!(searcher.choose_move(), None);
    /// ```
    pub fn from_board_with_options(
        board: Board<N>,
        name: &'static str,
        options: SearchOptions,
    ) -> Self {
        Self::new(board, HeuristicWeights::default(), name, options)
    }
}

impl<ScorableType, const N: usize> AlphaBetaSearcher<ScorableType, N>
where
    ScorableType: Scorable<N>,
{
    /// Construct a new `AlphaBetaSearcher`
    pub fn new(
        board: Board<N>,
        score_function: ScorableType,
        name: &'static str,
        options: SearchOptions,
    ) -> Self {
        Self {
            board,
            score_function,
            name,
            options,
        }
    }

    #[allow(missing_docs)]
    pub fn options(&self) -> &SearchOptions {
        &self.options
    }

    /// Pick the next move to make
    ///
    /// This uses [AlphaBetaSearcher::deepened_search_until_timelimit()] to deepen the search
    /// until we run out of time, and returns the chosen direction. `None` means the board is
    /// terminal and the game is over.
    pub fn choose_move(&self) -> Option<Direction> {
        info_span!(
            "deepened_search",
            searcher_name = self.name,
            time_budget_ms = self.options.time_budget.as_millis() as u64,
            chosen_score = tracing::field::Empty,
            chosen_direction = tracing::field::Empty,
            depth = tracing::field::Empty,
        )
        .in_scope(|| {
            let (_, result) = self.deepened_search_until_timelimit()?;

            result.direction
        })
    }

    /// Run the search at the given depth with the full window, from the searcher's board
    ///
    /// Depth counts player plies below the first one. Depth `0` scores the board after each
    /// direction directly, depth `1` also looks at every reply and the player's move after it.
    ///
    /// This can/is also be used as a benchmark entry point
    pub fn single_search(&self, depth: usize) -> SearchResult {
        self.search(
            &self.board,
            depth,
            LOWEST_SCORE,
            HIGHEST_SCORE,
            SearchStats::default(),
        )
    }

    /// This will do a iterative deepening search until we reach the time limit. Iterative
    /// deepening means it will first start by searching at depth 0. Then it moves on to
    /// depth 1, and so on until we run out of time.
    ///
    /// Only whole depths count. The result is always the one from the deepest depth that ran to
    /// completion, along with that depth. A depth where the player can't move at all is
    /// discarded and ends the deepening, since deeper searches can't find anything either.
    ///
    /// Returns `None` if the board is terminal from the start.
    pub fn deepened_search_until_timelimit(&self) -> Option<(usize, SearchResult)> {
        let started_at = Instant::now();
        let time_budget = self.options.time_budget;

        self.deepen(|_| started_at.elapsed() < time_budget)
    }

    /// This will do a iterative deepening search until the specified depth, ignoring the time
    /// budget. This is currently used mostly for debugging and benchmarking
    pub fn deepened_search_to_depth(&self, max_depth: usize) -> Option<(usize, SearchResult)> {
        self.deepen(|depth| depth <= max_depth)
    }

    /// `keep_going` is asked before each depth after the first, and given that depth
    fn deepen(&self, mut keep_going: impl FnMut(usize) -> bool) -> Option<(usize, SearchResult)> {
        let current_span = tracing::Span::current();

        let mut current: Option<(usize, SearchResult)> = None;
        let mut depth = 0;

        loop {
            let next = self.single_search(depth);

            if next.direction.is_none() {
                info!(depth, "No direction can move, no need to keep going");
                break;
            }

            debug!(
                depth,
                score = next.score,
                direction = ?next.direction,
                positions = next.stats.positions,
                cutoffs = next.stats.cutoffs,
                "finished depth"
            );
            current = Some((depth, next));

            depth += 1;

            if self.options.max_depth.map_or(false, |max| depth > max) || !keep_going(depth) {
                break;
            }
        }

        if let Some((depth, result)) = &current {
            current_span.record("chosen_score", result.score);
            current_span.record(
                "chosen_direction",
                format!("{:?}", result.direction).as_str(),
            );
            current_span.record("depth", *depth as u64);
        }

        current
    }

    /// Score every direction that can move with its own full window search. See [RootAnalysis]
    pub fn analyze_root(&self, depth: usize) -> RootAnalysis {
        let mut options = Direction::all()
            .into_iter()
            .filter_map(|direction| {
                let (child, outcome) = self.board.with_move(direction);
                if !outcome.moved {
                    return None;
                }

                let mut stats = SearchStats {
                    positions: 1,
                    cutoffs: 0,
                };

                let score = if outcome.won {
                    WIN_SCORE
                } else if depth == 0 {
                    self.score_function.score(&child)
                } else {
                    let result =
                        self.search(&child, depth - 1, LOWEST_SCORE, HIGHEST_SCORE, stats);
                    stats = result.stats;

                    penalize_deeper_win(result.score)
                };

                Some((
                    direction,
                    SearchResult {
                        direction: Some(direction),
                        score,
                        stats,
                    },
                ))
            })
            .collect_vec();

        // Stable, so ties stay in search order
        options.sort_by(|(_, a), (_, b)| b.score.total_cmp(&a.score));

        RootAnalysis { depth, options }
    }

    fn search(
        &self,
        node: &Board<N>,
        depth: usize,
        alpha: f64,
        beta: f64,
        stats: SearchStats,
    ) -> SearchResult {
        match NodeKind::of(node) {
            NodeKind::Player => self.search_player(node, depth, alpha, beta, stats),
            NodeKind::Environment => self.search_environment(node, depth, alpha, beta, stats),
        }
    }

    fn search_player(
        &self,
        node: &Board<N>,
        depth: usize,
        alpha: f64,
        beta: f64,
        mut stats: SearchStats,
    ) -> SearchResult {
        let mut best_score = alpha;
        let mut best_direction = None;

        for direction in Direction::all() {
            let (child, outcome) = node.with_move(direction);
            if !outcome.moved {
                continue;
            }
            stats.positions += 1;

            // Only a merge made by this move counts, a winning tile already on the board doesn't
            if outcome.won {
                return SearchResult {
                    direction: Some(direction),
                    score: WIN_SCORE,
                    stats,
                };
            }

            let score = if depth == 0 {
                self.score_function.score(&child)
            } else {
                let result = self.search(&child, depth - 1, best_score, beta, stats);
                stats = result.stats;

                penalize_deeper_win(result.score)
            };

            if score > best_score {
                best_score = score;
                best_direction = Some(direction);
            }

            if best_score > beta {
                stats.cutoffs += 1;

                return SearchResult {
                    direction: best_direction,
                    score: beta,
                    stats,
                };
            }
        }

        SearchResult {
            direction: best_direction,
            score: best_score,
            stats,
        }
    }

    fn search_environment(
        &self,
        node: &Board<N>,
        depth: usize,
        alpha: f64,
        beta: f64,
        mut stats: SearchStats,
    ) -> SearchResult {
        let mut best_score = beta;

        for (position, value) in spawn_candidates(node) {
            let mut child = *node;
            child.insert_tile(Tile::new(position, value));
            child.player_turn = true;
            stats.positions += 1;

            // Spawns don't use up depth, only player moves do
            let result = self.search(&child, depth, alpha, best_score, stats);
            stats = result.stats;

            if result.score < best_score {
                best_score = result.score;
            }

            if best_score < alpha {
                stats.cutoffs += 1;

                return SearchResult {
                    direction: None,
                    score: alpha,
                    stats,
                };
            }
        }

        SearchResult {
            direction: None,
            score: best_score,
            stats,
        }
    }
}

fn penalize_deeper_win(score: f64) -> f64 {
    if score > WIN_THRESHOLD {
        score - 1.0
    } else {
        score
    }
}

/// The spawns the environment ply actually searches
///
/// Every empty cell is tried with every value in [SPAWN_VALUES] and scored by
/// [Board::annoyance] of the resulting board. Only the spawns that tie for the highest
/// annoyance are kept, all of them, 2s before 4s and otherwise in
/// [Board::available_cells] order.
pub fn spawn_candidates<const N: usize>(board: &Board<N>) -> Vec<(Position, u32)> {
    let cells = board.available_cells();

    let scored = SPAWN_VALUES
        .iter()
        .flat_map(|&value| {
            cells.iter().map(move |&cell| {
                let mut spawned = *board;
                spawned.insert_tile(Tile::new(cell, value));

                (cell, value, spawned.annoyance())
            })
        })
        .collect_vec();

    let most_annoying = scored
        .iter()
        .map(|(_, _, annoyance)| *annoyance)
        .fold(f64::NEG_INFINITY, f64::max);

    scored
        .into_iter()
        .filter(|(_, _, annoyance)| *annoyance == most_annoying)
        .map(|(cell, value, _)| (cell, value))
        .collect()
}
