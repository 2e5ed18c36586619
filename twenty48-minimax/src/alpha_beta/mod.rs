//! Two player alpha-beta search over a single board.
//!
//! The player is the maximizer and picks one of the four directions. The environment is the
//! minimizer: instead of looking at every possible spawn it only tries the few that are most
//! annoying for the player (see [spawn_candidates]). Only player plies count towards the depth.
//!
//! Every node is scored from the player's point of view with a [Scorable], which by default is
//! the weighted heuristic from [crate::heuristic].
//!
//! ```rust
//! use std::time::Duration;
//! use twenty48_minimax::{
//!     alpha_beta::{AlphaBetaSearcher, SearchOptions},
//!     board::{Direction, StandardBoard},
//! };
//!
//! let board = StandardBoard::from_rows([
//!     [2, 2, 0, 0],
//!     [0, 4, 0, 0],
//!     [0, 0, 0, 0],
//!     [0, 0, 0, 8],
//! ]);
//!
//! let options = SearchOptions {
//!     time_budget: Duration::from_millis(10),
//!     max_depth: Some(3),
//! };
//!
//! let searcher = AlphaBetaSearcher::from_board_with_options(board, "doc", options);
//!
//! // Something can always move on this board
//! let direction: Option<Direction> = searcher.choose_move();
//! assert!(direction.is_some());
//!
//! // The same search, without the clock
//! let (depth, result) = searcher.deepened_search_to_depth(1).unwrap();
//! assert_eq!(depth, 1);
//! assert!(result.stats.positions > 0);
//! ```

mod score;
pub use score::{Scorable, HIGHEST_SCORE, LOWEST_SCORE, WIN_SCORE, WIN_THRESHOLD};

mod search_result;
pub use search_result::{RootAnalysis, SearchResult, SearchStats};

mod eval;
pub use eval::{spawn_candidates, AlphaBetaSearcher, SearchOptions, SPAWN_VALUES};
