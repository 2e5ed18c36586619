use std::time::Duration;

use color_eyre::eyre::Result;
use tracing::{debug, info};
use twenty48_minimax::{
    alpha_beta::{AlphaBetaSearcher, SearchOptions},
    board::WINNING_TILE,
};

use crate::game::Game;

#[derive(clap::Args, Debug)]
pub(crate) struct Play {
    /// Seed for the spawned tiles. Random if not given
    #[clap(short, long, value_parser)]
    seed: Option<u64>,

    /// How long the search gets for each move
    #[clap(short, long, value_parser, default_value_t = 100)]
    time_budget_ms: u64,

    /// Never search deeper than this, even with time left
    #[clap(short = 'd', long, value_parser)]
    max_depth: Option<usize>,

    /// Stop after this many moves even if the game isn't over
    #[clap(short, long, value_parser)]
    max_moves: Option<usize>,

    /// Keep going after the winning tile is made
    #[clap(short, long)]
    keep_playing: bool,
}

impl Play {
    pub(crate) fn run(self) -> Result<()> {
        let options = SearchOptions {
            time_budget: Duration::from_millis(self.time_budget_ms),
            max_depth: self.max_depth,
        };

        let mut game = Game::new(self.seed);

        loop {
            if self.max_moves.map_or(false, |max| game.moves >= max) {
                info!(moves = game.moves, "Reached the move limit");
                break;
            }
            if game.won && !self.keep_playing {
                info!(moves = game.moves, "Made {WINNING_TILE}");
                break;
            }

            let searcher = AlphaBetaSearcher::from_board_with_options(game.board, "play", options);
            let Some(direction) = searcher.choose_move() else {
                break;
            };

            let outcome = game.apply(direction);
            debug!(
                moves = game.moves,
                %direction,
                merged = outcome.score,
                score = game.score,
                "Made a move"
            );

            if game.is_over() {
                break;
            }
        }

        print!("{}", game.board);
        println!(
            "score {} after {} moves, largest tile {}{}",
            game.score,
            game.moves,
            game.board.max_value().unwrap_or(0),
            if game.won { ", won" } else { "" }
        );

        Ok(())
    }
}
