use std::{fs::File, io::BufReader, path::PathBuf, time::Duration};

use color_eyre::eyre::{eyre, Result, WrapErr};
use twenty48_minimax::{
    alpha_beta::{AlphaBetaSearcher, SearchOptions},
    board::StandardBoard,
    wire::{compute_best_move_with_options, SerializedBoard},
};

#[derive(clap::Args, Debug)]
pub(crate) struct Solve {
    /// JSON file holding the board to solve
    #[clap(short, long, value_parser)]
    file: PathBuf,

    /// How long to keep deepening the search
    #[clap(short, long, value_parser, default_value_t = 100)]
    time_budget_ms: u64,

    /// Never search deeper than this, even with time left
    #[clap(short = 'd', long, value_parser)]
    max_depth: Option<usize>,

    /// Print every direction with its own score instead of just the best one. 4x4 boards only
    #[clap(short, long)]
    explain: bool,
}

impl Solve {
    pub(crate) fn run(self) -> Result<()> {
        let file = File::open(&self.file)
            .wrap_err_with(|| format!("Could not open {}", self.file.display()))?;
        let serialized: SerializedBoard = serde_json::from_reader(BufReader::new(file))
            .wrap_err_with(|| format!("{} is not a valid board", self.file.display()))?;

        if self.explain {
            return self.print_analysis(&serialized);
        }

        let direction = compute_best_move_with_options(&serialized, self.options())
            .map_err(|e| eyre!("{e:#}"))?;

        match direction {
            Some(direction) => println!("{direction}"),
            None => println!("none"),
        }

        Ok(())
    }

    fn options(&self) -> SearchOptions {
        SearchOptions {
            time_budget: Duration::from_millis(self.time_budget_ms),
            max_depth: self.max_depth,
        }
    }

    fn print_analysis(&self, serialized: &SerializedBoard) -> Result<()> {
        let board = StandardBoard::try_from(serialized).map_err(|e| eyre!("{e:#}"))?;
        println!("{board}");

        let searcher = AlphaBetaSearcher::from_board_with_options(board, "explain", self.options());

        let Some((depth, _)) = searcher.deepened_search_until_timelimit() else {
            println!("No direction can move, the game is over");
            return Ok(());
        };

        let analysis = searcher.analyze_root(depth);
        println!("{}", analysis.to_text_tree());

        if let Some((direction, result)) = analysis.best() {
            println!("Best move is {direction} scoring {:.4}", result.score);
        }

        Ok(())
    }
}
