use std::{fs::File, path::PathBuf};

use color_eyre::eyre::{Result, WrapErr};
use tracing::info;

use crate::game::Game;

#[derive(clap::Args, Debug)]
pub struct Fixture {
    /// Seed for the starting tiles. Random if not given
    #[clap(short, long, value_parser)]
    seed: Option<u64>,

    /// Where to write the board
    #[clap(short, long, value_parser)]
    out: PathBuf,
}

impl Fixture {
    pub fn run(self) -> Result<()> {
        let game = Game::new(self.seed);

        let file = File::create(&self.out)
            .wrap_err_with(|| format!("Could not create {}", self.out.display()))?;
        serde_json::to_writer_pretty(file, &game.board.to_serialized())
            .wrap_err("Could not write the board")?;

        info!(out = %self.out.display(), "Wrote fixture");
        print!("{}", game.board);

        Ok(())
    }
}
