pub mod fixture;
pub mod play;
pub mod solve;

use fixture::Fixture;
use play::Play;
use solve::Solve;

use clap::Subcommand;
use color_eyre::eyre::Result;

#[derive(Debug, Subcommand)]
pub(crate) enum Command {
    /// Pick a move for a board stored as JSON
    Solve(Solve),
    /// Let the search play a game against random spawns
    Play(Play),
    /// Write a fresh starting board as JSON
    Fixture(Fixture),
}

impl Command {
    pub fn run(self) -> Result<()> {
        match self {
            Command::Solve(s) => s.run()?,
            Command::Play(p) => p.run()?,
            Command::Fixture(f) => f.run()?,
        }

        Ok(())
    }
}
