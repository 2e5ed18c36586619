use clap::Parser;
use color_eyre::eyre::Result;
use tracing_subscriber::EnvFilter;

mod commands;
mod game;

/// Pick moves for 2048 boards, or let the search play whole games
#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Args {
    /// Write logs as JSON lines instead of plain text
    #[clap(long, global = true)]
    log_json: bool,

    #[clap(subcommand)]
    command: commands::Command,
}

fn main() -> Result<()> {
    color_eyre::install()?;
    let args = Args::parse();

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr);

    if args.log_json {
        subscriber.json().flatten_event(true).init();
    } else {
        subscriber.init();
    }

    args.command.run()
}
