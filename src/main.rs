use anyhow::Result;
use clap::Parser;
use github_user_search::tracing_setup::{self, LogSink, Verbosity};
use github_user_search::{Cli, Commands, config};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let verbosity = Verbosity::from_flags(cli.verbose, cli.quiet);
    let data_dir = config::default_data_dir();
    let sink = match cli.command {
        // The screen owns the terminal.
        Commands::Tui { .. } => LogSink::File(&data_dir),
        _ => LogSink::Stderr,
    };
    let _guard = tracing_setup::init_subscriber(verbosity, sink);
    github_user_search::run(cli).await
}
