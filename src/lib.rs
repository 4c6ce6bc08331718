pub mod config;
pub mod model;
pub mod mutate;
pub mod search;
pub mod selection;
pub mod tracing_setup;
pub mod ui;

use anyhow::{Context, Result, bail};
use clap::{CommandFactory, Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;

use config::Config;
use search::client::GithubClient;
use search::debounce::Debouncer;
use ui::driver::SessionDriver;
use ui::state::{SearchScreen, Snapshot};

/// Command-line interface.
#[derive(Parser, Debug)]
#[command(
    name = "ghs",
    version,
    about = "Debounced TUI search over GitHub user profiles"
)]
pub struct Cli {
    /// Path to a TOML config file (defaults to the platform config dir)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Quiet window in milliseconds before a typed query is searched
    #[arg(long, global = true)]
    pub debounce_ms: Option<u64>,

    /// Base URL of the GitHub API
    #[arg(long, global = true)]
    pub api_base: Option<String>,

    /// Debug-level logs
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Errors only
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Launch the interactive search screen
    Tui {
        /// Render once and exit (headless-friendly)
        #[arg(long, default_value_t = false)]
        once: bool,

        /// Start with this query already typed
        #[arg(long)]
        query: Option<String>,

        /// Start with selection controls shown
        #[arg(long, default_value_t = false)]
        edit: bool,
    },
    /// Run one search to completion and print the result
    Search {
        query: String,

        /// Print the full screen snapshot as JSON
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Generate shell completions to stdout
    Completions {
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
    /// Generate man page to stdout
    Man,
}

impl Cli {
    /// Resolve the effective configuration: file, then env, then flags.
    pub fn resolve_config(&self) -> Result<Config> {
        let mut cfg = Config::load(self.config.as_deref())?;
        if let Some(ms) = self.debounce_ms {
            cfg.debounce_ms = ms;
        }
        if let Some(base) = &self.api_base {
            cfg.api_base = base.clone();
        }
        Ok(cfg)
    }
}

pub async fn run(cli: Cli) -> Result<()> {
    match &cli.command {
        Commands::Tui { once, query, edit } => {
            let mut cfg = cli.resolve_config()?;
            if let Some(q) = query {
                cfg.initial_query = q.clone();
            }
            cfg.edit_mode |= *edit;
            ui::tui::run_tui(&cfg, *once).await
        }
        Commands::Search { query, json } => {
            let cfg = cli.resolve_config()?;
            let snap = run_search(&cfg, query).await?;
            print_snapshot(&snap, *json)?;
            if let Some(err) = &snap.error {
                bail!("search failed: {}", err.message);
            }
            Ok(())
        }
        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            clap_complete::generate(*shell, &mut cmd, "ghs", &mut std::io::stdout());
            Ok(())
        }
        Commands::Man => {
            let cmd = Cli::command();
            let man = clap_mangen::Man::new(cmd);
            let mut out = std::io::stdout();
            man.render(&mut out)?;
            Ok(())
        }
    }
}

/// Type `query`, let the debounce elapse, and wait for the lookup to settle.
pub async fn run_search(config: &Config, query: &str) -> Result<Snapshot> {
    let client = Arc::new(GithubClient::from_config(config)?);
    let mut screen = SearchScreen::new(Debouncer::new(config.debounce()));
    screen.set_query(query);
    let mut driver = SessionDriver::new(screen, client);
    driver.settle().await;
    Ok(driver.screen().snapshot())
}

fn print_snapshot(snap: &Snapshot, json: bool) -> Result<()> {
    if json {
        let out = serde_json::to_string_pretty(snap).context("serializing snapshot")?;
        println!("{out}");
        return Ok(());
    }
    if let Some(notice) = &snap.notice {
        println!("{notice}");
    }
    if let Some(err) = &snap.error {
        println!("{}", err.message);
    }
    if let Some(rs) = &snap.results {
        println!("{} results ({} shown)", rs.total_count, rs.len());
        for user in &rs.items {
            println!("{}\t{}\t{}", user.id, user.login, user.html_url);
        }
    }
    Ok(())
}
