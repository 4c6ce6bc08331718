//! Tracing subscriber initialization for the `ghs` binary.
//!
//! # Filter priority (highest to lowest)
//!
//! 1. `GHS_LOG` env var (directives, e.g. `github_user_search=debug,warn`)
//! 2. `RUST_LOG` env var
//! 3. CLI flags (`-v` → debug, `-q` → error)
//! 4. Default level: `warn`
//!
//! The interactive screen owns the terminal, so its logs go to a daily file
//! under the data directory. Every other command logs to stderr.

use std::path::Path;

use tracing::Level;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt;
use tracing_subscriber::prelude::*;

pub const LOG_ENV: &str = "GHS_LOG";
pub const LOG_FILE_PREFIX: &str = "ghs.log";

/// Verbosity level derived from CLI flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verbosity {
    Quiet,
    Normal,
    Verbose,
}

impl Verbosity {
    /// `--verbose` wins when both flags are given.
    pub const fn from_flags(verbose: bool, quiet: bool) -> Self {
        if verbose {
            Self::Verbose
        } else if quiet {
            Self::Quiet
        } else {
            Self::Normal
        }
    }

    pub const fn default_level(self) -> Level {
        match self {
            Self::Quiet => Level::ERROR,
            Self::Normal => Level::WARN,
            Self::Verbose => Level::DEBUG,
        }
    }
}

/// Where log lines are written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogSink<'a> {
    Stderr,
    /// Daily-rolling file in this directory.
    File(&'a Path),
}

/// Install the global subscriber. Hold the returned guard until exit so the
/// file writer flushes.
pub fn init_subscriber(verbosity: Verbosity, sink: LogSink<'_>) -> Option<WorkerGuard> {
    let filter = build_env_filter(verbosity);
    match sink {
        LogSink::Stderr => {
            let stderr_is_tty = std::io::IsTerminal::is_terminal(&std::io::stderr());
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    fmt::layer()
                        .with_writer(std::io::stderr)
                        .with_ansi(stderr_is_tty)
                        .without_time()
                        .compact(),
                )
                .init();
            None
        }
        LogSink::File(dir) => {
            // Logging is best effort; the screen still works without a log file.
            if std::fs::create_dir_all(dir).is_err() {
                return None;
            }
            let appender = tracing_appender::rolling::daily(dir, LOG_FILE_PREFIX);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer().with_writer(writer).with_ansi(false))
                .init();
            Some(guard)
        }
    }
}

/// `GHS_LOG` > `RUST_LOG` > CLI verbosity. Unparseable directives fall through.
pub fn build_env_filter(verbosity: Verbosity) -> EnvFilter {
    if let Ok(directives) = dotenvy::var(LOG_ENV)
        && let Ok(filter) = EnvFilter::try_new(&directives)
    {
        return filter;
    }
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return filter;
    }
    let level = verbosity.default_level();
    let directive = if verbosity == Verbosity::Verbose {
        format!("{level},github_user_search=debug")
    } else {
        level.to_string()
    };
    EnvFilter::try_new(&directive).unwrap_or_else(|_| EnvFilter::new(level.as_str()))
}
