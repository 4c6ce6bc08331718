//! Runtime configuration.
//!
//! Layering, lowest to highest precedence: built-in defaults, TOML file,
//! environment (`GHS_*`, `.env` honored through dotenvy), command-line flags.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

pub const DEFAULT_API_BASE: &str = "https://api.github.com";
pub const DEFAULT_DEBOUNCE_MS: u64 = 500;
pub const DEFAULT_HTTP_TIMEOUT_MS: u64 = 10_000;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Quiet window before a typed query is searched.
    pub debounce_ms: u64,
    pub api_base: String,
    pub http_timeout_ms: u64,
    pub user_agent: String,
    /// Query pre-filled when the screen opens.
    pub initial_query: String,
    /// Start with selection controls shown.
    pub edit_mode: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            debounce_ms: DEFAULT_DEBOUNCE_MS,
            api_base: DEFAULT_API_BASE.to_string(),
            http_timeout_ms: DEFAULT_HTTP_TIMEOUT_MS,
            user_agent: concat!("ghs/", env!("CARGO_PKG_VERSION")).to_string(),
            initial_query: String::new(),
            edit_mode: false,
        }
    }
}

impl Config {
    /// Defaults, then the file at `path` (or the default config file when it
    /// exists), then environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut cfg = match path {
            Some(p) => Self::from_file(p)?,
            None => {
                let default = default_config_path();
                if default.is_file() {
                    Self::from_file(&default)?
                } else {
                    Self::default()
                }
            }
        };
        cfg.apply_env();
        Ok(cfg)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let cfg: Self = toml::from_str(&raw)
            .with_context(|| format!("parsing config {}", path.display()))?;
        debug!(path = %path.display(), "loaded config file");
        Ok(cfg)
    }

    pub fn apply_env(&mut self) {
        if let Some(ms) = env_u64("GHS_DEBOUNCE_MS") {
            self.debounce_ms = ms;
        }
        if let Ok(base) = dotenvy::var("GHS_API_BASE") {
            self.api_base = base;
        }
        if let Some(ms) = env_u64("GHS_HTTP_TIMEOUT_MS") {
            self.http_timeout_ms = ms;
        }
        if let Ok(ua) = dotenvy::var("GHS_USER_AGENT") {
            self.user_agent = ua;
        }
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

fn env_u64(key: &str) -> Option<u64> {
    let raw = dotenvy::var(key).ok()?;
    match raw.trim().parse::<u64>() {
        Ok(v) => Some(v),
        Err(e) => {
            warn!(key, value = %raw, "ignoring invalid numeric override: {e}");
            None
        }
    }
}

fn project_dirs() -> Option<directories::ProjectDirs> {
    directories::ProjectDirs::from("com", "github-user-search", "github-user-search")
}

pub fn default_config_path() -> PathBuf {
    project_dirs().map_or_else(
        || PathBuf::from("config.toml"),
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

pub fn default_data_dir() -> PathBuf {
    project_dirs().map_or_else(
        || PathBuf::from("."),
        |dirs| dirs.data_dir().to_path_buf(),
    )
}
