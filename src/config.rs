use color_eyre::{eyre::eyre, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::pokeapi::client::DEFAULT_PAGE_SIZE;

pub const DEFAULT_BASE_URL: &str = "https://pokeapi.co/api/v2";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
  #[serde(default)]
  pub api: ApiConfig,
  #[serde(default)]
  pub query: QueryConfig,
  #[serde(default)]
  pub log: LogConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
  pub base_url: String,
  /// Request timeout; the HTTP client default when unset
  pub timeout_secs: Option<u64>,
  /// Concurrent per-Pokémon requests within one page or batch
  pub max_concurrency: usize,
  /// `limit` of the single listing request behind the name index
  pub name_index_limit: u32,
}

impl Default for ApiConfig {
  fn default() -> Self {
    Self {
      base_url: DEFAULT_BASE_URL.to_string(),
      timeout_secs: None,
      max_concurrency: 8,
      name_index_limit: 10_000,
    }
  }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct QueryConfig {
  pub page_size: u32,
  /// Retries after a failed fetch (exponential backoff from 1s, capped at 30s)
  pub retries: u32,
  /// Staleness window of a single Pokémon
  pub pokemon_stale_secs: u64,
  /// Staleness window of search results
  pub search_stale_secs: u64,
  /// Staleness window of the paginated listing
  pub list_stale_secs: u64,
  /// Quiet period before an interactive search term is resolved
  pub debounce_ms: u64,
}

impl Default for QueryConfig {
  fn default() -> Self {
    Self {
      page_size: DEFAULT_PAGE_SIZE,
      retries: 3,
      pokemon_stale_secs: 60 * 60,
      search_stale_secs: 5 * 60,
      list_stale_secs: 60 * 60,
      debounce_ms: 500,
    }
  }
}

impl QueryConfig {
  pub fn pokemon_stale_time(&self) -> Duration {
    Duration::from_secs(self.pokemon_stale_secs)
  }

  pub fn search_stale_time(&self) -> Duration {
    Duration::from_secs(self.search_stale_secs)
  }

  pub fn list_stale_time(&self) -> Duration {
    Duration::from_secs(self.list_stale_secs)
  }

  pub fn debounce(&self) -> Duration {
    Duration::from_millis(self.debounce_ms)
  }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LogConfig {
  /// Default filter directive when RUST_LOG is not set (e.g. "info", "pokedex=debug")
  pub level: String,
  /// Write logs to this file instead of stderr
  pub file: Option<PathBuf>,
}

impl Default for LogConfig {
  fn default() -> Self {
    Self {
      level: "warn".to_string(),
      file: None,
    }
  }
}

impl Config {
  /// Load configuration from file.
  ///
  /// Search order:
  /// 1. Explicit path if provided
  /// 2. ./pokedex.yaml (current directory)
  /// 3. $XDG_CONFIG_HOME/pokedex/config.yaml
  ///
  /// Without a file the defaults are used. `POKEDEX_API_URL` overrides the base URL.
  pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
    let path = if let Some(p) = explicit_path {
      if p.exists() {
        Some(p.to_path_buf())
      } else {
        return Err(eyre!("Config file not found: {}", p.display()));
      }
    } else {
      Self::find_config_file()
    };

    let mut config = match path {
      Some(p) => Self::load_from_path(&p)?,
      None => Self::default(),
    };

    if let Some(url) = Self::get_api_url_override() {
      config.api.base_url = url;
    }

    Ok(config)
  }

  fn find_config_file() -> Option<PathBuf> {
    // Check current directory
    let local = PathBuf::from("pokedex.yaml");
    if local.exists() {
      return Some(local);
    }

    // Check XDG config directory
    if let Some(config_dir) = dirs::config_dir() {
      let xdg_path = config_dir.join("pokedex").join("config.yaml");
      if xdg_path.exists() {
        return Some(xdg_path);
      }
    }

    None
  }

  fn load_from_path(path: &Path) -> Result<Self> {
    let contents = std::fs::read_to_string(path)
      .map_err(|e| eyre!("Failed to read config file {}: {}", path.display(), e))?;

    Self::parse(&contents)
      .map_err(|e| eyre!("Failed to parse config file {}: {}", path.display(), e))
  }

  fn parse(contents: &str) -> std::result::Result<Self, serde_yaml::Error> {
    // An empty file deserializes as unit, not as an empty mapping
    if contents.trim().is_empty() {
      return Ok(Self::default());
    }
    serde_yaml::from_str(contents)
  }

  /// Base URL override from the environment.
  ///
  /// Checks POKEDEX_API_URL.
  fn get_api_url_override() -> Option<String> {
    std::env::var("POKEDEX_API_URL")
      .ok()
      .filter(|url| !url.trim().is_empty())
  }
}
