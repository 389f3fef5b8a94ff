use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

const API_KEY_VARS: [&str; 2] = ["REELSCOUT_TMDB_API_KEY", "TMDB_API_KEY"];

/// Startup configuration failure. Always fatal.
#[derive(Debug, Error)]
pub enum ConfigError {
  #[error("TMDB API key not found. Set REELSCOUT_TMDB_API_KEY or TMDB_API_KEY environment variable.")]
  MissingApiKey,

  #[error("Config file not found: {0}")]
  NotFound(PathBuf),

  #[error("Failed to read config file {path}: {source}")]
  Read {
    path: PathBuf,
    source: std::io::Error,
  },

  #[error("Failed to parse config file {path}: {source}")]
  Parse {
    path: PathBuf,
    source: serde_yaml::Error,
  },
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
  #[serde(default)]
  pub tmdb: TmdbConfig,
  #[serde(default)]
  pub cache: CacheConfig,
  #[serde(default)]
  pub search: SearchConfig,
  /// Tracing filter directive, overridden by RUST_LOG
  pub log_level: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TmdbConfig {
  pub base_url: String,
  pub image_base_url: String,
  pub language: String,
  pub timeout_secs: u64,
}

impl Default for TmdbConfig {
  fn default() -> Self {
    Self {
      base_url: "https://api.themoviedb.org/3".to_string(),
      image_base_url: "https://image.tmdb.org/t/p".to_string(),
      language: "en-US".to_string(),
      timeout_secs: 30,
    }
  }
}

impl TmdbConfig {
  pub fn timeout(&self) -> Duration {
    Duration::from_secs(self.timeout_secs)
  }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
  /// Seconds after a successful fetch before data is refetched
  pub stale_time_secs: u64,
  /// Seconds an unused entry is kept before eviction
  pub gc_time_secs: u64,
}

impl Default for CacheConfig {
  fn default() -> Self {
    Self {
      stale_time_secs: 5 * 60,
      gc_time_secs: 30 * 60,
    }
  }
}

impl CacheConfig {
  pub fn stale_time(&self) -> Duration {
    Duration::from_secs(self.stale_time_secs)
  }

  pub fn gc_time(&self) -> Duration {
    Duration::from_secs(self.gc_time_secs)
  }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
  pub debounce_ms: u64,
}

impl Default for SearchConfig {
  fn default() -> Self {
    Self { debounce_ms: 500 }
  }
}

impl SearchConfig {
  pub fn debounce(&self) -> Duration {
    Duration::from_millis(self.debounce_ms)
  }
}

impl Config {
  /// Load configuration from file.
  ///
  /// Search order:
  /// 1. Explicit path if provided (must exist)
  /// 2. ./reelscout.yaml (current directory)
  /// 3. $XDG_CONFIG_HOME/reelscout/config.yaml
  ///
  /// Falls back to defaults when no file is found.
  pub fn load(explicit_path: Option<&Path>) -> Result<Self, ConfigError> {
    let path = match explicit_path {
      Some(p) if p.exists() => Some(p.to_path_buf()),
      Some(p) => return Err(ConfigError::NotFound(p.to_path_buf())),
      None => Self::find_config_file(),
    };

    match path {
      Some(p) => Self::load_from_path(&p),
      None => Ok(Self::default()),
    }
  }

  fn find_config_file() -> Option<PathBuf> {
    let local = PathBuf::from("reelscout.yaml");
    if local.exists() {
      return Some(local);
    }

    let xdg_path = dirs::config_dir()?.join("reelscout").join("config.yaml");
    xdg_path.exists().then_some(xdg_path)
  }

  fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
    let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
      path: path.to_path_buf(),
      source,
    })?;

    serde_yaml::from_str(&contents).map_err(|source| ConfigError::Parse {
      path: path.to_path_buf(),
      source,
    })
  }

  /// Get the TMDB API key from environment variables.
  ///
  /// Checks REELSCOUT_TMDB_API_KEY first, then TMDB_API_KEY as fallback.
  pub fn get_api_key() -> Result<String, ConfigError> {
    api_key_from(|name| std::env::var(name).ok())
  }
}

fn api_key_from(lookup: impl Fn(&str) -> Option<String>) -> Result<String, ConfigError> {
  API_KEY_VARS
    .iter()
    .filter_map(|name| lookup(name))
    .map(|key| key.trim().to_string())
    .find(|key| !key.is_empty())
    .ok_or(ConfigError::MissingApiKey)
}
