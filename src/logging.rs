//! File logging. The terminal belongs to the TUI, so tracing output goes to
//! `$XDG_DATA_HOME/reelscout/reelscout.log`.

use std::path::{Path, PathBuf};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

const LOG_FILE: &str = "reelscout.log";

/// Default log directory, `/tmp/reelscout` when no data dir is known
pub fn log_dir() -> PathBuf {
  dirs::data_dir()
    .map(|d| d.join("reelscout"))
    .unwrap_or_else(|| PathBuf::from("/tmp/reelscout"))
}

/// `RUST_LOG` wins over the configured level; the fallback is `info`.
pub fn env_filter(level: Option<&str>) -> EnvFilter {
  EnvFilter::try_from_default_env()
    .or_else(|_| EnvFilter::try_new(level.unwrap_or("info")))
    .unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Install the global subscriber. Keep the guard alive for the whole run or
/// buffered lines are lost.
pub fn init(dir: &Path, level: Option<&str>) -> color_eyre::Result<WorkerGuard> {
  std::fs::create_dir_all(dir)?;
  let appender = tracing_appender::rolling::never(dir, LOG_FILE);
  let (writer, guard) = tracing_appender::non_blocking(appender);

  tracing_subscriber::fmt()
    .with_writer(writer)
    .with_env_filter(env_filter(level))
    .with_ansi(false)
    .with_target(false)
    .try_init()
    .map_err(|e| color_eyre::eyre::eyre!("failed to install logger: {}", e))?;

  Ok(guard)
}
