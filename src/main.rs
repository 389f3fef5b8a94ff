mod app;
mod browse;
mod cache;
mod config;
mod debounce;
mod event;
mod logging;
mod query;
mod tmdb;
mod ui;

use clap::Parser;
use color_eyre::Result;
use std::path::PathBuf;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "reelscout")]
#[command(about = "Browse and search movies from TMDB in the terminal")]
#[command(version)]
struct Args {
  /// Path to config file (default: $XDG_CONFIG_HOME/reelscout/config.yaml)
  #[arg(short, long)]
  config: Option<PathBuf>,

  /// Start with this search text
  #[arg(short, long)]
  query: Option<String>,

  /// Start with this TMDB genre id selected (e.g. 28 for Action)
  #[arg(short, long)]
  genre: Option<u32>,
}

#[tokio::main]
async fn main() -> Result<()> {
  color_eyre::install()?;

  let args = Args::parse();

  // Configuration problems are reported before the terminal is touched
  let config = config::Config::load(args.config.as_deref())?;
  let api_key = config::Config::get_api_key()?;

  let _log_guard = logging::init(&logging::log_dir(), config.log_level.as_deref())?;
  info!(version = env!("CARGO_PKG_VERSION"), "reelscout starting");

  let startup = app::StartupQuery {
    search: args.query,
    genre_id: args.genre,
  };
  let mut app = app::App::new(&config, api_key, startup)?;
  app.run().await?;

  info!("reelscout exiting");
  Ok(())
}
