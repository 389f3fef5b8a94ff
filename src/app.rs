use crate::browse::BrowseController;
use crate::cache::{CacheOptions, QueryClient};
use crate::config::Config;
use crate::event::{Event, EventHandler};
use crate::tmdb::{ImageUrls, TmdbClient};
use crate::ui;
use crate::ui::view::{View, ViewAction};
use crate::ui::views::MovieBrowserView;
use color_eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use crossterm::terminal::{
  disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::ExecutableCommand;
use ratatui::prelude::*;
use std::io::stdout;
use std::time::Duration;
use tracing::info;

/// Short enough that settled search text shows up promptly
const TICK_RATE: Duration = Duration::from_millis(100);

/// What to show on startup, from the command line
#[derive(Debug, Clone, Default)]
pub struct StartupQuery {
  pub search: Option<String>,
  pub genre_id: Option<u32>,
}

/// Main application state
pub struct App {
  /// Root view
  view: Box<dyn View>,

  /// Whether to quit
  should_quit: bool,
}

impl App {
  pub fn new(config: &Config, api_key: String, startup: StartupQuery) -> Result<Self> {
    let tmdb = TmdbClient::new(&config.tmdb, api_key)?;
    let client = QueryClient::new(tmdb).with_options(CacheOptions {
      stale_time: config.cache.stale_time(),
      gc_time: config.cache.gc_time(),
    });

    let mut controller =
      BrowseController::new(client, config.search.debounce()).with_initial_genre(startup.genre_id);
    if let Some(text) = startup.search.as_deref() {
      controller = controller.with_initial_search(text);
    }

    let images = ImageUrls::new(&config.tmdb.image_base_url);
    Ok(Self::with_view(Box::new(MovieBrowserView::new(controller, images))))
  }

  pub fn with_view(view: Box<dyn View>) -> Self {
    Self {
      view,
      should_quit: false,
    }
  }

  pub fn view_mut(&mut self) -> &mut dyn View {
    self.view.as_mut()
  }

  pub async fn run(&mut self) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;

    // Restore the terminal before a panic message is printed
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic| {
      let _ = disable_raw_mode();
      let _ = stdout().execute(LeaveAlternateScreen);
      default_hook(panic);
    }));

    let result = self.event_loop().await;

    // Cleanup terminal
    disable_raw_mode()?;
    stdout().execute(LeaveAlternateScreen)?;
    info!("terminal restored");

    result
  }

  async fn event_loop(&mut self) -> Result<()> {
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;
    let mut events = EventHandler::new(TICK_RATE);

    while !self.should_quit() {
      terminal.draw(|frame| ui::draw(frame, self))?;

      match events.next().await {
        Some(event) => self.handle_event(event),
        None => break,
      }
    }
    Ok(())
  }

  pub fn handle_event(&mut self, event: Event) {
    match event {
      Event::Key(key) => self.handle_key(key),
      Event::Tick => self.view.tick(),
      Event::Resize => {} // Next draw uses the new size
    }
  }

  fn handle_key(&mut self, key: KeyEvent) {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
      self.should_quit = true;
      return;
    }
    if self.view.handle_key(key) == ViewAction::Quit {
      self.should_quit = true;
    }
  }

  pub fn should_quit(&self) -> bool {
    self.should_quit
  }
}
