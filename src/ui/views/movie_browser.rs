use crate::browse::{BrowseController, DetailsView, ListView};
use crate::cache::QueryFetcher;
use crate::tmdb::{Genre, ImageUrls, MovieSummary, QueryData, QueryKey, TmdbClient};
use crate::ui::components::{render_movie_detail, GenreBar, SearchEvent, SearchInput};
use crate::ui::ensure_valid_selection;
use crate::ui::renderfns::{format_rating, rating_color, truncate};
use crate::ui::view::{ShortcutInfo, View, ViewAction};
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph};
use std::sync::Arc;

/// Root view: search bar, genre bar, featured strip, movie list and the
/// details panel layered on top.
pub struct MovieBrowserView<F = TmdbClient>
where
  F: QueryFetcher<Key = QueryKey, Data = QueryData>,
{
  controller: BrowseController<F>,
  images: ImageUrls,
  search: SearchInput,
  genre_bar: GenreBar,
  list_state: ListState,
  /// List key the selection belongs to
  shown_key: QueryKey,
}

impl<F> MovieBrowserView<F>
where
  F: QueryFetcher<Key = QueryKey, Data = QueryData>,
{
  pub fn new(controller: BrowseController<F>, images: ImageUrls) -> Self {
    let search = SearchInput::with_query(&controller.state().raw_search_text);
    let shown_key = controller.active_list_key();
    Self {
      controller,
      images,
      search,
      genre_bar: GenreBar::new(),
      list_state: ListState::default().with_selected(Some(0)),
      shown_key,
    }
  }

  #[cfg(test)]
  pub fn controller(&self) -> &BrowseController<F> {
    &self.controller
  }

  fn genres(&self) -> Arc<Vec<Genre>> {
    self
      .controller
      .genres_state()
      .data()
      .cloned()
      .unwrap_or_default()
  }

  fn movies(&self) -> Vec<MovieSummary> {
    match self.controller.list_view() {
      ListView::Movies(list) => list.results.clone(),
      _ => Vec::new(),
    }
  }

  fn selected_movie(&self) -> Option<MovieSummary> {
    let idx = self.list_state.selected()?;
    self.movies().into_iter().nth(idx)
  }

  fn toggle_highlighted_genre(&mut self) {
    if let Some(id) = self.genre_bar.highlighted(&self.genres()) {
      self.controller.set_genre(id);
    }
  }

  /// A new list starts at the top
  fn sync_selection(&mut self) {
    let key = self.controller.active_list_key();
    if key != self.shown_key {
      self.shown_key = key;
      self.list_state.select(Some(0));
    }
  }

  fn handle_details_key(&mut self, key: KeyEvent) -> ViewAction {
    match key.code {
      KeyCode::Char('q') | KeyCode::Esc => self.controller.close_details(),
      KeyCode::Char('r') => self.controller.refresh(),
      _ => {}
    }
    ViewAction::None
  }

  fn render_featured(&self, frame: &mut Frame, area: Rect) {
    let featured = self.controller.featured_movies();
    let Some(movie) = self.controller.featured_movie() else {
      return;
    };

    let title = format!(
      " Featured {}/{} ",
      self.controller.featured_index().min(featured.len().saturating_sub(1)) + 1,
      featured.len()
    );
    let block = Block::default()
      .title(title)
      .borders(Borders::ALL)
      .border_style(Style::default().fg(Color::Magenta));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let year = movie
      .release_year()
      .map(|y| format!(" ({})", y))
      .unwrap_or_default();
    let width = inner.width as usize;
    let lines = vec![
      Line::from(vec![
        Span::styled(format!("{}{}", movie.title, year), Style::default().bold()),
        Span::raw("  "),
        Span::styled(
          format_rating(movie.vote_average, movie.vote_count),
          Style::default().fg(rating_color(movie.vote_average)),
        ),
      ]),
      Line::from(truncate(&movie.overview, width)),
      Line::from(Span::styled(
        self
          .images
          .hero_backdrop(movie.backdrop_path.as_deref())
          .unwrap_or_default(),
        Style::default().fg(Color::DarkGray),
      )),
    ];
    frame.render_widget(Paragraph::new(lines), inner);
  }

  fn render_list(&mut self, frame: &mut Frame, area: Rect) {
    let view = self.controller.list_view();
    let label = self.controller.mode_label();

    let title = match &view {
      ListView::Loading => format!(" {} (loading...) ", label),
      ListView::Error(_) => format!(" {} (error) ", label),
      ListView::Empty => format!(" {} (0) ", label),
      ListView::Movies(list) => format!(" {} ({}) ", label, list.total_results),
    };
    let block = Block::default()
      .title(title)
      .title_alignment(Alignment::Center)
      .borders(Borders::ALL)
      .border_style(Style::default().fg(Color::Blue));

    let list = match view {
      ListView::Movies(list) => list,
      other => {
        let (content, color) = match other {
          ListView::Error(e) => (
            format!("Failed to load movies: {}\nPress 'r' to retry.", e),
            Color::Red,
          ),
          ListView::Empty => ("No movies found.".to_string(), Color::DarkGray),
          _ => ("Loading movies...".to_string(), Color::DarkGray),
        };
        let paragraph = Paragraph::new(content)
          .block(block)
          .style(Style::default().fg(color));
        frame.render_widget(paragraph, area);
        return;
      }
    };

    ensure_valid_selection(&mut self.list_state, list.results.len());
    let title_width = (area.width as usize).saturating_sub(24).clamp(10, 60);

    let items: Vec<ListItem> = list
      .results
      .iter()
      .map(|movie| {
        let year = movie
          .release_year()
          .map(|y| y.to_string())
          .unwrap_or_else(|| "----".to_string());
        let title = truncate(&movie.title, title_width);
        let padding = title_width.saturating_sub(title.chars().count());
        let line = Line::from(vec![
          Span::raw(title),
          Span::raw(" ".repeat(padding + 1)),
          Span::styled(year, Style::default().fg(Color::Cyan)),
          Span::raw("  "),
          Span::styled(
            format_rating(movie.vote_average, movie.vote_count),
            Style::default().fg(rating_color(movie.vote_average)),
          ),
        ]);
        ListItem::new(line)
      })
      .collect();

    let widget = List::new(items)
      .block(block)
      .highlight_style(
        Style::default()
          .bg(Color::DarkGray)
          .add_modifier(Modifier::BOLD),
      )
      .highlight_symbol("> ");

    frame.render_stateful_widget(widget, area, &mut self.list_state);
  }
}

impl<F> View for MovieBrowserView<F>
where
  F: QueryFetcher<Key = QueryKey, Data = QueryData>,
{
  fn handle_key(&mut self, key: KeyEvent) -> ViewAction {
    // Search bar takes everything while focused
    if self.search.is_active() {
      match self.search.handle_key(key).into_event() {
        Some(SearchEvent::Changed(text)) => self.controller.set_search_text(&text),
        Some(SearchEvent::Cleared) => self.controller.clear_search(),
        Some(SearchEvent::Submitted) | None => {}
      }
      return ViewAction::None;
    }

    if self.controller.state().open_movie_id.is_some() {
      return self.handle_details_key(key);
    }

    if self.search.handle_key(key).is_consumed() {
      self.genre_bar.blur();
      return ViewAction::None;
    }

    match key.code {
      KeyCode::Char('g') => self.genre_bar.next(self.genres().len()),
      KeyCode::Char('G') => self.genre_bar.previous(self.genres().len()),
      KeyCode::Char(' ') => self.toggle_highlighted_genre(),
      KeyCode::Enter if self.genre_bar.is_focused() => self.toggle_highlighted_genre(),
      KeyCode::Char('0') => self.controller.clear_genre(),
      KeyCode::Char('j') | KeyCode::Down => {
        self.genre_bar.blur();
        self.list_state.select_next();
      }
      KeyCode::Char('k') | KeyCode::Up => {
        self.genre_bar.blur();
        self.list_state.select_previous();
      }
      KeyCode::Enter => {
        if let Some(movie) = self.selected_movie() {
          self.controller.open_details(movie.id);
        }
      }
      KeyCode::Char('h') | KeyCode::Left => self.controller.previous_featured(),
      KeyCode::Char('l') | KeyCode::Right => self.controller.next_featured(),
      KeyCode::Char('f') => {
        if let Some(movie) = self.controller.featured_movie() {
          self.controller.open_details(movie.id);
        }
      }
      KeyCode::Char('r') => self.controller.refresh(),
      KeyCode::Esc if self.genre_bar.is_focused() => self.genre_bar.blur(),
      KeyCode::Char('q') | KeyCode::Esc => return ViewAction::Quit,
      _ => {}
    }
    self.sync_selection();
    ViewAction::None
  }

  fn render(&mut self, frame: &mut Frame, area: Rect) {
    let featured_height = if self.controller.featured_movies().is_empty() {
      0
    } else {
      5
    };
    let chunks = Layout::default()
      .direction(Direction::Vertical)
      .constraints([
        Constraint::Length(3),               // Search bar
        Constraint::Length(1),               // Genre bar
        Constraint::Length(featured_height), // Featured strip
        Constraint::Min(1),                  // Movie list
      ])
      .split(area);

    self
      .search
      .render(frame, chunks[0], self.controller.is_search_pending());
    self.genre_bar.render(
      frame,
      chunks[1],
      &self.genres(),
      self.controller.state().selected_genre_id,
    );
    if featured_height > 0 {
      self.render_featured(frame, chunks[2]);
    }
    self.render_list(frame, chunks[3]);

    render_movie_detail(frame, area, &self.controller.details_view(), &self.images);
  }

  fn breadcrumb(&self) -> Vec<String> {
    let mut parts = vec![self.controller.mode_label()];
    match self.controller.details_view() {
      DetailsView::Closed => {}
      DetailsView::Loaded(detail) => parts.push(detail.title().to_string()),
      _ => {
        if let Some(id) = self.controller.state().open_movie_id {
          parts.push(format!("Movie {}", id));
        }
      }
    }
    parts
  }

  fn mode_label(&self) -> String {
    self.controller.mode_label()
  }

  fn is_refreshing(&self) -> bool {
    self.controller.is_refreshing()
  }

  fn status(&self) -> String {
    let status = match self.controller.list_view() {
      ListView::Movies(list) => format!(
        "{} of {} results · page {} of {}",
        list.results.len(),
        list.total_results,
        list.page,
        list.total_pages
      ),
      ListView::Empty => "no results".to_string(),
      ListView::Error(_) => "request failed".to_string(),
      ListView::Loading => String::new(),
    };
    match self.controller.list_refresh_error() {
      Some(error) => format!("{} · refresh failed: {}", status, error),
      None => status,
    }
  }

  fn tick(&mut self) {
    self.controller.tick();
    self.sync_selection();
  }

  fn shortcuts(&self) -> Vec<ShortcutInfo> {
    if self.controller.state().open_movie_id.is_some() {
      return vec![
        ShortcutInfo::new("r", "refresh").with_priority(10),
        ShortcutInfo::new("q", "close").with_priority(20),
      ];
    }
    vec![
      ShortcutInfo::new("/", "search").with_priority(10),
      ShortcutInfo::new("g/G", "genre").with_priority(20),
      ShortcutInfo::new("space", "toggle").with_priority(30),
      ShortcutInfo::new("0", "all genres").with_priority(40),
      ShortcutInfo::new("enter", "details").with_priority(50),
      ShortcutInfo::new("h/l", "featured").with_priority(60),
      ShortcutInfo::new("r", "refresh").with_priority(70),
      ShortcutInfo::new("q", "quit").with_priority(90),
    ]
  }
}
