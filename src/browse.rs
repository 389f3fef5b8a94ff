//! Search/browse orchestration.
//!
//! [`BrowseController`] owns the interaction state and decides which query is
//! active. It is a plain state container: the UI feeds it user actions and
//! calls `tick` from its event loop, then renders `list_view`, `details_view`
//! and friends. It never renders data from a query that is no longer active.

use std::sync::Arc;
use tokio::time::Duration;
use tracing::{debug, info};

use crate::cache::{QueryClient, QueryFetcher, QuerySubscription};
use crate::debounce::Debouncer;
use crate::query::QueryState;
use crate::tmdb::{Genre, MovieDetail, MovieList, MovieSummary, QueryData, QueryKey};

/// Number of popular titles shown in the featured strip
pub const FEATURED_COUNT: usize = 3;

/// Only the first page is ever requested
const FIRST_PAGE: u32 = 1;

/// Everything the user has asked for. Mutated only by user actions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InteractionState {
  /// Echo of the search box, updated on every keystroke
  pub raw_search_text: String,
  /// Search text after the debounce quiet period
  pub settled_search_text: String,
  pub selected_genre_id: Option<u32>,
  pub open_movie_id: Option<u64>,
}

impl InteractionState {
  /// The list query to display: search when settled text is non-blank,
  /// popular otherwise. Both carry the selected genre.
  pub fn active_list_key(&self) -> QueryKey {
    let text = self.settled_search_text.trim();
    if text.is_empty() {
      QueryKey::Popular {
        page: FIRST_PAGE,
        genre_id: self.selected_genre_id,
      }
    } else {
      QueryKey::Search {
        text: text.to_string(),
        page: FIRST_PAGE,
        genre_id: self.selected_genre_id,
      }
    }
  }

  pub fn is_searching(&self) -> bool {
    !self.settled_search_text.trim().is_empty()
  }

  /// Selecting the current genre clears it; any other genre replaces it.
  pub fn toggle_genre(&mut self, genre_id: u32) {
    self.selected_genre_id = if self.selected_genre_id == Some(genre_id) {
      None
    } else {
      Some(genre_id)
    };
  }
}

/// What the movie list area should show.
#[derive(Debug, Clone, PartialEq)]
pub enum ListView {
  Loading,
  Error(String),
  /// Successful response with zero results
  Empty,
  Movies(Arc<MovieList>),
}

/// What the details panel should show.
#[derive(Debug, Clone, PartialEq)]
pub enum DetailsView {
  Closed,
  Loading,
  Error(String),
  Loaded(Arc<MovieDetail>),
}

pub struct BrowseController<F>
where
  F: QueryFetcher<Key = QueryKey, Data = QueryData>,
{
  client: QueryClient<F>,
  state: InteractionState,
  debouncer: Debouncer<String>,
  list: QuerySubscription<F>,
  featured: Option<QuerySubscription<F>>,
  genres: QuerySubscription<F>,
  details: Option<QuerySubscription<F>>,
  featured_index: usize,
}

impl<F> BrowseController<F>
where
  F: QueryFetcher<Key = QueryKey, Data = QueryData>,
{
  /// Start browsing popular movies and load the genre list.
  pub fn new(client: QueryClient<F>, debounce: Duration) -> Self {
    let state = InteractionState::default();
    let list = client.subscribe(state.active_list_key());
    let genres = client.subscribe(QueryKey::GenreList);
    client.fetch(genres.key());

    let mut controller = Self {
      client,
      state,
      debouncer: Debouncer::new(debounce),
      list,
      featured: None,
      genres,
      details: None,
      featured_index: 0,
    };
    controller.sync_list();
    controller
  }

  /// Start with search text already settled (e.g. from the command line).
  pub fn with_initial_search(mut self, text: &str) -> Self {
    self.state.raw_search_text = text.to_string();
    self.state.settled_search_text = text.to_string();
    self.sync_list();
    self
  }

  pub fn with_initial_genre(mut self, genre_id: Option<u32>) -> Self {
    self.state.selected_genre_id = genre_id;
    self.sync_list();
    self
  }

  pub fn state(&self) -> &InteractionState {
    &self.state
  }

  #[cfg(test)]
  pub fn client(&self) -> &QueryClient<F> {
    &self.client
  }

  pub fn active_list_key(&self) -> QueryKey {
    self.state.active_list_key()
  }

  /// Typed text that has not settled yet
  pub fn is_search_pending(&self) -> bool {
    self.debouncer.is_pending()
  }

  // ==========================================================================
  // User actions
  // ==========================================================================

  /// Echo the text immediately; the list follows once typing pauses.
  pub fn set_search_text(&mut self, text: &str) {
    self.state.raw_search_text = text.to_string();
    self.debouncer.push(text.to_string());
  }

  /// Drop the search at once, including text still waiting to settle.
  pub fn clear_search(&mut self) {
    self.debouncer.cancel();
    self.state.raw_search_text.clear();
    if !self.state.settled_search_text.is_empty() {
      self.state.settled_search_text.clear();
      self.sync_list();
    }
  }

  pub fn set_genre(&mut self, genre_id: u32) {
    self.state.toggle_genre(genre_id);
    debug!(genre = ?self.state.selected_genre_id, "genre changed");
    self.sync_list();
  }

  pub fn clear_genre(&mut self) {
    if self.state.selected_genre_id.take().is_some() {
      self.sync_list();
    }
  }

  /// Open the details panel. Details are fetched only here, never for
  /// movies that are merely listed.
  pub fn open_details(&mut self, id: u64) {
    self.state.open_movie_id = Some(id);
    let key = QueryKey::Details { id };
    if self.details.as_ref().map(|s| s.key()) != Some(&key) {
      self.details = Some(self.client.subscribe(key.clone()));
    }
    self.client.fetch(&key);
  }

  /// Close the details panel. The cached details stay until evicted.
  pub fn close_details(&mut self) {
    self.state.open_movie_id = None;
    self.details = None;
  }

  /// Refetch whatever is on screen.
  pub fn refresh(&mut self) {
    let key = self.active_list_key();
    info!(query = %key.description(), "refresh requested");
    self.client.invalidate(&key);
    self.client.fetch(&key);

    if let Some(details) = &self.details {
      self.client.invalidate(details.key());
      self.client.fetch(details.key());
    }
    if self.genres_state().is_error() {
      self.client.fetch(self.genres.key());
    }
  }

  pub fn next_featured(&mut self) {
    let count = self.featured_movies().len();
    if count > 0 {
      self.featured_index = (self.featured_index + 1) % count;
    }
  }

  pub fn previous_featured(&mut self) {
    let count = self.featured_movies().len();
    if count > 0 {
      self.featured_index = (self.featured_index + count - 1) % count;
    }
  }

  /// Advance time-based state: settle debounced search text and evict idle
  /// cache entries. Returns true if the active query changed.
  pub fn tick(&mut self) -> bool {
    let mut changed = false;
    if let Some(text) = self.debouncer.poll() {
      if text != self.state.settled_search_text {
        debug!(text = %text, "search text settled");
        self.state.settled_search_text = text;
        self.sync_list();
        changed = true;
      }
    }
    self.client.collect_garbage();
    changed
  }

  /// Subscribe to and fetch the active list; keep the featured strip's
  /// unfiltered popular list alive while it is visible.
  fn sync_list(&mut self) {
    let key = self.active_list_key();
    if self.list.key() != &key {
      debug!(query = %key.description(), "active list changed");
      self.list = self.client.subscribe(key.clone());
    }
    self.client.fetch(&key);

    if self.state.is_searching() {
      self.featured = None;
    } else {
      let featured_key = QueryKey::Popular {
        page: FIRST_PAGE,
        genre_id: None,
      };
      if self.featured.is_none() {
        self.featured = Some(self.client.subscribe(featured_key.clone()));
      }
      self.client.fetch(&featured_key);
    }
  }

  // ==========================================================================
  // Derived views
  // ==========================================================================

  pub fn list_view(&self) -> ListView {
    match self.client.state(&self.active_list_key()) {
      QueryState::Idle | QueryState::Loading => ListView::Loading,
      QueryState::Error(e) => ListView::Error(e),
      QueryState::Success(data) => match data.as_movies() {
        Some(list) if list.is_empty() => ListView::Empty,
        Some(list) => ListView::Movies(Arc::clone(list)),
        None => ListView::Error("unexpected response for movie list".to_string()),
      },
    }
  }

  /// Whether the active list is being refreshed in the background
  pub fn is_refreshing(&self) -> bool {
    self.client.is_fetching(&self.active_list_key())
  }

  /// Why the last refresh of the visible list failed, while the older
  /// results stay on screen
  pub fn list_refresh_error(&self) -> Option<String> {
    self.client.last_error(&self.active_list_key())
  }

  pub fn details_view(&self) -> DetailsView {
    let Some(id) = self.state.open_movie_id else {
      return DetailsView::Closed;
    };
    match self.client.state(&QueryKey::Details { id }) {
      QueryState::Idle | QueryState::Loading => DetailsView::Loading,
      QueryState::Error(e) => DetailsView::Error(e),
      QueryState::Success(data) => match data.as_details() {
        Some(detail) => DetailsView::Loaded(Arc::clone(detail)),
        None => DetailsView::Error("unexpected response for movie details".to_string()),
      },
    }
  }

  pub fn genres_state(&self) -> QueryState<Arc<Vec<Genre>>> {
    self
      .client
      .state(self.genres.key())
      .map(|data| data.as_genres().cloned().unwrap_or_default())
  }

  pub fn genre_name(&self, genre_id: u32) -> Option<String> {
    self
      .genres_state()
      .data()
      .and_then(|genres| genres.iter().find(|g| g.id == genre_id))
      .map(|g| g.name.clone())
  }

  /// Top popular titles for the featured strip; empty while searching.
  pub fn featured_movies(&self) -> Vec<MovieSummary> {
    let Some(featured) = &self.featured else {
      return Vec::new();
    };
    self
      .client
      .state(featured.key())
      .data()
      .and_then(QueryData::as_movies)
      .map(|list| list.results.iter().take(FEATURED_COUNT).cloned().collect())
      .unwrap_or_default()
  }

  pub fn featured_index(&self) -> usize {
    self.featured_index
  }

  pub fn featured_movie(&self) -> Option<MovieSummary> {
    let movies = self.featured_movies();
    let index = self.featured_index.min(movies.len().saturating_sub(1));
    movies.into_iter().nth(index)
  }

  /// Short label for the header, e.g. `Search "bat" · Action`
  pub fn mode_label(&self) -> String {
    let genre = self
      .state
      .selected_genre_id
      .map(|id| self.genre_name(id).unwrap_or_else(|| format!("genre {}", id)));

    let base = if self.state.is_searching() {
      format!("Search \"{}\"", self.state.settled_search_text.trim())
    } else {
      "Popular".to_string()
    };

    match genre {
      Some(name) => format!("{} · {}", base, name),
      None => base,
    }
  }
}
