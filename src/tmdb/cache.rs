//! Query keys and cache wiring for TMDB data.

use futures::future::BoxFuture;
use futures::FutureExt;
use std::sync::Arc;

use crate::cache::QueryFetcher;

use super::client::TmdbClient;
use super::error::ApiError;
use super::types::{Genre, MovieDetail, MovieList};

/// Logical query against TMDB. Two equal keys are the same query.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum QueryKey {
  /// Curated popular list, or discover-by-popularity when a genre is set
  Popular { page: u32, genre_id: Option<u32> },
  /// Title search; `text` is never blank
  Search {
    text: String,
    page: u32,
    genre_id: Option<u32>,
  },
  /// Full details of one movie
  Details { id: u64 },
  /// All movie genres
  GenreList,
}

impl QueryKey {
  pub fn description(&self) -> String {
    match self {
      Self::Popular {
        page,
        genre_id: None,
      } => format!("popular movies (page {})", page),
      Self::Popular {
        page,
        genre_id: Some(g),
      } => format!("popular movies in genre {} (page {})", g, page),
      Self::Search {
        text,
        page,
        genre_id,
      } => match genre_id {
        Some(g) => format!("search \"{}\" in genre {} (page {})", text, g, page),
        None => format!("search \"{}\" (page {})", text, page),
      },
      Self::Details { id } => format!("movie {}", id),
      Self::GenreList => "genres".to_string(),
    }
  }
}

/// Payload cached for a [`QueryKey`]. Shared behind `Arc` so every reader
/// gets the same allocation.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryData {
  Movies(Arc<MovieList>),
  Details(Arc<MovieDetail>),
  Genres(Arc<Vec<Genre>>),
}

impl QueryData {
  pub fn as_movies(&self) -> Option<&Arc<MovieList>> {
    match self {
      QueryData::Movies(list) => Some(list),
      _ => None,
    }
  }

  pub fn as_details(&self) -> Option<&Arc<MovieDetail>> {
    match self {
      QueryData::Details(detail) => Some(detail),
      _ => None,
    }
  }

  pub fn as_genres(&self) -> Option<&Arc<Vec<Genre>>> {
    match self {
      QueryData::Genres(genres) => Some(genres),
      _ => None,
    }
  }
}

impl QueryFetcher for TmdbClient {
  type Key = QueryKey;
  type Data = QueryData;
  type Error = ApiError;

  fn fetch(&self, key: &QueryKey) -> BoxFuture<'static, Result<QueryData, ApiError>> {
    let client = self.clone();
    let key = key.clone();

    async move {
      match key {
        QueryKey::Popular { page, genre_id } => client
          .get_popular_movies(page, genre_id)
          .await
          .map(|list| QueryData::Movies(Arc::new(list))),
        QueryKey::Search {
          text,
          page,
          genre_id,
        } => client
          .search_movies(&text, page, genre_id)
          .await
          .map(|list| QueryData::Movies(Arc::new(list))),
        QueryKey::Details { id } => client
          .get_movie_details(id)
          .await
          .map(|detail| QueryData::Details(Arc::new(detail))),
        QueryKey::GenreList => client
          .get_genres()
          .await
          .map(|genres| QueryData::Genres(Arc::new(genres))),
      }
    }
    .boxed()
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::collections::HashSet;

  #[test]
  fn test_keys_have_value_identity() {
    let a = QueryKey::Search {
      text: "bat".to_string(),
      page: 1,
      genre_id: Some(28),
    };
    let b = QueryKey::Search {
      text: "bat".to_string(),
      page: 1,
      genre_id: Some(28),
    };
    let c = QueryKey::Search {
      text: "bat".to_string(),
      page: 1,
      genre_id: None,
    };

    let keys: HashSet<QueryKey> = [a.clone(), b, c].into_iter().collect();
    assert_eq!(keys.len(), 2);
    assert!(keys.contains(&a));
  }

  #[test]
  fn test_description() {
    assert_eq!(
      QueryKey::Popular {
        page: 1,
        genre_id: Some(28)
      }
      .description(),
      "popular movies in genre 28 (page 1)"
    );
    assert_eq!(QueryKey::Details { id: 42 }.description(), "movie 42");
  }
}
