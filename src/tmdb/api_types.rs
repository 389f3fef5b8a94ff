//! Serde-deserializable types matching TMDB v3 responses.
//!
//! TMDB omits or nulls many fields (unreleased titles, missing artwork), so
//! everything except `id` is optional here and defaulted when converting into
//! the domain types in `types.rs`.

use serde::Deserialize;

use super::types::{Genre, MovieDetail, MovieList, MovieSummary};

// ============================================================================
// List endpoints: /movie/popular, /discover/movie, /search/movie
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct ApiMovie {
  pub id: u64,
  pub title: Option<String>,
  pub overview: Option<String>,
  pub poster_path: Option<String>,
  pub backdrop_path: Option<String>,
  pub release_date: Option<String>,
  pub vote_average: Option<f64>,
  pub vote_count: Option<u64>,
  #[serde(default)]
  pub genre_ids: Vec<u32>,
}

impl From<ApiMovie> for MovieSummary {
  fn from(movie: ApiMovie) -> Self {
    MovieSummary {
      id: movie.id,
      title: movie.title.unwrap_or_default(),
      overview: movie.overview.unwrap_or_default(),
      poster_path: non_empty(movie.poster_path),
      backdrop_path: non_empty(movie.backdrop_path),
      release_date: movie.release_date.unwrap_or_default(),
      vote_average: movie.vote_average.unwrap_or_default(),
      vote_count: movie.vote_count.unwrap_or_default(),
      genre_ids: movie.genre_ids,
    }
  }
}

#[derive(Debug, Deserialize)]
pub struct ApiMovieListResponse {
  #[serde(default)]
  pub results: Vec<ApiMovie>,
  #[serde(default = "first_page")]
  pub page: u32,
  #[serde(default)]
  pub total_pages: u32,
  #[serde(default)]
  pub total_results: u64,
}

fn first_page() -> u32 {
  1
}

impl From<ApiMovieListResponse> for MovieList {
  fn from(response: ApiMovieListResponse) -> Self {
    MovieList {
      results: response.results.into_iter().map(MovieSummary::from).collect(),
      page: response.page,
      total_pages: response.total_pages,
      total_results: response.total_results,
    }
  }
}

// ============================================================================
// Details endpoint: /movie/{id}
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct ApiGenre {
  pub id: u32,
  pub name: Option<String>,
}

impl From<ApiGenre> for Genre {
  fn from(genre: ApiGenre) -> Self {
    Genre {
      id: genre.id,
      name: genre.name.unwrap_or_default(),
    }
  }
}

#[derive(Debug, Deserialize)]
pub struct ApiMovieDetail {
  pub id: u64,
  pub title: Option<String>,
  pub overview: Option<String>,
  pub poster_path: Option<String>,
  pub backdrop_path: Option<String>,
  pub release_date: Option<String>,
  pub vote_average: Option<f64>,
  pub vote_count: Option<u64>,
  pub runtime: Option<u32>,
  #[serde(default)]
  pub genres: Vec<ApiGenre>,
  pub tagline: Option<String>,
  pub status: Option<String>,
  pub original_language: Option<String>,
}

impl From<ApiMovieDetail> for MovieDetail {
  fn from(detail: ApiMovieDetail) -> Self {
    let genres: Vec<Genre> = detail.genres.into_iter().map(Genre::from).collect();
    MovieDetail {
      summary: MovieSummary {
        id: detail.id,
        title: detail.title.unwrap_or_default(),
        overview: detail.overview.unwrap_or_default(),
        poster_path: non_empty(detail.poster_path),
        backdrop_path: non_empty(detail.backdrop_path),
        release_date: detail.release_date.unwrap_or_default(),
        vote_average: detail.vote_average.unwrap_or_default(),
        vote_count: detail.vote_count.unwrap_or_default(),
        genre_ids: genres.iter().map(|g| g.id).collect(),
      },
      // TMDB reports 0 for unknown runtimes
      runtime: detail.runtime.filter(|&minutes| minutes > 0),
      genres,
      tagline: detail.tagline.unwrap_or_default(),
      status: detail.status.unwrap_or_default(),
      original_language: detail.original_language.unwrap_or_default(),
    }
  }
}

// ============================================================================
// Genre list endpoint: /genre/movie/list
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct ApiGenreListResponse {
  #[serde(default)]
  pub genres: Vec<ApiGenre>,
}

// ============================================================================
// Error body returned alongside non-2xx statuses
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct ApiErrorBody {
  pub status_message: Option<String>,
}

fn non_empty(path: Option<String>) -> Option<String> {
  path.filter(|p| !p.is_empty())
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_list_response_tolerates_nulls() {
    let json = r#"{
      "page": 1,
      "results": [
        {"id": 550, "title": "Fight Club", "overview": "...", "poster_path": null,
         "backdrop_path": "/b.jpg", "release_date": "1999-10-15",
         "vote_average": 8.4, "vote_count": 26000, "genre_ids": [18]},
        {"id": 9, "title": null}
      ],
      "total_pages": 1,
      "total_results": 2
    }"#;

    let list: MovieList = serde_json::from_str::<ApiMovieListResponse>(json)
      .unwrap()
      .into();

    assert_eq!(list.total_results, 2);
    assert_eq!(list.results[0].poster_path, None);
    assert_eq!(list.results[0].backdrop_path.as_deref(), Some("/b.jpg"));
    assert_eq!(list.results[1].title, "");
    assert!(list.results[1].genre_ids.is_empty());
  }

  #[test]
  fn test_null_votes_and_genre_name_default() {
    let json = r#"{
      "page": 1,
      "results": [{"id": 12, "title": "Unreleased", "vote_average": null, "vote_count": null}],
      "total_pages": 1,
      "total_results": 1
    }"#;
    let list: MovieList = serde_json::from_str::<ApiMovieListResponse>(json)
      .unwrap()
      .into();
    assert_eq!(list.results[0].vote_average, 0.0);
    assert_eq!(list.results[0].vote_count, 0);

    let json = r#"{
      "id": 12, "vote_average": null, "vote_count": null,
      "genres": [{"id": 18, "name": null}]
    }"#;
    let detail: MovieDetail = serde_json::from_str::<ApiMovieDetail>(json)
      .unwrap()
      .into();
    assert_eq!(detail.summary.vote_average, 0.0);
    assert_eq!(detail.summary.vote_count, 0);
    assert_eq!(detail.genres[0].name, "");
  }

  #[test]
  fn test_empty_list_response() {
    let json = r#"{"page": 1, "results": [], "total_pages": 0, "total_results": 0}"#;
    let list: MovieList = serde_json::from_str::<ApiMovieListResponse>(json)
      .unwrap()
      .into();
    assert!(list.is_empty());
    assert_eq!(list.total_results, 0);
  }

  #[test]
  fn test_detail_conversion() {
    let json = r#"{
      "id": 42, "title": "Arrival", "overview": "Linguist meets heptapods.",
      "poster_path": "/p.jpg", "backdrop_path": "", "release_date": "2016-11-10",
      "vote_average": 7.6, "vote_count": 17000, "runtime": 116,
      "genres": [{"id": 18, "name": "Drama"}, {"id": 878, "name": "Science Fiction"}],
      "tagline": "Why are they here?", "status": "Released", "original_language": "en"
    }"#;

    let detail: MovieDetail = serde_json::from_str::<ApiMovieDetail>(json)
      .unwrap()
      .into();

    assert_eq!(detail.summary.id, 42);
    assert_eq!(detail.runtime, Some(116));
    assert_eq!(detail.summary.genre_ids, vec![18, 878]);
    assert_eq!(detail.summary.backdrop_path, None);
    assert_eq!(detail.genres[1].name, "Science Fiction");
  }

  #[test]
  fn test_detail_zero_runtime_is_unknown() {
    let json = r#"{"id": 7, "runtime": 0, "tagline": null}"#;
    let detail: MovieDetail = serde_json::from_str::<ApiMovieDetail>(json)
      .unwrap()
      .into();
    assert_eq!(detail.runtime, None);
    assert_eq!(detail.tagline, "");
  }
}
