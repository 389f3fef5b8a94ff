use chrono::{Datelike, NaiveDate};

/// Movie as it appears in list responses (popular, discover, search)
#[derive(Debug, Clone, PartialEq)]
pub struct MovieSummary {
  pub id: u64,
  pub title: String,
  pub overview: String,
  pub poster_path: Option<String>,
  pub backdrop_path: Option<String>,
  pub release_date: String, // "YYYY-MM-DD", may be empty
  pub vote_average: f64,
  pub vote_count: u64,
  pub genre_ids: Vec<u32>,
}

impl MovieSummary {
  pub fn release_year(&self) -> Option<i32> {
    release_year(&self.release_date)
  }
}

/// Full movie details, fetched only when a details panel is opened
#[derive(Debug, Clone, PartialEq)]
pub struct MovieDetail {
  pub summary: MovieSummary,
  pub runtime: Option<u32>, // minutes
  pub genres: Vec<Genre>,
  pub tagline: String,
  pub status: String,
  pub original_language: String,
}

impl MovieDetail {
  pub fn title(&self) -> &str {
    &self.summary.title
  }
}

/// Movie genre
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Genre {
  pub id: u32,
  pub name: String,
}

/// One page of a list endpoint
#[derive(Debug, Clone, PartialEq)]
pub struct MovieList {
  pub results: Vec<MovieSummary>,
  pub page: u32,
  pub total_pages: u32,
  pub total_results: u64,
}

impl MovieList {
  pub fn is_empty(&self) -> bool {
    self.results.is_empty()
  }
}

fn release_year(date: &str) -> Option<i32> {
  NaiveDate::parse_from_str(date, "%Y-%m-%d")
    .ok()
    .map(|d| d.year())
}

#[cfg(test)]
mod tests {
  use super::*;

  fn movie(release_date: &str) -> MovieSummary {
    MovieSummary {
      id: 1,
      title: "Heat".to_string(),
      overview: String::new(),
      poster_path: None,
      backdrop_path: None,
      release_date: release_date.to_string(),
      vote_average: 8.3,
      vote_count: 7000,
      genre_ids: vec![28, 80],
    }
  }

  #[test]
  fn test_release_year() {
    assert_eq!(movie("1995-12-15").release_year(), Some(1995));
  }

  #[test]
  fn test_release_year_missing_or_invalid() {
    assert_eq!(movie("").release_year(), None);
    assert_eq!(movie("soon").release_year(), None);
  }
}
