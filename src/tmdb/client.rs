use crate::config::TmdbConfig;
use crate::tmdb::api_types::{
  ApiErrorBody, ApiGenreListResponse, ApiMovieDetail, ApiMovieListResponse,
};
use crate::tmdb::error::ApiError;
use crate::tmdb::types::{Genre, MovieDetail, MovieList};
use color_eyre::{eyre::eyre, Result};
use reqwest::header::ACCEPT;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};
use url::Url;

/// A TMDB resource path plus its operation-specific query parameters.
///
/// Locale and credential are appended by the client for every request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
  pub path: String,
  pub params: Vec<(&'static str, String)>,
}

impl Endpoint {
  fn new(path: impl Into<String>) -> Self {
    Self {
      path: path.into(),
      params: Vec::new(),
    }
  }

  fn param(mut self, name: &'static str, value: impl ToString) -> Self {
    self.params.push((name, value.to_string()));
    self
  }

  fn exclude_adult(self) -> Self {
    self.param("include_adult", "false")
  }

  /// `GET /search/movie`
  pub fn search(query: &str, page: u32, genre_id: Option<u32>) -> Self {
    let endpoint = Self::new("/search/movie")
      .param("query", query)
      .param("page", page);
    match genre_id {
      Some(id) => endpoint.param("with_genres", id),
      None => endpoint,
    }
    .exclude_adult()
  }

  /// `GET /movie/popular` without a genre, `GET /discover/movie` with one.
  ///
  /// The curated popular list cannot be filtered, so a genre filter switches
  /// to the discover resource sorted by popularity.
  pub fn popular(page: u32, genre_id: Option<u32>) -> Self {
    match genre_id {
      Some(id) => Self::new("/discover/movie")
        .param("with_genres", id)
        .param("sort_by", "popularity.desc")
        .param("page", page),
      None => Self::new("/movie/popular").param("page", page),
    }
    .exclude_adult()
  }

  /// `GET /movie/{id}`
  pub fn details(id: u64) -> Self {
    Self::new(format!("/movie/{}", id))
  }

  /// `GET /genre/movie/list`
  pub fn genres() -> Self {
    Self::new("/genre/movie/list")
  }
}

/// TMDB v3 API client. Stateless apart from connection pooling.
#[derive(Clone)]
pub struct TmdbClient {
  http: reqwest::Client,
  base_url: String,
  language: String,
  api_key: String,
}

impl TmdbClient {
  pub fn new(config: &TmdbConfig, api_key: String) -> Result<Self> {
    let http = reqwest::Client::builder()
      .timeout(config.timeout())
      .build()
      .map_err(|e| eyre!("Failed to create HTTP client: {}", e))?;

    // Validate once so per-request URL building only fails on bad paths
    Url::parse(&config.base_url)
      .map_err(|e| eyre!("Invalid TMDB base URL {}: {}", config.base_url, e))?;

    Ok(Self {
      http,
      base_url: config.base_url.trim_end_matches('/').to_string(),
      language: config.language.clone(),
      api_key,
    })
  }

  /// Search movies by title text.
  pub async fn search_movies(
    &self,
    query: &str,
    page: u32,
    genre_id: Option<u32>,
  ) -> Result<MovieList, ApiError> {
    if query.trim().is_empty() {
      return Err(ApiError::InvalidQuery);
    }
    let response: ApiMovieListResponse = self
      .get(&Endpoint::search(query, page, genre_id))
      .await?;
    Ok(response.into())
  }

  /// Popular movies, optionally restricted to one genre.
  pub async fn get_popular_movies(
    &self,
    page: u32,
    genre_id: Option<u32>,
  ) -> Result<MovieList, ApiError> {
    let response: ApiMovieListResponse = self.get(&Endpoint::popular(page, genre_id)).await?;
    Ok(response.into())
  }

  pub async fn get_movie_details(&self, id: u64) -> Result<MovieDetail, ApiError> {
    let response: ApiMovieDetail = self.get(&Endpoint::details(id)).await?;
    Ok(response.into())
  }

  pub async fn get_genres(&self) -> Result<Vec<Genre>, ApiError> {
    let response: ApiGenreListResponse = self.get(&Endpoint::genres()).await?;
    Ok(response.genres.into_iter().map(Genre::from).collect())
  }

  /// Full request URL including locale and credential.
  pub fn url_for(&self, endpoint: &Endpoint) -> Result<Url, ApiError> {
    let mut url = Url::parse(&format!("{}{}", self.base_url, endpoint.path))
      .map_err(|e| ApiError::Network(format!("invalid URL for {}: {}", endpoint.path, e)))?;

    url
      .query_pairs_mut()
      .extend_pairs(endpoint.params.iter().map(|(k, v)| (*k, v.as_str())))
      .append_pair("language", &self.language)
      .append_pair("api_key", &self.api_key);

    Ok(url)
  }

  async fn get<T: DeserializeOwned>(&self, endpoint: &Endpoint) -> Result<T, ApiError> {
    let url = self.url_for(endpoint)?;
    debug!(path = %endpoint.path, params = ?endpoint.params, "TMDB request");

    let response = self
      .http
      .get(url)
      .header(ACCEPT, "application/json")
      .send()
      .await
      .map_err(ApiError::from)?;

    let status = response.status();
    if status == StatusCode::NOT_FOUND {
      return Err(ApiError::NotFound(endpoint.path.clone()));
    }
    if !status.is_success() {
      let message = response
        .json::<ApiErrorBody>()
        .await
        .ok()
        .and_then(|body| body.status_message)
        .unwrap_or_else(|| status.canonical_reason().unwrap_or("unknown error").to_string());
      let error = ApiError::Status {
        status: status.as_u16(),
        message,
      };
      if error.is_rate_limited() {
        warn!(path = %endpoint.path, %error, "TMDB rate limit reached");
      } else {
        warn!(path = %endpoint.path, %error, "TMDB request failed");
      }
      return Err(error);
    }

    response.json::<T>().await.map_err(ApiError::from)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use wiremock::matchers::{method, path, query_param, query_param_is_missing};
  use wiremock::{Mock, MockServer, ResponseTemplate};

  fn client_for(server: &MockServer) -> TmdbClient {
    let config = TmdbConfig {
      base_url: server.uri(),
      ..TmdbConfig::default()
    };
    TmdbClient::new(&config, "test-key".to_string()).unwrap()
  }

  fn list_body(ids: &[u64]) -> serde_json::Value {
    let results: Vec<_> = ids
      .iter()
      .map(|id| serde_json::json!({"id": id, "title": format!("Movie {}", id)}))
      .collect();
    serde_json::json!({
      "page": 1,
      "results": results,
      "total_pages": 1,
      "total_results": ids.len(),
    })
  }

  #[test]
  fn test_popular_without_genre_targets_popular() {
    let endpoint = Endpoint::popular(1, None);
    assert_eq!(endpoint.path, "/movie/popular");
    assert!(!endpoint.params.iter().any(|(k, _)| *k == "with_genres"));
    assert!(!endpoint.params.iter().any(|(k, _)| *k == "sort_by"));
  }

  #[test]
  fn test_popular_with_genre_targets_discover() {
    let endpoint = Endpoint::popular(1, Some(28));
    assert_eq!(endpoint.path, "/discover/movie");
    assert!(endpoint
      .params
      .contains(&("with_genres", "28".to_string())));
    assert!(endpoint
      .params
      .contains(&("sort_by", "popularity.desc".to_string())));
    assert!(endpoint
      .params
      .contains(&("include_adult", "false".to_string())));
  }

  #[test]
  fn test_url_carries_fixed_params() {
    let config = TmdbConfig::default();
    let client = TmdbClient::new(&config, "secret".to_string()).unwrap();

    let url = client.url_for(&Endpoint::search("bat", 1, None)).unwrap();
    let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();

    assert_eq!(url.path(), "/3/search/movie");
    assert!(pairs.contains(&("query".to_string(), "bat".to_string())));
    assert!(pairs.contains(&("include_adult".to_string(), "false".to_string())));
    assert!(pairs.contains(&("language".to_string(), "en-US".to_string())));
    assert!(pairs.contains(&("api_key".to_string(), "secret".to_string())));
    assert!(!pairs.iter().any(|(k, _)| k == "with_genres"));
  }

  #[test]
  fn test_details_and_genres_have_no_adult_flag() {
    assert!(Endpoint::details(42).params.is_empty());
    assert_eq!(Endpoint::details(42).path, "/movie/42");
    assert!(Endpoint::genres().params.is_empty());
  }

  #[tokio::test]
  async fn test_get_popular_movies_with_genre_uses_discover() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
      .and(path("/discover/movie"))
      .and(query_param("with_genres", "28"))
      .and(query_param("sort_by", "popularity.desc"))
      .and(query_param("page", "1"))
      .and(query_param("include_adult", "false"))
      .and(query_param("language", "en-US"))
      .and(query_param("api_key", "test-key"))
      .respond_with(ResponseTemplate::new(200).set_body_json(list_body(&[1, 2])))
      .expect(1)
      .mount(&server)
      .await;

    let list = client_for(&server)
      .get_popular_movies(1, Some(28))
      .await
      .unwrap();
    assert_eq!(list.results.len(), 2);
  }

  #[tokio::test]
  async fn test_get_popular_movies_without_genre_uses_popular() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
      .and(path("/movie/popular"))
      .and(query_param_is_missing("with_genres"))
      .and(query_param_is_missing("sort_by"))
      .and(query_param("api_key", "test-key"))
      .respond_with(ResponseTemplate::new(200).set_body_json(list_body(&[7])))
      .expect(1)
      .mount(&server)
      .await;

    let list = client_for(&server).get_popular_movies(1, None).await.unwrap();
    assert_eq!(list.results[0].id, 7);
  }

  #[tokio::test]
  async fn test_search_movies_sends_query_and_genre() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
      .and(path("/search/movie"))
      .and(query_param("query", "bat"))
      .and(query_param("with_genres", "35"))
      .and(query_param("include_adult", "false"))
      .respond_with(ResponseTemplate::new(200).set_body_json(list_body(&[268])))
      .expect(1)
      .mount(&server)
      .await;

    let list = client_for(&server)
      .search_movies("bat", 1, Some(35))
      .await
      .unwrap();
    assert_eq!(list.results[0].title, "Movie 268");
  }

  #[tokio::test]
  async fn test_blank_search_never_hits_network() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
      .respond_with(ResponseTemplate::new(200).set_body_json(list_body(&[])))
      .expect(0)
      .mount(&server)
      .await;

    let err = client_for(&server)
      .search_movies("   ", 1, None)
      .await
      .unwrap_err();
    assert_eq!(err, ApiError::InvalidQuery);
  }

  #[tokio::test]
  async fn test_movie_details_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
      .and(path("/movie/999"))
      .respond_with(ResponseTemplate::new(404).set_body_json(serde_json::json!({
        "status_code": 34,
        "status_message": "The resource you requested could not be found."
      })))
      .mount(&server)
      .await;

    let err = client_for(&server)
      .get_movie_details(999)
      .await
      .unwrap_err();
    assert_eq!(err, ApiError::NotFound("/movie/999".to_string()));
  }

  #[tokio::test]
  async fn test_rate_limit_maps_to_status_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
      .and(path("/genre/movie/list"))
      .respond_with(ResponseTemplate::new(429).set_body_json(serde_json::json!({
        "status_code": 25,
        "status_message": "Your request count is over the allowed limit."
      })))
      .mount(&server)
      .await;

    let err = client_for(&server).get_genres().await.unwrap_err();
    assert!(err.is_rate_limited());
    assert!(err.to_string().contains("over the allowed limit"));
  }

  #[tokio::test]
  async fn test_get_genres() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
      .and(path("/genre/movie/list"))
      .and(query_param("language", "en-US"))
      .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
        "genres": [{"id": 28, "name": "Action"}, {"id": 35, "name": "Comedy"}]
      })))
      .mount(&server)
      .await;

    let genres = client_for(&server).get_genres().await.unwrap();
    assert_eq!(
      genres,
      vec![
        Genre {
          id: 28,
          name: "Action".to_string()
        },
        Genre {
          id: 35,
          name: "Comedy".to_string()
        },
      ]
    );
  }

  #[tokio::test]
  async fn test_malformed_body_is_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
      .and(path("/movie/popular"))
      .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
      .mount(&server)
      .await;

    let err = client_for(&server)
      .get_popular_movies(1, None)
      .await
      .unwrap_err();
    assert!(matches!(err, ApiError::Decode(_)));
  }
}
