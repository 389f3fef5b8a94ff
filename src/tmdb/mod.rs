pub mod api_types;
pub mod cache;
pub mod client;
pub mod error;
pub mod images;
pub mod types;

pub use cache::{QueryData, QueryKey};
pub use client::TmdbClient;
pub use images::ImageUrls;
pub use types::{Genre, MovieDetail, MovieList, MovieSummary};
