use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
pub struct QueryRequest {
    pub query: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// One movie as returned by the metadata API.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Movie {
    pub id: u64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub popularity: f64,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub vote_average: f64,
    #[serde(default)]
    pub original_language: Option<String>,
}

impl Movie {
    /// Full poster URL, or `None` when the API has no poster for this movie.
    pub fn poster_url(&self, poster_base_url: &str) -> Option<String> {
        self.poster_path
            .as_deref()
            .filter(|p| !p.is_empty())
            .map(|p| format!("{}/{}", poster_base_url.trim_end_matches('/'), p.trim_start_matches('/')))
    }

    /// Year part of the release date.
    pub fn release_year(&self) -> Option<&str> {
        self.release_date
            .as_deref()
            .and_then(|d| d.split('-').next())
            .filter(|y| !y.is_empty())
    }
}

/// Result of one search.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchOutcome {
    pub movies: Vec<Movie>,
    /// First movie of a non-empty query, used for trend recording.
    pub top_result: Option<Movie>,
}

impl SearchOutcome {
    pub fn new(query: &str, movies: Vec<Movie>) -> Self {
        let top_result = if query.is_empty() {
            None
        } else {
            movies.first().cloned()
        };
        Self { movies, top_result }
    }
}

/// Denormalized copy of a search's top result stored next to its counter.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct TrendSnapshot {
    pub movie_id: u64,
    pub title: String,
    pub poster_url: Option<String>,
}

impl TrendSnapshot {
    pub fn from_movie(movie: &Movie, poster_base_url: &str) -> Self {
        Self {
            movie_id: movie.id,
            title: movie.title.clone(),
            poster_url: movie.poster_url(poster_base_url),
        }
    }
}

/// Aggregated search counter shown in the trending panel.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct TrendingEntry {
    pub id: String,
    pub search_term: String,
    pub count: u64,
    pub movie_id: u64,
    pub title: String,
    pub poster_url: Option<String>,
    pub updated_at: DateTime<Utc>,
}

/// Everything the presentation layer draws.
#[derive(Debug, Serialize, Clone, Default, PartialEq)]
pub struct ViewState {
    pub query: String,
    pub effective_query: String,
    pub movies: Vec<Movie>,
    pub trending: Vec<TrendingEntry>,
    pub is_loading: bool,
    pub error_message: Option<String>,
}

// TMDB API types
#[derive(Debug, Deserialize)]
pub struct TmdbResponse {
    #[serde(default)]
    pub results: Option<Vec<Movie>>,
    #[serde(rename = "Response", default)]
    pub response: Option<String>,
    #[serde(rename = "Error", default)]
    pub error: Option<String>,
    #[serde(default)]
    pub page: Option<u32>,
    #[serde(default)]
    pub total_results: Option<u64>,
}

impl TmdbResponse {
    /// True when the body carries the application-level failure flag.
    pub fn is_failure(&self) -> bool {
        self.response.as_deref() == Some("False")
    }
}
