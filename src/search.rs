use async_trait::async_trait;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use tracing::{debug, info};

use crate::config::TmdbConfig;
use crate::error::SearchError;
use crate::types::*;

/// Characters `encodeURIComponent` leaves alone.
const QUERY_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

#[async_trait]
pub trait MovieSearch: Send + Sync {
    async fn search(&self, query: &str) -> Result<SearchOutcome, SearchError>;
}

/// Remote search client for the TMDB API. One request per call, no retries.
#[derive(Clone, Debug)]
pub struct TmdbClient {
    http_client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl TmdbClient {
    pub fn new(http_client: reqwest::Client, config: TmdbConfig) -> Self {
        Self {
            http_client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key,
        }
    }

    /// Browse by popularity for an empty query, text search otherwise.
    pub fn endpoint_for(&self, query: &str) -> String {
        endpoint_for(&self.base_url, query)
    }
}

pub fn endpoint_for(base_url: &str, query: &str) -> String {
    let base_url = base_url.trim_end_matches('/');
    if query.is_empty() {
        format!("{}/discover/movie?sort_by=popularity.desc", base_url)
    } else {
        format!(
            "{}/search/movie?query={}",
            base_url,
            utf8_percent_encode(query, QUERY_COMPONENT)
        )
    }
}

#[async_trait]
impl MovieSearch for TmdbClient {
    async fn search(&self, query: &str) -> Result<SearchOutcome, SearchError> {
        info!("Searching movies for: {:?}", query);
        let endpoint = self.endpoint_for(query);
        debug!("Search URL: {}", endpoint);

        let resp = self
            .http_client
            .get(&endpoint)
            .bearer_auth(&self.api_key)
            .header("Accept", "application/json")
            .send()
            .await?;

        if !resp.status().is_success() {
            let status = resp.status();
            let text = resp.text().await.unwrap_or_default();
            return Err(SearchError::Transport(format!(
                "TMDB request failed with status {}: {}",
                status, text
            )));
        }

        let body: TmdbResponse = resp.json().await?;
        if body.is_failure() {
            return Err(SearchError::Upstream(body.error));
        }

        let movies = body.results.unwrap_or_default();
        info!("TMDB returned {} movies", movies.len());
        Ok(SearchOutcome::new(query, movies))
    }
}
