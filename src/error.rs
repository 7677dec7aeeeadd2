use thiserror::Error;

/// Message shown when the metadata API flags a failure without saying why.
pub const UPSTREAM_FALLBACK_MESSAGE: &str = "Failed to fetch movies";

/// Message shown for any network or HTTP-status failure.
pub const TRANSPORT_USER_MESSAGE: &str = "Error fetching movies. Please try again later.";

#[derive(Debug, Error)]
pub enum SearchError {
    #[error("transport error: {0}")]
    Transport(String),
    #[error("upstream error: {}", .0.as_deref().unwrap_or(UPSTREAM_FALLBACK_MESSAGE))]
    Upstream(Option<String>),
}

impl SearchError {
    /// The single message the view displays for a failed search.
    pub fn user_message(&self) -> String {
        match self {
            SearchError::Transport(_) => TRANSPORT_USER_MESSAGE.to_string(),
            SearchError::Upstream(Some(message)) if !message.is_empty() => message.clone(),
            SearchError::Upstream(_) => UPSTREAM_FALLBACK_MESSAGE.to_string(),
        }
    }
}

impl From<reqwest::Error> for SearchError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            SearchError::Transport(format!("request timed out: {}", e))
        } else {
            SearchError::Transport(e.to_string())
        }
    }
}

/// Trend store failures. Never shown to the user.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("trend store request failed: {0}")]
    Request(String),
    #[error("trend store returned status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("trend store response could not be decoded: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for StoreError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            StoreError::Decode(e.to_string())
        } else {
            StoreError::Request(e.to_string())
        }
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("missing required configuration: {0}")]
    Missing(&'static str),
    #[error("invalid value for {key}: {value:?}")]
    Invalid { key: &'static str, value: String },
    #[error("invalid URL for {key}: {reason}")]
    InvalidUrl { key: &'static str, reason: String },
}
