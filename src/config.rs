use std::env;
use std::time::Duration;

use crate::error::ConfigError;

pub const DEFAULT_TMDB_BASE_URL: &str = "https://api.themoviedb.org/3";
pub const DEFAULT_POSTER_BASE_URL: &str = "https://image.tmdb.org/t/p/w500";
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:5000";

#[derive(Clone, Debug)]
pub struct TmdbConfig {
    pub base_url: String,
    pub api_key: String,
}

#[derive(Clone, Debug)]
pub struct AppwriteConfig {
    pub endpoint: String,
    pub project_id: String,
    pub database_id: String,
    pub collection_id: String,
    pub api_key: String,
}

#[derive(Clone, Debug)]
pub struct Config {
    pub tmdb: TmdbConfig,
    /// Hosted trend store; the in-memory store is used when absent.
    pub appwrite: Option<AppwriteConfig>,
    pub poster_base_url: String,
    pub debounce: Duration,
    pub trending_limit: usize,
    pub request_timeout: Duration,
    pub bind_addr: String,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let api_key = get("TMDB_API_KEY")
            .or_else(|| get("VITE_TMDB_API_KEY"))
            .ok_or(ConfigError::Missing("TMDB_API_KEY"))?;
        let base_url = get("TMDB_BASE_URL").unwrap_or_else(|| DEFAULT_TMDB_BASE_URL.to_string());
        check_url("TMDB_BASE_URL", &base_url)?;

        let poster_base_url =
            get("TMDB_POSTER_BASE_URL").unwrap_or_else(|| DEFAULT_POSTER_BASE_URL.to_string());
        check_url("TMDB_POSTER_BASE_URL", &poster_base_url)?;

        let debounce_ms = parse_number("SEARCH_DEBOUNCE_MS", get("SEARCH_DEBOUNCE_MS"), 1000)?;
        let trending_limit = parse_number("TRENDING_LIMIT", get("TRENDING_LIMIT"), 5)?;
        let timeout_secs = parse_number("REQUEST_TIMEOUT_SECS", get("REQUEST_TIMEOUT_SECS"), 10)?;

        let appwrite = match get("APPWRITE_ENDPOINT") {
            Some(endpoint) => {
                check_url("APPWRITE_ENDPOINT", &endpoint)?;
                Some(AppwriteConfig {
                    endpoint,
                    project_id: get("APPWRITE_PROJECT_ID").ok_or(ConfigError::Missing("APPWRITE_PROJECT_ID"))?,
                    database_id: get("APPWRITE_DATABASE_ID").ok_or(ConfigError::Missing("APPWRITE_DATABASE_ID"))?,
                    collection_id: get("APPWRITE_COLLECTION_ID")
                        .ok_or(ConfigError::Missing("APPWRITE_COLLECTION_ID"))?,
                    api_key: get("APPWRITE_API_KEY").ok_or(ConfigError::Missing("APPWRITE_API_KEY"))?,
                })
            }
            None => None,
        };

        let cfg = Config {
            tmdb: TmdbConfig { base_url, api_key },
            appwrite,
            poster_base_url,
            debounce: Duration::from_millis(debounce_ms),
            trending_limit: trending_limit as usize,
            request_timeout: Duration::from_secs(timeout_secs),
            bind_addr: get("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string()),
        };
        validate(&cfg)?;
        Ok(cfg)
    }
}

pub fn validate(cfg: &Config) -> Result<(), ConfigError> {
    if cfg.debounce.is_zero() {
        return Err(ConfigError::Invalid {
            key: "SEARCH_DEBOUNCE_MS",
            value: "0".into(),
        });
    }

    if cfg.trending_limit == 0 || cfg.trending_limit > 100 {
        return Err(ConfigError::Invalid {
            key: "TRENDING_LIMIT",
            value: cfg.trending_limit.to_string(),
        });
    }

    if cfg.request_timeout.is_zero() {
        return Err(ConfigError::Invalid {
            key: "REQUEST_TIMEOUT_SECS",
            value: "0".into(),
        });
    }

    Ok(())
}

fn parse_number(key: &'static str, raw: Option<String>, default: u64) -> Result<u64, ConfigError> {
    match raw {
        None => Ok(default),
        Some(value) => value.parse().map_err(|_| ConfigError::Invalid { key, value }),
    }
}

fn check_url(key: &'static str, raw: &str) -> Result<(), ConfigError> {
    let parsed = url::Url::parse(raw).map_err(|e| ConfigError::InvalidUrl {
        key,
        reason: e.to_string(),
    })?;
    match parsed.scheme() {
        "http" | "https" => Ok(()),
        other => Err(ConfigError::InvalidUrl {
            key,
            reason: format!("unsupported scheme {}", other),
        }),
    }
}
