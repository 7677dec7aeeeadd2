pub mod appwrite;
pub mod config;
pub mod controller;
pub mod debounce;
pub mod error;
pub mod http;
pub mod render;
pub mod search;
pub mod stdio_service;
pub mod trending;
pub mod types;

use std::sync::Arc;

use tracing::info;

use crate::appwrite::AppwriteTrendStore;
use crate::config::Config;
use crate::controller::{ControllerHandle, ControllerSettings};
use crate::render::RenderOptions;
use crate::search::TmdbClient;
use crate::trending::{MemoryTrendStore, TrendStore};

#[derive(Clone, Debug)]
pub struct AppState {
    pub controller: ControllerHandle,
    pub render_options: RenderOptions,
}

// Re-export AppState for easy access
pub use types::*;

impl AppState {
    pub fn new(controller: ControllerHandle, render_options: RenderOptions) -> Self {
        Self {
            controller,
            render_options,
        }
    }
}

/// Build the HTTP client, search client and trend store, then start the
/// controller. Must run inside a tokio runtime.
pub fn bootstrap(config: &Config) -> anyhow::Result<AppState> {
    // Create HTTP client
    let http_client = reqwest::Client::builder()
        .timeout(config.request_timeout)
        .build()?;

    let search = Arc::new(TmdbClient::new(http_client.clone(), config.tmdb.clone()));

    let trends: Arc<dyn TrendStore> = match &config.appwrite {
        Some(appwrite) => {
            info!("Trend store: Appwrite at {}", appwrite.endpoint);
            Arc::new(AppwriteTrendStore::new(http_client, appwrite.clone()))
        }
        None => {
            info!("Trend store: in-memory (APPWRITE_ENDPOINT not set)");
            Arc::new(MemoryTrendStore::new())
        }
    };

    let handle = controller::spawn(search, trends, ControllerSettings::from(config));
    Ok(AppState::new(
        handle,
        RenderOptions {
            poster_base_url: config.poster_base_url.clone(),
        },
    ))
}
