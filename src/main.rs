use std::sync::Arc;
use tracing::info;

use movie_finder::{bootstrap, config::Config, http};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("movie_finder=info,tower_http=info")),
        )
        .init();

    // Get configuration from environment
    let config = Config::from_env()?;

    info!("Starting movie finder");
    info!("TMDB URL: {}", config.tmdb.base_url);

    let state = Arc::new(bootstrap(&config)?);
    let app = http::router(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    info!("Movie finder listening on http://{}", config.bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}
