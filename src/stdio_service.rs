//! Terminal front-end: each stdin line replaces the query text, each view
//! change is drawn to stdout.

use tokio::io::{AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tracing::info;

use crate::config::Config;
use crate::render::{self, RenderOptions};
use crate::{bootstrap, AppState, ViewState};

const FRAME_RULE: &str = "----------------------------------------\n";

pub async fn run() -> anyhow::Result<()> {
    // Logs go to stderr so they never interleave with the frames on stdout.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("movie_finder=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = Config::from_env()?;
    info!("Starting movie finder (stdio)");

    let state = bootstrap(&config)?;
    let stdin = BufReader::new(tokio::io::stdin());
    serve(state, stdin, tokio::io::stdout()).await
}

/// Drive the view from `input` lines and draw frames to `output` until the
/// input ends.
pub async fn serve<R, W>(state: AppState, input: R, mut output: W) -> anyhow::Result<()>
where
    R: tokio::io::AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut view = state.controller.subscribe();
    let mut lines = input.lines();

    let first = view.borrow_and_update().clone();
    draw(&mut output, &first, &state.render_options).await?;

    loop {
        tokio::select! {
            line = lines.next_line() => match line? {
                Some(text) => state.controller.edit_query(text.trim_end()),
                None => break,
            },
            changed = view.changed() => {
                if changed.is_err() {
                    break;
                }
                let current = view.borrow_and_update().clone();
                draw(&mut output, &current, &state.render_options).await?;
            }
        }
    }

    info!("Input closed, exiting");
    Ok(())
}

async fn draw<W>(output: &mut W, view: &ViewState, options: &RenderOptions) -> anyhow::Result<()>
where
    W: AsyncWrite + Unpin,
{
    output.write_all(FRAME_RULE.as_bytes()).await?;
    output.write_all(render::render(view, options).as_bytes()).await?;
    output.flush().await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::{self, ControllerSettings};
    use crate::error::SearchError;
    use crate::search::MovieSearch;
    use crate::trending::MemoryTrendStore;
    use crate::types::{Movie, SearchOutcome};
    use async_trait::async_trait;
    use std::sync::Arc;
    use std::time::Duration;

    struct Echo;

    #[async_trait]
    impl MovieSearch for Echo {
        async fn search(&self, query: &str) -> Result<SearchOutcome, SearchError> {
            if query == "broken" {
                return Err(SearchError::Upstream(None));
            }
            Ok(SearchOutcome::new(
                query,
                vec![Movie {
                    id: 7,
                    title: format!("Result for {:?}", query),
                    poster_path: None,
                    popularity: 0.0,
                    release_date: Some("1995-12-15".into()),
                    vote_average: 8.3,
                    original_language: Some("en".into()),
                }],
            ))
        }
    }

    #[tokio::test]
    async fn test_lines_drive_frames() {
        let handle = controller::spawn(
            Arc::new(Echo),
            Arc::new(MemoryTrendStore::new()),
            ControllerSettings {
                debounce: Duration::from_millis(20),
                trending_limit: 5,
                poster_base_url: "https://image.tmdb.org/t/p/w500".into(),
            },
        );
        let state = AppState::new(handle.clone(), RenderOptions::default());

        let (mut input, input_rx) = tokio::io::duplex(1024);
        let (output_tx, mut output) = tokio::io::duplex(256 * 1024);
        let serving = tokio::spawn(serve(state, BufReader::new(input_rx), output_tx));

        input.write_all(b"broken\n").await.unwrap();

        let mut rx = handle.subscribe();
        tokio::time::timeout(
            Duration::from_secs(5),
            rx.wait_for(|s| s.effective_query == "broken" && !s.is_loading),
        )
        .await
        .unwrap()
        .unwrap();
        assert_eq!(handle.snapshot().error_message.as_deref(), Some("Failed to fetch movies"));

        // Let the last frame be drawn, then close stdin to end the session.
        tokio::time::sleep(Duration::from_millis(200)).await;
        drop(input);
        tokio::time::timeout(Duration::from_secs(5), serving)
            .await
            .unwrap()
            .unwrap()
            .unwrap();

        let mut frames = String::new();
        tokio::io::AsyncReadExt::read_to_string(&mut output, &mut frames)
            .await
            .unwrap();
        assert!(frames.starts_with(FRAME_RULE));
        assert!(frames.contains("[ broken ]"));
        assert!(frames.contains("Failed to fetch movies"));
    }
}
