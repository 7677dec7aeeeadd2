//! Text rendering of the view state. Pure; no I/O.

use std::fmt::Write;

use crate::config::DEFAULT_POSTER_BASE_URL;
use crate::types::{Movie, ViewState};

pub const SEARCH_PLACEHOLDER: &str = "Search through thousands of movies";
pub const NO_POSTER: &str = "/no-movie.png";

#[derive(Clone, Debug)]
pub struct RenderOptions {
    pub poster_base_url: String,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            poster_base_url: DEFAULT_POSTER_BASE_URL.to_string(),
        }
    }
}

pub fn render(state: &ViewState, options: &RenderOptions) -> String {
    let mut out = String::new();

    out.push_str("Find Movies You'll Enjoy Without the Hassle\n\n");
    if state.query.is_empty() {
        let _ = writeln!(out, "[ {} ]", SEARCH_PLACEHOLDER);
    } else {
        let _ = writeln!(out, "[ {} ]", state.query);
    }

    if !state.trending.is_empty() {
        out.push_str("\nTrending Movies\n");
        for (i, entry) in state.trending.iter().enumerate() {
            let _ = writeln!(
                out,
                "  {}. {} ({})",
                i + 1,
                entry.title,
                entry.poster_url.as_deref().unwrap_or(NO_POSTER)
            );
        }
    }

    out.push_str("\nAll Movies\n");
    if state.is_loading {
        out.push_str("  Loading...\n");
    } else if let Some(message) = &state.error_message {
        let _ = writeln!(out, "  {}", message);
    } else if state.movies.is_empty() {
        out.push_str("  No movies found.\n");
    } else {
        for movie in &state.movies {
            out.push_str(&movie_card(movie, options));
        }
    }

    out
}

pub fn movie_card(movie: &Movie, options: &RenderOptions) -> String {
    let rating = if movie.vote_average > 0.0 {
        format!("{:.1}", movie.vote_average)
    } else {
        "N/A".to_string()
    };
    let poster = movie
        .poster_url(&options.poster_base_url)
        .unwrap_or_else(|| NO_POSTER.to_string());

    format!(
        "  * {}\n    {} | {} | {}\n    {}\n",
        movie.title,
        rating,
        movie.original_language.as_deref().unwrap_or("N/A"),
        movie.release_year().unwrap_or("N/A"),
        poster
    )
}
