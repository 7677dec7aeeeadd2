use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Json},
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::render;
use crate::types::*;
use crate::AppState;

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(health_check))
        .route("/health", get(health_check))
        .route("/state", get(view_state_handler))
        .route("/view", get(view_text_handler))
        .route("/query", post(edit_query_handler))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "movie-finder",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

async fn view_state_handler(State(state): State<Arc<AppState>>) -> Json<ViewState> {
    Json(state.controller.snapshot())
}

async fn view_text_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let text = render::render(&state.controller.snapshot(), &state.render_options);
    ([(header::CONTENT_TYPE, "text/plain; charset=utf-8")], text)
}

async fn edit_query_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<QueryRequest>,
) -> impl IntoResponse {
    info!("Query edited: {:?}", request.query);
    state.controller.edit_query(request.query.clone());
    (StatusCode::ACCEPTED, Json(request))
}
