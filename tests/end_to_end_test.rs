use axum::extract::{Query, State};
use axum::response::Json;
use axum::routing::get;
use axum::Router;
use movie_finder::config::Config;
use movie_finder::controller::{self, ControllerHandle, ControllerSettings};
use movie_finder::search::TmdbClient;
use movie_finder::trending::{MemoryTrendStore, TrendStore};
use movie_finder::{bootstrap, TrendSnapshot, ViewState};
use serde_json::json;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

type Log = Arc<Mutex<Vec<String>>>;

async fn search_movie(State(log): State<Log>, Query(params): Query<HashMap<String, String>>) -> Json<serde_json::Value> {
    let query = params.get("query").cloned().unwrap_or_default();
    log.lock().unwrap().push(format!("search:{}", query));
    match query.as_str() {
        "dune" => Json(json!({
            "page": 1,
            "results": [
                { "id": 438631, "title": "Dune", "poster_path": "/dune.jpg", "vote_average": 7.8, "release_date": "2021-09-15" },
                { "id": 693134, "title": "Dune: Part Two", "vote_average": 8.2 },
                { "id": 841, "title": "Dune", "vote_average": 6.3, "release_date": "1984-12-14" }
            ]
        })),
        _ => Json(json!({ "Response": "False", "Error": "no results" })),
    }
}

async fn discover_movie(State(log): State<Log>) -> Json<serde_json::Value> {
    log.lock().unwrap().push("discover".to_string());
    Json(json!({ "page": 1, "results": [{ "id": 1, "title": "Popular Pick", "vote_average": 7.0 }] }))
}

async fn spawn_fake_tmdb(log: Log) -> String {
    let router = Router::new()
        .route("/3/search/movie", get(search_movie))
        .route("/3/discover/movie", get(discover_movie))
        .with_state(log);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{}/3", addr)
}

fn config_for(base_url: &str) -> Config {
    let vars: HashMap<&str, String> = HashMap::from([
        ("TMDB_API_KEY", "e2e-key".to_string()),
        ("TMDB_BASE_URL", base_url.to_string()),
        ("SEARCH_DEBOUNCE_MS", "50".to_string()),
        ("REQUEST_TIMEOUT_SECS", "5".to_string()),
    ]);
    Config::from_lookup(|key| vars.get(key).cloned()).unwrap()
}

async fn wait_for<F>(handle: &ControllerHandle, pred: F) -> ViewState
where
    F: Fn(&ViewState) -> bool,
{
    let mut rx = handle.subscribe();
    let state = tokio::time::timeout(Duration::from_secs(10), rx.wait_for(|s| pred(s)))
        .await
        .expect("timed out waiting for view")
        .expect("controller stopped")
        .clone();
    state
}

#[tokio::test]
async fn typed_query_issues_exactly_one_search() {
    let log: Log = Arc::default();
    let base = spawn_fake_tmdb(log.clone()).await;
    let state = bootstrap(&config_for(&base)).unwrap();
    let handle = state.controller.clone();

    wait_for(&handle, |s| !s.movies.is_empty() && !s.is_loading).await;
    for text in ["d", "du", "dun", "dune"] {
        handle.edit_query(text);
    }

    let view = wait_for(&handle, |s| s.effective_query == "dune" && !s.is_loading).await;
    assert_eq!(view.movies.len(), 3);
    assert!(view.error_message.is_none());

    let searches: Vec<_> = log
        .lock()
        .unwrap()
        .iter()
        .filter(|l| l.starts_with("search:"))
        .cloned()
        .collect();
    assert_eq!(searches, vec!["search:dune".to_string()]);
}

#[tokio::test]
async fn upstream_failure_is_shown_and_clears_results() {
    let log: Log = Arc::default();
    let base = spawn_fake_tmdb(log).await;
    let state = bootstrap(&config_for(&base)).unwrap();
    let handle = state.controller.clone();

    wait_for(&handle, |s| !s.movies.is_empty() && !s.is_loading).await;
    handle.edit_query("zzzznotamovie");

    let view = wait_for(&handle, |s| s.effective_query == "zzzznotamovie" && !s.is_loading).await;
    assert_eq!(view.error_message.as_deref(), Some("no results"));
    assert!(view.movies.is_empty());
}

#[tokio::test]
async fn startup_browses_and_fills_trending_panel() {
    let log: Log = Arc::default();
    let base = spawn_fake_tmdb(log.clone()).await;
    let config = config_for(&base);

    let store = Arc::new(MemoryTrendStore::new());
    for term in ["dune", "dune", "alien"] {
        let snapshot = TrendSnapshot {
            movie_id: 1,
            title: term.to_string(),
            poster_url: None,
        };
        store.increment_or_create(term, &snapshot).await.unwrap();
    }

    let client = TmdbClient::new(reqwest::Client::new(), config.tmdb.clone());
    let handle = controller::spawn(Arc::new(client), store, ControllerSettings::from(&config));

    let view = wait_for(&handle, |s| !s.is_loading && !s.movies.is_empty() && !s.trending.is_empty()).await;
    assert_eq!(view.movies[0].title, "Popular Pick");
    assert_eq!(view.trending[0].search_term, "dune");
    assert_eq!(view.trending[0].count, 2);
    assert_eq!(*log.lock().unwrap(), vec!["discover".to_string()]);
}
