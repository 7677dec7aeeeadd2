//! View model controller.
//!
//! One tokio task owns the [`ViewState`] and applies every transition:
//! query edits, debounce firings, search completions and the startup trending
//! load. Searches run in their own tasks and report back tagged with a sequence
//! number; only the most recently issued search may touch the view.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tracing::{debug, error, info, warn};

use crate::config::Config;
use crate::debounce::Debouncer;
use crate::error::SearchError;
use crate::search::MovieSearch;
use crate::trending::{self, TrendStore};
use crate::types::*;

#[derive(Clone, Debug)]
pub struct ControllerSettings {
    pub debounce: Duration,
    pub trending_limit: usize,
    pub poster_base_url: String,
}

impl From<&Config> for ControllerSettings {
    fn from(config: &Config) -> Self {
        Self {
            debounce: config.debounce,
            trending_limit: config.trending_limit,
            poster_base_url: config.poster_base_url.clone(),
        }
    }
}

#[derive(Debug)]
enum Command {
    EditQuery(String),
}

#[derive(Debug)]
enum Event {
    SearchFinished {
        seq: u64,
        query: String,
        outcome: Result<SearchOutcome, SearchError>,
    },
    TrendingLoaded(Vec<TrendingEntry>),
}

/// Cloneable handle to a running controller.
#[derive(Clone, Debug)]
pub struct ControllerHandle {
    commands: mpsc::UnboundedSender<Command>,
    view: watch::Receiver<ViewState>,
}

impl ControllerHandle {
    pub fn edit_query(&self, text: impl Into<String>) {
        if self.commands.send(Command::EditQuery(text.into())).is_err() {
            warn!("Query edit dropped: controller is not running");
        }
    }

    pub fn snapshot(&self) -> ViewState {
        self.view.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<ViewState> {
        self.view.clone()
    }
}

/// Start a controller. The task stops once every handle is dropped.
pub fn spawn(
    search: Arc<dyn MovieSearch>,
    trends: Arc<dyn TrendStore>,
    settings: ControllerSettings,
) -> ControllerHandle {
    let (commands_tx, commands_rx) = mpsc::unbounded_channel();
    let (view_tx, view_rx) = watch::channel(ViewState::default());
    let (events_tx, events_rx) = mpsc::unbounded_channel();
    let (debouncer, debounced) = Debouncer::spawn(settings.debounce);

    let controller = Controller {
        search,
        trends,
        settings,
        state: ViewState::default(),
        view: view_tx,
        latest_seq: 0,
        events: events_tx,
        debouncer,
    };
    tokio::spawn(controller.run(commands_rx, events_rx, debounced));

    ControllerHandle {
        commands: commands_tx,
        view: view_rx,
    }
}

struct Controller {
    search: Arc<dyn MovieSearch>,
    trends: Arc<dyn TrendStore>,
    settings: ControllerSettings,
    state: ViewState,
    view: watch::Sender<ViewState>,
    latest_seq: u64,
    events: mpsc::UnboundedSender<Event>,
    debouncer: Debouncer<String>,
}

impl Controller {
    async fn run(
        mut self,
        mut commands: mpsc::UnboundedReceiver<Command>,
        mut events: mpsc::UnboundedReceiver<Event>,
        mut debounced: mpsc::UnboundedReceiver<String>,
    ) {
        info!("View model controller started");
        self.load_trending();
        self.begin_search(String::new());

        loop {
            tokio::select! {
                cmd = commands.recv() => match cmd {
                    Some(Command::EditQuery(text)) => self.edit_query(text),
                    None => break,
                },
                Some(query) = debounced.recv() => self.on_debounced(query),
                Some(event) = events.recv() => self.on_event(event),
            }
        }
        info!("View model controller stopped");
    }

    fn publish(&self) {
        self.view.send_replace(self.state.clone());
    }

    fn edit_query(&mut self, text: String) {
        self.state.query = text.clone();
        self.publish();
        self.debouncer.push(text);
    }

    fn on_debounced(&mut self, query: String) {
        if query == self.state.effective_query {
            debug!("Debounced query unchanged, no new search");
            return;
        }
        self.state.effective_query = query.clone();
        self.begin_search(query);
    }

    fn begin_search(&mut self, query: String) {
        self.latest_seq += 1;
        let seq = self.latest_seq;
        self.state.is_loading = true;
        self.state.error_message = None;
        self.publish();

        let search = self.search.clone();
        let trends = self.trends.clone();
        let events = self.events.clone();
        let poster_base_url = self.settings.poster_base_url.clone();
        tokio::spawn(async move {
            let outcome = search.search(&query).await;

            if let Ok(found) = &outcome {
                if let Some(top) = &found.top_result {
                    let snapshot = TrendSnapshot::from_movie(top, &poster_base_url);
                    let term = query.clone();
                    // Detached: the view never waits on trend recording.
                    tokio::spawn(async move {
                        trending::record_search(trends.as_ref(), &term, &snapshot).await;
                    });
                }
            }

            let _ = events.send(Event::SearchFinished { seq, query, outcome });
        });
    }

    fn load_trending(&self) {
        let trends = self.trends.clone();
        let events = self.events.clone();
        let limit = self.settings.trending_limit;
        tokio::spawn(async move {
            let entries = trending::top_trending(trends.as_ref(), limit).await;
            let _ = events.send(Event::TrendingLoaded(entries));
        });
    }

    fn on_event(&mut self, event: Event) {
        match event {
            Event::SearchFinished { seq, query, outcome } => {
                if seq != self.latest_seq {
                    debug!("Discarding stale response #{} for {:?}", seq, query);
                    return;
                }
                match outcome {
                    Ok(found) => {
                        self.state.movies = found.movies;
                        self.state.error_message = None;
                    }
                    Err(e) => {
                        match &e {
                            SearchError::Transport(_) => error!("Error fetching movies: {}", e),
                            SearchError::Upstream(_) => error!("Movie API reported failure: {}", e),
                        }
                        self.state.error_message = Some(e.user_message());
                        self.state.movies.clear();
                    }
                }
                self.state.is_loading = false;
                self.publish();
            }
            Event::TrendingLoaded(entries) => {
                info!("Loaded {} trending entries", entries.len());
                self.state.trending = entries;
                self.publish();
            }
        }
    }
}
