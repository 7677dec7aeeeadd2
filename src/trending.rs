//! Search-popularity counters.
//!
//! [`TrendStore`] is the persistence seam: [`MemoryTrendStore`] keeps counters
//! in-process, `AppwriteTrendStore` keeps them in a hosted collection. The free
//! functions [`record_search`] and [`top_trending`] are what the controller
//! calls; both swallow store failures so the trending panel never blocks a
//! search.

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use tracing::{debug, warn};

use crate::error::StoreError;
use crate::types::{TrendSnapshot, TrendingEntry};

#[async_trait]
pub trait TrendStore: Send + Sync {
    /// Bump the counter for `search_term` by one, creating it (count = 1, with
    /// `snapshot` stored alongside) when no counter matches exactly.
    async fn increment_or_create(
        &self,
        search_term: &str,
        snapshot: &TrendSnapshot,
    ) -> Result<TrendingEntry, StoreError>;

    /// Up to `limit` counters, highest count first.
    async fn list_top(&self, limit: usize) -> Result<Vec<TrendingEntry>, StoreError>;
}

/// Record one search against the store. Failures are logged and dropped.
pub async fn record_search(
    store: &dyn TrendStore,
    query: &str,
    snapshot: &TrendSnapshot,
) -> Option<TrendingEntry> {
    if query.is_empty() {
        return None;
    }
    match store.increment_or_create(query, snapshot).await {
        Ok(entry) => {
            debug!("Search count for {:?} is now {}", query, entry.count);
            Some(entry)
        }
        Err(e) => {
            warn!("Error updating search count for {:?}: {}", query, e);
            None
        }
    }
}

/// Read the trending panel. Failures yield an empty list.
pub async fn top_trending(store: &dyn TrendStore, limit: usize) -> Vec<TrendingEntry> {
    match store.list_top(limit).await {
        Ok(entries) => entries,
        Err(e) => {
            warn!("Error loading trending movies: {}", e);
            Vec::new()
        }
    }
}

#[derive(Debug)]
struct Counter {
    entry: TrendingEntry,
    // Monotonic touch order; larger means more recently incremented.
    touched: u64,
}

/// In-process counters. Ties on count go to the most recently touched entry.
#[derive(Debug, Default)]
pub struct MemoryTrendStore {
    inner: RwLock<MemoryInner>,
}

#[derive(Debug, Default)]
struct MemoryInner {
    counters: Vec<Counter>,
    clock: u64,
}

impl MemoryTrendStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.counters.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl TrendStore for MemoryTrendStore {
    async fn increment_or_create(
        &self,
        search_term: &str,
        snapshot: &TrendSnapshot,
    ) -> Result<TrendingEntry, StoreError> {
        let mut inner = self.inner.write().await;
        inner.clock += 1;
        let touched = inner.clock;

        if let Some(counter) = inner
            .counters
            .iter_mut()
            .find(|c| c.entry.search_term == search_term)
        {
            counter.entry.count += 1;
            counter.entry.updated_at = Utc::now();
            counter.touched = touched;
            return Ok(counter.entry.clone());
        }

        let entry = TrendingEntry {
            id: uuid::Uuid::new_v4().to_string(),
            search_term: search_term.to_string(),
            count: 1,
            movie_id: snapshot.movie_id,
            title: snapshot.title.clone(),
            poster_url: snapshot.poster_url.clone(),
            updated_at: Utc::now(),
        };
        inner.counters.push(Counter {
            entry: entry.clone(),
            touched,
        });
        Ok(entry)
    }

    async fn list_top(&self, limit: usize) -> Result<Vec<TrendingEntry>, StoreError> {
        let inner = self.inner.read().await;
        let mut ranked: Vec<&Counter> = inner.counters.iter().collect();
        ranked.sort_by(|a, b| {
            b.entry
                .count
                .cmp(&a.entry.count)
                .then(b.touched.cmp(&a.touched))
        });
        Ok(ranked
            .into_iter()
            .take(limit)
            .map(|c| c.entry.clone())
            .collect())
    }
}
