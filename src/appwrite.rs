use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::debug;

use crate::config::AppwriteConfig;
use crate::error::StoreError;
use crate::trending::TrendStore;
use crate::types::{TrendSnapshot, TrendingEntry};

/// Trend counters kept in an Appwrite collection.
///
/// The lookup and the increment are two separate requests, so two sessions
/// searching the same term at once can lose an increment.
#[derive(Clone, Debug)]
pub struct AppwriteTrendStore {
    http_client: reqwest::Client,
    documents_url: String,
    project_id: String,
    api_key: String,
}

#[derive(Debug, Deserialize)]
struct DocumentList {
    #[serde(default)]
    documents: Vec<TrendDocument>,
}

#[derive(Debug, Deserialize, Serialize)]
struct TrendDocument {
    #[serde(rename = "$id")]
    id: String,
    #[serde(rename = "$updatedAt", default)]
    updated_at: Option<DateTime<Utc>>,
    #[serde(rename = "searchTerm")]
    search_term: String,
    count: u64,
    movie_id: u64,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    poster_url: Option<String>,
}

impl From<TrendDocument> for TrendingEntry {
    fn from(doc: TrendDocument) -> Self {
        TrendingEntry {
            id: doc.id,
            search_term: doc.search_term,
            count: doc.count,
            movie_id: doc.movie_id,
            title: doc.title.unwrap_or_default(),
            poster_url: doc.poster_url,
            updated_at: doc.updated_at.unwrap_or_else(Utc::now),
        }
    }
}

impl AppwriteTrendStore {
    pub fn new(http_client: reqwest::Client, config: AppwriteConfig) -> Self {
        let documents_url = format!(
            "{}/databases/{}/collections/{}/documents",
            config.endpoint.trim_end_matches('/'),
            config.database_id,
            config.collection_id
        );
        Self {
            http_client,
            documents_url,
            project_id: config.project_id,
            api_key: config.api_key,
        }
    }

    fn request(&self, method: reqwest::Method, url: &str) -> reqwest::RequestBuilder {
        self.http_client
            .request(method, url)
            .header("X-Appwrite-Project", &self.project_id)
            .header("X-Appwrite-Key", &self.api_key)
            .header("Accept", "application/json")
    }

    async fn list(&self, queries: &[serde_json::Value]) -> Result<Vec<TrendDocument>, StoreError> {
        let params: Vec<(&str, String)> = queries
            .iter()
            .map(|q| ("queries[]", q.to_string()))
            .collect();
        let resp = self
            .request(reqwest::Method::GET, &self.documents_url)
            .query(&params)
            .send()
            .await?;
        let list: DocumentList = check(resp).await?.json().await?;
        Ok(list.documents)
    }
}

async fn check(resp: reqwest::Response) -> Result<reqwest::Response, StoreError> {
    if resp.status().is_success() {
        return Ok(resp);
    }
    let status = resp.status().as_u16();
    let body = resp.text().await.unwrap_or_default();
    Err(StoreError::Status { status, body })
}

#[async_trait]
impl TrendStore for AppwriteTrendStore {
    async fn increment_or_create(
        &self,
        search_term: &str,
        snapshot: &TrendSnapshot,
    ) -> Result<TrendingEntry, StoreError> {
        let existing = self
            .list(&[json!({ "method": "equal", "attribute": "searchTerm", "values": [search_term] })])
            .await?;

        let resp = match existing.into_iter().next() {
            Some(doc) => {
                debug!("Incrementing trend document {}", doc.id);
                let url = format!("{}/{}", self.documents_url, doc.id);
                self.request(reqwest::Method::PATCH, &url)
                    .json(&json!({ "data": { "count": doc.count + 1 } }))
                    .send()
                    .await?
            }
            None => {
                debug!("Creating trend document for {:?}", search_term);
                self.request(reqwest::Method::POST, &self.documents_url)
                    .json(&json!({
                        "documentId": "unique()",
                        "data": {
                            "searchTerm": search_term,
                            "count": 1,
                            "movie_id": snapshot.movie_id,
                            "title": snapshot.title,
                            "poster_url": snapshot.poster_url,
                        }
                    }))
                    .send()
                    .await?
            }
        };

        let doc: TrendDocument = check(resp).await?.json().await?;
        Ok(doc.into())
    }

    async fn list_top(&self, limit: usize) -> Result<Vec<TrendingEntry>, StoreError> {
        let docs = self
            .list(&[
                json!({ "method": "limit", "values": [limit] }),
                json!({ "method": "orderDesc", "attribute": "count" }),
                json!({ "method": "orderDesc", "attribute": "$updatedAt" }),
            ])
            .await?;
        Ok(docs.into_iter().map(TrendingEntry::from).collect())
    }
}
