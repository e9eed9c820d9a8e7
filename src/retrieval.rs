//! Retrieval and history boundaries
//!
//! The engine never constructs profile data itself; it consumes these
//! collaborator interfaces. `HtmlSource` pulls live profile markup over
//! HTTP, `FixtureSource` replays on-disk JSON captures (tests, demos).

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;

use crate::error::AnalyticsError;
use crate::extractor::{parse_markup, parse_nodes, parse_posts_markup, SnapshotNode};
use crate::model::{FeedItem, Post, ProfileSnapshot};

/// Upstream supplier of raw profile data.
#[async_trait]
pub trait ProfileSource: Send + Sync {
    async fn fetch_snapshot(&self, username: &str) -> Result<ProfileSnapshot, AnalyticsError>;
    async fn fetch_posts(&self, username: &str) -> Result<Vec<Post>, AnalyticsError>;
    async fn fetch_feed(&self, username: &str) -> Result<Vec<FeedItem>, AnalyticsError>;
}

/// Supplier of previously captured snapshots, in arbitrary order; the
/// growth engine sorts internally.
pub trait HistoryStore: Send + Sync {
    fn load_history(&self, username: &str) -> Vec<ProfileSnapshot>;
}

/// In-memory history keyed by username. Persistence is deliberately out of
/// scope; this is the only implementation.
#[derive(Default)]
pub struct InMemoryHistoryStore {
    inner: Mutex<HashMap<String, Vec<ProfileSnapshot>>>,
}

impl InMemoryHistoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, snapshot: ProfileSnapshot) {
        let mut inner = self.inner.lock().expect("history lock poisoned");
        inner
            .entry(snapshot.username.clone())
            .or_default()
            .push(snapshot);
    }
}

impl HistoryStore for InMemoryHistoryStore {
    fn load_history(&self, username: &str) -> Vec<ProfileSnapshot> {
        let inner = self.inner.lock().expect("history lock poisoned");
        inner.get(username).cloned().unwrap_or_default()
    }
}

/// Live source: fetches profile markup and runs it through the extractor.
pub struct HtmlSource {
    client: reqwest::Client,
    base_url: String,
}

impl HtmlSource {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, AnalyticsError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AnalyticsError::Retrieval(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    async fn fetch_profile_page(&self, username: &str) -> Result<String, AnalyticsError> {
        let url = format!("{}/u/{}", self.base_url, username);
        log::info!("fetching profile page {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| AnalyticsError::Retrieval(e.to_string()))?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(AnalyticsError::SubjectNotFound(username.to_string()));
        }
        if !response.status().is_success() {
            return Err(AnalyticsError::Retrieval(format!(
                "unexpected status {} from {}",
                response.status(),
                url
            )));
        }

        response
            .text()
            .await
            .map_err(|e| AnalyticsError::Retrieval(e.to_string()))
    }
}

#[async_trait]
impl ProfileSource for HtmlSource {
    async fn fetch_snapshot(&self, username: &str) -> Result<ProfileSnapshot, AnalyticsError> {
        let markup = self.fetch_profile_page(username).await?;
        Ok(parse_markup(&markup, username))
    }

    async fn fetch_posts(&self, username: &str) -> Result<Vec<Post>, AnalyticsError> {
        let markup = self.fetch_profile_page(username).await?;
        let mut posts = parse_posts_markup(&markup);
        for post in &mut posts {
            if let Some(url) = post.url.take() {
                post.url = Some(if url.starts_with('/') {
                    format!("{}{}", self.base_url, url)
                } else {
                    url
                });
            }
        }
        log::info!("extracted {} posts for {}", posts.len(), username);
        Ok(posts)
    }

    async fn fetch_feed(&self, _username: &str) -> Result<Vec<FeedItem>, AnalyticsError> {
        // Profile markup carries no community feed; mention data comes from
        // a feed-capable collaborator (or fixtures).
        log::debug!("html source has no community feed");
        Ok(Vec::new())
    }
}

/// One on-disk capture: node names plus optional posts and feed records.
#[derive(Debug, Default, Deserialize)]
pub struct ProfileFixture {
    #[serde(default)]
    pub nodes: Vec<SnapshotNode>,
    #[serde(default)]
    pub posts: Vec<Post>,
    #[serde(default)]
    pub feed: Vec<FeedItem>,
}

/// Replays `<dir>/<username>.json` captures through the node parse path.
pub struct FixtureSource {
    dir: PathBuf,
}

impl FixtureSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn load(&self, username: &str) -> Result<ProfileFixture, AnalyticsError> {
        let path = self.dir.join(format!("{}.json", username));
        if !path.exists() {
            return Err(AnalyticsError::SubjectNotFound(username.to_string()));
        }
        let raw = std::fs::read_to_string(&path)
            .map_err(|e| AnalyticsError::Retrieval(format!("{}: {}", path.display(), e)))?;
        serde_json::from_str(&raw)
            .map_err(|e| AnalyticsError::Retrieval(format!("{}: {}", path.display(), e)))
    }
}

#[async_trait]
impl ProfileSource for FixtureSource {
    async fn fetch_snapshot(&self, username: &str) -> Result<ProfileSnapshot, AnalyticsError> {
        let fixture = self.load(username)?;
        Ok(parse_nodes(&fixture.nodes, username))
    }

    async fn fetch_posts(&self, username: &str) -> Result<Vec<Post>, AnalyticsError> {
        Ok(self.load(username)?.posts)
    }

    async fn fetch_feed(&self, username: &str) -> Result<Vec<FeedItem>, AnalyticsError> {
        Ok(self.load(username)?.feed)
    }
}
