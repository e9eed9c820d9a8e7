//! Fetch orchestrator
//!
//! Ties the cache, the retrieval collaborator, the extractor and the
//! calculators together into the served query shapes. Synchronous engine
//! code stays pure; this is the only module that awaits.

use std::sync::Arc;

use chrono::Duration;

use crate::aggregate::{self, ActivityItem, BestSlot, MentionReport, SubmoltBreakdown, TimingHeatmap};
use crate::cache::SnapshotCache;
use crate::compare::{compare_snapshots, ComparisonResponse};
use crate::error::AnalyticsError;
use crate::growth::compute_growth;
use crate::metrics;
use crate::model::{GrowthStats, PostStats, ProfileSnapshot, ProfileStatsResponse};
use crate::retrieval::{HistoryStore, ProfileSource};

use serde::{Deserialize, Serialize};

/// Heatmap response: buckets plus the best-performing slot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeatmapResponse {
    pub username: String,
    pub heatmap: TimingHeatmap,
    pub best_slot: Option<BestSlot>,
}

pub struct AnalyticsService {
    source: Arc<dyn ProfileSource>,
    history: Arc<dyn HistoryStore>,
    cache: SnapshotCache,
    cache_ttl: Duration,
}

impl AnalyticsService {
    pub fn new(
        source: Arc<dyn ProfileSource>,
        history: Arc<dyn HistoryStore>,
        cache_ttl: Duration,
    ) -> Self {
        Self {
            source,
            history,
            cache: SnapshotCache::new(),
            cache_ttl,
        }
    }

    /// Snapshot via the cache; at most one upstream fetch per key per TTL.
    async fn cached_snapshot(
        &self,
        username: &str,
    ) -> Result<(ProfileSnapshot, bool), AnalyticsError> {
        let key = format!("profile:{}", username);
        let source = Arc::clone(&self.source);
        self.cache
            .get_or_fetch(&key, self.cache_ttl, || async move {
                source.fetch_snapshot(username).await
            })
            .await
    }

    /// Current stats plus derived ratios and the cache flag.
    pub async fn profile_stats(
        &self,
        username: &str,
    ) -> Result<ProfileStatsResponse, AnalyticsError> {
        let (snapshot, cached) = self.cached_snapshot(username).await?;
        let derived = metrics::derive(&snapshot);
        Ok(ProfileStatsResponse::new(&snapshot, &derived, cached))
    }

    /// Growth against the best available historical baseline.
    pub async fn growth_stats(&self, username: &str) -> Result<GrowthStats, AnalyticsError> {
        let (current, _) = self.cached_snapshot(username).await?;
        let history = self.history.load_history(username);
        let growth = compute_growth(&current, &history);

        Ok(GrowthStats {
            username: growth.username,
            follower_growth_7d: growth.follower_delta,
            karma_velocity_7d: growth.karma_delta,
            posts_per_week: growth.post_delta,
            current_followers: current.followers,
            current_karma: current.karma,
            baseline_captured_at: growth.baseline_captured_at,
            scraped_at: current.captured_at,
            note: growth.note,
        })
    }

    /// Top posts by engagement, sorted before the limit is applied.
    pub async fn top_posts(
        &self,
        username: &str,
        limit: usize,
    ) -> Result<Vec<PostStats>, AnalyticsError> {
        let posts = self.source.fetch_posts(username).await?;
        let ranked = aggregate::top_posts(&posts, limit);
        Ok(ranked.iter().map(PostStats::from).collect())
    }

    pub async fn submolt_breakdown(
        &self,
        username: &str,
    ) -> Result<SubmoltBreakdown, AnalyticsError> {
        let posts = self.source.fetch_posts(username).await?;
        Ok(aggregate::breakdown(&posts))
    }

    pub async fn timing_heatmap(&self, username: &str) -> Result<HeatmapResponse, AnalyticsError> {
        let posts = self.source.fetch_posts(username).await?;
        let (heatmap, best_slot) = aggregate::build_heatmap(&posts);
        Ok(HeatmapResponse {
            username: username.to_string(),
            heatmap,
            best_slot,
        })
    }

    pub async fn mentions(&self, username: &str) -> Result<MentionReport, AnalyticsError> {
        let feed = self.source.fetch_feed(username).await?;
        Ok(aggregate::find_mentions(&feed, username))
    }

    /// The profile's posts and own comments merged, newest first.
    pub async fn activity_feed(
        &self,
        username: &str,
    ) -> Result<Vec<ActivityItem>, AnalyticsError> {
        let posts = self.source.fetch_posts(username).await?;
        let feed = self.source.fetch_feed(username).await?;
        Ok(aggregate::activity_feed(&posts, &feed, username))
    }

    /// Side-by-side comparison; requires exactly two usernames.
    pub async fn compare(
        &self,
        usernames: &[String],
    ) -> Result<ComparisonResponse, AnalyticsError> {
        if usernames.len() != 2 {
            return Err(AnalyticsError::MalformedInput(format!(
                "comparison requires exactly 2 usernames, got {}",
                usernames.len()
            )));
        }

        let (first, _) = self.cached_snapshot(&usernames[0]).await?;
        let (second, _) = self.cached_snapshot(&usernames[1]).await?;
        Ok(compare_snapshots(&first, &second))
    }
}
