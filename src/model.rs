//! Core records and served response shapes

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Presence indicator shown on a profile page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PresenceStatus {
    Online,
    Offline,
    Away,
}

impl PresenceStatus {
    /// Exact-token match, as rendered by the profile page.
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "Online" => Some(PresenceStatus::Online),
            "Offline" => Some(PresenceStatus::Offline),
            "Away" => Some(PresenceStatus::Away),
            _ => None,
        }
    }
}

/// Point-in-time capture of a profile's public statistics.
///
/// Constructed in one step by the extractor; never mutated afterwards.
/// Counts are non-negative by type, karma can go below zero.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileSnapshot {
    pub username: String,
    pub followers: u64,
    pub following: u64,
    pub karma: i64,
    pub post_count: u64,
    pub comment_count: u64,
    pub joined_date: Option<String>,
    pub status: Option<PresenceStatus>,
    pub captured_at: DateTime<Utc>,
}

/// Ratios derived from a single snapshot. All zero when the profile
/// has no posts yet.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DerivedMetrics {
    pub karma_per_post: f64,
    pub comments_per_post: f64,
    pub engagement_rate: f64,
}

/// A single post scraped from a profile page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    pub title: String,
    pub upvotes: u64,
    pub comment_count: u64,
    pub submolt: String,
    #[serde(default)]
    pub posted_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub url: Option<String>,
}

impl Post {
    /// Fixed ranking weight: a comment counts double an upvote.
    pub fn engagement_score(&self) -> u64 {
        self.upvotes + self.comment_count * 2
    }
}

/// A community feed record used for mention scanning and the activity feed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedItem {
    pub author: String,
    pub content: String,
    #[serde(default)]
    pub posted_at: Option<DateTime<Utc>>,
}

/// Deltas between a current snapshot and its selected baseline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GrowthResult {
    pub username: String,
    pub follower_delta: i64,
    pub karma_delta: i64,
    pub post_delta: i64,
    pub baseline_captured_at: Option<DateTime<Utc>>,
    pub note: Option<String>,
}

/// Per-submolt totals across a profile's posts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmoltBucket {
    pub submolt: String,
    pub karma: i64,
    pub post_count: u64,
    pub comment_count: u64,
    pub avg_karma_per_post: f64,
}

// ---------------------------------------------------------------------------
// Served response shapes (consumed by the external HTTP layer)
// ---------------------------------------------------------------------------

/// Profile statistics response: raw counts plus derived ratios.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileStatsResponse {
    pub username: String,
    pub followers: u64,
    pub following: u64,
    pub karma: i64,
    pub posts: u64,
    pub comments: u64,
    pub joined_date: Option<String>,
    pub status: Option<PresenceStatus>,
    pub karma_per_post: f64,
    pub comments_per_post: f64,
    pub engagement_rate: f64,
    pub scraped_at: DateTime<Utc>,
    pub cached: bool,
}

impl ProfileStatsResponse {
    pub fn new(snapshot: &ProfileSnapshot, derived: &DerivedMetrics, cached: bool) -> Self {
        Self {
            username: snapshot.username.clone(),
            followers: snapshot.followers,
            following: snapshot.following,
            karma: snapshot.karma,
            posts: snapshot.post_count,
            comments: snapshot.comment_count,
            joined_date: snapshot.joined_date.clone(),
            status: snapshot.status,
            karma_per_post: derived.karma_per_post,
            comments_per_post: derived.comments_per_post,
            engagement_rate: derived.engagement_rate,
            scraped_at: snapshot.captured_at,
            cached,
        }
    }
}

/// Growth metrics response.
///
/// `posts_per_week` keeps the historical field name even though it is a raw
/// post-count delta against the selected baseline, which may be older than
/// seven days. Downstream consumers rely on the name as-is.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GrowthStats {
    pub username: String,
    pub follower_growth_7d: i64,
    pub karma_velocity_7d: i64,
    pub posts_per_week: i64,
    pub current_followers: u64,
    pub current_karma: i64,
    pub baseline_captured_at: Option<DateTime<Utc>>,
    pub scraped_at: DateTime<Utc>,
    pub note: Option<String>,
}

/// A ranked post as served to clients.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostStats {
    pub title: String,
    pub upvotes: u64,
    pub comments: u64,
    pub engagement_score: u64,
    pub submolt: String,
    pub posted_at: Option<DateTime<Utc>>,
    pub url: Option<String>,
}

impl From<&Post> for PostStats {
    fn from(post: &Post) -> Self {
        Self {
            title: post.title.clone(),
            upvotes: post.upvotes,
            comments: post.comment_count,
            engagement_score: post.engagement_score(),
            submolt: post.submolt.clone(),
            posted_at: post.posted_at,
            url: post.url.clone(),
        }
    }
}
