//! Post ranking and the merged activity feed

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::{FeedItem, Post};

/// Rank posts by engagement score, descending, then cap the list.
///
/// The full set is always sorted before truncation; truncating first would
/// let a low-engagement post survive purely by input position.
pub fn top_posts(posts: &[Post], limit: usize) -> Vec<Post> {
    let mut ranked = posts.to_vec();
    ranked.sort_by(|a, b| b.engagement_score().cmp(&a.engagement_score()));
    ranked.truncate(limit);
    ranked
}

/// One entry in a profile's activity feed.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ActivityItem {
    Post {
        title: String,
        submolt: String,
        engagement_score: u64,
        posted_at: Option<DateTime<Utc>>,
        url: Option<String>,
    },
    Comment {
        content: String,
        posted_at: Option<DateTime<Utc>>,
    },
}

impl ActivityItem {
    fn posted_at(&self) -> Option<DateTime<Utc>> {
        match self {
            ActivityItem::Post { posted_at, .. } => *posted_at,
            ActivityItem::Comment { posted_at, .. } => *posted_at,
        }
    }
}

/// Merge a profile's posts with its own feed comments, newest first.
/// Undated items sink to the end.
pub fn activity_feed(posts: &[Post], feed: &[FeedItem], username: &str) -> Vec<ActivityItem> {
    let mut items: Vec<ActivityItem> = posts
        .iter()
        .map(|post| ActivityItem::Post {
            title: post.title.clone(),
            submolt: post.submolt.clone(),
            engagement_score: post.engagement_score(),
            posted_at: post.posted_at,
            url: post.url.clone(),
        })
        .collect();

    items.extend(
        feed.iter()
            .filter(|item| item.author == username)
            .map(|item| ActivityItem::Comment {
                content: item.content.clone(),
                posted_at: item.posted_at,
            }),
    );

    // Descending by timestamp; None sorts below every Some under reverse
    // comparison, which is exactly "undated last".
    items.sort_by(|a, b| b.posted_at().cmp(&a.posted_at()));
    items
}
