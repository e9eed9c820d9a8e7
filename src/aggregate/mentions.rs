//! Mention detection over a community feed

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::model::FeedItem;

/// Mentions of a profile plus a ranking of who mentions it most.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MentionReport {
    pub mentions: Vec<FeedItem>,
    pub top_mentioners: Vec<MentionerRank>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MentionerRank {
    pub author: String,
    pub mentions: u64,
}

/// Collect feed records containing the exact token `@<username>`.
///
/// Matching is case-sensitive and token-exact: `@alice` never matches
/// inside `@alice2`. Mentioners are ranked by count descending, ties in
/// first-seen order.
pub fn find_mentions(feed: &[FeedItem], username: &str) -> MentionReport {
    let mut mentions = Vec::new();
    let mut counts: HashMap<String, u64> = HashMap::new();
    let mut first_seen: Vec<String> = Vec::new();

    for item in feed {
        if !contains_handle_token(&item.content, username) {
            continue;
        }
        if !counts.contains_key(&item.author) {
            first_seen.push(item.author.clone());
        }
        *counts.entry(item.author.clone()).or_insert(0) += 1;
        mentions.push(item.clone());
    }

    // Stable sort keeps first-seen order among equal counts.
    let mut top_mentioners: Vec<MentionerRank> = first_seen
        .into_iter()
        .map(|author| {
            let mentions = counts[&author];
            MentionerRank { author, mentions }
        })
        .collect();
    top_mentioners.sort_by(|a, b| b.mentions.cmp(&a.mentions));

    MentionReport {
        mentions,
        top_mentioners,
    }
}

/// True when `content` contains `@username` not followed by another
/// handle character (letter, digit or underscore).
fn contains_handle_token(content: &str, username: &str) -> bool {
    let needle = format!("@{}", username);
    let bytes = content.as_bytes();

    let mut from = 0;
    while let Some(at) = content.get(from..).and_then(|tail| tail.find(&needle)) {
        let at = from + at;
        let end = at + needle.len();
        let boundary = match bytes.get(end) {
            None => true,
            Some(&b) => !(b.is_ascii_alphanumeric() || b == b'_'),
        };
        if boundary {
            return true;
        }
        from = at + 1;
    }
    false
}
