//! Per-submolt aggregation

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::model::{Post, SubmoltBucket};

/// Aggregated per-community view of a profile's posts.
///
/// Submolt "karma" is the sum of post upvotes in that community; the
/// platform reports no per-submolt karma figure of its own.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmoltBreakdown {
    pub buckets: BTreeMap<String, SubmoltBucket>,
    pub best_performing: Option<String>,
}

/// Group posts by submolt and pick the highest-karma community.
///
/// Ties on summed karma go to the submolt encountered first in post order,
/// so determinism follows the caller's post ordering.
pub fn breakdown(posts: &[Post]) -> SubmoltBreakdown {
    let mut buckets: BTreeMap<String, SubmoltBucket> = BTreeMap::new();
    let mut encounter_order: Vec<String> = Vec::new();

    for post in posts {
        let bucket = buckets.entry(post.submolt.clone()).or_insert_with(|| {
            encounter_order.push(post.submolt.clone());
            SubmoltBucket {
                submolt: post.submolt.clone(),
                karma: 0,
                post_count: 0,
                comment_count: 0,
                avg_karma_per_post: 0.0,
            }
        });
        bucket.karma += post.upvotes as i64;
        bucket.post_count += 1;
        bucket.comment_count += post.comment_count;
    }

    for bucket in buckets.values_mut() {
        bucket.avg_karma_per_post = bucket.karma as f64 / bucket.post_count as f64;
    }

    let mut best: Option<(&str, i64)> = None;
    for submolt in &encounter_order {
        let karma = buckets[submolt].karma;
        if best.map_or(true, |(_, top)| karma > top) {
            best = Some((submolt, karma));
        }
    }

    SubmoltBreakdown {
        best_performing: best.map(|(submolt, _)| submolt.to_string()),
        buckets,
    }
}
