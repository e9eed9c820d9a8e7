//! Derived metric calculation over a single snapshot

use crate::model::{DerivedMetrics, ProfileSnapshot};

/// Compute derived ratios for a snapshot.
///
/// All three ratios return 0.0 for a zero-post profile; brand-new subjects
/// must never fault downstream consumers with a division error.
pub fn derive(snapshot: &ProfileSnapshot) -> DerivedMetrics {
    if snapshot.post_count == 0 {
        return DerivedMetrics {
            karma_per_post: 0.0,
            comments_per_post: 0.0,
            engagement_rate: 0.0,
        };
    }

    let posts = snapshot.post_count as f64;
    DerivedMetrics {
        karma_per_post: snapshot.karma as f64 / posts,
        comments_per_post: snapshot.comment_count as f64 / posts,
        engagement_rate: (snapshot.karma as f64 + snapshot.comment_count as f64) / posts,
    }
}
