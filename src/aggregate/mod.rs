//! Post and feed aggregation
//!
//! Independent algorithms sharing only the `Post`/`FeedItem` input shapes:
//!
//! - `submolt` - per-community totals and the best-performing community
//! - `heatmap` - (day-of-week, hour) mean engagement buckets
//! - `mentions` - exact-token @handle detection and mentioner ranking
//! - `posts` - engagement-ranked post lists and the merged activity feed
//!
//! All functions are pure and total over their documented inputs; posts
//! without timestamps simply drop out of time-bucketed views.

pub mod heatmap;
pub mod mentions;
pub mod posts;
pub mod submolt;

pub use heatmap::{build_heatmap, BestSlot, TimingHeatmap};
pub use mentions::{find_mentions, MentionReport, MentionerRank};
pub use posts::{activity_feed, top_posts, ActivityItem};
pub use submolt::{breakdown, SubmoltBreakdown};
