//! End-to-end tests through the public service API backed by fixtures
//!
//! Fixtures replay accessibility-tree node names through the structured
//! parse path, so these tests cover extraction, derived metrics, growth,
//! aggregation and comparison in one pass.

use std::fs;
use std::sync::Arc;

use chrono::{Duration, Utc};
use moltlytics::error::AnalyticsError;
use moltlytics::model::ProfileSnapshot;
use moltlytics::retrieval::{FixtureSource, InMemoryHistoryStore};
use moltlytics::service::AnalyticsService;
use tempfile::TempDir;

const ALICE_FIXTURE: &str = r#"{
    "nodes": [
        {"name": "alice"},
        {"name": "2.5K followers"},
        {"name": "12 following"},
        {"name": "35 karma"},
        {"name": "Posts (10)"},
        {"name": "Comments (20)"},
        {"name": "Joined 1/30/2026"},
        {"name": "Online"}
    ],
    "posts": [
        {
            "title": "The Hidden Risk in Your Skill Stack",
            "upvotes": 2,
            "comment_count": 1,
            "submolt": "security",
            "posted_at": "2026-02-02T06:48:00Z",
            "url": "https://moltbook.com/post/abc123"
        },
        {
            "title": "I Scanned the Biggest Security Incident",
            "upvotes": 10,
            "comment_count": 6,
            "submolt": "security",
            "posted_at": "2026-02-02T06:15:00Z",
            "url": "https://moltbook.com/post/def456"
        },
        {
            "title": "Weekly meta thread",
            "upvotes": 3,
            "comment_count": 0,
            "submolt": "meta",
            "posted_at": "2026-02-04T22:59:10Z"
        }
    ],
    "feed": [
        {"author": "bob", "content": "thanks @alice for this"},
        {"author": "carol", "content": "@alice2 wrote something else"},
        {"author": "bob", "content": "again @alice!"},
        {"author": "alice", "content": "glad it helped", "posted_at": "2026-02-05T08:00:00Z"}
    ]
}"#;

const BOB_FIXTURE: &str = r#"{
    "nodes": [
        {"name": "5 followers"},
        {"name": "10 following"},
        {"name": "15 karma"},
        {"name": "Posts (3)"},
        {"name": "Comments (8)"}
    ]
}"#;

fn write_fixtures(dir: &TempDir) {
    fs::write(dir.path().join("alice.json"), ALICE_FIXTURE).unwrap();
    fs::write(dir.path().join("bob.json"), BOB_FIXTURE).unwrap();
}

fn service_for(dir: &TempDir) -> (AnalyticsService, Arc<InMemoryHistoryStore>) {
    let history = Arc::new(InMemoryHistoryStore::new());
    let service = AnalyticsService::new(
        Arc::new(FixtureSource::new(dir.path())),
        Arc::clone(&history) as Arc<dyn moltlytics::retrieval::HistoryStore>,
        Duration::seconds(300),
    );
    (service, history)
}

#[tokio::test]
async fn test_profile_stats_from_fixture_nodes() {
    let dir = TempDir::new().unwrap();
    write_fixtures(&dir);
    let (service, _) = service_for(&dir);

    let stats = service.profile_stats("alice").await.unwrap();
    assert_eq!(stats.followers, 2500);
    assert_eq!(stats.following, 12);
    assert_eq!(stats.karma, 35);
    assert_eq!(stats.posts, 10);
    assert_eq!(stats.comments, 20);
    assert_eq!(stats.joined_date.as_deref(), Some("1/30/2026"));
    assert!(!stats.cached);

    // Derived ratios ride along with the raw counts.
    assert_eq!(stats.karma_per_post, 3.5);
    assert_eq!(stats.comments_per_post, 2.0);
    assert_eq!(stats.engagement_rate, 5.5);

    let again = service.profile_stats("alice").await.unwrap();
    assert!(again.cached);
}

#[tokio::test]
async fn test_growth_prefers_week_old_baseline() {
    let dir = TempDir::new().unwrap();
    write_fixtures(&dir);
    let (service, history) = service_for(&dir);

    let baseline = ProfileSnapshot {
        username: "alice".to_string(),
        followers: 2400,
        following: 12,
        karma: 20,
        post_count: 7,
        comment_count: 15,
        joined_date: None,
        status: None,
        captured_at: Utc::now() - Duration::days(7),
    };
    let decoy = ProfileSnapshot {
        captured_at: Utc::now() - Duration::days(20),
        followers: 1,
        karma: 1,
        post_count: 1,
        ..baseline.clone()
    };
    history.record(decoy);
    history.record(baseline);

    let growth = service.growth_stats("alice").await.unwrap();
    assert_eq!(growth.follower_growth_7d, 100);
    assert_eq!(growth.karma_velocity_7d, 15);
    assert_eq!(growth.posts_per_week, 3);
    assert!(growth.note.is_none());
}

#[tokio::test]
async fn test_top_posts_sorted_then_capped() {
    let dir = TempDir::new().unwrap();
    write_fixtures(&dir);
    let (service, _) = service_for(&dir);

    let top = service.top_posts("alice", 2).await.unwrap();
    assert_eq!(top.len(), 2);
    // 10 + 6*2 = 22 beats 3 and 4.
    assert_eq!(top[0].engagement_score, 22);
    assert_eq!(top[1].engagement_score, 4);
    assert_eq!(top[0].submolt, "security");
}

#[tokio::test]
async fn test_submolt_breakdown_best_performing() {
    let dir = TempDir::new().unwrap();
    write_fixtures(&dir);
    let (service, _) = service_for(&dir);

    let breakdown = service.submolt_breakdown("alice").await.unwrap();
    assert_eq!(breakdown.best_performing.as_deref(), Some("security"));
    assert_eq!(breakdown.buckets["security"].karma, 12);
    assert_eq!(breakdown.buckets["security"].post_count, 2);
    assert_eq!(breakdown.buckets["security"].avg_karma_per_post, 6.0);
    assert_eq!(breakdown.buckets["meta"].karma, 3);
}

#[tokio::test]
async fn test_timing_heatmap_buckets_and_best_slot() {
    let dir = TempDir::new().unwrap();
    write_fixtures(&dir);
    let (service, _) = service_for(&dir);

    let timing = service.timing_heatmap("alice").await.unwrap();
    // Both security posts land on Monday 06:xx -> mean of 4 and 22.
    assert_eq!(timing.heatmap.cells[&0][&6], 13.0);

    let best = timing.best_slot.unwrap();
    assert_eq!(best.day, "Monday");
    assert_eq!(best.hour, 6);
    assert_eq!(best.score, 13.0);
}

#[tokio::test]
async fn test_mentions_are_token_exact() {
    let dir = TempDir::new().unwrap();
    write_fixtures(&dir);
    let (service, _) = service_for(&dir);

    let report = service.mentions("alice").await.unwrap();
    // carol's "@alice2" is not a mention of alice.
    assert_eq!(report.mentions.len(), 2);
    assert_eq!(report.top_mentioners.len(), 1);
    assert_eq!(report.top_mentioners[0].author, "bob");
    assert_eq!(report.top_mentioners[0].mentions, 2);
}

#[tokio::test]
async fn test_activity_feed_newest_first() {
    let dir = TempDir::new().unwrap();
    write_fixtures(&dir);
    let (service, _) = service_for(&dir);

    let feed = service.activity_feed("alice").await.unwrap();
    // 3 posts plus alice's own comment.
    assert_eq!(feed.len(), 4);

    let timestamps: Vec<_> = feed
        .iter()
        .map(|item| match item {
            moltlytics::aggregate::ActivityItem::Post { posted_at, .. } => *posted_at,
            moltlytics::aggregate::ActivityItem::Comment { posted_at, .. } => *posted_at,
        })
        .collect();
    for pair in timestamps.windows(2) {
        assert!(pair[0] >= pair[1], "feed must be newest first");
    }
}

#[tokio::test]
async fn test_compare_two_profiles() {
    let dir = TempDir::new().unwrap();
    write_fixtures(&dir);
    let (service, _) = service_for(&dir);

    let pair = vec!["alice".to_string(), "bob".to_string()];
    let result = service.compare(&pair).await.unwrap();

    assert_eq!(result.karma.first, 35);
    assert_eq!(result.karma.second, 15);
    assert_eq!(result.karma.delta, 20);
    assert_eq!(result.karma.winner, "alice");
    assert_eq!(result.following.winner, "alice");
}

#[tokio::test]
async fn test_missing_fixture_is_not_found() {
    let dir = TempDir::new().unwrap();
    write_fixtures(&dir);
    let (service, _) = service_for(&dir);

    let err = service.profile_stats("ghost").await.unwrap_err();
    assert_eq!(err, AnalyticsError::SubjectNotFound("ghost".to_string()));
}
