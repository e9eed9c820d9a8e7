//! Snapshot and post extraction

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::fields::{count_before_keyword, find_ci, find_cs, Extracted, FieldTarget, FIELD_RULES};
use crate::model::{Post, PresenceStatus, ProfileSnapshot};

/// A named node from an accessibility-tree snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotNode {
    pub name: String,
}

/// Accumulates field assignments before the snapshot is built in one step.
/// Unmatched fields keep their defaults; absence is never an error.
#[derive(Default)]
struct SnapshotDraft {
    followers: u64,
    following: u64,
    karma: i64,
    post_count: u64,
    comment_count: u64,
    joined_date: Option<String>,
    status: Option<PresenceStatus>,
}

impl SnapshotDraft {
    /// Run the rule table over one display name, overwriting any field a
    /// rule matches. Callers control overwrite order by call order.
    fn apply(&mut self, name: &str) {
        for rule in FIELD_RULES {
            let Some(value) = rule.matcher.eval(name) else {
                continue;
            };
            match (rule.target, value) {
                (FieldTarget::Karma, Extracted::Count(n)) => self.karma = n as i64,
                (FieldTarget::Followers, Extracted::Count(n)) => self.followers = n,
                (FieldTarget::Following, Extracted::Count(n)) => self.following = n,
                (FieldTarget::Posts, Extracted::Count(n)) => self.post_count = n,
                (FieldTarget::Comments, Extracted::Count(n)) => self.comment_count = n,
                (FieldTarget::Joined, Extracted::Date(date)) => self.joined_date = Some(date),
                (FieldTarget::Status, Extracted::Presence(status)) => self.status = Some(status),
                _ => {}
            }
        }
    }

    fn into_snapshot(self, username: &str, captured_at: DateTime<Utc>) -> ProfileSnapshot {
        ProfileSnapshot {
            username: username.to_string(),
            followers: self.followers,
            following: self.following,
            karma: self.karma,
            post_count: self.post_count,
            comment_count: self.comment_count,
            joined_date: self.joined_date,
            status: self.status,
            captured_at,
        }
    }
}

/// Parse a structured snapshot into a `ProfileSnapshot`.
///
/// Later nodes overwrite earlier matches for the same field; when several
/// ambiguous nodes match, the last one is authoritative.
pub fn parse_nodes(nodes: &[SnapshotNode], username: &str) -> ProfileSnapshot {
    parse_nodes_at(nodes, username, Utc::now())
}

/// `parse_nodes` with an injected capture timestamp (deterministic tests).
pub fn parse_nodes_at(
    nodes: &[SnapshotNode],
    username: &str,
    captured_at: DateTime<Utc>,
) -> ProfileSnapshot {
    let mut draft = SnapshotDraft::default();
    for node in nodes {
        draft.apply(&node.name);
    }
    draft.into_snapshot(username, captured_at)
}

/// Parse raw profile markup with the same rule table as the node path.
///
/// A single text blob has no node ordering, so the leftmost valid match per
/// field wins. Presence status only renders as a standalone node and is
/// never extracted from markup.
pub fn parse_markup(markup: &str, username: &str) -> ProfileSnapshot {
    parse_markup_at(markup, username, Utc::now())
}

/// `parse_markup` with an injected capture timestamp.
pub fn parse_markup_at(
    markup: &str,
    username: &str,
    captured_at: DateTime<Utc>,
) -> ProfileSnapshot {
    let mut draft = SnapshotDraft::default();
    draft.apply(markup);
    draft.into_snapshot(username, captured_at)
}

/// Scan profile markup for `<article>` blocks and extract post records.
///
/// Tolerant by design: a block without a title is skipped, missing counts
/// default to zero, and a post with no recognizable submolt link lands in
/// "unknown".
pub fn parse_posts_markup(markup: &str) -> Vec<Post> {
    const OPEN: &str = "<article";
    const CLOSE: &str = "</article>";

    let mut posts = Vec::new();
    let mut from = 0;
    while let Some(start) = find_ci(markup, OPEN, from) {
        let Some(end) = find_ci(markup, CLOSE, start) else {
            break;
        };
        let block = &markup[start..end];
        from = end + CLOSE.len();

        let Some(title) = tag_inner_text(block, "h2") else {
            continue;
        };
        posts.push(Post {
            title,
            upvotes: count_before_keyword(block, "upvote", false).unwrap_or(0),
            comment_count: count_before_keyword(block, "comment", false).unwrap_or(0),
            submolt: submolt_slug(block).unwrap_or_else(|| "unknown".to_string()),
            posted_at: None,
            url: post_href(block),
        });
    }
    posts
}

/// Inner text of the first `<tag ...>...</tag>` block, tags stripped.
fn tag_inner_text(block: &str, tag: &str) -> Option<String> {
    let open = format!("<{}", tag);
    let close = format!("</{}>", tag);

    let at = find_ci(block, &open, 0)?;
    let body_start = at + block[at..].find('>')? + 1;
    let body_end = find_ci(block, &close, body_start)?;

    let text = strip_tags(&block[body_start..body_end]);
    let text = text.trim();
    if text.is_empty() {
        None
    } else {
        Some(text.to_string())
    }
}

fn strip_tags(fragment: &str) -> String {
    let mut out = String::with_capacity(fragment.len());
    let mut in_tag = false;
    for ch in fragment.chars() {
        match ch {
            '<' => in_tag = true,
            '>' if in_tag => in_tag = false,
            c if !in_tag => out.push(c),
            _ => {}
        }
    }
    out
}

/// First href in the block that points at a post page.
fn post_href(block: &str) -> Option<String> {
    let mut from = 0;
    while let Some(at) = find_ci(block, "href=", from) {
        from = at + 1;
        let rest = &block[at + "href=".len()..];
        let mut chars = rest.chars();
        let quote = match chars.next() {
            Some(q @ ('"' | '\'')) => q,
            _ => continue,
        };
        let value: String = chars.take_while(|&c| c != quote).collect();
        if value.contains("/post/") {
            return Some(value);
        }
    }
    None
}

/// Submolt slug from an `m/<name>` reference, e.g. href="/m/security".
fn submolt_slug(block: &str) -> Option<String> {
    let bytes = block.as_bytes();
    let mut from = 0;
    while let Some(at) = find_cs(block, "m/", from) {
        from = at + 1;
        // Must sit at a boundary so "form/..." never matches.
        if at > 0 && (bytes[at - 1].is_ascii_alphanumeric() || bytes[at - 1] == b'_') {
            continue;
        }
        let slug_start = at + 2;
        let mut i = slug_start;
        while i < bytes.len()
            && (bytes[i].is_ascii_alphanumeric() || bytes[i] == b'_' || bytes[i] == b'-')
        {
            i += 1;
        }
        if i > slug_start {
            return Some(block[slug_start..i].to_string());
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(name: &str) -> SnapshotNode {
        SnapshotNode {
            name: name.to_string(),
        }
    }

    #[test]
    fn test_parse_full_profile() {
        let nodes = vec![
            node("VesperThread"),
            node("35 karma"),
            node("7 followers"),
            node("1 following"),
            node("Posts (10)"),
            node("Comments (20)"),
            node("Joined 1/30/2026"),
            node("Online"),
        ];

        let snapshot = parse_nodes(&nodes, "VesperThread");
        assert_eq!(snapshot.username, "VesperThread");
        assert_eq!(snapshot.karma, 35);
        assert_eq!(snapshot.followers, 7);
        assert_eq!(snapshot.following, 1);
        assert_eq!(snapshot.post_count, 10);
        assert_eq!(snapshot.comment_count, 20);
        assert_eq!(snapshot.joined_date.as_deref(), Some("1/30/2026"));
        assert_eq!(snapshot.status, Some(PresenceStatus::Online));
    }

    #[test]
    fn test_unmatched_fields_keep_defaults() {
        let snapshot = parse_nodes(&[node("hello world")], "ghost");
        assert_eq!(snapshot.followers, 0);
        assert_eq!(snapshot.following, 0);
        assert_eq!(snapshot.karma, 0);
        assert_eq!(snapshot.post_count, 0);
        assert_eq!(snapshot.comment_count, 0);
        assert!(snapshot.joined_date.is_none());
        assert!(snapshot.status.is_none());
    }

    #[test]
    fn test_last_matching_node_wins() {
        let nodes = vec![node("10 karma"), node("sidebar: 35 karma")];
        let snapshot = parse_nodes(&nodes, "u");
        assert_eq!(snapshot.karma, 35);
    }

    #[test]
    fn test_suffix_counts() {
        let snapshot = parse_nodes(&[node("2.5K followers"), node("1M following")], "u");
        assert_eq!(snapshot.followers, 2500);
        assert_eq!(snapshot.following, 1_000_000);
    }

    #[test]
    fn test_followers_node_never_sets_following() {
        // "followers" contains "follower", so only the followers rule fires.
        let snapshot = parse_nodes(&[node("120 followers")], "u");
        assert_eq!(snapshot.followers, 120);
        assert_eq!(snapshot.following, 0);
    }

    #[test]
    fn test_status_requires_exact_token() {
        let snapshot = parse_nodes(&[node("Online now")], "u");
        assert!(snapshot.status.is_none());

        let snapshot = parse_nodes(&[node("Away")], "u");
        assert_eq!(snapshot.status, Some(PresenceStatus::Away));
    }

    #[test]
    fn test_markup_agrees_with_node_path() {
        let markup = "<div class=\"profile\">\
            <div>7 followers</div><div>1 following</div>\
            <div>35 karma</div><div>Posts (10)</div><div>Comments (20)</div>\
            <div>Joined 1/30/2026</div></div>";
        let from_markup = parse_markup(markup, "VesperThread");

        let nodes = vec![
            node("7 followers"),
            node("1 following"),
            node("35 karma"),
            node("Posts (10)"),
            node("Comments (20)"),
            node("Joined 1/30/2026"),
        ];
        let from_nodes = parse_nodes(&nodes, "VesperThread");

        assert_eq!(from_markup.followers, from_nodes.followers);
        assert_eq!(from_markup.following, from_nodes.following);
        assert_eq!(from_markup.karma, from_nodes.karma);
        assert_eq!(from_markup.post_count, from_nodes.post_count);
        assert_eq!(from_markup.comment_count, from_nodes.comment_count);
        assert_eq!(from_markup.joined_date, from_nodes.joined_date);
    }

    #[test]
    fn test_parse_posts_markup() {
        let markup = "\
            <article><h2>First <em>scan</em></h2>\
            <a href=\"/m/security\">m/security</a>\
            <span>10 upvotes</span><span>6 comments</span>\
            <a href=\"/post/def456\">link</a></article>\
            <article><h2>Second</h2><span>2 upvotes</span>\
            <span>1 comment</span></article>";

        let posts = parse_posts_markup(markup);
        assert_eq!(posts.len(), 2);

        assert_eq!(posts[0].title, "First scan");
        assert_eq!(posts[0].upvotes, 10);
        assert_eq!(posts[0].comment_count, 6);
        assert_eq!(posts[0].submolt, "security");
        assert_eq!(posts[0].url.as_deref(), Some("/post/def456"));
        assert_eq!(posts[0].engagement_score(), 22);

        assert_eq!(posts[1].title, "Second");
        assert_eq!(posts[1].submolt, "unknown");
        assert_eq!(posts[1].engagement_score(), 4);
    }

    #[test]
    fn test_untitled_article_skipped() {
        let markup = "<article><span>3 upvotes</span></article>";
        assert!(parse_posts_markup(markup).is_empty());
    }
}
