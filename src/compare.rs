//! Side-by-side comparison of two profiles

use serde::{Deserialize, Serialize};

use crate::model::ProfileSnapshot;

/// One compared stat: both values, the signed delta (first minus second)
/// and the winning username.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldComparison {
    pub first: i64,
    pub second: i64,
    pub delta: i64,
    pub winner: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComparisonResponse {
    pub first: String,
    pub second: String,
    pub followers: FieldComparison,
    pub following: FieldComparison,
    pub karma: FieldComparison,
    pub posts: FieldComparison,
    pub comments: FieldComparison,
}

/// Compare two snapshots field by field.
///
/// A field's winner is the strictly greater value; on a tie the second
/// profile takes it, per comparison order.
pub fn compare_snapshots(first: &ProfileSnapshot, second: &ProfileSnapshot) -> ComparisonResponse {
    let field = |a: i64, b: i64| -> FieldComparison {
        let winner = if a > b {
            first.username.clone()
        } else {
            second.username.clone()
        };
        FieldComparison {
            first: a,
            second: b,
            delta: a - b,
            winner,
        }
    };

    ComparisonResponse {
        first: first.username.clone(),
        second: second.username.clone(),
        followers: field(first.followers as i64, second.followers as i64),
        following: field(first.following as i64, second.following as i64),
        karma: field(first.karma, second.karma),
        posts: field(first.post_count as i64, second.post_count as i64),
        comments: field(first.comment_count as i64, second.comment_count as i64),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn snapshot(username: &str, karma: i64, followers: u64) -> ProfileSnapshot {
        ProfileSnapshot {
            username: username.to_string(),
            followers,
            following: 0,
            karma,
            post_count: 0,
            comment_count: 0,
            joined_date: None,
            status: None,
            captured_at: Utc::now(),
        }
    }

    #[test]
    fn test_strictly_greater_wins() {
        let result = compare_snapshots(&snapshot("a", 35, 10), &snapshot("b", 15, 20));
        assert_eq!(result.karma.delta, 20);
        assert_eq!(result.karma.winner, "a");
        assert_eq!(result.followers.delta, -10);
        assert_eq!(result.followers.winner, "b");
    }

    #[test]
    fn test_tie_goes_to_second() {
        let result = compare_snapshots(&snapshot("a", 15, 5), &snapshot("b", 15, 5));
        assert_eq!(result.karma.winner, "b");
        assert_eq!(result.followers.winner, "b");
    }
}
