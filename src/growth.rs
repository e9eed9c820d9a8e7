//! Growth deltas against a historical baseline
//!
//! Scheduled re-scrapes never land on an exact 7-day boundary, so baseline
//! selection accepts anything 6 to 8 whole days old. When nothing falls in
//! that band the oldest capture is used instead; an imprecise trend beats
//! refusing to answer.

use crate::model::{GrowthResult, ProfileSnapshot};

/// Inclusive age band (whole days) for the preferred baseline.
pub const BASELINE_MIN_DAYS: i64 = 6;
pub const BASELINE_MAX_DAYS: i64 = 8;

const NO_HISTORY_NOTE: &str =
    "No historical data yet - query again in 7 days to track growth";

/// Compute signed deltas between `current` and the best available baseline.
///
/// Empty history is not an error: all deltas come back zero with a note
/// explaining the missing baseline.
pub fn compute_growth(current: &ProfileSnapshot, history: &[ProfileSnapshot]) -> GrowthResult {
    if history.is_empty() {
        return GrowthResult {
            username: current.username.clone(),
            follower_delta: 0,
            karma_delta: 0,
            post_delta: 0,
            baseline_captured_at: None,
            note: Some(NO_HISTORY_NOTE.to_string()),
        };
    }

    let baseline = select_baseline(current, history);
    GrowthResult {
        username: current.username.clone(),
        follower_delta: current.followers as i64 - baseline.followers as i64,
        karma_delta: current.karma - baseline.karma,
        post_delta: current.post_count as i64 - baseline.post_count as i64,
        baseline_captured_at: Some(baseline.captured_at),
        note: None,
    }
}

/// Newest-first scan for a capture aged [6, 8] whole days relative to
/// `current`; falls back to the oldest capture when none qualifies.
fn select_baseline<'a>(
    current: &ProfileSnapshot,
    history: &'a [ProfileSnapshot],
) -> &'a ProfileSnapshot {
    let mut ordered: Vec<&ProfileSnapshot> = history.iter().collect();
    ordered.sort_by(|a, b| b.captured_at.cmp(&a.captured_at));

    for snapshot in &ordered {
        let age_days = (current.captured_at - snapshot.captured_at).num_days();
        if (BASELINE_MIN_DAYS..=BASELINE_MAX_DAYS).contains(&age_days) {
            return snapshot;
        }
    }

    // No capture in the band: the oldest one still yields a usable trend.
    ordered.last().expect("history checked non-empty")
}
