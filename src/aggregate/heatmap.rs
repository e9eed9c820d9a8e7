//! Posting-time heatmap

use std::collections::BTreeMap;

use chrono::{Datelike, Timelike};
use serde::{Deserialize, Serialize};

use crate::model::Post;

pub const DAY_NAMES: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

/// Mean engagement score per (day-of-week, hour-of-day) bucket.
///
/// Days are indexed 0 = Monday .. 6 = Sunday. Buckets with no posts are
/// absent, never zero-filled.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TimingHeatmap {
    pub cells: BTreeMap<u8, BTreeMap<u8, f64>>,
}

/// The best-scoring bucket in canonical order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BestSlot {
    pub day: String,
    pub day_index: u8,
    pub hour: u8,
    pub score: f64,
}

/// Bucket posts by posting time and average their engagement scores.
///
/// Posts without a timestamp are skipped. The best slot is the argmax over
/// non-empty buckets; ties break toward the earliest day (Monday first),
/// then the earliest hour.
pub fn build_heatmap(posts: &[Post]) -> (TimingHeatmap, Option<BestSlot>) {
    let mut sums: BTreeMap<(u8, u8), (f64, u64)> = BTreeMap::new();

    for post in posts {
        let Some(posted_at) = post.posted_at else {
            continue;
        };
        let day = posted_at.weekday().num_days_from_monday() as u8;
        let hour = posted_at.hour() as u8;
        let slot = sums.entry((day, hour)).or_insert((0.0, 0));
        slot.0 += post.engagement_score() as f64;
        slot.1 += 1;
    }

    let mut heatmap = TimingHeatmap::default();
    let mut best: Option<BestSlot> = None;

    // BTreeMap iteration is already in canonical (day, hour) order, so a
    // strict comparison keeps the earliest slot on ties.
    for (&(day, hour), &(total, count)) in &sums {
        let mean = total / count as f64;
        heatmap.cells.entry(day).or_default().insert(hour, mean);

        if best.as_ref().map_or(true, |b| mean > b.score) {
            best = Some(BestSlot {
                day: DAY_NAMES[day as usize].to_string(),
                day_index: day,
                hour,
                score: mean,
            });
        }
    }

    (heatmap, best)
}
