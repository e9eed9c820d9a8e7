//! Short-TTL snapshot cache with per-key coalescing
//!
//! The original service kept a process-wide dict with a race between the
//! staleness check and the overwrite. Here the cache is an injected service
//! and each key owns a mutex, so the check-fetch-store sequence is atomic:
//! two concurrent misses on one key resolve to a single upstream fetch, the
//! latecomer reads the stored result.
//!
//! Stale entries are never swept, only overwritten on the next access; the
//! keyspace is bounded by active query traffic.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use tokio::sync::Mutex;

use crate::error::AnalyticsError;
use crate::model::ProfileSnapshot;

/// A stored snapshot and the moment it was stored.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub value: ProfileSnapshot,
    pub captured_at: DateTime<Utc>,
}

type Slot = Arc<Mutex<Option<CacheEntry>>>;

/// Key -> snapshot store with freshness decided per call.
#[derive(Default)]
pub struct SnapshotCache {
    slots: Mutex<HashMap<String, Slot>>,
}

impl SnapshotCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached snapshot when fresh, otherwise run `fetch` and
    /// store its result.
    ///
    /// The boolean is true only for a fresh hit that skipped `fetch`.
    /// A failed fetch leaves any previous (stale) entry in place.
    pub async fn get_or_fetch<F, Fut>(
        &self,
        key: &str,
        ttl: Duration,
        fetch: F,
    ) -> Result<(ProfileSnapshot, bool), AnalyticsError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<ProfileSnapshot, AnalyticsError>>,
    {
        let slot = {
            let mut slots = self.slots.lock().await;
            slots
                .entry(key.to_string())
                .or_insert_with(|| Arc::new(Mutex::new(None)))
                .clone()
        };

        // Holding the slot lock across the fetch is what coalesces
        // concurrent misses for this key.
        let mut entry = slot.lock().await;
        if let Some(cached) = entry.as_ref() {
            if Utc::now() - cached.captured_at <= ttl {
                log::debug!("cache hit for '{}'", key);
                return Ok((cached.value.clone(), true));
            }
            log::debug!("cache entry for '{}' is stale, refetching", key);
        }

        let fresh = fetch().await?;
        *entry = Some(CacheEntry {
            value: fresh.clone(),
            captured_at: Utc::now(),
        });
        Ok((fresh, false))
    }
}
