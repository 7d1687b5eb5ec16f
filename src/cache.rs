//! # Aggregate Cache
//! Single-slot holder for the last successful acquisition pass.
//!
//! Freshness is measured on the tokio clock so tests can move time with
//! `tokio::time::advance`. The cache is not synchronized; its owner
//! (`SubsidyService`) serializes access.

use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::time::Instant;

use crate::scrape::types::SubsidyRecord;

#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub records: Vec<SubsidyRecord>,
    /// Monotonic creation time; drives freshness.
    pub created_at: Instant,
    /// Wall-clock creation time, for reporting.
    pub fetched_at: DateTime<Utc>,
}

#[derive(Debug)]
pub struct AggregateCache {
    slot: Option<CacheEntry>,
    ttl: Duration,
}

impl AggregateCache {
    pub fn new(ttl: Duration) -> Self {
        Self { slot: None, ttl }
    }

    /// The entry, if one exists and is younger than the TTL.
    pub fn get(&self) -> Option<&CacheEntry> {
        self.slot
            .as_ref()
            .filter(|e| e.created_at.elapsed() < self.ttl)
    }

    /// Replace the slot wholesale; previous records are discarded, never merged.
    pub fn put(&mut self, records: Vec<SubsidyRecord>) {
        self.slot = Some(CacheEntry {
            records,
            created_at: Instant::now(),
            fetched_at: Utc::now(),
        });
    }

    pub fn clear(&mut self) {
        self.slot = None;
    }

    /// The stored entry regardless of age. Served when a refresh fails.
    pub fn latest(&self) -> Option<&CacheEntry> {
        self.slot.as_ref()
    }

    /// Age of the stored entry, fresh or not.
    pub fn age(&self) -> Option<Duration> {
        self.slot.as_ref().map(|e| e.created_at.elapsed())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fallback::fallback_subsidies;

    #[tokio::test(start_paused = true)]
    async fn entry_is_fresh_until_ttl() {
        let mut cache = AggregateCache::new(Duration::from_secs(3600));
        assert!(cache.get().is_none());

        cache.put(fallback_subsidies()[..2].to_vec());
        assert_eq!(cache.get().map(|e| e.records.len()), Some(2));

        tokio::time::advance(Duration::from_secs(3599)).await;
        assert!(cache.get().is_some());

        tokio::time::advance(Duration::from_secs(1)).await;
        assert!(cache.get().is_none(), "entry at exactly the TTL is stale");
        assert!(cache.age() >= Some(Duration::from_secs(3600)));
    }

    #[tokio::test(start_paused = true)]
    async fn latest_outlives_freshness() {
        let mut cache = AggregateCache::new(Duration::from_secs(60));
        assert!(cache.latest().is_none());

        cache.put(fallback_subsidies()[..1].to_vec());
        tokio::time::advance(Duration::from_secs(61)).await;
        assert!(cache.get().is_none());
        let stale = cache.latest().expect("stale entry kept");
        assert_eq!(stale.records[0].id, "wbso-2024");
        assert!(stale.fetched_at <= chrono::Utc::now());

        cache.clear();
        assert!(cache.latest().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn put_replaces_instead_of_merging() {
        let all = fallback_subsidies();
        let mut cache = AggregateCache::new(Duration::from_secs(60));
        cache.put(all.to_vec());
        cache.put(all[3..4].to_vec());
        let entry = cache.get().unwrap();
        assert_eq!(entry.records.len(), 1);
        assert_eq!(entry.records[0].id, all[3].id);

        cache.clear();
        assert!(cache.get().is_none());
        assert!(cache.age().is_none());
    }
}
