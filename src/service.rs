//! # Query Façade
//! Entry point for callers: list, look up and search subsidy records.
//!
//! Every query goes fresh cache → live acquisition → stale cache → bundled
//! fallback. The
//! freshness check, the acquisition pass and the cache write-back run under a
//! single async mutex, so concurrent callers never start duplicate passes; the
//! second caller waits and then reads the fresh entry.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use metrics::counter;
use serde::Serialize;
use tokio::sync::Mutex;

use crate::cache::AggregateCache;
use crate::config::FetcherConfig;
use crate::fallback::fallback_subsidies;
use crate::scrape::acquire::Acquirer;
use crate::scrape::extract::Extractor;
use crate::scrape::fetch::HttpFetcher;
use crate::scrape::sources::load_sources_default;
use crate::scrape::types::{PageFetcher, SourceDescriptor, SubsidyRecord};

/// Where a listing came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Origin {
    Cache,
    Live,
    /// Expired cache entry, served because the refresh failed.
    Stale,
    Fallback,
}

#[derive(Debug, Clone, Serialize)]
pub struct Listing {
    pub origin: Origin,
    /// When the records were acquired; `None` for the fallback set.
    pub fetched_at: Option<DateTime<Utc>>,
    pub records: Vec<SubsidyRecord>,
}

pub struct SubsidyService {
    acquirer: Acquirer,
    sources: Vec<SourceDescriptor>,
    cache: Mutex<AggregateCache>,
}

impl SubsidyService {
    pub fn new(
        fetcher: Arc<dyn PageFetcher>,
        sources: Vec<SourceDescriptor>,
        cfg: &FetcherConfig,
    ) -> Self {
        let extractor = Extractor::new(cfg.profile.clone(), cfg.year_tag.clone());
        Self {
            acquirer: Acquirer::new(fetcher, extractor, cfg.request_delay),
            sources,
            cache: Mutex::new(AggregateCache::new(cfg.cache_ttl)),
        }
    }

    /// Production wiring: HTTP fetcher plus sources from `load_sources_default`.
    pub fn from_config(cfg: &FetcherConfig) -> anyhow::Result<Self> {
        let fetcher = HttpFetcher::from_config(cfg)?;
        let sources = load_sources_default()?;
        tracing::info!(
            sources = sources.len(),
            ttl_secs = cfg.cache_ttl.as_secs(),
            "subsidy service ready"
        );
        Ok(Self::new(Arc::new(fetcher), sources, cfg))
    }

    /// Current records plus where they came from. Never fails.
    pub async fn listing(&self) -> Listing {
        let mut cache = self.cache.lock().await;

        if let Some(entry) = cache.get() {
            counter!("subsidy_cache_hits_total").increment(1);
            return Listing {
                origin: Origin::Cache,
                fetched_at: Some(entry.fetched_at),
                records: entry.records.clone(),
            };
        }

        match self.acquirer.acquire(&self.sources).await {
            Ok(records) => {
                cache.put(records.clone());
                Listing {
                    origin: Origin::Live,
                    fetched_at: cache.latest().map(|e| e.fetched_at),
                    records,
                }
            }
            // The expired entry stays in the slot, so the next call retries.
            Err(e) => match cache.latest() {
                Some(entry) => {
                    tracing::warn!(error = %e, fetched_at = %entry.fetched_at, "live acquisition failed, serving stale cache");
                    Listing {
                        origin: Origin::Stale,
                        fetched_at: Some(entry.fetched_at),
                        records: entry.records.clone(),
                    }
                }
                None => {
                    tracing::warn!(error = %e, "live acquisition failed, serving fallback set");
                    counter!("subsidy_fallback_total").increment(1);
                    Listing {
                        origin: Origin::Fallback,
                        fetched_at: None,
                        records: fallback_subsidies().to_vec(),
                    }
                }
            },
        }
    }

    pub async fn list_all(&self) -> Vec<SubsidyRecord> {
        self.listing().await.records
    }

    /// Case-insensitive exact match on `name`.
    pub async fn find_by_name(&self, name: &str) -> Option<SubsidyRecord> {
        let wanted = name.to_lowercase();
        self.list_all()
            .await
            .into_iter()
            .find(|r| r.name.to_lowercase() == wanted)
    }

    pub async fn find_by_id(&self, id: &str) -> Option<SubsidyRecord> {
        self.list_all().await.into_iter().find(|r| r.id == id)
    }

    /// Case-insensitive substring search over name, title, description and
    /// category. Keeps listing order; no ranking.
    pub async fn search(&self, query: &str) -> Vec<SubsidyRecord> {
        let needle = query.to_lowercase();
        self.list_all()
            .await
            .into_iter()
            .filter(|r| r.matches_lowered(&needle))
            .collect()
    }

    /// Drop the cached pass; the next query re-acquires.
    pub async fn invalidate(&self) {
        self.cache.lock().await.clear();
    }

    /// Age of the cached pass, fresh or stale.
    pub async fn cache_age(&self) -> Option<Duration> {
        self.cache.lock().await.age()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scrape::fetch::FetchFailure;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct EchoFetcher {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl PageFetcher for EchoFetcher {
        async fn fetch(&self, url: &str) -> Result<String, FetchFailure> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(format!("<h1>Page {url}</h1><p class=\"intro\">Regeling voor ondernemers</p>"))
        }
    }

    fn service(f: Arc<EchoFetcher>) -> SubsidyService {
        let sources = vec![
            SourceDescriptor::new("WBSO", "Fiscaal", "https://example.test/wbso"),
            SourceDescriptor::new("MIA/Vamil", "Milieu", "https://example.test/mia"),
        ];
        SubsidyService::new(f, sources, &FetcherConfig::default())
    }

    #[tokio::test(start_paused = true)]
    async fn origin_moves_from_live_to_cache() {
        let f = Arc::new(EchoFetcher {
            calls: AtomicUsize::new(0),
        });
        let svc = service(f.clone());
        assert_eq!(svc.listing().await.origin, Origin::Live);
        assert_eq!(svc.listing().await.origin, Origin::Cache);
        assert_eq!(f.calls.load(Ordering::SeqCst), 2);

        svc.invalidate().await;
        assert!(svc.cache_age().await.is_none());
        let live = svc.listing().await;
        assert_eq!(live.origin, Origin::Live);
        assert!(live.fetched_at.is_some());
        assert_eq!(f.calls.load(Ordering::SeqCst), 4);
    }

    #[test]
    fn listing_serializes_origin_lowercase() {
        let listing = Listing {
            origin: Origin::Stale,
            fetched_at: None,
            records: Vec::new(),
        };
        let v = serde_json::to_value(&listing).unwrap();
        assert_eq!(v["origin"], "stale");
        assert!(v["fetched_at"].is_null());
        assert_eq!(v["records"].as_array().map(Vec::len), Some(0));
    }

    #[tokio::test(start_paused = true)]
    async fn lookups_by_name_and_id() {
        let f = Arc::new(EchoFetcher {
            calls: AtomicUsize::new(0),
        });
        let svc = service(f);
        let r = svc.find_by_name("mia/vamil").await.expect("found");
        assert_eq!(r.id, "mia-vamil-2024");
        assert!(svc.find_by_name("MIA").await.is_none(), "exact match only");
        assert_eq!(
            svc.find_by_id("wbso-2024").await.map(|r| r.name),
            Some("WBSO".to_string())
        );
        assert!(svc.find_by_id("WBSO-2024").await.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn search_matches_description_category_and_title() {
        let f = Arc::new(EchoFetcher {
            calls: AtomicUsize::new(0),
        });
        let svc = service(f);
        assert_eq!(svc.search("ONDERNEMERS").await.len(), 2);
        let milieu = svc.search("milieu").await;
        assert_eq!(milieu.len(), 1);
        assert_eq!(milieu[0].name, "MIA/Vamil");
        let by_title = svc.search("TEST/MIA").await;
        assert_eq!(by_title.len(), 1, "only the title carries the url");
        assert_eq!(by_title[0].name, "MIA/Vamil");
        assert!(svc.search("no such thing").await.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn concurrent_callers_share_one_pass() {
        let f = Arc::new(EchoFetcher {
            calls: AtomicUsize::new(0),
        });
        let svc = Arc::new(service(f.clone()));
        let (a, b) = tokio::join!(svc.list_all(), svc.list_all());
        assert_eq!(a, b);
        assert_eq!(f.calls.load(Ordering::SeqCst), 2, "one pass over two sources");
    }
}
