// src/scrape/acquire.rs
use std::sync::Arc;
use std::time::Duration;

use metrics::{counter, gauge, histogram};

use crate::scrape::ensure_metrics_described;
use crate::scrape::extract::Extractor;
use crate::scrape::pace::Paced;
use crate::scrape::types::{PageFetcher, SourceDescriptor, SubsidyRecord};

/// A pass that produced nothing usable. Callers degrade to the fallback set.
#[derive(Debug, thiserror::Error)]
pub enum AcquisitionFailure {
    #[error("no sources configured")]
    NoSources,
    #[error("no records extracted ({failed} of {attempted} fetches failed)")]
    Empty { attempted: usize, failed: usize },
}

/// Walks the source list in order, one paced fetch at a time.
pub struct Acquirer {
    fetcher: Arc<dyn PageFetcher>,
    extractor: Extractor,
    request_delay: Duration,
}

impl Acquirer {
    pub fn new(fetcher: Arc<dyn PageFetcher>, extractor: Extractor, request_delay: Duration) -> Self {
        Self {
            fetcher,
            extractor,
            request_delay,
        }
    }

    /// Fetch + extract every source. Failed fetches are skipped, not replaced
    /// with placeholders; the result keeps declaration order.
    pub async fn acquire(
        &self,
        sources: &[SourceDescriptor],
    ) -> Result<Vec<SubsidyRecord>, AcquisitionFailure> {
        ensure_metrics_described();
        if sources.is_empty() {
            return Err(AcquisitionFailure::NoSources);
        }

        let t0 = std::time::Instant::now();
        let mut paced = Paced::new(sources.iter(), self.request_delay);
        let mut records = Vec::with_capacity(sources.len());
        let mut failed = 0usize;

        while let Some(source) = paced.next().await {
            counter!("subsidy_fetch_total").increment(1);
            match self.fetcher.fetch(&source.url).await {
                Ok(html) => {
                    let rec = self.extractor.extract(&html, source);
                    tracing::debug!(
                        target: "scrape",
                        source = %source.name,
                        title = %rec.title,
                        bullets = rec.eligibility.len(),
                        "extracted"
                    );
                    records.push(rec);
                }
                Err(e) => {
                    failed += 1;
                    counter!("subsidy_fetch_failures_total").increment(1);
                    tracing::info!(target: "scrape", source = %source.name, error = %e, "source skipped");
                }
            }
        }

        let ms = t0.elapsed().as_secs_f64() * 1_000.0;
        histogram!("subsidy_acquire_ms").record(ms);
        gauge!("subsidy_last_acquire_ts").set(chrono::Utc::now().timestamp() as f64);
        counter!("subsidy_records_extracted_total").increment(records.len() as u64);

        tracing::info!(
            target: "scrape",
            attempted = sources.len(),
            kept = records.len(),
            failed,
            "acquisition pass finished"
        );

        if records.is_empty() {
            return Err(AcquisitionFailure::Empty {
                attempted: sources.len(),
                failed,
            });
        }
        Ok(records)
    }
}
