// src/scrape/mod.rs
pub mod acquire;
pub mod extract;
pub mod fetch;
pub mod pace;
pub mod sources;
pub mod types;

use metrics::{describe_counter, describe_gauge, describe_histogram};
use once_cell::sync::OnceCell;

/// One-time metrics registration (so series show up in the installed recorder).
pub(crate) fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!("subsidy_fetch_total", "Programme page fetches attempted.");
        describe_counter!(
            "subsidy_fetch_failures_total",
            "Fetches that failed (transport, timeout, non-2xx)."
        );
        describe_counter!(
            "subsidy_records_extracted_total",
            "Records extracted from fetched pages."
        );
        describe_counter!(
            "subsidy_fallback_total",
            "Listings served from the bundled fallback set."
        );
        describe_counter!(
            "subsidy_cache_hits_total",
            "Listings served from a fresh cache entry."
        );
        describe_histogram!("subsidy_acquire_ms", "Full acquisition pass time in milliseconds.");
        describe_gauge!(
            "subsidy_last_acquire_ts",
            "Unix ts when the last acquisition pass finished."
        );
    });
}

/// Collapse whitespace runs to single spaces and trim.
pub fn normalize_text(s: &str) -> String {
    static RE_WS: OnceCell<regex::Regex> = OnceCell::new();
    let re_ws = RE_WS.get_or_init(|| regex::Regex::new(r"\s+").unwrap());
    re_ws.replace_all(s, " ").trim().to_string()
}
