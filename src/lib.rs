// src/lib.rs
// Public library surface for the CLI, integration tests and embedding services.

pub mod cache;
pub mod config;
pub mod fallback;
pub mod scrape;
pub mod service;

// ---- Re-exports for stable public API ----
pub use crate::config::FetcherConfig;
pub use crate::fallback::fallback_subsidies;
pub use crate::scrape::fetch::{FetchFailure, HttpFetcher};
pub use crate::scrape::types::{PageFetcher, SourceDescriptor, SubsidyRecord, SubsidyStatus};
pub use crate::service::{Listing, Origin, SubsidyService};
