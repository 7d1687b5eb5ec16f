// src/scrape/types.rs
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::scrape::fetch::FetchFailure;

/// One tracked programme page. Loaded once at startup and never mutated.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SourceDescriptor {
    pub name: String,     // e.g., "WBSO", "MIA/Vamil"
    pub category: String, // e.g., "Fiscaal"
    pub url: String,
}

impl SourceDescriptor {
    pub fn new(name: &str, category: &str, url: &str) -> Self {
        Self {
            name: name.to_string(),
            category: category.to_string(),
            url: url.to_string(),
        }
    }

    /// Stable record id: lower-cased name, `/` → `-`, suffixed with the year tag.
    pub fn slug(&self, year_tag: &str) -> String {
        format!("{}-{}", self.name.to_lowercase().replace('/', "-"), year_tag)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum SubsidyStatus {
    #[default]
    Open,
    Closed,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SubsidyRecord {
    pub id: String,
    pub name: String,
    pub category: String,
    pub url: String,
    pub title: String,
    /// At most 500 characters.
    pub description: String,
    pub deadline: String,
    pub status: SubsidyStatus,
    pub amount_info: String,
    /// At most 5 bullets.
    pub eligibility: Vec<String>,
    /// `None` for bundled fallback records.
    pub last_updated: Option<DateTime<Utc>>,
}

impl SubsidyRecord {
    /// Case-insensitive substring match over name, title, description and category.
    /// `needle` must already be lower-cased.
    pub(crate) fn matches_lowered(&self, needle: &str) -> bool {
        [&self.name, &self.title, &self.description, &self.category]
            .iter()
            .any(|field| field.to_lowercase().contains(needle))
    }
}

/// Retrieves raw page content. Implementations must not retry; the orchestrator
/// treats any failure as "no data for this source".
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<String, FetchFailure>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slug_lowercases_and_replaces_slashes() {
        let d = SourceDescriptor::new("MIA/Vamil", "Milieu", "https://example.test");
        assert_eq!(d.slug("2024"), "mia-vamil-2024");
        let d = SourceDescriptor::new("SDE++", "Energie", "https://example.test");
        assert_eq!(d.slug("2025"), "sde++-2025");
    }

    #[test]
    fn status_serializes_as_variant_name() {
        let s = serde_json::to_string(&SubsidyStatus::Closed).unwrap();
        assert_eq!(s, "\"Closed\"");
        assert_eq!(SubsidyStatus::default(), SubsidyStatus::Open);
    }
}
