use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use reqwest::{redirect, Client};

use crate::config::FetcherConfig;
use crate::scrape::types::PageFetcher;

const MAX_REDIRECTS: usize = 10;

/// Why a single page could not be retrieved.
#[derive(Debug, thiserror::Error)]
pub enum FetchFailure {
    #[error("request to {url} timed out")]
    Timeout { url: String },
    #[error("{url} answered with HTTP {status}")]
    Status { url: String, status: u16 },
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("reading body of {url} failed: {source}")]
    Body {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

impl FetchFailure {
    pub fn url(&self) -> &str {
        match self {
            Self::Timeout { url }
            | Self::Status { url, .. }
            | Self::Transport { url, .. }
            | Self::Body { url, .. } => url,
        }
    }

    fn from_reqwest(url: &str, e: reqwest::Error) -> Self {
        if e.is_timeout() {
            Self::Timeout {
                url: url.to_string(),
            }
        } else {
            Self::Transport {
                url: url.to_string(),
                source: e,
            }
        }
    }
}

/// Plain GET fetcher: one attempt, bounded timeout, redirects followed.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(user_agent: &str, timeout: Duration) -> anyhow::Result<Self> {
        let client = Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .redirect(redirect::Policy::limited(MAX_REDIRECTS))
            .build()
            .context("building http client")?;
        Ok(Self { client })
    }

    pub fn from_config(cfg: &FetcherConfig) -> anyhow::Result<Self> {
        Self::new(&cfg.user_agent, cfg.fetch_timeout)
    }

    async fn get_body(&self, url: &str) -> Result<String, FetchFailure> {
        let resp = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| FetchFailure::from_reqwest(url, e))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(FetchFailure::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        resp.text().await.map_err(|e| {
            if e.is_timeout() {
                FetchFailure::Timeout {
                    url: url.to_string(),
                }
            } else {
                FetchFailure::Body {
                    url: url.to_string(),
                    source: e,
                }
            }
        })
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<String, FetchFailure> {
        let result = self.get_body(url).await;
        if let Err(e) = &result {
            tracing::warn!(target: "scrape", url, error = %e, "page fetch failed");
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failure_exposes_url_and_message() {
        let f = FetchFailure::Status {
            url: "https://example.test/wbso".into(),
            status: 503,
        };
        assert_eq!(f.url(), "https://example.test/wbso");
        assert_eq!(f.to_string(), "https://example.test/wbso answered with HTTP 503");
    }

    #[test]
    fn client_builds_from_default_config() {
        assert!(HttpFetcher::from_config(&FetcherConfig::default()).is_ok());
    }
}
