//! Tunables for the acquisition layer.
//!
//! Defaults are the fixed values the service has always run with; every field
//! can be overridden from the environment (or a `.env` file loaded by the
//! binary). An unparsable value is logged and ignored.

use std::time::Duration;

use crate::scrape::extract::ExtractionProfile;

pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(3600);
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(30);
pub const DEFAULT_REQUEST_DELAY: Duration = Duration::from_millis(500);
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";
pub const DEFAULT_YEAR_TAG: &str = "2024";

pub const ENV_CACHE_TTL_SECS: &str = "SUBSIDY_CACHE_TTL_SECS";
pub const ENV_FETCH_TIMEOUT_SECS: &str = "SUBSIDY_FETCH_TIMEOUT_SECS";
pub const ENV_REQUEST_DELAY_MS: &str = "SUBSIDY_REQUEST_DELAY_MS";
pub const ENV_USER_AGENT: &str = "SUBSIDY_USER_AGENT";
pub const ENV_YEAR_TAG: &str = "SUBSIDY_YEAR_TAG";
pub const ENV_PROFILE: &str = "SUBSIDY_PROFILE";

#[derive(Debug, Clone)]
pub struct FetcherConfig {
    /// How long a successful pass is served before re-acquiring.
    pub cache_ttl: Duration,
    pub fetch_timeout: Duration,
    /// Minimum spacing between two source fetches.
    pub request_delay: Duration,
    pub user_agent: String,
    /// Suffix of record ids, e.g. `wbso-2024`.
    pub year_tag: String,
    pub profile: ExtractionProfile,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            cache_ttl: DEFAULT_CACHE_TTL,
            fetch_timeout: DEFAULT_FETCH_TIMEOUT,
            request_delay: DEFAULT_REQUEST_DELAY,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            year_tag: DEFAULT_YEAR_TAG.to_string(),
            profile: ExtractionProfile::default(),
        }
    }
}

impl FetcherConfig {
    /// Defaults overridden by `SUBSIDY_*` environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|k| std::env::var(k).ok())
    }

    fn from_lookup<F: Fn(&str) -> Option<String>>(get: F) -> Self {
        let mut cfg = Self::default();

        if let Some(secs) = parse_u64(ENV_CACHE_TTL_SECS, get(ENV_CACHE_TTL_SECS)) {
            cfg.cache_ttl = Duration::from_secs(secs);
        }
        // A zero timeout would fail every fetch immediately.
        if let Some(secs) =
            parse_u64(ENV_FETCH_TIMEOUT_SECS, get(ENV_FETCH_TIMEOUT_SECS)).filter(|s| *s > 0)
        {
            cfg.fetch_timeout = Duration::from_secs(secs);
        }
        if let Some(ms) = parse_u64(ENV_REQUEST_DELAY_MS, get(ENV_REQUEST_DELAY_MS)) {
            cfg.request_delay = Duration::from_millis(ms);
        }
        if let Some(ua) = non_empty(get(ENV_USER_AGENT)) {
            cfg.user_agent = ua;
        }
        if let Some(tag) = non_empty(get(ENV_YEAR_TAG)) {
            cfg.year_tag = tag;
        }
        if let Some(code) = non_empty(get(ENV_PROFILE)) {
            match ExtractionProfile::by_code(&code) {
                Some(p) => cfg.profile = p,
                None => tracing::warn!(key = ENV_PROFILE, value = %code, "unknown profile, keeping default"),
            }
        }

        cfg
    }
}

fn non_empty(raw: Option<String>) -> Option<String> {
    raw.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

fn parse_u64(key: &str, raw: Option<String>) -> Option<u64> {
    let raw = non_empty(raw)?;
    match raw.parse::<u64>() {
        Ok(v) => Some(v),
        Err(e) => {
            tracing::warn!(key, value = %raw, error = %e, "ignoring invalid config value");
            None
        }
    }
}
