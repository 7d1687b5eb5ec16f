//! Best-effort field extraction from a programme page.
//!
//! Every heuristic is order-sensitive (first match wins) and independently
//! optional: a missing element or pattern leaves the field at its default.
//! Language-specific wording (deadline phrases, the "closed" keyword, the
//! rolling-deadline sentinel) lives in [`ExtractionProfile`], not in code.

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};

use crate::scrape::normalize_text;
use crate::scrape::types::{SourceDescriptor, SubsidyRecord, SubsidyStatus};

pub const DESCRIPTION_MAX_CHARS: usize = 500;
pub const ELIGIBILITY_MAX_ITEMS: usize = 5;
/// Only the first lists on a page tend to hold the requirements.
const ELIGIBILITY_LISTS: usize = 2;
/// Bullet length window, both bounds exclusive.
const BULLET_MIN_CHARS: usize = 10;
const BULLET_MAX_CHARS: usize = 200;

fn sel(css: &str) -> Selector {
    Selector::parse(css).unwrap()
}

static SEL_H1: Lazy<Selector> = Lazy::new(|| sel("h1"));
static SEL_INTRO_P: Lazy<Selector> = Lazy::new(|| sel("p.intro"));
static SEL_INTRO_DIV: Lazy<Selector> = Lazy::new(|| sel("div.intro"));
static SEL_ARTICLE: Lazy<Selector> = Lazy::new(|| sel("article"));
static SEL_P: Lazy<Selector> = Lazy::new(|| sel("p"));
static SEL_UL: Lazy<Selector> = Lazy::new(|| sel("ul"));
static SEL_LI: Lazy<Selector> = Lazy::new(|| sel("li"));

fn compile(patterns: &[&str]) -> Vec<Regex> {
    patterns.iter().map(|p| Regex::new(p).unwrap()).collect()
}

static DUTCH: Lazy<ExtractionProfile> = Lazy::new(|| ExtractionProfile {
    deadline_patterns: compile(&[
        r"(?i)deadline[:\s]+(\d{1,2}[\s\-]+\w+[\s\-]+\d{4})",
        r"(?i)tot[:\s]+(\d{1,2}[\s\-]+\w+[\s\-]+\d{4})",
        r"(?i)uiterlijk[:\s]+(\d{1,2}[\s\-]+\w+[\s\-]+\d{4})",
    ]),
    amount_patterns: compile(&[
        r"(?i)\b(tot\s+(?:€\s?[\d.,]+|\d+(?:[.,]\d+)?\s?%)[^.\n]{0,40})",
        r"(€\s?[\d.,]+(?:\s?(?:miljoen|mln))?)",
    ]),
    closed_keyword: "gesloten".to_string(),
    default_deadline: "Doorlopend".to_string(),
});

static ENGLISH: Lazy<ExtractionProfile> = Lazy::new(|| ExtractionProfile {
    deadline_patterns: compile(&[
        r"(?i)deadline[:\s]+(\d{1,2}[\s\-]+\w+[\s\-]+\d{4})",
        r"(?i)until[:\s]+(\d{1,2}[\s\-]+\w+[\s\-]+\d{4})",
        r"(?i)no later than[:\s]+(\d{1,2}[\s\-]+\w+[\s\-]+\d{4})",
    ]),
    amount_patterns: compile(&[
        r"(?i)\b(up to\s+(?:€\s?[\d.,]+|\d+(?:[.,]\d+)?\s?%)[^.\n]{0,40})",
        r"(€\s?[\d.,]+(?:\s?(?:million|mln))?)",
    ]),
    closed_keyword: "closed".to_string(),
    default_deadline: "Ongoing".to_string(),
});

/// Language-dependent wording used by the extractor.
#[derive(Debug, Clone)]
pub struct ExtractionProfile {
    /// Tried in order; capture group 1 becomes the deadline.
    pub deadline_patterns: Vec<Regex>,
    /// Tried in order; capture group 1 becomes `amount_info`.
    pub amount_patterns: Vec<Regex>,
    /// Lower-case keyword; its presence anywhere on the page marks the programme closed.
    pub closed_keyword: String,
    pub default_deadline: String,
}

impl ExtractionProfile {
    /// Wording used on rvo.nl.
    pub fn dutch() -> Self {
        DUTCH.clone()
    }

    pub fn english() -> Self {
        ENGLISH.clone()
    }

    /// `"nl"` / `"en"` (case-insensitive).
    pub fn by_code(code: &str) -> Option<Self> {
        match code.trim().to_ascii_lowercase().as_str() {
            "nl" | "dutch" => Some(Self::dutch()),
            "en" | "english" => Some(Self::english()),
            _ => None,
        }
    }

    fn deadline_in(&self, page_text: &str) -> Option<String> {
        first_capture(&self.deadline_patterns, page_text)
    }

    fn amount_in(&self, page_text: &str) -> Option<String> {
        first_capture(&self.amount_patterns, page_text)
    }

    fn status_of(&self, page_text: &str) -> SubsidyStatus {
        // Anything not explicitly closed reads as open.
        if page_text.to_lowercase().contains(&self.closed_keyword) {
            SubsidyStatus::Closed
        } else {
            SubsidyStatus::Open
        }
    }
}

impl Default for ExtractionProfile {
    fn default() -> Self {
        Self::dutch()
    }
}

fn first_capture(patterns: &[Regex], text: &str) -> Option<String> {
    patterns.iter().find_map(|re| {
        re.captures(text)
            .and_then(|c| c.get(1))
            .map(|m| normalize_text(m.as_str()))
            .filter(|s| !s.is_empty())
    })
}

/// Turns page HTML plus static descriptor data into a [`SubsidyRecord`].
#[derive(Debug, Clone)]
pub struct Extractor {
    profile: ExtractionProfile,
    year_tag: String,
}

impl Extractor {
    pub fn new(profile: ExtractionProfile, year_tag: impl Into<String>) -> Self {
        Self {
            profile,
            year_tag: year_tag.into(),
        }
    }

    pub fn extract(&self, html: &str, source: &SourceDescriptor) -> SubsidyRecord {
        self.extract_at(html, source, Utc::now())
    }

    /// Same as [`Extractor::extract`] with an explicit extraction timestamp.
    pub fn extract_at(
        &self,
        html: &str,
        source: &SourceDescriptor,
        now: DateTime<Utc>,
    ) -> SubsidyRecord {
        let doc = Html::parse_document(html);
        let page_text: String = doc.root_element().text().collect();

        SubsidyRecord {
            id: source.slug(&self.year_tag),
            name: source.name.clone(),
            category: source.category.clone(),
            url: source.url.clone(),
            title: title_of(&doc),
            description: description_of(&doc),
            deadline: self
                .profile
                .deadline_in(&page_text)
                .unwrap_or_else(|| self.profile.default_deadline.clone()),
            status: self.profile.status_of(&page_text),
            amount_info: self.profile.amount_in(&page_text).unwrap_or_default(),
            eligibility: eligibility_of(&doc),
            last_updated: Some(now),
        }
    }
}

impl Default for Extractor {
    fn default() -> Self {
        Self::new(ExtractionProfile::default(), crate::config::DEFAULT_YEAR_TAG)
    }
}

/// Text of an element with every fragment trimmed and whitespace collapsed.
fn element_text(el: ElementRef<'_>) -> String {
    let joined = el
        .text()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join(" ");
    normalize_text(&joined)
}

fn truncate_chars(s: &str, max: usize) -> String {
    s.chars().take(max).collect()
}

fn title_of(doc: &Html) -> String {
    doc.select(&SEL_H1)
        .next()
        .map(element_text)
        .unwrap_or_default()
}

fn description_of(doc: &Html) -> String {
    let el = doc
        .select(&SEL_INTRO_P)
        .next()
        .or_else(|| doc.select(&SEL_INTRO_DIV).next())
        .or_else(|| {
            doc.select(&SEL_ARTICLE)
                .next()
                .and_then(|article| article.select(&SEL_P).next())
        });

    el.map(|e| truncate_chars(&element_text(e), DESCRIPTION_MAX_CHARS))
        .unwrap_or_default()
}

fn eligibility_of(doc: &Html) -> Vec<String> {
    let mut bullets = Vec::new();
    for ul in doc.select(&SEL_UL).take(ELIGIBILITY_LISTS) {
        for li in ul.select(&SEL_LI).take(ELIGIBILITY_MAX_ITEMS) {
            let text = element_text(li);
            let len = text.chars().count();
            if len > BULLET_MIN_CHARS && len < BULLET_MAX_CHARS {
                bullets.push(text);
            }
        }
    }
    bullets.truncate(ELIGIBILITY_MAX_ITEMS);
    bullets
}
