use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a configured keyword category (e.g. `"cancer"`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryId(String);

impl CategoryId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CategoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CategoryId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Exposure classification of a single keyword.
///
/// `NotExposed` and `NoUrls` are siblings: neither is considered "worse" than
/// the other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ExposureStatus {
    /// At least one tracked URL is exposed.
    Exposed,
    /// URLs were tracked but none of them is exposed.
    NotExposed,
    /// No URLs were tracked for the keyword.
    NoUrls,
}

impl ExposureStatus {
    /// Bucket order used by every summary and chart.
    pub const ALL: [ExposureStatus; 3] = [
        ExposureStatus::Exposed,
        ExposureStatus::NotExposed,
        ExposureStatus::NoUrls,
    ];

    /// Classify a keyword from its URL count and exposure flag.
    pub fn classify(has_exposed_url: bool, total_urls: usize) -> Self {
        if has_exposed_url {
            ExposureStatus::Exposed
        } else if total_urls == 0 {
            ExposureStatus::NoUrls
        } else {
            ExposureStatus::NotExposed
        }
    }

    /// Display label, also used as the sort key for status columns.
    pub fn label(self) -> &'static str {
        match self {
            ExposureStatus::Exposed => "Exposed",
            ExposureStatus::NotExposed => "Not exposed",
            ExposureStatus::NoUrls => "No URLs",
        }
    }
}

impl fmt::Display for ExposureStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A tracked URL and whether the checker saw it exposed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UrlRecord {
    pub url: String,
    pub is_exposed: bool,
}

/// One keyword of one category snapshot, with its derived classification.
///
/// Built only by the normalizer; fields are public for reading but the
/// invariants (`total_urls == urls.len()`, status matching the URL flags)
/// are established at construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeywordRecord {
    /// Keyword exactly as it appeared in the snapshot.
    pub keyword: String,
    /// Category whose snapshot produced this record.
    pub category: CategoryId,
    /// Number of tracked URLs.
    pub total_urls: usize,
    /// Derived classification.
    pub exposure_status: ExposureStatus,
    /// `true` when any URL is exposed.
    pub has_exposed_url: bool,
    /// Tracked URLs in snapshot order.
    pub urls: Vec<UrlRecord>,
}

impl KeywordRecord {
    /// Build a record, deriving the URL count and classification.
    pub fn new(keyword: String, category: CategoryId, urls: Vec<UrlRecord>) -> Self {
        let total_urls = urls.len();
        let has_exposed_url = urls.iter().any(|u| u.is_exposed);
        Self {
            keyword,
            category,
            total_urls,
            exposure_status: ExposureStatus::classify(has_exposed_url, total_urls),
            has_exposed_url,
            urls,
        }
    }
}

/// One chart bucket: a status label and its keyword count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatBucket {
    pub name: String,
    pub value: usize,
}

/// Count-based statistics over a sequence of keyword records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategorySummary {
    pub total_keywords: usize,
    pub keywords_with_urls: usize,
    pub exposed_keywords: usize,
    pub not_exposed_keywords: usize,
    pub no_url_keywords: usize,
    /// Exposed keywords as a rounded percentage of keywords that have URLs.
    pub exposure_success_rate: u32,
    /// Always three buckets in [`ExposureStatus::ALL`] order.
    pub exposure_stats_data: Vec<StatBucket>,
}

impl Default for CategorySummary {
    fn default() -> Self {
        Self {
            total_keywords: 0,
            keywords_with_urls: 0,
            exposed_keywords: 0,
            not_exposed_keywords: 0,
            no_url_keywords: 0,
            exposure_success_rate: 0,
            exposure_stats_data: ExposureStatus::ALL
                .iter()
                .map(|s| StatBucket {
                    name: s.label().to_string(),
                    value: 0,
                })
                .collect(),
        }
    }
}

impl CategorySummary {
    /// Keyword count for a single bucket.
    pub fn count(&self, status: ExposureStatus) -> usize {
        match status {
            ExposureStatus::Exposed => self.exposed_keywords,
            ExposureStatus::NotExposed => self.not_exposed_keywords,
            ExposureStatus::NoUrls => self.no_url_keywords,
        }
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────
