//! Raw snapshot results → classified keyword records.

use exposure_core::models::{CategoryId, KeywordRecord, UrlRecord};

use crate::reader::RawKeywordResult;

/// Normalize one category's raw results, preserving their order.
///
/// Keywords are copied verbatim and every record is tagged with `category`.
pub fn normalize(category: &CategoryId, results: &[RawKeywordResult]) -> Vec<KeywordRecord> {
    results
        .iter()
        .map(|result| {
            let urls = result
                .urls
                .iter()
                .map(|u| UrlRecord {
                    url: u.url.clone(),
                    is_exposed: u.is_exposed,
                })
                .collect();
            KeywordRecord::new(result.keyword.clone(), category.clone(), urls)
        })
        .collect()
}

// ── Tests ─────────────────────────────────────────────────────────────────────
