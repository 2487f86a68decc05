//! Count-based summary statistics over keyword records.

use exposure_core::models::{CategorySummary, ExposureStatus, KeywordRecord, StatBucket};

// ── SummaryAggregator ─────────────────────────────────────────────────────────

/// Stateless helper that reduces keyword records into a [`CategorySummary`].
pub struct SummaryAggregator;

impl SummaryAggregator {
    /// Summarize `records` in a single pass.
    ///
    /// The success rate is the share of exposed keywords among keywords that
    /// have at least one URL, rounded half up; it is `0` when no keyword has
    /// URLs.
    pub fn summarize(records: &[KeywordRecord]) -> CategorySummary {
        let mut exposed = 0usize;
        let mut not_exposed = 0usize;
        let mut no_urls = 0usize;
        let mut with_urls = 0usize;

        for record in records {
            match record.exposure_status {
                ExposureStatus::Exposed => exposed += 1,
                ExposureStatus::NotExposed => not_exposed += 1,
                ExposureStatus::NoUrls => no_urls += 1,
            }
            if record.total_urls > 0 {
                with_urls += 1;
            }
        }

        let exposure_stats_data = ExposureStatus::ALL
            .iter()
            .zip([exposed, not_exposed, no_urls])
            .map(|(status, value)| StatBucket {
                name: status.label().to_string(),
                value,
            })
            .collect();

        CategorySummary {
            total_keywords: records.len(),
            keywords_with_urls: with_urls,
            exposed_keywords: exposed,
            not_exposed_keywords: not_exposed,
            no_url_keywords: no_urls,
            exposure_success_rate: success_rate(exposed, with_urls),
            exposure_stats_data,
        }
    }
}

/// `round(exposed / with_urls * 100)`, guarding the empty denominator.
fn success_rate(exposed: usize, with_urls: usize) -> u32 {
    if with_urls == 0 {
        return 0;
    }
    // Both operands are non-negative, so `round` (half away from zero) is
    // round-half-up here.
    ((exposed as f64 / with_urls as f64) * 100.0).round() as u32
}

// ── Tests ─────────────────────────────────────────────────────────────────────
