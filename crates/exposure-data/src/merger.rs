//! Multi-category merge into one [`AggregatedDataset`].
//!
//! The merger is the only place a dataset is built. It walks the category
//! registry in configuration order, normalizes each category's snapshot (or
//! substitutes an empty record set when the category failed to load), and
//! computes one summary per category plus one over the concatenation.

use std::collections::HashMap;

use exposure_core::categories::CategoryRegistry;
use exposure_core::error::{ExposureError, Result};
use exposure_core::models::{CategoryId, CategorySummary, KeywordRecord};
use serde::Serialize;
use tracing::debug;

use crate::aggregator::SummaryAggregator;
use crate::normalizer::normalize;
use crate::reader::RawSnapshot;

// ── Inputs ────────────────────────────────────────────────────────────────────

/// Result of loading one category's snapshot.
#[derive(Debug, Clone)]
pub enum CategoryOutcome {
    Loaded(RawSnapshot),
    /// Transport or parse failure; the reason is kept for logging only.
    Failed(String),
}

impl CategoryOutcome {
    pub fn is_failed(&self) -> bool {
        matches!(self, CategoryOutcome::Failed(_))
    }
}

// ── Outputs ───────────────────────────────────────────────────────────────────

/// Per-category slice of an [`AggregatedDataset`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryData {
    pub id: CategoryId,
    pub name: String,
    /// Snapshot timestamp; `None` when the load failed or none was reported.
    pub timestamp: Option<String>,
    /// `true` when the snapshot could not be fetched or parsed.
    pub load_failed: bool,
    pub keywords_data: Vec<KeywordRecord>,
    pub summary: CategorySummary,
}

/// Everything the views need, built once per load cycle.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregatedDataset {
    /// Per-category data in configuration order.
    pub category_data: Vec<CategoryData>,
    /// All categories' records concatenated in configuration order.
    pub all_keywords_data: Vec<KeywordRecord>,
    pub all_summary: CategorySummary,
}

impl AggregatedDataset {
    pub fn category(&self, id: &CategoryId) -> Option<&CategoryData> {
        self.category_data.iter().find(|c| &c.id == id)
    }

    /// `(id, timestamp)` pairs in configuration order.
    pub fn timestamps(&self) -> Vec<(&CategoryId, Option<&str>)> {
        self.category_data
            .iter()
            .map(|c| (&c.id, c.timestamp.as_deref()))
            .collect()
    }

    /// Ids of categories whose load failed.
    pub fn failed_categories(&self) -> Vec<&CategoryId> {
        self.category_data
            .iter()
            .filter(|c| c.load_failed)
            .map(|c| &c.id)
            .collect()
    }
}

// ── Merge ─────────────────────────────────────────────────────────────────────

/// Build a dataset from per-category load outcomes.
///
/// A configured category with no entry in `outcomes` is treated as failed.
/// Outcomes for ids that are not configured are ignored. The only error is
/// an empty registry.
pub fn merge(
    registry: &CategoryRegistry,
    mut outcomes: HashMap<CategoryId, CategoryOutcome>,
) -> Result<AggregatedDataset> {
    if registry.is_empty() {
        return Err(ExposureError::NoCategories);
    }

    let mut category_data = Vec::with_capacity(registry.len());
    let mut all_keywords_data = Vec::new();

    for config in registry.iter() {
        let (timestamp, keywords_data, load_failed) = match outcomes.remove(&config.id) {
            Some(CategoryOutcome::Loaded(snapshot)) => {
                let records = normalize(&config.id, &snapshot.results);
                (snapshot.timestamp, records, false)
            }
            Some(CategoryOutcome::Failed(reason)) => {
                debug!(category = %config.id, %reason, "substituting empty results");
                (None, Vec::new(), true)
            }
            None => (None, Vec::new(), true),
        };

        debug!(
            category = %config.id,
            keywords = keywords_data.len(),
            load_failed,
            "merged category"
        );

        all_keywords_data.extend(keywords_data.iter().cloned());
        let summary = SummaryAggregator::summarize(&keywords_data);
        category_data.push(CategoryData {
            id: config.id.clone(),
            name: config.name.clone(),
            timestamp,
            load_failed,
            keywords_data,
            summary,
        });
    }

    if !outcomes.is_empty() {
        debug!(
            ignored = outcomes.len(),
            "ignored outcomes for unconfigured categories"
        );
    }

    let all_summary = SummaryAggregator::summarize(&all_keywords_data);

    Ok(AggregatedDataset {
        category_data,
        all_keywords_data,
        all_summary,
    })
}

// ── Tests ─────────────────────────────────────────────────────────────────────
