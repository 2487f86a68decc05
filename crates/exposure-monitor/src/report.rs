//! Non-interactive `--view report` output.

use exposure_core::categories::{CategoryRegistry, CategorySelection};
use exposure_core::error::Result;
use exposure_core::models::{CategoryId, CategorySummary};
use exposure_data::list_view::{self, ListPage, ListQuery};
use exposure_data::merger::AggregatedDataset;
use exposure_data::selector::{self, ViewTimestamps};
use serde::Serialize;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryEntry<'a> {
    pub id: &'a CategoryId,
    pub name: &'a str,
}

/// One row of the per-category summary table.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryRow<'a> {
    pub id: &'a CategoryId,
    pub name: &'a str,
    pub timestamp: Option<&'a str>,
    pub load_failed: bool,
    pub summary: &'a CategorySummary,
}

/// Everything the dashboard would show for one selection, as one document.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Report<'a> {
    pub selection: String,
    pub categories: Vec<CategoryEntry<'a>>,
    pub summary: &'a CategorySummary,
    pub timestamps: ViewTimestamps<'a>,
    pub load_failed: bool,
    pub category_rows: Vec<CategoryRow<'a>>,
    pub all_summary: &'a CategorySummary,
    pub query: &'a ListQuery,
    pub page: ListPage<'a>,
}

pub fn build<'a>(
    registry: &'a CategoryRegistry,
    dataset: &'a AggregatedDataset,
    selection: &CategorySelection,
    query: &'a ListQuery,
) -> Result<Report<'a>> {
    let view = selector::select(dataset, selection)?;
    let page = list_view::view(view.keywords_data, query);

    Ok(Report {
        selection: selection.to_string(),
        categories: registry
            .iter()
            .map(|c| CategoryEntry {
                id: &c.id,
                name: &c.name,
            })
            .collect(),
        summary: view.summary,
        timestamps: view.timestamps,
        load_failed: view.load_failed,
        category_rows: dataset
            .category_data
            .iter()
            .map(|data| CategoryRow {
                id: &data.id,
                name: &data.name,
                timestamp: data.timestamp.as_deref(),
                load_failed: data.load_failed,
                summary: &data.summary,
            })
            .collect(),
        all_summary: &dataset.all_summary,
        query,
        page,
    })
}

// ── Tests ──────────────────────────────────────────────────────────────────────
