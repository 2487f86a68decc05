//! Active-category view over an [`AggregatedDataset`].

use exposure_core::categories::CategorySelection;
use exposure_core::error::{ExposureError, Result};
use exposure_core::models::{CategoryId, CategorySummary, KeywordRecord};
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use crate::merger::AggregatedDataset;

/// Timestamp information carried by a [`DatasetView`].
///
/// `All` serializes as an id → timestamp object in configuration order,
/// `Single` as the bare timestamp or `null`.
#[derive(Debug, Clone, PartialEq)]
pub enum ViewTimestamps<'a> {
    /// Every category's timestamp, in configuration order.
    All(Vec<(&'a CategoryId, Option<&'a str>)>),
    /// The selected category's timestamp.
    Single(Option<&'a str>),
}

impl Serialize for ViewTimestamps<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            ViewTimestamps::All(pairs) => {
                let mut map = serializer.serialize_map(Some(pairs.len()))?;
                for (id, timestamp) in pairs {
                    map.serialize_entry(id, timestamp)?;
                }
                map.end()
            }
            ViewTimestamps::Single(timestamp) => timestamp.serialize(serializer),
        }
    }
}

/// Borrowed slice of a dataset for one category selection.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DatasetView<'a> {
    pub keywords_data: &'a [KeywordRecord],
    pub summary: &'a CategorySummary,
    pub timestamps: ViewTimestamps<'a>,
    /// Whether the selected category failed to load (always `false` for `All`).
    pub load_failed: bool,
}

/// Select the records, summary and timestamps for `selection`.
///
/// Nothing is recomputed; the values were precomputed by the merger. Naming
/// a category that is not part of the dataset is a caller error.
pub fn select<'a>(
    dataset: &'a AggregatedDataset,
    selection: &CategorySelection,
) -> Result<DatasetView<'a>> {
    match selection {
        CategorySelection::All => Ok(DatasetView {
            keywords_data: &dataset.all_keywords_data,
            summary: &dataset.all_summary,
            timestamps: ViewTimestamps::All(dataset.timestamps()),
            load_failed: false,
        }),
        CategorySelection::Category(id) => {
            let data = dataset
                .category(id)
                .ok_or_else(|| ExposureError::UnknownCategory(id.clone()))?;
            Ok(DatasetView {
                keywords_data: &data.keywords_data,
                summary: &data.summary,
                timestamps: ViewTimestamps::Single(data.timestamp.as_deref()),
                load_failed: data.load_failed,
            })
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
