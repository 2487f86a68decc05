//! Filter / sort / paginate over keyword records.
//!
//! Every call recomputes the full slice from the record sequence; the data
//! volumes involved (hundreds to a few thousand keywords) make caching
//! unnecessary.

use std::cmp::Ordering;
use std::fmt;
use std::num::NonZeroUsize;
use std::str::FromStr;

use exposure_core::models::{ExposureStatus, KeywordRecord};
use serde::Serialize;

// ── Query parameters ──────────────────────────────────────────────────────────

/// Column the keyword list is sorted by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SortKey {
    #[default]
    Keyword,
    TotalUrls,
    ExposureStatus,
}

impl SortKey {
    pub const ALL: [SortKey; 3] = [SortKey::Keyword, SortKey::TotalUrls, SortKey::ExposureStatus];

    pub fn as_str(self) -> &'static str {
        match self {
            SortKey::Keyword => "keyword",
            SortKey::TotalUrls => "totalUrls",
            SortKey::ExposureStatus => "exposureStatus",
        }
    }

    /// Next key in [`SortKey::ALL`] order, wrapping around.
    pub fn next(self) -> Self {
        match self {
            SortKey::Keyword => SortKey::TotalUrls,
            SortKey::TotalUrls => SortKey::ExposureStatus,
            SortKey::ExposureStatus => SortKey::Keyword,
        }
    }

    fn compare(self, a: &KeywordRecord, b: &KeywordRecord) -> Ordering {
        match self {
            SortKey::Keyword => locale_compare(&a.keyword, &b.keyword),
            SortKey::TotalUrls => a.total_urls.cmp(&b.total_urls),
            SortKey::ExposureStatus => {
                status_rank(a.exposure_status).cmp(&status_rank(b.exposure_status))
            }
        }
    }
}

/// Ascending status order: keywords without URLs first, exposed last.
fn status_rank(status: ExposureStatus) -> u8 {
    match status {
        ExposureStatus::NoUrls => 0,
        ExposureStatus::NotExposed => 1,
        ExposureStatus::Exposed => 2,
    }
}

impl FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SortKey::ALL
            .into_iter()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| format!("unknown sort key '{s}'"))
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn toggled(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }

    /// Arrow shown next to the active sort column.
    pub fn arrow(self) -> &'static str {
        match self {
            SortDirection::Asc => "↑",
            SortDirection::Desc => "↓",
        }
    }
}

impl FromStr for SortDirection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "asc" => Ok(SortDirection::Asc),
            "desc" => Ok(SortDirection::Desc),
            other => Err(format!("unknown sort direction '{other}'")),
        }
    }
}

/// Page sizes offered by the list view.
pub const PAGE_SIZE_CHOICES: [usize; 4] = [10, 20, 50, 100];

/// Parameters of one list view computation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    pub filter: String,
    pub sort_key: SortKey,
    pub direction: SortDirection,
    /// 1-based page number.
    pub page: usize,
    pub page_size: NonZeroUsize,
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            filter: String::new(),
            sort_key: SortKey::default(),
            direction: SortDirection::default(),
            page: 1,
            page_size: NonZeroUsize::new(PAGE_SIZE_CHOICES[0]).unwrap_or(NonZeroUsize::MIN),
        }
    }
}

impl ListQuery {
    /// Sort by `key`: selecting the active key flips the direction, a new key
    /// starts ascending. Returns to the first page.
    pub fn toggle_sort(&mut self, key: SortKey) {
        if self.sort_key == key {
            self.direction = self.direction.toggled();
        } else {
            self.sort_key = key;
            self.direction = SortDirection::Asc;
        }
        self.page = 1;
    }

    /// Replace the filter text and return to the first page.
    pub fn set_filter(&mut self, filter: impl Into<String>) {
        self.filter = filter.into();
        self.page = 1;
    }

    /// Replace the page size and return to the first page.
    pub fn set_page_size(&mut self, page_size: NonZeroUsize) {
        self.page_size = page_size;
        self.page = 1;
    }

    /// Step to the next larger (or smaller) entry of [`PAGE_SIZE_CHOICES`].
    pub fn cycle_page_size(&mut self, larger: bool) {
        let current = self.page_size.get();
        let next = if larger {
            PAGE_SIZE_CHOICES.iter().copied().find(|&s| s > current)
        } else {
            PAGE_SIZE_CHOICES.iter().rev().copied().find(|&s| s < current)
        };
        if let Some(size) = next.and_then(NonZeroUsize::new) {
            self.set_page_size(size);
        }
    }
}

// ── Result ────────────────────────────────────────────────────────────────────

/// One page of the filtered, sorted keyword list.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListPage<'a> {
    pub page_items: Vec<&'a KeywordRecord>,
    /// Records that matched the filter, across all pages.
    pub total_matching: usize,
    pub page_count: usize,
}

// ── Engine ────────────────────────────────────────────────────────────────────

/// Keep records whose keyword contains `filter`, case-insensitively.
///
/// Relative order is preserved; an empty filter keeps everything.
pub fn filter_records<'a>(records: &'a [KeywordRecord], filter: &str) -> Vec<&'a KeywordRecord> {
    if filter.is_empty() {
        return records.iter().collect();
    }
    let needle = filter.to_lowercase();
    records
        .iter()
        .filter(|r| r.keyword.to_lowercase().contains(&needle))
        .collect()
}

/// Stable sort by `key`; `Desc` reverses the comparator so ties keep their
/// incoming order in both directions.
pub fn sort_records(records: &mut [&KeywordRecord], key: SortKey, direction: SortDirection) {
    records.sort_by(|a, b| {
        let ordering = key.compare(a, b);
        match direction {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    });
}

/// `ceil(total / page_size)`.
pub fn page_count(total: usize, page_size: NonZeroUsize) -> usize {
    total.div_ceil(page_size.get())
}

/// Filter, sort and slice `records` according to `query`.
///
/// A page outside `1..=page_count` yields an empty `page_items`.
pub fn view<'a>(records: &'a [KeywordRecord], query: &ListQuery) -> ListPage<'a> {
    let mut matching = filter_records(records, &query.filter);
    sort_records(&mut matching, query.sort_key, query.direction);

    let total_matching = matching.len();
    let page_count = page_count(total_matching, query.page_size);

    let page_items = match query.page.checked_sub(1) {
        Some(index) => matching
            .into_iter()
            .skip(index.saturating_mul(query.page_size.get()))
            .take(query.page_size.get())
            .collect(),
        None => Vec::new(),
    };

    ListPage {
        page_items,
        total_matching,
        page_count,
    }
}

/// Case-insensitive comparison; strings that differ only in case put the
/// lowercase form first, so that `"apple" < "banana" < "Banana"`.
fn locale_compare(a: &str, b: &str) -> Ordering {
    let folded = a
        .chars()
        .flat_map(char::to_lowercase)
        .cmp(b.chars().flat_map(char::to_lowercase));
    folded.then_with(|| b.cmp(a))
}

// ── Tests ─────────────────────────────────────────────────────────────────────
