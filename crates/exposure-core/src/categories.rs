//! Static category configuration.
//!
//! A [`CategoryRegistry`] is built once at startup, either from a JSON file
//! or from the built-in defaults, and is passed explicitly into the loader
//! and merger. Its order is the order in which categories are fetched,
//! concatenated and displayed.

use std::collections::HashSet;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{ExposureError, Result};
use crate::models::CategoryId;

// ── CategoryConfig ────────────────────────────────────────────────────────────

/// One configured category: its id, display name and snapshot locator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryConfig {
    pub id: CategoryId,
    pub name: String,
    /// URL path or file path of the category's latest snapshot.
    pub data_file: String,
}

impl CategoryConfig {
    pub fn new(id: &str, name: &str, data_file: &str) -> Self {
        Self {
            id: CategoryId::new(id),
            name: name.to_string(),
            data_file: data_file.to_string(),
        }
    }
}

// ── CategoryRegistry ──────────────────────────────────────────────────────────

/// Ordered, validated set of configured categories.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryRegistry {
    categories: Vec<CategoryConfig>,
}

impl CategoryRegistry {
    /// Build a registry, rejecting an empty list and duplicate ids.
    pub fn new(categories: Vec<CategoryConfig>) -> Result<Self> {
        if categories.is_empty() {
            return Err(ExposureError::NoCategories);
        }
        let mut seen = HashSet::new();
        for category in &categories {
            if !seen.insert(category.id.clone()) {
                return Err(ExposureError::Config(format!(
                    "duplicate category id '{}'",
                    category.id
                )));
            }
        }
        Ok(Self { categories })
    }

    /// The three categories tracked by the dashboard out of the box.
    pub fn builtin() -> Self {
        Self {
            categories: vec![
                CategoryConfig::new("cancer", "암", "/data/latest_results_cancer.json"),
                CategoryConfig::new("diabetes", "당뇨", "/data/latest_results_diabetes.json"),
                CategoryConfig::new("cosmetics", "갱년기", "/data/latest_results_cream.json"),
            ],
        }
    }

    /// Load a registry from a JSON array of `{ id, name, dataFile }` objects.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| ExposureError::FileRead {
            path: path.to_path_buf(),
            source,
        })?;
        let categories: Vec<CategoryConfig> = serde_json::from_str(&content)?;
        tracing::debug!(
            path = %path.display(),
            count = categories.len(),
            "loaded category configuration"
        );
        Self::new(categories)
    }

    /// Load from `path` when given, otherwise use [`CategoryRegistry::builtin`].
    pub fn load_or_builtin(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(p) => Self::load_from(p),
            None => Ok(Self::builtin()),
        }
    }

    pub fn get(&self, id: &CategoryId) -> Option<&CategoryConfig> {
        self.categories.iter().find(|c| &c.id == id)
    }

    pub fn contains(&self, id: &CategoryId) -> bool {
        self.get(id).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &CategoryConfig> {
        self.categories.iter()
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    /// `(id, name)` pairs in configuration order.
    pub fn listing(&self) -> Vec<(CategoryId, String)> {
        self.categories
            .iter()
            .map(|c| (c.id.clone(), c.name.clone()))
            .collect()
    }

    /// Check that a selection names a configured category (or is `All`).
    pub fn validate_selection(&self, selection: &CategorySelection) -> Result<()> {
        match selection {
            CategorySelection::All => Ok(()),
            CategorySelection::Category(id) if self.contains(id) => Ok(()),
            CategorySelection::Category(id) => Err(ExposureError::UnknownCategory(id.clone())),
        }
    }

    /// Selection that follows `current` when cycling forward through
    /// `All, first, second, …, last, All`.
    pub fn next_selection(&self, current: &CategorySelection) -> CategorySelection {
        self.step_selection(current, 1)
    }

    /// Selection that precedes `current` in the same cycle.
    pub fn previous_selection(&self, current: &CategorySelection) -> CategorySelection {
        self.step_selection(current, self.categories.len())
    }

    fn step_selection(&self, current: &CategorySelection, step: usize) -> CategorySelection {
        // Slot 0 is `All`, slots 1..=len are the categories.
        let slots = self.categories.len() + 1;
        let index = match current {
            CategorySelection::All => 0,
            CategorySelection::Category(id) => self
                .categories
                .iter()
                .position(|c| &c.id == id)
                .map(|p| p + 1)
                .unwrap_or(0),
        };
        match (index + step) % slots {
            0 => CategorySelection::All,
            n => CategorySelection::Category(self.categories[n - 1].id.clone()),
        }
    }
}

// ── CategorySelection ─────────────────────────────────────────────────────────

/// Active category filter: every category combined, or a single one.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CategorySelection {
    #[default]
    All,
    Category(CategoryId),
}

impl FromStr for CategorySelection {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(if s.eq_ignore_ascii_case("all") {
            CategorySelection::All
        } else {
            CategorySelection::Category(CategoryId::new(s))
        })
    }
}

impl fmt::Display for CategorySelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CategorySelection::All => f.write_str("all"),
            CategorySelection::Category(id) => write!(f, "{id}"),
        }
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn two() -> CategoryRegistry {
        CategoryRegistry::new(vec![
            CategoryConfig::new("a", "A", "/a.json"),
            CategoryConfig::new("b", "B", "/b.json"),
        ])
        .unwrap()
    }

    // ── construction ──────────────────────────────────────────────────────────

    #[test]
    fn test_builtin_order() {
        let registry = CategoryRegistry::builtin();
        let ids: Vec<&str> = registry.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["cancer", "diabetes", "cosmetics"]);
        assert_eq!(
            registry.get(&CategoryId::new("cosmetics")).unwrap().data_file,
            "/data/latest_results_cream.json"
        );
    }

    #[test]
    fn test_empty_registry_rejected() {
        let err = CategoryRegistry::new(vec![]).unwrap_err();
        assert!(matches!(err, ExposureError::NoCategories));
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let err = CategoryRegistry::new(vec![
            CategoryConfig::new("a", "A", "/a.json"),
            CategoryConfig::new("a", "A2", "/a2.json"),
        ])
        .unwrap_err();
        assert!(err.to_string().contains("duplicate category id 'a'"));
    }

    #[test]
    fn test_load_from_json_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("categories.json");
        std::fs::write(
            &path,
            r#"[{"id":"x","name":"X","dataFile":"x.json"},{"id":"y","name":"Y","dataFile":"y.json"}]"#,
        )
        .unwrap();

        let registry = CategoryRegistry::load_from(&path).unwrap();
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.listing()[1], (CategoryId::new("y"), "Y".to_string()));
    }

    #[test]
    fn test_load_from_missing_file() {
        let tmp = TempDir::new().unwrap();
        let err = CategoryRegistry::load_from(&tmp.path().join("nope.json")).unwrap_err();
        assert!(matches!(err, ExposureError::FileRead { .. }));
    }

    #[test]
    fn test_load_or_builtin_without_path() {
        assert_eq!(
            CategoryRegistry::load_or_builtin(None).unwrap(),
            CategoryRegistry::builtin()
        );
    }

    // ── selection ─────────────────────────────────────────────────────────────

    #[test]
    fn test_selection_parse() {
        assert_eq!("all".parse::<CategorySelection>().unwrap(), CategorySelection::All);
        assert_eq!("ALL".parse::<CategorySelection>().unwrap(), CategorySelection::All);
        assert_eq!(
            "cancer".parse::<CategorySelection>().unwrap(),
            CategorySelection::Category(CategoryId::new("cancer"))
        );
    }

    #[test]
    fn test_validate_selection() {
        let registry = two();
        assert!(registry.validate_selection(&CategorySelection::All).is_ok());
        assert!(registry
            .validate_selection(&CategorySelection::Category(CategoryId::new("a")))
            .is_ok());
        let err = registry
            .validate_selection(&CategorySelection::Category(CategoryId::new("zzz")))
            .unwrap_err();
        assert!(matches!(err, ExposureError::UnknownCategory(_)));
    }

    #[test]
    fn test_next_selection_cycles() {
        let registry = two();
        let a = CategorySelection::Category(CategoryId::new("a"));
        let b = CategorySelection::Category(CategoryId::new("b"));
        assert_eq!(registry.next_selection(&CategorySelection::All), a);
        assert_eq!(registry.next_selection(&a), b);
        assert_eq!(registry.next_selection(&b), CategorySelection::All);
    }

    #[test]
    fn test_previous_selection_cycles() {
        let registry = two();
        let b = CategorySelection::Category(CategoryId::new("b"));
        assert_eq!(registry.previous_selection(&CategorySelection::All), b);
        assert_eq!(
            registry.previous_selection(&CategorySelection::Category(CategoryId::new("a"))),
            CategorySelection::All
        );
    }
}
