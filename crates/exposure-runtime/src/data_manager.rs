//! Concurrent all-settle loader for every configured category.
//!
//! [`DataManager::load`] starts one fetch per category, waits until all of
//! them have settled, and hands the outcomes to the merger. A failing
//! category never cancels its siblings; it is logged and flagged in the
//! resulting dataset. There is no cache and no retry: every call is one
//! complete load cycle.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use exposure_core::categories::CategoryRegistry;
use exposure_core::error::Result;
use exposure_data::merger::{merge, AggregatedDataset, CategoryOutcome};
use futures::future::join_all;

use crate::source::SnapshotSource;

// ── DataManager ───────────────────────────────────────────────────────────────

/// Loads and merges all categories of a registry from one snapshot source.
///
/// # Example
/// ```no_run
/// use std::sync::Arc;
/// use exposure_core::categories::CategoryRegistry;
/// use exposure_runtime::data_manager::DataManager;
/// use exposure_runtime::source::FileSnapshotSource;
///
/// # async fn run() -> exposure_core::Result<()> {
/// let mgr = DataManager::new(
///     Arc::new(CategoryRegistry::builtin()),
///     Arc::new(FileSnapshotSource::new("./public")),
/// );
/// let dataset = mgr.load().await?;
/// println!("keywords: {}", dataset.all_keywords_data.len());
/// # Ok(())
/// # }
/// ```
pub struct DataManager {
    registry: Arc<CategoryRegistry>,
    source: Arc<dyn SnapshotSource>,
}

impl DataManager {
    pub fn new(registry: Arc<CategoryRegistry>, source: Arc<dyn SnapshotSource>) -> Self {
        Self { registry, source }
    }

    pub fn registry(&self) -> &CategoryRegistry {
        &self.registry
    }

    /// Run one load cycle.
    ///
    /// Per-category failures are absorbed into the dataset; the only error
    /// is an empty registry.
    pub async fn load(&self) -> Result<AggregatedDataset> {
        let started = Instant::now();

        let fetches = self.registry.iter().map(|config| async move {
            let outcome = match self.source.fetch(config).await {
                Ok(snapshot) => CategoryOutcome::Loaded(snapshot),
                Err(e) => {
                    tracing::warn!(
                        category = %config.id,
                        locator = %config.data_file,
                        error = %e,
                        "category failed to load"
                    );
                    CategoryOutcome::Failed(e.to_string())
                }
            };
            (config.id.clone(), outcome)
        });

        let outcomes: HashMap<_, _> = join_all(fetches).await.into_iter().collect();
        let dataset = merge(&self.registry, outcomes)?;

        tracing::info!(
            categories = dataset.category_data.len(),
            failed = dataset.failed_categories().len(),
            keywords = dataset.all_keywords_data.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "load cycle complete"
        );
        Ok(dataset)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
