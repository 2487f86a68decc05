use std::fs::OpenOptions;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::Context;
use exposure_core::categories::{CategoryRegistry, CategorySelection};
use exposure_core::settings::Settings;
use exposure_data::list_view::{ListQuery, SortDirection, SortKey};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

// ── Directory bootstrap ────────────────────────────────────────────────────────

/// Ensure `~/.keyword-exposure/` and its `logs/` subdirectory exist and
/// return the base directory.
pub fn ensure_directories() -> anyhow::Result<PathBuf> {
    let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
    ensure_directories_in(&home)
}

fn ensure_directories_in(home: &Path) -> anyhow::Result<PathBuf> {
    let monitor_dir = home.join(".keyword-exposure");
    std::fs::create_dir_all(monitor_dir.join("logs"))
        .with_context(|| format!("creating {}", monitor_dir.display()))?;
    Ok(monitor_dir)
}

/// Log file used by the dashboard when `--log-file` is absent, since the
/// TUI owns stderr.
pub fn default_log_file(monitor_dir: &Path) -> PathBuf {
    monitor_dir.join("logs").join("exposure-monitor.log")
}

// ── Logging bootstrap ──────────────────────────────────────────────────────────

/// Map a `--log-level` name to an [`EnvFilter`] directive.
///
/// Unknown names pass through unchanged so `RUST_LOG`-style directives
/// still work.
pub fn log_directive(log_level: &str) -> String {
    match log_level.to_uppercase().as_str() {
        "DEBUG" => "debug".to_string(),
        "INFO" => "info".to_string(),
        "WARNING" | "WARN" => "warn".to_string(),
        "ERROR" => "error".to_string(),
        _ => log_level.to_string(),
    }
}

/// Initialise the global `tracing` subscriber.
///
/// With `log_file` the output is appended to that file without ANSI colours;
/// otherwise it goes to stderr.
pub fn setup_logging(log_level: &str, log_file: Option<&Path>) -> anyhow::Result<()> {
    let filter =
        EnvFilter::try_new(log_directive(log_level)).unwrap_or_else(|_| EnvFilter::new("info"));

    let (file_layer, stderr_layer) = match log_file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("opening log file {}", path.display()))?;
            let layer = fmt::layer()
                .with_target(false)
                .with_ansi(false)
                .with_writer(Mutex::new(file));
            (Some(layer), None)
        }
        None => {
            let layer = fmt::layer()
                .with_target(false)
                .with_thread_ids(false)
                .with_writer(std::io::stderr);
            (None, Some(layer))
        }
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .with(stderr_layer)
        .init();

    Ok(())
}

// ── Settings interpretation ────────────────────────────────────────────────────

/// Parse `--category` and check it against the registry.
pub fn category_selection(
    settings: &Settings,
    registry: &CategoryRegistry,
) -> anyhow::Result<CategorySelection> {
    let selection: CategorySelection = settings.category.parse()?;
    registry
        .validate_selection(&selection)
        .with_context(|| format!("--category {}", settings.category))?;
    Ok(selection)
}

/// Initial keyword list parameters from the CLI / last-used settings.
pub fn list_query(settings: &Settings) -> anyhow::Result<ListQuery> {
    let sort_key: SortKey = settings.sort.parse().map_err(anyhow::Error::msg)?;
    let direction: SortDirection = settings.direction.parse().map_err(anyhow::Error::msg)?;
    let page_size =
        NonZeroUsize::new(settings.page_size as usize).context("--page-size must be at least 1")?;

    Ok(ListQuery {
        filter: settings.filter.clone(),
        sort_key,
        direction,
        page: (settings.page as usize).max(1),
        page_size,
    })
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use exposure_core::categories::CategoryConfig;
    use exposure_core::models::CategoryId;
    use tempfile::TempDir;

    fn settings(args: &[&str]) -> Settings {
        let mut full = vec!["exposure-monitor"];
        full.extend_from_slice(args);
        Settings::parse_from(full)
    }

    fn registry() -> CategoryRegistry {
        CategoryRegistry::new(vec![
            CategoryConfig::new("cancer", "암", "/c.json"),
            CategoryConfig::new("diabetes", "당뇨", "/d.json"),
        ])
        .unwrap()
    }

    // ── ensure_directories ────────────────────────────────────────────────────

    #[test]
    fn test_ensure_directories_in() {
        let tmp = TempDir::new().expect("tempdir");
        let dir = ensure_directories_in(tmp.path()).expect("ensure_directories");

        assert_eq!(dir, tmp.path().join(".keyword-exposure"));
        assert!(dir.join("logs").is_dir(), "logs subdir must exist");
        // Second call is a no-op.
        ensure_directories_in(tmp.path()).expect("idempotent");
    }

    #[test]
    fn test_default_log_file() {
        let path = default_log_file(Path::new("/home/u/.keyword-exposure"));
        assert_eq!(
            path,
            PathBuf::from("/home/u/.keyword-exposure/logs/exposure-monitor.log")
        );
    }

    // ── log_directive ─────────────────────────────────────────────────────────

    #[test]
    fn test_log_directive_mapping() {
        assert_eq!(log_directive("DEBUG"), "debug");
        assert_eq!(log_directive("INFO"), "info");
        assert_eq!(log_directive("WARNING"), "warn");
        assert_eq!(log_directive("error"), "error");
        assert_eq!(log_directive("exposure_runtime=trace"), "exposure_runtime=trace");
    }

    // ── category_selection ────────────────────────────────────────────────────

    #[test]
    fn test_category_selection_default_all() {
        let selection = category_selection(&settings(&[]), &registry()).unwrap();
        assert_eq!(selection, CategorySelection::All);
    }

    #[test]
    fn test_category_selection_known_id() {
        let selection =
            category_selection(&settings(&["--category", "diabetes"]), &registry()).unwrap();
        assert_eq!(
            selection,
            CategorySelection::Category(CategoryId::new("diabetes"))
        );
    }

    #[test]
    fn test_category_selection_unknown_id() {
        let err = category_selection(&settings(&["--category", "hair"]), &registry()).unwrap_err();
        assert!(format!("{err:#}").contains("hair"), "got: {err:#}");
    }

    // ── list_query ────────────────────────────────────────────────────────────

    #[test]
    fn test_list_query_defaults() {
        let query = list_query(&settings(&[])).unwrap();
        assert_eq!(query, ListQuery::default());
    }

    #[test]
    fn test_list_query_from_flags() {
        let query = list_query(&settings(&[
            "--sort",
            "totalUrls",
            "--direction",
            "desc",
            "--page-size",
            "50",
            "--page",
            "3",
            "--filter",
            "크림",
        ]))
        .unwrap();
        assert_eq!(query.sort_key, SortKey::TotalUrls);
        assert_eq!(query.direction, SortDirection::Desc);
        assert_eq!(query.page_size.get(), 50);
        assert_eq!(query.page, 3);
        assert_eq!(query.filter, "크림");
    }

    #[test]
    fn test_list_query_after_stale_last_used_file() {
        let tmp = TempDir::new().expect("tempdir");
        let saved_path = exposure_core::settings::LastUsedParams::path_in(tmp.path());
        std::fs::create_dir_all(saved_path.parent().unwrap()).unwrap();
        std::fs::write(&saved_path, r#"{"sort":"clicks","direction":"up"}"#).unwrap();

        let resolved = Settings::resolve_from(vec!["exposure-monitor".into()], &saved_path);
        let query = list_query(&resolved).expect("stale values fall back to defaults");
        assert_eq!(query.sort_key, SortKey::Keyword);
        assert_eq!(query.direction, SortDirection::Asc);
    }

    #[test]
    fn test_list_query_rejects_unknown_persisted_sort() {
        let mut s = settings(&[]);
        s.sort = "clicks".to_string();
        assert!(list_query(&s).is_err());
    }
}
