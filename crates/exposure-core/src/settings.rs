use std::ffi::OsString;
use std::io;
use std::path::{Path, PathBuf};

use clap::parser::ValueSource;
use clap::{ArgMatches, Command, CommandFactory, FromArgMatches, Parser};
use serde::{Deserialize, Serialize};

// ── Settings (CLI) ─────────────────────────────────────────────────────────────

/// Keyword exposure dashboard over crawler snapshot results
#[derive(Parser, Debug, Clone)]
#[command(
    name = "exposure-monitor",
    about = "Keyword exposure dashboard over crawler snapshot results",
    version
)]
pub struct Settings {
    /// Category configuration file (JSON array of { id, name, dataFile })
    #[arg(long, env = "EXPOSURE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Base URL that category data files are fetched from
    #[arg(long, env = "EXPOSURE_BASE_URL")]
    pub base_url: Option<String>,

    /// Directory that category data files are read from when no base URL is set
    #[arg(long, default_value = ".")]
    pub data_dir: PathBuf,

    /// Active category ("all" or a configured category id)
    #[arg(long, default_value = "all")]
    pub category: String,

    /// View mode
    #[arg(long, default_value = "dashboard", value_parser = ["dashboard", "report"])]
    pub view: String,

    /// Display theme
    #[arg(long, default_value = "auto", value_parser = ["light", "dark", "auto"])]
    pub theme: String,

    /// Keywords per page
    #[arg(long, default_value = "10", value_parser = clap::value_parser!(u32).range(1..=1000))]
    pub page_size: u32,

    /// Page of the keyword list (report view)
    #[arg(long, default_value = "1", value_parser = clap::value_parser!(u32).range(1..))]
    pub page: u32,

    /// Keyword list sort column
    #[arg(long, default_value = "keyword", value_parser = ["keyword", "totalUrls", "exposureStatus"])]
    pub sort: String,

    /// Keyword list sort direction
    #[arg(long, default_value = "asc", value_parser = ["asc", "desc"])]
    pub direction: String,

    /// Case-insensitive keyword filter
    #[arg(long, default_value = "")]
    pub filter: String,

    /// Reload interval in seconds (0 loads once)
    #[arg(long, default_value = "0", value_parser = clap::value_parser!(u32).range(0..=86_400))]
    pub refresh_rate: u32,

    /// HTTP timeout per category request in seconds
    #[arg(long, default_value = "30")]
    pub timeout_secs: u64,

    /// Logging level
    #[arg(long, default_value = "INFO", value_parser = ["DEBUG", "INFO", "WARNING", "ERROR"])]
    pub log_level: String,

    /// Log file path
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,

    /// Clear saved configuration
    #[arg(long)]
    pub clear: bool,
}

// ── Last-used view parameters ──────────────────────────────────────────────────

/// View parameters remembered between runs in
/// `~/.keyword-exposure/last_used.json`.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LastUsedParams {
    pub theme: Option<String>,
    pub category: Option<String>,
    pub page_size: Option<u32>,
    pub sort: Option<String>,
    pub direction: Option<String>,
    pub refresh_rate: Option<u32>,
}

impl LastUsedParams {
    pub fn default_path() -> PathBuf {
        let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
        Self::path_in(&home)
    }

    pub fn path_in(home: &Path) -> PathBuf {
        home.join(".keyword-exposure").join("last_used.json")
    }

    /// Missing or unreadable files yield empty parameters.
    pub fn read(path: &Path) -> Self {
        std::fs::read(path)
            .ok()
            .and_then(|bytes| serde_json::from_slice(&bytes).ok())
            .unwrap_or_default()
    }

    /// Writes a sibling temp file and renames it into place.
    pub fn write(&self, path: &Path) -> io::Result<()> {
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir)?;
        }
        let staged = path.with_extension("json.tmp");
        std::fs::write(&staged, serde_json::to_vec_pretty(self)?)?;
        std::fs::rename(&staged, path)
    }

    pub fn remove(path: &Path) -> io::Result<()> {
        match std::fs::remove_file(path) {
            Err(e) if e.kind() != io::ErrorKind::NotFound => Err(e),
            _ => Ok(()),
        }
    }
}

impl From<&Settings> for LastUsedParams {
    fn from(settings: &Settings) -> Self {
        Self {
            theme: Some(settings.theme.clone()),
            category: Some(settings.category.clone()),
            page_size: Some(settings.page_size),
            sort: Some(settings.sort.clone()),
            direction: Some(settings.direction.clone()),
            refresh_rate: Some(settings.refresh_rate),
        }
    }
}

// ── Resolution ─────────────────────────────────────────────────────────────────

/// Replace `target` with `saved` unless `id` came from the command line.
fn adopt<T>(matches: &ArgMatches, id: &str, target: &mut T, saved: Option<T>) {
    if matches.value_source(id) == Some(ValueSource::CommandLine) {
        return;
    }
    if let Some(value) = saved {
        *target = value;
    }
}

/// Whether `value` is one of the possible values declared for argument `id`.
/// Arguments without a fixed value list accept anything.
fn accepts(command: &Command, id: &str, value: &str) -> bool {
    command
        .get_arguments()
        .find(|arg| arg.get_id() == id)
        .map(|arg| {
            let possible = arg.get_possible_values();
            possible.is_empty() || possible.iter().any(|p| p.matches(value, false))
        })
        .unwrap_or(true)
}

impl Settings {
    /// Parse the process arguments layered over the remembered parameters.
    pub fn resolve() -> Self {
        Self::resolve_from(std::env::args_os(), &LastUsedParams::default_path())
    }

    /// Parse `args`, fill unset view parameters from `last_used_path` and
    /// remember the outcome there. `--clear` forgets instead.
    pub fn resolve_from<I>(args: I, last_used_path: &Path) -> Self
    where
        I: IntoIterator<Item = OsString>,
    {
        let command = Settings::command();
        let matches = command.clone().get_matches_from(args);
        let mut settings = match Settings::from_arg_matches(&matches) {
            Ok(settings) => settings,
            Err(e) => e.exit(),
        };
        if settings.debug {
            settings.log_level = "DEBUG".to_string();
        }

        if settings.clear {
            if let Err(e) = LastUsedParams::remove(last_used_path) {
                tracing::debug!(error = %e, "could not remove last-used parameters");
            }
            return settings;
        }

        let saved = LastUsedParams::read(last_used_path);
        let valid = |id: &str, value: Option<String>| {
            value.filter(|v| {
                let ok = accepts(&command, id, v);
                if !ok {
                    tracing::debug!(arg = id, value = %v, "ignoring remembered value");
                }
                ok
            })
        };
        adopt(&matches, "theme", &mut settings.theme, valid("theme", saved.theme));
        adopt(&matches, "category", &mut settings.category, saved.category);
        adopt(
            &matches,
            "page_size",
            &mut settings.page_size,
            saved.page_size.filter(|size| *size > 0),
        );
        adopt(&matches, "sort", &mut settings.sort, valid("sort", saved.sort));
        adopt(
            &matches,
            "direction",
            &mut settings.direction,
            valid("direction", saved.direction),
        );
        adopt(&matches, "refresh_rate", &mut settings.refresh_rate, saved.refresh_rate);

        if let Err(e) = LastUsedParams::from(&settings).write(last_used_path) {
            tracing::debug!(error = %e, "could not persist last-used parameters");
        }
        settings
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn last_used_path(tmp: &TempDir) -> PathBuf {
        LastUsedParams::path_in(tmp.path())
    }

    // ── last-used file ────────────────────────────────────────────────────────

    #[test]
    fn test_last_used_write_then_read() {
        let tmp = TempDir::new().expect("tempdir");
        let path = last_used_path(&tmp);
        let params = LastUsedParams {
            theme: Some("dark".to_string()),
            category: Some("diabetes".to_string()),
            page_size: Some(50),
            sort: Some("totalUrls".to_string()),
            direction: Some("desc".to_string()),
            refresh_rate: Some(60),
        };
        params.write(&path).expect("save");

        let loaded = LastUsedParams::read(&path);
        assert_eq!(loaded.theme.as_deref(), Some("dark"));
        assert_eq!(loaded.category.as_deref(), Some("diabetes"));
        assert_eq!(loaded.page_size, Some(50));
        assert_eq!(loaded.sort.as_deref(), Some("totalUrls"));
        assert_eq!(loaded.direction.as_deref(), Some("desc"));
        assert_eq!(loaded.refresh_rate, Some(60));
    }

    #[test]
    fn test_last_used_missing_file_is_empty() {
        let tmp = TempDir::new().expect("tempdir");
        let loaded = LastUsedParams::read(&last_used_path(&tmp));
        assert!(loaded.theme.is_none());
        assert!(loaded.category.is_none());
        assert!(loaded.page_size.is_none());
    }

    #[test]
    fn test_last_used_corrupt_file_is_empty() {
        let tmp = TempDir::new().expect("tempdir");
        let path = last_used_path(&tmp);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, "{not json").unwrap();
        assert!(LastUsedParams::read(&path).sort.is_none());
    }

    #[test]
    fn test_last_used_remove() {
        let tmp = TempDir::new().expect("tempdir");
        let path = last_used_path(&tmp);
        LastUsedParams::default().write(&path).expect("save");
        assert!(path.exists());

        LastUsedParams::remove(&path).expect("clear");
        assert!(!path.exists());
    }

    // ── CLI parsing ───────────────────────────────────────────────────────────

    #[test]
    fn test_cli_defaults() {
        let settings = Settings::parse_from(["exposure-monitor"]);

        assert!(settings.config.is_none());
        assert_eq!(settings.data_dir, PathBuf::from("."));
        assert_eq!(settings.category, "all");
        assert_eq!(settings.view, "dashboard");
        assert_eq!(settings.theme, "auto");
        assert_eq!(settings.page_size, 10);
        assert_eq!(settings.page, 1);
        assert_eq!(settings.sort, "keyword");
        assert_eq!(settings.direction, "asc");
        assert_eq!(settings.filter, "");
        assert_eq!(settings.refresh_rate, 0);
        assert_eq!(settings.timeout_secs, 30);
        assert_eq!(settings.log_level, "INFO");
        assert!(!settings.debug);
        assert!(!settings.clear);
    }

    #[test]
    fn test_settings_cli_explicit_values() {
        let settings = Settings::parse_from([
            "exposure-monitor",
            "--base-url",
            "https://dash.example.com",
            "--category",
            "cancer",
            "--sort",
            "exposureStatus",
            "--direction",
            "desc",
            "--page-size",
            "20",
        ]);
        assert_eq!(settings.base_url.as_deref(), Some("https://dash.example.com"));
        assert_eq!(settings.category, "cancer");
        assert_eq!(settings.sort, "exposureStatus");
        assert_eq!(settings.direction, "desc");
        assert_eq!(settings.page_size, 20);
    }

    #[test]
    fn test_settings_rejects_zero_page_size() {
        let result = Settings::try_parse_from(["exposure-monitor", "--page-size", "0"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_settings_rejects_unknown_sort_key() {
        let result = Settings::try_parse_from(["exposure-monitor", "--sort", "url"]);
        assert!(result.is_err());
    }

    // ── resolve_from ──────────────────────────────────────────────────────────

    #[test]
    fn test_resolve_fills_unset_from_saved() {
        let tmp = TempDir::new().expect("tempdir");
        let saved_path = last_used_path(&tmp);
        LastUsedParams {
            category: Some("diabetes".to_string()),
            page_size: Some(50),
            ..Default::default()
        }
        .write(&saved_path)
        .expect("save");

        let settings =
            Settings::resolve_from(vec!["exposure-monitor".into()], &saved_path);
        assert_eq!(settings.category, "diabetes");
        assert_eq!(settings.page_size, 50);
    }

    #[test]
    fn test_resolve_ignores_unknown_saved_values() {
        let tmp = TempDir::new().expect("tempdir");
        let saved_path = last_used_path(&tmp);
        LastUsedParams {
            theme: Some("neon".to_string()),
            sort: Some("clicks".to_string()),
            direction: Some("sideways".to_string()),
            category: Some("diabetes".to_string()),
            ..Default::default()
        }
        .write(&saved_path)
        .expect("save");

        let settings =
            Settings::resolve_from(vec!["exposure-monitor".into()], &saved_path);
        assert_eq!(settings.theme, "auto");
        assert_eq!(settings.sort, "keyword");
        assert_eq!(settings.direction, "asc");
        assert_eq!(settings.category, "diabetes");

        // The rewritten file no longer carries the stale values.
        let rewritten = LastUsedParams::read(&saved_path);
        assert_eq!(rewritten.sort.as_deref(), Some("keyword"));
        assert_eq!(rewritten.direction.as_deref(), Some("asc"));
    }

    #[test]
    fn test_resolve_adopts_valid_saved_sort() {
        let tmp = TempDir::new().expect("tempdir");
        let saved_path = last_used_path(&tmp);
        LastUsedParams {
            sort: Some("exposureStatus".to_string()),
            direction: Some("desc".to_string()),
            ..Default::default()
        }
        .write(&saved_path)
        .expect("save");

        let settings =
            Settings::resolve_from(vec!["exposure-monitor".into()], &saved_path);
        assert_eq!(settings.sort, "exposureStatus");
        assert_eq!(settings.direction, "desc");
    }

    #[test]
    fn test_resolve_cli_beats_saved() {
        let tmp = TempDir::new().expect("tempdir");
        let saved_path = last_used_path(&tmp);
        LastUsedParams {
            theme: Some("dark".to_string()),
            ..Default::default()
        }
        .write(&saved_path)
        .expect("save");

        let settings = Settings::resolve_from(
            vec!["exposure-monitor".into(), "--theme".into(), "light".into()],
            &saved_path,
        );
        assert_eq!(settings.theme, "light");
    }

    #[test]
    fn test_resolve_clear_forgets() {
        let tmp = TempDir::new().expect("tempdir");
        let saved_path = last_used_path(&tmp);
        LastUsedParams::default().write(&saved_path).expect("save");

        Settings::resolve_from(
            vec!["exposure-monitor".into(), "--clear".into()],
            &saved_path,
        );

        assert!(!saved_path.exists());
    }

    #[test]
    fn test_resolve_debug_flag_forces_debug_level() {
        let tmp = TempDir::new().expect("tempdir");
        let settings = Settings::resolve_from(
            vec!["exposure-monitor".into(), "--debug".into()],
            &last_used_path(&tmp),
        );
        assert_eq!(settings.log_level, "DEBUG");
    }

    #[test]
    fn test_resolve_remembers_view_parameters() {
        let tmp = TempDir::new().expect("tempdir");
        let saved_path = last_used_path(&tmp);

        Settings::resolve_from(
            vec!["exposure-monitor".into(), "--sort".into(), "totalUrls".into()],
            &saved_path,
        );

        let loaded = LastUsedParams::read(&saved_path);
        assert_eq!(loaded.sort.as_deref(), Some("totalUrls"));
    }
}
