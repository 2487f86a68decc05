//! Snapshot sources: where a category's raw JSON comes from.
//!
//! A category's `dataFile` is a locator. With a base URL configured it is
//! resolved against that URL and fetched over HTTP; otherwise it is treated
//! as a path below the data directory.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use exposure_core::categories::CategoryConfig;
use exposure_core::error::{ExposureError, Result};
use exposure_core::settings::Settings;
use exposure_data::reader::{parse_snapshot, RawSnapshot};
use reqwest::Url;
use tracing::debug;

/// Anything that can produce one category's raw snapshot.
///
/// Implementations make a single attempt; retrying is the caller's business.
#[async_trait]
pub trait SnapshotSource: Send + Sync {
    async fn fetch(&self, category: &CategoryConfig) -> Result<RawSnapshot>;
}

// ── HTTP ──────────────────────────────────────────────────────────────────────

/// Fetches snapshots with a shared `reqwest` client.
#[derive(Debug, Clone)]
pub struct HttpSnapshotSource {
    client: reqwest::Client,
    base_url: Url,
}

impl HttpSnapshotSource {
    /// Build a source rooted at `base_url` whose requests time out after
    /// `timeout`.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let base_url =
            Url::parse(base_url).map_err(|e| ExposureError::invalid_locator(base_url, e))?;
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client, base_url })
    }

    /// Resolve a category's locator against the base URL.
    pub fn resolve(&self, category: &CategoryConfig) -> Result<Url> {
        self.base_url
            .join(&category.data_file)
            .map_err(|e| ExposureError::invalid_locator(&category.data_file, e))
    }
}

#[async_trait]
impl SnapshotSource for HttpSnapshotSource {
    async fn fetch(&self, category: &CategoryConfig) -> Result<RawSnapshot> {
        let url = self.resolve(category)?;
        debug!(category = %category.id, %url, "fetching snapshot");

        let response = self.client.get(url.clone()).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ExposureError::HttpStatus {
                status: status.as_u16(),
                locator: url.to_string(),
            });
        }

        let body = response.bytes().await?;
        parse_snapshot(&body)
    }
}

// ── Filesystem ────────────────────────────────────────────────────────────────

/// Reads snapshots from a local directory tree.
#[derive(Debug, Clone)]
pub struct FileSnapshotSource {
    root: PathBuf,
}

impl FileSnapshotSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Map a locator to a path below the root. A leading `/` is relative to
    /// the root, not the filesystem.
    pub fn resolve(&self, category: &CategoryConfig) -> Result<PathBuf> {
        let relative = category.data_file.trim_start_matches('/');
        if relative.is_empty() {
            return Err(ExposureError::invalid_locator(
                &category.data_file,
                "locator names no file",
            ));
        }
        Ok(self.root.join(Path::new(relative)))
    }
}

#[async_trait]
impl SnapshotSource for FileSnapshotSource {
    async fn fetch(&self, category: &CategoryConfig) -> Result<RawSnapshot> {
        let path = self.resolve(category)?;
        debug!(category = %category.id, path = %path.display(), "reading snapshot");

        let bytes = tokio::fs::read(&path)
            .await
            .map_err(|source| ExposureError::FileRead { path, source })?;
        parse_snapshot(&bytes)
    }
}

// ── Construction from settings ────────────────────────────────────────────────

/// HTTP source when `--base-url` is set, filesystem source under
/// `--data-dir` otherwise.
pub fn source_from_settings(settings: &Settings) -> Result<Arc<dyn SnapshotSource>> {
    match settings.base_url.as_deref() {
        Some(base_url) => {
            let timeout = Duration::from_secs(settings.timeout_secs);
            Ok(Arc::new(HttpSnapshotSource::new(base_url, timeout)?))
        }
        None => Ok(Arc::new(FileSnapshotSource::new(settings.data_dir.clone()))),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use tempfile::TempDir;

    fn category(data_file: &str) -> CategoryConfig {
        CategoryConfig::new("cancer", "암", data_file)
    }

    // ── HTTP locator resolution ───────────────────────────────────────────────

    #[test]
    fn test_http_resolve_absolute_locator() {
        let source =
            HttpSnapshotSource::new("https://example.com/app/", Duration::from_secs(5)).unwrap();
        let url = source
            .resolve(&category("/data/latest_results_cancer.json"))
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://example.com/data/latest_results_cancer.json"
        );
    }

    #[test]
    fn test_http_resolve_relative_locator() {
        let source =
            HttpSnapshotSource::new("https://example.com/app/", Duration::from_secs(5)).unwrap();
        let url = source.resolve(&category("data/x.json")).unwrap();
        assert_eq!(url.as_str(), "https://example.com/app/data/x.json");
    }

    #[test]
    fn test_http_invalid_base_url() {
        let err = HttpSnapshotSource::new("not a url", Duration::from_secs(5)).unwrap_err();
        assert!(matches!(err, ExposureError::InvalidLocator { .. }));
    }

    // ── HTTP fetch ────────────────────────────────────────────────────────────

    /// Answer a single connection on a local port with `response`.
    async fn serve_once(response: &'static str) -> std::net::SocketAddr {
        use tokio::io::{AsyncReadExt, AsyncWriteExt};

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut stream, _) = listener.accept().await.unwrap();
            let mut request = [0u8; 4096];
            let _ = stream.read(&mut request).await;
            stream.write_all(response.as_bytes()).await.unwrap();
            stream.shutdown().await.ok();
        });
        addr
    }

    #[tokio::test]
    async fn test_http_fetch_not_found_is_status_error() {
        let addr =
            serve_once("HTTP/1.1 404 Not Found\r\ncontent-length: 0\r\nconnection: close\r\n\r\n")
                .await;
        let source =
            HttpSnapshotSource::new(&format!("http://{addr}/"), Duration::from_secs(5)).unwrap();

        let err = source.fetch(&category("/data/x.json")).await.unwrap_err();
        match err {
            ExposureError::HttpStatus { status, locator } => {
                assert_eq!(status, 404);
                assert_eq!(locator, format!("http://{addr}/data/x.json"));
            }
            other => panic!("expected HttpStatus, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_http_fetch_parses_body() {
        let addr = serve_once(
            "HTTP/1.1 200 OK\r\ncontent-type: application/json\r\ncontent-length: 63\r\nconnection: close\r\n\r\n{\"timestamp\":\"2024-05-01 09:00:00\",\"results\":[{\"keyword\":\"a\"}]}",
        )
        .await;
        let source =
            HttpSnapshotSource::new(&format!("http://{addr}/"), Duration::from_secs(5)).unwrap();

        let snapshot = source.fetch(&category("/data/x.json")).await.unwrap();
        assert_eq!(snapshot.timestamp.as_deref(), Some("2024-05-01 09:00:00"));
        assert_eq!(snapshot.results.len(), 1);
    }

    // ── filesystem ────────────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_file_source_reads_below_root() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir_all(dir.path().join("data")).unwrap();
        std::fs::write(
            dir.path().join("data/latest_results_cancer.json"),
            r#"{"timestamp":"2025-03-01","results":[{"keyword":"a","urls":[]}]}"#,
        )
        .unwrap();

        let source = FileSnapshotSource::new(dir.path());
        let snapshot = source
            .fetch(&category("/data/latest_results_cancer.json"))
            .await
            .unwrap();
        assert_eq!(snapshot.timestamp.as_deref(), Some("2025-03-01"));
        assert_eq!(snapshot.results.len(), 1);
    }

    #[tokio::test]
    async fn test_file_source_missing_file() {
        let dir = TempDir::new().unwrap();
        let source = FileSnapshotSource::new(dir.path());
        let err = source.fetch(&category("/nope.json")).await.unwrap_err();
        assert!(matches!(err, ExposureError::FileRead { .. }));
    }

    #[tokio::test]
    async fn test_file_source_malformed_json() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("bad.json"), "{not json").unwrap();
        let source = FileSnapshotSource::new(dir.path());
        let err = source.fetch(&category("bad.json")).await.unwrap_err();
        assert!(matches!(err, ExposureError::JsonParse(_)));
    }

    #[test]
    fn test_file_resolve_empty_locator() {
        let source = FileSnapshotSource::new("/srv");
        assert!(source.resolve(&category("/")).is_err());
    }

    // ── settings ──────────────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_source_from_settings_defaults_to_files() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("c.json"), r#"{"results":[]}"#).unwrap();
        let data_dir = dir.path().to_string_lossy().to_string();
        let settings = Settings::parse_from(["exposure-monitor", "--data-dir", &data_dir]);

        let source = source_from_settings(&settings).unwrap();
        let snapshot = source.fetch(&category("/c.json")).await.unwrap();
        assert!(snapshot.results.is_empty());
    }

    #[test]
    fn test_source_from_settings_rejects_bad_base_url() {
        let settings = Settings::parse_from(["exposure-monitor", "--base-url", "::"]);
        assert!(source_from_settings(&settings).is_err());
    }
}
