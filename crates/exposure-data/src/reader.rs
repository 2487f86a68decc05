//! Raw snapshot schema and parsing.
//!
//! Snapshots come from an external checker that does not follow a strict
//! schema, so every field is parsed permissively: absent or `null`
//! collections become empty, scalars in string positions are stringified and
//! truthy values count as exposed. Entries of `results` or `urls` that are not
//! objects become default entries. Only a document that is not a JSON object
//! is rejected.

use std::path::Path;

use exposure_core::error::{ExposureError, Result};
use serde::de::{DeserializeOwned, Error as _};
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use tracing::debug;

// ── Raw schema ────────────────────────────────────────────────────────────────

/// One category snapshot as produced by the checker.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RawSnapshot {
    /// Checker run time; `None` when absent, `null` or empty.
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub timestamp: Option<String>,
    #[serde(default, deserialize_with = "lenient_entries")]
    pub results: Vec<RawKeywordResult>,
}

/// One keyword entry of a raw snapshot.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RawKeywordResult {
    #[serde(default, deserialize_with = "lenient_string")]
    pub keyword: String,
    #[serde(default, deserialize_with = "lenient_entries")]
    pub urls: Vec<RawUrl>,
}

/// One tracked URL of a raw keyword entry.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RawUrl {
    #[serde(default, deserialize_with = "lenient_string")]
    pub url: String,
    #[serde(default, deserialize_with = "lenient_bool")]
    pub is_exposed: bool,
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Parse a snapshot document from raw bytes.
pub fn parse_snapshot(bytes: &[u8]) -> Result<RawSnapshot> {
    let snapshot: RawSnapshot = serde_json::from_slice(bytes)?;
    debug!(
        results = snapshot.results.len(),
        timestamp = ?snapshot.timestamp,
        "parsed snapshot"
    );
    Ok(snapshot)
}

/// Read and parse a snapshot file from disk.
pub fn read_snapshot_file(path: &Path) -> Result<RawSnapshot> {
    let bytes = std::fs::read(path).map_err(|source| ExposureError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;
    parse_snapshot(&bytes)
}

// ── Lenient field parsers ─────────────────────────────────────────────────────

/// A list whose non-object items become `T::default()`; anything other than
/// an array becomes an empty list.
fn lenient_entries<'de, D, T>(deserializer: D) -> std::result::Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Default + DeserializeOwned,
{
    let Some(Value::Array(items)) = Option::<Value>::deserialize(deserializer)? else {
        return Ok(Vec::new());
    };
    items
        .into_iter()
        .map(|item| match item {
            Value::Object(_) => T::deserialize(item).map_err(D::Error::custom),
            _ => Ok(T::default()),
        })
        .collect()
}

fn lenient_string<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s,
        Some(other) => other.to_string(),
    })
}

fn lenient_bool<'de, D>(deserializer: D) -> std::result::Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => b,
        Some(Value::Number(n)) => n.as_f64().is_some_and(|f| f != 0.0),
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Array(_)) | Some(Value::Object(_)) => true,
    })
}

fn lenient_timestamp<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) | Some(Value::Bool(false)) => None,
        Some(Value::String(s)) if s.is_empty() => None,
        Some(Value::String(s)) => Some(s),
        Some(other) => Some(other.to_string()),
    })
}

// ── Tests ─────────────────────────────────────────────────────────────────────
