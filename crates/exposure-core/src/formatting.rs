use chrono::{DateTime, NaiveDateTime};

/// Placeholder shown for an absent snapshot timestamp.
pub const MISSING_TIMESTAMP: &str = "n/a";

/// Format an integer count with thousands separators.
///
/// # Examples
///
/// ```
/// use exposure_core::formatting::format_count;
///
/// assert_eq!(format_count(0), "0");
/// assert_eq!(format_count(999), "999");
/// assert_eq!(format_count(1234567), "1,234,567");
/// ```
pub fn format_count(value: usize) -> String {
    group_thousands(&value.to_string())
}

/// Format a whole-number percentage, e.g. `"75%"`.
pub fn format_rate(rate: u32) -> String {
    format!("{rate}%")
}

/// Render a snapshot timestamp for display.
///
/// RFC 3339 strings and `"%Y-%m-%d %H:%M:%S"` strings (with an optional
/// fractional part) are normalised to `"%Y-%m-%d %H:%M:%S"`. Anything else is
/// shown verbatim, and an absent timestamp becomes [`MISSING_TIMESTAMP`].
///
/// # Examples
///
/// ```
/// use exposure_core::formatting::format_timestamp;
///
/// assert_eq!(format_timestamp(Some("2025-03-01T09:30:00+09:00")), "2025-03-01 09:30:00");
/// assert_eq!(format_timestamp(Some("yesterday")), "yesterday");
/// assert_eq!(format_timestamp(None), "n/a");
/// ```
pub fn format_timestamp(raw: Option<&str>) -> String {
    let Some(raw) = raw else {
        return MISSING_TIMESTAMP.to_string();
    };

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return dt.format("%Y-%m-%d %H:%M:%S").to_string();
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f") {
        return dt.format("%Y-%m-%d %H:%M:%S").to_string();
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return dt.format("%Y-%m-%d %H:%M:%S").to_string();
    }
    raw.to_string()
}

// ── Internal helpers ──────────────────────────────────────────────────────────

/// Insert commas every three digits from the right of an integer string.
fn group_thousands(s: &str) -> String {
    if s.len() <= 3 {
        return s.to_string();
    }
    let chars: Vec<char> = s.chars().collect();
    let mut result = String::with_capacity(s.len() + s.len() / 3);
    let remainder = chars.len() % 3;
    for (i, &c) in chars.iter().enumerate() {
        if i != 0 && (i % 3 == remainder) {
            result.push(',');
        }
        result.push(c);
    }
    result
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    // ── format_count ──────────────────────────────────────────────────────────

    #[test]
    fn test_format_count_small() {
        assert_eq!(format_count(42), "42");
    }

    #[test]
    fn test_format_count_exact_thousands() {
        assert_eq!(format_count(1000), "1,000");
        assert_eq!(format_count(1_000_000), "1,000,000");
    }

    // ── format_rate ───────────────────────────────────────────────────────────

    #[test]
    fn test_format_rate() {
        assert_eq!(format_rate(0), "0%");
        assert_eq!(format_rate(100), "100%");
    }

    // ── format_timestamp ──────────────────────────────────────────────────────

    #[test]
    fn test_format_timestamp_rfc3339_utc() {
        assert_eq!(
            format_timestamp(Some("2025-01-15T08:00:00Z")),
            "2025-01-15 08:00:00"
        );
    }

    #[test]
    fn test_format_timestamp_naive_with_fraction() {
        assert_eq!(
            format_timestamp(Some("2025-01-15 08:00:00.123456")),
            "2025-01-15 08:00:00"
        );
    }

    #[test]
    fn test_format_timestamp_naive_iso() {
        assert_eq!(
            format_timestamp(Some("2025-01-15T08:00:00.5")),
            "2025-01-15 08:00:00"
        );
    }

    #[test]
    fn test_format_timestamp_passthrough() {
        assert_eq!(format_timestamp(Some("20250115_0800")), "20250115_0800");
    }

    #[test]
    fn test_format_timestamp_missing() {
        assert_eq!(format_timestamp(None), MISSING_TIMESTAMP);
    }

    // ── group_thousands ───────────────────────────────────────────────────────

    #[test]
    fn test_group_thousands_four_digits() {
        assert_eq!(group_thousands("1234"), "1,234");
    }

    #[test]
    fn test_group_thousands_seven_digits() {
        assert_eq!(group_thousands("1234567"), "1,234,567");
    }
}
