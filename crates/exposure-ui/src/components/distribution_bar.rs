use exposure_core::formatting::format_count;
use exposure_core::models::{ExposureStatus, StatBucket};
use ratatui::text::{Line, Span};
use unicode_width::UnicodeWidthStr;

use crate::themes::Theme;

/// Configuration controlling visual appearance of a bucket bar.
pub struct BarConfig {
    /// Width in terminal columns of the bar portion (excluding labels).
    pub width: u16,
    pub filled_char: char,
    pub empty_char: char,
    /// Column the bucket name is padded to.
    pub label_width: usize,
}

impl Default for BarConfig {
    fn default() -> Self {
        Self {
            width: 40,
            filled_char: '\u{2588}', // █  FULL BLOCK
            empty_char: '\u{2591}',  // ░  LIGHT SHADE
            label_width: 12,
        }
    }
}

/// Share of `value` in `total` as a percentage, `0.0` when `total` is zero.
fn share(value: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        (value as f64 / total as f64 * 100.0).min(100.0)
    }
}

/// Pad `text` with spaces to `width` display columns.
fn pad_to(text: &str, width: usize) -> String {
    let used = UnicodeWidthStr::width(text);
    format!("{text}{}", " ".repeat(width.saturating_sub(used)))
}

// ── BucketBar ────────────────────────────────────────────────────────────────

/// One exposure bucket drawn as a horizontal bar relative to the total
/// keyword count.
///
/// Renders as `name │ filled + empty │ count (share%)`.
pub struct BucketBar<'a> {
    pub status: ExposureStatus,
    pub value: usize,
    pub total: usize,
    pub theme: &'a Theme,
    pub config: BarConfig,
}

impl<'a> BucketBar<'a> {
    pub fn new(status: ExposureStatus, value: usize, total: usize, theme: &'a Theme) -> Self {
        Self {
            status,
            value,
            total,
            theme,
            config: BarConfig::default(),
        }
    }

    pub fn percentage(&self) -> f64 {
        share(self.value, self.total)
    }

    pub fn to_line(&self) -> Line<'a> {
        let percentage = self.percentage();
        let filled = ((percentage / 100.0) * self.config.width as f64).round() as u16;
        let empty = self.config.width.saturating_sub(filled);

        let filled_str: String =
            std::iter::repeat_n(self.config.filled_char, filled as usize).collect();
        let empty_str: String =
            std::iter::repeat_n(self.config.empty_char, empty as usize).collect();

        Line::from(vec![
            Span::styled(
                pad_to(self.status.label(), self.config.label_width),
                self.theme.label,
            ),
            Span::styled(filled_str, self.theme.status_style(self.status)),
            Span::styled(empty_str, self.theme.bar_empty),
            Span::styled(
                format!(" {} ({:.1}%)", format_count(self.value), percentage),
                self.theme.value,
            ),
        ])
    }
}

// ── StackedBar ───────────────────────────────────────────────────────────────

/// All exposure buckets as one proportional multi-coloured bar, followed by
/// a short legend. Buckets are drawn in the order given, which callers keep
/// as the fixed chart order.
pub struct StackedBar<'a> {
    pub buckets: Vec<(ExposureStatus, usize)>,
    pub theme: &'a Theme,
    pub width: u16,
}

impl<'a> StackedBar<'a> {
    pub fn new(buckets: Vec<(ExposureStatus, usize)>, theme: &'a Theme) -> Self {
        Self {
            buckets,
            theme,
            width: 50,
        }
    }

    /// Build from chart data, pairing each bucket with its status by
    /// position.
    pub fn from_stats(stats: &[StatBucket], theme: &'a Theme) -> Self {
        let buckets = ExposureStatus::ALL
            .iter()
            .zip(stats)
            .map(|(status, bucket)| (*status, bucket.value))
            .collect();
        Self::new(buckets, theme)
    }

    pub fn to_line(&self) -> Line<'a> {
        let total: usize = self.buckets.iter().map(|(_, v)| v).sum();
        let mut spans: Vec<Span<'a>> = Vec::new();

        if total == 0 {
            spans.push(Span::styled(
                "░".repeat(self.width as usize),
                self.theme.bar_empty,
            ));
        } else {
            for (status, value) in &self.buckets {
                let chars = ((share(*value, total) / 100.0) * self.width as f64).round() as usize;
                if chars > 0 {
                    spans.push(Span::styled(
                        "█".repeat(chars),
                        self.theme.status_style(*status),
                    ));
                }
            }
        }

        spans.push(Span::raw(" "));

        for (status, value) in &self.buckets {
            spans.push(Span::styled(
                format!("{} {} ", status.label(), format_count(*value)),
                self.theme.status_style(*status),
            ));
        }

        Line::from(spans)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
