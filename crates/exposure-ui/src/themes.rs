use exposure_core::models::ExposureStatus;
use ratatui::style::{Color, Modifier, Style};

/// Terminal background brightness.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BackgroundType {
    Dark,
    Light,
}

/// Guess the background from `COLORFGBG`.
///
/// The variable has the format `"foreground;background"`. Background values
/// 0–6 are dark, 7–15 are light. Anything else is treated as dark.
pub fn detect_background() -> BackgroundType {
    std::env::var("COLORFGBG")
        .ok()
        .as_deref()
        .and_then(|val| val.split(';').next_back())
        .and_then(|bg| bg.parse::<u8>().ok())
        .map_or(BackgroundType::Dark, |bg| {
            if bg <= 6 {
                BackgroundType::Dark
            } else {
                BackgroundType::Light
            }
        })
}

/// Every style the dashboard draws with.
#[derive(Debug, Clone)]
pub struct Theme {
    // ── Header ───────────────────────────────────────────────────────────────
    pub header: Style,
    pub header_accent: Style,
    pub separator: Style,
    pub tab_active: Style,
    pub tab_inactive: Style,

    // ── Text ─────────────────────────────────────────────────────────────────
    pub text: Style,
    pub dim: Style,
    pub label: Style,
    pub value: Style,

    // ── Status ───────────────────────────────────────────────────────────────
    pub info: Style,
    pub success: Style,
    pub warning: Style,
    pub error: Style,

    // ── Exposure buckets ─────────────────────────────────────────────────────
    pub exposed: Style,
    pub not_exposed: Style,
    pub no_urls: Style,
    pub bar_empty: Style,

    // ── Table ────────────────────────────────────────────────────────────────
    pub table_header: Style,
    pub table_border: Style,
    pub table_row: Style,
    pub table_row_alt: Style,
    pub table_total: Style,
}

/// The handful of colours a theme is derived from.
#[derive(Debug, Clone, Copy)]
struct Palette {
    ink: Color,
    muted: Color,
    faint: Color,
    accent: Color,
    highlight: Color,
    on_accent: Color,
}

const DARK: Palette = Palette {
    ink: Color::White,
    muted: Color::Gray,
    faint: Color::DarkGray,
    accent: Color::Cyan,
    highlight: Color::Yellow,
    on_accent: Color::Black,
};

const LIGHT: Palette = Palette {
    ink: Color::Black,
    muted: Color::DarkGray,
    faint: Color::Gray,
    accent: Color::Blue,
    highlight: Color::Magenta,
    on_accent: Color::White,
};

fn fg(color: Color) -> Style {
    Style::default().fg(color)
}

fn bold(color: Color) -> Style {
    fg(color).add_modifier(Modifier::BOLD)
}

impl Theme {
    fn from_palette(p: Palette) -> Self {
        Self {
            header: bold(p.accent),
            header_accent: fg(p.highlight),
            separator: fg(p.faint),
            tab_active: bold(p.on_accent).bg(p.accent),
            tab_inactive: fg(p.muted),

            text: fg(p.ink),
            dim: fg(p.faint),
            label: fg(p.muted),
            value: bold(p.ink),

            info: fg(p.accent),
            success: fg(Color::Green),
            warning: fg(Color::Yellow),
            error: fg(Color::Red),

            exposed: fg(Color::Green),
            not_exposed: fg(Color::Red),
            no_urls: fg(p.muted),
            bar_empty: fg(p.faint),

            table_header: bold(p.accent),
            table_border: fg(p.faint),
            table_row: fg(p.ink),
            table_row_alt: fg(p.muted),
            table_total: bold(p.highlight),
        }
    }

    pub fn dark() -> Self {
        Self::from_palette(DARK)
    }

    pub fn light() -> Self {
        Self::from_palette(LIGHT)
    }

    /// Dark or light depending on [`detect_background`].
    pub fn auto_detect() -> Self {
        match detect_background() {
            BackgroundType::Light => Self::light(),
            BackgroundType::Dark => Self::dark(),
        }
    }

    /// Construct a theme by name. Unknown names fall back to `auto_detect`.
    pub fn from_name(name: &str) -> Self {
        match name {
            "light" => Self::light(),
            "dark" => Self::dark(),
            _ => Self::auto_detect(),
        }
    }

    // ── Style helpers ────────────────────────────────────────────────────────

    pub fn status_style(&self, status: ExposureStatus) -> Style {
        match status {
            ExposureStatus::Exposed => self.exposed,
            ExposureStatus::NotExposed => self.not_exposed,
            ExposureStatus::NoUrls => self.no_urls,
        }
    }

    /// Colour for an exposure success rate.
    ///
    /// * `≥ 70 %`  → `success`
    /// * `30–70 %` → `warning`
    /// * `< 30 %`  → `error`
    pub fn rate_style(&self, rate: u32) -> Style {
        if rate >= 70 {
            self.success
        } else if rate >= 30 {
            self.warning
        } else {
            self.error
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
