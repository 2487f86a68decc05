//! Summary tab: headline figures, exposure distribution and the
//! per-category summary table.

use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::Style,
    text::{Line, Span, Text},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table},
    Frame,
};

use exposure_core::formatting::{format_count, format_rate, format_timestamp};
use exposure_core::models::{CategoryId, CategorySummary, ExposureStatus};
use exposure_data::merger::AggregatedDataset;
use exposure_data::selector::{DatasetView, ViewTimestamps};

use crate::components::distribution_bar::{BucketBar, StackedBar};
use crate::themes::Theme;

// ── Summary lines ─────────────────────────────────────────────────────────────

fn card<'a>(label: &'static str, value: String, style: Style, theme: &Theme) -> [Span<'a>; 3] {
    [
        Span::styled(format!("{label}: "), theme.label),
        Span::styled(value, style),
        Span::raw("    "),
    ]
}

/// Display name for a category id, falling back to the id itself.
pub(crate) fn display_name<'n>(names: &'n [(CategoryId, String)], id: &'n CategoryId) -> &'n str {
    names
        .iter()
        .find(|(candidate, _)| candidate == id)
        .map_or(id.as_str(), |(_, name)| name.as_str())
}

fn timestamp_line<'a>(
    timestamps: &ViewTimestamps<'_>,
    names: &[(CategoryId, String)],
    theme: &'a Theme,
) -> Line<'a> {
    let mut spans = vec![Span::styled("Updated: ", theme.label)];
    match timestamps {
        ViewTimestamps::Single(ts) => {
            spans.push(Span::styled(format_timestamp(*ts), theme.text));
        }
        ViewTimestamps::All(pairs) => {
            for (i, (id, ts)) in pairs.iter().enumerate() {
                if i > 0 {
                    spans.push(Span::styled(" · ", theme.dim));
                }
                spans.push(Span::styled(
                    format!("{} ", display_name(names, id)),
                    theme.label,
                ));
                spans.push(Span::styled(format_timestamp(*ts), theme.text));
            }
        }
    }
    Line::from(spans)
}

/// Lines for the top half of the summary tab.
pub fn build_summary_lines<'a>(
    view: &DatasetView<'_>,
    names: &[(CategoryId, String)],
    theme: &'a Theme,
) -> Vec<Line<'a>> {
    let summary = view.summary;
    let mut cards = Vec::with_capacity(12);
    cards.extend(card(
        "Keywords",
        format_count(summary.total_keywords),
        theme.value,
        theme,
    ));
    cards.extend(card(
        "With URLs",
        format_count(summary.keywords_with_urls),
        theme.value,
        theme,
    ));
    cards.extend(card(
        "Exposed",
        format_count(summary.exposed_keywords),
        theme.exposed,
        theme,
    ));
    cards.extend(card(
        "Success rate",
        format_rate(summary.exposure_success_rate),
        theme.rate_style(summary.exposure_success_rate),
        theme,
    ));

    let mut lines = vec![Line::from(cards)];
    if view.load_failed {
        lines.push(Line::from(Span::styled(
            "⚠ Data for this category could not be loaded",
            theme.warning,
        )));
    }
    lines.push(timestamp_line(&view.timestamps, names, theme));
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled("Exposure distribution", theme.header)));
    lines.push(StackedBar::from_stats(&summary.exposure_stats_data, theme).to_line());
    lines.push(Line::from(""));
    for status in ExposureStatus::ALL {
        lines.push(
            BucketBar::new(status, summary.count(status), summary.total_keywords, theme).to_line(),
        );
    }
    lines
}

// ── Category table ────────────────────────────────────────────────────────────

fn summary_cells<'a>(summary: &CategorySummary) -> Vec<Cell<'a>> {
    vec![
        Cell::from(format_count(summary.total_keywords)),
        Cell::from(format_count(summary.keywords_with_urls)),
        Cell::from(format_count(summary.exposed_keywords)),
        Cell::from(format_count(summary.not_exposed_keywords)),
        Cell::from(format_count(summary.no_url_keywords)),
        Cell::from(format_rate(summary.exposure_success_rate)),
    ]
}

/// One row per category in configuration order plus a combined row.
pub fn render_category_table(
    frame: &mut Frame,
    area: Rect,
    dataset: &AggregatedDataset,
    theme: &Theme,
) {
    let header = Row::new(
        [
            "Category",
            "Keywords",
            "With URLs",
            "Exposed",
            "Not exposed",
            "No URLs",
            "Rate",
            "Status",
        ]
        .iter()
        .map(|h| Cell::from(*h).style(theme.table_header)),
    )
    .height(1);

    let mut rows: Vec<Row> = dataset
        .category_data
        .iter()
        .enumerate()
        .map(|(i, category)| {
            let style = if i % 2 == 0 {
                theme.table_row
            } else {
                theme.table_row_alt
            };
            let mut cells = vec![Cell::from(category.name.clone())];
            cells.extend(summary_cells(&category.summary));
            cells.push(if category.load_failed {
                Cell::from("load failed").style(theme.error)
            } else {
                Cell::from("ok").style(theme.success)
            });
            Row::new(cells).style(style)
        })
        .collect();

    let mut total = vec![Cell::from("ALL")];
    total.extend(summary_cells(&dataset.all_summary));
    total.push(Cell::from(format!(
        "{} failed",
        dataset.failed_categories().len()
    )));
    rows.push(Row::new(total).style(theme.table_total));

    let widths = [
        Constraint::Length(14),
        Constraint::Length(10),
        Constraint::Length(10),
        Constraint::Length(9),
        Constraint::Length(12),
        Constraint::Length(9),
        Constraint::Length(6),
        Constraint::Length(12),
    ];

    let table = Table::new(rows, widths)
        .header(header)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(theme.table_border)
                .title(" Categories "),
        )
        .style(theme.text);

    frame.render_widget(table, area);
}

// ── Tab render ────────────────────────────────────────────────────────────────

/// Render the whole summary tab into `area`.
pub fn render_summary_tab(
    frame: &mut Frame,
    area: Rect,
    view: &DatasetView<'_>,
    dataset: &AggregatedDataset,
    names: &[(CategoryId, String)],
    theme: &Theme,
) {
    let lines = build_summary_lines(view, names, theme);
    let table_height = dataset.category_data.len() as u16 + 4;
    let [top, bottom] = Layout::vertical([
        Constraint::Length(lines.len() as u16 + 2),
        Constraint::Min(table_height.min(area.height)),
    ])
    .areas(area);

    frame.render_widget(
        Paragraph::new(Text::from(lines)).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(theme.table_border)
                .title(" Summary "),
        ),
        top,
    );
    render_category_table(frame, bottom, dataset, theme);
}

/// Placeholder shown until the first load cycle finishes.
pub fn render_loading(frame: &mut Frame, area: Rect, theme: &Theme) {
    let text = vec![
        Line::from(""),
        Line::from(Span::styled("Loading exposure data...", theme.info)),
        Line::from(""),
        Line::from(Span::styled("Press 'q' or Ctrl+C to exit", theme.dim)),
    ];
    frame.render_widget(
        Paragraph::new(Text::from(text)).block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Keyword Exposure "),
        ),
        area,
    );
}

/// Single error screen for a load cycle that produced no dataset.
pub fn render_error(frame: &mut Frame, area: Rect, message: &str, theme: &Theme) {
    let text = vec![
        Line::from(""),
        Line::from(Span::styled("Failed to load exposure data", theme.error)),
        Line::from(""),
        Line::from(Span::styled(message.to_string(), theme.text)),
        Line::from(""),
        Line::from(Span::styled(
            "Press 'r' to retry, 'q' or Ctrl+C to exit",
            theme.dim,
        )),
    ];
    frame.render_widget(
        Paragraph::new(Text::from(text)).block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Keyword Exposure "),
        ),
        area,
    );
}

// ── Tests ──────────────────────────────────────────────────────────────────────
