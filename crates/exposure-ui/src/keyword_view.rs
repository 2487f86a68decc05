//! Keywords tab: filter line, sortable keyword table and page footer.

use ratatui::{
    layout::{Constraint, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table},
    Frame,
};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use exposure_core::formatting::format_count;
use exposure_core::models::{CategoryId, KeywordRecord};
use exposure_data::list_view::{ListPage, ListQuery, SortKey};

use crate::dashboard_view::display_name;
use crate::themes::Theme;

/// Columns available to the keyword text.
const KEYWORD_WIDTH: usize = 36;
const CATEGORY_WIDTH: usize = 12;

/// Everything the keywords tab draws.
pub struct KeywordViewData<'a> {
    pub page: &'a ListPage<'a>,
    pub query: &'a ListQuery,
    /// `true` while the user is typing into the filter.
    pub editing_filter: bool,
    pub names: &'a [(CategoryId, String)],
}

// ── Helpers ───────────────────────────────────────────────────────────────────

/// Cut `text` to at most `width` display columns, marking the cut with `…`.
pub fn truncate(text: &str, width: usize) -> String {
    if UnicodeWidthStr::width(text) <= width {
        return text.to_string();
    }
    let budget = width.saturating_sub(1);
    let mut used = 0;
    let mut out = String::new();
    for ch in text.chars() {
        let w = UnicodeWidthChar::width(ch).unwrap_or(0);
        if used + w > budget {
            break;
        }
        used += w;
        out.push(ch);
    }
    if width > 0 {
        out.push('…');
    }
    out
}

fn column_title(key: SortKey) -> &'static str {
    match key {
        SortKey::Keyword => "Keyword",
        SortKey::TotalUrls => "URLs",
        SortKey::ExposureStatus => "Status",
    }
}

/// Header cell text, with an arrow on the active sort column.
fn header_label(key: SortKey, query: &ListQuery) -> String {
    if query.sort_key == key {
        format!("{} {}", column_title(key), query.direction.arrow())
    } else {
        column_title(key).to_string()
    }
}

fn exposed_count(record: &KeywordRecord) -> usize {
    record.urls.iter().filter(|u| u.is_exposed).count()
}

// ── Line builders ─────────────────────────────────────────────────────────────

pub fn filter_line<'a>(data: &KeywordViewData<'_>, theme: &'a Theme) -> Line<'a> {
    let mut spans = vec![Span::styled("Filter: ", theme.label)];
    if data.query.filter.is_empty() && !data.editing_filter {
        spans.push(Span::styled("(none, press / to search)", theme.dim));
    } else {
        spans.push(Span::styled(data.query.filter.clone(), theme.value));
    }
    if data.editing_filter {
        spans.push(Span::styled("▏", theme.info));
    }
    spans.push(Span::raw("    "));
    spans.push(Span::styled("Sort: ", theme.label));
    spans.push(Span::styled(
        format!(
            "{} {}",
            column_title(data.query.sort_key),
            data.query.direction.arrow()
        ),
        theme.value,
    ));
    Line::from(spans)
}

pub fn footer_line<'a>(data: &KeywordViewData<'_>, theme: &'a Theme) -> Line<'a> {
    let pages = data.page.page_count.max(1);
    Line::from(vec![
        Span::styled(format!("Page {}/{}", data.query.page, pages), theme.value),
        Span::styled(" · ", theme.dim),
        Span::styled(
            format!("{} keywords", format_count(data.page.total_matching)),
            theme.text,
        ),
        Span::styled(" · ", theme.dim),
        Span::styled(format!("{} per page", data.query.page_size), theme.text),
    ])
}

// ── Render ────────────────────────────────────────────────────────────────────

fn render_table(frame: &mut Frame, area: Rect, data: &KeywordViewData<'_>, theme: &Theme) {
    let header = Row::new(vec![
        Cell::from("#"),
        Cell::from(header_label(SortKey::Keyword, data.query)),
        Cell::from("Category"),
        Cell::from(header_label(SortKey::TotalUrls, data.query)),
        Cell::from("Exposed"),
        Cell::from(header_label(SortKey::ExposureStatus, data.query)),
    ])
    .style(theme.table_header)
    .height(1);

    let offset = data.query.page.saturating_sub(1) * data.query.page_size.get();
    let rows: Vec<Row> = data
        .page
        .page_items
        .iter()
        .enumerate()
        .map(|(i, record)| {
            let style = if i % 2 == 0 {
                theme.table_row
            } else {
                theme.table_row_alt
            };
            Row::new(vec![
                Cell::from((offset + i + 1).to_string()),
                Cell::from(truncate(&record.keyword, KEYWORD_WIDTH)),
                Cell::from(truncate(
                    display_name(data.names, &record.category),
                    CATEGORY_WIDTH,
                )),
                Cell::from(format_count(record.total_urls)),
                Cell::from(format_count(exposed_count(record))),
                Cell::from(record.exposure_status.label())
                    .style(theme.status_style(record.exposure_status)),
            ])
            .style(style)
        })
        .collect();

    let widths = [
        Constraint::Length(5),
        Constraint::Length(KEYWORD_WIDTH as u16 + 1),
        Constraint::Length(CATEGORY_WIDTH as u16 + 1),
        Constraint::Length(8),
        Constraint::Length(9),
        Constraint::Length(14),
    ];

    let table = Table::new(rows, widths)
        .header(header)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(theme.table_border)
                .title(" Keywords "),
        )
        .style(theme.text);

    frame.render_widget(table, area);
}

/// Render the whole keywords tab into `area`.
pub fn render_keyword_tab(frame: &mut Frame, area: Rect, data: &KeywordViewData<'_>, theme: &Theme) {
    let [filter_area, table_area, footer_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(3),
        Constraint::Length(1),
    ])
    .areas(area);

    frame.render_widget(Paragraph::new(filter_line(data, theme)), filter_area);
    if data.page.page_items.is_empty() {
        let message = if data.page.total_matching == 0 {
            "No keywords match the current filter"
        } else {
            "Page is out of range"
        };
        frame.render_widget(
            Paragraph::new(Line::from(Span::styled(message, theme.dim))).block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(theme.table_border)
                    .title(" Keywords "),
            ),
            table_area,
        );
    } else {
        render_table(frame, table_area, data, theme);
    }
    frame.render_widget(Paragraph::new(footer_line(data, theme)), footer_area);
}

// ── Tests ──────────────────────────────────────────────────────────────────────
