use exposure_core::categories::CategorySelection;
use exposure_core::models::CategoryId;
use ratatui::text::{Line, Span};

use crate::themes::Theme;

/// Decorative mark placed either side of the application title.
pub const ACCENT: &str = "◆";

/// Dashboard header rendering four lines:
///
/// 1. Application title.
/// 2. A 60-column `=` separator.
/// 3. Category tabs, `All` first, the active one highlighted.
/// 4. An empty line.
pub struct Header<'a> {
    /// `(id, display name)` pairs in configuration order.
    pub categories: &'a [(CategoryId, String)],
    pub selection: &'a CategorySelection,
    pub theme: &'a Theme,
}

impl<'a> Header<'a> {
    pub fn new(
        categories: &'a [(CategoryId, String)],
        selection: &'a CategorySelection,
        theme: &'a Theme,
    ) -> Self {
        Self {
            categories,
            selection,
            theme,
        }
    }

    fn tab(&self, label: &str, active: bool) -> Span<'a> {
        let style = if active {
            self.theme.tab_active
        } else {
            self.theme.tab_inactive
        };
        Span::styled(format!(" {label} "), style)
    }

    pub fn to_lines(&self) -> Vec<Line<'a>> {
        let mut tabs = vec![self.tab("All", *self.selection == CategorySelection::All)];
        for (id, name) in self.categories {
            let active = matches!(self.selection, CategorySelection::Category(sel) if sel == id);
            tabs.push(Span::raw(" "));
            tabs.push(self.tab(name, active));
        }

        vec![
            Line::from(vec![
                Span::styled(ACCENT, self.theme.header_accent),
                Span::styled(" KEYWORD EXPOSURE MONITOR ", self.theme.header),
                Span::styled(ACCENT, self.theme.header_accent),
            ]),
            Line::from(Span::styled("=".repeat(60), self.theme.separator)),
            Line::from(tabs),
            Line::from(""),
        ]
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn categories() -> Vec<(CategoryId, String)> {
        vec![
            (CategoryId::new("cancer"), "암".to_string()),
            (CategoryId::new("diabetes"), "당뇨".to_string()),
        ]
    }

    fn text(line: &Line) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn test_header_to_lines_count() {
        let theme = Theme::dark();
        let cats = categories();
        let header = Header::new(&cats, &CategorySelection::All, &theme);
        assert_eq!(header.to_lines().len(), 4);
    }

    #[test]
    fn test_header_title_line_content() {
        let theme = Theme::dark();
        let cats = categories();
        let lines = Header::new(&cats, &CategorySelection::All, &theme).to_lines();
        let title = text(&lines[0]);
        assert!(title.contains("KEYWORD EXPOSURE MONITOR"), "got: {title}");
        assert!(title.starts_with(ACCENT));
    }

    #[test]
    fn test_header_separator_line() {
        let theme = Theme::dark();
        let cats = categories();
        let lines = Header::new(&cats, &CategorySelection::All, &theme).to_lines();
        let sep = text(&lines[1]);
        assert_eq!(sep.chars().count(), 60);
        assert!(sep.chars().all(|c| c == '='));
    }

    #[test]
    fn test_header_tabs_in_configuration_order() {
        let theme = Theme::dark();
        let cats = categories();
        let lines = Header::new(&cats, &CategorySelection::All, &theme).to_lines();
        assert_eq!(text(&lines[2]), " All   암   당뇨 ");
    }

    #[test]
    fn test_header_highlights_all() {
        let theme = Theme::dark();
        let cats = categories();
        let lines = Header::new(&cats, &CategorySelection::All, &theme).to_lines();
        assert_eq!(lines[2].spans[0].style, theme.tab_active);
        assert_eq!(lines[2].spans[2].style, theme.tab_inactive);
    }

    #[test]
    fn test_header_highlights_selected_category() {
        let theme = Theme::dark();
        let cats = categories();
        let selection = CategorySelection::Category(CategoryId::new("diabetes"));
        let lines = Header::new(&cats, &selection, &theme).to_lines();
        let active: Vec<&str> = lines[2]
            .spans
            .iter()
            .filter(|s| s.style == theme.tab_active)
            .map(|s| s.content.as_ref())
            .collect();
        assert_eq!(active, vec![" 당뇨 "]);
    }
}
