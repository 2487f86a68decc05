//! Main application state and TUI event loop.
//!
//! [`App`] owns the theme, the active category selection, the keyword list
//! query and the most recent load outcome. Key handling is a pure state
//! transition ([`App::handle_key`]) so it can be tested without a terminal.

use std::io;
use std::sync::Arc;
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Layout},
    text::{Line, Span},
    widgets::Paragraph,
    Frame, Terminal,
};
use tokio::sync::mpsc;

use exposure_core::categories::{CategoryRegistry, CategorySelection};
use exposure_core::models::CategoryId;
use exposure_data::list_view::{self, ListQuery};
use exposure_data::merger::AggregatedDataset;
use exposure_data::selector;
use exposure_runtime::orchestrator::{DatasetUpdate, LoadHandle};

use crate::components::header::Header;
use crate::dashboard_view;
use crate::keyword_view::{self, KeywordViewData};
use crate::themes::Theme;

/// Leave raw mode and the alternate screen.
pub fn restore_terminal() -> io::Result<()> {
    disable_raw_mode()?;
    execute!(io::stdout(), LeaveAlternateScreen)
}

// ── Tab ───────────────────────────────────────────────────────────────────────

/// Which tab the dashboard is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    #[default]
    Summary,
    Keywords,
}

impl Tab {
    pub fn toggled(self) -> Self {
        match self {
            Tab::Summary => Tab::Keywords,
            Tab::Keywords => Tab::Summary,
        }
    }
}

// ── LoadState ─────────────────────────────────────────────────────────────────

/// Outcome of the most recent load cycle.
#[derive(Debug)]
pub enum LoadState {
    Loading,
    Ready(AggregatedDataset),
    /// Total failure; the message is shown on the error screen.
    Failed(String),
}

/// Side effect requested by a key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    None,
    Reload,
    Quit,
}

// ── App ───────────────────────────────────────────────────────────────────────

/// Root application state for the dashboard.
pub struct App {
    pub theme: Theme,
    registry: Arc<CategoryRegistry>,
    /// `(id, name)` pairs in configuration order.
    pub categories: Vec<(CategoryId, String)>,
    pub selection: CategorySelection,
    pub tab: Tab,
    pub query: ListQuery,
    pub editing_filter: bool,
    pub state: LoadState,
    /// `true` between a reload request and the arrival of its result.
    pub reloading: bool,
}

impl App {
    pub fn new(
        theme_name: &str,
        registry: Arc<CategoryRegistry>,
        selection: CategorySelection,
        query: ListQuery,
    ) -> Self {
        let categories = registry.listing();
        Self {
            theme: Theme::from_name(theme_name),
            registry,
            categories,
            selection,
            tab: Tab::default(),
            query,
            editing_filter: false,
            state: LoadState::Loading,
            reloading: false,
        }
    }

    // ── Event loop ────────────────────────────────────────────────────────────

    /// Run the dashboard until the user quits.
    ///
    /// Uses `crossterm::event::poll` with a 250 ms timeout so the terminal
    /// loop stays on the current thread while dataset updates arrive on the
    /// async channel via `try_recv`.
    pub async fn run(
        mut self,
        mut rx: mpsc::Receiver<DatasetUpdate>,
        handle: LoadHandle,
    ) -> io::Result<()> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        let tick_rate = Duration::from_millis(250);

        let result = loop {
            if let Err(e) = terminal.draw(|frame| self.render(frame)) {
                break Err(e);
            }

            match event::poll(tick_rate) {
                Ok(true) => match event::read() {
                    Ok(Event::Key(key)) if key.kind == KeyEventKind::Press => {
                        match self.handle_key(key) {
                            Action::Quit => break Ok(()),
                            Action::Reload => {
                                if !handle.reload() {
                                    tracing::warn!("reload requested after loader exited");
                                }
                            }
                            Action::None => {}
                        }
                    }
                    Ok(_) => {}
                    Err(e) => break Err(e),
                },
                Ok(false) => {}
                Err(e) => break Err(e),
            }

            // Drain pending updates without blocking.
            loop {
                match rx.try_recv() {
                    Ok(update) => self.apply_update(update),
                    Err(mpsc::error::TryRecvError::Empty) => break,
                    Err(mpsc::error::TryRecvError::Disconnected) => {
                        tracing::debug!("loader channel closed");
                        break;
                    }
                }
            }
        };

        handle.abort();

        // Restore terminal state unconditionally.
        restore_terminal()?;
        terminal.show_cursor()?;

        result
    }

    // ── State transitions ─────────────────────────────────────────────────────

    /// Store the outcome of a finished load cycle.
    pub fn apply_update(&mut self, update: DatasetUpdate) {
        self.reloading = false;
        match update.result {
            Ok(dataset) => {
                tracing::debug!(
                    generation = update.generation,
                    keywords = dataset.all_keywords_data.len(),
                    "dataset applied"
                );
                self.state = LoadState::Ready(dataset);
                self.clamp_page();
            }
            Err(e) => {
                tracing::warn!(generation = update.generation, error = %e, "load cycle failed");
                self.state = LoadState::Failed(e.to_string());
            }
        }
    }

    /// Translate a key press into a state change and an optional action.
    pub fn handle_key(&mut self, key: KeyEvent) -> Action {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return Action::Quit;
        }

        if self.editing_filter {
            match key.code {
                KeyCode::Enter | KeyCode::Esc => self.editing_filter = false,
                KeyCode::Backspace => {
                    let mut filter = self.query.filter.clone();
                    filter.pop();
                    self.query.set_filter(filter);
                }
                KeyCode::Char(c) => {
                    let mut filter = self.query.filter.clone();
                    filter.push(c);
                    self.query.set_filter(filter);
                }
                _ => {}
            }
            return Action::None;
        }

        match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') => return Action::Quit,
            KeyCode::Char('r') => {
                self.reloading = true;
                return Action::Reload;
            }
            KeyCode::Tab => self.tab = self.tab.toggled(),
            KeyCode::Right => self.select(self.registry.next_selection(&self.selection)),
            KeyCode::Left => self.select(self.registry.previous_selection(&self.selection)),
            KeyCode::Char('/') => {
                self.tab = Tab::Keywords;
                self.editing_filter = true;
            }
            KeyCode::Char('s') => self.query.toggle_sort(self.query.sort_key.next()),
            KeyCode::Char('d') => self.query.toggle_sort(self.query.sort_key),
            KeyCode::Char('n') | KeyCode::PageDown => {
                self.query.page = (self.query.page + 1).min(self.page_count().max(1));
            }
            KeyCode::Char('p') | KeyCode::PageUp => {
                self.query.page = self.query.page.saturating_sub(1).max(1);
            }
            KeyCode::Char('+') | KeyCode::Char('=') => self.query.cycle_page_size(true),
            KeyCode::Char('-') => self.query.cycle_page_size(false),
            _ => {}
        }
        Action::None
    }

    fn select(&mut self, selection: CategorySelection) {
        self.selection = selection;
        self.query.page = 1;
    }

    /// Page count of the current keyword list, `0` before data arrives.
    pub fn page_count(&self) -> usize {
        let LoadState::Ready(dataset) = &self.state else {
            return 0;
        };
        selector::select(dataset, &self.selection)
            .map(|view| list_view::view(view.keywords_data, &self.query).page_count)
            .unwrap_or(0)
    }

    /// Keep the current page inside `1..=max(page_count, 1)`.
    fn clamp_page(&mut self) {
        let max_page = self.page_count().max(1);
        self.query.page = self.query.page.clamp(1, max_page);
    }

    // ── Rendering ─────────────────────────────────────────────────────────────

    /// Render the current application state into `frame`.
    pub fn render(&self, frame: &mut Frame) {
        let area = frame.area();
        let [header_area, body_area, hint_area] = Layout::vertical([
            Constraint::Length(4),
            Constraint::Min(5),
            Constraint::Length(1),
        ])
        .areas(area);

        let header = Header::new(&self.categories, &self.selection, &self.theme);
        frame.render_widget(Paragraph::new(header.to_lines()), header_area);
        frame.render_widget(Paragraph::new(self.hint_line()), hint_area);

        let dataset = match &self.state {
            LoadState::Loading => {
                dashboard_view::render_loading(frame, body_area, &self.theme);
                return;
            }
            LoadState::Failed(message) => {
                dashboard_view::render_error(frame, body_area, message, &self.theme);
                return;
            }
            LoadState::Ready(dataset) => dataset,
        };

        let view = match selector::select(dataset, &self.selection) {
            Ok(view) => view,
            Err(e) => {
                dashboard_view::render_error(frame, body_area, &e.to_string(), &self.theme);
                return;
            }
        };

        match self.tab {
            Tab::Summary => dashboard_view::render_summary_tab(
                frame,
                body_area,
                &view,
                dataset,
                &self.categories,
                &self.theme,
            ),
            Tab::Keywords => {
                let page = list_view::view(view.keywords_data, &self.query);
                let data = KeywordViewData {
                    page: &page,
                    query: &self.query,
                    editing_filter: self.editing_filter,
                    names: &self.categories,
                };
                keyword_view::render_keyword_tab(frame, body_area, &data, &self.theme);
            }
        }
    }

    fn hint_line(&self) -> Line<'static> {
        let mut spans = vec![Span::styled(
            if self.editing_filter {
                " type to filter · Enter/Esc done"
            } else {
                " Tab view · ←/→ category · / filter · s sort · d direction · n/p page · +/- size · r reload · q quit"
            },
            self.theme.dim,
        )];
        if self.reloading {
            spans.push(Span::styled("  reloading…", self.theme.info));
        }
        Line::from(spans)
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────
