//! TUI rendering and key routing

use crate::app::{App, Tab};
use crate::keybindings::KeyAction;
use crate::tabs::{DashboardTab, ImportTab, InvestmentsTab, LoginScreen, TransactionsTab};
use crate::theme::BaseColors;
use crossterm::event::KeyEvent;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Tabs},
    Frame,
};

/// Main UI renderer
pub struct Ui {
    login: LoginScreen,
    dashboard: DashboardTab,
    transactions: TransactionsTab,
    investments: InvestmentsTab,
    import: ImportTab,
}

impl Default for Ui {
    fn default() -> Self {
        Self::new()
    }
}

impl Ui {
    pub fn new() -> Self {
        Self {
            login: LoginScreen::new(),
            dashboard: DashboardTab::new(),
            transactions: TransactionsTab::new(),
            investments: InvestmentsTab::new(),
            import: ImportTab::new(),
        }
    }

    /// Whether a text field currently owns the keyboard
    pub fn is_typing(&self, app: &App) -> bool {
        if !app.is_authenticated() {
            return true;
        }
        match app.active_tab {
            Tab::Investments => self.investments.is_editing(),
            Tab::Import => self.import.is_editing(),
            Tab::Dashboard | Tab::Transactions => false,
        }
    }

    /// Route a key press: global bindings first, then the visible screen
    pub fn handle_key(&mut self, key: KeyEvent, app: &mut App) {
        let was_authenticated = app.is_authenticated();
        if app.handle_key(key.code, key.modifiers, self.is_typing(app)) {
            if was_authenticated && !app.is_authenticated() {
                // Logged out: the next session starts with fresh screens
                *self = Self::new();
            }
            return;
        }

        if !app.is_authenticated() {
            self.login.handle_key(key.code, app);
            return;
        }

        match app.active_tab {
            Tab::Dashboard => {
                let months = app.balances.items.len();
                self.dashboard.handle_key(key.code, months);
            }
            Tab::Transactions => self.transactions.handle_key(key.code, app),
            Tab::Investments => self.investments.handle_key(key.code, app),
            Tab::Import => self.import.handle_key(key.code, app),
        }
    }

    /// Render the full UI
    pub fn render(&mut self, frame: &mut Frame, app: &mut App) {
        let size = frame.area();

        if !app.is_authenticated() {
            self.login.render(frame, size, app);
            app.toast_manager.render(frame, size, app.color_scheme);
            return;
        }
        self.login.clear_secret();

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(2), // Header + tab bar
                Constraint::Min(0),    // Content
                Constraint::Length(1), // Status bar
            ])
            .split(size);

        self.render_header(frame, chunks[0], app);
        self.render_tab_content(frame, chunks[1], app);
        self.render_status_bar(frame, chunks[2], app);

        app.toast_manager.render(frame, size, app.color_scheme);
    }

    fn render_header(&self, frame: &mut Frame, area: Rect, app: &App) {
        let block = Block::default()
            .borders(Borders::BOTTOM)
            .border_style(Style::default().fg(Color::DarkGray));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let holder = app
            .session
            .as_ref()
            .map(|s| s.display_name().to_string())
            .unwrap_or_default();

        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Length(13), // Logo
                Constraint::Min(0),     // Tabs
                Constraint::Length(holder.chars().count() as u16 + 4),
            ])
            .split(inner);

        let logo = Paragraph::new(Line::from(vec![
            Span::styled("◈ ", Style::default().fg(Color::Cyan)),
            Span::styled(
                "financer",
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            ),
        ]));
        frame.render_widget(logo, chunks[0]);

        let active = app.active_tab;
        let titles: Vec<Line> = Tab::all()
            .iter()
            .map(|t| {
                let style = if *t == active {
                    Style::default()
                        .fg(Color::Cyan)
                        .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
                } else {
                    Style::default().fg(Color::DarkGray)
                };
                Line::from(Span::styled(
                    format!(" {} {} ", t.shortcut(), t.name()),
                    style,
                ))
            })
            .collect();

        let tabs = Tabs::new(titles)
            .select(active.index())
            .divider(Span::styled("│", Style::default().fg(Color::DarkGray)));
        frame.render_widget(tabs, chunks[1]);

        let holder = Paragraph::new(Span::styled(
            format!("● {} ", holder),
            Style::default().fg(Color::Green),
        ));
        frame.render_widget(holder, chunks[2]);
    }

    fn render_tab_content(&mut self, frame: &mut Frame, area: Rect, app: &App) {
        match app.active_tab {
            Tab::Dashboard => self.dashboard.render(frame, area, app),
            Tab::Transactions => self.transactions.render(frame, area, app),
            Tab::Investments => self.investments.render(frame, area, app),
            Tab::Import => self.import.render(frame, area, app),
        }
    }

    fn render_status_bar(&self, frame: &mut Frame, area: Rect, app: &App) {
        let muted = Style::default().fg(BaseColors::muted(app.color_scheme));
        let key = Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD);

        let hint = match app.active_tab {
            Tab::Dashboard => "↑↓ select month",
            Tab::Transactions => "[ ] month │ ↑↓ select │ c category │ a apply to all",
            Tab::Investments => "i add │ ↑↓ select │ d remove",
            Tab::Import => "o path │ s import",
        };

        let label = |action| app.keybindings.key_label(action).unwrap_or_default();
        let refreshed = app
            .last_refresh
            .map(|t| t.format("%H:%M:%S").to_string())
            .unwrap_or_else(|| "never".to_string());

        let line = Line::from(vec![
            Span::styled(format!(" {}", label(KeyAction::Quit)), key),
            Span::styled(" quit ", muted),
            Span::styled("│", muted),
            Span::styled(format!(" {}", label(KeyAction::Refresh)), key),
            Span::styled(" refresh ", muted),
            Span::styled("│", muted),
            Span::styled(format!(" {}", label(KeyAction::Logout)), key),
            Span::styled(" logout ", muted),
            Span::styled("│", muted),
            Span::styled(format!(" {} ", hint), muted),
            Span::styled("│", muted),
            Span::styled(format!(" {} │ updated {} ", app.base_url(), refreshed), muted),
        ]);

        let bar = Paragraph::new(line).style(Style::default().bg(Color::Black));
        frame.render_widget(bar, area);
    }
}
