//! Transactions tab - month filter, statement list, categorization

use crate::app::App;
use crate::empty_state;
use crate::theme::{FocusStyle, StatusColor};
use crossterm::event::KeyCode;
use financer_core::aggregate::{filter_by_month, month_filters, reconcile_filter, MonthFilter};
use financer_core::{Alert, CategoryUpdate, Transaction};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState, Tabs},
    Frame,
};

/// Category following `current` in `categories`, wrapping; the first one when
/// `current` is unset or unknown
pub fn next_category(current: Option<&str>, categories: &[String]) -> Option<String> {
    if categories.is_empty() {
        return None;
    }
    let next = current
        .and_then(|c| categories.iter().position(|known| known == c))
        .map(|idx| (idx + 1) % categories.len())
        .unwrap_or(0);
    Some(categories[next].clone())
}

/// Credit/debit cell text: shown only when positive
fn amount_cell(value: f64) -> String {
    if value > 0.0 {
        format!("{:.2}", value)
    } else {
        String::new()
    }
}

/// Transactions tab state
pub struct TransactionsTab {
    filter: MonthFilter,
    table_state: TableState,
}

impl Default for TransactionsTab {
    fn default() -> Self {
        Self::new()
    }
}

impl TransactionsTab {
    pub fn new() -> Self {
        Self {
            filter: MonthFilter::All,
            table_state: TableState::default(),
        }
    }

    pub fn filter(&self) -> &MonthFilter {
        &self.filter
    }

    /// Drop a selected month that is no longer offered
    fn reconcile(&mut self, transactions: &[Transaction]) {
        let options = month_filters(transactions);
        let reconciled = reconcile_filter(&self.filter, &options);
        if reconciled != self.filter {
            self.filter = reconciled;
            self.table_state.select(None);
        }
    }

    fn cycle_filter(&mut self, transactions: &[Transaction], forward: bool) {
        let options = month_filters(transactions);
        let current = options.iter().position(|f| *f == self.filter).unwrap_or(0);
        let len = options.len();
        let next = if forward {
            (current + 1) % len
        } else {
            (current + len - 1) % len
        };
        self.filter = options[next].clone();
        self.table_state.select(None);
    }

    fn move_selection(&mut self, delta: i32, len: usize) {
        if len == 0 {
            self.table_state.select(None);
            return;
        }
        let current = self.table_state.selected().map(|i| i as i32).unwrap_or(-1);
        let next = (current + delta).clamp(0, len as i32 - 1) as usize;
        self.table_state.select(Some(next));
    }

    fn selected<'a>(&self, transactions: &'a [Transaction]) -> Option<&'a Transaction> {
        let visible = filter_by_month(transactions, &self.filter);
        self.table_state
            .selected()
            .and_then(|i| visible.get(i).copied())
    }

    pub fn handle_key(&mut self, key: KeyCode, app: &mut App) {
        self.reconcile(&app.transactions.items);
        let visible_len = filter_by_month(&app.transactions.items, &self.filter).len();

        match key {
            KeyCode::Char(']') | KeyCode::Right => self.cycle_filter(&app.transactions.items, true),
            KeyCode::Char('[') | KeyCode::Left => self.cycle_filter(&app.transactions.items, false),
            KeyCode::Down | KeyCode::Char('j') => self.move_selection(1, visible_len),
            KeyCode::Up | KeyCode::Char('k') => self.move_selection(-1, visible_len),
            KeyCode::Char('c') => self.categorize(app, false),
            KeyCode::Char('a') => self.categorize(app, true),
            _ => {}
        }
    }

    /// `c` saves the next category for the selection; `a` re-sends the
    /// current category with propagation to every matching transaction
    fn categorize(&mut self, app: &mut App, apply_to_all: bool) {
        if app.transactions.loading {
            return;
        }
        let Some(transaction) = self.selected(&app.transactions.items) else {
            app.notify(Alert::info("Categorize", "Select a transaction first"));
            return;
        };

        let category = if apply_to_all {
            transaction.category.clone().unwrap_or_default()
        } else {
            next_category(transaction.category.as_deref(), &app.categories).unwrap_or_default()
        };

        match CategoryUpdate::new(transaction.id, &category, apply_to_all) {
            Ok(update) => app.submit_category(update),
            Err(e) => app.notify(Alert::from_core_error("Categorize", "Invalid category", &e)),
        }
    }

    pub fn render(&mut self, frame: &mut Frame, area: Rect, app: &App) {
        let scheme = app.color_scheme;
        self.reconcile(&app.transactions.items);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Min(5)])
            .split(area);

        self.render_filter_bar(frame, chunks[0], app);

        if app.transactions.loading && !app.transactions.fetched {
            let loading = Paragraph::new(app.spinner.line("Loading transactions..."))
                .alignment(Alignment::Center)
                .block(Block::default().borders(Borders::ALL));
            frame.render_widget(loading, chunks[1]);
            return;
        }

        let visible = filter_by_month(&app.transactions.items, &self.filter);
        if visible.is_empty() && !app.transactions.loading {
            frame.render_widget(
                empty_state::no_transactions(&self.filter.to_string()),
                chunks[1],
            );
            return;
        }

        let header = Row::new(["Date", "Type", "Detail", "Credit", "Debit", "Category"]).style(
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        );

        let rows: Vec<Row> = visible
            .iter()
            .map(|t| {
                let category_style = if t.category.as_deref().is_some_and(|c| !c.is_empty()) {
                    Style::default().fg(StatusColor::Focus.to_color(scheme))
                } else {
                    Style::default().fg(StatusColor::Neutral.to_color(scheme))
                };
                Row::new(vec![
                    Cell::from(t.date.clone()),
                    Cell::from(t.kind.clone()),
                    Cell::from(t.detail.clone()),
                    Cell::from(amount_cell(t.credit))
                        .style(Style::default().fg(StatusColor::Success.to_color(scheme))),
                    Cell::from(amount_cell(t.debit))
                        .style(Style::default().fg(StatusColor::Error.to_color(scheme))),
                    Cell::from(t.category_label().to_string()).style(category_style),
                ])
            })
            .collect();

        let title = if app.transactions.loading {
            format!(" {} Transactions ({}) ", app.spinner.current_frame(), visible.len())
        } else {
            format!(" Transactions ({}) ", visible.len())
        };

        let table = Table::new(
            rows,
            [
                Constraint::Length(12),
                Constraint::Length(10),
                Constraint::Min(20),
                Constraint::Length(12),
                Constraint::Length(12),
                Constraint::Length(14),
            ],
        )
        .header(header)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(FocusStyle::focused_border(scheme)))
                .title(Span::styled(
                    title,
                    Style::default()
                        .fg(Color::White)
                        .add_modifier(Modifier::BOLD),
                )),
        )
        .row_highlight_style(
            Style::default()
                .bg(Color::Cyan)
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("▶ ");

        frame.render_stateful_widget(table, chunks[1], &mut self.table_state);
    }

    fn render_filter_bar(&self, frame: &mut Frame, area: Rect, app: &App) {
        let options = month_filters(&app.transactions.items);
        let selected = options.iter().position(|f| *f == self.filter).unwrap_or(0);

        let titles: Vec<Line> = options
            .iter()
            .map(|f| Line::from(format!(" {} ", f)))
            .collect();

        let tabs = Tabs::new(titles)
            .select(selected)
            .style(Style::default().fg(Color::DarkGray))
            .highlight_style(
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
            )
            .divider(Span::styled("│", Style::default().fg(Color::DarkGray)))
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::DarkGray))
                    .title(" Month [ ] "),
            );

        frame.render_widget(tabs, area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use financer_core::TransactionId;

    fn tx(id: i64, date: &str) -> Transaction {
        Transaction {
            id: TransactionId(id),
            date: date.into(),
            kind: "Pix".into(),
            detail: "x".into(),
            credit: 0.0,
            debit: 1.0,
            category: None,
        }
    }

    fn categories() -> Vec<String> {
        ["Alimentação", "Lazer", "Outros"]
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    #[test]
    fn test_next_category_wraps() {
        let cats = categories();
        assert_eq!(next_category(None, &cats).as_deref(), Some("Alimentação"));
        assert_eq!(next_category(Some("Lazer"), &cats).as_deref(), Some("Outros"));
        assert_eq!(next_category(Some("Outros"), &cats).as_deref(), Some("Alimentação"));
        assert_eq!(next_category(Some("Unknown"), &cats).as_deref(), Some("Alimentação"));
        assert_eq!(next_category(None, &[]), None);
    }

    #[test]
    fn test_amount_cell_hides_zero() {
        assert_eq!(amount_cell(0.0), "");
        assert_eq!(amount_cell(12.5), "12.50");
    }

    #[test]
    fn test_filter_cycles_through_months() {
        let list = vec![tx(1, "2024-01-02"), tx(2, "2024-02-02"), tx(3, "2024-01-20")];
        let mut tab = TransactionsTab::new();

        tab.cycle_filter(&list, true);
        assert_eq!(tab.filter(), &MonthFilter::Month("2024-01".into()));
        tab.cycle_filter(&list, true);
        assert_eq!(tab.filter(), &MonthFilter::Month("2024-02".into()));
        tab.cycle_filter(&list, true);
        assert_eq!(tab.filter(), &MonthFilter::All);
        tab.cycle_filter(&list, false);
        assert_eq!(tab.filter(), &MonthFilter::Month("2024-02".into()));
    }

    #[test]
    fn test_vanished_month_falls_back_to_all() {
        let mut tab = TransactionsTab::new();
        tab.filter = MonthFilter::Month("2023-12".into());
        tab.reconcile(&[tx(1, "2024-01-02")]);
        assert_eq!(tab.filter(), &MonthFilter::All);
    }

    #[test]
    fn test_selection_follows_filtered_list() {
        let list = vec![tx(1, "2024-01-02"), tx(2, "2024-02-02"), tx(3, "2024-01-20")];
        let mut tab = TransactionsTab::new();
        tab.filter = MonthFilter::Month("2024-01".into());

        tab.move_selection(1, 2);
        tab.move_selection(1, 2);
        assert_eq!(tab.selected(&list).map(|t| t.id), Some(TransactionId(3)));
    }
}
