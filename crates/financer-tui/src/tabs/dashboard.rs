//! Dashboard tab - grand total, MEI alert, monthly balances

use crate::app::App;
use crate::empty_state;
use crate::theme::{AmountColor, FocusStyle, MeiAlertStyle, StatusColor};
use crossterm::event::KeyCode;
use financer_core::aggregate::{dashboard_mei_alert, grand_total};
use financer_core::config::ColorScheme;
use financer_core::models::amount::format_currency;
use financer_core::MonthlyBalance;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols,
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Sparkline, Table, TableState},
    Frame,
};

/// Dashboard tab state
pub struct DashboardTab {
    table_state: TableState,
}

impl Default for DashboardTab {
    fn default() -> Self {
        Self::new()
    }
}

impl DashboardTab {
    pub fn new() -> Self {
        Self {
            table_state: TableState::default(),
        }
    }

    pub fn handle_key(&mut self, key: KeyCode, month_count: usize) {
        match key {
            KeyCode::Down | KeyCode::Char('j') => self.move_selection(1, month_count),
            KeyCode::Up | KeyCode::Char('k') => self.move_selection(-1, month_count),
            _ => {}
        }
    }

    fn move_selection(&mut self, delta: i32, len: usize) {
        if len == 0 {
            self.table_state.select(None);
            return;
        }
        let current = self.table_state.selected().unwrap_or(0) as i32;
        let next = (current + delta).clamp(0, len as i32 - 1) as usize;
        self.table_state.select(Some(next));
    }

    pub fn render(&mut self, frame: &mut Frame, area: Rect, app: &App) {
        let scheme = app.color_scheme;
        let balances = &app.balances.items;

        if app.balances.loading && !app.balances.fetched {
            let loading = Paragraph::new(app.spinner.line("Loading dashboard..."))
                .alignment(Alignment::Center);
            frame.render_widget(loading, centered_row(area));
            return;
        }

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .margin(1)
            .constraints([
                Constraint::Length(5), // Stat cards
                Constraint::Length(1), // MEI alert
                Constraint::Length(6), // Credit sparkline
                Constraint::Min(5),    // Monthly table
            ])
            .split(area);

        self.render_stats_row(frame, chunks[0], balances, scheme);
        render_mei_alert(frame, chunks[1], balances, scheme);
        render_credit_trend(frame, chunks[2], balances, scheme);

        if app.balances.is_empty_result() {
            frame.render_widget(empty_state::no_balances(), chunks[3]);
        } else {
            self.render_months(frame, chunks[3], balances, scheme);
        }
    }

    fn render_stats_row(
        &self,
        frame: &mut Frame,
        area: Rect,
        balances: &[MonthlyBalance],
        scheme: ColorScheme,
    ) {
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage(34),
                Constraint::Percentage(22),
                Constraint::Percentage(22),
                Constraint::Percentage(22),
            ])
            .split(area);

        let total = grand_total(balances);
        let credit: f64 = balances.iter().map(MonthlyBalance::credit_or_zero).sum();
        let debit: f64 = balances.iter().map(MonthlyBalance::debit_or_zero).sum();

        render_stat_card(
            frame,
            chunks[0],
            "◆ Total Balance",
            &format_currency(total),
            AmountColor::from_amount(total).to_color(scheme),
        );
        render_stat_card(
            frame,
            chunks[1],
            "● Months",
            &balances.len().to_string(),
            StatusColor::Focus.to_color(scheme),
        );
        render_stat_card(
            frame,
            chunks[2],
            "▲ Credits",
            &format_currency(credit),
            StatusColor::Success.to_color(scheme),
        );
        render_stat_card(
            frame,
            chunks[3],
            "▼ Debits",
            &format_currency(debit),
            StatusColor::Error.to_color(scheme),
        );
    }

    fn render_months(
        &mut self,
        frame: &mut Frame,
        area: Rect,
        balances: &[MonthlyBalance],
        scheme: ColorScheme,
    ) {
        let header = Row::new(["Month", "Credit", "Debit", "Balance"]).style(
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        );

        let rows: Vec<Row> = balances
            .iter()
            .map(|b| {
                let balance = b.balance_or_zero();
                Row::new(vec![
                    Cell::from(b.display_month()),
                    Cell::from(format_currency(b.credit_or_zero()))
                        .style(Style::default().fg(StatusColor::Success.to_color(scheme))),
                    Cell::from(format_currency(b.debit_or_zero()))
                        .style(Style::default().fg(StatusColor::Error.to_color(scheme))),
                    Cell::from(format_currency(balance)).style(
                        Style::default().fg(AmountColor::from_amount(balance).to_color(scheme)),
                    ),
                ])
            })
            .collect();

        let table = Table::new(
            rows,
            [
                Constraint::Percentage(25),
                Constraint::Percentage(25),
                Constraint::Percentage(25),
                Constraint::Percentage(25),
            ],
        )
        .header(header)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(FocusStyle::focused_border(scheme)))
                .title(Span::styled(
                    format!(" ≡ Monthly Balances ({}) ", balances.len()),
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

        frame.render_stateful_widget(table, area, &mut self.table_state);
    }
}

fn render_stat_card(frame: &mut Frame, area: Rect, title: &str, value: &str, color: Color) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(Span::styled(
            format!(" {} ", title),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        ));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let value_widget = Paragraph::new(Line::from(Span::styled(
        value.to_string(),
        Style::default().fg(color).add_modifier(Modifier::BOLD),
    )))
    .alignment(Alignment::Center);
    frame.render_widget(value_widget, centered_row(inner));
}

fn render_mei_alert(frame: &mut Frame, area: Rect, balances: &[MonthlyBalance], scheme: ColorScheme) {
    let line = match dashboard_mei_alert(balances) {
        Some((year, alert)) => {
            let color = MeiAlertStyle::to_color(&alert, scheme);
            Line::from(vec![
                Span::styled(
                    format!(" {} MEI {} ", MeiAlertStyle::icon(&alert), year),
                    Style::default().fg(color).add_modifier(Modifier::BOLD),
                ),
                Span::styled(alert.message(), Style::default().fg(color)),
            ])
        }
        None => Line::from(Span::styled(
            " MEI revenue within limit",
            Style::default().fg(Color::DarkGray),
        )),
    };
    frame.render_widget(Paragraph::new(line), area);
}

fn render_credit_trend(
    frame: &mut Frame,
    area: Rect,
    balances: &[MonthlyBalance],
    scheme: ColorScheme,
) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(Span::styled(
            " ≡ Monthly Credits ",
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        ));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let data = expand_data(&credit_series(balances), inner.width as usize);
    let sparkline = Sparkline::default()
        .data(&data)
        .style(Style::default().fg(StatusColor::Success.to_color(scheme)))
        .bar_set(symbols::bar::NINE_LEVELS);
    frame.render_widget(sparkline, inner);
}

/// Whole-currency credits per month, in dashboard order
fn credit_series(balances: &[MonthlyBalance]) -> Vec<u64> {
    balances
        .iter()
        .map(|b| b.credit_or_zero().max(0.0).round() as u64)
        .collect()
}

/// Repeat each value so the series fills `target_width` columns
fn expand_data(data: &[u64], target_width: usize) -> Vec<u64> {
    if data.is_empty() || target_width == 0 {
        return vec![0; target_width.max(1)];
    }

    let repeat_factor = target_width / data.len();
    let remainder = target_width % data.len();

    let mut expanded = Vec::with_capacity(target_width);
    for (i, &val) in data.iter().enumerate() {
        let repeats = repeat_factor + usize::from(i < remainder);
        expanded.extend(std::iter::repeat_n(val, repeats));
    }
    expanded
}

/// Middle row of `area`
fn centered_row(area: Rect) -> Rect {
    Rect {
        y: area.y + area.height / 2,
        height: area.height.min(1),
        ..area
    }
}
