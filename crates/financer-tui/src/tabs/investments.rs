//! Investments tab - add form and ledger list

use crate::app::App;
use crate::components::TextField;
use crate::empty_state;
use crate::theme::{AmountColor, BaseColors, FocusStyle, StatusColor};
use crossterm::event::KeyCode;
use financer_core::models::amount::format_currency;
use financer_core::models::investment::portfolio_total;
use financer_core::{Alert, Investment, NewInvestment};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};

const FIELD_COUNT: usize = 3;

/// Investments tab state
pub struct InvestmentsTab {
    ticker: TextField,
    balance: TextField,
    description: TextField,
    /// Form has keyboard focus
    editing: bool,
    focus: usize,
    list_state: ListState,
}

impl Default for InvestmentsTab {
    fn default() -> Self {
        Self::new()
    }
}

impl InvestmentsTab {
    pub fn new() -> Self {
        Self {
            ticker: TextField::new("Ticker").with_placeholder("PETR4"),
            balance: TextField::new("Balance").with_placeholder("1500.00"),
            description: TextField::new("Description (optional)"),
            editing: false,
            focus: 0,
            list_state: ListState::default(),
        }
    }

    pub fn is_editing(&self) -> bool {
        self.editing
    }

    fn field_mut(&mut self, idx: usize) -> &mut TextField {
        match idx {
            0 => &mut self.ticker,
            1 => &mut self.balance,
            _ => &mut self.description,
        }
    }

    fn set_editing(&mut self, editing: bool) {
        self.editing = editing;
        if !editing {
            self.focus = 0;
        }
        self.sync_focus();
    }

    fn sync_focus(&mut self) {
        let (focus, editing) = (self.focus, self.editing);
        for idx in 0..FIELD_COUNT {
            self.field_mut(idx).active = editing && idx == focus;
        }
    }

    fn clear_form(&mut self) {
        self.ticker.clear();
        self.balance.clear();
        self.description.clear();
    }

    pub fn handle_key(&mut self, key: KeyCode, app: &mut App) {
        if self.editing {
            match key {
                KeyCode::Esc => self.set_editing(false),
                KeyCode::Tab | KeyCode::Down => {
                    self.focus = (self.focus + 1) % FIELD_COUNT;
                    self.sync_focus();
                }
                KeyCode::BackTab | KeyCode::Up => {
                    self.focus = (self.focus + FIELD_COUNT - 1) % FIELD_COUNT;
                    self.sync_focus();
                }
                KeyCode::Enter => self.submit(app),
                other => {
                    let focus = self.focus;
                    self.field_mut(focus).handle_key(other);
                }
            }
            return;
        }

        let len = app.investments.items.len();
        match key {
            KeyCode::Char('i') => self.set_editing(true),
            KeyCode::Down | KeyCode::Char('j') => self.move_selection(1, len),
            KeyCode::Up | KeyCode::Char('k') => self.move_selection(-1, len),
            KeyCode::Char('d') | KeyCode::Delete => self.remove_selected(app),
            _ => {}
        }
    }

    fn move_selection(&mut self, delta: i32, len: usize) {
        if len == 0 {
            self.list_state.select(None);
            return;
        }
        let current = self.list_state.selected().map(|i| i as i32).unwrap_or(-1);
        let next = (current + delta).clamp(0, len as i32 - 1) as usize;
        self.list_state.select(Some(next));
    }

    /// Validate locally; a valid form is sent and cleared right away
    fn submit(&mut self, app: &mut App) {
        match NewInvestment::parse(&self.ticker.value, &self.balance.value, &self.description.value) {
            Ok(investment) => {
                app.submit_investment(investment);
                self.clear_form();
                self.set_editing(false);
            }
            Err(e) => app.notify(Alert::from_core_error("Investments", "Invalid investment", &e)),
        }
    }

    fn remove_selected(&mut self, app: &mut App) {
        let selected = self
            .list_state
            .selected()
            .and_then(|i| app.investments.items.get(i))
            .map(|inv| inv.id);
        match selected {
            Some(id) => {
                app.remove_investment(id);
                self.list_state.select(None);
            }
            None => app.notify(Alert::info("Investments", "Select an investment first")),
        }
    }

    pub fn render(&mut self, frame: &mut Frame, area: Rect, app: &App) {
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(35), Constraint::Percentage(65)])
            .split(area);

        self.render_form(frame, chunks[0], app);
        self.render_ledger(frame, chunks[1], app);
    }

    fn render_form(&self, frame: &mut Frame, area: Rect, app: &App) {
        let scheme = app.color_scheme;
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(FocusStyle::border(self.editing, scheme)))
            .title(Span::styled(
                " + New Investment ",
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            ));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .margin(1)
            .constraints([
                Constraint::Length(3),
                Constraint::Length(3),
                Constraint::Length(3),
                Constraint::Length(2),
                Constraint::Min(0),
            ])
            .split(inner);

        self.ticker.render(frame, rows[0]);
        self.balance.render(frame, rows[1]);
        self.description.render(frame, rows[2]);

        let hint = if self.editing {
            "Tab next field │ Enter add │ Esc cancel"
        } else {
            "i edit form"
        };
        frame.render_widget(
            Paragraph::new(Span::styled(
                hint,
                Style::default().fg(BaseColors::muted(scheme)),
            ))
            .alignment(Alignment::Center),
            rows[3],
        );
    }

    fn render_ledger(&mut self, frame: &mut Frame, area: Rect, app: &App) {
        let scheme = app.color_scheme;
        let investments = &app.investments.items;

        if app.investments.loading && !app.investments.fetched {
            let loading = Paragraph::new(app.spinner.line("Loading investments..."))
                .alignment(Alignment::Center)
                .block(Block::default().borders(Borders::ALL));
            frame.render_widget(loading, area);
            return;
        }

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(FocusStyle::border(!self.editing, scheme)))
            .title(Span::styled(
                ledger_title(investments, app.investments.loading, app.spinner.current_frame()),
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            ));

        if app.investments.is_empty_result() {
            let inner = block.inner(area);
            frame.render_widget(block, area);
            frame.render_widget(empty_state::no_investments(), inner);
            return;
        }

        let items: Vec<ListItem> = investments
            .iter()
            .map(|inv| {
                ListItem::new(Line::from(vec![
                    Span::styled(
                        format!("{:<10}", inv.ticker),
                        Style::default().fg(StatusColor::Focus.to_color(scheme)),
                    ),
                    Span::raw(format!("{:<28}", inv.display_name())),
                    Span::styled(
                        format_currency(inv.balance),
                        Style::default().fg(AmountColor::from_amount(inv.balance).to_color(scheme)),
                    ),
                ]))
            })
            .collect();

        let list = List::new(items)
            .block(block)
            .highlight_style(
                Style::default()
                    .bg(Color::Cyan)
                    .fg(Color::Black)
                    .add_modifier(Modifier::BOLD),
            )
            .highlight_symbol("▶ ");

        frame.render_stateful_widget(list, area, &mut self.list_state);
    }
}

fn ledger_title(investments: &[Investment], loading: bool, frame: &str) -> String {
    let total = format_currency(portfolio_total(investments));
    if loading {
        format!(" {} Ledger ({}) │ {} ", frame, investments.len(), total)
    } else {
        format!(" Ledger ({}) │ {} ", investments.len(), total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use financer_core::InvestmentId;

    #[test]
    fn test_focus_cycles_through_fields() {
        let mut tab = InvestmentsTab::new();
        tab.set_editing(true);
        assert!(tab.ticker.active);

        tab.focus = (tab.focus + 1) % FIELD_COUNT;
        tab.sync_focus();
        assert!(!tab.ticker.active);
        assert!(tab.balance.active);

        tab.set_editing(false);
        assert!(!tab.balance.active);
        assert_eq!(tab.focus, 0);
    }

    #[test]
    fn test_ledger_title_shows_total() {
        let investments = vec![Investment {
            id: InvestmentId(1),
            ticker: "PETR4".into(),
            balance: 1500.5,
            description: None,
        }];
        assert_eq!(
            ledger_title(&investments, false, "⠋"),
            " Ledger (1) │ R$ 1500.50 "
        );
        assert!(ledger_title(&investments, true, "⠋").contains("⠋"));
    }

    #[test]
    fn test_selection_on_empty_list() {
        let mut tab = InvestmentsTab::new();
        tab.move_selection(1, 0);
        assert_eq!(tab.list_state.selected(), None);
        tab.move_selection(1, 3);
        assert_eq!(tab.list_state.selected(), Some(0));
    }
}
