//! Login and registration screen, shown while no session exists

use crate::app::{App, AuthMode};
use crate::components::TextField;
use crate::theme::{BaseColors, FocusStyle};
use crossterm::event::KeyCode;
use financer_core::{Alert, Credentials, Registration};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

/// Login form state
pub struct LoginScreen {
    name: TextField,
    account: TextField,
    password: TextField,
    focus: usize,
}

impl Default for LoginScreen {
    fn default() -> Self {
        Self::new()
    }
}

impl LoginScreen {
    pub fn new() -> Self {
        let mut screen = Self {
            name: TextField::new("Name"),
            account: TextField::new("Account number").with_placeholder("1234567-8"),
            password: TextField::new("Password").masked(),
            focus: 0,
        };
        screen.sync_focus(AuthMode::Login);
        screen
    }

    /// Fields shown in `mode`, in focus order
    fn field_count(mode: AuthMode) -> usize {
        match mode {
            AuthMode::Login => 2,
            AuthMode::Register => 3,
        }
    }

    fn field_mut(&mut self, mode: AuthMode, idx: usize) -> &mut TextField {
        match (mode, idx) {
            (AuthMode::Register, 0) => &mut self.name,
            (AuthMode::Register, 1) | (AuthMode::Login, 0) => &mut self.account,
            _ => &mut self.password,
        }
    }

    fn sync_focus(&mut self, mode: AuthMode) {
        self.name.active = false;
        self.account.active = false;
        self.password.active = false;
        let focus = self.focus;
        self.field_mut(mode, focus).active = true;
    }

    #[cfg(test)]
    pub(crate) fn account_value(&self) -> &str {
        &self.account.value
    }

    /// Drop the typed password once it is no longer needed
    pub fn clear_secret(&mut self) {
        self.password.clear();
    }

    pub fn handle_key(&mut self, key: KeyCode, app: &mut App) {
        let mode = app.auth_mode;
        let count = Self::field_count(mode);

        match key {
            KeyCode::Esc => app.should_quit = true,
            KeyCode::F(2) if !app.auth_pending => {
                app.auth_mode = match mode {
                    AuthMode::Login => AuthMode::Register,
                    AuthMode::Register => AuthMode::Login,
                };
                self.focus = 0;
                self.sync_focus(app.auth_mode);
            }
            KeyCode::Tab | KeyCode::Down => {
                self.focus = (self.focus + 1) % count;
                self.sync_focus(mode);
            }
            KeyCode::BackTab | KeyCode::Up => {
                self.focus = (self.focus + count - 1) % count;
                self.sync_focus(mode);
            }
            KeyCode::Enter if !app.auth_pending => self.submit(app),
            other => {
                let focus = self.focus.min(count - 1);
                self.field_mut(mode, focus).handle_key(other);
            }
        }
    }

    /// Validate locally; only well-formed requests reach the server
    fn submit(&mut self, app: &mut App) {
        match app.auth_mode {
            AuthMode::Login => match Credentials::new(&self.account.value, &self.password.value) {
                Ok(credentials) => app.submit_login(credentials),
                Err(e) => app.notify(Alert::from_core_error("Login", "Invalid credentials", &e)),
            },
            AuthMode::Register => {
                match Registration::new(&self.name.value, &self.account.value, &self.password.value) {
                    Ok(registration) => {
                        app.submit_registration(registration);
                        self.clear_secret();
                    }
                    Err(e) => {
                        app.notify(Alert::from_core_error("Register", "Invalid registration", &e))
                    }
                }
            }
        }
    }

    pub fn render(&mut self, frame: &mut Frame, area: Rect, app: &App) {
        let scheme = app.color_scheme;
        let mode = app.auth_mode;
        self.focus = self.focus.min(Self::field_count(mode) - 1);

        let height = 6 + 3 * Self::field_count(mode) as u16;
        let popup = centered(area, 50, height);
        frame.render_widget(Clear, popup);

        let title = match mode {
            AuthMode::Login => " ◈ financer │ Login ",
            AuthMode::Register => " ◈ financer │ Register ",
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(FocusStyle::focused_border(scheme)))
            .title(Span::styled(
                title,
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            ));
        let inner = block.inner(popup);
        frame.render_widget(block, popup);

        let mut constraints = vec![Constraint::Length(3); Self::field_count(mode)];
        constraints.push(Constraint::Length(1));
        constraints.push(Constraint::Length(1));
        constraints.push(Constraint::Min(0));
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .margin(1)
            .constraints(constraints)
            .split(inner);

        let fields: Vec<&TextField> = match mode {
            AuthMode::Login => vec![&self.account, &self.password],
            AuthMode::Register => vec![&self.name, &self.account, &self.password],
        };
        for (field, row) in fields.iter().zip(rows.iter()) {
            field.render(frame, *row);
        }

        let status_row = rows[fields.len() + 1];
        if app.auth_pending {
            let label = match mode {
                AuthMode::Login => "Signing in...",
                AuthMode::Register => "Creating account...",
            };
            frame.render_widget(
                Paragraph::new(app.spinner.line(label)).alignment(Alignment::Center),
                status_row,
            );
        } else {
            let switch = match mode {
                AuthMode::Login => "F2 create account",
                AuthMode::Register => "F2 back to login",
            };
            let hint = Line::from(vec![Span::styled(
                format!("Enter submit │ Tab next │ {} │ Esc quit", switch),
                Style::default().fg(BaseColors::muted(scheme)),
            )]);
            frame.render_widget(Paragraph::new(hint).alignment(Alignment::Center), status_row);
        }
    }
}

/// Rect of `width` percent and `height` rows centered in `area`
fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let height = height.min(area.height);
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),
            Constraint::Length(height),
            Constraint::Min(0),
        ])
        .split(area);
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - width) / 2),
            Constraint::Percentage(width),
            Constraint::Percentage((100 - width) / 2),
        ])
        .split(vertical[1])[1]
}

#[cfg(test)]
mod tests {
    use super::*;
    use financer_core::{FinanceClient, FinancerConfig};

    fn app() -> App {
        let client = FinanceClient::new("http://127.0.0.1:9").unwrap();
        App::new(client, &FinancerConfig::default())
    }

    fn type_text(screen: &mut LoginScreen, app: &mut App, text: &str) {
        for c in text.chars() {
            screen.handle_key(KeyCode::Char(c), app);
        }
    }

    #[test]
    fn test_typing_fills_focused_field() {
        let mut app = app();
        let mut screen = LoginScreen::new();

        type_text(&mut screen, &mut app, "1234567-8");
        screen.handle_key(KeyCode::Tab, &mut app);
        type_text(&mut screen, &mut app, "qwerty");

        assert_eq!(screen.account.value, "1234567-8");
        assert_eq!(screen.password.value, "qwerty");
        assert!(!app.should_quit);
    }

    #[test]
    fn test_f2_switches_to_register_and_focuses_name() {
        let mut app = app();
        let mut screen = LoginScreen::new();

        screen.handle_key(KeyCode::F(2), &mut app);
        assert_eq!(app.auth_mode, AuthMode::Register);
        assert!(screen.name.active);

        type_text(&mut screen, &mut app, "Ana");
        assert_eq!(screen.name.value, "Ana");

        screen.handle_key(KeyCode::F(2), &mut app);
        assert_eq!(app.auth_mode, AuthMode::Login);
        assert!(screen.account.active);
    }

    #[test]
    fn test_invalid_login_stays_local() {
        let mut app = app();
        let mut screen = LoginScreen::new();

        screen.handle_key(KeyCode::Enter, &mut app);
        assert!(!app.auth_pending);
        assert_eq!(app.toast_manager.len(), 1);
    }

    #[test]
    fn test_focus_wraps_in_login_mode() {
        let mut app = app();
        let mut screen = LoginScreen::new();
        screen.handle_key(KeyCode::Tab, &mut app);
        screen.handle_key(KeyCode::Tab, &mut app);
        assert!(screen.account.active);
        screen.handle_key(KeyCode::BackTab, &mut app);
        assert!(screen.password.active);
    }

    #[test]
    fn test_esc_quits() {
        let mut app = app();
        let mut screen = LoginScreen::new();
        screen.handle_key(KeyCode::Esc, &mut app);
        assert!(app.should_quit);
    }
}
