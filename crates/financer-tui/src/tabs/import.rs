//! Import tab - pick a local `.xlsx` statement and upload it

use crate::app::App;
use crate::components::TextField;
use crate::empty_state;
use crate::theme::{BaseColors, FocusStyle, StatusColor};
use crossterm::event::KeyCode;
use financer_core::{Alert, SelectedFile};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// Import tab state
pub struct ImportTab {
    path: TextField,
    editing: bool,
}

impl Default for ImportTab {
    fn default() -> Self {
        Self::new()
    }
}

impl ImportTab {
    pub fn new() -> Self {
        Self {
            path: TextField::new("Statement path").with_placeholder("~/Downloads/extrato.xlsx"),
            editing: false,
        }
    }

    pub fn is_editing(&self) -> bool {
        self.editing
    }

    fn set_editing(&mut self, editing: bool) {
        self.editing = editing;
        self.path.active = editing;
    }

    pub fn handle_key(&mut self, key: KeyCode, app: &mut App) {
        if self.editing {
            match key {
                KeyCode::Esc => self.set_editing(false),
                KeyCode::Enter => self.select(app),
                other => {
                    self.path.handle_key(other);
                }
            }
            return;
        }

        match key {
            KeyCode::Char('o') => self.set_editing(true),
            KeyCode::Char('s') | KeyCode::Enter if !app.upload_pending => app.submit_upload(),
            KeyCode::Char('x') if !app.upload_pending => app.import.clear(),
            _ => {}
        }
    }

    /// Validate the typed path and make it the pending file
    fn select(&mut self, app: &mut App) {
        let typed = normalize_path(&self.path.value);
        match SelectedFile::from_path(&typed) {
            Ok(file) => {
                let name = file.file_name.clone();
                app.import.select(file);
                app.notify(Alert::info("Import", format!("Selected {}", name)));
                self.path.clear();
                self.set_editing(false);
            }
            Err(e) => app.notify(Alert::from_core_error("Import", "Invalid file", &e)),
        }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect, app: &App) {
        let scheme = app.color_scheme;
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .margin(1)
            .constraints([
                Constraint::Length(3),
                Constraint::Min(6),
                Constraint::Length(1),
            ])
            .split(area);

        self.path.render(frame, chunks[0]);

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(FocusStyle::border(!self.editing, scheme)))
            .title(Span::styled(
                " ⇪ Bank Statement ",
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            ));
        let inner = block.inner(chunks[1]);
        frame.render_widget(block, chunks[1]);

        match app.import.selected() {
            None => frame.render_widget(empty_state::no_file_selected(), inner),
            Some(file) => {
                let mut lines = vec![
                    Line::from(vec![
                        Span::styled("File: ", Style::default().fg(BaseColors::muted(scheme))),
                        Span::styled(
                            file.file_name.clone(),
                            Style::default()
                                .fg(StatusColor::Focus.to_color(scheme))
                                .add_modifier(Modifier::BOLD),
                        ),
                    ]),
                    Line::from(vec![
                        Span::styled("Path: ", Style::default().fg(BaseColors::muted(scheme))),
                        Span::raw(file.path.display().to_string()),
                    ]),
                    Line::from(""),
                ];
                if app.upload_pending {
                    lines.push(app.spinner.line("Sending statement..."));
                } else {
                    lines.push(Line::from(Span::styled(
                        "Press s to import",
                        Style::default().fg(StatusColor::Success.to_color(scheme)),
                    )));
                }
                frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), inner);
            }
        }

        let hint = if self.editing {
            "Enter select │ Esc cancel"
        } else {
            "o type path │ s import │ x clear"
        };
        frame.render_widget(
            Paragraph::new(Span::styled(
                hint,
                Style::default().fg(BaseColors::muted(scheme)),
            ))
            .alignment(Alignment::Center),
            chunks[2],
        );
    }
}

/// Strip surrounding whitespace and the quotes terminals add on drag-and-drop
fn normalize_path(raw: &str) -> String {
    raw.trim()
        .trim_matches(|c| c == '\'' || c == '"')
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_path_strips_quotes() {
        assert_eq!(normalize_path("  '/tmp/a b.xlsx' "), "/tmp/a b.xlsx");
        assert_eq!(normalize_path("\"/tmp/x.xlsx\""), "/tmp/x.xlsx");
        assert_eq!(normalize_path("/tmp/y.xlsx"), "/tmp/y.xlsx");
    }

    #[test]
    fn test_editing_toggles_field_focus() {
        let mut tab = ImportTab::new();
        tab.set_editing(true);
        assert!(tab.is_editing());
        assert!(tab.path.active);
        tab.set_editing(false);
        assert!(!tab.path.active);
    }

    #[test]
    fn test_enter_selects_typed_xlsx() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("jan.xlsx");
        std::fs::write(&path, b"PK").unwrap();

        let client = financer_core::FinanceClient::new("http://127.0.0.1:9").unwrap();
        let mut app = App::new(client, &financer_core::FinancerConfig::default());
        let mut tab = ImportTab::new();

        tab.handle_key(KeyCode::Char('o'), &mut app);
        tab.path.value = format!("'{}'", path.display());
        tab.handle_key(KeyCode::Enter, &mut app);

        assert!(!tab.is_editing());
        assert!(tab.path.is_empty());
        assert_eq!(app.import.selected().map(|f| f.file_name.as_str()), Some("jan.xlsx"));
    }

    #[test]
    fn test_rejected_path_keeps_editing() {
        let client = financer_core::FinanceClient::new("http://127.0.0.1:9").unwrap();
        let mut app = App::new(client, &financer_core::FinancerConfig::default());
        let mut tab = ImportTab::new();

        tab.set_editing(true);
        tab.path.value = "/nonexistent/statement.csv".into();
        tab.handle_key(KeyCode::Enter, &mut app);

        assert!(tab.is_editing());
        assert!(app.import.is_empty());
        assert_eq!(app.toast_manager.len(), 1);
    }
}
