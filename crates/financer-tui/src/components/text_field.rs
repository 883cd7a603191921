//! Single-line text input used by the login, investment and import forms

use crossterm::event::KeyCode;
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

const MASK: char = '•';

/// Editable text field
#[derive(Debug, Clone, Default)]
pub struct TextField {
    pub label: String,
    pub value: String,
    /// Whether the field has keyboard focus
    pub active: bool,
    /// Render the value as bullets
    pub masked: bool,
    pub placeholder: String,
}

impl TextField {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            ..Self::default()
        }
    }

    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = placeholder.into();
        self
    }

    pub fn masked(mut self) -> Self {
        self.masked = true;
        self
    }

    pub fn clear(&mut self) {
        self.value.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }

    /// Apply an editing key. Returns true if the key was consumed.
    pub fn handle_key(&mut self, key: KeyCode) -> bool {
        match key {
            KeyCode::Char(c) => {
                self.value.push(c);
                true
            }
            KeyCode::Backspace => {
                self.value.pop();
                true
            }
            _ => false,
        }
    }

    /// Text as shown on screen
    pub fn display_value(&self) -> String {
        if self.masked {
            std::iter::repeat_n(MASK, self.value.chars().count()).collect()
        } else {
            self.value.clone()
        }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let shown = self.display_value();
        let (text, style) = if shown.is_empty() {
            (self.placeholder.clone(), Style::default().fg(Color::DarkGray))
        } else {
            (shown, Style::default().fg(Color::White))
        };

        let border_color = if self.active {
            Color::Cyan
        } else {
            Color::DarkGray
        };

        let line = Line::from(vec![
            Span::styled(text, style),
            if self.active {
                Span::styled(
                    "_",
                    Style::default()
                        .fg(Color::Cyan)
                        .add_modifier(Modifier::SLOW_BLINK),
                )
            } else {
                Span::raw("")
            },
        ]);

        let paragraph = Paragraph::new(line).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(border_color))
                .title(Span::styled(
                    format!(" {} ", self.label),
                    Style::default()
                        .fg(Color::White)
                        .add_modifier(Modifier::BOLD),
                )),
        );

        frame.render_widget(paragraph, area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_typing_and_backspace() {
        let mut field = TextField::new("Ticker");
        assert!(field.handle_key(KeyCode::Char('P')));
        assert!(field.handle_key(KeyCode::Char('4')));
        assert!(field.handle_key(KeyCode::Backspace));
        assert_eq!(field.value, "P");
        assert!(!field.handle_key(KeyCode::Enter));
    }

    #[test]
    fn test_masked_display() {
        let mut field = TextField::new("Password").masked();
        field.value = "sécret".into();
        assert_eq!(field.display_value(), "••••••");
        assert_eq!(field.value, "sécret");
    }

    #[test]
    fn test_clear() {
        let mut field = TextField::new("Path").with_placeholder("~/extrato.xlsx");
        field.value = "x".into();
        field.clear();
        assert!(field.is_empty());
        assert_eq!(field.placeholder, "~/extrato.xlsx");
    }
}
