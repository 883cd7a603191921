//! Reusable empty state components with actionable hints
//!
//! "No data" is rendered distinctly from "loading" on every tab.

use ratatui::{
    layout::Alignment,
    style::{Color, Style},
    text::{Line, Span},
    widgets::Paragraph,
};

/// Builder for empty state messages
pub struct EmptyState {
    title: String,
    message: Vec<String>,
    actions: Vec<(String, String)>, // (key, description)
}

impl EmptyState {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            message: Vec::new(),
            actions: Vec::new(),
        }
    }

    pub fn message(mut self, msg: impl Into<String>) -> Self {
        self.message.push(msg.into());
        self
    }

    /// Add an action hint
    pub fn action(mut self, key: impl Into<String>, description: impl Into<String>) -> Self {
        self.actions.push((key.into(), description.into()));
        self
    }

    /// Number of lines the built paragraph occupies
    pub fn height(&self) -> usize {
        let actions = if self.actions.is_empty() {
            0
        } else {
            2 + self.actions.len()
        };
        3 + self.message.len() + actions
    }

    pub fn build(self) -> Paragraph<'static> {
        let mut lines = vec![
            Line::from(""),
            Line::from(Span::styled(self.title, Style::default().fg(Color::Yellow))),
            Line::from(""),
        ];

        for msg in self.message {
            lines.push(Line::from(Span::styled(
                msg,
                Style::default().fg(Color::DarkGray),
            )));
        }

        if !self.actions.is_empty() {
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                "Actions:",
                Style::default().fg(Color::Cyan),
            )));

            for (key, desc) in self.actions {
                lines.push(Line::from(vec![
                    Span::styled("  [", Style::default().fg(Color::DarkGray)),
                    Span::styled(key, Style::default().fg(Color::Green)),
                    Span::styled("] ", Style::default().fg(Color::DarkGray)),
                    Span::styled(desc, Style::default().fg(Color::White)),
                ]));
            }
        }

        Paragraph::new(lines).alignment(Alignment::Center)
    }
}

pub fn no_balances() -> Paragraph<'static> {
    EmptyState::new("No Data")
        .message("No monthly balances yet")
        .message("")
        .message("Import a bank statement to populate the dashboard")
        .action("4", "Go to Import")
        .action("F5", "Refresh")
        .build()
}

pub fn no_transactions(filter: &str) -> Paragraph<'static> {
    let state = if filter == "all" {
        EmptyState::new("No Transactions").message("Nothing imported yet")
    } else {
        EmptyState::new("No Transactions").message(format!("No transactions in {}", filter))
    };

    state
        .action("[ ]", "Change month")
        .action("F5", "Refresh")
        .build()
}

pub fn no_investments() -> Paragraph<'static> {
    EmptyState::new("No Investments")
        .message("Your ledger is empty")
        .action("i", "Add an investment")
        .action("F5", "Refresh")
        .build()
}

pub fn no_file_selected() -> Paragraph<'static> {
    EmptyState::new("No File Selected")
        .message("Choose a bank statement spreadsheet (.xlsx)")
        .action("o", "Type a file path")
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_state_height() {
        let state = EmptyState::new("Title")
            .message("one")
            .message("two")
            .action("r", "Refresh");
        assert_eq!(state.height(), 3 + 2 + 3);
        let _ = state.build();
    }

    #[test]
    fn test_predefined_states() {
        let _ = no_balances();
        let _ = no_transactions("all");
        let _ = no_transactions("2024-01");
        let _ = no_investments();
        let _ = no_file_selected();
    }
}
