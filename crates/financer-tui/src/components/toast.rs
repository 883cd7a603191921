//! Toast notifications for alerts

use crate::theme::StatusColor;
use financer_core::config::ColorScheme;
use financer_core::{Alert, Severity};
use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};
use std::time::{Duration, Instant};

const MAX_VISIBLE: usize = 4;

fn icon(severity: Severity) -> &'static str {
    match severity {
        Severity::Success => "✓",
        Severity::Warning => "⚠",
        Severity::Error => "✗",
        Severity::Info => "ℹ",
    }
}

/// Single toast message
#[derive(Debug, Clone)]
pub struct Toast {
    pub message: String,
    pub severity: Severity,
    pub created_at: Instant,
    pub duration: Duration,
}

impl Toast {
    pub fn new(message: impl Into<String>, severity: Severity) -> Self {
        // Errors stay up longer
        let secs = if severity == Severity::Error { 6 } else { 3 };
        Self {
            message: message.into(),
            severity,
            created_at: Instant::now(),
            duration: Duration::from_secs(secs),
        }
    }

    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    pub fn is_expired(&self) -> bool {
        self.created_at.elapsed() > self.duration
    }
}

impl From<Alert> for Toast {
    fn from(alert: Alert) -> Self {
        Toast::new(alert.to_string(), alert.severity)
    }
}

/// Stack of live toasts
#[derive(Debug, Default)]
pub struct ToastManager {
    toasts: Vec<Toast>,
}

impl ToastManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, toast: impl Into<Toast>) {
        self.toasts.push(toast.into());
    }

    pub fn clear_expired(&mut self) {
        self.toasts.retain(|t| !t.is_expired());
    }

    pub fn len(&self) -> usize {
        self.toasts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.toasts.is_empty()
    }

    pub fn latest(&self) -> Option<&Toast> {
        self.toasts.last()
    }

    /// Render the newest toasts stacked above the status bar
    pub fn render(&mut self, frame: &mut Frame, area: Rect, scheme: ColorScheme) {
        self.clear_expired();
        if self.toasts.is_empty() {
            return;
        }

        let skip = self.toasts.len().saturating_sub(MAX_VISIBLE);
        let visible = &self.toasts[skip..];

        let toast_height: u16 = 3;
        let mut y_offset =
            area.height
                .saturating_sub(visible.len() as u16 * toast_height + 2);

        for toast in visible {
            let toast_width = (toast.message.chars().count() + 6).min(area.width as usize) as u16;
            let x_offset = area.width.saturating_sub(toast_width) / 2;

            let toast_area = Rect {
                x: area.x + x_offset,
                y: area.y + y_offset,
                width: toast_width,
                height: toast_height.min(area.height),
            };

            render_single_toast(frame, toast_area, toast, scheme);
            y_offset += toast_height;
        }
    }
}

fn render_single_toast(frame: &mut Frame, area: Rect, toast: &Toast, scheme: ColorScheme) {
    let color = StatusColor::from_severity(toast.severity).to_color(scheme);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(color));

    let inner = block.inner(area);
    frame.render_widget(Clear, area);
    frame.render_widget(block, area);

    let content = Line::from(vec![
        Span::styled(
            format!("{} ", icon(toast.severity)),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        ),
        Span::styled(toast.message.as_str(), Style::default().fg(Color::White)),
    ]);

    frame.render_widget(Paragraph::new(content).alignment(Alignment::Center), inner);
}
