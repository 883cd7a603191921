//! Animated spinner for in-flight requests

use ratatui::{
    style::{Color, Style},
    text::{Line, Span},
};
use std::time::{Duration, Instant};

/// Braille animation frames
const FRAMES: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

#[derive(Debug)]
pub struct Spinner {
    current_frame: usize,
    last_update: Instant,
    frame_duration: Duration,
    color: Color,
}

impl Default for Spinner {
    fn default() -> Self {
        Self::new()
    }
}

impl Spinner {
    pub fn new() -> Self {
        Self {
            current_frame: 0,
            last_update: Instant::now(),
            frame_duration: Duration::from_millis(80),
            color: Color::Cyan,
        }
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    /// Advance the animation (call once per frame)
    pub fn tick(&mut self) {
        let now = Instant::now();
        if now.duration_since(self.last_update) >= self.frame_duration {
            self.current_frame = (self.current_frame + 1) % FRAMES.len();
            self.last_update = now;
        }
    }

    pub fn current_frame(&self) -> &'static str {
        FRAMES[self.current_frame]
    }

    /// Spinner frame followed by `label`
    pub fn line(&self, label: impl Into<String>) -> Line<'static> {
        Line::from(vec![
            Span::styled(self.current_frame(), Style::default().fg(self.color)),
            Span::raw(" "),
            Span::styled(label.into(), Style::default().fg(Color::White)),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spinner_cycles() {
        let mut spinner = Spinner::new();
        assert_eq!(spinner.current_frame(), "⠋");

        spinner.tick();
        // Frame may or may not advance depending on timing
        assert!(FRAMES.contains(&spinner.current_frame()));
    }

    #[test]
    fn test_line_contains_label() {
        let spinner = Spinner::new().with_color(Color::Yellow);
        let line = spinner.line("Loading transactions...");
        assert_eq!(line.spans.len(), 3);
        assert_eq!(line.spans[2].content, "Loading transactions...");
        assert_eq!(spinner.color, Color::Yellow);
    }
}
