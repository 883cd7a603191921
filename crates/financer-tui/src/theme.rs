//! Unified theme and color system for financer TUI
//!
//! Color language shared by all tabs:
//! - Green: credit, success, healthy balance
//! - Red: debit, error, negative balance
//! - Yellow: warning, approaching a limit
//! - Cyan: selected, focus, interactive

use financer_core::aggregate::MeiAlert;
use financer_core::config::ColorScheme;
use financer_core::Severity;
use ratatui::style::Color;

/// Status color palette
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusColor {
    Success,
    Error,
    Warning,
    /// Gray: empty, disabled, neutral
    Neutral,
    /// Cyan: selected, focus, interactive
    Focus,
    /// Magenta: totals and headline numbers
    Important,
}

impl StatusColor {
    /// Convert to Ratatui Color based on color scheme
    pub fn to_color(self, scheme: ColorScheme) -> Color {
        match scheme {
            ColorScheme::Dark => match self {
                StatusColor::Success => Color::Green,
                StatusColor::Error => Color::Red,
                StatusColor::Warning => Color::Yellow,
                StatusColor::Neutral => Color::DarkGray,
                StatusColor::Focus => Color::Cyan,
                StatusColor::Important => Color::Magenta,
            },
            ColorScheme::Light => match self {
                StatusColor::Success => Color::Rgb(0, 128, 0),
                StatusColor::Error => Color::Rgb(200, 0, 0),
                StatusColor::Warning => Color::Rgb(180, 120, 0),
                StatusColor::Neutral => Color::Gray,
                StatusColor::Focus => Color::Rgb(0, 128, 128),
                StatusColor::Important => Color::Rgb(128, 0, 128),
            },
        }
    }

    pub fn from_severity(severity: Severity) -> Self {
        match severity {
            Severity::Success => StatusColor::Success,
            Severity::Info => StatusColor::Focus,
            Severity::Warning => StatusColor::Warning,
            Severity::Error => StatusColor::Error,
        }
    }
}

/// Sign-based color for money amounts
pub enum AmountColor {
    Positive,
    Negative,
    Zero,
}

impl AmountColor {
    pub fn from_amount(value: f64) -> Self {
        if value > 0.0 {
            AmountColor::Positive
        } else if value < 0.0 {
            AmountColor::Negative
        } else {
            AmountColor::Zero
        }
    }

    pub fn to_color(self, scheme: ColorScheme) -> Color {
        match self {
            AmountColor::Positive => StatusColor::Success.to_color(scheme),
            AmountColor::Negative => StatusColor::Error.to_color(scheme),
            AmountColor::Zero => StatusColor::Neutral.to_color(scheme),
        }
    }
}

/// MEI revenue alert color and icon
pub struct MeiAlertStyle;

impl MeiAlertStyle {
    pub fn to_color(alert: &MeiAlert, scheme: ColorScheme) -> Color {
        if alert.is_critical() {
            StatusColor::Error.to_color(scheme)
        } else {
            StatusColor::Warning.to_color(scheme)
        }
    }

    pub fn icon(alert: &MeiAlert) -> &'static str {
        match alert {
            MeiAlert::Approaching { .. } => "⚠",
            MeiAlert::Critical { .. } => "⚠",
            MeiAlert::Exceeded | MeiAlert::ExceededRetroactive => "✗",
        }
    }
}

/// Focus state colors
pub struct FocusStyle;

impl FocusStyle {
    /// Border color for focused pane
    pub fn focused_border(scheme: ColorScheme) -> Color {
        StatusColor::Focus.to_color(scheme)
    }

    /// Border color for unfocused pane
    pub fn unfocused_border(scheme: ColorScheme) -> Color {
        StatusColor::Neutral.to_color(scheme)
    }

    pub fn border(focused: bool, scheme: ColorScheme) -> Color {
        if focused {
            Self::focused_border(scheme)
        } else {
            Self::unfocused_border(scheme)
        }
    }
}

/// Base color helpers for backgrounds and foregrounds
pub struct BaseColors;

impl BaseColors {
    /// Primary foreground/text color
    pub fn fg(scheme: ColorScheme) -> Color {
        match scheme {
            ColorScheme::Dark => Color::White,
            ColorScheme::Light => Color::Black,
        }
    }

    /// Muted/secondary text color
    pub fn muted(scheme: ColorScheme) -> Color {
        match scheme {
            ColorScheme::Dark => Color::DarkGray,
            ColorScheme::Light => Color::Gray,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_amount_sign() {
        assert!(matches!(AmountColor::from_amount(10.0), AmountColor::Positive));
        assert!(matches!(AmountColor::from_amount(-0.01), AmountColor::Negative));
        assert!(matches!(AmountColor::from_amount(0.0), AmountColor::Zero));
        assert_eq!(AmountColor::Positive.to_color(ColorScheme::Dark), Color::Green);
    }

    #[test]
    fn test_severity_mapping() {
        assert_eq!(
            StatusColor::from_severity(Severity::Error).to_color(ColorScheme::Dark),
            Color::Red
        );
        assert_eq!(
            StatusColor::from_severity(Severity::Info),
            StatusColor::Focus
        );
    }

    #[test]
    fn test_mei_alert_colors() {
        let approaching = MeiAlert::Approaching { percent: 80.0 };
        assert_eq!(
            MeiAlertStyle::to_color(&approaching, ColorScheme::Dark),
            Color::Yellow
        );
        assert_eq!(
            MeiAlertStyle::to_color(&MeiAlert::Exceeded, ColorScheme::Dark),
            Color::Red
        );
        assert_eq!(MeiAlertStyle::icon(&MeiAlert::ExceededRetroactive), "✗");
    }

    #[test]
    fn test_light_scheme_differs() {
        assert_ne!(
            StatusColor::Focus.to_color(ColorScheme::Dark),
            StatusColor::Focus.to_color(ColorScheme::Light)
        );
    }
}
