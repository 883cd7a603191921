//! Global keybindings for the financer TUI
//!
//! Global keys apply only while no text field has focus, except `Ctrl+C`
//! which always quits.

use crossterm::event::{KeyCode, KeyModifiers};
use std::collections::HashMap;

/// Actions that can be triggered by keyboard shortcuts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyAction {
    Quit,
    /// Quit even while typing
    ForceQuit,
    /// Re-fetch the active tab
    Refresh,
    /// Drop the session and return to login
    Logout,
    NextTab,
    PrevTab,
    JumpDashboard,
    JumpTransactions,
    JumpInvestments,
    JumpImport,
}

impl KeyAction {
    pub fn description(&self) -> &'static str {
        match self {
            KeyAction::Quit => "quit",
            KeyAction::ForceQuit => "force quit",
            KeyAction::Refresh => "refresh",
            KeyAction::Logout => "logout",
            KeyAction::NextTab => "next tab",
            KeyAction::PrevTab => "previous tab",
            KeyAction::JumpDashboard => "dashboard",
            KeyAction::JumpTransactions => "transactions",
            KeyAction::JumpInvestments => "investments",
            KeyAction::JumpImport => "import",
        }
    }

    /// True for actions allowed while a text field has focus
    pub fn works_while_typing(&self) -> bool {
        matches!(self, KeyAction::ForceQuit)
    }
}

/// Key with modifiers for lookup
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct KeyWithMods {
    code: KeyCode,
    modifiers: KeyModifiers,
}

/// Keybindings table
pub struct KeyBindings {
    bindings: HashMap<KeyWithMods, KeyAction>,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyBindings {
    pub fn new() -> Self {
        let table = [
            (KeyCode::Char('q'), KeyModifiers::NONE, KeyAction::Quit),
            (KeyCode::Char('c'), KeyModifiers::CONTROL, KeyAction::ForceQuit),
            (KeyCode::F(5), KeyModifiers::NONE, KeyAction::Refresh),
            (KeyCode::Char('L'), KeyModifiers::SHIFT, KeyAction::Logout),
            (KeyCode::Char('L'), KeyModifiers::NONE, KeyAction::Logout),
            (KeyCode::Tab, KeyModifiers::NONE, KeyAction::NextTab),
            (KeyCode::BackTab, KeyModifiers::SHIFT, KeyAction::PrevTab),
            (KeyCode::Char('1'), KeyModifiers::NONE, KeyAction::JumpDashboard),
            (KeyCode::Char('2'), KeyModifiers::NONE, KeyAction::JumpTransactions),
            (KeyCode::Char('3'), KeyModifiers::NONE, KeyAction::JumpInvestments),
            (KeyCode::Char('4'), KeyModifiers::NONE, KeyAction::JumpImport),
        ];

        let bindings = table
            .into_iter()
            .map(|(code, modifiers, action)| (KeyWithMods { code, modifiers }, action))
            .collect();

        Self { bindings }
    }

    /// Action bound to a key press, if any
    pub fn get_action(&self, code: KeyCode, modifiers: KeyModifiers) -> Option<KeyAction> {
        self.bindings
            .get(&KeyWithMods { code, modifiers })
            .copied()
    }

    /// Key label for an action (status bar hints)
    pub fn key_label(&self, action: KeyAction) -> Option<String> {
        let mut keys: Vec<_> = self
            .bindings
            .iter()
            .filter(|(_, a)| **a == action)
            .map(|(k, _)| format_key(k))
            .collect();
        keys.sort();
        keys.dedup();
        keys.into_iter().next()
    }
}

fn format_key(key: &KeyWithMods) -> String {
    let code = match key.code {
        KeyCode::Char(c) => c.to_string(),
        KeyCode::F(n) => format!("F{}", n),
        KeyCode::Tab => "Tab".to_string(),
        KeyCode::BackTab => "Tab".to_string(),
        other => format!("{:?}", other),
    };
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        format!("Ctrl+{}", code)
    } else if key.code == KeyCode::BackTab {
        format!("Shift+{}", code)
    } else {
        code
    }
}
