//! Client configuration
//!
//! Stored in `<config_dir>/financer/config.json`. Never holds credentials or
//! tokens. Missing or malformed files fall back to defaults.

use crate::api::DEFAULT_BASE_URL;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::warn;

const CONFIG_FILE: &str = "config.json";
const APP_DIR: &str = "financer";

/// Default transaction categories
pub const DEFAULT_CATEGORIES: &[&str] = &[
    "Alimentação",
    "Transporte",
    "Moradia",
    "Lazer",
    "Salário",
    "Outros",
];

/// Color scheme for the TUI
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorScheme {
    /// Dark theme (default)
    #[default]
    Dark,
    Light,
}

/// financer configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FinancerConfig {
    /// API base URL, fixed for the lifetime of the process
    pub base_url: String,

    /// Categories offered when categorizing transactions
    pub categories: Vec<String>,

    pub color_scheme: ColorScheme,
}

impl Default for FinancerConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            categories: DEFAULT_CATEGORIES.iter().map(|c| c.to_string()).collect(),
            color_scheme: ColorScheme::Dark,
        }
    }
}

impl FinancerConfig {
    /// `<config_dir>/financer/config.json`, if a config dir exists on this platform
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join(APP_DIR).join(CONFIG_FILE))
    }

    /// Load from `path`. Returns defaults on any I/O or parse error.
    pub fn load(path: &Path) -> Self {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(_) => return Self::default(),
        };

        match serde_json::from_str::<Self>(&content) {
            Ok(config) => config.sanitized(),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Invalid config file, using defaults");
                Self::default()
            }
        }
    }

    /// Load from the default location, or defaults
    pub fn load_default() -> Self {
        Self::default_path()
            .map(|p| Self::load(&p))
            .unwrap_or_default()
    }

    /// Override the base URL (command line / environment)
    pub fn with_base_url(mut self, base_url: Option<String>) -> Self {
        if let Some(url) = base_url.filter(|u| !u.trim().is_empty()) {
            self.base_url = url;
        }
        self
    }

    fn sanitized(mut self) -> Self {
        self.categories.retain(|c| !c.trim().is_empty());
        if self.categories.is_empty() {
            self.categories = Self::default().categories;
        }
        if self.base_url.trim().is_empty() {
            self.base_url = DEFAULT_BASE_URL.to_string();
        }
        self
    }
}

/// Directory for the TUI log file
pub fn data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join(APP_DIR)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = FinancerConfig::load(&dir.path().join("absent.json"));
        assert_eq!(config, FinancerConfig::default());
        assert_eq!(config.categories.len(), 6);
    }

    #[test]
    fn test_malformed_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{ not json").unwrap();
        assert_eq!(FinancerConfig::load(&path), FinancerConfig::default());
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"base_url":"http://localhost:5000","categories":[]}"#).unwrap();

        let config = FinancerConfig::load(&path);
        assert_eq!(config.base_url, "http://localhost:5000");
        assert_eq!(config.categories, FinancerConfig::default().categories);
        assert_eq!(config.color_scheme, ColorScheme::Dark);

        std::fs::write(&path, r#"{"color_scheme":"light","base_url":" "}"#).unwrap();
        let config = FinancerConfig::load(&path);
        assert_eq!(config.color_scheme, ColorScheme::Light);
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
    }

    #[test]
    fn test_base_url_override() {
        let config = FinancerConfig::default().with_base_url(Some("http://10.0.0.2:5000".into()));
        assert_eq!(config.base_url, "http://10.0.0.2:5000");
        let config = config.with_base_url(Some("  ".into()));
        assert_eq!(config.base_url, "http://10.0.0.2:5000");
    }
}
