//! Error types for financer-core
//!
//! `CoreError` keeps the full failure taxonomy (transport, status, decode,
//! client-side validation). Screens collapse it into an [`Alert`] for display.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for financer operations
#[derive(Error, Debug)]
pub enum CoreError {
    // ===================
    // Transport Errors
    // ===================
    #[error("Request to {endpoint} failed")]
    Transport {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Failed to build HTTP client")]
    ClientBuild {
        #[source]
        source: reqwest::Error,
    },

    // ===================
    // Server Errors
    // ===================
    #[error("{endpoint} returned HTTP {status}")]
    Status {
        endpoint: String,
        status: u16,
        /// `erro` field of the response body, when present
        message: Option<String>,
    },

    #[error("Malformed response from {endpoint}: {message}")]
    Decode {
        endpoint: String,
        message: String,
        #[source]
        source: Option<serde_json::Error>,
    },

    #[error("Login succeeded but no token was received")]
    MissingToken,

    // ===================
    // Client-side rejections
    // ===================
    #[error("Invalid {field}: {reason}")]
    Validation { field: &'static str, reason: String },

    #[error("Unsupported file {path}: {reason}")]
    UnsupportedFile { path: PathBuf, reason: String },

    // ===================
    // IO / Config Errors
    // ===================
    #[error("Failed to read file: {path}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Coarse classification of a [`CoreError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Network or transport failure
    Transport,
    /// Non-2xx server response
    Server,
    /// Response body could not be decoded
    Malformed,
    /// Rejected before any request was sent
    Rejected,
    /// Local IO or configuration problem
    Local,
}

impl CoreError {
    pub fn validation(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Validation {
            field,
            reason: reason.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            CoreError::Transport { .. } | CoreError::ClientBuild { .. } => ErrorKind::Transport,
            CoreError::Status { .. } => ErrorKind::Server,
            CoreError::Decode { .. } | CoreError::MissingToken => ErrorKind::Malformed,
            CoreError::Validation { .. } | CoreError::UnsupportedFile { .. } => {
                ErrorKind::Rejected
            }
            CoreError::FileRead { .. } => ErrorKind::Local,
        }
    }

    /// True when the error was raised without touching the network
    pub fn is_client_side(&self) -> bool {
        matches!(self.kind(), ErrorKind::Rejected | ErrorKind::Local)
    }

    /// Server-provided message (`erro` body field), if any
    pub fn server_message(&self) -> Option<&str> {
        match self {
            CoreError::Status {
                message: Some(m), ..
            } => Some(m.as_str()),
            _ => None,
        }
    }
}

/// Severity of a user-facing alert
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Success,
    Info,
    Warning,
    Error,
}

/// User-facing alert, the collapsed form of an operation outcome
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert {
    pub title: String,
    pub message: String,
    pub severity: Severity,
    /// Actionable suggestion for the user (optional)
    pub suggestion: Option<String>,
}

impl Alert {
    pub fn new(title: impl Into<String>, message: impl Into<String>, severity: Severity) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
            severity,
            suggestion: None,
        }
    }

    pub fn success(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(title, message, Severity::Success)
    }

    pub fn info(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(title, message, Severity::Info)
    }

    pub fn warning(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(title, message, Severity::Warning)
    }

    pub fn error(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(title, message, Severity::Error)
    }

    /// Add an actionable suggestion to this alert
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Collapse a CoreError into a generic alert.
    ///
    /// The server's own message wins when present; otherwise `fallback` is
    /// shown. Transport failures get a connectivity hint.
    pub fn from_core_error(title: impl Into<String>, fallback: &str, error: &CoreError) -> Self {
        let title = title.into();
        match error {
            CoreError::Status {
                message: Some(m), ..
            } => Self::error(title, m.clone()),
            CoreError::Validation { reason, .. } => Self::warning(title, reason.clone()),
            CoreError::UnsupportedFile { reason, .. } => Self::warning(title, reason.clone()),
            CoreError::Transport { .. } | CoreError::ClientBuild { .. } => {
                Self::error(title, fallback).with_suggestion("Check that the API host is reachable")
            }
            CoreError::FileRead { path, .. } => Self::error(title, fallback)
                .with_suggestion(format!("Check permissions: ls -l {}", path.display())),
            _ => Self::error(title, fallback),
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl std::fmt::Display for Alert {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.title, self.message)?;
        if let Some(ref s) = self.suggestion {
            write!(f, " ({})", s)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_classification() {
        let status = CoreError::Status {
            endpoint: "/api/transacoes".into(),
            status: 500,
            message: None,
        };
        assert_eq!(status.kind(), ErrorKind::Server);
        assert!(!status.is_client_side());

        let rejected = CoreError::validation("password", "must not be empty");
        assert_eq!(rejected.kind(), ErrorKind::Rejected);
        assert!(rejected.is_client_side());

        assert_eq!(CoreError::MissingToken.kind(), ErrorKind::Malformed);
    }

    #[test]
    fn test_alert_prefers_server_message() {
        let err = CoreError::Status {
            endpoint: "/api/login".into(),
            status: 401,
            message: Some("Número ou senha incorretos.".into()),
        };
        let alert = Alert::from_core_error("Login", "Login failed", &err);
        assert_eq!(alert.message, "Número ou senha incorretos.");
        assert!(alert.is_error());
    }

    #[test]
    fn test_alert_fallback_without_server_message() {
        let err = CoreError::Status {
            endpoint: "/upload".into(),
            status: 500,
            message: None,
        };
        let alert = Alert::from_core_error("Import", "Failed to send the file", &err);
        assert_eq!(alert.message, "Failed to send the file");
        assert_eq!(alert.suggestion, None);
    }

    #[test]
    fn test_validation_is_a_warning() {
        let err = CoreError::validation("ticker", "Ticker is required");
        let alert = Alert::from_core_error("Investments", "unused", &err);
        assert_eq!(alert.severity, Severity::Warning);
        assert_eq!(alert.to_string(), "Investments: Ticker is required");
    }
}
