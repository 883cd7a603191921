//! Authenticated session

use std::fmt;

/// Bearer-token session created by a successful login.
///
/// Passed by reference to every authenticated call; dropping it is logout.
#[derive(Clone, PartialEq, Eq)]
pub struct Session {
    token: String,
    /// Account holder name, when the login response carries one
    pub holder_name: Option<String>,
}

impl Session {
    pub fn new(token: impl Into<String>, holder_name: Option<String>) -> Self {
        Self {
            token: token.into(),
            holder_name: holder_name.filter(|n| !n.trim().is_empty()),
        }
    }

    /// Value for the `Authorization` header
    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.token)
    }

    /// Greeting name for headers and status bars
    pub fn display_name(&self) -> &str {
        self.holder_name.as_deref().unwrap_or("account")
    }
}

// Keep the token out of logs
impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("token", &"<redacted>")
            .field("holder_name", &self.holder_name)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bearer_header() {
        let session = Session::new("abc.def", Some("Ana".into()));
        assert_eq!(session.bearer(), "Bearer abc.def");
        assert_eq!(session.display_name(), "Ana");
    }

    #[test]
    fn test_debug_redacts_token() {
        let session = Session::new("secret-token", None);
        let debug = format!("{:?}", session);
        assert!(!debug.contains("secret-token"));
        assert_eq!(session.display_name(), "account");
    }

    #[test]
    fn test_blank_holder_name_dropped() {
        let session = Session::new("t", Some("  ".into()));
        assert_eq!(session.holder_name, None);
    }
}
