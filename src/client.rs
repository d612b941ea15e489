//! Client side of the login flow.
//!
//! [`LoginPanel`] holds the state of the login panel: it turns the entered
//! fields into a multipart request for `/Authentication/TryLogin` and reacts to
//! the `login_result` header of the reply.

use crate::core::auth::{
    ACCOUNT_PATH, FILL_IN_ALL_FIELDS, INVALID_CREDENTIALS, LOGIN_PATH, LoginResult,
};
use serde::{Deserialize, Serialize};

/// What the user typed into the login panel
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginForm {
    /// Email address
    pub email: String,
    /// Password
    pub pass: String,
    /// "Remember me" checkbox
    pub remember: bool,
}

/// A ready-to-send multipart login request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginRequest {
    /// Endpoint path
    pub path: &'static str,
    /// Multipart boundary used in `body`
    pub boundary: String,
    /// Encoded multipart body
    pub body: String,
}

impl LoginRequest {
    /// Encodes `form` as `multipart/form-data`
    #[must_use]
    pub fn new(form: &LoginForm) -> Self {
        let boundary = format!("ascension-{:016x}", rand::random::<u64>());
        let remember = if form.remember { "true" } else { "false" };
        let mut body: String = [
            ("email", form.email.as_str()),
            ("pass", form.pass.as_str()),
            ("remember", remember),
        ]
        .iter()
        .map(|(name, value)| {
            format!(
                "--{boundary}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
        })
        .collect();
        body.push_str(&format!("--{boundary}--\r\n"));
        Self {
            path: LOGIN_PATH,
            boundary,
            body,
        }
    }

    /// Value for the `Content-Type` header
    #[must_use]
    pub fn content_type(&self) -> String {
        format!("multipart/form-data; boundary={}", self.boundary)
    }
}

/// Where the panel goes after a reply
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigation {
    /// Stay on the login panel
    Stay,
    /// Navigate to the given path
    To(&'static str),
}

/// Login panel state
#[derive(Debug, Clone, Default)]
pub struct LoginPanel {
    errors: Vec<String>,
}

impl LoginPanel {
    /// Messages currently shown under the panel
    #[must_use]
    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    /// Clears old messages and builds the request for `form`.
    ///
    /// A missing email or password adds a message but the request is still
    /// built; the server then rejects it like any other bad login.
    pub fn submit(&mut self, form: &LoginForm) -> LoginRequest {
        self.errors.clear();
        if form.email.is_empty() || form.pass.is_empty() {
            self.push_error(FILL_IN_ALL_FIELDS);
        }
        LoginRequest::new(form)
    }

    /// Handles the `login_result` header of the reply
    pub fn receive(&mut self, header: Option<&str>) -> Navigation {
        match LoginResult::from_header_value(header) {
            LoginResult::Ok => Navigation::To(ACCOUNT_PATH),
            LoginResult::Failed => {
                self.push_error(INVALID_CREDENTIALS);
                Navigation::Stay
            }
        }
    }

    fn push_error(&mut self, message: &str) {
        if !self.errors.iter().any(|e| e == message) {
            self.errors.push(message.to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(email: &str, pass: &str) -> LoginForm {
        LoginForm {
            email: email.to_string(),
            pass: pass.to_string(),
            remember: false,
        }
    }

    #[test]
    fn test_empty_fields_still_build_request() {
        let mut panel = LoginPanel::default();
        let request = panel.submit(&form("", ""));
        assert_eq!(panel.errors(), [FILL_IN_ALL_FIELDS]);
        assert_eq!(request.path, LOGIN_PATH);
        assert!(request.body.contains("name=\"email\"\r\n\r\n\r\n"));

        assert_eq!(panel.receive(Some("failed")), Navigation::Stay);
        assert_eq!(panel.errors(), [FILL_IN_ALL_FIELDS, INVALID_CREDENTIALS]);
    }

    #[test]
    fn test_repeated_attempts_do_not_duplicate_messages() {
        let mut panel = LoginPanel::default();
        for _ in 0..3 {
            panel.submit(&form("", ""));
            panel.receive(Some("failed"));
        }
        assert_eq!(panel.errors(), [FILL_IN_ALL_FIELDS, INVALID_CREDENTIALS]);

        panel.receive(None);
        assert_eq!(
            panel
                .errors()
                .iter()
                .filter(|e| *e == INVALID_CREDENTIALS)
                .count(),
            1
        );
    }

    #[test]
    fn test_whitespace_email_counts_as_filled() {
        let mut panel = LoginPanel::default();
        panel.submit(&form("  ", "secret"));
        assert!(panel.errors().is_empty());

        panel.submit(&form("ann@example.com", ""));
        assert_eq!(panel.errors(), [FILL_IN_ALL_FIELDS]);
    }

    #[test]
    fn test_success_navigates_to_account() {
        let mut panel = LoginPanel::default();
        panel.submit(&form("", ""));
        panel.submit(&form("ann@example.com", "secret"));
        assert!(panel.errors().is_empty());
        assert_eq!(panel.receive(Some("ok")), Navigation::To(ACCOUNT_PATH));
        assert!(panel.errors().is_empty());
    }

    #[test]
    fn test_request_encoding() {
        let request = LoginRequest::new(&LoginForm {
            email: "ann@example.com".to_string(),
            pass: "secret".to_string(),
            remember: true,
        });
        assert!(request.content_type().ends_with(&request.boundary));
        assert!(request.body.starts_with(&format!("--{}\r\n", request.boundary)));
        assert!(request.body.ends_with(&format!("--{}--\r\n", request.boundary)));
        assert!(request.body.contains("name=\"pass\"\r\n\r\nsecret\r\n"));
        assert!(request.body.contains("name=\"remember\"\r\n\r\ntrue\r\n"));
    }
}
