//! Login protocol shared by the HTTP endpoint and the client panel.
//!
//! The endpoint reports the outcome in the `login_result` response header and
//! repeats it as `{"result": ...}` in the body. Only the exact value `ok`
//! means success; anything else, including a missing header, is a failure.

use serde::{Deserialize, Serialize};

/// Response header carrying the login outcome
pub const LOGIN_RESULT_HEADER: &str = "login_result";

/// Path of the login endpoint
pub const LOGIN_PATH: &str = "/Authentication/TryLogin";

/// Where a successful login navigates
pub const ACCOUNT_PATH: &str = "/Account";

/// Shown when email or password is missing
pub const FILL_IN_ALL_FIELDS: &str = "Fill in all the fields";

/// Shown for every rejected login, whatever the cause
pub const INVALID_CREDENTIALS: &str = "Invalid email or password";

/// Outcome of a login attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoginResult {
    /// Credentials accepted
    Ok,
    /// Credentials rejected
    Failed,
}

impl LoginResult {
    /// Value written to the `login_result` header
    #[must_use]
    pub const fn header_value(self) -> &'static str {
        match self {
            Self::Ok => "ok",
            Self::Failed => "failed",
        }
    }

    /// Reads the header value; anything but `ok` is a failure
    #[must_use]
    pub fn from_header_value(value: Option<&str>) -> Self {
        match value {
            Some("ok") => Self::Ok,
            _ => Self::Failed,
        }
    }
}

/// Body returned by the login endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginResponse {
    /// The outcome, same as the header
    pub result: LoginResult,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_round_trip() {
        assert_eq!(LoginResult::from_header_value(Some("ok")), LoginResult::Ok);
        assert_eq!(
            LoginResult::from_header_value(Some(LoginResult::Failed.header_value())),
            LoginResult::Failed
        );
        assert_eq!(LoginResult::from_header_value(Some("OK")), LoginResult::Failed);
        assert_eq!(LoginResult::from_header_value(None), LoginResult::Failed);
    }
}
