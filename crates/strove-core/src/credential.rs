//! Session credential and login credential types.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::tokens::AuthToken;

/// The authenticated identity held by the credential store.
///
/// This is also the `data` payload the API returns from login and
/// registration, so it deserializes straight from the response envelope.
/// Only the token is required; the identity fields may be missing or null.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credential {
    /// Bearer token for authenticated requests.
    pub token: AuthToken,
    /// Display name of the account.
    #[serde(default)]
    pub username: Option<String>,
    /// Email address of the account.
    #[serde(default)]
    pub email: Option<String>,
}

impl Credential {
    /// Create a credential with every field present.
    pub fn new(token: AuthToken, username: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            token,
            username: Some(username.into()),
            email: Some(email.into()),
        }
    }

    /// Create a credential carrying only a token.
    pub fn from_token(token: AuthToken) -> Self {
        Self {
            token,
            username: None,
            email: None,
        }
    }
}

/// Login credentials for the Strove API.
///
/// The login name may be either a username or an email address.
///
/// # Security
///
/// The password is never exposed in Debug output to prevent accidental logging.
///
/// # Example
///
/// ```
/// use strove_core::LoginCredentials;
///
/// let creds = LoginCredentials::new("alice", "pw");
/// assert_eq!(creds.login_name(), "alice");
/// ```
#[derive(Clone)]
pub struct LoginCredentials {
    login_name: String,
    password: String,
}

impl LoginCredentials {
    /// Create new credentials.
    pub fn new(login_name: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            login_name: login_name.into(),
            password: password.into(),
        }
    }

    /// Returns the login name (username or email).
    pub fn login_name(&self) -> &str {
        &self.login_name
    }

    /// Returns the password.
    ///
    /// # Security
    ///
    /// Use this only when constructing authentication requests.
    /// Never log or display this value.
    pub fn password(&self) -> &str {
        &self.password
    }
}

impl fmt::Debug for LoginCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginCredentials")
            .field("login_name", &self.login_name)
            .field("password", &"[REDACTED]")
            .finish()
    }
}
