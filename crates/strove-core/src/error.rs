//! Error types for the Strove client.
//!
//! This module provides a unified error type with explicit variants for
//! transport, authentication, storage, and input validation errors.

use thiserror::Error;

/// The unified error type for Strove client operations.
///
/// Callers that only care about the expired-session case can use
/// [`Error::is_unauthorized`] instead of matching the full tree.
#[derive(Debug, Error)]
pub enum Error {
    /// Network transport errors (connection, timeout, non-2xx status).
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// The server answered with a well-formed envelope that rejected the
    /// login or registration attempt.
    #[error("authentication error: {0}")]
    Authentication(#[from] AuthenticationError),

    /// Durable client-side storage failed.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    /// Input validation errors (bad URL, bad header value, route loops).
    #[error("invalid input: {0}")]
    InvalidInput(#[from] InvalidInputError),
}

impl Error {
    /// Returns true if the server rejected the request with HTTP 401.
    pub fn is_unauthorized(&self) -> bool {
        matches!(
            self,
            Error::Transport(TransportError::Status { status: 401, .. })
        )
    }

    /// Returns the HTTP status code for status failures.
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Transport(TransportError::Status { status, .. }) => Some(*status),
            _ => None,
        }
    }
}

/// Transport-level errors.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Network connection failed.
    #[error("connection failed: {message}")]
    Connection { message: String },

    /// Request timed out.
    #[error("request timed out after {duration_ms}ms")]
    Timeout { duration_ms: u64 },

    /// The server answered with a non-success status.
    #[error("HTTP {status}{}", status_suffix(.message))]
    Status {
        status: u16,
        message: Option<String>,
    },

    /// The response body could not be decoded.
    #[error("invalid response body: {message}")]
    Decode { message: String },

    /// Generic HTTP error.
    #[error("HTTP error: {message}")]
    Http { message: String },
}

fn status_suffix(message: &Option<String>) -> String {
    match message {
        Some(message) => format!(": {message}"),
        None => String::new(),
    }
}

/// A rejected login or registration.
///
/// The message is meant to be shown to the user as-is.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct AuthenticationError {
    message: String,
}

impl AuthenticationError {
    /// Create a new authentication error with a user-facing message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Returns the user-facing message.
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Durable storage errors.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Reading or writing the backing file failed.
    #[error("I/O error on {path}: {message}")]
    Io { path: String, message: String },

    /// The backing file exists but is not a valid key/value document.
    #[error("corrupt storage file {path}: {message}")]
    Corrupt { path: String, message: String },
}

/// Input validation errors.
#[derive(Debug, Error)]
pub enum InvalidInputError {
    /// Invalid API base URL.
    #[error("invalid API URL '{value}': {reason}")]
    ApiUrl { value: String, reason: String },

    /// A token that cannot be carried in an HTTP header.
    #[error("token cannot be sent as a header: {reason}")]
    Token { reason: String },

    /// Route resolution did not settle.
    #[error("route '{path}' did not resolve: {reason}")]
    Route { path: String, reason: String },

    /// Generic invalid input.
    #[error("invalid input: {message}")]
    Other { message: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unauthorized_only_for_401() {
        let err = Error::from(TransportError::Status {
            status: 401,
            message: None,
        });
        assert!(err.is_unauthorized());
        assert_eq!(err.status(), Some(401));

        let err = Error::from(TransportError::Status {
            status: 403,
            message: None,
        });
        assert!(!err.is_unauthorized());

        let err = Error::from(TransportError::Timeout { duration_ms: 30_000 });
        assert!(!err.is_unauthorized());
        assert_eq!(err.status(), None);
    }

    #[test]
    fn status_display_includes_message() {
        let err = TransportError::Status {
            status: 500,
            message: Some("boom".to_string()),
        };
        assert_eq!(err.to_string(), "HTTP 500: boom");

        let err = TransportError::Status {
            status: 502,
            message: None,
        };
        assert_eq!(err.to_string(), "HTTP 502");
    }

    #[test]
    fn authentication_error_displays_message_only() {
        let err = AuthenticationError::new("bad credentials");
        assert_eq!(err.to_string(), "bad credentials");
        assert_eq!(err.message(), "bad credentials");
    }
}
