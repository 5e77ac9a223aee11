//! Mapping of HTTP client failures onto the Strove error tree.

use std::time::Duration;

use serde::Deserialize;

use strove_core::Error;
use strove_core::error::TransportError;

/// Classify a reqwest failure.
///
/// `timeout` is the configured per-request timeout, reported when the
/// failure is a timeout.
pub(crate) fn transport_error(err: reqwest::Error, timeout: Duration) -> Error {
    let err = if err.is_timeout() {
        TransportError::Timeout {
            duration_ms: u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
        }
    } else if err.is_connect() {
        TransportError::Connection {
            message: err.to_string(),
        }
    } else if err.is_decode() {
        TransportError::Decode {
            message: err.to_string(),
        }
    } else {
        TransportError::Http {
            message: err.to_string(),
        }
    };
    Error::Transport(err)
}

/// Error body shapes the server is known to produce: the application
/// envelope (`message`) and the framework default (`error`).
#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
    error: Option<String>,
}

/// Build the error for a non-success status from the response body.
pub(crate) fn status_error(status: u16, body: &str) -> Error {
    let message = serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|b| {
            b.message
                .filter(|m| !m.is_empty())
                .or(b.error.filter(|e| !e.is_empty()))
        });
    Error::Transport(TransportError::Status { status, message })
}
