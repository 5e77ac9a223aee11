//! Login, registration and logout.

use serde::Deserialize;
use serde_json::Value;
use tokio::sync::watch;
use tracing::{debug, info, instrument};

use strove_core::error::AuthenticationError;
use strove_core::{Credential, CredentialStore, LoginCredentials, Result};

use crate::client::ApiClient;
use crate::endpoints::{CURRENT_USER, LOGIN, LoginRequest, REGISTER, RegisterRequest};

const LOGIN_FAILED: &str = "Login failed";
const REGISTRATION_FAILED: &str = "Registration failed";

/// Drives the session lifecycle against the API.
///
/// Each operation is one request/response round trip through the shared
/// [`ApiClient`]; nothing is retried. On success the credential store is
/// updated, on failure it is left exactly as it was.
#[derive(Debug, Clone)]
pub struct SessionManager {
    client: ApiClient,
    store: CredentialStore,
}

/// Loose view of an auth envelope. Any field may be missing or of the wrong
/// type without failing the parse of the others.
#[derive(Deserialize)]
struct AuthEnvelope {
    #[serde(default)]
    success: Value,
    #[serde(default)]
    message: Value,
    #[serde(default)]
    data: Value,
}

impl SessionManager {
    pub fn new(client: ApiClient, store: CredentialStore) -> Self {
        Self { client, store }
    }

    /// Sign in with a username or email.
    ///
    /// # Errors
    ///
    /// - [`Error::Authentication`](strove_core::Error::Authentication) if the
    ///   server answered `success: false` or sent no usable payload
    /// - [`Error::Transport`](strove_core::Error::Transport) for network
    ///   failures and non-2xx statuses, unchanged
    /// - [`Error::Storage`](strove_core::Error::Storage) if the credential
    ///   could not be persisted
    #[instrument(skip(self, password))]
    pub async fn login(&self, login_name: &str, password: &str) -> Result<Credential> {
        info!("Logging in");
        let body = self
            .client
            .post_text(
                LOGIN,
                &LoginRequest {
                    login_name,
                    password,
                },
            )
            .await?;

        self.accept(&body, LOGIN_FAILED)
    }

    /// [`login`](Self::login) with a [`LoginCredentials`] value.
    pub async fn login_with(&self, credentials: &LoginCredentials) -> Result<Credential> {
        self.login(credentials.login_name(), credentials.password())
            .await
    }

    /// Create an account and sign in to it.
    ///
    /// Same failure policy as [`login`](Self::login).
    #[instrument(skip(self, password))]
    pub async fn register(&self, username: &str, email: &str, password: &str) -> Result<Credential> {
        info!("Registering account");
        let body = self
            .client
            .post_text(
                REGISTER,
                &RegisterRequest {
                    username,
                    email,
                    password,
                },
            )
            .await?;

        self.accept(&body, REGISTRATION_FAILED)
    }

    /// Forget the local session. No request is sent.
    #[instrument(skip(self))]
    pub fn logout(&self) {
        self.store.clear_auth();
    }

    /// Ask the server who the current token belongs to.
    ///
    /// The response shape is server-defined and returned as-is.
    #[instrument(skip(self))]
    pub async fn current_user(&self) -> Result<Value> {
        self.client.get(CURRENT_USER).await
    }

    pub fn is_authenticated(&self) -> bool {
        self.store.is_authenticated()
    }

    /// Observe the authenticated flag.
    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.store.subscribe()
    }

    pub fn store(&self) -> &CredentialStore {
        &self.store
    }

    /// Interpret an auth envelope and store the credential it carries.
    fn accept(&self, body: &str, default_message: &str) -> Result<Credential> {
        let credential = parse_auth_envelope(body, default_message)?;
        self.store.set_auth(credential.clone())?;
        debug!(username = ?credential.username, "Session established");
        Ok(credential)
    }
}

/// Pull the credential out of an auth response body.
///
/// Succeeds only for `success: true` with a payload holding a non-empty
/// token. Every other body fails with the server's message, or with
/// `default_message` when the server sent none.
fn parse_auth_envelope(
    body: &str,
    default_message: &str,
) -> std::result::Result<Credential, AuthenticationError> {
    let envelope = serde_json::from_str::<AuthEnvelope>(body).ok();

    let credential = envelope
        .as_ref()
        .filter(|e| e.success == Value::Bool(true))
        .and_then(|e| serde_json::from_value::<Credential>(e.data.clone()).ok())
        .filter(|c| !c.token.is_empty());

    match credential {
        Some(credential) => Ok(credential),
        None => {
            let message = envelope
                .and_then(|e| match e.message {
                    Value::String(m) if !m.is_empty() => Some(m),
                    _ => None,
                })
                .unwrap_or_else(|| default_message.to_string());
            Err(AuthenticationError::new(message))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_success_with_payload() {
        let credential = parse_auth_envelope(
            r#"{"success":true,"message":"ok","data":{"token":"t1","username":"alice","email":"a@x.com"}}"#,
            LOGIN_FAILED,
        )
        .unwrap();
        assert_eq!(credential.token.as_str(), "t1");
        assert_eq!(credential.email.as_deref(), Some("a@x.com"));
    }

    #[test]
    fn accepts_payload_with_missing_identity() {
        let credential = parse_auth_envelope(
            r#"{"success":true,"message":"ok","data":{"token":"t1","username":"alice","email":null}}"#,
            LOGIN_FAILED,
        )
        .unwrap();
        assert_eq!(credential.username.as_deref(), Some("alice"));
        assert!(credential.email.is_none());

        let credential =
            parse_auth_envelope(r#"{"success":true,"data":{"token":"t1"}}"#, LOGIN_FAILED)
                .unwrap();
        assert_eq!(credential.token.as_str(), "t1");
        assert!(credential.username.is_none());
    }

    #[test]
    fn rejection_carries_server_message() {
        let err =
            parse_auth_envelope(r#"{"success":false,"message":"bad credentials"}"#, LOGIN_FAILED)
                .unwrap_err();
        assert_eq!(err.message(), "bad credentials");
    }

    #[test]
    fn rejection_without_message_uses_default() {
        let err = parse_auth_envelope(r#"{"success":false,"message":""}"#, REGISTRATION_FAILED)
            .unwrap_err();
        assert_eq!(err.message(), "Registration failed");

        let err = parse_auth_envelope(r#"{"success":false}"#, LOGIN_FAILED).unwrap_err();
        assert_eq!(err.message(), "Login failed");
    }

    #[test]
    fn success_without_payload_is_rejected() {
        let err = parse_auth_envelope(r#"{"success":true,"data":null}"#, LOGIN_FAILED).unwrap_err();
        assert_eq!(err.message(), "Login failed");

        let err = parse_auth_envelope(
            r#"{"success":true,"data":{"username":"alice","email":"a@x.com"}}"#,
            LOGIN_FAILED,
        )
        .unwrap_err();
        assert_eq!(err.message(), "Login failed");

        let err = parse_auth_envelope(
            r#"{"success":true,"data":{"token":"","username":"alice","email":"a@x.com"}}"#,
            LOGIN_FAILED,
        )
        .unwrap_err();
        assert_eq!(err.message(), "Login failed");
    }

    #[test]
    fn non_envelope_bodies_are_rejected() {
        for body in ["", "<html></html>", "[]", r#"{"success":"yes"}"#] {
            let err = parse_auth_envelope(body, LOGIN_FAILED).unwrap_err();
            assert_eq!(err.message(), "Login failed", "body {body:?}");
        }
    }
}
