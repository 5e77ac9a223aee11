//! Request/response middleware.
//!
//! The [`ApiClient`](crate::ApiClient) runs every request through an ordered
//! list of [`Middleware`]. Request hooks run front to back before dispatch.
//! When the call fails, error hooks run back to front and the error is then
//! returned to the caller unchanged: a hook can cause side effects but can
//! neither retry nor swallow the failure.

use std::sync::Arc;

use reqwest::header::{AUTHORIZATION, HeaderValue};
use tracing::{trace, warn};

use strove_core::error::InvalidInputError;
use strove_core::router::LOGIN_PATH;
use strove_core::{CredentialStore, Error, Navigator, Result};

/// A stage of the request pipeline.
pub trait Middleware: Send + Sync {
    /// Adjust an outgoing request. Returning an error aborts the call.
    fn on_request(&self, request: &mut reqwest::Request) -> Result<()> {
        let _ = request;
        Ok(())
    }

    /// Observe a failed call. The error is re-raised after every hook ran.
    fn on_error(&self, error: &Error) {
        let _ = error;
    }
}

/// Attaches `Authorization: Bearer <token>` when the store holds a token.
///
/// The token is read at dispatch time on every request, never cached.
#[derive(Debug, Clone)]
pub struct BearerAuth {
    store: CredentialStore,
}

impl BearerAuth {
    pub fn new(store: CredentialStore) -> Self {
        Self { store }
    }
}

impl Middleware for BearerAuth {
    fn on_request(&self, request: &mut reqwest::Request) -> Result<()> {
        let Some(token) = self.store.token().filter(|t| !t.is_empty()) else {
            trace!("No token, sending request unauthenticated");
            return Ok(());
        };

        let mut value = HeaderValue::from_str(&token.bearer()).map_err(|e| {
            InvalidInputError::Token {
                reason: e.to_string(),
            }
        })?;
        value.set_sensitive(true);
        request.headers_mut().insert(AUTHORIZATION, value);
        Ok(())
    }
}

/// Ends the session when the server rejects the credential.
///
/// On any 401 the store is cleared first and only then is the navigator
/// told to go to the login route, so the guard evaluating that route sees
/// the cleared state. Every other failure passes through untouched.
#[derive(Clone)]
pub struct SessionExpiry {
    store: CredentialStore,
    navigator: Arc<dyn Navigator>,
    login_path: String,
}

impl SessionExpiry {
    /// Redirect to the default login route.
    pub fn new(store: CredentialStore, navigator: Arc<dyn Navigator>) -> Self {
        Self::with_login_path(store, navigator, LOGIN_PATH)
    }

    pub fn with_login_path(
        store: CredentialStore,
        navigator: Arc<dyn Navigator>,
        login_path: impl Into<String>,
    ) -> Self {
        Self {
            store,
            navigator,
            login_path: login_path.into(),
        }
    }
}

impl Middleware for SessionExpiry {
    fn on_error(&self, error: &Error) {
        if !error.is_unauthorized() {
            return;
        }

        warn!(login = %self.login_path, "Server rejected the session, signing out");
        self.store.clear_auth();
        self.navigator.navigate(&self.login_path);
    }
}

impl std::fmt::Debug for SessionExpiry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionExpiry")
            .field("login_path", &self.login_path)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use strove_core::error::TransportError;
    use strove_core::{AuthToken, Credential, MemoryStorage};

    use super::*;

    #[derive(Default)]
    struct Recorder {
        paths: Mutex<Vec<(String, bool)>>,
        store: Mutex<Option<CredentialStore>>,
    }

    impl Navigator for Recorder {
        fn navigate(&self, path: &str) {
            let authenticated = self
                .store
                .lock()
                .unwrap()
                .as_ref()
                .is_some_and(|s| s.is_authenticated());
            self.paths
                .lock()
                .unwrap()
                .push((path.to_string(), authenticated));
        }
    }

    fn signed_in_store() -> CredentialStore {
        let store = CredentialStore::load(Arc::new(MemoryStorage::new()));
        store
            .set_auth(Credential::new(AuthToken::new("t1"), "alice", "a@x.com"))
            .unwrap();
        store
    }

    fn request() -> reqwest::Request {
        reqwest::Client::new()
            .get("http://localhost:8123/api/auth/me")
            .build()
            .unwrap()
    }

    #[test]
    fn bearer_attaches_current_token() {
        let store = signed_in_store();
        let auth = BearerAuth::new(store.clone());

        let mut req = request();
        auth.on_request(&mut req).unwrap();
        assert_eq!(req.headers()[AUTHORIZATION], "Bearer t1");
        assert!(req.headers()[AUTHORIZATION].is_sensitive());

        store.clear_auth();
        let mut req = request();
        auth.on_request(&mut req).unwrap();
        assert!(req.headers().get(AUTHORIZATION).is_none());
    }

    #[test]
    fn bearer_rejects_unencodable_token() {
        let store = CredentialStore::load(Arc::new(MemoryStorage::new()));
        store
            .set_auth(Credential::new(AuthToken::new("bad\ntoken"), "a", "b"))
            .unwrap();
        let mut req = request();
        assert!(BearerAuth::new(store).on_request(&mut req).is_err());
    }

    #[test]
    fn expiry_clears_before_navigating() {
        let store = signed_in_store();
        let recorder = Arc::new(Recorder::default());
        *recorder.store.lock().unwrap() = Some(store.clone());
        let expiry = SessionExpiry::new(store.clone(), recorder.clone());

        expiry.on_error(&Error::Transport(TransportError::Status {
            status: 401,
            message: None,
        }));

        assert!(!store.is_authenticated());
        let paths = recorder.paths.lock().unwrap();
        assert_eq!(paths.as_slice(), &[("/login".to_string(), false)]);
    }

    #[test]
    fn expiry_ignores_other_failures() {
        let store = signed_in_store();
        let recorder = Arc::new(Recorder::default());
        let expiry = SessionExpiry::new(store.clone(), recorder.clone());

        expiry.on_error(&Error::Transport(TransportError::Status {
            status: 500,
            message: None,
        }));
        expiry.on_error(&Error::Transport(TransportError::Timeout {
            duration_ms: 30_000,
        }));

        assert!(store.is_authenticated());
        assert!(recorder.paths.lock().unwrap().is_empty());
    }
}
