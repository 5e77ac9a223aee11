//! The process-wide credential store.
//!
//! There is exactly one [`CredentialStore`] per client. It is created with
//! [`CredentialStore::load`] at startup and cloned into every component that
//! needs to read or change the session: the transport, the session manager
//! and the router. Clones share state.

use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tokio::sync::watch;
use tracing::{debug, info, instrument, warn};

use crate::Result;
use crate::credential::Credential;
use crate::tokens::AuthToken;
use crate::traits::{KeyValueStorage, StorageWrite};

/// Storage key of the bearer token.
pub const TOKEN_KEY: &str = "token";
/// Storage key of the username.
pub const USERNAME_KEY: &str = "username";
/// Storage key of the email address.
pub const EMAIL_KEY: &str = "email";

/// The credential fields as currently held by the store.
///
/// Unlike [`Credential`] every field may be absent. `username` and `email`
/// are only meaningful while a token is present.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StoredCredential {
    pub token: Option<AuthToken>,
    pub username: Option<String>,
    pub email: Option<String>,
}

impl StoredCredential {
    /// Returns true if a non-empty token is present.
    pub fn is_authenticated(&self) -> bool {
        self.token.as_ref().is_some_and(|t| !t.is_empty())
    }
}

impl From<Credential> for StoredCredential {
    fn from(credential: Credential) -> Self {
        Self {
            token: Some(credential.token),
            username: credential.username,
            email: credential.email,
        }
    }
}

/// Shared holder of the session credential, mirrored to durable storage.
#[derive(Clone)]
pub struct CredentialStore {
    inner: Arc<StoreInner>,
}

struct StoreInner {
    storage: Arc<dyn KeyValueStorage>,
    state: RwLock<StoredCredential>,
    authenticated: watch::Sender<bool>,
}

impl CredentialStore {
    /// Build the store from whatever durable storage currently holds.
    ///
    /// Missing keys are a valid empty state. Read failures are logged and
    /// treated as missing, so loading never fails.
    #[instrument(skip(storage))]
    pub fn load(storage: Arc<dyn KeyValueStorage>) -> Self {
        let token = read_key(storage.as_ref(), TOKEN_KEY)
            .filter(|t| !t.is_empty())
            .map(AuthToken::new);
        let state = StoredCredential {
            token,
            username: read_key(storage.as_ref(), USERNAME_KEY),
            email: read_key(storage.as_ref(), EMAIL_KEY),
        };

        let authenticated = state.is_authenticated();
        debug!(authenticated, "Loaded credential store");

        let (tx, _) = watch::channel(authenticated);
        Self {
            inner: Arc::new(StoreInner {
                storage,
                state: RwLock::new(state),
                authenticated: tx,
            }),
        }
    }

    /// Replace the whole credential, in memory and in durable storage.
    ///
    /// The three keys are written as one batch while the store is locked, so
    /// no reader observes a mix of old and new fields. If the durable write
    /// fails the in-memory credential is left as it was.
    ///
    /// # Errors
    ///
    /// Returns the storage error if the batch could not be persisted.
    #[instrument(skip(self, credential), fields(username = ?credential.username))]
    pub fn set_auth(&self, credential: Credential) -> Result<()> {
        let mut state = self.write_state();

        self.inner.storage.apply(&[
            StorageWrite::Set {
                key: TOKEN_KEY,
                value: credential.token.as_str(),
            },
            field_write(USERNAME_KEY, credential.username.as_deref()),
            field_write(EMAIL_KEY, credential.email.as_deref()),
        ])?;

        *state = StoredCredential::from(credential);
        self.publish(state.is_authenticated());

        info!("Session credential stored");
        Ok(())
    }

    /// Remove the credential from memory and durable storage.
    ///
    /// Never fails: memory is cleared first so that no later request carries
    /// the old token, and a durable-storage failure is only logged.
    /// Calling it on an empty store is a no-op.
    #[instrument(skip(self))]
    pub fn clear_auth(&self) {
        let mut state = self.write_state();
        *state = StoredCredential::default();

        if let Err(err) = self.inner.storage.apply(&[
            StorageWrite::Remove { key: TOKEN_KEY },
            StorageWrite::Remove { key: USERNAME_KEY },
            StorageWrite::Remove { key: EMAIL_KEY },
        ]) {
            warn!(error = %err, "Failed to remove stored credential");
        }

        self.publish(false);
        info!("Session credential cleared");
    }

    /// Returns true if a token is present.
    pub fn is_authenticated(&self) -> bool {
        self.read_state().is_authenticated()
    }

    /// Observe the authenticated flag.
    ///
    /// The receiver is marked changed every time `set_auth` or `clear_auth`
    /// flips the flag.
    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.inner.authenticated.subscribe()
    }

    /// Returns the current token, if any.
    pub fn token(&self) -> Option<AuthToken> {
        self.read_state().token.clone()
    }

    /// Returns the current username, if any.
    pub fn username(&self) -> Option<String> {
        self.read_state().username.clone()
    }

    /// Returns the current email, if any.
    pub fn email(&self) -> Option<String> {
        self.read_state().email.clone()
    }

    /// Returns a copy of all credential fields.
    pub fn snapshot(&self) -> StoredCredential {
        self.read_state().clone()
    }

    fn publish(&self, authenticated: bool) {
        self.inner.authenticated.send_if_modified(|current| {
            let changed = *current != authenticated;
            *current = authenticated;
            changed
        });
    }

    fn read_state(&self) -> RwLockReadGuard<'_, StoredCredential> {
        self.inner.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_state(&self) -> RwLockWriteGuard<'_, StoredCredential> {
        self.inner.state.write().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Set the key when the field is present, otherwise drop any stale value.
fn field_write<'a>(key: &'a str, value: Option<&'a str>) -> StorageWrite<'a> {
    match value {
        Some(value) => StorageWrite::Set { key, value },
        None => StorageWrite::Remove { key },
    }
}

fn read_key(storage: &dyn KeyValueStorage, key: &str) -> Option<String> {
    match storage.get(key) {
        Ok(value) => value,
        Err(err) => {
            warn!(key, error = %err, "Failed to read stored value, treating as absent");
            None
        }
    }
}

impl std::fmt::Debug for CredentialStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.read_state();
        f.debug_struct("CredentialStore")
            .field("authenticated", &state.is_authenticated())
            .field("username", &state.username)
            .field("storage", &self.inner.storage)
            .finish()
    }
}
