//! strove-core - Session, routing and storage primitives for the Strove client.
//!
//! All authenticated state lives in a single [`CredentialStore`] that is
//! constructed once at startup and handed to every component that needs it.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use strove_core::{AuthToken, Credential, CredentialStore, MemoryStorage};
//! use strove_core::router::{GuardOutcome, Router};
//!
//! # fn example() -> Result<(), strove_core::Error> {
//! let store = CredentialStore::load(Arc::new(MemoryStorage::new()));
//! let router = Router::new(store.clone());
//!
//! assert_eq!(router.navigate("/chat")?.outcome, GuardOutcome::Redirect("/login".into()));
//!
//! store.set_auth(Credential::new(AuthToken::new("t1"), "alice", "a@x.com"))?;
//! assert_eq!(router.navigate("/login")?.path, "/dashboard");
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```

pub mod credential;
pub mod error;
pub mod memory;
pub mod router;
pub mod store;
pub mod theme;
pub mod tokens;
pub mod traits;
pub mod types;

pub use credential::{Credential, LoginCredentials};
pub use error::Error;
pub use memory::MemoryStorage;
pub use store::CredentialStore;
pub use theme::{Theme, ThemeStore};
pub use tokens::AuthToken;
pub use traits::{ChannelNavigator, KeyValueStorage, Navigator, StorageWrite};
pub use types::ApiUrl;

/// Result type alias using the crate's Error type.
pub type Result<T> = std::result::Result<T, Error>;
