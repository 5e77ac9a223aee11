//! strove-http - HTTP transport and session management for the Strove API.
//!
//! Every outbound call goes through one [`ApiClient`]. Its middleware
//! pipeline attaches the bearer token from the shared
//! [`CredentialStore`](strove_core::CredentialStore) and clears the session
//! when the server answers 401.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use strove_core::{ChannelNavigator, CredentialStore, MemoryStorage};
//! use strove_http::{ApiClient, ClientConfig, SessionManager};
//!
//! # async fn example() -> Result<(), strove_core::Error> {
//! let store = CredentialStore::load(Arc::new(MemoryStorage::new()));
//! let (navigator, _commands) = ChannelNavigator::new();
//! let client = ApiClient::new(ClientConfig::from_env()?, store.clone(), Arc::new(navigator))?;
//!
//! let session = SessionManager::new(client, store);
//! let credential = session.login("alice", "pw").await?;
//! println!("Logged in as {:?}", credential.username);
//! # Ok(())
//! # }
//! ```

pub mod ai;
mod client;
mod config;
pub mod endpoints;
mod error;
pub mod middleware;
mod session;

pub use ai::AiApi;
pub use client::{ApiClient, ApiClientBuilder};
pub use config::{API_URL_ENV, ClientConfig, DEFAULT_TIMEOUT};
pub use endpoints::ApiResponse;
pub use middleware::{BearerAuth, Middleware, SessionExpiry};
pub use session::SessionManager;
