//! Wiring of storage, session and client for a single command run.

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use directories::ProjectDirs;
use tracing::debug;

use strove_core::router::Router;
use strove_core::{ApiUrl, CredentialStore, Navigator, ThemeStore};
use strove_file::FileStorage;
use strove_http::{AiApi, ApiClient, ClientConfig, SessionManager};

use crate::cli::GlobalArgs;
use crate::output;

/// Everything a command needs, built around one shared credential store.
pub struct ClientContext {
    storage: Arc<FileStorage>,
    store: CredentialStore,
    config: ClientConfig,
}

impl ClientContext {
    /// Open the storage file and load the session from it.
    pub fn open(global: &GlobalArgs) -> Result<Self> {
        let path = match &global.storage {
            Some(path) => path.clone(),
            None => default_storage_path()?,
        };

        let config = match &global.api_url {
            Some(url) => ClientConfig::new(ApiUrl::new(url).context("Invalid API URL")?),
            None => ClientConfig::default(),
        };

        debug!(storage = %path.display(), api = %config.base_url, "Opening client context");
        let storage = Arc::new(FileStorage::new(path));
        let store = CredentialStore::load(storage.clone());

        Ok(Self {
            storage,
            store,
            config,
        })
    }

    pub fn store(&self) -> &CredentialStore {
        &self.store
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn storage_path(&self) -> PathBuf {
        self.storage.path().to_path_buf()
    }

    /// Build the API client, with session expiry reported on the terminal.
    pub fn client(&self) -> Result<ApiClient> {
        ApiClient::new(
            self.config.clone(),
            self.store.clone(),
            Arc::new(TerminalNavigator),
        )
        .context("Failed to create API client")
    }

    pub fn session(&self) -> Result<SessionManager> {
        Ok(SessionManager::new(self.client()?, self.store.clone()))
    }

    pub fn ai(&self) -> Result<AiApi> {
        Ok(AiApi::new(self.client()?))
    }

    pub fn router(&self) -> Router {
        Router::new(self.store.clone())
    }

    pub fn theme(&self, system_prefers_dark: bool) -> ThemeStore {
        ThemeStore::load(self.storage.clone(), system_prefers_dark)
    }
}

/// Default storage file in the platform data directory.
fn default_storage_path() -> Result<PathBuf> {
    let dirs =
        ProjectDirs::from("", "", "strove").context("Could not determine data directory")?;

    let data_dir = dirs.data_dir();
    fs::create_dir_all(data_dir).context("Failed to create data directory")?;

    Ok(data_dir.join("storage.json"))
}

/// A terminal has no route to switch to, so a forced navigation becomes a
/// notice telling the user how to get back in.
struct TerminalNavigator;

impl Navigator for TerminalNavigator {
    fn navigate(&self, path: &str) {
        output::warn(&format!(
            "Session expired (redirected to {path}). Run 'strove login' to sign in again."
        ));
    }
}
