//! Theme preference store.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use tokio::sync::watch;
use tracing::{debug, warn};

use crate::Result;
use crate::error::{Error, InvalidInputError};
use crate::traits::KeyValueStorage;

/// Storage key of the theme preference.
pub const THEME_KEY: &str = "theme";

/// Colour scheme of the UI.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Theme {
    Light,
    Dark,
}

impl Theme {
    /// The value persisted under [`THEME_KEY`].
    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    /// The opposite theme.
    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    pub fn is_dark(self) -> bool {
        self == Theme::Dark
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Theme {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            other => Err(InvalidInputError::Other {
                message: format!("unknown theme '{}'", other),
            }
            .into()),
        }
    }
}

/// Holds the theme preference and mirrors it to durable storage.
///
/// The initial value comes from storage; with nothing stored, the host's
/// system preference decides. Whatever is resolved is written back right
/// away so the next start sees an explicit choice.
#[derive(Clone)]
pub struct ThemeStore {
    storage: Arc<dyn KeyValueStorage>,
    current: Arc<watch::Sender<Theme>>,
}

impl ThemeStore {
    /// Load the preference, falling back to `system_prefers_dark`.
    pub fn load(storage: Arc<dyn KeyValueStorage>, system_prefers_dark: bool) -> Self {
        let stored = match storage.get(THEME_KEY) {
            Ok(value) => value,
            Err(err) => {
                warn!(error = %err, "Failed to read theme preference");
                None
            }
        };

        // Anything other than "dark" that was explicitly stored reads as light.
        let theme = match stored.as_deref() {
            Some("dark") => Theme::Dark,
            Some(_) => Theme::Light,
            None if system_prefers_dark => Theme::Dark,
            None => Theme::Light,
        };
        debug!(%theme, "Loaded theme preference");

        let (tx, _) = watch::channel(theme);
        let store = Self {
            storage,
            current: Arc::new(tx),
        };
        store.persist(theme);
        store
    }

    /// Returns the active theme.
    pub fn current(&self) -> Theme {
        *self.current.borrow()
    }

    pub fn is_dark(&self) -> bool {
        self.current().is_dark()
    }

    /// Switch to the other theme and return it.
    pub fn toggle(&self) -> Theme {
        let mut next = Theme::Light;
        self.current.send_modify(|theme| {
            *theme = theme.toggled();
            next = *theme;
        });
        self.persist(next);
        next
    }

    /// Switch to `theme`.
    pub fn set(&self, theme: Theme) {
        self.current.send_if_modified(|current| {
            let changed = *current != theme;
            *current = theme;
            changed
        });
        self.persist(theme);
    }

    /// Observe theme changes.
    pub fn subscribe(&self) -> watch::Receiver<Theme> {
        self.current.subscribe()
    }

    fn persist(&self, theme: Theme) {
        if let Err(err) = self.storage.set(THEME_KEY, theme.as_str()) {
            warn!(%theme, error = %err, "Failed to persist theme preference");
        }
    }
}

impl fmt::Debug for ThemeStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ThemeStore")
            .field("current", &self.current())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MemoryStorage;

    #[test]
    fn stored_preference_wins_over_system() {
        let storage = Arc::new(MemoryStorage::with_entries([("theme", "light")]));
        let store = ThemeStore::load(storage, true);
        assert_eq!(store.current(), Theme::Light);

        let storage = Arc::new(MemoryStorage::with_entries([("theme", "dark")]));
        let store = ThemeStore::load(storage, false);
        assert!(store.is_dark());
    }

    #[test]
    fn falls_back_to_system_preference_and_persists_it() {
        let storage = Arc::new(MemoryStorage::new());
        let store = ThemeStore::load(storage.clone(), true);
        assert!(store.is_dark());
        assert_eq!(storage.get("theme").unwrap().as_deref(), Some("dark"));
    }

    #[test]
    fn toggle_flips_and_persists() {
        let storage = Arc::new(MemoryStorage::new());
        let store = ThemeStore::load(storage.clone(), false);
        let mut rx = store.subscribe();

        assert_eq!(store.toggle(), Theme::Dark);
        assert!(rx.has_changed().unwrap());
        assert_eq!(*rx.borrow_and_update(), Theme::Dark);
        assert_eq!(storage.get("theme").unwrap().as_deref(), Some("dark"));

        assert_eq!(store.toggle(), Theme::Light);
        assert_eq!(storage.get("theme").unwrap().as_deref(), Some("light"));
    }

    #[test]
    fn set_same_theme_does_not_notify() {
        let store = ThemeStore::load(Arc::new(MemoryStorage::new()), false);
        let mut rx = store.subscribe();
        rx.borrow_and_update();
        store.set(Theme::Light);
        assert!(!rx.has_changed().unwrap());
        store.set(Theme::Dark);
        assert!(rx.has_changed().unwrap());
    }

    #[test]
    fn parses_theme_names() {
        assert_eq!("dark".parse::<Theme>().unwrap(), Theme::Dark);
        assert_eq!("light".parse::<Theme>().unwrap(), Theme::Light);
        assert!("blue".parse::<Theme>().is_err());
    }
}
