//! In-process key/value storage.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use crate::Result;
use crate::traits::{KeyValueStorage, StorageWrite};

/// Volatile [`KeyValueStorage`] backed by a map.
///
/// Useful for tests and for hosts that do not need the session to survive a
/// restart.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryStorage {
    /// Create an empty storage.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a storage pre-populated with `entries`.
    pub fn with_entries<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let entries = entries
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        Self {
            entries: RwLock::new(entries),
        }
    }

    /// Returns the number of stored keys.
    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Returns true if nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl KeyValueStorage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        Ok(entries.get(key).cloned())
    }

    fn apply(&self, batch: &[StorageWrite<'_>]) -> Result<()> {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        for write in batch {
            match *write {
                StorageWrite::Set { key, value } => {
                    entries.insert(key.to_string(), value.to_string());
                }
                StorageWrite::Remove { key } => {
                    entries.remove(key);
                }
            }
        }
        Ok(())
    }
}
