//! Durable key/value storage trait.

use std::fmt;

use crate::Result;

/// A single mutation in a storage batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageWrite<'a> {
    /// Store `value` under `key`, replacing any previous value.
    Set { key: &'a str, value: &'a str },
    /// Remove `key` if present.
    Remove { key: &'a str },
}

/// Durable client-side storage of string values.
///
/// Absent keys are a valid state, not an error. Writes are applied as a
/// batch so that a group of related keys is never left half-written.
pub trait KeyValueStorage: Send + Sync + fmt::Debug {
    /// Read the value stored under `key`.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Apply every write in `batch` or none of them.
    fn apply(&self, batch: &[StorageWrite<'_>]) -> Result<()>;

    /// Store a single value.
    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.apply(&[StorageWrite::Set { key, value }])
    }

    /// Remove a single value.
    fn remove(&self, key: &str) -> Result<()> {
        self.apply(&[StorageWrite::Remove { key }])
    }
}
