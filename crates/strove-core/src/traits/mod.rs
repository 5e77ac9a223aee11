//! Core traits for storage and navigation.

mod navigator;
mod storage;

pub use navigator::{ChannelNavigator, Navigator};
pub use storage::{KeyValueStorage, StorageWrite};
