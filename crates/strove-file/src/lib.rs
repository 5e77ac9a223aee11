//! strove-file - Filesystem-backed durable storage.

mod storage;

pub use storage::FileStorage;
