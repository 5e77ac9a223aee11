//! JSON file storage.

use std::collections::BTreeMap;
use std::fs::{self, File, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use fs2::FileExt;
use tracing::{debug, instrument, trace, warn};
use uuid::Uuid;

use strove_core::Result;
use strove_core::error::{Error, StorageError};
use strove_core::traits::{KeyValueStorage, StorageWrite};

#[cfg(unix)]
use std::os::unix::fs::PermissionsExt;

/// A [`KeyValueStorage`] kept in a single JSON object on disk.
///
/// Every batch is applied as read, modify, write-to-temp, rename while an
/// exclusive lock is held on a sibling `.lock` file, so concurrent processes
/// sharing the file never interleave partial updates. The file is created
/// with owner-only permissions on Unix since it holds the session token.
#[derive(Debug, Clone)]
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    /// Create a storage backed by the file at `path`.
    ///
    /// Nothing is touched on disk until the first write.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Get the backing file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn lock_path(&self) -> PathBuf {
        let mut name = self.path.as_os_str().to_owned();
        name.push(".lock");
        PathBuf::from(name)
    }

    fn io_error(&self, path: &Path, err: std::io::Error) -> Error {
        Error::Storage(StorageError::Io {
            path: path.display().to_string(),
            message: err.to_string(),
        })
    }

    fn open_lock(&self) -> Result<File> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| self.io_error(parent, e))?;
        }

        let lock_path = self.lock_path();
        OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(&lock_path)
            .map_err(|e| self.io_error(&lock_path, e))
    }

    /// Release a held lock. Closing the handle drops the lock regardless, so
    /// a failed unlock is logged and never replaces the outcome of the work
    /// done under it.
    fn release(&self, lock: File) {
        if let Err(e) = FileExt::unlock(&lock) {
            warn!(path = %self.lock_path().display(), error = %e, "Failed to release storage lock");
        }
    }

    fn read_entries(&self) -> Result<BTreeMap<String, String>> {
        let json = match fs::read_to_string(&self.path) {
            Ok(json) => json,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(e) => return Err(self.io_error(&self.path, e)),
        };

        if json.trim().is_empty() {
            return Ok(BTreeMap::new());
        }

        serde_json::from_str(&json).map_err(|e| {
            Error::Storage(StorageError::Corrupt {
                path: self.path.display().to_string(),
                message: e.to_string(),
            })
        })
    }

    fn write_entries(&self, entries: &BTreeMap<String, String>) -> Result<()> {
        let json = serde_json::to_string_pretty(entries).map_err(|e| {
            Error::Storage(StorageError::Corrupt {
                path: self.path.display().to_string(),
                message: e.to_string(),
            })
        })?;

        let mut tmp_name = self.path.as_os_str().to_owned();
        tmp_name.push(format!(".{}.tmp", Uuid::new_v4()));
        let tmp_path = PathBuf::from(tmp_name);

        let mut file = File::create(&tmp_path).map_err(|e| self.io_error(&tmp_path, e))?;

        #[cfg(unix)]
        {
            let mut perms = file
                .metadata()
                .map_err(|e| self.io_error(&tmp_path, e))?
                .permissions();
            perms.set_mode(0o600);
            fs::set_permissions(&tmp_path, perms).map_err(|e| self.io_error(&tmp_path, e))?;
        }

        file.write_all(json.as_bytes())
            .and_then(|_| file.sync_all())
            .map_err(|e| self.io_error(&tmp_path, e))?;
        drop(file);

        fs::rename(&tmp_path, &self.path).map_err(|e| {
            let _ = fs::remove_file(&tmp_path);
            self.io_error(&self.path, e)
        })
    }
}

impl KeyValueStorage for FileStorage {
    #[instrument(skip(self), fields(path = %self.path.display()))]
    fn get(&self, key: &str) -> Result<Option<String>> {
        if !self.path.exists() {
            trace!("Storage file absent");
            return Ok(None);
        }

        let lock = self.open_lock()?;
        lock.lock_shared().map_err(|e| self.io_error(&self.lock_path(), e))?;
        let entries = self.read_entries();
        self.release(lock);

        Ok(entries?.get(key).cloned())
    }

    #[instrument(skip(self, batch), fields(path = %self.path.display(), writes = batch.len()))]
    fn apply(&self, batch: &[StorageWrite<'_>]) -> Result<()> {
        let lock = self.open_lock()?;
        lock.lock_exclusive()
            .map_err(|e| self.io_error(&self.lock_path(), e))?;

        let result = self.read_entries().and_then(|mut entries| {
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
            self.write_entries(&entries)
        });

        self.release(lock);

        if result.is_ok() {
            debug!("Storage batch written");
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use strove_core::{AuthToken, Credential, CredentialStore, Theme, ThemeStore};
    use tempfile::TempDir;

    use super::*;

    fn storage(dir: &TempDir) -> FileStorage {
        FileStorage::new(dir.path().join("nested").join("storage.json"))
    }

    #[test]
    fn missing_file_reads_as_empty() {
        let dir = TempDir::new().unwrap();
        let storage = storage(&dir);
        assert_eq!(storage.get("token").unwrap(), None);
        assert!(!storage.path().exists());
    }

    #[test]
    fn batch_is_persisted() {
        let dir = TempDir::new().unwrap();
        let storage = storage(&dir);
        storage
            .apply(&[
                StorageWrite::Set {
                    key: "token",
                    value: "t1",
                },
                StorageWrite::Set {
                    key: "username",
                    value: "alice",
                },
            ])
            .unwrap();

        let reopened = FileStorage::new(storage.path());
        assert_eq!(reopened.get("token").unwrap().as_deref(), Some("t1"));
        assert_eq!(reopened.get("username").unwrap().as_deref(), Some("alice"));

        reopened.remove("token").unwrap();
        assert_eq!(storage.get("token").unwrap(), None);
        assert_eq!(storage.get("username").unwrap().as_deref(), Some("alice"));
    }

    #[test]
    fn corrupt_file_is_reported() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("storage.json");
        fs::write(&path, "not json").unwrap();

        let storage = FileStorage::new(&path);
        assert!(matches!(
            storage.get("token"),
            Err(Error::Storage(StorageError::Corrupt { .. }))
        ));
        assert!(storage.set("token", "t1").is_err());
    }

    #[test]
    fn lock_is_released_after_each_batch() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("storage.json");
        fs::write(&path, "not json").unwrap();

        let storage = FileStorage::new(&path);
        assert!(storage.set("token", "t1").is_err());

        fs::write(&path, "{}").unwrap();
        storage.set("token", "t1").unwrap();

        // A second handle takes the same lock file for both read and write.
        let other = FileStorage::new(&path);
        assert_eq!(other.get("token").unwrap().as_deref(), Some("t1"));
        other.set("theme", "dark").unwrap();
        assert_eq!(storage.get("theme").unwrap().as_deref(), Some("dark"));

        let lock = File::open(storage.lock_path()).unwrap();
        lock.try_lock_exclusive().unwrap();
        FileExt::unlock(&lock).unwrap();
    }

    #[test]
    fn no_temp_files_left_behind() {
        let dir = TempDir::new().unwrap();
        let storage = FileStorage::new(dir.path().join("storage.json"));
        storage.set("theme", "dark").unwrap();
        storage.set("theme", "light").unwrap();

        let leftovers: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name().to_string_lossy().ends_with(".tmp"))
            .collect();
        assert!(leftovers.is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn file_is_private() {
        let dir = TempDir::new().unwrap();
        let storage = FileStorage::new(dir.path().join("storage.json"));
        storage.set("token", "t1").unwrap();
        let mode = fs::metadata(storage.path()).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[test]
    fn credential_store_roundtrips_through_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("storage.json");

        let store = CredentialStore::load(Arc::new(FileStorage::new(&path)));
        store
            .set_auth(Credential::new(AuthToken::new("t1"), "alice", "a@x.com"))
            .unwrap();

        let reloaded = CredentialStore::load(Arc::new(FileStorage::new(&path)));
        assert!(reloaded.is_authenticated());
        assert_eq!(reloaded.token().unwrap().as_str(), "t1");
        assert_eq!(reloaded.username().as_deref(), Some("alice"));
        assert_eq!(reloaded.email().as_deref(), Some("a@x.com"));

        reloaded.clear_auth();
        let after_logout = CredentialStore::load(Arc::new(FileStorage::new(&path)));
        assert!(!after_logout.is_authenticated());
        assert!(after_logout.username().is_none());
    }

    #[test]
    fn theme_shares_the_file_with_credentials() {
        let dir = TempDir::new().unwrap();
        let storage = Arc::new(FileStorage::new(dir.path().join("storage.json")));

        let store = CredentialStore::load(storage.clone());
        store
            .set_auth(Credential::new(AuthToken::new("t1"), "alice", "a@x.com"))
            .unwrap();
        let theme = ThemeStore::load(storage.clone(), false);
        theme.toggle();

        store.clear_auth();
        assert_eq!(storage.get("theme").unwrap().as_deref(), Some("dark"));
        assert_eq!(ThemeStore::load(storage, false).current(), Theme::Dark);
    }
}
