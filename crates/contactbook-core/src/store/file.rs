// # File Contact Store
//
// File-based implementation of ContactStore with crash recovery.
//
// ## Layout
//
// The store owns a directory with one file per key:
//
// ```text
// <dir>/contacts.json   [{"id":"1","name":"Ivan Ivanov","phone":"...","groupId":"1"}]
// <dir>/groups.json     [{"id":"1","name":"Friends"}]
// ```
//
// ## Crash Recovery
//
// - Atomic writes: each file is written to `.tmp`, then renamed
// - Automatic backup: the previous file is copied to `.backup` first
// - Recovery: a file that fails to parse is replaced by its backup
// - A key with no usable file or backup loads as absent

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

use crate::Error;
use crate::model::{Contact, Group};
use crate::traits::contact_store::{
    CONTACTS_KEY, ContactStore, ContactStoreFactory, GROUPS_KEY, StoredRecords,
};

/// File-based contact store with crash recovery
///
/// # Example
///
/// ```rust,no_run
/// use contactbook_core::store::FileContactStore;
/// use contactbook_core::traits::ContactStore;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let store = FileContactStore::new("/var/lib/contactbook").await?;
///
///     let records = store.load().await?;
///     println!("first run: {}", records.is_absent());
///
///     Ok(())
/// }
/// ```
#[derive(Debug)]
pub struct FileContactStore {
    dir: PathBuf,
    // Serializes writers so a backup never captures a half-renamed pair
    write_lock: Mutex<()>,
}

impl FileContactStore {
    /// Open a store rooted at `dir`, creating the directory if needed
    pub async fn new<P: AsRef<Path>>(dir: P) -> Result<Self, Error> {
        let dir = dir.as_ref().to_path_buf();

        if !dir.as_os_str().is_empty() && !dir.exists() {
            fs::create_dir_all(&dir).await.map_err(|e| {
                Error::config(format!(
                    "Failed to create store directory {}: {}",
                    dir.display(),
                    e
                ))
            })?;
        }

        Ok(Self {
            dir,
            write_lock: Mutex::new(()),
        })
    }

    /// Directory holding the record files
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the file backing `key`
    pub fn key_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }

    /// Load one key, recovering from its backup if the file is corrupted
    async fn load_key_with_recovery<T: DeserializeOwned>(path: &Path) -> Result<Option<T>, Error> {
        match Self::load_key(path).await {
            Ok(value) => Ok(value),
            Err(Error::Json(e)) => {
                tracing::warn!(
                    "Store file {} appears corrupted: {}. Attempting recovery from backup.",
                    path.display(),
                    e
                );

                let backup_path = Self::backup_path(path);
                if !backup_path.exists() {
                    tracing::warn!("No backup for {}. Treating key as absent.", path.display());
                    return Ok(None);
                }

                match Self::load_key(&backup_path).await {
                    Ok(value) => {
                        tracing::info!("Recovered {} from backup", path.display());
                        if let Err(restore_err) = Self::restore_from_backup(path, &backup_path).await {
                            tracing::error!(
                                "Failed to restore {} from backup: {}",
                                path.display(),
                                restore_err
                            );
                        }
                        Ok(value)
                    }
                    Err(backup_err) => {
                        tracing::error!(
                            "Backup of {} also unusable: {}. Treating key as absent.",
                            path.display(),
                            backup_err
                        );
                        Ok(None)
                    }
                }
            }
            Err(e) => Err(e),
        }
    }

    /// Load one key; `Ok(None)` if its file does not exist
    async fn load_key<T: DeserializeOwned>(path: &Path) -> Result<Option<T>, Error> {
        if !path.exists() {
            tracing::debug!("Store file does not exist: {}", path.display());
            return Ok(None);
        }

        // Bytes, so invalid UTF-8 surfaces as a JSON error and gets recovered
        let content = fs::read(path).await.map_err(|e| {
            Error::storage(format!("Failed to read {}: {}", path.display(), e))
        })?;

        Ok(Some(serde_json::from_slice(&content)?))
    }

    /// Write one key atomically, keeping the previous file as backup
    async fn write_key<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<(), Error> {
        let path = self.key_path(key);
        let json = serde_json::to_string_pretty(value)
            .map_err(|e| Error::storage(format!("Failed to serialize {key}: {e}")))?;

        let temp_path = Self::temp_path(&path);
        {
            let mut file = fs::File::create(&temp_path).await.map_err(|e| {
                Error::storage(format!(
                    "Failed to create temp file {}: {}",
                    temp_path.display(),
                    e
                ))
            })?;

            file.write_all(json.as_bytes()).await.map_err(|e| {
                Error::storage(format!(
                    "Failed to write to temp file {}: {}",
                    temp_path.display(),
                    e
                ))
            })?;

            file.flush().await.map_err(|e| {
                Error::storage(format!(
                    "Failed to flush temp file {}: {}",
                    temp_path.display(),
                    e
                ))
            })?;
        }

        if path.exists() {
            let backup_path = Self::backup_path(&path);
            if let Err(e) = fs::copy(&path, &backup_path).await {
                tracing::warn!("Failed to create backup of {}: {}", path.display(), e);
            }
        }

        fs::rename(&temp_path, &path).await.map_err(|e| {
            Error::storage(format!(
                "Failed to rename {} to {}: {}",
                temp_path.display(),
                path.display(),
                e
            ))
        })?;

        tracing::trace!("Wrote {}", path.display());
        Ok(())
    }

    async fn restore_from_backup(path: &Path, backup_path: &Path) -> Result<(), Error> {
        fs::copy(backup_path, path).await.map_err(|e| {
            Error::storage(format!(
                "Failed to restore from backup {} to {}: {}",
                backup_path.display(),
                path.display(),
                e
            ))
        })?;
        Ok(())
    }

    fn temp_path(path: &Path) -> PathBuf {
        path.with_extension("tmp")
    }

    fn backup_path(path: &Path) -> PathBuf {
        path.with_extension("backup")
    }
}

#[async_trait]
impl ContactStore for FileContactStore {
    async fn load(&self) -> Result<StoredRecords, Error> {
        let contacts =
            Self::load_key_with_recovery::<Vec<Contact>>(&self.key_path(CONTACTS_KEY)).await?;
        let groups = Self::load_key_with_recovery::<Vec<Group>>(&self.key_path(GROUPS_KEY)).await?;

        tracing::debug!(
            "Loaded store {}: contacts={:?} groups={:?}",
            self.dir.display(),
            contacts.as_ref().map(Vec::len),
            groups.as_ref().map(Vec::len)
        );

        Ok(StoredRecords { contacts, groups })
    }

    async fn save(&self, contacts: &[Contact], groups: &[Group]) -> Result<(), Error> {
        let _guard = self.write_lock.lock().await;
        self.write_key(CONTACTS_KEY, contacts).await?;
        self.write_key(GROUPS_KEY, groups).await
    }

    fn store_name(&self) -> &'static str {
        "file"
    }
}

/// Builds a [`FileContactStore`] from `{"type": "file", "path": "..."}`
#[derive(Debug, Default, Clone, Copy)]
pub struct FileContactStoreFactory;

#[async_trait]
impl ContactStoreFactory for FileContactStoreFactory {
    async fn create(&self, config: &serde_json::Value) -> Result<Box<dyn ContactStore>, Error> {
        let path = config
            .get("path")
            .and_then(serde_json::Value::as_str)
            .filter(|p| !p.is_empty())
            .ok_or_else(|| Error::config("File store requires a non-empty 'path'"))?;

        Ok(Box::new(FileContactStore::new(path).await?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{seed_contacts, seed_groups};
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_file_store_basic() {
        let dir = tempdir().unwrap();
        let store = FileContactStore::new(dir.path()).await.unwrap();

        // Initially absent
        assert!(store.load().await.unwrap().is_absent());

        store.save(&seed_contacts(), &seed_groups()).await.unwrap();
        assert!(store.key_path(CONTACTS_KEY).exists());
        assert!(store.key_path(GROUPS_KEY).exists());

        // Load new instance and verify persistence
        let store2 = FileContactStore::new(dir.path()).await.unwrap();
        let records = store2.load().await.unwrap();
        assert_eq!(records, StoredRecords::new(seed_contacts(), seed_groups()));
    }

    #[tokio::test]
    async fn test_file_store_creates_directory() {
        let dir = tempdir().unwrap();
        let nested = dir.path().join("a").join("b");

        let store = FileContactStore::new(&nested).await.unwrap();
        store.save(&[], &[]).await.unwrap();
        assert!(nested.join("groups.json").exists());
    }

    #[tokio::test]
    async fn test_file_store_corruption_recovery() {
        let dir = tempdir().unwrap();
        let store = FileContactStore::new(dir.path()).await.unwrap();

        let first = seed_groups();
        store.save(&[], &first).await.unwrap();

        // Second write creates the backup of the first
        let mut second = seed_groups();
        second[0].name = "Best Friends".to_string();
        store.save(&[], &second).await.unwrap();

        let groups_path = store.key_path(GROUPS_KEY);
        assert!(FileContactStore::backup_path(&groups_path).exists());

        fs::write(&groups_path, b"corrupted json data").await.unwrap();

        let records = store.load().await.unwrap();
        assert_eq!(records.groups, Some(first), "backup holds the previous state");

        // The corrupted file was restored
        let restored = fs::read_to_string(&groups_path).await.unwrap();
        assert!(restored.contains("Friends"));
    }

    #[tokio::test]
    async fn test_file_store_corruption_without_backup_is_absent() {
        let dir = tempdir().unwrap();
        let store = FileContactStore::new(dir.path()).await.unwrap();

        fs::write(store.key_path(CONTACTS_KEY), b"{").await.unwrap();

        let records = store.load().await.unwrap();
        assert!(records.contacts.is_none());
    }

    #[tokio::test]
    async fn test_file_store_recovers_from_invalid_utf8() {
        let dir = tempdir().unwrap();
        let store = FileContactStore::new(dir.path()).await.unwrap();

        store.save(&seed_contacts(), &[]).await.unwrap();
        store.save(&seed_contacts(), &seed_groups()).await.unwrap();

        let contacts_path = store.key_path(CONTACTS_KEY);
        fs::write(&contacts_path, [0xff, 0xfe, 0xfd]).await.unwrap();

        let records = store.load().await.unwrap();
        assert_eq!(records.contacts, Some(seed_contacts()));
        assert_eq!(records.groups, Some(seed_groups()));
    }

    #[tokio::test]
    async fn test_file_store_invalid_utf8_without_backup_is_absent() {
        let dir = tempdir().unwrap();
        let store = FileContactStore::new(dir.path()).await.unwrap();

        fs::write(store.key_path(GROUPS_KEY), b"[{\"id\":\"1\",\"name\":\"\xff\"}]")
            .await
            .unwrap();

        let records = store.load().await.unwrap();
        assert!(records.groups.is_none());
    }

    #[tokio::test]
    async fn test_file_store_repeated_writes() {
        let dir = tempdir().unwrap();
        let store = FileContactStore::new(dir.path()).await.unwrap();

        let mut contacts = seed_contacts();
        for i in 0..10 {
            contacts[0].name = format!("Name {i}");
            store.save(&contacts, &seed_groups()).await.unwrap();
        }

        let store2 = FileContactStore::new(dir.path()).await.unwrap();
        let loaded = store2.load().await.unwrap().contacts.unwrap();
        assert_eq!(loaded[0].name, "Name 9");
        assert!(!FileContactStore::temp_path(&store.key_path(CONTACTS_KEY)).exists());
    }

    #[tokio::test]
    async fn test_file_factory_requires_path() {
        let factory = FileContactStoreFactory;
        let err = factory
            .create(&serde_json::json!({ "type": "file" }))
            .await
            .err()
            .unwrap();
        assert!(matches!(err, Error::Config(_)));

        let dir = tempdir().unwrap();
        let store = factory
            .create(&serde_json::json!({ "type": "file", "path": dir.path() }))
            .await
            .unwrap();
        assert_eq!(store.store_name(), "file");
    }
}
