// # Memory Contact Store
//
// In-memory implementation of ContactStore.
//
// ## Purpose
//
// Behaves like a browser key-value store: each key maps to the JSON text
// of its collection. Nothing survives the process.
//
// ## When to Use
//
// - Testing environments
// - Embedding where persistence is handled elsewhere

use std::collections::HashMap;
use std::sync::Arc;
use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::model::{Contact, Group};
use crate::traits::contact_store::{
    CONTACTS_KEY, ContactStore, ContactStoreFactory, GROUPS_KEY, StoredRecords,
};
use crate::Error;

/// In-memory contact store
///
/// Clones share the same underlying map, so a test can keep a handle and
/// inspect what a `ContactBook` wrote.
///
/// # Example
///
/// ```rust,no_run
/// use contactbook_core::store::MemoryContactStore;
/// use contactbook_core::traits::ContactStore;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let store = MemoryContactStore::new();
///     assert!(store.load().await?.is_absent());
///
///     store.save(&[], &[]).await?;
///     assert_eq!(store.raw("groups").await.as_deref(), Some("[]"));
///
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemoryContactStore {
    inner: Arc<RwLock<HashMap<String, String>>>,
}

impl MemoryContactStore {
    /// Create a new empty memory store
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of keys written so far
    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }

    /// Check if nothing was ever written
    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.is_empty()
    }

    /// Remove every key
    pub async fn clear(&self) {
        self.inner.write().await.clear();
    }

    /// The JSON text stored under `key`
    pub async fn raw(&self, key: &str) -> Option<String> {
        self.inner.read().await.get(key).cloned()
    }

    /// Store raw text under `key`, bypassing serialization
    pub async fn insert_raw(&self, key: impl Into<String>, value: impl Into<String>) {
        self.inner.write().await.insert(key.into(), value.into());
    }
}

#[async_trait]
impl ContactStore for MemoryContactStore {
    async fn load(&self) -> Result<StoredRecords, Error> {
        let guard = self.inner.read().await;

        let contacts = guard
            .get(CONTACTS_KEY)
            .map(|text| serde_json::from_str::<Vec<Contact>>(text))
            .transpose()?;
        let groups = guard
            .get(GROUPS_KEY)
            .map(|text| serde_json::from_str::<Vec<Group>>(text))
            .transpose()?;

        Ok(StoredRecords { contacts, groups })
    }

    async fn save(&self, contacts: &[Contact], groups: &[Group]) -> Result<(), Error> {
        let contacts = serde_json::to_string(contacts)?;
        let groups = serde_json::to_string(groups)?;

        let mut guard = self.inner.write().await;
        guard.insert(CONTACTS_KEY.to_string(), contacts);
        guard.insert(GROUPS_KEY.to_string(), groups);
        Ok(())
    }

    fn store_name(&self) -> &'static str {
        "memory"
    }
}

/// Builds an empty [`MemoryContactStore`]; the configuration is ignored
#[derive(Debug, Default, Clone, Copy)]
pub struct MemoryContactStoreFactory;

#[async_trait]
impl ContactStoreFactory for MemoryContactStoreFactory {
    async fn create(&self, _config: &serde_json::Value) -> Result<Box<dyn ContactStore>, Error> {
        Ok(Box::new(MemoryContactStore::new()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{seed_contacts, seed_groups};

    #[tokio::test]
    async fn test_memory_store_basic() {
        let store = MemoryContactStore::new();

        // Initially empty
        assert!(store.is_empty().await);
        assert!(store.load().await.unwrap().is_absent());

        store.save(&seed_contacts(), &seed_groups()).await.unwrap();
        assert_eq!(store.len().await, 2);

        let records = store.load().await.unwrap();
        assert_eq!(records, StoredRecords::new(seed_contacts(), seed_groups()));
    }

    #[tokio::test]
    async fn test_memory_store_keys_are_independent() {
        let store = MemoryContactStore::new();
        store.insert_raw(GROUPS_KEY, r#"[{"id":"7","name":"Club"}]"#).await;

        let records = store.load().await.unwrap();
        assert!(records.contacts.is_none());
        assert_eq!(records.groups.unwrap()[0].name, "Club");
    }

    #[tokio::test]
    async fn test_memory_store_rejects_corrupt_json() {
        let store = MemoryContactStore::new();
        store.insert_raw(CONTACTS_KEY, "not json").await;

        assert!(matches!(store.load().await, Err(Error::Json(_))));
    }

    #[tokio::test]
    async fn test_memory_store_clones_share_state() {
        let store = MemoryContactStore::new();
        let handle = store.clone();

        store.save(&[], &seed_groups()).await.unwrap();
        assert!(handle.raw(GROUPS_KEY).await.unwrap().contains("Colleagues"));

        handle.clear().await;
        assert!(store.is_empty().await);
    }

    #[test]
    fn test_factory_ignores_config() {
        let store = tokio_test::block_on(
            MemoryContactStoreFactory.create(&serde_json::json!({ "anything": 1 })),
        )
        .unwrap();

        assert_eq!(store.store_name(), "memory");
        assert!(tokio_test::block_on(store.load()).unwrap().is_absent());
    }
}
